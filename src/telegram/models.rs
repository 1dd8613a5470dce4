//! The slice of the Telegram Bot API payloads the bot actually reads.
//! Everything else in an update is ignored during deserialization.
use serde::Deserialize;

#[derive(Clone, Deserialize, Debug)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Clone, Deserialize, Debug)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Clone, Deserialize, Debug)]
pub struct User {
    pub id: i64,
}

#[derive(Clone, Deserialize, Debug)]
pub struct Chat {
    pub id: i64,
}

/// A bot command parsed from the leading `/word` token of a message.
/// Tolerates the `/word@botname` form Telegram uses in group chats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    Start,
    Reset,
    Model,
}

impl Command {
    pub fn parse(text: &str) -> Option<Command> {
        let first = text.split_whitespace().next()?;
        let name = first.strip_prefix('/')?;
        let name = name.split('@').next()?;
        match name {
            "start" => Some(Command::Start),
            "reset" => Some(Command::Reset),
            "model" => Some(Command::Model),
            _ => None,
        }
    }
}
