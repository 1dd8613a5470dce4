mod client;
pub use client::Client;
mod models;
pub use models::{Chat, Command, Message, Update, User};
