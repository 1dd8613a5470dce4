//! End-to-end tests for the relay: a fake Telegram server on one side, a
//! fake NIM endpoint on the other, and a `Bot` dispatching between them.

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;

    use nimbot::bot::Bot;
    use nimbot::core::AppConfig;
    use nimbot::nim::ModelPolicy;
    use nimbot::telegram::{Chat, Message, Update, User};

    fn test_config(telegram_url: &str, nim_url: &str, allowed_user_id: i64) -> AppConfig {
        AppConfig {
            telegram_token: "test-token".to_string(),
            telegram_api_url: telegram_url.to_string(),
            nim_api_key: "test-key".to_string(),
            nim_api_url: nim_url.to_string(),
            allowed_user_id,
            model: ModelPolicy::lookup("moonshotai/kimi-k2.5").unwrap(),
            port: 0,
        }
    }

    fn text_update(update_id: i64, user_id: i64, text: &str) -> Update {
        Update {
            update_id,
            message: Some(Message {
                message_id: update_id,
                from: Some(User { id: user_id }),
                chat: Chat { id: user_id },
                text: Some(text.to_string()),
            }),
        }
    }

    fn completion_body(content: &str) -> String {
        json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
        .to_string()
    }

    /// Accept the best-effort typing indicator so it doesn't show up as an
    /// unmatched request.
    fn mock_chat_action(server: &mut ServerGuard) -> mockito::Mock {
        server
            .mock("POST", "/bottest-token/sendChatAction")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": true, "result": true}"#)
            .create()
    }

    #[tokio::test]
    async fn it_relays_one_exchange() {
        let mut telegram = Server::new_async().await;
        let mut nim = Server::new_async().await;

        let _typing = mock_chat_action(&mut telegram);
        let nim_mock = nim
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("Hello human!"))
            .create();
        let send_mock = telegram
            .mock("POST", "/bottest-token/sendMessage")
            .match_body(Matcher::Json(json!({"chat_id": 42, "text": "Hello human!"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": true, "result": {"message_id": 2}}"#)
            .create();

        let mut bot = Bot::new(test_config(&telegram.url(), &nim.url(), 0));
        bot.handle_update(&text_update(1, 42, "Hi there")).await;

        nim_mock.assert();
        send_mock.assert();

        let history = bot.store().history(42);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "Hi there");
        assert_eq!(history[1].content, "Hello human!");
    }

    #[tokio::test]
    async fn it_rejects_unauthorized_sender() {
        let mut telegram = Server::new_async().await;
        let mut nim = Server::new_async().await;

        let nim_mock = nim
            .mock("POST", "/v1/chat/completions")
            .expect(0)
            .create();
        let reject_mock = telegram
            .mock("POST", "/bottest-token/sendMessage")
            .match_body(Matcher::Json(
                json!({"chat_id": 43, "text": "⛔ Unauthorized."}),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": true, "result": {"message_id": 2}}"#)
            .expect(1)
            .create();

        let mut bot = Bot::new(test_config(&telegram.url(), &nim.url(), 42));
        bot.handle_update(&text_update(1, 43, "let me in")).await;

        nim_mock.assert();
        reject_mock.assert();
        assert!(bot.store().history(43).is_empty());
    }

    #[tokio::test]
    async fn it_splits_long_replies() {
        let mut telegram = Server::new_async().await;
        let mut nim = Server::new_async().await;

        let reply = "a".repeat(10_000);

        let _typing = mock_chat_action(&mut telegram);
        let _nim_mock = nim
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(&reply))
            .create();
        let send_mock = telegram
            .mock("POST", "/bottest-token/sendMessage")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": true, "result": {"message_id": 2}}"#)
            .expect(3)
            .create();

        let mut bot = Bot::new(test_config(&telegram.url(), &nim.url(), 0));
        bot.handle_update(&text_update(1, 42, "write a lot")).await;

        send_mock.assert();

        let history = bot.store().history(42);
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].content, reply);
    }

    #[tokio::test]
    async fn it_reports_completion_failure_and_keeps_user_turn() {
        let mut telegram = Server::new_async().await;
        let mut nim = Server::new_async().await;

        let _typing = mock_chat_action(&mut telegram);
        let nim_mock = nim
            .mock("POST", "/v1/chat/completions")
            .with_status(500)
            .with_body("internal error")
            .create();
        let error_mock = telegram
            .mock("POST", "/bottest-token/sendMessage")
            .match_body(Matcher::Regex("❌ Error:".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": true, "result": {"message_id": 2}}"#)
            .expect(1)
            .create();

        let mut bot = Bot::new(test_config(&telegram.url(), &nim.url(), 0));
        bot.handle_update(&text_update(1, 42, "Hi there")).await;

        nim_mock.assert();
        error_mock.assert();

        // The inbound turn is retained, no rollback
        let history = bot.store().history(42);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "Hi there");
    }

    #[tokio::test]
    async fn it_toggles_the_model_and_back() {
        let mut telegram = Server::new_async().await;
        let nim = Server::new_async().await;

        let to_glm = telegram
            .mock("POST", "/bottest-token/sendMessage")
            .match_body(Matcher::PartialJson(
                json!({"text": "✅ Switched to **GLM-5**!"}),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": true, "result": {"message_id": 2}}"#)
            .create();
        let back_to_kimi = telegram
            .mock("POST", "/bottest-token/sendMessage")
            .match_body(Matcher::PartialJson(
                json!({"text": "✅ Switched to **Kimi K2.5**!"}),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": true, "result": {"message_id": 3}}"#)
            .create();

        let mut bot = Bot::new(test_config(&telegram.url(), &nim.url(), 0));
        let original = bot.active_model();

        bot.handle_update(&text_update(1, 42, "/model")).await;
        assert_eq!(bot.active_model().display_name, "GLM-5");

        bot.handle_update(&text_update(2, 42, "/model")).await;
        assert_eq!(bot.active_model(), original);

        to_glm.assert();
        back_to_kimi.assert();
    }

    #[tokio::test]
    async fn it_resets_the_conversation() {
        let mut telegram = Server::new_async().await;
        let mut nim = Server::new_async().await;

        let _typing = mock_chat_action(&mut telegram);
        let _nim_mock = nim
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("Sure."))
            .create();
        let _send_mock = telegram
            .mock("POST", "/bottest-token/sendMessage")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": true, "result": {"message_id": 2}}"#)
            .expect_at_least(1)
            .create();

        let mut bot = Bot::new(test_config(&telegram.url(), &nim.url(), 0));

        bot.handle_update(&text_update(1, 42, "remember this")).await;
        assert_eq!(bot.store().history(42).len(), 2);

        bot.handle_update(&text_update(2, 42, "/reset")).await;
        assert!(bot.store().history(42).is_empty());
    }

    #[tokio::test]
    async fn it_greets_and_resets_on_start() {
        let mut telegram = Server::new_async().await;
        let mut nim = Server::new_async().await;

        let _typing = mock_chat_action(&mut telegram);
        let _nim_mock = nim
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("Noted."))
            .create();
        let _send_mock = telegram
            .mock("POST", "/bottest-token/sendMessage")
            .match_body(Matcher::PartialJson(json!({"text": "Noted."})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": true, "result": {"message_id": 2}}"#)
            .create();
        let greeting_mock = telegram
            .mock("POST", "/bottest-token/sendMessage")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("moonshotai/kimi-k2.5".to_string()),
                Matcher::PartialJson(json!({"parse_mode": "Markdown"})),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": true, "result": {"message_id": 3}}"#)
            .expect(1)
            .create();

        let mut bot = Bot::new(test_config(&telegram.url(), &nim.url(), 0));

        bot.handle_update(&text_update(1, 42, "remember this")).await;
        assert_eq!(bot.store().history(42).len(), 2);

        bot.handle_update(&text_update(2, 42, "/start")).await;

        greeting_mock.assert();
        assert!(bot.store().history(42).is_empty());
    }
}
