//! [Telegram Bot API](https://core.telegram.org/bots/api) client, reduced to
//! the three methods the bot needs.

pub mod models;

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use self::models::{Message, Update, User};
use crate::prelude::*;

/// How long `getUpdates` is allowed to hold the connection open.
const LONG_POLL_TIMEOUT_SECS: u64 = 30;

pub struct Api {
    client: Client,
    base_url: Url,
}

impl Api {
    pub fn try_new(endpoint: &Url, bot_token: &str) -> Result<Self> {
        // The client must outlive a long poll, so the usual 10 seconds
        // would not do.
        let client = Client::builder()
            .user_agent("meerkat")
            .timeout(Duration::from_secs(LONG_POLL_TIMEOUT_SECS + 20))
            .build()?;
        let base_url = endpoint
            .join(&format!("/bot{bot_token}/"))
            .context("failed to build the bot URL")?;
        Ok(Self { client, base_url })
    }

    /// Validate the token and identify the bot.
    #[instrument(skip_all)]
    pub async fn get_me(&self) -> Result<User> {
        #[derive(Serialize)]
        struct GetMeRequest {}

        self.call("getMe", &GetMeRequest {}).await.context("failed to identify the bot")
    }

    /// Long-poll for inbound updates past the given offset.
    #[instrument(skip_all, level = Level::DEBUG, fields(offset = offset))]
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: u64,
            allowed_updates: &'static [&'static str],
        }

        self.call(
            "getUpdates",
            &GetUpdatesRequest {
                offset,
                timeout: LONG_POLL_TIMEOUT_SECS,
                allowed_updates: &["message"],
            },
        )
        .await
        .context("failed to poll for updates")
    }

    #[instrument(skip_all, fields(chat_id = chat_id))]
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<Message> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: i64,
            text: &'a str,
        }

        self.call("sendMessage", &SendMessageRequest { chat_id, text })
            .await
            .context("failed to send the message")
    }

    async fn call<B: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<R> {
        let url = self.base_url.join(method)?;
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("failed to call `{method}`"))?
            .error_for_status()
            .with_context(|| format!("`{method}` failed"))?
            .json::<Response<R>>()
            .await
            .with_context(|| format!("failed to deserialize `{method}` response JSON"))?;
        Result::from(response)
    }
}

/// Generic Bot API response envelope.
#[derive(Deserialize)]
struct Response<R> {
    ok: bool,
    description: Option<String>,
    result: Option<R>,
}

impl<R> From<Response<R>> for Result<R> {
    fn from(response: Response<R>) -> Self {
        if response.ok {
            response.result.context("`result` is missing from an ok response")
        } else if let Some(description) = response.description {
            bail!(r#"Bot API error ("{description}")"#)
        } else {
            bail!("Bot API error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_response_yields_the_result() -> Result {
        // language=json
        let body = r#"{"ok": true, "result": {"id": 1, "is_bot": true, "first_name": "meerkat", "username": "MeerkatSolarBot"}}"#;
        let response = serde_json::from_str::<Response<User>>(body)?;
        let user = Result::<User>::from(response)?;
        assert_eq!(user.username.as_deref(), Some("MeerkatSolarBot"));
        Ok(())
    }

    #[test]
    fn error_response_carries_the_description() -> Result {
        // language=json
        let body = r#"{"ok": false, "error_code": 401, "description": "Unauthorized"}"#;
        let response = serde_json::from_str::<Response<User>>(body)?;
        let error = Result::<User>::from(response).expect_err("the response is an error");
        assert!(error.to_string().contains("Unauthorized"));
        Ok(())
    }
}
