//! Telegram Bot API client.
//!
//! Only the handful of methods the bot needs: long-polling `getUpdates`,
//! `sendMessage` and `sendPhoto` with an inline URL button.

use crate::error::{BotError, Result};
use crate::messenger::{ChatId, Messenger};
use crate::presenter::ProductCard;
use async_trait::async_trait;
use pricescout_core::TelegramConfig;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Slack on top of the long-poll timeout before the HTTP request gives up.
const HTTP_TIMEOUT_SLACK: Duration = Duration::from_secs(10);

const PARSE_MODE_HTML: &str = "HTML";

/// Bot API client bound to one bot token.
pub struct TelegramClient {
    client: Client,
    /// `{api_base_url}/bot{token}`
    endpoint: String,
    poll_timeout: Duration,
}

impl TelegramClient {
    /// Create a client for `token` with the given settings.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(token: &str, settings: &TelegramConfig) -> Result<Self> {
        let poll_timeout = Duration::from_secs(settings.poll_timeout_secs);
        let client = Client::builder()
            .timeout(poll_timeout + HTTP_TIMEOUT_SLACK)
            .build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/bot{token}",
                settings.api_base_url.trim_end_matches('/')
            ),
            poll_timeout,
        })
    }

    /// Long-poll for updates newer than `offset`.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>> {
        let request = GetUpdatesRequest {
            offset,
            timeout: self.poll_timeout.as_secs(),
            allowed_updates: &["message"],
        };
        self.call("getUpdates", &request).await
    }

    /// Send a text message, optionally HTML-formatted and with a link button.
    pub async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        parse_mode: Option<&str>,
        reply_markup: Option<InlineKeyboardMarkup>,
    ) -> Result<()> {
        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode,
            reply_markup,
        };
        self.call::<_, serde_json::Value>("sendMessage", &request)
            .await
            .map(drop)
    }

    /// Send a photo by URL with an HTML caption and a link button.
    pub async fn send_photo(
        &self,
        chat_id: ChatId,
        photo: &str,
        caption: &str,
        reply_markup: InlineKeyboardMarkup,
    ) -> Result<()> {
        let request = SendPhotoRequest {
            chat_id,
            photo,
            caption,
            parse_mode: PARSE_MODE_HTML,
            reply_markup,
        };
        self.call::<_, serde_json::Value>("sendPhoto", &request)
            .await
            .map(drop)
    }

    async fn call<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T> {
        debug!(method, "Bot API call");
        let response = self
            .client
            .post(format!("{}/{method}", self.endpoint))
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        decode_response(method, status, &text)
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()> {
        self.send_message(chat_id, text, None, None).await
    }

    async fn send_card(&self, chat_id: ChatId, card: &ProductCard) -> Result<()> {
        let markup = InlineKeyboardMarkup::url_button(&card.button_text, &card.button_url);

        match self
            .send_photo(chat_id, &card.photo, &card.caption, markup.clone())
            .await
        {
            Ok(()) => Ok(()),
            Err(e) => {
                // Usually the marketplace CDN refused Telegram's fetch of the image
                warn!(
                    chat_id,
                    photo = %card.photo,
                    error = %e,
                    "photo rejected, sending card as text"
                );
                self.send_message(chat_id, &card.caption, Some(PARSE_MODE_HTML), Some(markup))
                    .await
            }
        }
    }
}

/// Decode a Bot API envelope. Error replies carry JSON too, so the body is
/// checked before the status.
fn decode_response<T: DeserializeOwned>(method: &str, status: u16, body: &str) -> Result<T> {
    let envelope: ApiResponse<T> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) if (200..300).contains(&status) => {
            return Err(BotError::Decode {
                method: method.to_string(),
                message: e.to_string(),
            })
        }
        Err(_) => {
            return Err(BotError::Api {
                method: method.to_string(),
                status,
                description: body.chars().take(200).collect(),
            })
        }
    };

    match envelope {
        ApiResponse {
            ok: true,
            result: Some(result),
            ..
        } => Ok(result),
        ApiResponse { ok: true, .. } => Err(BotError::Decode {
            method: method.to_string(),
            message: "missing result".to_string(),
        }),
        ApiResponse {
            error_code,
            description,
            ..
        } => Err(BotError::Api {
            method: method.to_string(),
            status: error_code.unwrap_or(status),
            description: description.unwrap_or_default(),
        }),
    }
}

// Bot API types

/// Incoming update. Only messages are requested.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    /// Monotonic update id used for the polling offset
    pub update_id: i64,
    /// New incoming message
    #[serde(default)]
    pub message: Option<Message>,
}

/// Incoming message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    /// Message id within the chat
    pub message_id: i64,
    /// Chat the message came from
    pub chat: Chat,
    /// Text, absent for stickers, photos and the like
    #[serde(default)]
    pub text: Option<String>,
}

/// Chat a message belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    /// Chat identifier
    pub id: ChatId,
}

/// Inline keyboard attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardMarkup {
    /// Rows of buttons
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    /// Keyboard with a single button opening `url`.
    #[must_use]
    pub fn url_button(text: &str, url: &str) -> Self {
        Self {
            inline_keyboard: vec![vec![InlineKeyboardButton {
                text: text.to_string(),
                url: url.to_string(),
            }]],
        }
    }
}

/// Button opening a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    /// Button label
    pub text: String,
    /// URL opened on press
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<u16>,
}

#[derive(Debug, Serialize)]
struct GetUpdatesRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: ChatId,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
struct SendPhotoRequest<'a> {
    chat_id: ChatId,
    photo: &'a str,
    caption: &'a str,
    parse_mode: &'a str,
    reply_markup: InlineKeyboardMarkup,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_embeds_token() {
        let settings = TelegramConfig {
            api_base_url: "http://localhost:8081/".to_string(),
            ..TelegramConfig::default()
        };
        let client = TelegramClient::new("123:abc", &settings).expect("client");
        assert_eq!(client.endpoint, "http://localhost:8081/bot123:abc");
        assert_eq!(client.poll_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_decode_updates() {
        let body = json!({
            "ok": true,
            "result": [
                {
                    "update_id": 10,
                    "message": {
                        "message_id": 1,
                        "date": 1_700_000_000,
                        "chat": {"id": -42, "type": "private"},
                        "text": "наушники"
                    }
                },
                {
                    "update_id": 11,
                    "message": {
                        "message_id": 2,
                        "chat": {"id": -42, "type": "private"},
                        "sticker": {}
                    }
                },
                {"update_id": 12, "edited_message": {}}
            ]
        })
        .to_string();

        let updates: Vec<Update> = decode_response("getUpdates", 200, &body).expect("decode");

        assert_eq!(updates.len(), 3);
        let first = updates[0].message.as_ref().expect("message");
        assert_eq!(first.chat.id, -42);
        assert_eq!(first.text.as_deref(), Some("наушники"));
        assert!(updates[1].message.as_ref().expect("message").text.is_none());
        assert!(updates[2].message.is_none());
    }

    #[test]
    fn test_decode_api_error() {
        let body = json!({
            "ok": false,
            "error_code": 401,
            "description": "Unauthorized"
        })
        .to_string();

        let err = decode_response::<Vec<Update>>("getUpdates", 401, &body).expect_err("error");

        match err {
            BotError::Api {
                method,
                status,
                description,
            } => {
                assert_eq!(method, "getUpdates");
                assert_eq!(status, 401);
                assert_eq!(description, "Unauthorized");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decode_non_json_error() {
        let body = "<html>Bad Gateway</html>";
        let err = decode_response::<serde_json::Value>("sendMessage", 502, body)
            .expect_err("error");
        assert!(matches!(err, BotError::Api { status: 502, .. }));
    }

    #[test]
    fn test_decode_garbage_success() {
        let err = decode_response::<Vec<Update>>("getUpdates", 200, "not json").expect_err("error");
        assert!(matches!(err, BotError::Decode { .. }));
    }

    #[test]
    fn test_send_photo_request_shape() {
        let request = SendPhotoRequest {
            chat_id: 7,
            photo: "https://via.placeholder.com/300x200",
            caption: "<b>Кружка</b>",
            parse_mode: PARSE_MODE_HTML,
            reply_markup: InlineKeyboardMarkup::url_button(
                "Перейти к товару",
                "https://www.ozon.ru/product/1",
            ),
        };

        assert_eq!(
            serde_json::to_value(&request).expect("serialize"),
            json!({
                "chat_id": 7,
                "photo": "https://via.placeholder.com/300x200",
                "caption": "<b>Кружка</b>",
                "parse_mode": "HTML",
                "reply_markup": {
                    "inline_keyboard": [[
                        {"text": "Перейти к товару", "url": "https://www.ozon.ru/product/1"}
                    ]]
                }
            })
        );
    }

    #[test]
    fn test_plain_message_omits_optional_fields() {
        let request = SendMessageRequest {
            chat_id: 7,
            text: "Ничего не найдено",
            parse_mode: None,
            reply_markup: None,
        };
        assert_eq!(
            serde_json::to_value(&request).expect("serialize"),
            json!({"chat_id": 7, "text": "Ничего не найдено"})
        );
    }

    #[test]
    fn test_first_poll_has_no_offset() {
        let request = GetUpdatesRequest {
            offset: None,
            timeout: 30,
            allowed_updates: &["message"],
        };
        assert_eq!(
            serde_json::to_value(&request).expect("serialize"),
            json!({"timeout": 30, "allowed_updates": ["message"]})
        );
    }
}
