//! Incoming message handling.

use crate::error::Result;
use crate::messenger::{ChatId, Messenger};
use crate::presenter::ProductCard;
use pricescout_core::{SearchQuery, MIN_QUERY_CHARS};
use pricescout_scanner::{ProductSearch, ScanError, SearchOutcome};
use tracing::{debug, error, info, warn};

/// Reply to `/start`.
pub const GREETING: &str =
    "Привет! Отправь название товара, и я найду цены на Wildberries, Ozon и Яндекс.Маркете.";

/// Reply when every source came back empty.
pub const NOTHING_FOUND: &str = "Ничего не найдено по твоему запросу.";

/// Reply when no search could be run at all.
pub const SEARCH_UNAVAILABLE: &str = "Поиск сейчас недоступен, попробуй позже.";

/// Routes chat messages to the search and sends the replies.
pub struct BotHandler<S, M> {
    search: S,
    messenger: M,
    min_query_chars: usize,
    placeholder_image: String,
}

impl<S: ProductSearch, M: Messenger> BotHandler<S, M> {
    /// Create a handler replying through `messenger`.
    pub fn new(search: S, messenger: M, placeholder_image: impl Into<String>) -> Self {
        Self {
            search,
            messenger,
            min_query_chars: MIN_QUERY_CHARS,
            placeholder_image: placeholder_image.into(),
        }
    }

    /// Set the minimum query length used for the prompt.
    #[must_use]
    pub fn with_min_query_chars(mut self, min_query_chars: usize) -> Self {
        self.min_query_chars = min_query_chars;
        self
    }

    /// The messenger replies go through.
    pub fn messenger(&self) -> &M {
        &self.messenger
    }

    /// Handle one text message from `chat_id`.
    pub async fn handle_text(&self, chat_id: ChatId, text: &str) -> Result<()> {
        let text = text.trim();

        if let Some(command) = parse_command(text) {
            return self.handle_command(chat_id, command).await;
        }

        let Ok(query) = SearchQuery::parse(text, self.min_query_chars) else {
            debug!(chat_id, "query too short");
            return self.send_too_short(chat_id).await;
        };

        info!(chat_id, query = %query, "search requested");
        self.messenger
            .send_text(
                chat_id,
                &format!("Ищу «{query}» на маркетплейсах, это займет до минуты..."),
            )
            .await?;

        match self.search.search(query.as_str()).await {
            Ok(SearchOutcome::Found(listings)) => {
                for listing in &listings {
                    let card = ProductCard::from_listing(listing, &self.placeholder_image);
                    if let Err(e) = self.messenger.send_card(chat_id, &card).await {
                        warn!(chat_id, url = %card.button_url, error = %e, "failed to send card");
                    }
                }
                Ok(())
            }
            Ok(SearchOutcome::NothingFound) => {
                self.messenger.send_text(chat_id, NOTHING_FOUND).await
            }
            Err(ScanError::InvalidQuery { .. }) => self.send_too_short(chat_id).await,
            Err(e) => {
                error!(chat_id, error = %e, "search failed");
                self.messenger.send_text(chat_id, SEARCH_UNAVAILABLE).await
            }
        }
    }

    async fn handle_command(&self, chat_id: ChatId, command: &str) -> Result<()> {
        match command {
            "/start" => self.messenger.send_text(chat_id, GREETING).await,
            other => {
                debug!(chat_id, command = other, "ignoring unknown command");
                Ok(())
            }
        }
    }

    async fn send_too_short(&self, chat_id: ChatId) -> Result<()> {
        let prompt = format!(
            "Пожалуйста, введи минимум {} {} для поиска.",
            self.min_query_chars,
            chars_word(self.min_query_chars)
        );
        self.messenger.send_text(chat_id, &prompt).await
    }
}

/// The command name of a `/command@botname args` message.
fn parse_command(text: &str) -> Option<&str> {
    if !text.starts_with('/') {
        return None;
    }
    let word = text.split_whitespace().next().unwrap_or(text);
    Some(word.split('@').next().unwrap_or(word))
}

/// "символ" declined for `n`.
fn chars_word(n: usize) -> &'static str {
    match (n % 10, n % 100) {
        (_, 11..=14) => "символов",
        (1, _) => "символ",
        (2..=4, _) => "символа",
        _ => "символов",
    }
}
