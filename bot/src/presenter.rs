//! Turns product listings into chat cards.

use pricescout_core::ProductListing;

/// Label of the button that opens the product page.
pub const BUTTON_TEXT: &str = "Перейти к товару";

/// Telegram rejects captions longer than this many characters.
const MAX_CAPTION_CHARS: usize = 1024;

/// One listing, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    /// Photo URL, the listing image or the placeholder
    pub photo: String,
    /// HTML caption
    pub caption: String,
    /// Text of the inline button
    pub button_text: String,
    /// Product page the button opens
    pub button_url: String,
}

impl ProductCard {
    /// Build the card for `listing`, using `placeholder_image` when it has no image.
    #[must_use]
    pub fn from_listing(listing: &ProductListing, placeholder_image: &str) -> Self {
        let photo = if listing.image().is_empty() {
            placeholder_image.to_string()
        } else {
            listing.image().to_string()
        };

        let details = format!(
            "\nМаркетплейс: {}\nЦена: {}",
            listing.marketplace().display_name(),
            format_price(listing.price())
        );
        // Leave room for the bold tags and the details lines
        let title_budget = MAX_CAPTION_CHARS.saturating_sub(details.chars().count() + 7);
        let title = truncate_chars(listing.title(), title_budget);

        Self {
            photo,
            caption: format!("<b>{}</b>{details}", html_escape::encode_text(&title)),
            button_text: BUTTON_TEXT.to_string(),
            button_url: listing.url().to_string(),
        }
    }
}

/// Format a rouble price: `1234.5` becomes `1 234,50 ₽`, `12990.0` becomes `12 990 ₽`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_price(price: f64) -> String {
    let kopecks = (price.max(0.0) * 100.0).round() as u64;
    let rubles = group_thousands(kopecks / 100);
    match kopecks % 100 {
        0 => format!("{rubles} ₽"),
        fraction => format!("{rubles},{fraction:02} ₽"),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }
    grouped
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}
