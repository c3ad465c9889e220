//! Reservation hand-off.
//!
//! There is no payment flow: the shopper sends a prefilled WhatsApp message
//! listing the books, and the shop confirms by hand.

use tracing::debug;
use url::Url;

use harafish_core::{Book, BookId, CartEntry, Price, UNKNOWN_AUTHOR};

use crate::cart::{CartError, CartLedger};
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::storage::LocalStorage;

const SHOP_NAME: &str = "مكتبة الحرافيش للكتب المستعملة";
const RULE: &str = "━━━━━━━━━━━━━━━━━━";

/// Builds reservation messages and `wa.me` links.
#[derive(Debug, Clone)]
pub struct ReservationDesk {
    base_url: Url,
    whatsapp_number: String,
}

impl ReservationDesk {
    #[must_use]
    pub fn new(base_url: Url, whatsapp_number: impl Into<String>) -> Self {
        Self {
            base_url,
            whatsapp_number: whatsapp_number.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &StorefrontConfig) -> Self {
        Self::new(config.base_url.clone(), config.whatsapp_number.clone())
    }

    /// Public link to a book page.
    #[must_use]
    pub fn book_link(&self, id: &BookId) -> String {
        format!("{}/book/{id}", self.base_url.as_str().trim_end_matches('/'))
    }

    /// Message reserving every book in the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Empty`] for an empty cart.
    pub fn cart_message(
        &self,
        entries: &[CartEntry],
        total: Price,
    ) -> std::result::Result<String, CartError> {
        if entries.is_empty() {
            return Err(CartError::Empty);
        }

        let mut lines = vec![
            SHOP_NAME.to_string(),
            "شكرًا لاختيارك كتبك من عندنا!".to_string(),
            String::new(),
            "طلب حجز كتب:".to_string(),
            RULE.to_string(),
        ];
        for (n, entry) in entries.iter().enumerate() {
            let qty = if entry.quantity > 1 {
                format!(" × {}", entry.quantity)
            } else {
                String::new()
            };
            lines.push(format!("{}. {}", n + 1, entry.title));
            lines.push(format!(
                "   المؤلف: {}",
                entry.author.as_deref().unwrap_or(UNKNOWN_AUTHOR)
            ));
            lines.push(format!("   السعر: {} ج.م{qty}", entry.price));
            lines.push(format!("   الرابط: {}", self.book_link(&entry.book_id)));
        }
        lines.push(RULE.to_string());
        lines.push(format!("الإجمالي: *{} جنيه مصري*", total.display()));
        lines.push(String::new());
        lines.push("يرجى تأكيد الطلب لتجهيز الكتب فورًا".to_string());
        lines.push("نشكرك على ثقتك فينا - مكتبة الحرافيش".to_string());
        Ok(lines.join("\n"))
    }

    /// Message asking about a single book.
    #[must_use]
    pub fn book_message(&self, book: &Book) -> String {
        format!(
            "مرحبًا، أود حجز الكتاب التالي:\n\nالعنوان: {}\nالمؤلف: {}\nالسعر: {} ج.م\nالكود: {}\n\nشكرًا",
            book.title,
            book.display_author(),
            book.price,
            book.id,
        )
    }

    /// `https://wa.me/{number}?text=...`
    ///
    /// # Errors
    ///
    /// Returns an error if the configured number does not form a valid URL.
    pub fn whatsapp_url(&self, message: &str) -> std::result::Result<Url, url::ParseError> {
        let mut url = Url::parse("https://wa.me/")?.join(&self.whatsapp_number)?;
        url.query_pairs_mut().append_pair("text", message);
        debug!(length = message.len(), "Built WhatsApp link");
        Ok(url)
    }

    /// Link reserving everything in `cart`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Empty`] for an empty cart, or a link error if
    /// the configured number is unusable.
    pub fn cart_link<S: LocalStorage>(&self, cart: &CartLedger<S>) -> Result<Url> {
        let message = self.cart_message(cart.entries(), cart.total())?;
        Ok(self.whatsapp_url(&message)?)
    }

    /// Link asking about one book.
    ///
    /// # Errors
    ///
    /// Returns a link error if the configured number is unusable.
    pub fn book_inquiry_link(&self, book: &Book) -> Result<Url> {
        Ok(self.whatsapp_url(&self.book_message(book))?)
    }
}
