// src/services/notifier.rs

//! Tender notifications.
//!
//! Messages are rendered as Telegram MarkdownV2; every piece of scraped text
//! is escaped before it is placed in the template.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode, Recipient as ChatRecipient};
use teloxide::utils::markdown;

use crate::error::Result;
use crate::models::{Recipient, Tender};

/// Delivers a tender notification to a single recipient.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, recipient: &Recipient, tender: &Tender, initial: bool) -> Result<()>;
}

/// Render the notification text for a tender.
pub fn render_message(tender: &Tender, initial: bool) -> String {
    let marker = if initial {
        format!("{} ", markdown::bold(&markdown::escape("(Initial Setup)")))
    } else {
        String::new()
    };

    format!(
        "📢 {marker}{}\n\n\
         📄 {} {}\n\
         🏢 {} {}\n\
         📅 {} {}\n\
         📍 {} {}\n\
         🔗 {} {}",
        markdown::bold(&markdown::escape("New Tender Found!")),
        markdown::bold("Title:"),
        markdown::escape(&tender.title),
        markdown::bold("Purchaser:"),
        markdown::escape(&tender.purchaser),
        markdown::bold("Closing Date:"),
        markdown::escape(&tender.closing_date),
        markdown::bold("Location:"),
        markdown::escape(&tender.location),
        markdown::bold("Details:"),
        markdown::link(&tender.detail_url, "View Tender"),
    )
}

impl From<&Recipient> for ChatRecipient {
    fn from(recipient: &Recipient) -> Self {
        match recipient {
            Recipient::Chat(id) => ChatRecipient::Id(ChatId(*id)),
            Recipient::Name(name) => match name.trim().parse::<i64>() {
                Ok(id) => ChatRecipient::Id(ChatId(id)),
                Err(_) => ChatRecipient::ChannelUsername(name.clone()),
            },
        }
    }
}

/// Sends notifications through the Telegram Bot API.
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            bot: Bot::new(token),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, recipient: &Recipient, tender: &Tender, initial: bool) -> Result<()> {
        self.bot
            .send_message(ChatRecipient::from(recipient), render_message(tender, initial))
            .parse_mode(ParseMode::MarkdownV2)
            .await?;

        log::info!(
            "Sent notification for '{}' to chat {}",
            tender.title,
            recipient
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TenderId;

    fn sample_tender() -> Tender {
        Tender {
            id: TenderId::Number(77),
            title: "Supply of Office Furniture (Lot 2)".to_string(),
            purchaser: "Ministry of Health".to_string(),
            closing_date: "Nov 3, 2026".to_string(),
            location: "Addis Ababa".to_string(),
            detail_url: "https://tender.example.com/tenders/77".to_string(),
        }
    }

    #[test]
    fn test_render_contains_fields() {
        let text = render_message(&sample_tender(), false);
        assert!(text.contains("*New Tender Found\\!*"));
        assert!(text.contains("Supply of Office Furniture \\(Lot 2\\)"));
        assert!(text.contains("Ministry of Health"));
        assert!(text.contains("Nov 3, 2026"));
        assert!(text.contains("Addis Ababa"));
        assert!(text.contains("[View Tender](https://tender.example.com/tenders/77)"));
        assert!(!text.contains("Initial Setup"));
    }

    #[test]
    fn test_render_initial_marker() {
        let text = render_message(&sample_tender(), true);
        assert!(text.contains("*\\(Initial Setup\\)* *New Tender Found\\!*"));
    }

    #[test]
    fn test_recipient_conversion() {
        assert_eq!(
            ChatRecipient::from(&Recipient::Chat(42)),
            ChatRecipient::Id(ChatId(42))
        );
        assert_eq!(
            ChatRecipient::from(&Recipient::Name("-100123".into())),
            ChatRecipient::Id(ChatId(-100123))
        );
        assert_eq!(
            ChatRecipient::from(&Recipient::Name("@tenders".into())),
            ChatRecipient::ChannelUsername("@tenders".into())
        );
    }
}
