//! Notification recipients.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// A chat that receives tender notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recipient {
    /// Numeric chat id
    Chat(i64),
    /// Channel username (`@name`) or a chat id written as a string
    Name(String),
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chat(id) => write!(f, "{id}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Ordered, non-empty list of recipients read from a JSON array file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientList {
    recipients: Vec<Recipient>,
}

impl RecipientList {
    /// Build a list, rejecting an empty one.
    pub fn new(recipients: Vec<Recipient>) -> Result<Self> {
        if recipients.is_empty() {
            return Err(AppError::config("recipient list is empty"));
        }
        Ok(Self { recipients })
    }

    /// Load recipients from a JSON array file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("could not read {}: {e}", path.display()))
        })?;
        Self::parse(&content)
            .map_err(|e| AppError::config(format!("{}: {e}", path.display())))
    }

    /// Parse recipients from JSON text.
    pub fn parse(json: &str) -> Result<Self> {
        let recipients: Vec<Recipient> = serde_json::from_str(json)
            .map_err(|e| AppError::config(format!("expected a JSON array of chat ids: {e}")))?;
        Self::new(recipients)
    }

    pub fn len(&self) -> usize {
        self.recipients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipient> {
        self.recipients.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_mixed_ids() {
        let list = RecipientList::parse(r#"[123456, "-100987", "@tenders"]"#).unwrap();
        let got: Vec<_> = list.iter().cloned().collect();
        assert_eq!(
            got,
            vec![
                Recipient::Chat(123456),
                Recipient::Name("-100987".into()),
                Recipient::Name("@tenders".into()),
            ]
        );
    }

    #[test]
    fn test_empty_list_rejected() {
        assert!(matches!(
            RecipientList::parse("[]"),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_not_a_list_rejected() {
        assert!(RecipientList::parse(r#"{"chat": 1}"#).is_err());
        assert!(RecipientList::parse("not json").is_err());
    }

    #[test]
    fn test_missing_file_rejected() {
        let tmp = TempDir::new().unwrap();
        let result = RecipientList::load(tmp.path().join("chat_ids.json"));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("chat_ids.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        assert_eq!(RecipientList::load(&path).unwrap().len(), 2);
    }
}
