//! Support message domain type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use character_studio_core::{AccountRole, Email, MessageId};

/// One chat turn between a standard account and the administrator.
///
/// Append-only; there is no edit or delivery-receipt state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportMessage {
    /// Unique message ID.
    pub id: MessageId,
    /// Who sent the message.
    pub sender: Email,
    /// Who it is addressed to.
    pub recipient: Email,
    /// Role of the sender at send time.
    pub sender_role: AccountRole,
    /// Text body.
    pub body: String,
    /// When the message was sent.
    pub created_at: DateTime<Utc>,
}

impl SupportMessage {
    /// Whether this message belongs to the conversation of `account`.
    ///
    /// A conversation is everything the account sent plus everything
    /// addressed to it; the view is a filter over a time-ordered scan
    /// rather than a server-side two-sided query.
    #[must_use]
    pub fn involves(&self, account: &Email) -> bool {
        &self.sender == account || &self.recipient == account
    }
}

/// Filter a time-ordered scan down to one account's conversation.
#[must_use]
pub fn conversation_for(messages: &[SupportMessage], account: &Email) -> Vec<SupportMessage> {
    messages
        .iter()
        .filter(|m| m.involves(account))
        .cloned()
        .collect()
}

/// Unique standard-account senders, for the administrator's inbox list.
#[must_use]
pub fn unique_senders(messages: &[SupportMessage]) -> Vec<Email> {
    let mut seen = Vec::new();
    for message in messages {
        if message.sender_role == AccountRole::Standard && !seen.contains(&message.sender) {
            seen.push(message.sender.clone());
        }
    }
    seen
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn msg(sender: &str, recipient: &str, role: AccountRole, body: &str) -> SupportMessage {
        SupportMessage {
            id: MessageId::generate(),
            sender: Email::parse(sender).unwrap(),
            recipient: Email::parse(recipient).unwrap(),
            sender_role: role,
            body: body.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_conversation_includes_both_directions() {
        let alice = Email::parse("alice@example.com").unwrap();
        let messages = vec![
            msg(
                "alice@example.com",
                "admin@studio.test",
                AccountRole::Standard,
                "help",
            ),
            msg(
                "admin@studio.test",
                "alice@example.com",
                AccountRole::Administrator,
                "sure",
            ),
            msg(
                "bob@example.com",
                "admin@studio.test",
                AccountRole::Standard,
                "hi",
            ),
        ];

        let conversation = conversation_for(&messages, &alice);
        assert_eq!(conversation.len(), 2);
        assert!(conversation.iter().all(|m| m.involves(&alice)));
    }

    #[test]
    fn test_unique_senders_skips_admin_and_duplicates() {
        let messages = vec![
            msg(
                "alice@example.com",
                "admin@studio.test",
                AccountRole::Standard,
                "one",
            ),
            msg(
                "alice@example.com",
                "admin@studio.test",
                AccountRole::Standard,
                "two",
            ),
            msg(
                "admin@studio.test",
                "alice@example.com",
                AccountRole::Administrator,
                "reply",
            ),
            msg(
                "bob@example.com",
                "admin@studio.test",
                AccountRole::Standard,
                "hello",
            ),
        ];

        let senders = unique_senders(&messages);
        assert_eq!(senders.len(), 2);
        assert_eq!(senders[0].as_str(), "alice@example.com");
        assert_eq!(senders[1].as_str(), "bob@example.com");
    }
}
