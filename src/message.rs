//! Chat message records and the ordered history the grouper reads from.

use serde::{Deserialize, Deserializer, Serialize};

/// Sender value used for messages written by the local user.
pub const LOCAL_SENDER: &str = "self";

/// Maximum messages to keep in a history before trimming
pub const MAX_HISTORY_MESSAGES: usize = 2000;
/// Number of oldest messages to remove when trimming
pub const HISTORY_TRIM_COUNT: usize = 500;

/// Seconds represented by one block confirmation.
pub const SECONDS_PER_CONFIRMATION: i64 = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Received,
    Sent,
}

/// Delivery state of an outgoing message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Delivered,
    Failed,
}

/// A single chat event, either pulled from a memo or composed locally.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Transaction id for received messages, generated id for sent ones
    pub id: String,
    pub sender: String,
    pub text: String,
    /// Unix seconds (UTC). Older payloads use `0` as a placeholder.
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub confirmations: Option<i64>,
    pub direction: Direction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DeliveryStatus>,
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.filter(|&ts| ts != 0))
}

impl ChatMessage {
    pub fn received(id: impl Into<String>, sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sender: sender.into(),
            text: text.into(),
            timestamp: None,
            amount: 0.0,
            confirmations: None,
            direction: Direction::Received,
            status: None,
        }
    }

    pub fn sent(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sender: LOCAL_SENDER.to_string(),
            text: text.into(),
            timestamp: None,
            amount: 0.0,
            confirmations: None,
            direction: Direction::Sent,
            status: Some(DeliveryStatus::Sent),
        }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_confirmations(mut self, confirmations: i64) -> Self {
        self.confirmations = Some(confirmations);
        self
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = amount;
        self
    }

    /// True when the message was written by the local user.
    pub fn is_local(&self) -> bool {
        self.sender == LOCAL_SENDER
    }

    /// Best available time for this message.
    ///
    /// Falls back to `now - confirmations` minutes when no timestamp is known.
    /// Negative confirmation counts carry no time information.
    pub fn effective_timestamp(&self, now_secs: i64) -> Option<i64> {
        if let Some(ts) = self.timestamp {
            return Some(ts);
        }
        self.confirmations
            .filter(|&c| c >= 0)
            .map(|c| now_secs.saturating_sub(c.saturating_mul(SECONDS_PER_CONFIRMATION)))
    }
}

/// Ascending, deduplicated message list for one conversation.
#[derive(Default, Clone, Debug)]
pub struct MessageHistory {
    messages: Vec<ChatMessage>,
}

impl MessageHistory {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Messages in ascending time order, ready for grouping.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Merge a batch of messages and restore ascending order.
    ///
    /// Known ids only refresh their confirmation count and delivery status.
    /// Returns the number of newly added messages.
    pub fn merge<I>(&mut self, incoming: I, now_secs: i64) -> usize
    where
        I: IntoIterator<Item = ChatMessage>,
    {
        let mut added = 0;
        for msg in incoming {
            if let Some(existing) = self.messages.iter_mut().find(|m| m.id == msg.id) {
                if msg.confirmations.is_some() {
                    existing.confirmations = msg.confirmations;
                }
                if msg.status.is_some() {
                    existing.status = msg.status;
                }
                if existing.timestamp.is_none() {
                    existing.timestamp = msg.timestamp;
                }
                continue;
            }
            self.messages.push(msg);
            added += 1;
        }

        // Stable sort keeps arrival order for equal or unknown times
        self.messages
            .sort_by_key(|m| m.effective_timestamp(now_secs).unwrap_or(i64::MAX));

        // A bulk merge can overshoot by more than one trim step
        while self.messages.len() > MAX_HISTORY_MESSAGES {
            self.messages.drain(0..HISTORY_TRIM_COUNT);
        }

        if added > 0 {
            log::debug!("Merged {} new messages ({} total)", added, self.messages.len());
        }
        added
    }

    /// Update the delivery status of a locally sent message.
    pub fn set_status(&mut self, id: &str, status: DeliveryStatus) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(msg) => {
                msg.status = Some(status);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
