//! Memo wire format: length budgeting and envelope parsing.
//!
//! A chat memo looks like `{text}//f//{sender}//t//{timestamp}//{signature}`.
//! Older received memos only carry `{text}//f//{sender}`. The byte budget of
//! the memo field is fixed by the chain, so every constant here mirrors that
//! external format.

use crate::error::MemoError;
use crate::message::{ChatMessage, Direction};
use crate::validation::validate_identity_name;

/// Total bytes available in a transaction memo.
pub const MEMO_BYTE_BUDGET: usize = 512;
/// Bytes used by the `//f//`, `//t//` and `//` separators plus slack.
pub const SEPARATOR_OVERHEAD: usize = 12;
/// Width of a Unix timestamp in seconds.
pub const TIMESTAMP_WIDTH: usize = 10;
/// Signature width including a safety buffer.
pub const SIGNATURE_WIDTH: usize = 100;
pub const SAFETY_MARGIN: usize = 5;
/// Budget used when the sender identity is unknown.
pub const FALLBACK_MAX_MESSAGE_LENGTH: usize = 350;

const SENDER_MARKER: &str = "//f//";
const TIMESTAMP_MARKER: &str = "//t//";
const SIGNATURE_SEPARATOR: &str = "//";

/// Maximum plaintext length the composer should accept for this sender.
///
/// An empty or missing identity returns [`FALLBACK_MAX_MESSAGE_LENGTH`].
pub fn calculate_max_message_length(sender_identity_name: Option<&str>) -> usize {
    let name = match sender_identity_name {
        Some(name) if !name.is_empty() => name,
        _ => {
            log::warn!(
                "No sender identity for memo budget, using fallback of {} characters",
                FALLBACK_MAX_MESSAGE_LENGTH
            );
            return FALLBACK_MAX_MESSAGE_LENGTH;
        }
    };

    MEMO_BYTE_BUDGET
        .saturating_sub(SEPARATOR_OVERHEAD)
        .saturating_sub(TIMESTAMP_WIDTH)
        .saturating_sub(SIGNATURE_WIDTH)
        .saturating_sub(SAFETY_MARGIN)
        .saturating_sub(name.len())
}

/// Decoded fields of a chat memo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoEnvelope {
    pub text: String,
    pub sender: String,
    pub timestamp: Option<i64>,
    pub signature: Option<String>,
}

impl MemoEnvelope {
    pub fn new(text: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: sender.into(),
            timestamp: None,
            signature: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Attach a signature together with the timestamp it covers.
    ///
    /// The wire format only carries a signature after `//t//{timestamp}`, so
    /// the two are always set as a pair.
    pub fn signed(mut self, timestamp: i64, signature: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp);
        self.signature = Some(signature.into());
        self
    }

    /// Parse a memo string.
    ///
    /// The text ends at the first `//f//`. Text and sender are trimmed.
    pub fn parse(memo: &str) -> Result<Self, MemoError> {
        let marker_pos = memo.find(SENDER_MARKER).ok_or(MemoError::MissingSender)?;
        let text = memo[..marker_pos].trim();
        let rest = &memo[marker_pos + SENDER_MARKER.len()..];

        let (sender, tail) = match rest.find(TIMESTAMP_MARKER) {
            Some(pos) => (&rest[..pos], Some(&rest[pos + TIMESTAMP_MARKER.len()..])),
            None => (rest, None),
        };
        let sender = sender.trim();
        validate_identity_name(sender).map_err(MemoError::InvalidSender)?;

        let (timestamp, signature) = match tail {
            Some(tail) => {
                let (ts, sig) = match tail.split_once(SIGNATURE_SEPARATOR) {
                    Some((ts, sig)) => (ts.trim(), Some(sig.trim())),
                    None => (tail.trim(), None),
                };
                let ts = ts
                    .parse::<i64>()
                    .map_err(|_| MemoError::InvalidTimestamp(ts.to_string()))?;
                let sig = sig.filter(|s| !s.is_empty()).map(str::to_string);
                (Some(ts), sig)
            }
            None => (None, None),
        };

        Ok(Self {
            text: text.to_string(),
            sender: sender.to_string(),
            timestamp,
            signature,
        })
    }

    /// Render the wire form of this memo.
    ///
    /// A signature without a timestamp has no slot in the format and is
    /// omitted; use [`MemoEnvelope::signed`] to set both.
    pub fn to_memo_string(&self) -> String {
        if self.timestamp.is_none() && self.signature.is_some() {
            log::warn!("Memo from {} has a signature but no timestamp; signature omitted", self.sender);
        }
        let mut memo = format!("{}{}{}", self.text, SENDER_MARKER, self.sender);
        if let Some(ts) = self.timestamp {
            memo.push_str(TIMESTAMP_MARKER);
            memo.push_str(&ts.to_string());
            if let Some(sig) = &self.signature {
                memo.push_str(SIGNATURE_SEPARATOR);
                memo.push_str(sig);
            }
        }
        memo
    }

    /// Whether the encoded memo fits the chain's memo field.
    pub fn fits_budget(&self) -> bool {
        self.to_memo_string().len() <= MEMO_BYTE_BUDGET
    }

    /// Build a received chat message from this memo.
    ///
    /// A memo without text is only a message when it carries an amount.
    pub fn into_chat_message(
        self,
        id: impl Into<String>,
        amount: f64,
        confirmations: Option<i64>,
    ) -> Result<ChatMessage, MemoError> {
        let id = id.into();
        if self.text.is_empty() && amount <= 0.0 {
            log::trace!("Skipping memo in tx {}: no text and no amount", id);
            return Err(MemoError::Empty);
        }
        Ok(ChatMessage {
            id,
            sender: self.sender,
            text: self.text,
            timestamp: self.timestamp.filter(|&ts| ts != 0),
            amount,
            confirmations,
            direction: Direction::Received,
            status: None,
        })
    }
}
