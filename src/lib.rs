//! memochat-view library.
//!
//! Turns an ascending list of memo chat messages into grouped, time-labelled
//! view models and budgets composer input against the memo byte limit.

pub mod config;
pub mod error;
pub mod grouping;
pub mod logging;
pub mod memo;
pub mod message;
pub mod time_format;
pub mod validation;

#[cfg(test)]
mod integration_tests;

pub use error::{MemoError, ViewError};
pub use grouping::{group_messages, MessageGroup, GROUP_TIME_GAP_SECONDS};
pub use memo::{calculate_max_message_length, MemoEnvelope};
pub use message::{ChatMessage, DeliveryStatus, Direction, MessageHistory, LOCAL_SENDER};
