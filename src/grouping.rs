//! Groups consecutive chat messages for Discord-style display.
//!
//! The input must already be sorted ascending by time. Nothing here sorts or
//! deduplicates; out-of-order input only produces odd splits.

use std::collections::HashSet;
use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::message::ChatMessage;
use crate::time_format::{format_date_separator, is_same_calendar_day};

/// Maximum time gap (in seconds) before starting a new message group.
/// Messages from the same sender within 30 minutes are grouped together.
pub const GROUP_TIME_GAP_SECONDS: i64 = 1_800;

/// Consecutive messages from one sender on one calendar day.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageGroup<'a> {
    /// Stable key built from the first message's time and sender
    pub id: String,
    pub sender: &'a str,
    /// Time of the first message in the group
    pub timestamp: i64,
    pub messages: Vec<&'a ChatMessage>,
    pub show_date_separator: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_label: Option<String>,
}

/// Check if two timestamps are close enough to share a group.
/// Exactly 30 minutes apart still counts as within the window.
pub fn timestamps_within_window(previous: i64, current: i64) -> bool {
    current - previous <= GROUP_TIME_GAP_SECONDS
}

/// Partition ascending messages into display groups.
///
/// A new group starts on a sender change, a gap over 30 minutes, or a change
/// of calendar day in the timezone of `now`. The first group of each day
/// carries a date separator label.
pub fn group_messages<'a, Tz>(messages: &'a [ChatMessage], now: &DateTime<Tz>) -> Vec<MessageGroup<'a>>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let tz = now.timezone();
    let now_secs = now.timestamp();
    let mut groups: Vec<MessageGroup<'a>> = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut previous: Option<(&'a ChatMessage, i64)> = None;

    for msg in messages {
        // Untimed messages sit at the previous message's time
        let ts = msg
            .effective_timestamp(now_secs)
            .or(previous.map(|(_, ts)| ts))
            .unwrap_or(now_secs);

        let new_day = previous.map_or(true, |(_, prev_ts)| !is_same_calendar_day(prev_ts, ts, &tz));

        let should_group = previous.is_some_and(|(prev, prev_ts)| {
            if ts < prev_ts {
                log::debug!(
                    "Message {} is older than its predecessor {}; input is not ascending",
                    msg.id,
                    prev.id
                );
            }
            prev.sender == msg.sender && timestamps_within_window(prev_ts, ts) && !new_day
        });

        if should_group {
            if let Some(group) = groups.last_mut() {
                group.messages.push(msg);
            }
        } else {
            let date_label = new_day.then(|| format_date_separator(ts, now));
            groups.push(MessageGroup {
                id: unique_group_id(&mut seen_ids, ts, &msg.sender),
                sender: &msg.sender,
                timestamp: ts,
                messages: vec![msg],
                show_date_separator: new_day,
                date_label,
            });
        }

        previous = Some((msg, ts));
    }

    groups
}

/// Derive `"{timestamp}-{sender}"`, suffixing `#n` on repeats within one run.
///
/// Suffixed candidates are checked too, since a sender may itself end in `#n`.
fn unique_group_id(seen: &mut HashSet<String>, timestamp: i64, sender: &str) -> String {
    let base = format!("{}-{}", timestamp, sender);
    let mut id = base.clone();
    let mut n = 1;
    while !seen.insert(id.clone()) {
        n += 1;
        id = format!("{}#{}", base, n);
    }
    id
}
