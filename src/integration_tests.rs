//! Integration tests for memochat-view
//!
//! These tests run full workflows across modules: memos are parsed into
//! messages, merged into a history, grouped and labelled.

use chrono::{DateTime, TimeZone, Utc};

use crate::grouping::group_messages;
use crate::memo::{calculate_max_message_length, MemoEnvelope};
use crate::message::{ChatMessage, DeliveryStatus, MessageHistory};
use crate::time_format::{
    format_detailed_timestamp, format_message_time, format_relative_time_from_confirmations,
    format_relative_time_from_timestamp,
};

// 2024-03-15 12:00:00 UTC
const NOW: i64 = 1_710_504_000;
const MIDNIGHT: i64 = NOW - 12 * 3_600;

fn utc_now() -> DateTime<Utc> {
    Utc.timestamp_opt(NOW, 0).unwrap()
}

/// The bob/carol scenario: a sender change splits despite a 50 second gap
#[test]
fn test_sender_change_scenario() {
    let messages = vec![
        ChatMessage::received("1", "bob@", "hi").with_timestamp(MIDNIGHT + 1_000),
        ChatMessage::received("2", "bob@", "still me").with_timestamp(MIDNIGHT + 1_500),
        ChatMessage::received("3", "carol@", "hello bob").with_timestamp(MIDNIGHT + 1_550),
    ];
    let groups = group_messages(&messages, &utc_now());

    let shape: Vec<(&str, Vec<i64>)> = groups
        .iter()
        .map(|g| {
            (
                g.sender,
                g.messages.iter().filter_map(|m| m.timestamp).collect(),
            )
        })
        .collect();
    assert_eq!(
        shape,
        vec![
            ("bob@", vec![MIDNIGHT + 1_000, MIDNIGHT + 1_500]),
            ("carol@", vec![MIDNIGHT + 1_550]),
        ]
    );
}

/// Received memos and local messages flow through history into groups
#[test]
fn test_memos_to_grouped_view() {
    let now = utc_now();
    let received: Vec<ChatMessage> = [
        ("tx1", "morning//f//alice@//t//1710489600//sig1", 0.0),
        ("tx2", "coffee?//f//alice@//t//1710489900//sig2", 0.0),
        ("tx3", "//f//alice@//t//1710490000//sig3", 2.5),
        ("tx4", "//f//alice@", 0.0),
    ]
    .into_iter()
    .filter_map(|(id, memo, amount)| {
        MemoEnvelope::parse(memo)
            .ok()?
            .into_chat_message(id, amount, Some(30))
            .ok()
    })
    .collect();
    assert_eq!(received.len(), 3);

    let mut history = MessageHistory::new();
    history.merge(received, NOW);
    history.merge(
        vec![ChatMessage::sent("local-1", "sure").with_timestamp(1_710_490_100)],
        NOW,
    );
    history.set_status("local-1", DeliveryStatus::Delivered);

    let groups = group_messages(history.messages(), &now);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].sender, "alice@");
    assert_eq!(groups[0].messages.len(), 3);
    assert_eq!(groups[0].date_label.as_deref(), Some("Today"));
    assert!(groups[1].messages[0].is_local());
    assert_eq!(groups[1].messages[0].status, Some(DeliveryStatus::Delivered));

    // 1710489600 is 08:00 UTC
    assert_eq!(format_message_time(groups[0].timestamp, &now), "08:00");
    assert_eq!(
        format_detailed_timestamp(groups[0].timestamp, &Utc),
        "Friday, March 15, 2024 at 08:00:00"
    );
}

/// Refetching the same history yields identical group ids
#[test]
fn test_group_ids_survive_refetch() {
    let now = utc_now();
    let batch = || {
        vec![
            ChatMessage::received("a", "bob@", "x").with_timestamp(MIDNIGHT + 100),
            ChatMessage::received("b", "carol@", "y").with_timestamp(MIDNIGHT + 200),
        ]
    };
    let mut history = MessageHistory::new();
    history.merge(batch(), NOW);
    let before: Vec<String> = group_messages(history.messages(), &now)
        .into_iter()
        .map(|g| g.id)
        .collect();

    history.merge(batch(), NOW);
    let after: Vec<String> = group_messages(history.messages(), &now)
        .into_iter()
        .map(|g| g.id)
        .collect();
    assert_eq!(before, after);
}

/// A multi-day conversation never lets a group cross midnight
#[test]
fn test_multi_day_history() {
    let now = utc_now();
    let mut messages = Vec::new();
    // bob posts every 10 minutes from 23:00 the day before yesterday to 01:00 today
    let start = MIDNIGHT - 86_400 - 3_600;
    for i in 0..=(26 * 6) {
        messages.push(
            ChatMessage::received(format!("m{}", i), "bob@", "tick").with_timestamp(start + i * 600),
        );
    }
    let groups = group_messages(&messages, &now);

    assert_eq!(groups.len(), 3);
    let labels: Vec<Option<&str>> = groups.iter().map(|g| g.date_label.as_deref()).collect();
    assert_eq!(labels, vec![Some("March 13, 2024"), Some("Yesterday"), Some("Today")]);
    for group in &groups {
        let first = group.messages.first().and_then(|m| m.timestamp).unwrap();
        let last = group.messages.last().and_then(|m| m.timestamp).unwrap();
        assert!(crate::time_format::is_same_calendar_day(first, last, &Utc));
    }
}

/// The two relative-time formatters keep their own rounding rules
#[test]
fn test_relative_time_formatters_differ() {
    let now = utc_now();
    // 100 minutes: confirmations floor to 1h, timestamps round to 2h
    assert_eq!(format_relative_time_from_confirmations(Some(100)), "1h ago");
    assert_eq!(format_relative_time_from_timestamp(Some(NOW - 6_000), &now), "2h ago");
    // Confirmations never switch to an absolute date
    assert_eq!(format_relative_time_from_confirmations(Some(10 * 1_440)), "10d ago");
    assert_eq!(
        format_relative_time_from_timestamp(Some(NOW - 10 * 86_400), &now),
        "03/05"
    );
}

#[test]
fn test_composer_budget() {
    assert_eq!(calculate_max_message_length(Some("alice@")), 512 - 12 - 10 - 100 - 5 - 6);
    assert_eq!(calculate_max_message_length(Some("")), 350);
}
