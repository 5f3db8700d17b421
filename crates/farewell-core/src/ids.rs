//! Client-side identifier assignment.
//!
//! Identifiers are Unix-millisecond timestamps, bumped past the largest one
//! already known so two records created in the same millisecond still differ.

use crate::types::{Message, PhotoMemory};

pub const PHOTO_ID_PREFIX: &str = "photo_";

pub fn next_message_id(now_ms: i64, existing: &[Message]) -> i64 {
    let floor = existing.iter().map(|msg| msg.id).max();
    bump(now_ms, floor)
}

pub fn next_photo_id(now_ms: i64, existing: &[PhotoMemory]) -> String {
    let floor = existing.iter().filter_map(|photo| photo_token(&photo.id)).max();
    format!("{PHOTO_ID_PREFIX}{}", bump(now_ms, floor))
}

/// Numeric token of a `photo_<n>` identifier.
pub fn photo_token(id: &str) -> Option<i64> {
    id.strip_prefix(PHOTO_ID_PREFIX)?.parse().ok()
}

fn bump(now_ms: i64, floor: Option<i64>) -> i64 {
    match floor {
        Some(max) if max >= now_ms => max.saturating_add(1),
        _ => now_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn msg(id: i64) -> Message {
        Message {
            id,
            author: "a".into(),
            message: "m".into(),
        }
    }

    #[test]
    fn test_next_message_id_uses_clock_when_ahead() {
        assert_eq!(next_message_id(1_000, &[msg(10), msg(20)]), 1_000);
    }

    #[test]
    fn test_next_message_id_bumps_past_existing() {
        assert_eq!(next_message_id(1_000, &[msg(1_000)]), 1_001);
        assert_eq!(next_message_id(1_000, &[msg(5_000)]), 5_001);
    }

    #[test]
    fn test_next_photo_id_ignores_foreign_ids() {
        let photos = vec![PhotoMemory {
            id: "seed_3".into(),
            url: String::new(),
            caption: String::new(),
            timestamp: 0,
        }];
        assert_eq!(next_photo_id(42, &photos), "photo_42");
    }

    #[test]
    fn test_next_photo_id_bumps() {
        let photos = vec![PhotoMemory {
            id: "photo_42".into(),
            url: String::new(),
            caption: String::new(),
            timestamp: 42,
        }];
        assert_eq!(next_photo_id(42, &photos), "photo_43");
    }

    #[test]
    fn test_photo_token() {
        assert_eq!(photo_token("photo_123"), Some(123));
        assert_eq!(photo_token("photo_"), None);
        assert_eq!(photo_token("seed_1"), None);
    }

    proptest! {
        #[test]
        fn prop_next_message_id_is_fresh(now in 0i64..1_000_000, ids in proptest::collection::vec(0i64..2_000_000, 0..20)) {
            let existing: Vec<Message> = ids.iter().copied().map(msg).collect();
            let next = next_message_id(now, &existing);
            prop_assert!(next >= now);
            prop_assert!(existing.iter().all(|m| m.id < next));
        }
    }
}
