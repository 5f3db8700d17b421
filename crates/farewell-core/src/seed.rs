//! Compiled-in content that is always shown and never persisted.

use crate::types::{Message, PhotoMemory};

pub const RECIPIENT_NAME: &str = "Poorva Bhide";

/// Local wall-clock time of the homecoming, without a zone.
pub const HOMECOMING: &str = "2026-08-14T00:00:00";

pub const SEED_PHOTO_PREFIX: &str = "seed_";

const SEED_MESSAGES: &[(i64, &str, &str)] = &[
    (
        1,
        "Friends",
        "We know you'll shine bright in your new adventure! Can't wait to hear all your stories.",
    ),
    (
        2,
        "Sister",
        "So proud of you for taking this big step! You've always been brave and brilliant.",
    ),
    (
        3,
        "Parents",
        "Our hearts go with you. Study hard but don't forget to enjoy the experience too!",
    ),
    (
        4,
        "Cousins",
        "You're going to absolutely crush it! We'll miss your laughter around here.",
    ),
];

const SEED_PHOTOS: &[(&str, &str)] = &[
    (
        "/images/DSC_0235.jpg",
        "Friends are just family you choose. You'll find your new family abroad too!",
    ),
    (
        "/images/DSC_0241.jpg",
        "Every achievement deserves a celebration, no matter how small!",
    ),
    (
        "/images/PSX_20250706_114447.jpg",
        "Don't forget to explore and enjoy the journey, not just the destination!",
    ),
    (
        "/images/WhatsApp Image 2025-08-09 at 23.37.16 (1).jpeg",
        "Your smile brightens everyone's day. Keep smiling!",
    ),
    (
        "/images/WhatsApp Image 2025-08-09 at 23.37.16.jpeg",
        "Never lose that infectious laugh of yours!",
    ),
    (
        "/images/WhatsApp Image 2025-08-09 at 23.37.17 (1).jpeg",
        "Here's to many more celebrations in your future!",
    ),
    (
        "/images/WhatsApp Image 2025-08-09 at 23.37.17.jpeg",
        "Cherish these moments and create new ones on your journey!",
    ),
    (
        "/images/WhatsApp Image 2025-08-09 at 23.37.18 (1).jpeg",
        "Always ready for new adventures and experiences!",
    ),
    (
        "/images/WhatsApp Image 2025-08-09 at 23.37.18.jpeg",
        "Your enthusiasm is contagious. Keep that spirit alive!",
    ),
    (
        "/images/WhatsApp Image 2025-08-09 at 23.38.18.jpeg",
        "You bring joy to every gathering. You'll do the same abroad!",
    ),
    (
        "/images/WhatsApp Image 2025-08-09 at 23.38.19 (1).jpeg",
        "That smile can light up any room. Share it with the world!",
    ),
    (
        "/images/WhatsApp Image 2025-08-09 at 23.38.19 (2).jpeg",
        "True friendships last despite oceans between them.",
    ),
    (
        "/images/WhatsApp Image 2025-08-09 at 23.38.19 (3).jpeg",
        "May your MS journey be as beautiful as this moment.",
    ),
    (
        "/images/WhatsApp Image 2025-08-09 at 23.38.19.jpeg",
        "Here's to many more milestones and celebrations in your future!",
    ),
];

pub fn seed_messages() -> Vec<Message> {
    SEED_MESSAGES
        .iter()
        .map(|(id, author, message)| Message {
            id: *id,
            author: (*author).to_string(),
            message: (*message).to_string(),
        })
        .collect()
}

/// Seed photos use page-relative paths, so they are exempt from host checks.
pub fn seed_photos() -> Vec<PhotoMemory> {
    SEED_PHOTOS
        .iter()
        .enumerate()
        .map(|(idx, (url, caption))| PhotoMemory {
            id: format!("{SEED_PHOTO_PREFIX}{}", idx + 1),
            url: (*url).to_string(),
            caption: (*caption).to_string(),
            timestamp: 0,
        })
        .collect()
}

pub fn is_seed_message_id(id: i64) -> bool {
    SEED_MESSAGES.iter().any(|(seed_id, _, _)| *seed_id == id)
}

pub fn is_seed_photo_id(id: &str) -> bool {
    id.strip_prefix(SEED_PHOTO_PREFIX)
        .and_then(|n| n.parse::<usize>().ok())
        .is_some_and(|n| (1..=SEED_PHOTOS.len()).contains(&n))
}
