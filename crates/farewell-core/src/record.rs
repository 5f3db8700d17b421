use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::SyncError;
use crate::seed;
use crate::types::{CollectionKind, Message, PhotoMemory};
use crate::validate::{self, ShapeRules, Validated};

/// A record type stored in one collection of the shared document.
pub trait Record: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Id: PartialEq + Clone + fmt::Display + Serialize + Send + Sync;

    const KIND: CollectionKind;

    fn id(&self) -> &Self::Id;

    /// Ordering key for fetched records (ascending).
    fn sort_key(&self) -> i64;

    /// Shape check on untyped input.
    fn check(value: &Value, rules: &ShapeRules) -> Result<Self, SyncError>;

    /// Compiled-in records, in display order.
    fn seed() -> Vec<Self>;

    fn is_seed_id(id: &Self::Id) -> bool;

    fn is_seed(&self) -> bool {
        Self::is_seed_id(self.id())
    }
}

impl Record for Message {
    type Id = i64;

    const KIND: CollectionKind = CollectionKind::Messages;

    fn id(&self) -> &i64 {
        &self.id
    }

    fn sort_key(&self) -> i64 {
        self.id
    }

    fn check(value: &Value, _rules: &ShapeRules) -> Result<Self, SyncError> {
        validate::check_message(value)
    }

    fn seed() -> Vec<Self> {
        seed::seed_messages()
    }

    fn is_seed_id(id: &i64) -> bool {
        seed::is_seed_message_id(*id)
    }
}

impl Record for PhotoMemory {
    type Id = String;

    const KIND: CollectionKind = CollectionKind::Photos;

    fn id(&self) -> &String {
        &self.id
    }

    fn sort_key(&self) -> i64 {
        self.timestamp
    }

    fn check(value: &Value, rules: &ShapeRules) -> Result<Self, SyncError> {
        validate::check_photo(value, rules)
    }

    fn seed() -> Vec<Self> {
        seed::seed_photos()
    }

    fn is_seed_id(id: &String) -> bool {
        seed::is_seed_photo_id(id)
    }
}

/// Run the shape check over a fetched array.
///
/// Records that fail the check, reuse a seed identifier, or repeat an id
/// already seen earlier in the array are dropped. The first copy wins.
pub fn validate_all<T: Record>(values: &[Value], rules: &ShapeRules) -> Validated<T> {
    let mut valid: Vec<T> = Vec::with_capacity(values.len());
    let mut rejected = 0usize;
    for value in values {
        match T::check(value, rules) {
            Ok(record)
                if !record.is_seed() && !valid.iter().any(|seen| seen.id() == record.id()) =>
            {
                valid.push(record)
            }
            _ => rejected += 1,
        }
    }
    Validated { valid, rejected }
}

/// Stable ascending sort by the record's ordering key.
pub fn sort_records<T: Record>(records: &mut [T]) {
    records.sort_by_key(|record| record.sort_key());
}

/// `seed ++ user`, skipping user records that collide with a seed id.
pub fn with_seed<T: Record>(user: Vec<T>) -> Vec<T> {
    let mut merged = T::seed();
    merged.extend(user.into_iter().filter(|record| !record.is_seed()));
    merged
}

/// User records of a displayed collection, in display order.
pub fn user_records<T: Record>(view: &[T]) -> Vec<T> {
    view.iter().filter(|record| !record.is_seed()).cloned().collect()
}
