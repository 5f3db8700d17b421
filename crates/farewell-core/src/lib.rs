//! Data model, seed content and shape rules for the farewell wall.
//!
//! Nothing in this crate performs I/O. The storage tiers live in
//! `farewell-store`; this crate only decides what a well-formed record is.

pub mod countdown;
pub mod error;
pub mod ids;
pub mod record;
pub mod seed;
pub mod types;
pub mod validate;

pub use error::SyncError;
pub use record::Record;
pub use types::{CollectionKind, Message, OutputFormat, PhotoMemory};
pub use validate::ShapeRules;
