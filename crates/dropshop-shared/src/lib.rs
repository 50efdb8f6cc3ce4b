//! # dropshop-shared
//!
//! Domain model shared by every DropShop crate: typed entity ids, the
//! persisted entity structs, the [`SyncEvent`] union broadcast between
//! contexts, and the slot-key constants of the persistent store.
//!
//! Everything here derives `Serialize`/`Deserialize` with camelCase field
//! names so the JSON written to the store (and carried on the bus) keeps the
//! shapes the web client established.

pub mod constants;
pub mod events;
pub mod models;
pub mod types;

pub use events::SyncEvent;
pub use models::*;
pub use types::{ChatId, MessageId, ProductId, ReportId, UserId};
