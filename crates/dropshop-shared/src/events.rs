//! Cross-context sync events.
//!
//! A [`SyncEvent`] describes a mutation one context has already persisted so
//! every other open context can patch its in-memory view without re-reading
//! the store. Events carry the full new entity, except deletion which only
//! needs the id.

use serde::{Deserialize, Serialize};

use crate::models::{Product, ProductMessage, Report};
use crate::types::ProductId;

/// The tagged union broadcast on the bus, serialized as
/// `{ "type": "...", "payload": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncEvent {
    NewProduct(Product),
    UpdateProduct(Product),
    DeleteProduct(ProductId),
    NewProductMsg(ProductMessage),
    NewReport(Report),
}
