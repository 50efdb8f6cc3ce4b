//! # dropshop-store
//!
//! Durable, synchronous key-value storage for the DropShop marketplace,
//! backed by SQLite.
//!
//! Entity collections live as whole JSON documents under fixed slot keys
//! (the layout the original localStorage-backed client used), so every save
//! is a full-collection overwrite and callers read-modify-write. There is no
//! concurrency control: two contexts racing on the same slot is last-write-
//! wins, which is the accepted consistency model of the system.
//!
//! The crate exposes a synchronous [`Store`] handle wrapping a
//! `rusqlite::Connection` with typed accessors for every slot.

pub mod database;
pub mod migrations;
pub mod product_log;
pub mod slots;

mod error;

pub use database::Store;
pub use error::StoreError;
pub use slots::CartMap;
