//! Domain entity structs persisted in the local slot store.
//!
//! Field names are renamed to camelCase on the wire so the serialized JSON
//! matches the shapes the original web client wrote to localStorage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ChatId, MessageId, ProductId, ReportId, UserId};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// Account role. Sellers can list products; everyone can buy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Buyer,
    Seller,
}

/// A registered account.
///
/// Invariant (enforced by the registration flow, not the type): `username`
/// and `email` are unique across the whole user collection. Blocked users
/// cannot establish a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub pix_key: Option<String>,
    #[serde(default)]
    pub blocked: bool,
    /// Presence flag; only meaningful on the session copy of the record.
    #[serde(default)]
    pub is_online: bool,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Product
// ---------------------------------------------------------------------------

/// Physical condition of a listed item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    New,
    Used,
}

/// A product listing, owned exclusively by its seller and visible to all.
///
/// Seller name/avatar/shop name are denormalized onto the listing so feeds
/// render without a user lookup; they are snapshots taken at listing time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub seller_id: UserId,
    pub seller_name: String,
    #[serde(default)]
    pub seller_avatar: Option<String>,
    pub shop_name: String,
    pub name: String,
    pub description: String,
    /// Positive decimal price.
    pub price: f64,
    /// Non-negative units in stock.
    pub stock: u32,
    pub category: String,
    /// Ordered image references.
    pub images: Vec<String>,
    pub condition: Condition,
    pub payment_methods: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// A cart line: a catalog product plus a positive quantity.
///
/// Derived, never authoritative — the persisted cart is only a product-id to
/// quantity map that gets joined against the live catalog at load time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// A single direct message. Immutable once appended to its session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender_id: UserId,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// A direct conversation between exactly two users, created on first contact
/// and growing monotonically by message append.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: ChatId,
    pub participants: [UserId; 2],
    /// Listing the conversation started from, if any.
    #[serde(default)]
    pub product_id: Option<ProductId>,
    pub messages: Vec<ChatMessage>,
    pub last_updated: DateTime<Utc>,
}

impl ChatSession {
    /// Whether the given user takes part in this conversation.
    pub fn has_participant(&self, user: &UserId) -> bool {
        self.participants.contains(user)
    }
}

/// A message in a product's public Q&A log. Stored per product, append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductMessage {
    pub id: MessageId,
    pub product_id: ProductId,
    pub sender_id: UserId,
    pub sender_name: String,
    #[serde(default)]
    pub sender_avatar: Option<String>,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Set when the sender is the listing's own seller.
    pub is_seller: bool,
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// A user-filed report against a product or seller. Write-once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: ReportId,
    /// Product id or seller id, as a string.
    pub target_id: String,
    pub reporter_id: UserId,
    pub reason: String,
    pub details: String,
    #[serde(default)]
    pub evidence: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// An anonymous help-desk report. Write-once, never broadcast.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HelpReport {
    pub id: ReportId,
    pub context: String,
    pub description: String,
    #[serde(default)]
    pub related_user: Option<String>,
    pub timestamp: DateTime<Utc>,
}
