//! Typed accessors for the fixed entity slots.
//!
//! Every getter returns the full collection (empty when the slot is absent or
//! unreadable); every saver overwrites the slot wholesale. The cart is the
//! one slot that is not a collection of entities: it persists only a
//! product-id to quantity map, reconstructed into cart lines by joining
//! against the catalog at load time.

use std::collections::HashMap;

use dropshop_shared::constants::{
    SLOT_CART, SLOT_CHATS, SLOT_HELP_REPORTS, SLOT_PRODUCTS, SLOT_REPORTS, SLOT_SESSION,
    SLOT_USERS,
};
use dropshop_shared::{ChatSession, HelpReport, Product, ProductId, Report, User};

use crate::database::Store;
use crate::error::Result;

/// Persisted cart shape: product id -> quantity.
pub type CartMap = HashMap<ProductId, u32>;

impl Store {
    // ------------------------------------------------------------------
    // Users / session
    // ------------------------------------------------------------------

    /// The full user collection, in stored order.
    pub fn users(&self) -> Result<Vec<User>> {
        self.read_slot(SLOT_USERS)
    }

    pub fn save_users(&self, users: &[User]) -> Result<()> {
        self.write_slot(SLOT_USERS, &users)
    }

    /// The session slot: the user active in this profile, if any.
    pub fn current_user(&self) -> Result<Option<User>> {
        self.read_slot(SLOT_SESSION)
    }

    /// Persist the session slot; `None` deletes it (logout).
    pub fn save_current_user(&self, user: Option<&User>) -> Result<()> {
        match user {
            Some(user) => self.write_slot(SLOT_SESSION, user),
            None => self.clear_slot(SLOT_SESSION),
        }
    }

    // ------------------------------------------------------------------
    // Products / cart
    // ------------------------------------------------------------------

    /// The full product catalog, in stored order (newest first by
    /// convention of the catalog container).
    pub fn products(&self) -> Result<Vec<Product>> {
        self.read_slot(SLOT_PRODUCTS)
    }

    pub fn save_products(&self, products: &[Product]) -> Result<()> {
        self.write_slot(SLOT_PRODUCTS, &products)
    }

    /// The persisted cart quantity map. Entries referencing products that no
    /// longer exist are dropped by the consumer at join time, not here.
    pub fn cart(&self) -> Result<CartMap> {
        self.read_slot(SLOT_CART)
    }

    pub fn save_cart(&self, cart: &CartMap) -> Result<()> {
        self.write_slot(SLOT_CART, cart)
    }

    // ------------------------------------------------------------------
    // Chats
    // ------------------------------------------------------------------

    pub fn chats(&self) -> Result<Vec<ChatSession>> {
        self.read_slot(SLOT_CHATS)
    }

    pub fn save_chats(&self, chats: &[ChatSession]) -> Result<()> {
        self.write_slot(SLOT_CHATS, &chats)
    }

    // ------------------------------------------------------------------
    // Reports
    // ------------------------------------------------------------------

    pub fn reports(&self) -> Result<Vec<Report>> {
        self.read_slot(SLOT_REPORTS)
    }

    pub fn save_reports(&self, reports: &[Report]) -> Result<()> {
        self.write_slot(SLOT_REPORTS, &reports)
    }

    pub fn help_reports(&self) -> Result<Vec<HelpReport>> {
        self.read_slot(SLOT_HELP_REPORTS)
    }

    pub fn save_help_reports(&self, reports: &[HelpReport]) -> Result<()> {
        self.write_slot(SLOT_HELP_REPORTS, &reports)
    }
}
