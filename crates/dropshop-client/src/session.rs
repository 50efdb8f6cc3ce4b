//! Session / identity state: who is using this context right now.
//!
//! The container mediates every identity mutation. Login and registration
//! simulate network latency with a fixed non-blocking delay, the way the
//! original client did; password material is accepted but never verified
//! against any stored credential (the platform's explicit mock, preserved
//! here — see DESIGN.md).

use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};

use dropshop_shared::constants::{AVATAR_SERVICE_URL, LOGIN_LATENCY_MS, REGISTER_LATENCY_MS};
use dropshop_shared::{User, UserId, UserRole};
use dropshop_store::Store;

use crate::error::{ClientError, Result};

/// Profile fields supplied at registration. Everything not listed here is
/// filled with defaults.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: Option<UserRole>,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub pix_key: Option<String>,
}

/// Partial profile update; `Some` fields are merged into the current user.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub pix_key: Option<String>,
}

impl ProfileUpdate {
    fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(avatar) = self.avatar {
            user.avatar = Some(avatar);
        }
        if let Some(phone) = self.phone {
            user.phone = Some(phone);
        }
        if let Some(address) = self.address {
            user.address = Some(address);
        }
        if let Some(bio) = self.bio {
            user.bio = Some(bio);
        }
        if let Some(pix_key) = self.pix_key {
            user.pix_key = Some(pix_key);
        }
    }
}

/// The current user of one context.
#[derive(Default)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    /// Start with no session at all (e.g. a fresh context before restore).
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore the session persisted in the store, if any.
    ///
    /// The cached session copy is only trusted for its id: the authoritative
    /// record is re-fetched from the user collection, and the session is
    /// discarded when that record is missing or blocked.
    pub fn restore(store: &Store) -> Result<Self> {
        let Some(cached) = store.current_user()? else {
            return Ok(Self::new());
        };

        let fresh = store
            .users()?
            .into_iter()
            .find(|u| u.id == cached.id && !u.blocked);

        match fresh {
            Some(mut user) => {
                user.is_online = true;
                debug!(user = %user.id, "session restored");
                Ok(Self { user: Some(user) })
            }
            None => {
                debug!(user = %cached.id, "stale or blocked session discarded");
                store.save_current_user(None)?;
                Ok(Self::new())
            }
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// Attempt to log in with a username or e-mail.
    ///
    /// Returns `false` on failure without distinguishing an unknown
    /// identifier from a blocked account. The password is accepted but not
    /// verified (mocked on this platform).
    pub async fn login(&mut self, store: &Store, identifier: &str, _password: &str) -> Result<bool> {
        tokio::time::sleep(Duration::from_millis(LOGIN_LATENCY_MS)).await;

        let found = store
            .users()?
            .into_iter()
            .find(|u| !u.blocked && (u.email == identifier || u.username == identifier));

        match found {
            Some(mut user) => {
                user.is_online = true;
                store.save_current_user(Some(&user))?;
                info!(user = %user.id, "login succeeded");
                self.user = Some(user);
                Ok(true)
            }
            None => {
                debug!(identifier, "login rejected");
                Ok(false)
            }
        }
    }

    /// Register a new account and establish a session for it.
    ///
    /// Fails with [`ClientError::DuplicateIdentity`] when the username or
    /// e-mail is already taken; the user collection is left untouched in
    /// that case.
    pub async fn register(
        &mut self,
        store: &Store,
        profile: NewUser,
        _password: &str,
    ) -> Result<User> {
        tokio::time::sleep(Duration::from_millis(REGISTER_LATENCY_MS)).await;

        let mut users = store.users()?;
        if users
            .iter()
            .any(|u| u.email == profile.email || u.username == profile.username)
        {
            debug!(username = %profile.username, "registration rejected: duplicate identity");
            return Err(ClientError::DuplicateIdentity);
        }

        let avatar = profile
            .avatar
            .unwrap_or_else(|| generated_avatar(&profile.name));

        let user = User {
            id: UserId::new(),
            name: profile.name,
            username: profile.username,
            email: profile.email,
            role: profile.role.unwrap_or(UserRole::Buyer),
            avatar: Some(avatar),
            phone: profile.phone,
            address: profile.address,
            bio: profile.bio,
            pix_key: profile.pix_key,
            blocked: false,
            is_online: true,
            created_at: Utc::now(),
        };

        users.push(user.clone());
        store.save_users(&users)?;
        store.save_current_user(Some(&user))?;

        info!(user = %user.id, username = %user.username, "account registered");
        self.user = Some(user.clone());
        Ok(user)
    }

    /// Merge partial fields into the current user and persist both the
    /// session copy and the authoritative collection entry.
    pub fn update_profile(&mut self, store: &Store, update: ProfileUpdate) -> Result<()> {
        let user = self.user.as_mut().ok_or(ClientError::NotLoggedIn)?;
        update.apply(user);

        store.save_current_user(Some(user))?;

        let mut users = store.users()?;
        if let Some(entry) = users.iter_mut().find(|u| u.id == user.id) {
            *entry = user.clone();
            store.save_users(&users)?;
        }

        debug!(user = %user.id, "profile updated");
        Ok(())
    }

    /// Clear the session. Local-only: other contexts are not notified.
    pub fn logout(&mut self, store: &Store) -> Result<()> {
        if let Some(user) = self.user.take() {
            info!(user = %user.id, "logged out");
        }
        Ok(store.save_current_user(None)?)
    }
}

/// Deterministic placeholder avatar for accounts registered without one.
fn generated_avatar(name: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect();
    let seed = if initials.is_empty() { "U" } else { &initials };
    format!("{AVATAR_SERVICE_URL}?name={seed}&background=random")
}
