//! # dropshop-client
//!
//! The in-context state containers of the DropShop marketplace: [`Session`]
//! owns the current user and every identity mutation, [`Catalog`] owns the
//! product catalog and the cart and reconciles them against both local
//! actions and remote bus events. [`chat`] holds the direct-message and
//! product Q&A flows.
//!
//! Containers are owned by the composition root and borrow the [`Store`]
//! per call; there are no ambient singletons. One container set per context.
//!
//! [`Store`]: dropshop_store::Store

pub mod catalog;
pub mod chat;
pub mod session;

mod error;

pub use catalog::Catalog;
pub use error::ClientError;
pub use session::{NewUser, ProfileUpdate, Session};

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber for a composition root.
///
/// Honours `RUST_LOG` when set, otherwise defaults to debug for the DropShop
/// crates and warn for everything else.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("dropshop_client=debug,dropshop_store=info,dropshop_sync=info,warn")
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
