// Cross-context event fan-out built on tokio mpsc channels.

pub mod bus;

pub use bus::{BusHandle, Publisher, SyncBus};
