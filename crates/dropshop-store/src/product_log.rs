//! Per-product public Q&A logs.
//!
//! Each product has its own append-only slot (`msg_prod_<uuid>`). Appending
//! is a read-modify-append-write on the whole log, and it is the single
//! store operation with a publish baked in: once the write lands, the new
//! message is broadcast as `NEW_PRODUCT_MSG` so other contexts viewing the
//! same listing can append it to their thread without re-reading the slot.
//! Every other publish in the system is issued by a state container, not the
//! store.

use dropshop_shared::constants::PRODUCT_MESSAGES_PREFIX;
use dropshop_shared::{ProductId, ProductMessage, SyncEvent};

use crate::database::Store;
use crate::error::Result;

fn log_key(product_id: &ProductId) -> String {
    format!("{PRODUCT_MESSAGES_PREFIX}{product_id}")
}

impl Store {
    /// The full Q&A log for one product, oldest first.
    pub fn product_messages(&self, product_id: &ProductId) -> Result<Vec<ProductMessage>> {
        self.read_slot(&log_key(product_id))
    }

    /// Append one message to its product's log and broadcast it.
    ///
    /// The publish is skipped when no bus publisher is attached (e.g. batch
    /// tooling or tests that only care about persistence).
    pub fn save_product_message(&self, message: &ProductMessage) -> Result<()> {
        let key = log_key(&message.product_id);
        let mut log: Vec<ProductMessage> = self.read_slot(&key)?;
        log.push(message.clone());
        self.write_slot(&key, &log)?;

        tracing::debug!(product = %message.product_id, msg = %message.id, "product message appended");

        if let Some(publisher) = self.publisher() {
            publisher.publish(SyncEvent::NewProductMsg(message.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use dropshop_shared::{MessageId, UserId};
    use dropshop_sync::SyncBus;

    fn message(product_id: ProductId, text: &str) -> ProductMessage {
        ProductMessage {
            id: MessageId::new(),
            product_id,
            sender_id: UserId::new(),
            sender_name: "Bob".to_string(),
            sender_avatar: None,
            text: text.to_string(),
            timestamp: Utc::now(),
            is_seller: false,
        }
    }

    #[test]
    fn log_is_append_only_and_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open_at(&dir.path().join("test.db")).unwrap();
        let product = ProductId::new();

        store.save_product_message(&message(product, "tem na cor azul?")).unwrap();
        store.save_product_message(&message(product, "chega amanhã?")).unwrap();

        let log = store.product_messages(&product).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].text, "tem na cor azul?");
        assert_eq!(log[1].text, "chega amanhã?");
    }

    #[test]
    fn logs_are_isolated_per_product() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open_at(&dir.path().join("test.db")).unwrap();
        let first = ProductId::new();
        let second = ProductId::new();

        store.save_product_message(&message(first, "oi")).unwrap();

        assert_eq!(store.product_messages(&first).unwrap().len(), 1);
        assert!(store.product_messages(&second).unwrap().is_empty());
    }

    #[test]
    fn append_publishes_to_other_contexts_only() {
        let dir = tempfile::tempdir().unwrap();
        let bus = SyncBus::new();
        let mut own = bus.attach();
        let mut other = bus.attach();

        let mut store = Store::open_at(&dir.path().join("test.db")).unwrap();
        store.attach_publisher(own.publisher());

        let product = ProductId::new();
        let msg = message(product, "ainda disponível?");
        store.save_product_message(&msg).unwrap();

        assert!(own.try_recv().is_none(), "publish must not echo to own context");
        assert_eq!(other.try_recv(), Some(SyncEvent::NewProductMsg(msg)));
    }

    #[test]
    fn append_without_publisher_only_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open_at(&dir.path().join("test.db")).unwrap();
        let product = ProductId::new();

        store.save_product_message(&message(product, "olá")).unwrap();
        assert_eq!(store.product_messages(&product).unwrap().len(), 1);
    }
}
