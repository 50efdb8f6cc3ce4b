//! Catalog / cart state: the authoritative in-context view of the product
//! catalog and the current user's cart.
//!
//! Local product mutations run in a fixed order — in-memory update, full
//! collection persist, bus publish — so the acting context is consistent
//! synchronously while other contexts catch up when they drain their queue.
//! Remote events patch in-memory state only: the originating context already
//! persisted, and re-saving in receivers would be redundant.
//!
//! The cart never leaves this context (carts are per user, per context). On
//! every cart change the full quantity-map is recomputed and saved through
//! one internal persistence reaction.

use chrono::Utc;
use tracing::{debug, info, trace};

use dropshop_shared::{
    CartItem, HelpReport, Product, ProductId, Report, ReportId, SyncEvent, UserId,
};
use dropshop_store::{CartMap, Store};
use dropshop_sync::BusHandle;

use crate::error::Result;

/// The product catalog plus the cart of one context.
pub struct Catalog {
    products: Vec<Product>,
    cart: Vec<CartItem>,
    bus: BusHandle,
}

impl Catalog {
    /// Load the catalog and join the persisted cart quantity-map against it.
    /// Cart entries referencing a product missing from the catalog are
    /// silently dropped.
    pub fn load(store: &Store, bus: BusHandle) -> Result<Self> {
        let products = store.products()?;
        let saved = store.cart()?;

        let cart = products
            .iter()
            .filter_map(|product| {
                saved.get(&product.id).map(|&quantity| CartItem {
                    product: product.clone(),
                    quantity,
                })
            })
            .collect();

        Ok(Self {
            products,
            cart,
            bus,
        })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn cart(&self) -> &[CartItem] {
        &self.cart
    }

    // ------------------------------------------------------------------
    // Local product mutations: update, persist, publish — in that order.
    // ------------------------------------------------------------------

    /// Add a new listing to the front of the catalog.
    pub fn add_product(&mut self, store: &Store, product: Product) -> Result<()> {
        self.products.insert(0, product.clone());
        store.save_products(&self.products)?;
        info!(product = %product.id, "product listed");
        self.bus.publish(SyncEvent::NewProduct(product));
        Ok(())
    }

    /// Replace the listing with the same id. Unknown ids are a no-op apart
    /// from the broadcast.
    pub fn update_product(&mut self, store: &Store, product: Product) -> Result<()> {
        if let Some(existing) = self.products.iter_mut().find(|p| p.id == product.id) {
            *existing = product.clone();
        }
        store.save_products(&self.products)?;
        debug!(product = %product.id, "product updated");
        self.bus.publish(SyncEvent::UpdateProduct(product));
        Ok(())
    }

    /// Remove a listing from the catalog.
    pub fn delete_product(&mut self, store: &Store, id: ProductId) -> Result<()> {
        self.products.retain(|p| p.id != id);
        store.save_products(&self.products)?;
        info!(product = %id, "product deleted");
        self.bus.publish(SyncEvent::DeleteProduct(id));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Remote reconciliation
    // ------------------------------------------------------------------

    /// Drain and apply every queued bus event.
    ///
    /// All patches are in-memory only; nothing here writes the product
    /// collection back to the store.
    pub fn sync_pending(&mut self) {
        while let Some(event) = self.bus.try_recv() {
            self.apply_remote(event);
        }
    }

    fn apply_remote(&mut self, event: SyncEvent) {
        trace!(?event, "applying remote event");
        match event {
            SyncEvent::NewProduct(product) => {
                self.products.insert(0, product);
            }
            SyncEvent::UpdateProduct(product) => {
                if let Some(existing) = self.products.iter_mut().find(|p| p.id == product.id) {
                    *existing = product;
                }
            }
            SyncEvent::DeleteProduct(id) => {
                self.products.retain(|p| p.id != id);
                // Drop the cart line too so the next persistence cycle no
                // longer references the vanished product. In-memory only.
                self.cart.retain(|line| line.product.id != id);
            }
            // Product Q&A and report events are page-level concerns; the
            // catalog has nothing to patch.
            SyncEvent::NewProductMsg(_) | SyncEvent::NewReport(_) => {}
        }
    }

    // ------------------------------------------------------------------
    // Cart — local-only, never broadcast.
    // ------------------------------------------------------------------

    /// Put a product in the cart, merging quantities when it is already
    /// there.
    pub fn add_to_cart(&mut self, store: &Store, product: &Product, quantity: u32) -> Result<()> {
        match self.cart.iter_mut().find(|l| l.product.id == product.id) {
            Some(line) => line.quantity += quantity,
            None => self.cart.push(CartItem {
                product: product.clone(),
                quantity,
            }),
        }
        self.persist_cart(store)
    }

    /// Set a line's quantity; zero removes the line.
    pub fn update_cart_quantity(
        &mut self,
        store: &Store,
        id: ProductId,
        quantity: u32,
    ) -> Result<()> {
        if quantity == 0 {
            return self.remove_from_cart(store, id);
        }
        if let Some(line) = self.cart.iter_mut().find(|l| l.product.id == id) {
            line.quantity = quantity;
        }
        self.persist_cart(store)
    }

    pub fn remove_from_cart(&mut self, store: &Store, id: ProductId) -> Result<()> {
        self.cart.retain(|line| line.product.id != id);
        self.persist_cart(store)
    }

    pub fn clear_cart(&mut self, store: &Store) -> Result<()> {
        self.cart.clear();
        self.persist_cart(store)
    }

    /// The persistence reaction run after every cart change: recompute the
    /// full quantity-map and overwrite the cart slot.
    fn persist_cart(&self, store: &Store) -> Result<()> {
        let map: CartMap = self
            .cart
            .iter()
            .map(|line| (line.product.id, line.quantity))
            .collect();
        Ok(store.save_cart(&map)?)
    }

    // ------------------------------------------------------------------
    // Reports
    // ------------------------------------------------------------------

    /// File a report against a product and broadcast it.
    pub fn report_product(
        &self,
        store: &Store,
        reporter: UserId,
        product_id: ProductId,
        reason: &str,
        details: &str,
    ) -> Result<Report> {
        let report = Report {
            id: ReportId::new(),
            target_id: product_id.to_string(),
            reporter_id: reporter,
            reason: reason.to_string(),
            details: details.to_string(),
            evidence: None,
            timestamp: Utc::now(),
        };

        let mut reports = store.reports()?;
        reports.push(report.clone());
        store.save_reports(&reports)?;

        info!(target = %report.target_id, "product reported");
        self.bus.publish(SyncEvent::NewReport(report.clone()));
        Ok(report)
    }
}

/// File an anonymous help-desk report. Persisted but never broadcast.
pub fn submit_help_report(
    store: &Store,
    context: &str,
    description: &str,
    related_user: Option<&str>,
) -> Result<HelpReport> {
    let report = HelpReport {
        id: ReportId::new(),
        context: context.to_string(),
        description: description.to_string(),
        related_user: related_user.map(str::to_string),
        timestamp: Utc::now(),
    };

    let mut reports = store.help_reports()?;
    reports.push(report.clone());
    store.save_help_reports(&reports)?;

    debug!(report = %report.id, "help report submitted");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use dropshop_shared::Condition;
    use dropshop_sync::SyncBus;

    fn open_context(path: &Path, bus: &SyncBus) -> (Store, Catalog) {
        let mut store = Store::open_at(path).unwrap();
        let handle = bus.attach();
        store.attach_publisher(handle.publisher());
        let catalog = Catalog::load(&store, handle).unwrap();
        (store, catalog)
    }

    fn product(name: &str, price: f64) -> Product {
        Product {
            id: ProductId::new(),
            seller_id: UserId::new(),
            seller_name: "Ana".to_string(),
            seller_avatar: None,
            shop_name: "Loja da Ana".to_string(),
            name: name.to_string(),
            description: String::new(),
            price,
            stock: 5,
            category: "misc".to_string(),
            images: Vec::new(),
            condition: Condition::New,
            payment_methods: vec!["pix".to_string()],
            active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn add_to_cart_merges_quantities() {
        let dir = tempfile::tempdir().unwrap();
        let bus = SyncBus::new();
        let (store, mut catalog) = open_context(&dir.path().join("db"), &bus);

        let fone = product("fone", 99.9);
        catalog.add_to_cart(&store, &fone, 2).unwrap();
        catalog.add_to_cart(&store, &fone, 3).unwrap();

        assert_eq!(catalog.cart().len(), 1);
        assert_eq!(catalog.cart()[0].quantity, 5);
        assert_eq!(store.cart().unwrap()[&fone.id], 5);
    }

    #[test]
    fn zero_quantity_removes_the_line() {
        let dir = tempfile::tempdir().unwrap();
        let bus = SyncBus::new();
        let (store, mut catalog) = open_context(&dir.path().join("db"), &bus);

        let fone = product("fone", 99.9);
        catalog.add_to_cart(&store, &fone, 2).unwrap();
        catalog.update_cart_quantity(&store, fone.id, 0).unwrap();

        assert!(catalog.cart().is_empty());
        assert!(store.cart().unwrap().is_empty());
    }

    #[test]
    fn load_drops_cart_entries_for_missing_products() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db");
        let bus = SyncBus::new();

        let store = Store::open_at(&path).unwrap();
        let fone = product("fone", 99.9);
        store.save_products(&[fone.clone()]).unwrap();
        let mut saved = CartMap::new();
        saved.insert(fone.id, 1);
        saved.insert(ProductId::new(), 4); // product gone from the catalog
        store.save_cart(&saved).unwrap();

        let catalog = Catalog::load(&store, bus.attach()).unwrap();
        assert_eq!(catalog.cart().len(), 1);
        assert_eq!(catalog.cart()[0].product.id, fone.id);
    }

    #[test]
    fn local_mutations_persist_and_new_products_prepend() {
        let dir = tempfile::tempdir().unwrap();
        let bus = SyncBus::new();
        let (store, mut catalog) = open_context(&dir.path().join("db"), &bus);

        let older = product("teclado", 50.0);
        let newer = product("fone", 99.9);
        catalog.add_product(&store, older.clone()).unwrap();
        catalog.add_product(&store, newer.clone()).unwrap();

        assert_eq!(catalog.products()[0].id, newer.id);
        assert_eq!(store.products().unwrap(), catalog.products());

        let mut patched = older.clone();
        patched.price = 45.0;
        catalog.update_product(&store, patched).unwrap();
        assert_eq!(store.products().unwrap()[1].price, 45.0);

        catalog.delete_product(&store, newer.id).unwrap();
        assert_eq!(store.products().unwrap().len(), 1);
    }

    #[test]
    fn published_product_appears_remotely_without_a_store_read() {
        let dir = tempfile::tempdir().unwrap();
        let bus = SyncBus::new();
        let (store_a, mut context_a) = open_context(&dir.path().join("a.db"), &bus);
        // Context B gets its own, *empty* store file: if B's catalog gains
        // the product it can only have come over the bus.
        let (_store_b, mut context_b) = open_context(&dir.path().join("b.db"), &bus);

        let fone = product("fone", 99.9);
        context_a.add_product(&store_a, fone.clone()).unwrap();

        context_b.sync_pending();
        assert_eq!(context_b.products().len(), 1);
        assert_eq!(context_b.products()[0], fone);
    }

    #[test]
    fn remote_events_do_not_repersist_the_collection() {
        let dir = tempfile::tempdir().unwrap();
        let bus = SyncBus::new();
        let (store_a, mut context_a) = open_context(&dir.path().join("a.db"), &bus);
        let (store_b, mut context_b) = open_context(&dir.path().join("b.db"), &bus);

        context_a.add_product(&store_a, product("fone", 99.9)).unwrap();
        context_b.sync_pending();

        // B patched memory only; its own store file stays empty.
        assert!(store_b.products().unwrap().is_empty());
    }

    #[test]
    fn remote_delete_reconciles_catalog_and_next_cart_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.db");
        let bus = SyncBus::new();

        // Both contexts share one store file, as two tabs share one profile.
        let (store_a, mut context_a) = open_context(&path, &bus);

        let fone = product("fone", 99.9);
        let teclado = product("teclado", 50.0);
        context_a.add_product(&store_a, fone.clone()).unwrap();
        context_a.add_product(&store_a, teclado.clone()).unwrap();

        let (store_b, mut context_b) = open_context(&path, &bus);
        context_b.sync_pending(); // A's adds predate B; B loaded them from disk
        context_b.add_to_cart(&store_b, &fone, 1).unwrap();
        context_b.add_to_cart(&store_b, &teclado, 2).unwrap();

        context_a.delete_product(&store_a, fone.id).unwrap();
        context_b.sync_pending();

        assert!(context_b.products().iter().all(|p| p.id != fone.id));
        assert!(context_b.cart().iter().all(|l| l.product.id != fone.id));

        // The next cart-persistence cycle drops the stale entry from disk.
        context_b.update_cart_quantity(&store_b, teclado.id, 3).unwrap();
        let persisted = store_b.cart().unwrap();
        assert!(!persisted.contains_key(&fone.id));
        assert_eq!(persisted[&teclado.id], 3);
    }

    #[test]
    fn report_product_persists_and_broadcasts() {
        let dir = tempfile::tempdir().unwrap();
        let bus = SyncBus::new();
        let (store, catalog) = open_context(&dir.path().join("db"), &bus);
        let mut observer = bus.attach();

        let fone = product("fone", 99.9);
        let report = catalog
            .report_product(&store, UserId::new(), fone.id, "fraude", "não entregou")
            .unwrap();

        assert_eq!(store.reports().unwrap(), vec![report.clone()]);
        assert_eq!(observer.try_recv(), Some(SyncEvent::NewReport(report)));
    }

    #[test]
    fn help_reports_persist_without_broadcast() {
        let dir = tempfile::tempdir().unwrap();
        let bus = SyncBus::new();
        let (store, _catalog) = open_context(&dir.path().join("db"), &bus);
        let mut observer = bus.attach();

        submit_help_report(&store, "checkout", "botão não responde", None).unwrap();

        assert_eq!(store.help_reports().unwrap().len(), 1);
        assert!(observer.try_recv().is_none());
    }
}
