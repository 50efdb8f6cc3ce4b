/// Application name
pub const APP_NAME: &str = "DropShop";

/// Slot key holding the full user collection
pub const SLOT_USERS: &str = "users";

/// Slot key holding the current session user (absent when logged out)
pub const SLOT_SESSION: &str = "session";

/// Slot key holding the full product catalog
pub const SLOT_PRODUCTS: &str = "products";

/// Slot key holding all direct-message chat sessions
pub const SLOT_CHATS: &str = "chats";

/// Slot key holding product/seller reports
pub const SLOT_REPORTS: &str = "reports";

/// Slot key holding the cart quantity map (productId -> quantity)
pub const SLOT_CART: &str = "cart";

/// Slot key holding help-desk reports
pub const SLOT_HELP_REPORTS: &str = "help_reports";

/// Prefix for per-product public Q&A logs; the product UUID is appended
pub const PRODUCT_MESSAGES_PREFIX: &str = "msg_prod_";

/// Simulated network latency applied to login, in milliseconds
pub const LOGIN_LATENCY_MS: u64 = 800;

/// Simulated network latency applied to registration, in milliseconds
pub const REGISTER_LATENCY_MS: u64 = 1000;

/// Avatar generator used for accounts registered without an avatar
pub const AVATAR_SERVICE_URL: &str = "https://ui-avatars.com/api/";
