//! v001 -- Initial schema creation.
//!
//! One table is all the slot store needs: a key-value map of JSON documents,
//! mirroring the localStorage layout of the original client.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Slots
-- ----------------------------------------------------------------
-- Fixed keys: users, session, products, chats, reports, cart,
-- help_reports.  Per-product message logs use msg_prod_<uuid>.
CREATE TABLE IF NOT EXISTS slots (
    key   TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL                 -- JSON document
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
