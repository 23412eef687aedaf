//! Knowledge store: FAQ entries and order records
//!
//! Loaded once at startup from two JSON documents and read-only afterwards.
//! A missing or malformed file is fatal; the session never starts on partial data.

mod faq;
mod orders;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

pub use faq::FaqEntry;
pub use orders::Order;
#[cfg(test)]
pub use orders::OrderStatus;

use orders::OrderRecord;

pub const FAQ_FILE: &str = "faq.json";
pub const ORDERS_FILE: &str = "orders.json";

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// In-memory view of the shop's FAQ and orders.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeStore {
    faq: Vec<FaqEntry>,
    orders: HashMap<String, Order>,
}

impl KnowledgeStore {
    pub fn new(faq: Vec<FaqEntry>, orders: impl IntoIterator<Item = Order>) -> Self {
        Self {
            faq,
            orders: orders.into_iter().map(|o| (o.id.clone(), o)).collect(),
        }
    }

    /// Load `faq.json` and `orders.json` from `dir`.
    pub fn load(dir: &Path) -> Result<Self, KnowledgeError> {
        let faq: Vec<FaqEntry> = read_json(&dir.join(FAQ_FILE))?;
        let records: HashMap<String, OrderRecord> = read_json(&dir.join(ORDERS_FILE))?;

        let orders = records
            .into_iter()
            .map(|(id, record)| record.into_order(id));

        let store = Self::new(faq, orders);
        tracing::info!(
            faq_entries = store.faq.len(),
            orders = store.orders.len(),
            dir = %dir.display(),
            "knowledge store loaded"
        );
        Ok(store)
    }

    #[cfg(test)]
    pub fn faq(&self) -> &[FaqEntry] {
        &self.faq
    }

    pub fn order(&self, id: &str) -> Option<&Order> {
        self.orders.get(id)
    }

    /// Map an order id to a status sentence. Never fails.
    pub fn lookup_order(&self, id: &str) -> String {
        orders::describe(id, self.order(id))
    }

    /// Exact, case-insensitive, whitespace-trimmed FAQ lookup.
    pub fn match_faq(&self, question: &str) -> Option<&str> {
        faq::find(&self.faq, question)
    }

    /// The whole FAQ rendered as plain question/answer blocks.
    pub fn faq_context(&self) -> String {
        faq::render(&self.faq)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, KnowledgeError> {
    let content = std::fs::read_to_string(path).map_err(|source| KnowledgeError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| KnowledgeError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAQ_JSON: &str = r#"[
        {"q": "How long is delivery?", "a": "Usually 2-5 business days."},
        {"q": "Can I return an item?", "a": "Yes, within 14 days."}
    ]"#;

    const ORDERS_JSON: &str = r#"{
        "A100": {"status": "in_transit", "eta_days": 2, "carrier": "FastShip"},
        "B200": {"status": "delivered", "delivered_at": "2024-05-01"},
        "C300": {"status": "processing", "note": "Awaiting payment confirmation"},
        "D400": {"status": "lost_in_space"}
    }"#;

    fn write_data(dir: &Path, faq: &str, orders: &str) {
        std::fs::write(dir.join(FAQ_FILE), faq).unwrap();
        std::fs::write(dir.join(ORDERS_FILE), orders).unwrap();
    }

    #[test]
    fn test_load_from_dir() {
        let tmp = tempfile::tempdir().unwrap();
        write_data(tmp.path(), FAQ_JSON, ORDERS_JSON);

        let store = KnowledgeStore::load(tmp.path()).unwrap();
        assert_eq!(store.faq().len(), 2);
        assert_eq!(store.faq()[0].question, "How long is delivery?");

        let order = store.order("A100").unwrap();
        assert!(matches!(order.status, OrderStatus::InTransit { .. }));
        assert!(matches!(
            store.order("D400").unwrap().status,
            OrderStatus::Unknown { .. }
        ));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(FAQ_FILE), FAQ_JSON).unwrap();

        let err = KnowledgeStore::load(tmp.path()).unwrap_err();
        match err {
            KnowledgeError::Io { path, .. } => assert!(path.ends_with(ORDERS_FILE)),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_file_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        write_data(tmp.path(), "[{\"q\": \"broken\"", ORDERS_JSON);

        let err = KnowledgeStore::load(tmp.path()).unwrap_err();
        assert!(matches!(err, KnowledgeError::Parse { .. }));
        assert!(err.to_string().contains(FAQ_FILE));
    }

    #[test]
    fn test_lookup_through_store() {
        let tmp = tempfile::tempdir().unwrap();
        write_data(tmp.path(), FAQ_JSON, ORDERS_JSON);
        let store = KnowledgeStore::load(tmp.path()).unwrap();

        let reply = store.lookup_order("A100");
        assert!(reply.contains("A100"));
        assert!(reply.contains('2'));
        assert!(reply.contains("FastShip"));

        assert_eq!(
            store.match_faq("  can i RETURN an item?  "),
            Some("Yes, within 14 days.")
        );
    }
}
