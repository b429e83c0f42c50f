//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Display price string with currency glyph (e.g. "349€", "10,99€").
    /// Parsed to integer minor units at sync time.
    pub price: String,
    /// Primary image URL
    pub image: Option<String>,
    /// Gallery image URLs
    pub images: Vec<String>,
    pub category: String,
    pub subcategory: Option<String>,
    pub available: bool,
    /// Payment provider product reference
    pub stripe_product_id: Option<String>,
    /// Payment provider price reference (must point at an active price)
    pub stripe_price_id: Option<String>,
    pub sync_status: SyncStatus,
    /// Epoch millis of the last successful provider sync
    pub last_synced_at: Option<i64>,
    pub updated_at: i64,
}

impl Product {
    /// All image URLs in display order, primary first
    pub fn all_images(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.images.len() + 1);
        if let Some(ref primary) = self.image {
            if !primary.is_empty() {
                out.push(primary.clone());
            }
        }
        for url in &self.images {
            if !url.is_empty() && !out.contains(url) {
                out.push(url.clone());
            }
        }
        out
    }
}

/// Catalog-to-provider synchronization state of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Unsynced,
    Pending,
    Synced,
    Failed,
}

impl SyncStatus {
    /// DB column representation
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Unsynced => "unsynced",
            Self::Pending => "pending",
            Self::Synced => "synced",
            Self::Failed => "failed",
        }
    }

    /// Parse the DB column representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unsynced" => Some(Self::Unsynced),
            "pending" => Some(Self::Pending),
            "synced" => Some(Self::Synced),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_status_roundtrip() {
        for status in [
            SyncStatus::Unsynced,
            SyncStatus::Pending,
            SyncStatus::Synced,
            SyncStatus::Failed,
        ] {
            assert_eq!(SyncStatus::parse(status.as_db()), Some(status));
        }
        assert_eq!(SyncStatus::parse("bogus"), None);
    }

    #[test]
    fn test_all_images_dedup_and_order() {
        let product = Product {
            id: "kuju-karp".into(),
            title: "Kuju Kärp".into(),
            description: None,
            price: "349€".into(),
            image: Some("https://cdn.example/karp-front.jpg".into()),
            images: vec![
                "https://cdn.example/karp-front.jpg".into(),
                "https://cdn.example/karp-side.jpg".into(),
                String::new(),
            ],
            category: "sculpture".into(),
            subcategory: None,
            available: true,
            stripe_product_id: None,
            stripe_price_id: None,
            sync_status: SyncStatus::Unsynced,
            last_synced_at: None,
            updated_at: 0,
        };

        let images = product.all_images();
        assert_eq!(
            images,
            vec![
                "https://cdn.example/karp-front.jpg".to_string(),
                "https://cdn.example/karp-side.jpg".to_string(),
            ]
        );
    }
}
