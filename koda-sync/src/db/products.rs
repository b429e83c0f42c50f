//! Product database operations

use shared::models::product::{Product, SyncStatus};
use sqlx::PgPool;

use super::BoxError;

#[derive(Debug, Clone, sqlx::FromRow)]
struct ProductRow {
    id: String,
    title: String,
    description: Option<String>,
    price: String,
    image: Option<String>,
    images: Vec<String>,
    category: String,
    subcategory: Option<String>,
    available: bool,
    stripe_product_id: Option<String>,
    stripe_price_id: Option<String>,
    sync_status: String,
    last_synced_at: Option<i64>,
    updated_at: i64,
}

impl TryFrom<ProductRow> for Product {
    type Error = BoxError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let sync_status = SyncStatus::parse(&row.sync_status)
            .ok_or_else(|| format!("unknown sync_status {:?}", row.sync_status))?;
        Ok(Product {
            id: row.id,
            title: row.title,
            description: row.description,
            price: row.price,
            image: row.image,
            images: row.images,
            category: row.category,
            subcategory: row.subcategory,
            available: row.available,
            stripe_product_id: row.stripe_product_id,
            stripe_price_id: row.stripe_price_id,
            sync_status,
            last_synced_at: row.last_synced_at,
            updated_at: row.updated_at,
        })
    }
}

const PRODUCT_COLUMNS: &str = "id, title, description, price, image, images, category, \
     subcategory, available, stripe_product_id, stripe_price_id, sync_status, \
     last_synced_at, updated_at";

/// Fetch a product by id
pub async fn find_by_id(pool: &PgPool, product_id: &str) -> Result<Option<Product>, BoxError> {
    let row: Option<ProductRow> =
        sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
            .bind(product_id)
            .fetch_optional(pool)
            .await?;

    row.map(Product::try_from).transpose()
}

/// A product the enqueuer considers out of sync with the provider
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OutOfSyncProduct {
    pub id: String,
    pub stripe_product_id: Option<String>,
    pub stripe_price_id: Option<String>,
}

impl OutOfSyncProduct {
    /// Either provider id missing → the product needs a create, else update
    pub fn needs_create(&self) -> bool {
        self.stripe_product_id.is_none() || self.stripe_price_id.is_none()
    }
}

/// List products missing provider ids or not marked synced, oldest edit first
pub async fn list_out_of_sync(pool: &PgPool) -> Result<Vec<OutOfSyncProduct>, BoxError> {
    let rows: Vec<OutOfSyncProduct> = sqlx::query_as(
        "SELECT id, stripe_product_id, stripe_price_id FROM products \
         WHERE stripe_product_id IS NULL \
            OR stripe_price_id IS NULL \
            OR sync_status <> 'synced' \
         ORDER BY updated_at",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_create() {
        let mut p = OutOfSyncProduct {
            id: "kuju-karp".into(),
            stripe_product_id: None,
            stripe_price_id: None,
        };
        assert!(p.needs_create());

        p.stripe_product_id = Some("prod_1".into());
        assert!(p.needs_create());

        p.stripe_price_id = Some("price_1".into());
        assert!(!p.needs_create());
    }
}
