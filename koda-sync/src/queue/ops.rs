//! Provider sync operations (create / update / delete)
//!
//! "Resource missing" from the provider is always a recreate signal, never
//! a hard failure — the pipeline self-heals against deletions made directly
//! in the provider dashboard.

use shared::models::product::Product;
use shared::models::sync_job::{SyncJob, SyncOperation};

use crate::db;
use crate::money;
use crate::state::AppState;
use crate::stripe::{PriceInfo, ProductFields, StripeError};

/// Currency of all provider prices
const PRICE_CURRENCY: &str = "eur";

/// Why a sync operation failed. Every variant consumes a retry slot.
#[derive(Debug, thiserror::Error)]
pub enum OpError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Provider(#[from] StripeError),
    #[error("database error: {0}")]
    Db(#[from] crate::db::BoxError),
}

/// Successful operation outcome
#[derive(Debug)]
pub struct JobSuccess {
    /// `(stripe_product_id, stripe_price_id)` to stamp on the product row;
    /// `None` for delete jobs (the row may already be gone)
    pub provider_ids: Option<(String, String)>,
    /// Short label for the per-item batch result
    pub detail: &'static str,
}

/// Dispatch one claimed job against the provider
pub async fn run_job(state: &AppState, job: &SyncJob) -> Result<JobSuccess, OpError> {
    match job.operation {
        SyncOperation::Create | SyncOperation::Update => {
            let product = db::products::find_by_id(&state.pool, &job.product_id)
                .await?
                .ok_or_else(|| {
                    OpError::Validation(format!("product {} no longer exists", job.product_id))
                })?;
            match job.operation {
                SyncOperation::Create => sync_create(state, &product).await,
                _ => sync_update(state, &product).await,
            }
        }
        SyncOperation::Delete => sync_delete(state, job).await,
    }
}

#[derive(Debug)]
struct Validated {
    name: String,
    minor_units: i64,
    images: Vec<String>,
}

fn validate(product: &Product) -> Result<Validated, OpError> {
    let name = money::sanitize_title(&product.title);
    if name.is_empty() {
        return Err(OpError::Validation(format!(
            "product {} has no usable title after sanitization",
            product.id
        )));
    }
    let minor_units = money::parse_minor_units(&product.price).map_err(|e| {
        OpError::Validation(format!(
            "product {} price {:?}: {e}",
            product.id, product.price
        ))
    })?;
    Ok(Validated {
        name,
        minor_units,
        images: product.all_images(),
    })
}

async fn sync_create(state: &AppState, product: &Product) -> Result<JobSuccess, OpError> {
    let v = validate(product)?;
    let fields = ProductFields {
        name: &v.name,
        description: product.description.as_deref(),
        images: &v.images,
        product_id: &product.id,
        category: &product.category,
    };

    let stripe_product_id = state.stripe.create_product(&fields).await?;
    let stripe_price_id = state
        .stripe
        .create_price(&stripe_product_id, v.minor_units, PRICE_CURRENCY)
        .await?;

    Ok(JobSuccess {
        provider_ids: Some((stripe_product_id, stripe_price_id)),
        detail: "created",
    })
}

async fn sync_update(state: &AppState, product: &Product) -> Result<JobSuccess, OpError> {
    let Some(ref stripe_product_id) = product.stripe_product_id else {
        // Never reached the provider — degrade to create
        return sync_create(state, product).await;
    };

    let v = validate(product)?;
    let fields = ProductFields {
        name: &v.name,
        description: product.description.as_deref(),
        images: &v.images,
        product_id: &product.id,
        category: &product.category,
    };

    match state.stripe.get_product(stripe_product_id).await {
        Ok(_) => {}
        Err(StripeError::NotFound(_)) => {
            // Stale id (deleted on the provider side) — recreate. The old
            // price object, if any survives, stays orphaned and inactive.
            tracing::info!(
                product_id = %product.id,
                stripe_product_id = %stripe_product_id,
                "Provider product missing, recreating"
            );
            let new_product_id = state.stripe.create_product(&fields).await?;
            let new_price_id = state
                .stripe
                .create_price(&new_product_id, v.minor_units, PRICE_CURRENCY)
                .await?;
            return Ok(JobSuccess {
                provider_ids: Some((new_product_id, new_price_id)),
                detail: "recreated",
            });
        }
        Err(e) => return Err(e.into()),
    }

    state
        .stripe
        .update_product(stripe_product_id, &fields, product.available)
        .await?;

    let existing = match product.stripe_price_id.as_deref() {
        Some(price_id) => match state.stripe.get_price(price_id).await {
            Ok(info) => Some(info),
            Err(StripeError::NotFound(_)) => None,
            Err(e) => return Err(e.into()),
        },
        None => None,
    };

    let (stripe_price_id, detail) = match price_action(existing, v.minor_units) {
        PriceAction::Reuse(price_id) => (price_id, "updated"),
        PriceAction::Rotate { deactivate } => {
            if let Some(old_price_id) = deactivate {
                state.stripe.deactivate_price(&old_price_id).await?;
            }
            let new_price_id = state
                .stripe
                .create_price(stripe_product_id, v.minor_units, PRICE_CURRENCY)
                .await?;
            (new_price_id, "price_rotated")
        }
    };

    Ok(JobSuccess {
        provider_ids: Some((stripe_product_id.clone(), stripe_price_id)),
        detail,
    })
}

async fn sync_delete(state: &AppState, job: &SyncJob) -> Result<JobSuccess, OpError> {
    let Some(stripe_product_id) = job.metadata_stripe_product_id() else {
        // Product never reached the provider — nothing to deactivate
        return Ok(JobSuccess {
            provider_ids: None,
            detail: "noop",
        });
    };

    match state.stripe.deactivate_product(stripe_product_id).await {
        Ok(()) => Ok(JobSuccess {
            provider_ids: None,
            detail: "deactivated",
        }),
        Err(StripeError::NotFound(_)) => Ok(JobSuccess {
            provider_ids: None,
            detail: "already_gone",
        }),
        Err(e) => Err(e.into()),
    }
}

/// What to do with the stored provider price on update
#[derive(Debug, Clone, PartialEq, Eq)]
enum PriceAction {
    /// Amount unchanged and price still active — keep the id
    Reuse(String),
    /// Create a new price; deactivate the old one first when still active
    Rotate { deactivate: Option<String> },
}

/// Provider prices are immutable: an amount change rotates the price object
/// instead of mutating it. An inactive or missing stored price always
/// rotates (nothing to deactivate if it is already inactive).
fn price_action(existing: Option<PriceInfo>, minor_units: i64) -> PriceAction {
    match existing {
        Some(p) if p.active && p.unit_amount == Some(minor_units) => PriceAction::Reuse(p.id),
        Some(p) if p.active => PriceAction::Rotate {
            deactivate: Some(p.id),
        },
        _ => PriceAction::Rotate { deactivate: None },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::product::SyncStatus;

    fn price(id: &str, unit_amount: Option<i64>, active: bool) -> PriceInfo {
        PriceInfo {
            id: id.to_string(),
            unit_amount,
            active,
        }
    }

    #[test]
    fn test_price_action_reuses_unchanged_active_price() {
        let action = price_action(Some(price("price_1", Some(34900), true)), 34900);
        assert_eq!(action, PriceAction::Reuse("price_1".into()));
    }

    #[test]
    fn test_price_action_rotates_on_amount_change() {
        let action = price_action(Some(price("price_1", Some(34900), true)), 1099);
        assert_eq!(
            action,
            PriceAction::Rotate {
                deactivate: Some("price_1".into())
            }
        );
    }

    #[test]
    fn test_price_action_rotates_inactive_without_deactivation() {
        let action = price_action(Some(price("price_1", Some(1099), false)), 1099);
        assert_eq!(action, PriceAction::Rotate { deactivate: None });
    }

    #[test]
    fn test_price_action_rotates_when_missing() {
        let action = price_action(None, 1099);
        assert_eq!(action, PriceAction::Rotate { deactivate: None });
    }

    #[test]
    fn test_price_action_rotates_on_non_fixed_scheme() {
        // unit_amount absent (e.g. metered price) never matches
        let action = price_action(Some(price("price_1", None, true)), 1099);
        assert_eq!(
            action,
            PriceAction::Rotate {
                deactivate: Some("price_1".into())
            }
        );
    }

    fn product(title: &str, price: &str) -> Product {
        Product {
            id: "kuju-karp".into(),
            title: title.into(),
            description: None,
            price: price.into(),
            image: None,
            images: vec![],
            category: "sculpture".into(),
            subcategory: None,
            available: true,
            stripe_product_id: None,
            stripe_price_id: None,
            sync_status: SyncStatus::Unsynced,
            last_synced_at: None,
            updated_at: 0,
        }
    }

    #[test]
    fn test_validate_sanitizes_and_parses() {
        let v = validate(&product("Kuju \u{201C}K\u{00E4}rp\u{201D}", "349€")).unwrap();
        assert_eq!(v.name, "Kuju \"Kärp\"");
        assert_eq!(v.minor_units, 34900);
    }

    #[test]
    fn test_validate_rejects_bad_price() {
        let err = validate(&product("Kuju", "tasuta")).unwrap_err();
        assert!(matches!(err, OpError::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_empty_title() {
        let err = validate(&product("©®", "349€")).unwrap_err();
        assert!(matches!(err, OpError::Validation(_)));
    }
}
