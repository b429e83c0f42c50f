//! Stripe integration via REST API (no SDK dependency)
//!
//! Products and prices only. Prices are immutable on Stripe's side: an
//! amount change deactivates the old price object and creates a new one,
//! never mutates in place.

use serde_json::Value;
use std::time::Duration;

const STRIPE_API_BASE: &str = "https://api.stripe.com";

/// Per-request timeout — a hung provider call must not stall the whole batch
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Stripe request failure
#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    /// The referenced resource does not exist on Stripe's side
    /// (`resource_missing`) — callers treat this as a recreate signal
    #[error("stripe resource missing: {0}")]
    NotFound(String),
    /// Stripe rejected the request
    #[error("stripe request failed: {0}")]
    Api(String),
    /// Transport-level failure (DNS, TLS, timeout)
    #[error("stripe transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Fields sent when creating or updating a provider product
#[derive(Debug, Clone)]
pub struct ProductFields<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub images: &'a [String],
    /// Internal catalog id, stored as metadata for reconciliation
    pub product_id: &'a str,
    pub category: &'a str,
}

impl ProductFields<'_> {
    fn form_pairs(&self) -> Vec<(String, String)> {
        let mut form = vec![("name".to_string(), self.name.to_string())];
        if let Some(desc) = self.description {
            if !desc.is_empty() {
                form.push(("description".to_string(), desc.to_string()));
            }
        }
        // Stripe caps product images at 8
        for (i, url) in self.images.iter().take(8).enumerate() {
            form.push((format!("images[{i}]"), url.clone()));
        }
        form.push((
            "metadata[product_id]".to_string(),
            self.product_id.to_string(),
        ));
        form.push(("metadata[category]".to_string(), self.category.to_string()));
        form
    }
}

/// A provider price as returned by the prices API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceInfo {
    pub id: String,
    /// Amount in minor units; absent for non-fixed pricing schemes
    pub unit_amount: Option<i64>,
    pub active: bool,
}

/// Thin client over the Stripe products/prices REST API
#[derive(Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    base_url: String,
}

impl StripeClient {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key: secret_key.into(),
            base_url: STRIPE_API_BASE.to_string(),
        }
    }

    /// Create a Stripe Product, returning its id
    pub async fn create_product(&self, fields: &ProductFields<'_>) -> Result<String, StripeError> {
        let resp = self.post_form("/v1/products", &fields.form_pairs()).await?;
        require_id(&resp)
    }

    /// Fetch a Stripe Product by id
    pub async fn get_product(&self, product_id: &str) -> Result<String, StripeError> {
        let resp = self.get(&format!("/v1/products/{product_id}")).await?;
        require_id(&resp)
    }

    /// Update mutable fields of a Stripe Product, including its active flag
    pub async fn update_product(
        &self,
        product_id: &str,
        fields: &ProductFields<'_>,
        active: bool,
    ) -> Result<(), StripeError> {
        let mut form = fields.form_pairs();
        form.push(("active".to_string(), active.to_string()));
        self.post_form(&format!("/v1/products/{product_id}"), &form)
            .await?;
        Ok(())
    }

    /// Deactivate a Stripe Product (soft-delete; never hard-delete)
    pub async fn deactivate_product(&self, product_id: &str) -> Result<(), StripeError> {
        self.post_form(
            &format!("/v1/products/{product_id}"),
            &[("active".to_string(), "false".to_string())],
        )
        .await?;
        Ok(())
    }

    /// Create a price in minor units bound to a product, returning its id
    pub async fn create_price(
        &self,
        product_id: &str,
        unit_amount: i64,
        currency: &str,
    ) -> Result<String, StripeError> {
        let form = [
            ("product".to_string(), product_id.to_string()),
            ("unit_amount".to_string(), unit_amount.to_string()),
            ("currency".to_string(), currency.to_string()),
        ];
        let resp = self.post_form("/v1/prices", &form).await?;
        require_id(&resp)
    }

    /// Fetch a price by id
    pub async fn get_price(&self, price_id: &str) -> Result<PriceInfo, StripeError> {
        let resp = self.get(&format!("/v1/prices/{price_id}")).await?;
        Ok(PriceInfo {
            id: require_id(&resp)?,
            unit_amount: resp["unit_amount"].as_i64(),
            active: resp["active"].as_bool().unwrap_or(false),
        })
    }

    /// Deactivate a price (prices are immutable, stale ones are never deleted)
    pub async fn deactivate_price(&self, price_id: &str) -> Result<(), StripeError> {
        self.post_form(
            &format!("/v1/prices/{price_id}"),
            &[("active".to_string(), "false".to_string())],
        )
        .await?;
        Ok(())
    }

    async fn post_form(
        &self,
        path: &str,
        form: &[(String, String)],
    ) -> Result<Value, StripeError> {
        let resp = self
            .http
            .post(format!("{}{path}", self.base_url))
            .basic_auth(&self.secret_key, None::<&str>)
            .timeout(REQUEST_TIMEOUT)
            .form(form)
            .send()
            .await?;
        Self::into_json(resp).await
    }

    async fn get(&self, path: &str) -> Result<Value, StripeError> {
        let resp = self
            .http
            .get(format!("{}{path}", self.base_url))
            .basic_auth(&self.secret_key, None::<&str>)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        Self::into_json(resp).await
    }

    async fn into_json(resp: reqwest::Response) -> Result<Value, StripeError> {
        let status = resp.status();
        let body: Value = resp.json().await?;

        if status.is_success() {
            return Ok(body);
        }

        let code = body["error"]["code"].as_str().unwrap_or("");
        let message = body["error"]["message"]
            .as_str()
            .map(String::from)
            .unwrap_or_else(|| format!("HTTP {status}: {body}"));

        if code == "resource_missing" || status == http::StatusCode::NOT_FOUND {
            return Err(StripeError::NotFound(message));
        }
        Err(StripeError::Api(message))
    }
}

fn require_id(resp: &Value) -> Result<String, StripeError> {
    resp["id"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| StripeError::Api(format!("response missing id: {resp}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_form_pairs() {
        let images = vec!["https://cdn.example/a.jpg".to_string()];
        let fields = ProductFields {
            name: "Kuju \"Kärp\"",
            description: Some("Käsitsi valmistatud"),
            images: &images,
            product_id: "kuju-karp",
            category: "sculpture",
        };

        let form = fields.form_pairs();
        assert!(form.contains(&("name".to_string(), "Kuju \"Kärp\"".to_string())));
        assert!(form.contains(&(
            "images[0]".to_string(),
            "https://cdn.example/a.jpg".to_string()
        )));
        assert!(form.contains(&("metadata[product_id]".to_string(), "kuju-karp".to_string())));
        assert!(form.contains(&("metadata[category]".to_string(), "sculpture".to_string())));
    }

    #[test]
    fn test_product_form_skips_empty_description() {
        let fields = ProductFields {
            name: "Vaas",
            description: Some(""),
            images: &[],
            product_id: "vaas-1",
            category: "ceramics",
        };
        let form = fields.form_pairs();
        assert!(form.iter().all(|(k, _)| k != "description"));
    }

    #[test]
    fn test_product_form_caps_images() {
        let images: Vec<String> = (0..12).map(|i| format!("https://cdn.example/{i}.jpg")).collect();
        let fields = ProductFields {
            name: "Vaas",
            description: None,
            images: &images,
            product_id: "vaas-1",
            category: "ceramics",
        };
        let form = fields.form_pairs();
        let image_keys = form.iter().filter(|(k, _)| k.starts_with("images[")).count();
        assert_eq!(image_keys, 8);
    }
}
