use std::time::Duration;

use rust_decimal::Decimal;
use shuttle_runtime::SecretStore;
use thiserror::Error;

use crate::{
    catalog::{Catalog, Product},
    components::DEFAULT_TOAST_DURATION,
};

pub const DEFAULT_CHARGES_URL: &str = "https://mercadopago-final.onrender.com/api/cobrancas";
pub const DEFAULT_COUPON_URL: &str = "https://mercadopago-final.onrender.com/api/validar-cupom";
const DEFAULT_SELLERS_TIMEOUT: Duration = Duration::from_secs(3);
const DEFAULT_CHECKOUT_IDLE: Duration = Duration::from_secs(2 * 60 * 60);

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("STORE_CATALOG is not a valid product list: {0}")]
    Catalog(#[from] serde_json::Error),
    #[error("{key} must be a number of milliseconds, got {value:?}")]
    Duration { key: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Endpoints {
    pub charges: String,
    pub coupon: String,
    pub sellers: Option<String>,
    /// Upper bound on the seller list fetch; the selector is left out when it runs over.
    pub sellers_timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub endpoints: Endpoints,
    pub catalog: Catalog,
    pub toast_duration: Duration,
    /// Checkouts untouched for this long are dropped.
    pub checkout_idle: Duration,
}

impl Settings {
    pub fn from_secrets(secret_store: &SecretStore) -> Result<Self, SettingsError> {
        Self::from_lookup(|key| secret_store.get(key))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let catalog = match non_empty("STORE_CATALOG") {
            Some(raw) => Catalog::from_json(&raw)?,
            None => {
                tracing::warn!("STORE_CATALOG not set, using the built-in sample catalog");
                sample_catalog()
            }
        };

        let millis = |key: &'static str, default: Duration| match non_empty(key) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| SettingsError::Duration { key, value: raw }),
            None => Ok(default),
        };

        let toast_duration = millis("TOAST_DURATION_MS", DEFAULT_TOAST_DURATION)?;
        let sellers_timeout = millis("SELLERS_TIMEOUT_MS", DEFAULT_SELLERS_TIMEOUT)?;
        let checkout_idle = millis("CHECKOUT_IDLE_MS", DEFAULT_CHECKOUT_IDLE)?;

        Ok(Self {
            endpoints: Endpoints {
                charges: non_empty("CHARGES_URL").unwrap_or_else(|| DEFAULT_CHARGES_URL.into()),
                coupon: non_empty("COUPON_URL").unwrap_or_else(|| DEFAULT_COUPON_URL.into()),
                sellers: non_empty("SELLERS_URL"),
                sellers_timeout,
            },
            catalog,
            toast_duration,
            checkout_idle,
        })
    }
}

fn sample_catalog() -> Catalog {
    Catalog::new(vec![
        Product {
            id: 1,
            name: "Finanças Pessoais Sem Mistério".to_string(),
            price: Decimal::new(1990, 2),
            description: Some("E-book com planilhas de orçamento.".to_string()),
            image_url: None,
        },
        Product {
            id: 2,
            name: "Produtividade Para Devoradores de Livros".to_string(),
            price: Decimal::new(2790, 2),
            description: Some("E-book com métodos de leitura ativa.".to_string()),
            image_url: None,
        },
    ])
}
