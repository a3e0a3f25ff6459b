use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use shuttle_runtime::{CustomError, SecretStore};
use tower_http::{services::ServeDir, trace::TraceLayer};

mod api;
mod catalog;
mod checkout;
mod components;
mod config;
mod err_responses;
mod icons;
mod storefront;

use crate::{api::PaymentApi, config::Settings};

#[derive(Clone)]
struct AppState {
    settings: Arc<Settings>,
    api: PaymentApi,
    visitors: checkout::Visitors,
}

impl AppState {
    fn new(settings: Settings, http_client: reqwest::Client) -> Self {
        Self {
            api: PaymentApi::new(http_client, settings.endpoints.clone()),
            visitors: checkout::Visitors::new(settings.checkout_idle),
            settings: Arc::new(settings),
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({"status": "healthy", "service": "pix-checkout"}))
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(storefront::page))
        .route("/health", get(health))
        .with_state(state.clone())
        .nest("/checkout", checkout::router(state))
        .nest_service("/assets", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
}

#[shuttle_runtime::main]
async fn main(#[shuttle_runtime::Secrets] secret_store: SecretStore) -> shuttle_axum::ShuttleAxum {
    let settings = Settings::from_secrets(&secret_store).map_err(CustomError::new)?;

    tracing::info!(
        products = settings.catalog.products().len(),
        charges = %settings.endpoints.charges,
        sellers = settings.endpoints.sellers.is_some(),
        "starting pix checkout"
    );

    let state = AppState::new(settings, reqwest::Client::new());

    Ok(app(state).into())
}
