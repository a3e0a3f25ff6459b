mod payload;

pub use self::payload::{
    AppliedDiscount, ChargeRequest, ChargeResponse, ChargeSummary, CouponInfo, CouponQuote,
    CouponValidation, CouponValidationRequest, Seller,
};

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;

use self::payload::StatusEnvelope;
use crate::config::Endpoints;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered but refused the request (non-2xx or `status: "error"`).
    #[error("{}", .message.as_deref().unwrap_or("request rejected by payment API"))]
    Rejected {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response from payment API: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Message the backend attached to a rejection, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct PaymentApi {
    http_client: reqwest::Client,
    endpoints: Endpoints,
}

impl PaymentApi {
    pub fn new(http_client: reqwest::Client, endpoints: Endpoints) -> Self {
        Self {
            http_client,
            endpoints,
        }
    }

    pub async fn create_charge(&self, body: &ChargeRequest) -> Result<ChargeResponse, ApiError> {
        tracing::info!(
            product_id = body.product_id,
            coupon_id = ?body.coupon_id,
            "creating PIX charge"
        );
        let response = self
            .http_client
            .post(&self.endpoints.charges)
            .json(body)
            .send()
            .await?;
        read_json(response, None).await
    }

    pub async fn validate_coupon(
        &self,
        body: &CouponValidationRequest,
    ) -> Result<CouponValidation, ApiError> {
        tracing::info!(code = %body.code, product_id = body.product_id, "validating coupon");
        let response = self
            .http_client
            .post(&self.endpoints.coupon)
            .json(body)
            .send()
            .await?;
        read_json(response, Some("success")).await
    }

    /// Empty when no sellers endpoint is configured.
    pub async fn list_sellers(&self) -> Result<Vec<Seller>, ApiError> {
        let Some(url) = &self.endpoints.sellers else {
            return Ok(Vec::new());
        };
        let response = self
            .http_client
            .get(url)
            .timeout(self.endpoints.sellers_timeout)
            .send()
            .await?;
        read_json(response, None).await
    }
}

async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    required_status: Option<&str>,
) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.bytes().await?;
    let envelope = serde_json::from_slice::<StatusEnvelope>(&body).unwrap_or_default();

    let flagged_error = envelope.status.as_deref() == Some("error");
    let missing_success = required_status.is_some_and(|expected| {
        envelope.status.as_deref() != Some(expected)
    });

    if !status.is_success() || flagged_error || missing_success {
        tracing::warn!(%status, message = ?envelope.message, "payment API rejected request");
        return Err(ApiError::Rejected {
            status,
            message: envelope.message,
        });
    }

    Ok(serde_json::from_slice(&body)?)
}
