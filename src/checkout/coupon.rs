use thiserror::Error;
use uuid::Uuid;

use super::session::{AppliedCoupon, CheckoutSession, Pending};
use crate::api::{ApiError, CouponQuote, CouponValidation, CouponValidationRequest};

const REJECTED_FALLBACK: &str = "Cupom inválido";
const TRANSPORT_FAILURE: &str = "Erro ao verificar cupom. Tente novamente.";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum CouponState {
    #[default]
    Idle,
    Checking {
        session_id: Uuid,
        code: String,
    },
    Applied {
        coupon: AppliedCoupon,
        quote: CouponQuote,
    },
    Rejected {
        message: String,
    },
}

/// Reasons a coupon check is refused before reaching the pricing API.
#[derive(Debug, Error, PartialEq)]
pub enum CouponError {
    #[error("Digite um código de cupom")]
    EmptyCode,
    #[error("Erro: Produto não identificado")]
    UnknownProduct,
    #[error("Aguarde, o cupom ainda está sendo verificado")]
    InFlight,
    #[error("Já existe um cupom aplicado")]
    AlreadyApplied,
}

#[derive(Debug, PartialEq)]
pub enum CouponOutcome {
    Applied {
        coupon: AppliedCoupon,
        quote: CouponQuote,
    },
    Rejected {
        message: String,
    },
    /// The session was reset or replaced while the check was in flight.
    Discarded,
}

#[derive(Debug, Default)]
pub struct CouponWorkflow {
    state: CouponState,
}

impl CouponWorkflow {
    pub fn state(&self) -> &CouponState {
        &self.state
    }

    pub fn begin(
        &mut self,
        session: Option<&CheckoutSession>,
        raw_code: &str,
    ) -> Result<Pending<CouponValidationRequest>, CouponError> {
        match self.state {
            CouponState::Checking { .. } => return Err(CouponError::InFlight),
            CouponState::Applied { .. } => return Err(CouponError::AlreadyApplied),
            CouponState::Idle | CouponState::Rejected { .. } => {}
        }

        let code = raw_code.trim().to_uppercase();
        if code.is_empty() {
            return Err(CouponError::EmptyCode);
        }
        let session = session.ok_or(CouponError::UnknownProduct)?;

        self.state = CouponState::Checking {
            session_id: session.id,
            code: code.clone(),
        };

        Ok(Pending {
            session_id: session.id,
            request: CouponValidationRequest {
                code,
                product_id: session.product_id,
                original_value: session.original_price,
            },
        })
    }

    pub fn finish(
        &mut self,
        session: Option<&mut CheckoutSession>,
        session_id: Uuid,
        result: Result<CouponValidation, ApiError>,
    ) -> CouponOutcome {
        let code = match &self.state {
            CouponState::Checking {
                session_id: pending,
                code,
            } if *pending == session_id => code.clone(),
            _ => {
                tracing::debug!(%session_id, "dropping coupon response for a replaced checkout");
                return CouponOutcome::Discarded;
            }
        };
        let Some(session) = session.filter(|session| session.id == session_id) else {
            tracing::debug!(%code, "dropping coupon response for a closed checkout");
            self.state = CouponState::Idle;
            return CouponOutcome::Discarded;
        };

        let rejection = match result {
            Ok(validation) => {
                let coupon = AppliedCoupon::from(validation.coupon);
                match session.apply_quote(coupon.clone(), &validation.quote) {
                    Ok(()) => {
                        tracing::info!(
                            code = %coupon.code,
                            final_price = %session.final_price(),
                            "coupon applied"
                        );
                        self.state = CouponState::Applied {
                            coupon: coupon.clone(),
                            quote: validation.quote.clone(),
                        };
                        return CouponOutcome::Applied {
                            coupon,
                            quote: validation.quote,
                        };
                    }
                    Err(err) => {
                        tracing::warn!(%code, error = %err, "coupon quote violates price invariant");
                        REJECTED_FALLBACK.to_string()
                    }
                }
            }
            Err(err @ ApiError::Rejected { .. }) => err
                .server_message()
                .unwrap_or(REJECTED_FALLBACK)
                .to_string(),
            Err(err) => {
                tracing::error!(%code, error = %err, "coupon validation failed");
                TRANSPORT_FAILURE.to_string()
            }
        };

        self.state = CouponState::Rejected {
            message: rejection.clone(),
        };
        CouponOutcome::Rejected { message: rejection }
    }

    pub fn reset(&mut self) {
        self.state = CouponState::Idle;
    }
}
