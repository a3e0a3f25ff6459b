use thiserror::Error;
use uuid::Uuid;

use super::{
    phone,
    session::{CheckoutSession, Pending},
    validate::{self, CheckoutForm, FieldErrors},
};
use crate::api::{ApiError, ChargeRequest, ChargeResponse};

const GENERIC_FAILURE: &str = "Não foi possível gerar o PIX. Tente novamente.";

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum SubmissionState {
    #[default]
    FormVisible,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Error, PartialEq)]
pub enum SubmitError {
    #[error("Verifique os campos destacados")]
    Invalid(FieldErrors),
    #[error("Seu pedido já está sendo processado")]
    InFlight,
    #[error("Este pedido já foi gerado")]
    Completed,
    #[error("Erro: Produto não identificado")]
    NoProduct,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Paid(ChargeResponse),
    Failed { message: String },
    Discarded,
}

#[derive(Debug, Default)]
pub struct SubmissionWorkflow {
    state: SubmissionState,
    /// Session the in-flight charge was requested for.
    in_flight: Option<Uuid>,
}

impl SubmissionWorkflow {
    /// Validates and, when the form passes, assembles the one charge request for this attempt.
    pub fn begin(
        &mut self,
        session: Option<&mut CheckoutSession>,
        form: &CheckoutForm,
    ) -> Result<Pending<ChargeRequest>, SubmitError> {
        match self.state {
            SubmissionState::Submitting => return Err(SubmitError::InFlight),
            SubmissionState::Succeeded => return Err(SubmitError::Completed),
            SubmissionState::FormVisible | SubmissionState::Failed => {}
        }

        validate::validate(form).map_err(SubmitError::Invalid)?;
        let session = session.ok_or(SubmitError::NoProduct)?;

        session.seller_code = non_blank(form.seller_code.as_deref());
        let request = ChargeRequest {
            email: form.email.trim().to_string(),
            name: form.name.trim().to_string(),
            phone: form.phone.as_deref().map(phone::digits),
            product_id: session.product_id,
            coupon_id: session.applied_coupon().map(|coupon| coupon.id),
            seller_code: session.seller_code.clone(),
            user_id: session.user_id.clone(),
        };

        self.state = SubmissionState::Submitting;
        self.in_flight = Some(session.id);
        Ok(Pending {
            session_id: session.id,
            request,
        })
    }

    pub fn finish(
        &mut self,
        session_id: Uuid,
        result: Result<ChargeResponse, ApiError>,
    ) -> SubmitOutcome {
        if self.state != SubmissionState::Submitting || self.in_flight != Some(session_id) {
            tracing::debug!(%session_id, "dropping charge response for a replaced checkout");
            return SubmitOutcome::Discarded;
        }
        self.in_flight = None;

        match result {
            Ok(charge) => {
                self.state = SubmissionState::Succeeded;
                SubmitOutcome::Paid(charge)
            }
            Err(err) => {
                tracing::error!(error = %err, "charge creation failed");
                self.state = SubmissionState::Failed;
                let message = match &err {
                    ApiError::Rejected { message, .. } => message
                        .clone()
                        .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
                    other => format!("Erro ao processar pagamento: {other}"),
                };
                SubmitOutcome::Failed { message }
            }
        }
    }

    pub fn reset(&mut self) {
        self.state = SubmissionState::FormVisible;
        self.in_flight = None;
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
