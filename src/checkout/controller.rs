use uuid::Uuid;

use super::{
    coupon::{CouponError, CouponOutcome, CouponState, CouponWorkflow},
    session::{CheckoutSession, Pending},
    submit::{SubmissionWorkflow, SubmitError, SubmitOutcome},
    validate::CheckoutForm,
};
use crate::{
    api::{ApiError, ChargeRequest, ChargeResponse, CouponValidation, CouponValidationRequest},
    catalog::Product,
};

/// Checkout state for one visitor.
///
/// The `begin_*`/`finish_*` pairs are pure transitions around the single
/// network call of each action, so a caller can release the controller while
/// the request is in flight. Each `begin_*` hands out the id of the session
/// it was built for; `finish_*` drops a response whose session is gone.
#[derive(Debug, Default)]
pub struct CheckoutController {
    session: Option<CheckoutSession>,
    coupon: CouponWorkflow,
    submission: SubmissionWorkflow,
}

impl CheckoutController {
    pub fn session(&self) -> Option<&CheckoutSession> {
        self.session.as_ref()
    }

    pub fn coupon_state(&self) -> &CouponState {
        self.coupon.state()
    }

    /// Starts a fresh session for `product`, dropping any coupon or result from before.
    pub fn open(&mut self, product: &Product, user_id: Option<String>) {
        tracing::debug!(product_id = product.id, "opening checkout");
        self.reset_workflows();
        self.session = Some(CheckoutSession::for_product(product, user_id));
    }

    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::debug!(product_id = session.product_id, "closing checkout");
        }
        self.reset_workflows();
    }

    fn reset_workflows(&mut self) {
        self.coupon.reset();
        self.submission.reset();
    }

    pub fn begin_coupon(
        &mut self,
        raw_code: &str,
    ) -> Result<Pending<CouponValidationRequest>, CouponError> {
        self.coupon.begin(self.session.as_ref(), raw_code)
    }

    pub fn finish_coupon(
        &mut self,
        session_id: Uuid,
        result: Result<CouponValidation, ApiError>,
    ) -> CouponOutcome {
        self.coupon.finish(self.session.as_mut(), session_id, result)
    }

    pub fn begin_submit(&mut self, form: &CheckoutForm) -> Result<Pending<ChargeRequest>, SubmitError> {
        self.submission.begin(self.session.as_mut(), form)
    }

    pub fn finish_submit(
        &mut self,
        session_id: Uuid,
        result: Result<ChargeResponse, ApiError>,
    ) -> SubmitOutcome {
        if self.session.as_ref().map(|session| session.id) != Some(session_id) {
            tracing::debug!(%session_id, "dropping charge response for a closed checkout");
            return SubmitOutcome::Discarded;
        }
        self.submission.finish(session_id, result)
    }
}

#[cfg(test)]
mod tests {
    use maud::Render;
    use rust_decimal::Decimal;
    use serde_json::json;
    use wiremock::{
        matchers::{body_partial_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;
    use crate::{
        api::PaymentApi,
        checkout::views::ChargeResultView,
        config::Endpoints,
    };

    fn book() -> Product {
        Product {
            id: 1,
            name: "Book".into(),
            price: Decimal::new(1990, 2),
            description: None,
            image_url: None,
        }
    }

    fn jane() -> CheckoutForm {
        CheckoutForm {
            name: "Jane Doe".into(),
            email: "jane@x.com".into(),
            phone: Some("11987654321".into()),
            ..Default::default()
        }
    }

    fn charge(text: &str) -> ChargeResponse {
        ChargeResponse {
            qr_code_base64: "QR".into(),
            qr_code_text: text.into(),
            discount: None,
            charge: None,
        }
    }

    fn api(base: &str) -> PaymentApi {
        PaymentApi::new(
            reqwest::Client::new(),
            Endpoints {
                charges: format!("{base}/api/cobrancas"),
                coupon: format!("{base}/api/validar-cupom"),
                sellers: None,
                sellers_timeout: std::time::Duration::from_secs(1),
            },
        )
    }

    async fn submit(controller: &mut CheckoutController, api: &PaymentApi) -> SubmitOutcome {
        let pending = controller.begin_submit(&jane()).unwrap();
        let result = api.create_charge(&pending.request).await;
        controller.finish_submit(pending.session_id, result)
    }

    async fn apply_coupon(
        controller: &mut CheckoutController,
        api: &PaymentApi,
        code: &str,
    ) -> CouponOutcome {
        let pending = controller.begin_coupon(code).unwrap();
        let result = api.validate_coupon(&pending.request).await;
        controller.finish_coupon(pending.session_id, result)
    }

    async fn mount_coupon(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/api/validar-cupom"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "cupom": {"id": 4, "codigo": "PROMO10", "descricao": "10% OFF"},
                "calculo": {
                    "valor_original": 19.9,
                    "desconto": 1.99,
                    "percentual_aplicado": 10,
                    "valor_final": 17.91
                }
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn pays_for_a_book_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/cobrancas"))
            .and(body_partial_json(json!({
                "nome": "Jane Doe",
                "email": "jane@x.com",
                "telefone": "11987654321",
                "product_id": 1
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "qr_code_base64": "...",
                "qr_code_text": "000201..."
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut controller = CheckoutController::default();
        controller.open(&book(), None);

        let charge = match submit(&mut controller, &api(&server.uri())).await {
            SubmitOutcome::Paid(charge) => charge,
            other => panic!("expected a paid outcome, got {other:?}"),
        };
        let markup = ChargeResultView::from(&charge).render().into_string();
        assert!(markup.contains(r#"src="data:image/png;base64,...""#));
        assert!(markup.contains("000201..."));
        assert_eq!(controller.begin_submit(&jane()), Err(SubmitError::Completed));
    }

    #[tokio::test]
    async fn network_failure_keeps_form_editable() {
        let mut controller = CheckoutController::default();
        controller.open(&book(), None);

        let message = match submit(&mut controller, &api("http://127.0.0.1:9")).await {
            SubmitOutcome::Failed { message } => message,
            other => panic!("expected a failed outcome, got {other:?}"),
        };
        assert!(message.starts_with("Erro ao processar pagamento: "));
        assert!(message.len() > "Erro ao processar pagamento: ".len());
        assert!(controller.session().is_some());
        assert!(controller.begin_submit(&jane()).is_ok());
    }

    #[tokio::test]
    async fn coupon_discount_is_sent_with_the_charge() {
        let server = MockServer::start().await;
        mount_coupon(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/cobrancas"))
            .and(body_partial_json(json!({"cupom_id": 4, "usuario_id": "abc"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "qr_code_base64": "QR",
                "qr_code_text": "000201",
                "desconto_aplicado": {"cupom_codigo": "PROMO10", "valor_desconto": 1.99}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = api(&server.uri());
        let mut controller = CheckoutController::default();
        controller.open(&book(), Some("abc".into()));

        let outcome = apply_coupon(&mut controller, &api, "promo10").await;
        assert!(matches!(outcome, CouponOutcome::Applied { .. }));
        assert_eq!(
            controller.session().map(CheckoutSession::final_price),
            Some(Decimal::new(1791, 2))
        );

        let charge = match submit(&mut controller, &api).await {
            SubmitOutcome::Paid(charge) => charge,
            other => panic!("expected a paid outcome, got {other:?}"),
        };
        assert_eq!(charge.discount.map(|d| d.coupon_code).as_deref(), Some("PROMO10"));
    }

    #[tokio::test]
    async fn closing_resets_price_and_coupon() {
        let server = MockServer::start().await;
        mount_coupon(&server).await;
        let api = api(&server.uri());

        let mut controller = CheckoutController::default();
        controller.open(&book(), None);
        apply_coupon(&mut controller, &api, "PROMO10").await;

        controller.close();
        assert!(controller.session().is_none());
        assert_eq!(controller.coupon_state(), &CouponState::Idle);

        controller.open(&book(), None);
        let session = controller.session().unwrap();
        assert_eq!(session.final_price(), session.original_price);
        assert!(session.applied_coupon().is_none());
        assert!(controller.begin_coupon("PROMO10").is_ok());
    }

    #[test]
    fn coupon_response_after_reopen_is_discarded() {
        let mut controller = CheckoutController::default();
        controller.open(&book(), None);
        let pending = controller.begin_coupon("PROMO10").unwrap();

        controller.open(&Product { id: 2, ..book() }, None);
        let decode = serde_json::from_str::<CouponValidation>("{}").unwrap_err();
        assert_eq!(
            controller.finish_coupon(pending.session_id, Err(ApiError::Decode(decode))),
            CouponOutcome::Discarded
        );
    }

    #[test]
    fn charge_for_the_previous_product_never_reaches_the_next() {
        let mut controller = CheckoutController::default();
        controller.open(&book(), None);
        let first = controller.begin_submit(&jane()).unwrap();

        controller.close();
        controller.open(&Product { id: 2, ..book() }, None);
        let second = controller.begin_submit(&jane()).unwrap();
        assert_eq!(second.request.product_id, 2);

        assert!(matches!(
            controller.finish_submit(first.session_id, Ok(charge("PRODUCT1"))),
            SubmitOutcome::Discarded
        ));
        match controller.finish_submit(second.session_id, Ok(charge("PRODUCT2"))) {
            SubmitOutcome::Paid(charge) => assert_eq!(charge.qr_code_text, "PRODUCT2"),
            other => panic!("expected a paid outcome, got {other:?}"),
        }
    }

    #[test]
    fn reopening_the_same_product_drops_the_older_coupon_check() {
        let mut controller = CheckoutController::default();
        controller.open(&book(), None);
        let old = controller.begin_coupon("OLD").unwrap();

        controller.close();
        controller.open(&book(), None);
        let new = controller.begin_coupon("NEW").unwrap();

        let stale = serde_json::from_value::<CouponValidation>(json!({
            "status": "success",
            "cupom": {"id": 1, "codigo": "OLD", "descricao": "R$ 1 OFF"},
            "calculo": {
                "valor_original": 19.9,
                "desconto": 1,
                "percentual_aplicado": 5,
                "valor_final": 18.9
            }
        }))
        .unwrap();
        assert_eq!(
            controller.finish_coupon(old.session_id, Ok(stale)),
            CouponOutcome::Discarded
        );
        assert!(matches!(
            controller.coupon_state(),
            CouponState::Checking { code, .. } if code == "NEW"
        ));
        assert_eq!(
            controller.session().map(CheckoutSession::final_price),
            Some(Decimal::new(1990, 2))
        );
        assert_ne!(old.session_id, new.session_id);
    }

    #[test]
    fn nothing_to_submit_without_a_product() {
        let mut controller = CheckoutController::default();
        assert_eq!(controller.begin_submit(&jane()), Err(SubmitError::NoProduct));
        assert_eq!(
            controller.begin_coupon("PROMO10"),
            Err(CouponError::UnknownProduct)
        );
    }
}
