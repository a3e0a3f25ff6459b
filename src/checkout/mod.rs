mod controller;
mod coupon;
mod phone;
mod session;
mod submit;
mod validate;
mod views;

pub use self::{controller::CheckoutController, validate::CheckoutForm, views::format_brl};

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

use axum::{
    extract::{NestedPath, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use maud::{html, Markup, Render};
use serde::Deserialize;
use uuid::Uuid;

use self::{
    coupon::{CouponError, CouponOutcome, CouponState},
    submit::{SubmitError, SubmitOutcome},
    validate::FieldErrors,
    views::{ChargeResultView, CheckoutModalView, CouponBlockView, ErrorView},
};
use crate::{
    components::ToastAlert,
    err_responses::{ErrorResponse, MapErrorResponse},
};

const VISITOR_COOKIE: &str = "checkout_visitor";

#[derive(Debug)]
struct Entry {
    last_seen: Instant,
    controller: CheckoutController,
}

/// Open checkouts keyed by visitor cookie.
///
/// An entry exists from opening the modal until it is closed or sits idle
/// for longer than `idle`. The lock is only taken around pure controller
/// transitions, never across a call to the payment API.
#[derive(Clone)]
pub struct Visitors {
    entries: Arc<Mutex<HashMap<Uuid, Entry>>>,
    idle: Duration,
}

impl Visitors {
    pub fn new(idle: Duration) -> Self {
        Self {
            entries: Arc::default(),
            idle,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` on the visitor's controller, starting one if needed. Idle checkouts are dropped on the way.
    pub fn open<R>(&self, visitor: Uuid, f: impl FnOnce(&mut CheckoutController) -> R) -> R {
        let mut entries = self.lock();
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|id, entry| *id == visitor || now.duration_since(entry.last_seen) < self.idle);
        if entries.len() < before {
            tracing::debug!(dropped = before - entries.len(), "expired idle checkouts");
        }

        let entry = entries.entry(visitor).or_insert_with(|| Entry {
            last_seen: now,
            controller: CheckoutController::default(),
        });
        entry.last_seen = now;
        f(&mut entry.controller)
    }

    /// Runs `f` on the visitor's open checkout; `None` when there is none.
    pub fn with<R>(&self, visitor: Uuid, f: impl FnOnce(&mut CheckoutController) -> R) -> Option<R> {
        let mut entries = self.lock();
        let now = Instant::now();
        if entries
            .get(&visitor)
            .is_some_and(|entry| now.duration_since(entry.last_seen) >= self.idle)
        {
            entries.remove(&visitor);
            return None;
        }
        let entry = entries.get_mut(&visitor)?;
        entry.last_seen = now;
        Some(f(&mut entry.controller))
    }

    pub fn close(&self, visitor: Uuid) {
        if let Some(mut entry) = self.lock().remove(&visitor) {
            entry.controller.close();
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.lock().len()
    }
}

fn existing_visitor(jar: &CookieJar) -> Option<Uuid> {
    jar.get(VISITOR_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

pub fn visitor(jar: CookieJar) -> (CookieJar, Uuid) {
    if let Some(visitor) = existing_visitor(&jar) {
        return (jar, visitor);
    }
    let visitor = Uuid::new_v4();
    let cookie = Cookie::build((VISITOR_COOKIE, visitor.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (jar.add(cookie), visitor)
}

fn render_modal(
    base: &str,
    controller: &CheckoutController,
    form: &CheckoutForm,
    errors: Option<&FieldErrors>,
    failure: Option<ErrorView>,
) -> Option<Markup> {
    let session = controller.session()?;
    let typed_code = form.coupon_code.as_deref().unwrap_or_default();
    Some(
        CheckoutModalView {
            base,
            session,
            form,
            errors,
            coupon: CouponBlockView {
                base,
                state: controller.coupon_state(),
                typed_code,
                hint: None,
            },
            failure,
        }
        .render(),
    )
}

#[derive(Deserialize, Default)]
struct OpenQuery {
    usuario_id: Option<String>,
}

async fn open(
    nest: NestedPath,
    jar: CookieJar,
    Path(product_id): Path<i64>,
    Query(query): Query<OpenQuery>,
    State(state): State<crate::AppState>,
) -> Result<(CookieJar, Markup), Response> {
    let product = state
        .settings
        .catalog
        .find(product_id)
        .ok_or("Produto não encontrado")
        .map_err_response(ErrorResponse::Alert)?;

    let user_id = query
        .usuario_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty());
    let (jar, visitor) = visitor(jar);
    let markup = state.visitors.open(visitor, |controller| {
        controller.open(product, user_id);
        render_modal(
            nest.as_str(),
            controller,
            &CheckoutForm::default(),
            None,
            None,
        )
    });

    Ok((
        jar,
        markup
            .ok_or("Erro: Produto não identificado")
            .map_err_response(ErrorResponse::Alert)?,
    ))
}

async fn close(jar: CookieJar, State(state): State<crate::AppState>) -> StatusCode {
    if let Some(visitor) = existing_visitor(&jar) {
        state.visitors.close(visitor);
    }
    StatusCode::NO_CONTENT
}

#[derive(Deserialize)]
struct PhoneFormData {
    #[serde(default)]
    phone: String,
}

async fn phone_mask(nest: NestedPath, Form(form): Form<PhoneFormData>) -> Markup {
    views::phone_input(nest.as_str(), &phone::format(&form.phone))
}

#[derive(Deserialize, Default)]
struct SellerQuery {
    #[serde(default)]
    selected: String,
}

async fn sellers(State(state): State<crate::AppState>, Query(query): Query<SellerQuery>) -> Markup {
    let sellers = match state.api.list_sellers().await {
        Ok(sellers) => sellers,
        Err(err) => {
            tracing::debug!(error = %err, "seller list unavailable, leaving the selector out");
            Vec::new()
        }
    };
    views::seller_select(&sellers, &query.selected)
}

#[derive(Deserialize)]
struct CouponFormData {
    #[serde(default)]
    coupon_code: String,
}

async fn apply_coupon(
    nest: NestedPath,
    jar: CookieJar,
    State(state): State<crate::AppState>,
    Form(form): Form<CouponFormData>,
) -> (CookieJar, Markup) {
    let (jar, visitor) = visitor(jar);
    let base = nest.as_str();
    let idle = CouponState::Idle;
    let block = |coupon_state: &CouponState, hint: Option<String>| {
        CouponBlockView {
            base,
            state: coupon_state,
            typed_code: &form.coupon_code,
            hint,
        }
        .render()
    };
    let no_checkout = || block(&idle, Some(CouponError::UnknownProduct.to_string()));

    let pending = state.visitors.with(visitor, |controller| {
        controller
            .begin_coupon(&form.coupon_code)
            .map_err(|err| block(controller.coupon_state(), Some(err.to_string())))
    });
    let pending = match pending {
        Some(Ok(pending)) => pending,
        Some(Err(markup)) => return (jar, markup),
        None => return (jar, no_checkout()),
    };

    let result = state.api.validate_coupon(&pending.request).await;

    let duration = state.settings.toast_duration;
    let markup = state.visitors.with(visitor, |controller| {
        let toast = match controller.finish_coupon(pending.session_id, result) {
            CouponOutcome::Applied { coupon, .. } => {
                let message = format!("Desconto de {} aplicado!", coupon.description);
                Some(ToastAlert::Success(&message).render_for(duration))
            }
            CouponOutcome::Rejected { .. } | CouponOutcome::Discarded => None,
        };
        html! {
            (block(controller.coupon_state(), None))
            @if let Some(toast) = toast { (toast) }
        }
    });

    (jar, markup.unwrap_or_else(no_checkout))
}

fn modal_or_alert(
    base: &str,
    controller: &CheckoutController,
    form: &CheckoutForm,
    errors: Option<&FieldErrors>,
    failure: Option<ErrorView>,
) -> Response {
    match render_modal(base, controller, form, errors, failure) {
        Some(markup) => markup.into_response(),
        None => ErrorResponse::Alert.transform(SubmitError::NoProduct),
    }
}

async fn submit(
    nest: NestedPath,
    jar: CookieJar,
    State(state): State<crate::AppState>,
    Form(form): Form<CheckoutForm>,
) -> Result<(CookieJar, Markup), Response> {
    let (jar, visitor) = visitor(jar);
    let base = nest.as_str();

    let pending = state
        .visitors
        .with(visitor, |controller| match controller.begin_submit(&form) {
            Ok(pending) => Ok(pending),
            Err(SubmitError::Invalid(errors)) => {
                Err(modal_or_alert(base, controller, &form, Some(&errors), None))
            }
            Err(err @ SubmitError::NoProduct) => Err(ErrorResponse::Alert.transform(err)),
            // The form hid itself when posting, so it comes back with the reason.
            Err(err) => {
                let failure = ErrorView {
                    message: err.to_string(),
                };
                Err(modal_or_alert(base, controller, &form, None, Some(failure)))
            }
        })
        .unwrap_or_else(|| Err(ErrorResponse::Alert.transform(SubmitError::NoProduct)))?;

    let result = state.api.create_charge(&pending.request).await;

    let duration = state.settings.toast_duration;
    let discarded =
        || ToastAlert::Info("O checkout foi encerrado antes da resposta.").render_for(duration);
    let markup = state.visitors.with(visitor, |controller| {
        match controller.finish_submit(pending.session_id, result) {
            SubmitOutcome::Paid(charge) => {
                tracing::info!(product_id = pending.request.product_id, "PIX charge created");
                html! {
                    (ChargeResultView::from(&charge))
                    (ToastAlert::Success("PIX gerado com sucesso!").render_for(duration))
                }
            }
            SubmitOutcome::Failed { message } => {
                let failure = ErrorView {
                    message: message.clone(),
                };
                html! {
                    @if let Some(modal) = render_modal(base, controller, &form, None, Some(failure)) { (modal) }
                    (ToastAlert::Error(&message).render_for(duration))
                }
            }
            SubmitOutcome::Discarded => discarded(),
        }
    });

    Ok((jar, markup.unwrap_or_else(discarded)))
}

pub fn router(state: crate::AppState) -> Router {
    Router::new()
        .route("/open/{product_id}", get(open))
        .route("/close", post(close))
        .route("/phone", post(phone_mask))
        .route("/sellers", get(sellers))
        .route("/coupon", post(apply_coupon))
        .route("/submit", post(submit))
        .with_state(state)
}
