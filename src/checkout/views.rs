//! View models for the checkout modal and their maud rendering.
//!
//! Everything here is a pure function of controller state; handlers decide
//! which view to send back and never format markup themselves.

use maud::{html, Markup, Render};
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::json;

use super::{
    coupon::CouponState,
    session::CheckoutSession,
    validate::{CheckoutForm, Field, FieldErrors},
};
use crate::{
    api::{ChargeResponse, CouponQuote, Seller},
    icons,
};

/// `R$ 1234,50` style amount.
pub fn format_brl(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("R$ {:.2}", rounded).replace('.', ",")
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBreakdownView {
    pub original: Decimal,
    pub discount: Decimal,
    pub percentage: Decimal,
    pub final_value: Decimal,
}

impl From<&CouponQuote> for PriceBreakdownView {
    fn from(quote: &CouponQuote) -> Self {
        Self {
            original: quote.original_value,
            discount: quote.discount_value,
            percentage: quote.applied_percentage,
            final_value: quote.final_value,
        }
    }
}

impl Render for PriceBreakdownView {
    fn render(&self) -> Markup {
        let percentage = format!("{:.0}", self.percentage.round());
        html! {
            #"preco-resumo" ."bg-base-200"."rounded-box"."p-3"."my-2" {
                ."flex"."justify-between" {
                    span {"Preço original"}
                    span #"preco-original" ."line-through" {(format_brl(self.original))}
                }
                ."flex"."justify-between"."text-success" {
                    span {"Desconto"}
                    span #"valor-desconto" {"-"(format_brl(self.discount))" ("(percentage)"%)"}
                }
                ."flex"."justify-between"."font-bold" {
                    span {"Total"}
                    span #"preco-final" {
                        (format_brl(self.final_value))
                        " " span ."badge"."badge-success" {"-"(percentage)"%"}
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CouponStatusView {
    Applied { code: String, description: String },
    Error(String),
}

impl Render for CouponStatusView {
    fn render(&self) -> Markup {
        html! {
            @match self {
                Self::Applied { code, description } => {
                    #"cupom-status" ."text-success"."text-sm"."flex"."gap-1"."items-center" {
                        (icons::check()) span {"Cupom "(code)" aplicado! "(description)}
                    }
                }
                Self::Error(message) => {
                    #"cupom-status" ."text-error"."text-sm" { span {(message)} }
                }
            }
        }
    }
}

/// Coupon input, apply button, status line and price breakdown.
pub struct CouponBlockView<'a> {
    pub base: &'a str,
    pub state: &'a CouponState,
    pub typed_code: &'a str,
    /// Message for a check that was refused locally; the state did not change.
    pub hint: Option<String>,
}

impl CouponBlockView<'_> {
    fn status(&self) -> Option<CouponStatusView> {
        if let Some(hint) = &self.hint {
            return Some(CouponStatusView::Error(hint.clone()));
        }
        match self.state {
            CouponState::Applied { coupon, .. } => Some(CouponStatusView::Applied {
                code: coupon.code.clone(),
                description: coupon.description.clone(),
            }),
            CouponState::Rejected { message } => Some(CouponStatusView::Error(message.clone())),
            CouponState::Idle | CouponState::Checking { .. } => None,
        }
    }
}

impl Render for CouponBlockView<'_> {
    fn render(&self) -> Markup {
        let (applied, code) = match self.state {
            CouponState::Applied { coupon, .. } => (true, coupon.code.as_str()),
            _ => (false, self.typed_code),
        };
        let breakdown = match self.state {
            CouponState::Applied { quote, .. } => Some(PriceBreakdownView::from(quote)),
            _ => None,
        };

        html! {
            #"cupom-bloco" ."form-control"."w-full" {
                ."label" { span ."label-text" {"Cupom de desconto (opcional)"} }
                ."join"."w-full" {
                    input #"checkout_cupom" type="text" name="coupon_code" value=(code) disabled[applied]
                        placeholder="EX: PROMO10" autocomplete="off" ."input"."input-bordered"."join-item"."w-full"."uppercase"
                        hx-post={(self.base)"/coupon"} hx-trigger="keydown[key=='Enter']" hx-target="#cupom-bloco" hx-swap="outerHTML"
                        onkeydown="if (event.key === 'Enter') { event.preventDefault(); }";
                    @if applied {
                        button #"btn-aplicar-cupom" type="button" disabled ."btn"."btn-success"."join-item" {
                            (icons::check()) "Aplicado"
                        }
                    } @else {
                        button #"btn-aplicar-cupom" type="button" ."btn"."btn-outline"."btn-primary"."join-item"
                            hx-post={(self.base)"/coupon"} hx-include="#checkout_cupom" hx-target="#cupom-bloco" hx-swap="outerHTML" hx-disabled-elt="this" {
                            span ."loading"."loading-spinner"."loading-xs"."htmx-indicator" {}
                            "Aplicar"
                        }
                    }
                }
                @if let Some(status) = self.status() { (status) }
                @if let Some(breakdown) = breakdown { (breakdown) }
            }
        }
    }
}

/// Seller selector, or nothing when there are no sellers to offer.
pub fn seller_select(sellers: &[Seller], selected: &str) -> Markup {
    html! {
        @if !sellers.is_empty() {
            #"checkout-vendedor" ."form-control"."w-full" {
                ."label" { span ."label-text" {"Vendedor (opcional)"} }
                select #"checkout_vendedor" name="seller_code" ."select"."select-bordered"."w-full" {
                    option value="" selected[selected.is_empty()] {"Nenhum"}
                    @for seller in sellers {
                        option value=(seller.code) selected[seller.code == selected] {(seller.display_name)}
                    }
                }
            }
        }
    }
}

pub fn phone_input(base: &str, value: &str) -> Markup {
    html! {
        input #"checkout_telefone" type="tel" name="phone" value=(value) required inputmode="numeric" maxlength="15"
            placeholder="(11) 98765-4321" autocomplete="tel" ."input"."input-bordered"."w-full"
            hx-post={(base)"/phone"} hx-trigger="input changed" hx-target="this" hx-swap="outerHTML";
    }
}

fn field_error(errors: Option<&FieldErrors>, field: Field) -> Markup {
    html! {
        @if let Some(message) = errors.and_then(|errors| errors.get(field)) {
            ."field-error"."label" { span ."label-text-alt"."text-error" {(message)} }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorView {
    pub message: String,
}

impl Render for ErrorView {
    fn render(&self) -> Markup {
        html! {
            ."alert"."alert-error"."my-2" role="alert" { (icons::error()) span {(self.message)} }
        }
    }
}

/// Product header plus the editable order form.
pub struct CheckoutModalView<'a> {
    pub base: &'a str,
    pub session: &'a CheckoutSession,
    pub form: &'a CheckoutForm,
    pub errors: Option<&'a FieldErrors>,
    pub coupon: CouponBlockView<'a>,
    pub failure: Option<ErrorView>,
}

impl Render for CheckoutModalView<'_> {
    fn render(&self) -> Markup {
        let phone = self.form.phone.as_deref().unwrap_or_default();
        let selected_seller = self.form.seller_code.as_deref().unwrap_or_default();
        let input_class = |field| match self.errors.and_then(|errors| errors.get(field)) {
            Some(_) => "input input-bordered w-full input-error",
            None => "input input-bordered w-full",
        };

        html! {
            #"checkout" {
                #"checkout-produto-detalhes" {
                    h3 ."font-bold"."text-xl" {(self.session.product_name)}
                    p ."checkout-preco"."text-2xl"."font-bold"."text-primary" {(format_brl(self.session.original_price))}
                }
                #"checkout-resultado" { @if let Some(failure) = &self.failure { (failure) } }
                ."divider" {}
                form #"checkout-form" hx-post={(self.base)"/submit"} hx-target="#checkout" hx-swap="outerHTML"
                    hx-indicator="#checkout-loading" hx-disabled-elt="find button[type='submit']"
                    hx-on--before-request="this.classList.add('hidden')" novalidate {
                    ."form-control"."w-full" {
                        ."label" { span ."label-text" {"Nome completo"} }
                        input #"checkout_nome" type="text" name="name" value=(self.form.name) required autocomplete="name"
                            class=(input_class(Field::Name));
                        (field_error(self.errors, Field::Name))
                    }
                    ."form-control"."w-full" {
                        ."label" { span ."label-text" {"Email"} }
                        input #"checkout_email" type="email" name="email" value=(self.form.email) required autocomplete="email"
                            class=(input_class(Field::Email));
                        (field_error(self.errors, Field::Email))
                    }
                    ."form-control"."w-full" {
                        ."label" { span ."label-text" {"Telefone (WhatsApp)"} }
                        (phone_input(self.base, phone))
                        (field_error(self.errors, Field::Phone))
                    }
                    (self.coupon)
                    div #"checkout-vendedor" hx-get={(self.base)"/sellers"} hx-trigger="load" hx-swap="outerHTML"
                        hx-vals=(json!({"selected": selected_seller}).to_string()) {}
                    ."form-control"."mt-4" {
                        button type="submit" ."btn"."btn-primary"."w-1/2"."mx-auto" { (icons::pix()) "GERAR PIX" }
                    }
                }
                #"checkout-loading" ."htmx-indicator"."text-center"."my-6" {
                    span ."loading"."loading-dots"."loading-lg" {}
                    p {"Gerando seu PIX..."}
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscountSummary {
    pub coupon_code: String,
    pub value: Decimal,
}

/// Successful charge, rendered once in place of the form.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeResultView {
    pub qr_image_src: String,
    pub copy_paste: String,
    pub discount: Option<DiscountSummary>,
    pub amount: Option<Decimal>,
}

impl From<&ChargeResponse> for ChargeResultView {
    fn from(charge: &ChargeResponse) -> Self {
        Self {
            qr_image_src: format!("data:image/png;base64,{}", charge.qr_code_base64),
            copy_paste: charge.qr_code_text.clone(),
            discount: charge.discount.as_ref().map(|discount| DiscountSummary {
                coupon_code: discount.coupon_code.clone(),
                value: discount.discount_value,
            }),
            amount: charge.charge.as_ref().map(|summary| summary.amount),
        }
    }
}

impl Render for ChargeResultView {
    fn render(&self) -> Markup {
        html! {
            #"checkout" ."text-center" {
                ."alert"."alert-success" role="alert" {
                    (icons::success()) span {"PIX gerado! Escaneie o QR Code ou use o copia e cola."}
                }
                @if let Some(discount) = &self.discount {
                    p #"desconto-confirmado" ."text-success"."mt-2" {
                        "Cupom "(discount.coupon_code)" aplicado: -"(format_brl(discount.value))
                    }
                }
                @if let Some(amount) = self.amount {
                    p ."text-lg"."font-bold"."mt-2" {"Valor: "(format_brl(amount))}
                }
                img #"pix-qr" ."mx-auto"."my-4"."w-64"."h-64" src=(self.qr_image_src) alt="QR Code PIX";
                label ."label" for="pix-copia-cola" { span ."label-text" {"PIX copia e cola"} }
                textarea #"pix-copia-cola" readonly rows="4" ."textarea"."textarea-bordered"."w-full"."font-mono"."text-xs" {(self.copy_paste)}
                button type="button" ."btn"."btn-outline"."btn-primary"."mt-2"
                    onclick="navigator.clipboard.writeText($('#pix-copia-cola').val()); $(this).find('span').text('Copiado!');" {
                    (icons::copy()) span {"Copiar código"}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::{AppliedDiscount, ChargeSummary},
        catalog::Product,
        checkout::session::AppliedCoupon,
    };

    fn quote() -> CouponQuote {
        CouponQuote {
            original_value: Decimal::new(1990, 2),
            discount_value: Decimal::new(199, 2),
            applied_percentage: Decimal::new(1000, 2),
            final_value: Decimal::new(1791, 2),
        }
    }

    #[test]
    fn formats_reais() {
        assert_eq!(format_brl(Decimal::new(1990, 2)), "R$ 19,90");
        assert_eq!(format_brl(Decimal::new(5, 0)), "R$ 5,00");
        assert_eq!(format_brl(Decimal::new(12345, 3)), "R$ 12,35");
    }

    #[test]
    fn breakdown_shows_all_amounts() {
        let markup = PriceBreakdownView::from(&quote()).render().into_string();
        assert!(markup.contains("R$ 19,90"));
        assert!(markup.contains("-R$ 1,99 (10%)"));
        assert!(markup.contains("R$ 17,91"));
    }

    #[test]
    fn applied_coupon_locks_controls() {
        let state = CouponState::Applied {
            coupon: AppliedCoupon {
                id: 1,
                code: "PROMO10".into(),
                description: "10% off".into(),
            },
            quote: quote(),
        };
        let markup = CouponBlockView {
            base: "/checkout",
            state: &state,
            typed_code: "",
            hint: None,
        }
        .render()
        .into_string();
        assert!(markup.contains("disabled"));
        assert!(markup.contains("Aplicado"));
        assert!(markup.contains("Cupom PROMO10 aplicado!"));
        assert!(markup.contains("preco-resumo"));
    }

    #[test]
    fn idle_coupon_block_has_no_breakdown() {
        let markup = CouponBlockView {
            base: "/checkout",
            state: &CouponState::Idle,
            typed_code: "abc",
            hint: Some("Digite um código de cupom".into()),
        }
        .render()
        .into_string();
        assert!(!markup.contains("preco-resumo"));
        assert!(markup.contains("Digite um código de cupom"));
        assert!(markup.contains(r#"hx-post="/checkout/coupon""#));
    }

    #[test]
    fn charge_result_shows_qr_and_text_verbatim() {
        let view = ChargeResultView::from(&ChargeResponse {
            qr_code_base64: "iVBORw0KGgo=".into(),
            qr_code_text: "000201010212".into(),
            discount: Some(AppliedDiscount {
                coupon_code: "PROMO10".into(),
                discount_value: Decimal::new(199, 2),
            }),
            charge: Some(ChargeSummary {
                amount: Decimal::new(1791, 2),
            }),
        });
        let markup = view.render().into_string();
        assert!(markup.contains(r#"src="data:image/png;base64,iVBORw0KGgo=""#));
        assert!(markup.contains(">000201010212</textarea>"));
        assert!(markup.contains("Cupom PROMO10 aplicado: -R$ 1,99"));
        assert!(markup.contains("Valor: R$ 17,91"));
    }

    #[test]
    fn modal_marks_failing_fields() {
        let session = CheckoutSession::for_product(
            &Product {
                id: 1,
                name: "Book".into(),
                price: Decimal::new(1990, 2),
                description: None,
                image_url: None,
            },
            None,
        );
        let form = CheckoutForm {
            name: "J".into(),
            email: "jane@x.com".into(),
            ..Default::default()
        };
        let errors = crate::checkout::validate::validate(&form).unwrap_err();
        let markup = CheckoutModalView {
            base: "/checkout",
            session: &session,
            form: &form,
            errors: Some(&errors),
            coupon: CouponBlockView {
                base: "/checkout",
                state: &CouponState::Idle,
                typed_code: "",
                hint: None,
            },
            failure: Some(ErrorView {
                message: "Falha ao criar cobrança".into(),
            }),
        }
        .render()
        .into_string();

        assert!(markup.contains("Por favor, insira seu nome completo."));
        assert!(markup.contains("input-error"));
        assert!(markup.contains("Falha ao criar cobrança"));
        assert!(markup.contains(r#"hx-get="/checkout/sellers""#));
        assert!(markup.contains("R$ 19,90"));
    }

    #[test]
    fn seller_select_keeps_choice_and_hides_when_empty() {
        let sellers = [
            Seller {
                code: "ANA01".into(),
                display_name: "Ana".into(),
            },
            Seller {
                code: "BIA02".into(),
                display_name: "Bia".into(),
            },
        ];
        let markup = seller_select(&sellers, "BIA02").into_string();
        assert!(markup.contains(r#"<option value="ANA01">Ana</option>"#));
        assert!(markup.contains(r#"<option value="BIA02" selected>Bia</option>"#));

        assert!(seller_select(&[], "").into_string().is_empty());
    }
}
