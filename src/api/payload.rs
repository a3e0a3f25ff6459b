use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChargeRequest {
    pub email: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "telefone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub product_id: i64,
    #[serde(rename = "cupom_id")]
    pub coupon_id: Option<i64>,
    #[serde(rename = "vendedor_codigo", skip_serializing_if = "Option::is_none")]
    pub seller_code: Option<String>,
    #[serde(rename = "usuario_id")]
    pub user_id: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AppliedDiscount {
    #[serde(rename = "cupom_codigo")]
    pub coupon_code: String,
    #[serde(rename = "valor_desconto")]
    pub discount_value: Decimal,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ChargeSummary {
    #[serde(rename = "valor")]
    pub amount: Decimal,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ChargeResponse {
    pub qr_code_base64: String,
    pub qr_code_text: String,
    #[serde(rename = "desconto_aplicado", default)]
    pub discount: Option<AppliedDiscount>,
    #[serde(rename = "cobranca", default)]
    pub charge: Option<ChargeSummary>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CouponValidationRequest {
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "produto_id")]
    pub product_id: i64,
    #[serde(rename = "valor_original")]
    pub original_value: Decimal,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CouponInfo {
    pub id: i64,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "descricao", default)]
    pub description: String,
}

/// Server-computed discount breakdown. Read-only on this side.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CouponQuote {
    #[serde(rename = "valor_original")]
    pub original_value: Decimal,
    #[serde(rename = "desconto")]
    pub discount_value: Decimal,
    #[serde(rename = "percentual_aplicado")]
    pub applied_percentage: Decimal,
    #[serde(rename = "valor_final")]
    pub final_value: Decimal,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CouponValidation {
    #[serde(rename = "cupom")]
    pub coupon: CouponInfo,
    #[serde(rename = "calculo")]
    pub quote: CouponQuote,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Seller {
    #[serde(rename = "codigo_ranking")]
    pub code: String,
    #[serde(rename = "nome_vendedor")]
    pub display_name: String,
}

/// Shape shared by every endpoint when it refuses a request.
#[derive(Deserialize, Debug, Default)]
pub(super) struct StatusEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
