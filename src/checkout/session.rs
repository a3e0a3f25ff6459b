use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    api::{CouponInfo, CouponQuote},
    catalog::Product,
};

#[derive(Debug, Clone, PartialEq)]
pub struct AppliedCoupon {
    pub id: i64,
    pub code: String,
    pub description: String,
}

impl From<CouponInfo> for AppliedCoupon {
    fn from(info: CouponInfo) -> Self {
        Self {
            id: info.id,
            code: info.code,
            description: info.description,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum QuoteError {
    #[error("o valor final {final_value} excede o preço original {original}")]
    AboveOriginal {
        original: Decimal,
        final_value: Decimal,
    },
    #[error("o valor final não pode ser negativo")]
    Negative,
}

/// A request taken out of a workflow, tagged with the session it was built for.
///
/// The id goes back in with the response; a response for any other session is dropped.
#[derive(Debug, PartialEq)]
pub struct Pending<T> {
    pub session_id: Uuid,
    pub request: T,
}

/// Checkout state for the product currently open in the modal.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSession {
    /// Fresh for every opening, even of the same product.
    pub id: Uuid,
    pub product_id: i64,
    pub product_name: String,
    pub original_price: Decimal,
    final_price: Decimal,
    applied_coupon: Option<AppliedCoupon>,
    pub seller_code: Option<String>,
    pub user_id: Option<String>,
}

impl CheckoutSession {
    pub fn for_product(product: &Product, user_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id: product.id,
            product_name: product.display_name().to_string(),
            original_price: product.price,
            final_price: product.price,
            applied_coupon: None,
            seller_code: None,
            user_id,
        }
    }

    pub fn final_price(&self) -> Decimal {
        self.final_price
    }

    pub fn applied_coupon(&self) -> Option<&AppliedCoupon> {
        self.applied_coupon.as_ref()
    }

    /// Replaces any active coupon with `coupon`, taking the final price verbatim from `quote`.
    pub fn apply_quote(
        &mut self,
        coupon: AppliedCoupon,
        quote: &CouponQuote,
    ) -> Result<(), QuoteError> {
        if quote.final_value < Decimal::ZERO {
            return Err(QuoteError::Negative);
        }
        if quote.final_value > self.original_price {
            return Err(QuoteError::AboveOriginal {
                original: self.original_price,
                final_value: quote.final_value,
            });
        }
        self.final_price = quote.final_value;
        self.applied_coupon = Some(coupon);
        Ok(())
    }

    pub fn clear_coupon(&mut self) {
        self.applied_coupon = None;
        self.final_price = self.original_price;
    }
}
