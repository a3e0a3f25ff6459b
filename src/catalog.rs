use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Product {
    /// Name shown in the storefront and the checkout header; blank names read "Produto".
    pub fn display_name(&self) -> &str {
        match self.name.trim() {
            "" => "Produto",
            name => name,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Vec<Product>>(raw).map(Self::new)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn find(&self, product_id: i64) -> Option<&Product> {
        self.products.iter().find(|product| product.id == product_id)
    }
}

#[derive(Debug, PartialEq)]
pub enum DisplayMode<'a> {
    Catalog(&'a [Product]),
    Spotlight(&'a Product),
}

/// Picks the page layout from the `produto` query parameter.
///
/// Anything that does not resolve to a catalog entry degrades to the full grid.
pub fn select_mode<'a>(catalog: &'a Catalog, spotlight: Option<&str>) -> DisplayMode<'a> {
    let Some(raw) = spotlight.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return DisplayMode::Catalog(catalog.products());
    };

    match raw.parse::<i64>().ok().and_then(|id| catalog.find(id)) {
        Some(product) => {
            tracing::info!(product_id = product.id, "rendering spotlight product");
            DisplayMode::Spotlight(product)
        }
        None => {
            tracing::warn!(
                requested = raw,
                "spotlight product not found, falling back to catalog"
            );
            DisplayMode::Catalog(catalog.products())
        }
    }
}
