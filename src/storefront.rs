use axum::extract::{Query, State};
use axum_extra::extract::CookieJar;
use maud::{html, Markup};
use serde::Deserialize;
use serde_json::json;

use crate::{
    catalog::{self, DisplayMode, Product},
    checkout, components,
};

#[derive(Deserialize, Default)]
pub struct StorefrontQuery {
    produto: Option<String>,
    usuario_id: Option<String>,
}

fn buy_button(product: &Product, label: &str, user_id: Option<&str>) -> Markup {
    html! {
        button ."btn"."btn-primary" hx-get={"/checkout/open/"(product.id)} hx-target="#modal-content" onclick="openModal()"
            hx-vals=[user_id.map(|id| json!({"usuario_id": id}).to_string())] {
            (label)
        }
    }
}

fn product_card(product: &Product, user_id: Option<&str>) -> Markup {
    html! {
        ."card"."bg-base-200"."shadow-xl" data-product-id=(product.id) {
            @if let Some(image_url) = &product.image_url {
                figure { img src=(image_url) alt=(product.display_name()); }
            }
            ."card-body" {
                h2 ."card-title" {(product.display_name())}
                @if let Some(description) = &product.description { p {(description)} }
                p ."text-xl"."font-bold"."text-primary" {(checkout::format_brl(product.price))}
                ."card-actions"."justify-end" { (buy_button(product, "COMPRAR", user_id)) }
            }
        }
    }
}

fn catalog_grid(products: &[Product], user_id: Option<&str>) -> Markup {
    html! {
        section #"main-store" ."grid"."gap-4"."sm:grid-cols-2"."lg:grid-cols-3"."max-w-6xl"."mx-auto" {
            @for product in products { (product_card(product, user_id)) }
            @if products.is_empty() {
                ."alert"."alert-info" { span {"Nenhum produto disponível no momento."} }
            }
        }
    }
}

fn spotlight(product: &Product, user_id: Option<&str>) -> Markup {
    html! {
        section #"spotlight-container" ."hero"."bg-base-200"."rounded-box"."max-w-3xl"."mx-auto"."py-10" {
            ."hero-content"."flex-col"."lg:flex-row" {
                @if let Some(image_url) = &product.image_url {
                    img ."max-w-sm"."rounded-lg"."shadow-2xl" src=(image_url) alt=(product.display_name());
                }
                div {
                    h1 ."text-4xl"."font-bold" {(product.display_name())}
                    @if let Some(description) = &product.description { p ."py-4" {(description)} }
                    p ."text-3xl"."font-bold"."text-primary"."mb-4" {(checkout::format_brl(product.price))}
                    (buy_button(product, "COMPRAR AGORA", user_id))
                }
            }
        }
        ."text-center"."my-6" { a ."link"."link-secondary" href="/" {"Ver todos os produtos"} }
    }
}

/// Storefront page. The visitor cookie set here keys the checkout opened from it.
pub async fn page(
    jar: CookieJar,
    Query(params): Query<StorefrontQuery>,
    State(state): State<crate::AppState>,
) -> (CookieJar, Markup) {
    let user_id = params
        .usuario_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());
    let (jar, _) = checkout::visitor(jar);

    let content = match catalog::select_mode(&state.settings.catalog, params.produto.as_deref()) {
        DisplayMode::Catalog(products) => catalog_grid(products, user_id),
        DisplayMode::Spotlight(product) => spotlight(product, user_id),
    };

    let navbar = html! {
        ."flex-1" { a ."btn"."btn-ghost"."text-xl" href="/" {"Loja PIX"} }
    };

    (jar, components::layout(navbar, Some(content)))
}
