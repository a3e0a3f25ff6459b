use std::time::Duration;

use axum::response::IntoResponse;
use maud::{html, Markup, PreEscaped, Render, DOCTYPE};

use crate::icons;

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(5000);

pub fn layout(navbar_options: Markup, main_content: Option<Markup>) -> Markup {
    html! {
        (DOCTYPE)
        html lang="pt-BR" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta http-equiv="X-UA-Compatible" content="ie=edge";
                title {"Loja PIX"}
                link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/daisyui@4.12.10/dist/full.min.css";
                link rel="stylesheet" href="/assets/styles.css";
                script src="https://cdn.tailwindcss.com" {}
            }
            body {
                header ."navbar"."bg-base-300"."lg:rounded-box"."lg:m-3"."lg:w-auto" {
                    (navbar_options)
                }
                main #"main_content" ."my-2"."lg:mx-4" { @if let Some(content) = main_content { (content) } }
                dialog #"modal"."modal"."modal-bottom"."sm:modal-middle" hx-post="/checkout/close" hx-trigger="close" hx-swap="none" {
                    ."modal-box" {
                        form method="dialog" { button ."btn"."btn-sm"."btn-circle"."btn-ghost"."absolute"."right-2"."top-2" {"✕"} }
                        progress #"modal-loading"."progress"."mt-6"."[&:has(+#modal-content:not(:empty)):not(.htmx-request)]:hidden" {}
                        div #"modal-content" {}
                    }
                    script {(PreEscaped("function openModal() { $('#modal-content').empty(); $('#modal')[0].showModal(); }"))}
                    form method="dialog" ."modal-backdrop" { button {"CLOSE"} }
                }
                #"alerts"."toast"."*:w-fit"."items-end" {}
                script src="https://unpkg.com/htmx.org@2.0.1" {}
                script src="https://code.jquery.com/jquery-3.7.1.slim.min.js" {}
            }
        }
    }
}

pub enum ToastAlert<'a> {
    Success(&'a str),
    Error(&'a str),
    Info(&'a str),
}

impl ToastAlert<'_> {
    /// Out-of-band toast that fades itself out after `duration`.
    pub fn render_for(&self, duration: Duration) -> Markup {
        let toastid = uuid::Uuid::new_v4().simple();
        let (classname, text) = match self {
            Self::Success(text) => ("alert-success", text),
            Self::Error(text) => ("alert-error", text),
            Self::Info(text) => ("alert-info", text),
        };

        html! {div hx-swap-oob="afterbegin:#alerts" {
            #{"toast_"(toastid)}."alert"."transition-opacity"."duration-300".(classname) role="alert" {
                @match self {
                    Self::Success(_) => (icons::success()),
                    Self::Error(_) => (icons::error()),
                    Self::Info(_) => (icons::info()),
                }
                span {(text)}
                script {(PreEscaped(format!("
                    setTimeout(() => {{
                        const toastElem = $('#toast_{}');
                        toastElem.on('transitionend', (event) => {{event.target.remove();}});
                        toastElem.css('opacity', 0);
                    }}, {});
                ", toastid, duration.as_millis())))}
            }
        }}
    }
}

impl Render for ToastAlert<'_> {
    fn render(&self) -> Markup {
        self.render_for(DEFAULT_TOAST_DURATION)
    }
}

impl IntoResponse for ToastAlert<'_> {
    fn into_response(self) -> axum::response::Response {
        self.render().into_response()
    }
}
