//! Browser front end: wires the app core to the DOM with dominator.

#[macro_use]
extern crate dominator;

pub mod navigation;
pub mod storage;
pub mod toasts;
mod views;

use anyhow::Context;
use dominator::{Dom, routing};
use futures_signals::signal::{Signal, SignalExt};
use std::sync::Arc;
use tm3k_app::{AppConfig, AuthBackend, Route, TaskEditor};
use tm3k_auth_core::AuthClient;
use tm3k_identity_hosted::{HostedAuthClient, HostedAuthConfig};
use tm3k_identity_local::LocalAuthClient;
use tracing::info;
use wasm_bindgen::prelude::*;

use navigation::BrowserNavigator;
use storage::LocalStorageSessionStore;
use toasts::Toasts;

const CONFIG: &str = include_str!("../tm3k.toml");

/// Long-lived state shared by every view of the page.
pub struct App {
    client: Arc<dyn AuthClient>,
    navigator: Arc<BrowserNavigator>,
    toasts: Arc<Toasts>,
    // One list per page session; it survives route changes but not a reload.
    editor: Arc<TaskEditor>,
    redirect_to: String,
}

impl App {
    pub fn new(config: &AppConfig, origin: &str) -> anyhow::Result<Arc<Self>> {
        Ok(Arc::new(Self {
            client: build_client(config)?,
            navigator: Arc::new(BrowserNavigator),
            toasts: Arc::new(Toasts::default()),
            editor: Arc::new(TaskEditor::seeded()),
            redirect_to: config.redirect_target(origin),
        }))
    }

    fn render(app: Arc<Self>) -> Dom {
        html!("div", {
            .class("tm3k-app")
            .child_signal(route_signal().map(clone!(app => move |route| {
                Some(match route {
                    Route::Main => views::main::render(&app),
                    Route::Login => views::login::render(&app),
                })
            })))
            .child(app.toasts.render())
        })
    }
}

fn route_signal() -> impl Signal<Item = Route> {
    routing::url()
        .signal_ref(|url| Route::from_url(url))
        .dedupe()
}

fn build_client(config: &AppConfig) -> anyhow::Result<Arc<dyn AuthClient>> {
    match config.auth.backend {
        AuthBackend::Hosted => {
            let url = config.auth.url.clone().context("auth.url is not set")?;
            let anon_key = config
                .auth
                .anon_key
                .clone()
                .context("auth.anon_key is not set")?;
            let client = HostedAuthClient::new(
                HostedAuthConfig::new(url, anon_key),
                Arc::new(LocalStorageSessionStore::default()),
            )
            .context("Failed to create hosted auth client")?;
            info!("Using hosted auth backend");
            Ok(Arc::new(client))
        }
        AuthBackend::Local => {
            info!(
                auto_confirm = config.auth.auto_confirm,
                "Using in-page auth backend"
            );
            Ok(Arc::new(
                LocalAuthClient::new().with_auto_confirm(config.auth.auto_confirm),
            ))
        }
    }
}

fn init_logging(config: &AppConfig) -> anyhow::Result<()> {
    let level = config.log_level()?;
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(level)
            .build(),
    );
    Ok(())
}

fn to_js(error: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{error:#}"))
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let config = AppConfig::from_toml_str(CONFIG).map_err(to_js)?;
    init_logging(&config).map_err(to_js)?;

    let origin = gloo_utils::window().location().origin()?;
    let app = App::new(&config, &origin).map_err(to_js)?;

    info!(%origin, "Starting TASK MANAGER 3000");
    dominator::append_dom(&dominator::body(), App::render(app));
    Ok(())
}
