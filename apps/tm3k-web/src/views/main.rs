//! The main route: a session gate in front of the task editor.

use crate::App;
use dominator::Dom;
use futures_signals::signal::SignalExt;
use std::sync::Arc;
use tm3k_app::{GateStatus, SessionGate};

use super::tasks;

pub fn render(app: &Arc<App>) -> Dom {
    let gate = SessionGate::new(app.client.clone(), app.navigator.clone());

    html!("main", {
        .class("tm3k-main")
        .future(clone!(gate => async move {
            gate.activate().await;
        }))
        .after_removed(clone!(gate => move |_| gate.deactivate()))
        .child_signal(gate.status_signal().map(clone!(app, gate => move |status| {
            match status {
                GateStatus::Loading => Some(render_loading()),
                GateStatus::Authenticated => gate
                    .context()
                    .map(|context| tasks::render(&app, context)),
                // The gate has already sent the user to the login view.
                GateStatus::Unauthenticated => None,
            }
        })))
    })
}

fn render_loading() -> Dom {
    html!("div", {
        .class("tm3k-loading")
        .attr("aria-busy", "true")
        .text("Loading...")
    })
}
