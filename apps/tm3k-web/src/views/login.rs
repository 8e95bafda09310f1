//! The `/auth` route: email/password sign-in and sign-up.

use crate::App;
use dominator::{Dom, events};
use futures_signals::map_ref;
use futures_signals::signal::{Mutable, Signal};
use std::sync::Arc;
use tm3k_app::AuthForm;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;

pub fn render(app: &Arc<App>) -> Dom {
    let form = Arc::new(AuthForm::new(
        app.client.clone(),
        app.navigator.clone(),
        app.toasts.clone(),
        app.redirect_to.clone(),
    ));
    // Remembers which button started the pending call, for its label.
    let pending = Mutable::new(None::<Action>);

    html!("section", {
        .class("tm3k-login")
        .children(&mut [
            html!("h1", { .text("GET IN!") }),
            html!("input" => HtmlInputElement, {
                .attr("type", "email")
                .attr("placeholder", "your.email@example.com")
                .prop_signal("value", form.email_signal())
                .with_node!(element => {
                    .event(clone!(form => move |_: events::Input| form.set_email(element.value())))
                })
                .event(clone!(form, pending => move |event: events::KeyDown| {
                    if event.key() == "Enter" {
                        start(&form, &pending, Action::SignIn);
                    }
                }))
            }),
            html!("input" => HtmlInputElement, {
                .attr("type", "password")
                .attr("placeholder", "password")
                .prop_signal("value", form.password_signal())
                .with_node!(element => {
                    .event(clone!(form => move |_: events::Input| form.set_password(element.value())))
                })
                .event(clone!(form, pending => move |event: events::KeyDown| {
                    if event.key() == "Enter" {
                        start(&form, &pending, Action::SignIn);
                    }
                }))
            }),
            html!("div", {
                .class("tm3k-login-actions")
                .children(&mut [
                    render_button(&form, &pending, Action::SignIn),
                    render_button(&form, &pending, Action::SignUp),
                ])
            }),
        ])
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    SignIn,
    SignUp,
}

impl Action {
    fn label(self) -> &'static str {
        match self {
            Action::SignIn => "LOG IN",
            Action::SignUp => "SIGN UP",
        }
    }

    fn busy_label(self) -> &'static str {
        match self {
            Action::SignIn => "WAIT...",
            Action::SignUp => "HOLD ON...",
        }
    }
}

fn render_button(form: &Arc<AuthForm>, pending: &Mutable<Option<Action>>, action: Action) -> Dom {
    html!("button", {
        .attr("type", "button")
        .prop_signal("disabled", form.busy_signal())
        .text_signal(label_signal(form, pending, action))
        .event(clone!(form, pending => move |_: events::Click| start(&form, &pending, action)))
    })
}

fn label_signal(
    form: &AuthForm,
    pending: &Mutable<Option<Action>>,
    action: Action,
) -> impl Signal<Item = &'static str> + use<> {
    map_ref! {
        let busy = form.busy_signal(),
        let started = pending.signal() => {
            if *busy && *started == Some(action) {
                action.busy_label()
            } else {
                action.label()
            }
        }
    }
}

/// Both actions share the form's busy flag, so a second click while busy is ignored.
fn start(form: &Arc<AuthForm>, pending: &Mutable<Option<Action>>, action: Action) {
    if form.is_busy() {
        return;
    }
    pending.set(Some(action));

    let form = Arc::clone(form);
    spawn_local(async move {
        match action {
            Action::SignIn => form.submit_sign_in().await,
            Action::SignUp => form.submit_sign_up().await,
        }
    });
}
