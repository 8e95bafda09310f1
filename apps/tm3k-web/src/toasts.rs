//! Toast popups for [`Notification`]s; each one dismisses itself after a while.

use dominator::{Dom, events};
use futures_signals::signal_vec::SignalVecExt;
use gloo_timers::future::TimeoutFuture;
use std::sync::Arc;
use tm3k_app::notify::ShownNotification;
use tm3k_app::{Notification, NotificationLog, NotificationVariant, Notifier};
use wasm_bindgen_futures::spawn_local;

pub const DISMISS_AFTER_MS: u32 = 5_000;

pub struct Toasts {
    log: Arc<NotificationLog>,
    dismiss_after_ms: u32,
}

impl Toasts {
    pub fn new(dismiss_after_ms: u32) -> Self {
        Self {
            log: Arc::new(NotificationLog::new()),
            dismiss_after_ms,
        }
    }

    pub fn render(&self) -> Dom {
        let log = Arc::clone(&self.log);
        html!("div", {
            .class("tm3k-toasts")
            .children_signal_vec(self.log.signal_vec().map(move |shown| {
                render_toast(&log, shown)
            }))
        })
    }
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new(DISMISS_AFTER_MS)
    }
}

impl Notifier for Toasts {
    fn notify(&self, notification: Notification) {
        let id = self.log.push(notification);
        let log = Arc::clone(&self.log);
        let delay = self.dismiss_after_ms;
        spawn_local(async move {
            TimeoutFuture::new(delay).await;
            log.dismiss(id);
        });
    }
}

fn render_toast(log: &Arc<NotificationLog>, shown: ShownNotification) -> Dom {
    let ShownNotification { id, notification } = shown;
    let variant_class = match notification.variant {
        NotificationVariant::Info => "tm3k-toast-info",
        NotificationVariant::Destructive => "tm3k-toast-destructive",
    };

    html!("div", {
        .class("tm3k-toast")
        .class(variant_class)
        .attr("role", "status")
        .event(clone!(log => move |_: events::Click| log.dismiss(id)))
        .child(html!("strong", { .text(&notification.title) }))
        .child(html!("p", { .text(&notification.description) }))
    })
}
