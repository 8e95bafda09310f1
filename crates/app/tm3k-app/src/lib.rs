//! Application core of the TM3K to-do app.
//!
//! Everything here is platform independent: the browser front end renders the
//! state held by these types and forwards user actions to them.
//!
//! - [`TaskEditor`]: the in-memory task list (add, toggle, remove).
//! - [`SessionGate`]: decides between loading, the task editor and the login view.
//! - [`AuthForm`]: email/password sign-in and sign-up.

pub mod auth_form;
pub mod config;
pub mod context;
pub mod gate;
pub mod notify;
pub mod route;
pub mod task;

pub use auth_form::AuthForm;
pub use config::{AppConfig, AuthBackend};
pub use context::SessionContext;
pub use gate::{GateState, GateStatus, SessionGate};
pub use notify::{Notification, NotificationLog, NotificationVariant, Notifier};
pub use route::{Navigator, Route};
pub use task::{Task, TaskEditor, TaskId};
