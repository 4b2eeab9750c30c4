pub mod button;

pub use button::{Button, ButtonVariant};

/// Blocking user-facing primitives: alerts, confirmations and navigation.
///
/// Implementations decide how these surface (a browser, a terminal, a test
/// recorder); callers only rely on `confirm` blocking until answered.
pub trait Dialogs {
    fn alert(&self, message: &str);
    fn confirm(&self, message: &str) -> bool;
    /// Show `url` without leaving the current view.
    fn open_in_new_context(&self, url: &str);
    /// Navigate away to `url`.
    fn redirect(&self, url: &str);
}
