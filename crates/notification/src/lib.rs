pub mod contact;
mod relay;
mod service;
pub(crate) mod template;

pub use contact::{ContactNotifier, ContactSubmission};
pub use relay::*;
pub use service::*;

rust_i18n::i18n!("locales", fallback = "en");
