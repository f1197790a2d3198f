//! Business logic services for the storefront.

pub mod auth;
pub mod gift_cards;
pub mod mailer;

pub use auth::{AuthError, AuthService};
pub use gift_cards::{RedemptionError, RedemptionService};
pub use mailer::{Mailer, MailerError};
