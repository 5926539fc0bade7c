//! Domain models for the Fable API.

pub mod audiobook;
pub mod billing;
pub mod chapter;
pub mod purchase;
pub mod session;
pub mod subscription;
pub mod user;

pub use audiobook::Audiobook;
pub use billing::{AppSetting, BillingProfile, ExternalService};
pub use chapter::Chapter;
pub use purchase::Purchase;
pub use session::{CurrentUser, session_keys};
pub use subscription::{Plan, Subscription};
pub use user::User;
