// Gateway module - controls public API for handlers
// Modules are private, only exported symbols are public

mod account;
mod health;
mod metrics;
mod otp;
mod root;
mod shared_types;

// Core handlers
pub use health::health_check;
pub use self::metrics::{metrics_handler, track_metrics};
pub use root::root_handler;

// Phone OTP login handlers
pub use otp::{login_by_phone, request_otp};

// Username/password handlers
pub use account::{login, sign_up};
