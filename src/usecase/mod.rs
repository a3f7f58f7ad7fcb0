// Application use cases, one module per login method.
// Each flow depends only on domain traits.

mod otp_login;
mod password_login;
mod phone_locks;

pub use otp_login::OtpAuthFlow;
pub use password_login::PasswordAuthFlow;
pub use phone_locks::PhoneLocks;
