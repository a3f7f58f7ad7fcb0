// In-process stores for development, tests and single-instance deployments.
mod otp_store;
mod user_store;

pub use otp_store::MemoryOtpStore;
pub use user_store::MemoryUserStore;
