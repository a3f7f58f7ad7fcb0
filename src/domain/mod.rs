mod clock;
mod error;
mod metrics;
mod otp;
mod otp_generator;
mod otp_store;
mod phone;
mod token;
mod user;

// Publicly expose the Metrics abstraction
pub use self::metrics::{Metrics, MetricsPtr};

// OTP challenge model and its collaborators
pub use clock::{Clock, ClockPtr, ManualClock, SystemClock};
pub use error::StoreError;
pub use otp::{OtpIssue, OtpRecord};
pub use otp_generator::{OtpGenerator, OTP_ALPHABET, OTP_CODE_LEN, OTP_EXPIRY_MINUTES};
pub use otp_store::{OtpStore, OtpStorePtr};
pub use phone::{is_valid_phone, PHONE_NUMBER_LEN};

// Accounts and tokens
pub use token::{IssuedToken, TokenIssuer, TokenIssuerPtr};
pub use user::{PasswordHasher, PasswordHasherPtr, UserCredential, UserStore, UserStorePtr};
