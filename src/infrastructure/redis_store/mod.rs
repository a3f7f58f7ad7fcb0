mod redis_otp_store;

pub use redis_otp_store::{create_redis_otp_store, RedisOtpStore};
