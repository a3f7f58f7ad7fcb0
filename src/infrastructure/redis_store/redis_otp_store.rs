//! OTP records in Redis, one JSON value per phone number.

use crate::domain::{OtpRecord, OtpStore, OtpStorePtr, StoreError};
use anyhow::Result;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, Script};
use std::sync::Arc;

/// Overwrite the value only if it still belongs to the same record id.
/// Returns 1 on success, 0 if the key is absent or holds another record.
const REISSUE_SCRIPT: &str = r#"
local current = redis.call('GET', KEYS[1])
if not current then
    return 0
end
if cjson.decode(current)['id'] ~= ARGV[1] then
    return 0
end
redis.call('SET', KEYS[1], ARGV[2])
return 1
"#;

pub fn create_redis_otp_store(url: &str) -> Result<OtpStorePtr> {
    // ---
    let client = Client::open(url)?;
    Ok(Arc::new(RedisOtpStore::new(client)))
}

pub struct RedisOtpStore {
    // ---
    client: Client,
    reissue_script: Script,
}

impl RedisOtpStore {
    // ---
    pub fn new(client: Client) -> Self {
        // ---
        Self {
            client,
            reissue_script: Script::new(REISSUE_SCRIPT),
        }
    }

    fn key(phone: &str) -> String {
        format!("otp:{phone}")
    }

    async fn get_conn(&self) -> Result<MultiplexedConnection, StoreError> {
        // ---
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|err| {
                tracing::error!("Failed to connect to Redis: {:?}", err);
                StoreError::backend(err)
            })
    }
}

fn encode(record: &OtpRecord) -> Result<String, StoreError> {
    serde_json::to_string(record).map_err(StoreError::backend)
}

fn decode(raw: &str) -> Result<OtpRecord, StoreError> {
    serde_json::from_str(raw).map_err(StoreError::backend)
}

#[async_trait::async_trait]
impl OtpStore for RedisOtpStore {
    // ---
    async fn find_by_phone(&self, phone: &str) -> Result<Option<OtpRecord>, StoreError> {
        // ---
        let mut conn = self.get_conn().await?;
        let raw: Option<String> = conn
            .get(Self::key(phone))
            .await
            .map_err(StoreError::backend)?;

        raw.as_deref().map(decode).transpose()
    }

    async fn find_by_phone_and_code(
        &self,
        phone: &str,
        code: &str,
    ) -> Result<Option<OtpRecord>, StoreError> {
        // ---
        let record = self.find_by_phone(phone).await?;
        Ok(record.filter(|r| r.code() == code))
    }

    async fn insert(&self, record: &OtpRecord) -> Result<(), StoreError> {
        // ---
        let mut conn = self.get_conn().await?;
        let created: Option<String> = redis::cmd("SET")
            .arg(Self::key(&record.phone_number))
            .arg(encode(record)?)
            .arg("NX")
            .query_async(&mut conn)
            .await
            .map_err(StoreError::backend)?;

        match created {
            Some(_) => Ok(()),
            None => Err(StoreError::Conflict),
        }
    }

    async fn reissue(&self, record: &OtpRecord) -> Result<(), StoreError> {
        // ---
        let mut conn = self.get_conn().await?;
        let replaced: i64 = self
            .reissue_script
            .key(Self::key(&record.phone_number))
            .arg(record.id.to_string())
            .arg(encode(record)?)
            .invoke_async(&mut conn)
            .await
            .map_err(StoreError::backend)?;

        if replaced == 0 {
            return Err(StoreError::Missing);
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        // ---
        let mut conn = self.get_conn().await?;
        let _: String = conn.ping().await.map_err(StoreError::backend)?;
        Ok(())
    }
}
