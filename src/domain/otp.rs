use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One outstanding OTP challenge for a phone number.
///
/// `code` and `created_at` are private to this module's mutation path: the
/// only way to change them is [`OtpRecord::reissue`], which replaces both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    // ---
    /// Surrogate identity, fixed when the record is first created.
    pub id: Uuid,

    /// Subscriber number this challenge belongs to.
    pub phone_number: String,

    code: String,

    created_at: DateTime<Utc>,
}

impl OtpRecord {
    // ---
    pub fn new(phone_number: String, code: String, created_at: DateTime<Utc>) -> Self {
        // ---
        Self {
            id: Uuid::new_v4(),
            phone_number,
            code,
            created_at,
        }
    }

    /// Rebuild a record read back from storage.
    pub fn from_parts(
        id: Uuid,
        phone_number: String,
        code: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        // ---
        Self {
            id,
            phone_number,
            code,
            created_at,
        }
    }

    /// Replace the code and issuance time together, keeping identity.
    pub fn reissue(self, code: String, created_at: DateTime<Utc>) -> Self {
        // ---
        Self {
            code,
            created_at,
            ..self
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Result of a "request a code" call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpIssue {
    // ---
    /// No record existed; a fresh one was created.
    Issued { code: String },

    /// The previous code had expired and was replaced in place.
    Reissued { code: String },

    /// The previous code is still live and was returned unchanged.
    Reused { code: String },
}

impl OtpIssue {
    // ---
    pub fn code(&self) -> &str {
        // ---
        match self {
            Self::Issued { code } | Self::Reissued { code } | Self::Reused { code } => code,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Self::Issued { .. })
    }

    pub fn is_reused(&self) -> bool {
        matches!(self, Self::Reused { .. })
    }

    /// Stable label for logs, metrics and response bodies.
    pub fn label(&self) -> &'static str {
        // ---
        match self {
            Self::Issued { .. } => "issued",
            Self::Reissued { .. } => "reissued",
            Self::Reused { .. } => "reused",
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::Duration;

    #[test]
    fn reissue_replaces_code_and_timestamp_together() {
        // ---
        let created = Utc::now();
        let record = OtpRecord::new("5551234567".to_string(), "ABC123".to_string(), created);
        let id = record.id;

        let later = created + Duration::minutes(3);
        let record = record.reissue("XYZ789".to_string(), later);

        assert_eq!(record.id, id);
        assert_eq!(record.phone_number, "5551234567");
        assert_eq!(record.code(), "XYZ789");
        assert_eq!(record.created_at(), later);
    }

    #[test]
    fn issue_flags() {
        // ---
        let issued = OtpIssue::Issued { code: "A".into() };
        let reissued = OtpIssue::Reissued { code: "B".into() };
        let reused = OtpIssue::Reused { code: "C".into() };

        assert!(issued.is_new() && !issued.is_reused());
        assert!(!reissued.is_new() && !reissued.is_reused());
        assert!(!reused.is_new() && reused.is_reused());
        assert_eq!(reissued.code(), "B");
        assert_eq!(reused.label(), "reused");
    }
}
