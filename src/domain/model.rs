use crate::utils::error::SubmitError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const PARCEL_CODE_LEN: usize = 12;
pub const PHONE_LEN: usize = 8;

/// How long a notification stays visible unless dismissed earlier.
pub const NOTIFICATION_TTL_SECS: i64 = 6;

/// The four form fields as one value.
///
/// Edits never mutate a request in place: each `with_*` call returns a new
/// request and the form swaps it in wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    pub parcel_code: String,
    pub phone: String,
    pub start_time: String,
    pub end_time: String,
}

impl AvailabilityRequest {
    pub fn with_parcel_code(&self, raw: &str) -> Self {
        Self {
            parcel_code: constrain_numeric(raw, PARCEL_CODE_LEN),
            ..self.clone()
        }
    }

    pub fn with_phone(&self, raw: &str) -> Self {
        Self {
            phone: constrain_numeric(raw, PHONE_LEN),
            ..self.clone()
        }
    }

    pub fn with_start_time(&self, value: &str) -> Self {
        Self {
            start_time: value.to_string(),
            ..self.clone()
        }
    }

    pub fn with_end_time(&self, value: &str) -> Self {
        Self {
            end_time: value.to_string(),
            ..self.clone()
        }
    }

    pub fn has_empty_field(&self) -> bool {
        self.parcel_code.is_empty()
            || self.phone.is_empty()
            || self.start_time.is_empty()
            || self.end_time.is_empty()
    }
}

fn constrain_numeric(raw: &str, max_len: usize) -> String {
    crate::utils::validation::sanitize_numeric_input(raw)
        .chars()
        .take(max_len)
        .collect()
}

/// A request that passed every local check. Only validation can build one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest(AvailabilityRequest);

impl ValidatedRequest {
    pub(crate) fn new(request: AvailabilityRequest) -> Self {
        Self(request)
    }

    pub fn parcel_code(&self) -> &str {
        &self.0.parcel_code
    }

    pub fn phone(&self) -> &str {
        &self.0.phone
    }

    pub fn start_time(&self) -> &str {
        &self.0.start_time
    }

    pub fn end_time(&self) -> &str {
        &self.0.end_time
    }

    pub fn request(&self) -> &AvailabilityRequest {
        &self.0
    }
}

/// A validated request whose barcode/phone pair the lookup service confirmed.
/// Only the submit workflow can build one, after a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedRequest(ValidatedRequest);

impl VerifiedRequest {
    pub(crate) fn new(request: ValidatedRequest) -> Self {
        Self(request)
    }

    pub fn validated(&self) -> &ValidatedRequest {
        &self.0
    }

    pub fn request(&self) -> &AvailabilityRequest {
        self.0.request()
    }
}

/// Answer of the lookup service for a barcode/phone pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairStatus {
    Exists,
    NotFound,
}

/// Answer of the update service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    Applied,
    Rejected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Success,
}

/// Result of one submit attempt, shown as the form notification.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    pub succeeded: bool,
    pub message: String,
    pub severity: Severity,
    pub error: Option<SubmitError>,
    pub raised_at: DateTime<Utc>,
}

impl SubmissionOutcome {
    pub fn success(message: &str) -> Self {
        Self {
            succeeded: true,
            message: message.to_string(),
            severity: Severity::Success,
            error: None,
            raised_at: Utc::now(),
        }
    }

    pub fn failure(error: SubmitError) -> Self {
        Self {
            succeeded: false,
            message: error.user_message().to_string(),
            severity: Severity::Error,
            error: Some(error),
            raised_at: Utc::now(),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now - self.raised_at >= Duration::seconds(NOTIFICATION_TTL_SECS)
    }
}
