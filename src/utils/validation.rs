use crate::domain::model::{AvailabilityRequest, ValidatedRequest, PARCEL_CODE_LEN, PHONE_LEN};
use crate::utils::error::{AvailabilityError, Field, Result, SubmitError};
use chrono::NaiveTime;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static NON_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9]").unwrap());
static PARCEL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^[0-9]{{{}}}$", PARCEL_CODE_LEN)).unwrap());
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^[0-9]{{{}}}$", PHONE_LEN)).unwrap());

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Exactly 12 ASCII digits.
pub fn is_valid_parcel_code(value: &str) -> bool {
    PARCEL_CODE.is_match(value)
}

/// Exactly 8 ASCII digits.
pub fn is_valid_phone(value: &str) -> bool {
    PHONE.is_match(value)
}

/// Drops every character that is not an ASCII digit. Length is not enforced here.
pub fn sanitize_numeric_input(raw: &str) -> String {
    NON_DIGIT.replace_all(raw, "").into_owned()
}

/// Both times present and `start < end`.
///
/// Plain string comparison is enough because both values are zero-padded
/// 24-hour `HH:MM`.
pub fn is_time_range_valid(start: &str, end: &str) -> bool {
    !start.is_empty() && !end.is_empty() && start < end
}

pub fn is_valid_time_of_day(value: &str) -> bool {
    value.len() == 5 && NaiveTime::parse_from_str(value, "%H:%M").is_ok()
}

/// Checks run before the form enters the submitting state.
pub fn check_required(request: &AvailabilityRequest) -> std::result::Result<(), SubmitError> {
    if request.has_empty_field() {
        return Err(SubmitError::FieldMissing);
    }
    if !is_time_range_valid(&request.start_time, &request.end_time) {
        return Err(SubmitError::TimeRangeInvalid);
    }
    Ok(())
}

/// Field format checks, in form order.
pub fn check_formats(request: &AvailabilityRequest) -> std::result::Result<(), SubmitError> {
    let checks = [
        (Field::ParcelCode, is_valid_parcel_code(&request.parcel_code)),
        (Field::Phone, is_valid_phone(&request.phone)),
        (Field::StartTime, is_valid_time_of_day(&request.start_time)),
        (Field::EndTime, is_valid_time_of_day(&request.end_time)),
    ];

    match checks.iter().find(|(_, ok)| !ok) {
        Some((field, _)) => Err(SubmitError::FormatInvalid { field: *field }),
        None => Ok(()),
    }
}

/// Runs every local check and hands back a request the verifier may accept.
pub fn validate_request(
    request: &AvailabilityRequest,
) -> std::result::Result<ValidatedRequest, SubmitError> {
    check_required(request)?;
    check_formats(request)?;
    Ok(ValidatedRequest::new(request.clone()))
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(AvailabilityError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(AvailabilityError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(AvailabilityError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(AvailabilityError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AvailabilityError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}
