use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl AvailabilityError {
    pub fn user_friendly_message(&self) -> String {
        match self {
            AvailabilityError::HttpClientError(_) => {
                "Unable to initialise the HTTP client".to_string()
            }
            AvailabilityError::IoError(e) => format!("Unable to read configuration: {}", e),
            AvailabilityError::ConfigError { message } => message.clone(),
            AvailabilityError::ConfigValidationError { field, message } => {
                format!("Invalid configuration ({}): {}", field, message)
            }
            AvailabilityError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid configuration ({}): {}", field, reason)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AvailabilityError>;

/// Form fields subject to a format check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ParcelCode,
    Phone,
    StartTime,
    EndTime,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::ParcelCode => "POSBARCODE",
            Field::Phone => "POSPORTABLE",
            Field::StartTime => "DISP_DU",
            Field::EndTime => "DISP_AU",
        };
        f.write_str(name)
    }
}

/// Which remote call a transport failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Verification,
    Update,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Verification => f.write_str("lookup"),
            Stage::Update => f.write_str("update"),
        }
    }
}

/// Failure of a single remote call.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status}")]
    UnexpectedStatus { status: u16 },

    #[error("unexpected response body: {body:?}")]
    UnexpectedBody { body: String },
}

/// Everything that can end a submit attempt without success.
///
/// Each variant maps to the message displayed in the form notification;
/// none of them is fatal and the form stays usable afterwards.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("a required field is empty")]
    FieldMissing,

    #[error("{field} has an invalid format")]
    FormatInvalid { field: Field },

    #[error("end time must be after start time")]
    TimeRangeInvalid,

    #[error("barcode/phone combination does not exist")]
    PairNotFound,

    #[error("{stage} call failed: {reason}")]
    TransportFailure { stage: Stage, reason: String },

    #[error("update rejected by server: {response:?}")]
    UpdateRejected { response: String },
}

impl SubmitError {
    pub fn transport(stage: Stage, error: TransportError) -> Self {
        SubmitError::TransportFailure {
            stage,
            reason: error.to_string(),
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            SubmitError::FieldMissing => "Veuillez remplir tous les champs.",
            SubmitError::FormatInvalid {
                field: Field::ParcelCode | Field::Phone,
            } => {
                "Le numéro de colis doit contenir 12 chiffres exactement et le numéro de téléphone doit contenir 8 chiffres exactement. Veuillez vérifier les valeurs."
            }
            SubmitError::FormatInvalid {
                field: Field::StartTime | Field::EndTime,
            } => "Les heures de disponibilité doivent être au format HH:MM.",
            SubmitError::TimeRangeInvalid => {
                "L'heure de disponibilité jusqu'à doit être supérieure à l'heure de disponibilité de début."
            }
            SubmitError::PairNotFound => {
                "La combinaison numéro de colis et numéro de téléphone n'est pas valide."
            }
            SubmitError::TransportFailure {
                stage: Stage::Verification,
                ..
            } => {
                "Une erreur s'est produite lors de la validation. Veuillez réessayer plus tard."
            }
            SubmitError::UpdateRejected { .. } => {
                "Une erreur s'est produite lors de la mise à jour de la disponibilité."
            }
            SubmitError::TransportFailure {
                stage: Stage::Update,
                ..
            } => {
                "Une erreur s'est produite lors de la mise à jour de la disponibilité. Veuillez réessayer plus tard."
            }
        }
    }
}
