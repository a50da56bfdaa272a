pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::http::HttpParcelService;
pub use config::toml_config::TomlConfig;
pub use core::form::{FieldEdit, FormState, SubmitPhase};
pub use core::workflow::SubmitWorkflow;
pub use domain::model::{AvailabilityRequest, Severity, SubmissionOutcome};
pub use utils::error::{AvailabilityError, Result, SubmitError};
