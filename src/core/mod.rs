pub mod form;
pub mod workflow;

pub use crate::domain::model::{AvailabilityRequest, SubmissionOutcome};
pub use crate::domain::ports::{ConfigProvider, RemoteUpdater, RemoteVerifier};
pub use crate::utils::error::Result;
