use crate::domain::model::{AvailabilityRequest, SubmissionOutcome};
use chrono::{DateTime, Utc};

pub const SUBMIT_LABEL_IDLE: &str = "Mettre à Jour";
pub const SUBMIT_LABEL_BUSY: &str = "Envoi en cours...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Validating,
    VerifyingRemote,
    Updating,
}

/// One keystroke-level change coming from the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    ParcelCode(String),
    Phone(String),
    StartTime(String),
    EndTime(String),
}

/// State of one form session. Nothing here outlives the process.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    request: AvailabilityRequest,
    phase: SubmitPhase,
    notification: Option<SubmissionOutcome>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) -> &AvailabilityRequest {
        &self.request
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase != SubmitPhase::Idle
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting() {
            SUBMIT_LABEL_BUSY
        } else {
            SUBMIT_LABEL_IDLE
        }
    }

    pub fn notification(&self) -> Option<&SubmissionOutcome> {
        self.notification.as_ref()
    }

    pub fn apply(&mut self, edit: FieldEdit) {
        self.request = match edit {
            FieldEdit::ParcelCode(raw) => self.request.with_parcel_code(&raw),
            FieldEdit::Phone(raw) => self.request.with_phone(&raw),
            FieldEdit::StartTime(value) => self.request.with_start_time(&value),
            FieldEdit::EndTime(value) => self.request.with_end_time(&value),
        };
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    /// Clears the notification once its display time has elapsed.
    pub fn dismiss_expired(&mut self, now: DateTime<Utc>) {
        if self
            .notification
            .as_ref()
            .is_some_and(|n| n.is_expired_at(now))
        {
            self.notification = None;
        }
    }

    pub(crate) fn enter(&mut self, phase: SubmitPhase) {
        tracing::debug!("Form phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    pub(crate) fn reset_fields(&mut self) {
        self.request = AvailabilityRequest::default();
    }

    pub(crate) fn publish(&mut self, outcome: SubmissionOutcome) {
        self.notification = Some(outcome);
    }
}
