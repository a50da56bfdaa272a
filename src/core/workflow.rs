use crate::core::form::{FieldEdit, FormState, SubmitPhase};
use crate::domain::model::{
    PairStatus, SubmissionOutcome, UpdateStatus, ValidatedRequest, VerifiedRequest,
};
use crate::domain::ports::{RemoteUpdater, RemoteVerifier};
use crate::utils::error::{Stage, SubmitError};
use crate::utils::validation;

pub const SUCCESS_MESSAGE: &str = "Disponibilité mise à jour avec succès.";

/// Drives one form through local validation, remote verification and the update call.
///
/// The steps run strictly in sequence. The updater only ever receives a
/// [`VerifiedRequest`], which exists only after the verifier confirmed the
/// pair. Every attempt ends back in [`SubmitPhase::Idle`] with a published
/// notification.
pub struct SubmitWorkflow<V: RemoteVerifier, U: RemoteUpdater> {
    verifier: V,
    updater: U,
    form: FormState,
}

impl<V: RemoteVerifier, U: RemoteUpdater> SubmitWorkflow<V, U> {
    pub fn new(verifier: V, updater: U) -> Self {
        Self {
            verifier,
            updater,
            form: FormState::new(),
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn edit(&mut self, edit: FieldEdit) {
        self.form.apply(edit);
    }

    pub fn dismiss_notification(&mut self) {
        self.form.dismiss_notification();
    }

    /// Local checks only, without touching the form or the network.
    pub fn check_locally(&self) -> Result<ValidatedRequest, SubmitError> {
        validation::validate_request(self.form.request())
    }

    /// Runs one submit attempt.
    ///
    /// Returns `None` without doing anything if an attempt is already in flight.
    pub async fn submit(&mut self) -> Option<SubmissionOutcome> {
        if self.form.is_submitting() {
            tracing::warn!("Submit ignored: {:?} in progress", self.form.phase());
            return None;
        }

        let outcome = match self.run().await {
            Ok(()) => {
                tracing::info!("Availability updated");
                SubmissionOutcome::success(SUCCESS_MESSAGE)
            }
            Err(e) => {
                tracing::warn!("Submit failed: {}", e);
                SubmissionOutcome::failure(e)
            }
        };

        self.form.enter(SubmitPhase::Idle);
        self.form.publish(outcome.clone());
        Some(outcome)
    }

    async fn run(&mut self) -> Result<(), SubmitError> {
        let request = self.form.request().clone();
        validation::check_required(&request)?;

        self.form.enter(SubmitPhase::Validating);
        validation::check_formats(&request)?;
        let validated = ValidatedRequest::new(request);

        self.form.enter(SubmitPhase::VerifyingRemote);
        let verified = match self.verifier.verify(&validated).await {
            Ok(PairStatus::Exists) => VerifiedRequest::new(validated),
            Ok(PairStatus::NotFound) => return Err(SubmitError::PairNotFound),
            Err(e) => return Err(SubmitError::transport(Stage::Verification, e)),
        };

        self.form.enter(SubmitPhase::Updating);
        match self.updater.update(&verified).await {
            Ok(UpdateStatus::Applied) => {
                self.form.reset_fields();
                Ok(())
            }
            Ok(UpdateStatus::Rejected(response)) => Err(SubmitError::UpdateRejected { response }),
            Err(e) => Err(SubmitError::transport(Stage::Update, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{AvailabilityRequest, Severity};
    use crate::utils::error::{Field, TransportError};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    type CallLog = Arc<Mutex<Vec<&'static str>>>;

    #[derive(Clone, Copy)]
    enum Lookup {
        Exists,
        NotFound,
        ServerError,
        Hang,
    }

    #[derive(Clone, Copy)]
    enum Update {
        Applied,
        Rejected,
        ServerError,
    }

    struct MockVerifier {
        answer: Lookup,
        calls: CallLog,
    }

    #[async_trait]
    impl RemoteVerifier for MockVerifier {
        async fn verify(&self, _request: &ValidatedRequest) -> Result<PairStatus, TransportError> {
            self.calls.lock().unwrap().push("verify");
            match self.answer {
                Lookup::Exists => Ok(PairStatus::Exists),
                Lookup::NotFound => Ok(PairStatus::NotFound),
                Lookup::ServerError => Err(TransportError::UnexpectedStatus { status: 503 }),
                Lookup::Hang => std::future::pending().await,
            }
        }
    }

    struct MockUpdater {
        answer: Update,
        calls: CallLog,
        seen: Arc<Mutex<Option<AvailabilityRequest>>>,
    }

    #[async_trait]
    impl RemoteUpdater for MockUpdater {
        async fn update(&self, request: &VerifiedRequest) -> Result<UpdateStatus, TransportError> {
            self.calls.lock().unwrap().push("update");
            *self.seen.lock().unwrap() = Some(request.request().clone());
            match self.answer {
                Update::Applied => Ok(UpdateStatus::Applied),
                Update::Rejected => Ok(UpdateStatus::Rejected("error".to_string())),
                Update::ServerError => Err(TransportError::UnexpectedStatus { status: 500 }),
            }
        }
    }

    struct Harness {
        workflow: SubmitWorkflow<MockVerifier, MockUpdater>,
        calls: CallLog,
        seen: Arc<Mutex<Option<AvailabilityRequest>>>,
    }

    impl Harness {
        fn new(lookup: Lookup, update: Update) -> Self {
            let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
            let seen = Arc::new(Mutex::new(None));
            let workflow = SubmitWorkflow::new(
                MockVerifier {
                    answer: lookup,
                    calls: calls.clone(),
                },
                MockUpdater {
                    answer: update,
                    calls: calls.clone(),
                    seen: seen.clone(),
                },
            );
            Self {
                workflow,
                calls,
                seen,
            }
        }

        fn fill(mut self, parcel_code: &str, phone: &str, start: &str, end: &str) -> Self {
            self.workflow
                .edit(FieldEdit::ParcelCode(parcel_code.to_string()));
            self.workflow.edit(FieldEdit::Phone(phone.to_string()));
            self.workflow.edit(FieldEdit::StartTime(start.to_string()));
            self.workflow.edit(FieldEdit::EndTime(end.to_string()));
            self
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn well_formed(lookup: Lookup, update: Update) -> Harness {
        Harness::new(lookup, update).fill("123456789012", "06123456", "08:00", "12:00")
    }

    #[tokio::test]
    async fn test_empty_form_makes_no_remote_call() {
        let mut harness = Harness::new(Lookup::Exists, Update::Applied);

        let outcome = harness.workflow.submit().await.unwrap();

        assert!(!outcome.succeeded);
        assert_eq!(outcome.message, "Veuillez remplir tous les champs.");
        assert_eq!(outcome.error, Some(SubmitError::FieldMissing));
        assert!(harness.calls().is_empty());
        assert_eq!(harness.workflow.form().phase(), SubmitPhase::Idle);
    }

    #[tokio::test]
    async fn test_inverted_range_makes_no_remote_call() {
        let mut harness =
            Harness::new(Lookup::Exists, Update::Applied).fill("123456789012", "06123456", "09:00", "09:00");

        let outcome = harness.workflow.submit().await.unwrap();

        assert_eq!(outcome.error, Some(SubmitError::TimeRangeInvalid));
        assert!(outcome.message.contains("supérieure"));
        assert!(harness.calls().is_empty());
    }

    #[tokio::test]
    async fn test_short_barcode_stops_before_lookup() {
        let mut harness =
            Harness::new(Lookup::Exists, Update::Applied).fill("12345678901", "06123456", "08:00", "12:00");

        let outcome = harness.workflow.submit().await.unwrap();

        assert_eq!(
            outcome.error,
            Some(SubmitError::FormatInvalid {
                field: Field::ParcelCode
            })
        );
        assert!(harness.calls().is_empty());
        assert!(!harness.workflow.form().is_submitting());
        // Fields survive a failed attempt
        assert_eq!(harness.workflow.form().request().parcel_code, "12345678901");
    }

    #[tokio::test]
    async fn test_unknown_pair_never_reaches_updater() {
        let mut harness = well_formed(Lookup::NotFound, Update::Applied);

        let outcome = harness.workflow.submit().await.unwrap();

        assert_eq!(outcome.error, Some(SubmitError::PairNotFound));
        assert_eq!(
            outcome.message,
            "La combinaison numéro de colis et numéro de téléphone n'est pas valide."
        );
        assert_eq!(harness.calls(), vec!["verify"]);
    }

    #[tokio::test]
    async fn test_successful_update_resets_fields() {
        let mut harness = well_formed(Lookup::Exists, Update::Applied);

        let outcome = harness.workflow.submit().await.unwrap();

        assert!(outcome.succeeded);
        assert_eq!(outcome.severity, Severity::Success);
        assert_eq!(outcome.message, SUCCESS_MESSAGE);
        assert_eq!(harness.calls(), vec!["verify", "update"]);

        let form = harness.workflow.form();
        assert_eq!(form.request(), &AvailabilityRequest::default());
        assert!(!form.is_submitting());
        assert_eq!(form.notification(), Some(&outcome));

        let sent = harness.seen.lock().unwrap().clone().unwrap();
        assert_eq!(sent.parcel_code, "123456789012");
        assert_eq!(sent.end_time, "12:00");
    }

    #[tokio::test]
    async fn test_lookup_transport_failure() {
        let mut harness = well_formed(Lookup::ServerError, Update::Applied);

        let outcome = harness.workflow.submit().await.unwrap();

        assert!(matches!(
            outcome.error,
            Some(SubmitError::TransportFailure {
                stage: Stage::Verification,
                ..
            })
        ));
        assert_eq!(
            outcome.message,
            "Une erreur s'est produite lors de la validation. Veuillez réessayer plus tard."
        );
        assert_eq!(harness.calls(), vec!["verify"]);
        assert!(!harness.workflow.form().is_submitting());
    }

    #[tokio::test]
    async fn test_rejected_update_keeps_fields() {
        let mut harness = well_formed(Lookup::Exists, Update::Rejected);

        let outcome = harness.workflow.submit().await.unwrap();

        assert_eq!(
            outcome.error,
            Some(SubmitError::UpdateRejected {
                response: "error".to_string()
            })
        );
        assert_eq!(harness.workflow.form().request().phone, "06123456");
    }

    #[tokio::test]
    async fn test_update_transport_failure() {
        let mut harness = well_formed(Lookup::Exists, Update::ServerError);

        let outcome = harness.workflow.submit().await.unwrap();

        assert!(matches!(
            outcome.error,
            Some(SubmitError::TransportFailure {
                stage: Stage::Update,
                ..
            })
        ));
        assert!(outcome.message.ends_with("Veuillez réessayer plus tard."));
        assert_eq!(harness.calls(), vec!["verify", "update"]);
    }

    #[tokio::test]
    async fn test_submit_ignored_while_in_flight() {
        let mut harness = well_formed(Lookup::Hang, Update::Applied);

        let first = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            harness.workflow.submit(),
        )
        .await;
        assert!(first.is_err());
        assert_eq!(harness.workflow.form().phase(), SubmitPhase::VerifyingRemote);
        assert_eq!(harness.workflow.form().submit_label(), "Envoi en cours...");

        assert!(harness.workflow.submit().await.is_none());
        assert_eq!(harness.calls(), vec!["verify"]);
    }

    #[tokio::test]
    async fn test_retry_after_failure_uses_preserved_fields() {
        let mut harness = well_formed(Lookup::NotFound, Update::Applied);
        harness.workflow.submit().await.unwrap();

        harness.workflow.dismiss_notification();
        assert!(harness.workflow.form().notification().is_none());

        harness.workflow.submit().await.unwrap();
        assert_eq!(harness.calls(), vec!["verify", "verify"]);
    }

    #[test]
    fn test_check_locally() {
        let harness = well_formed(Lookup::Exists, Update::Applied);
        let validated = harness.workflow.check_locally().unwrap();
        assert_eq!(validated.start_time(), "08:00");

        let empty = Harness::new(Lookup::Exists, Update::Applied);
        assert_eq!(
            empty.workflow.check_locally(),
            Err(SubmitError::FieldMissing)
        );
    }
}
