//! Assessment workflow tests with file-backed sessions and custom collaborators

mod common;

use async_trait::async_trait;
use common::json_answers;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use triage_repository::{
    AssessmentRecord, InMemoryOutcomeSink, OutcomeSink, RepositoryError, RepositoryResult,
    SubjectDirectory,
};
use triage_sdk::{
    AgeCategory, AssessmentService, SessionStatus, StoreConfig, SubjectProfile,
    TriageEngineBuilder,
};

/// Directory that knows every subject as a child of a fixed age
struct FixedAgeDirectory {
    age_months: u32,
}

#[async_trait]
impl SubjectDirectory for FixedAgeDirectory {
    async fn profile(&self, subject_reference: &str) -> RepositoryResult<Option<SubjectProfile>> {
        Ok(Some(
            SubjectProfile::new(subject_reference).with_age_months(self.age_months),
        ))
    }
}

/// Sink that rejects writes until it is brought back online
#[derive(Default)]
struct FlakySink {
    online: AtomicBool,
    records: Mutex<Vec<AssessmentRecord>>,
}

#[async_trait]
impl OutcomeSink for FlakySink {
    async fn record(&self, record: AssessmentRecord) -> RepositoryResult<()> {
        if !self.online.load(Ordering::SeqCst) {
            return Err(RepositoryError::Other("outcome sink offline".to_string()));
        }
        self.records.lock().await.push(record);
        Ok(())
    }
}

async fn file_backed_service(dir: &std::path::Path) -> AssessmentService {
    let engine = TriageEngineBuilder::new()
        .with_session_store(StoreConfig::FileSystem {
            path: dir.to_path_buf(),
        })
        .build()
        .await
        .unwrap();

    AssessmentService::from_config(engine)
        .unwrap()
        .with_subject_directory(Arc::new(FixedAgeDirectory { age_months: 18 }))
}

#[tokio::test]
async fn test_session_survives_service_restart() {
    let dir = tempfile::tempdir().unwrap();

    let first = file_backed_service(dir.path()).await;
    let started = first.begin("child-42", None).await.unwrap();
    assert_eq!(started.session.tree_id, "cough_difficult_breathing");

    first
        .answer("child-42", "age_months", &json!(18))
        .await
        .unwrap();
    assert!(dir.path().join("child-42.json").exists());

    // A new service over the same directory continues the session
    let second = file_backed_service(dir.path()).await;
    let question = second.current("child-42").await.unwrap().unwrap();
    assert_eq!(question.node_id, "cough_present");

    let done = second
        .answer("child-42", "cough_present", &json!("no"))
        .await
        .unwrap();
    assert_eq!(done.session.status, SessionStatus::Completed);
    assert_eq!(done.session.outcome_id.as_deref(), Some("NO_PNEUMONIA"));

    let stored = first.session("child-42").await.unwrap();
    assert_eq!(stored.outcome_id.as_deref(), Some("NO_PNEUMONIA"));
}

#[tokio::test]
async fn test_profile_age_drives_category() {
    let engine = TriageEngineBuilder::new().build().await.unwrap();
    let service = AssessmentService::from_config(engine)
        .unwrap()
        .with_subject_directory(Arc::new(FixedAgeDirectory { age_months: 1 }));

    let profile = SubjectProfile::new("baby").with_age_months(1);
    assert_eq!(profile.category(), Some(AgeCategory::YoungInfant));

    let started = service.begin("baby", None).await.unwrap();
    assert_eq!(started.session.tree_id, "young_infant_jaundice");
}

#[tokio::test]
async fn test_submit_batch_records_outcome() {
    let engine = TriageEngineBuilder::new().build().await.unwrap();
    let sink = Arc::new(InMemoryOutcomeSink::new());
    let service = AssessmentService::from_config(engine)
        .unwrap()
        .with_outcome_sink(sink.clone());

    let session = service
        .submit_batch(
            "child-7",
            "malnutrition",
            json_answers(&[
                ("edema", json!("no")),
                ("muac_mm", json!(120)),
                ("medical_complication", json!(false)),
                ("failed_appetite_test", json!("no")),
            ]),
        )
        .await
        .unwrap();

    assert_eq!(session.outcome_id.as_deref(), Some("MAM"));
    assert_eq!(session.findings.muac_mm, Some(120.0));

    let records = sink.records_for("child-7").await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome_id.as_deref(), Some("MAM"));
    assert!(!records[0].is_emergency());

    let stored = service.session("child-7").await.unwrap();
    assert_eq!(stored.id, session.id);
}

#[tokio::test]
async fn test_submit_batch_rejects_bad_json() {
    let engine = TriageEngineBuilder::new().build().await.unwrap();
    let service = AssessmentService::from_config(engine).unwrap();

    let result = service
        .submit_batch(
            "child-8",
            "malnutrition",
            json_answers(&[("edema", json!({ "nested": true }))]),
        )
        .await;

    assert!(matches!(result, Err(triage_sdk::SdkError::InvalidAnswer(_))));
    assert!(service.session("child-8").await.is_err());
}

#[tokio::test]
async fn test_failed_outcome_record_can_be_retried() {
    let engine = TriageEngineBuilder::new().build().await.unwrap();
    let sink = Arc::new(FlakySink::default());
    let service = AssessmentService::from_config(engine)
        .unwrap()
        .with_subject_directory(Arc::new(FixedAgeDirectory { age_months: 0 }))
        .with_outcome_sink(sink.clone());

    service
        .begin("newborn-9", Some("birth_asphyxia_check"))
        .await
        .unwrap();
    service
        .answer("newborn-9", "check_birth_asphyxia", &json!("yes"))
        .await
        .unwrap();

    let failed = service
        .answer("newborn-9", "not_breathing", &json!("yes"))
        .await;
    assert!(matches!(
        failed,
        Err(triage_sdk::SdkError::RepositoryError(RepositoryError::Other(_)))
    ));

    // The stored session still waits on the same question
    let stored = service.session("newborn-9").await.unwrap();
    assert_eq!(stored.status, SessionStatus::InProgress);
    assert_eq!(stored.current_node_id, "not_breathing");

    sink.online.store(true, Ordering::SeqCst);
    let done = service
        .answer("newborn-9", "not_breathing", &json!("yes"))
        .await
        .unwrap();
    assert_eq!(done.session.status, SessionStatus::Emergency);

    let records = sink.records.lock().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome_id.as_deref(), Some("BIRTH_ASPHYXIA"));
    drop(records);

    let stored = service.session("newborn-9").await.unwrap();
    assert_eq!(stored.status, SessionStatus::Emergency);
}
