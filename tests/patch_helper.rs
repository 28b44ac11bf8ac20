//! Patch helper tests against the in-memory store
//!
//! Each test opens a helper on a stored resource, mutates the typed copy the
//! way a reconciler would, and checks what reached the store.

use kube::ResourceExt;
use lightspeed_operator_core::condition::{ConditionReason, ConditionType, Severity};
use lightspeed_operator_core::models::{OpenShiftAILightspeed, OpenShiftAILightspeedStatus};
use lightspeed_operator_core::patch::{
    InMemoryStore, ObjectKey, PatchError, PatchHelper, PatchTarget, Scheme, SectionOutcome,
    WriteRecord, to_unstructured,
};
use serde_json::json;

const NAMESPACE: &str = "openshift-ai";
const NAME: &str = "lightspeed";

fn scheme() -> Scheme {
    let mut scheme = Scheme::new();
    scheme.register::<OpenShiftAILightspeed>();
    scheme
}

fn key() -> ObjectKey {
    ObjectKey::of::<OpenShiftAILightspeed>(Some(NAMESPACE.to_string()), NAME)
}

/// Store a fresh resource and return the copy a reconciler would have read
fn seed(store: &InMemoryStore) -> OpenShiftAILightspeed {
    let mut resource = OpenShiftAILightspeed::new(NAME, Default::default());
    resource.metadata.namespace = Some(NAMESPACE.to_string());
    resource.spec.core.model_name = "granite".to_string();
    resource.status = Some(OpenShiftAILightspeedStatus {
        conditions: OpenShiftAILightspeedStatus::initial_conditions(),
        observed_generation: 1,
    });

    let version = store.insert(&key(), to_unstructured(&resource).unwrap());
    resource.metadata.resource_version = Some(version);
    resource
}

fn mark_operator_failed(resource: &mut OpenShiftAILightspeed) {
    if let Some(status) = resource.status.as_mut() {
        status.conditions.mark_false(
            ConditionType::new("OLSOperatorReady"),
            ConditionReason::ERROR,
            Severity::Error,
            "subscription failed",
        );
    }
}

fn targets(writes: &[WriteRecord]) -> Vec<(PatchTarget, bool)> {
    writes.iter().map(|w| (w.target, w.accepted)).collect()
}

#[tokio::test]
async fn test_status_only_change_writes_status() {
    let store = InMemoryStore::new();
    let mut resource = seed(&store);
    let mut helper = PatchHelper::open(&resource, &store, &scheme()).unwrap();

    mark_operator_failed(&mut resource);
    let report = helper.apply_patch(&resource).await.unwrap();

    assert_eq!(report.body, SectionOutcome::Skipped);
    assert!(matches!(report.status, SectionOutcome::Applied { .. }));
    assert!(helper.changes().status_changed());
    assert!(!helper.changes().body_changed());
    assert_eq!(targets(&store.writes()), vec![(PatchTarget::Status, true)]);

    let stored = store.object(&key()).unwrap();
    assert_eq!(stored["status"]["conditions"][1]["type"], "OLSOperatorReady");
    assert_eq!(stored["status"]["conditions"][1]["severity"], "Error");
}

#[tokio::test]
async fn test_body_only_change_writes_body() {
    let store = InMemoryStore::new();
    let mut resource = seed(&store);
    let mut helper = PatchHelper::open(&resource, &store, &scheme()).unwrap();

    resource.spec.core.model_name = "llama".to_string();
    resource
        .labels_mut()
        .insert("app".to_string(), "lightspeed".to_string());
    let report = helper.apply_patch(&resource).await.unwrap();

    assert!(matches!(report.body, SectionOutcome::Applied { .. }));
    assert_eq!(report.status, SectionOutcome::Skipped);
    assert_eq!(targets(&store.writes()), vec![(PatchTarget::Body, true)]);

    let stored = store.object(&key()).unwrap();
    assert_eq!(stored["spec"]["modelName"], "llama");
    assert_eq!(stored["metadata"]["labels"]["app"], "lightspeed");
}

#[tokio::test]
async fn test_both_sections_written_separately() {
    let store = InMemoryStore::new();
    let mut resource = seed(&store);
    let mut helper = PatchHelper::open(&resource, &store, &scheme()).unwrap();

    resource.spec.rag_image = "quay.io/example/rag:1".to_string();
    mark_operator_failed(&mut resource);
    let report = helper.apply_patch(&resource).await.unwrap();

    assert!(matches!(report.body, SectionOutcome::Applied { .. }));
    assert!(matches!(report.status, SectionOutcome::Applied { .. }));
    assert_eq!(
        targets(&store.writes()),
        vec![(PatchTarget::Body, true), (PatchTarget::Status, true)]
    );

    let stored = store.object(&key()).unwrap();
    assert_eq!(stored["spec"]["ragImage"], "quay.io/example/rag:1");
    assert_eq!(stored["status"]["conditions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_unchanged_resource_writes_nothing() {
    let store = InMemoryStore::new();
    let resource = seed(&store);
    let mut helper = PatchHelper::open(&resource, &store, &scheme()).unwrap();

    let report = helper.apply_patch(&resource).await.unwrap();
    assert_eq!(report.body, SectionOutcome::Skipped);
    assert_eq!(report.status, SectionOutcome::Skipped);
    assert!(store.writes().is_empty());
}

#[tokio::test]
async fn test_conflict_still_attempts_both_sections() {
    let store = InMemoryStore::new();
    let mut resource = seed(&store);
    let mut helper = PatchHelper::open(&resource, &store, &scheme()).unwrap();

    // Another client updates the resource mid-pass
    store.touch(&key());

    resource.spec.core.model_name = "llama".to_string();
    mark_operator_failed(&mut resource);
    let err = helper.apply_patch(&resource).await.unwrap_err();

    assert!(err.is_conflict());
    assert!(matches!(
        err,
        PatchError::Conflict {
            section: PatchTarget::Body,
            ..
        }
    ));
    assert_eq!(
        targets(&store.writes()),
        vec![(PatchTarget::Body, false), (PatchTarget::Status, false)]
    );

    let stored = store.object(&key()).unwrap();
    assert_eq!(stored["spec"]["modelName"], "granite");
}

#[tokio::test]
async fn test_status_conflict_reported() {
    let store = InMemoryStore::new();
    let mut resource = seed(&store);
    let mut helper = PatchHelper::open(&resource, &store, &scheme()).unwrap();

    store.touch(&key());
    mark_operator_failed(&mut resource);
    let err = helper.apply_patch(&resource).await.unwrap_err();

    assert!(matches!(
        err,
        PatchError::Conflict {
            section: PatchTarget::Status,
            ..
        }
    ));
}

#[tokio::test]
async fn test_deleted_resource_is_not_an_error() {
    let store = InMemoryStore::new();
    let mut resource = seed(&store);
    let mut helper = PatchHelper::open(&resource, &store, &scheme()).unwrap();

    store.remove(&key());
    resource.spec.core.model_name = "llama".to_string();
    mark_operator_failed(&mut resource);
    let report = helper.apply_patch(&resource).await.unwrap();

    assert_eq!(report.body, SectionOutcome::Gone);
    assert_eq!(report.status, SectionOutcome::Gone);
    assert!(store.object(&key()).is_none());
}

#[tokio::test]
async fn test_reloaded_pass_succeeds_after_conflict() {
    let store = InMemoryStore::new();
    let mut resource = seed(&store);
    let mut helper = PatchHelper::open(&resource, &store, &scheme()).unwrap();
    store.touch(&key());
    mark_operator_failed(&mut resource);
    assert!(helper.apply_patch(&resource).await.is_err());

    // Reload and run the pass again
    let mut reloaded: OpenShiftAILightspeed =
        serde_json::from_value(store.object(&key()).unwrap()).unwrap();
    let mut helper = PatchHelper::open(&reloaded, &store, &scheme()).unwrap();
    mark_operator_failed(&mut reloaded);
    let report = helper.apply_patch(&reloaded).await.unwrap();
    assert!(matches!(report.status, SectionOutcome::Applied { .. }));
}

#[tokio::test]
async fn test_unregistered_kind_is_rejected() {
    let store = InMemoryStore::new();
    let resource = seed(&store);
    let result = PatchHelper::open(&resource, &store, &Scheme::new());
    assert!(matches!(result, Err(PatchError::SchemaResolution { .. })));
}

#[tokio::test]
async fn test_before_object_is_independent_copy() {
    let store = InMemoryStore::new();
    let mut resource = seed(&store);
    let helper = PatchHelper::open(&resource, &store, &scheme()).unwrap();

    resource.spec.core.model_name = "llama".to_string();
    assert_eq!(helper.before_object().spec.core.model_name, "granite");
    assert_eq!(helper.before()["spec"]["modelName"], json!("granite"));
}
