//! Custom resource model tests
//!
//! Fixtures mirror what the API server returns for OpenShiftAILightspeed.

use lightspeed_operator_core::condition::{ConditionReason, ConditionType, Severity};
use lightspeed_operator_core::config::OperatorDefaults;
use lightspeed_operator_core::models::{
    LlmEndpointType, OpenShiftAILightspeed, OpenShiftAILightspeedStatus, ResourceStatus,
    apply_defaults,
};
use serde_json::json;

fn fixture(ready: &str) -> serde_json::Value {
    json!({
        "apiVersion": "ai.openshift.io/v1beta1",
        "kind": "OpenShiftAILightspeed",
        "metadata": {
            "name": "lightspeed",
            "namespace": "openshift-ai",
            "resourceVersion": "42",
            "generation": 3
        },
        "spec": {
            "llmEndpoint": "https://api.openai.com/v1",
            "llmEndpointType": "azure_openai",
            "modelName": "gpt-4o",
            "llmCredentials": "azure-token",
            "llmDeploymentName": "lightspeed",
            "llmAPIVersion": "2024-02-15-preview",
            "ragImage": "quay.io/example/rag:1"
        },
        "status": {
            "observedGeneration": 3,
            "conditions": [
                {
                    "type": "Ready",
                    "status": ready,
                    "lastTransitionTime": "2025-01-01T00:00:00Z",
                    "reason": "Ready",
                    "message": "Setup complete"
                },
                {
                    "type": "OLSOperatorReady",
                    "status": "True",
                    "lastTransitionTime": "2025-01-01T00:00:00Z",
                    "reason": "Ready",
                    "message": "Operator installed"
                }
            ]
        }
    })
}

#[test]
fn test_deserialize_resource() {
    let resource: OpenShiftAILightspeed = serde_json::from_value(fixture("True")).unwrap();
    assert_eq!(resource.spec.core.llm_endpoint_type, LlmEndpointType::AzureOpenai);
    assert_eq!(resource.spec.core.llm_deployment_name, "lightspeed");
    assert_eq!(resource.spec.core.llm_api_version, "2024-02-15-preview");
    assert_eq!(resource.spec.core.catalog_source_name, "redhat-operators");

    let status = resource.status.as_ref().unwrap();
    assert_eq!(status.observed_generation, 3);
    assert_eq!(status.conditions.len(), 2);
}

#[test]
fn test_is_ready() {
    let ready: OpenShiftAILightspeed = serde_json::from_value(fixture("True")).unwrap();
    assert!(ready.is_ready());

    let not_ready: OpenShiftAILightspeed = serde_json::from_value(fixture("False")).unwrap();
    assert!(!not_ready.is_ready());

    let no_status = OpenShiftAILightspeed::new("lightspeed", Default::default());
    assert!(!no_status.is_ready());
    assert!(no_status.ready_condition().is_none());
}

#[test]
fn test_is_failed_requires_error_severity() {
    let mut resource = OpenShiftAILightspeed::new("lightspeed", Default::default());
    let mut status = OpenShiftAILightspeedStatus::default();
    status.conditions.mark_false(
        ConditionType::READY,
        ConditionReason::ERROR,
        Severity::Warning,
        "degraded",
    );
    resource.status = Some(status);
    assert!(!resource.is_failed());

    if let Some(status) = resource.status.as_mut() {
        status.conditions.mark_false(
            ConditionType::READY,
            ConditionReason::ERROR,
            Severity::Error,
            "failed",
        );
    }
    assert!(resource.is_failed());
}

#[test]
fn test_serialize_omits_empty_optional_fields() {
    let resource = OpenShiftAILightspeed::new("lightspeed", Default::default());
    let value = serde_json::to_value(&resource).unwrap();
    assert_eq!(value["apiVersion"], "ai.openshift.io/v1beta1");
    assert_eq!(value["kind"], "OpenShiftAILightspeed");

    let spec = value["spec"].as_object().unwrap();
    assert!(!spec.contains_key("llmProjectID"));
    assert!(!spec.contains_key("maxTokensForResponse"));
    assert!(!spec.contains_key("feedbackDisabled"));
    assert_eq!(spec["llmEndpointType"], "openai");
}

#[test]
fn test_apply_defaults_fills_unset_fields() {
    let defaults = OperatorDefaults::default();
    let mut resource = OpenShiftAILightspeed::new("lightspeed", Default::default());
    apply_defaults(&mut resource.spec, &defaults);

    assert_eq!(resource.spec.rag_image, defaults.rag_image_url);
    assert_eq!(resource.spec.core.max_tokens_for_response, 2048);
}
