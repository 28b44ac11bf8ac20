//! OpenShift AI Lightspeed custom resource
//!
//! Desired state of the Lightspeed assistant integration plus the observed
//! state the operator reports back through conditions.

use super::ResourceStatus;
use crate::condition::{
    Condition, ConditionReason, ConditionType, Conditions, READY_INIT_MESSAGE,
};
use crate::config::OperatorDefaults;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// Namespace of the CatalogSource containing the OLS operator, if unset
pub const DEFAULT_CATALOG_SOURCE_NAMESPACE: &str = "openshift-marketplace";

/// Name of the CatalogSource containing the OLS operator, if unset
pub const DEFAULT_CATALOG_SOURCE_NAME: &str = "redhat-operators";

/// Desired state of OpenShiftAILightspeed
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[kube(
    group = "ai.openshift.io",
    version = "v1beta1",
    kind = "OpenShiftAILightspeed",
    namespaced,
    status = "OpenShiftAILightspeedStatus",
    schema = "disabled",
    derive = "PartialEq",
    printcolumn = r#"{"name":"Status","type":"string","jsonPath":".status.conditions[0].status","description":"Status"}"#,
    printcolumn = r#"{"name":"Message","type":"string","jsonPath":".status.conditions[0].message","description":"Message"}"#
)]
pub struct OpenShiftAILightspeedSpec {
    #[serde(flatten)]
    pub core: OpenShiftAILightspeedCore,

    /// Container image for the RAG content (environment default if empty)
    #[serde(rename = "ragImage", default)]
    pub rag_image: String,
}

/// Core LLM settings, shared with the OLS configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenShiftAILightspeedCore {
    /// URL pointing to the LLM
    #[serde(rename = "llmEndpoint")]
    pub llm_endpoint: String,

    /// Type of the provider serving the LLM
    #[serde(rename = "llmEndpointType")]
    pub llm_endpoint_type: LlmEndpointType,

    /// Name of the model to use at the API endpoint
    #[serde(rename = "modelName")]
    pub model_name: String,

    /// Secret holding the API token under the `apitoken` key
    #[serde(rename = "llmCredentials")]
    pub llm_credentials: String,

    /// ConfigMap containing a CA certificate bundle
    #[serde(rename = "tlsCACertBundle", default)]
    pub tls_ca_cert_bundle: String,

    /// Maximum number of tokens used for response generation
    #[serde(
        rename = "maxTokensForResponse",
        default,
        skip_serializing_if = "is_zero"
    )]
    pub max_tokens_for_response: u32,

    #[serde(rename = "catalogSourceNamespace", default = "default_catalog_source_namespace")]
    pub catalog_source_namespace: String,

    #[serde(rename = "catalogSourceName", default = "default_catalog_source_name")]
    pub catalog_source_name: String,

    /// Project ID for providers that require it (e.g. WatsonX)
    #[serde(rename = "llmProjectID", default, skip_serializing_if = "String::is_empty")]
    pub llm_project_id: String,

    /// Deployment name for providers that require it (e.g. Azure OpenAI)
    #[serde(rename = "llmDeploymentName", default, skip_serializing_if = "String::is_empty")]
    pub llm_deployment_name: String,

    /// API version for providers that require it (e.g. Azure OpenAI)
    #[serde(rename = "llmAPIVersion", default, skip_serializing_if = "String::is_empty")]
    pub llm_api_version: String,

    #[serde(rename = "feedbackDisabled", default, skip_serializing_if = "is_false")]
    pub feedback_disabled: bool,

    #[serde(rename = "transcriptsDisabled", default, skip_serializing_if = "is_false")]
    pub transcripts_disabled: bool,
}

/// LLM provider type
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmEndpointType {
    AzureOpenai,
    Bam,
    #[default]
    Openai,
    Watsonx,
    RhoaiVllm,
    RhelaiVllm,
    FakeProvider,
}

/// Observed state of OpenShiftAILightspeed
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenShiftAILightspeedStatus {
    #[serde(default, skip_serializing_if = "Conditions::is_empty")]
    pub conditions: Conditions,

    /// Most recent generation observed for this object
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub observed_generation: i64,
}

impl OpenShiftAILightspeedStatus {
    /// Conditions a freshly created resource starts with
    pub fn initial_conditions() -> Conditions {
        Conditions::new([Condition::unknown_condition(
            ConditionType::READY,
            ConditionReason::INIT,
            READY_INIT_MESSAGE,
        )])
    }
}

impl ResourceStatus for OpenShiftAILightspeed {
    fn conditions(&self) -> Option<&Conditions> {
        self.status.as_ref().map(|s| &s.conditions)
    }
}

impl OpenShiftAILightspeed {
    /// Returns true if the resource was reconciled successfully
    pub fn is_ready(&self) -> bool {
        ResourceStatus::is_ready(self)
    }
}

/// Fill unset spec fields from the operator defaults
pub fn apply_defaults(spec: &mut OpenShiftAILightspeedSpec, defaults: &OperatorDefaults) {
    if spec.rag_image.is_empty() {
        spec.rag_image = defaults.rag_image_url.clone();
    }
    if spec.core.max_tokens_for_response == 0 {
        spec.core.max_tokens_for_response = defaults.max_tokens_for_response;
    }
}

fn default_catalog_source_namespace() -> String {
    DEFAULT_CATALOG_SOURCE_NAMESPACE.to_string()
}

fn default_catalog_source_name() -> String {
    DEFAULT_CATALOG_SOURCE_NAME.to_string()
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

fn is_zero_i64(value: &i64) -> bool {
    *value == 0
}

fn is_false(value: &bool) -> bool {
    !*value
}
