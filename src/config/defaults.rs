//! Resource field defaults resolved from the operator environment

use serde::{Deserialize, Serialize};

/// Environment variable carrying the RAG content image
pub const RAG_IMAGE_ENV: &str = "RELATED_IMAGE_OPENSHIFT_AI_LIGHTSPEED_IMAGE_URL_DEFAULT";

/// Image used when the environment does not provide one
pub const RAG_IMAGE_URL_FALLBACK: &str =
    "quay.io/opendatahub-io/openshift-ai-lightspeed-rag-content:rhoai-docs-2025.1";

pub const MAX_TOKENS_FOR_RESPONSE_DEFAULT: u32 = 2048;

/// Values filled into unset spec fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OperatorDefaults {
    #[serde(default = "default_rag_image_url")]
    pub rag_image_url: String,

    #[serde(default = "default_max_tokens_for_response")]
    pub max_tokens_for_response: u32,
}

impl OperatorDefaults {
    /// Resolve defaults from the process environment
    ///
    /// Called once at startup; the result is passed to whatever needs it.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let rag_image_url = lookup(RAG_IMAGE_ENV)
            .filter(|image| !image.is_empty())
            .unwrap_or_else(default_rag_image_url);
        Self {
            rag_image_url,
            max_tokens_for_response: MAX_TOKENS_FOR_RESPONSE_DEFAULT,
        }
    }
}

impl Default for OperatorDefaults {
    fn default() -> Self {
        Self {
            rag_image_url: default_rag_image_url(),
            max_tokens_for_response: default_max_tokens_for_response(),
        }
    }
}

fn default_rag_image_url() -> String {
    RAG_IMAGE_URL_FALLBACK.to_string()
}

fn default_max_tokens_for_response() -> u32 {
    MAX_TOKENS_FOR_RESPONSE_DEFAULT
}
