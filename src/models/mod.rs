//! Operator resource models
//!
//! Structure:
//! - `lightspeed.rs` - The `OpenShiftAILightspeed` custom resource (v1beta1)
//! - `extensions.rs` - Status helpers shared by condition-carrying resources

pub mod extensions;
pub mod lightspeed;

pub use extensions::ResourceStatus;
pub use lightspeed::*;
