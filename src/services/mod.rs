// Service exports
pub mod artifacts;

pub use artifacts::{ArtifactStore, ArtifactError, ModelBundle, FeatureRow};
