//! Model artifact storage and metadata

pub mod artifact;
pub mod store;
pub mod metadata;

pub use artifact::{ModelArtifact, SequenceProto};
pub use store::{write_artifact, LoadedModel, ModelStore};
pub use metadata::{read_info, ModelInfo};
