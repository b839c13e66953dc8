//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod artifact;
pub mod config;
pub mod error;
pub mod release;
pub mod report;

pub use artifact::{Artifact, ArtifactSet, RemoteRelPath};
pub use config::{DeployConfig, validate_config_key, validate_config_value};
pub use error::{ArtifactError, ConfigError, PublishError, ReleaseError, RemoteError};
pub use release::ReleaseVersion;
pub use report::{DeployPlan, PlannedArtifact, PublishReport, PublishedArtifact};
