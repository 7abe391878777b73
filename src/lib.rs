//! Configuration and identifier helpers for the gw rebuild adaptation service
//!
//! [`environment`] resolves feature flags and settings from environment
//! variables with fallback defaults. [`guid`] produces pseudo-random
//! identifiers in the version 4 UUID text layout.
//!
//! Neither module installs a tracing subscriber; diagnostics are emitted as
//! `tracing` events for the embedding service to collect.

pub mod environment;
pub mod errors;
pub mod guid;

pub use environment::{
    BoolEnvResolver, Environment, FlagSource, ProcessEnvironment, ResolvedFlag, check_required,
    environment_variable_with_default, resolve_bool, variable_with_default,
};
pub use errors::{ConfigurationError, GuidError};
pub use guid::{GUID_BUFFER_LEN, GUID_LEN, Guid, GuidGenerator, generate};
