//! Configuration flags and values read from environment variables
//!
//! Every lookup degrades to a caller-supplied default instead of failing. Boolean
//! flags are matched strictly: only the exact texts `true` and `false` count as
//! values from the environment, so `TRUE`, `1` or ` true` all fall back to the
//! default. Callers that want lenient parsing must normalize the variable first.

use crate::errors::ConfigurationError;
use std::collections::HashMap;
use tracing::{debug, error};

/// Read-only source of named configuration values
pub trait Environment {
    fn get(&self, name: &str) -> Option<String>;
}

/// The environment of the running process
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn get(&self, name: &str) -> Option<String> {
        // names std::env may reject are treated as unset
        if !is_valid_name(name) {
            return None;
        }
        std::env::var(name).ok()
    }
}

impl Environment for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

impl<E: Environment + ?Sized> Environment for &E {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['=', '\0'])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagSource {
    Environment,
    Default,
}

/// Outcome of resolving a boolean flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedFlag {
    pub value: bool,
    pub source: FlagSource,
}

impl ResolvedFlag {
    fn from_environment(value: bool) -> Self {
        Self {
            value,
            source: FlagSource::Environment,
        }
    }

    fn from_default(value: bool) -> Self {
        Self {
            value,
            source: FlagSource::Default,
        }
    }

    pub fn was_from_environment(&self) -> bool {
        self.source == FlagSource::Environment
    }
}

impl From<ResolvedFlag> for (bool, bool) {
    fn from(flag: ResolvedFlag) -> Self {
        (flag.value, flag.was_from_environment())
    }
}

/// Resolves boolean flags from an [`Environment`], falling back to a default
#[derive(Debug, Clone, Default)]
pub struct BoolEnvResolver<E = ProcessEnvironment> {
    environment: E,
}

impl BoolEnvResolver<ProcessEnvironment> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: Environment> BoolEnvResolver<E> {
    pub fn with_environment(environment: E) -> Self {
        Self { environment }
    }

    pub fn resolve(&self, name: Option<&str>, default_value: bool) -> ResolvedFlag {
        let name = match name {
            Some(name) if !name.is_empty() => name,
            _ => {
                debug!("No flag name given, using default {}", default_value);
                return ResolvedFlag::from_default(default_value);
            }
        };

        let Some(value) = self.environment.get(name) else {
            debug!("{} is not set, using default {}", name, default_value);
            return ResolvedFlag::from_default(default_value);
        };

        match value.as_str() {
            "true" => ResolvedFlag::from_environment(true),
            "false" => ResolvedFlag::from_environment(false),
            other => {
                debug!(
                    "{} has unrecognized value {:?}, using default {}",
                    name, other, default_value
                );
                ResolvedFlag::from_default(default_value)
            }
        }
    }
}

/// Resolves `name` from the process environment.
///
/// Returns the flag value and whether it came from the environment.
pub fn resolve_bool(name: Option<&str>, default_value: bool) -> (bool, bool) {
    BoolEnvResolver::new().resolve(name, default_value).into()
}

pub fn variable_with_default<E: Environment>(
    environment: &E,
    name: &str,
    default: String,
) -> String {
    match environment.get(name) {
        Some(value) => value,
        None => {
            debug!("{} is not set, using default {:?}", name, default);
            default
        }
    }
}

pub fn environment_variable_with_default(name: &str, default: String) -> String {
    variable_with_default(&ProcessEnvironment, name, default)
}

/// Checks that every name in `names` is set to a non-empty value.
///
/// All missing names are reported together, in the order given.
pub fn check_required<E: Environment>(
    environment: &E,
    names: &[&str],
) -> Result<(), ConfigurationError> {
    let missing: Vec<String> = names
        .iter()
        .filter(|name| environment.get(name).is_none_or(|value| value.is_empty()))
        .map(|name| format!("'{}' configuration is missing", name))
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    error!("Missing configuration: {}", missing.join(","));
    Err(ConfigurationError::Missing(missing))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn environment(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_unset_variable_uses_default() {
        let resolver = BoolEnvResolver::with_environment(environment(&[]));

        for default in [true, false] {
            let flag = resolver.resolve(Some("GW_MISSING"), default);
            assert_eq!(flag.value, default);
            assert_eq!(flag.source, FlagSource::Default);
        }
    }

    #[test]
    fn test_absent_or_empty_name_uses_default() {
        let resolver = BoolEnvResolver::with_environment(environment(&[("", "true")]));

        for default in [true, false] {
            let absent: (bool, bool) = resolver.resolve(None, default).into();
            let empty: (bool, bool) = resolver.resolve(Some(""), default).into();
            assert_eq!(absent, (default, false));
            assert_eq!(empty, (default, false));
        }
    }

    #[test]
    fn test_literal_true_and_false_are_read() {
        let resolver = BoolEnvResolver::with_environment(environment(&[
            ("GW_ON", "true"),
            ("GW_OFF", "false"),
        ]));

        for default in [true, false] {
            let on: (bool, bool) = resolver.resolve(Some("GW_ON"), default).into();
            let off: (bool, bool) = resolver.resolve(Some("GW_OFF"), default).into();
            assert_eq!(on, (true, true));
            assert_eq!(off, (false, true));
        }
    }

    #[test]
    fn test_other_values_fall_back_to_default() {
        let values = ["1", "0", "TRUE", "True", "False", "", " true", "false\n", "yes"];

        for value in values {
            let resolver =
                BoolEnvResolver::with_environment(environment(&[("GW_FLAG", value)]));
            for default in [true, false] {
                let flag = resolver.resolve(Some("GW_FLAG"), default);
                assert_eq!(flag, ResolvedFlag::from_default(default), "value {:?}", value);
                assert!(!flag.was_from_environment());
            }
        }
    }

    #[test]
    fn test_process_environment() {
        // SAFETY: nothing outside std reads the process environment while this test runs
        unsafe {
            std::env::set_var("GW_REBUILD_UTILITIES_TEST_FEATURE", "true");
            std::env::remove_var("GW_REBUILD_UTILITIES_TEST_OTHER");
        }

        assert_eq!(
            resolve_bool(Some("GW_REBUILD_UTILITIES_TEST_FEATURE"), false),
            (true, true)
        );
        assert_eq!(
            resolve_bool(Some("GW_REBUILD_UTILITIES_TEST_OTHER"), true),
            (true, false)
        );
    }

    #[test]
    fn test_invalid_process_names_use_default() {
        assert_eq!(resolve_bool(Some("GW=FEATURE"), true), (true, false));
        assert_eq!(resolve_bool(Some("GW\0FEATURE"), false), (false, false));
    }

    #[test]
    fn test_variable_with_default() {
        let env = environment(&[("PORT", "9000"), ("EMPTY", "")]);

        let port = |name: &str| variable_with_default(&env, name, "8000".to_string());
        assert_eq!(port("PORT"), "9000");
        assert_eq!(port("EMPTY"), "");
        assert_eq!(port("UNSET"), "8000");
        assert_eq!(
            environment_variable_with_default(
                "GW_REBUILD_UTILITIES_TEST_UNSET_PORT",
                "8000".to_string()
            ),
            "8000"
        );
    }

    #[test]
    fn test_check_required_reports_all_missing() {
        let env = environment(&[
            ("FileProcessingStorageConnectionString", "UseDevelopmentStorage=true"),
            ("TransactionOutcomeQueueName", ""),
        ]);

        let result = check_required(
            &env,
            &[
                "FileProcessingStorageConnectionString",
                "FileProcessingStorageOriginalStoreName",
                "TransactionOutcomeQueueName",
            ],
        );

        assert_eq!(
            result,
            Err(ConfigurationError::Missing(vec![
                "'FileProcessingStorageOriginalStoreName' configuration is missing".to_string(),
                "'TransactionOutcomeQueueName' configuration is missing".to_string(),
            ]))
        );
    }

    #[test]
    fn test_check_required_passes_when_all_set() {
        let env = environment(&[("A", "1"), ("B", "2")]);
        assert!(check_required(&env, &["A", "B"]).is_ok());
        assert!(check_required(&env, &[]).is_ok());
    }
}
