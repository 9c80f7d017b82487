//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::GateConfig;
use crate::domain::errors::FhmlError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`GateConfig`]
/// 4. Applies environment variable overrides (`FHML_GATE_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, TOML parsing fails, a
/// referenced environment variable is unset, or validation fails.
pub fn load_config(path: impl AsRef<Path>) -> Result<GateConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(FhmlError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        FhmlError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: GateConfig = toml::from_str(&contents)
        .map_err(|e| FhmlError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config
        .validate()
        .map_err(|e| FhmlError::Configuration(format!("Configuration validation failed: {e}")))?;

    Ok(config)
}

/// Loads configuration from a TOML file, falling back to defaults when the
/// file does not exist.
///
/// The watcher typically launches the pipeline without a configuration
/// file; the defaults are a complete, valid configuration. Environment
/// overrides still apply in the fallback case.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<GateConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(path = %path.display(), "Configuration file not found, using defaults");
    let mut config = GateConfig::default();
    apply_env_overrides(&mut config);
    config
        .validate()
        .map_err(|e| FhmlError::Configuration(format!("Configuration validation failed: {e}")))?;
    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are passed through untouched. A referenced but unset
/// variable is an error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(FhmlError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `FHML_GATE_*` prefix
///
/// Environment variables follow the pattern `FHML_GATE_<SECTION>_<KEY>`,
/// e.g. `FHML_GATE_DIRECTORIES_OUTBOUND_DIR`.
fn apply_env_overrides(config: &mut GateConfig) {
    if let Ok(val) = std::env::var("FHML_GATE_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("FHML_GATE_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    if let Ok(val) = std::env::var("FHML_GATE_DIRECTORIES_REPORTS_DIR") {
        config.directories.reports_dir = val;
    }
    if let Ok(val) = std::env::var("FHML_GATE_DIRECTORIES_OUTBOUND_DIR") {
        config.directories.outbound_dir = val;
    }

    if let Ok(val) = std::env::var("FHML_GATE_SANITIZER_REPLACE_NON_ASCII") {
        config.sanitizer.replace_non_ascii = val.parse().unwrap_or(false);
    }

    if let Ok(val) = std::env::var("FHML_GATE_VALIDATION_MIN_DATE") {
        config.validation.min_date = val;
    }
    if let Ok(val) = std::env::var("FHML_GATE_VALIDATION_MAX_DATE") {
        config.validation.max_date = val;
    }

    if let Ok(val) = std::env::var("FHML_GATE_DIAGNOSE_MAX_RECORDS_PER_BATCH") {
        if let Ok(max) = val.parse() {
            config.diagnose.max_records_per_batch = max;
        }
    }

    if let Ok(val) = std::env::var("FHML_GATE_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("FHML_GATE_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("FHML_GATE_TEST_VAR", "test_value");
        let input = "outbound_dir = \"${FHML_GATE_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "outbound_dir = \"test_value\"\n");
        std::env::remove_var("FHML_GATE_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("FHML_GATE_MISSING_VAR");
        let input = "outbound_dir = \"${FHML_GATE_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
    }

    #[test]
    fn test_substitute_skips_comments() {
        let input = "# uses ${FHML_GATE_UNDEFINED_IN_COMMENT}\nreports_dir = \"reports\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${FHML_GATE_UNDEFINED_IN_COMMENT}"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = load_or_default("nonexistent.toml").unwrap();
        assert_eq!(config.directories.reports_dir, "reports");
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[directories]
reports_dir = "out/reports"
outbound_dir = "out/ready"

[diagnose]
max_records_per_batch = 250
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.directories.reports_dir, "out/reports");
        assert_eq!(config.diagnose.max_records_per_batch, 250);
    }

    #[test]
    fn test_load_config_invalid_values() {
        let toml_content = r#"
[diagnose]
max_records_per_batch = 0
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let result = load_config(temp_file.path());
        assert!(matches!(result, Err(FhmlError::Configuration(_))));
    }
}
