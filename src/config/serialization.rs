//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Render the config as a commented TOML file
    pub fn to_toml(&self) -> String {
        let api_base = match &self.api_base {
            Some(base) => format!("api_base = \"{}\"", base),
            None => "# api_base = \"https://charts.example.com\"".to_string(),
        };
        let timeout = match self.timeout_secs {
            Some(secs) => format!("timeout_secs = {}", secs),
            None => "# timeout_secs = 30".to_string(),
        };

        format!(
            r#"# pie-chart configuration

# Base URL for relative data endpoints such as /dune/query/<id>
# (PIE_CHART_API_BASE overrides)
{api_base}

# Request timeout in seconds; unset waits indefinitely
# (PIE_CHART_TIMEOUT_SECS overrides)
{timeout}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# JSON file logging (in addition to stderr)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display(),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}
