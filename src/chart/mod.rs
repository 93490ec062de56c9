//! Pie chart configuration
//!
//! Typed mirror of the widget's stored JSON. Keys are camelCase on the wire.
//!
//! ```json
//! {
//!   "title": "Volume by token",
//!   "dataSource": "Dune",
//!   "queryId": "2030584",
//!   "options": {
//!     "xColumn": "token",
//!     "yColumn": "volume",
//!     "numberFormat": "$0.00a",
//!     "legend": { "show": true, "position": "right" }
//!   },
//!   "mode": "Live"
//! }
//! ```

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::fetch::{DataSource, FetchOptions};

pub mod slices;

pub use slices::{build_slices, PieSlice};

/// Where the legend sits relative to the pie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

impl LegendPosition {
    /// Left/right legends stack vertically; top/bottom run horizontally
    pub fn is_vertical(&self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<LegendPosition>,
}

/// Display name and colour override for one slice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueOption {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieChartOptions {
    /// Column holding slice names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_column: Option<String>,
    /// Column holding slice values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serie_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<LegendOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_data_labels: Option<bool>,
    /// Format specifier for slice labels, e.g. `"0.00a"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_format: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values_options: Vec<ValueOption>,
}

impl PieChartOptions {
    /// Colour override for a slice name, first match wins
    pub fn color_for(&self, name: &str) -> Option<&str> {
        self.values_options
            .iter()
            .find(|option| option.name == name)
            .map(|option| option.color.as_str())
    }

    pub fn legend_position(&self) -> LegendPosition {
        self.legend
            .as_ref()
            .and_then(|legend| legend.position)
            .unwrap_or_default()
    }
}

/// Live charts refetch their rows; snapshots render a stored file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModeType {
    #[default]
    Live,
    Snapshot,
}

/// Immutable stored file backing a snapshot, addressed by content id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieChartConfig {
    #[serde(default)]
    pub api_endpoint: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub options: PieChartOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ModeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<DataSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_id: Option<String>,
}

impl PieChartConfig {
    /// Load a chart config from a `.json` or `.toml` file
    ///
    /// # Errors
    /// If the file cannot be read, has an unknown extension, or does not parse
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read chart config {}", path.display()))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("json") => serde_json::from_str(&contents)
                .with_context(|| format!("Invalid chart config {}", path.display())),
            Some("toml") => toml::from_str(&contents)
                .with_context(|| format!("Invalid chart config {}", path.display())),
            _ => bail!(
                "Unsupported chart config format {} (expected .json or .toml)",
                path.display()
            ),
        }
    }

    pub fn mode(&self) -> ModeType {
        self.mode.unwrap_or_default()
    }

    /// The stored file, only meaningful in snapshot mode
    pub fn snapshot_file(&self) -> Option<&FileRef> {
        match self.mode() {
            ModeType::Snapshot => self.file.as_ref(),
            ModeType::Live => None,
        }
    }

    /// Fetch options for this chart's data source
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            data_source: self.data_source,
            query_id: self.query_id.clone(),
            api_endpoint: Some(self.api_endpoint.clone()).filter(|e| !e.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> PieChartConfig {
        serde_json::from_value(json!({
            "apiEndpoint": "",
            "title": "Volume by token",
            "description": "Last 30 days",
            "dataSource": "Dune",
            "queryId": "2030584",
            "options": {
                "xColumn": "token",
                "yColumn": "volume",
                "serieName": "Volume",
                "legend": { "show": true, "scroll": false, "position": "right" },
                "showDataLabels": true,
                "numberFormat": "$0.00a",
                "valuesOptions": [
                    { "name": "ETH", "color": "#627eea" },
                    { "name": "ETH", "color": "#000000" }
                ]
            },
            "mode": "Live"
        }))
        .unwrap()
    }

    #[test]
    fn test_deserialize_widget_json() {
        let config = sample();
        assert_eq!(config.title, "Volume by token");
        assert_eq!(config.options.x_column.as_deref(), Some("token"));
        assert_eq!(config.options.legend_position(), LegendPosition::Right);
        assert!(config.options.legend_position().is_vertical());
        assert_eq!(config.options.color_for("ETH"), Some("#627eea"));
        assert_eq!(config.options.color_for("BTC"), None);
        assert_eq!(config.mode(), ModeType::Live);
    }

    #[test]
    fn test_minimal_config_defaults() {
        let config: PieChartConfig = serde_json::from_value(json!({ "title": "t" })).unwrap();
        assert_eq!(config.mode(), ModeType::Live);
        assert_eq!(config.options.legend_position(), LegendPosition::Top);
        assert_eq!(config.fetch_options(), FetchOptions::default());
    }

    #[test]
    fn test_fetch_options() {
        assert_eq!(sample().fetch_options(), FetchOptions::dune("2030584"));

        let custom: PieChartConfig = serde_json::from_value(json!({
            "apiEndpoint": "https://example.com/rows",
            "title": "t",
            "dataSource": "Custom"
        }))
        .unwrap();
        assert_eq!(custom.fetch_options(), FetchOptions::custom("https://example.com/rows"));
    }

    #[test]
    fn test_snapshot_file_only_in_snapshot_mode() {
        let mut config = sample();
        config.file = Some(FileRef {
            cid: Some("bafy123".to_string()),
            name: Some("data.json".to_string()),
        });
        assert!(config.snapshot_file().is_none());

        config.mode = Some(ModeType::Snapshot);
        assert_eq!(
            config.snapshot_file().and_then(|f| f.cid.as_deref()),
            Some("bafy123")
        );
    }

    #[test]
    fn test_serialize_roundtrip_keeps_camel_case() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["options"]["numberFormat"], "$0.00a");
        assert_eq!(value["options"]["legend"]["position"], "right");
        assert_eq!(value["dataSource"], "Dune");

        let back: PieChartConfig = serde_json::from_value(value).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_load_json_and_toml() {
        let dir = std::env::temp_dir();
        let id = std::process::id();

        let json_path = dir.join(format!("pie-chart-load-{id}.json"));
        std::fs::write(&json_path, serde_json::to_string(&sample()).unwrap()).unwrap();
        assert_eq!(PieChartConfig::load(&json_path).unwrap(), sample());

        let toml_path = dir.join(format!("pie-chart-load-{id}.toml"));
        std::fs::write(
            &toml_path,
            r#"
title = "From TOML"
apiEndpoint = "https://example.com/rows"
dataSource = "Custom"

[options]
xColumn = "name"
yColumn = "value"
"#,
        )
        .unwrap();
        let config = PieChartConfig::load(&toml_path).unwrap();
        assert_eq!(config.title, "From TOML");
        assert_eq!(config.options.y_column.as_deref(), Some("value"));

        let yaml_path = dir.join(format!("pie-chart-load-{id}.yaml"));
        std::fs::write(&yaml_path, "title: nope").unwrap();
        assert!(PieChartConfig::load(&yaml_path).is_err());

        for path in [json_path, toml_path, yaml_path] {
            let _ = std::fs::remove_file(path);
        }
    }
}
