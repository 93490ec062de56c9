//! Remote rows fetcher
//!
//! Pulls the rows a chart is drawn from. A chart with a broken data source
//! should render empty, not fail, so every failure collapses to an empty row
//! list. The decision is still kept as a value ([`FetchOutcome`]) so callers
//! and tests can see *why* a fetch came back empty.
//!
//! # Endpoints
//!
//! ```text
//! DataSource::Dune    → /dune/query/<query_id>   (joined onto api_base)
//! DataSource::Custom  → api_endpoint verbatim    (absolute, or joined onto api_base)
//! ```
//!
//! The response must look like `{"result": {"rows": [...]}}`.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

use crate::config::Config;


/// One untyped result row, consumed as-is
pub type Row = Value;

/// Path prefix for managed (Dune) queries
const DUNE_QUERY_PATH: &str = "/dune/query";

/// Where a chart's rows come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    /// Managed query service, addressed by query id
    Dune,
    /// Arbitrary endpoint taken from the chart config
    Custom,
    /// Any selector this crate does not know; never fetches
    #[serde(other)]
    Unknown,
}

impl DataSource {
    /// Parse a selector name (case-insensitive)
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "dune" => Self::Dune,
            "custom" => Self::Custom,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dune => f.write_str("Dune"),
            Self::Custom => f.write_str("Custom"),
            Self::Unknown => f.write_str("Unknown"),
        }
    }
}

/// What to fetch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchOptions {
    pub data_source: Option<DataSource>,
    pub query_id: Option<String>,
    pub api_endpoint: Option<String>,
}

impl FetchOptions {
    pub fn dune(query_id: impl Into<String>) -> Self {
        Self {
            data_source: Some(DataSource::Dune),
            query_id: Some(query_id.into()),
            api_endpoint: None,
        }
    }

    pub fn custom(api_endpoint: impl Into<String>) -> Self {
        Self {
            data_source: Some(DataSource::Custom),
            query_id: None,
            api_endpoint: Some(api_endpoint.into()),
        }
    }

    /// Resolve the endpoint for the selected data source, before any base
    /// URL is applied
    pub fn endpoint(&self) -> Result<String, DegradeReason> {
        let data_source = self.data_source.ok_or(DegradeReason::NoDataSource)?;

        let endpoint = match data_source {
            DataSource::Dune => self
                .query_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(|id| format!("{DUNE_QUERY_PATH}/{id}")),
            DataSource::Custom => self
                .api_endpoint
                .as_deref()
                .map(str::trim)
                .filter(|endpoint| !endpoint.is_empty())
                .map(str::to_string),
            DataSource::Unknown => None,
        };

        endpoint.ok_or(DegradeReason::NoEndpoint(data_source))
    }
}

/// Why a fetch produced no rows
#[derive(Debug)]
pub enum DegradeReason {
    /// No data source selected; nothing was requested
    NoDataSource,
    /// The data source resolved to an empty endpoint
    NoEndpoint(DataSource),
    /// The endpoint is not a usable URL (e.g. relative with no base)
    InvalidEndpoint(String),
    /// Request could not be sent or the body could not be read
    Network(String),
    /// Body is not JSON
    Parse(String),
    /// JSON body has no `result.rows` array
    MissingRows,
}

impl fmt::Display for DegradeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDataSource => write!(f, "No data source configured"),
            Self::NoEndpoint(source) => write!(f, "No endpoint for data source {}", source),
            Self::InvalidEndpoint(msg) => write!(f, "Invalid endpoint: {}", msg),
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Parse(msg) => write!(f, "Malformed response: {}", msg),
            Self::MissingRows => write!(f, "Response has no result.rows array"),
        }
    }
}

impl std::error::Error for DegradeReason {}

/// Result of a fetch: rows, or the reason the chart will be empty
#[derive(Debug)]
pub enum FetchOutcome {
    Rows(Vec<Row>),
    Degraded(DegradeReason),
}

impl FetchOutcome {
    pub fn degrade_reason(&self) -> Option<&DegradeReason> {
        match self {
            Self::Rows(_) => None,
            Self::Degraded(reason) => Some(reason),
        }
    }

    /// Collapse to rows; degraded outcomes are empty
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            Self::Rows(rows) => rows,
            Self::Degraded(_) => Vec::new(),
        }
    }
}

/// Pull `result.rows` out of a response body
pub fn extract_rows(mut body: Value) -> Result<Vec<Row>, DegradeReason> {
    match body.pointer_mut("/result/rows").map(Value::take) {
        Some(Value::Array(rows)) => Ok(rows),
        _ => Err(DegradeReason::MissingRows),
    }
}

/// HTTP fetcher for chart rows
///
/// Cheap to clone; clones share the underlying connection pool. Fetches hold
/// no shared state, so any number may run concurrently.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    api_base: Option<Url>,
}

impl Fetcher {
    /// Create a fetcher
    ///
    /// `api_base` resolves relative endpoints such as `/dune/query/<id>`.
    /// Without a `timeout` a hung request waits indefinitely.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn new(api_base: Option<Url>, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, api_base })
    }

    /// Create a fetcher from application config
    ///
    /// # Errors
    /// Returns an error if `api_base` is not a valid URL or the client
    /// cannot be built
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_base = config
            .api_base
            .as_deref()
            .map(Url::parse)
            .transpose()
            .map_err(|e| anyhow::anyhow!("Invalid api_base: {}", e))?;

        Self::new(api_base, config.timeout_secs.map(Duration::from_secs))
    }

    fn resolve(&self, endpoint: &str) -> Result<Url, DegradeReason> {
        if let Ok(url) = Url::parse(endpoint) {
            return Ok(url);
        }
        let base = self.api_base.as_ref().ok_or_else(|| {
            DegradeReason::InvalidEndpoint(format!("{} is relative and no api_base is set", endpoint))
        })?;
        base.join(endpoint)
            .map_err(|e| DegradeReason::InvalidEndpoint(format!("{}: {}", endpoint, e)))
    }

    /// Fetch rows, reporting why the result is empty when it is
    pub async fn fetch(&self, options: &FetchOptions) -> FetchOutcome {
        let url = match options.endpoint().and_then(|endpoint| self.resolve(&endpoint)) {
            Ok(url) => url,
            Err(reason) => return degrade(reason),
        };

        tracing::debug!(%url, "Fetching chart rows");

        // Status is not inspected: an error page that still carries
        // result.rows is used, anything else fails to parse below.
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => return degrade(DegradeReason::Network(e.to_string())),
        };

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) if e.is_decode() => return degrade(DegradeReason::Parse(e.to_string())),
            Err(e) => return degrade(DegradeReason::Network(e.to_string())),
        };

        match extract_rows(body) {
            Ok(rows) => {
                tracing::debug!(%url, rows = rows.len(), "Fetched chart rows");
                FetchOutcome::Rows(rows)
            }
            Err(reason) => degrade(reason),
        }
    }

    /// Fetch rows; every failure yields an empty list
    pub async fn call_api(&self, options: &FetchOptions) -> Vec<Row> {
        self.fetch(options).await.into_rows()
    }
}

fn degrade(reason: DegradeReason) -> FetchOutcome {
    match reason {
        DegradeReason::NoDataSource => tracing::debug!("Skipping fetch: {}", reason),
        _ => tracing::warn!("Chart rows unavailable: {}", reason),
    }
    FetchOutcome::Degraded(reason)
}
