// # Technitium DNS Provider
//
// This crate provides a Technitium DNS Server provider for unifi-dns-sync.
//
// ## Behavior
//
// - One HTTP request per trait call; the engine decides what to call and when
// - HTTP timeout configured (10 seconds)
// - Upserts overwrite any existing A record of the same name and ask the
//   server to maintain the matching PTR record (creating the reverse zone if
//   needed)
// - Dry-run mode: reads are performed, mutations are only logged
// - No retries and no caching
//
// ## Security Requirements
//
// - The API token NEVER appears in logs or error messages
// - The Debug implementation redacts the token
//
// ## API Reference
//
// Every call is a GET with the token and arguments as query parameters. The
// body is an envelope `{"status": "ok" | ..., "errorMessage": ..., "response": ...}`.
//
// - List zones: `/api/zones/list`
// - List records: `/api/zones/records/get?zone=Z&domain=Z&listZone=true`
// - Add record: `/api/zones/records/add`
// - Delete record: `/api/zones/records/delete`

mod types;

use async_trait::async_trait;
use serde::de::{DeserializeOwned, IgnoredAny};
use std::time::Duration;
use unifi_dns_core::config::ProviderConfig;
use unifi_dns_core::traits::{DnsProvider, DnsProviderFactory, DnsRecord, Zone};
use unifi_dns_core::{Error, Result};

use types::{ApiResponse, ListRecordsResponse, ListZonesResponse};

/// Name used for registration and in error messages
pub const PROVIDER_NAME: &str = "technitium";

/// Default HTTP timeout for API requests (10 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Envelope status of a successful call
const STATUS_OK: &str = "ok";

/// Envelope status returned for a bad or expired token
const STATUS_INVALID_TOKEN: &str = "invalid-token";

/// Failures talking to the Technitium API
#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error("request to {path} failed: {source}")]
    Transport {
        path: &'static str,
        source: reqwest::Error,
    },

    #[error("{path} returned HTTP {status}")]
    Status {
        path: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("failed to parse response from {path}: {source}")]
    Decode {
        path: &'static str,
        source: reqwest::Error,
    },

    #[error("{path} rejected the token: {message}")]
    InvalidToken { path: &'static str, message: String },

    #[error("{path} returned status '{status}': {message}")]
    Api {
        path: &'static str,
        status: String,
        message: String,
    },
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        match &err {
            ApiError::Transport { .. } => Error::http(err.to_string()),
            ApiError::Status { status, .. }
                if *status == reqwest::StatusCode::UNAUTHORIZED
                    || *status == reqwest::StatusCode::FORBIDDEN =>
            {
                Error::auth(err.to_string())
            }
            ApiError::InvalidToken { .. } => Error::auth(err.to_string()),
            _ => Error::provider(PROVIDER_NAME, err.to_string()),
        }
    }
}

/// Technitium DNS Server provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true the provider still lists zones and records, but
/// upserts and deletes are logged and reported as successful without
/// contacting the server.
pub struct TechnitiumProvider {
    /// Server base URL without trailing slash
    base_url: String,

    /// API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Log mutations instead of sending them
    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for TechnitiumProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TechnitiumProvider")
            .field("base_url", &self.base_url)
            .field("api_token", &"<REDACTED>")
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl TechnitiumProvider {
    /// Create a new Technitium provider
    ///
    /// # Returns
    ///
    /// - `Err(Error::Config)`: Empty URL or token, or the HTTP client could
    ///   not be built
    pub fn new(api_url: impl Into<String>, api_token: impl Into<String>, dry_run: bool) -> Result<Self> {
        let api_url = api_url.into();
        let api_token = api_token.into();

        if api_url.is_empty() {
            return Err(Error::config("Technitium API URL cannot be empty"));
        }
        if api_token.is_empty() {
            return Err(Error::config("Technitium API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: api_url.trim_end_matches('/').to_string(),
            api_token,
            client,
            dry_run,
        })
    }

    /// Whether mutations are only logged
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Issue one API call and unwrap the response envelope
    async fn request<T: DeserializeOwned>(
        &self,
        path: &'static str,
        params: &[(&'static str, String)],
    ) -> std::result::Result<Option<T>, ApiError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("token", self.api_token.as_str())])
            .send()
            .await
            .map_err(|e| ApiError::Transport {
                path,
                source: e.without_url(),
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ApiError::Status { path, status });
        }

        let envelope: ApiResponse<T> = response.json().await.map_err(|e| ApiError::Decode {
            path,
            source: e.without_url(),
        })?;

        match envelope.status.as_str() {
            STATUS_OK => Ok(envelope.response),
            STATUS_INVALID_TOKEN => Err(ApiError::InvalidToken {
                path,
                message: envelope.error_message.unwrap_or_default(),
            }),
            other => Err(ApiError::Api {
                path,
                status: other.to_string(),
                message: envelope.error_message.unwrap_or_default(),
            }),
        }
    }
}

/// Query parameters for listing every record in a zone
fn list_records_params(zone: &str) -> Vec<(&'static str, String)> {
    vec![
        ("zone", zone.to_string()),
        ("domain", zone.to_string()),
        ("listZone", "true".to_string()),
    ]
}

/// Query parameters for writing an A record with its PTR
fn upsert_params(zone: &str, record: &DnsRecord) -> Vec<(&'static str, String)> {
    vec![
        ("zone", zone.to_string()),
        ("domain", record.name.clone()),
        ("type", record.record_type.as_str().to_string()),
        ("ttl", record.ttl.to_string()),
        ("comments", record.comments.clone()),
        ("ptr", "true".to_string()),
        ("createPtrZone", "true".to_string()),
        ("overwrite", "true".to_string()),
        ("ipAddress", record.ip().unwrap_or_default().to_string()),
    ]
}

/// Query parameters for deleting one record
fn delete_params(zone: &str, record: &DnsRecord) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("zone", zone.to_string()),
        ("domain", record.name.clone()),
        ("type", record.record_type.as_str().to_string()),
    ];
    if let Some(ip) = record.ip() {
        params.push(("ipAddress", ip.to_string()));
    }
    params
}

#[async_trait]
impl DnsProvider for TechnitiumProvider {
    async fn get_zone(&self, zone: &str) -> Result<Zone> {
        let zones = self
            .request::<ListZonesResponse>("/api/zones/list", &[])
            .await?
            .map(|r| r.zones)
            .unwrap_or_default();

        tracing::debug!(zones = zones.len(), "Listed zones");

        zones
            .into_iter()
            .find(|z| z.name == zone)
            .map(Zone::from)
            .ok_or_else(|| Error::zone_not_found(zone))
    }

    async fn list_records(&self, zone: &str) -> Result<Vec<DnsRecord>> {
        let records = self
            .request::<ListRecordsResponse>("/api/zones/records/get", &list_records_params(zone))
            .await?
            .map(|r| r.records)
            .unwrap_or_default();

        Ok(records.into_iter().map(DnsRecord::from).collect())
    }

    async fn upsert_record(&self, zone: &str, record: &DnsRecord) -> Result<()> {
        if record.ip().is_none() {
            return Err(Error::invalid_input(format!(
                "Record {} has no address",
                record.name
            )));
        }

        if self.dry_run {
            tracing::info!(
                record = %record.name,
                ip = record.ip().unwrap_or_default(),
                ttl = record.ttl,
                "[DRY-RUN] Would upsert record"
            );
            return Ok(());
        }

        self.request::<IgnoredAny>("/api/zones/records/add", &upsert_params(zone, record))
            .await?;
        Ok(())
    }

    async fn delete_record(&self, zone: &str, record: &DnsRecord) -> Result<()> {
        if self.dry_run {
            tracing::info!(
                record = %record.name,
                ip = record.ip().unwrap_or_default(),
                "[DRY-RUN] Would delete record"
            );
            return Ok(());
        }

        self.request::<IgnoredAny>("/api/zones/records/delete", &delete_params(zone, record))
            .await?;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

pub struct TechnitiumFactory;

impl DnsProviderFactory for TechnitiumFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn DnsProvider>> {
        match config {
            ProviderConfig::Technitium {
                api_url,
                api_token,
                dry_run,
            } => {
                if *dry_run {
                    tracing::warn!(
                        "Technitium provider running in DRY-RUN mode - no changes will be made"
                    );
                }

                Ok(Box::new(TechnitiumProvider::new(
                    api_url.clone(),
                    api_token.clone(),
                    *dry_run,
                )?))
            }
            _ => Err(Error::config("Invalid config for Technitium provider")),
        }
    }
}

/// Register the Technitium provider with a registry
pub fn register(registry: &unifi_dns_core::ProviderRegistry) {
    registry.register_provider(PROVIDER_NAME, Box::new(TechnitiumFactory));
}
