//! UniFi Network Inventory Source
//!
//! Lists the clients a UniFi Network controller currently reports, using the
//! Integration API:
//!
//! `GET {api_url}/proxy/network/integration/v1/sites/{site_id}/clients?limit=N&offset=M`
//!
//! The key is sent in the `X-API-KEY` header. Controllers usually serve a
//! self-signed certificate, so certificate validation is off unless the
//! configuration says otherwise.
//!
//! Pages are requested sequentially until the collected count reaches the
//! reported `totalCount` or a page comes back empty. Any failed page fails
//! the whole listing; a partial inventory is never returned.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use unifi_dns_core::config::InventoryConfig;
use unifi_dns_core::traits::{InventorySource, InventorySourceFactory, NetworkClient};
use unifi_dns_core::{Error, Result};

/// Name used for registration and in error messages
pub const SOURCE_NAME: &str = "unifi";

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// One page of the client listing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListClientsResponse {
    #[serde(default)]
    total_count: usize,
    #[serde(default)]
    data: Vec<ApiClient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiClient {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    mac_address: String,
    #[serde(default)]
    ip_address: Option<String>,
}

impl From<ApiClient> for NetworkClient {
    fn from(client: ApiClient) -> Self {
        NetworkClient {
            id: client.id,
            name: client.name,
            mac_address: client.mac_address,
            ip_address: client.ip_address.unwrap_or_default(),
        }
    }
}

/// Whether another page must be requested
fn has_more(collected: usize, page_len: usize, total_count: usize) -> bool {
    page_len > 0 && collected < total_count
}

/// UniFi Network controller client listing
pub struct UnifiInventorySource {
    base_url: String,
    api_key: String,
    site_id: String,
    page_size: u32,
    client: reqwest::Client,
}

impl std::fmt::Debug for UnifiInventorySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnifiInventorySource")
            .field("base_url", &self.base_url)
            .field("api_key", &"<REDACTED>")
            .field("site_id", &self.site_id)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl UnifiInventorySource {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        site_id: impl Into<String>,
        page_size: u32,
        accept_invalid_certs: bool,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            site_id: site_id.into(),
            page_size: page_size.max(1),
            client,
        })
    }

    fn clients_url(&self) -> String {
        format!(
            "{}/proxy/network/integration/v1/sites/{}/clients",
            self.base_url, self.site_id
        )
    }

    async fn fetch_page(&self, offset: usize) -> Result<ListClientsResponse> {
        let response = self
            .client
            .get(self.clients_url())
            .query(&[("limit", self.page_size as usize), ("offset", offset)])
            .header("X-API-KEY", &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| Error::http(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return match status.as_u16() {
                401 | 403 => Err(Error::auth(format!("UniFi rejected the API key: {}", status))),
                404 => Err(Error::not_found(format!("UniFi site not found: {}", self.site_id))),
                _ => Err(Error::provider(SOURCE_NAME, format!("HTTP error: {}", status))),
            };
        }

        response
            .json()
            .await
            .map_err(|e| Error::provider(SOURCE_NAME, format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl InventorySource for UnifiInventorySource {
    async fn list_clients(&self) -> Result<Vec<NetworkClient>> {
        let mut clients: Vec<NetworkClient> = Vec::new();
        let mut offset = 0usize;

        loop {
            let page = self
                .fetch_page(offset)
                .await
                .map_err(|e| Error::provider(SOURCE_NAME, format!("page at offset {}: {}", offset, e)))?;

            let page_len = page.data.len();
            clients.extend(page.data.into_iter().map(NetworkClient::from));

            tracing::debug!(
                offset,
                page_len,
                total_count = page.total_count,
                "Fetched client page"
            );

            if !has_more(clients.len(), page_len, page.total_count) {
                break;
            }
            offset += self.page_size as usize;
        }

        Ok(clients)
    }

    fn source_name(&self) -> &'static str {
        SOURCE_NAME
    }
}

pub struct UnifiInventorySourceFactory;

impl InventorySourceFactory for UnifiInventorySourceFactory {
    fn create(&self, config: &InventoryConfig) -> Result<Box<dyn InventorySource>> {
        config.validate()?;

        match config {
            InventoryConfig::Unifi {
                api_url,
                api_key,
                site_id,
                page_size,
                accept_invalid_certs,
            } => Ok(Box::new(UnifiInventorySource::new(
                api_url.clone(),
                api_key.clone(),
                site_id.clone(),
                *page_size,
                *accept_invalid_certs,
            )?)),
            _ => Err(Error::config("Invalid config for UniFi inventory source")),
        }
    }
}

/// Register the UniFi inventory source with a registry
pub fn register(registry: &unifi_dns_core::ProviderRegistry) {
    registry.register_inventory_source(SOURCE_NAME, Box::new(UnifiInventorySourceFactory));
}
