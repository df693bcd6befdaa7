// # DNS Provider Trait
//
// Defines the interface for reading and mutating records in the
// authoritative DNS zone.
//
// ## Implementations
//
// - Technitium DNS Server: `unifi-dns-provider-technitium` crate
//
// ## Usage
//
// ```rust,ignore
// use unifi_dns_core::DnsProvider;
//
// #[tokio::main]
// async fn main() -> unifi_dns_core::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     provider.get_zone("home.lan").await?;
//     for record in provider.list_records("home.lan").await? {
//         println!("{} {} {:?}", record.name, record.record_type, record.ip_address);
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::fmt;

/// A zone managed by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    /// Fully qualified zone name (e.g., "home.lan")
    pub name: String,
}

/// DNS record type
///
/// Only A records are ever written. Other types are carried through so
/// that provider listings can be filtered without losing information.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// IPv4 address record
    A,
    /// IPv6 address record
    Aaaa,
    /// Any other type, keyed by its wire name
    Other(String),
}

impl RecordType {
    /// Wire name of the record type
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Other(name) => name,
        }
    }
}

impl From<&str> for RecordType {
    fn from(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "A" => RecordType::A,
            "AAAA" => RecordType::Aaaa,
            other => RecordType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A DNS record as seen by the sync engine
///
/// Identity for diffing is `name` (within one zone, type A only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    /// Fully qualified record name (e.g., "laptop.home.lan")
    pub name: String,
    /// Record type
    pub record_type: RecordType,
    /// Time-to-live in seconds
    pub ttl: u32,
    /// Free-text comment (the client's MAC address for managed records)
    pub comments: String,
    /// IPv4 address, if the provider reported one
    pub ip_address: Option<String>,
}

impl DnsRecord {
    /// Create an A record
    pub fn a(
        name: impl Into<String>,
        ip_address: impl Into<String>,
        ttl: u32,
        comments: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            record_type: RecordType::A,
            ttl,
            comments: comments.into(),
            ip_address: Some(ip_address.into()),
        }
    }

    /// The address, treating an empty string the same as an absent one
    pub fn ip(&self) -> Option<&str> {
        self.ip_address.as_deref().filter(|ip| !ip.is_empty())
    }
}

/// Trait for DNS provider implementations
///
/// This trait defines the interface the reconciliation pass uses to talk to
/// the authoritative DNS server.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. A pass only ever issues one call at
/// a time, but the trait object is shared behind references.
///
/// # Responsibilities
///
/// Providers translate calls to their API and report success or failure.
/// They do not retry, do not cache between calls and do not decide which
/// records should exist. Filtering the listing down to A records is done by
/// the engine.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Look up a zone by name
    ///
    /// # Returns
    ///
    /// - `Ok(Zone)`: The zone exists
    /// - `Err(Error::ZoneNotFound)`: No zone with that name
    /// - `Err(Error)`: The lookup itself failed
    async fn get_zone(&self, zone: &str) -> Result<Zone, crate::Error>;

    /// List every record in a zone, of any type
    async fn list_records(&self, zone: &str) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Create or overwrite a record
    ///
    /// # Idempotency
    ///
    /// An existing record with the same name and type is overwritten, so
    /// calling this repeatedly with the same record is safe.
    async fn upsert_record(&self, zone: &str, record: &DnsRecord) -> Result<(), crate::Error>;

    /// Delete a record
    async fn delete_record(&self, zone: &str, record: &DnsRecord) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS providers from configuration
pub trait DnsProviderFactory: Send + Sync {
    /// Create a DnsProvider instance from configuration
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn DnsProvider>, crate::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_type_parsing() {
        assert_eq!(RecordType::from("A"), RecordType::A);
        assert_eq!(RecordType::from("aaaa"), RecordType::Aaaa);
        assert_eq!(RecordType::from("CNAME"), RecordType::Other("CNAME".into()));
        assert_eq!(RecordType::Other("TXT".into()).to_string(), "TXT");
    }

    #[test]
    fn test_empty_ip_is_absent() {
        let mut record = DnsRecord::a("x.lan", "", 3600, "");
        assert_eq!(record.ip(), None);

        record.ip_address = None;
        assert_eq!(record.ip(), None);

        record.ip_address = Some("10.0.0.5".into());
        assert_eq!(record.ip(), Some("10.0.0.5"));
    }
}
