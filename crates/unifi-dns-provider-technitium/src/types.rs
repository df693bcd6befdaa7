//! Wire types for the Technitium DNS Server HTTP API

use serde::Deserialize;
use unifi_dns_core::traits::{DnsRecord, RecordType, Zone};

/// Envelope wrapped around every API response
///
/// `response` is absent when `status` is not `"ok"`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub response: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct ListZonesResponse {
    #[serde(default)]
    pub zones: Vec<ApiZone>,
}

#[derive(Debug, Deserialize)]
pub struct ApiZone {
    pub name: String,
}

impl From<ApiZone> for Zone {
    fn from(zone: ApiZone) -> Self {
        Zone { name: zone.name }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListRecordsResponse {
    #[serde(default)]
    pub records: Vec<ApiRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default)]
    pub ttl: u32,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub r_data: RData,
}

/// Record data; only the address of A/AAAA records is read
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RData {
    #[serde(default)]
    pub ip_address: Option<String>,
}

impl From<ApiRecord> for DnsRecord {
    fn from(record: ApiRecord) -> Self {
        DnsRecord {
            name: record.name,
            record_type: RecordType::from(record.record_type.as_str()),
            ttl: record.ttl,
            comments: record.comments.unwrap_or_default(),
            ip_address: record.r_data.ip_address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_records_envelope() {
        let body = r#"{
            "status": "ok",
            "response": {
                "zone": { "name": "home.lan", "type": "Primary" },
                "records": [
                    {
                        "disabled": false,
                        "name": "laptop.home.lan",
                        "type": "A",
                        "ttl": 3600,
                        "rData": { "ipAddress": "10.0.0.2" },
                        "comments": "aa:bb:cc:dd:ee:ff"
                    },
                    {
                        "name": "home.lan",
                        "type": "NS",
                        "ttl": 3600,
                        "rData": { "nameServer": "ns1.home.lan" }
                    }
                ]
            }
        }"#;

        let parsed: ApiResponse<ListRecordsResponse> = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.status, "ok");

        let records: Vec<DnsRecord> = parsed
            .response
            .unwrap()
            .records
            .into_iter()
            .map(DnsRecord::from)
            .collect();

        assert_eq!(
            records[0],
            DnsRecord::a("laptop.home.lan", "10.0.0.2", 3600, "aa:bb:cc:dd:ee:ff")
        );
        assert_eq!(records[1].record_type, RecordType::Other("NS".to_string()));
        assert_eq!(records[1].ip(), None);
        assert_eq!(records[1].comments, "");
    }

    #[test]
    fn test_parse_error_envelope() {
        let body = r#"{"status":"invalid-token","errorMessage":"Invalid token or session expired."}"#;

        let parsed: ApiResponse<ListZonesResponse> = serde_json::from_str(body).unwrap();

        assert_eq!(parsed.status, "invalid-token");
        assert!(parsed.response.is_none());
        assert_eq!(
            parsed.error_message.as_deref(),
            Some("Invalid token or session expired.")
        );
    }
}
