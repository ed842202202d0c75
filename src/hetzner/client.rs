use async_trait::async_trait;
use reqwest::{Client, Method, header};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ProviderError;
use crate::hetzner::types::*;

pub const DEFAULT_BASE_URL: &str = "https://dns.hetzner.com/api/v1";

const API_TOKEN_HEADER: &str = "Auth-API-Token";
const PER_PAGE: u32 = 100;

/// Request/response mapping onto the provider's HTTP endpoints.
///
/// Bulk calls only fail on transport or decoding problems. A non-2xx
/// response is reported through [`BulkOutcome::failure`] so that the caller
/// can carry on with the remaining phases.
#[async_trait]
pub trait DnsApi: Send + Sync {
    async fn list_zones(&self) -> Result<Vec<Zone>, ProviderError>;

    async fn list_records(&self, zone_id: &str) -> Result<Vec<ProviderRecord>, ProviderError>;

    async fn bulk_create(&self, records: &[ProviderRecord]) -> Result<BulkOutcome, ProviderError>;

    async fn bulk_update(&self, records: &[ProviderRecord]) -> Result<BulkOutcome, ProviderError>;

    async fn delete_record(&self, record: &ProviderRecord) -> Result<(), ProviderError>;
}

#[derive(Clone)]
pub struct HetznerClient {
    http: Client,
    base_url: String, // e.g. "https://dns.hetzner.com/api/v1"
    api_token: String,
}

impl HetznerClient {
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self::with_http(Client::new(), base_url, api_token)
    }

    /// Use a preconfigured `reqwest::Client` (timeouts, proxies, TLS roots).
    pub fn with_http(
        http: Client,
        base_url: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_token: api_token.into(),
        }
    }

    fn auth_header(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header(API_TOKEN_HEADER, &self.api_token)
            .header(header::ACCEPT, "application/json")
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        context: &'static str,
    ) -> Result<T, ProviderError> {
        let res = self
            .auth_header(self.http.get(self.url(path)))
            .query(query)
            .send()
            .await?;
        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            return Err(ProviderError::from_status(status.as_u16(), body));
        }
        serde_json::from_str(&body).map_err(|e| ProviderError::decode(context, e))
    }

    async fn send_bulk<T>(
        &self,
        method: Method,
        records: &[ProviderRecord],
        context: &'static str,
    ) -> Result<BulkOutcome, ProviderError>
    where
        T: DeserializeOwned + Into<BulkOutcome>,
    {
        let body = BulkRecordsRequest {
            records: records.iter().map(WireRecord::from).collect(),
        };
        let res = self
            .auth_header(self.http.request(method, self.url("records/bulk")))
            .json(&body)
            .send()
            .await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Ok(BulkOutcome::failed(status.as_u16(), text));
        }
        if text.trim().is_empty() {
            return Ok(BulkOutcome {
                accepted: body.records,
                ..BulkOutcome::default()
            });
        }
        let parsed: T =
            serde_json::from_str(&text).map_err(|e| ProviderError::decode(context, e))?;
        Ok(parsed.into())
    }
}

#[async_trait]
impl DnsApi for HetznerClient {
    async fn list_zones(&self) -> Result<Vec<Zone>, ProviderError> {
        let mut zones = Vec::new();
        let mut page = 1;
        loop {
            let query = [("page", page.to_string()), ("per_page", PER_PAGE.to_string())];
            let resp: ZonesResponse = self.get_json("zones", &query, "zones").await?;
            zones.extend(resp.zones);
            if !Meta::has_more(&resp.meta, page) {
                break;
            }
            page += 1;
        }
        debug!(count = zones.len(), "listed zones");
        Ok(zones)
    }

    async fn list_records(&self, zone_id: &str) -> Result<Vec<ProviderRecord>, ProviderError> {
        let mut records = Vec::new();
        let mut page = 1;
        loop {
            let query = [
                ("zone_id", zone_id.to_string()),
                ("page", page.to_string()),
                ("per_page", PER_PAGE.to_string()),
            ];
            let resp: RecordsResponse = self.get_json("records", &query, "records").await?;
            records.extend(resp.records.into_iter().filter_map(WireRecord::into_record));
            if !Meta::has_more(&resp.meta, page) {
                break;
            }
            page += 1;
        }
        debug!(zone_id, count = records.len(), "listed records");
        Ok(records)
    }

    async fn bulk_create(&self, records: &[ProviderRecord]) -> Result<BulkOutcome, ProviderError> {
        self.send_bulk::<BulkCreateResponse>(Method::POST, records, "bulk create").await
    }

    async fn bulk_update(&self, records: &[ProviderRecord]) -> Result<BulkOutcome, ProviderError> {
        self.send_bulk::<BulkUpdateResponse>(Method::PUT, records, "bulk update").await
    }

    async fn delete_record(&self, record: &ProviderRecord) -> Result<(), ProviderError> {
        let url = self.url(&format!("records/{}", record.id));
        let res = self.auth_header(self.http.delete(url)).send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status.as_u16(), body));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slashes() {
        let client = HetznerClient::new("https://dns.hetzner.com/api/v1/", "t");
        assert_eq!(client.url("/zones"), "https://dns.hetzner.com/api/v1/zones");
        assert_eq!(client.url("records/abc"), "https://dns.hetzner.com/api/v1/records/abc");
    }
}
