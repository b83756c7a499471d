// # Alibaba Cloud DNS Record Store
//
// This crate binds the `RecordStore` capability to the Alibaba Cloud DNS
// (alidns) OpenAPI, version 2015-01-09.
//
// Three remote operations back the three trait methods:
// - `DescribeDomainRecords` → read the published record
// - `AddDomainRecord`       → create the first record
// - `UpdateDomainRecord`    → update an existing record by id
//
// The binding is a stateless single-shot client: one signed HTTP request
// per operation, full error propagation to the reconciler, no retry, no
// backoff and no caching. `AlidnsFactory` builds a fresh client per
// reconciliation cycle, so every cycle authenticates independently from
// the static access key pair.
//
// ## Security
//
// - The access key secret NEVER appears in logs, URLs or `Debug` output
// - The client fails fast on an empty key pair

use aliddns_core::traits::{RecordStore, RecordStoreFactory, StoredRecord};
use aliddns_core::{DomainConfig, Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

mod sign;

/// alidns OpenAPI version
const API_VERSION: &str = "2015-01-09";

/// Default HTTP timeout for API requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Provider name used in error detail
const PROVIDER_NAME: &str = "alidns";

/// Alibaba Cloud DNS record store
pub struct AlidnsStore {
    /// RAM access key id
    access_key_id: String,

    /// RAM access key secret
    /// ⚠️ NEVER log this value
    access_key_secret: String,

    /// Regional API endpoint, host only (e.g. "alidns.cn-hangzhou.aliyuncs.com")
    endpoint: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the access key secret
impl std::fmt::Debug for AlidnsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlidnsStore")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"<REDACTED>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl AlidnsStore {
    /// Create a new alidns client
    pub fn new(
        access_key_id: impl Into<String>,
        access_key_secret: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Result<Self> {
        let access_key_id = access_key_id.into();
        let access_key_secret = access_key_secret.into();

        if access_key_id.is_empty() || access_key_secret.is_empty() {
            return Err(Error::config("alidns access key pair cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            access_key_id,
            access_key_secret,
            endpoint: endpoint.into(),
            client,
        })
    }

    /// Issue one signed RPC call and decode its JSON response
    async fn call<T: DeserializeOwned>(&self, action: &str, params: &[(&str, &str)]) -> Result<T> {
        let request = sign::SignedRequest::build(
            &self.endpoint,
            action,
            API_VERSION,
            params,
            &self.access_key_id,
            &self.access_key_secret,
        );

        let mut http_request = self.client.get(&request.url);
        for (name, value) in &request.headers {
            http_request = http_request.header(name, value);
        }

        let response = http_request
            .send()
            .await
            .map_err(|e| Error::http(format!("{action} request to {} failed: {e}", self.endpoint)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("failed to read {action} response: {e}")))?;

        if !status.is_success() {
            let fault: ApiFault = serde_json::from_str(&body).unwrap_or_default();
            return Err(map_fault(action, status.as_u16(), fault));
        }

        serde_json::from_str(&body).map_err(|e| {
            Error::provider(
                PROVIDER_NAME,
                format!("invalid JSON in {action} response: {e}"),
            )
        })
    }
}

/// Map a non-2xx API fault to the right error class
fn map_fault(action: &str, status: u16, fault: ApiFault) -> Error {
    if is_auth_code(&fault.code) {
        return Error::auth(format!("{}: {}", fault.code, fault.message));
    }

    Error::provider(
        PROVIDER_NAME,
        format!(
            "{action} failed with status {status}: {} ({})",
            fault.message, fault.code
        ),
    )
}

/// Fault codes the gateway returns for a rejected key pair or signature
fn is_auth_code(code: &str) -> bool {
    code.starts_with("InvalidAccessKeyId")
        || code == "SignatureDoesNotMatch"
        || code == "IncompleteSignature"
}

#[async_trait]
impl RecordStore for AlidnsStore {
    async fn read_record(&self, domain: &str) -> Result<Option<StoredRecord>> {
        let response: DescribeDomainRecordsResponse = self
            .call("DescribeDomainRecords", &[("DomainName", domain)])
            .await?;

        // Enumeration order is the provider's; with several records the
        // last one wins, no freshness tie-break defined.
        Ok(last_record(response))
    }

    async fn create_record(
        &self,
        domain: &str,
        rr: &str,
        record_type: &str,
        value: &str,
    ) -> Result<()> {
        let created: MutationResponse = self
            .call(
                "AddDomainRecord",
                &[
                    ("DomainName", domain),
                    ("RR", rr),
                    ("Type", record_type),
                    ("Value", value),
                ],
            )
            .await?;

        tracing::debug!(record_id = %created.record_id, "alidns record created");
        Ok(())
    }

    async fn update_record(
        &self,
        record_id: &str,
        rr: &str,
        record_type: &str,
        value: &str,
    ) -> Result<()> {
        let updated: MutationResponse = self
            .call(
                "UpdateDomainRecord",
                &[
                    ("RecordId", record_id),
                    ("RR", rr),
                    ("Type", record_type),
                    ("Value", value),
                ],
            )
            .await?;

        tracing::debug!(request_id = %updated.request_id, "alidns record updated");
        Ok(())
    }
}

/// Pick the record the read operation reports: the last one enumerated
fn last_record(response: DescribeDomainRecordsResponse) -> Option<StoredRecord> {
    response
        .domain_records
        .record
        .into_iter()
        .next_back()
        .map(|record| StoredRecord {
            id: record.record_id,
            value: record.value,
        })
}

/// Error body of a rejected API call
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct ApiFault {
    code: String,
    message: String,
}

/// `DescribeDomainRecords` response body (fields we consume)
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DescribeDomainRecordsResponse {
    #[serde(rename = "DomainRecords")]
    domain_records: DomainRecords,
}

#[derive(Debug, Default, Deserialize)]
struct DomainRecords {
    #[serde(rename = "Record", default)]
    record: Vec<DomainRecord>,
}

#[derive(Debug, Deserialize)]
struct DomainRecord {
    #[serde(rename = "RecordId")]
    record_id: String,
    #[serde(rename = "Value")]
    value: String,
}

/// `AddDomainRecord` / `UpdateDomainRecord` response body
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MutationResponse {
    #[serde(rename = "RecordId")]
    record_id: String,
    #[serde(rename = "RequestId")]
    request_id: String,
}

/// Factory that authenticates a fresh client for every reconciliation cycle
pub struct AlidnsFactory;

impl RecordStoreFactory for AlidnsFactory {
    fn connect(&self, config: &DomainConfig) -> Result<Box<dyn RecordStore>> {
        Ok(Box::new(AlidnsStore::new(
            &config.access_key_id,
            &config.access_key_secret,
            &config.endpoint,
        )?))
    }
}
