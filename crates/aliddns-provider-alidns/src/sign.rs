//! ACS3-HMAC-SHA256 request signing for the Alibaba Cloud OpenAPI gateway
//!
//! RPC-style GET requests carry the action parameters in the query string
//! and authenticate through the `Authorization` header:
//!
//! 1. Build the canonical request: method, path, the sorted RFC 3986
//!    percent-encoded query, the sorted `host`/`x-acs-*` headers, and the
//!    SHA-256 of the (empty) payload
//! 2. String to sign: the algorithm name plus the SHA-256 of the canonical
//!    request
//! 3. Signature: hex HMAC-SHA256 of the string to sign, keyed with the
//!    access key secret
//!
//! The secret itself is never sent and never logged.

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Signature scheme identifier sent in the `Authorization` header.
const ALGORITHM: &str = "ACS3-HMAC-SHA256";

/// SHA-256 of the empty payload; RPC GET requests carry no body.
const EMPTY_PAYLOAD_HASH: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// A fully signed request, ready to hand to the HTTP client
pub(crate) struct SignedRequest {
    /// Full request URL, query string included
    pub url: String,
    /// Headers to send, `authorization` included
    pub headers: Vec<(String, String)>,
}

impl SignedRequest {
    /// Sign an RPC GET request against `endpoint` with a fresh nonce and
    /// the current UTC time
    pub fn build(
        endpoint: &str,
        action: &str,
        version: &str,
        params: &[(&str, &str)],
        access_key_id: &str,
        access_key_secret: &str,
    ) -> Self {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let date = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        Self::build_at(
            endpoint,
            action,
            version,
            params,
            access_key_id,
            access_key_secret,
            &nonce,
            &date,
        )
    }

    // Nonce and timestamp are injected so tests can pin them.
    #[allow(clippy::too_many_arguments)]
    fn build_at(
        endpoint: &str,
        action: &str,
        version: &str,
        params: &[(&str, &str)],
        access_key_id: &str,
        access_key_secret: &str,
        nonce: &str,
        date: &str,
    ) -> Self {
        let query = canonical_query(params);

        // Already in canonical (sorted, lowercase) order.
        let mut headers = vec![
            ("host".to_string(), endpoint.to_string()),
            ("x-acs-action".to_string(), action.to_string()),
            (
                "x-acs-content-sha256".to_string(),
                EMPTY_PAYLOAD_HASH.to_string(),
            ),
            ("x-acs-date".to_string(), date.to_string()),
            ("x-acs-signature-nonce".to_string(), nonce.to_string()),
            ("x-acs-version".to_string(), version.to_string()),
        ];

        let canonical_headers: String = headers
            .iter()
            .map(|(name, value)| format!("{name}:{value}\n"))
            .collect();
        let signed_headers = headers
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(";");

        let canonical_request = format!(
            "GET\n/\n{query}\n{canonical_headers}\n{signed_headers}\n{EMPTY_PAYLOAD_HASH}"
        );
        let string_to_sign = format!(
            "{ALGORITHM}\n{}",
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );
        let signature = hex::encode(hmac_sha256(access_key_secret.as_bytes(), &string_to_sign));

        headers.push((
            "authorization".to_string(),
            format!(
                "{ALGORITHM} Credential={access_key_id},SignedHeaders={signed_headers},Signature={signature}"
            ),
        ));

        Self {
            url: format!("https://{endpoint}/?{query}"),
            headers,
        }
    }
}

/// Sorted, RFC 3986 percent-encoded query string
fn canonical_query(params: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(name, value)| {
            (
                urlencoding::encode(name).into_owned(),
                urlencoding::encode(value).into_owned(),
            )
        })
        .collect();
    encoded.sort();

    encoded
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn hmac_sha256(key: &[u8], data: &str) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data.as_bytes());
    mac.finalize().into_bytes().to_vec()
}
