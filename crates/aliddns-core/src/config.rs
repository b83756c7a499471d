//! Configuration types for the aliddns updater
//!
//! The whole process is driven by one immutable [`DomainConfig`]: it is
//! built once at startup, validated, and passed by reference into every
//! component. Nothing mutates it afterwards.

use serde::{Deserialize, Serialize};

/// Default alidns regional endpoint.
pub const DEFAULT_ENDPOINT: &str = "alidns.cn-hangzhou.aliyuncs.com";

/// Host-record prefix that resolves the bare domain.
pub const DEFAULT_RR: &str = "@";

/// Record type for an IPv4 address.
pub const DEFAULT_RECORD_TYPE: &str = "A";

/// The (domain, host record, type) tuple this process manages, plus the
/// credentials and endpoint used to reach the provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct DomainConfig {
    /// RAM access key id
    pub access_key_id: String,

    /// RAM access key secret
    /// ⚠️ NEVER log this value
    pub access_key_secret: String,

    /// Domain name to keep pointed at this host (e.g. "example.com")
    pub domain_name: String,

    /// Host-record prefix: "@" for the bare domain, "www" for a subdomain
    #[serde(default = "default_rr")]
    pub rr: String,

    /// Record type (A for IPv4)
    #[serde(default = "default_record_type")]
    pub record_type: String,

    /// Provider regional endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

// Custom Debug implementation that hides the access key secret
impl std::fmt::Debug for DomainConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainConfig")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"<REDACTED>")
            .field("domain_name", &self.domain_name)
            .field("rr", &self.rr)
            .field("record_type", &self.record_type)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl DomainConfig {
    /// Create a configuration with the default rr, record type and endpoint
    pub fn new(
        access_key_id: impl Into<String>,
        access_key_secret: impl Into<String>,
        domain_name: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
            domain_name: domain_name.into(),
            rr: default_rr(),
            record_type: default_record_type(),
            endpoint: default_endpoint(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.access_key_id.is_empty() {
            return Err(crate::Error::config("access key id cannot be empty"));
        }
        if self.access_key_secret.is_empty() {
            return Err(crate::Error::config("access key secret cannot be empty"));
        }
        validate_domain_name(&self.domain_name)?;
        if self.rr.is_empty() {
            return Err(crate::Error::config(
                "host-record prefix cannot be empty; use \"@\" for the bare domain",
            ));
        }
        if self.record_type.is_empty() {
            return Err(crate::Error::config("record type cannot be empty"));
        }
        if self.endpoint.is_empty() {
            return Err(crate::Error::config("provider endpoint cannot be empty"));
        }
        Ok(())
    }
}

/// Validate that a string is a valid domain name
///
/// Basic DNS domain name validation per RFC 1035. Not comprehensive, but
/// catches common configuration mistakes before the first provider call.
fn validate_domain_name(domain: &str) -> Result<(), crate::Error> {
    if domain.is_empty() {
        return Err(crate::Error::config("domain name cannot be empty"));
    }

    // Total length limit (RFC 1035: 253 chars max)
    if domain.len() > 253 {
        return Err(crate::Error::config(format!(
            "domain name too long: {} chars (max 253)",
            domain.len()
        )));
    }

    for label in domain.split('.') {
        if label.is_empty() {
            return Err(crate::Error::config(format!(
                "domain name has an empty label: '{domain}'"
            )));
        }

        if label.len() > 63 {
            return Err(crate::Error::config(format!(
                "domain label too long: {} chars (max 63). Label: '{label}'",
                label.len()
            )));
        }

        if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
            return Err(crate::Error::config(format!(
                "domain label contains invalid characters. Label: '{label}'"
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(crate::Error::config(format!(
                "domain label cannot start or end with a hyphen. Label: '{label}'"
            )));
        }
    }

    Ok(())
}

fn default_rr() -> String {
    DEFAULT_RR.to_string()
}

fn default_record_type() -> String {
    DEFAULT_RECORD_TYPE.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}
