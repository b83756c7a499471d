// # Record Store Trait
//
// Defines the interface over the DNS provider's record API: read the
// current record, create the first record, update an existing record by id.
//
// ## Ownership
//
// The provider owns the record. This process only ever holds a transient,
// possibly-stale snapshot per cycle; nothing is cached between cycles.
//
// ## Implementations
//
// - Alibaba Cloud DNS: `aliddns-provider-alidns` crate
// - Tests substitute an in-memory fake through [`RecordStoreFactory`]

use async_trait::async_trait;

/// A snapshot of the record published at the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    /// Provider-assigned opaque record id
    pub id: String,
    /// Published value (an IP address string for A records)
    pub value: String,
}

/// Trait for record store implementations
///
/// Implementations must be stateless single-shot API bindings: one remote
/// call per method, full error propagation, no retry and no caching. The
/// reconciler owns all sequencing decisions.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read the record currently published for `domain`
    ///
    /// Lists the provider's records for the domain and returns the last one
    /// enumerated, or `None` when no record exists yet. Enumeration order is
    /// the provider's own; when several records exist the last one wins and
    /// no freshness tie-break is defined. Single-record semantics are
    /// assumed for the configured (domain, rr, type) tuple.
    async fn read_record(&self, domain: &str) -> Result<Option<StoredRecord>, crate::Error>;

    /// Create the first record for `domain`
    async fn create_record(
        &self,
        domain: &str,
        rr: &str,
        record_type: &str,
        value: &str,
    ) -> Result<(), crate::Error>;

    /// Update an existing record by its provider-assigned id
    ///
    /// Fails when the id is stale or unknown, or when the provider rejects
    /// the request.
    async fn update_record(
        &self,
        record_id: &str,
        rr: &str,
        record_type: &str,
        value: &str,
    ) -> Result<(), crate::Error>;
}

/// Helper trait for constructing record stores from configuration
///
/// The reconciler calls [`connect`](RecordStoreFactory::connect) once per
/// cycle: every cycle authenticates independently from the static
/// credentials, and no client or token survives between cycles.
pub trait RecordStoreFactory: Send + Sync {
    /// Create a connected RecordStore from the domain configuration
    fn connect(&self, config: &crate::DomainConfig)
    -> Result<Box<dyn RecordStore>, crate::Error>;
}
