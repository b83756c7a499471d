//! Test doubles and common utilities for the reconciliation contract tests
//!
//! The fake provider keeps its record and call counters behind an `Arc` so
//! a factory can hand out a fresh store handle every cycle while the test
//! inspects the shared state afterwards.

use aliddns_core::error::Result;
use aliddns_core::traits::{AddressResolver, RecordStore, RecordStoreFactory, StoredRecord};
use aliddns_core::{DomainConfig, Error, Reconciler};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Shared state of the fake provider: the single published record plus
/// call counters for every operation
pub struct FakeProvider {
    record: Mutex<Option<StoredRecord>>,
    connect_calls: AtomicUsize,
    read_calls: AtomicUsize,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
    fail_reads: AtomicBool,
    fail_creates: AtomicBool,
    fail_updates: AtomicBool,
    /// Number of reads allowed to succeed before further ones fail
    fail_reads_after: AtomicUsize,
    next_id: AtomicUsize,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            record: Mutex::new(None),
            connect_calls: AtomicUsize::new(0),
            read_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            fail_reads: AtomicBool::new(false),
            fail_creates: AtomicBool::new(false),
            fail_updates: AtomicBool::new(false),
            fail_reads_after: AtomicUsize::new(usize::MAX),
            next_id: AtomicUsize::new(0),
        }
    }
}

impl FakeProvider {
    /// A provider with no published record yet
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A provider with one published record
    pub fn with_record(id: &str, value: &str) -> Arc<Self> {
        let provider = Self::default();
        *provider.record.lock().unwrap() = Some(StoredRecord {
            id: id.to_string(),
            value: value.to_string(),
        });
        Arc::new(provider)
    }

    /// Make every subsequent read fail with a provider error
    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    /// Let the first `n` reads succeed and fail the ones after
    pub fn fail_reads_after(&self, n: usize) {
        self.fail_reads_after.store(n, Ordering::SeqCst);
    }

    /// Make every subsequent create fail with a provider error
    pub fn fail_creates(&self) {
        self.fail_creates.store(true, Ordering::SeqCst);
    }

    /// Make every subsequent update fail with a provider error
    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }

    /// The currently published record, if any
    pub fn record(&self) -> Option<StoredRecord> {
        self.record.lock().unwrap().clone()
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }
}

/// One store handle, as a cycle would hold it
pub struct FakeStore {
    provider: Arc<FakeProvider>,
}

#[async_trait::async_trait]
impl RecordStore for FakeStore {
    async fn read_record(&self, _domain: &str) -> Result<Option<StoredRecord>> {
        let seen = self.provider.read_calls.fetch_add(1, Ordering::SeqCst);

        if self.provider.fail_reads.load(Ordering::SeqCst)
            || seen >= self.provider.fail_reads_after.load(Ordering::SeqCst)
        {
            return Err(Error::provider("fake", "read refused"));
        }

        Ok(self.provider.record.lock().unwrap().clone())
    }

    async fn create_record(
        &self,
        _domain: &str,
        _rr: &str,
        _record_type: &str,
        value: &str,
    ) -> Result<()> {
        self.provider.create_calls.fetch_add(1, Ordering::SeqCst);

        if self.provider.fail_creates.load(Ordering::SeqCst) {
            return Err(Error::provider("fake", "create refused"));
        }

        let id = format!(
            "rec-{}",
            self.provider.next_id.fetch_add(1, Ordering::SeqCst) + 1
        );
        *self.provider.record.lock().unwrap() = Some(StoredRecord {
            id,
            value: value.to_string(),
        });
        Ok(())
    }

    async fn update_record(
        &self,
        record_id: &str,
        _rr: &str,
        _record_type: &str,
        value: &str,
    ) -> Result<()> {
        self.provider.update_calls.fetch_add(1, Ordering::SeqCst);

        if self.provider.fail_updates.load(Ordering::SeqCst) {
            return Err(Error::provider("fake", "update refused"));
        }

        let mut record = self.provider.record.lock().unwrap();
        match record.as_mut() {
            Some(existing) if existing.id == record_id => {
                existing.value = value.to_string();
                Ok(())
            }
            _ => Err(Error::provider(
                "fake",
                format!("unknown record id: {record_id}"),
            )),
        }
    }
}

/// Factory that connects a fresh handle to the shared fake provider
pub struct FakeFactory {
    provider: Arc<FakeProvider>,
}

impl FakeFactory {
    pub fn new(provider: Arc<FakeProvider>) -> Self {
        Self { provider }
    }
}

impl RecordStoreFactory for FakeFactory {
    fn connect(&self, _config: &DomainConfig) -> Result<Box<dyn RecordStore>> {
        self.provider.connect_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeStore {
            provider: Arc::clone(&self.provider),
        }))
    }
}

/// Resolver that reports a fixed answer and counts how often it is asked
pub struct StaticResolver {
    address: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl StaticResolver {
    /// A resolver that always finds `address`
    pub fn some(address: &str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                address: Some(address.to_string()),
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }

    /// A resolver that never finds an address (lookup failure)
    pub fn absent() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                address: None,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

#[async_trait::async_trait]
impl AddressResolver for StaticResolver {
    async fn resolve(&self) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.address.clone()
    }
}

/// Helper to create a minimal DomainConfig for testing
pub fn test_config() -> DomainConfig {
    DomainConfig::new("test-key", "test-secret", "example.com")
}

/// Helper to wire a reconciler over the shared fake provider
pub fn reconciler_for(provider: &Arc<FakeProvider>, resolver: StaticResolver) -> Reconciler {
    Reconciler::new(
        Box::new(FakeFactory::new(Arc::clone(provider))),
        Box::new(resolver),
        test_config(),
    )
    .expect("reconciler construction succeeds")
}
