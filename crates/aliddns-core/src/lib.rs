// # aliddns-core
//
// Core library for the aliddns dynamic DNS updater.
//
// ## Architecture Overview
//
// This library provides the control loop that keeps a single DNS record
// pointed at the machine's current public IPv4 address:
// - **AddressResolver**: Trait for discovering the current public address
// - **RecordStore**: Trait for reading and mutating the published record
// - **Reconciler**: One compare-and-correct cycle over the two capabilities
// - **Scheduler**: One immediate cycle at startup, then a fixed-interval loop
//
// ## Design Principles
//
// 1. **Separation of Concerns**: The loop knows nothing about HTTP or the
//    provider's wire format; those live behind the traits
// 2. **Library-First**: A single cycle can be driven deterministically,
//    without wall-clock time, through `Reconciler::run_cycle`
// 3. **Provider-Owned State**: The published record is the only durable
//    state; nothing is persisted between cycles or restarts

pub mod config;
pub mod error;
pub mod traits;
pub mod reconcile;
pub mod schedule;

// Re-export core types for convenience
pub use config::DomainConfig;
pub use error::{Error, Result};
pub use traits::{AddressResolver, RecordStore, RecordStoreFactory, StoredRecord};
pub use reconcile::{CycleOutcome, Reconciler};
pub use schedule::Scheduler;
