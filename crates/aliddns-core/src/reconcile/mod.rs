//! Core reconciliation cycle
//!
//! The Reconciler runs one pass of compare-current-vs-published and
//! corrects the provider's record when they differ:
//!
//! ```text
//! Start → ClientReady → RecordRead → {NoRecord | Unchanged | Changed} → Done
//!                                         │           │         │
//!                                      create       no-op    update +
//!                                                          confirm read
//! ```
//!
//! Any step may fail into an error, which propagates to the scheduler's
//! cycle boundary; an absent public address is not an error and simply
//! skips the rest of the cycle.
//!
//! ## Cycle Flow
//!
//! 1. Connect a record store from the static credentials
//! 2. Read the published record (value, id)
//! 3. Resolve the public address; absent → skip
//! 4. No record → create one with the resolved address
//! 5. Value matches → idempotent no-op
//! 6. Value differs → update, then one confirmation read

use crate::config::DomainConfig;
use crate::error::Result;
use crate::traits::{AddressResolver, RecordStoreFactory, StoredRecord};
use tracing::{debug, info, warn};

/// Outcome of one reconciliation cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No record existed; the first one was created with the resolved address
    Created {
        /// The address written to the new record
        address: String,
    },

    /// The published value already matched the resolved address; no call issued
    Unchanged {
        /// The matching address
        address: String,
    },

    /// The record was updated and re-read once to report the provider's state
    Updated {
        /// The address written to the record
        address: String,
        /// The value seen by the confirmation read, which may still be the
        /// stale one under provider eventual consistency
        confirmed: Option<String>,
    },

    /// The public address could not be resolved; no provider mutation attempted
    Skipped,
}

/// Runs reconciliation cycles over the configured domain
///
/// The reconciler holds the immutable [`DomainConfig`] plus the two
/// capabilities it orchestrates. It keeps no state between cycles: each
/// call to [`run_cycle`](Reconciler::run_cycle) connects a fresh store and
/// re-reads the provider's record.
pub struct Reconciler {
    /// Builds a freshly authenticated record store each cycle
    factory: Box<dyn RecordStoreFactory>,

    /// Public address discovery
    resolver: Box<dyn AddressResolver>,

    /// The (domain, rr, type) tuple under management
    config: DomainConfig,
}

impl Reconciler {
    /// Create a new reconciler
    ///
    /// Validates the configuration up front so misconfiguration surfaces at
    /// construction rather than on the first provider call.
    pub fn new(
        factory: Box<dyn RecordStoreFactory>,
        resolver: Box<dyn AddressResolver>,
        config: DomainConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            factory,
            resolver,
            config,
        })
    }

    /// Run one reconciliation cycle to completion
    ///
    /// Errors from the store propagate to the caller; the scheduler logs and
    /// swallows them so a failed cycle never stops the loop. Note the record
    /// is read before the address is resolved, so a provider read failure
    /// aborts the cycle without consulting the resolver at all.
    pub async fn run_cycle(&self) -> Result<CycleOutcome> {
        let store = self.factory.connect(&self.config)?;

        let published = store.read_record(&self.config.domain_name).await?;

        let Some(address) = self.resolver.resolve().await else {
            // No public address this cycle; the next firing is the retry.
            debug!("public address unavailable, skipping this cycle");
            return Ok(CycleOutcome::Skipped);
        };

        match published {
            None => {
                info!(
                    domain = %self.config.domain_name,
                    "no published record found, creating the first one"
                );
                store
                    .create_record(
                        &self.config.domain_name,
                        &self.config.rr,
                        &self.config.record_type,
                        &address,
                    )
                    .await?;
                info!(%address, "first record created");
                Ok(CycleOutcome::Created { address })
            }

            Some(record) if record.value == address => {
                info!(
                    %address,
                    "public address matches the published record, nothing to do"
                );
                Ok(CycleOutcome::Unchanged { address })
            }

            Some(record) => {
                info!(
                    previous = %record.value,
                    current = %address,
                    "published record is stale, updating"
                );
                store
                    .update_record(
                        &record.id,
                        &self.config.rr,
                        &self.config.record_type,
                        &address,
                    )
                    .await?;

                // Verification, not retry: report what the provider says
                // now. If its read-after-write has not converged yet the
                // logged value may still be the old one; that is accepted.
                let confirmed = store.read_record(&self.config.domain_name).await?;
                match &confirmed {
                    Some(StoredRecord { id, value }) => {
                        info!(%value, %id, "record updated");
                    }
                    None => warn!("record missing on the confirmation read"),
                }

                Ok(CycleOutcome::Updated {
                    address,
                    confirmed: confirmed.map(|r| r.value),
                })
            }
        }
    }
}
