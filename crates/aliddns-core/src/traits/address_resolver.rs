// # Address Resolver Trait
//
// Defines the interface for discovering the machine's current public IPv4
// address from an external reporting service.
//
// ## Failure Model
//
// Resolution failure is always transient and always absorbed: a network
// error or an unparseable response yields `None`, never an error. The
// reconciler treats an absent address as "skip this cycle and try again on
// the next firing", so the resolver must log its own diagnostics.

use async_trait::async_trait;

/// Trait for public address discovery implementations
#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Discover the current public IPv4 address
    ///
    /// Returns the address as the string the reporting service published
    /// it as; record values are compared by exact string equality.
    ///
    /// # Returns
    ///
    /// - `Some(address)`: The current public address
    /// - `None`: The address could not be determined this cycle (already
    ///   logged by the implementation)
    async fn resolve(&self) -> Option<String>;
}
