//! Purchase plan model behind the subscription screens.
//!
//! The host fetches products from the platform store asynchronously and hands
//! them to [`PlanCatalog::deliver`]; the screens read plans and the current
//! selection back from the catalog.

mod catalog;
mod plan;

use thiserror::Error;

pub use catalog::{PlanCatalog, ProductsListener};
pub use plan::{InAppProduct, Plan, PurchasePlan};

/// Errors raised by the plan catalog.
#[derive(Debug, Error, uniffi::Error)]
pub enum PurchaseError {
    /// The requested plan index does not exist.
    #[error("invalid plan selection {index}, catalog has {count} plans")]
    InvalidSelection {
        /// Requested index.
        index: u32,
        /// Number of plans in the catalog.
        count: u32,
    },
}
