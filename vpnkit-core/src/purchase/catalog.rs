use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::plan::{InAppProduct, Plan, PurchasePlan};
use super::PurchaseError;

/// Slot of the yearly plan; the screens list it first.
const YEARLY_SLOT: usize = 0;
/// Slot of the monthly plan.
const MONTHLY_SLOT: usize = 1;

/// Receives the plans every time a product fetch is delivered.
#[uniffi::export(with_foreign)]
pub trait ProductsListener: Send + Sync {
    /// Called after the catalog has been refreshed with fetched products.
    fn products_did_fetch(&self, plans: Vec<PurchasePlan>);
}

#[derive(Debug)]
struct CatalogState {
    plans: Vec<PurchasePlan>,
    selected: Option<usize>,
    interactive: bool,
}

impl CatalogState {
    fn placeholders() -> Vec<PurchasePlan> {
        vec![
            PurchasePlan::placeholder(Plan::Yearly),
            PurchasePlan::placeholder(Plan::Monthly),
        ]
    }

    fn check_index(&self, index: u32) -> Result<usize, PurchaseError> {
        let count = self.plans.len();
        usize::try_from(index)
            .ok()
            .filter(|&index| index < count)
            .ok_or(PurchaseError::InvalidSelection {
                index,
                count: u32::try_from(count).unwrap_or(u32::MAX),
            })
    }
}

/// Plan choices backing the purchase screens.
///
/// Starts with yearly and monthly placeholders and no selection. The catalog
/// only becomes interactive once products have been delivered.
#[derive(uniffi::Object)]
pub struct PlanCatalog {
    state: Mutex<CatalogState>,
    listeners: Mutex<Vec<Arc<dyn ProductsListener>>>,
}

impl std::fmt::Debug for PlanCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanCatalog")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Default for PlanCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanCatalog {
    fn state(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[uniffi::export]
impl PlanCatalog {
    /// Creates a catalog holding placeholders.
    #[uniffi::constructor]
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(CatalogState {
                plans: CatalogState::placeholders(),
                selected: None,
                interactive: false,
            }),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Replaces the plans and selection with those chosen on a previous
    /// screen.
    ///
    /// # Errors
    ///
    /// Returns an error if `selected_index` is out of range.
    pub fn populate(
        &self,
        plans: Vec<PurchasePlan>,
        selected_index: u32,
    ) -> Result<(), PurchaseError> {
        let mut state = self.state();
        let previous = std::mem::replace(&mut state.plans, plans);
        match state.check_index(selected_index) {
            Ok(index) => {
                state.selected = Some(index);
                Ok(())
            }
            Err(err) => {
                state.plans = previous;
                Err(err)
            }
        }
    }

    /// Fills the yearly and monthly slots from fetched products.
    ///
    /// Plans without a product keep their current slot content. Defaults the
    /// selection to the first slot.
    pub fn refresh(&self, products: Vec<InAppProduct>) {
        let mut state = self.state();
        if state.plans.len() <= MONTHLY_SLOT {
            state.plans = CatalogState::placeholders();
        }

        for product in products {
            let slot = match product.plan {
                Plan::Yearly => YEARLY_SLOT,
                Plan::Monthly => MONTHLY_SLOT,
            };
            state.plans[slot] = PurchasePlan::from_product(product);
        }

        state.interactive = true;
        state.selected.get_or_insert(YEARLY_SLOT);
        log::debug!(
            "Refreshed plan catalog, {} of {} plans backed by products",
            state.plans.iter().filter(|plan| !plan.is_placeholder()).count(),
            state.plans.len()
        );
    }

    /// Registers a listener for [`PlanCatalog::deliver`].
    pub fn subscribe(&self, listener: Arc<dyn ProductsListener>) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    /// Handles a completed product fetch: refreshes, then notifies listeners.
    pub fn deliver(&self, products: Vec<InAppProduct>) {
        self.refresh(products);
        let plans = self.plans();
        let listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in listeners {
            listener.products_did_fetch(plans.clone());
        }
    }

    /// Selects the plan at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn select(&self, index: u32) -> Result<(), PurchaseError> {
        let mut state = self.state();
        let index = state.check_index(index)?;
        state.selected = Some(index);
        Ok(())
    }

    /// Returns the selected slot, if any.
    #[must_use]
    pub fn selected_index(&self) -> Option<u32> {
        self.state()
            .selected
            .and_then(|index| u32::try_from(index).ok())
    }

    /// Returns the selected plan, if any.
    #[must_use]
    pub fn selected_plan(&self) -> Option<PurchasePlan> {
        let state = self.state();
        state.selected.and_then(|index| state.plans.get(index).cloned())
    }

    /// Returns all plan choices in display order.
    #[must_use]
    pub fn plans(&self) -> Vec<PurchasePlan> {
        self.state().plans.clone()
    }

    /// Returns `true` once products have been delivered.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.state().interactive
    }
}
