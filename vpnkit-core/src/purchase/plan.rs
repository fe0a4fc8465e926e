use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Subscription plan offered in the app.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    Display,
    Serialize,
    Deserialize,
    uniffi::Enum,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    /// Billed every month.
    Monthly,
    /// Billed every year.
    Yearly,
}

impl Plan {
    /// Number of months one billing period covers.
    #[must_use]
    pub const fn monthly_factor(self) -> f64 {
        match self {
            Self::Monthly => 1.0,
            Self::Yearly => 12.0,
        }
    }
}

/// Store product fetched from the platform in-app purchase service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct InAppProduct {
    /// Store product identifier.
    pub identifier: String,
    /// Plan the product sells.
    pub plan: Plan,
    /// Localized price as a decimal string, e.g. `39.95`.
    pub price: String,
    /// Currency symbol of the price locale, if known.
    pub currency_symbol: Option<String>,
}

/// A plan choice as presented on the purchase screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, uniffi::Record)]
pub struct PurchasePlan {
    /// Plan of this choice.
    pub plan: Plan,
    /// Backing product, `None` while products are still loading.
    pub product: Option<InAppProduct>,
    /// Months per billing period.
    pub monthly_factor: f64,
    /// Whether the choice is highlighted as the best value.
    pub best_value: bool,
    /// Price detail line, e.g. `$39.95`. Empty for monthly plans.
    pub detail: String,
}

impl PurchasePlan {
    /// Placeholder shown until products arrive.
    #[must_use]
    pub const fn placeholder(plan: Plan) -> Self {
        Self {
            plan,
            product: None,
            monthly_factor: plan.monthly_factor(),
            best_value: false,
            detail: String::new(),
        }
    }

    /// Builds the choice for a fetched product.
    #[must_use]
    pub fn from_product(product: InAppProduct) -> Self {
        let plan = product.plan;
        let (best_value, detail) = match plan {
            Plan::Yearly => (
                true,
                format!(
                    "{}{}",
                    product.currency_symbol.as_deref().unwrap_or_default(),
                    product.price
                ),
            ),
            Plan::Monthly => (false, String::new()),
        };
        Self {
            plan,
            product: Some(product),
            monthly_factor: plan.monthly_factor(),
            best_value,
            detail,
        }
    }

    /// Returns `true` while no product backs this choice.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        self.product.is_none()
    }

    /// Price per month, rounded to cents. `None` for placeholders and
    /// unparsable prices.
    #[must_use]
    pub fn monthly_price(&self) -> Option<f64> {
        let price: f64 = self.product.as_ref()?.price.trim().parse().ok()?;
        Some((price / self.monthly_factor * 100.0).round() / 100.0)
    }
}
