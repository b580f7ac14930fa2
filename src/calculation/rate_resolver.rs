//! Hourly rate resolution.
//!
//! The effective rate for an entry is the employee's override for the
//! entry's category when one exists, otherwise the category default.
//! Uncategorized entries are zero-rated.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::RateOverride;

/// Resolves effective hourly rates against a set of per-employee overrides.
///
/// # Example
///
/// ```
/// use timesheet_engine::calculation::RateResolver;
/// use timesheet_engine::models::RateOverride;
/// use rust_decimal::Decimal;
///
/// let resolver = RateResolver::new(&[RateOverride {
///     employee_id: "emp_001".to_string(),
///     category_id: "cat_bar".to_string(),
///     hourly_rate: Decimal::new(1450, 2),
/// }]);
///
/// let default_rate = Decimal::new(1200, 2);
/// assert_eq!(resolver.resolve("emp_001", Some("cat_bar"), default_rate), Decimal::new(1450, 2));
/// assert_eq!(resolver.resolve("emp_002", Some("cat_bar"), default_rate), default_rate);
/// assert_eq!(resolver.resolve("emp_001", None, default_rate), Decimal::ZERO);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RateResolver {
    overrides: HashMap<(String, String), Decimal>,
}

impl RateResolver {
    /// Indexes overrides by (employee, category). A repeated pair keeps the
    /// last rate seen.
    pub fn new(overrides: &[RateOverride]) -> Self {
        let mut index = HashMap::with_capacity(overrides.len());
        for rate_override in overrides {
            let key = (
                rate_override.employee_id.clone(),
                rate_override.category_id.clone(),
            );
            if let Some(previous) = index.insert(key, rate_override.hourly_rate) {
                warn!(
                    employee_id = %rate_override.employee_id,
                    category_id = %rate_override.category_id,
                    replaced = %previous,
                    rate = %rate_override.hourly_rate,
                    "Duplicate rate override, keeping the last one"
                );
            }
        }
        Self { overrides: index }
    }

    /// Returns the effective hourly rate for an employee in a category.
    pub fn resolve(
        &self,
        employee_id: &str,
        category_id: Option<&str>,
        category_default_rate: Decimal,
    ) -> Decimal {
        let Some(category_id) = category_id else {
            return Decimal::ZERO;
        };

        self.overrides
            .get(&(employee_id.to_string(), category_id.to_string()))
            .copied()
            .unwrap_or(category_default_rate)
    }

    /// Number of distinct overrides held.
    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    /// True when no overrides are held.
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}
