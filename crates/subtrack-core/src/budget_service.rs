//! Monthly budget tracking against the ledger total.

use subtrack_domain::Money;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetStatus {
    pub budget: Money,
    pub spent: Money,
    /// Budget left this month, floored at zero.
    pub remaining: Money,
    /// Whole percent of the budget used; `None` when no budget is set.
    pub percent_used: Option<u64>,
    pub over_budget: bool,
    /// Spending reached the alert threshold and alerts are enabled.
    pub alert: bool,
}

pub struct BudgetService;

impl BudgetService {
    /// Compares monthly spending with the budget. A zero budget means "no budget"
    /// and never raises an alert.
    pub fn status(
        spent: &Money,
        budget: &Money,
        alert_enabled: bool,
        threshold_percent: u32,
    ) -> BudgetStatus {
        let spent_minor = spent.minor_units() as u128;
        let budget_minor = budget.minor_units() as u128;
        let has_budget = budget_minor > 0;

        let percent_used = has_budget.then(|| (spent_minor * 100 / budget_minor) as u64);
        let over_budget = has_budget && spent_minor > budget_minor;
        let alert = alert_enabled
            && has_budget
            && spent_minor * 100 >= budget_minor * threshold_percent as u128;

        BudgetStatus {
            budget: budget.clone(),
            spent: spent.clone(),
            remaining: Money::new(
                budget.minor_units().saturating_sub(spent.minor_units()),
                budget.currency().clone(),
            ),
            percent_used,
            over_budget,
            alert,
        }
    }
}
