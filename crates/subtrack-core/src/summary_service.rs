//! Aggregation helpers for the statistics view and cost projections.

use subtrack_domain::{Category, CostPeriod, CurrencyCode, Money, Subscription};

/// Figures shown for an ad hoc selection of subscriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSummary {
    pub count: usize,
    pub monthly_total: Money,
    pub yearly_total: Money,
    /// Most expensive single cost, used to size chart axes.
    pub highest: Option<Money>,
}

/// Aggregates subscription costs for summaries and projections.
pub struct SummaryService;

impl SummaryService {
    /// Summarizes any selection, e.g. the output of `select_subset`.
    pub fn summarize<'a, I>(records: I, currency: &CurrencyCode) -> SelectionSummary
    where
        I: IntoIterator<Item = &'a Subscription>,
    {
        let records: Vec<&Subscription> = records.into_iter().collect();
        let monthly_total = total_cost(records.iter().copied(), currency);
        let highest = records
            .iter()
            .map(|record| record.cost())
            .max_by_key(|cost| cost.minor_units())
            .cloned();
        SelectionSummary {
            count: records.len(),
            yearly_total: Self::project(&monthly_total, CostPeriod::Yearly),
            monthly_total,
            highest,
        }
    }

    /// Projects a monthly amount over `period`.
    pub fn project(monthly: &Money, period: CostPeriod) -> Money {
        Money::new(
            monthly.minor_units().saturating_mul(period.months()),
            monthly.currency().clone(),
        )
    }

    /// Records whose cost is strictly above `threshold`.
    pub fn expensive<'a, I>(records: I, threshold: &Money) -> Vec<&'a Subscription>
    where
        I: IntoIterator<Item = &'a Subscription>,
    {
        records
            .into_iter()
            .filter(|record| record.cost().minor_units() > threshold.minor_units())
            .collect()
    }

    /// Per-category totals in the fixed category order, uncategorised last.
    /// Categories without records are omitted.
    pub fn by_category<'a, I>(records: I, currency: &CurrencyCode) -> Vec<(Option<Category>, Money)>
    where
        I: IntoIterator<Item = &'a Subscription>,
    {
        let records: Vec<&Subscription> = records.into_iter().collect();
        Category::ALL
            .into_iter()
            .map(Some)
            .chain(std::iter::once(None))
            .filter_map(|category| {
                let mut members = records
                    .iter()
                    .copied()
                    .filter(|record| record.category() == category)
                    .peekable();
                members.peek()?;
                Some((category, total_cost(members, currency)))
            })
            .collect()
    }
}

/// Saturating sum of costs; zero when there are no records.
pub fn total_cost<'a, I>(records: I, currency: &CurrencyCode) -> Money
where
    I: IntoIterator<Item = &'a Subscription>,
{
    let minor = records
        .into_iter()
        .fold(0u64, |acc, record| acc.saturating_add(record.cost().minor_units()));
    Money::new(minor, currency.clone())
}
