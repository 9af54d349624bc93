//! Coarse renewal urgency buckets driving status indicators and reminders.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Urgency of an upcoming renewal, most urgent first.
pub enum UrgencyTier {
    /// Fewer than 3 days left, or already overdue.
    Critical,
    /// 3 to 7 days left.
    Warning,
    /// 8 to 15 days left.
    Caution,
    /// More than 15 days left.
    Ok,
}

impl UrgencyTier {
    pub fn from_days(days: i64) -> Self {
        match days {
            d if d < 3 => UrgencyTier::Critical,
            3..=7 => UrgencyTier::Warning,
            8..=15 => UrgencyTier::Caution,
            _ => UrgencyTier::Ok,
        }
    }

    /// Status-indicator colour for the tier.
    pub fn indicator_color(self) -> &'static str {
        match self {
            UrgencyTier::Critical => "#E74C3C",
            UrgencyTier::Warning => "#E67E22",
            UrgencyTier::Caution => "#F1C40F",
            UrgencyTier::Ok => "#2ECC71",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UrgencyTier::Critical => "Critical",
            UrgencyTier::Warning => "Warning",
            UrgencyTier::Caution => "Caution",
            UrgencyTier::Ok => "OK",
        }
    }
}

impl fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::UrgencyTier;

    #[test]
    fn boundaries_follow_inclusive_lower_tiers() {
        let cases = [
            (-4, UrgencyTier::Critical),
            (0, UrgencyTier::Critical),
            (2, UrgencyTier::Critical),
            (3, UrgencyTier::Warning),
            (7, UrgencyTier::Warning),
            (8, UrgencyTier::Caution),
            (15, UrgencyTier::Caution),
            (16, UrgencyTier::Ok),
            (365, UrgencyTier::Ok),
        ];
        for (days, expected) in cases {
            assert_eq!(UrgencyTier::from_days(days), expected, "days = {days}");
        }
    }

    #[test]
    fn each_tier_has_distinct_color() {
        assert_eq!(UrgencyTier::Critical.indicator_color(), "#E74C3C");
        assert_eq!(UrgencyTier::Ok.indicator_color(), "#2ECC71");
        assert_ne!(
            UrgencyTier::Warning.indicator_color(),
            UrgencyTier::Caution.indicator_color()
        );
    }
}
