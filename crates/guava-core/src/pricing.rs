//! Price parsing and display aggregation.
//!
//! Plan prices arrive as display strings (`"9,900원"`, `"₩13,900/월"`).
//! Parsing is best-effort: every non-digit character is dropped.

use serde::Serialize;

use crate::models::{BillingCycle, Plan};

const CURRENCY_SUFFIX: &str = "원";

/// Digits of `text` as an integer amount. `None` when there are no digits
/// or the number does not fit.
pub fn parse_price(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Parsed price of a plan.
pub fn plan_price(plan: &Plan) -> Option<u64> {
    plan.price.as_deref().and_then(parse_price)
}

/// Plan price spread over one month, rounded to the nearest unit.
pub fn monthly_price(plan: &Plan) -> Option<u64> {
    let months = plan.cycle.months();
    plan_price(plan).map(|price| price.saturating_add(months / 2) / months)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceSummary {
    pub min: u64,
    pub max: u64,
    /// Cycle of the cheapest plan.
    pub cycle: BillingCycle,
}

impl PriceSummary {
    /// Min/max over the plans with a parsable price.
    pub fn from_plans(plans: &[Plan]) -> Option<Self> {
        let mut priced = plans
            .iter()
            .filter_map(|plan| plan_price(plan).map(|price| (price, plan.cycle)));

        let (first_price, first_cycle) = priced.next()?;
        let mut summary = Self {
            min: first_price,
            max: first_price,
            cycle: first_cycle,
        };
        for (price, cycle) in priced {
            if price < summary.min {
                summary.min = price;
                summary.cycle = cycle;
            }
            summary.max = summary.max.max(price);
        }
        Some(summary)
    }
}

/// `9900` -> `"9,900원"`.
pub fn format_price(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{grouped}{CURRENCY_SUFFIX}")
}

/// `"9,900원 ~ 13,900원 / monthly"`, or a single price when min == max.
pub fn format_range(summary: &PriceSummary) -> String {
    if summary.min == summary.max {
        format!("{} / {}", format_price(summary.min), summary.cycle)
    } else {
        format!(
            "{} ~ {} / {}",
            format_price(summary.min),
            format_price(summary.max),
            summary.cycle
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(id: &str, price: Option<&str>, cycle: BillingCycle) -> Plan {
        Plan {
            id: id.to_string(),
            name: id.to_string(),
            price: price.map(str::to_string),
            cycle,
        }
    }

    #[test]
    fn parse_price_strips_non_digits() {
        assert_eq!(parse_price("9,900원"), Some(9900));
        assert_eq!(parse_price("₩13,900 / 월"), Some(13900));
        assert_eq!(parse_price("free"), None);
        assert_eq!(parse_price(""), None);
    }

    #[test]
    fn summary_tracks_cycle_of_cheapest_plan() {
        let plans = vec![
            plan("premium", Some("13,900원"), BillingCycle::Monthly),
            plan("annual", Some("99,000원"), BillingCycle::Yearly),
            plan("basic", Some("5,500원"), BillingCycle::Monthly),
            plan("unknown", Some("문의"), BillingCycle::Monthly),
        ];
        let summary = PriceSummary::from_plans(&plans).unwrap();
        assert_eq!(summary.min, 5500);
        assert_eq!(summary.max, 99000);
        assert_eq!(summary.cycle, BillingCycle::Monthly);
    }

    #[test]
    fn summary_is_none_without_prices() {
        let plans = vec![plan("a", None, BillingCycle::Monthly)];
        assert!(PriceSummary::from_plans(&plans).is_none());
        assert!(PriceSummary::from_plans(&[]).is_none());
    }

    #[test]
    fn monthly_price_spreads_yearly_plans() {
        let yearly = plan("y", Some("120,000원"), BillingCycle::Yearly);
        assert_eq!(monthly_price(&yearly), Some(10000));
        let odd = plan("o", Some("100,000"), BillingCycle::Yearly);
        assert_eq!(monthly_price(&odd), Some(8333));
    }

    #[test]
    fn monthly_price_saturates_on_huge_prices() {
        let huge = plan("h", Some("18446744073709551615"), BillingCycle::Yearly);
        assert_eq!(monthly_price(&huge), Some(u64::MAX / 12));
    }

    #[test]
    fn format_price_groups_thousands() {
        assert_eq!(format_price(0), "0원");
        assert_eq!(format_price(990), "990원");
        assert_eq!(format_price(9900), "9,900원");
        assert_eq!(format_price(1_234_567), "1,234,567원");
    }

    #[test]
    fn format_range_collapses_equal_bounds() {
        let single = PriceSummary {
            min: 9900,
            max: 9900,
            cycle: BillingCycle::Monthly,
        };
        assert_eq!(format_range(&single), "9,900원 / monthly");

        let range = PriceSummary {
            min: 9900,
            max: 13900,
            cycle: BillingCycle::Yearly,
        };
        assert_eq!(format_range(&range), "9,900원 ~ 13,900원 / yearly");
    }
}
