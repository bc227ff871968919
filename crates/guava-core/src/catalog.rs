//! Client-side filtering, sorting and comparison of services.

use std::cmp::Ordering;

use serde::Serialize;

use crate::models::Service;
use crate::pricing::PriceSummary;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Name,
    /// Cheapest first; services without a price go last.
    PriceAscending,
    /// Most expensive first; services without a price go last.
    PriceDescending,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceFilter {
    pub category: Option<String>,
    pub query: Option<String>,
    pub sort: SortOrder,
}

impl ServiceFilter {
    pub fn matches(&self, service: &Service) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|category| !category.is_empty())
            .is_none_or(|category| service.category.trim().eq_ignore_ascii_case(category));

        let query_ok = self
            .query
            .as_deref()
            .map(|query| query.trim().to_lowercase())
            .filter(|query| !query.is_empty())
            .is_none_or(|query| {
                service.name.to_lowercase().contains(&query)
                    || service.description.to_lowercase().contains(&query)
            });

        category_ok && query_ok
    }

    pub fn apply<'a>(&self, services: &'a [Service]) -> Vec<&'a Service> {
        let mut matched = services
            .iter()
            .filter(|service| self.matches(service))
            .collect::<Vec<_>>();
        sort_services(&mut matched, self.sort);
        matched
    }
}

pub fn sort_services(services: &mut [&Service], order: SortOrder) {
    match order {
        SortOrder::Name => services.sort_by_key(|service| service.name.to_lowercase()),
        SortOrder::PriceAscending => services.sort_by(|left, right| {
            compare_prices(
                PriceSummary::from_plans(&left.plans).map(|summary| summary.min),
                PriceSummary::from_plans(&right.plans).map(|summary| summary.min),
                false,
            )
        }),
        SortOrder::PriceDescending => services.sort_by(|left, right| {
            compare_prices(
                PriceSummary::from_plans(&left.plans).map(|summary| summary.max),
                PriceSummary::from_plans(&right.plans).map(|summary| summary.max),
                true,
            )
        }),
    }
}

fn compare_prices(left: Option<u64>, right: Option<u64>, descending: bool) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) if descending => right.cmp(&left),
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Distinct non-empty categories in first-seen order.
pub fn categories(services: &[Service]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for category in services.iter().map(|service| service.category.trim()) {
        if !category.is_empty() && !seen.iter().any(|known| known.eq_ignore_ascii_case(category)) {
            seen.push(category.to_string());
        }
    }
    seen
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub service_id: String,
    pub name: String,
    pub category: String,
    pub price: Option<PriceSummary>,
    pub plan_count: usize,
}

pub fn compare(services: &[Service]) -> Vec<ComparisonRow> {
    services
        .iter()
        .map(|service| ComparisonRow {
            service_id: service.id.clone(),
            name: service.name.clone(),
            category: service.category.clone(),
            price: PriceSummary::from_plans(&service.plans),
            plan_count: service.plans.len(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{BillingCycle, Plan};

    fn service(id: &str, name: &str, category: &str, prices: &[&str]) -> Service {
        Service {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            description: format!("{name} streaming"),
            logo_url: None,
            plans: prices
                .iter()
                .enumerate()
                .map(|(index, price)| Plan {
                    id: format!("{id}-{index}"),
                    name: format!("plan {index}"),
                    price: Some((*price).to_string()),
                    cycle: BillingCycle::Monthly,
                })
                .collect(),
        }
    }

    fn sample() -> Vec<Service> {
        vec![
            service("1", "Wavve", "OTT", &["7,900원", "13,900원"]),
            service("2", "Melon", "Music", &["10,900원"]),
            service("3", "Netflix", "ott", &["5,500원", "17,000원"]),
            service("4", "Mystery", "OTT", &[]),
        ]
    }

    fn names(services: &[&Service]) -> Vec<String> {
        services.iter().map(|service| service.name.clone()).collect()
    }

    #[test]
    fn category_filter_is_case_insensitive() {
        let services = sample();
        let filter = ServiceFilter {
            category: Some("OTT".to_string()),
            ..ServiceFilter::default()
        };
        assert_eq!(
            names(&filter.apply(&services)),
            vec!["Mystery", "Netflix", "Wavve"]
        );
    }

    #[test]
    fn query_matches_name_or_description() {
        let services = sample();
        let filter = ServiceFilter {
            query: Some("MEL".to_string()),
            ..ServiceFilter::default()
        };
        assert_eq!(names(&filter.apply(&services)), vec!["Melon"]);

        let blank = ServiceFilter {
            query: Some("   ".to_string()),
            ..ServiceFilter::default()
        };
        assert_eq!(blank.apply(&services).len(), 4);
    }

    #[test]
    fn price_sort_puts_unpriced_last() {
        let services = sample();
        let ascending = ServiceFilter {
            sort: SortOrder::PriceAscending,
            ..ServiceFilter::default()
        };
        assert_eq!(
            names(&ascending.apply(&services)),
            vec!["Netflix", "Wavve", "Melon", "Mystery"]
        );

        let descending = ServiceFilter {
            sort: SortOrder::PriceDescending,
            ..ServiceFilter::default()
        };
        assert_eq!(
            names(&descending.apply(&services)),
            vec!["Netflix", "Wavve", "Melon", "Mystery"]
        );
    }

    #[test]
    fn categories_are_deduplicated() {
        assert_eq!(categories(&sample()), vec!["OTT", "Music"]);
    }

    #[test]
    fn compare_builds_rows() {
        let rows = compare(&sample()[..2]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].plan_count, 2);
        assert_eq!(rows[0].price.map(|price| price.min), Some(7900));
        assert_eq!(rows[1].price.map(|price| price.max), Some(10900));
    }
}
