//! Catalogue entities: services, plans, telecoms and cards

use serde::{Deserialize, Serialize};

use super::ids;

/// Billing period of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    #[default]
    #[serde(alias = "month")]
    Monthly,
    #[serde(alias = "year", alias = "annual")]
    Yearly,
}

impl BillingCycle {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Number of months covered by one billing period.
    pub const fn months(self) -> u64 {
        match self {
            Self::Monthly => 1,
            Self::Yearly => 12,
        }
    }
}

impl std::fmt::Display for BillingCycle {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.label())
    }
}

/// A priced billing option belonging to a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(deserialize_with = "ids::string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Display price as sent by the server, e.g. `"9,900원"`.
    #[serde(default, deserialize_with = "ids::optional_string_or_number")]
    pub price: Option<String>,
    #[serde(default)]
    pub cycle: BillingCycle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    #[serde(deserialize_with = "ids::string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub plans: Vec<Plan>,
}

impl Service {
    pub fn plan(&self, plan_id: &str) -> Option<&Plan> {
        self.plans.iter().find(|plan| plan.id == plan_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Telecom {
    #[serde(deserialize_with = "ids::string_or_number")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    #[serde(deserialize_with = "ids::string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub issuer: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_deserializes_with_defaults() {
        let service: Service = serde_json::from_str(
            r#"{"id": 3, "name": "Streamy", "plans": [{"id": 1, "name": "Basic", "price": 9900, "cycle": "year"}]}"#,
        )
        .unwrap();
        assert_eq!(service.id, "3");
        assert!(service.category.is_empty());
        let plan = service.plan("1").unwrap();
        assert_eq!(plan.price.as_deref(), Some("9900"));
        assert_eq!(plan.cycle, BillingCycle::Yearly);
    }

    #[test]
    fn plan_without_cycle_is_monthly() {
        let plan: Plan = serde_json::from_str(r#"{"id": "p", "price": "4,900원"}"#).unwrap();
        assert_eq!(plan.cycle, BillingCycle::Monthly);
        assert_eq!(plan.cycle.months(), 1);
    }
}
