//! Service catalog models
//!
//! These mirror the shapes returned by the remote booking API. Option and
//! extra ids are only unique within their service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A purchasable cleaning package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base_price: Decimal,
    pub base_duration_minutes: i32,
    #[serde(default)]
    pub options: Vec<ServiceOption>,
    #[serde(default)]
    pub extras: Vec<Extra>,
}

/// A variant of a service. Options sharing a group are mutually exclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOption {
    pub id: i64,
    pub name: String,
    pub option_price: Decimal,
    pub duration_minutes: i32,
    pub option_group_name: String,
}

/// An add-on that can be toggled independently and carries a quantity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extra {
    pub id: i64,
    pub name: String,
    pub extra_price: Decimal,
    pub duration_minutes: i32,
}

/// Service row used by listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub id: i64,
    pub name: String,
    pub base_price: Decimal,
    pub base_duration_minutes: i32,
}

/// Options of one group, in catalog order
#[derive(Debug, Clone, Serialize)]
pub struct OptionGroup {
    pub name: String,
    pub options: Vec<ServiceOption>,
}

impl Service {
    pub fn find_option(&self, option_id: i64) -> Option<&ServiceOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    pub fn find_extra(&self, extra_id: i64) -> Option<&Extra> {
        self.extras.iter().find(|e| e.id == extra_id)
    }

    /// Group options by `option_group_name`, sorted by group name.
    pub fn option_groups(&self) -> Vec<OptionGroup> {
        let mut groups: BTreeMap<&str, Vec<ServiceOption>> = BTreeMap::new();
        for option in &self.options {
            groups
                .entry(option.option_group_name.as_str())
                .or_default()
                .push(option.clone());
        }

        groups
            .into_iter()
            .map(|(name, options)| OptionGroup {
                name: name.to_string(),
                options,
            })
            .collect()
    }

    pub fn summary(&self) -> ServiceSummary {
        ServiceSummary {
            id: self.id,
            name: self.name.clone(),
            base_price: self.base_price,
            base_duration_minutes: self.base_duration_minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn option(id: i64, group: &str) -> ServiceOption {
        ServiceOption {
            id,
            name: format!("Option {}", id),
            option_price: dec!(10),
            duration_minutes: 15,
            option_group_name: group.to_string(),
        }
    }

    #[test]
    fn test_option_groups_sorted_and_grouped() {
        let service = Service {
            id: 1,
            name: "Standard clean".to_string(),
            description: String::new(),
            base_price: dec!(40),
            base_duration_minutes: 60,
            options: vec![option(1, "Size"), option(2, "Frequency"), option(3, "Size")],
            extras: vec![],
        };

        let groups = service.option_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Frequency");
        assert_eq!(groups[1].name, "Size");
        let ids: Vec<i64> = groups[1].options.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_deserialize_accepts_numeric_and_string_prices() {
        let json = r#"{
            "id": 7,
            "name": "Deep clean",
            "base_price": "55.50",
            "base_duration_minutes": 120,
            "options": [
                {"id": 1, "name": "2 rooms", "option_price": 12.5,
                 "duration_minutes": 30, "option_group_name": "Size"}
            ]
        }"#;

        let service: Service = serde_json::from_str(json).unwrap();
        assert_eq!(service.base_price, dec!(55.50));
        assert_eq!(service.options[0].option_price, dec!(12.5));
        assert!(service.extras.is_empty());
        assert!(service.find_option(1).is_some());
        assert!(service.find_extra(1).is_none());
    }
}
