//! Booking form selection state.
//!
//! `SelectionState` is the single owner of what the customer picked. Every
//! mutation goes through a method that finishes by recomputing the derived
//! totals from scratch, so `final_price` and `duration_minutes` can never
//! drift from their inputs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::models::Service;

use super::calculators::{
    final_price, multiplier_for_target, sum_lines, LineItem, MultiplierPolicy, PriceBounds,
};

/// An extra picked by the customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedExtra {
    pub id: i64,
    pub quantity: u32,
}

/// Values derived from the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    /// Sum before the multiplier
    pub price: Decimal,
    pub final_price: Decimal,
    pub duration_minutes: i32,
    pub bounds: PriceBounds,
    /// Multiplier after clamping to what the current selection allows
    pub effective_multiplier: Decimal,
    pub discount_unlocked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("No service selected")]
    NoServiceSelected,

    #[error("Option {0} does not belong to the selected service")]
    UnknownOption(i64),

    #[error("Extra {0} does not belong to the selected service")]
    UnknownExtra(i64),

    #[error("Extra {0} is not selected")]
    ExtraNotSelected(i64),

    #[error("Extra {0} listed more than once")]
    DuplicateExtra(i64),

    #[error("Quantity must be at least 1 (got {0})")]
    InvalidQuantity(u32),
}

#[derive(Debug, Clone)]
pub struct SelectionState {
    service: Option<Arc<Service>>,
    /// option_group_name -> selected option id
    options: BTreeMap<String, i64>,
    extras: Vec<SelectedExtra>,
    multiplier: Decimal,
    policy: MultiplierPolicy,
    totals: Totals,
}

impl SelectionState {
    pub fn new(policy: MultiplierPolicy) -> Self {
        let mut state = Self {
            service: None,
            options: BTreeMap::new(),
            extras: Vec::new(),
            multiplier: Decimal::ONE,
            policy,
            totals: Totals::default(),
        };
        state.recompute();
        state
    }

    pub fn service(&self) -> Option<&Service> {
        self.service.as_deref()
    }

    pub fn service_id(&self) -> Option<i64> {
        self.service.as_ref().map(|s| s.id)
    }

    pub fn policy(&self) -> &MultiplierPolicy {
        &self.policy
    }

    pub fn multiplier(&self) -> Decimal {
        self.multiplier
    }

    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    pub fn final_price(&self) -> Decimal {
        self.totals.final_price
    }

    pub fn duration_minutes(&self) -> i32 {
        self.totals.duration_minutes
    }

    /// Selected option ids, ordered by group name
    pub fn selected_option_ids(&self) -> Vec<i64> {
        self.options.values().copied().collect()
    }

    pub fn selected_extras(&self) -> &[SelectedExtra] {
        &self.extras
    }

    pub fn is_extra_selected(&self, extra_id: i64) -> bool {
        self.extras.iter().any(|e| e.id == extra_id)
    }

    pub fn line_item_count(&self) -> usize {
        self.options.len() + self.extras.len()
    }

    /// Option groups of the selected service that still have no selection
    pub fn missing_option_groups(&self) -> Vec<String> {
        let Some(service) = self.service.as_deref() else {
            return Vec::new();
        };

        service
            .option_groups()
            .into_iter()
            .map(|g| g.name)
            .filter(|name| !self.options.contains_key(name))
            .collect()
    }

    /// Pick a service. Options and extras never carry over between services.
    pub fn select_service(&mut self, service: Arc<Service>) {
        self.service = Some(service);
        self.options.clear();
        self.extras.clear();
        self.recompute();
    }

    pub fn clear_service(&mut self) {
        self.service = None;
        self.options.clear();
        self.extras.clear();
        self.recompute();
    }

    /// Select an option, replacing whatever was selected in the same group.
    pub fn select_option(&mut self, option_id: i64) -> Result<(), SelectionError> {
        let service = self
            .service
            .as_deref()
            .ok_or(SelectionError::NoServiceSelected)?;
        let option = service
            .find_option(option_id)
            .ok_or(SelectionError::UnknownOption(option_id))?;

        self.options
            .insert(option.option_group_name.clone(), option.id);
        self.recompute();
        Ok(())
    }

    /// Toggle an extra on (quantity 1) or off. Returns whether it is now selected.
    pub fn toggle_extra(&mut self, extra_id: i64) -> Result<bool, SelectionError> {
        let service = self
            .service
            .as_deref()
            .ok_or(SelectionError::NoServiceSelected)?;
        service
            .find_extra(extra_id)
            .ok_or(SelectionError::UnknownExtra(extra_id))?;

        let selected = if let Some(pos) = self.extras.iter().position(|e| e.id == extra_id) {
            self.extras.remove(pos);
            false
        } else {
            self.extras.push(SelectedExtra {
                id: extra_id,
                quantity: 1,
            });
            true
        };

        self.recompute();
        Ok(selected)
    }

    /// Change the quantity of an extra that is already selected.
    pub fn set_extra_quantity(&mut self, extra_id: i64, quantity: u32) -> Result<(), SelectionError> {
        if self.service.is_none() {
            return Err(SelectionError::NoServiceSelected);
        }
        if quantity < 1 {
            return Err(SelectionError::InvalidQuantity(quantity));
        }

        let extra = self
            .extras
            .iter_mut()
            .find(|e| e.id == extra_id)
            .ok_or(SelectionError::ExtraNotSelected(extra_id))?;
        extra.quantity = quantity;

        self.recompute();
        Ok(())
    }

    /// Store the slider value, limited to the policy's outer range.
    pub fn set_multiplier(&mut self, multiplier: Decimal) {
        self.multiplier = multiplier
            .max(self.policy.min_factor.min(self.policy.max_factor))
            .min(self.policy.max_factor);
        self.recompute();
    }

    /// Derive the multiplier from a desired final price.
    ///
    /// Leaves the multiplier untouched and returns `false` when the raw price
    /// is zero.
    pub fn set_target_price(&mut self, target: Decimal) -> bool {
        match multiplier_for_target(self.totals.price, target) {
            Some(multiplier) => {
                self.set_multiplier(multiplier);
                true
            }
            None => false,
        }
    }

    fn recompute(&mut self) {
        let line_items = self.line_item_count();

        let Some(service) = self.service.as_deref() else {
            self.totals = Totals {
                effective_multiplier: self.policy.clamp_multiplier(self.multiplier, 0),
                ..Totals::default()
            };
            return;
        };

        let mut lines: Vec<LineItem> = Vec::with_capacity(line_items);
        for option_id in self.options.values() {
            if let Some(option) = service.find_option(*option_id) {
                lines.push(LineItem {
                    price: option.option_price,
                    duration_minutes: option.duration_minutes,
                    quantity: 1,
                });
            }
        }
        for selected in &self.extras {
            if let Some(extra) = service.find_extra(selected.id) {
                lines.push(LineItem {
                    price: extra.extra_price,
                    duration_minutes: extra.duration_minutes,
                    quantity: selected.quantity,
                });
            }
        }

        let estimate = sum_lines(service.base_price, service.base_duration_minutes, &lines);
        let effective_multiplier = self.policy.clamp_multiplier(self.multiplier, line_items);
        let bounds = self.policy.bounds(estimate.price, line_items);

        self.totals = Totals {
            price: estimate.price,
            final_price: final_price(estimate.price, effective_multiplier, &bounds),
            duration_minutes: estimate.duration_minutes,
            bounds,
            effective_multiplier,
            discount_unlocked: self.policy.discount_unlocked(line_items),
        };
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(MultiplierPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Extra, ServiceOption};
    use rust_decimal_macros::dec;

    fn cleaning_service() -> Arc<Service> {
        Arc::new(Service {
            id: 1,
            name: "Standard clean".to_string(),
            description: String::new(),
            base_price: dec!(40),
            base_duration_minutes: 60,
            options: vec![
                ServiceOption {
                    id: 10,
                    name: "Small".to_string(),
                    option_price: dec!(10),
                    duration_minutes: 15,
                    option_group_name: "Size".to_string(),
                },
                ServiceOption {
                    id: 11,
                    name: "Large".to_string(),
                    option_price: dec!(25),
                    duration_minutes: 45,
                    option_group_name: "Size".to_string(),
                },
                ServiceOption {
                    id: 20,
                    name: "Weekly".to_string(),
                    option_price: dec!(0),
                    duration_minutes: 0,
                    option_group_name: "Frequency".to_string(),
                },
            ],
            extras: vec![
                Extra {
                    id: 30,
                    name: "Oven".to_string(),
                    extra_price: dec!(5),
                    duration_minutes: 10,
                },
                Extra {
                    id: 31,
                    name: "Windows".to_string(),
                    extra_price: dec!(8),
                    duration_minutes: 20,
                },
            ],
        })
    }

    fn free_service() -> Arc<Service> {
        Arc::new(Service {
            id: 2,
            name: "Consultation".to_string(),
            description: String::new(),
            base_price: dec!(0),
            base_duration_minutes: 30,
            options: vec![],
            extras: vec![],
        })
    }

    // ==================== basic totals ====================

    #[test]
    fn test_no_service_is_inert() {
        let mut state = SelectionState::default();
        assert_eq!(state.final_price(), dec!(0));
        assert_eq!(state.duration_minutes(), 0);
        assert_eq!(state.select_option(10), Err(SelectionError::NoServiceSelected));
        assert_eq!(state.toggle_extra(30), Err(SelectionError::NoServiceSelected));
        assert_eq!(
            state.set_extra_quantity(30, 2),
            Err(SelectionError::NoServiceSelected)
        );
        assert!(!state.set_target_price(dec!(50)));
    }

    #[test]
    fn test_service_only_equals_base() {
        let mut state = SelectionState::default();
        state.select_service(cleaning_service());
        assert_eq!(state.final_price(), dec!(40));
        assert_eq!(state.duration_minutes(), 60);
    }

    #[test]
    fn test_option_and_extra_example() {
        let mut state = SelectionState::default();
        state.select_service(cleaning_service());
        state.select_option(10).unwrap();
        assert!(state.toggle_extra(30).unwrap());
        state.set_extra_quantity(30, 2).unwrap();

        assert_eq!(state.totals().price, dec!(60));
        assert_eq!(state.duration_minutes(), 95);
        assert_eq!(state.final_price(), dec!(60));

        state.set_multiplier(dec!(1.5));
        assert_eq!(state.final_price(), dec!(90));
    }

    #[test]
    fn test_discount_locked_with_single_line_item() {
        let mut state = SelectionState::default();
        state.select_service(cleaning_service());
        state.select_option(10).unwrap();
        state.set_multiplier(dec!(0.9));

        assert!(!state.totals().discount_unlocked);
        assert_eq!(state.totals().price, dec!(50));
        assert_eq!(state.final_price(), dec!(50));
    }

    #[test]
    fn test_discount_unlocked_with_two_line_items() {
        let mut state = SelectionState::default();
        state.select_service(cleaning_service());
        state.select_option(10).unwrap();
        state.toggle_extra(30).unwrap();
        state.set_extra_quantity(30, 2).unwrap();
        state.set_multiplier(dec!(0.9));

        assert!(state.totals().discount_unlocked);
        assert_eq!(state.final_price(), dec!(54));

        // Dropping back to one line item re-locks the discount
        state.toggle_extra(30).unwrap();
        assert_eq!(state.final_price(), dec!(50));
        assert_eq!(state.multiplier(), dec!(0.9));
    }

    // ==================== option exclusivity ====================

    #[test]
    fn test_same_group_option_replaces_previous() {
        let mut state = SelectionState::default();
        state.select_service(cleaning_service());
        state.select_option(10).unwrap();
        state.select_option(11).unwrap();

        assert_eq!(state.selected_option_ids(), vec![11]);
        assert_eq!(state.totals().price, dec!(65));
        assert_eq!(state.duration_minutes(), 105);
    }

    #[test]
    fn test_options_in_different_groups_coexist() {
        let mut state = SelectionState::default();
        state.select_service(cleaning_service());
        state.select_option(10).unwrap();
        state.select_option(20).unwrap();

        // ordered by group name: Frequency, Size
        assert_eq!(state.selected_option_ids(), vec![20, 10]);
        assert!(state.missing_option_groups().is_empty());
    }

    #[test]
    fn test_unknown_option_rejected() {
        let mut state = SelectionState::default();
        state.select_service(cleaning_service());
        assert_eq!(state.select_option(99), Err(SelectionError::UnknownOption(99)));
        assert!(state.selected_option_ids().is_empty());
    }

    #[test]
    fn test_missing_option_groups() {
        let mut state = SelectionState::default();
        assert!(state.missing_option_groups().is_empty());

        state.select_service(cleaning_service());
        assert_eq!(
            state.missing_option_groups(),
            vec!["Frequency".to_string(), "Size".to_string()]
        );

        state.select_option(11).unwrap();
        assert_eq!(state.missing_option_groups(), vec!["Frequency".to_string()]);
    }

    // ==================== extras ====================

    #[test]
    fn test_toggle_extra_round_trip() {
        let mut state = SelectionState::default();
        state.select_service(cleaning_service());
        state.toggle_extra(31).unwrap();
        let before = state.selected_extras().to_vec();
        let price_before = state.final_price();

        assert!(state.toggle_extra(30).unwrap());
        assert!(!state.toggle_extra(30).unwrap());

        assert_eq!(state.selected_extras(), before.as_slice());
        assert_eq!(state.final_price(), price_before);
    }

    #[test]
    fn test_quantity_edit_keeps_membership() {
        let mut state = SelectionState::default();
        state.select_service(cleaning_service());
        state.toggle_extra(31).unwrap();
        state.set_extra_quantity(31, 3).unwrap();

        assert_eq!(
            state.selected_extras(),
            &[SelectedExtra {
                id: 31,
                quantity: 3
            }]
        );
        assert_eq!(state.totals().price, dec!(64));
        assert_eq!(state.duration_minutes(), 120);
    }

    #[test]
    fn test_quantity_errors() {
        let mut state = SelectionState::default();
        state.select_service(cleaning_service());
        assert_eq!(
            state.set_extra_quantity(30, 2),
            Err(SelectionError::ExtraNotSelected(30))
        );

        state.toggle_extra(30).unwrap();
        assert_eq!(
            state.set_extra_quantity(30, 0),
            Err(SelectionError::InvalidQuantity(0))
        );
        assert_eq!(state.toggle_extra(77), Err(SelectionError::UnknownExtra(77)));
    }

    // ==================== service changes ====================

    #[test]
    fn test_changing_service_clears_selection() {
        let mut state = SelectionState::default();
        state.select_service(cleaning_service());
        state.select_option(10).unwrap();
        state.toggle_extra(30).unwrap();

        state.select_service(free_service());
        assert!(state.selected_option_ids().is_empty());
        assert!(state.selected_extras().is_empty());
        assert_eq!(state.service_id(), Some(2));
        assert_eq!(state.duration_minutes(), 30);

        state.clear_service();
        assert_eq!(state.service_id(), None);
        assert_eq!(state.final_price(), dec!(0));
    }

    // ==================== multiplier ====================

    #[test]
    fn test_out_of_range_multiplier_stays_in_bounds() {
        let mut state = SelectionState::default();
        state.select_service(cleaning_service());
        state.select_option(11).unwrap();
        state.toggle_extra(30).unwrap();

        for multiplier in [dec!(-3), dec!(0), dec!(0.5), dec!(1.7), dec!(40)] {
            state.set_multiplier(multiplier);
            let totals = state.totals();
            assert!(totals.final_price >= totals.bounds.min);
            assert!(totals.final_price <= totals.bounds.max);
        }
    }

    #[test]
    fn test_zero_price_service_ignores_multiplier() {
        let mut state = SelectionState::default();
        state.select_service(free_service());
        state.set_multiplier(dec!(1.5));

        assert_eq!(state.totals().bounds.min, dec!(0));
        assert_eq!(state.totals().bounds.max, dec!(0));
        assert_eq!(state.final_price(), dec!(0));

        // Reverse derivation has nothing to divide by
        assert!(!state.set_target_price(dec!(20)));
        assert_eq!(state.multiplier(), dec!(1.5));
    }

    #[test]
    fn test_target_price_derives_multiplier() {
        let mut state = SelectionState::default();
        state.select_service(cleaning_service());
        state.select_option(10).unwrap();
        state.toggle_extra(30).unwrap();
        state.set_extra_quantity(30, 2).unwrap();

        assert!(state.set_target_price(dec!(72)));
        assert_eq!(state.multiplier(), dec!(1.2));
        assert_eq!(state.final_price(), dec!(72));

        // Beyond the max factor the slider pins at 1.5
        assert!(state.set_target_price(dec!(500)));
        assert_eq!(state.multiplier(), dec!(1.5));
        assert_eq!(state.final_price(), dec!(90));
    }
}
