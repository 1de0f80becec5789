use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use crate::tables::CustomerSegment;

/// Limits offered by the filter controls: segment labels seen in the table, the observed
/// `n_orders` span and the configured `total_spend` browse range.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterBounds {
    /// Distinct labels in first-seen order. `None` stands for customers without a segment.
    pub segments: Vec<Option<String>>,
    pub orders: RangeInclusive<u32>,
    pub spend: RangeInclusive<f64>,
}

impl FilterBounds {
    pub fn observe(customers: &[CustomerSegment], spend: RangeInclusive<f64>) -> Self {
        let mut segments: Vec<Option<String>> = Vec::new();
        for customer in customers {
            if !segments.contains(&customer.customer_segment) {
                segments.push(customer.customer_segment.clone());
            }
        }

        let min = customers.iter().map(|c| c.n_orders).min().unwrap_or(0);
        let max = customers.iter().map(|c| c.n_orders).max().unwrap_or(0);

        Self {
            segments,
            orders: min..=max,
            spend,
        }
    }
}

/// Conjunction of the three browse predicates.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerFilter {
    pub segments: BTreeSet<Option<String>>,
    pub orders: RangeInclusive<u32>,
    pub spend: RangeInclusive<f64>,
}

impl CustomerFilter {
    /// Every segment allowed, ranges opened to the full bounds.
    pub fn defaults(bounds: &FilterBounds) -> Self {
        Self {
            segments: bounds.segments.iter().cloned().collect(),
            orders: bounds.orders.clone(),
            spend: bounds.spend.clone(),
        }
    }

    pub fn matches(&self, customer: &CustomerSegment) -> bool {
        self.segments.contains(&customer.customer_segment)
            && self.orders.contains(&customer.n_orders)
            && self.spend.contains(&customer.total_spend)
    }

    pub fn apply<'a, I>(&self, customers: I) -> Vec<&'a CustomerSegment>
    where
        I: IntoIterator<Item = &'a CustomerSegment>,
    {
        customers
            .into_iter()
            .filter(|customer| self.matches(customer))
            .collect()
    }
}

/// Single-row selection, held by `customer_unique_id` so that it survives re-filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection(Option<String>);

impl Selection {
    /// Returns whether the selection changed. Selecting the current row again is a no-op.
    pub fn select(&mut self, customer_id: &str) -> bool {
        if self.0.as_deref() == Some(customer_id) {
            return false;
        }
        self.0 = Some(customer_id.to_string());
        true
    }

    pub fn clear(&mut self) -> bool {
        self.0.take().is_some()
    }

    pub fn current(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Finds the selected customer among the visible rows.
    pub fn resolve<'a>(&self, visible: &[&'a CustomerSegment]) -> Option<&'a CustomerSegment> {
        let id = self.current()?;
        visible
            .iter()
            .copied()
            .find(|customer| customer.customer_unique_id == id)
    }

    /// Drops the selection when the selected customer is no longer visible.
    pub fn retain_visible(&mut self, visible: &[&CustomerSegment]) -> bool {
        if self.current().is_some() && self.resolve(visible).is_none() {
            return self.clear();
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: &str, segment: Option<&str>, spend: f64, orders: u32) -> CustomerSegment {
        CustomerSegment {
            customer_unique_id: id.to_string(),
            customer_segment: segment.map(str::to_string),
            total_spend: spend,
            n_orders: orders,
            recency_days: 12,
        }
    }

    fn table() -> Vec<CustomerSegment> {
        vec![
            customer("a", Some("Champions"), 1200.0, 6),
            customer("b", Some("New"), 35.5, 1),
            customer("c", None, 80.0, 1),
            customer("d", Some("Whales"), 7400.0, 3),
            customer("e", Some("New"), 5000.0, 2),
        ]
    }

    #[test]
    fn test_bounds_from_data() {
        let customers = table();
        let bounds = FilterBounds::observe(&customers, 0.0..=5000.0);

        assert_eq!(bounds.orders, 1..=6);
        assert_eq!(bounds.spend, 0.0..=5000.0);
        assert_eq!(
            bounds.segments,
            vec![
                Some("Champions".to_string()),
                Some("New".to_string()),
                None,
                Some("Whales".to_string()),
            ]
        );
    }

    #[test]
    fn test_defaults_hide_spend_above_range() {
        let customers = table();
        let filter = CustomerFilter::defaults(&FilterBounds::observe(&customers, 0.0..=5000.0));

        let ids: Vec<&str> = filter
            .apply(&customers)
            .iter()
            .map(|c| c.customer_unique_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c", "e"]);
    }

    #[test]
    fn test_predicates_are_conjunctive() {
        let customers = table();
        let filter = CustomerFilter {
            segments: [Some("New".to_string())].into_iter().collect(),
            orders: 2..=10,
            spend: 0.0..=10_000.0,
        };

        let visible = filter.apply(&customers);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].customer_unique_id, "e");
    }

    #[test]
    fn test_filter_is_idempotent() {
        let customers = table();
        let filter = CustomerFilter {
            segments: [Some("New".to_string()), None].into_iter().collect(),
            orders: 1..=2,
            spend: 0.0..=100.0,
        };

        let once = filter.apply(&customers);
        let twice = filter.apply(once.iter().copied());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_table_bounds() {
        let bounds = FilterBounds::observe(&[], 0.0..=5000.0);
        assert!(bounds.segments.is_empty());
        assert_eq!(bounds.orders, 0..=0);
    }

    #[test]
    fn test_selection_is_idempotent_and_clearable() {
        let mut selection = Selection::default();
        assert!(selection.select("a"));
        assert!(!selection.select("a"));
        assert_eq!(selection.current(), Some("a"));
        assert!(selection.clear());
        assert!(!selection.clear());
        assert_eq!(selection.current(), None);
    }

    #[test]
    fn test_selection_follows_identity_not_position() {
        let customers = table();
        let mut selection = Selection::default();
        selection.select("e");

        let all = CustomerFilter::defaults(&FilterBounds::observe(&customers, 0.0..=5000.0));
        let visible = all.apply(&customers);
        assert_eq!(selection.resolve(&visible).unwrap().customer_unique_id, "e");

        let narrowed = CustomerFilter {
            segments: [Some("New".to_string())].into_iter().collect(),
            ..all.clone()
        };
        let visible = narrowed.apply(&customers);
        assert!(!selection.retain_visible(&visible));
        assert_eq!(selection.resolve(&visible).unwrap().customer_unique_id, "e");

        let champions = CustomerFilter {
            segments: [Some("Champions".to_string())].into_iter().collect(),
            ..all
        };
        let visible = champions.apply(&customers);
        assert!(selection.retain_visible(&visible));
        assert_eq!(selection.current(), None);
    }
}
