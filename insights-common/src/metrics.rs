use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::tables::CustomerSegment;

/// Headline numbers and per-segment breakdowns for the aggregate screen.
///
/// Only customers with a segment label are counted, so `total_customers` always equals the sum
/// of `customers_by_segment`.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardMetrics {
    pub total_customers: usize,
    pub total_revenue: f64,
    pub avg_ticket: f64,
    pub returning_pct: f64,
    /// Sorted by count, descending.
    pub customers_by_segment: Vec<(String, usize)>,
    /// Sorted by revenue, descending.
    pub revenue_by_segment: Vec<(String, f64)>,
    pub top_segment: Option<TopSegment>,
    /// Sorted by segment label.
    pub segment_stats: Vec<SegmentStats>,
    pub rfm_points: Vec<RfmPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopSegment {
    pub segment: String,
    pub share_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentStats {
    pub segment: String,
    pub avg_spend: f64,
    pub avg_recency_days: f64,
    pub avg_orders: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RfmPoint {
    pub segment: String,
    pub recency_days: u32,
    pub total_spend: f64,
}

#[derive(Default)]
struct Accumulator {
    customers: usize,
    spend: f64,
    recency_days: f64,
    orders: f64,
}

/// `100 * part / whole`, or 0 when the ratio is undefined.
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 || !whole.is_finite() {
        return 0.0;
    }
    100.0 * part / whole
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    sum / count as f64
}

impl DashboardMetrics {
    pub fn compute(customers: &[CustomerSegment]) -> Self {
        let mut by_segment: BTreeMap<&str, Accumulator> = BTreeMap::new();
        let mut rfm_points = Vec::new();
        let mut returning = 0usize;

        for customer in customers {
            let Some(segment) = customer.customer_segment.as_deref() else {
                continue;
            };
            let acc = by_segment.entry(segment).or_default();
            acc.customers += 1;
            acc.spend += customer.total_spend;
            acc.recency_days += f64::from(customer.recency_days);
            acc.orders += f64::from(customer.n_orders);
            if customer.n_orders > 1 {
                returning += 1;
            }
            rfm_points.push(RfmPoint {
                segment: segment.to_string(),
                recency_days: customer.recency_days,
                total_spend: customer.total_spend,
            });
        }

        let total_customers: usize = by_segment.values().map(|acc| acc.customers).sum();
        let total_revenue: f64 = by_segment.values().map(|acc| acc.spend).sum();

        let mut customers_by_segment: Vec<(String, usize)> = by_segment
            .iter()
            .map(|(segment, acc)| (segment.to_string(), acc.customers))
            .collect();
        customers_by_segment.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let mut revenue_by_segment: Vec<(String, f64)> = by_segment
            .iter()
            .map(|(segment, acc)| (segment.to_string(), acc.spend))
            .collect();
        revenue_by_segment.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        let top_segment = revenue_by_segment
            .first()
            .map(|(segment, revenue)| TopSegment {
                segment: segment.clone(),
                share_pct: percent_of(*revenue, total_revenue),
            });

        let segment_stats = by_segment
            .iter()
            .map(|(segment, acc)| SegmentStats {
                segment: segment.to_string(),
                avg_spend: mean(acc.spend, acc.customers),
                avg_recency_days: mean(acc.recency_days, acc.customers),
                avg_orders: mean(acc.orders, acc.customers),
            })
            .collect();

        Self {
            total_customers,
            total_revenue,
            avg_ticket: mean(total_revenue, total_customers),
            returning_pct: percent_of(returning as f64, total_customers as f64),
            customers_by_segment,
            revenue_by_segment,
            top_segment,
            segment_stats,
            rfm_points,
        }
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
            recency_days: 30,
        }
    }

    #[test]
    fn test_top_segment_share() {
        let metrics = DashboardMetrics::compute(&[
            customer("a", Some("A"), 100.0, 1),
            customer("b", Some("B"), 900.0, 1),
        ]);

        assert_eq!(metrics.total_customers, 2);
        assert_eq!(metrics.total_revenue, 1000.0);
        assert_eq!(metrics.avg_ticket, 500.0);
        assert_eq!(metrics.returning_pct, 0.0);

        let top = metrics.top_segment.unwrap();
        assert_eq!(top.segment, "B");
        assert!((top.share_pct - 90.0).abs() < 1e-9);
        assert_eq!(
            metrics.revenue_by_segment,
            vec![("B".to_string(), 900.0), ("A".to_string(), 100.0)]
        );
    }

    #[test]
    fn test_unlabelled_customers_are_dropped() {
        let metrics = DashboardMetrics::compute(&[
            customer("a", Some("Loyal"), 50.0, 3),
            customer("b", None, 5000.0, 9),
            customer("c", Some("Loyal"), 150.0, 1),
            customer("d", Some("New"), 20.0, 1),
        ]);

        let counted: usize = metrics.customers_by_segment.iter().map(|(_, n)| n).sum();
        assert_eq!(metrics.total_customers, 3);
        assert_eq!(counted, metrics.total_customers);
        assert_eq!(metrics.total_revenue, 220.0);
        assert_eq!(metrics.rfm_points.len(), 3);
        assert_eq!(
            metrics.customers_by_segment,
            vec![("Loyal".to_string(), 2), ("New".to_string(), 1)]
        );
        assert!((metrics.returning_pct - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_table_has_defined_percentages() {
        let metrics = DashboardMetrics::compute(&[customer("a", None, 10.0, 2)]);

        assert_eq!(metrics.total_customers, 0);
        assert_eq!(metrics.returning_pct, 0.0);
        assert_eq!(metrics.avg_ticket, 0.0);
        assert!(metrics.top_segment.is_none());
        assert!(metrics.segment_stats.is_empty());
    }

    #[test]
    fn test_zero_revenue_share_is_zero() {
        let metrics = DashboardMetrics::compute(&[customer("a", Some("Dormant"), 0.0, 1)]);
        assert_eq!(metrics.top_segment.unwrap().share_pct, 0.0);
    }

    #[test]
    fn test_segment_stats() {
        let mut frequent = customer("a", Some("Champions"), 300.0, 4);
        frequent.recency_days = 10;
        let mut other = customer("b", Some("Champions"), 100.0, 2);
        other.recency_days = 20;

        let metrics =
            DashboardMetrics::compute(&[frequent, other, customer("c", Some("At Risk"), 80.0, 1)]);

        assert_eq!(
            metrics.segment_stats,
            vec![
                SegmentStats {
                    segment: "At Risk".to_string(),
                    avg_spend: 80.0,
                    avg_recency_days: 30.0,
                    avg_orders: 1.0,
                },
                SegmentStats {
                    segment: "Champions".to_string(),
                    avg_spend: 200.0,
                    avg_recency_days: 15.0,
                    avg_orders: 3.0,
                },
            ]
        );
    }

    #[test]
    fn test_percent_of_guards_zero() {
        assert_eq!(percent_of(5.0, 0.0), 0.0);
        assert_eq!(percent_of(5.0, f64::NAN), 0.0);
        assert_eq!(percent_of(1.0, 4.0), 25.0);
    }
}
