use std::cmp::Ordering;

use rand::Rng;
use tracing::{debug, warn};

use crate::categories::CategoryNames;
use crate::config::Config;
use crate::error::{MissingTable, UnreadableTable};
use crate::format::short_id;
use crate::loader::Snapshot;
use crate::recommend::{sample_recommendations, Recommendation, SamplerPolicy};
use crate::tables::{CustomerSegment, OrderHistoryEntry, TableKind};

/// One panel of the customer detail. Each panel degrades on its own.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    Unavailable(MissingTable),
    Unreadable(UnreadableTable),
    Empty,
    Ready(T),
}

impl<T> Section<T> {
    fn from_rows(rows: T, is_empty: bool) -> Self {
        if is_empty {
            Section::Empty
        } else {
            Section::Ready(rows)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerProfile {
    pub customer: CustomerSegment,
    pub short_id: String,
    pub history: Section<Vec<OrderHistoryEntry>>,
    pub interests: Section<Vec<String>>,
    pub suggestions: Section<Vec<Recommendation>>,
}

impl CustomerProfile {
    pub fn build<R: Rng + ?Sized>(
        snapshot: &Snapshot,
        customer: &CustomerSegment,
        config: &Config,
        rng: &mut R,
    ) -> Self {
        let segment = customer.customer_segment.as_deref();
        debug!(customer = %customer.customer_unique_id, ?segment, "building customer profile");

        Self {
            customer: customer.clone(),
            short_id: short_id(&customer.customer_unique_id),
            history: order_history(snapshot, &customer.customer_unique_id),
            interests: main_interests(
                snapshot,
                segment,
                config.interest_pool,
                config.interest_count,
            ),
            suggestions: suggestions(snapshot, segment, config.sampler_policy(), rng),
        }
    }

    /// Re-reads the affinity file and draws a new set of suggestions, leaving the other panels
    /// untouched.
    pub fn reshuffle<R: Rng + ?Sized>(
        &mut self,
        snapshot: &Snapshot,
        config: &Config,
        rng: &mut R,
    ) {
        self.suggestions = suggestions(
            snapshot,
            self.customer.customer_segment.as_deref(),
            config.sampler_policy(),
            rng,
        );
    }
}

/// Orders of one customer in file order.
pub fn order_history(snapshot: &Snapshot, customer_id: &str) -> Section<Vec<OrderHistoryEntry>> {
    let history = match snapshot.history() {
        Ok(history) => history,
        Err(missing) => return Section::Unavailable(missing),
    };
    let rows: Vec<OrderHistoryEntry> = history
        .iter()
        .filter(|entry| entry.customer_unique_id == customer_id)
        .cloned()
        .collect();
    let is_empty = rows.is_empty();
    Section::from_rows(rows, is_empty)
}

/// Category names of the segment's strongest affinities: the `pool` best scored products,
/// joined to their category, normalized, de-duplicated and cut to `count`.
pub fn main_interests(
    snapshot: &Snapshot,
    segment: Option<&str>,
    pool: usize,
    count: usize,
) -> Section<Vec<String>> {
    let affinity = match snapshot.affinity() {
        Ok(affinity) => affinity,
        Err(missing) => return Section::Unavailable(missing),
    };
    let products = match snapshot.product_names() {
        Ok(products) => products,
        Err(missing) => return Section::Unavailable(missing),
    };
    let Some(segment) = segment else {
        return Section::Empty;
    };

    let mut top: Vec<_> = affinity
        .iter()
        .filter(|row| row.customer_segment == segment)
        .collect();
    top.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(Ordering::Equal)
    });
    top.truncate(pool);

    let names = CategoryNames::new(snapshot.translations());
    let mut interests = names
        .distinct_display_names(top.iter().filter_map(|row| products.category_of(&row.product_id)));
    interests.truncate(count);

    let is_empty = interests.is_empty();
    Section::from_rows(interests, is_empty)
}

/// Samples suggested products for the segment. The affinity file is read from disk on every
/// call, so its absence is reported per view rather than once at startup.
pub fn suggestions<R: Rng + ?Sized>(
    snapshot: &Snapshot,
    segment: Option<&str>,
    policy: SamplerPolicy,
    rng: &mut R,
) -> Section<Vec<Recommendation>> {
    let rows = match snapshot.read_product_affinity() {
        Ok(Some(rows)) => rows,
        Ok(None) => return Section::Unavailable(MissingTable(TableKind::ProductAffinity)),
        Err(err) => {
            warn!(error = ?err, "failed to read product affinity");
            return Section::Unreadable(UnreadableTable::new(TableKind::ProductAffinity, &err));
        }
    };
    let Some(segment) = segment else {
        return Section::Empty;
    };

    let drawn = sample_recommendations(&rows, segment, policy, rng);
    let is_empty = drawn.is_empty();
    Section::from_rows(drawn, is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{ProductNames, SegmentAffinity};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn customer(id: &str, segment: Option<&str>) -> CustomerSegment {
        CustomerSegment {
            customer_unique_id: id.to_string(),
            customer_segment: segment.map(str::to_string),
            total_spend: 129.9,
            n_orders: 1,
            recency_days: 212,
        }
    }

    fn affinity(segment: &str, product: &str, score: f64) -> SegmentAffinity {
        SegmentAffinity {
            customer_segment: segment.to_string(),
            product_id: product.to_string(),
            match_score: score,
        }
    }

    fn entry(customer: &str, category: &str, price: f64) -> OrderHistoryEntry {
        OrderHistoryEntry {
            customer_unique_id: customer.to_string(),
            order_purchase_timestamp: "2018-03-04 10:12:00".to_string(),
            product_category_name: Some(category.to_string()),
            price,
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            data_dir: "does/not/exist".into(),
            history: Some(vec![
                entry("c1", "moveis_decoracao", 49.9),
                entry("c2", "telefonia", 19.0),
                entry("c1", "esporte_lazer", 80.0),
            ]),
            affinity: Some(vec![
                affinity("Loyal", "p1", 0.4),
                affinity("Loyal", "p2", 0.9),
                affinity("Loyal", "p3", 0.8),
                affinity("Loyal", "p4", 0.7),
                affinity("Loyal", "p5", 0.6),
                affinity("Loyal", "p6", 0.5),
                affinity("Lost", "p1", 0.9),
            ]),
            product_names: Some(
                [
                    ("p1", "telefonia"),
                    ("p2", "bebe_eletronicos"),
                    ("p3", "bebe_eletronicos"),
                    ("p4", "cool_stuff"),
                    ("p6", "relogios_presentes"),
                ]
                .into_iter()
                .map(|(p, c)| (p.to_string(), c.to_string()))
                .collect::<ProductNames>(),
            ),
            ..Default::default()
        }
    }

    #[test]
    fn test_order_history_for_customer() {
        let snapshot = snapshot();
        let Section::Ready(rows) = order_history(&snapshot, "c1") else {
            panic!("expected history rows");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].price, 80.0);
        assert_eq!(order_history(&snapshot, "nobody"), Section::Empty);
    }

    #[test]
    fn test_order_history_without_table() {
        let snapshot = Snapshot::default();
        assert_eq!(
            order_history(&snapshot, "c1"),
            Section::Unavailable(MissingTable(TableKind::OrderHistory))
        );
    }

    #[test]
    fn test_main_interests() {
        let snapshot = snapshot();
        // p5 has no category and p1 falls outside the top five.
        assert_eq!(
            main_interests(&snapshot, Some("Loyal"), 5, 3),
            Section::Ready(vec![
                "Bebe Eletronicos".to_string(),
                "Cool Stuff".to_string(),
                "Relogios Presentes".to_string(),
            ])
        );
        assert_eq!(
            main_interests(&snapshot, Some("Loyal"), 6, 1),
            Section::Ready(vec!["Bebe Eletronicos".to_string()])
        );
        assert_eq!(main_interests(&snapshot, Some("Unknown"), 5, 3), Section::Empty);
        assert_eq!(main_interests(&snapshot, None, 5, 3), Section::Empty);
    }

    #[test]
    fn test_main_interests_without_product_names() {
        let snapshot = Snapshot {
            product_names: None,
            ..snapshot()
        };
        assert_eq!(
            main_interests(&snapshot, Some("Loyal"), 5, 3),
            Section::Unavailable(MissingTable(TableKind::ProductNames))
        );
    }

    #[test]
    fn test_profile_renders_without_product_affinity_file() {
        let snapshot = snapshot();
        let mut rng = StdRng::seed_from_u64(3);
        let profile = CustomerProfile::build(
            &snapshot,
            &customer("0000000000000000000000000000c1", Some("Loyal")),
            &Config::default_test_config(),
            &mut rng,
        );

        assert_eq!(profile.short_id, "...000000c1");
        assert_eq!(
            profile.suggestions,
            Section::Unavailable(MissingTable(TableKind::ProductAffinity))
        );
        assert!(matches!(profile.interests, Section::Ready(_)));
        assert_eq!(profile.history, Section::Empty);
    }
}
