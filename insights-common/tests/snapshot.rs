use std::path::PathBuf;

use insights_common::config::Config;
use insights_common::error::{MissingTable, UnreadableTable};
use insights_common::filter::{CustomerFilter, FilterBounds};
use insights_common::loader::Snapshot;
use insights_common::metrics::DashboardMetrics;
use insights_common::profile::{CustomerProfile, Section};
use insights_common::tables::TableKind;
use rand::rngs::StdRng;
use rand::SeedableRng;
use test_log::test;

const BIG_SPENDER: &str = "259dac757896d24d7702b9acbbff3f3c";

fn get_case_path(relative_path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/_cases")
        .join(relative_path)
}

#[test]
fn test_loads_every_table() {
    let snapshot = Snapshot::load(get_case_path("full"));

    assert!(snapshot.issues.is_empty());
    assert_eq!(
        snapshot.row_counts(),
        vec![
            (TableKind::CustomerSegments, 4),
            (TableKind::SegmentAffinity, 4),
            (TableKind::OrderHistory, 3),
            (TableKind::ProductNames, 2),
            (TableKind::ProductSegments, 2),
            (TableKind::CategoryTranslation, 2),
        ]
    );

    let customers = snapshot.customers().unwrap();
    assert_eq!(customers[2].customer_segment, None);
    assert_eq!(customers[3].total_spend, 7250.25);
    assert_eq!(
        snapshot.product_segments.as_ref().unwrap().headers,
        vec!["product_id", "product_segment"]
    );
}

#[test]
fn test_dashboard_totals_match_distribution() {
    let snapshot = Snapshot::load(get_case_path("full"));
    let metrics = DashboardMetrics::compute(snapshot.customers().unwrap());

    let distributed: usize = metrics.customers_by_segment.iter().map(|(_, n)| n).sum();
    assert_eq!(metrics.total_customers, 3);
    assert_eq!(distributed, metrics.total_customers);
    assert_eq!(metrics.top_segment.unwrap().segment, "X");
    assert!((metrics.returning_pct - 100.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_default_filter_hides_spend_above_range() {
    let snapshot = Snapshot::load(get_case_path("full"));
    let config = Config::default_test_config();
    let customers = snapshot.customers().unwrap();

    let bounds = FilterBounds::observe(customers, config.spend_range());
    let visible = CustomerFilter::defaults(&bounds).apply(customers);

    assert_eq!(bounds.orders, 1..=3);
    assert_eq!(visible.len(), 3);
    assert!(visible.iter().all(|c| c.customer_unique_id != BIG_SPENDER));
}

#[test]
fn test_full_customer_profile() {
    let snapshot = Snapshot::load(get_case_path("full"));
    let config = Config::default_test_config();
    let customer = snapshot
        .customers()
        .unwrap()
        .iter()
        .find(|c| c.customer_unique_id == BIG_SPENDER)
        .unwrap();

    for seed in 0..5 {
        let mut rng = StdRng::seed_from_u64(seed);
        let profile = CustomerProfile::build(&snapshot, customer, &config, &mut rng);

        assert_eq!(profile.short_id, "...bbff3f3c");
        let Section::Ready(history) = &profile.history else {
            panic!("expected order history");
        };
        assert_eq!(history.len(), 2);
        assert_eq!(
            profile.interests,
            Section::Ready(vec![
                "Bebe Eletronicos".to_string(),
                "Health Beauty".to_string()
            ])
        );
        let Section::Ready(suggestions) = &profile.suggestions else {
            panic!("expected suggestions");
        };
        let names: Vec<&str> = suggestions
            .iter()
            .map(|s| s.display_name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["Relogios Presentes", "Esporte Lazer", "Cama Mesa Banho"]
        );
    }
}

#[test]
fn test_customer_without_segment_has_empty_suggestions() {
    let snapshot = Snapshot::load(get_case_path("full"));
    let customer = &snapshot.customers().unwrap()[2];
    let mut rng = StdRng::seed_from_u64(11);

    let profile =
        CustomerProfile::build(&snapshot, customer, &Config::default_test_config(), &mut rng);
    assert_eq!(profile.suggestions, Section::Empty);
    assert_eq!(profile.interests, Section::Empty);
    assert_eq!(profile.history, Section::Empty);
}

#[test]
fn test_missing_tables_degrade_per_section() {
    let snapshot = Snapshot::load(get_case_path("partial"));
    assert!(snapshot.issues.is_empty());
    assert_eq!(
        snapshot.affinity().unwrap_err(),
        MissingTable(TableKind::SegmentAffinity)
    );

    let customer = &snapshot.customers().unwrap()[0];
    let mut rng = StdRng::seed_from_u64(5);
    let profile =
        CustomerProfile::build(&snapshot, customer, &Config::default_test_config(), &mut rng);

    assert_eq!(
        profile.history,
        Section::Unavailable(MissingTable(TableKind::OrderHistory))
    );
    assert_eq!(
        profile.interests,
        Section::Unavailable(MissingTable(TableKind::SegmentAffinity))
    );
    assert_eq!(
        profile.suggestions,
        Section::Unavailable(MissingTable(TableKind::ProductAffinity))
    );
}

#[test]
fn test_malformed_table_is_skipped_and_reported() {
    let snapshot = Snapshot::load(get_case_path("malformed"));

    assert!(snapshot.customers().is_err());
    assert_eq!(snapshot.issues.len(), 1);
    assert!(snapshot.issues[0]
        .path()
        .ends_with(TableKind::CustomerSegments.file_name()));
    assert_eq!(
        snapshot.translations().unwrap().english_name("beleza_saude"),
        Some("health_beauty")
    );
}

#[test]
fn test_undecodable_affinity_file_is_unreadable_not_missing() {
    let snapshot = Snapshot::load(get_case_path("unreadable_affinity"));
    assert!(snapshot.issues.is_empty());

    let customer = &snapshot.customers().unwrap()[0];
    let mut rng = StdRng::seed_from_u64(2);
    let profile =
        CustomerProfile::build(&snapshot, customer, &Config::default_test_config(), &mut rng);

    let Section::Unreadable(unreadable) = &profile.suggestions else {
        panic!("expected unreadable suggestions, got {:?}", profile.suggestions);
    };
    assert_eq!(unreadable.table, TableKind::ProductAffinity);
    assert!(!unreadable.reason.is_empty());
    assert_eq!(
        unreadable.to_string(),
        "unreadable file: product_affinity_v2.csv"
    );
    assert_ne!(
        profile.suggestions,
        Section::Unavailable(MissingTable(TableKind::ProductAffinity))
    );
}

#[test]
fn test_missing_directory_loads_nothing() {
    let snapshot = Snapshot::load(get_case_path("does-not-exist"));
    assert!(snapshot.row_counts().is_empty());
    assert!(snapshot.issues.is_empty());
}
