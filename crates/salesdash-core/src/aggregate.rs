//! Aggregations over a filtered view
//!
//! All functions are pure: they never mutate the view and are defined for
//! every view, including an empty one.

use std::collections::HashMap;

use serde::Serialize;

use crate::filter::FilteredView;
use crate::models::{Field, Record, UNKNOWN};

/// Summed amount for one group value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAmount {
    pub key: String,
    pub amount: f64,
}

/// Number of records with one status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

/// Sum of `amount`, 0 for an empty view
pub fn total(view: &FilteredView<'_>) -> f64 {
    view.iter().map(|r| r.amount).sum()
}

/// Number of records
pub fn count(view: &FilteredView<'_>) -> usize {
    view.len()
}

/// Mean amount, `None` for an empty view
pub fn mean(view: &FilteredView<'_>) -> Option<f64> {
    match count(view) {
        0 => None,
        n => Some(total(view) / n as f64),
    }
}

/// Summed amount per value of `key`, in order of first appearance
pub fn group_sum(view: &FilteredView<'_>, key: Field) -> Vec<GroupAmount> {
    let mut groups: Vec<GroupAmount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in view.iter() {
        let value = record.field(key);
        match index.get(value) {
            Some(&i) => groups[i].amount += record.amount,
            None => {
                index.insert(value, groups.len());
                groups.push(GroupAmount {
                    key: value.to_string(),
                    amount: record.amount,
                });
            }
        }
    }

    groups
}

/// The `n` groups of `key` with the largest summed amount, descending
///
/// Groups with equal sums keep their first-appearance order.
pub fn top_n(view: &FilteredView<'_>, key: Field, n: usize) -> Vec<GroupAmount> {
    let mut groups = group_sum(view, key);
    // sort_by is stable, so ties stay in first-appearance order
    groups.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    groups.truncate(n);
    groups
}

/// Record count per status, in order of first appearance
pub fn status_counts(view: &FilteredView<'_>) -> Vec<StatusCount> {
    let mut counts: Vec<StatusCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in view.iter() {
        match index.get(record.status.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(record.status.as_str(), counts.len());
                counts.push(StatusCount {
                    status: record.status.clone(),
                    count: 1,
                });
            }
        }
    }

    counts
}

/// Records whose `field` equals `value` exactly
pub fn find_by_exact<'a>(view: &FilteredView<'a>, field: Field, value: &str) -> FilteredView<'a> {
    view.retain(|r| r.field(field) == value)
}

/// Records whose `field` contains `needle`, ignoring case
pub fn find_by_substring<'a>(
    view: &FilteredView<'a>,
    field: Field,
    needle: &str,
) -> FilteredView<'a> {
    let needle = needle.to_lowercase();
    view.retain(|r| r.field(field).to_lowercase().contains(&needle))
}

/// First record with the given order ID. Placeholder IDs never match.
pub fn find_by_order_id<'a>(view: &FilteredView<'a>, order_id: &str) -> Option<&'a Record> {
    view.iter().find(|r| r.order_id != UNKNOWN && r.order_id == order_id)
}

/// True when at least one record carries a real order ID
pub fn has_order_ids(view: &FilteredView<'_>) -> bool {
    view.iter().any(|r| r.order_id != UNKNOWN)
}

/// Distinct values of `field`, in order of first appearance
pub fn distinct(view: &FilteredView<'_>, field: Field) -> Vec<String> {
    group_sum(view, field).into_iter().map(|g| g.key).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use chrono::NaiveDate;

    fn record(category: &str, city: &str, status: &str, amount: f64, order_id: &str) -> Record {
        Record::new(
            NaiveDate::from_ymd_opt(2022, 4, 30).unwrap(),
            category,
            "State",
            city,
            status,
            amount,
            order_id,
        )
    }

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            record("Set", "Mumbai", "Shipped", 100.0, "A-1"),
            record("kurta", "Delhi", "Cancelled", 50.0, "A-2"),
            record("Western Dress", "Mumbai", "Shipped", 60.0, "A-3"),
            record("kurta", "Pune", "Shipped", 50.0, "A-4"),
            record("Top", "Delhi", "Pending", 100.0, "A-2"),
        ])
    }

    #[test]
    fn test_total_count_mean() {
        let dataset = sample();
        let view = dataset.view();
        assert_eq!(total(&view), 360.0);
        assert_eq!(count(&view), 5);
        assert_eq!(mean(&view), Some(72.0));
    }

    #[test]
    fn test_empty_view_is_guarded() {
        let dataset = Dataset::default();
        let view = dataset.view();
        assert_eq!(total(&view), 0.0);
        assert_eq!(count(&view), 0);
        assert_eq!(mean(&view), None);
        assert!(top_n(&view, Field::Category, 10).is_empty());
        assert!(status_counts(&view).is_empty());
    }

    #[test]
    fn test_group_sum_first_appearance_order() {
        let dataset = sample();
        let groups = group_sum(&dataset.view(), Field::RegionCity);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Mumbai", "Delhi", "Pune"]);
        assert_eq!(groups[0].amount, 160.0);
        assert_eq!(groups[1].amount, 150.0);
    }

    #[test]
    fn test_top_n_descending_with_stable_ties() {
        let dataset = sample();
        let top = top_n(&dataset.view(), Field::Category, 3);

        // Set and kurta both total 100; Set appears first
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].key, "Set");
        assert_eq!(top[1].key, "kurta");
        assert_eq!(top[2].key, "Top");
        assert!(top.windows(2).all(|w| w[0].amount >= w[1].amount));

        let single = top_n(&dataset.view(), Field::Category, 1);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].key, "Set");
    }

    #[test]
    fn test_status_counts_first_appearance_order() {
        let dataset = sample();
        let counts = status_counts(&dataset.view());
        assert_eq!(
            counts,
            vec![
                StatusCount { status: "Shipped".into(), count: 3 },
                StatusCount { status: "Cancelled".into(), count: 1 },
                StatusCount { status: "Pending".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_find_helpers() {
        let dataset = sample();
        let view = dataset.view();

        assert_eq!(find_by_exact(&view, Field::RegionCity, "Delhi").len(), 2);
        assert!(find_by_exact(&view, Field::RegionCity, "delhi").is_empty());

        let dresses = find_by_substring(&view, Field::Category, "DRESS");
        assert_eq!(dresses.len(), 1);
        assert_eq!(dresses.records()[0].category, "Western Dress");

        // Duplicate order IDs return the first match
        let found = find_by_order_id(&view, "A-2").unwrap();
        assert_eq!(found.category, "kurta");
        assert!(find_by_order_id(&view, "missing").is_none());
    }

    #[test]
    fn test_placeholder_order_id_never_matches() {
        let dataset = Dataset::from_records(vec![
            record("Set", "Pune", "Shipped", 10.0, UNKNOWN),
            record("kurta", "Pune", "Shipped", 20.0, "A-9"),
        ]);
        let view = dataset.view();

        assert!(find_by_order_id(&view, UNKNOWN).is_none());
        assert_eq!(find_by_order_id(&view, "A-9").unwrap().amount, 20.0);
        assert!(has_order_ids(&view));

        let placeholders =
            Dataset::from_records(vec![record("Set", "Pune", "Shipped", 10.0, UNKNOWN)]);
        assert!(!has_order_ids(&placeholders.view()));
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let dataset = sample();
        let view = dataset.view();
        let before = view.clone();
        let _ = top_n(&view, Field::RegionCity, 2);
        let _ = find_by_substring(&view, Field::Status, "ship");
        assert_eq!(view, before);
    }
}
