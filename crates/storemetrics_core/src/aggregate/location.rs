//! Cross-location aggregation: builds the "All Locations" tree by folding every
//! location into a template.

use std::cmp::Reverse;

use tracing::debug;

use super::{Aggregation, NodeIndex, NodePath, SkippedNode, nodes_missing_from};
use crate::error::AggregationError;
use crate::model::{
    CategoryCollection, CategoryKind, CategoryTree, Metrics, MetricTree, StoreLocation,
};

/// Fold per-location trees into one composite tree.
///
/// The template is the tree with the broadest coverage: most years, then the
/// earliest first year, then input order. Every other tree is folded into it
/// in input order with [`Metrics::combine`], so three inputs with rates `a`,
/// `b`, `c` (template first) end at `((a + b) / 2 + c) / 2`. Both kinds of
/// mismatch are recorded as skipped under the folded location: template
/// nodes it lacks keep their values, and its nodes outside the template are
/// dropped.
pub fn aggregate_locations<M: Metrics>(
    trees: &[(StoreLocation, &MetricTree<M>)],
) -> Result<Aggregation<MetricTree<M>>, AggregationError> {
    let template = template_position(trees).ok_or(AggregationError::NoLocations)?;
    let template_tree = trees[template].1;
    let template_index = NodeIndex::new(template_tree);

    let mut acc = template_tree.clone();
    let mut skipped = Vec::new();
    for (position, &(location, tree)) in trees.iter().enumerate() {
        if position == template {
            continue;
        }
        let source = location.label();
        let index = NodeIndex::new(tree);
        let dropped = nodes_missing_from(tree, &template_index);
        let uncovered = nodes_missing_from(template_tree, &index);
        for path in dropped.into_iter().chain(uncovered) {
            debug!(source, %path, "skipped location contribution");
            skipped.push(SkippedNode {
                source: source.to_string(),
                path,
            });
        }
        fold_into(&mut acc, &index, &tree.totals);
    }

    Ok(Aggregation {
        value: acc,
        skipped,
    })
}

/// Fold per-location category collections category by category, including
/// the composite category. Categories follow the template location's order.
pub fn aggregate_location_collections<C, M>(
    collections: &[(StoreLocation, &CategoryCollection<C, M>)],
) -> Result<Aggregation<CategoryCollection<C, M>>, AggregationError>
where
    C: CategoryKind,
    M: Metrics,
{
    let shapes: Vec<(StoreLocation, &MetricTree<M>)> = collections
        .iter()
        .filter_map(|&(location, collection)| collection.all().map(|tree| (location, tree)))
        .collect();
    let template = template_position(&shapes).ok_or(AggregationError::NoLocations)?;
    let order = &collections
        .iter()
        .find(|(location, _)| *location == shapes[template].0)
        .ok_or(AggregationError::NoLocations)?
        .1
        .categories;

    let mut categories = Vec::with_capacity(order.len());
    let mut skipped = Vec::new();
    for entry in order {
        let trees: Vec<(StoreLocation, &MetricTree<M>)> = collections
            .iter()
            .filter_map(|&(location, collection)| {
                collection.get(entry.category).map(|tree| (location, tree))
            })
            .collect();
        let folded = aggregate_locations(&trees)?;
        for node in folded.skipped {
            skipped.push(SkippedNode {
                source: format!("{} / {}", node.source, entry.category.label()),
                path: node.path,
            });
        }
        categories.push(CategoryTree {
            category: entry.category,
            tree: folded.value,
        });
    }

    Ok(Aggregation {
        value: CategoryCollection { categories },
        skipped,
    })
}

fn template_position<M: Metrics>(trees: &[(StoreLocation, &MetricTree<M>)]) -> Option<usize> {
    let coverage = |tree: &MetricTree<M>| (tree.years.len(), Reverse(tree.first_year()));
    let mut best: Option<usize> = None;
    for (position, &(_, tree)) in trees.iter().enumerate() {
        let better = match best {
            None => true,
            Some(current) => coverage(tree) > coverage(trees[current].1),
        };
        if better {
            best = Some(position);
        }
    }
    best
}

/// Combine every node `index` shares with `acc`, and the roots.
fn fold_into<M: Metrics>(acc: &mut MetricTree<M>, index: &NodeIndex<'_, M>, totals: &M) {
    for year in &mut acc.years {
        if let Some(values) = index.get(NodePath::Year(year.year)) {
            year.totals = year.totals.combine(values);
        }
        for month in &mut year.months {
            if let Some(values) = index.get(NodePath::Month(year.year, month.month)) {
                month.totals = month.totals.combine(values);
            }
            for day in &mut month.days {
                if let Some(values) = index.get(NodePath::Day(year.year, month.month, day.day)) {
                    day.values = day.values.combine(values);
                }
            }
        }
    }
    acc.totals = acc.totals.combine(totals);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Breakdown, CustomerCounts, CustomerMetrics, Day, DayNode, Month, MonthNode, YearNode,
    };

    fn customer(total: u64, churn: f64) -> CustomerMetrics {
        CustomerMetrics {
            customers: CustomerCounts::from_parts(
                Breakdown::split(total / 2, 0.5, 0.5),
                Breakdown::split(total - total / 2, 0.5, 0.5),
            ),
            churn_rate: churn,
            retention_rate: 1.0 - churn,
        }
    }

    fn tree(years: &[i16], total: u64, churn: f64) -> MetricTree<CustomerMetrics> {
        let years = years
            .iter()
            .map(|&year| {
                let day = DayNode::new(Day::new(1).unwrap(), customer(total, churn));
                YearNode::from_months(year, vec![MonthNode::from_days(Month::January, vec![day])])
            })
            .collect();
        MetricTree::from_years(years)
    }

    #[test]
    fn test_template_prefers_most_years_then_earliest() {
        let short = tree(&[2019, 2020], 1, 0.1);
        let long_late = tree(&[2018, 2019, 2020], 1, 0.1);
        let long_early = tree(&[2017, 2018, 2019], 1, 0.1);
        let trees = [
            (StoreLocation::Vancouver, &short),
            (StoreLocation::Calgary, &long_late),
            (StoreLocation::Edmonton, &long_early),
        ];
        assert_eq!(template_position(&trees), Some(2));
        assert_eq!(template_position::<CustomerMetrics>(&[]), None);
    }

    #[test]
    fn test_shared_nodes_sum_and_average() {
        let edmonton = tree(&[2019, 2020], 10, 0.1);
        let calgary = tree(&[2020], 30, 0.3);
        let aggregation = aggregate_locations(&[
            (StoreLocation::Edmonton, &edmonton),
            (StoreLocation::Calgary, &calgary),
        ])
        .unwrap();
        let all = aggregation.value;

        let y2020 = all.year(2020).unwrap();
        assert_eq!(y2020.totals.customers.total.total, 40);
        assert!((y2020.totals.churn_rate - 0.2).abs() < 1e-12);
        // template-only year is kept unchanged
        assert_eq!(all.year(2019).unwrap().totals.customers.total.total, 10);
        assert_eq!(
            aggregation.skipped,
            vec![SkippedNode {
                source: "Calgary".into(),
                path: NodePath::Year(2019),
            }]
        );
    }

    #[test]
    fn test_nodes_outside_template_are_skipped() {
        let edmonton = tree(&[2019, 2020], 10, 0.1);
        let vancouver = tree(&[2021], 5, 0.2);
        let aggregation = aggregate_locations(&[
            (StoreLocation::Edmonton, &edmonton),
            (StoreLocation::Vancouver, &vancouver),
        ])
        .unwrap();
        assert!(aggregation.value.year(2021).is_none());
        let skipped_years: Vec<NodePath> = aggregation
            .skipped
            .iter()
            .inspect(|node| assert_eq!(node.source, "Vancouver"))
            .map(|node| node.path)
            .collect();
        assert_eq!(
            skipped_years,
            vec![NodePath::Year(2021), NodePath::Year(2019), NodePath::Year(2020)]
        );
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let trees: [(StoreLocation, &MetricTree<CustomerMetrics>); 0] = [];
        assert_eq!(
            aggregate_locations(&trees).unwrap_err(),
            AggregationError::NoLocations
        );
    }
}
