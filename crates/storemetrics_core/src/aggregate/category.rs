//! Cross-category aggregation: builds the "All Products" / "All Repairs" tree.

use tracing::debug;

use super::{Aggregation, NodeIndex, NodePath, SkippedNode, nodes_missing_from};
use crate::error::AggregationError;
use crate::model::{
    CategoryKind, CategoryTree, DayNode, Metrics, MetricTree, MonthNode, YearNode,
};

/// Sum every leaf category tree into one composite tree.
///
/// The first leaf's years, months and days form the template. Each template
/// node is the elementwise sum of the identically keyed node in every leaf;
/// leaves without that node contribute nothing and are recorded as skipped,
/// as are leaf nodes the template does not have. The root is the rollup of
/// the aggregated years, so skipped contributions never reach it. Composite
/// entries in the input are ignored.
pub fn aggregate_categories<C, M>(
    trees: &[CategoryTree<C, M>],
) -> Result<Aggregation<MetricTree<M>>, AggregationError>
where
    C: CategoryKind,
    M: Metrics,
{
    let leaves: Vec<&CategoryTree<C, M>> = trees
        .iter()
        .filter(|entry| !entry.category.is_composite())
        .collect();
    let Some(template) = leaves.first() else {
        return Err(AggregationError::NoCategories);
    };

    let indexes: Vec<(C, NodeIndex<'_, M>)> = leaves
        .iter()
        .map(|entry| (entry.category, NodeIndex::new(&entry.tree)))
        .collect();
    let mut skipped = Vec::new();

    let mut years = Vec::with_capacity(template.tree.years.len());
    for year in &template.tree.years {
        let mut months = Vec::with_capacity(year.months.len());
        for month in &year.months {
            let mut days = Vec::with_capacity(month.days.len());
            for day in &month.days {
                let path = NodePath::Day(year.year, month.month, day.day);
                days.push(DayNode::new(day.day, sum_at(&indexes, path, &mut skipped)));
            }
            let path = NodePath::Month(year.year, month.month);
            months.push(MonthNode {
                month: month.month,
                totals: sum_at(&indexes, path, &mut skipped),
                days,
            });
        }
        years.push(YearNode {
            year: year.year,
            totals: sum_at(&indexes, NodePath::Year(year.year), &mut skipped),
            months,
        });
    }

    let template_index = &indexes[0].1;
    for leaf in leaves.iter().skip(1) {
        for path in nodes_missing_from(&leaf.tree, template_index) {
            record(&mut skipped, leaf.category.label(), path);
        }
    }

    Ok(Aggregation {
        value: MetricTree::from_years(years),
        skipped,
    })
}

fn sum_at<C: CategoryKind, M: Metrics>(
    indexes: &[(C, NodeIndex<'_, M>)],
    path: NodePath,
    skipped: &mut Vec<SkippedNode>,
) -> M {
    let mut acc = M::default();
    for (category, index) in indexes {
        match index.get(path) {
            Some(values) => acc = acc.add(values),
            None => record(skipped, category.label(), path),
        }
    }
    acc
}

fn record(skipped: &mut Vec<SkippedNode>, source: &str, path: NodePath) {
    debug!(source, %path, "skipped category contribution");
    skipped.push(SkippedNode {
        source: source.to_string(),
        path,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cents, Day, Month, RepairCategory, RepairMetrics};

    fn repair(units: u64) -> RepairMetrics {
        RepairMetrics {
            revenue: Cents(units as i64 * 1_000),
            units_repaired: units,
        }
    }

    fn tree(year: i16, days: &[(u8, u64)]) -> MetricTree<RepairMetrics> {
        let days = days
            .iter()
            .map(|&(d, units)| DayNode::new(Day::new(d).unwrap(), repair(units)))
            .collect();
        let month = MonthNode::from_days(Month::March, days);
        MetricTree::from_years(vec![YearNode::from_months(year, vec![month])])
    }

    fn leaf(category: RepairCategory, tree: MetricTree<RepairMetrics>) -> CategoryTree<RepairCategory, RepairMetrics> {
        CategoryTree { category, tree }
    }

    #[test]
    fn test_sums_identical_nodes() {
        let trees = [
            leaf(RepairCategory::Battery, tree(2020, &[(1, 2), (2, 3)])),
            leaf(RepairCategory::Screen, tree(2020, &[(1, 10), (2, 20)])),
        ];
        let aggregation = aggregate_categories(&trees).unwrap();
        let all = aggregation.value;

        assert!(aggregation.skipped.is_empty());
        assert_eq!(all.totals.units_repaired, 35);
        assert_eq!(
            all.day(2020, Month::March, Day::new(2).unwrap()).unwrap().values.units_repaired,
            23
        );
        assert_eq!(all.month(2020, Month::March).unwrap().totals.revenue, Cents(35_000));
    }

    #[test]
    fn test_missing_nodes_are_skipped_not_fatal() {
        let trees = [
            leaf(RepairCategory::Battery, tree(2020, &[(1, 2), (2, 3)])),
            leaf(RepairCategory::Keyboard, tree(2020, &[(1, 1)])),
            leaf(RepairCategory::Screen, tree(2021, &[(1, 7)])),
        ];
        let aggregation = aggregate_categories(&trees).unwrap();
        let all = &aggregation.value;

        assert_eq!(all.years.len(), 1);
        // Screen's 2021 units stay out of the root as well
        assert_eq!(all.totals.units_repaired, 6);
        assert_eq!(all.totals, all.year(2020).unwrap().totals);
        let day2 = all.day(2020, Month::March, Day::new(2).unwrap()).unwrap();
        assert_eq!(day2.values.units_repaired, 3);
        assert!(aggregation.skipped.contains(&SkippedNode {
            source: "Keyboard".into(),
            path: NodePath::Day(2020, Month::March, Day::new(2).unwrap()),
        }));
        assert!(aggregation.skipped.contains(&SkippedNode {
            source: "Screen".into(),
            path: NodePath::Year(2021),
        }));
    }

    #[test]
    fn test_no_leaves_is_an_error() {
        let trees: [CategoryTree<RepairCategory, RepairMetrics>; 1] =
            [leaf(RepairCategory::AllRepairs, tree(2020, &[(1, 1)]))];
        assert_eq!(
            aggregate_categories(&trees).unwrap_err(),
            AggregationError::NoCategories
        );
    }
}
