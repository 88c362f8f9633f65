//! Cross-category and cross-location aggregation
//!
//! Both aggregators walk a template tree and merge identically keyed nodes
//! (same year, then month, then day) from the other inputs. Nodes that cannot
//! be merged are not errors: they are reported in [`Aggregation::skipped`].
//! Aggregation draws no randomness, so re-running it on the same inputs is
//! bit-identical.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::model::{Day, MetricTree, Month, MonthNode, Year, YearNode};

mod category;
mod location;

pub use category::aggregate_categories;
pub use location::{aggregate_location_collections, aggregate_locations};

/// Position of a node within a metric tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodePath {
    Tree,
    Year(Year),
    Month(Year, Month),
    Day(Year, Month, Day),
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodePath::Tree => f.write_str("root"),
            NodePath::Year(year) => write!(f, "{year}"),
            NodePath::Month(year, month) => write!(f, "{month} {year}"),
            NodePath::Day(year, month, day) => write!(f, "{month} {day} {year}"),
        }
    }
}

/// A node position where one input did not contribute to the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedNode {
    /// Category or location the node belongs to
    pub source: String,
    pub path: NodePath,
}

/// An aggregate together with every contribution that was skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation<T> {
    pub value: T,
    pub skipped: Vec<SkippedNode>,
}

impl<T> Aggregation<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Aggregation<U> {
        Aggregation {
            value: f(self.value),
            skipped: self.skipped,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Hash lookups for every node of one tree.
pub(crate) struct NodeIndex<'a, M> {
    years: FxHashMap<Year, &'a YearNode<M>>,
    months: FxHashMap<(Year, Month), &'a MonthNode<M>>,
    days: FxHashMap<(Year, Month, Day), &'a M>,
}

impl<'a, M> NodeIndex<'a, M> {
    pub(crate) fn new(tree: &'a MetricTree<M>) -> Self {
        let mut index = Self {
            years: FxHashMap::default(),
            months: FxHashMap::default(),
            days: FxHashMap::default(),
        };
        for year in &tree.years {
            index.years.insert(year.year, year);
            for month in &year.months {
                index.months.insert((year.year, month.month), month);
                for day in &month.days {
                    index.days.insert((year.year, month.month, day.day), &day.values);
                }
            }
        }
        index
    }

    /// Values of the node at `path`. The root is not indexed.
    pub(crate) fn get(&self, path: NodePath) -> Option<&'a M> {
        match path {
            NodePath::Tree => None,
            NodePath::Year(year) => self.years.get(&year).map(|&node| &node.totals),
            NodePath::Month(year, month) => self.months.get(&(year, month)).map(|&node| &node.totals),
            NodePath::Day(year, month, day) => self.days.get(&(year, month, day)).copied(),
        }
    }

    pub(crate) fn has(&self, path: NodePath) -> bool {
        path == NodePath::Tree || self.get(path).is_some()
    }
}

/// Every node of `tree` whose path is absent from `template`, stopping at the
/// highest missing level (a missing year is reported once, not per day).
pub(crate) fn nodes_missing_from<M>(tree: &MetricTree<M>, template: &NodeIndex<'_, M>) -> Vec<NodePath> {
    let mut missing = Vec::new();
    for year in &tree.years {
        let path = NodePath::Year(year.year);
        if !template.has(path) {
            missing.push(path);
            continue;
        }
        for month in &year.months {
            let path = NodePath::Month(year.year, month.month);
            if !template.has(path) {
                missing.push(path);
                continue;
            }
            for day in &month.days {
                let path = NodePath::Day(year.year, month.month, day.day);
                if !template.has(path) {
                    missing.push(path);
                }
            }
        }
    }
    missing
}
