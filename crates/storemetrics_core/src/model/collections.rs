//! Category and location collections of metric trees.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use super::ids::{ProductCategory, RepairCategory, StoreLocation};
use super::tree::MetricTree;

/// A category enum with one synthesized "all" variant and a set of leaves.
pub trait CategoryKind:
    Copy + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// The composite category built by cross-category aggregation
    const ALL: Self;

    fn leaves() -> &'static [Self];

    fn label(self) -> &'static str;

    fn is_composite(self) -> bool {
        self == Self::ALL
    }
}

impl CategoryKind for ProductCategory {
    const ALL: Self = ProductCategory::AllProducts;

    fn leaves() -> &'static [Self] {
        &ProductCategory::LEAVES
    }

    fn label(self) -> &'static str {
        ProductCategory::label(self)
    }
}

impl CategoryKind for RepairCategory {
    const ALL: Self = RepairCategory::AllRepairs;

    fn leaves() -> &'static [Self] {
        &RepairCategory::LEAVES
    }

    fn label(self) -> &'static str {
        RepairCategory::label(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTree<C, M> {
    pub category: C,
    pub tree: MetricTree<M>,
}

/// One tree per leaf category, followed by the synthesized composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCollection<C, M> {
    pub categories: Vec<CategoryTree<C, M>>,
}

impl<C: CategoryKind, M> CategoryCollection<C, M> {
    /// Assemble a collection from leaf trees and their composite.
    #[must_use]
    pub fn new(mut leaves: Vec<CategoryTree<C, M>>, all: MetricTree<M>) -> Self {
        leaves.retain(|entry| !entry.category.is_composite());
        leaves.push(CategoryTree {
            category: C::ALL,
            tree: all,
        });
        Self { categories: leaves }
    }

    #[must_use]
    pub fn get(&self, category: C) -> Option<&MetricTree<M>> {
        self.categories
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| &entry.tree)
    }

    #[must_use]
    pub fn all(&self) -> Option<&MetricTree<M>> {
        self.get(C::ALL)
    }

    pub fn leaves(&self) -> impl Iterator<Item = &CategoryTree<C, M>> {
        self.categories
            .iter()
            .filter(|entry| !entry.category.is_composite())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryTree<C, M>> {
        self.categories.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Store location → tree (or category collection), including the synthesized
/// `AllLocations` entry once it has been aggregated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCollection<T> {
    pub entries: BTreeMap<StoreLocation, T>,
}

impl<T> Default for LocationCollection<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> LocationCollection<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: StoreLocation, value: T) -> Option<T> {
        self.entries.insert(location, value)
    }

    #[must_use]
    pub fn get(&self, location: StoreLocation) -> Option<&T> {
        self.entries.get(&location)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StoreLocation, &T)> {
        self.entries.iter().map(|(location, value)| (*location, value))
    }

    pub fn locations(&self) -> impl Iterator<Item = StoreLocation> + '_ {
        self.entries.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> FromIterator<(StoreLocation, T)> for LocationCollection<T> {
    fn from_iter<I: IntoIterator<Item = (StoreLocation, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
