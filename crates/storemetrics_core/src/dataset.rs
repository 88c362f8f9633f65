//! Dataset generation: one domain, every requested location, plus the
//! synthesized "All Locations" composite.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::info;

use crate::aggregate::{
    SkippedNode, aggregate_categories, aggregate_location_collections, aggregate_locations,
};
use crate::cache::{CacheDocument, DocumentPayload};
use crate::calendar::{CalendarIndex, current_year};
use crate::config::RangeProvider;
use crate::dispatch::{join_outcomes, run_per_location};
use crate::error::MetricsError;
use crate::generate::{
    CustomerGenerator, FinancialGenerator, MetricGenerator, ProductGenerator, RepairGenerator,
    generate_tree,
};
use crate::model::{
    CategoryCollection, CategoryKind, CategoryTree, CustomerMetrics, FinancialMetrics,
    LocationCollection, MetricTree, MetricsDomain, ProductCategory, ProductMetrics,
    RepairCategory, RepairMetrics, StoreLocation, Year,
};

/// What to generate: which locations, through which year, and how to seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub locations: Vec<StoreLocation>,
    pub through_year: Year,
    pub seed: Option<u64>,
}

impl GenerationRequest {
    /// Every physical location through `through_year`, unseeded
    #[must_use]
    pub fn new(through_year: Year) -> Self {
        Self {
            locations: StoreLocation::PHYSICAL.to_vec(),
            through_year,
            seed: None,
        }
    }

    /// Every physical location through the current civil year
    #[must_use]
    pub fn through_now() -> Self {
        Self::new(current_year())
    }

    /// Restrict to `locations`. Composite locations are always synthesized,
    /// never generated, so they are dropped here.
    #[must_use]
    pub fn locations(mut self, locations: impl IntoIterator<Item = StoreLocation>) -> Self {
        self.locations.clear();
        for location in locations {
            if !location.is_composite() && !self.locations.contains(&location) {
                self.locations.push(location);
            }
        }
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// A fresh RNG for one location's unit, derived from the request seed
    /// when there is one.
    fn unit_rng(&self, location: StoreLocation) -> SmallRng {
        match self.seed {
            Some(seed) => {
                let mix = (location as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
                SmallRng::seed_from_u64(seed ^ mix)
            }
            None => SmallRng::from_os_rng(),
        }
    }
}

/// Generated trees for one domain, keyed by location (including
/// `AllLocations`).
#[derive(Debug, Clone, PartialEq)]
pub enum DomainDataset {
    Customer(LocationCollection<MetricTree<CustomerMetrics>>),
    Financial(LocationCollection<MetricTree<FinancialMetrics>>),
    Product(LocationCollection<CategoryCollection<ProductCategory, ProductMetrics>>),
    Repair(LocationCollection<CategoryCollection<RepairCategory, RepairMetrics>>),
}

/// A dataset and every node the aggregators had to skip while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub dataset: DomainDataset,
    pub skipped: Vec<SkippedNode>,
}

/// Generate `domain` for every location in `request`, aggregate categories
/// within each location, then aggregate all locations.
///
/// Any failed location fails the whole dataset with
/// [`AggregationError::LocationFailed`](crate::error::AggregationError), which
/// names the first failure in request order and carries the rest.
pub fn generate_dataset(
    domain: MetricsDomain,
    request: &GenerationRequest,
    ranges: &dyn RangeProvider,
) -> Result<Generated, MetricsError> {
    let generated = match domain {
        MetricsDomain::Customer => {
            let generator = CustomerGenerator::new(ranges.customer());
            let (trees, skipped) = per_location_trees(&generator, request, ranges)?;
            Generated {
                dataset: DomainDataset::Customer(trees),
                skipped,
            }
        }
        MetricsDomain::Financial => {
            let generator = FinancialGenerator::new(ranges.financial());
            let (trees, skipped) = per_location_trees(&generator, request, ranges)?;
            Generated {
                dataset: DomainDataset::Financial(trees),
                skipped,
            }
        }
        MetricsDomain::Product => {
            let (collections, skipped) = per_location_categories(request, ranges, |category| {
                ProductGenerator::new(ranges.product().for_category(category))
            })?;
            Generated {
                dataset: DomainDataset::Product(collections),
                skipped,
            }
        }
        MetricsDomain::Repair => {
            let (collections, skipped) = per_location_categories(request, ranges, |category| {
                RepairGenerator::new(ranges.repair().for_category(category))
            })?;
            Generated {
                dataset: DomainDataset::Repair(collections),
                skipped,
            }
        }
    };

    info!(
        %domain,
        locations = request.locations.len(),
        skipped = generated.skipped.len(),
        "generated dataset"
    );
    Ok(generated)
}

type Trees<M> = LocationCollection<MetricTree<M>>;

fn per_location_trees<G: MetricGenerator>(
    generator: &G,
    request: &GenerationRequest,
    ranges: &dyn RangeProvider,
) -> Result<(Trees<G::Metrics>, Vec<SkippedNode>), MetricsError> {
    let outcomes = run_per_location(&request.locations, |location| {
        let index = CalendarIndex::for_location(location, ranges.history(), request.through_year)?;
        let mut rng = request.unit_rng(location);
        Ok(generate_tree(generator, &index, location, &mut rng)?)
    });
    let trees = join_outcomes(outcomes)?;

    let all = {
        let refs: Vec<_> = trees.iter().map(|(location, tree)| (*location, tree)).collect();
        aggregate_locations(&refs)?
    };
    let mut collection: Trees<G::Metrics> = trees.into_iter().collect();
    collection.insert(StoreLocation::AllLocations, all.value);
    Ok((collection, all.skipped))
}

type Collections<C, M> = LocationCollection<CategoryCollection<C, M>>;

fn per_location_categories<C, G, F>(
    request: &GenerationRequest,
    ranges: &dyn RangeProvider,
    leaf_generator: F,
) -> Result<(Collections<C, G::Metrics>, Vec<SkippedNode>), MetricsError>
where
    C: CategoryKind,
    G: MetricGenerator,
    F: Fn(C) -> G + Sync,
{
    let outcomes = run_per_location(&request.locations, |location| {
        let index = CalendarIndex::for_location(location, ranges.history(), request.through_year)?;
        let mut rng = request.unit_rng(location);

        let mut leaves = Vec::with_capacity(C::leaves().len());
        for &category in C::leaves() {
            let tree = generate_tree(&leaf_generator(category), &index, location, &mut rng)?;
            leaves.push(CategoryTree { category, tree });
        }
        let all = aggregate_categories(&leaves)?;
        let skipped: Vec<SkippedNode> = all
            .skipped
            .into_iter()
            .map(|node| SkippedNode {
                source: format!("{location} / {}", node.source),
                path: node.path,
            })
            .collect();
        Ok((CategoryCollection::new(leaves, all.value), skipped))
    });
    let joined = join_outcomes(outcomes)?;

    let mut skipped = Vec::new();
    let mut collections = Collections::<C, G::Metrics>::new();
    for (location, (collection, unit_skipped)) in joined {
        skipped.extend(unit_skipped);
        collections.insert(location, collection);
    }

    let all = {
        let refs: Vec<_> = request
            .locations
            .iter()
            .filter_map(|&location| collections.get(location).map(|c| (location, c)))
            .collect();
        aggregate_location_collections(&refs)?
    };
    skipped.extend(all.skipped);
    collections.insert(StoreLocation::AllLocations, all.value);
    Ok((collections, skipped))
}

/// The category segment used in cache keys for domains without categories
pub const OVERVIEW_CATEGORY: &str = "Overview";

impl DomainDataset {
    #[must_use]
    pub fn domain(&self) -> MetricsDomain {
        match self {
            DomainDataset::Customer(_) => MetricsDomain::Customer,
            DomainDataset::Financial(_) => MetricsDomain::Financial,
            DomainDataset::Product(_) => MetricsDomain::Product,
            DomainDataset::Repair(_) => MetricsDomain::Repair,
        }
    }

    /// One cache document per location and category, stamped with `now`.
    #[must_use]
    pub fn documents(&self, base_url: &str, now: jiff::Timestamp) -> Vec<CacheDocument> {
        let mut documents = Vec::new();
        match self {
            DomainDataset::Customer(trees) => {
                for (location, tree) in trees.iter() {
                    let payload = DocumentPayload::Customer(tree.clone());
                    documents.push(CacheDocument::new(base_url, location, payload, now));
                }
            }
            DomainDataset::Financial(trees) => {
                for (location, tree) in trees.iter() {
                    let payload = DocumentPayload::Financial(tree.clone());
                    documents.push(CacheDocument::new(base_url, location, payload, now));
                }
            }
            DomainDataset::Product(collections) => {
                for (location, collection) in collections.iter() {
                    for entry in collection.iter() {
                        let payload = DocumentPayload::Product {
                            category: entry.category,
                            tree: entry.tree.clone(),
                        };
                        documents.push(CacheDocument::new(base_url, location, payload, now));
                    }
                }
            }
            DomainDataset::Repair(collections) => {
                for (location, collection) in collections.iter() {
                    for entry in collection.iter() {
                        let payload = DocumentPayload::Repair {
                            category: entry.category,
                            tree: entry.tree.clone(),
                        };
                        documents.push(CacheDocument::new(base_url, location, payload, now));
                    }
                }
            }
        }
        documents
    }
}

#[cfg(test)]
mod tests {
    use rand::RngCore;

    use super::*;
    use crate::config::RangeSet;

    #[test]
    fn test_request_drops_composites_and_seeds_per_location() {
        let request = GenerationRequest::new(2024)
            .locations([StoreLocation::Calgary, StoreLocation::AllLocations])
            .seed(42);
        assert_eq!(request.locations, vec![StoreLocation::Calgary]);

        let a = request.unit_rng(StoreLocation::Calgary).next_u64();
        let b = request.unit_rng(StoreLocation::Calgary).next_u64();
        let c = request.unit_rng(StoreLocation::Edmonton).next_u64();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_seeded_datasets_are_reproducible() {
        let ranges = RangeSet::default();
        let request = GenerationRequest::new(2020).seed(7);
        let a = generate_dataset(MetricsDomain::Repair, &request, &ranges).unwrap();
        let b = generate_dataset(MetricsDomain::Repair, &request, &ranges).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_failed_location_fails_the_join() {
        let ranges = RangeSet::default();
        // Vancouver opens in 2019
        let request = GenerationRequest::new(2018).seed(1);
        let err = generate_dataset(MetricsDomain::Customer, &request, &ranges).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::PartialAggregation);
        assert!(err.to_string().contains("Vancouver"));
    }
}
