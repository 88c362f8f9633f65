//! Cache documents
//!
//! A generated dataset is persisted as one document per location and
//! category. Each document carries a deterministic [`CacheKey`], a version
//! counter and creation/update timestamps; storage itself lives outside this
//! crate.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::dataset::OVERVIEW_CATEGORY;
use crate::error::{LookupError, ParseKindError};
use crate::model::{
    CustomerMetrics, FinancialMetrics, MetricTree, MetricsDomain, ProductCategory, ProductMetrics,
    RepairCategory, RepairMetrics, StoreLocation,
};
use crate::reshape::{
    ChartData, ChartQuery, CustomerMetric, FinancialMetric, ProductMetric, RepairMetric, reshape,
};

/// `{base_url}/{domain}/{location}/{category}` with every segment slugged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    #[must_use]
    pub fn derive(
        base_url: &str,
        domain: MetricsDomain,
        location: StoreLocation,
        category: &str,
    ) -> Self {
        CacheKey(format!(
            "{}/{}/{}/{}",
            base_url.trim_end_matches('/'),
            slug(domain.label()),
            slug(location.label()),
            slug(category)
        ))
    }

    /// A key read back from storage, already derived.
    #[must_use]
    pub fn from_raw(key: String) -> Self {
        CacheKey(key)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercase, with every run of non-alphanumerics collapsed to one `-`.
fn slug(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// A metric selector for any domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "domain", content = "metric", rename_all = "camelCase")]
pub enum MetricSelector {
    Customer(CustomerMetric),
    Financial(FinancialMetric),
    Product(ProductMetric),
    Repair(RepairMetric),
}

impl MetricSelector {
    #[must_use]
    pub fn domain(self) -> MetricsDomain {
        match self {
            MetricSelector::Customer(_) => MetricsDomain::Customer,
            MetricSelector::Financial(_) => MetricsDomain::Financial,
            MetricSelector::Product(_) => MetricsDomain::Product,
            MetricSelector::Repair(_) => MetricsDomain::Repair,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            MetricSelector::Customer(m) => m.name(),
            MetricSelector::Financial(m) => m.name(),
            MetricSelector::Product(m) => m.name(),
            MetricSelector::Repair(m) => m.name(),
        }
    }

    /// Parse a metric name within `domain`.
    pub fn parse(domain: MetricsDomain, name: &str) -> Result<Self, ParseKindError> {
        Ok(match domain {
            MetricsDomain::Customer => MetricSelector::Customer(name.parse()?),
            MetricsDomain::Financial => MetricSelector::Financial(name.parse()?),
            MetricsDomain::Product => MetricSelector::Product(name.parse()?),
            MetricsDomain::Repair => MetricSelector::Repair(name.parse()?),
        })
    }
}

impl fmt::Display for MetricSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.domain(), self.name())
    }
}

/// The tree stored in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "domain", content = "data", rename_all = "camelCase")]
pub enum DocumentPayload {
    Customer(MetricTree<CustomerMetrics>),
    Financial(MetricTree<FinancialMetrics>),
    Product {
        category: ProductCategory,
        tree: MetricTree<ProductMetrics>,
    },
    Repair {
        category: RepairCategory,
        tree: MetricTree<RepairMetrics>,
    },
}

impl DocumentPayload {
    #[must_use]
    pub fn domain(&self) -> MetricsDomain {
        match self {
            DocumentPayload::Customer(_) => MetricsDomain::Customer,
            DocumentPayload::Financial(_) => MetricsDomain::Financial,
            DocumentPayload::Product { .. } => MetricsDomain::Product,
            DocumentPayload::Repair { .. } => MetricsDomain::Repair,
        }
    }

    /// The category segment of the document's key
    #[must_use]
    pub fn category_label(&self) -> &'static str {
        match self {
            DocumentPayload::Customer(_) | DocumentPayload::Financial(_) => OVERVIEW_CATEGORY,
            DocumentPayload::Product { category, .. } => category.label(),
            DocumentPayload::Repair { category, .. } => category.label(),
        }
    }

    /// Reshape the stored tree. The selector must belong to the payload's
    /// domain.
    pub fn chart(
        &self,
        selector: &MetricSelector,
        query: &ChartQuery,
    ) -> Result<ChartData, LookupError> {
        match (self, *selector) {
            (DocumentPayload::Customer(tree), MetricSelector::Customer(metric)) => {
                reshape(tree, metric, query)
            }
            (DocumentPayload::Financial(tree), MetricSelector::Financial(metric)) => {
                reshape(tree, metric, query)
            }
            (DocumentPayload::Product { tree, .. }, MetricSelector::Product(metric)) => {
                reshape(tree, metric, query)
            }
            (DocumentPayload::Repair { tree, .. }, MetricSelector::Repair(metric)) => {
                reshape(tree, metric, query)
            }
            (_, other) => Err(LookupError::MetricNotInDomain {
                domain: self.domain(),
                metric: other.to_string(),
            }),
        }
    }
}

/// Identity and bookkeeping of a stored document, without its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    pub key: CacheKey,
    pub version: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheDocument {
    pub key: CacheKey,
    pub domain: MetricsDomain,
    pub location: StoreLocation,
    pub category: String,
    pub version: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub payload: DocumentPayload,
}

impl CacheDocument {
    /// A first-version document for `payload` at `location`.
    #[must_use]
    pub fn new(
        base_url: &str,
        location: StoreLocation,
        payload: DocumentPayload,
        now: Timestamp,
    ) -> Self {
        let domain = payload.domain();
        let category = payload.category_label();
        Self {
            key: CacheKey::derive(base_url, domain, location, category),
            domain,
            location,
            category: category.to_string(),
            version: 1,
            created_at: now,
            updated_at: now,
            payload,
        }
    }

    #[must_use]
    pub fn meta(&self) -> DocumentMeta {
        DocumentMeta {
            key: self.key.clone(),
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Replace a stored revision: keep its creation time and move to the
    /// version after it.
    #[must_use]
    pub fn revise(mut self, previous: &DocumentMeta) -> Self {
        self.created_at = previous.created_at;
        self.version = previous.version + 1;
        self
    }
}
