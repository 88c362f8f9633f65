//! Subcommand implementations, independent of argument parsing and output.

use color_eyre::eyre::{WrapErr, bail, eyre};
use jiff::Timestamp;
use jiff::civil::Date;
use storemetrics_core::dataset::OVERVIEW_CATEGORY;
use storemetrics_core::reshape::{CalendarGranularity, ChartData, ChartQuery, YAxisKey};
use storemetrics_core::{
    CacheKey, DocumentMeta, GenerationRequest, MetricSelector, MetricsDomain, ProductCategory,
    RangeProvider, RepairCategory, StoreLocation, Year, generate_dataset,
};
use tracing::{info, warn};

use crate::settings::Settings;
use crate::store::DocumentStore;

#[derive(Debug, Clone, clap::Args)]
pub struct GenerateArgs {
    /// customer, financial, product or repair
    #[arg(long)]
    pub domain: MetricsDomain,

    /// Physical locations to generate (default: all)
    #[arg(long = "location")]
    pub locations: Vec<StoreLocation>,

    /// Last calendar year to generate (default: the current year)
    #[arg(long)]
    pub through_year: Option<Year>,

    /// Seed for reproducible datasets
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ChartArgs {
    #[arg(long)]
    pub domain: MetricsDomain,

    #[arg(long)]
    pub location: StoreLocation,

    /// Product or repair category (default: the "All" composite)
    #[arg(long)]
    pub category: Option<String>,

    /// Metric name within the domain, e.g. total, unitsSold, otherMetrics
    #[arg(long)]
    pub metric: String,

    /// Selected date, YYYY-MM-DD
    #[arg(long)]
    pub date: Date,

    #[arg(long, default_value = "daily")]
    pub granularity: CalendarGranularity,

    /// Only output this y-axis key
    #[arg(long)]
    pub key: Option<YAxisKey>,
}

#[derive(Debug)]
pub struct GenerateReport {
    pub documents: Vec<DocumentMeta>,
    pub skipped: usize,
}

/// Generate a dataset and upsert one document per location and category.
pub fn generate(
    store: &mut dyn DocumentStore,
    settings: &Settings,
    ranges: &dyn RangeProvider,
    args: &GenerateArgs,
    now: Timestamp,
) -> color_eyre::Result<GenerateReport> {
    let mut request = match args.through_year {
        Some(year) => GenerationRequest::new(year),
        None => GenerationRequest::through_now(),
    };
    if !args.locations.is_empty() {
        request = request.locations(args.locations.iter().copied());
    }
    if let Some(seed) = args.seed {
        request = request.seed(seed);
    }
    if request.locations.is_empty() {
        bail!("no physical locations requested");
    }

    let generated = generate_dataset(args.domain, &request, ranges)
        .wrap_err_with(|| format!("failed to generate {} dataset", args.domain))?;
    for node in &generated.skipped {
        warn!(source = %node.source, path = %node.path, "composite missing a contribution");
    }

    let mut documents = Vec::new();
    for document in generated.dataset.documents(&settings.base_url, now) {
        let key = document.key.clone();
        let meta = store
            .upsert(document)
            .wrap_err_with(|| format!("failed to store {key}"))?;
        documents.push(meta);
    }
    info!(domain = %args.domain, documents = documents.len(), "stored document batch");

    Ok(GenerateReport {
        documents,
        skipped: generated.skipped.len(),
    })
}

/// The category segment for `domain`, defaulting to the composite category.
fn category_label(domain: MetricsDomain, category: Option<&str>) -> color_eyre::Result<&'static str> {
    Ok(match (domain, category) {
        (MetricsDomain::Product, None) => ProductCategory::AllProducts.label(),
        (MetricsDomain::Product, Some(name)) => name.parse::<ProductCategory>()?.label(),
        (MetricsDomain::Repair, None) => RepairCategory::AllRepairs.label(),
        (MetricsDomain::Repair, Some(name)) => name.parse::<RepairCategory>()?.label(),
        (_, None) => OVERVIEW_CATEGORY,
        (_, Some(name)) if name.eq_ignore_ascii_case(OVERVIEW_CATEGORY) => OVERVIEW_CATEGORY,
        (_, Some(name)) => bail!("the {domain} domain has no category '{name}'"),
    })
}

/// Chart a stored document.
pub fn chart(
    store: &dyn DocumentStore,
    settings: &Settings,
    args: &ChartArgs,
    today: Date,
) -> color_eyre::Result<ChartData> {
    let selector = MetricSelector::parse(args.domain, &args.metric)?;
    let category = category_label(args.domain, args.category.as_deref())?;
    let key = CacheKey::derive(&settings.base_url, args.domain, args.location, category);

    let document = store
        .get(&key)?
        .ok_or_else(|| eyre!("no document stored for {key}; run `storemetrics generate` first"))?;

    let query = ChartQuery::new(args.date, today).granularity(args.granularity);
    let chart = document
        .payload
        .chart(&selector, &query)
        .wrap_err_with(|| format!("cannot chart {selector} on {}", args.date))?;

    Ok(match args.key {
        Some(key) => chart.only(key),
        None => chart,
    })
}

pub fn list(store: &dyn DocumentStore) -> color_eyre::Result<Vec<DocumentMeta>> {
    Ok(store.list()?)
}
