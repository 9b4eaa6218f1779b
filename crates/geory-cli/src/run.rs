//! The merge run: load inputs, merge locations then visits, write the result.
//!
//! Called from `main` once configuration and tracing are set up. Any error
//! aborts the run before the merged database is written; the places cache is
//! persisted after every geocoding miss, so lookups made before a failure are
//! kept for the next attempt.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use geory_core::{AppConfig, GeoryDatabase};
use geory_geocode::{CachedGeocoder, GeocodeCache, LookupStats, NominatimClient};
use geory_takeout::{
    merge, read_location_records, LocationMapper, MergeStats, VisitMapper, VisitSource,
    RECORDS_PATH, SEMANTIC_HISTORY_PATH,
};

/// Inputs of one run, as given on the command line.
#[derive(Debug, Clone)]
pub(crate) struct MergeOptions {
    pub database: PathBuf,
    pub takeout_dir: PathBuf,
    /// Overrides [`AppConfig::places_cache_path`].
    pub places_cache: Option<PathBuf>,
    /// Overrides the path derived with [`output_path`].
    pub output: Option<PathBuf>,
    pub dry_run: bool,
}

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MergeSummary {
    pub locations: MergeStats,
    pub visits: MergeStats,
    pub lookups: LookupStats,
    /// `None` for a dry run.
    pub output: Option<PathBuf>,
}

impl MergeSummary {
    pub(crate) fn print(&self) {
        println!();
        println!("Locations processed: {}", self.locations.processed);
        println!("Locations imported: {}", self.locations.imported);
        println!();
        println!("Visits processed: {}", self.visits.processed);
        println!("Visits imported: {}", self.visits.imported);
        println!();
        println!(
            "Places cache: {} hits, {} misses",
            self.lookups.hits, self.lookups.misses
        );
        match &self.output {
            Some(path) => println!("Wrote: {}", path.display()),
            None => println!("dry-run: merged database not written"),
        }
    }
}

/// Names the merged output beside `database` by inserting `suffix` before
/// the extension: `backup.json` becomes `backup-merged.json`, and a file
/// without an extension just gets the suffix appended.
pub(crate) fn output_path(database: &Path, suffix: &str) -> PathBuf {
    let mut name = database
        .file_stem()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(suffix);
    if let Some(ext) = database.extension() {
        name.push(".");
        name.push(ext);
    }
    database.with_file_name(name)
}

fn read_database(path: &Path) -> anyhow::Result<GeoryDatabase> {
    let contents = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read geory database {}: {e}", path.display()))?;
    let database: GeoryDatabase = serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse geory database {}: {e}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        locations = database.locations.len(),
        visits = database.visits.len(),
        "geory database loaded"
    );
    Ok(database)
}

fn write_database(path: &Path, database: &GeoryDatabase) -> anyhow::Result<()> {
    let contents = serde_json::to_string_pretty(database)?;
    fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?;
    Ok(())
}

/// Runs one merge of the Takeout archive into the Geory database.
///
/// Locations are merged first, from `Records.json`; visits second, from the
/// semantic history files, reverse-geocoding visits that carry no address.
///
/// # Errors
///
/// Returns an error if any input cannot be read or parsed, a record is
/// invalid, or a geocoding lookup fails. Nothing is written in that case.
pub(crate) async fn run_merge(
    config: &AppConfig,
    options: MergeOptions,
) -> anyhow::Result<MergeSummary> {
    let cache_path = options
        .places_cache
        .clone()
        .unwrap_or_else(|| config.places_cache_path.clone());
    let cache = GeocodeCache::load(cache_path)?;
    tracing::info!(path = ?cache.path(), entries = cache.len(), "places cache loaded");

    let mut database = read_database(&options.database)?;

    let raw_locations = read_location_records(&options.takeout_dir.join(RECORDS_PATH))?;
    let (locations, location_stats) = merge(
        std::mem::take(&mut database.locations),
        raw_locations.into_iter().map(Ok),
        &mut LocationMapper,
    )
    .await?;
    database.locations = locations;
    tracing::info!(
        processed = location_stats.processed,
        imported = location_stats.imported,
        "locations merged"
    );

    let client = NominatimClient::with_base_url(
        &config.geocoder_base_url,
        config.geocoder_timeout_secs,
        &config.geocoder_user_agent,
    )?;
    let mut geocoder = CachedGeocoder::new(
        client,
        cache,
        Duration::from_millis(config.geocoder_delay_ms),
    );
    let visit_source = VisitSource::open(&options.takeout_dir.join(SEMANTIC_HISTORY_PATH))?;
    let (visits, visit_stats) = merge(
        std::mem::take(&mut database.visits),
        visit_source,
        &mut VisitMapper::new(&mut geocoder),
    )
    .await?;
    database.visits = visits;
    let lookups = geocoder.stats();
    tracing::info!(
        processed = visit_stats.processed,
        imported = visit_stats.imported,
        cache_hits = lookups.hits,
        cache_misses = lookups.misses,
        "visits merged"
    );

    let output = if options.dry_run {
        None
    } else {
        let path = options
            .output
            .unwrap_or_else(|| output_path(&options.database, &config.output_suffix));
        write_database(&path, &database)?;
        Some(path)
    };

    Ok(MergeSummary {
        locations: location_stats,
        visits: visit_stats,
        lookups,
        output,
    })
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
