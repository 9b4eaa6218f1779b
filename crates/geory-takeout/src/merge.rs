//! Identifier-keyed merge of mapped Takeout records into an existing
//! collection.
//!
//! The same engine serves locations and visits; the two differ only in the
//! [`RecordMapper`] and the raw source handed to [`merge`].

use std::collections::HashMap;

use async_trait::async_trait;
use geory_core::Identified;
use serde_json::Value;

use crate::error::TakeoutError;

/// Counters reported for one merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Raw records read from the source, including skipped ones.
    pub processed: usize,
    /// Records whose identifier was not in the collection before.
    pub imported: usize,
}

/// Turns one raw record into a canonical record, or `None` to skip it.
#[async_trait]
pub trait RecordMapper: Send {
    type Output: Identified + Send;

    /// # Errors
    ///
    /// Any error aborts the merge.
    async fn map_record(&mut self, raw: Value) -> Result<Option<Self::Output>, TakeoutError>;
}

/// Records keyed by identifier, in first-seen order.
///
/// Upserting an identifier that is already present replaces the record in
/// place, so the collection order is stable across re-runs.
#[derive(Debug)]
pub struct IdentifierIndex<T> {
    records: Vec<T>,
    positions: HashMap<String, usize>,
}

impl<T: Identified> IdentifierIndex<T> {
    /// Indexes `existing`. When it contains duplicate identifiers the last
    /// record wins, at the position of the first.
    #[must_use]
    pub fn new(existing: Vec<T>) -> Self {
        let mut index = Self {
            records: Vec::with_capacity(existing.len()),
            positions: HashMap::with_capacity(existing.len()),
        };
        for record in existing {
            index.upsert(record);
        }
        index
    }

    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.positions.contains_key(identifier)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Inserts `record`, replacing any record with the same identifier.
    /// Returns `true` if the identifier was new.
    pub fn upsert(&mut self, record: T) -> bool {
        if let Some(&position) = self.positions.get(record.identifier()) {
            self.records[position] = record;
            return false;
        }
        self.positions
            .insert(record.identifier().to_owned(), self.records.len());
        self.records.push(record);
        true
    }

    #[must_use]
    pub fn into_records(self) -> Vec<T> {
        self.records
    }
}

/// Folds every raw record from `source` into `existing`.
///
/// For each record, in source order: count it as processed, map it, skip it
/// if the mapper returns `None`, otherwise count it as imported when its
/// identifier is new and then insert or overwrite the collection entry. An
/// already-present identifier therefore refreshes its record without being
/// counted twice.
///
/// # Errors
///
/// Returns the first error from the source or the mapper; nothing is
/// returned for a partial merge.
pub async fn merge<M, I>(
    existing: Vec<M::Output>,
    source: I,
    mapper: &mut M,
) -> Result<(Vec<M::Output>, MergeStats), TakeoutError>
where
    M: RecordMapper,
    I: IntoIterator<Item = Result<Value, TakeoutError>>,
{
    let mut index = IdentifierIndex::new(existing);
    let mut stats = MergeStats::default();

    for raw in source {
        let raw = raw?;
        stats.processed += 1;

        let Some(record) = mapper.map_record(raw).await? else {
            continue;
        };

        if index.upsert(record) {
            stats.imported += 1;
        }
    }

    tracing::debug!(
        processed = stats.processed,
        imported = stats.imported,
        total = index.len(),
        "merge complete"
    );

    Ok((index.into_records(), stats))
}
