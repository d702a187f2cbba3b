//! Sequential ancestry traversal.
//!
//! The traversal is three remote phases: resolve the authenticated
//! user's own person id, list the bounded-depth ancestry, then fetch
//! full details for each listed person one at a time. Detail fetches
//! are strictly sequential; sequencing is the only throttle applied
//! to the remote API, and the first failure aborts the traversal.

use async_trait::async_trait;
use familysearch::{Person, Session};
use thiserror::Error;

use crate::relationship::AscendancyError;

/// Default ancestry depth.
pub const DEFAULT_GENERATIONS: u8 = 2;

/// Errors from the fetch/export pipeline.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("FamilySearch API error: {0}")]
    Source(#[from] familysearch::Error),

    #[error(transparent)]
    Ascendancy(#[from] AscendancyError),

    #[error("Ancestry record {person_id} has no ascendancy number")]
    MissingAscendancy { person_id: String },

    #[error("Failed to write spreadsheet: {0}")]
    Sheet(#[from] rust_xlsxwriter::XlsxError),
}

/// A read-only view of a FamilySearch tree.
///
/// Implemented by [`familysearch::Session`] for the real API and by
/// [`crate::testing::MockTree`] for deterministic tests.
#[async_trait]
pub trait TreeSource {
    /// Resolve the authenticated user's own person id.
    async fn current_person_id(&self) -> Result<String, familysearch::Error>;

    /// List ancestors of a person, bounded by generation depth, in
    /// ascendancy-number order.
    async fn ancestry(
        &self,
        person_id: &str,
        generations: u8,
    ) -> Result<Vec<Person>, familysearch::Error>;

    /// Fetch the full record (including facts) for one person.
    async fn person_details(&self, person_id: &str) -> Result<Person, familysearch::Error>;
}

#[async_trait]
impl TreeSource for Session {
    async fn current_person_id(&self) -> Result<String, familysearch::Error> {
        Session::current_person_id(self).await
    }

    async fn ancestry(
        &self,
        person_id: &str,
        generations: u8,
    ) -> Result<Vec<Person>, familysearch::Error> {
        Session::ancestry(self, person_id, generations).await
    }

    async fn person_details(&self, person_id: &str) -> Result<Person, familysearch::Error> {
        Session::person_details(self, person_id).await
    }
}

/// An ancestry-listing record paired with its detail record.
///
/// The summary carries the display fields and ascendancy number; the
/// detail carries the facts.
#[derive(Debug, Clone)]
pub struct FetchedPerson {
    pub summary: Person,
    pub detail: Person,
}

/// Sequential fetcher over a [`TreeSource`].
pub struct TreeFetcher<S> {
    source: S,
    generations: u8,
}

impl<S: TreeSource> TreeFetcher<S> {
    /// Create a fetcher with the default generation depth.
    pub fn new(source: S) -> Self {
        Self {
            source,
            generations: DEFAULT_GENERATIONS,
        }
    }

    /// Set the ancestry depth.
    pub fn with_generations(mut self, generations: u8) -> Self {
        self.generations = generations;
        self
    }

    /// Fetch the full ancestry set.
    ///
    /// Output order matches the ancestry listing (ascendancy order).
    /// The progress callback receives (processed, total) after each
    /// detail fetch completes; it is a reporting hook only. The first
    /// failed call aborts the traversal with no partial results.
    pub async fn fetch_all<F>(&self, mut progress: F) -> Result<Vec<FetchedPerson>, FetchError>
    where
        F: FnMut(usize, usize),
    {
        let root_id = self.source.current_person_id().await?;
        let summaries = self.source.ancestry(&root_id, self.generations).await?;

        let total = summaries.len();
        let mut fetched = Vec::with_capacity(total);
        for (index, summary) in summaries.into_iter().enumerate() {
            // One at a time, in listing order.
            let detail = self.source.person_details(&summary.id).await?;
            progress(index + 1, total);
            fetched.push(FetchedPerson { summary, detail });
        }
        Ok(fetched)
    }
}
