//! Testing utilities for the export pipeline.
//!
//! `MockTree` is a scripted [`TreeSource`] for deterministic tests
//! without API calls: the ancestry listing is fixed up front and
//! detail responses are queued in fetch order.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use familysearch::{Error, Fact, FactDate, Person, PersonDisplay, Place};

use crate::fetch::TreeSource;

/// A scripted tree source.
pub struct MockTree {
    root_id: String,
    ancestry: Vec<Person>,
    details: Mutex<VecDeque<Result<Person, Error>>>,
}

impl MockTree {
    /// Create a mock tree rooted at the given person id.
    pub fn new(root_id: impl Into<String>) -> Self {
        Self {
            root_id: root_id.into(),
            ancestry: Vec::new(),
            details: Mutex::new(VecDeque::new()),
        }
    }

    /// Append a person to the ancestry listing and queue their detail
    /// record.
    pub fn add_person(&mut self, summary: Person, detail: Person) {
        self.ancestry.push(summary);
        self.details.lock().unwrap().push_back(Ok(detail));
    }

    /// Append a person whose detail fetch will fail.
    pub fn add_failing_person(&mut self, summary: Person, error: Error) {
        self.ancestry.push(summary);
        self.details.lock().unwrap().push_back(Err(error));
    }
}

#[async_trait]
impl TreeSource for MockTree {
    async fn current_person_id(&self) -> Result<String, Error> {
        Ok(self.root_id.clone())
    }

    async fn ancestry(&self, _person_id: &str, _generations: u8) -> Result<Vec<Person>, Error> {
        Ok(self.ancestry.clone())
    }

    async fn person_details(&self, person_id: &str) -> Result<Person, Error> {
        self.details
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(Error::Protocol(format!(
                    "No scripted detail response for {person_id}"
                )))
            })
    }
}

/// Build an ancestry-listing record.
pub fn summary_person(
    id: impl Into<String>,
    name: impl Into<String>,
    ascendancy_number: impl Into<String>,
) -> Person {
    Person {
        id: id.into(),
        display: PersonDisplay {
            name: name.into(),
            gender: "Unknown".to_string(),
            lifespan: "1900-1980".to_string(),
            ascendancy_number: Some(ascendancy_number.into()),
        },
        facts: Vec::new(),
    }
}

/// Build a detail record carrying the given facts.
pub fn detail_person(id: impl Into<String>, facts: Vec<Fact>) -> Person {
    Person {
        id: id.into(),
        display: PersonDisplay::default(),
        facts,
    }
}

/// Build a fact with optional place and date text.
pub fn fact(fact_type: &str, place: Option<&str>, date: Option<&str>) -> Fact {
    Fact {
        fact_type: fact_type.to_string(),
        place: place.map(|p| Place {
            original: Some(p.to_string()),
        }),
        date: date.map(|d| FactDate {
            original: Some(d.to_string()),
        }),
    }
}
