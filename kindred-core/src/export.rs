//! Flat-row assembly for tabular export.
//!
//! Each fetched person becomes one row carrying their display fields,
//! relationship label, profile URL, and first derived location.
//! Additional locations become continuation rows with the person
//! fields left blank, keeping the spreadsheet visually grouped by
//! person.

use familysearch::person_url;

use crate::fetch::{FetchError, FetchedPerson};
use crate::location::{extract_locations, DerivedLocation};
use crate::relationship::AscendancyNumber;

/// Marker written in the Location column when a person has no
/// derivable locations.
pub const NO_LOCATIONS: &str = "No locations found";

/// Column headers, in output order.
pub const COLUMNS: [&str; 11] = [
    "Name",
    "Relationship",
    "Gender",
    "Lifespan",
    "Ascendancy Number",
    "ID",
    "Location Type",
    "Location",
    "Country",
    "Date",
    "FamilySearch URL",
];

/// One spreadsheet row. Continuation rows carry only location fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportRow {
    pub name: String,
    pub relationship: String,
    pub gender: String,
    pub lifespan: String,
    pub ascendancy_number: String,
    pub id: String,
    pub location_type: String,
    pub location: String,
    pub country: String,
    pub date: String,
    pub url: String,
}

impl ExportRow {
    fn set_location(&mut self, location: DerivedLocation) {
        self.location_type = location.fact_type;
        self.location = location.place;
        self.country = location.country;
        self.date = location.date;
    }
}

/// Assemble export rows from fetched persons, in input order.
///
/// A summary with a missing or malformed ascendancy number aborts the
/// export; locations come from the detail record's facts.
pub fn format_rows(persons: &[FetchedPerson]) -> Result<Vec<ExportRow>, FetchError> {
    let mut rows = Vec::new();
    for FetchedPerson { summary, detail } in persons {
        let ascendancy_text = summary
            .display
            .ascendancy_number
            .as_deref()
            .ok_or_else(|| FetchError::MissingAscendancy {
                person_id: summary.id.clone(),
            })?;
        let ascendancy: AscendancyNumber = ascendancy_text.parse()?;

        let mut person_row = ExportRow {
            name: summary.display.name.clone(),
            relationship: ascendancy.relationship().to_string(),
            gender: summary.display.gender.clone(),
            lifespan: summary.display.lifespan.clone(),
            ascendancy_number: ascendancy_text.to_string(),
            id: summary.id.clone(),
            url: person_url(&summary.id),
            ..ExportRow::default()
        };

        let mut locations = extract_locations(detail);
        match locations.next() {
            None => {
                person_row.location = NO_LOCATIONS.to_string();
                rows.push(person_row);
            }
            Some(first) => {
                person_row.set_location(first);
                rows.push(person_row);
                for location in locations {
                    let mut continuation = ExportRow::default();
                    continuation.set_location(location);
                    rows.push(continuation);
                }
            }
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use familysearch::{Fact, FactDate, Person, PersonDisplay, Place};

    fn summary(id: &str, name: &str, ascendancy: Option<&str>) -> Person {
        Person {
            id: id.to_string(),
            display: PersonDisplay {
                name: name.to_string(),
                gender: "Female".to_string(),
                lifespan: "1900-1980".to_string(),
                ascendancy_number: ascendancy.map(str::to_string),
            },
            facts: Vec::new(),
        }
    }

    fn detail(id: &str, places: &[&str]) -> Person {
        Person {
            id: id.to_string(),
            display: PersonDisplay::default(),
            facts: places
                .iter()
                .map(|place| Fact {
                    fact_type: "http://gedcomx.org/Birth".to_string(),
                    place: Some(Place {
                        original: Some(place.to_string()),
                    }),
                    date: Some(FactDate {
                        original: Some("1900".to_string()),
                    }),
                })
                .collect(),
        }
    }

    #[test]
    fn test_no_locations_row() {
        let persons = vec![FetchedPerson {
            summary: summary("A-1", "Alice", Some("1")),
            detail: detail("A-1", &[]),
        }];
        let rows = format_rows(&persons).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Alice");
        assert_eq!(rows[0].relationship, "Self");
        assert_eq!(rows[0].location, NO_LOCATIONS);
        assert_eq!(rows[0].location_type, "");
        assert_eq!(rows[0].country, "");
        assert_eq!(rows[0].date, "");
        assert_eq!(
            rows[0].url,
            "https://www.familysearch.org/tree/person/details/A-1"
        );
    }

    #[test]
    fn test_first_location_merged_into_person_row() {
        let persons = vec![FetchedPerson {
            summary: summary("B-2", "Bob", Some("2")),
            detail: detail("B-2", &["Provo, Utah, United States"]),
        }];
        let rows = format_rows(&persons).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Bob");
        assert_eq!(rows[0].relationship, "Father");
        assert_eq!(rows[0].location_type, "Birth");
        assert_eq!(rows[0].location, "Provo, Utah, United States");
        assert_eq!(rows[0].country, "United States");
    }

    #[test]
    fn test_continuation_rows_blank_person_fields() {
        let persons = vec![FetchedPerson {
            summary: summary("C-3", "Carol", Some("3")),
            detail: detail("C-3", &["London, England", "Oslo, Norway"]),
        }];
        let rows = format_rows(&persons).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Carol");
        assert_eq!(rows[0].location, "London, England");
        assert_eq!(rows[1].name, "");
        assert_eq!(rows[1].relationship, "");
        assert_eq!(rows[1].id, "");
        assert_eq!(rows[1].url, "");
        assert_eq!(rows[1].location, "Oslo, Norway");
        assert_eq!(rows[1].country, "Norway");
    }

    #[test]
    fn test_missing_ascendancy_number_fails() {
        let persons = vec![FetchedPerson {
            summary: summary("D-4", "Dave", None),
            detail: detail("D-4", &[]),
        }];
        let err = format_rows(&persons).unwrap_err();
        assert!(matches!(err, FetchError::MissingAscendancy { .. }));
    }

    #[test]
    fn test_malformed_ascendancy_number_fails() {
        let persons = vec![FetchedPerson {
            summary: summary("E-5", "Eve", Some("zero")),
            detail: detail("E-5", &[]),
        }];
        let err = format_rows(&persons).unwrap_err();
        assert!(matches!(err, FetchError::Ascendancy(_)));
    }

    #[test]
    fn test_row_order_matches_input_order() {
        let persons = vec![
            FetchedPerson {
                summary: summary("A-1", "Alice", Some("1")),
                detail: detail("A-1", &[]),
            },
            FetchedPerson {
                summary: summary("B-2", "Bob", Some("2")),
                detail: detail("B-2", &[]),
            },
            FetchedPerson {
                summary: summary("C-3", "Carol", Some("3")),
                detail: detail("C-3", &[]),
            },
        ];
        let rows = format_rows(&persons).unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
    }
}
