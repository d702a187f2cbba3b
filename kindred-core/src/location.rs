//! Location derivation from person facts.
//!
//! Facts carry free-text place and date strings. This module turns
//! them into `DerivedLocation`s, inferring a country from the place
//! text. Country inference is a best-effort string heuristic, not a
//! geocoder: it recognizes US spellings and state names and otherwise
//! trusts the final comma-separated token.

use familysearch::Person;

const GEDCOMX_NAMESPACE: &str = "http://gedcomx.org/";
const UNKNOWN: &str = "Unknown";
const UNITED_STATES: &str = "United States";

const US_STATES: [&str; 50] = [
    "Alabama",
    "Alaska",
    "Arizona",
    "Arkansas",
    "California",
    "Colorado",
    "Connecticut",
    "Delaware",
    "Florida",
    "Georgia",
    "Hawaii",
    "Idaho",
    "Illinois",
    "Indiana",
    "Iowa",
    "Kansas",
    "Kentucky",
    "Louisiana",
    "Maine",
    "Maryland",
    "Massachusetts",
    "Michigan",
    "Minnesota",
    "Mississippi",
    "Missouri",
    "Montana",
    "Nebraska",
    "Nevada",
    "New Hampshire",
    "New Jersey",
    "New Mexico",
    "New York",
    "North Carolina",
    "North Dakota",
    "Ohio",
    "Oklahoma",
    "Oregon",
    "Pennsylvania",
    "Rhode Island",
    "South Carolina",
    "South Dakota",
    "Tennessee",
    "Texas",
    "Utah",
    "Vermont",
    "Virginia",
    "Washington",
    "West Virginia",
    "Wisconsin",
    "Wyoming",
];

/// A location derived from one fact, in fact order.
///
/// Recomputed per export; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedLocation {
    /// Fact type with the GEDCOM X namespace prefix stripped, e.g. "Birth".
    pub fact_type: String,
    /// The place text as recorded.
    pub place: String,
    /// Country inferred from the place text.
    pub country: String,
    /// The date text as recorded, or "Unknown".
    pub date: String,
}

/// Derive locations from a person's facts, preserving fact order.
///
/// Facts without place text are skipped. The iterator is lazy and
/// restartable; calling this again on the same person yields the same
/// sequence.
pub fn extract_locations(person: &Person) -> impl Iterator<Item = DerivedLocation> + '_ {
    person.facts.iter().filter_map(|fact| {
        let place = fact
            .place
            .as_ref()?
            .original
            .as_deref()
            .filter(|p| !p.is_empty())?;
        let date = fact
            .date
            .as_ref()
            .and_then(|d| d.original.as_deref())
            .filter(|d| !d.is_empty())
            .unwrap_or(UNKNOWN);
        Some(DerivedLocation {
            fact_type: normalize_fact_type(&fact.fact_type).to_string(),
            place: place.to_string(),
            country: infer_country(place).to_string(),
            date: date.to_string(),
        })
    })
}

/// Infer a country label from a free-text place string.
///
/// Splits on ", "; fewer than two parts means "Unknown". US places
/// are recognized by an explicit "United States"/"USA" token or a
/// state name in either of the last two parts; any other place
/// yields its final token verbatim.
pub fn infer_country(place: &str) -> &str {
    let parts: Vec<&str> = place.split(", ").collect();
    if parts.len() < 2 {
        return UNKNOWN;
    }
    let last = parts[parts.len() - 1];
    let second_last = parts[parts.len() - 2];

    if last == UNITED_STATES || last == "USA" || last.contains(UNITED_STATES) {
        return UNITED_STATES;
    }
    if is_us_state(last) || is_us_state(second_last) {
        return UNITED_STATES;
    }
    last
}

fn is_us_state(name: &str) -> bool {
    US_STATES.contains(&name)
}

fn normalize_fact_type(fact_type: &str) -> &str {
    fact_type
        .strip_prefix(GEDCOMX_NAMESPACE)
        .unwrap_or(fact_type)
}
