//! Minimal FamilySearch platform API client.
//!
//! This crate provides a focused client for the FamilySearch tree API with:
//! - OAuth2 authorization-code flow (URL construction + token exchange)
//! - Bearer-token sessions over the read-only tree endpoints
//! - Typed wire-format structures for person records and facts

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::redirect::Policy;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

const AUTHORIZATION_PATH: &str = "/cis-web/oauth2/v3/authorization";
const TOKEN_PATH: &str = "/cis-web/oauth2/v3/token";
const PERSON_DETAILS_BASE: &str = "https://www.familysearch.org/tree/person/details";

/// Errors that can occur when using the FamilySearch client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Authorization failed: {0}")]
    Auth(String),

    #[error("Authorization code expired or already used")]
    ExpiredGrant,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Unexpected response: {0}")]
    Protocol(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// The FamilySearch deployment to talk to.
///
/// Each environment has its own identity host (OAuth) and platform
/// host (tree API).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Production,
    #[default]
    Beta,
    Integration,
}

impl Environment {
    /// Base URL of the identity server (authorization + token endpoints).
    pub fn ident_base(&self) -> &'static str {
        match self {
            Environment::Production => "https://ident.familysearch.org",
            Environment::Beta => "https://identbeta.familysearch.org",
            Environment::Integration => "https://identint.familysearch.org",
        }
    }

    /// Base URL of the platform API server.
    pub fn platform_base(&self) -> &'static str {
        match self {
            Environment::Production => "https://api.familysearch.org",
            Environment::Beta => "https://apibeta.familysearch.org",
            Environment::Integration => "https://api-integ.familysearch.org",
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "beta" => Ok(Environment::Beta),
            "integration" | "int" => Ok(Environment::Integration),
            other => Err(Error::Config(format!("Unknown environment: {other}"))),
        }
    }
}

/// Client configuration for the OAuth2 authorization-code flow.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub redirect_uri: String,
    pub environment: Environment,
}

impl Config {
    /// Create a config with the given client id and redirect URI.
    pub fn new(client_id: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            environment: Environment::default(),
        }
    }

    /// Select the deployment environment.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }
}

/// FamilySearch API client.
///
/// Handles the OAuth2 authorization-code exchange and hands out
/// bearer-token [`Session`]s for tree API calls.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    config: Config,
}

impl Client {
    /// Create a new client with the given configuration.
    ///
    /// Redirects are disabled on the underlying HTTP client: the
    /// current-person endpoint answers with a redirect whose Location
    /// header carries the person id, and following it would lose it.
    pub fn new(config: Config) -> Self {
        Self {
            http: reqwest::Client::builder()
                .redirect(Policy::none())
                .timeout(std::time::Duration::from_secs(60))
                .connect_timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            config,
        }
    }

    /// Build the authorization URL the user must visit to obtain a code.
    pub fn authorization_url(&self, state: Option<&str>) -> Result<String, Error> {
        let base = format!("{}{}", self.config.environment.ident_base(), AUTHORIZATION_PATH);
        let mut params = vec![
            ("response_type", "code"),
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];
        if let Some(state) = state {
            params.push(("state", state));
        }
        let url = Url::parse_with_params(&base, params)
            .map_err(|e| Error::Config(format!("Invalid authorization URL: {e}")))?;
        Ok(url.to_string())
    }

    /// Exchange an authorization code for an access token.
    ///
    /// An `invalid_grant` response (expired or already-used code) is
    /// surfaced as [`Error::ExpiredGrant`] so callers can prompt the
    /// user to re-authorize.
    pub async fn exchange_code(&self, code: &str) -> Result<Session, Error> {
        let url = format!("{}{}", self.config.environment.ident_base(), TOKEN_PATH);
        let form = [
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("code", code),
        ];

        let response = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            if let Ok(oauth_error) = serde_json::from_str::<OAuthErrorBody>(&body) {
                if oauth_error.error == "invalid_grant" {
                    return Err(Error::ExpiredGrant);
                }
            }
            return Err(Error::Auth(body));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;

        Ok(self.session(token.access_token))
    }

    /// Create a session from a pre-issued access token.
    pub fn session(&self, access_token: impl Into<String>) -> Session {
        Session {
            http: self.http.clone(),
            platform_base: self.config.environment.platform_base(),
            access_token: access_token.into(),
        }
    }
}

/// An authenticated handle over the tree API.
///
/// All calls carry the bearer token obtained from the OAuth exchange.
#[derive(Clone)]
pub struct Session {
    http: reqwest::Client,
    platform_base: &'static str,
    access_token: String,
}

impl Session {
    /// Resolve the authenticated user's own person id.
    ///
    /// The current-person endpoint answers with a redirect; the person
    /// id is the last path segment of its Location header.
    pub async fn current_person_id(&self) -> Result<String, Error> {
        let url = format!("{}/platform/tree/current-person", self.platform_base);
        let response = self
            .http
            .get(url)
            .headers(self.build_headers()?)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() {
            // A 4xx here means the session token was rejected.
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Auth(format!("Session token rejected: {body}")));
        }
        if status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                Error::Protocol("Current-person response has no Location header".to_string())
            })?;

        person_id_from_location(location)
            .map(str::to_string)
            .ok_or_else(|| Error::Protocol(format!("Unparseable Location header: {location}")))
    }

    /// Fetch the ancestor listing for a person, bounded by generation depth.
    ///
    /// Persons come back in ascendancy-number order; callers that
    /// derive relationship labels rely on that ordering.
    pub async fn ancestry(&self, person_id: &str, generations: u8) -> Result<Vec<Person>, Error> {
        let url = format!(
            "{}/platform/tree/ancestry?person={}&generations={}",
            self.platform_base, person_id, generations
        );
        let tree: TreeResponse = self.get_json(&url).await?;
        Ok(tree.persons)
    }

    /// Fetch the full record (including facts) for a single person.
    pub async fn person_details(&self, person_id: &str) -> Result<Person, Error> {
        let url = format!("{}/platform/tree/persons/{}", self.platform_base, person_id);
        let mut tree: TreeResponse = self.get_json(&url).await?;
        if tree.persons.is_empty() {
            return Err(Error::Protocol(format!(
                "Person details response for {person_id} contained no persons"
            )));
        }
        Ok(tree.persons.remove(0))
    }

    /// Invalidate the session server-side.
    pub async fn logout(&self) -> Result<(), Error> {
        let url = format!("{}/platform/logout", self.platform_base);
        let response = self
            .http
            .post(url)
            .headers(self.build_headers()?)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api { status, body });
        }
        Ok(())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, Error> {
        let response = self
            .http
            .get(url)
            .headers(self.build_headers()?)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api { status, body });
        }

        response.json().await.map_err(|e| Error::Parse(e.to_string()))
    }

    fn build_headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.access_token))
                .map_err(|e| Error::Config(format!("Invalid access token: {e}")))?,
        );
        Ok(headers)
    }
}

/// Canonical profile URL for a person on familysearch.org.
pub fn person_url(person_id: &str) -> String {
    format!("{PERSON_DETAILS_BASE}/{person_id}")
}

/// Extract the person id from a current-person redirect target.
fn person_id_from_location(location: &str) -> Option<&str> {
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
}

// ============================================================================
// Wire-format types
// ============================================================================

/// Envelope shared by the ancestry and person-details responses.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeResponse {
    #[serde(default)]
    pub persons: Vec<Person>,
}

/// A person record from the tree API.
#[derive(Debug, Clone, Deserialize)]
pub struct Person {
    pub id: String,
    #[serde(default)]
    pub display: PersonDisplay,
    #[serde(default)]
    pub facts: Vec<Fact>,
}

/// Display fields nested under a person record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonDisplay {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub lifespan: String,
    /// Ahnentafel position, present on ancestry-listing records only.
    #[serde(rename = "ascendancyNumber")]
    pub ascendancy_number: Option<String>,
}

/// A dated, located biographical event attached to a person.
#[derive(Debug, Clone, Deserialize)]
pub struct Fact {
    /// URI-like type tag, e.g. `http://gedcomx.org/Birth`.
    #[serde(rename = "type", default)]
    pub fact_type: String,
    pub place: Option<Place>,
    pub date: Option<FactDate>,
}

/// Free-text place attached to a fact.
#[derive(Debug, Clone, Deserialize)]
pub struct Place {
    pub original: Option<String>,
}

/// Free-text date attached to a fact.
#[derive(Debug, Clone, Deserialize)]
pub struct FactDate {
    pub original: Option<String>,
}

// ============================================================================
// Internal OAuth types
// ============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: String,
}
