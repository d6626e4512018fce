use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;
use log::{debug, info};

use crate::config::Credentials;
use crate::delay_manager::Pacing;
use crate::errors::LookupError;
use crate::provider::{CompanyDetails, CompanyInfoProvider};

const LINKEDIN_BASE_URL: &str = "https://www.linkedin.com";
const API_BASE_URL: &str = "https://www.linkedin.com/voyager/api";
const COMPANY_DECORATION: &str =
    "com.linkedin.voyager.deco.organization.web.WebFullCompanyMain-12";

const API_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 ",
    "(KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
);
const AUTH_USER_AGENT: &str = "LinkedIn/8.8.1 CFNetwork/711.3.18 Darwin/14.0.0";
const AUTH_LIB_AGENT: &str = "LIAuthLibrary:3.2.4 com.linkedin.LinkedIn:8.8.1 iPhone:8.3";

#[derive(Debug, Deserialize)]
struct AuthResponse {
    login_result: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompaniesResponse {
    #[serde(default)]
    elements: Vec<CompanyDetails>,
    status: Option<u16>,
    message: Option<String>,
}

/// Blocking client for LinkedIn's internal (Voyager) API using a cookie session.
pub struct LinkedinClient {
    client: Client,
    jar: Arc<Jar>,
    credentials: Option<Credentials>,
    pacing: Pacing,
    csrf_token: Option<String>,
}

impl LinkedinClient {
    /// Builds the HTTP client. No request is made until the first lookup.
    pub fn new(
        credentials: Option<Credentials>,
        pacing: Pacing,
        timeout: Duration,
    ) -> Result<Self, LookupError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(API_USER_AGENT));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-AU,en-GB;q=0.9,en-US;q=0.8,en;q=0.7"),
        );
        headers.insert(HeaderName::from_static("x-li-lang"), HeaderValue::from_static("en_US"));
        headers.insert(
            HeaderName::from_static("x-restli-protocol-version"),
            HeaderValue::from_static("2.0.0"),
        );

        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .cookie_provider(Arc::clone(&jar))
            .build()?;

        Ok(LinkedinClient {
            client,
            jar,
            credentials,
            pacing,
            csrf_token: None,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.csrf_token.is_some()
    }

    /// Fetches session cookies, then posts the credentials against them.
    pub fn authenticate(&mut self) -> Result<(), LookupError> {
        let credentials = self
            .credentials
            .clone()
            .ok_or_else(|| LookupError::Auth("no LinkedIn credentials configured".to_string()))?;
        let auth_url = format!("{}/uas/authenticate", LINKEDIN_BASE_URL);

        self.client.get(&auth_url).headers(auth_headers()).send()?;
        let session_id = self
            .session_id()
            .ok_or_else(|| LookupError::Auth("no JSESSIONID cookie was issued".to_string()))?;

        info!("Authenticating as {}...", credentials.username);
        let resp = self
            .client
            .post(&auth_url)
            .headers(auth_headers())
            .form(&[
                ("session_key", credentials.username.as_str()),
                ("session_password", credentials.password.as_str()),
                ("JSESSIONID", session_id.as_str()),
            ])
            .send()?;

        let status = resp.status();
        let body = resp.text()?;
        let login_result = serde_json::from_str::<AuthResponse>(&body)
            .ok()
            .and_then(|auth| auth.login_result);
        if let Some(result) = login_result.filter(|r| r != "PASS") {
            return Err(LookupError::Auth(format!("login challenge: {}", result)));
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(LookupError::Auth("credentials were rejected".to_string()));
        }
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        self.csrf_token = Some(session_id.trim_matches('"').to_string());
        info!("Authenticated.");
        Ok(())
    }

    fn session_id(&self) -> Option<String> {
        let url = Url::parse(LINKEDIN_BASE_URL).ok()?;
        let header = self.jar.cookies(&url)?;
        cookie_value(header.to_str().ok()?, "JSESSIONID")
    }
}

impl CompanyInfoProvider for LinkedinClient {
    fn get_company(&mut self, page_id: &str) -> Result<CompanyDetails, LookupError> {
        if !self.is_authenticated() {
            self.authenticate()?;
        }
        let csrf_token = self.csrf_token.clone().unwrap_or_default();

        self.pacing.wait();

        let url = company_url(page_id)?;
        debug!("GET {}", url);
        let resp = self.client.get(url).header("csrf-token", csrf_token).send()?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            // Session expired; the next attempt logs in again.
            self.csrf_token = None;
            return Err(LookupError::Auth(format!("session rejected with status {}", status)));
        }
        let body = resp.text()?;
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        parse_company_response(page_id, &body)
    }
}

fn auth_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(AUTH_USER_AGENT));
    headers.insert(
        HeaderName::from_static("x-li-user-agent"),
        HeaderValue::from_static(AUTH_LIB_AGENT),
    );
    headers.insert(HeaderName::from_static("x-user-language"), HeaderValue::from_static("en"));
    headers.insert(HeaderName::from_static("x-user-locale"), HeaderValue::from_static("en_US"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-us"));
    headers
}

fn company_url(page_id: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(
        &format!("{}/organization/companies", API_BASE_URL),
        &[
            ("decorationId", COMPANY_DECORATION),
            ("q", "universalName"),
            ("universalName", page_id),
        ],
    )
}

fn cookie_value(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

fn parse_company_response(page_id: &str, body: &str) -> Result<CompanyDetails, LookupError> {
    let response: CompaniesResponse = serde_json::from_str(body)?;
    if let Some(status) = response.status {
        if status != 200 {
            return Err(LookupError::Status {
                status,
                message: response.message.unwrap_or_default(),
            });
        }
    }
    response
        .elements
        .into_iter()
        .next()
        .ok_or_else(|| LookupError::NoSuchPage(page_id.to_string()))
}
