//! HTTP client for the identity provider.
//!
//! Wraps the four provider endpoints the sign-in flow needs: authorization
//! code exchange, token introspection, profile fetch and token revocation.

use anyhow::{anyhow, Result};
use base64ct::{Base64UrlUnpadded, Encoding};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{Instrument, info_span};

use crate::APP_USER_AGENT;

pub const TOKEN_URL: &str = "https://accounts.google.com/o/oauth2/token";
pub const TOKENINFO_URL: &str = "https://www.googleapis.com/oauth2/v1/tokeninfo";
pub const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v1/userinfo";
pub const REVOKE_URL: &str = "https://accounts.google.com/o/oauth2/revoke";

// Exchange mode for codes delivered to the page via postMessage instead of a redirect.
const REDIRECT_MODE: &str = "postmessage";

// An unresponsive provider must not hang the handling request.
const PROVIDER_TIMEOUT_SECONDS: u64 = 10;

/// Result of a successful code exchange: the bearer token plus the subject
/// claim from the accompanying identity token.
pub struct TokenGrant {
    pub access_token: String,
    pub subject: String,
}

/// Introspection response. Errors ride in the body, so all fields are optional.
#[derive(Debug, Deserialize)]
pub struct TokenInfo {
    pub error: Option<String>,
    pub user_id: Option<String>,
    pub issued_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
}

pub struct Provider {
    http: Client,
    client_id: String,
    client_secret: SecretString,
    token_url: String,
    tokeninfo_url: String,
    userinfo_url: String,
    revoke_url: String,
}

impl Provider {
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(client_id: String, client_secret: SecretString) -> Result<Self> {
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(Duration::from_secs(PROVIDER_TIMEOUT_SECONDS))
            .build()?;

        Ok(Self {
            http,
            client_id,
            client_secret,
            token_url: TOKEN_URL.to_string(),
            tokeninfo_url: TOKENINFO_URL.to_string(),
            userinfo_url: USERINFO_URL.to_string(),
            revoke_url: REVOKE_URL.to_string(),
        })
    }

    #[must_use]
    pub fn with_token_url(mut self, url: String) -> Self {
        self.token_url = url;
        self
    }

    #[must_use]
    pub fn with_tokeninfo_url(mut self, url: String) -> Self {
        self.tokeninfo_url = url;
        self
    }

    #[must_use]
    pub fn with_userinfo_url(mut self, url: String) -> Self {
        self.userinfo_url = url;
        self
    }

    #[must_use]
    pub fn with_revoke_url(mut self, url: String) -> Self {
        self.revoke_url = url;
        self
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Exchange an authorization code for an access token and subject.
    /// # Errors
    /// Returns an error if the provider rejects the code, the request fails,
    /// or the response is missing expected fields.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenGrant> {
        let params = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret()),
            ("redirect_uri", REDIRECT_MODE),
            ("grant_type", "authorization_code"),
        ];

        let span = info_span!(
            "provider.exchange_code",
            http.method = "POST",
            url = %self.token_url
        );
        let response = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .instrument(span)
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("{} - {}", self.token_url, response.status()));
        }

        let json_response: Value = response.json().await?;

        let access_token = json_response
            .get("access_token")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("Error parsing JSON response: no access_token found"))?;

        let id_token = json_response
            .get("id_token")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("Error parsing JSON response: no id_token found"))?;

        let subject = decode_subject(id_token)?;

        Ok(TokenGrant {
            access_token: access_token.to_string(),
            subject,
        })
    }

    /// Introspect an access token.
    /// # Errors
    /// Returns an error if the request fails or the body cannot be parsed.
    pub async fn tokeninfo(&self, access_token: &str) -> Result<TokenInfo> {
        let span = info_span!(
            "provider.tokeninfo",
            http.method = "GET",
            url = %self.tokeninfo_url
        );
        let response = self
            .http
            .get(&self.tokeninfo_url)
            .query(&[("access_token", access_token)])
            .send()
            .instrument(span)
            .await?;

        // Introspection failures ride in the body, not the status code.
        Ok(response.json().await?)
    }

    /// Fetch the profile for an access token.
    /// # Errors
    /// Returns an error if the request fails, the provider returns a
    /// non-success status, or the profile is missing name or email.
    pub async fn userinfo(&self, access_token: &str) -> Result<UserProfile> {
        let span = info_span!(
            "provider.userinfo",
            http.method = "GET",
            url = %self.userinfo_url
        );
        let response = self
            .http
            .get(&self.userinfo_url)
            .query(&[("access_token", access_token), ("alt", "json")])
            .send()
            .instrument(span)
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("{} - {}", self.userinfo_url, response.status()));
        }

        Ok(response.json().await?)
    }

    /// Revoke an access token. Success is the provider answering 200.
    /// # Errors
    /// Returns an error if the request itself fails.
    pub async fn revoke(&self, access_token: &str) -> Result<bool> {
        let span = info_span!(
            "provider.revoke",
            http.method = "GET",
            url = %self.revoke_url
        );
        let response = self
            .http
            .get(&self.revoke_url)
            .query(&[("token", access_token)])
            .send()
            .instrument(span)
            .await?;

        Ok(response.status() == StatusCode::OK)
    }
}

// The identity token arrived over TLS directly from the provider, so the
// subject claim is read without verifying the signature.
fn decode_subject(id_token: &str) -> Result<String> {
    let payload = id_token
        .split('.')
        .nth(1)
        .ok_or_else(|| anyhow!("Error parsing id_token: not a JWT"))?;

    let bytes = Base64UrlUnpadded::decode_vec(payload)
        .map_err(|_| anyhow!("Error parsing id_token: invalid base64url payload"))?;

    let claims: Value = serde_json::from_slice(&bytes)?;

    claims
        .get("sub")
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| anyhow!("Error parsing id_token: no sub claim found"))
}
