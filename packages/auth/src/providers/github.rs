//! # GitHub OAuth 2.0 provider
//!
//! Authorization Code flow with PKCE against GitHub.
//!
//! ## Types
//!
//! - [`GitHubUser`] / [`GitHubEmail`] — deserialization targets for the GitHub REST API
//!   responses (`/user` and `/user/emails`).
//! - [`ConfiguredClient`] — a fully-typed `oauth2::Client` alias with auth and token
//!   endpoints set.
//! - [`GitHubProvider`] — the public handler built from [`Settings`].
//!
//! ## Flow
//!
//! 1. **[`authorization_url`](GitHubProvider::authorization_url)** — builds the URL
//!    requesting `read:user` and `user:email` with a random PKCE challenge. The caller
//!    keeps the CSRF state and verifier in the visitor's session.
//!
//! 2. **[`exchange_code`](GitHubProvider::exchange_code)** — exchanges the code and
//!    verifier for an access token, fetches `/user` from the configured API and, when
//!    the profile has no public email, falls back to `/user/emails` for the primary
//!    verified address.
//!
//! Endpoints come from [`crate::settings::GitHub`] and default to github.com.

use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use reqwest::Client;
use serde::Deserialize;

use super::{AuthorizationRequest, OAuthProfile, ProviderInfo};
use crate::settings::Settings;
use crate::error::{AuthError, Result};

const USER_AGENT: &str = "session-identity";

/// GitHub user info from API.
#[derive(Debug, Deserialize)]
struct GitHubUser {
    id: i64,
    login: String,
    email: Option<String>,
    name: Option<String>,
    avatar_url: Option<String>,
}

/// GitHub email info from API.
#[derive(Debug, Deserialize)]
struct GitHubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

/// OAuth client type with auth URL and token URL set.
type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// GitHub OAuth handler.
#[derive(Debug, Clone)]
pub struct GitHubProvider {
    client_id: ClientId,
    client_secret: ClientSecret,
    auth_url: AuthUrl,
    token_url: TokenUrl,
    redirect_url: RedirectUrl,
    api_url: String,
    base_url: String,
}

impl GitHubProvider {
    pub const ID: &'static str = "github";

    pub fn new(settings: &Settings) -> Result<Self> {
        let invalid = |e: oauth2::url::ParseError| AuthError::Config(e.to_string());

        Ok(Self {
            client_id: ClientId::new(settings.github.client_id.clone()),
            client_secret: ClientSecret::new(settings.github.client_secret.clone()),
            auth_url: AuthUrl::new(settings.github.authorize_url.clone()).map_err(invalid)?,
            token_url: TokenUrl::new(settings.github.token_url.clone()).map_err(invalid)?,
            redirect_url: RedirectUrl::new(settings.github_redirect_url()).map_err(invalid)?,
            api_url: settings.github.api_url.trim_end_matches('/').to_string(),
            base_url: settings.auth.url.trim_end_matches('/').to_string(),
        })
    }

    fn create_client(&self) -> ConfiguredClient {
        BasicClient::new(self.client_id.clone())
            .set_client_secret(self.client_secret.clone())
            .set_auth_uri(self.auth_url.clone())
            .set_token_uri(self.token_url.clone())
            .set_redirect_uri(self.redirect_url.clone())
    }

    /// Generate authorization URL with PKCE.
    pub fn authorization_url(&self) -> AuthorizationRequest {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let (auth_url, csrf_state) = self
            .create_client()
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("read:user".to_string()))
            .add_scope(Scope::new("user:email".to_string()))
            .set_pkce_challenge(pkce_challenge)
            .url();

        AuthorizationRequest {
            url: auth_url.to_string(),
            csrf_state: csrf_state.secret().clone(),
            pkce_verifier: pkce_verifier.secret().clone(),
        }
    }

    /// Exchange authorization code for a token and fetch the user's profile.
    pub async fn exchange_code(&self, code: &str, pkce_verifier: &str) -> Result<OAuthProfile> {
        let http_client = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(oauth_error)?;

        let token_result = self
            .create_client()
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier.to_string()))
            .request_async(&http_client)
            .await
            .map_err(|e| AuthError::OAuth(format!("token exchange failed: {e}")))?;

        let access_token = token_result.access_token().secret();
        let api_client = Client::new();

        let github_user: GitHubUser = api_client
            .get(format!("{}/user", self.api_url))
            .bearer_auth(access_token)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(oauth_error)?
            .json()
            .await
            .map_err(oauth_error)?;

        // Get primary email if not in user info
        let email = match github_user.email {
            Some(email) => email,
            None => {
                let emails: Vec<GitHubEmail> = api_client
                    .get(format!("{}/user/emails", self.api_url))
                    .bearer_auth(access_token)
                    .header("User-Agent", USER_AGENT)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(oauth_error)?
                    .json()
                    .await
                    .map_err(oauth_error)?;

                primary_email(emails)
                    .ok_or_else(|| AuthError::OAuth("no verified primary email".to_string()))?
            }
        };

        Ok(OAuthProfile {
            provider_account_id: github_user.id.to_string(),
            name: github_user.name.or(Some(github_user.login)),
            email,
            image: github_user.avatar_url,
        })
    }

    pub fn info(&self) -> ProviderInfo {
        ProviderInfo {
            id: Self::ID,
            name: "GitHub",
            kind: "oauth",
            signin_url: format!("{}/api/auth/signin/{}", self.base_url, Self::ID),
            callback_url: self.redirect_url.url().to_string(),
        }
    }
}

fn oauth_error(err: reqwest::Error) -> AuthError {
    AuthError::OAuth(err.to_string())
}

fn primary_email(emails: Vec<GitHubEmail>) -> Option<String> {
    emails
        .into_iter()
        .find(|e| e.primary && e.verified)
        .map(|e| e.email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::test_settings;

    #[test]
    fn test_authorization_url_carries_pkce_and_state() {
        let provider = GitHubProvider::new(&test_settings()).unwrap();
        let request = provider.authorization_url();

        assert!(request
            .url
            .starts_with("https://github.com/login/oauth/authorize"));
        assert!(request.url.contains("client_id=client-id"));
        assert!(request.url.contains("code_challenge_method=S256"));
        assert!(request.url.contains(&format!("state={}", request.csrf_state)));
        assert!(!request.pkce_verifier.is_empty());
    }

    #[test]
    fn test_each_request_gets_a_fresh_state() {
        let provider = GitHubProvider::new(&test_settings()).unwrap();
        assert_ne!(
            provider.authorization_url().csrf_state,
            provider.authorization_url().csrf_state
        );
    }

    #[test]
    fn test_primary_email_requires_verified_primary() {
        let emails = vec![
            GitHubEmail {
                email: "old@example.com".to_string(),
                primary: false,
                verified: true,
            },
            GitHubEmail {
                email: "main@example.com".to_string(),
                primary: true,
                verified: true,
            },
        ];
        assert_eq!(primary_email(emails).as_deref(), Some("main@example.com"));

        let unverified = vec![GitHubEmail {
            email: "main@example.com".to_string(),
            primary: true,
            verified: false,
        }];
        assert_eq!(primary_email(unverified), None);
    }

    #[test]
    fn test_endpoints_follow_settings() {
        let mut settings = test_settings();
        settings.github.authorize_url = "http://127.0.0.1:8080/login/oauth/authorize".to_string();
        settings.github.api_url = "http://127.0.0.1:8080/".to_string();
        let provider = GitHubProvider::new(&settings).unwrap();

        assert!(provider
            .authorization_url()
            .url
            .starts_with("http://127.0.0.1:8080/login/oauth/authorize?"));
        assert_eq!(provider.api_url, "http://127.0.0.1:8080");

        settings.github.token_url = "not a url".to_string();
        assert!(matches!(GitHubProvider::new(&settings), Err(AuthError::Config(_))));
    }

    #[test]
    fn test_provider_info() {
        let info = GitHubProvider::new(&test_settings()).unwrap().info();
        assert_eq!(info.signin_url, "http://localhost:3000/api/auth/signin/github");
        assert_eq!(
            info.callback_url,
            "http://localhost:3000/api/auth/callback/github"
        );
    }
}
