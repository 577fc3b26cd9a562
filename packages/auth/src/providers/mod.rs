//! OAuth providers.

mod github;

use serde::Serialize;

pub use github::GitHubProvider;

/// Session keys holding the in-flight authorization request.
pub const SESSION_OAUTH_STATE_KEY: &str = "oauth_state";
pub const SESSION_PKCE_VERIFIER_KEY: &str = "oauth_pkce_verifier";

/// Profile returned by a provider after a successful code exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct OAuthProfile {
    pub provider_account_id: String,
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
}

/// Authorization URL plus the secrets to keep until the callback.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    pub csrf_state: String,
    pub pkce_verifier: String,
}

/// Public description of a configured provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub id: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub signin_url: String,
    pub callback_url: String,
}
