//! Profile adapter: fetches an account and its public repositories.
//!
//! Two blocking requests (`/users/{login}` then
//! `/users/{login}/repos?per_page=..&sort=..`). Any failure returns a typed
//! [`FetchError`] before the caller ever sees partial data.

use reqwest::header::ACCEPT;
use serde::Deserialize;
use url::Url;

use crate::config::ApiConfig;
use crate::error::FetchError;
use crate::model::{ProfileData, RepositoryRecord, UserRecord};

const ACCEPT_JSON: &str = "application/vnd.github.v3+json";

/// Upstream error payload (`{"message": "..."}`).
#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Blocking client for the profile endpoints.
#[derive(Clone)]
pub struct ProfileClient {
    client: reqwest::blocking::Client,
    config: ApiConfig,
}

impl ProfileClient {
    pub fn new(config: ApiConfig) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| FetchError::unknown(format!("Client error: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Fetch a profile and its repositories.
    pub fn fetch_profile(&self, username: &str) -> Result<ProfileData, FetchError> {
        let login = validate_username(username)?;

        let user_url = user_endpoint(&self.config, login)?;
        let user = parse_user(&self.get(&user_url)?)?;

        let repos_url = repos_endpoint(&self.config, login)?;
        let repos = parse_repos(&self.get(&repos_url).map_err(repos_failure)?)?;

        log::info!(
            "Fetched {} ({} followers, {} repos)",
            user.login,
            user.followers,
            repos.len()
        );
        Ok(ProfileData { user, repos })
    }

    fn get(&self, url: &Url) -> Result<String, FetchError> {
        let mut request = self.client.get(url.as_str()).header(ACCEPT, ACCEPT_JSON);
        if let Some(ref token) = self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|e| {
            log::error!("GET {} failed: {}", url, e);
            FetchError::from(e)
        })?;
        let status = response.status().as_u16();
        log::debug!("GET {} -> {}", url, status);

        let body = response
            .text()
            .map_err(|e| FetchError::unknown(format!("Failed to read body: {}", e)))?;

        match classify_status(status, &body) {
            Some(err) => Err(err),
            None => Ok(body),
        }
    }
}

/// Map a non-success HTTP status to a typed error; `None` for 2xx.
pub fn classify_status(status: u16, body: &str) -> Option<FetchError> {
    if (200..300).contains(&status) {
        return None;
    }
    let upstream = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.message)
        .filter(|m| !m.trim().is_empty());

    Some(match status {
        404 => FetchError::not_found("User not found"),
        403 | 429 => FetchError::rate_limited(
            "API rate limit exceeded. Please try again later.",
        ),
        _ => FetchError::unknown(match upstream {
            Some(message) => format!("API error ({}): {}", status, message),
            None => format!("API error ({})", status),
        }),
    })
}

pub fn parse_user(body: &str) -> Result<UserRecord, FetchError> {
    Ok(serde_json::from_str(body)?)
}

pub fn parse_repos(body: &str) -> Result<Vec<RepositoryRecord>, FetchError> {
    Ok(serde_json::from_str(body)?)
}

/// Trimmed, non-empty login.
fn validate_username(username: &str) -> Result<&str, FetchError> {
    let login = username.trim();
    if login.is_empty() {
        return Err(FetchError::unknown("Username is required"));
    }
    Ok(login)
}

fn endpoint(config: &ApiConfig, segments: &[&str]) -> Result<Url, FetchError> {
    let mut url = Url::parse(&config.base_url)
        .map_err(|e| FetchError::unknown(format!("Invalid API URL: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| FetchError::unknown(format!("Invalid API URL: {}", config.base_url)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

pub fn user_endpoint(config: &ApiConfig, login: &str) -> Result<Url, FetchError> {
    endpoint(config, &["users", login])
}

pub fn repos_endpoint(config: &ApiConfig, login: &str) -> Result<Url, FetchError> {
    let mut url = endpoint(config, &["users", login, "repos"])?;
    url.query_pairs_mut()
        .append_pair("per_page", &config.per_page.to_string())
        .append_pair("sort", &config.sort);
    Ok(url)
}

/// The user already resolved, so a 404 on its repositories is not a
/// missing account.
fn repos_failure(err: FetchError) -> FetchError {
    if err.is_not_found() {
        FetchError::unknown("Failed to fetch repositories (404)")
    } else {
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchErrorKind;
    use serde_json::json;

    #[test]
    fn missing_repositories_are_not_a_missing_user() {
        let err = repos_failure(classify_status(404, "").unwrap());
        assert_eq!(err.kind, FetchErrorKind::Unknown);
        assert_eq!(err.message, "Failed to fetch repositories (404)");

        let limited = repos_failure(classify_status(429, "").unwrap());
        assert_eq!(limited.kind, FetchErrorKind::RateLimited);
        assert_eq!(limited.message, "API rate limit exceeded. Please try again later.");
    }

    #[test]
    fn success_statuses_pass() {
        assert!(classify_status(200, "").is_none());
        assert!(classify_status(204, "").is_none());
    }

    #[test]
    fn statuses_map_to_kinds() {
        assert_eq!(classify_status(404, "").unwrap().kind, FetchErrorKind::NotFound);
        assert_eq!(classify_status(403, "").unwrap().kind, FetchErrorKind::RateLimited);
        assert_eq!(classify_status(429, "").unwrap().kind, FetchErrorKind::RateLimited);
        assert_eq!(classify_status(500, "").unwrap().kind, FetchErrorKind::Unknown);
        assert_eq!(classify_status(301, "").unwrap().kind, FetchErrorKind::Unknown);
    }

    #[test]
    fn upstream_message_is_surfaced() {
        let err = classify_status(502, r#"{"message":"Server Error"}"#).unwrap();
        assert_eq!(err.message, "API error (502): Server Error");
        let err = classify_status(500, "<html>oops</html>").unwrap();
        assert_eq!(err.message, "API error (500)");
    }

    #[test]
    fn endpoints_are_built_from_config() {
        let config = ApiConfig::default();
        assert_eq!(
            user_endpoint(&config, "octocat").unwrap().as_str(),
            "https://api.github.com/users/octocat"
        );
        assert_eq!(
            repos_endpoint(&config, "octocat").unwrap().as_str(),
            "https://api.github.com/users/octocat/repos?per_page=100&sort=updated"
        );

        let enterprise = ApiConfig {
            base_url: "https://ghe.example.com/api/v3".into(),
            ..ApiConfig::default()
        };
        assert_eq!(
            user_endpoint(&enterprise, "me").unwrap().as_str(),
            "https://ghe.example.com/api/v3/users/me"
        );
    }

    #[test]
    fn logins_are_path_encoded() {
        let url = user_endpoint(&ApiConfig::default(), "a/b c").unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/users/a%2Fb%20c");
    }

    #[test]
    fn blank_username_is_rejected() {
        let err = validate_username("   ").unwrap_err();
        assert_eq!(err.message, "Username is required");
        assert_eq!(validate_username("  torvalds ").unwrap(), "torvalds");
    }

    #[test]
    fn parses_upstream_payloads() {
        let user = parse_user(
            &json!({
                "login": "octocat",
                "id": 583231,
                "avatar_url": "https://avatars.githubusercontent.com/u/583231?v=4",
                "name": "The Octocat",
                "followers": 9000,
                "public_repos": 8,
                "bio": null,
                "site_admin": false
            })
            .to_string(),
        )
        .unwrap();
        assert_eq!(user.login, "octocat");
        assert_eq!(user.followers, 9000);

        let repos = parse_repos(
            &json!([{
                "id": 1296269,
                "name": "Hello-World",
                "full_name": "octocat/Hello-World",
                "description": "My first repository",
                "html_url": "https://github.com/octocat/Hello-World",
                "stargazers_count": 80,
                "forks_count": 9,
                "open_issues_count": 0,
                "language": null,
                "topics": [],
                "updated_at": "2011-01-26T19:14:43Z"
            }])
            .to_string(),
        )
        .unwrap();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].stargazers_count, 80);
        assert!(repos[0].updated_at.is_some());
    }

    #[test]
    fn malformed_payload_is_unknown() {
        let err = parse_repos(r#"{"message":"not a list"}"#).unwrap_err();
        assert_eq!(err.kind, FetchErrorKind::Unknown);
    }
}
