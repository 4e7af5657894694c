//! GitHub provisioning — creates a public demonstration repository for a
//! posting and seeds it with a templated README.
//!
//! One attempt per call, bounded by the configured HTTP timeout; failures
//! carry the remote error body so the caller can log exactly what GitHub said.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

const GITHUB_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = "jobpilot-api";
const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API error (status {status}): {body}")]
    Api { status: u16, body: String },
}

/// What to provision: a repository name, its description, and visibility.
#[derive(Debug, Clone)]
pub struct RepoRequest {
    pub name: String,
    pub description: String,
    pub private: bool,
}

/// The repository-provisioning collaborator. Returns the public URL of the
/// created repository.
#[async_trait]
pub trait RepoProvisioner: Send + Sync {
    async fn create(&self, request: &RepoRequest) -> Result<String, RepoError>;
}

pub struct GithubClient {
    http: reqwest::Client,
    token: String,
    base_url: String,
}

#[derive(Serialize)]
struct CreateRepoBody<'a> {
    name: &'a str,
    description: &'a str,
    private: bool,
    has_issues: bool,
    has_projects: bool,
    has_wiki: bool,
}

#[derive(Deserialize)]
struct RepoInfo {
    name: String,
    html_url: String,
    owner: RepoOwner,
}

#[derive(Deserialize)]
struct RepoOwner {
    login: String,
}

#[derive(Serialize)]
struct CreateFileBody<'a> {
    message: &'a str,
    content: String,
}

impl GithubClient {
    pub fn new(token: String, timeout: Duration) -> Result<Self, RepoError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(GithubClient {
            http,
            token,
            base_url: GITHUB_API_URL.to_string(),
        })
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    async fn expect_success(response: reqwest::Response) -> Result<reqwest::Response, RepoError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(RepoError::Api {
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl RepoProvisioner for GithubClient {
    async fn create(&self, request: &RepoRequest) -> Result<String, RepoError> {
        let name = sanitize_repo_name(&request.name);

        let response = self
            .http
            .post(format!("{}/user/repos", self.base_url))
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(ACCEPT, ACCEPT_HEADER)
            .json(&CreateRepoBody {
                name: &name,
                description: &request.description,
                private: request.private,
                has_issues: true,
                has_projects: true,
                has_wiki: true,
            })
            .send()
            .await?;
        let info: RepoInfo = Self::expect_success(response).await?.json().await?;

        // Seed the repository with a templated README.
        let readme = readme_for(&info.name, &request.description);
        let response = self
            .http
            .put(format!(
                "{}/repos/{}/{}/contents/README.md",
                self.base_url, info.owner.login, info.name
            ))
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(ACCEPT, ACCEPT_HEADER)
            .json(&CreateFileBody {
                message: "Initial commit: add README",
                content: BASE64.encode(readme.as_bytes()),
            })
            .send()
            .await?;
        Self::expect_success(response).await?;

        info!("GitHub repository created: {}", info.html_url);
        Ok(info.html_url)
    }
}

fn readme_for(name: &str, description: &str) -> String {
    format!(
        "# {name}\n\n{description}\n\nThis repository was generated automatically to \
         demonstrate relevant skills.\n"
    )
}

/// GitHub rejects most punctuation in repository names; anything outside
/// `[A-Za-z0-9._-]` becomes a dash, and the result is capped at 100 chars.
fn sanitize_repo_name(name: &str) -> String {
    let mut sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();
    sanitized.truncate(100);
    if sanitized.is_empty() {
        sanitized.push_str("generated-project");
    }
    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_invalid_characters() {
        assert_eq!(
            sanitize_repo_name("Project_Full Stack Developer_TechCorp"),
            "Project_Full-Stack-Developer_TechCorp"
        );
    }

    #[test]
    fn test_sanitize_caps_length() {
        let long = "x".repeat(250);
        assert_eq!(sanitize_repo_name(&long).len(), 100);
    }

    #[test]
    fn test_sanitize_empty_name_gets_placeholder() {
        assert_eq!(sanitize_repo_name(""), "generated-project");
    }

    #[test]
    fn test_readme_contains_name_and_description() {
        let readme = readme_for("demo-repo", "A demonstration project.");
        assert!(readme.starts_with("# demo-repo\n"));
        assert!(readme.contains("A demonstration project."));
    }

    #[tokio::test]
    async fn test_create_surfaces_remote_error_body() {
        // Point the client at a closed port; the connection error must map
        // into RepoError::Http, not a panic.
        let client = GithubClient::new("token".to_string(), Duration::from_millis(200))
            .unwrap()
            .with_base_url("http://127.0.0.1:9".to_string());
        let err = client
            .create(&RepoRequest {
                name: "demo".to_string(),
                description: "d".to_string(),
                private: false,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Http(_)));
    }
}
