use crate::error::{Result, SlopscanError};
use crate::types::tree::FileNode;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

const COMMIT_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub struct RepoInfo {
    pub default_branch: String,
    pub created_at: Option<DateTime<Utc>>,
    pub star_count: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct CommitInfo {
    pub sha: String,
    pub message: String,
    pub author_date: DateTime<Utc>,
    pub changed_files: Option<u32>,
}

/// Everything the analysis needs from the repository host. Errors must
/// arrive pre-categorized (rate-limited / auth-or-missing / remote /
/// transport); the core never retries.
#[async_trait]
pub trait RepoDataSource: Send + Sync {
    async fn get_repo_info(&self, owner: &str, repo: &str) -> Result<RepoInfo>;

    /// Most-recent-first, one page of up to 100 commits.
    async fn get_commit_history(&self, owner: &str, repo: &str) -> Result<Vec<CommitInfo>>;

    async fn get_file_tree(&self, owner: &str, repo: &str, reference: &str)
        -> Result<Vec<FileNode>>;

    async fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: &str,
    ) -> Result<String>;
}

pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct RepoResponse {
    default_branch: String,
    created_at: Option<DateTime<Utc>>,
    stargazers_count: Option<u32>,
}

#[derive(Deserialize)]
struct CommitResponse {
    sha: String,
    commit: CommitDetail,
}

#[derive(Deserialize)]
struct CommitDetail {
    message: String,
    author: Option<CommitAuthor>,
    committer: Option<CommitAuthor>,
}

#[derive(Deserialize)]
struct CommitAuthor {
    date: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
}

#[derive(Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    url: Option<String>,
}

impl GithubClient {
    pub fn new(api_base: String, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base,
            token,
        }
    }

    fn request(&self, url: String) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .get(url)
            .header("User-Agent", concat!("slopscan/", env!("CARGO_PKG_VERSION")))
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        builder
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let url = response.url().path().to_string();
        match status.as_u16() {
            403 | 429 => Err(SlopscanError::RateLimited(format!(
                "GitHub API rate limit reached for {url}"
            ))),
            401 | 404 => Err(SlopscanError::AuthRequiredOrNotFound(format!(
                "repository not accessible: {url}"
            ))),
            code => {
                let message = response.text().await.unwrap_or_default();
                Err(SlopscanError::RemoteApi {
                    status: code,
                    message,
                })
            }
        }
    }
}

#[async_trait]
impl RepoDataSource for GithubClient {
    async fn get_repo_info(&self, owner: &str, repo: &str) -> Result<RepoInfo> {
        let url = format!("{}/repos/{owner}/{repo}", self.api_base);
        let response = Self::check_status(self.request(url).send().await?).await?;
        let body: RepoResponse = response.json().await?;
        Ok(RepoInfo {
            default_branch: body.default_branch,
            created_at: body.created_at,
            star_count: body.stargazers_count,
        })
    }

    async fn get_commit_history(&self, owner: &str, repo: &str) -> Result<Vec<CommitInfo>> {
        let url = format!(
            "{}/repos/{owner}/{repo}/commits?per_page={COMMIT_PAGE_SIZE}",
            self.api_base
        );
        let response = Self::check_status(self.request(url).send().await?).await?;
        let body: Vec<CommitResponse> = response.json().await?;
        let commits = body
            .into_iter()
            .filter_map(|entry| {
                let date = entry
                    .commit
                    .author
                    .as_ref()
                    .and_then(|author| author.date)
                    .or_else(|| entry.commit.committer.as_ref().and_then(|c| c.date))?;
                Some(CommitInfo {
                    sha: entry.sha,
                    message: entry.commit.message,
                    author_date: date,
                    // The list endpoint does not report per-commit file
                    // counts; the bulk signal treats them as unknown.
                    changed_files: None,
                })
            })
            .collect();
        Ok(commits)
    }

    async fn get_file_tree(
        &self,
        owner: &str,
        repo: &str,
        reference: &str,
    ) -> Result<Vec<FileNode>> {
        let url = format!(
            "{}/repos/{owner}/{repo}/git/trees/{reference}?recursive=1",
            self.api_base
        );
        let response = Self::check_status(self.request(url).send().await?).await?;
        let body: TreeResponse = response.json().await?;
        let nodes = body
            .tree
            .into_iter()
            .map(|entry| {
                let mut node = if entry.kind == "tree" {
                    FileNode::dir(&entry.path)
                } else {
                    FileNode::file(&entry.path)
                };
                node.url = entry.url;
                node
            })
            .collect();
        Ok(nodes)
    }

    async fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: &str,
    ) -> Result<String> {
        let url = format!(
            "{}/repos/{owner}/{repo}/contents/{path}?ref={reference}",
            self.api_base
        );
        let response = self
            .request(url)
            .header("Accept", "application/vnd.github.raw+json")
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(response.text().await?)
    }
}
