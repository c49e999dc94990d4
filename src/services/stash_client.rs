//! Stash (Bitbucket Server) API client.

use crate::error::AppError;
use crate::models::{StashProjectResults, StashRepoCommitResults, StashRepoPullRequestResults};
use crate::services::rest_client::{RestClient, RestClientConfig, Upstream, UpstreamRequest};

/// Paging parameters passed straight through to Stash. Unset values are not
/// sent, so Stash applies its own defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageParams {
    pub start: Option<i32>,
    pub limit: Option<i32>,
}

impl PageParams {
    fn apply(self, request: UpstreamRequest) -> UpstreamRequest {
        request
            .param_opt("start", self.start)
            .param_opt("limit", self.limit)
    }
}

fn repo_endpoint(project_key: &str, repo_slug: &str, resource: &str) -> String {
    format!(
        "/projects/{}/repos/{}/{}",
        urlencoding::encode(project_key),
        urlencoding::encode(repo_slug),
        resource
    )
}

pub fn projects_request(page: PageParams) -> UpstreamRequest {
    page.apply(UpstreamRequest::new("/projects"))
}

pub fn project_repositories_request(project_key: &str, page: PageParams) -> UpstreamRequest {
    page.apply(UpstreamRequest::new(format!(
        "/projects/{}/repos",
        urlencoding::encode(project_key)
    )))
}

pub fn repo_commits_request(project_key: &str, repo_slug: &str, page: PageParams) -> UpstreamRequest {
    page.apply(
        UpstreamRequest::new(repo_endpoint(project_key, repo_slug, "commits"))
            .param("state", "all")
            .param("order", "newest"),
    )
}

pub fn repo_pull_requests_request(
    project_key: &str,
    repo_slug: &str,
    page: PageParams,
) -> UpstreamRequest {
    page.apply(
        UpstreamRequest::new(repo_endpoint(project_key, repo_slug, "pull-requests"))
            .param("state", "all")
            .param("order", "newest"),
    )
}

/// Stash API client.
#[derive(Debug, Clone)]
pub struct StashClient {
    rest: RestClient,
}

impl StashClient {
    pub fn new(config: RestClientConfig) -> Result<Self, AppError> {
        Ok(Self {
            rest: RestClient::new(Upstream::Stash, config)?,
        })
    }

    pub async fn projects(&self, page: PageParams) -> Result<StashProjectResults, AppError> {
        self.rest.get(&projects_request(page)).await
    }

    pub async fn project_repositories(
        &self,
        project_key: &str,
        page: PageParams,
    ) -> Result<StashProjectResults, AppError> {
        self.rest
            .get(&project_repositories_request(project_key, page))
            .await
    }

    pub async fn repo_commits(
        &self,
        project_key: &str,
        repo_slug: &str,
        page: PageParams,
    ) -> Result<StashRepoCommitResults, AppError> {
        self.rest
            .get(&repo_commits_request(project_key, repo_slug, page))
            .await
    }

    pub async fn repo_pull_requests(
        &self,
        project_key: &str,
        repo_slug: &str,
        page: PageParams,
    ) -> Result<StashRepoPullRequestResults, AppError> {
        self.rest
            .get(&repo_pull_requests_request(project_key, repo_slug, page))
            .await
    }
}
