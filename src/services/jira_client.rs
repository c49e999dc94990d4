//! Jira API client.
//!
//! Request builders are plain functions returning [`UpstreamRequest`]; the
//! async methods execute them against the configured Jira server.

use crate::error::AppError;
use crate::models::{CommentResults, DevStatusResponse, Issue, IssueResults, Repository};
use crate::services::jql::{project_jql, UserIssueSearch};
use crate::services::rest_client::{RestClient, RestClientConfig, Upstream, UpstreamRequest};

const API_PREFIX: &str = "/rest/api/latest";
const DEV_STATUS_PREFIX: &str = "/rest/dev-status/1.0";

/// Build the search request behind `projectIssues`.
pub fn project_issues_request(project_id: &str, start_at: i32, max_results: i32) -> UpstreamRequest {
    search_request(project_jql(project_id), start_at, max_results)
}

/// Build the search request behind `userIssues`.
pub fn user_issues_request(
    search: &UserIssueSearch<'_>,
    start_at: i32,
    max_results: i32,
) -> UpstreamRequest {
    search_request(search.to_jql(), start_at, max_results)
}

fn search_request(jql: String, start_at: i32, max_results: i32) -> UpstreamRequest {
    UpstreamRequest::new(format!("{}/search", API_PREFIX))
        .param("jql", jql)
        .param("startAt", start_at)
        .param("maxResults", max_results)
}

/// `GET /rest/api/latest/issue/{idOrKey}`.
pub fn issue_request(issue_id_or_key: &str) -> UpstreamRequest {
    UpstreamRequest::new(format!(
        "{}/issue/{}",
        API_PREFIX,
        urlencoding::encode(issue_id_or_key)
    ))
}

/// `GET /rest/api/latest/issue/{idOrKey}/comment`.
pub fn issue_comments_request(issue_id_or_key: &str) -> UpstreamRequest {
    UpstreamRequest::new(format!(
        "{}/issue/{}/comment",
        API_PREFIX,
        urlencoding::encode(issue_id_or_key)
    ))
}

/// Dev-status lookup of Stash repositories linked to an issue.
pub fn issue_commits_request(issue_id: &str) -> UpstreamRequest {
    UpstreamRequest::new(format!("{}/issue/detail", DEV_STATUS_PREFIX))
        .param("issueId", issue_id)
        .param("applicationType", "stash")
        .param("dataType", "repository")
}

/// Jira API client.
#[derive(Debug, Clone)]
pub struct JiraClient {
    rest: RestClient,
}

impl JiraClient {
    pub fn new(config: RestClientConfig) -> Result<Self, AppError> {
        Ok(Self {
            rest: RestClient::new(Upstream::Jira, config)?,
        })
    }

    pub async fn project_issues(
        &self,
        project_id: &str,
        start_at: i32,
        max_results: i32,
    ) -> Result<IssueResults, AppError> {
        self.rest
            .get(&project_issues_request(project_id, start_at, max_results))
            .await
    }

    pub async fn user_issues(
        &self,
        search: &UserIssueSearch<'_>,
        start_at: i32,
        max_results: i32,
    ) -> Result<IssueResults, AppError> {
        self.rest
            .get(&user_issues_request(search, start_at, max_results))
            .await
    }

    pub async fn issue(&self, issue_id_or_key: &str) -> Result<Issue, AppError> {
        self.rest.get(&issue_request(issue_id_or_key)).await
    }

    pub async fn issue_comments(&self, issue_id_or_key: &str) -> Result<CommentResults, AppError> {
        self.rest.get(&issue_comments_request(issue_id_or_key)).await
    }

    /// Repositories (with their commits) linked to the issue.
    pub async fn issue_commits(&self, issue_id: &str) -> Result<Vec<Repository>, AppError> {
        let response: DevStatusResponse = self.rest.get(&issue_commits_request(issue_id)).await?;
        Ok(response.into_repositories())
    }
}
