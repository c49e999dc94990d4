//! Root query resolvers.
//!
//! Every field maps onto exactly one upstream GET. Fields are nullable so a
//! failing upstream call nulls only that field and leaves its siblings alone.

use crate::error::AppError;
use crate::models::{
    CommentResults, Issue, IssueResults, Repository, StashProjectResults, StashRepoCommitResults,
    StashRepoPullRequestResults,
};
use crate::scalars::CalendarDate;
use crate::services::jql::{DateWindow, UserIssueSearch};
use crate::services::{JiraClient, PageParams, StashClient};
use async_graphql::{Context, ErrorExtensions, Object};
use chrono::Local;

/// Convert a client result into a nullable field result.
fn resolved<T>(result: Result<T, AppError>) -> async_graphql::Result<Option<T>> {
    result.map(Some).map_err(|e| e.extend())
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Issues in a Jira project.
    async fn project_issues(
        &self,
        ctx: &Context<'_>,
        project_id: String,
        #[graphql(default = 0)] start_at: i32,
        #[graphql(default = 100)] max_results: i32,
    ) -> async_graphql::Result<Option<IssueResults>> {
        let jira = ctx.data::<JiraClient>()?;
        resolved(jira.project_issues(&project_id, start_at, max_results).await)
    }

    async fn issue(
        &self,
        ctx: &Context<'_>,
        issue_id_or_key: String,
    ) -> async_graphql::Result<Option<Issue>> {
        let jira = ctx.data::<JiraClient>()?;
        resolved(jira.issue(&issue_id_or_key).await)
    }

    async fn issue_comments(
        &self,
        ctx: &Context<'_>,
        issue_id_or_key: String,
    ) -> async_graphql::Result<Option<CommentResults>> {
        let jira = ctx.data::<JiraClient>()?;
        resolved(jira.issue_comments(&issue_id_or_key).await)
    }

    /// Stash repositories and commits linked to an issue.
    async fn issue_commits(
        &self,
        ctx: &Context<'_>,
        issue_id: String,
    ) -> async_graphql::Result<Option<Vec<Repository>>> {
        let jira = ctx.data::<JiraClient>()?;
        resolved(jira.issue_commits(&issue_id).await)
    }

    /// Issues in `project` that `username` created, was assigned, reported,
    /// or mentioned in the summary, description or a comment, and that were
    /// created or updated between `start` and `end`.
    ///
    /// Both bounds default to the fiscal year ending April 30 of the current
    /// year. An invalid date falls back to the default for that bound.
    async fn user_issues(
        &self,
        ctx: &Context<'_>,
        project: String,
        username: String,
        #[graphql(default = 0)] start_at: i32,
        #[graphql(default = 100)] max_results: i32,
        start: Option<CalendarDate>,
        end: Option<CalendarDate>,
    ) -> async_graphql::Result<Option<IssueResults>> {
        let jira = ctx.data::<JiraClient>()?;

        let today = Local::now().date_naive();
        let window = DateWindow::resolve(
            start.and_then(|d| d.date()),
            end.and_then(|d| d.date()),
            today,
        )
        .ok_or_else(|| AppError::internal(format!("No fiscal year window for {}", today)).extend())?;

        let search = UserIssueSearch {
            project: &project,
            username: &username,
            window,
        };
        resolved(jira.user_issues(&search, start_at, max_results).await)
    }

    async fn stash_projects(
        &self,
        ctx: &Context<'_>,
        start: Option<i32>,
        limit: Option<i32>,
    ) -> async_graphql::Result<Option<StashProjectResults>> {
        let stash = ctx.data::<StashClient>()?;
        resolved(stash.projects(PageParams { start, limit }).await)
    }

    /// Repositories in a Stash project.
    async fn stash_project_repositories(
        &self,
        ctx: &Context<'_>,
        project_key: String,
        start: Option<i32>,
        limit: Option<i32>,
    ) -> async_graphql::Result<Option<StashProjectResults>> {
        let stash = ctx.data::<StashClient>()?;
        resolved(
            stash
                .project_repositories(&project_key, PageParams { start, limit })
                .await,
        )
    }

    /// Commit history of a repository, newest first.
    async fn stash_repo_commits(
        &self,
        ctx: &Context<'_>,
        project_key: String,
        repo_slug: String,
        start: Option<i32>,
        limit: Option<i32>,
    ) -> async_graphql::Result<Option<StashRepoCommitResults>> {
        let stash = ctx.data::<StashClient>()?;
        resolved(
            stash
                .repo_commits(&project_key, &repo_slug, PageParams { start, limit })
                .await,
        )
    }

    /// Pull requests of a repository in any state, newest first.
    async fn stash_repo_pull_requests(
        &self,
        ctx: &Context<'_>,
        project_key: String,
        repo_slug: String,
        start: Option<i32>,
        limit: Option<i32>,
    ) -> async_graphql::Result<Option<StashRepoPullRequestResults>> {
        let stash = ctx.data::<StashClient>()?;
        resolved(
            stash
                .repo_pull_requests(&project_key, &repo_slug, PageParams { start, limit })
                .await,
        )
    }
}
