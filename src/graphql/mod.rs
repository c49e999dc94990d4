//! GraphQL schema assembly.
//!
//! One root `Query` type; there is no mutation or subscription surface.
//!
//! ```graphql
//! {
//!   projectIssues(projectId: "ABC", maxResults: 10) {
//!     total
//!     issues { key fields { summary assignee { displayName } } }
//!   }
//!   stashRepoCommits(projectKey: "TEAM", repoSlug: "svc") {
//!     isLastPage
//!     values { displayId authorTimestamp jiraKey }
//!   }
//! }
//! ```

pub mod query;

use crate::config::Config;
use crate::error::AppError;
use crate::services::{JiraClient, StashClient};
use async_graphql::{EmptyMutation, EmptySubscription, Schema};

use self::query::QueryRoot;

/// The served schema type.
pub type ScraperSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

/// Build the schema with both upstream clients as context data.
pub fn build_schema(jira: JiraClient, stash: StashClient) -> ScraperSchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(jira)
        .data(stash)
        .finish()
}

/// Build the upstream clients from configuration and assemble the schema.
pub fn schema_from_config(config: &Config) -> Result<ScraperSchema, AppError> {
    let jira = JiraClient::new(config.jira_client_config())?;
    let stash = StashClient::new(config.stash_client_config())?;
    Ok(build_schema(jira, stash))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> ScraperSchema {
        schema_from_config(&Config::from_lookup(|_| None)).unwrap()
    }

    #[test]
    fn test_query_root_fields() {
        let sdl = schema().sdl();
        for field in [
            "projectIssues(",
            "issue(",
            "issueComments(",
            "issueCommits(",
            "userIssues(",
            "stashProjects(",
            "stashProjectRepositories(",
            "stashRepoCommits(",
            "stashRepoPullRequests(",
        ] {
            assert!(sdl.contains(field), "missing `{}` in:\n{}", field, sdl);
        }
        assert!(!sdl.contains("type Mutation"));
        assert!(!sdl.contains("type Subscription"));
    }

    #[test]
    fn test_registered_types() {
        let sdl = schema().sdl();
        for ty in [
            "scalar Date",
            "scalar Timestamp",
            "type Fields",
            "type StashCommit",
            "type StashRepoPullRequestResults",
            "type StashRepoCommitResults",
            "type Committer",
        ] {
            assert!(sdl.contains(ty), "missing `{}`", ty);
        }
    }

    #[tokio::test]
    async fn test_invalid_date_argument_is_not_a_validation_error() {
        // The Date scalar maps bad input to null instead of rejecting the
        // query; the resulting upstream failure is a field error, not a
        // validation error.
        let response = schema()
            .execute(r#"{ userIssues(project: "ABC", username: "jdoe", start: "2023-02-30") { total } }"#)
            .await;
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["data"]["userIssues"], serde_json::Value::Null);
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].path.len(), 1);
    }
}
