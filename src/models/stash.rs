//! Stash (Bitbucket Server) models.

use super::lenient_string;
use crate::scalars::Timestamp;
use async_graphql::{ComplexObject, OutputType, SimpleObject};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Commit property holding the Jira keys Stash detected in the message.
pub const JIRA_KEY_PROPERTY: &str = "jira-key";

/// A Stash user reference.
#[derive(Debug, Clone, Default, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Committer {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub slug: Option<String>,
}

/// A project or repository entry from the Stash listing endpoints.
#[derive(Debug, Clone, Default, Deserialize, SimpleObject)]
pub struct StashValue {
    pub key: Option<String>,
    pub id: Option<i64>,
    pub name: Option<String>,
    pub slug: Option<String>,
}

/// A commit from a repository's history.
#[derive(Debug, Clone, Default, Deserialize, SimpleObject)]
#[graphql(complex)]
#[serde(rename_all = "camelCase")]
pub struct StashCommit {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    pub display_id: Option<String>,
    pub author_timestamp: Option<Timestamp>,
    pub committer_timestamp: Option<Timestamp>,
    pub author: Option<Committer>,
    pub committer: Option<Committer>,
    pub message: Option<String>,
    #[graphql(skip)]
    pub properties: Option<Map<String, Value>>,
}

#[ComplexObject]
impl StashCommit {
    /// Jira keys referenced by this commit, from `properties["jira-key"]`.
    async fn jira_key(&self) -> Option<Vec<String>> {
        self.jira_keys()
    }
}

impl StashCommit {
    /// `None` when the commit carries no properties map or no `jira-key` entry.
    pub fn jira_keys(&self) -> Option<Vec<String>> {
        let keys = self.properties.as_ref()?.get(JIRA_KEY_PROPERTY)?;
        match keys {
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_owned))
                    .collect(),
            ),
            Value::String(key) => Some(vec![key.clone()]),
            _ => None,
        }
    }
}

/// Stash wraps participants as `{"user": {...}, "role": ..., "approved": ...}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Participant {
    pub user: Option<Committer>,
}

/// A pull request.
#[derive(Debug, Clone, Default, Deserialize, SimpleObject)]
#[graphql(complex)]
#[serde(rename_all = "camelCase")]
pub struct StashPullRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    pub created_date: Option<Timestamp>,
    pub updated_date: Option<Timestamp>,
    pub title: Option<String>,
    #[graphql(skip)]
    #[serde(rename = "author")]
    pub author_participant: Option<Participant>,
    #[graphql(skip)]
    #[serde(rename = "reviewers")]
    pub reviewer_participants: Option<Vec<Participant>>,
}

#[ComplexObject]
impl StashPullRequest {
    async fn author(&self) -> Option<&Committer> {
        self.author_participant.as_ref()?.user.as_ref()
    }

    async fn reviewers(&self) -> Option<Vec<Option<&Committer>>> {
        self.reviewer_participants
            .as_ref()
            .map(|reviewers| reviewers.iter().map(|r| r.user.as_ref()).collect())
    }
}

/// Stash's paging envelope, mirrored verbatim.
#[derive(Debug, Clone, Deserialize, SimpleObject)]
#[graphql(concrete(name = "StashProjectResults", params(StashValue)))]
#[graphql(concrete(name = "StashRepoCommitResults", params(StashCommit)))]
#[graphql(concrete(name = "StashRepoPullRequestResults", params(StashPullRequest)))]
#[serde(rename_all = "camelCase")]
pub struct StashPage<T: OutputType> {
    pub size: Option<i32>,
    pub limit: Option<i32>,
    pub is_last_page: Option<bool>,
    pub start: Option<i32>,
    pub next_page_start: Option<i32>,
    pub values: Option<Vec<T>>,
}

pub type StashProjectResults = StashPage<StashValue>;
pub type StashRepoCommitResults = StashPage<StashCommit>;
pub type StashRepoPullRequestResults = StashPage<StashPullRequest>;
