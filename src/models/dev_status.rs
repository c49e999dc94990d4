//! Commits linked to a Jira issue through the dev-status integration.

use super::issue::Person;
use super::lenient_string;
use async_graphql::SimpleObject;
use serde::Deserialize;

/// A commit as the dev-status endpoint reports it.
#[derive(Debug, Clone, Default, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    pub display_id: Option<String>,
    pub author_timestamp: Option<String>,
    pub url: Option<String>,
    pub author: Option<Person>,
    pub message: Option<String>,
}

/// A repository holding commits that reference the issue.
#[derive(Debug, Clone, Default, Deserialize, SimpleObject)]
pub struct Repository {
    pub name: Option<String>,
    pub url: Option<String>,
    pub commits: Option<Vec<Commit>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DevStatusDetail {
    #[serde(default)]
    repositories: Vec<Repository>,
}

/// Jira returns one `detail` entry per linked Stash instance; older
/// deployments return a single object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum DetailEntries {
    Many(Vec<DevStatusDetail>),
    One(DevStatusDetail),
}

/// Body of `GET /rest/dev-status/1.0/issue/detail`.
#[derive(Debug, Clone, Deserialize)]
pub struct DevStatusResponse {
    #[serde(default)]
    detail: Option<DetailEntries>,
}

impl DevStatusResponse {
    /// The `detail.repositories` sub-path, flattened across instances.
    pub fn into_repositories(self) -> Vec<Repository> {
        match self.detail {
            Some(DetailEntries::Many(entries)) => entries
                .into_iter()
                .flat_map(|entry| entry.repositories)
                .collect(),
            Some(DetailEntries::One(entry)) => entry.repositories,
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_array_is_flattened() {
        let body = serde_json::json!({
            "errors": [],
            "detail": [
                {
                    "repositories": [{
                        "name": "svc",
                        "url": "https://stash.example.com/projects/TEAM/repos/svc/browse",
                        "commits": [{
                            "id": "8f2e1c0d",
                            "displayId": "8f2e1c0",
                            "authorTimestamp": "2023-06-15T10:00:00.000+0000",
                            "url": "https://stash.example.com/projects/TEAM/repos/svc/commits/8f2e1c0d",
                            "author": { "name": "Jane Doe" },
                            "message": "ABC-1 fix login"
                        }]
                    }],
                    "_instance": { "type": "stash" }
                },
                { "repositories": [{ "name": "web", "commits": [] }] }
            ]
        });

        let repos = serde_json::from_value::<DevStatusResponse>(body)
            .unwrap()
            .into_repositories();
        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0].name.as_deref(), Some("svc"));
        let commit = &repos[0].commits.as_ref().unwrap()[0];
        assert_eq!(commit.display_id.as_deref(), Some("8f2e1c0"));
        assert_eq!(
            commit.author.as_ref().and_then(|a| a.name.as_deref()),
            Some("Jane Doe")
        );
        assert_eq!(repos[1].name.as_deref(), Some("web"));
    }

    #[test]
    fn test_detail_object_and_missing_detail() {
        let body = serde_json::json!({ "detail": { "repositories": [{ "name": "svc" }] } });
        let repos = serde_json::from_value::<DevStatusResponse>(body)
            .unwrap()
            .into_repositories();
        assert_eq!(repos.len(), 1);

        let body = serde_json::json!({ "errors": [] });
        let repos = serde_json::from_value::<DevStatusResponse>(body)
            .unwrap()
            .into_repositories();
        assert!(repos.is_empty());
    }
}
