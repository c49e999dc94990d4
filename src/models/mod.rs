//! Object types exposed through the GraphQL schema.
//!
//! These models are read-through projections of upstream JSON: each one
//! derives `Deserialize` for the Jira or Stash payload and `SimpleObject`
//! for the GraphQL surface. Every field is optional so a key missing from the
//! upstream body simply resolves to `null`.

pub mod dev_status;
pub mod issue;
pub mod stash;

// Re-exports for convenient access
pub use dev_status::{Commit, DevStatusResponse, Repository};
pub use issue::{Comment, CommentResults, Issue, IssueFields, IssueResults, Person};
pub use stash::{
    Committer, StashCommit, StashPage, StashProjectResults, StashPullRequest,
    StashRepoCommitResults, StashRepoPullRequestResults, StashValue,
};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize an identifier that upstreams send either as a string or as a
/// number. Numbers keep their decimal form.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "lenient_string")]
        id: Option<String>,
    }

    #[test]
    fn test_lenient_string_accepts_numbers() {
        let h: Holder = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(h.id.as_deref(), Some("42"));

        let h: Holder = serde_json::from_str(r#"{"id": "10001"}"#).unwrap();
        assert_eq!(h.id.as_deref(), Some("10001"));
    }

    #[test]
    fn test_lenient_string_missing_or_null() {
        let h: Holder = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(h.id, None);

        let h: Holder = serde_json::from_str(r#"{"id": null}"#).unwrap();
        assert_eq!(h.id, None);
    }
}
