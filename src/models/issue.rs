//! Jira issue and comment models.

use super::lenient_string;
use async_graphql::SimpleObject;
use serde::Deserialize;

/// A Jira user reference.
#[derive(Debug, Clone, Default, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub name: Option<String>,
    pub display_name: Option<String>,
}

/// The nested `fields` object of a Jira issue.
#[derive(Debug, Clone, Default, Deserialize, SimpleObject)]
#[graphql(name = "Fields")]
pub struct IssueFields {
    pub assignee: Option<Person>,
    pub reporter: Option<Person>,
    pub creator: Option<Person>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
}

/// A Jira issue. `fields` is kept nested the way Jira returns it.
#[derive(Debug, Clone, Default, Deserialize, SimpleObject)]
pub struct Issue {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    pub key: Option<String>,
    pub fields: Option<IssueFields>,
}

/// Body of `GET /rest/api/latest/search`.
#[derive(Debug, Clone, Default, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct IssueResults {
    pub start_at: Option<i32>,
    pub max_results: Option<i32>,
    pub total: Option<i32>,
    pub issues: Option<Vec<Issue>>,
}

/// A remark on a Jira issue.
#[derive(Debug, Clone, Default, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    pub author: Option<Person>,
    pub update_author: Option<Person>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub body: Option<String>,
}

/// Body of `GET /rest/api/latest/issue/{key}/comment`.
#[derive(Debug, Clone, Default, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct CommentResults {
    pub start_at: Option<i32>,
    pub max_results: Option<i32>,
    pub total: Option<i32>,
    pub comments: Option<Vec<Comment>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_search_deserialization() {
        let body = serde_json::json!({
            "expand": "schema,names",
            "startAt": 0,
            "maxResults": 50,
            "total": 1,
            "issues": [{
                "id": "10001",
                "key": "ABC-1",
                "self": "https://jira.example.com/rest/api/latest/issue/10001",
                "fields": {
                    "summary": "Broken login",
                    "created": "2023-06-15T10:00:00.000+0000",
                    "assignee": { "name": "jdoe", "displayName": "Jane Doe" },
                    "reporter": null
                }
            }]
        });

        let results: IssueResults = serde_json::from_value(body).unwrap();
        assert_eq!(results.max_results, Some(50));
        assert_eq!(results.start_at, Some(0));

        let issues = results.issues.unwrap();
        let fields = issues[0].fields.as_ref().unwrap();
        assert_eq!(issues[0].key.as_deref(), Some("ABC-1"));
        assert_eq!(fields.summary.as_deref(), Some("Broken login"));
        assert_eq!(
            fields.assignee.as_ref().and_then(|p| p.display_name.as_deref()),
            Some("Jane Doe")
        );
        assert!(fields.reporter.is_none());
        assert!(fields.description.is_none());
    }

    #[test]
    fn test_comment_deserialization() {
        let body = serde_json::json!({
            "startAt": 0,
            "maxResults": 1048576,
            "total": 1,
            "comments": [{
                "id": "20001",
                "author": { "name": "jdoe", "displayName": "Jane Doe" },
                "updateAuthor": { "name": "asmith", "displayName": "Alex Smith" },
                "body": "Reproduced on staging",
                "created": "2023-06-16T09:30:00.000+0000",
                "updated": "2023-06-16T09:45:00.000+0000"
            }]
        });

        let results: CommentResults = serde_json::from_value(body).unwrap();
        let comment = &results.comments.unwrap()[0];
        assert_eq!(comment.id.as_deref(), Some("20001"));
        assert_eq!(
            comment.update_author.as_ref().and_then(|p| p.name.as_deref()),
            Some("asmith")
        );
    }
}
