//! JQL (Jira Query Language) composition.

use chrono::{Datelike, NaiveDate};

/// Fields matched against the username in a user-activity search, with the
/// operator each one takes. Text fields use `~` (contains), user fields `=`.
const USER_MATCH_TARGETS: [(&str, &str); 6] = [
    ("summary", "~"),
    ("description", "~"),
    ("comment", "~"),
    ("creator", "="),
    ("assignee", "="),
    ("reporter", "="),
];

/// Words Jira reserves in JQL. A value spelled like one of these (in any
/// case) must be quoted or it is read as a keyword.
const RESERVED_WORDS: &[&str] = &[
    "a", "abort", "access", "add", "after", "alias", "all", "alter", "an", "and", "any", "are",
    "as", "asc", "audit", "avg", "before", "begin", "between", "boolean", "break", "by", "byte",
    "catch", "cf", "changed", "char", "character", "check", "checkpoint", "collate", "collation",
    "column", "commit", "connect", "continue", "count", "create", "current", "date", "decimal",
    "declare", "decrement", "default", "defaults", "define", "delete", "delimiter", "desc",
    "difference", "distinct", "divide", "do", "double", "drop", "during", "else", "empty",
    "encoding", "end", "equals", "escape", "exclusive", "exec", "execute", "exists", "explain",
    "false", "fetch", "file", "field", "first", "float", "for", "from", "function", "go", "goto",
    "grant", "greater", "group", "having", "identified", "if", "immediate", "in", "increment",
    "index", "initial", "inner", "inout", "input", "insert", "int", "integer", "intersect",
    "intersection", "into", "is", "isempty", "isnull", "join", "last", "left", "less", "like",
    "limit", "lock", "long", "max", "min", "minus", "mode", "modify", "modulo", "more",
    "multiply", "next", "noaudit", "not", "notin", "nowait", "null", "number", "object", "of",
    "on", "option", "or", "order", "outer", "output", "power", "previous", "prior", "privileges",
    "public", "raise", "raw", "remainder", "rename", "resource", "return", "returns", "revoke",
    "right", "row", "rowid", "rownum", "rows", "select", "session", "set", "share", "size",
    "sqrt", "start", "strict", "string", "subtract", "sum", "synonym", "table", "then", "to",
    "trans", "transaction", "trigger", "true", "uid", "union", "unique", "update", "user",
    "validate", "values", "view", "was", "when", "whenever", "where", "while", "with",
];

fn is_reserved(value: &str) -> bool {
    RESERVED_WORDS
        .iter()
        .any(|word| word.eq_ignore_ascii_case(value))
}

/// Render a value for embedding in JQL.
///
/// Plain tokens (`ABC`, `jdoe`, `2023-05-01`) stay bare. Reserved words and
/// anything else are quoted with `"` and `\` escaped.
pub fn jql_value(value: &str) -> String {
    let bare = !value.is_empty()
        && !is_reserved(value)
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if bare {
        value.to_string()
    } else {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

/// `project=<key>`, the filter behind `projectIssues`.
pub fn project_jql(project: &str) -> String {
    format!("project={}", jql_value(project))
}

/// Inclusive created-or-updated date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// The fiscal year window used when no range is given: May 1 of the
    /// previous year through April 30 of `today`'s year.
    pub fn fiscal_year(today: NaiveDate) -> Option<Self> {
        let year = today.year();
        Some(Self {
            start: NaiveDate::from_ymd_opt(year - 1, 5, 1)?,
            end: NaiveDate::from_ymd_opt(year, 4, 30)?,
        })
    }

    /// Fill whichever bound is missing from the fiscal year default.
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Option<Self> {
        let default = Self::fiscal_year(today)?;
        Some(Self {
            start: start.unwrap_or(default.start),
            end: end.unwrap_or(default.end),
        })
    }

    fn clause(&self) -> String {
        let start = self.start.format("%Y-%m-%d");
        let end = self.end.format("%Y-%m-%d");
        format!(
            "(created >= {start} AND created <= {end} OR updated >= {start} AND updated <= {end})"
        )
    }
}

/// Search for issues in one project that a user touched within a window.
#[derive(Debug, Clone)]
pub struct UserIssueSearch<'a> {
    pub project: &'a str,
    pub username: &'a str,
    pub window: DateWindow,
}

impl UserIssueSearch<'_> {
    /// Compose the JQL: the date range, restricted to the project, and any of
    /// the six user match targets, newest updates last.
    pub fn to_jql(&self) -> String {
        let user = jql_value(self.username);
        let targets = USER_MATCH_TARGETS
            .iter()
            .map(|(field, op)| format!("{} {} {}", field, op, user))
            .collect::<Vec<_>>()
            .join(" OR ");

        format!(
            "{} AND project = {} AND ({}) ORDER BY updated",
            self.window.clause(),
            jql_value(self.project),
            targets
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fiscal_year_window() {
        for today in [date(2023, 1, 10), date(2023, 6, 15), date(2023, 12, 31)] {
            let window = DateWindow::fiscal_year(today).unwrap();
            assert_eq!(window.start, date(2022, 5, 1));
            assert_eq!(window.end, date(2023, 4, 30));
        }
    }

    #[test]
    fn test_resolve_keeps_explicit_bounds() {
        let today = date(2024, 3, 1);
        let window = DateWindow::resolve(Some(date(2024, 1, 1)), None, today).unwrap();
        assert_eq!(window.start, date(2024, 1, 1));
        assert_eq!(window.end, date(2024, 4, 30));

        let window = DateWindow::resolve(None, Some(date(2024, 2, 1)), today).unwrap();
        assert_eq!(window.start, date(2023, 5, 1));
        assert_eq!(window.end, date(2024, 2, 1));
    }

    #[test]
    fn test_jql_value_quoting() {
        assert_eq!(jql_value("ABC"), "ABC");
        assert_eq!(jql_value("john.doe"), "john.doe");
        assert_eq!(jql_value("jane@example.com"), "\"jane@example.com\"");
        assert_eq!(jql_value("Jane Doe"), "\"Jane Doe\"");
        assert_eq!(jql_value(r#"x" OR project = "Y"#), r#""x\" OR project = \"Y""#);
        assert_eq!(jql_value(""), "\"\"");
    }

    #[test]
    fn test_jql_value_quotes_reserved_words() {
        assert_eq!(jql_value("empty"), "\"empty\"");
        assert_eq!(jql_value("null"), "\"null\"");
        assert_eq!(jql_value("and"), "\"and\"");
        assert_eq!(jql_value("ORDER"), "\"ORDER\"");
        assert_eq!(jql_value("emptyset"), "emptyset");
    }

    #[test]
    fn test_user_issue_search_quotes_reserved_username() {
        let search = UserIssueSearch {
            project: "ABC",
            username: "empty",
            window: DateWindow::fiscal_year(date(2023, 6, 1)).unwrap(),
        };
        let jql = search.to_jql();
        assert!(jql.contains(r#"assignee = "empty""#));
        assert!(!jql.contains("= empty"));
    }

    #[test]
    fn test_project_jql() {
        assert_eq!(project_jql("ABC"), "project=ABC");
    }

    #[test]
    fn test_user_issue_search_jql() {
        let search = UserIssueSearch {
            project: "ABC",
            username: "jdoe",
            window: DateWindow {
                start: date(2022, 5, 1),
                end: date(2023, 4, 30),
            },
        };

        assert_eq!(
            search.to_jql(),
            "(created >= 2022-05-01 AND created <= 2023-04-30 OR updated >= 2022-05-01 AND updated <= 2023-04-30) \
             AND project = ABC \
             AND (summary ~ jdoe OR description ~ jdoe OR comment ~ jdoe OR creator = jdoe OR assignee = jdoe OR reporter = jdoe) \
             ORDER BY updated"
        );
    }

    #[test]
    fn test_user_issue_search_has_single_project_clause() {
        let search = UserIssueSearch {
            project: "ABC",
            username: "jdoe",
            window: DateWindow::fiscal_year(date(2023, 6, 1)).unwrap(),
        };
        assert_eq!(search.to_jql().matches("project =").count(), 1);
    }
}
