//! Upstream services.
//!
//! Clients for the Jira and Stash REST APIs, the shared HTTP plumbing they
//! sit on, and JQL composition.

pub mod jira_client;
pub mod jql;
pub mod rest_client;
pub mod stash_client;

pub use jira_client::JiraClient;
pub use rest_client::{RestClient, RestClientConfig, UpstreamRequest};
pub use stash_client::{PageParams, StashClient};
