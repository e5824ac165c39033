// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Query execution seam between the fetchers and the GitHub API.
//!
//! The fetchers only see [`QueryExecutor`]. [`OctocrabExecutor`] is the
//! production implementation: it owns the bearer credential and applies
//! [`retry_with_backoff`] to every call.

use std::future::Future;

use masterror::AppError;
use octocrab::Octocrab;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::{
    error::Error,
    query::QueryVariables,
    retry::{RetryConfig, retry_with_backoff},
};

/// Message returned when the commit search yields no total.
pub const TOTAL_COMMITS_UNAVAILABLE: &str = "Could not fetch total commits.";

/// Issues single requests against the GitHub API.
///
/// Implementations return the raw GraphQL body, including bodies that carry
/// an `errors` array. Only network and HTTP level failures are reported as
/// [`Error::Transport`].
pub trait QueryExecutor: Sync
{
    /// Executes one GraphQL document with the given variables.
    fn execute(
        &self,
        query: &str,
        variables: &QueryVariables<'_,>,
    ) -> impl Future<Output = Result<Value, Error,>,> + Send;

    /// Returns the all-time number of commits authored by `login`.
    fn count_commits(&self, login: &str,) -> impl Future<Output = Result<u64, Error,>,> + Send;
}

/// [`QueryExecutor`] backed by an authenticated [`Octocrab`] client.
#[derive(Clone,)]
pub struct OctocrabExecutor
{
    client: Octocrab,
    retry:  RetryConfig,
}

#[derive(Debug, Deserialize,)]
struct CommitSearch
{
    #[serde(default)]
    total_count: Option<u64,>,
}

impl std::fmt::Debug for OctocrabExecutor
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_,>,) -> std::fmt::Result
    {
        f.debug_struct("OctocrabExecutor",).field("retry", &self.retry,).finish_non_exhaustive()
    }
}

impl OctocrabExecutor
{
    /// Builds an executor authenticated with a personal access token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParameter`] for a blank token and
    /// [`Error::Transport`] when the HTTP client cannot be constructed.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ghcard::{OctocrabExecutor, RetryConfig};
    ///
    /// # async fn example() -> Result<(), ghcard::Error> {
    /// let token = std::env::var("GITHUB_TOKEN",).unwrap_or_default();
    /// let executor = OctocrabExecutor::new(&token, RetryConfig::default(),)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(token: &str, retry: RetryConfig,) -> Result<Self, Error,>
    {
        let token = token.trim();
        if token.is_empty() {
            return Err(Error::missing_parameter("token",),);
        }

        let client = Octocrab::builder().personal_token(token,).build().map_err(|e| {
            AppError::unauthorized(format!("failed to initialize GitHub client: {e}"),)
        },)?;

        Ok(Self::with_client(client, retry,),)
    }

    /// Wraps an already configured client.
    pub fn with_client(client: Octocrab, retry: RetryConfig,) -> Self
    {
        Self {
            client,
            retry,
        }
    }
}

impl QueryExecutor for OctocrabExecutor
{
    async fn execute(&self, query: &str, variables: &QueryVariables<'_,>,) -> Result<Value, Error,>
    {
        debug!(login = variables.login, after = ?variables.after, "executing GraphQL query");

        let payload = json!({ "query": query, "variables": variables });
        let payload = &payload;
        let client = &self.client;

        let body = retry_with_backoff(
            &self.retry,
            &format!("graphql userInfo for {}", variables.login),
            || async move {
                client.graphql::<Value,>(payload,).await.map_err(|e| {
                    AppError::service(format!("GitHub GraphQL request failed: {e}"),)
                },)
            },
        )
        .await?;

        Ok(body,)
    }

    async fn count_commits(&self, login: &str,) -> Result<u64, Error,>
    {
        debug!(login, "searching all-time commits");

        let query = format!("author:{login}");
        let parameters = [("q", query.as_str(),)];
        let parameters = &parameters;
        let client = &self.client;

        let search: CommitSearch = retry_with_backoff(
            &self.retry,
            &format!("commit search for {login}"),
            || async move {
                client.get("/search/commits", Some(parameters,),).await.map_err(|e| {
                    AppError::service(format!("GitHub commit search failed: {e}"),)
                },)
            },
        )
        .await?;

        search.total_count.ok_or_else(|| Error::GraphQlUnspecified {
            message: TOTAL_COMMITS_UNAVAILABLE.to_owned(),
        },)
    }
}
