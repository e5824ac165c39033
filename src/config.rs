// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Fetch configuration and the raw batch request document.
//!
//! [`FetchConfig`] is passed explicitly into every fetcher; nothing here reads
//! process-wide state. The batch types mirror the YAML consumed by the
//! `batch` subcommand and keep optional values flexible until
//! the normalizer validates them.

use serde::Deserialize;

use crate::{error::Error, retry::RetryConfig};

/// Settings shared by every fetch of one process.
///
/// # Examples
///
/// ```
/// use ghcard::FetchConfig;
///
/// let config: FetchConfig =
///     serde_yaml::from_str("multi_page_stars: true\n",).expect("valid configuration",);
/// assert!(config.multi_page_stars);
/// assert_eq!(config.retry.max_attempts, 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize,)]
#[serde(default)]
pub struct FetchConfig
{
    /// Follow repository pages past the first while every repository on the
    /// current page is starred.
    pub multi_page_stars: bool,
    /// Backoff for single API calls.
    pub retry:            RetryConfig,
}

/// Root batch document.
///
/// # Examples
///
/// ```
/// use ghcard::{CardKind, RequestConfig};
///
/// let yaml = r#"
/// requests:
///   - user: octocat
///     card: top_langs
///     exclude_repo: [dotfiles]
/// "#;
/// let config: RequestConfig = serde_yaml::from_str(yaml,).expect("valid configuration",);
/// assert_eq!(config.requests[0].card, CardKind::TopLangs);
/// ```
#[derive(Debug, Clone, Default, Deserialize,)]
pub struct RequestConfig
{
    #[serde(default)]
    pub fetch:    FetchConfig,
    #[serde(default)]
    pub requests: Vec<RequestEntry,>,
}

/// Raw request entry before normalization.
#[derive(Debug, Clone, PartialEq, Deserialize,)]
pub struct RequestEntry
{
    /// GitHub login to fetch.
    #[serde(alias = "username")]
    pub user:                         String,
    /// Data set to produce.
    pub card:                         CardKind,
    #[serde(default)]
    pub exclude_repo:                 Vec<String,>,
    #[serde(default)]
    pub size_weight:                  Option<f64,>,
    #[serde(default)]
    pub count_weight:                 Option<f64,>,
    #[serde(default)]
    pub include_all_commits:          Option<bool,>,
    #[serde(default)]
    pub include_merged_pull_requests: Option<bool,>,
    #[serde(default)]
    pub include_discussions:          Option<bool,>,
    #[serde(default)]
    pub include_discussions_answers:  Option<bool,>,
}

/// Data set produced for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize,)]
#[serde(rename_all = "snake_case")]
pub enum CardKind
{
    /// Contribution statistics.
    Stats,
    /// Weighted language ranking.
    #[serde(alias = "languages", alias = "top_languages")]
    TopLangs,
}

/// Parses a boolean flag the way workflow inputs spell them.
///
/// Blank input is `false`.
///
/// # Errors
///
/// Returns [`Error::Validation`] for anything other than
/// `true/false/1/0/yes/no` (case-insensitive).
pub fn parse_flag(value: &str,) -> Result<bool, Error,>
{
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" | "no" => Ok(false,),
        "true" | "1" | "yes" => Ok(true,),
        other => Err(Error::validation(format!("'{other}' is not a boolean value"),),),
    }
}
