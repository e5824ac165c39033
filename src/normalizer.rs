// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Validation of batch request documents.
//!
//! Every entry is checked before the first request is sent, so a typo in the
//! last entry does not waste the API calls of the ones before it.

use std::{fs, path::Path};

use regex::Regex;
use tracing::debug;

use crate::{
    config::{CardKind, FetchConfig, RequestConfig, RequestEntry},
    error::{self, Error},
    languages::LanguageWeights,
    stats::StatsOptions,
};

/// GitHub logins: alphanumerics and hyphens, no leading or trailing hyphen,
/// at most 39 characters.
const LOGIN_PATTERN: &str = r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,37}[A-Za-z0-9])?$";

/// Validated batch document.
#[derive(Debug, Clone, Default, PartialEq,)]
pub struct BatchDocument
{
    pub fetch:    FetchConfig,
    pub requests: Vec<CardRequest,>,
}

/// Validated request.
#[derive(Debug, Clone, PartialEq,)]
pub enum CardRequest
{
    Stats
    {
        user: String, options: StatsOptions,
    },
    TopLanguages
    {
        user: String, exclude_repo: Vec<String,>, weights: LanguageWeights,
    },
}

impl CardRequest
{
    pub fn user(&self,) -> &str
    {
        match self {
            Self::Stats {
                user, ..
            }
            | Self::TopLanguages {
                user, ..
            } => user,
        }
    }
}

/// Reads and validates a batch document from disk.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read, [`Error::Parse`] for
/// malformed YAML and [`Error::Validation`] or [`Error::MissingParameter`]
/// for invalid entries.
pub fn load_requests(path: &Path,) -> Result<BatchDocument, Error,>
{
    let contents = fs::read_to_string(path,).map_err(|source| error::io_error(path, source,),)?;
    parse_requests(&contents,)
}

/// Parses and validates a batch document from a YAML string.
///
/// # Errors
///
/// See [`load_requests`].
///
/// # Example
///
/// ```
/// use ghcard::{CardRequest, parse_requests};
///
/// let document = parse_requests("requests:\n  - user: octocat\n    card: stats\n",)?;
/// assert!(matches!(document.requests[0], CardRequest::Stats { .. }));
/// # Ok::<(), ghcard::Error>(())
/// ```
pub fn parse_requests(yaml: &str,) -> Result<BatchDocument, Error,>
{
    let config: RequestConfig = serde_yaml::from_str(yaml,)?;
    let login = Regex::new(LOGIN_PATTERN,)
        .map_err(|e| Error::validation(format!("invalid login pattern: {e}"),),)?;

    let requests = config
        .requests
        .iter()
        .enumerate()
        .map(|(index, entry,)| {
            normalize_entry(entry, &login,).map_err(|error| match error {
                Error::Validation {
                    message,
                } => Error::validation(format!("requests[{index}]: {message}"),),
                other => other,
            },)
        },)
        .collect::<Result<Vec<_,>, _,>>()?;

    debug!(requests = requests.len(), "batch document validated");
    Ok(BatchDocument {
        fetch: config.fetch,
        requests,
    },)
}

fn normalize_entry(entry: &RequestEntry, login: &Regex,) -> Result<CardRequest, Error,>
{
    let user = normalize_login(&entry.user, login,)?;
    let exclude_repo = normalize_exclusions(&entry.exclude_repo,);

    match entry.card {
        CardKind::Stats => {
            if entry.size_weight.is_some() || entry.count_weight.is_some() {
                return Err(Error::validation("weights only apply to top_langs requests",),);
            }
            Ok(CardRequest::Stats {
                user,
                options: StatsOptions {
                    include_all_commits: entry.include_all_commits.unwrap_or(false,),
                    exclude_repo,
                    include_merged_pull_requests: entry
                        .include_merged_pull_requests
                        .unwrap_or(false,),
                    include_discussions: entry.include_discussions.unwrap_or(false,),
                    include_discussions_answers: entry.include_discussions_answers.unwrap_or(false,),
                },
            },)
        }
        CardKind::TopLangs => {
            let defaults = LanguageWeights::default();
            let weights = LanguageWeights::new(
                entry.size_weight.unwrap_or(defaults.size_weight,),
                entry.count_weight.unwrap_or(defaults.count_weight,),
            )?;
            Ok(CardRequest::TopLanguages {
                user,
                exclude_repo,
                weights,
            },)
        }
    }
}

/// Trims and checks a login.
///
/// # Errors
///
/// Returns [`Error::MissingParameter`] when blank and [`Error::Validation`]
/// when the login contains characters GitHub does not allow.
fn normalize_login(input: &str, pattern: &Regex,) -> Result<String, Error,>
{
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::missing_parameter("user",),);
    }
    if !pattern.is_match(trimmed,) {
        return Err(Error::validation(format!("'{trimmed}' is not a valid GitHub login"),),);
    }
    Ok(trimmed.to_owned(),)
}

fn normalize_exclusions(names: &[String],) -> Vec<String,>
{
    names.iter().map(|name| name.trim(),).filter(|name| !name.is_empty(),).map(str::to_owned,).collect()
}
