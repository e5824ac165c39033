// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Fetchers for GitHub profile card data.
//!
//! The library retrieves a user's public contribution metadata from the
//! GitHub GraphQL API and reduces it into two views: a weighted ranking of
//! the languages used across the user's owned repositories
//! ([`fetch_top_languages`]) and a consolidated statistics record with a
//! percentile rank ([`fetch_stats`]).
//!
//! Transport sits behind [`QueryExecutor`] and scoring behind [`Scorer`], so
//! both fetchers can be driven without network access.

mod batch;
mod classify;
mod config;
mod error;
mod executor;
mod languages;
mod model;
mod normalizer;
mod query;
mod rank;
mod retry;
mod stats;
#[cfg(test)]
mod testing;
mod walker;

pub use batch::{CardOutput, run_batch};
pub use classify::{NOT_FOUND_TYPE, Subject, classify_errors, wrap_message};
pub use config::{CardKind, FetchConfig, RequestConfig, RequestEntry, parse_flag};
pub use error::{Error, io_error};
pub use executor::{OctocrabExecutor, QueryExecutor};
pub use languages::{
    LanguageStat, LanguageWeights, TopLanguages, aggregate_languages, fetch_top_languages,
};
pub use model::{
    ContributionsCollection, DEFAULT_LANGUAGE_COLOR, GraphQlError, LanguageEdge, PageInfo,
    RepositoriesUser, RepositoryConnection, RepositoryNode, Response, StatsUser, TotalCount,
    UserData,
};
pub use normalizer::{BatchDocument, CardRequest, load_requests, parse_requests};
pub use query::{LANGUAGES_QUERY, QueryVariables, REPOSITORIES_QUERY, STATS_QUERY};
pub use rank::{ExponentialRank, Rank, RankInputs, Scorer};
pub use retry::{RetryConfig, retry_with_backoff};
pub use stats::{StatisticsRecord, StatsOptions, assemble_statistics, fetch_stats};
pub use walker::{StatsToggles, WalkOutcome, walk_stats_pages};
