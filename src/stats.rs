// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Consolidated contribution statistics for a single user.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    classify::{Subject, classify_errors},
    config::FetchConfig,
    error::Error,
    executor::QueryExecutor,
    model::StatsUser,
    rank::{Rank, RankInputs, Scorer},
    walker::{StatsToggles, WalkOutcome, walk_stats_pages},
};

/// Per-call options for [`fetch_stats`].
#[derive(Debug, Clone, Default, PartialEq, Eq,)]
pub struct StatsOptions
{
    /// Use the all-time commit search instead of the yearly contribution
    /// count.
    pub include_all_commits:          bool,
    /// Repositories left out of the star total.
    pub exclude_repo:                 Vec<String,>,
    pub include_merged_pull_requests: bool,
    pub include_discussions:          bool,
    pub include_discussions_answers:  bool,
}

impl StatsOptions
{
    pub fn toggles(&self,) -> StatsToggles
    {
        StatsToggles {
            include_merged_pull_requests: self.include_merged_pull_requests,
            include_discussions:          self.include_discussions,
            include_discussions_answers:  self.include_discussions_answers,
        }
    }
}

/// Snapshot of a user's contribution statistics.
#[derive(Debug, Clone, PartialEq, Serialize,)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsRecord
{
    #[serde(rename = "name")]
    pub display_name:               String,
    #[serde(rename = "totalPRs")]
    pub total_prs:                  u64,
    #[serde(rename = "totalPRsMerged")]
    pub total_prs_merged:           u64,
    /// Rounded share of merged pull requests; zero when there are none.
    #[serde(rename = "mergedPRsPercentage")]
    pub merged_prs_percentage:      u64,
    pub total_reviews:              u64,
    pub total_commits:              u64,
    pub total_issues:               u64,
    pub total_stars:                u64,
    pub total_discussions_started:  u64,
    pub total_discussions_answered: u64,
    pub contributed_to:             u64,
    pub rank:                       Rank,
}

/// Derives a [`StatisticsRecord`] from a merged stats payload.
///
/// `all_time_commits` replaces the yearly commit count when
/// `options.include_all_commits` is set. Toggle-gated counts are zero when
/// their toggle is off.
pub fn assemble_statistics<S,>(
    user: &StatsUser,
    options: &StatsOptions,
    all_time_commits: Option<u64,>,
    scorer: &S,
) -> StatisticsRecord
where
    S: Scorer + ?Sized,
{
    let total_commits = match all_time_commits {
        Some(total,) if options.include_all_commits => total,
        _ => user.contributions_collection.total_commit_contributions,
    };

    let total_prs = user.pull_requests.total_count;
    let total_prs_merged = if options.include_merged_pull_requests {
        user.merged_pull_requests.unwrap_or_default().total_count
    } else {
        0
    };

    let total_discussions_started = if options.include_discussions {
        user.repository_discussions.unwrap_or_default().total_count
    } else {
        0
    };
    let total_discussions_answered = if options.include_discussions_answers {
        user.repository_discussion_comments.unwrap_or_default().total_count
    } else {
        0
    };

    let hidden: HashSet<&str,> = options.exclude_repo.iter().map(String::as_str,).collect();
    let total_stars = user
        .repositories
        .nodes
        .iter()
        .filter(|node| !hidden.contains(node.name.as_str(),),)
        .map(|node| node.stargazer_count,)
        .sum();

    let total_reviews = user.contributions_collection.total_pull_request_review_contributions;
    let total_issues = user.open_issues.total_count + user.closed_issues.total_count;

    let rank = scorer.score(&RankInputs {
        all_commits: options.include_all_commits,
        commits: total_commits,
        prs: total_prs,
        issues: total_issues,
        reviews: total_reviews,
        repos: user.repositories.total_count,
        stars: total_stars,
        followers: user.followers.total_count,
    },);

    StatisticsRecord {
        display_name: user.display_name().to_owned(),
        total_prs,
        total_prs_merged,
        merged_prs_percentage: merged_percentage(total_prs_merged, total_prs,),
        total_reviews,
        total_commits,
        total_issues,
        total_stars,
        total_discussions_started,
        total_discussions_answered,
        contributed_to: user.repositories_contributed_to.total_count,
        rank,
    }
}

fn merged_percentage(merged: u64, total: u64,) -> u64
{
    if total == 0 {
        return 0;
    }
    (merged as f64 / total as f64 * 100.0).round() as u64
}

/// Fetches and assembles the statistics record for `username`.
///
/// # Errors
///
/// * [`Error::MissingParameter`] for a blank username, before any request.
/// * [`Error::UserNotFound`], [`Error::UpstreamMessage`] or
///   [`Error::GraphQlUnspecified`] when any stats page is rejected.
/// * [`Error::Transport`] and [`Error::Decode`] from the executor, including
///   the all-time commit search.
///
/// # Example
///
/// ```no_run
/// use ghcard::{ExponentialRank, FetchConfig, OctocrabExecutor, StatsOptions, fetch_stats};
///
/// # async fn example() -> Result<(), ghcard::Error> {
/// let config = FetchConfig::default();
/// let executor = OctocrabExecutor::new("ghp_token", config.retry.clone(),)?;
/// let record =
///     fetch_stats(&executor, &ExponentialRank, "octocat", &StatsOptions::default(), &config,)
///         .await?;
/// println!("{} has {} stars", record.display_name, record.total_stars);
/// # Ok(())
/// # }
/// ```
pub async fn fetch_stats<E, S,>(
    executor: &E,
    scorer: &S,
    username: &str,
    options: &StatsOptions,
    config: &FetchConfig,
) -> Result<StatisticsRecord, Error,>
where
    E: QueryExecutor,
    S: Scorer + ?Sized,
{
    let username = username.trim();
    if username.is_empty() {
        return Err(Error::missing_parameter("username",),);
    }

    let user = match walk_stats_pages(executor, username, options.toggles(), config,).await? {
        WalkOutcome::Complete(user,) => user,
        WalkOutcome::Rejected(errors,) => return Err(classify_errors(&errors, Subject::Stats,),),
    };

    let all_time_commits = if options.include_all_commits {
        let total = executor.count_commits(username,).await?;
        debug!(username, total, "all-time commits resolved");
        Some(total,)
    } else {
        None
    };

    let record = assemble_statistics(&user, options, all_time_commits, scorer,);
    info!(username, stars = record.total_stars, rank = %record.rank.level, "statistics assembled");
    Ok(record,)
}
