// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Sequential execution of a validated batch document.

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

use crate::{
    error::Error,
    executor::QueryExecutor,
    languages::{TopLanguages, fetch_top_languages},
    normalizer::{BatchDocument, CardRequest},
    rank::Scorer,
    stats::{StatisticsRecord, fetch_stats},
};

/// Result of one batch request.
#[derive(Debug, Clone, PartialEq, Serialize,)]
#[serde(tag = "card", rename_all = "snake_case")]
pub enum CardOutput
{
    Stats
    {
        user: String, stats: StatisticsRecord,
    },
    TopLangs
    {
        user: String, languages: TopLanguages,
    },
}

/// Runs every request of `document` in order.
///
/// The first failing request aborts the batch; results of earlier requests
/// are discarded along with it.
///
/// # Errors
///
/// Propagates the error of the first failing fetch.
pub async fn run_batch<E, S,>(
    executor: &E,
    scorer: &S,
    document: &BatchDocument,
) -> Result<Vec<CardOutput,>, Error,>
where
    E: QueryExecutor,
    S: Scorer + ?Sized,
{
    let pb = ProgressBar::new(document.requests.len() as u64,);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.yellow} [{elapsed_precise}] {pos}/{len} {msg}",)
            .unwrap_or_else(|_| ProgressStyle::default_bar(),),
    );

    let mut outputs = Vec::with_capacity(document.requests.len(),);
    for request in &document.requests {
        pb.set_message(format!("fetching {}...", request.user()),);

        let output = match request {
            CardRequest::Stats {
                user,
                options,
            } => CardOutput::Stats {
                user:  user.clone(),
                stats: fetch_stats(executor, scorer, user, options, &document.fetch,).await?,
            },
            CardRequest::TopLanguages {
                user,
                exclude_repo,
                weights,
            } => CardOutput::TopLangs {
                user:      user.clone(),
                languages: fetch_top_languages(executor, user, exclude_repo, *weights,).await?,
            },
        };

        outputs.push(output,);
        pb.inc(1,);
    }

    pb.finish_and_clear();
    info!(requests = outputs.len(), "batch complete");
    Ok(outputs,)
}
