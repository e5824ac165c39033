// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Rank scoring seam and the default scorer.

use serde::Serialize;

/// Counts handed to a [`Scorer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq,)]
pub struct RankInputs
{
    /// Whether `commits` is an all-time total rather than the yearly one.
    pub all_commits: bool,
    pub commits:     u64,
    pub prs:         u64,
    pub issues:      u64,
    pub reviews:     u64,
    pub repos:       u64,
    pub stars:       u64,
    pub followers:   u64,
}

/// Letter tier plus percentile in `[0, 100]`; lower percentiles are better.
#[derive(Debug, Clone, PartialEq, Serialize,)]
pub struct Rank
{
    pub level:      String,
    pub percentile: f64,
}

impl Default for Rank
{
    fn default() -> Self
    {
        Self {
            level: "C".to_owned(), percentile: 100.0,
        }
    }
}

/// Turns contribution counts into a [`Rank`].
pub trait Scorer
{
    fn score(&self, inputs: &RankInputs,) -> Rank;
}

impl<F,> Scorer for F
where
    F: Fn(&RankInputs,) -> Rank,
{
    fn score(&self, inputs: &RankInputs,) -> Rank
    {
        self(inputs,)
    }
}

const THRESHOLDS: [f64; 9] = [1.0, 12.5, 25.0, 37.5, 50.0, 62.5, 75.0, 87.5, 100.0];
const LEVELS: [&str; 9] = ["S", "A+", "A", "A-", "B+", "B", "B-", "C+", "C"];

/// Default scorer: weighted exponential CDFs for activity counts and
/// `x / (1 + x)` for stars and followers, each normalized by a median.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq,)]
pub struct ExponentialRank;

impl Scorer for ExponentialRank
{
    fn score(&self, inputs: &RankInputs,) -> Rank
    {
        let commits_median = if inputs.all_commits { 1_000.0 } else { 250.0 };
        let terms = [
            (2.0, exponential_cdf(inputs.commits as f64 / commits_median,),),
            (3.0, exponential_cdf(inputs.prs as f64 / 50.0,),),
            (1.0, exponential_cdf(inputs.issues as f64 / 25.0,),),
            (1.0, exponential_cdf(inputs.reviews as f64 / 2.0,),),
            (4.0, log_normal_cdf(inputs.stars as f64 / 50.0,),),
            (1.0, log_normal_cdf(inputs.followers as f64 / 10.0,),),
        ];

        let total_weight: f64 = terms.iter().map(|(weight, _,)| weight,).sum();
        let weighted: f64 = terms.iter().map(|(weight, value,)| weight * value,).sum();
        let percentile = (1.0 - weighted / total_weight) * 100.0;

        let level = THRESHOLDS
            .iter()
            .position(|threshold| percentile <= *threshold,)
            .map_or(LEVELS[LEVELS.len() - 1], |index| LEVELS[index],);

        Rank {
            level: level.to_owned(),
            percentile,
        }
    }
}

fn exponential_cdf(x: f64,) -> f64
{
    1.0 - 2f64.powf(-x,)
}

fn log_normal_cdf(x: f64,) -> f64
{
    x / (1.0 + x)
}
