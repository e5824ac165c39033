// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Weighted ranking of the languages used across a user's repositories.
//!
//! Per-repository language edges are merged by name into one accumulator per
//! language, then scored as `size^size_weight * count^count_weight` and
//! sorted by that score, highest first.

use std::collections::{HashMap, HashSet};

use serde::{Serialize, ser::SerializeMap};
use tracing::{debug, warn};

use crate::{
    classify::{Subject, classify_errors},
    error::Error,
    executor::QueryExecutor,
    model::{GraphQlError, RepositoriesUser, RepositoryNode, Response, UserData},
    query::{LANGUAGES_QUERY, QueryVariables},
};

/// Exponents applied to byte size and repository count.
#[derive(Debug, Clone, Copy, PartialEq,)]
pub struct LanguageWeights
{
    pub size_weight:  f64,
    pub count_weight: f64,
}

impl LanguageWeights
{
    /// Builds weights after checking both exponents.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first exponent that is NaN,
    /// infinite or negative.
    ///
    /// # Example
    ///
    /// ```
    /// use ghcard::LanguageWeights;
    ///
    /// assert!(LanguageWeights::new(1.0, 0.5,).is_ok());
    /// assert!(LanguageWeights::new(f64::NAN, 0.0,).is_err());
    /// ```
    pub fn new(size_weight: f64, count_weight: f64,) -> Result<Self, Error,>
    {
        Ok(Self {
            size_weight:  check_weight(size_weight, "size_weight",)?,
            count_weight: check_weight(count_weight, "count_weight",)?,
        },)
    }
}

fn check_weight(value: f64, field: &str,) -> Result<f64, Error,>
{
    if !value.is_finite() || value < 0.0 {
        return Err(Error::validation(format!("{field} must be a finite, non-negative number"),),);
    }
    Ok(value,)
}

impl Default for LanguageWeights
{
    /// Pure byte-size ranking.
    fn default() -> Self
    {
        Self {
            size_weight: 1.0, count_weight: 0.0,
        }
    }
}

/// Aggregated record for one language.
#[derive(Debug, Clone, PartialEq, Serialize,)]
pub struct LanguageStat
{
    pub name:  String,
    pub color: String,
    /// Weighted comparison score. Equals the byte total under default
    /// weights.
    pub size:  f64,
    /// Number of repositories that contributed to this language.
    pub count: u64,
}

/// Languages ordered by weighted size, highest first.
///
/// Serializes as a JSON object keyed by language name in ranking order.
#[derive(Debug, Clone, Default, PartialEq,)]
pub struct TopLanguages
{
    entries: Vec<LanguageStat,>,
}

impl TopLanguages
{
    /// Looks up a language by exact name.
    pub fn get(&self, name: &str,) -> Option<&LanguageStat,>
    {
        self.entries.iter().find(|entry| entry.name == name,)
    }

    pub fn iter(&self,) -> impl Iterator<Item = &LanguageStat,>
    {
        self.entries.iter()
    }

    pub fn len(&self,) -> usize
    {
        self.entries.len()
    }

    pub fn is_empty(&self,) -> bool
    {
        self.entries.is_empty()
    }

    /// Language names in ranking order.
    pub fn names(&self,) -> Vec<&str,>
    {
        self.entries.iter().map(|entry| entry.name.as_str(),).collect()
    }
}

impl Serialize for TopLanguages
{
    fn serialize<S,>(&self, serializer: S,) -> Result<S::Ok, S::Error,>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len(),),)?;
        for entry in &self.entries {
            map.serialize_entry(&entry.name, entry,)?;
        }
        map.end()
    }
}

struct Accumulator<'a,>
{
    name:  &'a str,
    color: &'a str,
    size:  u64,
    count: u64,
    /// Index of the last repository counted for this language.
    last:  usize,
}

/// Merges language edges across `repositories` into a weighted ranking.
///
/// Repositories whose name appears in `exclude` (exact, case-sensitive) are
/// dropped first, then repositories without edges. Every edge adds its bytes
/// to the accumulator of its language. The count goes up once per repository
/// that lists the language, however many edges that repository carries for
/// it, so it never exceeds the number of repositories examined.
///
/// Sorting uses the stable `slice::sort_by`, so equal scores keep the order
/// in which their languages were first seen.
///
/// # Example
///
/// ```
/// use ghcard::{LanguageWeights, aggregate_languages};
///
/// let ranking = aggregate_languages(&[], &[], LanguageWeights::default(),);
/// assert!(ranking.is_empty());
/// ```
pub fn aggregate_languages(
    repositories: &[RepositoryNode],
    exclude: &[String],
    weights: LanguageWeights,
) -> TopLanguages
{
    let hidden: HashSet<&str,> = exclude.iter().map(String::as_str,).collect();

    let mut slots: HashMap<&str, usize,> = HashMap::new();
    let mut totals: Vec<Accumulator<'_,>,> = Vec::new();

    let edges = repositories
        .iter()
        .filter(|repository| !hidden.contains(repository.name.as_str(),),)
        .filter(|repository| !repository.language_edges.is_empty(),)
        .enumerate()
        .flat_map(|(index, repository,)| {
            repository.language_edges.iter().map(move |edge| (index, edge,),)
        },);

    for (index, edge,) in edges {
        match slots.get(edge.name.as_str(),) {
            Some(&slot,) => {
                let total = &mut totals[slot];
                total.size = total.size.saturating_add(edge.size_bytes,);
                if total.last != index {
                    total.count += 1;
                    total.last = index;
                }
            }
            None => {
                slots.insert(edge.name.as_str(), totals.len(),);
                totals.push(Accumulator {
                    name:  edge.name.as_str(),
                    color: edge.color.as_str(),
                    size:  edge.size_bytes,
                    count: 1,
                    last:  index,
                },);
            }
        }
    }

    let mut entries: Vec<LanguageStat,> = totals
        .into_iter()
        .map(|total| LanguageStat {
            name:  total.name.to_owned(),
            color: total.color.to_owned(),
            size:  weighted_size(total.size, total.count, weights,),
            count: total.count,
        },)
        .collect();
    entries.sort_by(|a, b| b.size.total_cmp(&a.size,),);

    TopLanguages {
        entries,
    }
}

fn weighted_size(size: u64, count: u64, weights: LanguageWeights,) -> f64
{
    (size as f64).powf(weights.size_weight,) * (count as f64).powf(weights.count_weight,)
}

/// Fetches the owned, non-fork repositories of `username` (one page) and
/// ranks their languages.
///
/// # Errors
///
/// * [`Error::MissingParameter`] for a blank username, before any request.
/// * [`Error::UserNotFound`], [`Error::UpstreamMessage`] or
///   [`Error::GraphQlUnspecified`] when the API rejects the query.
/// * [`Error::Transport`] and [`Error::Decode`] from the executor.
pub async fn fetch_top_languages<E,>(
    executor: &E,
    username: &str,
    exclude: &[String],
    weights: LanguageWeights,
) -> Result<TopLanguages, Error,>
where
    E: QueryExecutor,
{
    let username = username.trim();
    if username.is_empty() {
        return Err(Error::missing_parameter("username",),);
    }

    let body = executor.execute(LANGUAGES_QUERY, &QueryVariables::for_login(username,),).await?;

    let user = match Response::<UserData<RepositoriesUser,>,>::from_value(body,)? {
        Response::Data(UserData {
            user: Some(user,),
        },) => user,
        Response::Data(UserData {
            user: None,
        },) => {
            let missing = GraphQlError {
                kind:    Some(crate::classify::NOT_FOUND_TYPE.to_owned(),),
                message: None,
            };
            return Err(classify_errors(&[missing], Subject::Languages,),);
        }
        Response::Errors(errors,) => {
            warn!(username, ?errors, "language query rejected");
            return Err(classify_errors(&errors, Subject::Languages,),);
        }
    };

    let ranking = aggregate_languages(&user.repositories.nodes, exclude, weights,);
    debug!(
        username,
        repositories = user.repositories.nodes.len(),
        languages = ranking.len(),
        "languages aggregated"
    );
    Ok(ranking,)
}

#[cfg(test)]
mod tests
{
    use proptest::prelude::*;

    use super::*;
    use crate::{
        model::LanguageEdge,
        testing::{ScriptedExecutor, error_body, languages_page, with_languages},
    };

    fn repository(name: &str, edges: &[(&str, u64,)],) -> RepositoryNode
    {
        RepositoryNode {
            name:            name.to_owned(),
            stargazer_count: 0,
            language_edges:  edges
                .iter()
                .map(|(language, size,)| LanguageEdge {
                    size_bytes: *size,
                    name:       (*language).to_owned(),
                    color:      "#000000".to_owned(),
                },)
                .collect(),
        }
    }

    #[test]
    fn merges_same_language_across_repositories()
    {
        let repositories = [
            repository("scripts", &[("Python", 300,)],),
            repository("service", &[("Python", 200,), ("Go", 100,)],),
        ];

        let ranking = aggregate_languages(&repositories, &[], LanguageWeights::default(),);

        let python = ranking.get("Python",).expect("expected Python",);
        assert_eq!(python.size, 500.0);
        assert_eq!(python.count, 2);
        let go = ranking.get("Go",).expect("expected Go",);
        assert_eq!(go.size, 100.0);
        assert_eq!(go.count, 1);
        assert_eq!(ranking.names(), vec!["Python", "Go"]);
    }

    #[test]
    fn duplicate_edges_in_one_repository_count_once()
    {
        let repositories =
            [repository("one", &[("Go", 10,), ("Go", 5,)],), repository("two", &[("Go", 1,)],)];

        let ranking = aggregate_languages(&repositories, &[], LanguageWeights::default(),);

        let go = ranking.get("Go",).expect("expected Go",);
        assert_eq!(go.size, 16.0);
        assert_eq!(go.count, 2);

        let single = aggregate_languages(&repositories[..1], &[], LanguageWeights::default(),);
        let go = single.get("Go",).expect("expected Go",);
        assert_eq!(go.size, 15.0);
        assert_eq!(go.count, 1);
    }

    #[test]
    fn weights_reject_nan_infinite_and_negative_values()
    {
        assert_eq!(
            LanguageWeights::new(0.5, 2.0,).expect("expected weights",),
            LanguageWeights {
                size_weight: 0.5, count_weight: 2.0,
            }
        );
        for (size, count,) in [(f64::NAN, 0.0,), (1.0, f64::INFINITY,), (-0.5, 0.0,), (1.0, -1.0,)] {
            let error = LanguageWeights::new(size, count,).expect_err("expected rejection",);
            assert!(matches!(error, Error::Validation { .. }), "{size} {count}");
        }
    }

    #[test]
    fn excluded_repositories_contribute_nothing()
    {
        let repositories = [
            repository("scripts", &[("Python", 300,)],),
            repository("service", &[("Python", 200,), ("Go", 100,)],),
        ];

        let ranking = aggregate_languages(
            &repositories,
            &["service".to_owned()],
            LanguageWeights::default(),
        );

        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking.get("Python",).map(|stat| stat.size), Some(300.0));
        assert!(ranking.get("Go",).is_none());
    }

    #[test]
    fn exclusion_is_case_sensitive()
    {
        let repositories = [repository("Service", &[("Go", 100,)],)];
        let ranking = aggregate_languages(
            &repositories,
            &["service".to_owned()],
            LanguageWeights::default(),
        );
        assert_eq!(ranking.len(), 1);
    }

    #[test]
    fn count_weight_favours_widely_used_languages()
    {
        let repositories = [
            repository("a", &[("C", 1_000,)],),
            repository("b", &[("Rust", 300,)],),
            repository("c", &[("Rust", 300,)],),
            repository("d", &[("Rust", 300,)],),
        ];
        let weights = LanguageWeights {
            size_weight: 0.5, count_weight: 0.5,
        };

        let ranking = aggregate_languages(&repositories, &[], weights,);

        assert_eq!(ranking.names(), vec!["Rust", "C"]);
        let rust = ranking.get("Rust",).expect("expected Rust",);
        assert!((rust.size - (900f64.sqrt() * 3f64.sqrt())).abs() < 1e-9);
    }

    #[test]
    fn ties_keep_first_seen_order()
    {
        let repositories = [
            repository("a", &[("Lua", 50,)],),
            repository("b", &[("Nix", 50,)],),
        ];
        let ranking = aggregate_languages(&repositories, &[], LanguageWeights::default(),);
        assert_eq!(ranking.names(), vec!["Lua", "Nix"]);
    }

    #[test]
    fn serializes_as_ordered_object()
    {
        let repositories = [repository("a", &[("Go", 10,), ("Rust", 20,)],)];
        let ranking = aggregate_languages(&repositories, &[], LanguageWeights::default(),);

        let json = serde_json::to_string(&ranking,).expect("serialization failed",);
        assert!(json.starts_with(r#"{"Rust":{"name":"Rust""#));
        assert!(json.contains(r#""count":1"#));
    }

    #[tokio::test]
    async fn empty_username_fails_without_network_calls()
    {
        let executor = ScriptedExecutor::new(Vec::new(),);

        let error = fetch_top_languages(&executor, "  ", &[], LanguageWeights::default(),)
            .await
            .expect_err("expected missing parameter",);

        assert!(matches!(error, Error::MissingParameter { ref parameter } if parameter == "username"));
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn fetch_ranks_languages_from_single_page()
    {
        let executor = ScriptedExecutor::new(vec![languages_page(vec![
            with_languages("web", &[("TypeScript", 900,), ("CSS", 100,)],),
            with_languages("empty", &[],),
            with_languages("cli", &[("Rust", 1_200,)],),
        ],)],);

        let ranking = fetch_top_languages(&executor, "octocat", &[], LanguageWeights::default(),)
            .await
            .expect("expected ranking",);

        assert_eq!(ranking.names(), vec!["Rust", "TypeScript", "CSS"]);
        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].query, LANGUAGES_QUERY);
        assert_eq!(calls[0].login, "octocat");
    }

    #[tokio::test]
    async fn upstream_not_found_is_typed()
    {
        let executor = ScriptedExecutor::new(vec![error_body(
            Some("NOT_FOUND",),
            Some("Could not resolve to a User with the login of 'ghost'.",),
        )],);

        let error = fetch_top_languages(&executor, "ghost", &[], LanguageWeights::default(),)
            .await
            .expect_err("expected user not found",);

        assert_eq!(error.to_string(), "Could not resolve to a User with the login of 'ghost'.");
        assert!(matches!(error, Error::UserNotFound { .. }));
    }

    #[tokio::test]
    async fn unspecified_upstream_error_names_language_data()
    {
        let executor = ScriptedExecutor::new(vec![error_body(None, None,)],);

        let error = fetch_top_languages(&executor, "octocat", &[], LanguageWeights::default(),)
            .await
            .expect_err("expected unspecified error",);

        assert!(matches!(error, Error::GraphQlUnspecified { ref message } if message.contains("language data")));
    }

    fn repositories_strategy() -> impl Strategy<Value = Vec<RepositoryNode,>,>
    {
        let language = prop::sample::select(vec!["C", "Go", "Rust", "Python", "Zig"],);
        let edges = prop::collection::vec((language, 0u64..10_000,), 0..5,);
        prop::collection::vec(edges, 0..12,).prop_map(|repos| {
            repos
                .into_iter()
                .enumerate()
                .map(|(index, edges,)| repository(&format!("repo-{index}"), &edges,),)
                .collect()
        },)
    }

    fn raw_totals(repositories: &[RepositoryNode],) -> HashMap<String, (u64, u64,),>
    {
        let mut totals: HashMap<String, (u64, u64,),> = HashMap::new();
        for repository in repositories {
            let mut seen: HashSet<&str,> = HashSet::new();
            for edge in &repository.language_edges {
                let entry = totals.entry(edge.name.clone(),).or_default();
                entry.0 += edge.size_bytes;
                if seen.insert(edge.name.as_str(),) {
                    entry.1 += 1;
                }
            }
        }
        totals
    }

    proptest! {
        #[test]
        fn aggregation_ignores_repository_order(
            (original, shuffled) in repositories_strategy()
                .prop_flat_map(|repos| (Just(repos.clone()), Just(repos).prop_shuffle()))
        ) {
            let left = aggregate_languages(&original, &[], LanguageWeights::default());
            let right = aggregate_languages(&shuffled, &[], LanguageWeights::default());

            prop_assert_eq!(left.len(), right.len());
            for stat in left.iter() {
                let other = right.get(&stat.name).expect("language present in both");
                prop_assert_eq!(stat.size, other.size);
                prop_assert_eq!(stat.count, other.count);
            }
        }

        #[test]
        fn excluded_repository_bytes_are_removed(
            repos in repositories_strategy(),
            pick in any::<prop::sample::Index>()
        ) {
            prop_assume!(!repos.is_empty());
            let excluded = pick.get(&repos).name.clone();
            let remaining: Vec<RepositoryNode> =
                repos.iter().filter(|repo| repo.name != excluded).cloned().collect();

            let ranking = aggregate_languages(&repos, &[excluded], LanguageWeights::default());
            let expected = raw_totals(&remaining);

            prop_assert_eq!(ranking.len(), expected.len());
            for (name, (size, count)) in expected {
                let stat = ranking.get(&name).expect("language present");
                prop_assert_eq!(stat.size, size as f64);
                prop_assert_eq!(stat.count, count);
            }
        }

        #[test]
        fn default_weights_rank_by_bytes_descending(repos in repositories_strategy()) {
            let ranking = aggregate_languages(&repos, &[], LanguageWeights::default());
            let sizes: Vec<f64> = ranking.iter().map(|stat| stat.size).collect();
            prop_assert!(sizes.windows(2).all(|pair| pair[0] >= pair[1]));
            for stat in ranking.iter() {
                prop_assert!(stat.count as usize <= repos.len());
            }
        }
    }
}
