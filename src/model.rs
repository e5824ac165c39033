// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Response shapes returned by the GitHub GraphQL API.
//!
//! Every nullable field is given an explicit default while decoding, so the
//! walker, aggregator and assembler never branch on implicit absence. The
//! top-level envelope is decoded into [`Response`], which is either the typed
//! payload or the upstream error array, never both.

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

use crate::error::Error;

/// Color used when the API does not assign one to a language.
pub const DEFAULT_LANGUAGE_COLOR: &str = "#858585";

/// Decoded GraphQL response: either data or the upstream error array.
#[derive(Debug, Clone, PartialEq,)]
pub enum Response<T,>
{
    /// Payload decoded into the requested shape.
    Data(T,),
    /// Upstream errors. May be empty when the API returned neither data nor
    /// errors.
    Errors(Vec<GraphQlError,>,),
}

#[derive(Debug, Deserialize,)]
struct Envelope
{
    #[serde(default)]
    data:   Option<Value,>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError,>,>,
}

impl<T,> Response<T,>
where
    T: DeserializeOwned,
{
    /// Decodes a raw GraphQL response body.
    ///
    /// A non-empty `errors` array takes precedence over any partial `data`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] when the body or its `data` member does not
    /// match the expected shape.
    pub fn from_value(value: Value,) -> Result<Self, Error,>
    {
        let envelope: Envelope = serde_json::from_value(value,).map_err(Error::decode,)?;

        if let Some(errors,) = envelope.errors.filter(|errors| !errors.is_empty(),) {
            return Ok(Self::Errors(errors,),);
        }

        match envelope.data {
            Some(data,) if !data.is_null() => {
                serde_json::from_value(data,).map(Self::Data,).map_err(Error::decode,)
            }
            _ => Ok(Self::Errors(Vec::new(),),),
        }
    }
}

/// Single entry of the GraphQL `errors` array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize,)]
pub struct GraphQlError
{
    /// Machine-readable error type such as `NOT_FOUND`.
    #[serde(rename = "type", default)]
    pub kind:    Option<String,>,
    /// Human readable message.
    #[serde(default)]
    pub message: Option<String,>,
}

/// Wrapper for the `user` root field.
#[derive(Debug, Clone, Deserialize,)]
pub struct UserData<T,>
{
    /// `None` when the API resolved no account for the login.
    pub user: Option<T,>,
}

/// `{ totalCount }` object used by every counted connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize,)]
pub struct TotalCount
{
    #[serde(rename = "totalCount", default, deserialize_with = "null_as_default")]
    pub total_count: u64,
}

/// Pagination state of a connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo
{
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_next_page: bool,
    /// Opaque cursor of the last node on the page.
    #[serde(default)]
    pub end_cursor:    Option<String,>,
}

/// One language's byte contribution within one repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize,)]
#[serde(from = "RawLanguageEdge")]
pub struct LanguageEdge
{
    pub size_bytes: u64,
    pub name:       String,
    pub color:      String,
}

#[derive(Deserialize,)]
struct RawLanguageEdge
{
    #[serde(default, deserialize_with = "null_as_default")]
    size: u64,
    node: RawLanguage,
}

#[derive(Deserialize,)]
struct RawLanguage
{
    name:  String,
    #[serde(default)]
    color: Option<String,>,
}

impl From<RawLanguageEdge,> for LanguageEdge
{
    fn from(raw: RawLanguageEdge,) -> Self
    {
        Self {
            size_bytes: raw.size,
            name:       raw.node.name,
            color:      raw.node.color.unwrap_or_else(|| DEFAULT_LANGUAGE_COLOR.to_owned(),),
        }
    }
}

/// Owned, non-fork repository as returned by either repository query.
///
/// The stats queries omit `languages` and the language query omits
/// `stargazers`; the missing side decodes to zero or to an empty edge list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize,)]
#[serde(from = "RawRepository")]
pub struct RepositoryNode
{
    pub name:            String,
    pub stargazer_count: u64,
    /// Up to ten edges, ordered by size descending.
    pub language_edges:  Vec<LanguageEdge,>,
}

#[derive(Deserialize,)]
struct RawRepository
{
    name:       String,
    #[serde(default, deserialize_with = "null_as_default")]
    stargazers: TotalCount,
    #[serde(default, deserialize_with = "null_as_default")]
    languages:  RawLanguageConnection,
}

#[derive(Default, Deserialize,)]
struct RawLanguageConnection
{
    #[serde(default, deserialize_with = "null_as_default")]
    edges: Vec<LanguageEdge,>,
}

impl From<RawRepository,> for RepositoryNode
{
    fn from(raw: RawRepository,) -> Self
    {
        Self {
            name:            raw.name,
            stargazer_count: raw.stargazers.total_count,
            language_edges:  raw.languages.edges,
        }
    }
}

/// Page of owned repositories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryConnection
{
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes:       Vec<RepositoryNode,>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_info:   PageInfo,
}

/// Repository-only user shape used for pages after the first.
#[derive(Debug, Clone, Deserialize,)]
pub struct RepositoriesUser
{
    #[serde(default, deserialize_with = "null_as_default")]
    pub repositories: RepositoryConnection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsCollection
{
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_commit_contributions:              u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_pull_request_review_contributions: u64,
}

/// Full stats payload: page-one scalars plus the merged repository list.
///
/// Toggle-gated fields stay `None` when the query skipped them.
#[derive(Debug, Clone, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct StatsUser
{
    #[serde(default)]
    pub name:                           Option<String,>,
    pub login:                          String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contributions_collection:       ContributionsCollection,
    #[serde(default, deserialize_with = "null_as_default")]
    pub repositories_contributed_to:    TotalCount,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pull_requests:                  TotalCount,
    #[serde(default)]
    pub merged_pull_requests:           Option<TotalCount,>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub open_issues:                    TotalCount,
    #[serde(default, deserialize_with = "null_as_default")]
    pub closed_issues:                  TotalCount,
    #[serde(default, deserialize_with = "null_as_default")]
    pub followers:                      TotalCount,
    #[serde(default)]
    pub repository_discussions:         Option<TotalCount,>,
    #[serde(default)]
    pub repository_discussion_comments: Option<TotalCount,>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub repositories:                   RepositoryConnection,
}

impl StatsUser
{
    /// Name shown on cards, falling back to the login when `name` is blank.
    pub fn display_name(&self,) -> &str
    {
        self.name.as_deref().filter(|name| !name.is_empty(),).unwrap_or(&self.login,)
    }
}

fn null_as_default<'de, D, T,>(deserializer: D,) -> Result<T, D::Error,>
where
    D: Deserializer<'de,>,
    T: Default + Deserialize<'de,>,
{
    Option::<T,>::deserialize(deserializer,).map(Option::unwrap_or_default,)
}

#[cfg(test)]
mod tests
{
    use serde_json::json;

    use super::*;

    #[test]
    fn errors_take_precedence_over_partial_data()
    {
        let raw = json!({
            "data": { "user": null },
            "errors": [{ "type": "NOT_FOUND", "message": "Could not resolve to a User" }]
        });

        let response =
            Response::<UserData<StatsUser,>,>::from_value(raw,).expect("expected envelope",);
        match response {
            Response::Errors(errors,) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].kind.as_deref(), Some("NOT_FOUND"));
            }
            Response::Data(_,) => panic!("expected error payload"),
        }
    }

    #[test]
    fn empty_body_becomes_empty_error_array()
    {
        let response = Response::<UserData<StatsUser,>,>::from_value(json!({}),)
            .expect("expected envelope",);
        assert!(matches!(response, Response::Errors(ref errors) if errors.is_empty()));
    }

    #[test]
    fn repository_without_languages_or_stars_defaults_to_zero()
    {
        let node: RepositoryNode = serde_json::from_value(json!({
            "name": "dotfiles",
            "stargazers": null,
            "languages": { "edges": null }
        }),)
        .expect("expected repository",);

        assert_eq!(node.stargazer_count, 0);
        assert!(node.language_edges.is_empty());
    }

    #[test]
    fn language_edge_without_color_uses_default()
    {
        let node: RepositoryNode = serde_json::from_value(json!({
            "name": "scripts",
            "languages": { "edges": [
                { "size": 120, "node": { "name": "Shell", "color": "#89e051" } },
                { "size": 40, "node": { "name": "Roff", "color": null } }
            ] }
        }),)
        .expect("expected repository",);

        assert_eq!(node.language_edges[0].color, "#89e051");
        assert_eq!(node.language_edges[1].size_bytes, 40);
        assert_eq!(node.language_edges[1].color, DEFAULT_LANGUAGE_COLOR);
    }

    #[test]
    fn stats_user_decodes_with_skipped_toggle_fields()
    {
        let user: StatsUser = serde_json::from_value(json!({
            "name": null,
            "login": "octocat",
            "contributionsCollection": {
                "totalCommitContributions": 12,
                "totalPullRequestReviewContributions": 3
            },
            "pullRequests": { "totalCount": 4 },
            "openIssues": { "totalCount": 1 },
            "closedIssues": { "totalCount": 2 },
            "repositories": {
                "totalCount": 1,
                "nodes": [{ "name": "hello-world", "stargazers": { "totalCount": 9 } }],
                "pageInfo": { "hasNextPage": false, "endCursor": "Y3Vyc29yOjE=" }
            }
        }),)
        .expect("expected stats user",);

        assert_eq!(user.display_name(), "octocat");
        assert!(user.merged_pull_requests.is_none());
        assert_eq!(user.followers.total_count, 0);
        assert_eq!(user.repositories.nodes[0].stargazer_count, 9);
        assert_eq!(user.contributions_collection.total_commit_contributions, 12);
    }
}
