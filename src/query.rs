// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! GraphQL documents and the variables sent with them.

use serde::Serialize;

/// Repository page selection shared by both stats documents. Pages are sorted
/// by stargazers so unstarred repositories arrive last.
macro_rules! repositories_field {
    () => {
        r#"
    repositories(first: 100, ownerAffiliations: OWNER, orderBy: {direction: DESC, field: STARGAZERS}, after: $after) {
      totalCount
      nodes {
        name
        stargazers {
          totalCount
        }
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }"#
    };
}

/// First-page stats document: every scalar count plus the first repository
/// page.
pub const STATS_QUERY: &str = concat!(
    r#"
query userInfo($login: String!, $after: String, $includeMergedPullRequests: Boolean!, $includeDiscussions: Boolean!, $includeDiscussionsAnswers: Boolean!) {
  user(login: $login) {
    name
    login
    contributionsCollection {
      totalCommitContributions
      totalPullRequestReviewContributions
    }
    repositoriesContributedTo(first: 1, contributionTypes: [COMMIT, ISSUE, PULL_REQUEST, REPOSITORY]) {
      totalCount
    }
    pullRequests(first: 1) {
      totalCount
    }
    mergedPullRequests: pullRequests(states: MERGED) @include(if: $includeMergedPullRequests) {
      totalCount
    }
    openIssues: issues(states: OPEN) {
      totalCount
    }
    closedIssues: issues(states: CLOSED) {
      totalCount
    }
    followers {
      totalCount
    }
    repositoryDiscussions @include(if: $includeDiscussions) {
      totalCount
    }
    repositoryDiscussionComments(onlyAnswers: true) @include(if: $includeDiscussionsAnswers) {
      totalCount
    }"#,
    repositories_field!(),
    r#"
  }
}
"#
);

/// Repository-only document used for every page after the first.
pub const REPOSITORIES_QUERY: &str = concat!(
    r#"
query userInfo($login: String!, $after: String) {
  user(login: $login) {"#,
    repositories_field!(),
    r#"
  }
}
"#
);

/// Single-page document for the language aggregator.
pub const LANGUAGES_QUERY: &str = r#"
query userInfo($login: String!) {
  user(login: $login) {
    repositories(ownerAffiliations: OWNER, isFork: false, first: 100) {
      nodes {
        name
        languages(first: 10, orderBy: {field: SIZE, direction: DESC}) {
          edges {
            size
            node {
              color
              name
            }
          }
        }
      }
    }
  }
}
"#;

/// Variables accepted by every document.
///
/// Documents ignore variables they do not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize,)]
#[serde(rename_all = "camelCase")]
pub struct QueryVariables<'a,>
{
    pub login:                        &'a str,
    /// Cursor of the page to fetch; `None` for the first page.
    pub after:                        Option<&'a str,>,
    pub include_merged_pull_requests: bool,
    pub include_discussions:          bool,
    pub include_discussions_answers:  bool,
}

impl<'a,> QueryVariables<'a,>
{
    /// Variables for a first-page request with every toggle off.
    pub fn for_login(login: &'a str,) -> Self
    {
        Self {
            login,
            after: None,
            include_merged_pull_requests: false,
            include_discussions: false,
            include_discussions_answers: false,
        }
    }
}
