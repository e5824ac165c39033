// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! In-memory [`QueryExecutor`] used by the fetcher tests.

use std::{collections::VecDeque, sync::Mutex};

use serde_json::{Value, json};

use crate::{error::Error, executor::QueryExecutor, query::QueryVariables};

/// One recorded `execute` call.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct RecordedCall
{
    pub query: String,
    pub after: Option<String,>,
    pub login: String,
}

/// Replays scripted responses in order and records every call.
#[derive(Debug, Default,)]
pub struct ScriptedExecutor
{
    responses:     Mutex<VecDeque<Result<Value, String,>,>,>,
    commit_total:  Mutex<Option<Result<u64, String,>,>,>,
    calls:         Mutex<Vec<RecordedCall,>,>,
    commit_checks: Mutex<u32,>,
}

impl ScriptedExecutor
{
    pub fn new(responses: Vec<Value,>,) -> Self
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Ok,).collect(),),
            ..Self::default()
        }
    }

    /// Queues a transport failure after the scripted bodies.
    pub fn then_fail(self, message: &str,) -> Self
    {
        self.responses.lock().expect("poisoned",).push_back(Err(message.to_owned(),),);
        self
    }

    pub fn with_commit_total(self, total: Result<u64, String,>,) -> Self
    {
        *self.commit_total.lock().expect("poisoned",) = Some(total,);
        self
    }

    pub fn calls(&self,) -> Vec<RecordedCall,>
    {
        self.calls.lock().expect("poisoned",).clone()
    }

    pub fn commit_checks(&self,) -> u32
    {
        *self.commit_checks.lock().expect("poisoned",)
    }
}

impl QueryExecutor for ScriptedExecutor
{
    async fn execute(&self, query: &str, variables: &QueryVariables<'_,>,) -> Result<Value, Error,>
    {
        self.calls.lock().expect("poisoned",).push(RecordedCall {
            query: query.to_owned(),
            after: variables.after.map(str::to_owned,),
            login: variables.login.to_owned(),
        },);

        let next = self.responses.lock().expect("poisoned",).pop_front();
        match next {
            Some(Ok(body,),) => Ok(body,),
            Some(Err(message,),) => Err(Error::transport(message,),),
            None => Err(Error::transport("no scripted response left",),),
        }
    }

    async fn count_commits(&self, _login: &str,) -> Result<u64, Error,>
    {
        *self.commit_checks.lock().expect("poisoned",) += 1;
        match self.commit_total.lock().expect("poisoned",).clone() {
            Some(Ok(total,),) => Ok(total,),
            Some(Err(message,),) => Err(Error::transport(message,),),
            None => Err(Error::transport("no scripted commit total",),),
        }
    }
}

/// Repository node as the stats queries return it.
pub fn starred(name: &str, stars: u64,) -> Value
{
    json!({ "name": name, "stargazers": { "totalCount": stars } })
}

/// Repository node as the language query returns it.
pub fn with_languages(name: &str, edges: &[(&str, u64,)],) -> Value
{
    let edges: Vec<Value,> = edges
        .iter()
        .map(|(language, size,)| {
            json!({ "size": size, "node": { "name": language, "color": "#000000" } })
        },)
        .collect();
    json!({ "name": name, "languages": { "edges": edges } })
}

/// Repository connection object.
pub fn connection(nodes: Vec<Value,>, has_next_page: bool, end_cursor: Option<&str,>,) -> Value
{
    json!({
        "totalCount": nodes.len(),
        "nodes": nodes,
        "pageInfo": { "hasNextPage": has_next_page, "endCursor": end_cursor }
    })
}

/// First-page stats body with fixed scalar counts.
pub fn stats_page(repositories: Value,) -> Value
{
    json!({
        "data": {
            "user": {
                "name": "The Octocat",
                "login": "octocat",
                "contributionsCollection": {
                    "totalCommitContributions": 120,
                    "totalPullRequestReviewContributions": 7
                },
                "repositoriesContributedTo": { "totalCount": 9 },
                "pullRequests": { "totalCount": 40 },
                "mergedPullRequests": { "totalCount": 30 },
                "openIssues": { "totalCount": 3 },
                "closedIssues": { "totalCount": 12 },
                "followers": { "totalCount": 25 },
                "repositoryDiscussions": { "totalCount": 4 },
                "repositoryDiscussionComments": { "totalCount": 2 },
                "repositories": repositories
            }
        }
    })
}

/// Repository-only body used for later pages.
pub fn repositories_page(repositories: Value,) -> Value
{
    json!({ "data": { "user": { "repositories": repositories } } })
}

/// Language query body.
pub fn languages_page(nodes: Vec<Value,>,) -> Value
{
    json!({ "data": { "user": { "repositories": { "nodes": nodes } } } })
}

/// Body carrying a single upstream error.
pub fn error_body(kind: Option<&str,>, message: Option<&str,>,) -> Value
{
    json!({
        "data": { "user": null },
        "errors": [{ "type": kind, "message": message }]
    })
}
