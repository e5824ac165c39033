// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Paginated walk over a user's owned repositories for the stats query.
//!
//! The first page carries every scalar count. Later pages use the lighter
//! repository-only document and only contribute repository nodes. Pages are
//! fetched strictly in cursor order, one at a time.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::{
    config::FetchConfig,
    error::Error,
    executor::QueryExecutor,
    model::{GraphQlError, RepositoriesUser, RepositoryNode, Response, StatsUser, UserData},
    query::{QueryVariables, REPOSITORIES_QUERY, STATS_QUERY},
};

/// Optional sections of the stats query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq,)]
pub struct StatsToggles
{
    pub include_merged_pull_requests: bool,
    pub include_discussions:          bool,
    pub include_discussions_answers:  bool,
}

/// Result of a walk that reached the API.
#[derive(Debug, Clone,)]
pub enum WalkOutcome
{
    /// Page-one scalars with the repository nodes of every fetched page
    /// appended in page order.
    Complete(Box<StatsUser,>,),
    /// Error array of the page that failed. Nothing fetched before it is
    /// kept.
    Rejected(Vec<GraphQlError,>,),
}

/// Walks the stats pages for `login`.
///
/// A later page is requested only when `config.multi_page_stars` is set, the
/// API reports another page, and every repository on the current page has at
/// least one star. Repositories are sorted by stargazers, so an unstarred node
/// means nothing further can change the star total.
///
/// # Errors
///
/// Returns [`Error::Transport`] or [`Error::Decode`] from the first page that
/// fails at that level. No partial result is returned.
pub async fn walk_stats_pages<E,>(
    executor: &E,
    login: &str,
    toggles: StatsToggles,
    config: &FetchConfig,
) -> Result<WalkOutcome, Error,>
where
    E: QueryExecutor,
{
    let mut merged: Option<StatsUser,> = None;
    let mut cursor: Option<String,> = None;
    let mut consumed: HashSet<String,> = HashSet::new();
    let mut pages = 0usize;

    loop {
        let variables = QueryVariables {
            login,
            after: cursor.as_deref(),
            include_merged_pull_requests: toggles.include_merged_pull_requests,
            include_discussions: toggles.include_discussions,
            include_discussions_answers: toggles.include_discussions_answers,
        };
        let document = if merged.is_some() { REPOSITORIES_QUERY } else { STATS_QUERY };

        let body = executor.execute(document, &variables,).await?;
        pages += 1;

        let page = match merged.as_mut() {
            None => match first_page(body,)? {
                FirstPage::User(user,) => {
                    let page = (user.repositories.page_info.clone(), stars_on(&user.repositories.nodes,),);
                    merged = Some(*user,);
                    page
                }
                FirstPage::Rejected(errors,) => {
                    warn!(login, page = pages, ?errors, "stats query rejected");
                    return Ok(WalkOutcome::Rejected(errors,),);
                }
            },
            Some(user,) => match Response::<UserData<RepositoriesUser,>,>::from_value(body,)? {
                Response::Data(UserData {
                    user: Some(next,),
                },) => {
                    let connection = next.repositories;
                    let page = (connection.page_info, stars_on(&connection.nodes,),);
                    user.repositories.nodes.extend(connection.nodes,);
                    page
                }
                Response::Data(UserData {
                    user: None,
                },) => {
                    warn!(login, page = pages, "repository page resolved no user");
                    return Ok(WalkOutcome::Rejected(vec![missing_user()],),);
                }
                Response::Errors(errors,) => {
                    warn!(login, page = pages, ?errors, "repository page rejected");
                    return Ok(WalkOutcome::Rejected(errors,),);
                }
            },
        };

        let (page_info, all_starred,) = page;
        if let Some(current,) = cursor.take() {
            consumed.insert(current,);
        }

        let proceed = config.multi_page_stars && page_info.has_next_page && all_starred;
        debug!(login, page = pages, has_next_page = page_info.has_next_page, all_starred, proceed, "stats page fetched");
        if !proceed {
            break;
        }

        match page_info.end_cursor {
            Some(next,) if !consumed.contains(&next,) => cursor = Some(next,),
            other => {
                warn!(login, cursor = ?other, "stopping pagination on missing or repeated cursor");
                break;
            }
        }
    }

    match merged {
        Some(user,) => {
            info!(login, pages, repositories = user.repositories.nodes.len(), "stats walk complete");
            Ok(WalkOutcome::Complete(Box::new(user,),),)
        }
        None => Ok(WalkOutcome::Rejected(Vec::new(),),),
    }
}

enum FirstPage
{
    User(Box<StatsUser,>,),
    Rejected(Vec<GraphQlError,>,),
}

fn first_page(body: serde_json::Value,) -> Result<FirstPage, Error,>
{
    Ok(match Response::<UserData<StatsUser,>,>::from_value(body,)? {
        Response::Data(UserData {
            user: Some(user,),
        },) => FirstPage::User(Box::new(user,),),
        Response::Data(UserData {
            user: None,
        },) => FirstPage::Rejected(vec![missing_user()],),
        Response::Errors(errors,) => FirstPage::Rejected(errors,),
    },)
}

fn missing_user() -> GraphQlError
{
    GraphQlError {
        kind:    Some(crate::classify::NOT_FOUND_TYPE.to_owned(),),
        message: None,
    }
}

fn stars_on(nodes: &[RepositoryNode],) -> bool
{
    nodes.iter().all(|node| node.stargazer_count > 0,)
}
