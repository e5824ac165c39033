// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Maps upstream GraphQL error arrays onto the crate error taxonomy.
//!
//! Only the first entry of the array is inspected. Classification is pure and
//! never retries.

use crate::{error::Error, model::GraphQlError};

/// Error type the API reports for unknown accounts.
pub const NOT_FOUND_TYPE: &str = "NOT_FOUND";

/// Message used when a `NOT_FOUND` error carries no text.
pub const DEFAULT_USER_NOT_FOUND_MESSAGE: &str = "Could not fetch user.";

/// Display width for upstream messages.
pub const MESSAGE_WIDTH: usize = 90;

/// Number of wrapped lines kept from an upstream message.
pub const MESSAGE_LINES: usize = 1;

/// Data set a failed query was retrieving. Selects the generic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq,)]
pub enum Subject
{
    Stats,
    Languages,
}

impl Subject
{
    fn noun(self,) -> &'static str
    {
        match self {
            Self::Stats => "stats",
            Self::Languages => "language",
        }
    }
}

/// Classifies an upstream error array into exactly one error variant.
///
/// * `NOT_FOUND` type on the first entry becomes [`Error::UserNotFound`] with
///   the upstream message, or [`DEFAULT_USER_NOT_FOUND_MESSAGE`].
/// * Any other first entry with a message becomes [`Error::UpstreamMessage`]
///   with the message wrapped to [`MESSAGE_WIDTH`].
/// * Everything else becomes [`Error::GraphQlUnspecified`].
///
/// # Example
///
/// ```
/// use ghcard::{Error, GraphQlError, Subject, classify_errors};
///
/// let errors = vec![GraphQlError {
///     kind:    Some("NOT_FOUND".to_owned(),),
///     message: None,
/// }];
/// let error = classify_errors(&errors, Subject::Stats,);
/// assert!(matches!(error, Error::UserNotFound { .. }));
/// ```
pub fn classify_errors(errors: &[GraphQlError], subject: Subject,) -> Error
{
    let first = errors.first();
    let message =
        first.and_then(|error| error.message.as_deref(),).filter(|m| !m.trim().is_empty(),);

    if first.and_then(|error| error.kind.as_deref(),) == Some(NOT_FOUND_TYPE,) {
        return Error::UserNotFound {
            message: message.unwrap_or(DEFAULT_USER_NOT_FOUND_MESSAGE,).to_owned(),
        };
    }

    if let Some(message,) = message {
        let wrapped = wrap_message(message, MESSAGE_WIDTH, MESSAGE_LINES,);
        if let Some(line,) = wrapped.into_iter().next() {
            return Error::UpstreamMessage {
                message: line,
            };
        }
    }

    Error::GraphQlUnspecified {
        message: format!(
            "Something went wrong while trying to retrieve the {} data using the GraphQL API.",
            subject.noun()
        ),
    }
}

/// Greedily wraps `text` on whitespace into lines of at most `width`
/// characters and keeps the first `max_lines` of them.
///
/// Words longer than `width` are never split. When lines are dropped the last
/// kept line ends with `...`. Blank lines are removed from the result.
pub fn wrap_message(text: &str, width: usize, max_lines: usize,) -> Vec<String,>
{
    let mut lines: Vec<String,> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };

        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current,),);
        }
        if !current.is_empty() {
            current.push(' ',);
        }
        current.push_str(word,);
    }
    if !current.is_empty() {
        lines.push(current,);
    }

    let truncated = lines.len() > max_lines;
    lines.truncate(max_lines,);
    if truncated {
        if let Some(last,) = lines.last_mut() {
            last.push_str("...",);
        }
    }

    lines.retain(|line| !line.is_empty(),);
    lines
}
