//! Parse phase: request line, query string, decoding and secret check.

use std::collections::HashMap;

use percent_encoding::percent_decode_str;
use srclink_config::SecretPolicy;
use thiserror::Error;

use crate::locator::Locator;
use crate::navigation::NavigationTarget;

use super::RawRequest;

const SOURCE_PARAMETER: &str = "src";
const SECRET_PARAMETER: &str = "p";

/// Query parameters keyed by name, values still percent-encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParameters {
    values: HashMap<String, String>,
}

impl QueryParameters {
    /// Splits `query` on `&` and each pair on its first `=`.
    ///
    /// Empty pieces and pieces without `=` are skipped. A repeated name keeps
    /// its last value.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let values = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .filter_map(|pair| pair.split_once('='))
            .map(|(name, value)| (name.to_owned(), value.to_owned()))
            .collect();
        Self { values }
    }

    /// Raw value of `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when no parameters were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Errors raised while percent-decoding a query component.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// A `%` was not followed by two hexadecimal digits.
    #[error("malformed percent escape at byte {position}")]
    MalformedEscape {
        /// Byte offset of the offending `%`.
        position: usize,
    },
    /// The decoded bytes were not valid UTF-8.
    #[error("decoded value is not valid UTF-8")]
    InvalidUtf8,
}

/// Decodes an `application/x-www-form-urlencoded` component.
///
/// Surrounding whitespace is trimmed first and `+` decodes to a space.
pub fn decode_component(raw: &str) -> Result<String, DecodeError> {
    let trimmed = raw.trim_matches(|character: char| character <= ' ');
    check_escapes(trimmed)?;
    let spaced = trimmed.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| DecodeError::InvalidUtf8)
}

fn check_escapes(value: &str) -> Result<(), DecodeError> {
    let bytes = value.as_bytes();
    let mut position = 0;
    while let Some(&byte) = bytes.get(position) {
        if byte == b'%' {
            let is_escape = bytes
                .get(position + 1..position + 3)
                .is_some_and(|digits| digits.iter().all(u8::is_ascii_hexdigit));
            if !is_escape {
                return Err(DecodeError::MalformedEscape { position });
            }
            position += 3;
        } else {
            position += 1;
        }
    }
    Ok(())
}

/// Why a request did not lead to navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// Fewer than two space-separated tokens.
    MalformedRequestLine,
    /// The `src` parameter could not be decoded.
    UndecodableSource(DecodeError),
    /// The supplied secret was rejected.
    SecretMismatch,
    /// The decoded `src` was not a `package:Type:line` locator.
    InvalidLocator(String),
}

/// Result of evaluating a captured request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Navigate to the target.
    Dispatch(NavigationTarget),
    /// Do nothing.
    Dropped(DropReason),
}

/// Target token of the request line, e.g. `/open?src=...`.
///
/// The raw request is split on single spaces with trailing empty tokens
/// discarded; the second token is the target.
#[must_use]
pub fn request_target(raw: &str) -> Option<&str> {
    let mut tokens: Vec<&str> = raw.split(' ').collect();
    while tokens.last().is_some_and(|token| token.is_empty()) {
        tokens.pop();
    }
    match tokens.as_slice() {
        [_, target, ..] => Some(*target),
        _ => None,
    }
}

/// Query portion of a request target.
///
/// Everything after the first `?`, or the whole target when there is none.
#[must_use]
pub fn query_string(target: &str) -> &str {
    target
        .split_once('?')
        .map_or(target, |(_, query)| query)
}

/// Turns a captured request into a navigation decision.
///
/// Every failure resolves to [`Outcome::Dropped`]; nothing here is reported
/// back to the client.
#[must_use]
pub fn evaluate(raw: &RawRequest, secret: &str, policy: SecretPolicy) -> Outcome {
    let Some(target) = request_target(raw.as_str()) else {
        return Outcome::Dropped(DropReason::MalformedRequestLine);
    };
    let parameters = QueryParameters::parse(query_string(target));

    let source = match parameters.get(SOURCE_PARAMETER).map(decode_component) {
        Some(Ok(source)) => source,
        Some(Err(error)) => return Outcome::Dropped(DropReason::UndecodableSource(error)),
        None => String::new(),
    };
    let submitted = parameters
        .get(SECRET_PARAMETER)
        .and_then(|value| decode_component(value).ok())
        .unwrap_or_default();

    if !policy.accepts(secret, &submitted) {
        return Outcome::Dropped(DropReason::SecretMismatch);
    }

    match Locator::parse(&source) {
        Some(locator) => Outcome::Dispatch(NavigationTarget::from(&locator)),
        None => Outcome::Dropped(DropReason::InvalidLocator(source)),
    }
}
