//! Ordered admin query expectations
//!
//! An expectation queue is consumed strictly in order, one slot per executed
//! query, matched or not. A mismatching query still uses up its slot, so a
//! single wrong query produces a single error instead of shifting every
//! following comparison.
//!
//! A prefix expectation compares only the first `n` bytes of the actual
//! query, `n` being the expected text's length. It exists for statements
//! carrying runtime values such as timestamps.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::daemon::{DaemonError, DaemonResult};

/// Marker that turns a textual expectation into a prefix expectation.
pub const PREFIX_MARKER: &str = "SUB";

/// One expected admin query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedQuery {
    /// The query must equal this text
    Exact(String),
    /// The query must start with this text
    Prefix(String),
}

impl ExpectedQuery {
    pub fn exact(query: impl Into<String>) -> Self {
        Self::Exact(query.into())
    }

    pub fn prefix(query: impl Into<String>) -> Self {
        Self::Prefix(query.into())
    }

    /// Parse the textual form, where a leading [`PREFIX_MARKER`] selects a
    /// prefix expectation and is stripped.
    pub fn parse(text: &str) -> Self {
        match text.strip_prefix(PREFIX_MARKER) {
            Some(rest) => Self::Prefix(rest.to_string()),
            None => Self::Exact(text.to_string()),
        }
    }

    /// Expected text, without any marker.
    pub fn text(&self) -> &str {
        match self {
            Self::Exact(text) | Self::Prefix(text) => text,
        }
    }

    pub fn is_prefix(&self) -> bool {
        matches!(self, Self::Prefix(_))
    }

    /// Compare `actual` against this expectation.
    ///
    /// On mismatch the error names the expected text and the compared part of
    /// the actual query.
    pub fn check(&self, actual: &str) -> DaemonResult<()> {
        let expected = self.text();
        let compared = match self {
            Self::Exact(_) => actual,
            // Cutting inside a UTF-8 sequence leaves the query whole; it then
            // differs from the expectation by length.
            Self::Prefix(_) if actual.len() > expected.len() => {
                actual.get(..expected.len()).unwrap_or(actual)
            }
            Self::Prefix(_) => actual,
        };

        if compared != expected {
            return Err(DaemonError::mismatch("admin query", expected, compared));
        }
        Ok(())
    }
}

impl fmt::Display for ExpectedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(text) => write!(f, "{}", text),
            Self::Prefix(text) => write!(f, "{}{}", PREFIX_MARKER, text),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TaggedQuery {
    Exact(String),
    Prefix(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum QueryForm {
    Text(String),
    Tagged(TaggedQuery),
}

// Textual form where it round-trips, `{"exact": ...}` for exact queries that
// happen to begin with the marker.
impl Serialize for ExpectedQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Exact(text) if text.starts_with(PREFIX_MARKER) => {
                TaggedQuery::Exact(text.clone()).serialize(serializer)
            }
            _ => serializer.collect_str(self),
        }
    }
}

impl<'de> Deserialize<'de> for ExpectedQuery {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match QueryForm::deserialize(deserializer)? {
            QueryForm::Text(text) => Self::parse(&text),
            QueryForm::Tagged(TaggedQuery::Exact(text)) => Self::Exact(text),
            QueryForm::Tagged(TaggedQuery::Prefix(text)) => Self::Prefix(text),
        })
    }
}

/// Ordered queue of expected admin queries plus a cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryExpectations {
    expected: Vec<ExpectedQuery>,
    cursor: usize,
}

impl QueryExpectations {
    pub fn new(expected: Vec<ExpectedQuery>) -> Self {
        Self { expected, cursor: 0 }
    }

    /// Build from textual expectations (marker allowed).
    pub fn parse<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(texts.into_iter().map(|t| ExpectedQuery::parse(t.as_ref())).collect())
    }

    /// Append an expectation at the end of the queue.
    pub fn push(&mut self, expected: ExpectedQuery) {
        self.expected.push(expected);
    }

    /// Consume the next slot for `actual`.
    ///
    /// The cursor advances even when the comparison fails. Fails without
    /// consuming anything when the queue is exhausted.
    pub fn consume(&mut self, actual: &str) -> DaemonResult<()> {
        let expected = self.expected.get(self.cursor).ok_or_else(|| {
            DaemonError::mismatch(
                "admin query count",
                format!("{} queries", self.expected.len()),
                format!("unexpected extra query: {}", actual),
            )
        })?;
        self.cursor += 1;
        expected.check(actual)
    }

    /// Fail unless every expectation has been consumed.
    pub fn verify_consumed(&self) -> DaemonResult<()> {
        if self.cursor != self.expected.len() {
            return Err(DaemonError::mismatch(
                "admin query count, queue not consumed",
                format!("{} queries", self.expected.len()),
                format!("{} queries", self.cursor),
            ));
        }
        Ok(())
    }

    /// Number of slots consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.expected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expected.is_empty()
    }

    /// Expectations not yet consumed.
    pub fn remaining(&self) -> &[ExpectedQuery] {
        &self.expected[self.cursor..]
    }

    pub fn expected(&self) -> &[ExpectedQuery] {
        &self.expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daemon::DaemonErrorKind;

    #[test]
    fn test_parse_marker() {
        assert_eq!(ExpectedQuery::parse("SUBabc"), ExpectedQuery::prefix("abc"));
        assert_eq!(ExpectedQuery::parse("STOP SLAVE"), ExpectedQuery::exact("STOP SLAVE"));
        assert_eq!(ExpectedQuery::parse("SUB"), ExpectedQuery::prefix(""));
    }

    #[test]
    fn test_prefix_truncates_longer_query() {
        assert!(ExpectedQuery::prefix("abc").check("abcdef").is_ok());
    }

    #[test]
    fn test_prefix_shorter_query_mismatches() {
        let err = ExpectedQuery::prefix("abc").check("ab").unwrap_err();
        assert_eq!(err.kind, DaemonErrorKind::Mismatch);
        assert!(err.message.contains("expected abc got ab"));
    }

    #[test]
    fn test_prefix_reports_truncated_actual() {
        let err = ExpectedQuery::prefix("abc").check("abXdef").unwrap_err();
        assert!(err.message.contains("expected abc got abX"));
    }

    #[test]
    fn test_prefix_cut_inside_multibyte_char() {
        // "é" is two bytes; a 2-byte prefix would split it.
        let err = ExpectedQuery::prefix("ab").check("aé").unwrap_err();
        assert!(err.message.contains("got aé"));
    }

    #[test]
    fn test_exact_requires_full_equality() {
        assert!(ExpectedQuery::exact("abc").check("abc").is_ok());
        assert!(ExpectedQuery::exact("abc").check("abcdef").is_err());
    }

    #[test]
    fn test_consume_in_order() {
        let mut queue = QueryExpectations::parse(["q1", "q2"]);
        queue.consume("q1").unwrap();
        queue.consume("q2").unwrap();
        assert_eq!(queue.consumed(), 2);
        assert!(queue.verify_consumed().is_ok());
    }

    #[test]
    fn test_mismatch_still_consumes_slot() {
        let mut queue = QueryExpectations::parse(["q1", "q2"]);
        assert!(queue.consume("wrong").is_err());
        assert_eq!(queue.consumed(), 1);
        queue.consume("q2").unwrap();
        assert!(queue.verify_consumed().is_ok());
    }

    #[test]
    fn test_extra_query_does_not_move_cursor() {
        let mut queue = QueryExpectations::parse(["q1"]);
        queue.consume("q1").unwrap();

        let err = queue.consume("q2").unwrap_err();
        assert!(err.message.contains("unexpected extra query: q2"));
        assert_eq!(queue.consumed(), 1);
    }

    #[test]
    fn test_under_consumption_detected() {
        let mut queue = QueryExpectations::parse(["q1", "q2", "q3"]);
        queue.consume("q1").unwrap();

        let err = queue.verify_consumed().unwrap_err();
        assert!(err.message.contains("expected 3 queries got 1 queries"));
        assert_eq!(queue.remaining().len(), 2);
    }

    #[test]
    fn test_serde_text_and_tagged_forms() {
        let queue: Vec<ExpectedQuery> = serde_json::from_str(
            r#"["STOP SLAVE", "SUBINSERT INTO t", {"exact": "SUBSTRING_INDEX"}, {"prefix": "SELECT"}]"#,
        )
        .unwrap();

        assert_eq!(
            queue,
            vec![
                ExpectedQuery::exact("STOP SLAVE"),
                ExpectedQuery::prefix("INSERT INTO t"),
                ExpectedQuery::exact("SUBSTRING_INDEX"),
                ExpectedQuery::prefix("SELECT"),
            ]
        );

        let json = serde_json::to_string(&queue).unwrap();
        assert_eq!(
            json,
            r#"["STOP SLAVE","SUBINSERT INTO t",{"exact":"SUBSTRING_INDEX"},"SUBSELECT"]"#
        );
    }
}
