use std::collections::BTreeSet;

use crate::{
    error::{Result, SearchError},
    server::{stop_words::StopWordSet, token::tokenize, SearchServer},
};

/// Prefix marking an excluded term
pub const MINUS_PREFIX: char = '-';

/// One parsed query token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryTerm<'q> {
    /// Must contribute to relevance
    Plus(&'q str),
    /// Excludes every document containing it
    Minus(&'q str),
}

impl<'q> QueryTerm<'q> {
    /// Classify an already validated token
    /// `-` alone and `--x` are rejected.
    pub fn parse(token: &'q str) -> Result<Self> {
        match token.strip_prefix(MINUS_PREFIX) {
            None => Ok(QueryTerm::Plus(token)),
            Some(rest) if rest.is_empty() || rest.starts_with(MINUS_PREFIX) => {
                Err(SearchError::MalformedMinusTerm(token.to_string()))
            }
            Some(rest) => Ok(QueryTerm::Minus(rest)),
        }
    }

    /// Term without its prefix
    #[inline]
    pub fn text(&self) -> &'q str {
        match *self {
            QueryTerm::Plus(text) | QueryTerm::Minus(text) => text,
        }
    }
}

/// Structured query
/// Both sets are deduplicated and ordered; terms borrow the raw query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query<'q> {
    pub plus_terms: BTreeSet<&'q str>,
    pub minus_terms: BTreeSet<&'q str>,
}

impl Query<'_> {
    pub fn is_empty(&self) -> bool {
        self.plus_terms.is_empty() && self.minus_terms.is_empty()
    }
}

/// Turns raw query strings into [`Query`] values
#[derive(Debug, Clone, Copy)]
pub struct QueryParser<'a> {
    stop_words: &'a StopWordSet,
}

impl<'a> QueryParser<'a> {
    pub fn new(stop_words: &'a StopWordSet) -> Self {
        Self { stop_words }
    }

    /// Parse a raw query
    ///
    /// Every token is validated before stop words are filtered, so a
    /// malformed token fails the query even when it would be dropped.
    /// Stop words are compared against the un-prefixed term.
    ///
    /// # Errors
    /// `InvalidToken` from tokenization, `MalformedMinusTerm` for `-` / `--x`.
    pub fn parse<'q>(&self, raw_query: &'q str) -> Result<Query<'q>> {
        let terms = tokenize(raw_query)?
            .into_iter()
            .map(QueryTerm::parse)
            .collect::<Result<Vec<_>>>()?;

        let mut query = Query::default();
        for term in terms {
            if self.stop_words.contains(term.text()) {
                continue;
            }
            match term {
                QueryTerm::Plus(text) => query.plus_terms.insert(text),
                QueryTerm::Minus(text) => query.minus_terms.insert(text),
            };
        }
        Ok(query)
    }
}

impl SearchServer {
    /// Parse a raw query against this server's stop words
    pub fn parse_query<'q>(&self, raw_query: &'q str) -> Result<Query<'q>> {
        QueryParser::new(&self.stop_words).parse(raw_query)
    }
}
