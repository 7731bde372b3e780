use async_trait::async_trait;
use folio_model::RemoteBook;

use crate::input::{Field, ValidationErrors};

/// Minimum length of an author or title term before a search is sent.
pub const MIN_QUERY_CHARS: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("invalid search endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

impl ProviderError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Status { status, .. } => Some(*status),
            ProviderError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Author and title terms of a remote book search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    pub author: String,
    pub title: String,
}

impl SearchQuery {
    /// Build a query, rejecting it when neither term is long enough to be
    /// worth a request.
    pub fn new(
        author: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<Self, ValidationErrors> {
        let query = Self {
            author: author.into().trim().to_string(),
            title: title.into().trim().to_string(),
        };
        if query.author.chars().count() < MIN_QUERY_CHARS
            && query.title.chars().count() < MIN_QUERY_CHARS
        {
            return Err(ValidationErrors::single(
                Field::SearchQuery,
                format!("enter at least {MIN_QUERY_CHARS} characters for author or title"),
            ));
        }
        Ok(query)
    }

    /// `inauthor:"X"+intitle:"Y"` built from the non-blank terms.
    pub fn to_query_string(&self) -> String {
        let mut parts = Vec::with_capacity(2);
        if !self.author.trim().is_empty() {
            parts.push(format!("inauthor:\"{}\"", self.author));
        }
        if !self.title.trim().is_empty() {
            parts.push(format!("intitle:\"{}\"", self.title));
        }
        parts.join("+")
    }
}

/// Remote catalog of books that can be searched and imported from.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookSearchProvider: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RemoteBook>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_terms_are_joined_with_plus() {
        let query = SearchQuery::new("Tolkien", "Hobbit").unwrap();
        assert_eq!(
            query.to_query_string(),
            r#"inauthor:"Tolkien"+intitle:"Hobbit""#
        );
    }

    #[test]
    fn one_long_enough_term_is_sufficient() {
        let query = SearchQuery::new("", "Dune").unwrap();
        assert_eq!(query.to_query_string(), r#"intitle:"Dune""#);

        let query = SearchQuery::new("Le Guin", "ab").unwrap();
        assert_eq!(
            query.to_query_string(),
            r#"inauthor:"Le Guin"+intitle:"ab""#
        );
    }

    #[test]
    fn short_terms_are_rejected() {
        let err = SearchQuery::new("ab", " x ").unwrap_err();
        assert!(err.for_field(Field::SearchQuery).is_some());
    }
}
