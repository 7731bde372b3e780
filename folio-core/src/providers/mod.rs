pub mod google_books;
pub mod traits;

pub use google_books::{GoogleBooksConfig, GoogleBooksProvider};
pub use traits::{BookSearchProvider, ProviderError, SearchQuery};

#[cfg(test)]
pub use traits::MockBookSearchProvider;
