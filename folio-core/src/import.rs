//! Copying remote search results into the local catalog.

use folio_model::{ItemId, RemoteBook};
use tracing::{info, instrument};

use crate::database::{DuplicateKey, ItemRepository, StorageResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Imported { id: ItemId, title: String },
    AlreadyExists { title: String, reason: String },
}

impl ImportOutcome {
    pub fn message(&self) -> String {
        match self {
            ImportOutcome::Imported { id, title } => {
                format!("'{title}' added to the library (id {id})")
            }
            ImportOutcome::AlreadyExists { title, reason } => {
                format!("'{title}' is already in the library: {reason}")
            }
        }
    }
}

/// Store `book` as an available local book unless it is already present,
/// first by ISBN and then by exact title and author.
#[instrument(skip(repo, book), fields(volume = %book.volume_id), level = "debug")]
pub async fn import_remote_book(
    repo: &dyn ItemRepository,
    book: &RemoteBook,
) -> StorageResult<ImportOutcome> {
    let isbn = book
        .isbn
        .as_deref()
        .map(str::trim)
        .filter(|isbn| !isbn.is_empty());

    if let Some(isbn) = isbn
        && let Some(existing) = repo
            .find_duplicate(&DuplicateKey::Isbn(isbn.to_string()))
            .await?
    {
        return Ok(ImportOutcome::AlreadyExists {
            title: book.title.clone(),
            reason: format!("ISBN {isbn} already exists (ID: {})", existing.id),
        });
    }

    let by_name = DuplicateKey::NameAndAuthor {
        name: book.title.clone(),
        author: book.authors.clone(),
    };
    if let Some(existing) = repo.find_duplicate(&by_name).await? {
        return Ok(ImportOutcome::AlreadyExists {
            title: book.title.clone(),
            reason: format!(
                "Title and author match existing item (ID: {})",
                existing.id
            ),
        });
    }

    let id = repo
        .add_with_isbn(book.to_new_item(), isbn.map(str::to_string))
        .await?;
    info!(%id, title = %book.title, "remote book imported");
    Ok(ImportOutcome::Imported {
        id,
        title: book.title.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryItemRepository;
    use folio_model::{ItemDetails, NewItem};

    fn dune(isbn: Option<&str>) -> RemoteBook {
        RemoteBook {
            volume_id: "B1hSG45JCX4C".into(),
            isbn: isbn.map(str::to_string),
            title: "Dune".into(),
            authors: "Frank Herbert".into(),
            page_count: 604,
        }
    }

    #[tokio::test]
    async fn new_book_is_imported_as_available() {
        let repo = InMemoryItemRepository::new();
        let outcome = import_remote_book(&repo, &dune(Some("9780441013593")))
            .await
            .unwrap();
        let ImportOutcome::Imported { id, title } = outcome else {
            panic!("expected import");
        };
        assert_eq!(title, "Dune");

        let stored = repo.get(id).await.unwrap().unwrap();
        assert!(stored.available);
        assert_eq!(
            stored.details,
            ItemDetails::Book {
                pages: 604,
                author: "Frank Herbert".into()
            }
        );
    }

    #[tokio::test]
    async fn same_isbn_is_reported_with_existing_id() {
        let repo = InMemoryItemRepository::new();
        import_remote_book(&repo, &dune(Some("9780441013593")))
            .await
            .unwrap();

        let mut reissue = dune(Some("9780441013593"));
        reissue.title = "Dune (Deluxe Edition)".into();
        let outcome = import_remote_book(&repo, &reissue).await.unwrap();
        assert_eq!(
            outcome,
            ImportOutcome::AlreadyExists {
                title: "Dune (Deluxe Edition)".into(),
                reason: "ISBN 9780441013593 already exists (ID: 1)".into(),
            }
        );
        assert_eq!(repo.total_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn manual_entry_with_same_title_and_author_blocks_import() {
        let repo = InMemoryItemRepository::new();
        repo.add(NewItem::book("Dune", 412, "Frank Herbert"))
            .await
            .unwrap();

        let outcome = import_remote_book(&repo, &dune(None)).await.unwrap();
        assert!(matches!(
            outcome,
            ImportOutcome::AlreadyExists { ref reason, .. }
                if reason == "Title and author match existing item (ID: 1)"
        ));
    }

    #[tokio::test]
    async fn blank_isbn_skips_isbn_check() {
        let repo = InMemoryItemRepository::new();
        let outcome = import_remote_book(&repo, &dune(Some("  "))).await.unwrap();
        assert!(matches!(outcome, ImportOutcome::Imported { .. }));
    }
}
