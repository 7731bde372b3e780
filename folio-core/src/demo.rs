//! Sample catalog used to populate an empty store. Only compiled with the
//! `demo` feature.

use folio_model::{Month, NewItem};
use tracing::info;

use crate::database::{ItemRepository, StorageResult};

/// The built-in sample items, eight of each kind.
pub fn sample_items() -> Vec<NewItem> {
    vec![
        NewItem::book("The Jungle Book", 202, "Rudyard Kipling"),
        NewItem::newspaper("Rural Life", 794, Month::March),
        NewItem::disk("Deadpool & Wolverine", "DVD"),
        NewItem::book("War and Peace", 1225, "Leo Tolstoy"),
        NewItem::newspaper("World News", 150, Month::July),
        NewItem::disk("Interstellar", "CD"),
        NewItem::book("1984", 328, "George Orwell"),
        NewItem::newspaper("Sport Today", 45, Month::April),
        NewItem::disk("Star Wars", "Blu-ray"),
        NewItem::book("To Kill a Mockingbird", 281, "Harper Lee"),
        NewItem::newspaper("Economy and Life", 120, Month::February),
        NewItem::disk("Titanic", "DVD"),
        NewItem::book(
            "Harry Potter and the Philosopher's Stone",
            223,
            "J. K. Rowling",
        ),
        NewItem::newspaper("Science and Life", 300, Month::January),
        NewItem::disk("The Lord of the Rings", "Blu-ray"),
        NewItem::book("The Master and Margarita", 406, "Mikhail Bulgakov"),
        NewItem::newspaper("Culture and Art", 200, Month::May),
        NewItem::disk("Avatar", "DVD"),
        NewItem::book("Crime and Punishment", 430, "Fyodor Dostoevsky"),
        NewItem::newspaper("Technologies of the Future", 75, Month::August),
        NewItem::disk("The Matrix", "Blu-ray"),
        NewItem::book("Fahrenheit 451", 256, "Ray Bradbury"),
        NewItem::newspaper("Politics and Society", 90, Month::November),
        NewItem::disk("Inception", "DVD"),
    ]
}

/// Insert the sample items. With `replace` the store is emptied first;
/// otherwise a non-empty store is left untouched. Returns how many items
/// were inserted.
pub async fn seed(repo: &dyn ItemRepository, replace: bool) -> StorageResult<usize> {
    if replace {
        repo.clear().await?;
    } else if repo.total_count().await? > 0 {
        info!("catalog already populated, demo seed skipped");
        return Ok(0);
    }

    let ids = repo.insert_all(sample_items()).await?;
    info!(count = ids.len(), "demo catalog seeded");
    Ok(ids.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryItemRepository;
    use folio_model::ItemKind;

    #[test]
    fn samples_cover_every_kind_evenly() {
        let items = sample_items();
        assert_eq!(items.len(), 24);
        for kind in [ItemKind::Book, ItemKind::Newspaper, ItemKind::Disk] {
            assert_eq!(items.iter().filter(|item| item.kind() == kind).count(), 8);
        }
    }

    #[tokio::test]
    async fn seed_is_skipped_for_populated_store_unless_replacing() {
        let repo = InMemoryItemRepository::new();
        assert_eq!(seed(&repo, false).await.unwrap(), 24);
        assert_eq!(seed(&repo, false).await.unwrap(), 0);
        assert_eq!(seed(&repo, true).await.unwrap(), 24);
        assert_eq!(repo.total_count().await.unwrap(), 24);
    }
}
