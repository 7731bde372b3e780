//! SQLite adapter behaviour: paging law, ordering, constraints, durability.

mod support;

use folio_core::database::sqlite::connect;
use folio_core::database::{
    DuplicateKey, InMemoryItemRepository, ItemRepository, SqliteItemRepository,
};
use folio_core::error::StorageError;
use folio_model::{ItemDetails, ItemId, Month, NewItem, SortField, SortOrder, SortPreference};
use support::{books, ids};

async fn memory_store() -> SqliteItemRepository {
    let pool = connect("sqlite::memory:", 1)
        .await
        .expect("open in-memory database");
    SqliteItemRepository::new(pool)
}

#[tokio::test]
async fn page_length_matches_remaining_items() {
    let repo = memory_store().await;
    repo.insert_all(books(23)).await.expect("seed");
    let total = repo.total_count().await.expect("count");
    assert_eq!(total, 23);

    for sort in [
        SortPreference::new(SortField::Name, SortOrder::Asc),
        SortPreference::new(SortField::DateAdded, SortOrder::Desc),
    ] {
        for limit in [1usize, 5, 8, 30] {
            for offset in [0usize, 1, 7, 15, 22, 23, 40] {
                let page = repo.page(limit, offset, sort).await.expect("page");
                assert_eq!(
                    page.len(),
                    limit.min(total.saturating_sub(offset)),
                    "limit {limit} offset {offset}"
                );
            }
        }
    }
}

#[tokio::test]
async fn consecutive_pages_tile_the_ordering() {
    let repo = memory_store().await;
    repo.insert_all(books(20)).await.expect("seed");
    let sort = SortPreference::new(SortField::DateAdded, SortOrder::Desc);

    let whole = repo.page(20, 0, sort).await.expect("whole");
    let mut tiled = Vec::new();
    for offset in (0..20).step_by(6) {
        tiled.extend(repo.page(6, offset, sort).await.expect("page"));
    }
    assert_eq!(ids(&whole), ids(&tiled));
    assert_eq!(ids(&whole), (1..=20).rev().collect::<Vec<_>>());
}

#[tokio::test]
async fn name_order_ignores_case() {
    let repo = memory_store().await;
    repo.insert_all(vec![
        NewItem::disk("beta", "CD"),
        NewItem::disk("Alpha", "CD"),
        NewItem::disk("gamma", "CD"),
    ])
    .await
    .expect("seed");

    let asc = repo
        .page(10, 0, SortPreference::new(SortField::Name, SortOrder::Asc))
        .await
        .expect("page");
    let names: Vec<_> = asc.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, ["Alpha", "beta", "gamma"]);

    let desc = repo
        .page(10, 0, SortPreference::new(SortField::Name, SortOrder::Desc))
        .await
        .expect("page");
    assert_eq!(desc[0].name, "gamma");
}

#[tokio::test]
async fn every_variant_survives_storage() {
    let repo = memory_store().await;
    let newspaper = NewItem::newspaper("The Times", 71234, Month::October).with_available(false);
    let id = repo.add(newspaper.clone()).await.expect("add");

    let stored = repo.get(id).await.expect("get").expect("present");
    assert_eq!(stored.id, id);
    assert!(!stored.available);
    assert_eq!(stored.name, "The Times");
    assert_eq!(stored.details, newspaper.details);

    let disk_id = repo.add(NewItem::disk("Alien", "Blu-ray")).await.expect("add");
    let disk = repo.get(disk_id).await.expect("get").expect("present");
    assert_eq!(
        disk.details,
        ItemDetails::Disk {
            disk_type: "Blu-ray".into()
        }
    );
}

#[tokio::test]
async fn ids_are_never_reused() {
    let repo = memory_store().await;
    let first = repo.add(NewItem::disk("One", "CD")).await.expect("add");
    assert!(repo.remove(first).await.expect("remove"));
    assert!(!repo.remove(first).await.expect("remove again"));

    let second = repo.add(NewItem::disk("Two", "CD")).await.expect("add");
    assert!(second > first);
    assert_eq!(repo.get(first).await.expect("get"), None);
}

#[tokio::test]
async fn duplicate_isbn_is_rejected() {
    let repo = memory_store().await;
    let book = NewItem::book("Dune", 604, "Frank Herbert");
    repo.add_with_isbn(book.clone(), Some("9780441013593".into()))
        .await
        .expect("first insert");

    let err = repo
        .add_with_isbn(book, Some("9780441013593".into()))
        .await
        .expect_err("unique isbn");
    assert!(matches!(err, StorageError::Constraint(_)));

    let by_isbn = repo
        .find_duplicate(&DuplicateKey::Isbn("9780441013593".into()))
        .await
        .expect("lookup");
    assert_eq!(by_isbn.map(|item| item.id), Some(ItemId(1)));

    let by_name = repo
        .find_duplicate(&DuplicateKey::NameAndAuthor {
            name: "Dune".into(),
            author: "Frank Herbert".into(),
        })
        .await
        .expect("lookup");
    assert!(by_name.is_some());
}

#[tokio::test]
async fn availability_toggle_is_persisted() {
    let repo = memory_store().await;
    let id = repo.add(NewItem::disk("Heat", "DVD")).await.expect("add");
    assert!(repo.set_available(id, false).await.expect("toggle"));
    assert!(!repo.get(id).await.expect("get").expect("present").available);
    assert!(!repo.set_available(ItemId(999), false).await.expect("toggle"));
}

#[tokio::test]
async fn file_database_survives_reconnect() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite://{}", dir.path().join("catalog.db").display());

    {
        let pool = connect(&url, 2).await.expect("open");
        let repo = SqliteItemRepository::new(pool.clone());
        repo.insert_all(books(5)).await.expect("seed");
        pool.close().await;
    }

    let pool = connect(&url, 2).await.expect("reopen");
    let repo = SqliteItemRepository::new(pool);
    assert_eq!(repo.total_count().await.expect("count"), 5);
    repo.clear().await.expect("clear");
    assert_eq!(repo.total_count().await.expect("count"), 0);
}

#[tokio::test]
async fn name_order_matches_in_memory_store_for_non_ascii_names() {
    let names = ["Яблоко", "apple", "арбуз", "Zebra", "Éclair"];
    let items = || {
        names
            .iter()
            .map(|name| NewItem::disk(*name, "CD"))
            .collect::<Vec<_>>()
    };
    let sqlite = memory_store().await;
    sqlite.insert_all(items()).await.expect("seed sqlite");
    let memory = InMemoryItemRepository::new();
    memory.insert_all(items()).await.expect("seed memory");

    let expected = ["apple", "Zebra", "Éclair", "Яблоко", "арбуз"];
    for order in [SortOrder::Asc, SortOrder::Desc] {
        let sort = SortPreference::new(SortField::Name, order);
        let from_sqlite = sqlite.page(10, 0, sort).await.expect("sqlite page");
        let from_memory = memory.page(10, 0, sort).await.expect("memory page");

        let names_of = |items: &[folio_model::CatalogItem]| {
            items.iter().map(|item| item.name.clone()).collect::<Vec<_>>()
        };
        assert_eq!(names_of(&from_sqlite), names_of(&from_memory), "{order:?}");

        let mut want: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
        if order == SortOrder::Desc {
            want.reverse();
        }
        assert_eq!(names_of(&from_sqlite), want);
    }
}
