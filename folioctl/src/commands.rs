use anyhow::{Result, bail};
use folio_core::demo;
use folio_core::input::ItemDraft;
use folio_core::pagination::{LoadOutcome, PaginationState};
use folio_core::view_state::{Row, project_snapshot};
use folio_core::{CatalogError, CirculationOutcome, LibrarySession};
use folio_model::{CatalogItem, ItemId, ItemKind, RemoteBook, SortPreference};
use tracing::info;

use crate::app::App;
use crate::cli::{AddItem, BorrowMode, Command, SearchArgs, SortFieldArg, SortOrderArg};

pub async fn run(app: App, command: Command) -> Result<()> {
    let session = &app.session;
    match command {
        Command::Seed { replace } => {
            let inserted = demo::seed(app.repo.as_ref(), replace).await?;
            if inserted == 0 {
                println!("catalog already has items; use --replace to start over");
            } else {
                info!(inserted, "catalog seeded");
                println!("added {inserted} sample items");
            }
        }
        Command::List { all, detailed } => list(session, all, detailed).await?,
        Command::Add { item } => add(session, item).await?,
        Command::Remove { id } => {
            let removed = checked(session.delete_item(id).await)?.settled().await;
            if removed {
                println!("item {id} deleted");
            } else {
                bail!("item {id} was not found in the library");
            }
        }
        Command::Show { id } => match checked(session.detail(id).await)? {
            Some(item) => println!("{}", item.detailed_info()),
            None => bail!("item {id} was not found in the library"),
        },
        Command::Borrow { id, mode } => {
            let update = match mode {
                BorrowMode::Home => session.take_home(id).await,
                BorrowMode::Library => session.read_in_library(id).await,
            };
            report_circulation(checked(update)?.settled().await)?;
        }
        Command::Return { id } => {
            report_circulation(checked(session.return_item(id).await)?.settled().await)?;
        }
        Command::Digitize { id } => {
            report_circulation(checked(session.digitize(id).await)?.settled().await)?;
        }
        Command::Search(query) => {
            let found = search(session, &query).await?;
            if found.is_empty() {
                println!("no books found");
            }
            for (index, book) in found.iter().enumerate() {
                println!("{:>3}. {}", index + 1, remote_line(book));
            }
        }
        Command::Import { query, pick, all } => {
            let found = search(session, &query).await?;
            let chosen: Vec<&RemoteBook> = if all {
                found.iter().collect()
            } else {
                match pick.checked_sub(1).and_then(|index| found.get(index)) {
                    Some(book) => vec![book],
                    None => bail!("result {pick} not found; the search returned {}", found.len()),
                }
            };
            for book in chosen {
                let outcome = checked(session.import(book).await)?.settled().await;
                println!("{}", outcome.message());
            }
        }
        Command::Sort { field, order } => sort(session, field, order).await?,
    }
    Ok(())
}

/// Print the user-facing text for session errors before handing them on.
fn checked<T>(result: folio_core::Result<T>) -> Result<T> {
    result.map_err(|err: CatalogError| {
        let message = err.user_message();
        anyhow::Error::new(err).context(message)
    })
}

async fn list(session: &LibrarySession, all: bool, detailed: bool) -> Result<()> {
    let controller = session.controller();
    let snapshot = controller.snapshot();
    if let PaginationState::Error(message) = &snapshot.state {
        bail!("{message}");
    }
    if snapshot.window.total_count == 0 {
        println!("the catalog is empty");
        return Ok(());
    }

    let mut printed_upto = print_rows(&snapshot, 0, detailed);
    if all {
        while let Some(handle) = controller.load_more_after() {
            match handle.finished().await {
                LoadOutcome::Loaded { .. } => {}
                LoadOutcome::Failed(message) => bail!("{message}"),
                LoadOutcome::Superseded => break,
            }
            printed_upto = print_rows(&controller.snapshot(), printed_upto, detailed);
        }
    }

    let window = controller.snapshot().window;
    println!(
        "-- {} of {} items, sorted by {}",
        printed_upto,
        window.total_count,
        session.sort()
    );
    Ok(())
}

/// Print rows at catalog positions from `from` onwards; returns the
/// position after the last row printed.
fn print_rows(
    snapshot: &folio_core::pagination::PaginationSnapshot,
    from: usize,
    detailed: bool,
) -> usize {
    let mut position = snapshot.window.offset;
    for row in project_snapshot(snapshot) {
        let Row::Item(item) = row else {
            continue;
        };
        if position >= from {
            println!("{:>5}  {}", position + 1, item_line(&item, detailed));
        }
        position += 1;
    }
    position.max(from)
}

fn item_line(item: &CatalogItem, detailed: bool) -> String {
    if detailed {
        item.detailed_info()
    } else {
        let marker = if item.available { ' ' } else { '*' };
        format!("{marker} {:<10} {}", item.kind().as_str(), item.short_info())
    }
}

async fn add(session: &LibrarySession, item: AddItem) -> Result<()> {
    let (kind, draft) = match item {
        AddItem::Book {
            common,
            pages,
            author,
        } => (
            ItemKind::Book,
            ItemDraft {
                name: common.name,
                available: common.available,
                pages,
                author,
                ..Default::default()
            },
        ),
        AddItem::Newspaper {
            common,
            issue,
            month,
        } => (
            ItemKind::Newspaper,
            ItemDraft {
                name: common.name,
                available: common.available,
                issue_number: issue,
                month,
                ..Default::default()
            },
        ),
        AddItem::Disk { common, disk_type } => (
            ItemKind::Disk,
            ItemDraft {
                name: common.name,
                available: common.available,
                disk_type,
                ..Default::default()
            },
        ),
    };

    let id: ItemId = checked(session.add_draft(kind, &draft).await)?
        .settled()
        .await;
    println!("'{}' added to the library (id {id})", draft.name.trim());
    Ok(())
}

async fn search(session: &LibrarySession, query: &SearchArgs) -> Result<Vec<RemoteBook>> {
    checked(session.search(&query.author, &query.title).await)
}

fn remote_line(book: &RemoteBook) -> String {
    let isbn = book.isbn.as_deref().unwrap_or("no ISBN");
    format!(
        "{} by {} ({} pages, {isbn})",
        book.title, book.authors, book.page_count
    )
}

fn report_circulation(outcome: CirculationOutcome) -> Result<()> {
    if outcome.is_success() {
        println!("{}", outcome.message());
        Ok(())
    } else {
        bail!("{}", outcome.message())
    }
}

async fn sort(
    session: &LibrarySession,
    field: Option<SortFieldArg>,
    order: Option<SortOrderArg>,
) -> Result<()> {
    let current = session.sort();
    let Some(field) = field else {
        println!("{current}");
        return Ok(());
    };
    let wanted = SortPreference::new(
        field.into(),
        order.map(Into::into).unwrap_or(current.order),
    );

    match checked(session.set_sort(wanted).await)? {
        Some(reload) => {
            reload.finished().await;
            println!("sorting by {wanted}");
        }
        None => println!("already sorting by {current}"),
    }
    Ok(())
}
