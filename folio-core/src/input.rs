//! Validation of user-entered item forms.
//!
//! Drafts hold raw text exactly as typed. [`ItemDraft::validate`] turns a
//! draft into a [`NewItem`] or reports every offending field, so nothing
//! malformed ever reaches the store.

use std::fmt::{self, Display};

use folio_model::{ItemDetails, ItemKind, Month, NewItem};

/// Form field a validation failure is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Available,
    Pages,
    Author,
    IssueNumber,
    Month,
    DiskType,
    SearchQuery,
}

impl Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Field::Name => "name",
            Field::Available => "available",
            Field::Pages => "pages",
            Field::Author => "author",
            Field::IssueNumber => "issue number",
            Field::Month => "month",
            Field::DiskType => "disk type",
            Field::SearchQuery => "search",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// All field failures of one draft.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: Field, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn single(field: Field, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn for_field(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|err| err.field == field)
            .map(|err| err.message.as_str())
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for err in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Raw form input for a new catalog entry.
#[derive(Debug, Clone, Default)]
pub struct ItemDraft {
    pub name: String,
    /// `yes`/`no` (also `true`/`false`), case-insensitive. Blank means yes.
    pub available: String,
    pub pages: String,
    pub author: String,
    pub issue_number: String,
    pub month: String,
    pub disk_type: String,
}

impl ItemDraft {
    pub fn validate(&self, kind: ItemKind) -> Result<NewItem, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(Field::Name, "name must not be empty");
        }

        let available = match parse_availability(&self.available) {
            Some(flag) => flag,
            None => {
                errors.push(Field::Available, "expected yes or no");
                true
            }
        };

        let details = match kind {
            ItemKind::Book => {
                let pages = parse_positive(&self.pages);
                if pages.is_none() {
                    errors.push(Field::Pages, "page count must be a positive number");
                }
                let author = self.author.trim();
                if author.is_empty() {
                    errors.push(Field::Author, "author must not be empty");
                }
                pages.map(|pages| ItemDetails::Book {
                    pages,
                    author: author.to_string(),
                })
            }
            ItemKind::Newspaper => {
                let issue_number = parse_positive(&self.issue_number);
                if issue_number.is_none() {
                    errors.push(
                        Field::IssueNumber,
                        "issue number must be a positive number",
                    );
                }
                let month = Month::from_display_name(&self.month);
                if month.is_none() {
                    errors.push(Field::Month, "unknown month name");
                }
                issue_number.zip(month).map(|(issue_number, month)| {
                    ItemDetails::Newspaper {
                        issue_number,
                        month,
                    }
                })
            }
            ItemKind::Disk => {
                let disk_type = self.disk_type.trim();
                if disk_type.is_empty() {
                    errors.push(Field::DiskType, "disk type must not be empty");
                }
                Some(ItemDetails::Disk {
                    disk_type: disk_type.to_string(),
                })
            }
        };

        match details {
            Some(details) if errors.is_empty() => Ok(NewItem {
                available,
                name: name.to_string(),
                details,
            }),
            _ => Err(errors),
        }
    }
}

fn parse_availability(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "yes" | "y" | "true" => Some(true),
        "no" | "n" | "false" => Some(false),
        _ => None,
    }
}

fn parse_positive(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|value| *value > 0)
}
