use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use folio_model::{ItemId, SortField, SortOrder};

#[derive(Parser, Debug)]
#[command(
    name = "folioctl",
    version,
    about = "Manage a Folio library catalog: books, newspapers and disks"
)]
pub struct Cli {
    /// TOML configuration file (also FOLIO_CONFIG_PATH)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Env file imported before reading the environment
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,
    /// Override the catalog database URL
    #[arg(long, global = true)]
    pub database_url: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fill the catalog with sample items
    Seed {
        /// Replace existing items instead of skipping a non-empty catalog
        #[arg(long)]
        replace: bool,
    },
    /// Show the catalog in the saved sort order
    List {
        /// Keep loading forward until the end of the catalog
        #[arg(long)]
        all: bool,
        /// Print full details for each item
        #[arg(long)]
        detailed: bool,
    },
    /// Add a new item
    Add {
        #[command(subcommand)]
        item: AddItem,
    },
    /// Delete an item by id
    Remove { id: ItemId },
    /// Show one item in detail
    Show { id: ItemId },
    /// Lend an item out
    Borrow {
        id: ItemId,
        /// Where the item is read
        #[arg(long, value_enum, default_value = "home")]
        mode: BorrowMode,
    },
    /// Bring a lent item back
    Return { id: ItemId },
    /// Create a digital copy of a book or newspaper
    Digitize { id: ItemId },
    /// Search the remote book catalog
    Search(SearchArgs),
    /// Search the remote catalog and import a result
    Import {
        #[command(flatten)]
        query: SearchArgs,
        /// 1-based index of the result to import
        #[arg(long, default_value_t = 1, conflicts_with = "all")]
        pick: usize,
        /// Import every result
        #[arg(long)]
        all: bool,
    },
    /// Show or change the saved sort order
    Sort {
        #[arg(value_enum)]
        field: Option<SortFieldArg>,
        #[arg(value_enum, requires = "field")]
        order: Option<SortOrderArg>,
    },
}

#[derive(Subcommand, Debug)]
pub enum AddItem {
    /// Add a book
    Book {
        #[command(flatten)]
        common: CommonFields,
        #[arg(long)]
        pages: String,
        #[arg(long)]
        author: String,
    },
    /// Add a newspaper issue
    Newspaper {
        #[command(flatten)]
        common: CommonFields,
        #[arg(long)]
        issue: String,
        /// Month display name, e.g. March
        #[arg(long)]
        month: String,
    },
    /// Add a disk
    Disk {
        #[command(flatten)]
        common: CommonFields,
        /// e.g. CD, DVD, Blu-ray
        #[arg(long = "type")]
        disk_type: String,
    },
}

#[derive(Args, Debug)]
pub struct CommonFields {
    #[arg(long)]
    pub name: String,
    /// yes or no
    #[arg(long, default_value = "yes")]
    pub available: String,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    #[arg(long, default_value = "")]
    pub author: String,
    #[arg(long, default_value = "")]
    pub title: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum BorrowMode {
    Home,
    Library,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SortFieldArg {
    Name,
    Date,
}

impl From<SortFieldArg> for SortField {
    fn from(value: SortFieldArg) -> Self {
        match value {
            SortFieldArg::Name => SortField::Name,
            SortFieldArg::Date => SortField::DateAdded,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SortOrderArg {
    Asc,
    Desc,
}

impl From<SortOrderArg> for SortOrder {
    fn from(value: SortOrderArg) -> Self {
        match value {
            SortOrderArg::Asc => SortOrder::Asc,
            SortOrderArg::Desc => SortOrder::Desc,
        }
    }
}
