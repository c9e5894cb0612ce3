use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "bookshelf",
    bin_name = "bookshelf",
    version,
    disable_help_subcommand = true
)]
#[command(about = "A shared shelf of book notes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (defaults to $BOOKSHELF_DATA, then the platform data dir)
    #[arg(long, global = true, help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Print JSON instead of formatted text
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account and sign in
    #[command(display_order = 1)]
    Signup {
        email: String,
        password: String,
        /// Display name, shown as the owner of your books
        username: String,
    },

    /// Sign in with email and password
    #[command(alias = "login", display_order = 2)]
    Signin { email: String, password: String },

    /// Sign out
    #[command(alias = "logout", display_order = 3)]
    Signout,

    /// Show the signed-in user
    #[command(display_order = 4)]
    Whoami,

    /// List all books, newest first
    #[command(alias = "ls", display_order = 10)]
    List,

    /// Add a book
    #[command(alias = "n", display_order = 11)]
    Add {
        title: String,
        author: String,
        content: String,

        /// Cover photo to upload
        #[arg(long)]
        photo: Option<PathBuf>,
    },

    /// Open the n-th listed book (only your own)
    #[command(alias = "v", display_order = 12)]
    Open {
        /// Position in `bookshelf list` (1-based)
        index: usize,
    },

    /// Delete books by title (every match), or one book by id
    #[command(alias = "rm", display_order = 13)]
    #[command(group(ArgGroup::new("target").required(true).args(["title", "id"])))]
    Delete {
        /// Exact title; all books with this title are deleted
        title: Option<String>,

        /// Document id of a single book
        #[arg(long)]
        id: Option<String>,
    },

    /// Show the resolved configuration
    #[command(display_order = 20)]
    Config,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
