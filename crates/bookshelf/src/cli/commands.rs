//! # CLI Layer
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Installs a `tracing` subscriber
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Context Setup**: resolve the data dir, load config, open the file store and auth
//! 2. **Dispatch**: route each command to the API facade
//! 3. **Output Formatting**: hand results to `render.rs`, or print JSON with `--json`

use super::render;
use super::setup::{parse_cli, Cli, Commands};
use anyhow::{anyhow, bail, Context as _};
use bookshelfapp::adapter::{BookListAdapter, ImageLoader, ItemClickListener};
use bookshelfapp::api::BookshelfApi;
use bookshelfapp::commands::open::TapOutcome;
use bookshelfapp::commands::{CmdResult, MessageLevel, MessageLog};
use bookshelfapp::config::{default_data_dir, BookshelfConfig};
use bookshelfapp::listing::ListingFlow;
use bookshelfapp::model::{BookDraft, DocumentId, Record};
use bookshelfapp::store::fs::{FileAuth, FileStore};
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Api = BookshelfApi<FileStore, FileAuth>;

struct AppContext {
    api: Api,
    json: bool,
}

/// The terminal cannot show photos; rows only note that one exists.
struct DeferredImages;

impl ImageLoader for DeferredImages {
    fn load(&self, url: &str, row: usize) {
        tracing::debug!(url, row, "photo not rendered in terminal");
    }
}

/// Remembers the last tapped row.
#[derive(Default)]
struct TapTarget {
    index: Cell<Option<usize>>,
}

impl ItemClickListener for TapTarget {
    fn on_item_click(&self, index: usize) {
        self.index.set(Some(index));
    }
}

/// A started listing with its adapter bound to it.
struct Listing {
    _flow: ListingFlow,
    adapter: BookListAdapter,
}

impl Listing {
    fn records(&self) -> Vec<Record> {
        (0..self.adapter.row_count())
            .filter_map(|i| self.adapter.record(i))
            .collect()
    }
}

pub fn run() -> anyhow::Result<()> {
    init_tracing();
    let cli = parse_cli();
    let ctx = create_context(&cli)?;

    match cli.command.unwrap_or(Commands::List) {
        Commands::Signup {
            email,
            password,
            username,
        } => print_result(&ctx, ctx.api.sign_up(&email, &password, &username)?),
        Commands::Signin { email, password } => {
            print_result(&ctx, ctx.api.sign_in(&email, &password)?)
        }
        Commands::Signout => print_result(&ctx, ctx.api.sign_out()?),
        Commands::Whoami => handle_whoami(&ctx),
        Commands::List => handle_list(&ctx),
        Commands::Add {
            title,
            author,
            content,
            photo,
        } => handle_add(&ctx, title, author, content, photo.as_deref()),
        Commands::Open { index } => handle_open(&ctx, index),
        Commands::Delete { title, id } => handle_delete(&ctx, title, id),
        Commands::Config => handle_config(&ctx),
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn create_context(cli: &Cli) -> anyhow::Result<AppContext> {
    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => default_data_dir()?,
    };
    let config = BookshelfConfig::load(&data_dir)?;
    tracing::debug!(data_dir = %data_dir.display(), collection = %config.collection, "context ready");

    let api = BookshelfApi::new(
        FileStore::new(data_dir.clone()),
        FileAuth::new(data_dir),
        config,
    );
    Ok(AppContext {
        api,
        json: cli.json,
    })
}

/// Start the listing flow and bind an adapter to its first snapshot.
fn start_listing(api: &Api) -> anyhow::Result<Listing> {
    let log = Rc::new(MessageLog::new());
    let mut flow = api.listing(log.clone());
    flow.start(api.store())?;

    if let Some(error) = log
        .drain()
        .into_iter()
        .find(|msg| msg.level == MessageLevel::Error)
    {
        bail!("Could not load books: {}", error.content);
    }

    let adapter = BookListAdapter::new(&flow.books(), Rc::new(DeferredImages));
    Ok(Listing {
        _flow: flow,
        adapter,
    })
}

fn print_result(ctx: &AppContext, result: CmdResult) -> anyhow::Result<()> {
    if ctx.json {
        print!(
            "{}",
            render::render_json(&serde_json::json!({
                "books": result.affected_books,
                "messages": result.messages,
            }))?
        );
    } else {
        print!("{}", render::render_messages(&result.messages));
    }
    Ok(())
}

fn handle_whoami(ctx: &AppContext) -> anyhow::Result<()> {
    let user = ctx.api.current_user()?;
    if ctx.json {
        print!("{}", render::render_json(&user)?);
        return Ok(());
    }
    match user {
        Some(user) => println!(
            "Signed in as {} <{}>",
            user.display_name.as_deref().unwrap_or("(no username)"),
            user.email
        ),
        None => println!("Not signed in"),
    }
    Ok(())
}

fn handle_list(ctx: &AppContext) -> anyhow::Result<()> {
    let listing = start_listing(&ctx.api)?;
    if ctx.json {
        print!("{}", render::render_json(&listing.records())?);
        return Ok(());
    }

    let rows: Vec<_> = (0..listing.adapter.row_count())
        .filter_map(|i| listing.adapter.bind_row(i))
        .collect();
    print!("{}", render::render_rows(&rows));
    Ok(())
}

fn handle_add(
    ctx: &AppContext,
    title: String,
    author: String,
    content: String,
    photo: Option<&Path>,
) -> anyhow::Result<()> {
    let mut draft = BookDraft::new(title, author, content);
    if let Some(path) = photo {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Could not read photo {}", path.display()))?;
        draft = draft.with_photo(bytes);
    }
    print_result(ctx, ctx.api.create_book(draft)?)
}

fn handle_open(ctx: &AppContext, index: usize) -> anyhow::Result<()> {
    if index == 0 {
        bail!("Positions start at 1");
    }
    let mut listing = start_listing(&ctx.api)?;
    let target = Rc::new(TapTarget::default());
    listing.adapter.set_click_listener(target.clone());
    listing.adapter.on_row_tapped(index - 1);

    let record = target
        .index
        .get()
        .and_then(|i| listing.adapter.record(i))
        .ok_or_else(|| anyhow!("No book at position {}", index))?;

    match ctx.api.open_book(&record)? {
        TapOutcome::Proceed(record) => {
            if ctx.json {
                print!("{}", render::render_json(&record)?);
            } else {
                print!("{}", render::render_detail(&record));
            }
        }
        TapOutcome::Rejected(message) => {
            print!("{}", render::render_messages(&[message]));
        }
    }
    Ok(())
}

fn handle_delete(
    ctx: &AppContext,
    title: Option<String>,
    id: Option<String>,
) -> anyhow::Result<()> {
    let result = match (title, id) {
        (_, Some(id)) => ctx.api.delete_book_by_id(&DocumentId::from(id))?,
        (Some(title), None) => ctx.api.delete_books_by_title(&title)?,
        (None, None) => bail!("Give a title or --id"),
    };
    print_result(ctx, result)
}

fn handle_config(ctx: &AppContext) -> anyhow::Result<()> {
    let config = ctx.api.config();
    if ctx.json {
        print!("{}", render::render_json(config)?);
        return Ok(());
    }
    if let serde_json::Value::Object(map) = serde_json::to_value(config)? {
        for (key, value) in map {
            println!("{} = {}", key, value);
        }
    }
    Ok(())
}
