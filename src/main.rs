use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use note_board::config::Config;
use note_board::domain::{BoardError, Change, Column};
use note_board::infrastructure::FileStorage;
use note_board::services::{BoardStore, Migration};

#[derive(Parser, Debug)]
#[command(name = "note-board", about = "Three-column note board with checklist-driven cards")]
struct Cli {
    /// Directory holding the board snapshot.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Storage key; the snapshot lives at `<data-dir>/<key>.json`.
    #[arg(long)]
    key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the board.
    Show,
    /// Add a card to a column (1-3).
    Create {
        #[arg(value_parser = clap::value_parser!(u64).range(1..=3))]
        column: u64,
    },
    /// Flip a checklist item (1-based).
    Toggle {
        card_id: u64,
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        item: u64,
    },
    AddItem {
        card_id: u64,
        text: String,
    },
    EditItem {
        card_id: u64,
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        item: u64,
        text: String,
    },
    Rename {
        card_id: u64,
        title: String,
    },
    Remove {
        card_id: u64,
    },
    /// Move a card forward to a column (1-3).
    Move {
        card_id: u64,
        #[arg(value_parser = clap::value_parser!(u64).range(1..=3))]
        column: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env_unchecked();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(key) = cli.key {
        config.storage_key = key;
    }
    config.validate().context("Invalid configuration")?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let storage = FileStorage::new(&config.data_dir);
    let mut store = BoardStore::open_or_default(storage, config.storage_key.clone());

    let path = store.storage().path_for(store.key());
    let outcome = run(&mut store, cli.command)
        .with_context(|| format!("Failed to update board at {}", path.display()))?;

    for column in store.columns() {
        print_column(column);
    }

    match outcome {
        Some(Change::Applied(message)) => println!("{}", message),
        Some(Change::Rejected(reason)) => println!("Nothing changed: {}", reason),
        None => {}
    }

    Ok(())
}

fn run(
    store: &mut BoardStore<FileStorage>,
    command: Command,
) -> Result<Option<Change<String>>, BoardError> {
    let change = match command {
        Command::Show => return Ok(None),
        Command::Create { column } => store
            .create_card(to_index(column))?
            .map_applied(|id| format!("Created card {}", id)),
        Command::Toggle { card_id, item } => store
            .toggle_item(card_id, to_index(item))?
            .map_applied(describe_migration),
        Command::AddItem { card_id, text } => store
            .add_item(card_id, &text)?
            .map_applied(describe_migration),
        Command::EditItem {
            card_id,
            item,
            text,
        } => store
            .edit_item(card_id, to_index(item), &text)?
            .map_applied(|()| format!("Updated item {} of card {}", item, card_id)),
        Command::Rename { card_id, title } => store
            .rename_card(card_id, &title)?
            .map_applied(|()| format!("Renamed card {}", card_id)),
        Command::Remove { card_id } => store
            .remove_card(card_id)?
            .map_applied(|()| format!("Removed card {}", card_id)),
        Command::Move { card_id, column } => store
            .move_card(card_id, to_index(column))?
            .map_applied(|()| format!("Moved card {}", card_id)),
    };
    Ok(Some(change))
}

/// CLI positions are 1-based; clap has already rejected 0.
fn to_index(position: u64) -> usize {
    (position - 1) as usize
}

fn describe_migration(migration: Option<Migration>) -> String {
    match migration {
        Some(m) => format!("Card {} moved from {} to {}", m.card_id, m.from, m.to),
        None => "Updated".to_string(),
    }
}

fn print_column(column: &Column) {
    let capacity = column
        .title
        .capacity()
        .map(|cap| format!("{}/{}", column.cards.len(), cap))
        .unwrap_or_else(|| column.cards.len().to_string());
    println!("== {} ({})", column.title, capacity);

    for card in &column.cards {
        println!("  [{}] {}", card.id, card.title);
        for (index, item) in card.items.iter().enumerate() {
            let mark = if item.completed { "x" } else { " " };
            println!("      {}. [{}] {}", index + 1, mark, item.text);
        }
        if let Some(done) = card.completed_date {
            let local = done.with_timezone(&chrono::Local);
            println!("      completed {}", local.format("%Y-%m-%d %H:%M"));
        }
    }
}
