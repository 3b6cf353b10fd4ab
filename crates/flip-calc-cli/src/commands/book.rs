use clap::{Args, Subcommand};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

use flip_calc_core::portfolio::{DealBook, MAX_COMPARE};

use crate::input;

/// Arguments for deal-book operations
#[derive(Args)]
pub struct BookArgs {
    /// Path to the deal book (JSON array of deals)
    #[arg(long)]
    pub book: String,

    #[command(subcommand)]
    pub action: BookAction,
}

#[derive(Subcommand)]
pub enum BookAction {
    /// Summarise every deal in the book
    List,
    /// Compare up to three deals side by side
    Compare {
        /// Deal ids, comma separated; only the first three are used
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<String>,
    },
    /// Add a blank deal (creates the book if missing)
    Create,
    /// Copy a deal under a new id
    Duplicate {
        #[arg(long)]
        id: String,
    },
    /// Remove a deal
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Full valuation of one deal
    Evaluate {
        #[arg(long)]
        id: String,
    },
}

fn load_book(path: &str) -> Result<DealBook, Box<dyn std::error::Error>> {
    let text = input::file::read_text(path)?;
    Ok(DealBook::from_json(&text)?)
}

fn save_book(path: &str, book: &DealBook) -> Result<(), Box<dyn std::error::Error>> {
    fs::write(path, book.to_json()?).map_err(|e| format!("Failed to write '{path}': {e}"))?;
    log::info!("saved {} deal(s) to {path}", book.len());
    Ok(())
}

pub fn run_book(args: BookArgs) -> Result<Value, Box<dyn std::error::Error>> {
    match args.action {
        BookAction::List => {
            let book = load_book(&args.book)?;
            Ok(json!({ "results": book.summaries() }))
        }
        BookAction::Compare { ids } => {
            let book = load_book(&args.book)?;
            if ids.len() > MAX_COMPARE {
                log::warn!("comparing only the first {MAX_COMPARE} of {} ids", ids.len());
            }
            Ok(json!({ "results": book.compare(&ids) }))
        }
        BookAction::Create => {
            let (book, created) = if Path::new(&args.book).exists() {
                let mut book = load_book(&args.book)?;
                let created = book.create().clone();
                (book, created)
            } else {
                let book = DealBook::new();
                let created = book.deals()[0].clone();
                (book, created)
            };
            save_book(&args.book, &book)?;
            Ok(json!({ "result": created }))
        }
        BookAction::Duplicate { id } => {
            let mut book = load_book(&args.book)?;
            let copy = book.duplicate(&id)?.clone();
            save_book(&args.book, &book)?;
            Ok(json!({ "result": copy }))
        }
        BookAction::Delete { id } => {
            let mut book = load_book(&args.book)?;
            let removed = book.delete(&id)?;
            save_book(&args.book, &book)?;
            Ok(json!({ "result": { "deleted": removed.id, "remaining": book.len() } }))
        }
        BookAction::Evaluate { id } => {
            let book = load_book(&args.book)?;
            let deal = book
                .get(&id)
                .ok_or_else(|| format!("Deal not found: {id}"))?;
            Ok(serde_json::to_value(deal.analyze())?)
        }
    }
}
