//! element-locator CLI
//!
//! Offline inspection of saved UI snapshots: render the page description,
//! resolve points, replay quick answers and saved AI responses. No AI call is
//! ever made from here.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use element_locator::ai::{assertion_response_schema, element_response_schema, extract_response_schema};
use element_locator::describe::{describe_elements, describe_text_format};
use element_locator::{
    ElementIndex, LocatorConfig, Point, QuickAnswer, UiContext, describe_page, element_at_position, normalize_response,
    resolve_quick_answer, to_absolute,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "element-locator")]
#[command(version)]
#[command(about = "Resolve UI targets against saved snapshots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the page description the AI would receive
    Describe {
        /// Snapshot JSON file
        snapshot: PathBuf,

        /// Print the flat element listing instead of the tree outline
        #[arg(long)]
        flat: bool,

        /// Omit the element tree, as for position-answering models
        #[arg(long)]
        match_by_position: bool,
    },
    /// Find the smallest element under a point
    At {
        /// Snapshot JSON file
        snapshot: PathBuf,

        #[arg(long)]
        x: f64,

        #[arg(long)]
        y: f64,

        /// Treat x/y as 0-1000 normalized coordinates
        #[arg(long)]
        normalized: bool,
    },
    /// Resolve a quick answer (id first, then position)
    Quick {
        /// Snapshot JSON file
        snapshot: PathBuf,

        #[arg(long)]
        id: Option<String>,

        #[arg(long, requires = "y")]
        x: Option<f64>,

        #[arg(long, requires = "x")]
        y: Option<f64>,
    },
    /// Normalize a saved AI response against the snapshot
    Normalize {
        /// Snapshot JSON file
        snapshot: PathBuf,

        /// File holding the AI's JSON answer
        #[arg(long, value_name = "FILE")]
        response: PathBuf,

        /// Target description, for error messages
        #[arg(long, default_value = "")]
        target: String,
    },
    /// Print the JSON schema of an AI answer
    Schema {
        #[arg(long, value_enum, default_value_t = SchemaKind::Locate)]
        kind: SchemaKind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemaKind {
    Locate,
    Extract,
    Assert,
}

fn load(snapshot: &Path) -> anyhow::Result<UiContext> {
    UiContext::from_json_file(snapshot).with_context(|| format!("Failed to load snapshot {}", snapshot.display()))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Describe {
            snapshot,
            flat,
            match_by_position,
        } => {
            let context = load(&snapshot)?;
            let mut config = LocatorConfig::from_env();
            config.match_by_position |= match_by_position;
            let page = describe_page(&context, &config)?;

            if flat {
                println!("{}", describe_text_format());
                println!("{}", describe_elements(page.index.elements()));
            } else {
                println!("{}", page.description);
            }
        }
        Command::At {
            snapshot,
            x,
            y,
            normalized,
        } => {
            let context = load(&snapshot)?;
            let mut point = Point::new(x, y);
            if normalized {
                point = to_absolute(point, context.resolve_size()?);
            }

            match element_at_position(&context.tree, point) {
                Some(element) => println!("{}", serde_json::to_string_pretty(element)?),
                None => eprintln!("No element at ({}, {})", point.x, point.y),
            }
        }
        Command::Quick { snapshot, id, x, y } => {
            let mut context = load(&snapshot)?;
            let mut index = ElementIndex::build(&context.tree);
            let quick_answer = QuickAnswer {
                id,
                position: x.zip(y).map(|(x, y)| Point::new(x, y)),
            };

            match resolve_quick_answer(Some(&quick_answer), &mut context.tree, &mut index) {
                Some(result) => println!("{}", serde_json::to_string_pretty(&result)?),
                None => bail!("Quick answer did not resolve; an AI call would be needed"),
            }
        }
        Command::Normalize {
            snapshot,
            response,
            target,
        } => {
            let mut context = load(&snapshot)?;
            let size = context.resolve_size()?;
            let mut index = ElementIndex::build(&context.tree);

            let raw = std::fs::read_to_string(&response)
                .with_context(|| format!("Failed to read response {}", response.display()))?;
            let content: serde_json::Value = serde_json::from_str(&raw)?;

            let result = normalize_response(&content, &target, &mut context.tree, &mut index, size)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Schema { kind } => {
            let schema = match kind {
                SchemaKind::Locate => element_response_schema()?,
                SchemaKind::Extract => extract_response_schema()?,
                SchemaKind::Assert => assertion_response_schema()?,
            };
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}
