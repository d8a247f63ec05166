//! Synthesizes the streaming-analytics workshop stack.
//!
//! The workshop replays a historic stream of taxi trip events through a
//! Beam pipeline running on Kinesis Data Analytics, with a lambda
//! enriching events on the way in, a windows dev environment for
//! attendees and an EMR cluster for ad-hoc analysis. This binary only
//! synthesizes the template describing all of that. Hand the template
//! to the deployment engine to actually create anything.
//!
//! ```sh
//! cargo run -p beam-workshop -- synth
//! cargo run -p beam-workshop -- order
//! cargo run -p beam-workshop -- graph --out stack.dot
//! cargo run -p beam-workshop -- --config workshop.toml synth --out out/template.json
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod config;
mod helpers;
mod stack;

use config::WorkshopConfig;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "infra",
    about = "Synthesizes the streaming-analytics workshop stack"
)]
struct Cli {
    /// Path to a TOML configuration bundle. Built-in defaults are used
    /// when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Name of the stack.
    #[arg(long, default_value = "beam-workshop")]
    stack_name: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Synthesize the template and write it as JSON.
    Synth {
        /// Where to write the template.
        #[arg(long, default_value = "template.json")]
        out: PathBuf,
    },
    /// Print the batched creation order of the template.
    Order,
    /// Write the resource graph as graphviz dot.
    Graph {
        /// Where to write the graph.
        #[arg(long, default_value = "stack.dot")]
        out: PathBuf,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => WorkshopConfig::load(path)?,
        None => WorkshopConfig::default(),
    };

    match cli.command {
        Command::Synth { out } => {
            let synthesis = stack::declare_workshop(&cli.stack_name, &config)?.synthesize()?;
            synthesis.write_template(&out)?;
            println!("Wrote {}", out.display());
        }
        Command::Order => {
            let synthesis = stack::declare_workshop(&cli.stack_name, &config)?.synthesize()?;
            print!("{synthesis}");
        }
        Command::Graph { out } => {
            let stack = stack::declare_workshop(&cli.stack_name, &config)?;
            stack.save_graph_dot(&out)?;
            println!("Wrote {}", out.display());
        }
    }

    Ok(())
}
