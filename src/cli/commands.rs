use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::{discover, Api};
use crate::codegen::{generate_with, JtdCodegen};

/// Command-line interface for the contract compiler.
#[derive(Parser)]
#[command(name = "rpcgen")]
#[command(about = "JSON Typedef RPC contract compiler", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Generate typed artifacts and a route table from an API directory
    Generate {
        /// Root directory of the API schema documents
        #[arg(short, long)]
        api: PathBuf,

        /// Output directory; cleared and recreated on every run
        #[arg(short, long)]
        output: PathBuf,

        /// Type generator executable to invoke
        #[arg(long, default_value = "jtd-codegen")]
        generator: PathBuf,
    },
    /// Discover and print the endpoints and definitions of an API directory
    Inspect {
        /// Root directory of the API schema documents
        #[arg(short, long)]
        api: PathBuf,
    },
}

/// Parse arguments and run the selected command.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            api,
            output,
            generator,
        } => generate(&api, &output, &generator),
        Commands::Inspect { api } => {
            let api = discover(&api)?;
            print_summary(&api);
            Ok(())
        }
    }
}

fn generate(api_dir: &Path, output: &Path, generator: &Path) -> anyhow::Result<()> {
    let api = discover(api_dir)?.normalized();
    print_summary(&api);

    if output.exists() {
        fs::remove_dir_all(output).context("clearing output directory")?;
    }
    fs::create_dir_all(output).context("creating output directory")?;

    let routes = generate_with(&JtdCodegen::with_program(generator), &api, output)?;
    println!(
        "✅ Generated {} route(s) → {}",
        routes.len(),
        output.display()
    );
    Ok(())
}

fn print_summary(api: &Api) {
    println!("API:");
    for definition in &api.definitions {
        println!("- [def] {}", definition.key());
    }
    for endpoint in &api.endpoints {
        println!("- {:<4} {}", endpoint.verb, endpoint.http_path());
    }
}
