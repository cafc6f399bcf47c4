mod client;
mod render;
mod session;

use clap::{Parser, Subcommand};
use client::GenerateClient;
use kblog_usage::{FileStore, SystemClock, UsageGate};
use session::Outcome;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "kblog", version, about = "Generate Naver-style blog posts from a keyword")]
struct Cli {
    #[arg(long, global = true, env = "KBLOG_SERVER", default_value = client::DEFAULT_SERVER, help = "kblog-core base URL")]
    server: String,
    #[arg(long, global = true, default_value = "./storage", help = "Directory holding the local usage record")]
    state_dir: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a post for a keyword
    Generate {
        keyword: String,
        #[arg(long, default_value_t = 1, help = "Title candidate to place on top (1-3)")]
        title: usize,
        #[arg(long, help = "Print the raw JSON result")]
        json: bool,
    },
    /// Show today's remaining generations
    Usage,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    kblog_telemetry::init();
    let cli = Cli::parse();
    let gate = UsageGate::new(SystemClock, FileStore::in_dir(&cli.state_dir));

    match cli.command {
        Commands::Usage => {
            let u = gate.usage();
            println!("{}: {}/{} used, {} remaining", u.date, u.count, gate.limit(), gate.remaining());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Generate { keyword, title, json } => {
            let client = GenerateClient::new(&cli.server)?;
            match session::generate_once(&gate, &client, &keyword).await {
                Outcome::Generated { post, remaining } => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&post)?);
                    } else {
                        let idx = render::title_index(title, post.titles.len());
                        print!("{}", render::render_post(&post, idx, remaining));
                    }
                    Ok(ExitCode::SUCCESS)
                }
                Outcome::Blocked(msg) | Outcome::Failed(msg) => {
                    eprintln!("{}", msg);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}
