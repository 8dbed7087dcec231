use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use rand::{rngs::StdRng, SeedableRng};
use slide_2048::config::Config;
use slide_2048::notify::TextRenderer;
use slide_2048::persistence::{BestScoreStore, JsonFileStore, MemoryStore};
use slide_2048::session::Session;

#[derive(Debug, Parser)]
#[command(name = "slide-2048", version, about = "Play 2048 in the terminal")]
struct Args {
    /// JSON config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed the tile spawner for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Grid side length (overrides the config file)
    #[arg(long)]
    size: Option<usize>,

    /// Where the best score is kept (overrides the config file)
    #[arg(long, value_name = "FILE")]
    best_score_file: Option<PathBuf>,

    /// Keep the best score in memory only
    #[arg(long)]
    no_persist: bool,

    /// Log filter, e.g. "info", "debug" (RUST_LOG wins if set)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str())).init();

    let mut cfg = match &args.config {
        Some(path) => Config::from_json_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(size) = args.size { cfg.grid_size = size; }
    if let Some(path) = args.best_score_file { cfg.best_score_path = path; }
    cfg.validate().context("invalid settings")?;

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    println!("Arrows: w/a/s/d (or h/j/k/l), u = undo, n = new game, q = quit");
    if args.no_persist {
        run(Session::new(&cfg, rng, MemoryStore::default(), TextRenderer::new(io::stdout())))
    } else {
        let store = JsonFileStore::new(&cfg.best_score_path);
        run(Session::new(&cfg, rng, store, TextRenderer::new(io::stdout())))
    }
}

fn run<S: BestScoreStore>(mut session: Session<StdRng, S, TextRenderer<io::Stdout>>) -> anyhow::Result<()> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        let cmd = line.trim();
        match cmd {
            "" => continue,
            "q" | "quit" => break,
            "u" | "undo" => { session.undo(); }
            "n" | "new" => { session.new_game(); }
            key => {
                if session.game().is_over() {
                    println!("Game over. Press n for a new game or u to undo.");
                } else if session.handle_key(key).is_none() {
                    println!("Unknown command: {key}");
                }
            }
        }
    }
    println!("Final score: {}  Best: {}", session.game().score(), session.best_score());
    Ok(())
}
