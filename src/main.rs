use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use red_black_tree::{BulkLoader, Console, Tree};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::io;
use std::path::PathBuf;

const DEFAULT_NUMBERS: &str = "numbers.txt";
const MAX_SKIP: usize = 25;

fn initialize_logging() -> Result<()> {
    let level = match env::var("RBTREE_LOG") {
        Ok(level) => level
            .parse()
            .with_context(|| format!("invalid RBTREE_LOG level `{}`", level))?,
        Err(_) => LevelFilter::Warn,
    };
    TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?;
    Ok(())
}

fn main() -> Result<()> {
    initialize_logging()?;

    let numbers = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_NUMBERS));

    let stdin = io::stdin();
    let stdout = io::stdout();
    let loader = BulkLoader::new(StdRng::from_entropy(), MAX_SKIP);
    let mut console = Console::new(stdin.lock(), stdout.lock(), numbers, loader);

    let mut tree = Tree::new();
    console.run(&mut tree).context("console loop failed")?;
    Ok(())
}
