use std::path::Path;
use std::process::Command;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Built-in demos exercised by `smoke`.
const DEMOS: [&str; 5] = ["figures", "pyramid", "solar", "arm", "game"];
const DEMO_DIR: &str = "demos";

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for kinema")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy, tests and the smoke runs
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Run the subdivision timing bench in release mode
    Bench,
    /// Run every demo headless and validate every file under demos/
    Smoke {
        /// Ticks per demo run
        #[arg(short, long, default_value = "120")]
        ticks: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            run_fmt()?;
            run_clippy()?;
            run_tests()?;
            run_smoke(30)?;
        }
        Commands::Fmt => run_fmt()?,
        Commands::Clippy => run_clippy()?,
        Commands::Test => run_tests()?,
        Commands::Bench => run_bench()?,
        Commands::Smoke { ticks } => run_smoke(ticks)?,
    }

    Ok(())
}

fn cargo(label: &str, args: &[&str]) -> Result<()> {
    println!("==> {label}");
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{label} failed");
    }
    Ok(())
}

fn run_fmt() -> Result<()> {
    cargo("cargo fmt --check", &["fmt", "--all", "--", "--check"])
}

fn run_clippy() -> Result<()> {
    cargo(
        "cargo clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn run_tests() -> Result<()> {
    cargo("cargo test", &["test", "--workspace"])
}

fn run_bench() -> Result<()> {
    cargo(
        "subdivision bench",
        &["bench", "-p", "kinema-geometry", "--bench", "bench_subdivide"],
    )
}

/// Run the CLI binary with `args`.
fn kinema(label: &str, args: &[&str]) -> Result<()> {
    let mut full = vec!["run", "--quiet", "-p", "kinema-cli", "--"];
    full.extend_from_slice(args);
    cargo(label, &full)
}

fn run_smoke(ticks: u64) -> Result<()> {
    let ticks = ticks.to_string();
    for demo in DEMOS {
        kinema(&format!("smoke run {demo}"), &["run", demo, "--ticks", &ticks])?;
    }

    let dir = Path::new(DEMO_DIR);
    let mut entries: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort();
    for path in entries {
        let Some(name) = path.to_str() else { continue };
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml" | "json") => {
                kinema(&format!("validate {name}"), &["validate", name])?;
                kinema(
                    &format!("smoke run {name}"),
                    &["run", "--scene", name, "--ticks", &ticks],
                )?;
            }
            Some("script") => {
                // Scripts are named `<demo>.<anything>.script`.
                let demo = path
                    .file_name()
                    .and_then(|f| f.to_str())
                    .and_then(|f| f.split('.').next())
                    .unwrap_or_default();
                kinema(
                    &format!("scripted run {name}"),
                    &["run", demo, "--script", name, "--ticks", &ticks],
                )?;
            }
            _ => {}
        }
    }
    Ok(())
}
