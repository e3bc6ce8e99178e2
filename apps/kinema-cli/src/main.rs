use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use kinema_animate::{ManualClock, SchedulerConfig};
use kinema_common::NodeId;
use kinema_input::InputScript;
use kinema_render::DebugTextRenderer;
use kinema_scenes::description::{DescribedDemo, SceneDescription};
use kinema_scenes::{Demo, DemoConfig, DemoKind, RunOptions, build_demo, run_headless};
use kinema_tools::SceneInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kinema", about = "Headless runner and inspector for kinema scenes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SceneArgs {
    /// Built-in demo: figures, pyramid, solar, arm or game
    demo: Option<String>,
    /// Load a YAML or JSON scene description instead of a built-in demo
    #[arg(long, conflicts_with = "demo")]
    scene: Option<PathBuf>,
    /// RNG seed for every random choice
    #[arg(short, long, default_value = "42")]
    seed: u64,
    /// Initial pyramid subdivision depth
    #[arg(short, long, default_value = "3")]
    depth: i32,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, crate info and the built-in demos
    Info,
    /// Run a scene for a number of ticks on a manual clock
    Run {
        #[command(flatten)]
        scene: SceneArgs,
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "60")]
        ticks: u64,
        /// Clock advance per tick in milliseconds
        #[arg(long, default_value = "16.0")]
        dt_ms: f64,
        /// Largest delta a single tick may apply
        #[arg(long, default_value = "250.0")]
        max_delta_ms: f64,
        /// Apply the full clock delta however long it is
        #[arg(long)]
        no_clamp: bool,
        /// Input script with `@TICK ACTION` lines
        #[arg(long)]
        script: Option<PathBuf>,
        /// Print every frame's draw listing
        #[arg(long)]
        frames: bool,
    },
    /// Print the graph of a scene after some ticks
    Inspect {
        #[command(flatten)]
        scene: SceneArgs,
        /// Ticks to run before inspecting
        #[arg(short, long, default_value = "0")]
        ticks: u64,
        /// Show one node instead of the whole tree
        #[arg(short, long)]
        node: Option<u64>,
    },
    /// Parse and build a scene description file
    Validate {
        /// Path to a `.yaml`, `.yml` or `.json` description
        file: PathBuf,
    },
}

fn build_scene(args: &SceneArgs, clock: &ManualClock) -> anyhow::Result<Box<dyn Demo>> {
    let config = DemoConfig {
        seed: args.seed,
        depth: args.depth,
    };
    tracing::debug!(?config, demo = ?args.demo, scene = ?args.scene, "building scene");
    if let Some(path) = &args.scene {
        let description = load_description(path)?;
        let demo = DescribedDemo::build(&description, &config, Box::new(clock.clone()))?;
        return Ok(Box::new(demo));
    }
    let name = args
        .demo
        .as_deref()
        .context("pass a demo name or --scene <FILE>")?;
    let kind: DemoKind = name.parse()?;
    Ok(build_demo(kind, &config, Box::new(clock.clone()))?)
}

fn load_description(path: &Path) -> anyhow::Result<SceneDescription> {
    SceneDescription::load(path)
        .with_context(|| format!("failed to load scene description {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("kinema v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", kinema_kernel::crate_info());
            println!("geometry: {}", kinema_geometry::crate_info());
            println!("render: {}", kinema_render::crate_info());
            println!("animate: {}", kinema_animate::crate_info());
            println!("tools: {}", kinema_tools::crate_info());
            println!("scenes: {}", kinema_scenes::crate_info());
            println!("demos:");
            for kind in DemoKind::ALL {
                println!("  {:<8} {}", kind.name(), kind.description());
            }
        }
        Commands::Run {
            scene,
            ticks,
            dt_ms,
            max_delta_ms,
            no_clamp,
            script,
            frames,
        } => {
            let clock = ManualClock::new();
            let mut demo = build_scene(&scene, &clock)?;
            let script = match script {
                Some(path) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("failed to read script {}", path.display()))?;
                    text.parse::<InputScript>()
                        .with_context(|| format!("invalid script {}", path.display()))?
                }
                None => InputScript::new(),
            };
            let options = RunOptions {
                ticks,
                dt_ms,
                scheduler: SchedulerConfig {
                    max_delta_ms: (!no_clamp).then_some(max_delta_ms),
                    ..SchedulerConfig::default()
                },
            };

            println!("Running {}: ticks={ticks}, dt={dt_ms}ms", demo.name());
            let mut renderer = DebugTextRenderer::new();
            let summary = run_headless(
                demo.as_mut(),
                &clock,
                &mut renderer,
                &options,
                &script,
                |_, text| {
                    if frames {
                        print!("{text}");
                    }
                },
            )?;

            println!(
                "Ticks: {}, rules applied: {}, restarts: {}, rejected actions: {}",
                summary.ticks, summary.rules_applied, summary.restarts, summary.rejected_actions
            );
            println!(
                "Simulated: {:.1}ms, draw items: {}, avg tick: {:?}",
                summary.sim_time_ms, summary.last_draw_items, summary.avg_tick
            );
            if let Some(status) = summary.status {
                println!("Status: {status}");
            }
        }
        Commands::Inspect { scene, ticks, node } => {
            let clock = ManualClock::new();
            let mut demo = build_scene(&scene, &clock)?;
            let options = RunOptions {
                ticks,
                ..RunOptions::default()
            };
            if ticks > 0 {
                run_headless(
                    demo.as_mut(),
                    &clock,
                    &mut DebugTextRenderer::new(),
                    &options,
                    &InputScript::new(),
                    |_, _| {},
                )?;
            }
            let ctx = demo.context_mut();
            ctx.graph.recompute_world_transforms();

            match node {
                Some(id) => {
                    let info = SceneInspector::inspect_node(&ctx.graph, NodeId(id))
                        .with_context(|| format!("no node #{id}"))?;
                    println!("{info}");
                }
                None => {
                    println!("{}", SceneInspector::summary(&ctx.graph, &ctx.geometry));
                    print!("{}", SceneInspector::tree(&ctx.graph));
                }
            }
        }
        Commands::Validate { file } => {
            let description = load_description(&file)?;
            let clock = ManualClock::new();
            let demo =
                DescribedDemo::build(&description, &DemoConfig::default(), Box::new(clock))
                    .with_context(|| format!("scene {} does not build", description.name))?;
            let ctx = demo.context();
            println!(
                "{}: OK ({} described nodes)",
                description.name,
                description.node_count()
            );
            println!("{}", SceneInspector::summary(&ctx.graph, &ctx.geometry));
        }
    }

    Ok(())
}
