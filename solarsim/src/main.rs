use solarsim::{SimulatorConfig, SimulationController, TextSceneFile, FrameRenderer, ManualScheduler, TimerScheduler};
use solarsim::run_2d;

use anyhow::{Context, Result};
use bevy::app::App;
use bevy::log::LogPlugin;
use clap::Parser;

use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(about = "Newtonian gravity simulation of stars and planets")]
struct Args {
    /// YAML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scene file to load at startup, overrides the one named in the config
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Run this many ticks without a window, then print the final scene
    #[arg(long)]
    headless: Option<u64>,

    /// Where a headless run saves the final scene
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Use `path` as given when it exists, otherwise look in the bundled scenarios directory
fn resolve(path: &Path) -> PathBuf {
    if path.exists() {
        return path.to_path_buf();
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(path)
}

fn run_headless(cfg: &SimulatorConfig, scene: Option<&Path>, ticks: u64, output: Option<&Path>) -> Result<()> {
    // building LogPlugin installs the global log subscriber; the app itself
    // never runs, there is no window or frame loop
    let mut _logging = App::new();
    _logging.add_plugins(LogPlugin::default());

    let parameters = cfg.parameters.build()?;
    let renderer = FrameRenderer::new(cfg.window.width, cfg.window.height);
    let mut controller = SimulationController::new(parameters, renderer, ManualScheduler::new(), TextSceneFile);

    if let Some(path) = scene {
        controller
            .load(path)
            .with_context(|| format!("failed to load scene {}", path.display()))?;
    }

    let mut advanced = 0;
    if ticks > 0 {
        controller.start()?;
        advanced = 1 + controller.run_pending(ticks - 1)?;
        controller.stop();
    }

    println!("{advanced} ticks, {}", controller.renderer().time_label());
    for b in controller.bodies() {
        println!(
            "{:6} m = {:e}  x = ({:e}, {:e})  v = ({:e}, {:e})",
            b.kind, b.m, b.x.x, b.x.y, b.v.x, b.v.y
        );
    }

    if let Some(path) = output {
        controller
            .save(path)
            .with_context(|| format!("failed to save scene {}", path.display()))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let cfg = match &args.config {
        Some(path) => SimulatorConfig::from_yaml_file(&resolve(path))?,
        None => SimulatorConfig::default(),
    };
    let scene = args.scene.as_ref().or(cfg.scene.as_ref()).map(|p| resolve(p));

    if let Some(ticks) = args.headless {
        return run_headless(&cfg, scene.as_deref(), ticks, args.output.as_deref());
    }

    let parameters = cfg.parameters.build()?;
    let renderer = FrameRenderer::new(cfg.window.width, cfg.window.height);
    let controller = SimulationController::new(parameters, renderer, TimerScheduler::default(), TextSceneFile);

    run_2d(controller, cfg.window, scene);

    Ok(())
}
