// Headless runner for scripted games.
//
// Builds an island, optionally clicks a face to place the flock, runs a fixed
// number of frames, and prints a stats line every N frames plus the final
// stats as JSON. Useful for balance checks and for profiling without a
// browser. Log verbosity follows `RUST_LOG` (e.g. `RUST_LOG=flood_flock_sim=debug`).
//
// Usage:
//   headless [OPTIONS]
//     --seed <TEXT>          Island seed (default: from config)
//     --config <PATH>        GameConfig JSON file (default: built-in defaults)
//     --preset <NAME>        Terrain preset: island | archipelago
//     --frames <N>           Frames to run (default: 3600)
//     --click <FACE>         Face to click on frame 1 (default: highest face)
//     --no-click             Run without ever placing a flock
//     --report-every <N>     Frames between stats lines (default: 600)

use flood_flock_sim::command::{SimAction, SimCommand};
use flood_flock_sim::config::{GameConfig, TerrainParams};
use flood_flock_sim::event::SimEventKind;
use flood_flock_sim::sim::SimState;
use flood_flock_sim::types::FaceId;
use tracing::info;

struct Args {
    seed: Option<String>,
    config_path: Option<String>,
    preset: Option<String>,
    frames: u64,
    click: Option<u32>,
    no_click: bool,
    report_every: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = parse_args();

    let mut config = match &args.config_path {
        Some(path) => {
            let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Failed to read {path}: {e}");
                std::process::exit(1);
            });
            GameConfig::from_json(&text).unwrap_or_else(|e| {
                eprintln!("Bad config {path}: {e}");
                std::process::exit(1);
            })
        }
        None => GameConfig::default(),
    };
    if let Some(name) = &args.preset {
        config.terrain =
            TerrainParams::preset(name, &config.terrain.seed).unwrap_or_else(|e| {
                eprintln!("{e}");
                std::process::exit(1);
            });
    }
    if let Some(seed) = args.seed {
        config.terrain.seed = seed;
    }

    let mut sim = SimState::with_config(config).unwrap_or_else(|e| {
        eprintln!("Failed to build island: {e}");
        std::process::exit(1);
    });

    let mut commands = Vec::new();
    if !args.no_click {
        let face = args
            .click
            .map(FaceId)
            .unwrap_or_else(|| sim.mesh().highest_face());
        commands.push(SimCommand {
            frame: 1,
            action: SimAction::ClickFace { face },
        });
    }

    let report_every = args.report_every.max(1);
    let (mut births, mut deaths) = (0usize, 0usize);
    let mut pending = commands.as_slice();
    while sim.frame() < args.frames {
        let target = (sim.frame() + report_every).min(args.frames);
        let result = sim.step(pending, target);
        pending = &[];
        for event in &result.events {
            match event.kind {
                SimEventKind::SheepSpawned { .. } => births += 1,
                SimEventKind::SheepDied { .. } => deaths += 1,
                _ => {}
            }
        }
        let stats = sim.stats();
        info!(
            frame = stats.frame,
            sheep = stats.live_sheep,
            food = stats.stored_food,
            water = stats.water_level,
            temple = stats.temple_level,
            "progress"
        );
    }

    println!("births={births} deaths={deaths}");
    match serde_json::to_string_pretty(&sim.stats()) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Failed to serialize stats: {e}"),
    }
}

/// Parse command-line arguments. Simple `std::env::args()` matching.
fn parse_args() -> Args {
    let mut parsed = Args {
        seed: None,
        config_path: None,
        preset: None,
        frames: 3600,
        click: None,
        no_click: false,
        report_every: 600,
    };
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                parsed.seed = Some(required(&args, i, "--seed"));
            }
            "--config" => {
                i += 1;
                parsed.config_path = Some(required(&args, i, "--config"));
            }
            "--preset" => {
                i += 1;
                parsed.preset = Some(required(&args, i, "--preset"));
            }
            "--frames" => {
                i += 1;
                parsed.frames = parse_number(&args, i, "--frames");
            }
            "--click" => {
                i += 1;
                parsed.click = Some(parse_number(&args, i, "--click"));
            }
            "--no-click" => parsed.no_click = true,
            "--report-every" => {
                i += 1;
                parsed.report_every = parse_number(&args, i, "--report-every");
            }
            "--help" | "-h" => {
                println!("Usage: headless [--seed TEXT] [--config PATH] [--preset NAME]");
                println!("                [--frames N]");
                println!("                [--click FACE | --no-click] [--report-every N]");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                std::process::exit(1);
            }
        }
        i += 1;
    }

    parsed
}

fn required(args: &[String], i: usize, flag: &str) -> String {
    args.get(i).cloned().unwrap_or_else(|| {
        eprintln!("{flag} requires a value");
        std::process::exit(1);
    })
}

fn parse_number<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
        eprintln!("{flag} requires a number");
        std::process::exit(1);
    })
}
