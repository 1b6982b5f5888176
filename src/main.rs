//! Bloom Garden CLI - Run a headless garden session from JSON configuration.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use bloom_garden::{
    garden::{Garden, Gesture, LogFeedback, NoMotion, Viewport},
    schema::GardenConfig,
};
use glam::Vec2;

const FPS: f64 = 60.0;
const VIEWPORT: Viewport = Viewport::new(400.0, 800.0);

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [frames]", args[0]);
        eprintln!();
        eprintln!("Run a headless Bloom Garden session from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to garden configuration file");
        eprintln!("  frames       Number of 60 Hz frames to run (default: 600)");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let frames: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(600);

    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: GardenConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    println!("Bloom Garden Session");
    println!("====================");
    println!("Viewport: {}x{}", VIEWPORT.width, VIEWPORT.height);
    println!(
        "Capacity: {} flowers, {} stems",
        config.capacity.max_flowers, config.capacity.max_stems
    );
    println!("Palette: {}", config.visuals.palette);
    println!("Frames: {} ({:.1}s)", frames, frames as f64 / FPS);
    println!();

    let mut garden = Garden::new(config, LogFeedback, NoMotion).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    });

    println!("Running session...");
    let start = Instant::now();
    let mut total_commands = 0usize;

    for i in 0..frames {
        let time = i as f64 / FPS;
        script(&mut garden, i, frames);
        let frame = garden.tick(time, VIEWPORT);
        total_commands += frame.command_count();

        // Print progress every 10%
        if (i + 1) % (frames / 10).max(1) == 0 {
            let stats = garden.stats();
            let elapsed = start.elapsed().as_secs_f32();
            let frames_per_sec = (i + 1) as f32 / elapsed;
            println!(
                "  Frame {}/{}: flowers={}, stems={}, wind={:.2}{}, commands={}, {:.1} frames/s",
                i + 1,
                frames,
                stats.flowers,
                stats.stems,
                stats.wind_strength,
                if stats.gusting { " (gust)" } else { "" },
                frame.command_count(),
                frames_per_sec
            );
        }
    }

    let elapsed = start.elapsed();
    let stats = garden.stats();

    println!();
    println!("Final state:");
    println!("  Flowers: {}", stats.flowers);
    println!("  Stems: {}", stats.stems);
    println!(
        "  Wind: {:.2} at {:.2} rad",
        stats.wind_strength, stats.wind_direction
    );
    println!(
        "  Average commands per frame: {:.0}",
        total_commands as f64 / frames.max(1) as f64
    );
    println!(
        "Time: {:.2}s ({:.1} frames/s)",
        elapsed.as_secs_f32(),
        frames as f32 / elapsed.as_secs_f32()
    );
}

/// Scripted interaction: plant flowers, hold one to grow, draw a stem and swipe a gust.
fn script(garden: &mut Garden, frame: u64, frames: u64) {
    let at = |fraction: f64| (frames as f64 * fraction) as u64;

    if frame % 30 == 0 && frame < at(0.6) {
        garden.spawn_random_flower(VIEWPORT);
    }

    let hold = Vec2::new(200.0, 260.0);
    if frame == at(0.1) {
        garden.handle_gesture(Gesture::DragStart { point: hold }, VIEWPORT);
    } else if frame == at(0.2) {
        garden.handle_gesture(
            Gesture::DragEnd {
                point: hold,
                translation: Vec2::ZERO,
                duration: (at(0.2) - at(0.1)) as f64 / FPS,
            },
            VIEWPORT,
        );
    }

    if frame == at(0.3) {
        let path: Vec<Vec2> = (0..40)
            .map(|k| {
                let t = k as f32 / 39.0;
                Vec2::new(80.0 + (t * 3.0).sin() * 25.0, 620.0 - t * 300.0)
            })
            .collect();
        garden.plant_stem(path);
    }

    if frame == at(0.5) {
        garden.start_gust(Vec2::new(-240.0, 12.0));
    }
}

fn print_example_config() {
    let config = GardenConfig::default();

    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
}
