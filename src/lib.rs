//! Bloom Garden - a generative night garden of wind-swayed, glowing flowers.
//!
//! Touch gestures plant procedurally generated flowers. Each frame the wind decays,
//! gusts and device rotation stir it, held flowers grow, and the whole scene is
//! rendered into a backend-agnostic list of draw commands.
//!
//! # Architecture
//!
//! - `schema`: Configuration and color palettes
//! - `garden`: PRNG, flowers, stems, garden state, physics and the [`Garden`] session
//! - `render`: Pure renderer producing layered [`Frame`]s of draw commands
//!
//! # Example
//!
//! ```rust,no_run
//! use bloom_garden::{
//!     garden::{Garden, Gesture, Viewport},
//!     render::Layer,
//!     schema::GardenConfig,
//! };
//! use glam::Vec2;
//!
//! let mut garden = Garden::headless(GardenConfig::default()).unwrap();
//! let viewport = Viewport::new(400.0, 800.0);
//!
//! garden.handle_gesture(Gesture::Tap(Vec2::new(200.0, 300.0)), viewport);
//!
//! for frame in 0..120 {
//!     let frame = garden.tick(frame as f64 / 60.0, viewport);
//!     let heads = frame.layer(Layer::Heads).map_or(0, |l| l.commands.len());
//!     println!("{heads} heads, {} commands", frame.command_count());
//! }
//! ```

pub mod garden;
pub mod render;
pub mod schema;

// WebAssembly bindings (only for wasm32 target)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export commonly used types
pub use garden::{Garden, GardenState, Gesture, PhysicsUpdater, Viewport};
pub use render::{DrawCommand, Frame, Renderer};
pub use schema::{GardenConfig, Palette};
