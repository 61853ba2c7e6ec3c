// flood_flock_sim: pure Rust simulation library.
//
// This crate contains all simulation logic for Flood & Flock: the island
// heightfield, the triangular terrain mesh, water relaxation, grass and
// render buffers, the sheep flock, and the command/event interface. It has
// no browser dependencies and can be tested, benchmarked, and run headless.
//
// Module overview:
// - `sim.rs`:         Top-level SimState, frame loop, fast/slow ticks, ratchets.
// - `heightfield.rs`: Seeded Perlin fBm height and grass fertility fields.
// - `mesh.rs`:        Fixed triangular lattice: vertices, faces, adjacency.
// - `hydrology.rs`:   Per-vertex water depth and the relaxation pass.
// - `terrain.rs`:     Per-face grass, colour policy, flat render buffers.
// - `flock.rs`:       Sheep, face slots, goal/wander/spawn choices.
// - `command.rs`:     SimCommand / SimAction, all player input.
// - `event.rs`:       SimEvent, everything the host reacts to.
// - `config.rs`:      GameConfig and nested parameter groups, loaded from JSON.
// - `error.rs`:       SimError for bad configs and out-of-range input.
// - `prng`:           Re-exported from `flood_flock_prng`: xoshiro256++ PRNG with SplitMix64 seeding.
// - `types.rs`:       VertexId, FaceId, SheepId, WorldPos, Rgb.
//
// The companion crate `flood_flock_web` wraps this library for the browser
// via wasm-bindgen. The `headless` binary runs scripted games from the
// command line.
//
// **Determinism.** All randomness comes from a seeded PRNG keyed by the text
// seed, so a seed and a command list fully determine a game.

pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod flock;
pub mod heightfield;
pub mod hydrology;
pub mod mesh;
pub use flood_flock_prng as prng;
pub mod sim;
pub mod terrain;
pub mod types;
