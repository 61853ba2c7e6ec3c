// flood_flock_web: wasm-bindgen bridge between the sim and the browser.
//
// This crate is a thin wrapper that exposes `flood_flock_sim` to JavaScript.
// It contains no simulation logic, only translation between JS-friendly
// types (numbers, strings, typed arrays) and sim types.
//
// The page calls into this crate to:
// - Create a game from a text seed or a JSON config.
// - Forward resolved face indices from pointer input (click, hover).
// - Advance one frame per `requestAnimationFrame`.
// - Read back mesh and sheep buffers, stats, and queued events.
//
// Module overview:
// - `session.rs`:     `GameSession`: queues input as `SimCommand`s for the
//                     next frame and collects `SimEvent`s until drained.
//                     Plain Rust, testable natively.
// - `sim_bridge.rs`:  `FloodFlockGame`: the `#[wasm_bindgen]` class, the
//                     sole interface between JavaScript and Rust.
//
// See also: `flood_flock_sim` for all simulation logic.

pub mod session;
mod sim_bridge;

pub use sim_bridge::FloodFlockGame;
