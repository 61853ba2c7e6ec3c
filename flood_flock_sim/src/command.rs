// Player input delivered to the simulation.
//
// All external mutations go through `SimCommand`. The input layer resolves
// pointer rays against the displayed mesh itself and hands the sim a face
// index, so commands only ever name faces:
// - `ClickFace` sets (or moves) the flocking point. The first click also
//   places the initial flock around it.
// - `HoverFace` moves the highlight and, before any flock exists, records
//   where the flag preview should be drawn.
// - `ClearHover` removes the highlight when the pointer leaves the island.
//
// A command carries the frame it applies on. `SimState::step()` applies each
// command at the start of that frame, before the frame's ticks run.
//
// See also: `sim.rs` for `apply_command()`, `sim_bridge.rs` (in the web
// crate) for the JavaScript-facing wrappers.

use crate::types::*;
use serde::{Deserialize, Serialize};

/// An input event targeting a specific frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimCommand {
    pub frame: u64,
    pub action: SimAction,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SimAction {
    ClickFace { face: FaceId },
    HoverFace { face: FaceId },
    ClearHover,
}
