// Simulation events emitted to the host.
//
// The sim does not call into the render or audio layers. Everything the host
// needs to react to (a sheep appearing, a sheep drowning, the temple growing,
// the sea rising, a sound to play) is pushed as a `SimEvent` stamped with the
// frame it happened on, and returned from `SimState::step()`.
//
// Events are plain data and serialize to JSON, which is how the wasm bridge
// hands them to JavaScript.
//
// See also: `sim.rs` which emits these, `command.rs` for the inbound
// direction, `sim_bridge.rs` (in the web crate) for the JSON drain.

use crate::types::*;
use serde::{Deserialize, Serialize};

/// Sounds the host may play. Each kind has its own cooldown (see
/// `AudioParams`), so bursts of births or deaths produce one cue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Birth,
    Drown,
    TempleGrow,
    FlagPlaced,
}

/// An event emitted by the simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimEvent {
    pub frame: u64,
    pub kind: SimEventKind,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SimEventKind {
    /// A sheep was placed, either in the initial flock or by a birth.
    SheepSpawned { sheep_id: SheepId, face: FaceId },
    /// A sheep's face went fully under water. It is gone from the live list
    /// from the next frame.
    SheepDied { sheep_id: SheepId, face: FaceId },
    /// The temple grew to `level`. Emitted once per level crossed.
    TempleLevelChanged { level: u8 },
    /// The sea target rose.
    WaterLevelChanged { level: f32 },
    /// The player moved the flocking point.
    FlockPointSet { face: FaceId },
    /// Water stopped spreading at the current level.
    FloodSettled { level: f32 },
    PlaySound { cue: SoundCue },
}
