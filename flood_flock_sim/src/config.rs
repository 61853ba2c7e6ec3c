// Data-driven game configuration.
//
// All tunable simulation parameters live in `GameConfig`, loaded from JSON by
// the host (the wasm bridge or the headless runner). The sim reads rates,
// thresholds and cadences from here rather than hard-coding them, so balance
// changes never touch simulation code.
//
// Parameters are grouped into nested structs: `TerrainParams` (heightfield
// and fertility noise), `MeshParams` (world size and lattice resolution),
// `FloodParams` (water level ratchet and relaxation epsilon), `FlockParams`
// (sheep rates), `TempleParams` (milestone thresholds), `CadenceParams`
// (fast/slow tick split) and `AudioParams` (sound cue cooldowns). Named
// terrain presets (`TerrainParams::island()`, `::archipelago()`, looked up by
// name with `TerrainParams::preset`) tune the same parameter set for
// different map silhouettes.
//
// `GameConfig::from_json` both parses and validates. A config that would
// build an empty mesh or an unordered threshold table is rejected outright.
//
// See also: `sim.rs` which owns the `GameConfig` as part of `SimState`,
// `heightfield.rs` which reads `TerrainParams`, `mesh.rs` for `MeshParams`.

use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Terrain
// ---------------------------------------------------------------------------

/// Heightfield and grass fertility noise parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TerrainParams {
    /// Free-text seed. Identical seed + parameters give an identical island.
    pub seed: String,
    /// Number of noise layers summed on top of the base shape.
    pub octaves: u32,
    /// Frequency of the first noise layer, in cycles per unit of normalized
    /// mesh coordinates.
    pub scale: f32,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f32,
    /// Amplitude multiplier between successive octaves.
    pub persistence: f32,
    /// Final multiplier from normalized field units to world height units.
    pub height_stretch: f32,
    /// Frequency of the grass fertility noise. Kept distinct from `scale` so
    /// grass does not trace the terrain contours.
    pub fertility_scale: f32,
    /// Planar offset of the fertility noise domain.
    pub fertility_offset: f32,
}

impl TerrainParams {
    /// A single rounded island: the default.
    pub fn island() -> Self {
        Self {
            seed: "flood".into(),
            octaves: 5,
            scale: 3.0,
            lacunarity: 2.0,
            persistence: 0.5,
            height_stretch: 120.0,
            fertility_scale: 7.0,
            fertility_offset: 137.0,
        }
    }

    /// Look up a preset by name, keeping `seed`. Used by hosts that let the
    /// player pick a map style.
    pub fn preset(name: &str, seed: &str) -> SimResult<Self> {
        let mut params = match name {
            "island" => Self::island(),
            "archipelago" => Self::archipelago(),
            other => {
                return Err(SimError::InvalidConfig(format!(
                    "unknown terrain preset {other:?}"
                )));
            }
        };
        params.seed = seed.to_string();
        Ok(params)
    }

    /// Rougher, lower terrain that floods into several islets.
    pub fn archipelago() -> Self {
        Self {
            seed: "flood".into(),
            octaves: 6,
            scale: 5.0,
            lacunarity: 2.1,
            persistence: 0.6,
            height_stretch: 90.0,
            fertility_scale: 9.0,
            fertility_offset: 61.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Mesh
// ---------------------------------------------------------------------------

/// Lattice dimensions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MeshParams {
    /// World-space side length of the square domain.
    pub width: f32,
    /// Quads per side. The mesh has `(resolution + 1)^2` vertices and
    /// `2 * resolution^2` faces.
    pub resolution: u32,
}

impl MeshParams {
    /// Largest accepted resolution. Keeps vertex and face ids well inside
    /// `u32` and the buffers at a size a browser can upload.
    pub const MAX_RESOLUTION: u32 = 1024;
}

// ---------------------------------------------------------------------------
// Flood
// ---------------------------------------------------------------------------

/// One tier of the water-level ratchet: while the level is below `below`,
/// each rise adds `step`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiseTier {
    pub below: f32,
    pub step: f32,
}

/// Water level ratchet and relaxation parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FloodParams {
    /// Ocean level at the start of a game.
    pub initial_water_level: f32,
    /// Fast ticks between water rises while a flock exists.
    pub water_rise_interval_frames: u32,
    /// Ascending tiers; the first tier whose `below` exceeds the current
    /// level supplies the step.
    pub rise_tiers: Vec<RiseTier>,
    /// Step used once the level is above every tier.
    pub top_step: f32,
    /// A relaxation pass that moves no vertex by more than this counts as
    /// converged.
    pub convergence_epsilon: f32,
}

impl FloodParams {
    /// Amount the water level rises from `level` on the next ratchet.
    pub fn rise_step(&self, level: f32) -> f32 {
        self.rise_tiers
            .iter()
            .find(|tier| level < tier.below)
            .map_or(self.top_step, |tier| tier.step)
    }
}

// ---------------------------------------------------------------------------
// Flock
// ---------------------------------------------------------------------------

/// Sheep behaviour rates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlockParams {
    /// Sheep placed around the flocking point on the first click.
    pub initial_flock_size: u32,
    /// Per-slow-tick probability that an idle sheep wanders randomly instead
    /// of heading for the flocking point.
    pub wander_chance: f64,
    /// Maximum grass eaten from the occupied face per sheep per slow tick.
    pub forage_rate: f32,
    /// Stored food consumed by each birth. A birth is attempted whenever
    /// stored food exceeds this amount.
    pub food_per_sheep: f32,
    /// Fast ticks a sheep takes to walk from one slot to the next.
    pub movement_frames: u32,
}

// ---------------------------------------------------------------------------
// Temple
// ---------------------------------------------------------------------------

/// Milestone thresholds. Level 1 is the starting level; each threshold the
/// live flock size reaches adds one level.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TempleParams {
    pub thresholds: Vec<u32>,
}

impl TempleParams {
    /// Temple level earned by a flock of `flock_size`.
    pub fn level_for(&self, flock_size: usize) -> u8 {
        let reached = self
            .thresholds
            .iter()
            .take_while(|&&t| flock_size >= t as usize)
            .count();
        1 + reached as u8
    }
}

// ---------------------------------------------------------------------------
// Cadence and audio
// ---------------------------------------------------------------------------

/// Fast/slow tick split.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CadenceParams {
    /// A slow tick runs on every Nth fast tick.
    pub slow_tick_interval: u32,
}

/// Minimum fast ticks between repeated sound cues of the same kind.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AudioParams {
    pub birth_cooldown_frames: u32,
    pub drown_cooldown_frames: u32,
}

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

/// Complete game configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameConfig {
    pub terrain: TerrainParams,
    pub mesh: MeshParams,
    pub flood: FloodParams,
    pub flock: FlockParams,
    pub temple: TempleParams,
    pub cadence: CadenceParams,
    pub audio: AudioParams,
    /// Colour multiplier applied to the hovered face.
    pub highlight_multiplier: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            terrain: TerrainParams::island(),
            mesh: MeshParams {
                width: 100.0,
                resolution: 64,
            },
            flood: FloodParams {
                initial_water_level: -40.0,
                water_rise_interval_frames: 600,
                rise_tiers: vec![
                    RiseTier { below: -35.0, step: 3.0 },
                    RiseTier { below: 20.0, step: 5.0 },
                    RiseTier { below: 40.0, step: 10.0 },
                    RiseTier { below: 90.0, step: 20.0 },
                ],
                top_step: 35.0,
                convergence_epsilon: 0.01,
            },
            flock: FlockParams {
                initial_flock_size: 5,
                wander_chance: 0.005,
                forage_rate: 0.005,
                food_per_sheep: 5.0,
                movement_frames: 10,
            },
            temple: TempleParams {
                thresholds: vec![30, 40, 50, 60, 70, 80, 90],
            },
            cadence: CadenceParams {
                slow_tick_interval: 4,
            },
            audio: AudioParams {
                birth_cooldown_frames: 20,
                drown_cooldown_frames: 30,
            },
            highlight_multiplier: 1.35,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs the simulation cannot run with.
    pub fn validate(&self) -> SimResult<()> {
        let invalid = |msg: &str| Err(SimError::InvalidConfig(msg.to_string()));

        if self.mesh.resolution < 1 {
            return invalid("mesh.resolution must be at least 1");
        }
        if self.mesh.resolution > MeshParams::MAX_RESOLUTION {
            return invalid("mesh.resolution is too large");
        }
        if self.mesh.width.is_nan() || self.mesh.width <= 0.0 {
            return invalid("mesh.width must be positive");
        }
        if self.terrain.octaves < 1 {
            return invalid("terrain.octaves must be at least 1");
        }
        if self.cadence.slow_tick_interval < 1 {
            return invalid("cadence.slow_tick_interval must be at least 1");
        }
        if self.flock.movement_frames < 1 {
            return invalid("flock.movement_frames must be at least 1");
        }
        if self.flock.food_per_sheep.is_nan() || self.flock.food_per_sheep <= 0.0 {
            return invalid("flock.food_per_sheep must be positive");
        }
        if self.flood.water_rise_interval_frames < 1 {
            return invalid("flood.water_rise_interval_frames must be at least 1");
        }
        if !self.temple.thresholds.windows(2).all(|w| w[0] < w[1]) {
            return invalid("temple.thresholds must be strictly ascending");
        }
        if !self
            .flood
            .rise_tiers
            .windows(2)
            .all(|w| w[0].below < w[1].below)
        {
            return invalid("flood.rise_tiers must be strictly ascending");
        }
        Ok(())
    }
}
