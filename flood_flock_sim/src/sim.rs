// Core simulation state and frame loop.
//
// `SimState` is the single source of truth for one game: the mesh, water,
// grass, sheep, slots, the flocking point, the water-level ratchet, stored
// food, the temple level, and the sim PRNG. The host drives it with
// `step(commands, target_frame)` and reads render buffers and events back.
//
// ## Frames and cadence
//
// One call of the frame loop is one rendered frame. Each frame:
//
//   1. Sheep flagged dead on the previous frame are swept from the list.
//   2. Commands stamped for this frame are applied.
//   3. Every `cadence.slow_tick_interval`th frame, the slow tick runs:
//      one flood relaxation pass (until the current level settles), sheep
//      decisions and foraging, at most one birth, the temple ratchet, and
//      a full rebuild of the render buffers.
//   4. The fast tick runs: in-flight walks advance, sheep on fully
//      submerged faces are flagged dead, sound cooldowns count down, and
//      the water-level ratchet counts toward its next rise.
//
// Because water only changes in the slow tick and deaths are checked in the
// fast tick of the same frame, a sheep dies on the frame its face first goes
// under, and is absent from `sheep()` from the next frame on.
//
// ## Sheep decisions (slow tick)
//
// Sheep standing on a submerged face are drowning and do nothing. An idle
// sheep wanders to a random habitable neighbour with probability
// `flock.wander_chance`, and otherwise takes a greedy step toward the
// flocking point (see `flock.rs`). Walking sheep are not retargeted. Every
// surviving sheep then eats up to `flock.forage_rate` grass from its face
// into the shared food store. When the store exceeds `flock.food_per_sheep`
// one birth is attempted by BFS from the flocking point; a successful birth
// costs exactly `food_per_sheep`.
//
// ## Ratchets
//
// While a flocking point exists, the sea target rises every
// `flood.water_rise_interval_frames` frames by a tiered step, capped at the
// highest vertex + 1. The temple level follows the live flock size through
// `temple.thresholds` but never goes down; each level crossed emits one
// `TempleLevelChanged`.
//
// See also: `command.rs` for input, `event.rs` for output, `flock.rs` for
// movement choices, `hydrology.rs` for the relaxation pass, `terrain.rs` for
// grass and buffers, `config.rs` for every tunable used here.
//
// **Determinism.** Terrain comes from PRNG stream 0 of the text seed and
// sheep behaviour from stream 1, so the same seed and command list replay the
// same game.

use crate::command::{SimAction, SimCommand};
use crate::config::GameConfig;
use crate::error::SimResult;
use crate::event::{SimEvent, SimEventKind, SoundCue};
use crate::flock::{self, Movement, Sheep, SlotMap};
use crate::heightfield::HeightField;
use crate::hydrology::Hydrology;
use crate::mesh::TriMesh;
use crate::prng::GameRng;
use crate::terrain::{ColorMap, IslandPalette, MeshBuffers, TerrainState};
use crate::types::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

/// PRNG stream for sheep behaviour.
const SIM_STREAM: u64 = 1;

/// Result of a `step()` call.
#[derive(Clone, Debug, Default)]
pub struct StepResult {
    /// Events emitted during the step, in frame order.
    pub events: Vec<SimEvent>,
}

/// Snapshot of headline numbers for HUDs and logs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimStats {
    pub frame: u64,
    pub slow_ticks: u64,
    pub live_sheep: usize,
    pub stored_food: f32,
    pub water_level: f32,
    pub flood_settled: bool,
    pub temple_level: u8,
    pub total_grass: f32,
    pub wet_vertices: usize,
    pub submerged_faces: usize,
}

/// Per-cue frames left before the cue may play again.
#[derive(Clone, Debug, Default)]
struct SoundCooldowns {
    birth: u32,
    drown: u32,
}

/// One game's complete state.
pub struct SimState {
    /// Frames completed so far.
    frame: u64,
    slow_ticks: u64,
    config: GameConfig,
    rng: GameRng,
    mesh: TriMesh,
    hydro: Hydrology,
    terrain: TerrainState,
    slots: SlotMap,
    /// Live sheep plus any flagged dead this frame.
    sheep: Vec<Sheep>,
    next_sheep_id: u32,
    flock_point: Option<FaceId>,
    flag_preview: Option<WorldPos>,
    water_level: f32,
    frames_since_rise: u32,
    flood_settled: bool,
    stored_food: f32,
    temple_level: u8,
    cooldowns: SoundCooldowns,
}

impl SimState {
    /// New game with the default config and the given text seed.
    pub fn new(seed: &str) -> SimResult<Self> {
        let mut config = GameConfig::default();
        config.terrain.seed = seed.to_string();
        Self::with_config(config)
    }

    /// New game with the default island palette.
    pub fn with_config(config: GameConfig) -> SimResult<Self> {
        Self::with_color_map(config, Box::new(IslandPalette::default()))
    }

    /// New game with a caller-supplied colour policy.
    pub fn with_color_map(config: GameConfig, color_map: Box<dyn ColorMap>) -> SimResult<Self> {
        config.validate()?;

        let field = HeightField::island(&config.terrain);
        let mesh = TriMesh::new(&config.mesh, |x, y| field.sample(x, y))?;
        let hydro = Hydrology::new(mesh.vertex_count());
        let mut terrain =
            TerrainState::new(&mesh, &field, color_map, config.highlight_multiplier);
        terrain.setup_vertices(&mesh, &hydro);
        let slots = SlotMap::new(mesh.face_count());

        info!(
            seed = %config.terrain.seed,
            resolution = config.mesh.resolution,
            faces = mesh.face_count(),
            max_height = mesh.max_height(),
            "island generated"
        );

        Ok(Self {
            frame: 0,
            slow_ticks: 0,
            rng: GameRng::from_seed_str(&config.terrain.seed, SIM_STREAM),
            water_level: config.flood.initial_water_level,
            config,
            mesh,
            hydro,
            terrain,
            slots,
            sheep: Vec::new(),
            next_sheep_id: 0,
            flock_point: None,
            flag_preview: None,
            frames_since_rise: 0,
            flood_settled: false,
            stored_food: 0.0,
            temple_level: 1,
            cooldowns: SoundCooldowns::default(),
        })
    }

    /// Advance frame by frame up to and including `target_frame`, applying
    /// each command on its frame. Commands must be sorted by frame; commands
    /// stamped for frames already run are applied on the next frame.
    pub fn step(&mut self, commands: &[SimCommand], target_frame: u64) -> StepResult {
        let mut events = Vec::new();
        let mut cmd_idx = 0;

        while self.frame < target_frame {
            let frame = self.frame + 1;
            self.frame = frame;

            self.sheep.retain(|s| s.alive);

            while cmd_idx < commands.len() && commands[cmd_idx].frame <= frame {
                let cmd = &commands[cmd_idx];
                cmd_idx += 1;
                self.apply_command(cmd, &mut events);
            }

            if frame % u64::from(self.config.cadence.slow_tick_interval) == 0 {
                self.slow_tick(&mut events);
            }
            self.fast_tick(&mut events);
        }

        StepResult { events }
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    fn apply_command(&mut self, cmd: &SimCommand, events: &mut Vec<SimEvent>) {
        match cmd.action {
            SimAction::ClickFace { face } => {
                if let Err(e) = self.mesh.check_face(face) {
                    warn!(error = %e, "click dropped");
                    return;
                }
                self.set_flock_point(face, events);
            }
            SimAction::HoverFace { face } => {
                if let Err(e) = self.mesh.check_face(face) {
                    warn!(error = %e, "hover dropped");
                    return;
                }
                self.terrain
                    .set_highlight(Some(face), &self.mesh, &self.hydro);
                if self.flock_point.is_none() {
                    self.flag_preview = Some(self.mesh.face_centre(face));
                }
            }
            SimAction::ClearHover => {
                self.terrain.set_highlight(None, &self.mesh, &self.hydro);
                self.flag_preview = None;
            }
        }
    }

    /// Move the flocking point. The first call also places the initial
    /// flock around it.
    fn set_flock_point(&mut self, face: FaceId, events: &mut Vec<SimEvent>) {
        let first = self.flock_point.is_none();
        self.flock_point = Some(face);
        self.flag_preview = None;
        info!(frame = self.frame, %face, first, "flocking point set");
        self.emit(events, SimEventKind::FlockPointSet { face });
        self.emit(events, SimEventKind::PlaySound { cue: SoundCue::FlagPlaced });

        if first {
            for _ in 0..self.config.flock.initial_flock_size {
                if self.spawn_sheep(events).is_none() {
                    debug!("no room for the rest of the initial flock");
                    break;
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Ticks
    // -----------------------------------------------------------------------

    fn slow_tick(&mut self, events: &mut Vec<SimEvent>) {
        self.slow_ticks += 1;

        if !self.flood_settled {
            let changed = self.hydro.flood(
                &self.mesh,
                self.water_level,
                self.config.flood.convergence_epsilon,
            );
            trace!(frame = self.frame, changed, "flood pass");
            if !changed {
                self.flood_settled = true;
                debug!(level = self.water_level, "flood settled");
                self.emit(
                    events,
                    SimEventKind::FloodSettled {
                        level: self.water_level,
                    },
                );
            }
        }

        if let Some(goal) = self.flock_point {
            self.update_sheep(goal);
        }

        if self.stored_food > self.config.flock.food_per_sheep {
            self.try_spawn_sheep(events);
        }

        self.update_temple(events);
        self.terrain.setup_vertices(&self.mesh, &self.hydro);
    }

    fn fast_tick(&mut self, events: &mut Vec<SimEvent>) {
        let step = 1.0 / self.config.flock.movement_frames as f32;
        let mut drowned = Vec::new();
        for sheep in self.sheep.iter_mut().filter(|s| s.alive) {
            sheep.advance(step);
            if self.hydro.face_vertices_all_water(&self.mesh, sheep.face) {
                sheep.alive = false;
                self.slots.release(sheep.face, sheep.slot);
                drowned.push((sheep.id, sheep.face));
            }
        }
        for (sheep_id, face) in drowned {
            debug!(frame = self.frame, %sheep_id, %face, "sheep drowned");
            self.emit(events, SimEventKind::SheepDied { sheep_id, face });
            self.play_sound(SoundCue::Drown, events);
        }

        self.cooldowns.birth = self.cooldowns.birth.saturating_sub(1);
        self.cooldowns.drown = self.cooldowns.drown.saturating_sub(1);

        if self.flock_point.is_some() {
            self.frames_since_rise += 1;
            if self.frames_since_rise >= self.config.flood.water_rise_interval_frames {
                self.frames_since_rise = 0;
                self.raise_water(events);
            }
        }
    }

    /// Decide, move and forage for every live sheep.
    fn update_sheep(&mut self, goal: FaceId) {
        let wander_chance = self.config.flock.wander_chance;
        let forage_rate = self.config.flock.forage_rate;

        for i in 0..self.sheep.len() {
            let (face, idle) = {
                let s = &self.sheep[i];
                if !s.alive {
                    continue;
                }
                (s.face, s.is_idle())
            };
            if self.hydro.face_vertices_all_water(&self.mesh, face) {
                continue;
            }

            if idle {
                let next = if self.rng.random_bool(wander_chance) {
                    flock::wander_step(&self.mesh, &self.hydro, &self.slots, face, &mut self.rng)
                } else {
                    flock::goal_step(&self.mesh, &self.hydro, &self.slots, face, goal)
                };
                if let Some(next) = next {
                    self.move_sheep(i, next);
                }
            }

            let eaten = self.terrain.forage(self.sheep[i].face, forage_rate);
            self.stored_food += eaten;
        }
    }

    /// Reassign sheep `i` to a free slot on `to` and start its walk there.
    fn move_sheep(&mut self, i: usize, to: FaceId) {
        let Some(slot) = self.slots.free_slot(to) else {
            return;
        };
        let (from, old_slot) = (self.sheep[i].face, self.sheep[i].slot);
        self.slots.release(from, old_slot);
        self.slots.occupy(to, slot);
        let end = flock::slot_position(&self.mesh, to, slot, &mut self.rng);
        let sheep = &mut self.sheep[i];
        sheep.face = to;
        sheep.slot = slot;
        sheep.start_move(end);
    }

    fn raise_water(&mut self, events: &mut Vec<SimEvent>) {
        let cap = self.mesh.max_height() + 1.0;
        let next = (self.water_level + self.config.flood.rise_step(self.water_level)).min(cap);
        if next <= self.water_level {
            return;
        }
        self.water_level = next;
        self.flood_settled = false;
        info!(frame = self.frame, level = next, "water rising");
        self.emit(events, SimEventKind::WaterLevelChanged { level: next });
    }

    fn update_temple(&mut self, events: &mut Vec<SimEvent>) {
        let earned = self.config.temple.level_for(self.live_sheep_count());
        while self.temple_level < earned {
            self.temple_level += 1;
            info!(level = self.temple_level, "temple grew");
            self.emit(
                events,
                SimEventKind::TempleLevelChanged {
                    level: self.temple_level,
                },
            );
            self.play_sound(SoundCue::TempleGrow, events);
        }
    }

    // -----------------------------------------------------------------------
    // Spawning
    // -----------------------------------------------------------------------

    /// Spend `food_per_sheep` stored food on a birth near the flocking point,
    /// if the store holds more than that and a habitable face is reachable.
    pub fn try_spawn_sheep(&mut self, events: &mut Vec<SimEvent>) -> Option<SheepId> {
        let cost = self.config.flock.food_per_sheep;
        if self.stored_food <= cost {
            return None;
        }
        let id = self.spawn_sheep(events)?;
        self.stored_food -= cost;
        self.play_sound(SoundCue::Birth, events);
        Some(id)
    }

    /// Place one sheep on the first habitable face found by BFS from the
    /// flocking point, without spending food. `None` if there is no flocking
    /// point or no room.
    pub fn spawn_sheep(&mut self, events: &mut Vec<SimEvent>) -> Option<SheepId> {
        let origin = self.flock_point?;
        let face = flock::spawn_face(&self.mesh, &self.hydro, &self.slots, origin)?;
        let slot = self.slots.free_slot(face)?;
        self.slots.occupy(face, slot);

        let id = SheepId(self.next_sheep_id);
        self.next_sheep_id += 1;
        let position = flock::slot_position(&self.mesh, face, slot, &mut self.rng);
        self.sheep.push(Sheep {
            id,
            face,
            slot,
            position,
            movement: Movement::Stationary,
            alive: true,
        });
        debug!(frame = self.frame, sheep_id = %id, %face, "sheep spawned");
        self.emit(events, SimEventKind::SheepSpawned { sheep_id: id, face });
        Some(id)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn emit(&self, events: &mut Vec<SimEvent>, kind: SimEventKind) {
        events.push(SimEvent {
            frame: self.frame,
            kind,
        });
    }

    fn play_sound(&mut self, cue: SoundCue, events: &mut Vec<SimEvent>) {
        let audio = &self.config.audio;
        let cooldown = match cue {
            SoundCue::Birth => Some((&mut self.cooldowns.birth, audio.birth_cooldown_frames)),
            SoundCue::Drown => Some((&mut self.cooldowns.drown, audio.drown_cooldown_frames)),
            SoundCue::TempleGrow | SoundCue::FlagPlaced => None,
        };
        if let Some((remaining, reset)) = cooldown {
            if *remaining > 0 {
                return;
            }
            *remaining = reset;
        }
        self.emit(events, SimEventKind::PlaySound { cue });
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn mesh(&self) -> &TriMesh {
        &self.mesh
    }

    pub fn hydrology(&self) -> &Hydrology {
        &self.hydro
    }

    pub fn terrain(&self) -> &TerrainState {
        &self.terrain
    }

    pub fn slots(&self) -> &SlotMap {
        &self.slots
    }

    /// Sheep in the list this frame, including any flagged dead during it.
    pub fn sheep(&self) -> &[Sheep] {
        &self.sheep
    }

    pub fn live_sheep_count(&self) -> usize {
        self.sheep.iter().filter(|s| s.alive).count()
    }

    /// Faces with all three corners under water.
    pub fn submerged_face_count(&self) -> usize {
        self.mesh
            .face_ids()
            .filter(|&f| self.hydro.face_vertices_all_water(&self.mesh, f))
            .count()
    }

    pub fn flock_point(&self) -> Option<FaceId> {
        self.flock_point
    }

    /// Where to draw the flag marker under the pointer before the first
    /// click.
    pub fn flag_preview(&self) -> Option<WorldPos> {
        self.flag_preview
    }

    pub fn water_level(&self) -> f32 {
        self.water_level
    }

    pub fn stored_food(&self) -> f32 {
        self.stored_food
    }

    pub fn temple_level(&self) -> u8 {
        self.temple_level
    }

    /// Centre of the highest face, where the temple stands.
    pub fn temple_position(&self) -> WorldPos {
        self.mesh.face_centre(self.mesh.highest_face())
    }

    /// Render buffers as of the last slow tick (or hover repaint).
    pub fn buffers(&self) -> &MeshBuffers {
        self.terrain.buffers()
    }

    /// Flat `[x, y, z]` per live sheep, in list order.
    pub fn sheep_positions(&self) -> Vec<f32> {
        self.sheep
            .iter()
            .filter(|s| s.alive)
            .flat_map(|s| [s.position.x, s.position.y, s.position.z])
            .collect()
    }

    pub fn stats(&self) -> SimStats {
        SimStats {
            frame: self.frame,
            slow_ticks: self.slow_ticks,
            live_sheep: self.live_sheep_count(),
            stored_food: self.stored_food,
            water_level: self.water_level,
            flood_settled: self.flood_settled,
            temple_level: self.temple_level,
            total_grass: self.terrain.total_grass(),
            wet_vertices: self.hydro.wet_vertex_count(),
            submerged_faces: self.submerged_face_count(),
        }
    }
}

impl std::fmt::Debug for SimState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimState")
            .field("frame", &self.frame)
            .field("sheep", &self.sheep.len())
            .field("flock_point", &self.flock_point)
            .field("water_level", &self.water_level)
            .field("temple_level", &self.temple_level)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> GameConfig {
        let mut config = GameConfig::default();
        config.mesh.resolution = 16;
        config
    }

    fn test_sim() -> SimState {
        SimState::with_config(small_config()).unwrap()
    }

    fn click(frame: u64, face: FaceId) -> SimCommand {
        SimCommand {
            frame,
            action: SimAction::ClickFace { face },
        }
    }

    fn count(events: &[SimEvent], pred: impl Fn(&SimEventKind) -> bool) -> usize {
        events.iter().filter(|e| pred(&e.kind)).count()
    }

    #[test]
    fn new_sim_has_buffers_and_no_flock() {
        let sim = test_sim();
        assert_eq!(sim.frame(), 0);
        assert_eq!(sim.buffers().positions.len(), sim.mesh().face_count() * 9);
        assert!(sim.sheep().is_empty());
        assert_eq!(sim.temple_level(), 1);
        assert_eq!(sim.water_level(), -40.0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = small_config();
        config.cadence.slow_tick_interval = 0;
        assert!(SimState::with_config(config).is_err());
    }

    #[test]
    fn step_advances_frame_and_cadence() {
        let mut sim = test_sim();
        sim.step(&[], 9);
        assert_eq!(sim.frame(), 9);
        assert_eq!(sim.stats().slow_ticks, 2);
    }

    #[test]
    fn first_click_places_initial_flock() {
        let mut sim = test_sim();
        let peak = sim.mesh().highest_face();
        let result = sim.step(&[click(1, peak)], 1);
        assert_eq!(sim.flock_point(), Some(peak));
        assert_eq!(sim.live_sheep_count(), 5);
        assert_eq!(
            count(&result.events, |k| matches!(k, SimEventKind::SheepSpawned { .. })),
            5
        );
        assert_eq!(
            count(&result.events, |k| matches!(k, SimEventKind::FlockPointSet { .. })),
            1
        );
        // Initial flock is free.
        assert_eq!(sim.stored_food(), 0.0);
    }

    #[test]
    fn second_click_moves_point_without_spawning() {
        let mut sim = test_sim();
        let peak = sim.mesh().highest_face();
        sim.step(&[click(1, peak)], 1);
        let other = sim.mesh().adjacent_faces(peak)[0];
        let result = sim.step(&[click(2, other)], 2);
        assert_eq!(sim.flock_point(), Some(other));
        assert_eq!(
            count(&result.events, |k| matches!(k, SimEventKind::SheepSpawned { .. })),
            0
        );
        assert_eq!(sim.live_sheep_count(), 5);
    }

    #[test]
    fn out_of_range_click_is_dropped() {
        let mut sim = test_sim();
        let bad = FaceId(sim.mesh().face_count() as u32);
        let result = sim.step(&[click(1, bad)], 1);
        assert!(result.events.is_empty());
        assert_eq!(sim.flock_point(), None);
    }

    #[test]
    fn hover_previews_flag_only_before_flock() {
        let mut sim = test_sim();
        let face = FaceId(100);
        let hover = SimCommand {
            frame: 1,
            action: SimAction::HoverFace { face },
        };
        sim.step(&[hover], 1);
        assert_eq!(sim.terrain().highlight(), Some(face));
        assert_eq!(sim.flag_preview(), Some(sim.mesh().face_centre(face)));

        sim.step(&[click(2, sim.mesh().highest_face())], 2);
        assert_eq!(sim.flag_preview(), None);
        let hover_again = SimCommand {
            frame: 3,
            action: SimAction::HoverFace { face: FaceId(101) },
        };
        sim.step(&[hover_again], 3);
        assert_eq!(sim.terrain().highlight(), Some(FaceId(101)));
        assert_eq!(sim.flag_preview(), None);

        let clear = SimCommand {
            frame: 4,
            action: SimAction::ClearHover,
        };
        sim.step(&[clear], 4);
        assert_eq!(sim.terrain().highlight(), None);
    }

    #[test]
    fn water_waits_for_a_flock() {
        let mut sim = test_sim();
        let result = sim.step(&[], 1300);
        assert_eq!(sim.water_level(), -40.0);
        assert_eq!(
            count(&result.events, |k| matches!(k, SimEventKind::WaterLevelChanged { .. })),
            0
        );
    }

    #[test]
    fn water_rises_on_interval() {
        let mut sim = test_sim();
        sim.step(&[click(1, sim.mesh().highest_face())], 1);
        let early = sim.step(&[], 599);
        assert_eq!(sim.water_level(), -40.0);
        assert!(early.events.iter().all(|e| !matches!(e.kind, SimEventKind::WaterLevelChanged { .. })));

        let result = sim.step(&[], 600);
        assert_eq!(sim.water_level(), -37.0);
        assert_eq!(
            count(&result.events, |k| matches!(k, SimEventKind::WaterLevelChanged { .. })),
            1
        );
    }

    #[test]
    fn water_is_capped_above_peak() {
        let mut config = small_config();
        config.flood.water_rise_interval_frames = 1;
        config.flood.rise_tiers.clear();
        config.flood.top_step = 1000.0;
        let mut sim = SimState::with_config(config).unwrap();
        sim.step(&[click(1, sim.mesh().highest_face())], 3);
        assert_eq!(sim.water_level(), sim.mesh().max_height() + 1.0);
    }

    #[test]
    fn sound_cooldown_suppresses_repeats() {
        let mut sim = test_sim();
        let mut events = Vec::new();
        sim.play_sound(SoundCue::Birth, &mut events);
        sim.play_sound(SoundCue::Birth, &mut events);
        assert_eq!(events.len(), 1);
        sim.step(&[], u64::from(sim.config().audio.birth_cooldown_frames));
        sim.play_sound(SoundCue::Birth, &mut events);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn try_spawn_needs_more_than_cost() {
        let mut sim = test_sim();
        sim.step(&[click(1, sim.mesh().highest_face())], 1);
        let mut events = Vec::new();
        sim.stored_food = 5.0;
        assert!(sim.try_spawn_sheep(&mut events).is_none());
        sim.stored_food = 7.5;
        assert!(sim.try_spawn_sheep(&mut events).is_some());
        assert_eq!(sim.stored_food(), 2.5);
        assert_eq!(sim.live_sheep_count(), 6);
    }

    #[test]
    fn temple_position_is_highest_face_centre() {
        let sim = test_sim();
        let face = sim.mesh().highest_face();
        assert_eq!(sim.temple_position(), sim.mesh().face_centre(face));
    }

    #[test]
    fn walking_sheep_keep_their_destination_when_the_point_moves() {
        let mut sim = test_sim();
        let peak = sim.mesh().highest_face();
        sim.step(&[click(1, peak), click(2, FaceId(0))], 2);

        // Wait for goal steps toward face 0 to start.
        let mut walking = Vec::new();
        while walking.is_empty() {
            assert!(sim.frame() < 40, "no sheep started walking");
            let next = sim.frame() + 1;
            sim.step(&[], next);
            walking = sim
                .sheep()
                .iter()
                .filter_map(|s| match s.movement {
                    Movement::Moving { end, .. } => Some((s.id, s.face, end)),
                    Movement::Stationary => None,
                })
                .collect();
        }

        let next = sim.frame() + 1;
        sim.step(&[click(next, peak)], next);
        assert_eq!(sim.flock_point(), Some(peak));

        let arrive_by = sim.frame() + u64::from(sim.config().flock.movement_frames);
        while !walking.is_empty() {
            assert!(sim.frame() <= arrive_by, "walk outlasted movement_frames");
            walking.retain(|&(id, face, end)| {
                let sheep = sim.sheep().iter().find(|s| s.id == id).unwrap();
                assert_eq!(sheep.face, face);
                match sheep.movement {
                    Movement::Moving { end: e, .. } => {
                        assert_eq!(e, end);
                        true
                    }
                    Movement::Stationary => {
                        assert_eq!(sheep.position, end);
                        false
                    }
                }
            });
            let next = sim.frame() + 1;
            sim.step(&[], next);
        }
    }

    #[test]
    fn sheep_positions_are_three_floats_per_live_sheep() {
        let mut sim = test_sim();
        sim.step(&[click(1, sim.mesh().highest_face())], 1);
        assert_eq!(sim.sheep_positions().len(), sim.live_sheep_count() * 3);
    }
}
