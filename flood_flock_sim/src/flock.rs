// Sheep, face slots, and the flock's movement choices.
//
// Each face has three sheep slots, one per corner vertex, tracked in
// `SlotMap` as `[bool; 3]` per face. A sheep always owns exactly one slot
// and the slot index picks the corner its on-face position leans toward, so
// the occupancy cap (three per face) and the sprite layout come from the same
// table. Occupying a slot that is already taken is a caller bug and panics;
// callers find a free slot first with `free_slot`.
//
// A sheep is either `Stationary` or `Moving` between two world positions.
// Moves are only issued to stationary sheep and are never redirected in
// flight; `advance` steps progress by `1 / movement_frames` per fast tick.
// The slot on the destination face is taken when the move is issued, not
// when it completes, so two sheep can never head for the same slot.
//
// The choice functions here are pure queries over mesh, water and slots:
// `goal_step` (greedy descent toward the flocking point), `wander_step`
// (random free neighbour) and `spawn_face` (BFS outward from the flocking
// point). `sim.rs` applies their answers.
//
// See also: `sim.rs` which runs these each slow tick, `mesh.rs` for
// `adjacent_faces`, `hydrology.rs` for `face_vertices_all_water`.

use crate::hydrology::Hydrology;
use crate::mesh::TriMesh;
use crate::prng::GameRng;
use crate::types::{FaceId, SheepId, WorldPos};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Slots per face; one per corner.
pub const SLOTS_PER_FACE: usize = 3;

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

/// Per-face slot occupancy.
#[derive(Clone, Debug)]
pub struct SlotMap {
    slots: Vec<[bool; SLOTS_PER_FACE]>,
}

impl SlotMap {
    pub fn new(face_count: usize) -> Self {
        Self {
            slots: vec![[false; SLOTS_PER_FACE]; face_count],
        }
    }

    /// Lowest free slot on `face`, if any.
    pub fn free_slot(&self, face: FaceId) -> Option<u8> {
        self.slots[face.index()]
            .iter()
            .position(|&taken| !taken)
            .map(|s| s as u8)
    }

    pub fn has_free_slot(&self, face: FaceId) -> bool {
        self.free_slot(face).is_some()
    }

    /// Mark a slot taken.
    ///
    /// # Panics
    ///
    /// If the slot is already occupied.
    pub fn occupy(&mut self, face: FaceId, slot: u8) {
        let cell = &mut self.slots[face.index()][slot as usize];
        assert!(!*cell, "slot {slot} on {face} is already occupied");
        *cell = true;
    }

    pub fn release(&mut self, face: FaceId, slot: u8) {
        self.slots[face.index()][slot as usize] = false;
    }

    pub fn occupied_count(&self, face: FaceId) -> usize {
        self.slots[face.index()].iter().filter(|&&t| t).count()
    }

    pub fn is_occupied(&self, face: FaceId, slot: u8) -> bool {
        self.slots[face.index()][slot as usize]
    }
}

/// On-face position for a slot: a weighted average of the slot's corner and
/// the face centre, pulled toward the centre by a random weight in [1, 2).
/// The result is a convex combination of the corners, so it stays inside the
/// face.
pub fn slot_position(mesh: &TriMesh, face: FaceId, slot: u8, rng: &mut GameRng) -> WorldPos {
    let corner = mesh.vertex(mesh.face_vertices(face)[slot as usize]);
    let centre = mesh.face_centre(face);
    let wander = rng.next_f32() + 1.0;
    corner.lerp(centre, wander / (1.0 + wander))
}

// ---------------------------------------------------------------------------
// Sheep
// ---------------------------------------------------------------------------

/// Cosmetic movement between slot positions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Movement {
    Stationary,
    Moving {
        start: WorldPos,
        end: WorldPos,
        /// Fraction of the walk completed, in [0, 1].
        progress: f32,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Sheep {
    pub id: SheepId,
    pub face: FaceId,
    pub slot: u8,
    pub position: WorldPos,
    pub movement: Movement,
    pub alive: bool,
}

impl Sheep {
    pub fn is_idle(&self) -> bool {
        self.movement == Movement::Stationary
    }

    /// Begin walking to `end`.
    pub fn start_move(&mut self, end: WorldPos) {
        self.movement = Movement::Moving {
            start: self.position,
            end,
            progress: 0.0,
        };
    }

    /// Step an in-flight move by `step`. Returns true on the frame the sheep
    /// arrives.
    pub fn advance(&mut self, step: f32) -> bool {
        let Movement::Moving { start, end, progress } = &mut self.movement else {
            return false;
        };
        *progress += step;
        // Ten steps of 0.1 accumulate to slightly under 1.0 in f32.
        if *progress >= 1.0 - 1e-4 {
            self.position = *end;
            self.movement = Movement::Stationary;
            true
        } else {
            self.position = start.lerp(*end, *progress);
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Choices
// ---------------------------------------------------------------------------

/// A face a sheep may stand on: it has a free slot and is not fully under
/// water.
pub fn is_habitable(mesh: &TriMesh, hydro: &Hydrology, slots: &SlotMap, face: FaceId) -> bool {
    slots.has_free_slot(face) && !hydro.face_vertices_all_water(mesh, face)
}

/// Greedy step toward `goal`: the habitable neighbour whose centre is
/// closest to the goal's centre, if it is strictly closer than `current`.
///
/// Staying put is always a candidate, so `None` means no improving move.
pub fn goal_step(
    mesh: &TriMesh,
    hydro: &Hydrology,
    slots: &SlotMap,
    current: FaceId,
    goal: FaceId,
) -> Option<FaceId> {
    let target = mesh.face_centre(goal);
    let current_dist = mesh.face_centre(current).dist_sq_xy(target);
    mesh.adjacent_faces(current)
        .into_iter()
        .filter(|&f| is_habitable(mesh, hydro, slots, f))
        .map(|f| (f, mesh.face_centre(f).dist_sq_xy(target)))
        .filter(|&(_, d)| d < current_dist)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(f, _)| f)
}

/// Random step: the first habitable face from a shuffled list of neighbours.
pub fn wander_step(
    mesh: &TriMesh,
    hydro: &Hydrology,
    slots: &SlotMap,
    current: FaceId,
    rng: &mut GameRng,
) -> Option<FaceId> {
    let mut neighbours = mesh.adjacent_faces(current);
    rng.shuffle(&mut neighbours);
    neighbours
        .into_iter()
        .find(|&f| is_habitable(mesh, hydro, slots, f))
}

/// Breadth-first search over face adjacency from `origin`, returning the
/// first habitable face. Submerged faces are searched through but never
/// chosen. Each face is visited at most once.
pub fn spawn_face(
    mesh: &TriMesh,
    hydro: &Hydrology,
    slots: &SlotMap,
    origin: FaceId,
) -> Option<FaceId> {
    let mut visited = vec![false; mesh.face_count()];
    let mut queue = VecDeque::new();
    visited[origin.index()] = true;
    queue.push_back(origin);
    while let Some(face) = queue.pop_front() {
        if is_habitable(mesh, hydro, slots, face) {
            return Some(face);
        }
        for next in mesh.adjacent_faces(face) {
            if !visited[next.index()] {
                visited[next.index()] = true;
                queue.push_back(next);
            }
        }
    }
    None
}
