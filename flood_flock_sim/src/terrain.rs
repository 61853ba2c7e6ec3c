// Per-face terrain attributes and render buffers.
//
// `TerrainState` owns the mutable per-face layers that sit on top of the
// fixed mesh: the grass pool each face holds (seeded from the fertility field,
// depleted by foraging) and the hover highlight. It also owns the flat render
// buffers handed to the host every slow tick.
//
// ## Buffers
//
// `MeshBuffers` is non-indexed: each face contributes three vertices, so
// both `positions` and `colors` hold `face_count * 9` floats laid out as
// `[x, y, z, x, y, z, x, y, z]` per face. Vertex `z` is terrain height plus
// water depth, so water renders as a raised surface. Every vertex of a face
// carries the face's flat colour. This layout lets one face be repainted
// in place without touching its neighbours.
//
// ## Colour policy
//
// Face colour comes from a `ColorMap` injected at construction:
// `(max corner height, grass, water depth) -> Rgb`. Closures implement it
// directly; `IslandPalette` is the default. The highlighted face has its
// colour multiplied by `highlight_multiplier`, and moving the highlight
// repaints only the old and the new face.
//
// See also: `hydrology.rs` for `face_water_depth`, `heightfield.rs` for
// `fertility`, `sim.rs` which calls `setup_vertices` on every slow tick.

use crate::heightfield::HeightField;
use crate::hydrology::Hydrology;
use crate::mesh::TriMesh;
use crate::types::{FaceId, Rgb};
use rayon::prelude::*;

/// Floats per face in each render buffer (3 vertices x 3 components).
pub const FLOATS_PER_FACE: usize = 9;

// ---------------------------------------------------------------------------
// Colour mapping
// ---------------------------------------------------------------------------

/// Presentation policy for face colours.
pub trait ColorMap: Send + Sync {
    /// Colour of a face given the height of its highest corner, its remaining
    /// grass, and its display water depth.
    fn color(&self, max_height: f32, grass: f32, water_depth: f32) -> Rgb;
}

impl<F> ColorMap for F
where
    F: Fn(f32, f32, f32) -> Rgb + Send + Sync,
{
    fn color(&self, max_height: f32, grass: f32, water_depth: f32) -> Rgb {
        self(max_height, grass, water_depth)
    }
}

/// Default island colouring: water shades with depth, dry land runs from
/// sand through grass and rock to snow.
#[derive(Clone, Debug)]
pub struct IslandPalette {
    pub shallow_water: Rgb,
    pub deep_water: Rgb,
    /// Depth at which water reaches `deep_water`.
    pub deep_at: f32,
    pub sand: Rgb,
    pub bare_soil: Rgb,
    pub lush_grass: Rgb,
    pub rock: Rgb,
    pub snow: Rgb,
    /// Absolute terrain heights at which the bands begin, compared against
    /// `max_height` of the face.
    pub sand_below: f32,
    pub rock_above: f32,
    pub snow_above: f32,
}

impl Default for IslandPalette {
    fn default() -> Self {
        Self {
            shallow_water: Rgb::new(0.25, 0.55, 0.75),
            deep_water: Rgb::new(0.05, 0.15, 0.4),
            deep_at: 25.0,
            sand: Rgb::new(0.86, 0.8, 0.55),
            bare_soil: Rgb::new(0.5, 0.42, 0.28),
            lush_grass: Rgb::new(0.25, 0.6, 0.2),
            rock: Rgb::new(0.45, 0.43, 0.4),
            snow: Rgb::new(0.95, 0.95, 0.97),
            sand_below: -30.0,
            rock_above: 55.0,
            snow_above: 80.0,
        }
    }
}

impl ColorMap for IslandPalette {
    fn color(&self, max_height: f32, grass: f32, water_depth: f32) -> Rgb {
        if water_depth > 0.0 {
            return self
                .shallow_water
                .mix(self.deep_water, water_depth / self.deep_at);
        }
        if max_height < self.sand_below {
            self.sand
        } else if max_height > self.snow_above {
            self.snow
        } else if max_height > self.rock_above {
            self.rock
        } else {
            self.bare_soil.mix(self.lush_grass, grass)
        }
    }
}

// ---------------------------------------------------------------------------
// Buffers
// ---------------------------------------------------------------------------

/// Flat, non-indexed render buffers. See the module header for the layout.
#[derive(Clone, Debug, Default)]
pub struct MeshBuffers {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
}

impl MeshBuffers {
    fn for_faces(face_count: usize) -> Self {
        Self {
            positions: vec![0.0; face_count * FLOATS_PER_FACE],
            colors: vec![0.0; face_count * FLOATS_PER_FACE],
        }
    }

    /// The nine colour floats of one face.
    pub fn face_colors(&self, face: FaceId) -> &[f32] {
        let start = face.index() * FLOATS_PER_FACE;
        &self.colors[start..start + FLOATS_PER_FACE]
    }

    /// The nine position floats of one face.
    pub fn face_positions(&self, face: FaceId) -> &[f32] {
        let start = face.index() * FLOATS_PER_FACE;
        &self.positions[start..start + FLOATS_PER_FACE]
    }
}

// ---------------------------------------------------------------------------
// TerrainState
// ---------------------------------------------------------------------------

pub struct TerrainState {
    grass: Vec<f32>,
    color_map: Box<dyn ColorMap>,
    highlight: Option<FaceId>,
    highlight_multiplier: f32,
    buffers: MeshBuffers,
}

impl TerrainState {
    /// Seed every face's grass from the fertility field at its centre.
    pub fn new(
        mesh: &TriMesh,
        field: &HeightField,
        color_map: Box<dyn ColorMap>,
        highlight_multiplier: f32,
    ) -> Self {
        let grass = mesh
            .face_ids()
            .map(|f| {
                let (x, y) = mesh.normalized(mesh.face_centre(f));
                field.fertility(x, y)
            })
            .collect();
        Self {
            grass,
            color_map,
            highlight: None,
            highlight_multiplier,
            buffers: MeshBuffers::for_faces(mesh.face_count()),
        }
    }

    pub fn grass(&self, face: FaceId) -> f32 {
        self.grass[face.index()]
    }

    /// Sum of all grass left on the island.
    pub fn total_grass(&self) -> f32 {
        self.grass.iter().sum()
    }

    /// Eat up to `max_amount` grass from `face`. Returns the amount eaten.
    pub fn forage(&mut self, face: FaceId, max_amount: f32) -> f32 {
        let pool = &mut self.grass[face.index()];
        let eaten = pool.min(max_amount).max(0.0);
        *pool -= eaten;
        eaten
    }

    pub fn highlight(&self) -> Option<FaceId> {
        self.highlight
    }

    /// Move the hover highlight, repainting the previous and the new face.
    pub fn set_highlight(&mut self, face: Option<FaceId>, mesh: &TriMesh, hydro: &Hydrology) {
        let previous = std::mem::replace(&mut self.highlight, face);
        if previous == face {
            return;
        }
        for f in [previous, face].into_iter().flatten() {
            self.paint_face(mesh, hydro, f);
        }
    }

    pub fn buffers(&self) -> &MeshBuffers {
        &self.buffers
    }

    /// Rebuild every face's positions and colours from current heights,
    /// water and grass.
    pub fn setup_vertices(&mut self, mesh: &TriMesh, hydro: &Hydrology) {
        let grass = &self.grass;
        let color_map = self.color_map.as_ref();
        let highlight = self.highlight;
        let multiplier = self.highlight_multiplier;

        self.buffers
            .positions
            .par_chunks_mut(FLOATS_PER_FACE)
            .zip(self.buffers.colors.par_chunks_mut(FLOATS_PER_FACE))
            .enumerate()
            .for_each(|(i, (pos, col))| {
                let face = FaceId(i as u32);
                write_positions(mesh, hydro, face, pos);
                let rgb = face_color(mesh, hydro, color_map, grass[i], face);
                let rgb = if highlight == Some(face) {
                    rgb.brightened(multiplier)
                } else {
                    rgb
                };
                write_color(rgb, col);
            });
    }

    /// Recompute one face's colour in place.
    fn paint_face(&mut self, mesh: &TriMesh, hydro: &Hydrology, face: FaceId) {
        let mut rgb = face_color(
            mesh,
            hydro,
            self.color_map.as_ref(),
            self.grass[face.index()],
            face,
        );
        if self.highlight == Some(face) {
            rgb = rgb.brightened(self.highlight_multiplier);
        }
        let start = face.index() * FLOATS_PER_FACE;
        write_color(rgb, &mut self.buffers.colors[start..start + FLOATS_PER_FACE]);
    }
}

impl std::fmt::Debug for TerrainState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerrainState")
            .field("faces", &self.grass.len())
            .field("highlight", &self.highlight)
            .finish_non_exhaustive()
    }
}

fn face_color(
    mesh: &TriMesh,
    hydro: &Hydrology,
    color_map: &dyn ColorMap,
    grass: f32,
    face: FaceId,
) -> Rgb {
    let max_height = mesh
        .face_vertices(face)
        .iter()
        .map(|&v| mesh.height(v))
        .fold(f32::NEG_INFINITY, f32::max);
    color_map.color(max_height, grass, hydro.face_water_depth(mesh, face))
}

fn write_positions(mesh: &TriMesh, hydro: &Hydrology, face: FaceId, out: &mut [f32]) {
    for (k, v) in mesh.face_vertices(face).into_iter().enumerate() {
        let p = mesh.vertex(v);
        out[k * 3] = p.x;
        out[k * 3 + 1] = p.y;
        out[k * 3 + 2] = p.z + hydro.depth(v);
    }
}

fn write_color(rgb: Rgb, out: &mut [f32]) {
    for k in 0..3 {
        out[k * 3] = rgb.r;
        out[k * 3 + 1] = rgb.g;
        out[k * 3 + 2] = rgb.b;
    }
}
