// Core types shared across the simulation.
//
// Defines the compact index types for mesh elements and agents (`VertexId`,
// `FaceId`, `SheepId`), planar/world positions (`WorldPos`), and the colour
// type handed to the render layer (`Rgb`). All derive `Serialize` and
// `Deserialize` so commands and events can cross the wasm boundary as JSON.
//
// Mesh indices are plain integers assigned in a fixed order at mesh build
// time (see `mesh.rs`). They double as indices into the dense per-vertex and
// per-face arrays owned by `TriMesh`, `Hydrology`, and `TerrainState`.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Index types
// ---------------------------------------------------------------------------

macro_rules! index_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            /// The id as a dense array index.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

index_id!(/// Stable index of a mesh vertex, `0..vertex_count`.
VertexId);
index_id!(/// Stable index of a mesh triangle, `owner_quad * 2 + parity`.
///
/// Quads are numbered `row * resolution + col`, so ids are dense. This is a
/// renumbering of the vertex-owned scheme `owner_vertex * 2 + parity`
/// (which skips the last vertex of every row); convert with
/// `owner_quad = owner_vertex - owner_vertex / (resolution + 1)`.
FaceId);
index_id!(/// Sequential identifier of a sheep, never reused within a game.
SheepId);

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A position in world space.
///
/// X and Y span the island plane; Z is up (terrain height plus any water
/// standing on top of it).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPos {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Squared planar distance, ignoring height.
    pub fn dist_sq_xy(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Linear interpolation; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    /// Mean of three positions (a triangle's centroid).
    pub fn centroid(a: Self, b: Self, c: Self) -> Self {
        Self {
            x: (a.x + b.x + c.x) / 3.0,
            y: (a.y + b.y + c.y) / 3.0,
            z: (a.z + b.z + c.z) / 3.0,
        }
    }
}

impl fmt::Display for WorldPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Colour
// ---------------------------------------------------------------------------

/// Linear RGB colour with channels in [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Multiply every channel, clamping to 1.0.
    pub fn brightened(self, factor: f32) -> Self {
        Self {
            r: (self.r * factor).min(1.0),
            g: (self.g * factor).min(1.0),
            b: (self.b * factor).min(1.0),
        }
    }

    /// Blend toward `other` by `t` in [0, 1].
    pub fn mix(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }
}
