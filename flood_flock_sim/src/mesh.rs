// Triangular lattice mesh over a square domain.
//
// `TriMesh` holds the island's fixed topology: `(resolution + 1)^2` vertices
// laid out row by row, and `2 * resolution^2` triangles, two per lattice
// quad. Topology never changes after construction; only the scalar layers in
// `hydrology.rs` and `terrain.rs` mutate.
//
// ## Vertex layout
//
// Vertex `v` sits at `row = v / (resolution + 1)`, `col = v % (resolution + 1)`.
// Even rows are shifted right by half a side (`x = col * side + side / 2`),
// odd rows are not, which gives the lattice its jagged left edge. The shifted
// last column of even rows is clamped to the domain edge `x = width`, so the
// right edge stays on the square. Rows are `sqrt(side^2 + (side / 2)^2)`
// apart.
//
// ## Face layout
//
// Quad `(row, col)` with top-left vertex `n` and stride `s = resolution + 1`
// owns faces `quad * 2` and `quad * 2 + 1`, where `quad = row * resolution +
// col`. The split alternates with row parity so every triangle spans the
// half-side shift between neighbouring rows:
//
//   even rows: (n, n+s+1, n+s)   and (n, n+1, n+s+1)
//   odd rows:  (n, n+1, n+s)     and (n+1, n+s+1, n+s)
//
// Changing either split breaks the adjacency and geometry invariants tested
// below.
//
// This numbering is dense: ids run `0..2 * resolution^2` with no gaps. A
// host that numbers faces by their top-left vertex instead
// (`vertex * 2 + parity`) converts with `quad = vertex - row`, where
// `row = vertex / (resolution + 1)`, then `face = quad * 2 + parity`.
//
// ## Adjacency
//
// The vertex -> faces index is built while faces are created. Face adjacency
// is derived on demand: two faces are neighbours iff they share exactly two
// vertices. All storage is `Vec` indexed by `VertexId`/`FaceId`.
//
// See also: `heightfield.rs` for the height sampler passed to `TriMesh::new`,
// `hydrology.rs` which relaxes water over `adjacent_points`, `flock.rs` which
// moves sheep over `adjacent_faces`.

use crate::config::MeshParams;
use crate::error::{SimError, SimResult};
use crate::types::{FaceId, VertexId, WorldPos};
use smallvec::SmallVec;

/// Faces touching one vertex. Interior vertices touch exactly six.
pub type VertexFaces = SmallVec<[FaceId; 6]>;

/// Fixed-topology triangular mesh with per-vertex terrain height.
#[derive(Clone, Debug)]
pub struct TriMesh {
    resolution: u32,
    width: f32,
    side_len: f32,
    row_height: f32,
    /// Planar position with `z` = terrain height.
    vertices: Vec<WorldPos>,
    faces: Vec<[VertexId; 3]>,
    vertex_faces: Vec<VertexFaces>,
    /// Centroid of each face's three vertices.
    face_centres: Vec<WorldPos>,
    highest_vertex: VertexId,
    highest_face: FaceId,
}

impl TriMesh {
    /// Build the lattice, sampling `height(nx, ny)` at every vertex.
    ///
    /// `nx` and `ny` are normalized to [-0.5, 0.5] across the domain, which is
    /// the input range `HeightField::sample` expects.
    pub fn new(params: &MeshParams, height: impl Fn(f32, f32) -> f32) -> SimResult<Self> {
        if params.resolution < 1 {
            return Err(SimError::InvalidConfig(
                "mesh resolution must be at least 1".into(),
            ));
        }
        if params.resolution > MeshParams::MAX_RESOLUTION {
            return Err(SimError::InvalidConfig(format!(
                "mesh resolution {} exceeds {}",
                params.resolution,
                MeshParams::MAX_RESOLUTION
            )));
        }
        let r = params.resolution;
        let stride = r + 1;
        let side_len = params.width / r as f32;
        let row_height = (side_len * side_len + (side_len * 0.5) * (side_len * 0.5)).sqrt();
        let depth = r as f32 * row_height;

        let vertex_count = (stride * stride) as usize;
        let mut vertices = Vec::with_capacity(vertex_count);
        for v in 0..vertex_count as u32 {
            let (row, col) = (v / stride, v % stride);
            let shift = if row % 2 == 0 { side_len * 0.5 } else { 0.0 };
            let x = (col as f32 * side_len + shift).min(params.width);
            let y = row as f32 * row_height;
            let z = height(x / params.width - 0.5, y / depth - 0.5);
            vertices.push(WorldPos::new(x, y, z));
        }

        let face_count = (2 * r * r) as usize;
        let mut faces = Vec::with_capacity(face_count);
        let mut vertex_faces = vec![VertexFaces::new(); vertex_count];
        for row in 0..r {
            for col in 0..r {
                let n = row * stride + col;
                let pair = if row % 2 == 0 {
                    [
                        [n, n + stride + 1, n + stride],
                        [n, n + 1, n + stride + 1],
                    ]
                } else {
                    [
                        [n, n + 1, n + stride],
                        [n + 1, n + stride + 1, n + stride],
                    ]
                };
                for tri in pair {
                    let face = FaceId(faces.len() as u32);
                    for &v in &tri {
                        vertex_faces[v as usize].push(face);
                    }
                    faces.push(tri.map(VertexId));
                }
            }
        }

        let face_centres: Vec<WorldPos> = faces
            .iter()
            .map(|[a, b, c]| {
                WorldPos::centroid(vertices[a.index()], vertices[b.index()], vertices[c.index()])
            })
            .collect();

        let highest_vertex = VertexId(argmax(vertices.iter().map(|p| p.z)) as u32);
        let highest_face = FaceId(argmax(face_centres.iter().map(|p| p.z)) as u32);

        Ok(Self {
            resolution: r,
            width: params.width,
            side_len,
            row_height,
            vertices,
            faces,
            vertex_faces,
            face_centres,
            highest_vertex,
            highest_face,
        })
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn side_len(&self) -> f32 {
        self.side_len
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// All face ids in index order.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.faces.len() as u32).map(FaceId)
    }

    /// Checks that `face` exists.
    pub fn check_face(&self, face: FaceId) -> SimResult<()> {
        if face.index() < self.faces.len() {
            Ok(())
        } else {
            Err(SimError::FaceOutOfRange {
                face,
                face_count: self.faces.len(),
            })
        }
    }

    /// Planar position of a vertex with `z` = terrain height.
    pub fn vertex(&self, v: VertexId) -> WorldPos {
        self.vertices[v.index()]
    }

    /// Terrain height of a vertex.
    pub fn height(&self, v: VertexId) -> f32 {
        self.vertices[v.index()].z
    }

    /// The three vertices of a face, in winding order.
    pub fn face_vertices(&self, face: FaceId) -> [VertexId; 3] {
        self.faces[face.index()]
    }

    /// Cached centroid of a face (terrain height, no water).
    pub fn face_centre(&self, face: FaceId) -> WorldPos {
        self.face_centres[face.index()]
    }

    /// Faces that include `v` as a corner.
    pub fn vertex_faces(&self, v: VertexId) -> &[FaceId] {
        &self.vertex_faces[v.index()]
    }

    /// `(row, col)` of a vertex in the lattice.
    pub fn row_col(&self, v: VertexId) -> (u32, u32) {
        let stride = self.resolution + 1;
        (v.0 / stride, v.0 % stride)
    }

    /// True for vertices on the outer ring (first/last row or column).
    pub fn is_boundary(&self, v: VertexId) -> bool {
        let (row, col) = self.row_col(v);
        row == 0 || col == 0 || row == self.resolution || col == self.resolution
    }

    /// Faces sharing an edge (exactly two vertices) with `face`.
    ///
    /// Faces that touch only at a corner share one vertex and are excluded;
    /// `face` itself shares all three and is excluded too.
    pub fn adjacent_faces(&self, face: FaceId) -> SmallVec<[FaceId; 3]> {
        let mut counts: SmallVec<[(FaceId, u8); 16]> = SmallVec::new();
        for v in self.faces[face.index()] {
            for &other in &self.vertex_faces[v.index()] {
                match counts.iter_mut().find(|(f, _)| *f == other) {
                    Some((_, n)) => *n += 1,
                    None => counts.push((other, 1)),
                }
            }
        }
        counts
            .into_iter()
            .filter(|&(_, n)| n == 2)
            .map(|(f, _)| f)
            .collect()
    }

    /// Vertices sharing at least one face with `v`, excluding `v` itself.
    pub fn adjacent_points(&self, v: VertexId) -> SmallVec<[VertexId; 8]> {
        let mut points: SmallVec<[VertexId; 8]> = SmallVec::new();
        for &face in &self.vertex_faces[v.index()] {
            for other in self.faces[face.index()] {
                if other != v && !points.contains(&other) {
                    points.push(other);
                }
            }
        }
        points
    }

    /// Highest vertex by terrain height. Ties resolve to the lowest index.
    pub fn highest_vertex(&self) -> VertexId {
        self.highest_vertex
    }

    /// Face whose centre is highest. Used to place the temple landmark.
    pub fn highest_face(&self) -> FaceId {
        self.highest_face
    }

    /// Terrain height of the highest vertex.
    pub fn max_height(&self) -> f32 {
        self.height(self.highest_vertex)
    }

    /// Map a planar position to the normalized [-0.5, 0.5] coordinates the
    /// height and fertility samplers take.
    pub fn normalized(&self, p: WorldPos) -> (f32, f32) {
        let depth = self.resolution as f32 * self.row_height;
        (p.x / self.width - 0.5, p.y / depth - 0.5)
    }

    /// Terrain height of the lowest vertex.
    pub fn min_height(&self) -> f32 {
        self.vertices
            .iter()
            .map(|p| p.z)
            .fold(f32::INFINITY, f32::min)
    }
}

/// Index of the first maximum. Returns 0 for an empty iterator.
fn argmax(values: impl Iterator<Item = f32>) -> usize {
    let mut best = 0;
    let mut best_value = f32::NEG_INFINITY;
    for (i, value) in values.enumerate() {
        if value > best_value {
            best = i;
            best_value = value;
        }
    }
    best
}
