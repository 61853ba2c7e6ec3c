// Water depth relaxation over the mesh.
//
// `Hydrology` stores one water depth per vertex (always >= 0) and advances it
// toward equilibrium one relaxation pass at a time. Callers invoke
// `flood(mesh, level, epsilon)` repeatedly, typically once per slow tick, and
// stop when it returns `false`. Spreading water over several passes is what
// makes the flood visibly creep inland instead of snapping into place.
//
// ## One pass
//
//   1. Boundary vertices (outer row/column ring) are pinned to the ocean:
//      `depth = max(0, level - height)`.
//   2. Every interior vertex starts from its current depth and looks at all
//      vertices sharing a face with it. A neighbour that is wet and whose
//      water surface (`height + depth`) stands above this vertex's proposed
//      surface raises the proposal to that surface. Neighbours are read from
//      the previous pass's buffer (Jacobi, not Gauss-Seidel), so a pass is
//      independent of vertex order and water advances one ring per pass.
//   3. If any vertex moved by more than `epsilon` the new buffer is swapped in
//      and the pass reports `true`.
//
// Propagation is level-seeking, not volume-conserving: basins connected to
// the sea through wet vertices fill to the sea level, and vertices above it
// stay dry. Interior water never drains, matching a ratchet that only raises
// the level.
//
// See also: `mesh.rs` for `adjacent_points`, `terrain.rs` which colours faces
// from `face_water_depth`, `sim.rs` which decides when to call `flood`.

use crate::mesh::TriMesh;
use crate::types::{FaceId, VertexId};

/// Per-vertex water depth with a scratch buffer for relaxation.
#[derive(Clone, Debug)]
pub struct Hydrology {
    depth: Vec<f32>,
    scratch: Vec<f32>,
}

impl Hydrology {
    /// All-dry state for `vertex_count` vertices.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            depth: vec![0.0; vertex_count],
            scratch: vec![0.0; vertex_count],
        }
    }

    /// Run one relaxation pass toward an ocean at `level`. Returns whether any
    /// vertex moved by more than `epsilon`; the new depths are committed only
    /// in that case.
    pub fn flood(&mut self, mesh: &TriMesh, level: f32, epsilon: f32) -> bool {
        debug_assert_eq!(self.depth.len(), mesh.vertex_count());

        for i in 0..self.depth.len() {
            let v = VertexId(i as u32);
            let height = mesh.height(v);
            self.scratch[i] = if mesh.is_boundary(v) {
                (level - height).max(0.0)
            } else {
                let mut surface = height + self.depth[i];
                for n in mesh.adjacent_points(v) {
                    let d = self.depth[n.index()];
                    if d > 0.0 {
                        surface = surface.max(mesh.height(n) + d);
                    }
                }
                surface - height
            };
        }

        let changed = self
            .depth
            .iter()
            .zip(&self.scratch)
            .any(|(old, new)| (new - old).abs() > epsilon);
        if changed {
            std::mem::swap(&mut self.depth, &mut self.scratch);
        }
        changed
    }

    /// Water depth at a vertex.
    pub fn depth(&self, v: VertexId) -> f32 {
        self.depth[v.index()]
    }

    /// All vertex depths in index order.
    pub fn depths(&self) -> &[f32] {
        &self.depth
    }

    /// Water surface height at a vertex (terrain plus water).
    pub fn surface(&self, mesh: &TriMesh, v: VertexId) -> f32 {
        mesh.height(v) + self.depth(v)
    }

    pub fn is_wet(&self, v: VertexId) -> bool {
        self.depth(v) > 0.0
    }

    /// True iff all three corners of `face` are under water. A sheep on such
    /// a face drowns and no sheep may move onto it.
    pub fn face_vertices_all_water(&self, mesh: &TriMesh, face: FaceId) -> bool {
        mesh.face_vertices(face).iter().all(|&v| self.is_wet(v))
    }

    /// Water depth used to colour `face`.
    ///
    /// Fully submerged faces use the deepest corner. Partially wet faces use
    /// the depth at the corner with the highest water surface, so the shore
    /// line follows the slope. Dry faces report 0.
    pub fn face_water_depth(&self, mesh: &TriMesh, face: FaceId) -> f32 {
        let verts = mesh.face_vertices(face);
        if verts.iter().all(|&v| self.is_wet(v)) {
            return verts
                .iter()
                .map(|&v| self.depth(v))
                .fold(0.0, f32::max);
        }
        let mut best = verts[0];
        for &v in &verts[1..] {
            if self.surface(mesh, v) > self.surface(mesh, best) {
                best = v;
            }
        }
        self.depth(best)
    }

    /// Number of vertices with any water.
    pub fn wet_vertex_count(&self) -> usize {
        self.depth.iter().filter(|&&d| d > 0.0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MeshParams;

    const EPS: f32 = 0.01;

    fn mesh_with(resolution: u32, height: impl Fn(f32, f32) -> f32) -> TriMesh {
        TriMesh::new(
            &MeshParams {
                width: 100.0,
                resolution,
            },
            height,
        )
        .unwrap()
    }

    /// Bowl rising toward the rim with a dip in the middle.
    fn bowl(x: f32, y: f32) -> f32 {
        let r = (x * x + y * y).sqrt();
        10.0 - 40.0 * (0.5 - r).abs()
    }

    fn settle(hydro: &mut Hydrology, mesh: &TriMesh, level: f32) -> usize {
        let mut passes = 0;
        while hydro.flood(mesh, level, EPS) {
            passes += 1;
            assert!(passes < 10_000, "flood did not converge");
        }
        passes
    }

    #[test]
    fn converges_within_mesh_diameter() {
        let mesh = mesh_with(12, |x, y| (x * 7.0).sin() * 5.0 + y * 3.0);
        let mut hydro = Hydrology::new(mesh.vertex_count());
        let passes = settle(&mut hydro, &mesh, 2.0);
        // Water advances at least one ring per changing pass.
        assert!(passes <= 2 * (mesh.resolution() as usize + 1), "{passes} passes");
        assert!(!hydro.flood(&mesh, 2.0, EPS));
    }

    #[test]
    fn depth_is_never_negative() {
        let mesh = mesh_with(10, bowl);
        let mut hydro = Hydrology::new(mesh.vertex_count());
        for level in [-50.0, -5.0, 0.0, 3.0, 20.0] {
            settle(&mut hydro, &mesh, level);
            assert!(hydro.depths().iter().all(|&d| d >= 0.0));
        }
    }

    #[test]
    fn below_lowest_point_stays_dry() {
        let mesh = mesh_with(8, bowl);
        let mut hydro = Hydrology::new(mesh.vertex_count());
        settle(&mut hydro, &mesh, mesh.min_height() - 1.0);
        assert!(hydro.depths().iter().all(|&d| d == 0.0));
        assert_eq!(hydro.wet_vertex_count(), 0);
    }

    #[test]
    fn raising_level_never_lowers_depth() {
        let mesh = mesh_with(10, |x, y| (x * 9.0).cos() * 8.0 + (y * 5.0).sin() * 6.0);
        let mut hydro = Hydrology::new(mesh.vertex_count());
        let mut previous = hydro.depths().to_vec();
        for level in [-10.0, -4.0, 0.0, 2.5, 7.0, 15.0] {
            settle(&mut hydro, &mesh, level);
            for (i, (&now, &before)) in hydro.depths().iter().zip(&previous).enumerate() {
                assert!(now >= before, "vertex {i} dropped from {before} to {now}");
            }
            previous = hydro.depths().to_vec();
        }
    }

    #[test]
    fn connected_basin_fills_to_sea_level() {
        // Flat plain at height 0 with the sea at 4: every vertex ends at
        // depth 4.
        let mesh = mesh_with(6, |_, _| 0.0);
        let mut hydro = Hydrology::new(mesh.vertex_count());
        settle(&mut hydro, &mesh, 4.0);
        for &d in hydro.depths() {
            assert!((d - 4.0).abs() < 1e-4);
        }
    }

    #[test]
    fn enclosed_peak_stays_dry() {
        // Plateau at 50 inside a plain at 0.
        let mesh = mesh_with(10, |x, y| if x.abs() < 0.2 && y.abs() < 0.2 { 50.0 } else { 0.0 });
        let mut hydro = Hydrology::new(mesh.vertex_count());
        settle(&mut hydro, &mesh, 10.0);
        for i in 0..mesh.vertex_count() as u32 {
            let v = VertexId(i);
            if mesh.height(v) >= 50.0 {
                assert_eq!(hydro.depth(v), 0.0);
            } else {
                assert!((hydro.depth(v) - 10.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn water_spreads_one_ring_per_pass() {
        let mesh = mesh_with(8, |_, _| 0.0);
        let mut hydro = Hydrology::new(mesh.vertex_count());
        assert!(hydro.flood(&mesh, 1.0, EPS));
        // First pass: only the boundary is wet.
        for i in 0..mesh.vertex_count() as u32 {
            let v = VertexId(i);
            assert_eq!(hydro.is_wet(v), mesh.is_boundary(v), "{v}");
        }
    }

    #[test]
    fn all_water_and_face_depth_tie_break() {
        let mesh = mesh_with(4, |_, _| 0.0);
        let mut hydro = Hydrology::new(mesh.vertex_count());
        let face = FaceId(10);
        assert!(!hydro.face_vertices_all_water(&mesh, face));
        assert_eq!(hydro.face_water_depth(&mesh, face), 0.0);

        settle(&mut hydro, &mesh, 3.0);
        assert!(hydro.face_vertices_all_water(&mesh, face));
        assert!((hydro.face_water_depth(&mesh, face) - 3.0).abs() < 1e-4);
    }

    #[test]
    fn partially_wet_face_uses_highest_surface_corner() {
        let mesh = mesh_with(4, |_, _| 0.0);
        let mut hydro = Hydrology::new(mesh.vertex_count());
        let face = FaceId(0);
        let [a, b, c] = mesh.face_vertices(face);
        hydro.depth[a.index()] = 0.5;
        hydro.depth[b.index()] = 2.0;
        hydro.depth[c.index()] = 0.0;
        assert!(!hydro.face_vertices_all_water(&mesh, face));
        assert_eq!(hydro.face_water_depth(&mesh, face), 2.0);
    }
}
