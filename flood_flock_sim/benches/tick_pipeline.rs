// Benchmarks for the per-frame pipeline: one relaxation pass, one full
// buffer rebuild, and a batch of frames with a live flock.

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use flood_flock_sim::command::{SimAction, SimCommand};
use flood_flock_sim::config::GameConfig;
use flood_flock_sim::heightfield::HeightField;
use flood_flock_sim::hydrology::Hydrology;
use flood_flock_sim::mesh::TriMesh;
use flood_flock_sim::sim::SimState;
use flood_flock_sim::terrain::{IslandPalette, TerrainState};

fn bench_flood_pass(c: &mut Criterion) {
    let config = GameConfig::default();
    let field = HeightField::island(&config.terrain);
    let mesh = TriMesh::new(&config.mesh, |x, y| field.sample(x, y)).unwrap();
    c.bench_function("flood_pass_r64", |b| {
        b.iter_batched(
            || Hydrology::new(mesh.vertex_count()),
            |mut hydro| hydro.flood(&mesh, 0.0, 0.01),
            BatchSize::SmallInput,
        )
    });
}

fn bench_setup_vertices(c: &mut Criterion) {
    let config = GameConfig::default();
    let field = HeightField::island(&config.terrain);
    let mesh = TriMesh::new(&config.mesh, |x, y| field.sample(x, y)).unwrap();
    let hydro = Hydrology::new(mesh.vertex_count());
    let mut terrain = TerrainState::new(&mesh, &field, Box::new(IslandPalette::default()), 1.35);
    c.bench_function("setup_vertices_r64", |b| {
        b.iter(|| terrain.setup_vertices(&mesh, &hydro))
    });
}

fn bench_frames_with_flock(c: &mut Criterion) {
    let mut group = c.benchmark_group("frames");
    group.sample_size(20);
    group.bench_function("240_frames_r64", |b| {
        b.iter_batched(
            || {
                let mut sim = SimState::new("bench").unwrap();
                let face = sim.mesh().highest_face();
                sim.step(
                    &[SimCommand {
                        frame: 1,
                        action: SimAction::ClickFace { face },
                    }],
                    1,
                );
                sim
            },
            |mut sim| sim.step(&[], 241),
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_flood_pass,
    bench_setup_vertices,
    bench_frames_with_flock
);
criterion_main!(benches);
