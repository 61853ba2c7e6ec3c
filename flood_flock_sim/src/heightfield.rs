// Procedural height and grass fertility fields.
//
// `HeightField` turns normalized mesh coordinates (roughly [-0.5, 0.5] on
// both axes, origin at the island centre) into terrain height and grass
// fertility. Heights are a caller-supplied base shape plus `octaves` layers of
// Perlin noise (fBm: frequency `scale * lacunarity^i`, amplitude
// `persistence^i`), divided by the largest amplitude the sum can reach and
// multiplied by `height_stretch`. The default base shape is a radial falloff,
// which gives the island its silhouette.
//
// Fertility samples a second, independently seeded noise at its own
// frequency and offset, maps it into [0, 1], thins it toward the centre where
// the flock usually starts, and boosts values above the midpoint so grassy
// patches read clearly.
//
// Both fields are pure functions of `(TerrainParams, x, y)`. Noise
// permutation tables are seeded from the text seed through `GameRng`, so the
// same seed always rebuilds the same island.
//
// See also: `mesh.rs` which samples `sample()` once per vertex,
// `terrain.rs` which samples `fertility()` once per face centre.

use crate::config::TerrainParams;
use crate::prng::GameRng;
use noise::{NoiseFn, Perlin};

/// PRNG stream reserved for terrain noise seeds.
const TERRAIN_STREAM: u64 = 0;

/// Distance from the centre at which fertility stops being thinned.
const FERTILITY_CLEAR_RADIUS: f32 = 0.35;

/// Fraction of fertility kept at the exact centre.
const FERTILITY_CENTRE_FLOOR: f32 = 0.3;

/// Slope applied to fertility above the 0.5 midpoint.
const FERTILITY_BOOST: f32 = 1.6;

/// Base shape of the heightfield, evaluated before noise is added. Expected
/// to return values in [-1, 1].
pub type BaseShape = Box<dyn Fn(f32, f32) -> f32 + Send + Sync>;

/// Radial island falloff: 1 at the centre, -1 from a radius of 0.5 outward.
pub fn radial_falloff(x: f32, y: f32) -> f32 {
    let r = (x * x + y * y).sqrt();
    (1.0 - 4.0 * r).max(-1.0)
}

/// Seeded height and fertility sampler.
pub struct HeightField {
    params: TerrainParams,
    terrain_noise: Perlin,
    fertility_noise: Perlin,
    base_shape: BaseShape,
    /// Base shape weight plus the sum of all octave weights.
    max_amplitude: f32,
}

impl HeightField {
    /// Build a sampler with the given base shape.
    pub fn new<F>(params: &TerrainParams, base_shape: F) -> Self
    where
        F: Fn(f32, f32) -> f32 + Send + Sync + 'static,
    {
        let mut rng = GameRng::from_seed_str(&params.seed, TERRAIN_STREAM);
        let terrain_noise = Perlin::new(rng.next_u32());
        let fertility_noise = Perlin::new(rng.next_u32());

        let octave_weight: f32 = (0..params.octaves)
            .map(|i| params.persistence.powi(i as i32))
            .sum();

        Self {
            params: params.clone(),
            terrain_noise,
            fertility_noise,
            base_shape: Box::new(base_shape),
            max_amplitude: 1.0 + octave_weight,
        }
    }

    /// Build a sampler with the default radial island shape.
    pub fn island(params: &TerrainParams) -> Self {
        Self::new(params, radial_falloff)
    }

    /// Terrain height at normalized coordinates `(x, y)`.
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let p = &self.params;
        let mut total = (self.base_shape)(x, y);
        let mut frequency = p.scale;
        let mut amplitude = 1.0;
        for _ in 0..p.octaves {
            let n = self
                .terrain_noise
                .get([(x * frequency) as f64, (y * frequency) as f64]) as f32;
            total += n * amplitude;
            frequency *= p.lacunarity;
            amplitude *= p.persistence;
        }
        total / self.max_amplitude * p.height_stretch
    }

    /// Grass growth amount in [0, 1] at normalized coordinates `(x, y)`.
    pub fn fertility(&self, x: f32, y: f32) -> f32 {
        let p = &self.params;
        let fx = x * p.fertility_scale + p.fertility_offset;
        let fy = y * p.fertility_scale + p.fertility_offset;
        let n = self.fertility_noise.get([fx as f64, fy as f64]) as f32;
        let base = ((n + 1.0) * 0.5).clamp(0.0, 1.0);

        let r = (x * x + y * y).sqrt();
        let openness = (r / FERTILITY_CLEAR_RADIUS).min(1.0);
        let mut grass = base * (FERTILITY_CENTRE_FLOOR + (1.0 - FERTILITY_CENTRE_FLOOR) * openness);

        if grass > 0.5 {
            grass = 0.5 + (grass - 0.5) * FERTILITY_BOOST;
        }
        grass.clamp(0.0, 1.0)
    }
}

impl std::fmt::Debug for HeightField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeightField")
            .field("params", &self.params)
            .field("max_amplitude", &self.max_amplitude)
            .finish_non_exhaustive()
    }
}
