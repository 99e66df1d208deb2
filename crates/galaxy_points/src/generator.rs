use crate::{ColorGradient, GalaxyError, JitterScaling, ParameterSet};
use rand::prelude::*;
use rayon::prelude::*;
use std::f32::consts::TAU;

/// Counts at or above this fan out over the rayon pool in [`generate_galaxy`].
pub const PARALLEL_THRESHOLD: usize = 65_536;

const CHUNK_SIZE: usize = 4096;

/// Output of one generation pass. `positions[i]` and `colors[i]` describe the same particle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeneratedGalaxy {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
}

impl GeneratedGalaxy {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    /// Linear RGB.
    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    /// `3 * len()` floats, xyz interleaved.
    pub fn positions_flat(&self) -> &[f32] {
        self.positions.as_flattened()
    }

    /// `3 * len()` floats, rgb interleaved.
    pub fn colors_flat(&self) -> &[f32] {
        self.colors.as_flattened()
    }
}

/// Angle of the arm a particle belongs to. Arms are assigned by cycling the index,
/// so they stay evenly populated.
pub fn branch_angle(index: usize, branches: u32) -> f32 {
    let branches = branches.max(1);
    (index % branches as usize) as f32 / branches as f32 * TAU
}

/// Generates a galaxy from `params`, drawing every sample from `rng`.
pub fn generate<R: Rng>(
    params: &ParameterSet,
    rng: &mut R,
) -> Result<GeneratedGalaxy, GalaxyError> {
    params.validate()?;
    let (mut positions, mut colors) = allocate(params.count)?;
    let gradient = ColorGradient::new(params);

    for index in 0..params.count {
        let (position, color) = sample_particle(index, params, &gradient, rng);
        positions.push(position);
        colors.push(color);
    }

    Ok(GeneratedGalaxy { positions, colors })
}

/// Same distributions as [`generate`], sampled in parallel chunks with one thread RNG per chunk.
pub fn generate_par(params: &ParameterSet) -> Result<GeneratedGalaxy, GalaxyError> {
    params.validate()?;
    let (mut positions, mut colors) = allocate(params.count)?;
    positions.resize(params.count, [0.0; 3]);
    colors.resize(params.count, [0.0; 3]);
    let gradient = ColorGradient::new(params);

    positions
        .par_chunks_mut(CHUNK_SIZE)
        .zip(colors.par_chunks_mut(CHUNK_SIZE))
        .enumerate()
        .for_each(|(chunk_index, (positions, colors))| {
            let mut rng = rand::rng();
            let base = chunk_index * CHUNK_SIZE;
            for (offset, (position, color)) in positions.iter_mut().zip(colors).enumerate() {
                (*position, *color) = sample_particle(base + offset, params, &gradient, &mut rng);
            }
        });

    Ok(GeneratedGalaxy { positions, colors })
}

/// Generates with the thread RNG, going parallel for large counts.
pub fn generate_galaxy(params: &ParameterSet) -> Result<GeneratedGalaxy, GalaxyError> {
    if params.count >= PARALLEL_THRESHOLD {
        generate_par(params)
    } else {
        generate(params, &mut rand::rng())
    }
}

fn allocate(count: usize) -> Result<(Vec<[f32; 3]>, Vec<[f32; 3]>), GalaxyError> {
    let mut positions = Vec::new();
    let mut colors = Vec::new();
    positions
        .try_reserve_exact(count)
        .and_then(|_| colors.try_reserve_exact(count))
        .map_err(|_| GalaxyError::ResourceExhausted { count })?;
    Ok((positions, colors))
}

fn sample_particle<R: Rng>(
    index: usize,
    params: &ParameterSet,
    gradient: &ColorGradient,
    rng: &mut R,
) -> ([f32; 3], [f32; 3]) {
    let random_radius = rng.random::<f32>() * params.radius;
    let spin_angle = random_radius * params.spin;
    let angle = branch_angle(index, params.branches) + spin_angle;

    // draw order is x, y, z
    let jitter_x = jitter(params, rng);
    let jitter_y = jitter(params, rng);
    let jitter_z = jitter(params, rng);

    let position = [
        jitter_x + angle.cos() * random_radius,
        jitter_y,
        jitter_z + angle.sin() * random_radius,
    ];
    let color = gradient.sample(random_radius / params.radius);

    (position, color)
}

/// Power-law shrunk magnitude with a symmetric random sign.
fn jitter<R: Rng>(params: &ParameterSet, rng: &mut R) -> f32 {
    let magnitude = rng.random::<f32>().powf(params.randomness_power);
    let value = if rng.random_bool(0.5) {
        magnitude
    } else {
        -magnitude
    };

    match params.jitter_scaling {
        JitterScaling::Unscaled => value,
        JitterScaling::ByRandomness => value * params.randomness,
    }
}
