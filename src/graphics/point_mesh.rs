use galaxy_points::{GalaxyError, GeneratedGalaxy};
use bevy::{
    prelude::*,
    render::{
        mesh::{Indices, PrimitiveTopology},
        render_asset::RenderAssetUsages,
    },
};
use std::collections::TryReserveError;

/// Billboard corners, expanded around each particle in the vertex shader.
const QUAD_CORNERS: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Number of mesh vertices for `count` particles, or `ResourceExhausted` if the
/// `u32` index buffer cannot address them.
pub fn quad_vertex_count(count: usize) -> Result<u32, GalaxyError> {
    count
        .checked_mul(QUAD_CORNERS.len())
        .and_then(|n| u32::try_from(n).ok())
        .ok_or(GalaxyError::ResourceExhausted { count })
}

/// Builds the point cloud mesh: one camera-facing quad per particle.
///
/// Every quad vertex carries the particle center as `POSITION`, its corner
/// as `UV_0` and the particle color as `COLOR`.
pub fn build_point_cloud_mesh(galaxy: &GeneratedGalaxy) -> Result<Mesh, GalaxyError> {
    let count = galaxy.len();
    let vertex_count = quad_vertex_count(count)? as usize;
    let index_count = count * QUAD_INDICES.len();
    let exhausted = move |_: TryReserveError| GalaxyError::ResourceExhausted { count };

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut corners: Vec<[f32; 2]> = Vec::new();
    let mut colors: Vec<[f32; 4]> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();
    positions.try_reserve_exact(vertex_count).map_err(exhausted)?;
    corners.try_reserve_exact(vertex_count).map_err(exhausted)?;
    colors.try_reserve_exact(vertex_count).map_err(exhausted)?;
    indices.try_reserve_exact(index_count).map_err(exhausted)?;

    for (position, [r, g, b]) in galaxy.positions().iter().zip(galaxy.colors()) {
        let base = positions.len() as u32;
        for corner in QUAD_CORNERS {
            positions.push(*position);
            corners.push(corner);
            colors.push([*r, *g, *b, 1.0]);
        }
        indices.extend(QUAD_INDICES.iter().map(|i| base + i));
    }

    Ok(
        Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::RENDER_WORLD)
            .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
            .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, corners)
            .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
            .with_inserted_indices(Indices::U32(indices)),
    )
}
