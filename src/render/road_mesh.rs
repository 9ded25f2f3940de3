//! Ground plane and road segment meshes.
//!
//! Straight roads and squares are flat planes; corners are quarter annuli
//! built here. All road geometry shares one asphalt material.

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use std::f32::consts::FRAC_PI_2;

use crate::city::roads::RoadShape;
use crate::city::{CityScene, CitySet};
use crate::render::hex;

pub struct RoadMeshPlugin;

impl Plugin for RoadMeshPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RoadMeshConfig>().add_systems(
            Startup,
            spawn_ground_and_roads
                .after(CitySet::Compose)
                .run_if(resource_exists::<CityScene>),
        );
    }
}

/// Marker for the ground plane.
#[derive(Component)]
pub struct Ground;

/// Marker for road segment entities.
#[derive(Component)]
pub struct RoadTile {
    pub row: usize,
    pub col: usize,
}

/// Configuration for road and ground meshes.
#[derive(Resource)]
pub struct RoadMeshConfig {
    pub asphalt: Color,
    pub ground: Color,
    /// Subdivisions along a corner arc.
    pub arc_segments: u32,
}

impl Default for RoadMeshConfig {
    fn default() -> Self {
        Self {
            asphalt: hex(0x3b3b3b),
            ground: hex(0x88cc88),
            arc_segments: 32,
        }
    }
}

fn spawn_ground_and_roads(
    mut commands: Commands,
    scene: Res<CityScene>,
    config: Res<RoadMeshConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    info!("Spawning ground and {} road segments...", scene.roads.len());

    if let Some(ground) = scene.ground {
        commands.spawn((
            Mesh3d(meshes.add(Plane3d::default().mesh().size(ground.size.x, ground.size.y))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: config.ground,
                perceptual_roughness: 1.0,
                ..default()
            })),
            Transform::from_translation(ground.center),
            Ground,
        ));
    }

    let asphalt = materials.add(StandardMaterial {
        base_color: config.asphalt,
        perceptual_roughness: 0.9,
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    // Only a handful of distinct shapes exist, so share their meshes.
    let mut shape_meshes: Vec<(RoadShape, Handle<Mesh>)> = Vec::new();

    for segment in &scene.roads {
        let mesh = match shape_meshes.iter().find(|(shape, _)| *shape == segment.shape) {
            Some((_, handle)) => handle.clone(),
            None => {
                let handle = meshes.add(road_shape_mesh(&segment.shape, config.arc_segments));
                shape_meshes.push((segment.shape, handle.clone()));
                handle
            }
        };

        commands.spawn((
            Mesh3d(mesh),
            MeshMaterial3d(asphalt.clone()),
            segment.transform(),
            RoadTile {
                row: segment.row,
                col: segment.col,
            },
        ));
    }

    debug!("Road meshes use {} distinct shapes", shape_meshes.len());
}

/// Flat mesh for a road shape, facing +Y in the tile's local frame.
pub fn road_shape_mesh(shape: &RoadShape, arc_segments: u32) -> Mesh {
    match *shape {
        RoadShape::Strip { length, width } => Mesh::from(Plane3d::default().mesh().size(length, width)),
        RoadShape::Square { side } => Mesh::from(Plane3d::default().mesh().size(side, side)),
        RoadShape::Arc {
            inner_radius,
            outer_radius,
            pivot,
        } => quarter_annulus_mesh(inner_radius, outer_radius, pivot, arc_segments),
    }
}

/// Quarter annulus around `pivot` (local x, z), sweeping from +x toward -z.
pub fn quarter_annulus_mesh(inner: f32, outer: f32, pivot: Vec2, segments: u32) -> Mesh {
    let segments = segments.max(1);
    let ring = segments as usize + 1;

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(ring * 2);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(ring * 2);

    for i in 0..=segments {
        let t = i as f32 / segments as f32;
        let (sin, cos) = (t * FRAC_PI_2).sin_cos();
        for (radius, v) in [(inner, 0.0), (outer, 1.0)] {
            positions.push([pivot.x + radius * cos, 0.0, pivot.y - radius * sin]);
            uvs.push([t, v]);
        }
    }

    let mut indices: Vec<u32> = Vec::with_capacity(segments as usize * 6);
    for i in 0..segments {
        let inner_a = i * 2;
        let outer_a = inner_a + 1;
        let inner_b = inner_a + 2;
        let outer_b = inner_a + 3;
        indices.extend_from_slice(&[inner_a, outer_a, inner_b, inner_b, outer_a, outer_b]);
    }

    let normals = vec![[0.0, 1.0, 0.0]; positions.len()];

    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
        .with_inserted_indices(Indices::U32(indices))
}
