//! Neon billboards on building lots.
//!
//! The board itself is a glowing frame on a post. Its message is a UI label
//! projected onto the frame each frame, hidden when the board is off screen.

use bevy::prelude::*;

use crate::city::placement::Prop;
use crate::city::{CityScene, CitySet};
use crate::render::{glow, hex};

pub struct BillboardsPlugin;

impl Plugin for BillboardsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BillboardConfig>()
            .add_systems(
                Startup,
                spawn_billboards
                    .after(CitySet::Compose)
                    .run_if(resource_exists::<CityScene>),
            )
            .add_systems(Update, project_billboard_labels);
    }
}

#[derive(Component)]
pub struct Billboard {
    pub message: &'static str,
}

/// Screen label tracking a billboard face at `anchor` (world space).
#[derive(Component)]
pub struct BillboardLabel {
    pub anchor: Vec3,
}

#[derive(Resource)]
pub struct BillboardConfig {
    pub frame_size: Vec3,
    pub frame_height: f32,
    pub neon: Color,
    pub neon_glow: f32,
    pub font_size: f32,
}

impl Default for BillboardConfig {
    fn default() -> Self {
        Self {
            frame_size: Vec3::new(18.0, 10.0, 1.0),
            frame_height: 20.0,
            neon: hex(0x00ffff),
            neon_glow: 0.6,
            font_size: 18.0,
        }
    }
}

fn spawn_billboards(
    mut commands: Commands,
    scene: Res<CityScene>,
    config: Res<BillboardConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let frame_mesh = meshes.add(Cuboid::from_size(config.frame_size));
    let post_mesh = meshes.add(Cylinder::new(0.5, config.frame_height));

    let frame_material = materials.add(StandardMaterial {
        base_color: Color::BLACK,
        emissive: glow(config.neon, config.neon_glow),
        metallic: 0.3,
        perceptual_roughness: 0.4,
        ..default()
    });
    let post_material = materials.add(StandardMaterial {
        base_color: hex(0x222222),
        ..default()
    });

    for placement in &scene.billboards {
        let Prop::Billboard { message } = placement.prop else {
            continue;
        };

        commands
            .spawn((placement.transform(), Visibility::default(), Billboard { message }))
            .with_children(|parent| {
                parent.spawn((
                    Mesh3d(frame_mesh.clone()),
                    MeshMaterial3d(frame_material.clone()),
                    Transform::from_xyz(0.0, config.frame_height, 0.0),
                ));
                parent.spawn((
                    Mesh3d(post_mesh.clone()),
                    MeshMaterial3d(post_material.clone()),
                    Transform::from_xyz(0.0, config.frame_height / 2.0, 0.0),
                ));
            });

        let anchor = placement.position
            + Vec3::new(0.0, config.frame_height, config.frame_size.z / 2.0 + 0.1);
        commands.spawn((
            Text::new(message),
            TextFont {
                font_size: config.font_size,
                ..default()
            },
            TextColor(config.neon),
            Node {
                position_type: PositionType::Absolute,
                ..default()
            },
            Visibility::Hidden,
            BillboardLabel { anchor },
        ));
    }

    info!("Spawned {} billboards", scene.billboards.len());
}

fn project_billboard_labels(
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut labels: Query<(&BillboardLabel, &mut Node, &mut Visibility, &ComputedNode)>,
) {
    let Ok((camera, camera_transform)) = cameras.get_single() else {
        return;
    };

    for (label, mut node, mut visibility, computed) in &mut labels {
        match camera.world_to_viewport(camera_transform, label.anchor) {
            Ok(screen) => {
                let half = computed.size() * computed.inverse_scale_factor() / 2.0;
                node.left = Val::Px(screen.x - half.x);
                node.top = Val::Px(screen.y - half.y);
                *visibility = Visibility::Inherited;
            }
            Err(_) => *visibility = Visibility::Hidden,
        }
    }
}
