//! Building meshes for building placements.
//!
//! Each lot gets a blueprint (footprint, height, facing, palette) drawn from
//! a cosmetic random source, then a body mesh with lit windows. Houses add a
//! pyramid roof; stores add a glowing sign band.

use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::city::placement::{BuildingKind, Prop};
use crate::city::{CityConfig, CityScene, CitySet};
use crate::render::{cosmetic_rng, glow, hex};

pub struct BuildingsPlugin;

impl Plugin for BuildingsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BuildingStyle>().add_systems(
            Startup,
            spawn_buildings
                .after(CitySet::Compose)
                .run_if(resource_exists::<CityScene>),
        );
    }
}

#[derive(Component)]
pub struct Building {
    pub kind: BuildingKind,
    pub height: f32,
}

/// Palettes and window glow per building kind.
#[derive(Resource)]
pub struct BuildingStyle {
    pub house_walls: Vec<Color>,
    pub house_roofs: Vec<Color>,
    pub tower_facades: Vec<Color>,
    pub store_fronts: Vec<Color>,
    pub midrise_facades: Vec<Color>,
    pub warm_window: Color,
    pub cool_window: Color,
}

impl Default for BuildingStyle {
    fn default() -> Self {
        Self {
            house_walls: [0xffcc99, 0xf4e2d8, 0xc1d3c3, 0xfceabb, 0xfcd5ce]
                .map(hex)
                .to_vec(),
            house_roofs: [0xcc6666, 0x8b0000, 0x6b4c3b, 0xaa4a44, 0x7f5539]
                .map(hex)
                .to_vec(),
            tower_facades: [
                0x8a8a8a, 0x999999, 0x555555, 0x666666, 0x444444, 0xb0b0b0, 0x4a90e2, 0x3e7bb6,
                0x2c4e80, 0x5d87a1, 0x7fa6c7, 0x406080,
            ]
            .map(hex)
            .to_vec(),
            store_fronts: [0xd2691e, 0x33cc33, 0x0099cc, 0x663399, 0xffcc66]
                .map(hex)
                .to_vec(),
            midrise_facades: [0x999999, 0x444444, 0x666699, 0x777777, 0x556677]
                .map(hex)
                .to_vec(),
            warm_window: hex(0xf7e99b),
            cool_window: hex(0x9999ff),
        }
    }
}

/// Dimensions and look of one building, in its local frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Blueprint {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    /// Extra quarter turns applied on top of the placement.
    pub facing: f32,
    pub facade: usize,
    pub roof: Option<usize>,
    /// Window rows up each face.
    pub window_rows: u32,
    pub window_glow: f32,
}

/// Draw a blueprint for `kind`; palette indices are taken modulo `palette_len`.
pub fn draw_blueprint(kind: BuildingKind, palette_len: usize, rng: &mut impl Rng) -> Blueprint {
    let palette_len = palette_len.max(1);

    match kind {
        BuildingKind::House => {
            let width = rng.gen_range(20..=30) as f32;
            let height = rng.gen_range(15..=20) as f32;
            let depth = rng.gen_range(20..=30) as f32;
            Blueprint {
                width,
                height,
                depth,
                facing: quarter_turn(rng),
                facade: rng.gen_range(0..palette_len),
                roof: Some(rng.gen_range(0..palette_len)),
                window_rows: 1,
                window_glow: 1.5,
            }
        }
        BuildingKind::Skyscraper => {
            let height = rng.gen_range(80..140) as f32;
            Blueprint {
                width: 20.0,
                height,
                depth: 20.0,
                facing: 0.0,
                facade: rng.gen_range(0..palette_len),
                roof: None,
                window_rows: (height / 12.0).floor() as u32,
                window_glow: 1.8,
            }
        }
        BuildingKind::Store => Blueprint {
            width: rng.gen_range(24.0..32.0),
            height: 14.0,
            depth: rng.gen_range(20.0..26.0),
            facing: quarter_turn(rng),
            facade: rng.gen_range(0..palette_len),
            roof: None,
            window_rows: 1,
            window_glow: 1.2,
        },
        BuildingKind::MidRise => {
            let width = rng.gen_range(16.0..22.0);
            let height: f32 = rng.gen_range(30.0..50.0);
            Blueprint {
                width,
                height,
                depth: rng.gen_range(16.0..22.0),
                facing: 0.0,
                facade: rng.gen_range(0..palette_len),
                roof: None,
                window_rows: (height / 6.0).floor() as u32,
                window_glow: 0.4,
            }
        }
    }
}

fn quarter_turn(rng: &mut impl Rng) -> f32 {
    FRAC_PI_2 * rng.gen_range(0..4) as f32
}

const WINDOW_COLUMNS: u32 = 4;

fn spawn_buildings(
    mut commands: Commands,
    scene: Res<CityScene>,
    city: Res<CityConfig>,
    style: Res<BuildingStyle>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut rng = cosmetic_rng(&city, 0xB1D5);
    let window_mesh = meshes.add(Cuboid::new(2.0, 2.5, 0.2));
    let sign_mesh = meshes.add(Cuboid::new(1.0, 2.0, 0.3));
    let mut count = 0;

    for placement in &scene.decorations {
        let Prop::Building(kind) = placement.prop else {
            continue;
        };

        let palette = match kind {
            BuildingKind::House => &style.house_walls,
            BuildingKind::Skyscraper => &style.tower_facades,
            BuildingKind::Store => &style.store_fronts,
            BuildingKind::MidRise => &style.midrise_facades,
        };
        let plan = draw_blueprint(kind, palette.len(), &mut rng);
        let facade = palette[plan.facade % palette.len()];
        let window_color = match kind {
            BuildingKind::MidRise => style.cool_window,
            _ => style.warm_window,
        };

        let body_material = materials.add(StandardMaterial {
            base_color: facade,
            emissive: glow(facade, 0.06),
            perceptual_roughness: 0.6,
            metallic: if kind == BuildingKind::Skyscraper { 0.3 } else { 0.1 },
            ..default()
        });
        let window_material = materials.add(StandardMaterial {
            base_color: hex(0x333333),
            emissive: glow(window_color, plan.window_glow),
            ..default()
        });

        let root = placement
            .transform()
            .with_rotation(Quat::from_rotation_y(placement.yaw + plan.facing));

        commands
            .spawn((
                root,
                Visibility::default(),
                Building {
                    kind,
                    height: plan.height,
                },
            ))
            .with_children(|parent| {
                parent.spawn((
                    Mesh3d(meshes.add(Cuboid::new(plan.width, plan.height, plan.depth))),
                    MeshMaterial3d(body_material),
                    Transform::from_xyz(0.0, plan.height / 2.0, 0.0),
                ));

                for transform in window_layout(&plan) {
                    parent.spawn((
                        Mesh3d(window_mesh.clone()),
                        MeshMaterial3d(window_material.clone()),
                        transform,
                    ));
                }

                if let Some(roof) = plan.roof {
                    let roof_color = style.house_roofs[roof % style.house_roofs.len().max(1)];
                    parent.spawn((
                        Mesh3d(meshes.add(
                            Cone {
                                radius: plan.width.max(plan.depth) * 0.6,
                                height: 4.0,
                            }
                            .mesh()
                            .resolution(4),
                        )),
                        MeshMaterial3d(materials.add(StandardMaterial {
                            base_color: roof_color,
                            ..default()
                        })),
                        Transform::from_xyz(0.0, plan.height + 2.0, 0.0)
                            .with_rotation(Quat::from_rotation_y(FRAC_PI_4)),
                    ));
                }

                if kind == BuildingKind::Store {
                    parent.spawn((
                        Mesh3d(sign_mesh.clone()),
                        MeshMaterial3d(materials.add(StandardMaterial {
                            base_color: Color::WHITE,
                            emissive: glow(facade, 1.5),
                            ..default()
                        })),
                        Transform::from_xyz(0.0, plan.height + 1.0, plan.depth / 2.0)
                            .with_scale(Vec3::new(plan.width * 0.8, 1.0, 1.0)),
                    ));
                }
            });
        count += 1;
    }

    info!("Spawned {} buildings", count);
}

/// Window panes on all four faces, evenly spaced in rows and columns.
pub fn window_layout(plan: &Blueprint) -> Vec<Transform> {
    let rows = plan.window_rows.max(1);
    let spacing_y = plan.height / (rows + 1) as f32;
    let spacing_x = plan.width / (WINDOW_COLUMNS + 1) as f32;
    let spacing_z = plan.depth / (WINDOW_COLUMNS + 1) as f32;
    let (half_w, half_d) = (plan.width / 2.0 + 0.1, plan.depth / 2.0 + 0.1);

    let mut panes = Vec::with_capacity((rows * WINDOW_COLUMNS * 4) as usize);
    for i in 1..=rows {
        let y = i as f32 * spacing_y;
        for j in 1..=WINDOW_COLUMNS {
            let x = -plan.width / 2.0 + j as f32 * spacing_x;
            let z = -plan.depth / 2.0 + j as f32 * spacing_z;
            panes.push(Transform::from_xyz(x, y, half_d));
            panes.push(Transform::from_xyz(x, y, -half_d));
            panes.push(
                Transform::from_xyz(half_w, y, z).with_rotation(Quat::from_rotation_y(FRAC_PI_2)),
            );
            panes.push(
                Transform::from_xyz(-half_w, y, z).with_rotation(Quat::from_rotation_y(FRAC_PI_2)),
            );
        }
    }
    panes
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn blueprints_stay_in_their_kind_ranges() {
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..200 {
            let house = draw_blueprint(BuildingKind::House, 5, &mut rng);
            assert!((20.0..=30.0).contains(&house.width));
            assert!((15.0..=20.0).contains(&house.height));
            assert!(house.roof.is_some());

            let tower = draw_blueprint(BuildingKind::Skyscraper, 12, &mut rng);
            assert!((80.0..140.0).contains(&tower.height));
            assert_eq!(tower.window_rows, (tower.height / 12.0).floor() as u32);

            let store = draw_blueprint(BuildingKind::Store, 5, &mut rng);
            assert_eq!(store.height, 14.0);
            assert!(store.facade < 5);

            let mid = draw_blueprint(BuildingKind::MidRise, 5, &mut rng);
            assert!((30.0..50.0).contains(&mid.height));
        }
    }

    #[test]
    fn windows_cover_four_faces() {
        let plan = Blueprint {
            width: 20.0,
            height: 36.0,
            depth: 20.0,
            facing: 0.0,
            facade: 0,
            roof: None,
            window_rows: 3,
            window_glow: 1.0,
        };
        let panes = window_layout(&plan);
        assert_eq!(panes.len(), 3 * 4 * 4);
        assert!(panes
            .iter()
            .all(|t| t.translation.y > 0.0 && t.translation.y < plan.height));
        assert!(panes.iter().any(|t| t.translation.z > plan.depth / 2.0));
        assert!(panes.iter().any(|t| t.translation.x < -plan.width / 2.0));
    }
}
