//! Parked vehicle meshes: cars, trucks and bikes.
//!
//! A vehicle is a handful of boxes over cylinder wheels with small emissive
//! head and tail lights. Dimensions are in the vehicle's local frame with
//! the nose pointing along +x.

use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::FRAC_PI_2;

use crate::city::placement::{Prop, VehicleArchetype};
use crate::city::{CityConfig, CityScene, CitySet};
use crate::render::{cosmetic_rng, glow, hex};

pub struct VehicleMeshesPlugin;

impl Plugin for VehicleMeshesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<VehiclePalette>().add_systems(
            Startup,
            spawn_vehicles
                .after(CitySet::Compose)
                .run_if(resource_exists::<CityScene>),
        );
    }
}

#[derive(Component)]
pub struct Vehicle {
    pub archetype: VehicleArchetype,
}

#[derive(Resource)]
pub struct VehiclePalette {
    pub bodies: Vec<Color>,
    pub wheel: Color,
    pub head_light: Color,
    pub tail_light: Color,
}

impl Default for VehiclePalette {
    fn default() -> Self {
        Self {
            bodies: [0xe63946, 0x1d3557, 0x457b9d, 0xf4a261, 0x2a9d8f, 0x0000cc]
                .map(hex)
                .to_vec(),
            wheel: hex(0x111111),
            head_light: hex(0xffffcc),
            tail_light: hex(0xff0000),
        }
    }
}

/// What a box part is painted with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Finish {
    /// The vehicle's body colour.
    Body,
    /// A fixed trim colour.
    Trim(u32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxPart {
    pub size: Vec3,
    pub center: Vec3,
    pub finish: Finish,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VehicleBlueprint {
    pub parts: Vec<BoxPart>,
    /// Wheel hubs in local (x, z).
    pub wheels: Vec<Vec2>,
    pub head_lights: Vec<Vec3>,
    pub tail_lights: Vec<Vec3>,
    pub light_glow: f32,
}

const WHEEL_RADIUS: f32 = 0.8;
const WHEEL_WIDTH: f32 = 1.2;

pub fn vehicle_blueprint(archetype: VehicleArchetype) -> VehicleBlueprint {
    let part = |size: [f32; 3], center: [f32; 3], finish| BoxPart {
        size: Vec3::from(size),
        center: Vec3::from(center),
        finish,
    };

    match archetype {
        VehicleArchetype::Car => VehicleBlueprint {
            parts: vec![
                part([7.0, 2.5, 3.5], [0.0, 1.25, 0.0], Finish::Body),
                part([3.5, 1.6, 2.5], [0.0, 2.8, 0.0], Finish::Trim(0xaaaaaa)),
            ],
            wheels: vec![
                Vec2::new(-2.5, 1.4),
                Vec2::new(2.5, 1.4),
                Vec2::new(-2.5, -1.4),
                Vec2::new(2.5, -1.4),
            ],
            head_lights: vec![Vec3::new(3.4, 1.2, -1.2), Vec3::new(3.4, 1.2, 1.2)],
            tail_lights: vec![Vec3::new(-3.4, 1.2, -1.2), Vec3::new(-3.4, 1.2, 1.2)],
            light_glow: 2.5,
        },
        VehicleArchetype::Truck => VehicleBlueprint {
            parts: vec![
                part([10.0, 3.0, 4.0], [0.0, 1.5, 0.0], Finish::Body),
                part([3.5, 2.5, 4.2], [-3.0, 3.25, 0.0], Finish::Trim(0x888888)),
            ],
            wheels: vec![
                Vec2::new(-3.6, 2.0),
                Vec2::new(3.6, 2.0),
                Vec2::new(-3.6, -2.0),
                Vec2::new(3.6, -2.0),
            ],
            head_lights: vec![Vec3::new(5.0, 1.3, -1.3), Vec3::new(5.0, 1.3, 1.3)],
            tail_lights: vec![Vec3::new(-5.0, 1.3, -1.3), Vec3::new(-5.0, 1.3, 1.3)],
            light_glow: 3.0,
        },
        VehicleArchetype::Bike => VehicleBlueprint {
            parts: vec![
                part([5.0, 1.2, 1.5], [0.0, 0.6, 0.0], Finish::Body),
                part([2.0, 0.5, 1.5], [0.5, 1.2, 0.0], Finish::Trim(0x222222)),
            ],
            wheels: vec![Vec2::new(-2.0, 0.0), Vec2::new(2.0, 0.0)],
            head_lights: vec![Vec3::new(2.7, 1.0, 0.0)],
            tail_lights: vec![Vec3::new(-2.7, 1.0, 0.0)],
            light_glow: 1.2,
        },
    }
}

fn spawn_vehicles(
    mut commands: Commands,
    scene: Res<CityScene>,
    city: Res<CityConfig>,
    palette: Res<VehiclePalette>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut rng = cosmetic_rng(&city, 0xCA85);

    let unit_box = meshes.add(Cuboid::new(1.0, 1.0, 1.0));
    let wheel_mesh = meshes.add(Cylinder::new(WHEEL_RADIUS, WHEEL_WIDTH));
    let lamp_mesh = meshes.add(Cuboid::new(0.2, 0.2, 0.1));

    let wheel_material = materials.add(StandardMaterial {
        base_color: palette.wheel,
        perceptual_roughness: 0.9,
        ..default()
    });
    let head_material = materials.add(StandardMaterial {
        base_color: hex(0xccccaa),
        emissive: glow(palette.head_light, 2.0),
        ..default()
    });
    let tail_material = materials.add(StandardMaterial {
        base_color: hex(0x550000),
        emissive: glow(palette.tail_light, 2.0),
        ..default()
    });

    for placement in &scene.vehicles {
        let Prop::Vehicle(archetype) = placement.prop else {
            continue;
        };
        let plan = vehicle_blueprint(archetype);
        let body = palette
            .bodies
            .get(rng.gen_range(0..palette.bodies.len().max(1)))
            .copied()
            .unwrap_or(Color::WHITE);
        let body_material = materials.add(StandardMaterial {
            base_color: body,
            metallic: 0.4,
            perceptual_roughness: 0.4,
            ..default()
        });

        commands
            .spawn((placement.transform(), Visibility::default(), Vehicle { archetype }))
            .with_children(|parent| {
                for part in &plan.parts {
                    let material = match part.finish {
                        Finish::Body => body_material.clone(),
                        Finish::Trim(rgb) => materials.add(StandardMaterial {
                            base_color: hex(rgb),
                            ..default()
                        }),
                    };
                    parent.spawn((
                        Mesh3d(unit_box.clone()),
                        MeshMaterial3d(material),
                        Transform::from_translation(part.center).with_scale(part.size),
                    ));
                }

                for hub in &plan.wheels {
                    parent.spawn((
                        Mesh3d(wheel_mesh.clone()),
                        MeshMaterial3d(wheel_material.clone()),
                        Transform::from_xyz(hub.x, WHEEL_RADIUS * 0.75, hub.y)
                            .with_rotation(Quat::from_rotation_x(FRAC_PI_2)),
                    ));
                }

                for (spots, material) in [
                    (&plan.head_lights, &head_material),
                    (&plan.tail_lights, &tail_material),
                ] {
                    for spot in spots {
                        parent.spawn((
                            Mesh3d(lamp_mesh.clone()),
                            MeshMaterial3d(material.clone()),
                            Transform::from_translation(*spot),
                        ));
                    }
                }
            });
    }

    info!("Spawned {} vehicles", scene.vehicles.len());
}
