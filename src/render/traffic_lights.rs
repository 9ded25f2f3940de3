//! Traffic light fixtures at intersections.
//!
//! Each fixture is a pole, a housing and three lamps. Lamp emissive follows
//! the [`TrafficLightRegistry`] entry the placement points at.

use bevy::prelude::*;

use crate::animation::{SignalColor, TrafficLightRegistry};
use crate::city::placement::Prop;
use crate::city::{CityScene, CitySet};
use crate::render::{glow, hex};

pub struct TrafficLightsPlugin;

impl Plugin for TrafficLightsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TrafficLightConfig>()
            .add_systems(
                Startup,
                spawn_traffic_lights
                    .after(CitySet::Compose)
                    .run_if(resource_exists::<CityScene>),
            )
            .add_systems(
                Update,
                sync_signal_lamps.run_if(resource_exists::<TrafficLightRegistry>),
            );
    }
}

/// Root of one traffic light fixture.
#[derive(Component)]
pub struct TrafficLight {
    pub signal: usize,
}

/// One indicator lamp; `signal` indexes the traffic-light registry.
#[derive(Component)]
pub struct SignalLamp {
    pub signal: usize,
    pub color: SignalColor,
}

#[derive(Resource)]
pub struct TrafficLightConfig {
    pub pole_height: f32,
    pub pole_radius: f32,
    pub box_size: Vec3,
    pub lamp_radius: f32,
    /// Vertical gap between lamp centres.
    pub lamp_spacing: f32,
}

impl Default for TrafficLightConfig {
    fn default() -> Self {
        Self {
            pole_height: 10.0,
            pole_radius: 0.2,
            box_size: Vec3::new(1.0, 3.0, 1.0),
            lamp_radius: 0.4,
            lamp_spacing: 1.0,
        }
    }
}

/// Base colour of each indicator.
pub fn signal_color(color: SignalColor) -> Color {
    match color {
        SignalColor::Red => hex(0xff0000),
        SignalColor::Yellow => hex(0xffff00),
        SignalColor::Green => hex(0x00ff00),
    }
}

fn spawn_traffic_lights(
    mut commands: Commands,
    scene: Res<CityScene>,
    config: Res<TrafficLightConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let pole_material = materials.add(StandardMaterial {
        base_color: hex(0x333333),
        perceptual_roughness: 0.5,
        metallic: 0.6,
        ..default()
    });
    let box_material = materials.add(StandardMaterial {
        base_color: hex(0x111111),
        perceptual_roughness: 0.7,
        ..default()
    });

    let pole_mesh = meshes.add(Cylinder::new(config.pole_radius, config.pole_height));
    let box_mesh = meshes.add(Cuboid::from_size(config.box_size));
    let lamp_mesh = meshes.add(Sphere::new(config.lamp_radius));

    let box_y = config.pole_height - config.box_size.y / 6.0;
    let lamp_z = config.box_size.z / 2.0;
    let mut count = 0;

    for placement in &scene.decorations {
        let Prop::TrafficLight { signal } = placement.prop else {
            continue;
        };

        commands
            .spawn((
                placement.transform(),
                Visibility::default(),
                TrafficLight { signal },
            ))
            .with_children(|parent| {
                parent.spawn((
                    Mesh3d(pole_mesh.clone()),
                    MeshMaterial3d(pole_material.clone()),
                    Transform::from_xyz(0.0, config.pole_height / 2.0, 0.0),
                ));
                parent.spawn((
                    Mesh3d(box_mesh.clone()),
                    MeshMaterial3d(box_material.clone()),
                    Transform::from_xyz(0.0, box_y, 0.0),
                ));

                // Red on top, green at the bottom.
                for (i, color) in SignalColor::ALL.into_iter().enumerate() {
                    let y = box_y + config.lamp_spacing * (1.0 - i as f32);
                    parent.spawn((
                        Mesh3d(lamp_mesh.clone()),
                        MeshMaterial3d(materials.add(StandardMaterial {
                            base_color: signal_color(color),
                            emissive: LinearRgba::BLACK,
                            ..default()
                        })),
                        Transform::from_xyz(0.0, y, lamp_z),
                        SignalLamp { signal, color },
                    ));
                }
            });
        count += 1;
    }

    info!("Spawned {} traffic lights", count);
}

/// Copy registry intensities onto lamp materials.
fn sync_signal_lamps(
    registry: Res<TrafficLightRegistry>,
    lamps: Query<(&SignalLamp, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !registry.is_changed() {
        return;
    }

    for (lamp, handle) in &lamps {
        let Some(entry) = registry.get(lamp.signal) else {
            continue;
        };
        if let Some(material) = materials.get_mut(&handle.0) {
            material.emissive = glow(signal_color(lamp.color), entry.intensity(lamp.color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::grid::TilePos;

    #[test]
    fn indicator_colours_are_distinct() {
        let colors: Vec<_> = SignalColor::ALL.into_iter().map(signal_color).collect();
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert_ne!(colors[0], colors[2]);
    }

    #[test]
    fn lamp_materials_follow_the_registry() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<Assets<StandardMaterial>>()
            .add_systems(Update, sync_signal_lamps);

        let mut registry = TrafficLightRegistry::default();
        let signal = registry.register(TilePos::new(0, 0));
        if let Some(entry) = registry.iter_mut().next() {
            entry.apply_phase(2);
        }
        app.insert_resource(registry);

        let mut handles = Vec::new();
        for color in SignalColor::ALL {
            let handle = app
                .world_mut()
                .resource_mut::<Assets<StandardMaterial>>()
                .add(StandardMaterial::default());
            app.world_mut()
                .spawn((SignalLamp { signal, color }, MeshMaterial3d(handle.clone())));
            handles.push((color, handle));
        }

        app.update();

        let materials = app.world().resource::<Assets<StandardMaterial>>();
        for (color, handle) in handles {
            let emissive = materials.get(&handle).unwrap().emissive;
            if color == SignalColor::Yellow {
                assert!(emissive.red > 0.0 && emissive.green > 0.0);
            } else {
                assert_eq!(emissive.red + emissive.green + emissive.blue, 0.0);
            }
        }
    }
}
