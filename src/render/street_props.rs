//! Trees, bushes and street lights.

use bevy::prelude::*;

use crate::animation::FlickerRegistry;
use crate::city::placement::Prop;
use crate::city::{CityScene, CitySet};
use crate::render::{glow, hex};

pub struct StreetPropsPlugin;

impl Plugin for StreetPropsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StreetPropsConfig>()
            .add_systems(
                Startup,
                spawn_street_props
                    .after(CitySet::Compose)
                    .run_if(resource_exists::<CityScene>),
            )
            .add_systems(
                Update,
                sync_street_lamps.run_if(resource_exists::<FlickerRegistry>),
            );
    }
}

#[derive(Component)]
pub struct Tree;

#[derive(Component)]
pub struct Bush;

/// Point light of a street light; `flicker` indexes the flicker registry.
#[derive(Component)]
pub struct StreetLamp {
    pub flicker: usize,
}

#[derive(Resource)]
pub struct StreetPropsConfig {
    pub trunk: Color,
    pub leaves: Color,
    pub bush: Color,
    pub pole: Color,
    pub bulb: Color,
    pub lamp_light: Color,
    pub pole_height: f32,
    pub lamp_range: f32,
    /// Lumens per unit of registry intensity.
    pub lumens_per_unit: f32,
}

impl Default for StreetPropsConfig {
    fn default() -> Self {
        Self {
            trunk: hex(0x8b5a2b),
            leaves: hex(0x228b22),
            bush: hex(0x2e8b57),
            pole: hex(0x555555),
            bulb: hex(0xffffaa),
            lamp_light: hex(0xffffcc),
            pole_height: 12.0,
            lamp_range: 150.0,
            lumens_per_unit: 4000.0,
        }
    }
}

impl StreetPropsConfig {
    pub fn lamp_lumens(&self, intensity: f32) -> f32 {
        intensity.max(0.0) * self.lumens_per_unit
    }
}

fn spawn_street_props(
    mut commands: Commands,
    scene: Res<CityScene>,
    flicker: Option<Res<FlickerRegistry>>,
    config: Res<StreetPropsConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let trunk_mesh = meshes.add(Cylinder::new(2.0, 10.0));
    let leaves_mesh = meshes.add(Cone {
        radius: 6.0,
        height: 12.0,
    });
    let bush_mesh = meshes.add(Sphere::new(4.0));
    let pole_mesh = meshes.add(Cylinder::new(0.3, config.pole_height));
    let bulb_mesh = meshes.add(Sphere::new(1.4));

    let trunk_material = materials.add(StandardMaterial {
        base_color: config.trunk,
        perceptual_roughness: 0.9,
        ..default()
    });
    let leaves_material = materials.add(StandardMaterial {
        base_color: config.leaves,
        perceptual_roughness: 0.8,
        ..default()
    });
    let bush_material = materials.add(StandardMaterial {
        base_color: config.bush,
        perceptual_roughness: 0.8,
        ..default()
    });
    let pole_material = materials.add(StandardMaterial {
        base_color: config.pole,
        metallic: 0.6,
        ..default()
    });
    let bulb_material = materials.add(StandardMaterial {
        base_color: config.bulb,
        emissive: glow(config.bulb, 3.0),
        ..default()
    });

    let (mut trees, mut bushes, mut lamps) = (0, 0, 0);

    for placement in &scene.decorations {
        match placement.prop {
            Prop::Tree => {
                commands
                    .spawn((placement.transform(), Visibility::default(), Tree))
                    .with_children(|parent| {
                        parent.spawn((
                            Mesh3d(trunk_mesh.clone()),
                            MeshMaterial3d(trunk_material.clone()),
                            Transform::from_xyz(0.0, 5.0, 0.0),
                        ));
                        parent.spawn((
                            Mesh3d(leaves_mesh.clone()),
                            MeshMaterial3d(leaves_material.clone()),
                            Transform::from_xyz(0.0, 16.0, 0.0),
                        ));
                    });
                trees += 1;
            }
            Prop::Bush => {
                commands.spawn((
                    Mesh3d(bush_mesh.clone()),
                    MeshMaterial3d(bush_material.clone()),
                    placement.transform().with_translation(placement.position + Vec3::Y * 4.0),
                    Bush,
                ));
                bushes += 1;
            }
            Prop::StreetLight { flicker: index } => {
                let intensity = flicker
                    .as_ref()
                    .and_then(|registry| registry.get(index))
                    .map_or(0.0, |entry| entry.intensity);

                commands
                    .spawn((placement.transform(), Visibility::default()))
                    .with_children(|parent| {
                        parent.spawn((
                            Mesh3d(pole_mesh.clone()),
                            MeshMaterial3d(pole_material.clone()),
                            Transform::from_xyz(0.0, config.pole_height / 2.0, 0.0),
                        ));
                        parent.spawn((
                            Mesh3d(bulb_mesh.clone()),
                            MeshMaterial3d(bulb_material.clone()),
                            Transform::from_xyz(0.0, config.pole_height + 1.0, 0.0),
                        ));
                        parent.spawn((
                            PointLight {
                                color: config.lamp_light,
                                intensity: config.lamp_lumens(intensity),
                                range: config.lamp_range,
                                shadows_enabled: false,
                                ..default()
                            },
                            Transform::from_xyz(0.0, config.pole_height + 1.0, 0.0),
                            StreetLamp { flicker: index },
                        ));
                    });
                lamps += 1;
            }
            _ => {}
        }
    }

    info!(
        "Spawned {} trees, {} bushes, {} street lights",
        trees, bushes, lamps
    );
}

fn sync_street_lamps(
    registry: Res<FlickerRegistry>,
    config: Res<StreetPropsConfig>,
    mut lamps: Query<(&StreetLamp, &mut PointLight)>,
) {
    if !registry.is_changed() {
        return;
    }

    for (lamp, mut light) in &mut lamps {
        if let Some(entry) = registry.get(lamp.flicker) {
            light.intensity = config.lamp_lumens(entry.intensity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::grid::TilePos;

    #[test]
    fn lamp_lumens_never_go_negative() {
        let config = StreetPropsConfig::default();
        assert_eq!(config.lamp_lumens(-1.0), 0.0);
        assert_eq!(config.lamp_lumens(6.5), 6.5 * config.lumens_per_unit);
    }

    #[test]
    fn point_lights_track_flicker_intensity() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<StreetPropsConfig>()
            .add_systems(Update, sync_street_lamps);

        let mut registry = FlickerRegistry::default();
        let index = registry.register(TilePos::new(2, 3), 6.5);
        if let Some(entry) = registry.iter_mut().next() {
            entry.intensity = 3.0;
        }
        app.insert_resource(registry);

        let lamp = app
            .world_mut()
            .spawn((StreetLamp { flicker: index }, PointLight::default()))
            .id();
        app.update();

        let config = StreetPropsConfig::default();
        let light = app.world().get::<PointLight>(lamp).unwrap();
        assert_eq!(light.intensity, config.lamp_lumens(3.0));
    }
}
