//! Night sky: black backdrop, moonlight, dim ambient and a twinkling
//! star field.

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use rand::Rng;

use crate::animation::AnimationClock;
use crate::city::CityConfig;
use crate::render::{cosmetic_rng, hex};

pub struct NightSkyPlugin;

impl Plugin for NightSkyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NightSkyConfig>()
            .insert_resource(ClearColor(Color::BLACK))
            .add_systems(Startup, (setup_lighting, spawn_star_field))
            .add_systems(Update, twinkle_stars.run_if(resource_exists::<AnimationClock>));
    }
}

#[derive(Resource)]
pub struct NightSkyConfig {
    pub star_count: usize,
    /// Horizontal extent of the star box, centred on the origin.
    pub spread: f32,
    /// Vertical extent of the star box.
    pub height: f32,
    /// Lift of the star box centre above the ground.
    pub lift: f32,
    /// Star size range `[min, max)`.
    pub star_size: (f32, f32),
    pub ambient: f32,
    pub moon_color: Color,
    pub moon_lux: f32,
    pub moon_from: Vec3,
}

impl Default for NightSkyConfig {
    fn default() -> Self {
        Self {
            star_count: 1500,
            spread: 10000.0,
            height: 6000.0,
            lift: 1000.0,
            star_size: (1.0, 3.0),
            ambient: 0.2,
            moon_color: hex(0xaaaaff),
            moon_lux: 600.0,
            moon_from: Vec3::new(100.0, 300.0, 100.0),
        }
    }
}

#[derive(Component)]
pub struct Moonlight;

/// A star; `size` is its base scale and also seeds its twinkle phase.
#[derive(Component)]
pub struct Star {
    pub size: f32,
}

/// Brightness in `[0, 1]` of a star of `size` at twinkle time `t`.
pub fn twinkle(t: f32, size: f32) -> f32 {
    (t * 5.0 + size * 10.0).sin() * 0.5 + 0.5
}

fn setup_lighting(mut commands: Commands, config: Res<NightSkyConfig>) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: config.ambient * 400.0,
    });

    commands.spawn((
        DirectionalLight {
            color: config.moon_color,
            illuminance: config.moon_lux,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(config.moon_from).looking_at(Vec3::ZERO, Vec3::Y),
        Moonlight,
    ));
}

fn spawn_star_field(
    mut commands: Commands,
    config: Res<NightSkyConfig>,
    city: Res<CityConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut rng = cosmetic_rng(&city, 0x57A2);
    let star_mesh = meshes.add(star_mesh());
    let star_material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        emissive: LinearRgba::new(3.0, 3.0, 3.0, 1.0),
        unlit: true,
        ..default()
    });

    let (min_size, max_size) = config.star_size;
    for _ in 0..config.star_count {
        let position = Vec3::new(
            (rng.gen::<f32>() - 0.5) * config.spread,
            (rng.gen::<f32>() - 0.5) * config.height + config.lift,
            (rng.gen::<f32>() - 0.5) * config.spread,
        );
        let size = rng.gen_range(min_size..max_size);

        commands.spawn((
            Mesh3d(star_mesh.clone()),
            MeshMaterial3d(star_material.clone()),
            Transform::from_translation(position).with_scale(Vec3::splat(size)),
            Star { size },
        ));
    }

    info!("Star field: {} stars", config.star_count);
}

fn twinkle_stars(clock: Res<AnimationClock>, mut stars: Query<(&Star, &mut Transform)>) {
    for (star, mut transform) in &mut stars {
        let level = twinkle(clock.star_time, star.size);
        transform.scale = Vec3::splat(star.size * (0.25 + 0.75 * level));
    }
}

/// Small octahedron.
fn star_mesh() -> Mesh {
    let vertices: Vec<[f32; 3]> = vec![
        [0.0, 1.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0],
        [-1.0, 0.0, 0.0],
        [0.0, 0.0, -1.0],
        [0.0, -1.0, 0.0],
    ];
    let indices = vec![
        0, 1, 2, 0, 2, 3, 0, 3, 4, 0, 4, 1, //
        5, 2, 1, 5, 3, 2, 5, 4, 3, 5, 1, 4,
    ];
    // Unit vertices double as normals.
    let normals = vertices.clone();

    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::RENDER_WORLD)
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, vertices)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_indices(Indices::U32(indices))
}
