//! Rendering of a composed city.
//!
//! Each plugin turns one family of descriptors from [`CityScene`] into
//! meshes, materials and lights at startup, then keeps animated lights in
//! sync with the registries the clock drives.
//!
//! [`CityScene`]: crate::city::CityScene

use bevy::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

use crate::city::CityConfig;

pub mod billboards;
pub mod buildings;
pub mod night_sky;
pub mod road_mesh;
pub mod street_props;
pub mod traffic_lights;
pub mod vehicle_meshes;

pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(night_sky::NightSkyPlugin)
            .add_plugins(road_mesh::RoadMeshPlugin)
            .add_plugins(buildings::BuildingsPlugin)
            .add_plugins(street_props::StreetPropsPlugin)
            .add_plugins(traffic_lights::TrafficLightsPlugin)
            .add_plugins(vehicle_meshes::VehicleMeshesPlugin)
            .add_plugins(billboards::BillboardsPlugin);
    }
}

/// Random source for cosmetic choices (colours, dimensions).
///
/// Seeded from the city seed plus `salt` so cosmetic draws never shift the
/// composition sequence.
pub(crate) fn cosmetic_rng(config: &CityConfig, salt: u64) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed ^ salt),
        None => StdRng::from_entropy(),
    }
}

/// sRGB hex literal to a colour, e.g. `hex(0x3b3b3b)`.
pub(crate) fn hex(rgb: u32) -> Color {
    Color::srgb_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

/// Emissive of `color` scaled by `intensity`.
pub(crate) fn glow(color: Color, intensity: f32) -> LinearRgba {
    let linear = color.to_linear();
    LinearRgba::new(
        linear.red * intensity,
        linear.green * intensity,
        linear.blue * intensity,
        1.0,
    )
}
