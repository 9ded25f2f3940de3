//! Procedural city composition.
//!
//! - Tile classification over a fixed layout grid
//! - Oriented road segments per road tile
//! - Randomised buildings, flora and light fixtures
//! - Occupancy-checked vehicle placement
//! - Billboards and the ground plane

use bevy::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

pub mod composer;
pub mod error;
pub mod grid;
pub mod layout;
pub mod placement;
pub mod roads;
pub mod scatter;
pub mod vehicles;

pub use composer::{compose_city, CityScene};
pub use error::CityError;
pub use grid::{CityGrid, TileCode, TilePos};
pub use layout::CityLayout;

pub struct CityPlugin;

impl Plugin for CityPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CityConfig>()
            .init_resource::<CityLayout>()
            .add_systems(Startup, compose_city_system.in_set(CitySet::Compose));
    }
}

/// Startup ordering: everything that reads [`CityScene`] runs after `Compose`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CitySet {
    Compose,
}

/// Tunables for city composition.
#[derive(Resource, Clone, Debug)]
pub struct CityConfig {
    /// World units per grid tile.
    pub tile_size: f32,
    /// Seed for all composition draws; `None` draws from entropy.
    pub seed: Option<u64>,
    pub vehicle_count: usize,
    pub billboard_count: usize,
    /// An empty lot gets a tree below this sample...
    pub tree_chance: f32,
    /// ...and a bush below this one.
    pub bush_chance: f32,
    /// Tree scale range (min, max).
    pub tree_scale: (f32, f32),
    /// Closest flora may get to a tile edge.
    pub flora_margin: f32,
    pub street_light_chance: f32,
    /// Street-light distance beyond the half tile.
    pub street_light_offset: f32,
    /// Point-light intensity registered for each street light.
    pub street_light_intensity: f32,
    /// Traffic-light distance beyond the half tile, along the diagonal.
    pub traffic_light_offset: f32,
    /// Billboard offset toward +z from its tile centre.
    pub billboard_setback: f32,
    /// Height of road segments above the ground plane.
    pub road_lift: f32,
    pub vehicle_scale: f32,
    /// Vehicle draws allowed per tile before sampling gives up.
    pub retry_factor: usize,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            tile_size: 40.0,
            seed: None,
            vehicle_count: 10,
            billboard_count: 3,
            tree_chance: 0.7,
            bush_chance: 0.9,
            tree_scale: (0.6, 1.8),
            flora_margin: 5.0,
            street_light_chance: 0.6,
            street_light_offset: 5.0,
            street_light_intensity: 6.5,
            traffic_light_offset: 3.0,
            billboard_setback: 15.0,
            road_lift: 0.1,
            vehicle_scale: 1.5,
            retry_factor: 10,
        }
    }
}

impl CityConfig {
    pub fn validate(&self) -> Result<(), CityError> {
        if !(self.tile_size > 0.0) {
            return Err(CityError::InvalidConfig(format!(
                "tile_size must be positive, got {}",
                self.tile_size
            )));
        }
        if !(0.0..self.tile_size / 2.0).contains(&self.flora_margin) {
            return Err(CityError::InvalidConfig(format!(
                "flora_margin {} must lie in [0, {})",
                self.flora_margin,
                self.tile_size / 2.0
            )));
        }
        for (name, p) in [
            ("tree_chance", self.tree_chance),
            ("bush_chance", self.bush_chance),
            ("street_light_chance", self.street_light_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(CityError::InvalidConfig(format!(
                    "{name} must be a probability, got {p}"
                )));
            }
        }
        if self.bush_chance < self.tree_chance {
            return Err(CityError::InvalidConfig(
                "bush_chance is cumulative and must not be below tree_chance".into(),
            ));
        }
        let (lo, hi) = self.tree_scale;
        if !(lo > 0.0 && lo < hi) {
            return Err(CityError::InvalidConfig(format!(
                "tree_scale range ({lo}, {hi}) is empty"
            )));
        }
        if self.retry_factor == 0 {
            return Err(CityError::InvalidConfig("retry_factor must be at least 1".into()));
        }
        Ok(())
    }

    /// Random source for one composition pass.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn compose_city_system(
    mut commands: Commands,
    layout: Res<CityLayout>,
    config: Res<CityConfig>,
    mut exit: EventWriter<AppExit>,
) {
    info!("Composing city...");

    let composed = CityGrid::parse(&layout.rows)
        .and_then(|grid| compose_city(&grid, &config, &mut config.rng()));

    match composed {
        Ok(mut scene) => {
            let (traffic, flicker) = scene.take_registries();
            commands.insert_resource(traffic);
            commands.insert_resource(flicker);
            commands.insert_resource(scene);
        }
        Err(err) => {
            error!("City composition failed: {err}");
            exit.send(AppExit::error());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{FlickerRegistry, TrafficLightRegistry};

    #[test]
    fn default_config_is_valid() {
        assert_eq!(CityConfig::default().validate(), Ok(()));
    }

    #[test]
    fn out_of_range_probability_is_rejected() {
        let config = CityConfig {
            street_light_chance: 1.5,
            ..default()
        };
        assert!(matches!(config.validate(), Err(CityError::InvalidConfig(_))));
    }

    #[test]
    fn seeded_config_gives_repeatable_rng() {
        use rand::Rng;
        let config = CityConfig {
            seed: Some(9),
            ..default()
        };
        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }

    #[test]
    fn startup_inserts_scene_and_registries() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(CityConfig {
                seed: Some(1),
                ..default()
            })
            .add_plugins(CityPlugin);
        app.update();

        let scene = app.world().resource::<CityScene>();
        assert!(!scene.roads.is_empty());
        assert!(scene.traffic_lights.is_empty());
        assert!(!app.world().resource::<TrafficLightRegistry>().is_empty());
        assert!(app.world().get_resource::<FlickerRegistry>().is_some());
    }

    #[test]
    fn bad_layout_requests_exit() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(CityLayout::from_codes(&[["H", "X"]]))
            .add_plugins(CityPlugin);
        app.update();

        assert!(app.world().get_resource::<CityScene>().is_none());
        let exits = app.world().resource::<Events<AppExit>>();
        assert!(!exits.is_empty());
    }
}
