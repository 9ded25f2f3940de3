//! Scene composition: one pass over the grid producing every descriptor.

use bevy::prelude::*;
use rand::Rng;

use crate::animation::{FlickerRegistry, TrafficLightRegistry};
use crate::city::error::CityError;
use crate::city::grid::{classify, CityGrid, TilePos};
use crate::city::placement::{GroundPlane, Placement, PlacementCategory, Prop};
use crate::city::roads::{build_road_layout, RoadSegment};
use crate::city::scatter::{scatter_decorations, Decorations};
use crate::city::vehicles::place_vehicles;
use crate::city::CityConfig;

/// Slogans a billboard may show.
pub const BILLBOARD_MESSAGES: [&str; 8] = [
    "NIGHT SALE",
    "OPEN 24/7",
    "NEON ZONE",
    "CITY LIFE",
    "EAT HERE",
    "DRINKS",
    "SALE",
    "GLOW NOW",
];

/// Everything the renderer and the animation clock need for one city.
#[derive(Resource, Debug, Default)]
pub struct CityScene {
    pub ground: Option<GroundPlane>,
    pub roads: Vec<RoadSegment>,
    /// Buildings, flora and light fixtures.
    pub decorations: Vec<Placement>,
    pub vehicles: Vec<Placement>,
    pub billboards: Vec<Placement>,
    pub traffic_lights: TrafficLightRegistry,
    pub flicker_lights: FlickerRegistry,
}

impl CityScene {
    /// All tile-bound placements (decorations, vehicles, billboards).
    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.decorations
            .iter()
            .chain(&self.vehicles)
            .chain(&self.billboards)
    }

    /// Number of descriptors in `category`, ground and road segments included.
    pub fn count(&self, category: PlacementCategory) -> usize {
        match category {
            PlacementCategory::Ground => usize::from(self.ground.is_some()),
            PlacementCategory::RoadSegment => self.roads.len(),
            _ => self
                .placements()
                .filter(|p| p.category() == category)
                .count(),
        }
    }

    /// Move the registries out so they can be owned by the animation clock.
    pub fn take_registries(&mut self) -> (TrafficLightRegistry, FlickerRegistry) {
        (
            std::mem::take(&mut self.traffic_lights),
            std::mem::take(&mut self.flicker_lights),
        )
    }
}

/// Compose a full city from `grid`.
///
/// The configuration is checked before any random draw, so a bad config
/// never produces a partial scene.
pub fn compose_city(
    grid: &CityGrid,
    config: &CityConfig,
    rng: &mut impl Rng,
) -> Result<CityScene, CityError> {
    config.validate()?;

    let ground = ground_plane(grid, config.tile_size);
    let Decorations {
        placements: decorations,
        traffic_lights,
        flicker_lights,
    } = scatter_decorations(grid, config, rng);
    let vehicles = place_vehicles(grid, config.vehicle_count, config, rng)?;
    let roads = build_road_layout(grid, config);
    let billboards = place_billboards(grid, config, rng);

    let scene = CityScene {
        ground: Some(ground),
        roads,
        decorations,
        vehicles,
        billboards,
        traffic_lights,
        flicker_lights,
    };

    info!(
        "Composed {}x{} city: {} road segments, {} buildings, {} flora, {} lights, {} vehicles, {} billboards",
        grid.rows(),
        grid.cols(),
        scene.count(PlacementCategory::RoadSegment),
        scene.count(PlacementCategory::Building),
        scene.count(PlacementCategory::Flora),
        scene.count(PlacementCategory::LightFixture),
        scene.count(PlacementCategory::Vehicle),
        scene.count(PlacementCategory::Billboard),
    );
    Ok(scene)
}

/// Plane covering the grid, centred under its tiles.
pub fn ground_plane(grid: &CityGrid, tile_size: f32) -> GroundPlane {
    let size = grid.extent(tile_size);
    GroundPlane {
        center: Vec3::new(
            size.x / 2.0 - tile_size / 2.0,
            0.0,
            size.y / 2.0 - tile_size / 2.0,
        ),
        size,
    }
}

/// Draw `billboard_count` cells; each building cell drawn gets a billboard.
///
/// Draws are independent, so two billboards may share a cell. A draw that
/// lands on a road or an empty lot is dropped, not retried.
pub fn place_billboards(
    grid: &CityGrid,
    config: &CityConfig,
    rng: &mut impl Rng,
) -> Vec<Placement> {
    let mut billboards = Vec::with_capacity(config.billboard_count);

    for _ in 0..config.billboard_count {
        let col = rng.gen_range(0..grid.cols());
        let row = rng.gen_range(0..grid.rows());
        let code = classify(grid, row, col);
        if !code.is_building() {
            continue;
        }

        let message = BILLBOARD_MESSAGES[rng.gen_range(0..BILLBOARD_MESSAGES.len())];
        let tile = TilePos::new(row, col);
        let position = tile.world(config.tile_size) + Vec3::new(0.0, 0.0, config.billboard_setback);
        billboards.push(Placement::new(tile, Prop::Billboard { message }, position));
    }

    if billboards.len() < config.billboard_count {
        debug!(
            "{} of {} billboard draws landed off building lots",
            config.billboard_count - billboards.len(),
            config.billboard_count
        );
    }
    billboards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::grid::TileCode;
    use crate::city::layout::reference_layout;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    fn grid(rows: &[&[&str]]) -> CityGrid {
        CityGrid::parse(rows).expect("valid grid")
    }

    #[test]
    fn reference_city_composes_with_full_coverage() {
        let g = reference_layout();
        let config = CityConfig::default();
        let mut rng = StdRng::seed_from_u64(2024);
        let scene = compose_city(&g, &config, &mut rng).unwrap();

        assert_eq!(scene.count(PlacementCategory::Ground), 1);
        assert_eq!(
            scene.count(PlacementCategory::Building),
            g.count(TileCode::is_building)
        );
        assert_eq!(scene.roads.len(), g.count(TileCode::is_road));
        assert_eq!(scene.vehicles.len(), 10);
        assert!(scene.billboards.len() <= 3);
        assert_eq!(
            scene.traffic_lights.len(),
            g.count(|t| t == TileCode::Intersection)
        );

        let vehicle_tiles: HashSet<_> = scene.vehicles.iter().map(|v| v.tile).collect();
        assert_eq!(vehicle_tiles.len(), 10);
    }

    #[test]
    fn all_road_grid_scenario() {
        let g = grid(&[&["H", "I"], &["I", "V"]]);
        let config = CityConfig {
            vehicle_count: 3,
            ..default()
        };
        let mut rng = StdRng::seed_from_u64(6);
        let scene = compose_city(&g, &config, &mut rng).unwrap();

        assert_eq!(scene.roads.len(), 4);
        assert_eq!(scene.count(PlacementCategory::Building), 0);
        assert_eq!(scene.traffic_lights.len(), 2);
        assert_eq!(
            scene
                .decorations
                .iter()
                .filter(|p| matches!(p.prop, Prop::TrafficLight { .. }))
                .count(),
            2
        );
        assert!(scene.billboards.is_empty());
        assert!(scene.vehicles.iter().all(|v| v.tile != TilePos::new(0, 0)));

        let greedy = CityConfig {
            vehicle_count: 4,
            ..default()
        };
        let err = compose_city(&g, &greedy, &mut rng).unwrap_err();
        assert!(matches!(err, CityError::UnsatisfiableDemand { eligible: 3, .. }));
    }

    #[test]
    fn invalid_config_fails_before_composition() {
        let g = grid(&[&["R"]]);
        let config = CityConfig {
            tile_size: 0.0,
            ..default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let err = compose_city(&g, &config, &mut rng).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn ground_covers_the_grid() {
        let g = grid(&[&["", "", ""], &["", "", ""]]);
        let ground = ground_plane(&g, 40.0);
        assert_eq!(ground.size, Vec2::new(120.0, 80.0));
        assert_eq!(ground.center, Vec3::new(40.0, 0.0, 20.0));
    }

    #[test]
    fn billboards_only_land_on_building_lots() {
        let g = grid(&[&["S", "H", ""], &["L", "V", "I"]]);
        let config = CityConfig {
            billboard_count: 40,
            ..default()
        };
        let mut rng = StdRng::seed_from_u64(17);
        let billboards = place_billboards(&g, &config, &mut rng);
        assert!(!billboards.is_empty());
        for b in &billboards {
            assert!(classify(&g, b.tile.row, b.tile.col).is_building());
            assert_eq!(
                b.position,
                b.tile.world(config.tile_size) + Vec3::new(0.0, 0.0, config.billboard_setback)
            );
            let Prop::Billboard { message } = b.prop else {
                unreachable!()
            };
            assert!(BILLBOARD_MESSAGES.contains(&message));
        }
    }

    #[test]
    fn seeded_composition_is_reproducible() {
        let g = reference_layout();
        let config = CityConfig::default();
        let a = compose_city(&g, &config, &mut StdRng::seed_from_u64(5)).unwrap();
        let b = compose_city(&g, &config, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a.decorations, b.decorations);
        assert_eq!(a.vehicles, b.vehicles);
        assert_eq!(a.billboards, b.billboards);
        assert_eq!(a.roads, b.roads);
    }

    #[test]
    fn registries_move_out_of_the_scene() {
        let g = grid(&[&["I", "V"]]);
        let config = CityConfig {
            vehicle_count: 1,
            ..default()
        };
        let mut scene = compose_city(&g, &config, &mut StdRng::seed_from_u64(3)).unwrap();
        let (traffic, _flicker) = scene.take_registries();
        assert_eq!(traffic.len(), 1);
        assert!(scene.traffic_lights.is_empty());
    }
}
