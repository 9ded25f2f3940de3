//! Buildings, flora and light fixtures scattered over the grid.
//!
//! Buildings sit exactly on their tiles. Empty lots roll for a tree or a
//! bush at a jittered spot inside the lot; intersections always get a traffic
//! light on one diagonal; vertical roads and intersections may get a street
//! light beside the road. Every light is registered for animation.

use bevy::prelude::*;
use rand::Rng;

use crate::animation::{FlickerRegistry, TrafficLightRegistry};
use crate::city::grid::{classify, CityGrid, TileCode, TilePos};
use crate::city::placement::{BuildingKind, Placement, Prop};
use crate::city::CityConfig;

/// Output of a scatter pass: the placements and the lights they registered.
#[derive(Debug, Default)]
pub struct Decorations {
    pub placements: Vec<Placement>,
    pub traffic_lights: TrafficLightRegistry,
    pub flicker_lights: FlickerRegistry,
}

/// Scatter buildings and decorations over every tile, in row-major order.
pub fn scatter_decorations(
    grid: &CityGrid,
    config: &CityConfig,
    rng: &mut impl Rng,
) -> Decorations {
    let mut out = Decorations::default();

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let tile = TilePos::new(row, col);
            let code = classify(grid, row, col);
            let origin = tile.world(config.tile_size);

            if let Some(kind) = BuildingKind::for_tile(code) {
                out.placements
                    .push(Placement::new(tile, Prop::Building(kind), origin));
            }

            if code == TileCode::Empty {
                if let Some(flora) = place_flora(tile, origin, config, rng) {
                    out.placements.push(flora);
                }
            }

            if code == TileCode::Intersection {
                out.placements
                    .push(place_traffic_light(tile, origin, config, rng, &mut out.traffic_lights));
            }

            if matches!(code, TileCode::VerticalRoad | TileCode::Intersection) {
                if let Some(lamp) =
                    place_street_light(tile, code, origin, config, rng, &mut out.flicker_lights)
                {
                    out.placements.push(lamp);
                }
            }
        }
    }

    debug!(
        "Scattered {} placements ({} traffic lights, {} street lights)",
        out.placements.len(),
        out.traffic_lights.len(),
        out.flicker_lights.len()
    );
    out
}

/// Jitter within a tile, keeping `margin` from every edge.
fn inset_offset(config: &CityConfig, rng: &mut impl Rng) -> f32 {
    let span = config.tile_size - 2.0 * config.flora_margin;
    rng.gen::<f32>() * span - (config.tile_size / 2.0 - config.flora_margin)
}

fn coin_flip(rng: &mut impl Rng) -> f32 {
    if rng.gen::<f32>() < 0.5 {
        1.0
    } else {
        -1.0
    }
}

fn place_flora(
    tile: TilePos,
    origin: Vec3,
    config: &CityConfig,
    rng: &mut impl Rng,
) -> Option<Placement> {
    let chance: f32 = rng.gen();
    let offset_x = inset_offset(config, rng);
    let offset_z = inset_offset(config, rng);
    let position = origin + Vec3::new(offset_x, 0.0, offset_z);

    if chance < config.tree_chance {
        let scale = rng.gen_range(config.tree_scale.0..config.tree_scale.1);
        Some(Placement::new(tile, Prop::Tree, position).with_scale(scale))
    } else if chance < config.bush_chance {
        Some(Placement::new(tile, Prop::Bush, position))
    } else {
        None
    }
}

fn place_traffic_light(
    tile: TilePos,
    origin: Vec3,
    config: &CityConfig,
    rng: &mut impl Rng,
    registry: &mut TrafficLightRegistry,
) -> Placement {
    let reach = (config.tile_size / 2.0 + config.traffic_light_offset) * coin_flip(rng);
    let signal = registry.register(tile);
    Placement::new(
        tile,
        Prop::TrafficLight { signal },
        origin + Vec3::new(reach, 0.0, reach),
    )
}

fn place_street_light(
    tile: TilePos,
    code: TileCode,
    origin: Vec3,
    config: &CityConfig,
    rng: &mut impl Rng,
    registry: &mut FlickerRegistry,
) -> Option<Placement> {
    if rng.gen::<f32>() >= config.street_light_chance {
        return None;
    }

    // Vertical roads run along z, so the lamp steps out along x; the
    // intersection lamp sits beside the crossing road instead.
    let reach = config.tile_size / 2.0 + config.street_light_offset;
    let side = match code {
        TileCode::VerticalRoad => Vec3::new(reach, 0.0, 0.0),
        _ => Vec3::new(0.0, 0.0, reach),
    };
    let sign = coin_flip(rng);

    let flicker = registry.register(tile, config.street_light_intensity);
    Some(Placement::new(
        tile,
        Prop::StreetLight { flicker },
        origin + side * sign,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::placement::PlacementCategory;
    use rand::{rngs::StdRng, SeedableRng};

    fn grid(rows: &[&[&str]]) -> CityGrid {
        CityGrid::parse(rows).expect("valid grid")
    }

    #[test]
    fn each_building_tile_gets_one_building_on_its_centre() {
        let g = grid(&[&["R", "L", "H"], &["S", "M", ""]]);
        let config = CityConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let out = scatter_decorations(&g, &config, &mut rng);

        let buildings: Vec<_> = out
            .placements
            .iter()
            .filter(|p| p.category() == PlacementCategory::Building)
            .collect();
        assert_eq!(buildings.len(), 4);
        for b in buildings {
            assert_eq!(b.position, b.tile.world(config.tile_size));
            let code = classify(&g, b.tile.row, b.tile.col);
            assert_eq!(b.prop, Prop::Building(BuildingKind::for_tile(code).unwrap()));
        }
    }

    #[test]
    fn flora_stays_inside_the_inset_margin() {
        let rows = vec![vec![""; 8]; 8];
        let g = CityGrid::parse(&rows).unwrap();
        let config = CityConfig::default();
        let limit = config.tile_size / 2.0 - config.flora_margin;

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let out = scatter_decorations(&g, &config, &mut rng);
            for p in &out.placements {
                assert_eq!(p.category(), PlacementCategory::Flora);
                let delta = p.position - p.tile.world(config.tile_size);
                assert!(delta.x.abs() <= limit && delta.z.abs() <= limit, "{delta:?}");
            }
            assert!(out.placements.len() <= 64);
        }
    }

    #[test]
    fn flora_mix_roughly_matches_chances() {
        let rows = vec![vec![""; 50]; 40];
        let g = CityGrid::parse(&rows).unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        let out = scatter_decorations(&g, &CityConfig::default(), &mut rng);

        let trees = out.placements.iter().filter(|p| p.prop == Prop::Tree).count() as f32;
        let bushes = out.placements.iter().filter(|p| p.prop == Prop::Bush).count() as f32;
        let total = g.len() as f32;
        assert!((trees / total - 0.7).abs() < 0.05);
        assert!((bushes / total - 0.2).abs() < 0.05);
    }

    #[test]
    fn every_intersection_gets_one_diagonal_traffic_light() {
        let g = grid(&[&["I", "H", "I"], &["V", "", "V"], &["I", "H", "I"]]);
        let config = CityConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let out = scatter_decorations(&g, &config, &mut rng);

        let lights: Vec<_> = out
            .placements
            .iter()
            .filter(|p| matches!(p.prop, Prop::TrafficLight { .. }))
            .collect();
        assert_eq!(lights.len(), 4);
        assert_eq!(out.traffic_lights.len(), 4);

        let reach = config.tile_size / 2.0 + config.traffic_light_offset;
        for light in lights {
            let delta = light.position - light.tile.world(config.tile_size);
            assert_eq!(delta.x, delta.z);
            assert_eq!(delta.x.abs(), reach);
            let Prop::TrafficLight { signal } = light.prop else {
                unreachable!()
            };
            assert_eq!(out.traffic_lights.get(signal).unwrap().tile, light.tile);
        }
    }

    #[test]
    fn street_lights_step_out_perpendicular_to_the_road() {
        let rows = vec![vec!["V"; 10], vec!["I"; 10], vec!["H"; 10]];
        let g = CityGrid::parse(&rows).unwrap();
        let config = CityConfig::default();
        let reach = config.tile_size / 2.0 + config.street_light_offset;
        let mut rng = StdRng::seed_from_u64(11);
        let out = scatter_decorations(&g, &config, &mut rng);

        let lamps: Vec<_> = out
            .placements
            .iter()
            .filter(|p| matches!(p.prop, Prop::StreetLight { .. }))
            .collect();
        assert_eq!(lamps.len(), out.flicker_lights.len());
        assert!(!lamps.is_empty());

        for lamp in lamps {
            let delta = lamp.position - lamp.tile.world(config.tile_size);
            match classify(&g, lamp.tile.row, lamp.tile.col) {
                TileCode::VerticalRoad => {
                    assert_eq!(delta.x.abs(), reach);
                    assert_eq!(delta.z, 0.0);
                }
                TileCode::Intersection => {
                    assert_eq!(delta.x, 0.0);
                    assert_eq!(delta.z.abs(), reach);
                }
                other => panic!("street light on {other:?}"),
            }
        }
    }

    #[test]
    fn street_light_rate_tracks_configured_chance() {
        let rows = vec![vec!["V"; 50]; 20];
        let g = CityGrid::parse(&rows).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let out = scatter_decorations(&g, &CityConfig::default(), &mut rng);
        let rate = out.flicker_lights.len() as f32 / g.len() as f32;
        assert!((rate - 0.6).abs() < 0.06, "rate {rate}");
        assert!(out
            .flicker_lights
            .iter()
            .all(|l| l.base_intensity == CityConfig::default().street_light_intensity));
    }

    #[test]
    fn same_seed_same_scatter() {
        let g = grid(&[&["", "I", "V"], &["R", "", "S"]]);
        let config = CityConfig::default();
        let a = scatter_decorations(&g, &config, &mut StdRng::seed_from_u64(42));
        let b = scatter_decorations(&g, &config, &mut StdRng::seed_from_u64(42));
        assert_eq!(a.placements, b.placements);
        assert_eq!(a.traffic_lights, b.traffic_lights);
    }
}
