//! Vehicle placement on randomly sampled drivable tiles.
//!
//! Cells are drawn uniformly and rejected when they are not drivable or
//! already hold a vehicle. Demand that the grid cannot meet is refused up
//! front, and the draw loop is capped so it always terminates.

use bevy::prelude::*;
use rand::Rng;
use std::collections::HashSet;
use std::f32::consts::FRAC_PI_2;

use crate::city::error::CityError;
use crate::city::grid::{classify, CityGrid, TileCode, TilePos};
use crate::city::placement::{Placement, Prop, VehicleArchetype};
use crate::city::CityConfig;

/// Place `count` vehicles on distinct drivable tiles.
pub fn place_vehicles(
    grid: &CityGrid,
    count: usize,
    config: &CityConfig,
    rng: &mut impl Rng,
) -> Result<Vec<Placement>, CityError> {
    let eligible = grid.count(TileCode::is_drivable);
    if count > eligible {
        return Err(CityError::UnsatisfiableDemand {
            requested: count,
            eligible,
        });
    }

    let budget = (config.retry_factor * grid.len()).max(count);
    let mut occupied: HashSet<TilePos> = HashSet::with_capacity(count);
    let mut placed = Vec::with_capacity(count);
    let mut draws = 0;

    while placed.len() < count {
        if draws == budget {
            warn!(
                "Vehicle sampling gave up after {} draws ({} of {} placed)",
                draws,
                placed.len(),
                count
            );
            return Err(CityError::UnsatisfiableDemand {
                requested: count,
                eligible,
            });
        }
        draws += 1;

        let row = rng.gen_range(0..grid.rows());
        let col = rng.gen_range(0..grid.cols());
        let code = classify(grid, row, col);
        let tile = TilePos::new(row, col);
        if !code.is_drivable() || occupied.contains(&tile) {
            continue;
        }

        let archetype = VehicleArchetype::from_sample(rng.gen());
        let yaw = if code == TileCode::VerticalRoad {
            FRAC_PI_2
        } else {
            0.0
        };
        placed.push(
            Placement::new(tile, Prop::Vehicle(archetype), tile.world(config.tile_size))
                .with_yaw(yaw)
                .with_scale(config.vehicle_scale),
        );
        occupied.insert(tile);
    }

    debug!("Placed {} vehicles in {} draws", placed.len(), draws);
    Ok(placed)
}
