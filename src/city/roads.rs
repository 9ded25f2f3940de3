//! Road layout: one oriented segment per road tile.
//!
//! Straight roads, crossings and T-junctions are flat quads; corners are
//! quarter annuli whose rotation is read off the neighbouring road tiles.
//! The builder is fully deterministic.

use bevy::prelude::*;
use std::f32::consts::{FRAC_PI_2, PI};

use crate::city::grid::{classify, neighbors, CityGrid, Neighbors, Side, TileCode};
use crate::city::CityConfig;

/// Length of a straight strip, longer than a tile so strips overlap at joins.
pub const STRIP_LENGTH: f32 = 60.0;
pub const STRIP_WIDTH: f32 = 20.0;
pub const SQUARE_SIDE: f32 = 20.0;
pub const ARC_INNER_RADIUS: f32 = 9.0;
pub const ARC_OUTER_RADIUS: f32 = 26.2;
/// Arc centre in the tile's local (x, z) frame before rotation. Unrotated,
/// the arc sweeps from the bottom edge round to the left edge.
pub const ARC_PIVOT: Vec2 = Vec2::new(-16.0, 16.0);

/// Discrete rotation about the vertical axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum QuarterTurn {
    #[default]
    Zero,
    Quarter,
    Half,
    ThreeQuarter,
}

impl QuarterTurn {
    pub fn radians(self) -> f32 {
        match self {
            QuarterTurn::Zero => 0.0,
            QuarterTurn::Quarter => FRAC_PI_2,
            QuarterTurn::Half => PI,
            // Same orientation as -90°.
            QuarterTurn::ThreeQuarter => -FRAC_PI_2,
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            QuarterTurn::Zero => 0,
            QuarterTurn::Quarter => 90,
            QuarterTurn::Half => 180,
            QuarterTurn::ThreeQuarter => 270,
        }
    }

    pub fn quat(self) -> Quat {
        Quat::from_rotation_y(self.radians())
    }
}

/// Geometry the renderer builds for a segment, in the tile's local frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RoadShape {
    /// Flat strip whose long side runs along local x.
    Strip { length: f32, width: f32 },
    /// Flat square.
    Square { side: f32 },
    /// Quarter annulus centred at `pivot`.
    Arc {
        inner_radius: f32,
        outer_radius: f32,
        pivot: Vec2,
    },
}

/// One piece of road geometry attached to a tile.
#[derive(Clone, Debug, PartialEq)]
pub struct RoadSegment {
    pub row: usize,
    pub col: usize,
    pub code: TileCode,
    pub shape: RoadShape,
    pub position: Vec3,
    pub rotation: QuarterTurn,
}

impl RoadSegment {
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).with_rotation(self.rotation.quat())
    }
}

/// Emit a segment for every road tile of `grid`, in row-major order.
pub fn build_road_layout(grid: &CityGrid, config: &CityConfig) -> Vec<RoadSegment> {
    let mut segments = Vec::new();

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let code = classify(grid, row, col);
            let Some((shape, rotation)) = segment_geometry(code, &neighbors(grid, row, col))
            else {
                continue;
            };

            let position = Vec3::new(
                col as f32 * config.tile_size,
                config.road_lift,
                row as f32 * config.tile_size,
            );
            segments.push(RoadSegment {
                row,
                col,
                code,
                shape,
                position,
                rotation,
            });
        }
    }

    debug!("Built {} road segments", segments.len());
    segments
}

fn segment_geometry(code: TileCode, around: &Neighbors) -> Option<(RoadShape, QuarterTurn)> {
    let strip = RoadShape::Strip {
        length: STRIP_LENGTH,
        width: STRIP_WIDTH,
    };
    let square = RoadShape::Square { side: SQUARE_SIDE };

    match code {
        TileCode::HorizontalRoad => Some((strip, QuarterTurn::Zero)),
        TileCode::VerticalRoad => Some((strip, QuarterTurn::Quarter)),
        TileCode::Intersection => Some((square, QuarterTurn::Zero)),
        TileCode::TJunction => Some((square, t_junction_rotation(around).unwrap_or_default())),
        TileCode::Corner => {
            let arc = RoadShape::Arc {
                inner_radius: ARC_INNER_RADIUS,
                outer_radius: ARC_OUTER_RADIUS,
                pivot: ARC_PIVOT,
            };
            Some((arc, corner_rotation(around).unwrap_or_default()))
        }
        _ => None,
    }
}

/// Rotation of a corner tile, from the first neighbour pattern that matches.
///
/// Returns `None` when no pattern applies; the corner then keeps its
/// unrotated default.
pub fn corner_rotation(around: &Neighbors) -> Option<QuarterTurn> {
    let vertical = |t: Option<TileCode>| t == Some(TileCode::VerticalRoad);
    let horizontal = |t: Option<TileCode>| t == Some(TileCode::HorizontalRoad);

    if vertical(around.bottom) && horizontal(around.right) {
        Some(QuarterTurn::Quarter)
    } else if horizontal(around.bottom) && vertical(around.left) {
        Some(QuarterTurn::Zero)
    } else if vertical(around.top) && horizontal(around.left) {
        Some(QuarterTurn::ThreeQuarter)
    } else if vertical(around.top) && horizontal(around.right) {
        Some(QuarterTurn::Half)
    } else {
        None
    }
}

/// Rotation of a T-junction so its stem points away from the single open side.
///
/// Returns `None` unless exactly one side lacks a road.
pub fn t_junction_rotation(around: &Neighbors) -> Option<QuarterTurn> {
    match around.open_sides().as_slice() {
        [Side::Bottom] => Some(QuarterTurn::Zero),
        [Side::Left] => Some(QuarterTurn::Quarter),
        [Side::Top] => Some(QuarterTurn::Half),
        [Side::Right] => Some(QuarterTurn::ThreeQuarter),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> CityGrid {
        CityGrid::parse(rows).expect("valid grid")
    }

    fn around(
        top: Option<TileCode>,
        right: Option<TileCode>,
        bottom: Option<TileCode>,
        left: Option<TileCode>,
    ) -> Neighbors {
        Neighbors {
            top,
            right,
            bottom,
            left,
        }
    }

    const H: Option<TileCode> = Some(TileCode::HorizontalRoad);
    const V: Option<TileCode> = Some(TileCode::VerticalRoad);

    #[test]
    fn corner_patterns_map_to_documented_rotations() {
        assert_eq!(corner_rotation(&around(None, H, V, None)), Some(QuarterTurn::Quarter));
        assert_eq!(corner_rotation(&around(None, None, H, V)), Some(QuarterTurn::Zero));
        assert_eq!(
            corner_rotation(&around(V, None, None, H)),
            Some(QuarterTurn::ThreeQuarter)
        );
        assert_eq!(corner_rotation(&around(V, H, None, None)), Some(QuarterTurn::Half));
    }

    #[test]
    fn corner_pattern_precedence_is_first_match() {
        // Matches both the first and the fourth pattern.
        assert_eq!(corner_rotation(&around(V, H, V, None)), Some(QuarterTurn::Quarter));
    }

    #[test]
    fn unmatched_corner_keeps_default_rotation() {
        assert_eq!(corner_rotation(&around(H, V, None, None)), None);

        let g = grid(&[&["C", "R"], &["R", "R"]]);
        let layout = build_road_layout(&g, &CityConfig::default());
        assert_eq!(layout.len(), 1);
        assert_eq!(layout[0].rotation, QuarterTurn::Zero);
        assert!(matches!(layout[0].shape, RoadShape::Arc { .. }));
    }

    #[test]
    fn corner_in_grid_reads_its_neighbours() {
        let g = grid(&[&["C", "H"], &["V", ""]]);
        let layout = build_road_layout(&g, &CityConfig::default());
        let corner = layout.iter().find(|s| s.code == TileCode::Corner).unwrap();
        assert_eq!(corner.rotation, QuarterTurn::Quarter);
    }

    #[test]
    fn t_junction_faces_away_from_open_side() {
        let road = Some(TileCode::Intersection);
        assert_eq!(
            t_junction_rotation(&around(road, road, None, road)),
            Some(QuarterTurn::Zero)
        );
        assert_eq!(
            t_junction_rotation(&around(road, road, road, None)),
            Some(QuarterTurn::Quarter)
        );
        assert_eq!(
            t_junction_rotation(&around(None, road, road, road)),
            Some(QuarterTurn::Half)
        );
        assert_eq!(
            t_junction_rotation(&around(road, Some(TileCode::Store), road, road)),
            Some(QuarterTurn::ThreeQuarter)
        );
        assert_eq!(t_junction_rotation(&around(road, None, None, road)), None);
    }

    #[test]
    fn straight_segments_are_oriented_by_axis() {
        let g = grid(&[&["H", "V"]]);
        let layout = build_road_layout(&g, &CityConfig::default());
        assert_eq!(layout[0].rotation, QuarterTurn::Zero);
        assert_eq!(layout[1].rotation, QuarterTurn::Quarter);
        assert_eq!(layout[0].shape, layout[1].shape);
        assert_eq!(layout[1].position, Vec3::new(40.0, 0.1, 0.0));
    }

    #[test]
    fn every_road_tile_gets_exactly_one_segment() {
        let g = grid(&[
            &["C", "H", "T", "H", "C"],
            &["V", "R", "V", "", "V"],
            &["C", "H", "I", "H", "C"],
        ]);
        let layout = build_road_layout(&g, &CityConfig::default());
        assert_eq!(layout.len(), g.count(TileCode::is_road));
        assert!(layout.iter().all(|s| s.code != TileCode::Empty));

        let mut tiles: Vec<_> = layout.iter().map(|s| (s.row, s.col)).collect();
        tiles.dedup();
        assert_eq!(tiles.len(), layout.len());
    }

    #[test]
    fn layout_is_deterministic() {
        let g = grid(&[&["C", "H", "C"], &["V", "S", "V"], &["C", "H", "C"]]);
        let config = CityConfig::default();
        assert_eq!(build_road_layout(&g, &config), build_road_layout(&g, &config));
    }

    #[test]
    fn three_quarter_turn_matches_negative_right_angle() {
        assert_eq!(QuarterTurn::ThreeQuarter.degrees(), 270);
        assert!((QuarterTurn::ThreeQuarter.radians() + FRAC_PI_2).abs() < f32::EPSILON);
    }
}
