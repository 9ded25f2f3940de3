//! Descriptors handed to the renderer.
//!
//! A descriptor carries everything needed to reproduce an object's
//! position and orientation; it has no behaviour of its own. Animated
//! lights point into the registries by index.

use bevy::prelude::*;

use crate::city::grid::{TileCode, TilePos};

/// Coarse grouping of descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlacementCategory {
    Ground,
    RoadSegment,
    Building,
    Flora,
    LightFixture,
    Vehicle,
    Billboard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuildingKind {
    House,
    Skyscraper,
    Store,
    MidRise,
}

impl BuildingKind {
    /// Building that stands on a tile, if the tile is a building lot.
    pub fn for_tile(code: TileCode) -> Option<Self> {
        match code {
            TileCode::Residential => Some(BuildingKind::House),
            TileCode::Skyscraper => Some(BuildingKind::Skyscraper),
            TileCode::Store => Some(BuildingKind::Store),
            TileCode::MidBuilding => Some(BuildingKind::MidRise),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VehicleArchetype {
    Car,
    Truck,
    Bike,
}

impl VehicleArchetype {
    /// Pick an archetype from a uniform sample in `[0, 1)`.
    pub fn from_sample(sample: f32) -> Self {
        if sample < 0.4 {
            VehicleArchetype::Car
        } else if sample < 0.7 {
            VehicleArchetype::Truck
        } else {
            VehicleArchetype::Bike
        }
    }
}

/// What a placement is, with its type-specific parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum Prop {
    Building(BuildingKind),
    Tree,
    Bush,
    /// Index into the flicker registry.
    StreetLight { flicker: usize },
    /// Index into the traffic-light registry.
    TrafficLight { signal: usize },
    Vehicle(VehicleArchetype),
    Billboard { message: &'static str },
}

impl Prop {
    pub fn category(&self) -> PlacementCategory {
        match self {
            Prop::Building(_) => PlacementCategory::Building,
            Prop::Tree | Prop::Bush => PlacementCategory::Flora,
            Prop::StreetLight { .. } | Prop::TrafficLight { .. } => PlacementCategory::LightFixture,
            Prop::Vehicle(_) => PlacementCategory::Vehicle,
            Prop::Billboard { .. } => PlacementCategory::Billboard,
        }
    }
}

/// A positioned, oriented object on a tile.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    pub tile: TilePos,
    pub prop: Prop,
    pub position: Vec3,
    /// Rotation about the vertical axis, radians.
    pub yaw: f32,
    pub scale: f32,
}

impl Placement {
    pub fn new(tile: TilePos, prop: Prop, position: Vec3) -> Self {
        Self {
            tile,
            prop,
            position,
            yaw: 0.0,
            scale: 1.0,
        }
    }

    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn category(&self) -> PlacementCategory {
        self.prop.category()
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position)
            .with_rotation(Quat::from_rotation_y(self.yaw))
            .with_scale(Vec3::splat(self.scale))
    }
}

/// Ground plane under the whole grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundPlane {
    pub center: Vec3,
    /// Extent along x (width) and z (depth).
    pub size: Vec2,
}

impl GroundPlane {
    pub fn category(&self) -> PlacementCategory {
        PlacementCategory::Ground
    }
}
