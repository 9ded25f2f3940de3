//! Registries of light sinks created during composition and driven each frame.
//!
//! Entries are only ever appended; placements refer to them by index.

use bevy::prelude::*;

use crate::city::grid::TilePos;

/// Emissive intensity of a lit traffic-light indicator.
pub const ACTIVE_SIGNAL_INTENSITY: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignalColor {
    Red,
    Yellow,
    Green,
}

impl SignalColor {
    pub const ALL: [SignalColor; 3] = [SignalColor::Red, SignalColor::Yellow, SignalColor::Green];

    /// Indicator lit during a cycle second (`0..6`).
    pub fn for_cycle(cycle: u8) -> Self {
        match cycle {
            0 | 1 => SignalColor::Red,
            2 | 3 => SignalColor::Yellow,
            _ => SignalColor::Green,
        }
    }
}

/// Three indicator intensities of one traffic light plus its phase.
#[derive(Clone, Debug, PartialEq)]
pub struct TrafficLightEntry {
    pub tile: TilePos,
    pub red: f32,
    pub yellow: f32,
    pub green: f32,
    pub phase: u8,
}

impl TrafficLightEntry {
    pub fn new(tile: TilePos) -> Self {
        Self {
            tile,
            red: 0.0,
            yellow: 0.0,
            green: 0.0,
            phase: 0,
        }
    }

    pub fn intensity(&self, color: SignalColor) -> f32 {
        match color {
            SignalColor::Red => self.red,
            SignalColor::Yellow => self.yellow,
            SignalColor::Green => self.green,
        }
    }

    /// The lit indicator, if any.
    pub fn active(&self) -> Option<SignalColor> {
        SignalColor::ALL
            .into_iter()
            .find(|color| self.intensity(*color) > 0.0)
    }

    pub(crate) fn apply_phase(&mut self, cycle: u8) {
        let lit = SignalColor::for_cycle(cycle);
        let level = |color: SignalColor| {
            if lit == color {
                ACTIVE_SIGNAL_INTENSITY
            } else {
                0.0
            }
        };
        self.phase = cycle;
        self.red = level(SignalColor::Red);
        self.yellow = level(SignalColor::Yellow);
        self.green = level(SignalColor::Green);
    }
}

/// Every traffic light in the scene, one per intersection tile.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct TrafficLightRegistry {
    entries: Vec<TrafficLightEntry>,
}

impl TrafficLightRegistry {
    /// Add a light and return its index.
    pub fn register(&mut self, tile: TilePos) -> usize {
        self.entries.push(TrafficLightEntry::new(tile));
        self.entries.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&TrafficLightEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrafficLightEntry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut TrafficLightEntry> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A street-light point light whose intensity the clock may modulate.
#[derive(Clone, Debug, PartialEq)]
pub struct FlickerEntry {
    pub tile: TilePos,
    pub base_intensity: f32,
    pub intensity: f32,
    /// Per-light offset so pulsing lights drift out of step.
    pub phase_offset: f32,
}

#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct FlickerRegistry {
    entries: Vec<FlickerEntry>,
}

impl FlickerRegistry {
    /// Add a light at full base intensity and return its index.
    pub fn register(&mut self, tile: TilePos, base_intensity: f32) -> usize {
        let index = self.entries.len();
        self.entries.push(FlickerEntry {
            tile,
            base_intensity,
            intensity: base_intensity,
            phase_offset: index as f32 * 1.7,
        });
        index
    }

    pub fn get(&self, index: usize) -> Option<&FlickerEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlickerEntry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut FlickerEntry> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
