//! Per-frame animation clock.
//!
//! Drives the traffic-light registry through a fixed six second cycle
//! (red, yellow, green, two seconds each, all lights in step), advances the
//! starfield twinkle time and applies the street-light flicker hook.

use bevy::prelude::*;

pub mod registry;

pub use registry::{
    FlickerEntry, FlickerRegistry, SignalColor, TrafficLightEntry, TrafficLightRegistry,
    ACTIVE_SIGNAL_INTENSITY,
};

/// Length of one full traffic-light cycle in seconds.
pub const SIGNAL_PERIOD: f64 = 6.0;

pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AnimationClock>().add_systems(
            Update,
            advance_clock.run_if(
                resource_exists::<TrafficLightRegistry>.and(resource_exists::<FlickerRegistry>),
            ),
        );
    }
}

/// How street lights behave between frames.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum FlickerMode {
    /// Lights hold their base intensity.
    #[default]
    Steady,
    /// Lights dip by up to `depth` (fraction of base) at `speed` radians per second.
    Pulse { depth: f32, speed: f32 },
}

#[derive(Resource, Debug, Clone)]
pub struct AnimationClock {
    /// Accumulated twinkle time fed to the starfield.
    pub star_time: f32,
    /// Twinkle time added per tick.
    pub star_step: f32,
    /// Traffic-light cycle second of the last tick.
    pub cycle: u8,
    pub flicker: FlickerMode,
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self {
            star_time: 0.0,
            star_step: 0.01,
            cycle: 0,
            flicker: FlickerMode::Steady,
        }
    }
}

/// Whole seconds into the current traffic-light cycle.
pub fn signal_cycle(elapsed_seconds: f64) -> u8 {
    (elapsed_seconds.rem_euclid(SIGNAL_PERIOD).floor() as u8).min(5)
}

impl AnimationClock {
    /// Advance one frame at `elapsed_seconds` since start.
    pub fn tick(
        &mut self,
        elapsed_seconds: f64,
        traffic: &mut TrafficLightRegistry,
        flicker: &mut FlickerRegistry,
    ) {
        self.cycle = signal_cycle(elapsed_seconds);
        for light in traffic.iter_mut() {
            light.apply_phase(self.cycle);
        }

        self.star_time += self.star_step;
        self.drive_flicker(elapsed_seconds as f32, flicker);
    }

    fn drive_flicker(&self, elapsed: f32, flicker: &mut FlickerRegistry) {
        match self.flicker {
            FlickerMode::Steady => {
                for light in flicker.iter_mut() {
                    light.intensity = light.base_intensity;
                }
            }
            FlickerMode::Pulse { depth, speed } => {
                let depth = depth.clamp(0.0, 1.0);
                for light in flicker.iter_mut() {
                    let wave = (elapsed * speed + light.phase_offset).sin() * 0.5 + 0.5;
                    light.intensity = light.base_intensity * (1.0 - depth * wave);
                }
            }
        }
    }
}

fn advance_clock(
    time: Res<Time>,
    mut clock: ResMut<AnimationClock>,
    mut traffic: ResMut<TrafficLightRegistry>,
    mut flicker: ResMut<FlickerRegistry>,
) {
    let previous = clock.cycle;
    clock.tick(time.elapsed_secs_f64(), &mut traffic, &mut flicker);
    if clock.cycle != previous {
        trace!("Traffic cycle {} ({:?})", clock.cycle, SignalColor::for_cycle(clock.cycle));
    }
}
