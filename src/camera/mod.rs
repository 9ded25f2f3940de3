//! Perspective orbit camera with zoom, pan and rotate controls.
//!
//! The camera circles a target point on the ground. Left drag orbits,
//! right or middle drag pans, the wheel zooms. WASD/arrows pan and Q/E
//! rotate from the keyboard. HDR with bloom makes emissive lights glow.

use bevy::{
    core_pipeline::{
        bloom::{Bloom, BloomCompositeMode, BloomPrefilter},
        tonemapping::Tonemapping,
    },
    input::mouse::{MouseMotion, MouseWheel},
    prelude::*,
};

use crate::city::{CityScene, CitySet};

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraConfig>()
            .init_resource::<BloomConfig>()
            .add_systems(Startup, setup_camera.after(CitySet::Compose))
            .add_systems(
                Update,
                (camera_zoom, camera_drag, camera_keys, apply_orbit).chain(),
            );
    }
}

#[derive(Resource)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub far: f32,
    /// Initial camera offset from the target.
    pub start_offset: Vec3,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Keep the camera this far above the horizon.
    pub min_pitch: f32,
    pub max_pitch: f32,
    /// Radians per pixel of drag.
    pub orbit_sensitivity: f32,
    /// World units per second of keyboard pan at radius 100.
    pub pan_speed: f32,
    pub rotate_speed: f32,
    pub zoom_step: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 70.0,
            far: 12000.0,
            start_offset: Vec3::new(0.0, 300.0, 100.0),
            min_radius: 30.0,
            max_radius: 3000.0,
            min_pitch: 0.05,
            max_pitch: 1.55,
            orbit_sensitivity: 0.005,
            pan_speed: 120.0,
            rotate_speed: 1.0,
            zoom_step: 0.1,
        }
    }
}

/// Configuration for bloom effect.
#[derive(Resource)]
pub struct BloomConfig {
    pub enabled: bool,
    pub intensity: f32,
    /// Luminance above this glows.
    pub threshold: f32,
    pub threshold_softness: f32,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            intensity: 0.3,
            threshold: 0.8,
            threshold_softness: 0.3,
        }
    }
}

/// Orbit state: the camera sits `radius` from `target`, `yaw` around the
/// vertical axis and `pitch` above the horizon.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl OrbitCamera {
    /// Orbit that places the camera at `target + offset`.
    pub fn from_offset(target: Vec3, offset: Vec3) -> Self {
        let radius = offset.length().max(f32::EPSILON);
        Self {
            target,
            radius,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / radius).clamp(-1.0, 1.0).asin(),
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        self.target + self.radius * Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye()).looking_at(self.target, Vec3::Y)
    }

    /// Move the target in the ground plane, relative to the view direction.
    pub fn pan(&mut self, right: f32, forward: f32) {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let right_axis = Vec3::new(cos_yaw, 0.0, -sin_yaw);
        let forward_axis = Vec3::new(-sin_yaw, 0.0, -cos_yaw);
        self.target += right_axis * right + forward_axis * forward;
    }
}

fn setup_camera(
    mut commands: Commands,
    scene: Option<Res<CityScene>>,
    config: Res<CameraConfig>,
    bloom_config: Res<BloomConfig>,
) {
    let target = scene
        .as_ref()
        .and_then(|scene| scene.ground)
        .map_or(Vec3::ZERO, |ground| ground.center);
    let orbit = OrbitCamera::from_offset(target, config.start_offset);

    commands.spawn((
        Camera3d::default(),
        Camera {
            hdr: true,
            ..default()
        },
        Projection::Perspective(PerspectiveProjection {
            fov: config.fov_degrees.to_radians(),
            far: config.far,
            ..default()
        }),
        orbit.transform(),
        Bloom {
            intensity: if bloom_config.enabled {
                bloom_config.intensity
            } else {
                0.0
            },
            prefilter: BloomPrefilter {
                threshold: bloom_config.threshold,
                threshold_softness: bloom_config.threshold_softness,
            },
            composite_mode: BloomCompositeMode::Additive,
            ..default()
        },
        Tonemapping::TonyMcMapface,
        orbit,
    ));

    debug!("Camera orbiting {:?} at radius {:.0}", target, orbit.radius);
}

fn camera_zoom(
    config: Res<CameraConfig>,
    mut scroll_events: EventReader<MouseWheel>,
    mut query: Query<&mut OrbitCamera>,
) {
    let scroll: f32 = scroll_events.read().map(|e| e.y).sum();
    if scroll == 0.0 {
        return;
    }

    for mut orbit in &mut query {
        orbit.radius = (orbit.radius * (1.0 - scroll * config.zoom_step))
            .clamp(config.min_radius, config.max_radius);
    }
}

fn camera_drag(
    config: Res<CameraConfig>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut query: Query<&mut OrbitCamera>,
) {
    let delta: Vec2 = mouse_motion.read().map(|e| e.delta).sum();
    if delta == Vec2::ZERO {
        return;
    }

    let orbiting = mouse_buttons.pressed(MouseButton::Left);
    let panning =
        mouse_buttons.pressed(MouseButton::Right) || mouse_buttons.pressed(MouseButton::Middle);

    for mut orbit in &mut query {
        if orbiting {
            orbit.yaw -= delta.x * config.orbit_sensitivity;
            orbit.pitch = (orbit.pitch + delta.y * config.orbit_sensitivity)
                .clamp(config.min_pitch, config.max_pitch);
        } else if panning {
            // Grab and drag: the ground follows the cursor.
            let scale = orbit.radius * 0.002;
            orbit.pan(-delta.x * scale, delta.y * scale);
        }
    }
}

fn camera_keys(
    config: Res<CameraConfig>,
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut query: Query<&mut OrbitCamera>,
) {
    let mut pan = Vec2::ZERO;
    if keys.pressed(KeyCode::KeyW) || keys.pressed(KeyCode::ArrowUp) {
        pan.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) || keys.pressed(KeyCode::ArrowDown) {
        pan.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyA) || keys.pressed(KeyCode::ArrowLeft) {
        pan.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) || keys.pressed(KeyCode::ArrowRight) {
        pan.x += 1.0;
    }

    let mut spin = 0.0;
    if keys.pressed(KeyCode::KeyQ) {
        spin -= config.rotate_speed;
    }
    if keys.pressed(KeyCode::KeyE) {
        spin += config.rotate_speed;
    }

    if pan == Vec2::ZERO && spin == 0.0 {
        return;
    }

    let dt = time.delta_secs();
    for mut orbit in &mut query {
        let step = pan.normalize_or_zero() * config.pan_speed * dt * (orbit.radius / 100.0);
        orbit.pan(step.x, step.y);
        orbit.yaw += spin * dt;
    }
}

fn apply_orbit(mut query: Query<(&OrbitCamera, &mut Transform), Changed<OrbitCamera>>) {
    for (orbit, mut transform) in &mut query {
        *transform = orbit.transform();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_offset_reproduces_the_eye() {
        let target = Vec3::new(300.0, 0.0, 300.0);
        let offset = Vec3::new(0.0, 300.0, 100.0);
        let orbit = OrbitCamera::from_offset(target, offset);
        assert!(orbit.eye().distance(target + offset) < 1e-3);
    }

    #[test]
    fn transform_looks_at_the_target() {
        let orbit = OrbitCamera::from_offset(Vec3::new(10.0, 0.0, -5.0), Vec3::new(50.0, 80.0, 20.0));
        let transform = orbit.transform();
        let toward = (orbit.target - transform.translation).normalize();
        assert!(transform.forward().dot(toward) > 0.999);
    }

    #[test]
    fn pan_keeps_target_on_the_ground_plane() {
        let mut orbit = OrbitCamera::from_offset(Vec3::ZERO, Vec3::new(0.0, 100.0, 100.0));
        orbit.pan(10.0, 0.0);
        assert!((orbit.target - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-4);
        orbit.pan(0.0, 5.0);
        // Camera is on +z looking toward -z, so forward is -z.
        assert!((orbit.target - Vec3::new(10.0, 0.0, -5.0)).length() < 1e-4);
    }
}
