//! Neon Diorama - night-time city viewed through an orbit camera.

use bevy::prelude::*;

use neon_diorama::{animation, audio, camera, city, render};

fn main() {
    // Force Vulkan backend on Windows (DX12 causes crashes on some systems)
    #[cfg(target_os = "windows")]
    std::env::set_var("WGPU_BACKEND", "vulkan");
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Neon Diorama".into(),
                resolution: (1280., 720.).into(),
                ..default()
            }),
            ..default()
        }))
        // City composition
        .add_plugins(city::CityPlugin)
        // Traffic lights, street lights and stars
        .add_plugins(animation::AnimationPlugin)
        // Meshes, materials and lights
        .add_plugins(render::RenderPlugin)
        .add_plugins(camera::CameraPlugin)
        // Ambient audio
        .add_plugins(audio::AudioPlugin)
        .run();
}
