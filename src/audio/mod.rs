//! Looping ambient city track.
//!
//! Playback starts on request only: a "Start Ambient Sound" button in the
//! top-left corner (or the M key) spawns the looping player and hides the
//! button. A second press of M toggles pause.

use bevy::audio::{AudioSinkPlayback, Volume};
use bevy::prelude::*;

pub struct AudioPlugin;

impl Plugin for AudioPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AmbientAudioConfig>()
            .init_resource::<AmbientAudioState>()
            .add_systems(Startup, spawn_start_button)
            .add_systems(Update, (start_button_pressed, ambient_hotkey));
    }
}

/// Configuration for ambient audio.
#[derive(Resource)]
pub struct AmbientAudioConfig {
    /// Asset path of the looping track.
    pub track: String,
    /// Linear volume; above 1.0 amplifies.
    pub volume: f32,
    /// Whether the start button is shown at all.
    pub enabled: bool,
}

impl Default for AmbientAudioConfig {
    fn default() -> Self {
        Self {
            track: "sounds/city-night.ogg".into(),
            volume: 3.0,
            enabled: true,
        }
    }
}

/// Current state of ambient audio playback.
#[derive(Resource, Default)]
pub struct AmbientAudioState {
    pub player: Option<Entity>,
}

impl AmbientAudioState {
    pub fn is_started(&self) -> bool {
        self.player.is_some()
    }
}

#[derive(Component)]
pub struct StartAmbientButton;

#[derive(Component)]
pub struct AmbientTrack;

const BUTTON_IDLE: Color = Color::srgb(0.12, 0.12, 0.16);

fn spawn_start_button(mut commands: Commands, config: Res<AmbientAudioConfig>) {
    if !config.enabled {
        return;
    }

    commands
        .spawn((
            Button,
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(20.0),
                left: Val::Px(20.0),
                padding: UiRect::all(Val::Px(10.0)),
                ..default()
            },
            BackgroundColor(BUTTON_IDLE),
            GlobalZIndex(999),
            StartAmbientButton,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Start Ambient Sound"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

fn start_ambient(
    commands: &mut Commands,
    asset_server: &AssetServer,
    config: &AmbientAudioConfig,
    state: &mut AmbientAudioState,
) {
    if state.is_started() {
        return;
    }

    let player = commands
        .spawn((
            AudioPlayer::new(asset_server.load(config.track.clone())),
            PlaybackSettings::LOOP.with_volume(Volume::new(config.volume)),
            AmbientTrack,
        ))
        .id();
    state.player = Some(player);
    info!("Ambient track started: {}", config.track);
}

fn start_button_pressed(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<AmbientAudioConfig>,
    mut state: ResMut<AmbientAudioState>,
    mut buttons: Query<
        (&Interaction, &mut Visibility),
        (Changed<Interaction>, With<StartAmbientButton>),
    >,
) {
    for (interaction, mut visibility) in &mut buttons {
        if *interaction == Interaction::Pressed {
            start_ambient(&mut commands, &asset_server, &config, &mut state);
            *visibility = Visibility::Hidden;
        }
    }
}

fn ambient_hotkey(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    asset_server: Res<AssetServer>,
    config: Res<AmbientAudioConfig>,
    mut state: ResMut<AmbientAudioState>,
    sinks: Query<&AudioSink, With<AmbientTrack>>,
    mut buttons: Query<&mut Visibility, With<StartAmbientButton>>,
) {
    if !keys.just_pressed(KeyCode::KeyM) {
        return;
    }

    if !state.is_started() {
        start_ambient(&mut commands, &asset_server, &config, &mut state);
        for mut visibility in &mut buttons {
            *visibility = Visibility::Hidden;
        }
        return;
    }

    for sink in &sinks {
        sink.toggle();
        debug!("Ambient track {}", if sink.is_paused() { "paused" } else { "resumed" });
    }
}
