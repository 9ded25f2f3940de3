//! Neon Diorama - procedurally composed night-time city.
//!
//! A fixed tile layout is classified and decorated into road segments,
//! buildings, flora, lights, vehicles and billboards, then rendered as a
//! static diorama whose traffic lights and stars animate every frame.

pub mod animation;
pub mod audio;
pub mod camera;
pub mod city;
pub mod render;
