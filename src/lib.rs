//! Arena Core - simulation core for a wave-based arena shooter.
//!
//! Everything here is headless: rendering, input and audio live elsewhere and
//! consume the [`GameEvent`] stream returned by [`Simulation::tick`].

pub mod character;
pub mod combat;
pub mod config;
pub mod core;
pub mod economy;
pub mod items;
pub mod loot;
pub mod persistence;
pub mod waves;

pub use crate::core::{GameEvent, Simulation};
