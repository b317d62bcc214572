//! A pocket virtual pet: lifecycle simulation, evolution rules, a
//! higher-or-lower mini-game and the screen flow that ties them together.
//!
//! The library has no terminal dependencies. The `pocketpet` binary wires a
//! [`session::Session`] to crossterm input and rendering.

pub mod character;
pub mod clock;
pub mod config;
pub mod dice;
pub mod input;
pub mod menu;
pub mod minigame;
pub mod model;
pub mod session;
pub mod sim;
pub mod sound;
pub mod storage;
