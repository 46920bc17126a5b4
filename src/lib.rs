//! Stochastic agent-based SEIR epidemic on a 2D grid.
//!
//! An [`engine::Engine`] owns a [`grid::Grid`] of agents and advances it one
//! day per step: every agent first freezes its state, infectious agents then
//! propose infections to randomly sampled contacts, and finally every agent
//! commits its pending state and advances its own state machine.

pub mod analysis;
pub mod config;
pub mod engine;
pub mod grid;
pub mod manager;
pub mod model;
pub mod params;
pub mod random;
pub mod sampler;
pub mod scheduler;
pub mod stats;
pub mod utils;
