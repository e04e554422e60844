//! Grid maze pathfinding: five search strategies over 4-connected mazes, a
//! step-by-step runner for visualizing them, and a harness that compares them.

pub mod algorithms;
pub mod batch_simulation;
pub mod config;
pub mod generator;
pub mod grid;
pub mod runner;
pub mod simulation;
pub mod statistics;
