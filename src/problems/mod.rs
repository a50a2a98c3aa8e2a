//! Implementation of search spaces and problems.
//!
//! These expose a generic search space so we can do pathfinding against a
//! generic graph-like API where from a given state we can find the states
//! one step away.

pub mod generators;
pub mod maze_2d;
