//! Frontier containers shared by the search algorithms.

pub mod priority_queue;
