//! # Route Optimizer
//!
//! Orders the pickups and dropoffs of a trip to minimise approximate total
//! travel distance. Small-N travelling-salesman territory, solved
//! heuristically: nearest-neighbour construction with optional 2-opt
//! refinement, good enough for routing guidance.

mod optimize;
mod stop;

pub use crate::optimize::*;
pub use crate::stop::*;
