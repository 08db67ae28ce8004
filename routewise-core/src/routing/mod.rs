//! Route search over the street graph
//!
//! A* with a great-circle heuristic is the main entry point; a plain
//! Dijkstra over the same edge weights is kept for reachability queries and
//! for cross-checking A* results.

mod astar;
mod dijkstra;
mod observer;
mod state;
mod variant;

pub use astar::{RouteResult, search, search_with_observer};
pub use dijkstra::dijkstra_path_weights;
pub use observer::{LoggingObserver, NoopObserver, SearchObserver};
pub use variant::RouteVariant;
