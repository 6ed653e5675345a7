//! Layout engines for the two interchangeable views

pub mod orbit;
pub mod topology;

pub use orbit::{InvalidOrbitBands, OrbitBands, OrbitNode, OrbitScene, layout as orbit_layout, sort_by_severity};
pub use topology::{NodeShape, TopologyEdge, TopologyGraph, TopologyNode};
