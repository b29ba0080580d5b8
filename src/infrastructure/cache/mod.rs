//! Geospatial cache built on a key-value substrate

mod geospatial;

pub use geospatial::{GeoCacheConfig, GeospatialCache};
