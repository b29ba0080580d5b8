//! Geographic primitives and the geohash codec

pub mod geohash;
mod point;

pub use point::{GeoBounds, GeoPoint};
