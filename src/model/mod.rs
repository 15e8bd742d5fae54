//! Domain data models.

mod area;

pub use area::{Area, AreaRegistry, AreaType, area_key};
