pub mod color;
pub mod geometry;
pub mod ids;

pub use color::Color;
pub use geometry::{mpt_to_units, Point, Rect, Size};
pub use ids::AreaId;
