//! Image availability for shapes that draw decoded images.

pub mod images;
