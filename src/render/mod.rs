//! Scene presentation: camera and painter.

pub mod camera;
pub mod painter;
