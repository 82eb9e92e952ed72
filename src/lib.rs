pub mod config;
pub mod error;
pub mod kinematics;
pub mod layout;
pub mod model;
pub mod net;
pub mod render;
pub mod scene;
pub mod session;
