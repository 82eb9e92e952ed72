//! Network access: the profile adapter and the avatar loader.

pub mod fetch;
pub mod image;
