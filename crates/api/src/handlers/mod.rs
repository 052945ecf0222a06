pub mod qa;
pub mod video;
