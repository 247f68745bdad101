pub mod model;
pub mod upload;
