pub mod practice;
pub mod sessions;
