pub mod item;
pub mod locality;
pub mod point;
