/// Data models module
///
/// This module defines the core data structures used throughout the application.
/// It includes database models that map to database tables, as well as methods
/// for creating and reading these models.

// Re-export all model types
mod item;
pub use item::Item;

mod point;
pub use point::{NewPoint, Point};

mod point_item;
pub use point_item::PointItem;
