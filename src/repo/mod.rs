/// Repository module
///
/// This module provides the data access layer for the application.
/// It contains functions for interacting with the database: reading the item
/// catalog and registering, listing and retrieving collection points.
///
/// The repository pattern abstracts away the details of database access
/// and provides a clean API for the rest of the application to use.

mod item_repo;
mod point_repo;

// Re-export all repository functions
pub use item_repo::*;
pub use point_repo::*;
