// External I/O operations module
pub mod lock; // Session lock file
pub mod signals; // Unix signal handling
