pub mod annotations;
pub mod editing;

// Re-export key types for easier usage
pub use annotations::*;
pub use editing::*;
