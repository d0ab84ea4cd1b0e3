// Re-export all models from their respective modules
pub mod brew;
pub mod coffee;
pub mod filter;
pub mod introspection;
pub mod outcome;

// Re-export commonly used models
pub use brew::*;
pub use coffee::*;
pub use filter::*;
pub use introspection::*;
pub use outcome::*;
