pub mod bounds;
pub mod types;

pub use bounds::*;
pub use types::*;
