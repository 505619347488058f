pub mod agents;
pub mod arena;
pub mod logger;
pub mod round;
pub mod seating;

pub use agents::*;
pub use arena::*;
pub use logger::*;
pub use round::*;
pub use seating::*;
