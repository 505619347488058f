pub mod mechanic;
pub mod motion;
pub mod pool;
pub mod seat;

pub use mechanic::*;
pub use motion::*;
pub use pool::*;
pub use seat::*;
