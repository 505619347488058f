pub mod event_store;
pub mod input;

pub use event_store::*;
pub use input::*;
