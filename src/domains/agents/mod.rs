pub mod agent;
pub mod autonomous;
pub mod human;

pub use agent::*;
pub use autonomous::*;
pub use human::*;
