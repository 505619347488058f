pub mod actors;
pub mod aggregate;
pub mod elimination;
pub mod events;
pub mod ports;
pub mod projections;
pub mod timers;

pub use actors::*;
pub use aggregate::*;
pub use elimination::*;
pub use events::*;
pub use ports::*;
pub use projections::*;
pub use timers::*;
