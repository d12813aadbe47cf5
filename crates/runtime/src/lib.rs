pub mod clock;
pub mod frame;
pub mod observer;
pub mod scheduler;
pub mod timeline;
pub mod timers;

pub use clock::*;
pub use frame::*;
pub use observer::*;
pub use scheduler::*;
pub use timeline::*;
pub use timers::*;
