//! Static site content consumed by the choreography engine: the domain
//! table and the per-session key/value store.
mod builtin;
mod domain;
mod error;
mod session;

pub use builtin::BUILTIN;
pub use domain::*;
pub use error::*;
pub use session::*;
