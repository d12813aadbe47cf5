pub mod interp;
pub mod vec;

pub use interp::*;
pub use vec::*;
