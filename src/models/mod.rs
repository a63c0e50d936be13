pub mod chunk;
pub mod group;
pub mod response;

pub use chunk::*;
pub use group::*;
pub use response::*;
