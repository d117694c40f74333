pub mod enums;
pub mod prediction;

pub use enums::*;
pub use prediction::*;
