pub mod drift;
pub mod error;
pub mod feature;
pub mod prediction;

pub use drift::*;
pub use error::TypeError;
pub use feature::*;
pub use prediction::*;
