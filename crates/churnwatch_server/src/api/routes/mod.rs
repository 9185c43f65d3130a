pub mod drift;
pub mod health;
pub mod predict;

pub use drift::*;
pub use health::*;
pub use predict::*;
