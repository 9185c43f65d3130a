pub mod dataset;
pub mod error;
pub mod evaluator;
pub mod fallback;
pub mod ks;

pub use dataset::{Column, Dataset};
pub use error::DriftError;
pub use evaluator::DriftEvaluator;
pub use fallback::synthesize_production;
pub use ks::{ks_2samp, KsMethod, KsResult};
