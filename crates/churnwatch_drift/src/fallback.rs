use crate::dataset::Dataset;
use crate::error::DriftError;
use churnwatch_types::DriftConfig;
use ndarray::Array1;
use ndarray_rand::rand::seq::index;
use ndarray_rand::rand::Rng;
use ndarray_rand::rand_distr::Normal;
use ndarray_rand::RandomExt;
use tracing::warn;

/// Stand-in production sample used when nothing has been logged yet.
///
/// Draws up to `fallback_max_rows` reference rows without replacement and
/// adds zero-mean gaussian noise to `fallback_noise_feature`. The result only
/// keeps the drift check exercisable; callers must flag it as synthesized.
pub fn synthesize_production<R>(
    reference: &Dataset,
    config: &DriftConfig,
    rng: &mut R,
) -> Result<Dataset, DriftError>
where
    R: Rng + ?Sized,
{
    let n_samples = config.fallback_max_rows.min(reference.n_rows());

    if n_samples == 0 {
        return Ok(reference.select_rows(&[]));
    }

    let normal = Normal::new(0.0, config.fallback_noise_std)
        .map_err(|e| DriftError::NoiseDistributionError(e.to_string()))?;

    let indices = index::sample(rng, reference.n_rows(), n_samples).into_vec();
    let mut sample = reference.select_rows(&indices);

    match sample.numeric_mut(&config.fallback_noise_feature) {
        Some(column) => {
            let noise = Array1::random_using(n_samples, normal, rng);
            *column += &noise;
        }
        None => warn!(
            "Noise feature {} is not a numeric reference column, synthesized sample is unperturbed",
            config.fallback_noise_feature
        ),
    }

    Ok(sample)
}
