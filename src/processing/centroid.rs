//! Per-class centroid synthesis
//!
//! Every template of a class is resampled (index selection) to the median template
//! length and the results are averaged element-wise. Templates are aligned by
//! length only, not by DTW, so a centroid approximates the class average.

use ndarray::Array2;
use tracing::debug;

use super::features::FeatureSequence;
use super::resample::resample_to_length;

/// Median of the template lengths; even counts take the truncated mean of the middle pair
pub fn median_length(lengths: &[usize]) -> usize {
    if lengths.is_empty() {
        return 0;
    }
    let mut sorted = lengths.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2
    }
}

/// Build the representative sequence for one class
///
/// Returns `None` when there are no templates.
pub fn build_centroid<'a, I>(templates: I) -> Option<FeatureSequence>
where
    I: IntoIterator<Item = &'a FeatureSequence>,
{
    let templates: Vec<&FeatureSequence> = templates.into_iter().collect();
    let first = templates.first()?;

    let width = first.ncols();
    let lengths: Vec<usize> = templates.iter().map(|t| t.nrows()).collect();
    let target = median_length(&lengths);

    let mut sum = Array2::<f32>::zeros((target, width));
    let mut count = 0usize;

    for template in &templates {
        if template.ncols() != width {
            debug!(expected = width, actual = template.ncols(), "skipping template with mismatched width");
            continue;
        }
        sum += &resample_to_length(template, target);
        count += 1;
    }

    if count > 1 {
        sum /= count as f32;
    }
    Some(sum)
}
