use binmask_image::{Image, ImageError};

use super::window::{apply_window, Neighborhood, WindowRule, WINDOW_LEN};

/// Selects the median of the 3x3 neighborhood.
#[derive(Debug, Clone, Copy, Default)]
pub struct MedianRule;

impl<T: Ord + Copy> WindowRule<T> for MedianRule {
    fn apply(&self, window: &mut Neighborhood<T>) -> T {
        window.sort_unstable();
        window[WINDOW_LEN / 2]
    }
}

/// Blur an image using a 3x3 median filter.
///
/// Every output sample is one of the nine input samples around it, so the filter removes
/// isolated outliers (salt and pepper noise) without creating new intensities.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image, same size as `src`.
///
/// # Example
///
/// ```
/// use binmask_image::Image;
/// use binmask_imgproc::filter::median_blur;
///
/// let src = Image::<u8, 1>::from_rows(vec![
///     vec![10, 10, 10],
///     vec![10, 255, 10],
///     vec![10, 10, 10],
/// ])
/// .unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0).unwrap();
///
/// median_blur(&src, &mut dst).unwrap();
/// assert_eq!(dst.get([1, 1, 0]), Some(&10));
/// ```
pub fn median_blur<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
) -> Result<(), ImageError>
where
    T: Copy + Ord + Send + Sync,
{
    apply_window(src, dst, &MedianRule)
}
