use binmask_image::{Image, ImageError};

use crate::filter::{apply_window, Neighborhood, WindowRule};

/// Neighborhood minimum: foreground only if all nine samples are foreground.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErosionRule;

impl<T: Ord + Copy> WindowRule<T> for ErosionRule {
    fn apply(&self, window: &mut Neighborhood<T>) -> T {
        window.iter().copied().fold(window[0], T::min)
    }
}

/// Neighborhood maximum: foreground if any of the nine samples is foreground.
#[derive(Debug, Clone, Copy, Default)]
pub struct DilationRule;

impl<T: Ord + Copy> WindowRule<T> for DilationRule {
    fn apply(&self, window: &mut Neighborhood<T>) -> T {
        window.iter().copied().fold(window[0], T::max)
    }
}

/// Erode an image with a 3x3 box structuring element.
///
/// Erosion shrinks white regions in the image by one pixel. Each pixel is replaced by the
/// minimum value in its neighborhood; neighbors outside the image replicate the nearest edge
/// pixel.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
///
/// # Returns
///
/// Ok(()) on success, or [`ImageError`] if shapes don't match.
pub fn erode<T, const C: usize>(src: &Image<T, C>, dst: &mut Image<T, C>) -> Result<(), ImageError>
where
    T: Copy + Ord + Send + Sync,
{
    apply_window(src, dst, &ErosionRule)
}

/// Dilate an image with a 3x3 box structuring element.
///
/// Dilation expands white regions in the image by one pixel. Each pixel is replaced by the
/// maximum value in its neighborhood; neighbors outside the image replicate the nearest edge
/// pixel.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
///
/// # Returns
///
/// Ok(()) on success, or [`ImageError`] if shapes don't match.
pub fn dilate<T, const C: usize>(src: &Image<T, C>, dst: &mut Image<T, C>) -> Result<(), ImageError>
where
    T: Copy + Ord + Send + Sync,
{
    apply_window(src, dst, &DilationRule)
}
