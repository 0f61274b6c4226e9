use num_traits::Zero;

use binmask_image::Image;

/// Count the samples of an image that are not zero.
///
/// On a binary image this is the number of foreground pixels.
///
/// # Example
///
/// ```
/// use binmask_image::Image;
/// use binmask_imgproc::core::count_nonzero;
///
/// let image = Image::<u8, 1>::from_rows(vec![vec![0, 255, 0], vec![255, 255, 0]]).unwrap();
/// assert_eq!(count_nonzero(&image), 3);
/// ```
pub fn count_nonzero<T, const C: usize>(image: &Image<T, C>) -> usize
where
    T: Zero + PartialEq,
{
    image.as_slice().iter().filter(|v| !v.is_zero()).count()
}
