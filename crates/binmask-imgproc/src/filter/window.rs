use binmask_image::{Image, ImageError};

use crate::{padding::BorderMode, parallel};

/// Side length of the square neighborhood window.
pub const WINDOW_SIZE: usize = 3;

/// Number of samples in a neighborhood window.
pub const WINDOW_LEN: usize = WINDOW_SIZE * WINDOW_SIZE;

/// The samples of a 3x3 neighborhood in row-major order, centered on the output pixel.
pub type Neighborhood<T> = [T; WINDOW_LEN];

/// A per-pixel rule turning a neighborhood into one output sample.
///
/// Rules must be pure: the engine may evaluate pixels in any order and from several threads.
pub trait WindowRule<T>: Sync {
    /// Compute the output sample for `window`.
    ///
    /// The window is a scratch copy and may be reordered in place.
    fn apply(&self, window: &mut Neighborhood<T>) -> T;
}

/// Apply a window rule at every pixel of an image, clamping the neighborhood at the borders.
///
/// Each channel is filtered independently.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image, same size as `src`.
/// * `rule` - The per-pixel rule.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if the sizes of `src` and `dst` differ.
///
/// # Example
///
/// ```
/// use binmask_image::Image;
/// use binmask_imgproc::filter::{apply_window, MedianRule};
///
/// let src = Image::<u8, 1>::from_rows(vec![vec![0, 0, 0], vec![0, 9, 0], vec![0, 0, 0]]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0).unwrap();
///
/// apply_window(&src, &mut dst, &MedianRule).unwrap();
/// assert_eq!(dst.as_slice(), &[0; 9]);
/// ```
pub fn apply_window<T, const C: usize, R>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    rule: &R,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
    R: WindowRule<T> + ?Sized,
{
    apply_window_with_border(src, dst, rule, BorderMode::Replicate)
}

/// Apply a window rule at every pixel of an image with a custom border mode.
///
/// Same as [`apply_window`] but out-of-bounds neighbors are resolved with `border`.
pub fn apply_window_with_border<T, const C: usize, R>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    rule: &R,
    border: BorderMode,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
    R: WindowRule<T> + ?Sized,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let width = src.width();
    let height = src.height();
    let src_data = src.as_slice();

    // column indices of the three window columns for every x
    let cols_lut = (0..width)
        .map(|x| window_indices(border, x, width))
        .collect::<Vec<_>>();

    parallel::par_iter_rows_indexed(dst, |y, dst_row| {
        let rows = window_indices(border, y, height);
        let mut window: Neighborhood<T> = [src_data[0]; WINDOW_LEN];

        for (x, cols) in cols_lut.iter().enumerate() {
            for c in 0..C {
                for (ky, &sy) in rows.iter().enumerate() {
                    let row_offset = sy * width;
                    for (kx, &sx) in cols.iter().enumerate() {
                        window[ky * WINDOW_SIZE + kx] = src_data[(row_offset + sx) * C + c];
                    }
                }
                dst_row[x * C + c] = rule.apply(&mut window);
            }
        }
    });

    Ok(())
}

fn window_indices(border: BorderMode, center: usize, len: usize) -> [usize; WINDOW_SIZE] {
    let radius = (WINDOW_SIZE / 2) as isize;
    let mut indices = [0; WINDOW_SIZE];
    for (k, idx) in indices.iter_mut().enumerate() {
        *idx = border.map_index(center as isize + k as isize - radius, len);
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::{Neighborhood, WindowRule, WINDOW_LEN};
    use crate::padding::BorderMode;
    use binmask_image::{Image, ImageError};

    /// Sums the window so the tests can see which samples were gathered.
    struct SumRule;

    impl WindowRule<u32> for SumRule {
        fn apply(&self, window: &mut Neighborhood<u32>) -> u32 {
            window.iter().sum()
        }
    }

    /// Returns the top-left sample of the window.
    struct TopLeftRule;

    impl WindowRule<u8> for TopLeftRule {
        fn apply(&self, window: &mut Neighborhood<u8>) -> u8 {
            window[0]
        }
    }

    #[test]
    fn window_replicates_edges() -> Result<(), ImageError> {
        let src = Image::<u32, 1>::from_rows(vec![vec![1, 2], vec![3, 4]])?;
        let mut dst = Image::<u32, 1>::from_size_val(src.size(), 0)?;
        super::apply_window(&src, &mut dst, &SumRule)?;

        // top-left window with clamping: rows [0, 0, 1], cols [0, 0, 1]
        // 1 + 1 + 2 + 1 + 1 + 2 + 3 + 3 + 4
        assert_eq!(dst.get([0, 0, 0]), Some(&18));
        // bottom-right window: rows [0, 1, 1], cols [0, 1, 1]
        // 1 + 2 + 2 + 3 + 4 + 4 + 3 + 4 + 4
        assert_eq!(dst.get([1, 1, 0]), Some(&27));

        Ok(())
    }

    #[test]
    fn window_single_pixel() -> Result<(), ImageError> {
        let src = Image::<u32, 1>::from_rows(vec![vec![5]])?;
        let mut dst = Image::<u32, 1>::from_size_val(src.size(), 0)?;
        super::apply_window(&src, &mut dst, &SumRule)?;
        assert_eq!(dst.as_slice(), &[5 * WINDOW_LEN as u32]);
        Ok(())
    }

    #[test]
    fn window_channels_are_independent() -> Result<(), ImageError> {
        let src = Image::<u32, 2>::from_rows(vec![vec![1, 100, 1, 100], vec![1, 100, 1, 100]])?;
        let mut dst = Image::<u32, 2>::from_size_val(src.size(), 0)?;
        super::apply_window(&src, &mut dst, &SumRule)?;
        assert!(dst.as_slice().chunks_exact(2).all(|px| px == [9, 900]));
        Ok(())
    }

    #[test]
    fn window_with_wrap_border() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]])?;
        let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;
        super::apply_window_with_border(&src, &mut dst, &TopLeftRule, BorderMode::Wrap)?;
        // the top-left neighbor of (0, 0) wraps around to (2, 2)
        assert_eq!(dst.get([0, 0, 0]), Some(&9));
        assert_eq!(dst.get([1, 1, 0]), Some(&1));
        Ok(())
    }

    #[test]
    fn window_size_mismatch() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::from_size_val([3, 3].into(), 0)?;
        let mut dst = Image::<u8, 1>::from_size_val([3, 4].into(), 0)?;
        assert_eq!(
            super::apply_window(&src, &mut dst, &TopLeftRule),
            Err(ImageError::InvalidImageSize(3, 3, 3, 4))
        );
        Ok(())
    }
}
