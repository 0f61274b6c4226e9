use rayon::prelude::*;

use binmask_image::Image;

/// Apply a function to each pixel in the image in parallel.
///
/// The closure receives the `C1` samples of a source pixel and the `C2` samples of the
/// matching destination pixel.
pub fn par_iter_rows<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&[T1], &mut [T2]) + Send + Sync,
) where
    T1: Clone + Send + Sync,
    T2: Clone + Send + Sync,
{
    let cols = src.cols();
    src.as_slice()
        .par_chunks_exact(C1 * cols)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * cols))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .chunks_exact(C1)
                .zip(dst_chunk.chunks_exact_mut(C2))
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Apply a function to each sample in the image in parallel with a value.
pub fn par_iter_rows_val<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&T1, &mut T2) + Send + Sync,
) where
    T1: Clone + Send + Sync,
    T2: Clone + Send + Sync,
{
    let cols = src.cols();
    src.as_slice()
        .par_chunks_exact(C1 * cols)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * cols))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .iter()
                .zip(dst_chunk.iter_mut())
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Fill the rows of the destination image in parallel.
///
/// The closure receives the row index and the mutable row of the destination, and is free to
/// read any part of the (immutable) source it captured. Rows are independent, so the result is
/// the same as a serial run.
pub fn par_iter_rows_indexed<T, const C: usize>(
    dst: &mut Image<T, C>,
    f: impl Fn(usize, &mut [T]) + Send + Sync,
) where
    T: Send + Sync,
{
    let row_len = C * dst.cols();
    dst.as_slice_mut()
        .par_chunks_exact_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| f(y, row));
}

#[cfg(test)]
mod tests {
    use binmask_image::{Image, ImageError};

    #[test]
    fn par_iter_rows_indexed_visits_every_row() -> Result<(), ImageError> {
        let mut image = Image::<usize, 2>::from_rows(vec![vec![0; 6]; 4])?;
        super::par_iter_rows_indexed(&mut image, |y, row| {
            row.iter_mut().for_each(|v| *v = y);
        });
        for y in 0..4 {
            assert!(image.as_slice()[y * 6..(y + 1) * 6].iter().all(|&v| v == y));
        }
        Ok(())
    }

    #[test]
    fn par_iter_rows_maps_pixels() -> Result<(), ImageError> {
        let src = Image::<u8, 2>::from_rows(vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8]])?;
        let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;
        super::par_iter_rows(&src, &mut dst, |s, d| d[0] = s[0] + s[1]);
        assert_eq!(dst.as_slice(), &[3, 7, 11, 15]);
        Ok(())
    }
}
