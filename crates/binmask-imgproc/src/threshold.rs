use num_traits::Zero;
use std::cmp::PartialOrd;

use binmask_image::{Image, ImageError};

use crate::core::count_nonzero;
use crate::histogram::{compute_histogram, NUM_BINS_U8};
use crate::parallel;

/// Sample value of foreground pixels in a binary image.
pub const FOREGROUND: u8 = 255;

/// Sample value of background pixels in a binary image.
pub const BACKGROUND: u8 = 0;

/// Apply a binary threshold to an image.
///
/// # Arguments
///
/// * `src` - The input image of an arbitrary number of channels and type.
/// * `dst` - The output image of an arbitrary number of channels and type.
/// * `threshold` - The threshold value. Must be the same type as the image.
/// * `max_value` - The maximum value to use when the input value is greater than the threshold.
///
/// # Returns
///
/// The thresholded image with the same number of channels as the input image.
///
/// # Examples
///
/// ```
/// use binmask_image::{Image, ImageSize};
/// use binmask_imgproc::threshold::threshold_binary;
///
/// let data = vec![100u8, 200, 50, 150, 200, 250];
/// let image = Image::<_, 1>::new(ImageSize { width: 2, height: 3 }, data).unwrap();
///
/// let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0).unwrap();
///
/// threshold_binary(&image, &mut thresholded, 100, 255).unwrap();
/// assert_eq!(thresholded.as_slice(), &[0, 255, 0, 255, 255, 255]);
/// ```
pub fn threshold_binary<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    threshold: T,
    max_value: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialOrd + Zero,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    // run the thresholding operation in parallel
    parallel::par_iter_rows_val(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = if *src_pixel > threshold {
            max_value
        } else {
            T::zero()
        };
    });

    Ok(())
}

/// Between-class variance of one split, kept as the exact fraction `d^2 / (count_a * count_b)`
/// with `d = sum_a * count_b - sum_b * count_a`.
///
/// This equals `wA * wB * (muA - muB)^2` scaled by `total^2`, which is the same for every split.
#[derive(Debug, Clone, Copy)]
struct SplitVariance {
    d: u128,
    p: u128,
}

impl SplitVariance {
    fn new(count_a: u128, sum_a: u128, count_b: u128, sum_b: u128) -> Self {
        Self {
            d: (sum_a * count_b).abs_diff(sum_b * count_a),
            p: count_a * count_b,
        }
    }

    /// `self > other`, compared as `d1^2 * p2 > d2^2 * p1` without rounding.
    fn exceeds(&self, other: &SplitVariance) -> bool {
        let lhs = mul_limbs(&mul_limbs(&limbs(self.d), &limbs(self.d)), &limbs(other.p));
        let rhs = mul_limbs(&mul_limbs(&limbs(other.d), &limbs(other.d)), &limbs(self.p));
        lhs.iter().rev().cmp(rhs.iter().rev()).is_gt()
    }
}

/// Little endian 64-bit limbs of a `u128`.
fn limbs(x: u128) -> [u64; 2] {
    [x as u64, (x >> 64) as u64]
}

/// Schoolbook product of two little endian limb numbers.
fn mul_limbs(a: &[u64], b: &[u64]) -> Vec<u64> {
    let mut out = vec![0u64; a.len() + b.len()];
    for (i, &x) in a.iter().enumerate() {
        let mut carry = 0u128;
        for (j, &y) in b.iter().enumerate() {
            let cur = out[i + j] as u128 + x as u128 * y as u128 + carry;
            out[i + j] = cur as u64;
            carry = cur >> 64;
        }
        out[i + b.len()] = carry as u64;
    }
    out
}

/// Compute the Otsu threshold of a 256 bin intensity histogram.
///
/// For every candidate `t` in `0..=254` the histogram is split into the classes `i <= t` and
/// `i > t`, and the between-class variance `wA * wB * (muA - muB)^2` is evaluated. Candidates
/// leaving one class empty are skipped. The smallest `t` reaching the maximum variance wins;
/// if no candidate has a positive variance (e.g. a uniform image) the result is `0`.
///
/// Variances are compared in integer arithmetic, so splits that tie mathematically also tie
/// here.
///
/// # Example
///
/// ```
/// use binmask_imgproc::threshold::otsu_threshold_from_histogram;
///
/// let mut hist = [0usize; 256];
/// hist[50] = 2;
/// hist[60] = 2;
/// hist[190] = 2;
/// hist[200] = 2;
///
/// assert_eq!(otsu_threshold_from_histogram(&hist), 60);
/// ```
pub fn otsu_threshold_from_histogram(hist: &[usize; NUM_BINS_U8]) -> u8 {
    let total = hist.iter().map(|&h| h as u128).sum::<u128>();
    let sum_total = hist
        .iter()
        .enumerate()
        .map(|(i, &h)| i as u128 * h as u128)
        .sum::<u128>();

    let mut count_a = 0u128;
    let mut sum_a = 0u128;
    let mut best_t = 0u8;
    let mut best = SplitVariance { d: 0, p: 1 };

    for (t, &h) in hist.iter().enumerate().take(NUM_BINS_U8 - 1) {
        count_a += h as u128;
        sum_a += t as u128 * h as u128;

        let count_b = total - count_a;
        if count_a == 0 || count_b == 0 {
            continue;
        }

        let split = SplitVariance::new(count_a, sum_a, count_b, sum_total - sum_a);

        // strict comparison keeps the first maximum
        if split.exceeds(&best) {
            best = split;
            best_t = t as u8;
        }
    }

    best_t
}

/// Compute the Otsu threshold of a grayscale image.
///
/// See [`otsu_threshold_from_histogram`] for the selection rule.
pub fn otsu_threshold(src: &Image<u8, 1>) -> Result<u8, ImageError> {
    let mut hist = [0usize; NUM_BINS_U8];
    compute_histogram(src, &mut hist, NUM_BINS_U8)?;
    Ok(otsu_threshold_from_histogram(&hist))
}

/// Apply Otsu's threshold to a grayscale image.
///
/// # Arguments
///
/// * `src` - The input grayscale image.
/// * `dst` - The output binary image.
/// * `max_value` - The value written for pixels strictly above the threshold.
///
/// # Returns
///
/// The threshold that was selected.
pub fn threshold_otsu(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    max_value: u8,
) -> Result<u8, ImageError> {
    let threshold = otsu_threshold(src)?;
    threshold_binary(src, dst, threshold, max_value)?;
    Ok(threshold)
}

/// Binarize a grayscale image with Otsu's method.
///
/// Pixels strictly above the selected threshold become [`FOREGROUND`], the rest
/// [`BACKGROUND`]. The output is a newly allocated image.
///
/// # Errors
///
/// Returns [`ImageError::UnsupportedChannels`] if the image is not single channel.
///
/// # Example
///
/// ```
/// use binmask_image::Image;
/// use binmask_imgproc::threshold::binarize;
///
/// let gray = Image::<u8, 1>::from_rows(vec![vec![10, 20, 200], vec![210, 15, 205]]).unwrap();
/// let binary = binarize(&gray).unwrap();
///
/// assert_eq!(binary.as_slice(), &[0, 0, 255, 255, 0, 255]);
/// ```
pub fn binarize<const C: usize>(src: &Image<u8, C>) -> Result<Image<u8, 1>, ImageError> {
    if C != 1 {
        return Err(ImageError::UnsupportedChannels(C));
    }

    let gray = Image::<u8, 1>::new(src.size(), src.as_slice().to_vec())?;
    let mut binary = Image::from_size_val(gray.size(), BACKGROUND)?;
    let threshold = threshold_otsu(&gray, &mut binary, FOREGROUND)?;

    log::debug!("otsu selected threshold {threshold} on {}", gray.size());

    Ok(binary)
}

/// Number of foreground samples in a binary image.
///
/// Any non-zero sample counts as foreground.
pub fn count_foreground(binary: &Image<u8, 1>) -> usize {
    count_nonzero(binary)
}
