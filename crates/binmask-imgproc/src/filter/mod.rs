mod median;
mod window;

use std::{fmt, str::FromStr};

use binmask_image::{Image, ImageError};

use crate::morphology::{DilationRule, ErosionRule};

pub use median::{median_blur, MedianRule};
pub use window::{
    apply_window, apply_window_with_border, Neighborhood, WindowRule, WINDOW_LEN, WINDOW_SIZE,
};

/// The per-pixel rules that can be applied repeatedly with [`apply_filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// 3x3 median, see [`MedianRule`].
    Median,
    /// 3x3 binary erosion, see [`ErosionRule`].
    Erosion,
    /// 3x3 binary dilation, see [`DilationRule`].
    Dilation,
}

impl FilterKind {
    /// Apply the rule once from `src` into `dst`.
    pub fn apply<T, const C: usize>(
        &self,
        src: &Image<T, C>,
        dst: &mut Image<T, C>,
    ) -> Result<(), ImageError>
    where
        T: Copy + Ord + Send + Sync,
    {
        match self {
            FilterKind::Median => apply_window(src, dst, &MedianRule),
            FilterKind::Erosion => apply_window(src, dst, &ErosionRule),
            FilterKind::Dilation => apply_window(src, dst, &DilationRule),
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterKind::Median => "median",
            FilterKind::Erosion => "erosion",
            FilterKind::Dilation => "dilation",
        };
        f.write_str(name)
    }
}

/// A validated, non-negative number of filter applications.
///
/// Counts usually come from user input (a text field, a CLI flag, a config file). Negative or
/// non-numeric input is rejected with [`ImageError::InvalidParameter`] instead of being clamped.
///
/// # Example
///
/// ```
/// use binmask_imgproc::filter::RepeatCount;
///
/// let repeats: RepeatCount = " 3 ".parse().unwrap();
/// assert_eq!(repeats.get(), 3);
///
/// assert!("-1".parse::<RepeatCount>().is_err());
/// assert!(RepeatCount::try_from(-2i64).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "i64", into = "i64")
)]
pub struct RepeatCount(usize);

impl RepeatCount {
    /// Create a repeat count.
    pub const fn new(count: usize) -> Self {
        Self(count)
    }

    /// The number of applications.
    pub const fn get(self) -> usize {
        self.0
    }
}

impl From<usize> for RepeatCount {
    fn from(count: usize) -> Self {
        Self(count)
    }
}

impl From<RepeatCount> for i64 {
    fn from(count: RepeatCount) -> Self {
        count.0 as i64
    }
}

impl TryFrom<i64> for RepeatCount {
    type Error = ImageError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        usize::try_from(value).map(Self).map_err(|_| {
            ImageError::InvalidParameter(format!(
                "repeat count must be a non-negative integer, got {value}"
            ))
        })
    }
}

impl FromStr for RepeatCount {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().parse::<i64>().map_err(|_| {
            ImageError::InvalidParameter(format!("repeat count must be an integer, got {s:?}"))
        })?;
        Self::try_from(value)
    }
}

impl fmt::Display for RepeatCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Apply a filter `repeats` times, feeding each output back as the next input.
///
/// The input is never modified. With `repeats == 0` the result is a copy of `src`.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `kind` - The rule to apply.
/// * `repeats` - How many times to apply it.
///
/// # Returns
///
/// A new image with the same size as `src`.
///
/// # Example
///
/// ```
/// use binmask_image::Image;
/// use binmask_imgproc::filter::{apply_filter, FilterKind};
///
/// let src = Image::<u8, 1>::from_rows(vec![
///     vec![0, 0, 0, 0, 0],
///     vec![0, 0, 0, 0, 0],
///     vec![0, 0, 255, 0, 0],
///     vec![0, 0, 0, 0, 0],
///     vec![0, 0, 0, 0, 0],
/// ])
/// .unwrap();
///
/// let grown = apply_filter(&src, FilterKind::Dilation, 2).unwrap();
/// assert!(grown.as_slice().iter().all(|&v| v == 255));
///
/// let same = apply_filter(&src, FilterKind::Erosion, 0).unwrap();
/// assert_eq!(same, src);
/// ```
pub fn apply_filter<T, const C: usize>(
    src: &Image<T, C>,
    kind: FilterKind,
    repeats: usize,
) -> Result<Image<T, C>, ImageError>
where
    T: Copy + Ord + Send + Sync,
{
    log::debug!("applying {kind} filter {repeats} time(s) on {}", src.size());

    let mut current = src.clone();
    if repeats == 0 {
        return Ok(current);
    }

    let mut next = src.clone();
    for _ in 0..repeats {
        kind.apply(&current, &mut next)?;
        std::mem::swap(&mut current, &mut next);
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::{apply_filter, FilterKind, RepeatCount};
    use binmask_image::{ErrorKind, Image, ImageError};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_gray(seed: u64) -> Result<Image<u8, 1>, ImageError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let data = (0..19 * 7).map(|_| rng.random()).collect();
        Image::new([19, 7].into(), data)
    }

    #[test]
    fn zero_repeats_is_identity() -> Result<(), ImageError> {
        let src = random_gray(1)?;
        for kind in [FilterKind::Median, FilterKind::Erosion, FilterKind::Dilation] {
            assert_eq!(apply_filter(&src, kind, 0)?, src);
        }
        Ok(())
    }

    #[test]
    fn repeats_thread_outputs() -> Result<(), ImageError> {
        let src = random_gray(2)?;
        for kind in [FilterKind::Median, FilterKind::Erosion, FilterKind::Dilation] {
            let mut manual = src.clone();
            for _ in 0..3 {
                let mut dst = Image::from_size_val(src.size(), 0)?;
                kind.apply(&manual, &mut dst)?;
                manual = dst;
            }
            assert_eq!(apply_filter(&src, kind, 3)?, manual);
        }
        Ok(())
    }

    #[test]
    fn filter_is_deterministic() -> Result<(), ImageError> {
        let src = random_gray(3)?;
        let first = apply_filter(&src, FilterKind::Median, 2)?;
        let second = apply_filter(&src, FilterKind::Median, 2)?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn repeated_erosion_empties_image() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::from_rows(vec![
            vec![0, 0, 0, 0, 0, 0, 0],
            vec![0, 255, 255, 255, 255, 255, 0],
            vec![0, 255, 255, 255, 255, 255, 0],
            vec![0, 255, 255, 255, 255, 255, 0],
            vec![0, 0, 0, 0, 0, 0, 0],
        ])?;
        let once = apply_filter(&src, FilterKind::Erosion, 1)?;
        assert_eq!(once.as_slice().iter().filter(|&&v| v == 255).count(), 3);
        let twice = apply_filter(&src, FilterKind::Erosion, 2)?;
        assert!(twice.as_slice().iter().all(|&v| v == 0));
        Ok(())
    }

    #[test]
    fn repeat_count_parsing() -> Result<(), ImageError> {
        assert_eq!("0".parse::<RepeatCount>()?, RepeatCount::new(0));
        assert_eq!("12".parse::<RepeatCount>()?.get(), 12);
        assert_eq!(RepeatCount::try_from(5i64)?, RepeatCount::from(5usize));

        for bad in ["-1", "abc", "", "1.5"] {
            let err = bad.parse::<RepeatCount>().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        }
        assert!(matches!(
            RepeatCount::try_from(-3i64),
            Err(ImageError::InvalidParameter(_))
        ));
        Ok(())
    }

    #[test]
    fn filter_kind_display() {
        assert_eq!(FilterKind::Median.to_string(), "median");
        assert_eq!(FilterKind::Erosion.to_string(), "erosion");
        assert_eq!(FilterKind::Dilation.to_string(), "dilation");
    }
}
