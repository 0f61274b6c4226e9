use crate::parallel;
use binmask_image::{Image, ImageError};

/// Define the RGB weights for the grayscale conversion.
const RW: f32 = 0.299;
const GW: f32 = 0.587;
const BW: f32 = 0.114;

/// Convert an RGB8 image to grayscale using the formula:
///
/// Y = round(0.299 * R + 0.587 * G + 0.114 * B)
///
/// # Arguments
///
/// * `src` - The input RGB8 image.
/// * `dst` - The output grayscale image.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use binmask_image::{Image, ImageSize};
/// use binmask_imgproc::color::gray_from_rgb_u8;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize {
///         width: 2,
///         height: 1,
///     },
///     vec![255, 255, 255, 255, 0, 0],
/// )
/// .unwrap();
///
/// let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// gray_from_rgb_u8(&image, &mut gray).unwrap();
/// assert_eq!(gray.as_slice(), &[255, 76]);
/// ```
pub fn gray_from_rgb_u8(src: &Image<u8, 3>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    // parallelize the grayscale conversion by rows
    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let r = src_pixel[0] as f32;
        let g = src_pixel[1] as f32;
        let b = src_pixel[2] as f32;
        dst_pixel[0] = (RW * r + GW * g + BW * b).round().clamp(0.0, 255.0) as u8;
    });

    Ok(())
}

/// Reduce an image to a single intensity channel.
///
/// Single channel images are copied unchanged, three channel images are converted with
/// [`gray_from_rgb_u8`]. The output is always a newly allocated image.
///
/// # Errors
///
/// Returns [`ImageError::UnsupportedChannels`] for any other number of channels.
///
/// # Example
///
/// ```
/// use binmask_image::Image;
/// use binmask_imgproc::color::to_grayscale;
///
/// let rgba = Image::<u8, 4>::from_rows(vec![vec![0, 0, 0, 255]]).unwrap();
/// assert!(to_grayscale(&rgba).is_err());
/// ```
pub fn to_grayscale<const C: usize>(src: &Image<u8, C>) -> Result<Image<u8, 1>, ImageError> {
    match C {
        1 => Image::new(src.size(), src.as_slice().to_vec()),
        3 => {
            let rgb = Image::<u8, 3>::new(src.size(), src.as_slice().to_vec())?;
            let mut gray = Image::from_size_val(src.size(), 0)?;
            gray_from_rgb_u8(&rgb, &mut gray)?;
            Ok(gray)
        }
        _ => Err(ImageError::UnsupportedChannels(C)),
    }
}
