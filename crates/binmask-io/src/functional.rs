use std::path::Path;

use binmask_image::{Image, ImageError, ImageSize};

use crate::error::IoError;

/// File extensions accepted by [`read_image_any`] and [`write_image_gray8`].
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// A decoded image of one of the layouts the pipeline accepts.
#[derive(Clone, Debug, PartialEq)]
pub enum GenericImage {
    /// 8-bit grayscale image
    L8(Image<u8, 1>),
    /// 8-bit RGB image
    Rgb8(Image<u8, 3>),
}

impl GenericImage {
    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        match self {
            GenericImage::L8(image) => image.size(),
            GenericImage::Rgb8(image) => image.size(),
        }
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        match self {
            GenericImage::L8(image) => image.num_channels(),
            GenericImage::Rgb8(image) => image.num_channels(),
        }
    }
}

impl From<Image<u8, 1>> for GenericImage {
    fn from(image: Image<u8, 1>) -> Self {
        GenericImage::L8(image)
    }
}

impl From<Image<u8, 3>> for GenericImage {
    fn from(image: Image<u8, 3>) -> Self {
        GenericImage::Rgb8(image)
    }
}

fn check_extension(file_path: &Path) -> Result<(), IoError> {
    let supported = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        });

    if !supported {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    Ok(())
}

/// Reads an image from the given file path.
///
/// The format is guessed from the file content. Only 8-bit grayscale and 8-bit RGB images are
/// accepted; any other pixel layout is rejected rather than silently converted.
///
/// # Arguments
///
/// * `file_path` - The path to a `png`, `jpg`, `jpeg` or `bmp` file.
///
/// # Returns
///
/// A [`GenericImage`] containing the image data.
pub fn read_image_any(file_path: impl AsRef<Path>) -> Result<GenericImage, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    check_extension(file_path)?;

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    let image = match img.color() {
        image::ColorType::L8 => GenericImage::L8(Image::new(size, img.into_luma8().into_raw())?),
        image::ColorType::Rgb8 => GenericImage::Rgb8(Image::new(size, img.into_rgb8().into_raw())?),
        color => return Err(IoError::UnsupportedImageFormat(color)),
    };

    log::debug!(
        "read {} with {} channel(s) from {}",
        image.size(),
        image.num_channels(),
        file_path.display()
    );

    Ok(image)
}

/// Writes a grayscale image to the given file path.
///
/// The encoder is chosen from the file extension.
///
/// # Arguments
///
/// * `file_path` - The path to a `png`, `jpg`, `jpeg` or `bmp` file.
/// * `image` - The grayscale image to write.
pub fn write_image_gray8(file_path: impl AsRef<Path>, image: &Image<u8, 1>) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    check_extension(file_path)?;

    let buffer = image::GrayImage::from_raw(
        image.width() as u32,
        image.height() as u32,
        image.as_slice().to_vec(),
    )
    .ok_or(ImageError::InvalidChannelShape(
        image.as_slice().len(),
        image.size().area(),
    ))?;

    buffer.save(file_path)?;

    log::debug!("wrote {} to {}", image.size(), file_path.display());

    Ok(())
}
