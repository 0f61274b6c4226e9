use std::fmt;

use binmask_image::{Image, ImageError};
use binmask_imgproc::{
    color,
    filter::{apply_filter, FilterKind, RepeatCount},
    threshold,
};
use binmask_io::GenericImage;

use crate::config::PipelineConfig;

/// The retained results of a [`Pipeline`], in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// The decoded input image.
    Source,
    /// The single channel intensity image.
    Grayscale,
    /// The median filtered grayscale image.
    Filtered,
    /// The Otsu binarized image.
    Binary,
    /// The eroded binary image.
    Eroded,
    /// The dilated eroded image, i.e. the final mask.
    Dilated,
}

impl Stage {
    /// All stages in processing order.
    pub const ALL: [Stage; 6] = [
        Stage::Source,
        Stage::Grayscale,
        Stage::Filtered,
        Stage::Binary,
        Stage::Eroded,
        Stage::Dilated,
    ];

    /// A short lowercase name, usable as a file stem.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Source => "source",
            Stage::Grayscale => "grayscale",
            Stage::Filtered => "filtered",
            Stage::Binary => "binary",
            Stage::Eroded => "eroded",
            Stage::Dilated => "dilated",
        }
    }

    /// The stage whose result this stage consumes.
    pub fn previous(&self) -> Option<Stage> {
        match self {
            Stage::Source => None,
            Stage::Grayscale => Some(Stage::Source),
            Stage::Filtered => Some(Stage::Grayscale),
            Stage::Binary => Some(Stage::Filtered),
            Stage::Eroded => Some(Stage::Binary),
            Stage::Dilated => Some(Stage::Eroded),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A staged binary mask pipeline keeping every intermediate image.
///
/// Stages run in the order grayscale, median, Otsu, erosion, dilation. A stage only runs when the
/// stage before it has a result; otherwise it is skipped with a warning and returns `Ok(None)`.
/// Running a stage again replaces its result and drops the results of every later stage.
///
/// # Example
///
/// ```
/// use binmask::{image::Image, Pipeline, PipelineConfig, Stage};
///
/// let gray = Image::<u8, 1>::from_size_val([8, 8].into(), 0).unwrap();
/// let mut pipeline = Pipeline::new(gray);
///
/// // nothing to binarize yet
/// assert!(pipeline.binarize().unwrap().is_none());
///
/// pipeline.run(&PipelineConfig::default()).unwrap();
/// assert_eq!(pipeline.stages().count(), Stage::ALL.len());
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    source: GenericImage,
    grayscale: Option<Image<u8, 1>>,
    filtered: Option<Image<u8, 1>>,
    binary: Option<Image<u8, 1>>,
    eroded: Option<Image<u8, 1>>,
    dilated: Option<Image<u8, 1>>,
}

impl Pipeline {
    /// Create a pipeline from a grayscale or RGB image.
    pub fn new(source: impl Into<GenericImage>) -> Self {
        Self::from_generic(source.into())
    }

    /// Create a pipeline from a decoded image.
    pub fn from_generic(source: GenericImage) -> Self {
        Self {
            source,
            grayscale: None,
            filtered: None,
            binary: None,
            eroded: None,
            dilated: None,
        }
    }

    /// The decoded input image.
    pub fn source(&self) -> &GenericImage {
        &self.source
    }

    /// The grayscale image, if converted.
    pub fn grayscale(&self) -> Option<&Image<u8, 1>> {
        self.grayscale.as_ref()
    }

    /// The median filtered image, if filtered.
    pub fn filtered(&self) -> Option<&Image<u8, 1>> {
        self.filtered.as_ref()
    }

    /// The binary image, if binarized.
    pub fn binary(&self) -> Option<&Image<u8, 1>> {
        self.binary.as_ref()
    }

    /// The eroded image, if eroded.
    pub fn eroded(&self) -> Option<&Image<u8, 1>> {
        self.eroded.as_ref()
    }

    /// The dilated image, if dilated.
    pub fn dilated(&self) -> Option<&Image<u8, 1>> {
        self.dilated.as_ref()
    }

    /// The single channel result of a stage.
    ///
    /// For [`Stage::Source`] this is only available when the source is grayscale.
    pub fn get(&self, stage: Stage) -> Option<&Image<u8, 1>> {
        match stage {
            Stage::Source => match &self.source {
                GenericImage::L8(image) => Some(image),
                GenericImage::Rgb8(_) => None,
            },
            Stage::Grayscale => self.grayscale(),
            Stage::Filtered => self.filtered(),
            Stage::Binary => self.binary(),
            Stage::Eroded => self.eroded(),
            Stage::Dilated => self.dilated(),
        }
    }

    /// Iterate over the stages that have a single channel result, in processing order.
    pub fn stages(&self) -> impl Iterator<Item = (Stage, &Image<u8, 1>)> + '_ {
        Stage::ALL
            .into_iter()
            .filter_map(move |stage| self.get(stage).map(|image| (stage, image)))
    }

    /// Reduce the source to a single intensity channel.
    pub fn convert(&mut self) -> Result<Option<&Image<u8, 1>>, ImageError> {
        let gray = match &self.source {
            GenericImage::L8(image) => color::to_grayscale(image)?,
            GenericImage::Rgb8(image) => color::to_grayscale(image)?,
        };
        Ok(self.store(Stage::Grayscale, gray))
    }

    /// Apply the 3x3 median filter `repeats` times to the grayscale image.
    pub fn filter(&mut self, repeats: RepeatCount) -> Result<Option<&Image<u8, 1>>, ImageError> {
        self.iterate(Stage::Filtered, FilterKind::Median, repeats)
    }

    /// Binarize the filtered image with Otsu's method.
    pub fn binarize(&mut self) -> Result<Option<&Image<u8, 1>>, ImageError> {
        let Some(filtered) = self.input_of(Stage::Binary) else {
            return Ok(None);
        };
        let binary = threshold::binarize(filtered)?;
        Ok(self.store(Stage::Binary, binary))
    }

    /// Apply the 3x3 erosion `repeats` times to the binary image.
    pub fn erode(&mut self, repeats: RepeatCount) -> Result<Option<&Image<u8, 1>>, ImageError> {
        self.iterate(Stage::Eroded, FilterKind::Erosion, repeats)
    }

    /// Apply the 3x3 dilation `repeats` times to the eroded image.
    pub fn dilate(&mut self, repeats: RepeatCount) -> Result<Option<&Image<u8, 1>>, ImageError> {
        self.iterate(Stage::Dilated, FilterKind::Dilation, repeats)
    }

    /// Run every stage in order and return the final mask.
    pub fn run(&mut self, config: &PipelineConfig) -> Result<Option<&Image<u8, 1>>, ImageError> {
        self.convert()?;
        self.filter(config.median_repeats)?;
        self.binarize()?;
        self.erode(config.erosion_repeats)?;
        self.dilate(config.dilation_repeats)
    }

    fn iterate(
        &mut self,
        stage: Stage,
        kind: FilterKind,
        repeats: RepeatCount,
    ) -> Result<Option<&Image<u8, 1>>, ImageError> {
        let Some(src) = self.input_of(stage) else {
            return Ok(None);
        };
        let dst = apply_filter(src, kind, repeats.get())?;
        Ok(self.store(stage, dst))
    }

    fn input_of(&self, stage: Stage) -> Option<&Image<u8, 1>> {
        let previous = stage.previous()?;
        let input = self.get(previous);
        if input.is_none() {
            log::warn!("skipping {stage} stage: no {previous} image");
        }
        input
    }

    fn slot_mut(&mut self, stage: Stage) -> Option<&mut Option<Image<u8, 1>>> {
        match stage {
            Stage::Source => None,
            Stage::Grayscale => Some(&mut self.grayscale),
            Stage::Filtered => Some(&mut self.filtered),
            Stage::Binary => Some(&mut self.binary),
            Stage::Eroded => Some(&mut self.eroded),
            Stage::Dilated => Some(&mut self.dilated),
        }
    }

    fn store(&mut self, stage: Stage, image: Image<u8, 1>) -> Option<&Image<u8, 1>> {
        // later results were computed from the replaced image
        for later in Stage::ALL.into_iter().skip_while(|s| *s != stage).skip(1) {
            if let Some(slot) = self.slot_mut(later) {
                *slot = None;
            }
        }

        log::debug!("stored {stage} image {}", image.size());

        let slot = self.slot_mut(stage)?;
        Some(slot.insert(image))
    }
}
