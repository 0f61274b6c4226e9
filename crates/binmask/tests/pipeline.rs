use binmask::{
    image::{Image, ImageError},
    imgproc::{
        color::to_grayscale,
        filter::{apply_filter, FilterKind, RepeatCount},
        threshold::{binarize, count_foreground},
    },
    Pipeline, PipelineConfig, Stage,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A `size` x `size` image of zeros with a filled square of 200 on rows and columns `lo..=hi`.
fn square(size: usize, lo: usize, hi: usize) -> Result<Image<u8, 1>, ImageError> {
    let rows = (0..size)
        .map(|y| {
            (0..size)
                .map(|x| {
                    if (lo..=hi).contains(&y) && (lo..=hi).contains(&x) {
                        200
                    } else {
                        0
                    }
                })
                .collect()
        })
        .collect();
    Image::from_rows(rows)
}

fn foreground_counts(pipeline: &Pipeline) -> Vec<(Stage, usize)> {
    pipeline
        .stages()
        .filter(|(stage, _)| !matches!(stage, Stage::Source | Stage::Grayscale))
        .map(|(stage, image)| (stage, count_foreground(image)))
        .collect()
}

#[test]
fn centered_square_is_removed_by_median() -> Result<(), ImageError> {
    init_logger();

    let mut pipeline = Pipeline::new(square(4, 1, 2)?);
    pipeline.run(&PipelineConfig::default())?;

    assert_eq!(
        foreground_counts(&pipeline),
        [
            (Stage::Filtered, 0),
            (Stage::Binary, 0),
            (Stage::Eroded, 0),
            (Stage::Dilated, 0),
        ]
    );
    Ok(())
}

#[test]
fn corner_square_survives_median_but_not_erosion() -> Result<(), ImageError> {
    init_logger();

    let mut pipeline = Pipeline::new(square(4, 0, 1)?);
    pipeline.run(&PipelineConfig::default())?;

    let filtered = pipeline.filtered().map(Image::as_slice);
    #[rustfmt::skip]
    let expected: &[u8] = &[
        200, 200, 0, 0,
        200,   0, 0, 0,
          0,   0, 0, 0,
          0,   0, 0, 0,
    ];
    assert_eq!(filtered, Some(expected));

    assert_eq!(
        foreground_counts(&pipeline),
        [
            (Stage::Filtered, 3),
            (Stage::Binary, 3),
            (Stage::Eroded, 0),
            (Stage::Dilated, 0),
        ]
    );
    Ok(())
}

#[test]
fn large_square_loses_its_corners() -> Result<(), ImageError> {
    init_logger();

    let mut pipeline = Pipeline::new(square(10, 2, 7)?);
    pipeline.run(&PipelineConfig::default())?;

    assert_eq!(
        foreground_counts(&pipeline),
        [
            (Stage::Filtered, 32),
            (Stage::Binary, 32),
            (Stage::Eroded, 12),
            (Stage::Dilated, 32),
        ]
    );

    let mask = pipeline.dilated().ok_or(ImageError::EmptyImage(0, 0))?;
    for (y, x) in [(2, 2), (2, 7), (7, 2), (7, 7)] {
        assert_eq!(mask.get([y, x, 0]), Some(&0));
    }
    assert_eq!(mask.get([2, 3, 0]), Some(&255));
    assert_eq!(pipeline.binary(), Some(mask));
    Ok(())
}

#[test]
fn color_source_matches_gray_source() -> Result<(), ImageError> {
    init_logger();

    let mut rng = StdRng::seed_from_u64(7);
    let data = (0..24 * 16 * 3).map(|_| rng.random()).collect();
    let rgb = Image::<u8, 3>::new([24, 16].into(), data)?;
    let gray = to_grayscale(&rgb)?;

    let config = PipelineConfig {
        median_repeats: RepeatCount::new(2),
        erosion_repeats: RepeatCount::new(1),
        dilation_repeats: RepeatCount::new(2),
    };

    let mut from_rgb = Pipeline::new(rgb);
    let mut from_gray = Pipeline::new(gray);
    let mask_rgb = from_rgb.run(&config)?.cloned();
    let mask_gray = from_gray.run(&config)?.cloned();

    assert!(mask_rgb.is_some());
    assert_eq!(mask_rgb, mask_gray);
    Ok(())
}

#[test]
fn pipeline_matches_free_functions() -> Result<(), ImageError> {
    let mut rng = StdRng::seed_from_u64(11);
    let data = (0..31 * 17).map(|_| rng.random()).collect();
    let gray = Image::<u8, 1>::new([31, 17].into(), data)?;

    let filtered = apply_filter(&gray, FilterKind::Median, 3)?;
    let binary = binarize(&filtered)?;
    let eroded = apply_filter(&binary, FilterKind::Erosion, 2)?;
    let dilated = apply_filter(&eroded, FilterKind::Dilation, 1)?;

    let config = PipelineConfig {
        median_repeats: RepeatCount::new(3),
        erosion_repeats: RepeatCount::new(2),
        dilation_repeats: RepeatCount::new(1),
    };
    let mut pipeline = Pipeline::new(gray.clone());
    pipeline.run(&config)?;

    assert_eq!(pipeline.grayscale(), Some(&gray));
    assert_eq!(pipeline.filtered(), Some(&filtered));
    assert_eq!(pipeline.binary(), Some(&binary));
    assert_eq!(pipeline.eroded(), Some(&eroded));
    assert_eq!(pipeline.dilated(), Some(&dilated));

    // the input is left untouched and a second run reproduces the result
    let mut again = Pipeline::new(gray);
    assert_eq!(again.run(&config)?, Some(&dilated));
    Ok(())
}

#[test]
fn uniform_image_gives_uniform_mask() -> Result<(), ImageError> {
    for value in [0u8, 77, 255] {
        let gray = Image::<u8, 1>::from_size_val([9, 5].into(), value)?;
        let mut pipeline = Pipeline::new(gray);
        let mask = pipeline.run(&PipelineConfig::default())?.cloned();
        let mask = mask.ok_or(ImageError::EmptyImage(0, 0))?;

        let expected = if value > 0 { 255 } else { 0 };
        assert!(mask.as_slice().iter().all(|&v| v == expected));
    }
    Ok(())
}

#[test]
fn erosion_and_dilation_bracket_the_mask() -> Result<(), ImageError> {
    let mut rng = StdRng::seed_from_u64(3);
    let data = (0..20 * 20)
        .map(|_| if rng.random_bool(0.6) { 255 } else { 0 })
        .collect();
    let binary = Image::<u8, 1>::new([20, 20].into(), data)?;

    let eroded = apply_filter(&binary, FilterKind::Erosion, 1)?;
    let dilated = apply_filter(&binary, FilterKind::Dilation, 1)?;

    for ((&e, &b), &d) in eroded
        .as_slice()
        .iter()
        .zip(binary.as_slice())
        .zip(dilated.as_slice())
    {
        assert!(e <= b && b <= d);
    }
    Ok(())
}
