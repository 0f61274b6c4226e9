use argh::FromArgs;
use std::path::PathBuf;

use binmask::{
    imgproc::{filter::RepeatCount, threshold::count_foreground},
    io::functional as F,
    Pipeline, PipelineConfig,
};

#[derive(FromArgs)]
/// Turn an image into a binary mask and write every intermediate stage
struct Args {
    /// path to an input image
    #[argh(option, short = 'i')]
    image_path: PathBuf,

    /// directory where the stage images are written
    #[argh(option, short = 'o')]
    output_dir: PathBuf,

    /// path to a JSON pipeline config
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// number of median passes, overrides the config
    #[argh(option)]
    median: Option<RepeatCount>,

    /// number of erosion passes, overrides the config
    #[argh(option)]
    erosion: Option<RepeatCount>,

    /// number of dilation passes, overrides the config
    #[argh(option)]
    dilation: Option<RepeatCount>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(repeats) = args.median {
        config.median_repeats = repeats;
    }
    if let Some(repeats) = args.erosion {
        config.erosion_repeats = repeats;
    }
    if let Some(repeats) = args.dilation {
        config.dilation_repeats = repeats;
    }

    // read the image
    let image = F::read_image_any(&args.image_path)?;
    log::info!(
        "read {} with {} channel(s)",
        image.size(),
        image.num_channels()
    );

    let mut pipeline = Pipeline::from_generic(image);
    pipeline.run(&config)?;

    std::fs::create_dir_all(&args.output_dir)?;

    for (stage, image) in pipeline.stages() {
        let path = args.output_dir.join(format!("{stage}.png"));
        F::write_image_gray8(&path, image)?;
        log::info!(
            "{stage}: {} non-zero pixels, written to {}",
            count_foreground(image),
            path.display()
        );
    }

    Ok(())
}
