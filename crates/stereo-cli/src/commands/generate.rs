//! Generate command

use super::MaskFileSegmenter;
use crate::GenerateArgs;
use anyhow::{Context, Result};
use stereo_ops::{generate, StereoParams};
use tracing::{info, trace};

pub fn run(args: GenerateArgs, verbose: u8) -> Result<()> {
    trace!(
        person = %args.person.display(),
        mask = %args.mask.display(),
        shift = args.shift,
        size = args.size,
        "generate::run"
    );

    let person = super::load_image(&args.person)?;
    let background = args
        .background
        .as_deref()
        .map(super::load_image)
        .transpose()?;

    let params = StereoParams::default()
        .with_shift(args.shift)
        .with_person_size(args.size);
    let segmenter = MaskFileSegmenter::new(&args.mask);

    let outputs = generate(&segmenter, &person, background.as_ref(), &params)
        .with_context(|| format!("Failed to generate stereo view for {}", args.person.display()))?;
    info!(split = %outputs.split, "Background handled");

    super::save_image(&args.anaglyph, &outputs.anaglyph)?;
    if let Some(path) = &args.stereo {
        super::save_image(path, &outputs.stereo_pair)?;
    }
    if let Some(path) = &args.cutout {
        super::save_image(path, &outputs.segmentation)?;
    }
    if let Some(path) = &args.matte {
        super::save_matte(path, &outputs.matte)?;
    }

    if verbose > 0 {
        println!(
            "Background: {}; frame {}x{}; anaglyph -> {}",
            outputs.split,
            outputs.left_eye.width(),
            outputs.left_eye.height(),
            args.anaglyph.display()
        );
    }

    Ok(())
}
