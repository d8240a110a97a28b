//! Clean-mask command

use crate::CleanMaskArgs;
use anyhow::Result;
use stereo_ops::MaskCleaner;
use tracing::trace;

pub fn run(args: CleanMaskArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), erode = args.erode, blur = args.blur, "clean_mask::run");

    let mask = super::load_mask(&args.input)?;
    let cleaner = MaskCleaner {
        erode_size: args.erode,
        blur_size: args.blur,
        ..MaskCleaner::default()
    };
    let matte = cleaner.clean(&mask)?;
    super::save_matte(&args.output, &matte)?;

    if verbose > 0 {
        let coverage = matte.data().iter().sum::<f32>() / matte.data().len().max(1) as f32;
        println!(
            "Matte {}x{}, coverage {:.1}% -> {}",
            matte.width(),
            matte.height(),
            coverage * 100.0,
            args.output.display()
        );
    }

    Ok(())
}
