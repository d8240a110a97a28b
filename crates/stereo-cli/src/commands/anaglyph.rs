//! Anaglyph command

use crate::AnaglyphArgs;
use anyhow::Result;
use tracing::trace;

pub fn run(args: AnaglyphArgs, verbose: u8) -> Result<()> {
    trace!(left = %args.left.display(), right = %args.right.display(), "anaglyph::run");

    let left = super::load_image(&args.left)?;
    let right = super::load_image(&args.right)?;

    let output = stereo_ops::anaglyph::encode(&left, &right)?;
    super::save_image(&args.output, &output)?;

    if verbose > 0 {
        println!(
            "Anaglyph {}x{} -> {}",
            output.width(),
            output.height(),
            args.output.display()
        );
    }

    Ok(())
}
