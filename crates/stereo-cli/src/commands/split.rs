//! Split command

use crate::SplitArgs;
use anyhow::Result;
use stereo_ops::StereoSplitter;
use tracing::trace;

pub fn run(args: SplitArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.background.display(), threshold = args.threshold, "split::run");

    let background = super::load_image(&args.background)?;
    let splitter = StereoSplitter {
        similarity_threshold: args.threshold,
        ..StereoSplitter::default()
    };
    let split = splitter.split(&background)?;

    super::save_image(&args.left, &split.left)?;
    super::save_image(&args.right, &split.right)?;

    println!(
        "{}: left {}x{}, right {}x{}",
        split.kind,
        split.left.width(),
        split.left.height(),
        split.right.width(),
        split.right.height()
    );
    if verbose > 0 {
        println!("Wrote {} and {}", args.left.display(), args.right.display());
    }

    Ok(())
}
