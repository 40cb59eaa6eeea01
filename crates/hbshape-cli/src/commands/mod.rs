//! Subcommand implementations

pub mod info;
pub mod shape;

use anyhow::Context;
use hbshape::{FontSource, FtHbShaper, ShaperConfig};

use crate::cli::FontArgs;

/// Build a shaper from the shared font arguments
pub fn load_shaper(args: &FontArgs) -> anyhow::Result<FtHbShaper> {
    let mut config = ShaperConfig {
        face_index: args.face_index,
        ..ShaperConfig::default()
    };
    if let Some(units) = args.units {
        config.units = units.into();
    }

    let source = if args.from_memory {
        let bytes = std::fs::read(&args.font_file)
            .with_context(|| format!("reading {}", args.font_file.display()))?;
        FontSource::Bytes(bytes)
    } else {
        FontSource::Path(args.font_file.clone())
    };

    let shaper = hbshape::shaper(source, args.font_size, config)
        .with_context(|| format!("loading {}", args.font_file.display()))?;
    Ok(shaper)
}
