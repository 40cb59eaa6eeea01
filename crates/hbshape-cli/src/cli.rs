//! CLI argument definitions using Clap v4

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use hbshape::Units;

/// hbshape - shape text with FreeType and HarfBuzz
#[derive(Parser, Debug)]
#[command(name = "hbshape")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Shape text and print one position record per glyph
    #[command(alias = "s")]
    Shape(ShapeArgs),

    /// Display face metrics at the requested size
    #[command(alias = "i")]
    Info(InfoArgs),
}

/// Which font to load and how
#[derive(Args, Debug, Clone)]
pub struct FontArgs {
    /// Font file path (.ttf, .otf, .ttc, .otc)
    #[arg(short = 'f', long = "font-file")]
    pub font_file: PathBuf,

    /// Face index for TTC/OTC collections
    #[arg(short = 'y', long = "face-index", default_value = "0")]
    pub face_index: u32,

    /// Font size (pixels, or 26.6 units with --units fixed)
    #[arg(short = 's', long = "font-size", default_value = "16")]
    pub font_size: u32,

    /// Unit mode for sizes and positions (default: HBSHAPE_UNITS or pixels)
    #[arg(short = 'u', long = "units", value_enum)]
    pub units: Option<UnitsArg>,

    /// Read the font into memory instead of letting the engine open the file
    #[arg(long = "from-memory")]
    pub from_memory: bool,
}

/// Arguments for the shape command
#[derive(Args, Debug)]
pub struct ShapeArgs {
    /// Input text to shape (reads from stdin if omitted)
    pub text: Option<String>,

    #[command(flatten)]
    pub font: FontArgs,

    /// Include glyph ids and clusters in the output
    #[arg(short = 'g', long = "glyphs")]
    pub glyphs: bool,

    /// Output format
    #[arg(short = 'O', long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the info command
#[derive(Args, Debug)]
pub struct InfoArgs {
    #[command(flatten)]
    pub font: FontArgs,

    /// Output format
    #[arg(short = 'O', long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitsArg {
    /// Sizes in pixels, positions divided by 64
    Pixels,
    /// Sizes and positions in raw 26.6 fixed point
    Fixed,
}

impl From<UnitsArg> for Units {
    fn from(arg: UnitsArg) -> Self {
        match arg {
            UnitsArg::Pixels => Units::Pixels,
            UnitsArg::Fixed => Units::FixedPoint,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}
