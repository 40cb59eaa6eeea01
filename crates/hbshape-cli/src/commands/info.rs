//! Info command implementation
//!
//! Displays face metrics at the requested size.

use std::io::{self, Write};

use anyhow::anyhow;
use hbshape::{FaceMetrics, Shaper};

use crate::cli::{InfoArgs, OutputFormat};

pub fn run(args: &InfoArgs) -> anyhow::Result<()> {
    let shaper = super::load_shaper(&args.font)?;
    let metrics = shaper
        .metrics()
        .ok_or_else(|| anyhow!("face reports no size metrics"))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &metrics)?;
            writeln!(out)?;
        },
        OutputFormat::Text => {
            writeln!(out, "hbshape v{}", env!("CARGO_PKG_VERSION"))?;
            writeln!(out, "Backend: {}", shaper.name())?;
            writeln!(out, "Units:   {}", shaper.units())?;
            writeln!(out)?;
            print_metrics(&mut out, &metrics)?;
        },
    }
    Ok(())
}

fn print_metrics(out: &mut impl Write, m: &FaceMetrics) -> io::Result<()> {
    writeln!(out, "Family:       {}", m.family_name.as_deref().unwrap_or("(unknown)"))?;
    writeln!(out, "Style:        {}", m.style_name.as_deref().unwrap_or("(unknown)"))?;
    writeln!(out, "Units per em: {}", m.units_per_em)?;
    writeln!(out, "Glyphs:       {}", m.glyph_count)?;
    writeln!(out, "PPEM:         {}x{}", m.x_ppem, m.y_ppem)?;
    writeln!(out, "Ascender:     {:.2}", m.ascender)?;
    writeln!(out, "Descender:    {:.2}", m.descender)?;
    writeln!(out, "Line height:  {:.2}", m.height)?;
    writeln!(out, "Max advance:  {:.2}", m.max_advance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_metrics_without_names() {
        let metrics = FaceMetrics {
            family_name: None,
            style_name: Some("Book".to_string()),
            units_per_em: 2048,
            glyph_count: 6253,
            x_ppem: 16,
            y_ppem: 16,
            ascender: 15.0,
            descender: -4.0,
            height: 19.0,
            max_advance: 33.0,
        };
        let mut out = Vec::new();
        print_metrics(&mut out, &metrics).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("Family:       (unknown)"));
        assert!(out.contains("Style:        Book"));
        assert!(out.contains("PPEM:         16x16"));
        assert!(out.contains("Line height:  19.00"));
    }
}
