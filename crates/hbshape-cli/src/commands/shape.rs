//! Shape command implementation

use std::io::{self, Read, Write};

use anyhow::Context;
use hbshape::{types::total_advance, ShapedGlyph, Shaper, Units};
use serde::Serialize;

use crate::cli::{OutputFormat, ShapeArgs};

#[derive(Debug, Serialize)]
struct ShapeReport<'a> {
    text: &'a str,
    size: u32,
    units: Units,
    advance: [f64; 2],
    glyphs: Vec<GlyphRecord>,
}

#[derive(Debug, Serialize)]
struct GlyphRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cluster: Option<u32>,
    x_advance: f64,
    y_advance: f64,
    x_offset: f64,
    y_offset: f64,
}

impl GlyphRecord {
    fn new(glyph: &ShapedGlyph, with_ids: bool) -> Self {
        Self {
            id: with_ids.then_some(glyph.id),
            cluster: with_ids.then_some(glyph.cluster),
            x_advance: glyph.pos.x_advance,
            y_advance: glyph.pos.y_advance,
            x_offset: glyph.pos.x_offset,
            y_offset: glyph.pos.y_offset,
        }
    }
}

fn read_text(arg: Option<&str>) -> anyhow::Result<String> {
    if let Some(text) = arg {
        return Ok(text.to_string());
    }
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("reading text from stdin")?;
    // Drop the newline an interactive shell or `echo` leaves behind.
    let trimmed = text.trim_end_matches(['\n', '\r']).len();
    text.truncate(trimmed);
    Ok(text)
}

pub fn run(args: &ShapeArgs) -> anyhow::Result<()> {
    let text = read_text(args.text.as_deref())?;
    let shaper = super::load_shaper(&args.font)?;

    let glyphs = shaper.shape_glyphs(&text)?;
    let positions: Vec<_> = glyphs.iter().map(|g| g.pos).collect();
    let (x, y) = total_advance(&positions);
    log::info!("Shaped {} bytes into {} glyphs", text.len(), glyphs.len());

    let report = ShapeReport {
        text: &text,
        size: shaper.size(),
        units: shaper.units(),
        advance: [x, y],
        glyphs: glyphs
            .iter()
            .map(|g| GlyphRecord::new(g, args.glyphs))
            .collect(),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &report)?;
            writeln!(out)?;
        },
        OutputFormat::Text => write_text(&mut out, &report)?,
    }
    Ok(())
}

fn write_text(out: &mut impl Write, report: &ShapeReport<'_>) -> io::Result<()> {
    writeln!(
        out,
        "# {} glyphs, advance ({:.2}, {:.2}) {}",
        report.glyphs.len(),
        report.advance[0],
        report.advance[1],
        report.units
    )?;
    for (i, g) in report.glyphs.iter().enumerate() {
        write!(out, "{i}:")?;
        if let (Some(id), Some(cluster)) = (g.id, g.cluster) {
            write!(out, " gid={id} cluster={cluster}")?;
        }
        writeln!(
            out,
            " adv=({:.2}, {:.2}) off=({:.2}, {:.2})",
            g.x_advance, g.y_advance, g.x_offset, g.y_offset
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hbshape::GlyphPos;

    fn glyph(id: u32, cluster: u32) -> ShapedGlyph {
        ShapedGlyph {
            id,
            cluster,
            pos: GlyphPos::from_fixed(640, 0, 64, -32, Units::Pixels),
        }
    }

    #[test]
    fn test_text_output_with_ids() {
        let report = ShapeReport {
            text: "ab",
            size: 16,
            units: Units::Pixels,
            advance: [20.0, 0.0],
            glyphs: vec![
                GlyphRecord::new(&glyph(68, 0), true),
                GlyphRecord::new(&glyph(69, 1), true),
            ],
        };
        let mut out = Vec::new();
        write_text(&mut out, &report).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.starts_with("# 2 glyphs, advance (20.00, 0.00) pixels\n"));
        assert!(out.contains("0: gid=68 cluster=0 adv=(10.00, 0.00) off=(1.00, -0.50)"));
        assert!(out.contains("1: gid=69 cluster=1"));
    }

    #[test]
    fn test_json_omits_ids_unless_asked() {
        let record = GlyphRecord::new(&glyph(68, 0), false);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["x_advance"], 10.0);
    }

    #[test]
    fn test_explicit_text_skips_stdin() {
        assert_eq!(read_text(Some("hi")).unwrap(), "hi");
    }
}
