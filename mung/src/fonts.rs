use crate::common::*;
use plotters::style::{register_font, FontStyle};
use std::sync::OnceLock;

pub const FONT_FAMILY: &str = "sans-serif";

const SYSTEM_FONTS: [&str; 8] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
];

static FONT_READY: OnceLock<bool> = OnceLock::new();

/// Register a TrueType font for chart text, once per process.
///
/// Returns whether text can be drawn. The first call decides; later
/// calls report the same answer whatever `font_file` they pass.
pub fn setup_fonts(font_file: Option<&str>) -> bool {
    *FONT_READY.get_or_init(|| match try_register(font_file) {
        Ok(file) => {
            info!("chart font: {}", file);
            true
        }
        Err(e) => {
            warn!("{}; charts are drawn without text", e);
            false
        }
    })
}

fn try_register(font_file: Option<&str>) -> anyhow::Result<Box<str>> {
    let file: Box<str> = match font_file {
        Some(f) => f.into(),
        None => SYSTEM_FONTS
            .iter()
            .find(|f| std::path::Path::new(f).is_file())
            .map(|&f| f.into())
            .ok_or(anyhow::anyhow!("no TrueType font found (try --font)"))?,
    };

    let bytes: &'static [u8] = Box::leak(
        std::fs::read(file.as_ref())
            .map_err(|e| anyhow::anyhow!("can't read font {}: {}", file, e))?
            .into_boxed_slice(),
    );

    for style in [FontStyle::Normal, FontStyle::Bold] {
        register_font(FONT_FAMILY, style, bytes)
            .map_err(|_| anyhow::anyhow!("invalid font {}", file))?;
    }
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_font_is_an_error() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("broken.ttf");
        std::fs::write(&file, b"not a font")?;

        let err = try_register(file.to_str()).unwrap_err();
        assert!(err.to_string().starts_with("invalid font"));

        let err = try_register(Some("/nonexistent/font.ttf")).unwrap_err();
        assert!(err.to_string().contains("can't read font"));
        Ok(())
    }
}
