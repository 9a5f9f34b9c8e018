use crate::error::{Result, VarThumbError};
use ab_glyph::FontVec;
use std::fs;
use std::path::Path;

/// DejaVu Sans, used whenever no font is configured.
static BUNDLED_FONT: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");
pub const BUNDLED_FONT_NAME: &str = "DejaVu Sans (bundled)";

pub fn load_font_file(path: &Path) -> Result<FontVec> {
    let data = fs::read(path).map_err(|_| VarThumbError::Font {
        path: path.display().to_string(),
    })?;

    FontVec::try_from_vec(data).map_err(|_| VarThumbError::Font {
        path: path.display().to_string(),
    })
}

pub fn bundled_font() -> Result<FontVec> {
    FontVec::try_from_vec(BUNDLED_FONT.to_vec()).map_err(|_| VarThumbError::Font {
        path: BUNDLED_FONT_NAME.to_string(),
    })
}

/// Loads the configured font, falling back to the bundled one.
///
/// A configured font that cannot be loaded is an error. Returns a label for
/// the font alongside it.
pub fn resolve_font(configured: Option<&Path>) -> Result<(String, FontVec)> {
    match configured {
        Some(path) => Ok((path.display().to_string(), load_font_file(path)?)),
        None => Ok((BUNDLED_FONT_NAME.to_string(), bundled_font()?)),
    }
}
