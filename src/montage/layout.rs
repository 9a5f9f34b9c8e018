use crate::config::MontageConfig;
use crate::error::{Result, VarThumbError};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub rows: u32,
    pub cols: u32,
}

impl GridSize {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// Near-square grid: `cols = ceil(sqrt(n))`, `rows = ceil(n / cols)`.
    pub fn auto(images: usize) -> Self {
        let n = images.max(1) as u32;
        let mut cols = (n as f64).sqrt().ceil() as u32;
        // Guard against float rounding on perfect squares
        while cols > 1 && (cols - 1) * (cols - 1) >= n {
            cols -= 1;
        }
        while cols * cols < n {
            cols += 1;
        }
        let rows = n.div_ceil(cols);
        Self { rows, cols }
    }

    pub fn cells(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Uses `explicit` when given, after checking it can hold every image.
    pub fn resolve(explicit: Option<GridSize>, images: usize) -> Result<Self> {
        match explicit {
            Some(grid) if grid.rows == 0 || grid.cols == 0 || grid.cells() < images => {
                Err(VarThumbError::InvalidGrid {
                    rows: grid.rows,
                    cols: grid.cols,
                    images,
                })
            }
            Some(grid) => Ok(grid),
            None => Ok(Self::auto(images)),
        }
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

impl FromStr for GridSize {
    type Err = String;

    /// Parses `ROWSxCOLS`, e.g. `3x4`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let (rows, cols) = lower
            .split_once('x')
            .ok_or_else(|| format!("Invalid grid '{}': expected ROWSxCOLS, e.g. 3x4", s))?;

        let parse = |part: &str| -> std::result::Result<u32, String> {
            let value: u32 = part
                .trim()
                .parse()
                .map_err(|_| format!("Invalid grid dimension: {}", part))?;
            if value == 0 {
                return Err("Grid dimensions must be greater than 0".to_string());
            }
            Ok(value)
        };

        Ok(Self::new(parse(rows)?, parse(cols)?))
    }
}

/// Pixel geometry of a montage canvas.
///
/// Row 0 is the title band; image rows follow beneath it. Each cell is a
/// caption band on top of a square image area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MontageLayout {
    pub grid: GridSize,
    pub cell: u32,
    pub caption_height: u32,
    pub title_height: u32,
    pub spacing: u32,
    pub padding: u32,
    pub title_px: f32,
    pub caption_px: f32,
}

impl MontageLayout {
    pub fn new(grid: GridSize, config: &MontageConfig) -> Self {
        let dpi = f32::from(config.dpi);
        let cell = (dpi * config.cell_inches).round().max(1.0) as u32;
        let title_px = config.title_font_pt * dpi / 72.0;
        let caption_px = config.caption_font_pt * dpi / 72.0;

        Self {
            grid,
            cell,
            caption_height: (caption_px * 1.6).round() as u32,
            title_height: (title_px * 2.0).round() as u32,
            spacing: (cell as f32 * 0.05).round() as u32,
            padding: (dpi * 0.1).round() as u32,
            title_px,
            caption_px,
        }
    }

    fn row_height(&self) -> u32 {
        self.caption_height + self.cell
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        let cols = self.grid.cols;
        let rows = self.grid.rows;
        let width = 2 * self.padding + cols * self.cell + cols.saturating_sub(1) * self.spacing;
        let height = 2 * self.padding
            + self.title_height
            + rows * (self.row_height() + self.spacing);
        (width, height)
    }

    /// Top-left corner of the cell holding image `index`, counted
    /// left-to-right, top-to-bottom below the title band.
    pub fn cell_origin(&self, index: usize) -> (u32, u32) {
        let col = index as u32 % self.grid.cols;
        let row = index as u32 / self.grid.cols;
        let x = self.padding + col * (self.cell + self.spacing);
        let y = self.padding + self.title_height + self.spacing + row * (self.row_height() + self.spacing);
        (x, y)
    }

    /// Top-left corner of the image area inside cell `index`.
    pub fn image_origin(&self, index: usize) -> (u32, u32) {
        let (x, y) = self.cell_origin(index);
        (x, y + self.caption_height)
    }
}
