use crate::config::MontageConfig;
use crate::error::Result;
use crate::montage::font::resolve_font;
use crate::montage::layout::{GridSize, MontageLayout};
use crate::status::{StatusEvent, StatusSink};
use ab_glyph::{FontVec, PxScale};
use image::codecs::jpeg::{JpegEncoder, PixelDensity};
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// Renders per-creator contact sheets.
pub struct MontageBuilder {
    config: MontageConfig,
    font: FontVec,
}

impl MontageBuilder {
    pub fn new(config: &MontageConfig) -> Result<Self> {
        let (label, font) = resolve_font(config.font_path.as_deref())?;
        log::debug!("Using font {} for montage captions", label);

        Ok(Self {
            config: config.clone(),
            font,
        })
    }

    pub fn montage_path(output_dir: &Path, creator: &str) -> PathBuf {
        output_dir.join(format!("grid_{}.jpg", creator))
    }

    /// Lays `image_files` (names relative to `output_dir`) into a grid and
    /// writes `grid_<creator>.jpg`. Returns `None` without writing anything
    /// when there are no images.
    pub fn build(
        &self,
        output_dir: &Path,
        image_files: &[String],
        creator: &str,
        grid: Option<GridSize>,
        sink: &mut dyn StatusSink,
    ) -> Result<Option<PathBuf>> {
        if image_files.is_empty() {
            sink.emit(StatusEvent::NoImagesForCreator {
                creator: creator.to_string(),
            });
            return Ok(None);
        }

        let canvas = self.render(output_dir, image_files, creator, grid)?;
        let path = Self::montage_path(output_dir, creator);
        self.save_jpeg(&canvas, &path)?;
        drop(canvas);

        sink.emit(StatusEvent::MontageSaved {
            creator: creator.to_string(),
            path: path.clone(),
        });

        Ok(Some(path))
    }

    /// Composes the montage canvas without writing it.
    pub fn render(
        &self,
        output_dir: &Path,
        image_files: &[String],
        creator: &str,
        grid: Option<GridSize>,
    ) -> Result<RgbImage> {
        let grid = GridSize::resolve(grid, image_files.len())?;
        let layout = MontageLayout::new(grid, &self.config);
        let (width, height) = layout.canvas_size();

        log::debug!(
            "Building {} montage for {} ({} images, {}x{} px)",
            grid,
            creator,
            image_files.len(),
            width,
            height
        );

        let mut canvas = RgbImage::from_pixel(width, height, Rgb(self.config.background));

        self.draw_centered(
            &mut canvas,
            &format!("Creator: {}", creator),
            layout.title_px,
            (layout.padding, layout.padding),
            (width - 2 * layout.padding, layout.title_height),
        );

        for (index, file_name) in image_files.iter().enumerate() {
            let bytes = fs::read(output_dir.join(file_name))?;
            let thumbnail = image::load_from_memory(&bytes)?;
            let fitted = thumbnail
                .resize(layout.cell, layout.cell, FilterType::CatmullRom)
                .to_rgb8();

            let (image_x, image_y) = layout.image_origin(index);
            let offset_x = image_x + (layout.cell - fitted.width()) / 2;
            let offset_y = image_y + (layout.cell - fitted.height()) / 2;
            imageops::overlay(&mut canvas, &fitted, i64::from(offset_x), i64::from(offset_y));

            let caption = Path::new(file_name)
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| file_name.clone());
            self.draw_centered(
                &mut canvas,
                &caption,
                layout.caption_px,
                layout.cell_origin(index),
                (layout.cell, layout.caption_height),
            );
        }

        Ok(canvas)
    }

    fn draw_centered(
        &self,
        canvas: &mut RgbImage,
        text: &str,
        px: f32,
        origin: (u32, u32),
        area: (u32, u32),
    ) {
        if text.is_empty() {
            return;
        }

        let scale = PxScale::from(px);
        let (text_width, text_height) = text_size(scale, &self.font, text);
        let x = origin.0 + area.0.saturating_sub(text_width) / 2;
        let y = origin.1 + area.1.saturating_sub(text_height) / 2;

        draw_text_mut(canvas, TEXT_COLOR, x as i32, y as i32, scale, &self.font, text);
    }

    fn save_jpeg(&self, canvas: &RgbImage, path: &Path) -> Result<()> {
        let file = fs::File::create(path)?;
        let mut writer = BufWriter::new(file);

        let mut encoder = JpegEncoder::new_with_quality(&mut writer, self.config.jpeg_quality);
        encoder.set_pixel_density(PixelDensity::dpi(self.config.dpi));
        encoder.encode_image(canvas)?;

        writer.flush()?;
        Ok(())
    }
}
