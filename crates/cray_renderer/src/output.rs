//! Render output: the linear image buffer and its PPM / PNG writers.

use crate::bucket::BucketResult;
use crate::error::RenderResult;
use crate::renderer::color_to_rgb8;
use crate::Color;
use std::io::Write;
use std::path::Path;

/// Linear-light image, stored row-major from the top-left pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.offset(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let offset = self.offset(x, y);
        self.pixels[offset] = color;
    }

    /// Copy a rendered bucket into its region of the image.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        let row_len = bucket.width as usize;

        for (row, colors) in result.pixels.chunks(row_len.max(1)).enumerate() {
            let start = self.offset(bucket.x, bucket.y + row as u32);
            self.pixels[start..start + colors.len()].copy_from_slice(colors);
        }
    }

    /// Convert to gamma-corrected, interleaved RGB bytes.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb8(*color));
        }
        bytes
    }

    /// Write the image as plain-text PPM (P3).
    pub fn write_ppm<W: Write>(&self, mut writer: W) -> RenderResult<()> {
        write!(writer, "P3\n{} {}\n255\n", self.width, self.height)?;
        for color in &self.pixels {
            let [r, g, b] = color_to_rgb8(*color);
            writeln!(writer, "{} {} {}", r, g, b)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Save the image as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        image::save_buffer_with_format(
            path,
            &self.to_rgb8(),
            self.width,
            self.height,
            image::ColorType::Rgb8,
            image::ImageFormat::Png,
        )?;
        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}
