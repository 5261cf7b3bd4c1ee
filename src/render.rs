//! Turns dish buffers into RGBA frames.
//!
//! Cell values map to colors through a named [`Palette`]; dead cells are
//! never drawn. A [`Canvas`] scales each cell to a `scale x scale` block.

use petri_data::{Cell, DEAD};
use std::str::FromStr;
use thiserror::Error;

pub type Rgb = [u8; 3];

const BACKGROUND: Rgb = [0, 0, 0];
pub const MARKER: Rgb = [255, 255, 255];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown palette {0:?} (expected mono, ember, ocean or neon)")]
pub struct UnknownPalette(pub String);

/// Named color ramps. Living values cycle through the ramp, so aging cells
/// shift color generation by generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Palette {
    Mono,
    #[default]
    Ember,
    Ocean,
    Neon,
}

impl Palette {
    fn stops(&self) -> &'static [Rgb] {
        match self {
            Palette::Mono => &[[235, 235, 235]],
            Palette::Ember => &[
                [255, 236, 160],
                [255, 196, 87],
                [247, 141, 47],
                [222, 84, 30],
                [170, 37, 24],
                [110, 18, 20],
            ],
            Palette::Ocean => &[
                [200, 245, 255],
                [120, 214, 240],
                [52, 170, 220],
                [24, 118, 190],
                [14, 70, 140],
            ],
            Palette::Neon => &[
                [57, 255, 20],
                [255, 20, 147],
                [0, 255, 255],
                [255, 255, 0],
            ],
        }
    }

    /// Color of a cell value, `None` for dead cells.
    #[must_use]
    pub fn colorize(&self, value: Cell) -> Option<Rgb> {
        if value == DEAD {
            return None;
        }
        let stops = self.stops();
        Some(stops[(value as usize - 1) % stops.len()])
    }
}

impl FromStr for Palette {
    type Err = UnknownPalette;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mono" => Ok(Palette::Mono),
            "ember" => Ok(Palette::Ember),
            "ocean" => Ok(Palette::Ocean),
            "neon" => Ok(Palette::Neon),
            _ => Err(UnknownPalette(s.to_string())),
        }
    }
}

/// Scaled RGBA raster of the dish.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u16,
    height: u16,
    scale: u16,
    pixels: Vec<u8>,
}

impl Canvas {
    #[must_use]
    pub fn new(width: u16, height: u16, scale: u16) -> Self {
        let scale = scale.max(1);
        let mut canvas = Self {
            width,
            height,
            scale,
            pixels: vec![0; width as usize * height as usize * scale as usize * scale as usize * 4],
        };
        canvas.clear();
        canvas
    }

    #[must_use]
    pub fn pixel_width(&self) -> u32 {
        self.width as u32 * self.scale as u32
    }

    #[must_use]
    pub fn pixel_height(&self) -> u32 {
        self.height as u32 * self.scale as u32
    }

    pub fn clear(&mut self) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&[BACKGROUND[0], BACKGROUND[1], BACKGROUND[2], 255]);
        }
    }

    /// Fills the block of cell `(x, y)`. Coordinates outside are ignored.
    pub fn draw_cell_at(&mut self, x: u16, y: u16, rgb: Rgb) {
        if x >= self.width || y >= self.height {
            return;
        }
        let row_len = self.pixel_width() as usize;
        let scale = self.scale as usize;
        for dy in 0..scale {
            let py = y as usize * scale + dy;
            for dx in 0..scale {
                let px = x as usize * scale + dx;
                let offset = (py * row_len + px) * 4;
                self.pixels[offset..offset + 4].copy_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
            }
        }
    }

    /// Fills the block of the cell at a row-major buffer index.
    pub fn draw_cell(&mut self, index: usize, rgb: Rgb) {
        let w = self.width as usize;
        if w == 0 {
            return;
        }
        self.draw_cell_at((index % w) as u16, (index / w) as u16, rgb);
    }

    /// Draws every living cell of a dish buffer; returns how many were drawn.
    pub fn draw_buffer(&mut self, buffer: &[Cell], palette: Palette) -> usize {
        let mut drawn = 0;
        for (index, &value) in buffer.iter().enumerate() {
            if let Some(rgb) = palette.colorize(value) {
                self.draw_cell(index, rgb);
                drawn += 1;
            }
        }
        drawn
    }

    /// Marks the four corner cells, used for the empty opening frame.
    pub fn mark_corners(&mut self, rgb: Rgb) {
        let (w, h) = (self.width.saturating_sub(1), self.height.saturating_sub(1));
        for (x, y) in [(0, 0), (w, 0), (0, h), (w, h)] {
            self.draw_cell_at(x, y, rgb);
        }
    }

    /// RGBA bytes, row-major.
    #[must_use]
    pub fn buffer(&self) -> &[u8] {
        &self.pixels
    }
}
