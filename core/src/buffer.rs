use image::{Rgb, RgbImage};

use crate::PixelWriter;
use crate::canvas::Canvas;
use crate::color::{PlasmaColor, to_rgb8};

// Raw float colors, row-major Vec<Vec<_>> of size H×W
// access as `grid[y][x]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    grid: Vec<Vec<PlasmaColor>>,
}

impl PixelBuffer {
    pub fn new(canvas: Canvas) -> Self {
        let black = PlasmaColor::new(0.0, 0.0, 0.0);
        Self {
            width: canvas.width(),
            height: canvas.height(),
            grid: vec![vec![black; canvas.width() as usize]; canvas.height() as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Option<PlasmaColor> {
        self.grid
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
    }

    pub fn rows(&self) -> &[Vec<PlasmaColor>] {
        &self.grid
    }
}

impl PixelWriter for PixelBuffer {
    fn write_pixel(&mut self, x: u32, y: u32, color: PlasmaColor) {
        // A cell outside the grid would mean the recursion bounds are broken
        debug_assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        if let Some(px) = self
            .grid
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            *px = color;
        }
    }
}

impl PixelWriter for RgbImage {
    fn write_pixel(&mut self, x: u32, y: u32, color: PlasmaColor) {
        debug_assert!(x < self.width() && y < self.height());
        if let Some(px) = self.get_pixel_mut_checked(x, y) {
            *px = Rgb(to_rgb8(color));
        }
    }
}

// Flatten the buffer (row-major) into a single Vec of colors
pub fn flatten(buffer: &PixelBuffer) -> Vec<PlasmaColor> {
    buffer.grid.iter().flat_map(|row| row.iter().copied()).collect()
}

// Convert the buffer into a packed RGB8 byte buffer, e.g. for a texture upload
pub fn to_rgb_bytes(buffer: &PixelBuffer) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(buffer.width as usize * buffer.height as usize * 3);
    for row in &buffer.grid {
        for &color in row {
            bytes.extend_from_slice(&to_rgb8(color));
        }
    }
    bytes
}
