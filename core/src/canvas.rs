use crate::error::{PlasmaError, Result};

// Fixed pixel dimensions of one generation pass.
// Width and height are always >= 1 once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Canvas {
    width: u32,
    height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PlasmaError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    // Deepest level the subdivision can reach: ceil(log2(max(W, H)))
    pub fn max_depth(&self) -> u32 {
        let longest = self.width.max(self.height);
        u32::BITS - (longest - 1).leading_zeros()
    }
}
