// core holds the plasma fractal: displacement, color curve and subdivision
pub mod buffer;
pub mod canvas;
pub mod color;
pub mod config;
pub mod displacement;
pub mod error;
pub mod renderer;

pub use buffer::{PixelBuffer, flatten, to_rgb_bytes};
pub use canvas::Canvas;
pub use color::{PlasmaColor, scalar_to_color, to_rgb8};
pub use config::PlasmaConfig;
pub use displacement::{DisplacementModel, displacement};
pub use error::{PlasmaError, Result};
pub use renderer::{
    Cell, GenerationStats, PlasmaFractal, displaced_middle, edge_midpoints, generate,
    generate_from_corners,
};

// Destination of the rendered plasma.
// Receives exactly one call per pixel of the canvas and is never read back.
pub trait PixelWriter {
    fn write_pixel(&mut self, x: u32, y: u32, color: PlasmaColor);
}

impl<W: PixelWriter + ?Sized> PixelWriter for &mut W {
    fn write_pixel(&mut self, x: u32, y: u32, color: PlasmaColor) {
        (**self).write_pixel(x, y, color);
    }
}
