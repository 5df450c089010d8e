use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;
use tracing::{debug, debug_span, trace};

use crate::PixelWriter;
use crate::canvas::Canvas;
use crate::color::{PlasmaColor, scalar_to_color};
use crate::config::PlasmaConfig;
use crate::displacement::DisplacementModel;
use crate::error::Result;

// A cell stops splitting once it is at most this wide and tall
const BASE_EXTENT: f64 = 1.0;

// Rectangle being subdivided.
// Corners go clockwise from the top-left: [tl, tr, br, bl].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub corners: [f32; 4],
    pub depth: u32,
}

impl Cell {
    pub fn root(canvas: Canvas, corners: [f32; 4]) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
            corners,
            depth: 0,
        }
    }

    pub fn is_base(&self) -> bool {
        self.width <= BASE_EXTENT && self.height <= BASE_EXTENT
    }

    // Split into [tl, tr, br, bl] children sharing the displaced `middle`
    pub fn split(&self, middle: f32) -> [Cell; 4] {
        let [c1, c2, c3, c4] = self.corners;
        let [e1, e2, e3, e4] = edge_midpoints(self.corners);
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        let child = |x: f64, y: f64, corners: [f32; 4]| Cell {
            x,
            y,
            width: hw,
            height: hh,
            corners,
            depth: self.depth + 1,
        };
        [
            child(self.x, self.y, [c1, e1, middle, e4]),
            child(self.x + hw, self.y, [e1, c2, e2, middle]),
            child(self.x + hw, self.y + hh, [middle, e2, c3, e3]),
            child(self.x, self.y + hh, [e4, middle, e3, c4]),
        ]
    }

    // Integer pixel whose top-left corner lies inside [x, x+w) × [y, y+h).
    // For integer-aligned cells this is just (x, y).
    pub fn owned_pixel(&self) -> Option<(u32, u32)> {
        let px = self.x.ceil();
        let py = self.y.ceil();
        if px < self.x + self.width && py < self.y + self.height {
            Some((px as u32, py as u32))
        } else {
            None
        }
    }

    pub fn average(&self) -> f32 {
        self.corners.iter().sum::<f32>() / 4.0
    }
}

// Midpoints of the four edges: plain averages of adjacent corners, never clamped
pub fn edge_midpoints(corners: [f32; 4]) -> [f32; 4] {
    let [c1, c2, c3, c4] = corners;
    [
        (c1 + c2) / 2.0,
        (c2 + c3) / 2.0,
        (c3 + c4) / 2.0,
        (c4 + c1) / 2.0,
    ]
}

// Center value: corner average pushed by `displacement`, clamped to [0, 1]
pub fn displaced_middle(corners: [f32; 4], displacement: f32) -> f32 {
    let avg = (corners[0] + corners[1] + corners[2] + corners[3]) / 4.0;
    (avg + displacement).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub pixels_written: usize,
    pub cells_visited: usize,
    pub max_depth: u32,
}

impl GenerationStats {
    fn merge(&mut self, other: GenerationStats) {
        self.pixels_written += other.pixels_written;
        self.cells_visited += other.cells_visited;
        self.max_depth = self.max_depth.max(other.max_depth);
    }
}

// Depth-first subdivision of one cell tree into a writer
struct Subdivider<'a, R: Rng + ?Sized, W: PixelWriter + ?Sized> {
    canvas: Canvas,
    model: DisplacementModel,
    rng: &'a mut R,
    writer: &'a mut W,
    stats: GenerationStats,
}

impl<R: Rng + ?Sized, W: PixelWriter + ?Sized> Subdivider<'_, R, W> {
    fn subdivide(&mut self, cell: Cell) {
        self.stats.cells_visited += 1;
        self.stats.max_depth = self.stats.max_depth.max(cell.depth);

        if cell.is_base() {
            if let Some((px, py)) = cell.owned_pixel() {
                self.writer.write_pixel(px, py, scalar_to_color(cell.average()));
                self.stats.pixels_written += 1;
            }
            return;
        }

        let d = self.model.sample(
            &mut *self.rng,
            cell.width / 2.0,
            cell.height / 2.0,
            self.canvas,
            cell.depth,
        );
        let middle = displaced_middle(cell.corners, d);
        for child in cell.split(middle) {
            self.subdivide(child);
        }
    }
}

fn random_corners<R: Rng + ?Sized>(rng: &mut R) -> [f32; 4] {
    [rng.random(), rng.random(), rng.random(), rng.random()]
}

// Render a full plasma: four random corners, then subdivide the whole canvas
pub fn generate<R: Rng + ?Sized, W: PixelWriter + ?Sized>(
    canvas: Canvas,
    model: DisplacementModel,
    rng: &mut R,
    writer: &mut W,
) -> GenerationStats {
    let corners = random_corners(rng);
    generate_from_corners(canvas, corners, model, rng, writer)
}

// Like `generate` but with caller supplied corner values
pub fn generate_from_corners<R: Rng + ?Sized, W: PixelWriter + ?Sized>(
    canvas: Canvas,
    corners: [f32; 4],
    model: DisplacementModel,
    rng: &mut R,
    writer: &mut W,
) -> GenerationStats {
    let span = debug_span!("plasma_generate", width = canvas.width(), height = canvas.height());
    let _enter = span.enter();
    debug!(?corners, ?model, "subdividing");

    let mut sub = Subdivider {
        canvas,
        model,
        rng,
        writer,
        stats: GenerationStats::default(),
    };
    sub.subdivide(Cell::root(canvas, corners));
    sub.stats
}

// Pixels produced by one worker before they are handed to the real writer
#[derive(Default)]
struct PixelRun(Vec<(u32, u32, PlasmaColor)>);

impl PixelWriter for PixelRun {
    fn write_pixel(&mut self, x: u32, y: u32, color: PlasmaColor) {
        self.0.push((x, y, color));
    }
}

// Plasma renderer owning its canvas, displacement model and seedable rng
pub struct PlasmaFractal {
    canvas: Canvas,
    displacement: DisplacementModel,
    rng: StdRng,
}

impl PlasmaFractal {
    pub fn new(canvas: Canvas, seed: u64) -> Self {
        Self {
            canvas,
            displacement: DisplacementModel::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy(canvas: Canvas) -> Self {
        Self {
            canvas,
            displacement: DisplacementModel::default(),
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn from_config(config: &PlasmaConfig) -> Result<Self> {
        config.validate()?;
        let canvas = config.canvas()?;
        let fractal = match config.seed {
            Some(seed) => Self::new(canvas, seed),
            None => Self::from_entropy(canvas),
        };
        Ok(fractal.with_displacement(config.displacement))
    }

    pub fn with_displacement(mut self, model: DisplacementModel) -> Self {
        self.displacement = model;
        self
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn displacement(&self) -> DisplacementModel {
        self.displacement
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn generate<W: PixelWriter + ?Sized>(&mut self, writer: &mut W) -> GenerationStats {
        generate(self.canvas, self.displacement, &mut self.rng, writer)
    }

    pub fn generate_from_corners<W: PixelWriter + ?Sized>(
        &mut self,
        corners: [f32; 4],
        writer: &mut W,
    ) -> GenerationStats {
        generate_from_corners(self.canvas, corners, self.displacement, &mut self.rng, writer)
    }

    // Split the root once, then render each quadrant on its own rayon worker
    // with an independent rng seeded from this one. Output is reproducible for
    // a fixed seed but differs from `generate` with the same seed.
    pub fn generate_parallel<W: PixelWriter + ?Sized>(
        &mut self,
        writer: &mut W,
    ) -> GenerationStats {
        let root = Cell::root(self.canvas, random_corners(&mut self.rng));
        if root.is_base() {
            return generate_from_corners(
                self.canvas,
                root.corners,
                self.displacement,
                &mut self.rng,
                writer,
            );
        }

        let span = debug_span!(
            "plasma_generate_parallel",
            width = self.canvas.width(),
            height = self.canvas.height()
        );
        let _enter = span.enter();

        let d = self.displacement.sample(
            &mut self.rng,
            root.width / 2.0,
            root.height / 2.0,
            self.canvas,
            root.depth,
        );
        let middle = displaced_middle(root.corners, d);
        let seeds: [u64; 4] = [
            self.rng.random(),
            self.rng.random(),
            self.rng.random(),
            self.rng.random(),
        ];

        let canvas = self.canvas;
        let model = self.displacement;
        let quadrants: Vec<(PixelRun, GenerationStats)> = root
            .split(middle)
            .into_par_iter()
            .zip(seeds)
            .enumerate()
            .map(|(i, (cell, seed))| {
                trace!(quadrant = i, seed, "rendering quadrant");
                let mut rng = StdRng::seed_from_u64(seed);
                let mut run = PixelRun::default();
                let mut sub = Subdivider {
                    canvas,
                    model,
                    rng: &mut rng,
                    writer: &mut run,
                    stats: GenerationStats::default(),
                };
                sub.subdivide(cell);
                let stats = sub.stats;
                (run, stats)
            })
            .collect();

        let mut stats = GenerationStats {
            pixels_written: 0,
            cells_visited: 1,
            max_depth: 0,
        };
        for (run, quadrant_stats) in quadrants {
            for (x, y, color) in run.0 {
                writer.write_pixel(x, y, color);
            }
            stats.merge(quadrant_stats);
        }
        stats
    }
}
