use palette::Srgb;

// Color produced for every pixel. Channels are nominally in [0, 1] but are
// not clamped here, see `scalar_to_color`.
pub type PlasmaColor = Srgb<f32>;

const RED_PEAK: f32 = 0.5;
const GREEN_LOW: f32 = 0.3;
const GREEN_PEAK: f32 = 0.8;
const BLUE_LOW: f32 = 0.5;

// Map a plasma scalar to a color using three staggered triangle waves.
// Inputs outside [0, 1] extrapolate linearly, so channels can leave [0, 1];
// `to_rgb8` is where they finally get clamped.
pub fn scalar_to_color(c: f32) -> PlasmaColor {
    let red = if c < RED_PEAK { c * 2.0 } else { (1.0 - c) * 2.0 };

    let green = match c {
        x if x < GREEN_LOW => (GREEN_LOW - x) * 2.0,
        x if x < GREEN_PEAK => (x - GREEN_LOW) * 2.0,
        x => (1.3 - x) * 2.0,
    };

    let blue = if c < BLUE_LOW {
        (BLUE_LOW - c) * 2.0
    } else {
        (c - BLUE_LOW) * 2.0
    };

    Srgb::new(red, green, blue)
}

// floor(256 * v) clamped to a byte, so 1.0 lands on 255
#[inline]
fn quantize(v: f32) -> u8 {
    (v * 256.0).floor().clamp(0.0, 255.0) as u8
}

// Quantize a color to 8-bit RGB
pub fn to_rgb8(color: PlasmaColor) -> [u8; 3] {
    [
        quantize(color.red),
        quantize(color.green),
        quantize(color.blue),
    ]
}

#[cfg(test)]
mod tests {
    use super::{scalar_to_color, to_rgb8};

    fn assert_rgb(c: f32, expected: (f32, f32, f32)) {
        let col = scalar_to_color(c);
        let eps = 1e-6;
        assert!(
            (col.red - expected.0).abs() < eps
                && (col.green - expected.1).abs() < eps
                && (col.blue - expected.2).abs() < eps,
            "scalar {} mapped to ({}, {}, {}), expected {:?}",
            c,
            col.red,
            col.green,
            col.blue,
            expected
        );
    }

    #[test]
    fn color_boundaries() {
        assert_rgb(0.0, (0.0, 0.6, 1.0));
        assert_rgb(0.5, (1.0, 0.4, 0.0));
        assert_rgb(1.0, (0.0, 0.6, 1.0));
    }

    #[test]
    fn color_green_breakpoints() {
        // green bottoms out at 0.3 and peaks at 0.8
        assert_rgb(0.3, (0.6, 0.0, 0.4));
        assert_rgb(0.8, (0.4, 1.0, 0.6));
    }

    #[test]
    fn color_channels_in_unit_range() {
        for i in 0..=10_000 {
            let c = i as f32 / 10_000.0;
            let col = scalar_to_color(c);
            for v in [col.red, col.green, col.blue] {
                assert!(
                    (-1e-6..=1.0 + 1e-6).contains(&v),
                    "channel {} out of range for {}",
                    v,
                    c
                );
            }
        }
    }

    #[test]
    fn color_extrapolates_outside_unit() {
        // kept as-is: no clamping in the mapper
        let col = scalar_to_color(-0.25);
        assert!(col.red < 0.0);
        assert!(col.blue > 1.0);
        let col = scalar_to_color(1.5);
        assert!(col.red < 0.0);
        assert!(col.green < 0.0);
        assert!(col.blue > 1.0);
    }

    #[test]
    fn rgb8_quantization() {
        assert_eq!(to_rgb8(scalar_to_color(0.0)), [0, 153, 255]);
        assert_eq!(to_rgb8(scalar_to_color(0.5)), [255, 102, 0]);
        // out-of-range channels saturate
        assert_eq!(to_rgb8(scalar_to_color(1.5)), [0, 0, 255]);
    }
}
