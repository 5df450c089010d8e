use plasma_core::{Canvas, PixelBuffer, PlasmaFractal, to_rgb8};

fn main() {
    // 64×32 plasma with seed 2025, drawn with truecolor half blocks
    let canvas = Canvas::new(64, 32).expect("non-zero canvas");
    let mut buffer = PixelBuffer::new(canvas);
    let stats = PlasmaFractal::new(canvas, 2025).generate(&mut buffer);

    // Each text row shows two pixel rows: foreground is the top, background the bottom
    let rows = buffer.rows();
    for pair in rows.chunks(2) {
        for x in 0..pair[0].len() {
            let [tr, tg, tb] = to_rgb8(pair[0][x]);
            let [br, bg, bb] = pair.get(1).map(|row| to_rgb8(row[x])).unwrap_or([0, 0, 0]);
            print!("\x1b[38;2;{tr};{tg};{tb}m\x1b[48;2;{br};{bg};{bb}m▀");
        }
        println!("\x1b[0m");
    }

    println!(
        "{} pixels, {} cells, depth {}",
        stats.pixels_written, stats.cells_visited, stats.max_depth
    );
}
