//! Basic example: rasterize a shape into a gray bitmap and print it

use tyra::prelude::*;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // An 8x8-pixel "O": two nested squares, even-odd filled, in 26.6
    // coordinates (64 units per pixel).
    let mut outline = Outline::with_flags(OutlineFlags::EVEN_ODD_FILL);
    outline.add_polygon(&[
        Point::from_raw(0, 0),
        Point::from_raw(512, 0),
        Point::from_raw(512, 512),
        Point::from_raw(0, 512),
    ])?;
    outline.add_polygon(&[
        Point::from_raw(128, 128),
        Point::from_raw(384, 128),
        Point::from_raw(384, 384),
        Point::from_raw(128, 384),
    ])?;

    let mut raster = GrayRaster::new(RenderPool::with_bytes(16 * 1024))?;
    let mut pixels = vec![0u8; 8 * 8];
    let mut bitmap = Bitmap::new_gray(8, 8, &mut pixels)?;
    raster.render(outline.view()?, &mut bitmap)?;

    // Positive pitch: the buffer already runs top row first.
    for row in pixels.chunks(8) {
        let line: String = row
            .iter()
            .map(|&c| match c {
                0 => ' ',
                1..=84 => '.',
                85..=169 => '+',
                _ => '#',
            })
            .collect();
        println!("{line}");
    }
    Ok(())
}
