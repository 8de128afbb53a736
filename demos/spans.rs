//! Direct span output: render a conic blob without any bitmap

use tyra::prelude::*;

/// Prints every span batch as it arrives.
struct Printer;

impl SpanSink for Printer {
    fn spans(&mut self, y: i32, spans: &[Span]) {
        print!("y={y:3} ");
        for span in spans {
            print!(
                "[{}..{}]:{:02x} ",
                span.x,
                i32::from(span.x) + i32::from(span.len) - 1,
                span.coverage
            );
        }
        println!();
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // A 6x6-pixel drop shape: one on point and three conic controls.
    let mut outline = Outline::new();
    outline.add_contour(
        &[
            Point::from_raw(192, 0),
            Point::from_raw(384, 256),
            Point::from_raw(192, 384),
            Point::from_raw(0, 256),
        ],
        &[PointTag::ON, PointTag::CONIC, PointTag::CONIC, PointTag::CONIC],
    )?;

    let mut raster = GrayRaster::new(RenderPool::with_bytes(16 * 1024))?;
    let mut printer = Printer;
    raster.render_spans(outline.view()?, ClipBox::new(0, 0, 6, 6), &mut printer)?;
    Ok(())
}
