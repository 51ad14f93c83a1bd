use image::{Rgba, RgbaImage};

use crate::selector::SelectionRect;

/// Stroke and fill color of the selection overlay (#dc2626).
const SELECTION_RGB: [u8; 3] = [220, 38, 38];
/// Opacity of the semi-transparent fill.
const FILL_ALPHA: f32 = 0.2;
/// Outline thickness in pixels.
const STROKE_WIDTH: u32 = 3;
/// Dash pattern: 5 px on, 5 px off.
const DASH_PERIOD: u32 = 10;
const DASH_ON: u32 = 5;

/// Renders the selection overlay onto a copy of the base image: the base is
/// redrawn, then a dashed outline and a semi-transparent fill mark the
/// candidate redaction region.
///
/// The rectangle is clamped to the image bounds for drawing only; the
/// selection itself is never mutated here.
pub(crate) fn render_overlay(base: &RgbaImage, rect: &SelectionRect) -> RgbaImage {
    let mut surface = base.clone();
    let (img_w, img_h) = surface.dimensions();

    let x0 = clamp_coord(rect.x, img_w);
    let y0 = clamp_coord(rect.y, img_h);
    let x1 = clamp_coord(rect.x + rect.width, img_w);
    let y1 = clamp_coord(rect.y + rect.height, img_h);

    if x1 <= x0 || y1 <= y0 {
        // Degenerate on-screen area: nothing to draw.
        return surface;
    }

    for y in y0..y1 {
        for x in x0..x1 {
            blend_fill(surface.get_pixel_mut(x, y));
        }
    }

    draw_dashed_outline(&mut surface, x0, y0, x1, y1);

    surface
}

fn clamp_coord(value: f32, max: u32) -> u32 {
    value.round().clamp(0.0, max as f32) as u32
}

/// Blends the fill color over a pixel at `FILL_ALPHA`.
fn blend_fill(pixel: &mut Rgba<u8>) {
    for channel in 0..3 {
        let dst = f32::from(pixel.0[channel]);
        let src = f32::from(SELECTION_RGB[channel]);
        pixel.0[channel] = (dst * (1.0 - FILL_ALPHA) + src * FILL_ALPHA).round() as u8;
    }
    pixel.0[3] = 255;
}

/// Draws the dashed rectangle outline, `STROKE_WIDTH` px thick, inside the
/// clamped selection bounds.
fn draw_dashed_outline(surface: &mut RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32) {
    let stroke = Rgba([SELECTION_RGB[0], SELECTION_RGB[1], SELECTION_RGB[2], 255]);
    let thickness = STROKE_WIDTH.min(x1 - x0).min(y1 - y0);

    // Horizontal edges.
    for x in x0..x1 {
        if !dash_on(x - x0) {
            continue;
        }
        for t in 0..thickness {
            surface.put_pixel(x, y0 + t, stroke);
            surface.put_pixel(x, y1 - 1 - t, stroke);
        }
    }

    // Vertical edges.
    for y in y0..y1 {
        if !dash_on(y - y0) {
            continue;
        }
        for t in 0..thickness {
            surface.put_pixel(x0 + t, y, stroke);
            surface.put_pixel(x1 - 1 - t, y, stroke);
        }
    }
}

fn dash_on(offset: u32) -> bool {
    offset % DASH_PERIOD < DASH_ON
}
