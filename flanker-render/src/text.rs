use ab_glyph::{point, Font, Glyph, PxScale, ScaleFont};
use tiny_skia::{Pixmap, PremultipliedColorU8};

/// Rasterize a line of text into a tightly bounded transparent pixmap.
/// Glyphs are laid out with kerning, baseline at the scaled ascent.
pub fn render_text_pixmap(text: &str, px: f32, font: &impl Font, color: [u8; 4]) -> Pixmap {
    let scale = PxScale::from(px);
    let scaled = font.as_scaled(scale);

    let mut pen_x = 0.0f32;
    let mut glyphs = Vec::<Glyph>::new();
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = glyphs.last() {
            pen_x += scaled.kern(prev.id, id);
        }
        glyphs.push(Glyph {
            id,
            scale,
            position: point(pen_x, scaled.ascent()),
        });
        pen_x += scaled.h_advance(id);
    }

    // Union of the outlined pixel bounds; whitespace-only text stays 1x1.
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for glyph in &glyphs {
        if let Some(outline) = font.outline_glyph(glyph.clone()) {
            let b = outline.px_bounds();
            min_x = min_x.min(b.min.x);
            min_y = min_y.min(b.min.y);
            max_x = max_x.max(b.max.x);
            max_y = max_y.max(b.max.y);
        }
    }
    if min_x == f32::INFINITY {
        return Pixmap::new(1, 1).expect("1x1 pixmap");
    }

    let width = (max_x.ceil() - min_x.floor()).max(1.0) as u32;
    let height = (max_y.ceil() - min_y.floor()).max(1.0) as u32;
    let mut pixmap = Pixmap::new(width, height).expect("text pixmap");

    let stride = pixmap.width() as usize;
    let pixels = pixmap.pixels_mut();

    for glyph in &glyphs {
        if let Some(outline) = font.outline_glyph(glyph.clone()) {
            let bounds = outline.px_bounds();
            outline.draw(|x, y, coverage| {
                if coverage <= f32::EPSILON {
                    return;
                }
                let px = (x as f32 + bounds.min.x - min_x).floor() as i32;
                let py = (y as f32 + bounds.min.y - min_y).floor() as i32;
                if px < 0 || py < 0 || px >= width as i32 || py >= height as i32 {
                    return;
                }
                let i = py as usize * stride + px as usize;

                // Premultiply by coverage; where glyph boxes overlap, keep
                // the denser coverage rather than compounding alpha.
                let alpha = (coverage * color[3] as f32 / 255.0).clamp(0.0, 1.0);
                let sa = (alpha * 255.0) as u8;
                if pixels[i].alpha() >= sa {
                    return;
                }
                let sr = (color[0] as f32 * alpha) as u8;
                let sg = (color[1] as f32 * alpha) as u8;
                let sb = (color[2] as f32 * alpha) as u8;
                if let Some(p) = PremultipliedColorU8::from_rgba(sr, sg, sb, sa) {
                    pixels[i] = p;
                }
            });
        }
    }

    pixmap
}
