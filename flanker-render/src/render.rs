use crate::text::render_text_pixmap;
use ab_glyph::FontVec;
use anyhow::{anyhow, Context, Result};
use flanker_core::scene::WHITE;
use flanker_core::DrawCmd;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tiny_skia::{Color, Paint, Pixmap, PixmapPaint, Rect, Transform};

/// Executes scene draw commands onto an offscreen canvas. Letter and banner
/// pixmaps are rasterized once and cached; shapes are filled directly.
pub struct SceneRenderer {
    width: u32,
    height: u32,
    font: FontVec,
    canvas: Pixmap,
    letter_cache: HashMap<(char, u32), Pixmap>,
    banner_cache: HashMap<(String, u32), Pixmap>,
}

impl SceneRenderer {
    pub fn new(width: u32, height: u32, font: FontVec) -> Result<Self> {
        let canvas = Pixmap::new(width, height)
            .ok_or_else(|| anyhow!("cannot allocate {width}x{height} canvas"))?;
        Ok(Self {
            width,
            height,
            font,
            canvas,
            letter_cache: HashMap::new(),
            banner_cache: HashMap::new(),
        })
    }

    /// Load the display font, trying the configured path first and then a
    /// few common system locations. A missing font is a setup error.
    pub fn load_font(configured: Option<&Path>) -> Result<FontVec> {
        let fallbacks = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/Library/Fonts/Arial.ttf",
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "C:\\Windows\\Fonts\\arial.ttf",
        ];
        let candidates: Vec<PathBuf> = configured
            .map(Path::to_path_buf)
            .into_iter()
            .chain(fallbacks.iter().map(PathBuf::from))
            .collect();

        for path in &candidates {
            if path.is_file() {
                let data = fs::read(path)
                    .with_context(|| format!("cannot read font {}", path.display()))?;
                return FontVec::try_from_vec(data)
                    .with_context(|| format!("cannot parse font {}", path.display()));
            }
        }
        Err(anyhow!(
            "no display font found; tried {}",
            candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.width = width;
        self.height = height;
        self.canvas = Pixmap::new(width, height)
            .ok_or_else(|| anyhow!("cannot allocate {width}x{height} canvas"))?;
        Ok(())
    }

    /// Compose one frame and return the canvas for presentation.
    pub fn render_scene(&mut self, scene: &[DrawCmd]) -> Result<&Pixmap> {
        self.canvas.fill(Color::from_rgba8(0, 0, 0, 255));

        for cmd in scene {
            match cmd {
                DrawCmd::FixationCross {
                    at,
                    size,
                    thickness,
                } => {
                    draw_fixation_cross(&mut self.canvas, *at, *size, *thickness, WHITE)?;
                }
                DrawCmd::GuideLine {
                    at,
                    length,
                    thickness,
                    color,
                } => {
                    // Vertical bar between target and flanker positions.
                    fill_centered_rect(&mut self.canvas, *at, *thickness, *length, *color)?;
                }
                DrawCmd::StimulusLetter { ch, at, height } => {
                    let key = (*ch, height.round() as u32);
                    let font = &self.font;
                    let pixmap = self
                        .letter_cache
                        .entry(key)
                        .or_insert_with(|| render_text_pixmap(&ch.to_string(), *height, font, WHITE));
                    blit_centered(&mut self.canvas, pixmap, *at);
                }
                DrawCmd::Banner { text, at, height } => {
                    let key = (text.clone(), height.round() as u32);
                    let font = &self.font;
                    let pixmap = self
                        .banner_cache
                        .entry(key)
                        .or_insert_with(|| render_text_pixmap(text, *height, font, WHITE));
                    blit_centered(&mut self.canvas, pixmap, *at);
                }
            }
        }

        Ok(&self.canvas)
    }
}

fn paint_for(color: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.anti_alias = false;
    paint.set_color(Color::from_rgba8(color[0], color[1], color[2], color[3]));
    paint
}

/// Fill a rect whose registration anchor is its center.
pub fn fill_centered_rect(
    canvas: &mut Pixmap,
    at: (f32, f32),
    width: f32,
    height: f32,
    color: [u8; 4],
) -> Result<()> {
    let rect = Rect::from_xywh(at.0 - width / 2.0, at.1 - height / 2.0, width, height)
        .ok_or_else(|| anyhow!("degenerate rect {width}x{height}"))?;
    canvas.fill_rect(rect, &paint_for(color), Transform::identity(), None);
    Ok(())
}

pub fn draw_fixation_cross(
    canvas: &mut Pixmap,
    at: (f32, f32),
    size: f32,
    thickness: f32,
    color: [u8; 4],
) -> Result<()> {
    fill_centered_rect(canvas, at, size, thickness, color)?;
    fill_centered_rect(canvas, at, thickness, size, color)?;
    Ok(())
}

fn blit_centered(canvas: &mut Pixmap, pixmap: &Pixmap, at: (f32, f32)) {
    let x = at.0 - pixmap.width() as f32 / 2.0;
    let y = at.1 - pixmap.height() as f32 / 2.0;
    canvas.draw_pixmap(
        x.round() as i32,
        y.round() as i32,
        pixmap.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_pixels(pixmap: &Pixmap) -> usize {
        pixmap.pixels().iter().filter(|p| p.alpha() > 0 && (p.red() > 0 || p.green() > 0 || p.blue() > 0)).count()
    }

    #[test]
    fn fixation_cross_marks_the_canvas_center() {
        let mut canvas = Pixmap::new(100, 100).unwrap();
        draw_fixation_cross(&mut canvas, (50.0, 50.0), 40.0, 4.0, WHITE).unwrap();
        assert!(lit_pixels(&canvas) > 0);
        let center = canvas.pixel(50, 50).unwrap();
        assert!(center.red() > 0);
        let corner = canvas.pixel(5, 5).unwrap();
        assert_eq!(corner.alpha(), 0);
    }

    #[test]
    fn guide_bar_is_vertical_at_its_anchor() {
        let mut canvas = Pixmap::new(200, 200).unwrap();
        fill_centered_rect(&mut canvas, (60.0, 100.0), 6.0, 120.0, [90, 90, 96, 255]).unwrap();
        assert!(canvas.pixel(60, 50).unwrap().alpha() > 0);
        assert!(canvas.pixel(60, 150).unwrap().alpha() > 0);
        assert_eq!(canvas.pixel(100, 100).unwrap().alpha(), 0);
    }

    #[test]
    fn degenerate_rect_is_an_error() {
        let mut canvas = Pixmap::new(10, 10).unwrap();
        assert!(fill_centered_rect(&mut canvas, (5.0, 5.0), 0.0, 10.0, WHITE).is_err());
    }

    #[test]
    fn letters_render_when_a_system_font_is_available() {
        let Ok(font) = SceneRenderer::load_font(None) else {
            // Headless environments without fonts skip this check.
            return;
        };
        let pixmap = render_text_pixmap("H", 45.0, &font, WHITE);
        assert!(pixmap.width() > 1 && pixmap.height() > 1);
        assert!(lit_pixels(&pixmap) > 0);
    }
}
