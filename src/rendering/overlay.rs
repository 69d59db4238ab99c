//! Debug overlay rasterization.
//!
//! Copies the analysed image into a pixmap, draws the overlay shapes with
//! tiny-skia, renders the text labels as an SVG layer with resvg and
//! encodes the result as an RGBA PNG.

use std::fmt::Write as _;
use std::io::Cursor;
use std::sync::{Arc, OnceLock};

use chart_scan::{Overlay, OverlayColor, OverlayShape, PixelBuffer};
use resvg::usvg::{self, fontdb};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Transform};

use crate::error::RenderError;

/// System fonts, loaded once on first use.
fn fonts() -> Arc<fontdb::Database> {
    static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            tracing::info!(font_count = db.len(), "Loaded fonts for overlay labels");
            Arc::new(db)
        })
        .clone()
}

/// Render `overlay` on top of `image` and return PNG bytes.
pub fn render_overlay(image: &PixelBuffer, overlay: &Overlay) -> Result<Vec<u8>, RenderError> {
    let mut pixmap = image_to_pixmap(image)?;
    let width = pixmap.width() as f32;
    let height = pixmap.height() as f32;

    for shape in &overlay.shapes {
        match *shape {
            OverlayShape::HorizontalLine {
                y,
                thickness,
                color,
            } => {
                let rect = Rect::from_xywh(
                    0.0,
                    y as f32 - thickness as f32 / 2.0,
                    width,
                    thickness as f32,
                );
                fill_rect(&mut pixmap, rect, color);
            }
            OverlayShape::VerticalMarker {
                x,
                thickness,
                color,
            } => {
                let rect = Rect::from_xywh(x as f32, 0.0, thickness as f32, height);
                fill_rect(&mut pixmap, rect, color);
            }
            OverlayShape::Point {
                x,
                y,
                radius,
                color,
            } => {
                if let Some(path) = PathBuilder::from_circle(x as f32, y as f32, radius as f32) {
                    pixmap.fill_path(
                        &path,
                        &paint(color),
                        FillRule::Winding,
                        Transform::identity(),
                        None,
                    );
                }
            }
            OverlayShape::Span {
                left,
                top,
                right,
                bottom,
                color,
            } => {
                let rect = Rect::from_ltrb(left as f32, top as f32, right as f32, bottom as f32);
                fill_rect(&mut pixmap, rect, color);
            }
            OverlayShape::Label { .. } => {}
        }
    }

    if let Some(svg) = label_svg(overlay) {
        draw_labels(&mut pixmap, &svg)?;
    }

    encode_png(&pixmap)
}

/// SVG document holding every label of `overlay`, or `None` without labels.
pub fn label_svg(overlay: &Overlay) -> Option<String> {
    let mut svg = String::new();
    for shape in overlay.labels() {
        if let OverlayShape::Label {
            x,
            y,
            text,
            size,
            color,
        } = shape
        {
            let [r, g, b, a] = color.rgba();
            let opacity = a as f64 / 255.0;
            let _ = write!(svg, r#"<text x="{x:.1}" y="{y:.1}" font-size="{size:.1}""#);
            let _ = write!(svg, r#" font-family="sans-serif" fill="rgb({r},{g},{b})""#);
            let _ = write!(svg, r#" fill-opacity="{opacity:.3}">{}</text>"#, escape_xml(text));
        }
    }
    if svg.is_empty() {
        return None;
    }
    Some(format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">{svg}</svg>"#,
        overlay.width, overlay.height
    ))
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

// Without usable fonts the text is dropped and the shapes still render.
fn draw_labels(pixmap: &mut Pixmap, svg: &str) -> Result<(), RenderError> {
    let options = usvg::Options {
        fontdb: fonts(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_data(svg.as_bytes(), &options)
        .map_err(|e| RenderError::SvgParse(e.to_string()))?;
    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
    Ok(())
}

fn paint(color: OverlayColor) -> Paint<'static> {
    let [r, g, b, a] = color.rgba();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

// Shapes that fall entirely outside the image produce no rect.
fn fill_rect(pixmap: &mut Pixmap, rect: Option<Rect>, color: OverlayColor) {
    if let Some(rect) = rect {
        pixmap.fill_rect(rect, &paint(color), Transform::identity(), None);
    }
}

fn image_to_pixmap(image: &PixelBuffer) -> Result<Pixmap, RenderError> {
    let unsupported = || RenderError::UnsupportedDimensions {
        width: image.width(),
        height: image.height(),
    };
    let width = u32::try_from(image.width()).map_err(|_| unsupported())?;
    let height = u32::try_from(image.height()).map_err(|_| unsupported())?;
    if width == 0 || height == 0 {
        return Err(unsupported());
    }

    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::PixmapAllocation)?;

    // tiny-skia stores premultiplied alpha.
    for (dst, src) in pixmap
        .data_mut()
        .chunks_exact_mut(4)
        .zip(image.samples().chunks_exact(4))
    {
        let a = src[3] as u16;
        dst[0] = ((src[0] as u16 * a + 127) / 255) as u8;
        dst[1] = ((src[1] as u16 * a + 127) / 255) as u8;
        dst[2] = ((src[2] as u16 * a + 127) / 255) as u8;
        dst[3] = src[3];
    }
    Ok(pixmap)
}

/// Encode a pixmap as straight-alpha RGBA8 PNG.
fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, RenderError> {
    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&rgba)
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}
