//! Synthetic chart images.
//!
//! Charts are white with optional solid black score rows, which the
//! darkest-line strategy finds in every column.

use base64::Engine;
use chart_scan::{CalibrationTemplate, ManualCalibration};
use std::io::Cursor;

/// Smallest accepted upload size.
pub const SMALL_UPLOAD: (u32, u32) = (1275, 825);

/// Size of the built-in calibration template.
pub const TEMPLATE_SIZE: (u32, u32) = (3000, 1200);

/// Row that maps to `percent` under the default template scaled to
/// `width` x `height`.
pub fn fixed_row(width: u32, height: u32, percent: f64) -> u32 {
    let points = CalibrationTemplate::default().scale_to(width as usize, height as usize);
    (points.y_zero - percent / 100.0 * (points.y_zero - points.y_hundred)).round() as u32
}

/// White chart with a black row at each of `rows`, encoded as PNG.
pub fn chart_png(width: u32, height: u32, rows: &[u32]) -> Vec<u8> {
    let image = image::RgbaImage::from_fn(width, height, |_, y| {
        if rows.contains(&y) {
            image::Rgba([0, 0, 0, 255])
        } else {
            image::Rgba([255, 255, 255, 255])
        }
    });
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, image::ImageFormat::Png)
        .expect("Failed to encode fixture");
    buf.into_inner()
}

/// White chart of the smallest upload size with a score row at 70%.
pub fn upload_chart_png() -> Vec<u8> {
    let (w, h) = SMALL_UPLOAD;
    chart_png(w, h, &[fixed_row(w, h, 70.0)])
}

pub fn to_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Manual calibration matching the default template geometry.
pub fn template_manual() -> ManualCalibration {
    let t = CalibrationTemplate::default();
    ManualCalibration {
        y_zero_percent: t.y_zero(),
        y_hundred_percent: t.y_hundred(),
        x_positions: t.x_positions().to_vec(),
        base_width: t.base_width(),
        base_height: t.base_height(),
    }
}
