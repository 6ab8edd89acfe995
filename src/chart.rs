//! Bar chart of the top rollups.
//!
//! Rendered directly into an RGB raster and saved as PNG; bars only, no text, so no font is
//! needed. Bars run left to right in descending `total_sales` order and are scaled to the largest.

use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage};

use crate::error::ChartError;
use crate::types::GroupedRow;

pub const CHART_WIDTH: u32 = 1000;
pub const CHART_HEIGHT: u32 = 600;
/// Bars drawn by default.
pub const DEFAULT_TOP_N: usize = 10;

const MARGIN_LEFT: u32 = 70;
const MARGIN_RIGHT: u32 = 30;
const MARGIN_TOP: u32 = 30;
const MARGIN_BOTTOM: u32 = 70;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([40, 40, 40]);
const GRID: Rgb<u8> = Rgb([225, 225, 225]);
const BAR: Rgb<u8> = Rgb([31, 119, 180]);

/// The `top_n` rollups with the largest `total_sales`, largest first.
pub fn top_groups(grouped: &[GroupedRow], top_n: usize) -> Vec<&GroupedRow> {
    let mut top: Vec<&GroupedRow> = grouped.iter().collect();
    top.sort_by(|a, b| b.total_sales.total_cmp(&a.total_sales));
    top.truncate(top_n);
    top
}

/// Draw the chart in memory.
pub fn draw_bar_chart(grouped: &[GroupedRow], top_n: usize) -> Result<RgbImage, ChartError> {
    let plot_w = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    // At most one bar per pixel column.
    let top = top_groups(grouped, top_n.min(plot_w as usize));
    if top.is_empty() {
        return Err(ChartError::Empty);
    }

    let mut img = RgbImage::from_pixel(CHART_WIDTH, CHART_HEIGHT, BACKGROUND);
    let plot_h = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + plot_h;

    for quarter in 1..=4 {
        let y = baseline - plot_h * quarter / 4;
        fill_rect(&mut img, MARGIN_LEFT, y, plot_w, 1, GRID);
    }

    let max = top
        .iter()
        .map(|g| g.total_sales)
        .fold(0.0_f64, f64::max);
    let slot = plot_w / top.len() as u32;
    let bar_w = (slot * 7 / 10).max(1);
    for (i, g) in top.iter().enumerate() {
        let ratio = if max > 0.0 { (g.total_sales / max).clamp(0.0, 1.0) } else { 0.0 };
        let h = (ratio * f64::from(plot_h)).round() as u32;
        let x = MARGIN_LEFT + slot * i as u32 + (slot - bar_w) / 2;
        fill_rect(&mut img, x, baseline - h, bar_w, h, BAR);
    }

    fill_rect(&mut img, MARGIN_LEFT, MARGIN_TOP, 2, plot_h + 1, AXIS);
    fill_rect(&mut img, MARGIN_LEFT, baseline, plot_w, 2, AXIS);
    Ok(img)
}

fn fill_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    let x_end = (x + w).min(img.width());
    let y_end = (y + h).min(img.height());
    for py in y..y_end {
        for px in x..x_end {
            img.put_pixel(px, py, color);
        }
    }
}

/// Render the chart for `grouped` to a PNG at `path`.
pub fn render_bar_chart(
    grouped: &[GroupedRow],
    path: impl AsRef<Path>,
    top_n: usize,
) -> Result<PathBuf, ChartError> {
    let path = path.as_ref();
    let img = draw_bar_chart(grouped, top_n)?;
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(path.to_path_buf())
}
