//! Plot rendering: turns a [`CurveDataset`] into a drawable scene.
//!
//! A [`PlotScene`] is backend-neutral. The viewer draws it with
//! `egui_plot`, the image exporters rasterize it with [`rasterize`] or
//! lay it out on a PDF page.

use ::image::{Rgba, RgbaImage};

use crate::parsers::CurveDataset;
use crate::state::{trace_color, EXPORT_HEIGHT, EXPORT_WIDTH};
use crate::units::format_engineering;

mod text;

pub use text::{draw_label, label_width};

/// Number of graticule divisions per axis
pub const DIVISIONS: u32 = 10;

/// How a dataset should be presented
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Open an interactive window instead of rendering off-screen
    pub visible: bool,
    pub width: u32,
    pub height: u32,
    pub colorblind: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            visible: false,
            width: EXPORT_WIDTH,
            height: EXPORT_HEIGHT,
            colorblind: false,
        }
    }
}

/// One trace as a connected line, in sample order
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    pub trace_index: usize,
    pub label: Option<String>,
    pub color: [u8; 3],
    pub points: Vec<[f64; 2]>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    pub trace_index: usize,
    pub label: String,
    pub color: [u8; 3],
}

/// Everything needed to draw one capture
#[derive(Clone, Debug, PartialEq)]
pub struct PlotScene {
    pub title: String,
    pub x_range: [f64; 2],
    pub y_range: [f64; 2],
    pub polylines: Vec<Polyline>,
    /// Gate values, highest first; empty when the capture has no bias axis
    pub legend: Vec<LegendEntry>,
    pub width: u32,
    pub height: u32,
}

/// Build the scene for a dataset
pub fn build_scene(dataset: &CurveDataset, title: &str, config: &RenderConfig) -> PlotScene {
    let (x_range, y_range) = dataset.axis_range();

    let polylines: Vec<Polyline> = dataset
        .traces
        .iter()
        .enumerate()
        .map(|(i, trace)| Polyline {
            trace_index: i,
            label: trace.gate_value.map(|g| {
                format!(
                    "{} = {}",
                    dataset.bias.symbol(),
                    format_engineering(g, &trace.gate_unit)
                )
            }),
            color: trace_color(i, config.colorblind),
            points: trace.samples.iter().map(|s| [s.voltage, s.current]).collect(),
        })
        .collect();

    let mut legend: Vec<(f64, LegendEntry)> = dataset
        .traces
        .iter()
        .zip(polylines.iter())
        .filter_map(|(trace, line)| {
            let gate = trace.gate_value?;
            let label = line.label.clone()?;
            Some((
                gate,
                LegendEntry {
                    trace_index: line.trace_index,
                    label,
                    color: line.color,
                },
            ))
        })
        .collect();
    legend.sort_by(|a, b| b.0.total_cmp(&a.0));

    PlotScene {
        title: title.to_string(),
        x_range,
        y_range,
        polylines,
        legend: legend.into_iter().map(|(_, entry)| entry).collect(),
        width: config.width,
        height: config.height,
    }
}

/// Pixel rectangle of the plotting area inside a raster
#[derive(Clone, Copy, Debug)]
struct ChartArea {
    left: i32,
    right: i32,
    top: i32,
    bottom: i32,
}

impl ChartArea {
    fn for_size(width: u32, height: u32) -> Self {
        Self {
            left: 80,
            right: width as i32 - 40,
            top: 60,
            bottom: height as i32 - 80,
        }
    }

    /// Map a data point to pixels, pinned to the chart edges when it lies
    /// outside the axis window
    fn project(&self, scene: &PlotScene, point: [f64; 2]) -> (i32, i32) {
        let x_ratio = axis_ratio(scene.x_range, point[0]);
        let y_ratio = axis_ratio(scene.y_range, point[1]);

        let x = self.left as f64 + x_ratio * (self.right - self.left) as f64;
        let y = self.bottom as f64 - y_ratio * (self.bottom - self.top) as f64;
        (x.round() as i32, y.round() as i32)
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

/// Axis span, falling back to 1 so degenerate scales still render.
/// A negative scale field gives a reversed range; its span is still positive.
pub(crate) fn span(range: [f64; 2]) -> f64 {
    let s = (range[1] - range[0]).abs();
    if s > 0.0 && s.is_finite() {
        s
    } else {
        1.0
    }
}

/// Lower edge of an axis range, whichever way round it was given
pub(crate) fn axis_origin(range: [f64; 2]) -> f64 {
    range[0].min(range[1])
}

/// Position of `value` along an axis as a fraction in `[0, 1]`
pub(crate) fn axis_ratio(range: [f64; 2], value: f64) -> f64 {
    let ratio = (value - axis_origin(range)) / span(range);
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

const BACKGROUND: Rgba<u8> = Rgba([30, 30, 30, 255]);
const CHART_BACKGROUND: Rgba<u8> = Rgba([40, 40, 40, 255]);
const GRID: Rgba<u8> = Rgba([70, 70, 70, 255]);
const LEGEND_BACKGROUND: Rgba<u8> = Rgba([20, 20, 20, 255]);
const LEGEND_TEXT: [u8; 3] = [220, 220, 220];

/// Render a scene to an RGBA image. The legend sits in the bottom-right
/// corner of the chart: one row per gate value, label then colour swatch.
pub fn rasterize(scene: &PlotScene) -> RgbaImage {
    let width = scene.width.max(200);
    let height = scene.height.max(200);
    let mut imgbuf = RgbaImage::from_pixel(width, height, BACKGROUND);
    let area = ChartArea::for_size(width, height);

    for y in area.top..area.bottom {
        for x in area.left..area.right {
            imgbuf.put_pixel(x as u32, y as u32, CHART_BACKGROUND);
        }
    }

    // Graticule
    for i in 0..=DIVISIONS as i32 {
        let x = area.left + (area.right - area.left) * i / DIVISIONS as i32;
        let y = area.bottom - (area.bottom - area.top) * i / DIVISIONS as i32;
        draw_line(&mut imgbuf, &area, (x, area.top), (x, area.bottom), GRID);
        draw_line(&mut imgbuf, &area, (area.left, y), (area.right, y), GRID);
    }

    for line in &scene.polylines {
        let color = Rgba([line.color[0], line.color[1], line.color[2], 255]);
        let mut prev: Option<(i32, i32)> = None;
        for &point in &line.points {
            let current = area.project(scene, point);
            if let Some(p) = prev {
                draw_line(&mut imgbuf, &area, p, current, color);
            }
            prev = Some(current);
        }
    }

    draw_legend(&mut imgbuf, &area, &scene.legend);

    imgbuf
}

/// Legend geometry shared by drawing and tests
const SWATCH: i32 = 14;
const GAP: i32 = 6;
const ROW: i32 = 22;

/// Top edge of legend row `index` out of `count`. The last row (lowest
/// gate value) sits against the bottom-right corner.
fn legend_row_top(area: &ChartArea, index: usize, count: usize) -> i32 {
    area.bottom - GAP - (count - index) as i32 * ROW + (ROW - SWATCH) / 2
}

fn draw_legend(img: &mut RgbaImage, area: &ChartArea, legend: &[LegendEntry]) {
    if legend.is_empty() {
        return;
    }

    let text_width = legend
        .iter()
        .map(|entry| label_width(&entry.label))
        .max()
        .unwrap_or(0);
    let swatch_left = area.right - GAP - SWATCH;
    let box_left = (swatch_left - GAP - text_width - GAP).max(area.left);
    let box_top = (area.bottom - GAP - legend.len() as i32 * ROW - GAP / 2).max(area.top);
    for y in box_top..area.bottom {
        for x in box_left..area.right {
            img.put_pixel(x as u32, y as u32, LEGEND_BACKGROUND);
        }
    }

    for (i, entry) in legend.iter().enumerate() {
        let y0 = legend_row_top(area, i, legend.len());
        let color = Rgba([entry.color[0], entry.color[1], entry.color[2], 255]);
        for y in y0..y0 + SWATCH {
            for x in swatch_left..swatch_left + SWATCH {
                if area.contains(x, y) {
                    img.put_pixel(x as u32, y as u32, color);
                }
            }
        }
        draw_label(
            img,
            &entry.label,
            (swatch_left - GAP, y0 + SWATCH / 2),
            LEGEND_TEXT,
        );
    }
}

/// Draw a line between two points using Bresenham's algorithm, clipped
/// to the chart area
fn draw_line(img: &mut RgbaImage, area: &ChartArea, from: (i32, i32), to: (i32, i32), color: Rgba<u8>) {
    let (x0, y0) = from;
    let (x1, y1) = to;
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx: i32 = if x0 < x1 { 1 } else { -1 };
    let sy: i32 = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    let (width, height) = img.dimensions();

    loop {
        if area.contains(x, y) && x < width as i32 && y < height as i32 {
            img.put_pixel(x as u32, y as u32, color);
        }

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::fixtures::CaptureBuilder;
    use crate::parsers::CurveTracer;

    fn dataset_with_ramp(trace_count: u8) -> CurveDataset {
        let mut builder = CaptureBuilder::new(trace_count)
            .gate_step(b"0.50  ", b' ', b'V')
            .gate_initial(b"1.00  ", b' ', b'V');
        let per_trace = 255 / trace_count as usize;
        for t in 0..trace_count as usize {
            for s in 0..per_trace {
                let v = (s * 10) as u16;
                let i = (s * (t + 1)) as u16;
                let [v0, v1] = v.to_be_bytes();
                let [i0, i1] = i.to_be_bytes();
                builder.set_sample(t, s, [v0, v1, i0, i1]);
            }
        }
        CurveTracer::parse_binary(&builder.build()).unwrap()
    }

    #[test]
    fn test_scene_axis_ranges_are_fixed() {
        let dataset = dataset_with_ramp(3);
        let scene = build_scene(&dataset, "ramp", &RenderConfig::default());
        assert_eq!(scene.x_range, [0.0, 10.0 * dataset.horizontal_scale]);
        assert_eq!(scene.y_range, [0.0, 10.0 * dataset.vertical_scale]);
    }

    #[test]
    fn test_scene_keeps_sample_order() {
        let dataset = dataset_with_ramp(2);
        let scene = build_scene(&dataset, "ramp", &RenderConfig::default());
        assert_eq!(scene.polylines.len(), 2);
        for (line, trace) in scene.polylines.iter().zip(&dataset.traces) {
            assert_eq!(line.points.len(), trace.samples.len());
            assert_eq!(line.points[1], [trace.samples[1].voltage, trace.samples[1].current]);
        }
    }

    #[test]
    fn test_legend_descends_by_gate_value() {
        let dataset = dataset_with_ramp(4);
        let scene = build_scene(&dataset, "ramp", &RenderConfig::default());
        let order: Vec<usize> = scene.legend.iter().map(|e| e.trace_index).collect();
        assert_eq!(order, vec![3, 2, 1, 0]);
        assert_eq!(scene.legend[0].label, "Vgs = 2.5 V");
        assert_eq!(scene.legend[3].label, "Vgs = 1 V");
    }

    #[test]
    fn test_no_legend_without_gate_values() {
        let builder = CaptureBuilder::new(2).gate_initial(b"0.00  ", b' ', b' ');
        let dataset = CurveTracer::parse_binary(&builder.build()).unwrap();
        let scene = build_scene(&dataset, "flat", &RenderConfig::default());
        assert!(scene.legend.is_empty());
        assert!(scene.polylines.iter().all(|l| l.label.is_none()));
    }

    #[test]
    fn test_rasterize_draws_traces() {
        let dataset = dataset_with_ramp(2);
        let config = RenderConfig {
            width: 400,
            height: 300,
            ..RenderConfig::default()
        };
        let scene = build_scene(&dataset, "ramp", &config);
        let img = rasterize(&scene);
        assert_eq!(img.dimensions(), (400, 300));

        let color = scene.polylines[0].color;
        let expected = Rgba([color[0], color[1], color[2], 255]);
        assert!(img.pixels().any(|p| *p == expected));
    }

    #[test]
    fn test_rasterize_degenerate_scale() {
        let builder = CaptureBuilder::new(1).horizontal(b"0.00  ", b' ', b'V');
        let dataset = CurveTracer::parse_binary(&builder.build()).unwrap();
        let scene = build_scene(&dataset, "zero", &RenderConfig::default());
        let img = rasterize(&scene);
        assert_eq!(img.dimensions(), (EXPORT_WIDTH, EXPORT_HEIGHT));
    }

    #[test]
    fn test_raster_legend_labels_each_row_highest_first() {
        let dataset = dataset_with_ramp(4);
        let config = RenderConfig {
            width: 800,
            height: 600,
            ..RenderConfig::default()
        };
        let scene = build_scene(&dataset, "ramp", &config);
        let img = rasterize(&scene);
        let area = ChartArea::for_size(800, 600);
        let swatch_left = area.right - GAP - SWATCH;

        let mut previous_top = i32::MIN;
        for (i, entry) in scene.legend.iter().enumerate() {
            let top = legend_row_top(&area, i, scene.legend.len());
            assert!(top > previous_top, "row {} is not below row {}", i, i - 1);
            previous_top = top;

            let centre = img.get_pixel((swatch_left + SWATCH / 2) as u32, (top + SWATCH / 2) as u32);
            assert_eq!(centre.0, [entry.color[0], entry.color[1], entry.color[2], 255]);

            let label_right = swatch_left - GAP;
            let label_left = label_right - label_width(&entry.label);
            let inked = (top..top + SWATCH).any(|y| {
                (label_left..label_right)
                    .any(|x| *img.get_pixel(x as u32, y as u32) != LEGEND_BACKGROUND)
            });
            assert!(inked, "no label text beside {}", entry.label);
        }
        // Highest gate value on top, lowest against the bottom edge
        assert_eq!(scene.legend[0].label, "Vgs = 2.5 V");
        assert_eq!(scene.legend[3].label, "Vgs = 1 V");
    }

    #[test]
    fn test_axis_ratio_handles_reversed_and_out_of_range() {
        assert_eq!(axis_ratio([0.0, -10.0], -5.0), 0.5);
        assert_eq!(axis_ratio([0.0, 10.0], 2.5), 0.25);
        assert_eq!(axis_ratio([0.0, 10.0], 1e9), 1.0);
        assert_eq!(axis_ratio([0.0, 10.0], -3.0), 0.0);
        assert_eq!(axis_ratio([0.0, 0.0], f64::NAN), 0.0);
    }

    #[test]
    fn test_rasterize_negative_scale_stays_on_canvas() {
        let mut builder = CaptureBuilder::new(1).horizontal(b"-1.00 ", b' ', b'V');
        for s in 0..255 {
            let [v0, v1] = ((s * 250) as u16).to_be_bytes();
            builder.set_sample(0, s, [v0, v1, 0, 100]);
        }
        let dataset = CurveTracer::parse_binary(&builder.build()).unwrap();
        assert_eq!(dataset.horizontal_scale, -1.0);

        let config = RenderConfig {
            width: 400,
            height: 300,
            ..RenderConfig::default()
        };
        let scene = build_scene(&dataset, "negative", &config);
        let area = ChartArea::for_size(400, 300);
        for &point in &scene.polylines[0].points {
            let (x, y) = area.project(&scene, point);
            assert!(area.contains(x, y), "{:?} projected to ({}, {})", point, x, y);
        }

        let img = rasterize(&scene);
        let color = scene.polylines[0].color;
        assert!(img.pixels().any(|p| p.0 == [color[0], color[1], color[2], 255]));
    }
}
