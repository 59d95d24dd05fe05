//! Figure export (PNG, JPEG, BMP, TIFF, PDF).

use printpdf::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

// Use fully qualified path to disambiguate from printpdf's image module
use ::image::DynamicImage;

use super::ImageFormat;
use crate::error::{ExportError, Result};
use crate::render::{axis_ratio, rasterize, PlotScene, DIVISIONS};

/// Save a rendered scene in the requested format
pub fn save_image(scene: &PlotScene, format: ImageFormat, path: &Path) -> Result<()> {
    match format.raster_format() {
        Some(raster) => {
            let img = DynamicImage::ImageRgba8(rasterize(scene)).into_rgb8();
            img.save_with_format(path, raster)
                .map_err(|e| ExportError::write_failed(path, e))?;
        }
        None => render_pdf(scene, path).map_err(|e| ExportError::write_failed(path, e))?,
    }
    Ok(())
}

/// Render the scene onto an A4 landscape PDF page
fn render_pdf(scene: &PlotScene, path: &Path) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let (doc, page1, layer1) = PdfDocument::new(&scene.title, Mm(297.0), Mm(210.0), "Curves");
    let current_layer = doc.get_page(page1).get_layer(layer1);

    // Chart dimensions in mm (A4 landscape with margins, legend column on the right)
    let margin: f64 = 20.0;
    let chart_left: f64 = margin;
    let chart_right: f64 = 297.0 - margin - 45.0;
    let chart_bottom: f64 = margin + 10.0;
    let chart_top: f64 = 210.0 - margin - 20.0;

    let chart_width: f64 = chart_right - chart_left;
    let chart_height: f64 = chart_top - chart_bottom;

    let font = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    current_layer.use_text(&scene.title, 16.0, Mm(margin as f32), Mm(200.0), &font);
    let subtitle = format!(
        "{} traces | {:.3e} V/div | {:.3e} A/div",
        scene.polylines.len(),
        (scene.x_range[1] - scene.x_range[0]) / DIVISIONS as f64,
        (scene.y_range[1] - scene.y_range[0]) / DIVISIONS as f64,
    );
    current_layer.use_text(&subtitle, 10.0, Mm(margin as f32), Mm(192.0), &font_regular);

    // Graticule
    current_layer.set_outline_color(Color::Rgb(Rgb::new(0.8, 0.8, 0.8, None)));
    current_layer.set_outline_thickness(0.25);
    for i in 0..=DIVISIONS {
        let x = chart_left + chart_width * i as f64 / DIVISIONS as f64;
        let y = chart_bottom + chart_height * i as f64 / DIVISIONS as f64;
        current_layer.add_line(segment((x, chart_bottom), (x, chart_top)));
        current_layer.add_line(segment((chart_left, y), (chart_right, y)));
    }

    // Border
    current_layer.set_outline_color(Color::Rgb(Rgb::new(0.3, 0.3, 0.3, None)));
    current_layer.set_outline_thickness(0.5);
    current_layer.add_line(Line {
        points: vec![
            (Point::new(Mm(chart_left as f32), Mm(chart_bottom as f32)), false),
            (Point::new(Mm(chart_right as f32), Mm(chart_bottom as f32)), false),
            (Point::new(Mm(chart_right as f32), Mm(chart_top as f32)), false),
            (Point::new(Mm(chart_left as f32), Mm(chart_top as f32)), false),
        ],
        is_closed: true,
    });

    for polyline in &scene.polylines {
        current_layer.set_outline_color(pdf_color(polyline.color));
        current_layer.set_outline_thickness(0.75);

        let points: Vec<(Point, bool)> = polyline
            .points
            .iter()
            .map(|p| {
                // Clamp to the fixed axis window; the instrument can report past full scale
                let x_ratio = axis_ratio(scene.x_range, p[0]);
                let y_ratio = axis_ratio(scene.y_range, p[1]);
                let x = chart_left + x_ratio * chart_width;
                let y = chart_bottom + y_ratio * chart_height;
                (Point::new(Mm(x as f32), Mm(y as f32)), false)
            })
            .collect();

        if points.len() >= 2 {
            current_layer.add_line(Line {
                points,
                is_closed: false,
            });
        }
    }

    // Legend, highest gate value at the top, lowest nearest the bottom-right
    let legend_x = chart_right + 5.0;
    let line_height = 5.0;
    let count = scene.legend.len() as f64;
    for (i, entry) in scene.legend.iter().enumerate() {
        let y = chart_bottom + (count - 1.0 - i as f64) * line_height;
        if y > chart_top {
            continue;
        }
        current_layer.set_fill_color(pdf_color(entry.color));
        current_layer.use_text(
            &entry.label,
            8.0,
            Mm(legend_x as f32),
            Mm(y as f32),
            &font_regular,
        );
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer)?;

    Ok(())
}

fn segment(from: (f64, f64), to: (f64, f64)) -> Line {
    Line {
        points: vec![
            (Point::new(Mm(from.0 as f32), Mm(from.1 as f32)), false),
            (Point::new(Mm(to.0 as f32), Mm(to.1 as f32)), false),
        ],
        is_closed: false,
    }
}

fn pdf_color(rgb: [u8; 3]) -> Color {
    Color::Rgb(Rgb::new(
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
        None,
    ))
}
