//! Output modes and per-file export dispatch.
//!
//! The decoder never looks at the output mode; everything downstream of a
//! [`CurveDataset`] is chosen here.

pub mod csv;
pub mod image;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use strum::EnumString;

use crate::error::{ExportError, Result};
use crate::parsers::CurveDataset;
use crate::render::{build_scene, RenderConfig};
use crate::state::LoadedFile;

/// Figure file formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ImageFormat {
    #[strum(serialize = "png")]
    Png,
    #[strum(serialize = "jpeg", serialize = "jpg")]
    Jpeg,
    #[strum(serialize = "bmp")]
    Bmp,
    #[strum(serialize = "tiff", serialize = "tif")]
    Tiff,
    #[strum(serialize = "pdf")]
    Pdf,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 5] = [
        ImageFormat::Png,
        ImageFormat::Jpeg,
        ImageFormat::Bmp,
        ImageFormat::Tiff,
        ImageFormat::Pdf,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Tiff => "tif",
            ImageFormat::Pdf => "pdf",
        }
    }

    /// Raster encoder for this format, `None` for vector output
    pub fn raster_format(&self) -> Option<::image::ImageFormat> {
        match self {
            ImageFormat::Png => Some(::image::ImageFormat::Png),
            ImageFormat::Jpeg => Some(::image::ImageFormat::Jpeg),
            ImageFormat::Bmp => Some(::image::ImageFormat::Bmp),
            ImageFormat::Tiff => Some(::image::ImageFormat::Tiff),
            ImageFormat::Pdf => None,
        }
    }
}

/// What to do with each decoded capture
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Show the curves in an interactive window
    #[default]
    Plot,
    Csv,
    Json,
    /// Decode only
    None,
    Image(ImageFormat),
}

impl FromStr for OutputMode {
    type Err = ExportError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plot" => Ok(OutputMode::Plot),
            "csv" => Ok(OutputMode::Csv),
            "json" => Ok(OutputMode::Json),
            "none" => Ok(OutputMode::None),
            other => ImageFormat::from_str(other)
                .map(OutputMode::Image)
                .map_err(|_| ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl OutputMode {
    /// True when the mode produces a file per capture
    pub fn writes_files(&self) -> bool {
        matches!(
            self,
            OutputMode::Csv | OutputMode::Json | OutputMode::Image(_)
        )
    }
}

/// `<dir>/<stem>.<ext>`
pub fn output_path(out_dir: &Path, stem: &str, extension: &str) -> PathBuf {
    out_dir.join(format!("{}.{}", stem, extension))
}

/// Write the dataset as pretty-printed JSON
pub fn write_json(dataset: &CurveDataset, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| ExportError::write_failed(path, e))?;
    serde_json::to_writer_pretty(BufWriter::new(file), dataset)
        .map_err(|e| ExportError::write_failed(path, e))?;
    Ok(())
}

/// Produce the artifact for one capture, returning where it was written.
/// Modes that do not write files return `Ok(None)`.
pub fn export_file(
    file: &LoadedFile,
    mode: OutputMode,
    out_dir: &Path,
    config: &RenderConfig,
) -> Result<Option<PathBuf>> {
    let stem = file.stem();
    let path = match mode {
        OutputMode::Plot | OutputMode::None => return Ok(None),
        OutputMode::Csv => {
            let path = output_path(out_dir, &stem, "csv");
            csv::write_csv(&file.dataset, &path)?;
            path
        }
        OutputMode::Json => {
            let path = output_path(out_dir, &stem, "json");
            write_json(&file.dataset, &path)?;
            path
        }
        OutputMode::Image(format) => {
            let path = output_path(out_dir, &stem, format.extension());
            let scene = build_scene(&file.dataset, &file.name, config);
            image::save_image(&scene, format, &path)?;
            path
        }
    };
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::fixtures::CaptureBuilder;
    use crate::parsers::CurveTracer;

    #[test]
    fn test_parse_output_modes() {
        assert_eq!("plot".parse::<OutputMode>().unwrap(), OutputMode::Plot);
        assert_eq!("CSV".parse::<OutputMode>().unwrap(), OutputMode::Csv);
        assert_eq!("none".parse::<OutputMode>().unwrap(), OutputMode::None);
        assert!(!OutputMode::None.writes_files());
        assert!(!OutputMode::Plot.writes_files());
        assert!(OutputMode::Csv.writes_files());
        assert!(OutputMode::Image(ImageFormat::Pdf).writes_files());
        assert_eq!("json".parse::<OutputMode>().unwrap(), OutputMode::Json);
        assert_eq!(
            "png".parse::<OutputMode>().unwrap(),
            OutputMode::Image(ImageFormat::Png)
        );
        assert_eq!(
            "jpg".parse::<OutputMode>().unwrap(),
            OutputMode::Image(ImageFormat::Jpeg)
        );
        assert_eq!(
            "TIF".parse::<OutputMode>().unwrap(),
            OutputMode::Image(ImageFormat::Tiff)
        );

        let err = "gif".parse::<OutputMode>().unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat(ref f) if f == "gif"));
    }

    #[test]
    fn test_every_format_has_an_extension() {
        for format in ImageFormat::ALL {
            let parsed: ImageFormat = format.extension().parse().unwrap();
            assert_eq!(parsed, format);
        }
    }

    #[test]
    fn test_export_file_names_follow_input() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = CurveTracer::parse_binary(&CaptureBuilder::new(2).build()).unwrap();
        let file = LoadedFile::new(PathBuf::from("/captures/BC547.crv"), dataset);
        let config = RenderConfig {
            width: 300,
            height: 200,
            ..RenderConfig::default()
        };

        let csv = export_file(&file, OutputMode::Csv, dir.path(), &config).unwrap();
        assert_eq!(csv, Some(dir.path().join("BC547.csv")));

        let json = export_file(&file, OutputMode::Json, dir.path(), &config).unwrap();
        assert_eq!(json, Some(dir.path().join("BC547.json")));
        let text = std::fs::read_to_string(dir.path().join("BC547.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["traces"].as_array().unwrap().len(), 2);

        let png = export_file(
            &file,
            OutputMode::Image(ImageFormat::Png),
            dir.path(),
            &config,
        )
        .unwrap();
        assert_eq!(png, Some(dir.path().join("BC547.png")));
        assert!(dir.path().join("BC547.png").exists());

        let none = export_file(&file, OutputMode::None, dir.path(), &config).unwrap();
        assert_eq!(none, None);
    }
}
