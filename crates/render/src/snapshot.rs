//! PNG output for rendered frames.
//!
//! This module is feature-gated behind `png` (default on) so that the
//! rendering pipeline can be used without pulling in the `image` crate.

use fractal_core::RenderError;
use std::path::{Path, PathBuf};

use crate::animation::FramePlan;
use crate::pixel::Raster;

/// Encodes a raster as PNG and writes it to `path`, consuming the buffer.
///
/// Returns `RenderError::Encode` if the buffer cannot be turned into an
/// image and `RenderError::Write` if the file cannot be written.
pub fn write_png(raster: Raster, path: &Path) -> Result<(), RenderError> {
    let dims = RenderError::InvalidDimensions {
        width: raster.width(),
        height: raster.height(),
    };
    let w = u32::try_from(raster.width()).map_err(|_| RenderError::Encode(dims.to_string()))?;
    let h = u32::try_from(raster.height()).map_err(|_| RenderError::Encode(dims.to_string()))?;
    let img = image::RgbaImage::from_raw(w, h, raster.into_data())
        .ok_or_else(|| RenderError::Encode("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| match e {
        image::ImageError::IoError(io) => RenderError::Write {
            path: path.to_path_buf(),
            message: io.to_string(),
        },
        other => RenderError::Encode(other.to_string()),
    })
}

/// Writes each frame of a run as `<prefix>_<stamp>.png`, or
/// `<prefix>_<stamp>_<frame:04>.png` when the run has several frames.
#[derive(Debug, Clone)]
pub struct PngSink {
    dir: PathBuf,
    prefix: String,
    stamp: u64,
    numbered: bool,
}

impl PngSink {
    /// Creates the output directory if needed.
    pub fn new(dir: &Path, prefix: &str, stamp: u64, numbered: bool) -> Result<Self, RenderError> {
        std::fs::create_dir_all(dir).map_err(|e| RenderError::Write {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
            prefix: prefix.to_owned(),
            stamp,
            numbered,
        })
    }

    /// Output path for frame `index`.
    pub fn path_for(&self, index: usize) -> PathBuf {
        let name = if self.numbered {
            format!("{}_{}_{:04}.png", self.prefix, self.stamp, index)
        } else {
            format!("{}_{}.png", self.prefix, self.stamp)
        };
        self.dir.join(name)
    }

    /// Writes one frame, returning the path written.
    pub fn write(&self, plan: &FramePlan, raster: Raster) -> Result<PathBuf, RenderError> {
        let path = self.path_for(plan.index);
        write_png(raster, &path)?;
        tracing::debug!(path = %path.display(), "saved frame");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationDriver;
    use fractal_core::RenderConfig;
    use serde_json::json;

    #[test]
    fn write_png_round_trip() {
        let mut raster = Raster::new(3, 2).unwrap();
        let o = raster.offset(2, 1);
        raster.data_mut()[o..o + 4].copy_from_slice(&[10, 20, 30, 255]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.png");
        let expected = raster.data().to_vec();

        write_png(raster, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!((img.width(), img.height()), (3, 2));
        assert_eq!(img.get_pixel(2, 1).0, [10, 20, 30, 255]);
        assert_eq!(img.into_raw(), expected);
    }

    #[test]
    fn write_into_missing_directory_is_write_error() {
        let raster = Raster::new(2, 2).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("x.png");
        let err = write_png(raster, &path).unwrap_err();
        assert!(matches!(err, RenderError::Write { .. }), "got {err:?}");
        assert!(!err.is_config());
    }

    #[test]
    fn sink_names_single_and_numbered_frames() {
        let dir = tempfile::tempdir().unwrap();
        let still = PngSink::new(dir.path(), "julia", 1700000000, false).unwrap();
        assert_eq!(still.path_for(0), dir.path().join("julia_1700000000.png"));
        let anim = PngSink::new(dir.path(), "julia", 1700000000, true).unwrap();
        assert_eq!(anim.path_for(7), dir.path().join("julia_1700000000_0007.png"));
    }

    #[test]
    fn sink_creates_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("frames");
        PngSink::new(&out, "mandelbrot", 1, false).unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn animation_writes_every_frame() {
        let dir = tempfile::tempdir().unwrap();
        let config = RenderConfig::from_json(&json!({
            "Width": 8, "Height": 6, "MaxIterations": 16,
            "Animate": true, "FrameCount": 3,
            "AnimateScale": true, "ScaleXEnd": 2.0, "ScaleYEnd": 2.0,
        }))
        .unwrap();
        let sink = PngSink::new(dir.path(), &config.file_prefix, 42, true).unwrap();
        let mut written = Vec::new();
        let count = AnimationDriver::new(&config)
            .run(|plan, raster| -> Result<(), RenderError> {
                written.push(sink.write(plan, raster)?);
                Ok(())
            })
            .unwrap();
        assert_eq!(count, 3);
        for (i, path) in written.iter().enumerate() {
            assert_eq!(path, &dir.path().join(format!("julia_42_{i:04}.png")));
            let img = image::open(path).unwrap();
            assert_eq!((img.width(), img.height()), (8, 6));
        }
    }
}
