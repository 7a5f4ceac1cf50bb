use futures::channel::oneshot;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::error::ExportError;
use crate::util::time;

pub const DEFAULT_FILE_PREFIX: &str = "Drawing";
pub const DEFAULT_PNG_QUALITY: u8 = 90;

/// Where and how exported drawings are written
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    pub directory: PathBuf,
    pub file_prefix: String,
    /// 0-100, mapped onto the PNG compression level
    pub quality: u8,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            directory: std::env::temp_dir(),
            file_prefix: DEFAULT_FILE_PREFIX.to_owned(),
            quality: DEFAULT_PNG_QUALITY,
        }
    }
}

impl ExportSettings {
    /// `<prefix>_<epoch-seconds>.png`
    pub fn file_name(&self, timestamp_secs: u64) -> String {
        format!("{}_{}.png", self.file_prefix, timestamp_secs)
    }

    pub fn path_for(&self, timestamp_secs: u64) -> PathBuf {
        self.directory.join(self.file_name(timestamp_secs))
    }
}

/// PNG is lossless, so the quality knob only trades size for speed
fn compression_for(quality: u8) -> CompressionType {
    match quality {
        90.. => CompressionType::Best,
        50..=89 => CompressionType::Default,
        _ => CompressionType::Fast,
    }
}

/// Encode an RGBA buffer as PNG bytes
pub fn encode_png(image: &RgbaImage, quality: u8) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut bytes, compression_for(quality), FilterType::Adaptive);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(bytes)
}

/// Encode and write synchronously. Returns the path that was written.
pub fn write_png(image: &RgbaImage, path: &Path, quality: u8) -> Result<PathBuf, ExportError> {
    let bytes = encode_png(image, quality)?;

    let write_error = |source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, &bytes).map_err(write_error)?;

    log::info!("Saved drawing to {} ({} bytes)", path.display(), bytes.len());
    Ok(path.to_path_buf())
}

/// Runs the encode-and-write step off the drawing thread.
pub struct Exporter;

impl Exporter {
    /// Moves `image` into a worker thread and starts writing it.
    ///
    /// The worker owns its pixels outright, so the surface that produced
    /// them can be dropped while the export is still running.
    pub fn spawn(image: RgbaImage, settings: &ExportSettings) -> ExportHandle {
        let path = settings.path_for(time::timestamp_secs());
        let quality = settings.quality;
        let (sender, receiver) = oneshot::channel();

        let spawned = std::thread::Builder::new()
            .name("drawing-export".to_owned())
            .spawn({
                let path = path.clone();
                move || {
                    let result = write_png(&image, &path, quality);
                    if let Err(err) = &result {
                        log::error!("Export failed: {err}");
                    }
                    // The receiver may be gone if nobody is waiting any more
                    let _ = sender.send(result);
                }
            });

        if let Err(err) = spawned {
            log::error!("Failed to start export thread: {err}");
        }

        ExportHandle {
            path,
            receiver,
            finished: false,
        }
    }
}

/// Pending export. Resolves to the written path.
pub struct ExportHandle {
    path: PathBuf,
    receiver: oneshot::Receiver<Result<PathBuf, ExportError>>,
    finished: bool,
}

impl ExportHandle {
    /// Destination the worker is writing to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Non-blocking check, suitable for calling once per frame.
    /// Returns `Some` exactly once.
    pub fn try_result(&mut self) -> Option<Result<PathBuf, ExportError>> {
        if self.finished {
            return None;
        }
        let result = match self.receiver.try_recv() {
            Ok(Some(result)) => result,
            Ok(None) => return None,
            Err(oneshot::Canceled) => Err(ExportError::Cancelled),
        };
        self.finished = true;
        Some(result)
    }

    /// Block the current thread until the export finishes
    pub fn wait(self) -> Result<PathBuf, ExportError> {
        futures::executor::block_on(self)
    }
}

impl Future for ExportHandle {
    type Output = Result<PathBuf, ExportError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err(ExportError::Cancelled)),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_file_name_embeds_timestamp() {
        let settings = ExportSettings {
            directory: PathBuf::from("/tmp/drawings"),
            ..ExportSettings::default()
        };
        assert_eq!(settings.file_name(1_700_000_000), "Drawing_1700000000.png");
        assert_eq!(
            settings.path_for(42),
            PathBuf::from("/tmp/drawings/Drawing_42.png")
        );
    }

    #[test]
    fn test_quality_maps_to_compression() {
        assert!(matches!(compression_for(90), CompressionType::Best));
        assert!(matches!(compression_for(100), CompressionType::Best));
        assert!(matches!(compression_for(60), CompressionType::Default));
        assert!(matches!(compression_for(10), CompressionType::Fast));
    }

    #[test]
    fn test_encoded_png_decodes_back() {
        let image = RgbaImage::from_pixel(4, 3, Rgba([1, 2, 3, 255]));
        let bytes = encode_png(&image, DEFAULT_PNG_QUALITY).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, image);
    }
}
