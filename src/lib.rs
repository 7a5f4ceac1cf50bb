#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod background;
pub mod brush;
pub mod command;
pub mod config;
pub mod error;
pub mod export;
pub mod file_handler;
mod geometry;
pub mod input;
pub mod panels;
pub mod rasterizer;
pub mod renderer;
pub mod state;
pub mod stroke;
pub mod surface;
pub mod util;

pub use app::PaintApp;
pub use background::{BackgroundImage, BackgroundRef};
pub use brush::{BrushSettings, BrushSize, BrushState};
pub use command::{Edit, HistoryAvailability, StrokeHistory};
pub use config::AppConfig;
pub use error::{BackgroundError, CanvasError, ConfigError, ExportError};
pub use export::{ExportHandle, ExportSettings, Exporter};
pub use input::PointerEvent;
pub use rasterizer::flatten;
pub use renderer::Renderer;
pub use stroke::{Stroke, StrokeBuilder, StrokeRef};
pub use surface::{Background, Composition, DrawingSurface};
