//! Development of RAW sensor data into 16-bit RGB.

mod auto_bright;
mod cpu_developer;
mod gamma;
pub mod types;

pub use cpu_developer::CpuDeveloper;
pub use types::{DevelopParams, RgbImageData, WhiteBalance};
