//! Command-line arguments and their mapping onto the conversion config.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::image_pipeline::{
    BatchPolicy, ConversionConfig, DevelopParams, TiffCompression, WhiteBalance,
};

#[derive(Parser, Debug)]
#[command(name = "raw2tiff")]
#[command(version, about = "Convert CR2/DNG raw images to 16-bit TIFFs", long_about = None)]
pub struct Cli {
    /// RAW images to convert (.dng or .cr2)
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Integer downscale factor (area averaging)
    #[arg(short, long, value_name = "K", default_value_t = 1)]
    pub scale: u32,

    /// Disable histogram-based auto-brightness
    #[arg(long)]
    pub no_auto_bright: bool,

    /// Fraction of pixels allowed to clip when auto-brightening
    #[arg(long, value_name = "FLOAT", default_value_t = 0.001)]
    pub auto_bright_thr: f32,

    /// Brightness multiplier
    #[arg(long, value_name = "FLOAT", default_value_t = 1.0)]
    pub bright: f32,

    /// Gamma curve as power,toe-slope (1,1 is linear; 2.222,4.5 is BT.709)
    #[arg(long, value_name = "P,TS", default_value = "1,1", value_parser = parse_gamma)]
    pub gamma: (f64, f64),

    /// White balance applied before demosaicing
    #[arg(long, value_enum, default_value_t = WhiteBalanceArg::Camera)]
    pub white_balance: WhiteBalanceArg,

    /// TIFF compression
    #[arg(long, value_enum, default_value_t = CompressionArg::None)]
    pub compression: CompressionArg,

    /// Keep converting the remaining files after a failure
    #[arg(long)]
    pub keep_going: bool,

    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum WhiteBalanceArg {
    Camera,
    Daylight,
    None,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompressionArg {
    None,
    Lzw,
    DeflateFast,
    DeflateBalanced,
    DeflateBest,
}

impl From<WhiteBalanceArg> for WhiteBalance {
    fn from(arg: WhiteBalanceArg) -> Self {
        match arg {
            WhiteBalanceArg::Camera => Self::Camera,
            WhiteBalanceArg::Daylight => Self::Daylight,
            WhiteBalanceArg::None => Self::None,
        }
    }
}

impl From<CompressionArg> for TiffCompression {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::None => Self::None,
            CompressionArg::Lzw => Self::Lzw,
            CompressionArg::DeflateFast => Self::DeflateFast,
            CompressionArg::DeflateBalanced => Self::DeflateBalanced,
            CompressionArg::DeflateBest => Self::DeflateBest,
        }
    }
}

fn parse_gamma(s: &str) -> Result<(f64, f64), String> {
    let (power, toe_slope) = s
        .split_once(',')
        .ok_or_else(|| format!("expected P,TS, got '{}'", s))?;
    let power: f64 = power.trim().parse().map_err(|e| format!("gamma power: {}", e))?;
    let toe_slope: f64 = toe_slope.trim().parse().map_err(|e| format!("gamma toe slope: {}", e))?;
    Ok((power, toe_slope))
}

impl Cli {
    pub fn usage(program: &str) -> String {
        format!("usage: {} <image path> [<image path> ...]", program)
    }

    pub fn config(&self) -> ConversionConfig {
        let develop = DevelopParams {
            gamma: self.gamma,
            auto_bright: !self.no_auto_bright,
            auto_bright_threshold: self.auto_bright_thr,
            bright: self.bright,
            white_balance: self.white_balance.into(),
            ..DevelopParams::default()
        };

        ConversionConfig::builder()
            .compression(self.compression.into())
            .scale_factor(self.scale)
            .develop(develop)
            .build()
    }

    pub fn policy(&self) -> BatchPolicy {
        if self.keep_going {
            BatchPolicy::ContinueOnError
        } else {
            BatchPolicy::AbortOnError
        }
    }

    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
