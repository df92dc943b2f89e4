//! Configuration parsing for the capture loop.
//!
//! This module owns translation of CLI arguments into a `CaptureConfig`
//! which the startup sequence and the loop use without re-parsing flags.

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::{Result, bail};
use clap::Args;
use gpio_io::{BUTTON_FALLBACKS, BUTTON_PIN, LED_FALLBACKS, LED_PIN, PinCandidates, board_to_bcm};

/// Directory captures are written to when `--output-dir` is not given.
pub(crate) const DEFAULT_OUTPUT_DIR: &str = "captured_images";

#[derive(Clone, Debug)]
/// Canonical configuration shared by setup and the capture loop.
pub struct CaptureConfig {
    /// LED pin and its fallbacks, physical numbering.
    pub led: PinCandidates,
    /// Button pin and its fallbacks, physical numbering.
    pub button: PinCandidates,
    /// Camera index or device path.
    pub camera_uri: String,
    /// Directory receiving `image_<ts>.jpg` / `edges_<ts>.jpg`.
    pub output_dir: PathBuf,
    pub timing: LoopTiming,
    /// JPEG quality for both artifacts.
    pub jpeg_quality: u8,
    /// Serve Prometheus metrics on this address.
    pub metrics_addr: Option<SocketAddr>,
    pub verbose: bool,
}

/// Fixed delays used by the poll loop.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LoopTiming {
    /// Sleep between button samples while idle.
    pub poll_interval: Duration,
    /// Sleep between button samples while waiting for release.
    pub release_poll: Duration,
    /// How long the LED stays on after a capture.
    pub cooldown: Duration,
}

impl Default for LoopTiming {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(10),
            release_poll: Duration::from_millis(100),
            cooldown: Duration::from_millis(500),
        }
    }
}

/// CLI arguments accepted by `edge-capture`.
#[derive(Debug, Args)]
pub struct CaptureCliArgs {
    /// Physical header pin driving the LED.
    #[arg(long = "led-pin", value_name = "PIN", default_value_t = LED_PIN)]
    pub led_pin: u8,
    /// Alternative LED pins, tried in order.
    #[arg(
        long = "led-fallbacks",
        value_name = "PINS",
        value_delimiter = ',',
        default_values_t = LED_FALLBACKS.to_vec()
    )]
    pub led_fallbacks: Vec<u8>,
    /// Physical header pin reading the button.
    #[arg(long = "button-pin", value_name = "PIN", default_value_t = BUTTON_PIN)]
    pub button_pin: u8,
    /// Alternative button pins, tried in order.
    #[arg(
        long = "button-fallbacks",
        value_name = "PINS",
        value_delimiter = ',',
        default_values_t = BUTTON_FALLBACKS.to_vec()
    )]
    pub button_fallbacks: Vec<u8>,
    /// Camera index or device path.
    #[arg(long = "camera", value_name = "URI", default_value = "0")]
    pub camera: String,
    /// Directory captures are written to.
    #[arg(long = "output-dir", value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,
    /// Button sample interval while idle.
    #[arg(long = "poll-interval-ms", value_name = "MS", default_value_t = 10)]
    pub poll_interval_ms: u64,
    /// Button sample interval while waiting for release.
    #[arg(long = "release-poll-ms", value_name = "MS", default_value_t = 100)]
    pub release_poll_ms: u64,
    /// LED hold time after each capture.
    #[arg(long = "cooldown-ms", value_name = "MS", default_value_t = 500)]
    pub cooldown_ms: u64,
    /// JPEG quality used for saved images (1-100).
    #[arg(long = "jpeg-quality", value_name = "QUALITY", default_value_t = 95)]
    pub jpeg_quality: u8,
    /// Expose Prometheus metrics on this address.
    #[arg(long = "metrics-addr", value_name = "ADDR")]
    pub metrics_addr: Option<SocketAddr>,
    /// Enable debug logging.
    #[arg(long = "verbose", action = clap::ArgAction::SetTrue)]
    pub verbose: bool,
}

impl TryFrom<CaptureCliArgs> for CaptureConfig {
    type Error = anyhow::Error;

    fn try_from(args: CaptureCliArgs) -> Result<Self> {
        validate_pins("--led-pin", std::slice::from_ref(&args.led_pin))?;
        validate_pins("--led-fallbacks", &args.led_fallbacks)?;
        validate_pins("--button-pin", std::slice::from_ref(&args.button_pin))?;
        validate_pins("--button-fallbacks", &args.button_fallbacks)?;

        if args.poll_interval_ms == 0 || args.release_poll_ms == 0 {
            bail!("--poll-interval-ms and --release-poll-ms must be at least 1");
        }
        if !(1..=100).contains(&args.jpeg_quality) {
            bail!("--jpeg-quality must be an integer between 1 and 100");
        }
        if args.camera.trim().is_empty() {
            bail!("--camera must not be empty");
        }

        let timing = LoopTiming {
            poll_interval: Duration::from_millis(args.poll_interval_ms),
            release_poll: Duration::from_millis(args.release_poll_ms),
            cooldown: Duration::from_millis(args.cooldown_ms),
        };

        Ok(Self {
            led: PinCandidates::new(args.led_pin, args.led_fallbacks),
            button: PinCandidates::new(args.button_pin, args.button_fallbacks),
            camera_uri: args.camera,
            output_dir: args.output_dir,
            timing,
            jpeg_quality: args.jpeg_quality,
            metrics_addr: args.metrics_addr,
            verbose: args.verbose,
        })
    }
}

fn validate_pins(flag: &str, pins: &[u8]) -> Result<()> {
    for pin in pins {
        if !(1..=40).contains(pin) {
            bail!("{flag}: physical pin {pin} is outside the 40-pin header");
        }
        if board_to_bcm(*pin).is_none() {
            bail!("{flag}: physical pin {pin} is a power or ground pin");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: CaptureCliArgs,
    }

    fn parse(argv: &[&str]) -> Result<CaptureConfig> {
        let argv = std::iter::once("edge-capture").chain(argv.iter().copied());
        let harness = Harness::try_parse_from(argv)?;
        CaptureConfig::try_from(harness.args)
    }

    #[test]
    fn defaults_match_the_wiring_guide() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.led, PinCandidates::led());
        assert_eq!(config.button, PinCandidates::button());
        assert_eq!(config.camera_uri, "0");
        assert_eq!(config.output_dir, PathBuf::from("captured_images"));
        assert_eq!(config.timing, LoopTiming::default());
        assert_eq!(config.jpeg_quality, 95);
        assert!(config.metrics_addr.is_none());
    }

    #[test]
    fn fallback_lists_are_comma_separated() {
        let config = parse(&["--led-pin", "33", "--led-fallbacks", "35,37"]).unwrap();
        assert_eq!(config.led, PinCandidates::new(33, vec![35, 37]));
    }

    #[test]
    fn power_and_out_of_range_pins_are_rejected() {
        let err = parse(&["--led-pin", "6"]).unwrap_err();
        assert!(err.to_string().contains("power or ground"), "{err}");
        let err = parse(&["--button-fallbacks", "11,41"]).unwrap_err();
        assert!(err.to_string().contains("outside the 40-pin header"), "{err}");
    }

    #[test]
    fn timing_and_quality_are_validated() {
        assert!(parse(&["--poll-interval-ms", "0"]).is_err());
        assert!(parse(&["--jpeg-quality", "0"]).is_err());
        let config = parse(&["--cooldown-ms", "250", "--release-poll-ms", "20"]).unwrap();
        assert_eq!(config.timing.cooldown, Duration::from_millis(250));
        assert_eq!(config.timing.release_poll, Duration::from_millis(20));
    }
}
