use crate::{Device, Mode};

/// Sensor scan speed; slower scans trade latency for lower noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Speed {
  #[default]
  UltraFast = 0,
  Fast = 1,
  Normal = 2,
  Slow = 3,
}

impl From<Speed> for u8 {
  fn from(s: Speed) -> Self {
    s as u8
  }
}

impl Speed {
  /// Map a raw speed byte onto the supported range, saturating at `Slow`.
  pub const fn from_raw(raw: u8) -> Self {
    match raw {
      0 => Self::UltraFast,
      1 => Self::Fast,
      2 => Self::Normal,
      _ => Self::Slow,
    }
  }
}

/// Lowest and highest scan resolution, in bits.
pub const RESOLUTION_MIN: u8 = 9;
pub const RESOLUTION_MAX: u8 = 16;

/// Largest value accepted by the prescaler command.
pub const PRESCALER_MAX: u8 = 8;

/// Scan speed and per-channel resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanSettings {
  pub speed: Speed,
  /// Bits of resolution, clamped to `9..=16` when sent.
  pub resolution: u8,
}

impl ScanSettings {
  pub const fn new(speed: Speed, resolution: u8) -> Self {
    Self { speed, resolution }
  }

  pub(crate) const fn clamped_resolution(&self) -> u8 {
    if self.resolution < RESOLUTION_MIN {
      RESOLUTION_MIN
    } else if self.resolution > RESOLUTION_MAX {
      RESOLUTION_MAX
    } else {
      self.resolution
    }
  }
}

impl Default for ScanSettings {
  fn default() -> Self {
    Self::new(Speed::UltraFast, 12)
  }
}

/// What [`crate::Trill::begin`] should bring up.
///
/// # Example
/// ```no_run
/// use trill::{Config, Device, Mode, ScanSettings, Speed};
///
/// let config = Config::new(Device::Square)
///   .with_mode(Mode::Centroid)
///   .with_scan_settings(ScanSettings::new(Speed::Normal, 10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
  /// Expected variant. [`Device::Unknown`] accepts whatever answers.
  pub device: Device,
  /// Scan mode; [`Mode::Auto`] picks the variant default.
  pub mode: Mode,
  /// Bus address; `None` uses the variant's factory address.
  pub address: Option<u8>,
  pub scan: ScanSettings,
}

impl Config {
  pub const fn new(device: Device) -> Self {
    Self { device, mode: Mode::Auto, address: None, scan: ScanSettings::new(Speed::UltraFast, 12) }
  }

  pub const fn with_mode(mut self, mode: Mode) -> Self {
    self.mode = mode;
    self
  }

  pub const fn with_address(mut self, address: u8) -> Self {
    self.address = Some(address);
    self
  }

  pub const fn with_scan_settings(mut self, scan: ScanSettings) -> Self {
    self.scan = scan;
    self
  }
}

impl Default for Config {
  fn default() -> Self {
    Self::new(Device::Unknown)
  }
}
