#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Async, `no_std` driver for the Trill family of capacitive touch sensors
//! (Bar, Square, Craft, Ring, Hex and Flex).
//!
//! Trill sensors speak a small command/response protocol over I²C: short
//! command frames configure the scan, and the data region is polled either
//! for processed touch centroids or for per-channel readings. This crate
//! covers:
//!
//! - The identify handshake that discovers the attached variant and firmware
//! - Mode and scan configuration with the settle delays the firmware needs
//! - Decoding centroid frames into touches on one or two axes, plus the
//!   Ring's button channels
//! - Streaming raw, baseline and differential frames that exceed the bus
//!   transaction size
//! - Any `embedded-hal-async` 1.0 I²C peripheral through [`I2cBus`]
//!
//! ```no_run
//! use embedded_hal_async::{delay::DelayNs, i2c::{I2c, SevenBitAddress}};
//! use trill::{Config, Device, I2cBus, Trill};
//!
//! async fn example<I2C, D, E>(i2c: I2C, delay: D) -> Result<(), trill::Error<E>>
//! where
//!   I2C: I2c<SevenBitAddress, Error = E>,
//!   D: DelayNs,
//! {
//!   let mut bar = Trill::new(I2cBus::new(i2c), delay, Config::new(Device::Bar));
//!   bar.begin().await?;
//!
//!   let touches = bar.read().await?;
//!   for touch in touches.primary().iter() {
//!     log::info!("touch at {} size {}", touch.location, touch.size);
//!   }
//!   Ok(())
//! }
//! ```
mod bus;
mod command;
mod config;
mod device;
mod init;
mod raw;
mod reg;
mod rw;
#[cfg(test)]
mod testing;
mod touch;

use embedded_hal_async::delay::DelayNs;

pub use bus::*;
pub use config::*;
pub use device::{Device, Mode};
pub use init::Handshake;
use raw::RawStream;
use reg::*;
use rw::RxBuffer;
pub use touch::{Axis, Touch, Touches, NO_TOUCH};

/// Errors that can occur while talking to a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
  /// The identify handshake got no response or a short one.
  NoDevice,
  /// A device answered, but not the variant that was asked for.
  WrongDevice { expected: Device, found: Device },
  /// No mode was given and the variant has no default one.
  AmbiguousMode,
  /// No address was given and the variant has no factory address.
  UnresolvedAddress,
  /// A command or pointer write was not acknowledged.
  WriteFailed(E),
  /// Fewer bytes than a full frame arrived.
  ReadShort { expected: usize, received: usize },
  /// The bus granted no bytes for a raw data request.
  TransmissionFailed,
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      Self::NoDevice => f.write_str("no device answered the identify command"),
      Self::WrongDevice { expected, found } => write!(f, "expected {expected:?}, found {found:?}"),
      Self::AmbiguousMode => f.write_str("no mode given and the device has no default mode"),
      Self::UnresolvedAddress => f.write_str("no address given and the device has no default address"),
      Self::WriteFailed(e) => write!(f, "bus write failed: {e:?}"),
      Self::ReadShort { expected, received } => write!(f, "short read: {received} of {expected} bytes"),
      Self::TransmissionFailed => f.write_str("bus granted no bytes"),
    }
  }
}

/// Session with one Trill sensor.
///
/// The driver owns the bus handle and a delay provider, and tracks what the
/// device has been told: its variant, the active mode, and where its read
/// pointer sits. Create it with [`Trill::new`], then call [`Trill::begin`]
/// to identify the sensor and apply the [`Config`].
pub struct Trill<B, D> {
  bus: B,
  delay: D,
  config: Config,
  address: Option<u8>,
  device: Device,
  firmware: u8,
  mode: Mode,
  handshake: Handshake,
  // Offset the device's read pointer is known to sit at.
  cursor: Option<u8>,
  rx: RxBuffer,
  raw: RawStream,
  touches: Touches,
}

impl<B, E, D> Trill<B, D>
where
  B: Bus<Error = E>,
  E: core::fmt::Debug,
  D: DelayNs,
{
  /// Create a new session. Nothing is sent until [`Trill::begin`] or
  /// [`Trill::identify`] is called.
  pub fn new(bus: B, delay: D, config: Config) -> Self {
    Self {
      bus,
      delay,
      address: config.address.or(config.device.default_address()),
      config,
      device: Device::None,
      firmware: 0,
      mode: Mode::Auto,
      handshake: Handshake::Unidentified,
      cursor: None,
      rx: RxBuffer::new(),
      raw: RawStream::new(),
      touches: Touches::new(Device::None),
    }
  }

  /// Give back the bus and delay.
  pub fn release(self) -> (B, D) {
    (self.bus, self.delay)
  }

  /// Variant found by the last handshake.
  pub fn device(&self) -> Device {
    self.device
  }

  /// Firmware version reported by the last handshake, `0` if none.
  pub fn firmware_version(&self) -> u8 {
    self.firmware
  }

  /// Mode most recently confirmed by the device.
  pub fn mode(&self) -> Mode {
    self.mode
  }

  /// Bus address in use, once resolved.
  pub fn address(&self) -> Option<u8> {
    self.address
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn handshake(&self) -> Handshake {
    self.handshake
  }

  /// Touches decoded by the last [`Trill::read`].
  pub fn touches(&self) -> &Touches {
    &self.touches
  }

  /// `true` for one-axis sliders in centroid mode.
  pub fn is_1d(&self) -> bool {
    self.mode == Mode::Centroid && matches!(self.device, Device::Bar | Device::Ring | Device::Craft | Device::Flex)
  }

  /// `true` for two-axis pads in centroid mode.
  pub fn is_2d(&self) -> bool {
    self.mode == Mode::Centroid && self.device.has_two_axes()
  }

  /// Capacitive channels on the identified device.
  pub fn num_channels(&self) -> usize {
    self.device.num_channels()
  }

  /// Button channels reported alongside centroids.
  pub fn num_buttons(&self) -> usize {
    if self.mode == Mode::Centroid && self.device == Device::Ring {
      2
    } else {
      0
    }
  }

  fn resolved_address(&self) -> Result<u8, Error<E>> {
    self.address.ok_or(Error::UnresolvedAddress)
  }
}
