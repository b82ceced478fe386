use embedded_hal_async::delay::DelayNs;
use log::debug;

use crate::{Bus, Command, Error, Mode, ScanSettings, Trill, OFFSET_COMMAND, PRESCALER_MAX};

impl<B, E, D> Trill<B, D>
where
  B: Bus<Error = E>,
  E: core::fmt::Debug,
  D: DelayNs,
{
  /// Send `[command region, opcode, params...]`.
  ///
  /// The device parks its read pointer on the command region after every
  /// command, so the cursor follows on success.
  pub(crate) async fn command(&mut self, command: Command, params: &[u8]) -> Result<(), Error<E>> {
    let len = 2 + params.len();
    let mut frame = [0u8; 4];
    frame[0] = OFFSET_COMMAND;
    frame[1] = command.into();
    frame[2..len].copy_from_slice(params);

    self.write_frame(&frame[..len]).await?;
    self.cursor = Some(OFFSET_COMMAND);
    Ok(())
  }

  /// Switch what the data region reports.
  ///
  /// [`Mode::Auto`] resolves to the identified device's default mode. The
  /// cached mode only changes once the device has acknowledged the command,
  /// and previously decoded touches are dropped.
  pub async fn set_mode(&mut self, mode: Mode) -> Result<(), Error<E>> {
    let mode = match mode {
      Mode::Auto => self.device.default_mode(),
      m => m,
    };
    let code = mode.code().ok_or(Error::AmbiguousMode)?;

    self.command(Command::Mode, &[code]).await?;
    debug!("trill: mode {:?} -> {:?}", self.mode, mode);
    self.mode = mode;
    self.touches.invalidate();
    Ok(())
  }

  /// Set scan speed and resolution. Resolution is clamped to `9..=16` bits.
  pub async fn set_scan_settings(&mut self, scan: ScanSettings) -> Result<(), Error<E>> {
    self.command(Command::ScanSettings, &[scan.speed.into(), scan.clamped_resolution()]).await
  }

  /// Set the sensing prescaler, clamped to [`PRESCALER_MAX`].
  pub async fn set_prescaler(&mut self, prescaler: u8) -> Result<(), Error<E>> {
    self.command(Command::Prescaler, &[prescaler.min(PRESCALER_MAX)]).await
  }

  /// Readings below `threshold` are reported as zero.
  pub async fn set_noise_threshold(&mut self, threshold: u8) -> Result<(), Error<E>> {
    self.command(Command::NoiseThreshold, &[threshold]).await
  }

  /// Set the IDAC (bias current) value.
  pub async fn set_idac_value(&mut self, value: u8) -> Result<(), Error<E>> {
    self.command(Command::Idac, &[value]).await
  }

  /// Smallest touch size the firmware reports as a touch.
  pub async fn set_minimum_touch_size(&mut self, size: u16) -> Result<(), Error<E>> {
    self.command(Command::MinimumSize, &size.to_be_bytes()).await
  }

  /// Interval between automatic scans, in sensor clock ticks. `0` disables
  /// auto-scan.
  pub async fn set_auto_scan_interval(&mut self, interval: u16) -> Result<(), Error<E>> {
    self.command(Command::AutoScanInterval, &interval.to_be_bytes()).await
  }

  /// Capture the current readings as the new per-channel baseline.
  pub async fn update_baseline(&mut self) -> Result<(), Error<E>> {
    self.command(Command::BaselineUpdate, &[]).await
  }
}

#[cfg(test)]
mod tests {
  extern crate std;

  use std::vec;

  use embassy_futures::block_on;

  use crate::testing::*;
  use crate::{Config, Device, Error, Mode, ScanSettings, Speed, OFFSET_COMMAND, OFFSET_DATA};

  fn bar() -> Session {
    let mut trill = session(MockBus::new(), Config::new(Device::Bar));
    trill.device = Device::Bar;
    trill
  }

  #[test]
  fn frames_are_bit_exact() {
    let mut trill = bar();
    block_on(async {
      trill.set_mode(Mode::Differential).await.unwrap();
      trill.set_scan_settings(ScanSettings::new(Speed::Normal, 10)).await.unwrap();
      trill.set_prescaler(4).await.unwrap();
      trill.set_noise_threshold(0x21).await.unwrap();
      trill.set_idac_value(0x7F).await.unwrap();
      trill.update_baseline().await.unwrap();
      trill.set_minimum_touch_size(0x1234).await.unwrap();
      trill.set_auto_scan_interval(0xABCD).await.unwrap();
    });

    assert_eq!(
      trill.bus.frames(),
      vec![
        vec![0, 1, 3],
        vec![0, 2, 2, 10],
        vec![0, 3, 4],
        vec![0, 4, 0x21],
        vec![0, 5, 0x7F],
        vec![0, 6],
        vec![0, 7, 0x12, 0x34],
        vec![0, 16, 0xAB, 0xCD],
      ]
    );
    assert!(trill.bus.writes.iter().all(|(address, _)| *address == 0x20));
  }

  #[test]
  fn parameters_are_clamped() {
    let mut trill = bar();
    block_on(async {
      trill.set_scan_settings(ScanSettings::new(Speed::from_raw(7), 3)).await.unwrap();
      trill.set_scan_settings(ScanSettings::new(Speed::UltraFast, 40)).await.unwrap();
      trill.set_prescaler(200).await.unwrap();
    });
    assert_eq!(trill.bus.frames(), vec![vec![0, 2, 3, 9], vec![0, 2, 0, 16], vec![0, 3, 8]]);
  }

  #[test]
  fn commands_park_cursor_on_command_region() {
    let mut trill = bar();
    trill.cursor = Some(OFFSET_DATA);
    block_on(trill.set_noise_threshold(1)).unwrap();
    assert_eq!(trill.cursor, Some(OFFSET_COMMAND));
  }

  #[test]
  fn failed_mode_write_keeps_cached_mode() {
    let mut trill = bar();
    block_on(trill.set_mode(Mode::Centroid)).unwrap();

    trill.bus.fail_writes(1);
    let result = block_on(trill.set_mode(Mode::Raw));
    assert_eq!(result, Err(Error::WriteFailed(MockError)));
    assert_eq!(trill.mode(), Mode::Centroid);
    assert_eq!(trill.cursor, None);
  }

  #[test]
  fn auto_mode_uses_device_default() {
    let mut trill = bar();
    trill.device = Device::Craft;
    block_on(trill.set_mode(Mode::Auto)).unwrap();
    assert_eq!(trill.mode(), Mode::Differential);
    assert_eq!(trill.bus.frames(), vec![vec![0, 1, 3]]);
  }

  #[test]
  fn auto_mode_without_default_is_ambiguous() {
    let mut trill = bar();
    trill.device = Device::Unknown;
    assert_eq!(block_on(trill.set_mode(Mode::Auto)), Err(Error::AmbiguousMode));
    assert!(trill.bus.writes.is_empty());
    assert_eq!(trill.mode(), Mode::Auto);
  }

  #[test]
  fn commands_need_an_address() {
    let mut trill = session(MockBus::new(), Config::new(Device::Unknown));
    assert_eq!(block_on(trill.update_baseline()), Err(Error::UnresolvedAddress));
    assert!(trill.bus.writes.is_empty());
  }
}
