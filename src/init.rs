use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use log::{debug, warn};

use super::{Bus, Command, Config, Device, Error, Mode, Trill, Touches};
use super::{IDENTIFY_DELAY_MS, IDENTIFY_LENGTH, INTER_COMMAND_DELAY_MS, RESET_PULSE_US};

/// Progress of the identify handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Handshake {
  Unidentified,
  Identifying,
  Identified { device: Device, firmware: u8 },
  NoDevice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BeginState {
  Identify,
  CheckDevice,
  ResolveMode,
  SetMode(Mode),
  ScanSettings,
  Baseline,
}

impl<B, E, D> Trill<B, D>
where
  B: Bus<Error = E>,
  E: core::fmt::Debug,
  D: DelayNs,
{
  /// Identify the sensor, check it is the configured variant and bring it
  /// into the configured mode with fresh scan settings and baseline.
  pub async fn begin(&mut self) -> Result<(), Error<E>> {
    let config = self.config;
    self.address = Some(config.address.or(config.device.default_address()).ok_or(Error::UnresolvedAddress)?);

    let mut state = BeginState::Identify;

    loop {
      match state {
        BeginState::Identify => {
          self.identify().await?;
          state = BeginState::CheckDevice;
        }

        BeginState::CheckDevice => {
          if config.device != Device::Unknown && config.device != self.device {
            warn!("trill: expected {:?}, found {:?}", config.device, self.device);
            let found = self.device;
            self.forget_device();
            return Err(Error::WrongDevice { expected: config.device, found });
          }
          state = BeginState::ResolveMode;
        }

        BeginState::ResolveMode => {
          // The requested variant decides, not the identified one.
          let mode = match config.mode {
            Mode::Auto => config.device.default_mode(),
            m => m,
          };
          if mode == Mode::Auto {
            return Err(Error::AmbiguousMode);
          }
          state = BeginState::SetMode(mode);
        }

        BeginState::SetMode(mode) => {
          self.set_mode(mode).await?;
          self.delay.delay_ms(INTER_COMMAND_DELAY_MS).await;
          state = BeginState::ScanSettings;
        }

        BeginState::ScanSettings => {
          self.set_scan_settings(config.scan).await?;
          self.delay.delay_ms(INTER_COMMAND_DELAY_MS).await;
          state = BeginState::Baseline;
        }

        // Captured under the scan settings applied above.
        BeginState::Baseline => {
          self.update_baseline().await?;
          self.delay.delay_ms(INTER_COMMAND_DELAY_MS).await;
          debug!("trill: {:?} ready in {:?} mode", self.device, self.mode);
          return Ok(());
        }
      }
    }
  }

  /// Ask the sensor what it is. Leaves the rest of the session untouched, so
  /// it can be used to re-check a device that has been running for a while.
  pub async fn identify(&mut self) -> Result<Device, Error<E>> {
    self.handshake = Handshake::Identifying;

    match self.command(Command::Identify, &[]).await {
      Ok(()) => {}
      Err(Error::WriteFailed(_)) => {
        self.forget_device();
        self.handshake = Handshake::NoDevice;
        return Err(Error::NoDevice);
      }
      Err(e) => {
        self.handshake = Handshake::Unidentified;
        return Err(e);
      }
    }
    self.delay.delay_ms(IDENTIFY_DELAY_MS).await;

    self.request_read(IDENTIFY_LENGTH).await?;
    let response = match *self.rx.remaining() {
      [_, code, firmware, ..] => Some((Device::from_code(code), firmware)),
      _ => None,
    };
    self.rx.clear();

    let Some((device, firmware)) = response else {
      warn!("trill: no answer to identify");
      self.forget_device();
      self.handshake = Handshake::NoDevice;
      return Err(Error::NoDevice);
    };

    debug!("trill: found {:?} firmware {}", device, firmware);
    self.device = device;
    self.firmware = firmware;
    self.handshake = Handshake::Identified { device, firmware };
    self.touches = Touches::new(device);
    self.raw.clear();
    Ok(device)
  }

  /// Identify whatever sits at `address` without keeping a session.
  /// Returns [`Device::None`] when nothing answers.
  pub async fn probe(bus: B, delay: D, address: u8) -> Device {
    let mut trill = Self::new(bus, delay, Config::new(Device::Unknown).with_address(address));
    trill.identify().await.unwrap_or(Device::None)
  }

  /// Pulse the active-high reset line. The device boots with its default
  /// settings, so the read pointer is no longer known.
  pub async fn reset<P: OutputPin>(&mut self, pin: &mut P) -> Result<(), P::Error> {
    pin.set_high()?;
    self.delay.delay_us(RESET_PULSE_US).await;
    pin.set_low()?;
    self.cursor = None;
    self.raw.clear();
    self.rx.clear();
    Ok(())
  }

  fn forget_device(&mut self) {
    self.device = Device::None;
    self.firmware = 0;
    self.touches = Touches::new(Device::None);
    self.handshake = Handshake::Unidentified;
  }
}
