//! Differential streaming example on a Craft, with a small bus buffer.
#![allow(unused)]
use embedded_hal_async::{
  delay::DelayNs,
  i2c::{I2c, SevenBitAddress},
};
use trill::{Config, Device, I2cBus, Mode, ScanSettings, Speed, Trill};

#[allow(dead_code)]
async fn main_async<I2C, D, E>(i2c: I2C, delay: D) -> Result<(), trill::Error<E>>
where
  I2C: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
  E: core::fmt::Debug,
{
  let config = Config::new(Device::Craft)
    .with_mode(Mode::Differential)
    .with_scan_settings(ScanSettings::new(Speed::Normal, 12));
  let mut craft = Trill::new(I2cBus::new(i2c).with_max_transfer(16), delay, config);
  craft.begin().await?;
  craft.set_prescaler(2).await?;
  craft.set_noise_threshold(40).await?;

  // Sample by sample.
  craft.request_raw_data(None).await?;
  while craft.raw_data_available() > 0 {
    let _channel = craft.raw_data_read().await?;
  }

  // Or a whole frame at once.
  let mut frame = [0u16; 30];
  let n = craft.read_raw(&mut frame).await?;
  let _channels = &frame[..n];
  Ok(())
}

fn main() {}
