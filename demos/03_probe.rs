//! Bus scan example: find every sensor at its factory address.
#![allow(unused)]
use embedded_hal::digital::OutputPin;
use embedded_hal_async::{
  delay::DelayNs,
  i2c::{I2c, SevenBitAddress},
};
use trill::{Device, I2cBus, Trill};

#[allow(dead_code)]
async fn main_async<I2C, D, RST, E>(i2c: I2C, mut delay: D, mut reset: RST) -> Result<(), trill::Error<E>>
where
  I2C: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
  RST: OutputPin,
  E: core::fmt::Debug,
{
  let mut bus = I2cBus::new(i2c);

  for device in [Device::Bar, Device::Square, Device::Craft, Device::Ring, Device::Hex, Device::Flex] {
    let Some(address) = device.default_address() else { continue };
    let found = Trill::probe(&mut bus, &mut delay, address).await;
    if found != Device::None {
      // sensor present at `address`
    }
  }

  let mut bar = Trill::new(&mut bus, &mut delay, trill::Config::new(Device::Bar));
  let _ = bar.reset(&mut reset).await;
  bar.begin().await?;
  let _firmware = bar.firmware_version();
  Ok(())
}

fn main() {}
