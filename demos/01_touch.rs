//! Centroid polling example: slider touches and ring buttons.
#![allow(unused)]
use embedded_hal_async::{
  delay::DelayNs,
  i2c::{I2c, SevenBitAddress},
};
use trill::{Config, Device, I2cBus, Trill};

#[allow(dead_code)]
async fn main_async<I2C, D, E>(i2c: I2C, mut delay: D) -> Result<(), trill::Error<E>>
where
  I2C: I2c<SevenBitAddress, Error = E>,
  D: DelayNs + Clone,
  E: core::fmt::Debug,
{
  let mut ring = Trill::new(I2cBus::new(i2c), delay.clone(), Config::new(Device::Ring));
  ring.begin().await?;

  loop {
    let touches = ring.read().await?;
    for touch in touches.primary().iter() {
      let _ = (touch.location, touch.size);
      // handle touch
    }
    if let (Some(left), Some(right)) = (touches.button(0), touches.button(1)) {
      let _ = (left, right);
      // handle buttons
    }
    delay.delay_ms(10).await;
  }
}

fn main() {}
