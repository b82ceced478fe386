use embedded_hal::i2c::SevenBitAddress;
use embedded_hal_async::i2c::I2c;

/// Transaction cap of the classic two-wire receive buffer.
pub const DEFAULT_MAX_TRANSFER: usize = 32;

/// Byte transport the driver talks through.
///
/// A read may be granted fewer bytes than requested (transfer cap, device
/// stopped early); the implementation reports how many bytes of `buf` it
/// filled. Several drivers may share one bus through `&mut` borrows.
#[allow(async_fn_in_trait)]
pub trait Bus {
  type Error: core::fmt::Debug;

  /// Largest number of bytes a single read transaction can return.
  fn max_transfer(&self) -> usize;

  /// Write `bytes` to the device at `address` in one transaction.
  async fn write(&mut self, address: SevenBitAddress, bytes: &[u8]) -> Result<(), Self::Error>;

  /// Read up to `buf.len()` bytes, returning how many were received.
  async fn read(&mut self, address: SevenBitAddress, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<T: Bus + ?Sized> Bus for &mut T {
  type Error = T::Error;

  fn max_transfer(&self) -> usize {
    (**self).max_transfer()
  }

  async fn write(&mut self, address: SevenBitAddress, bytes: &[u8]) -> Result<(), Self::Error> {
    (**self).write(address, bytes).await
  }

  async fn read(&mut self, address: SevenBitAddress, buf: &mut [u8]) -> Result<usize, Self::Error> {
    (**self).read(address, buf).await
  }
}

/// [`Bus`] over any `embedded-hal-async` I2C peripheral.
///
/// Reads longer than the configured cap are truncated to the cap, mirroring
/// a fixed-size receive buffer; the driver streams the rest in a second
/// transaction.
pub struct I2cBus<I> {
  i2c: I,
  max_transfer: usize,
}

impl<I> I2cBus<I> {
  pub const fn new(i2c: I) -> Self {
    Self { i2c, max_transfer: DEFAULT_MAX_TRANSFER }
  }

  /// Override the per-transaction cap. Zero is treated as one byte.
  pub const fn with_max_transfer(mut self, max_transfer: usize) -> Self {
    self.max_transfer = if max_transfer == 0 { 1 } else { max_transfer };
    self
  }

  /// Give back the wrapped peripheral.
  pub fn release(self) -> I {
    self.i2c
  }
}

impl<I> Bus for I2cBus<I>
where
  I: I2c<SevenBitAddress>,
{
  type Error = I::Error;

  fn max_transfer(&self) -> usize {
    self.max_transfer
  }

  async fn write(&mut self, address: SevenBitAddress, bytes: &[u8]) -> Result<(), I::Error> {
    self.i2c.write(address, bytes).await
  }

  async fn read(&mut self, address: SevenBitAddress, buf: &mut [u8]) -> Result<usize, I::Error> {
    let len = buf.len().min(self.max_transfer);
    if len == 0 {
      return Ok(0);
    }
    self.i2c.read(address, &mut buf[..len]).await?;
    Ok(len)
  }
}
