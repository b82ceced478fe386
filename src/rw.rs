use embedded_hal_async::delay::DelayNs;
use log::{trace, warn};

use crate::{Bus, Error, Trill, OFFSET_DATA, RX_CAPACITY};

/// Bytes received by the last read transaction, consumed front to back.
pub(crate) struct RxBuffer {
  data: [u8; RX_CAPACITY],
  len: usize,
  pos: usize,
}

impl RxBuffer {
  pub(crate) const fn new() -> Self {
    Self { data: [0; RX_CAPACITY], len: 0, pos: 0 }
  }

  pub(crate) fn clear(&mut self) {
    self.len = 0;
    self.pos = 0;
  }

  /// Bytes not yet consumed.
  pub(crate) fn available(&self) -> usize {
    self.len - self.pos
  }

  pub(crate) fn remaining(&self) -> &[u8] {
    &self.data[self.pos..self.len]
  }

  /// Next big-endian 16-bit value, if two bytes are left.
  pub(crate) fn read_u16(&mut self) -> Option<u16> {
    if self.available() < 2 {
      return None;
    }
    let value = u16::from_be_bytes([self.data[self.pos], self.data[self.pos + 1]]);
    self.pos += 2;
    Some(value)
  }
}

impl<B, E, D> Trill<B, D>
where
  B: Bus<Error = E>,
  E: core::fmt::Debug,
  D: DelayNs,
{
  /// Send one frame. On failure the device's read pointer is unknown.
  pub(crate) async fn write_frame(&mut self, frame: &[u8]) -> Result<(), Error<E>> {
    let address = self.resolved_address()?;
    trace!("trill@{:#04x}: write {:?}", address, frame);
    match self.bus.write(address, frame).await {
      Ok(()) => Ok(()),
      Err(e) => {
        warn!("trill@{:#04x}: write failed: {:?}", address, e);
        self.cursor = None;
        Err(Error::WriteFailed(e))
      }
    }
  }

  /// Point the device's read pointer at `offset`.
  pub(crate) async fn set_read_pointer(&mut self, offset: u8) -> Result<(), Error<E>> {
    self.write_frame(&[offset]).await?;
    self.cursor = Some(offset);
    Ok(())
  }

  /// Move the read pointer to the data region unless it is already there.
  pub(crate) async fn prepare_for_data_read(&mut self) -> Result<(), Error<E>> {
    if self.cursor != Some(OFFSET_DATA) {
      self.set_read_pointer(OFFSET_DATA).await?;
    }
    Ok(())
  }

  /// Request `len` bytes into the receive buffer, replacing whatever was
  /// left in it. Returns how many bytes the bus granted; a bus error counts
  /// as zero.
  pub(crate) async fn request_read(&mut self, len: usize) -> Result<usize, Error<E>> {
    let address = self.resolved_address()?;
    let len = len.min(RX_CAPACITY);
    self.rx.clear();
    let granted = match self.bus.read(address, &mut self.rx.data[..len]).await {
      Ok(n) => n.min(len),
      Err(e) => {
        warn!("trill@{:#04x}: read of {} bytes failed: {:?}", address, len, e);
        0
      }
    };
    self.rx.len = granted;
    if granted < len {
      trace!("trill@{:#04x}: granted {} of {} bytes", address, granted, len);
    }
    Ok(granted)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn filled(bytes: &[u8]) -> RxBuffer {
    let mut rx = RxBuffer::new();
    rx.data[..bytes.len()].copy_from_slice(bytes);
    rx.len = bytes.len();
    rx
  }

  #[test]
  fn reads_big_endian_pairs() {
    let mut rx = filled(&[0x12, 0x34, 0xAB]);
    assert_eq!(rx.available(), 3);
    assert_eq!(rx.read_u16(), Some(0x1234));
    assert_eq!(rx.read_u16(), None);
    assert_eq!(rx.remaining(), &[0xAB]);
    assert_eq!(rx.available(), 1);
  }

  #[test]
  fn clear_drops_unread_bytes() {
    let mut rx = filled(&[1, 2, 3, 4, 5]);
    assert_eq!(rx.read_u16(), Some(0x0102));
    assert_eq!(rx.remaining(), &[3, 4, 5]);
    rx.clear();
    assert_eq!(rx.available(), 0);
    assert!(rx.remaining().is_empty());
  }
}
