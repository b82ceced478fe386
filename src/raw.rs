use embedded_hal_async::delay::DelayNs;
use log::{trace, warn};

use crate::{Bus, Error, Trill, OFFSET_DATA, RAW_LENGTH_MAX};

/// Bytes of a raw frame still on the device after the last transaction.
pub(crate) struct RawStream {
  remaining: usize,
  // Offset of the first byte not yet fetched.
  resume_at: u8,
}

impl RawStream {
  pub(crate) const fn new() -> Self {
    Self { remaining: 0, resume_at: OFFSET_DATA }
  }

  pub(crate) fn clear(&mut self) {
    self.remaining = 0;
    self.resume_at = OFFSET_DATA;
  }
}

impl<B, E, D> Trill<B, D>
where
  B: Bus<Error = E>,
  E: core::fmt::Debug,
  D: DelayNs,
{
  /// Fetch the start of a raw, baseline or differential frame.
  ///
  /// The frame is `min(device frame, max_length, 60)` bytes. When it does not
  /// fit in one bus transaction only the first chunk is read here, and
  /// [`Trill::raw_data_read`] fetches the rest once the buffered samples run
  /// out. Any continuation still pending from an earlier request is dropped.
  pub async fn request_raw_data(&mut self, max_length: Option<usize>) -> Result<(), Error<E>> {
    self.raw.clear();
    self.rx.clear();
    self.prepare_for_data_read().await?;

    let mut length = self.device.raw_length().min(RAW_LENGTH_MAX);
    if let Some(max) = max_length {
      length = length.min(max);
    }
    if length == 0 {
      return Ok(());
    }

    let cap = self.bus.max_transfer().max(1);
    let granted = self.request_read(length.min(cap)).await?;
    if granted == 0 {
      warn!("trill: raw request of {} bytes got nothing", length);
      return Err(Error::TransmissionFailed);
    }
    // A frame that fits one transaction is never continued, even if cut short.
    if length > cap && granted < length {
      self.raw.remaining = length - granted;
      self.raw.resume_at = OFFSET_DATA + granted as u8;
      trace!("trill: raw frame split, {} bytes pending at {}", self.raw.remaining, self.raw.resume_at);
    }
    Ok(())
  }

  /// Samples left in the current frame, buffered or still on the device.
  pub fn raw_data_available(&self) -> usize {
    (self.rx.available() + self.raw.remaining) / 2
  }

  /// Next big-endian sample of the current frame.
  ///
  /// Fetches the pending continuation when the buffer runs dry. Returns `0`
  /// once the frame is exhausted; check [`Trill::raw_data_available`] to tell
  /// a zero reading from the end of the frame.
  pub async fn raw_data_read(&mut self) -> Result<u16, Error<E>> {
    if self.rx.available() < 2 && self.raw.remaining > 0 {
      self.fetch_continuation().await?;
    }
    Ok(self.rx.read_u16().unwrap_or(0))
  }

  /// Request one frame and drain it into `out`, which also bounds the frame
  /// length. Returns the number of samples written.
  pub async fn read_raw(&mut self, out: &mut [u16]) -> Result<usize, Error<E>> {
    self.request_raw_data(Some(2 * out.len())).await?;

    let mut n = 0;
    while n < out.len() && self.raw_data_available() > 0 {
      out[n] = self.raw_data_read().await?;
      n += 1;
    }
    Ok(n)
  }

  async fn fetch_continuation(&mut self) -> Result<(), Error<E>> {
    // A sample cut in half by the last chunk is fetched again whole.
    let carry = self.rx.available();
    let resume_at = self.raw.resume_at - carry as u8;
    let length = self.raw.remaining + carry;
    self.raw.clear();

    self.set_read_pointer(resume_at).await?;
    let cap = self.bus.max_transfer().max(1);
    let granted = self.request_read(length.min(cap)).await?;
    if granted == 0 {
      warn!("trill: raw continuation of {} bytes got nothing", length);
      return Err(Error::TransmissionFailed);
    }
    if length > cap && granted < length {
      self.raw.remaining = length - granted;
      self.raw.resume_at = resume_at + granted as u8;
    }
    Ok(())
  }
}
