//! Scripted bus and delay doubles shared by the unit tests.

extern crate std;

use std::collections::VecDeque;
use std::vec::Vec;

use embedded_hal_async::delay::DelayNs;

use crate::{Bus, Config, Trill, DEFAULT_MAX_TRANSFER};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MockError;

enum Reply {
  Data(Vec<u8>),
  Fail,
}

/// Records every write and serves queued replies to reads. A read with
/// nothing queued is granted zero bytes.
pub(crate) struct MockBus {
  pub(crate) max_transfer: usize,
  pub(crate) writes: Vec<(u8, Vec<u8>)>,
  /// `(address, requested length)` of every read.
  pub(crate) reads: Vec<(u8, usize)>,
  replies: VecDeque<Reply>,
  failing_writes: usize,
}

impl MockBus {
  pub(crate) fn new() -> Self {
    Self::with_max_transfer(DEFAULT_MAX_TRANSFER)
  }

  pub(crate) fn with_max_transfer(max_transfer: usize) -> Self {
    Self { max_transfer, writes: Vec::new(), reads: Vec::new(), replies: VecDeque::new(), failing_writes: 0 }
  }

  /// Queue bytes for the next read. The read is granted at most the
  /// requested length and the transfer cap.
  pub(crate) fn reply(&mut self, bytes: &[u8]) -> &mut Self {
    self.replies.push_back(Reply::Data(bytes.to_vec()));
    self
  }

  pub(crate) fn reply_samples(&mut self, samples: &[u16]) -> &mut Self {
    let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_be_bytes()).collect();
    self.replies.push_back(Reply::Data(bytes));
    self
  }

  pub(crate) fn reply_error(&mut self) -> &mut Self {
    self.replies.push_back(Reply::Fail);
    self
  }

  /// Make the next `n` writes fail.
  pub(crate) fn fail_writes(&mut self, n: usize) -> &mut Self {
    self.failing_writes = n;
    self
  }

  /// Payloads of every write, addresses dropped.
  pub(crate) fn frames(&self) -> Vec<Vec<u8>> {
    self.writes.iter().map(|(_, frame)| frame.clone()).collect()
  }
}

impl Bus for MockBus {
  type Error = MockError;

  fn max_transfer(&self) -> usize {
    self.max_transfer
  }

  async fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), MockError> {
    if self.failing_writes > 0 {
      self.failing_writes -= 1;
      return Err(MockError);
    }
    self.writes.push((address, bytes.to_vec()));
    Ok(())
  }

  async fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<usize, MockError> {
    self.reads.push((address, buf.len()));
    match self.replies.pop_front() {
      None => Ok(0),
      Some(Reply::Fail) => Err(MockError),
      Some(Reply::Data(bytes)) => {
        let n = bytes.len().min(buf.len()).min(self.max_transfer);
        buf[..n].copy_from_slice(&bytes[..n]);
        Ok(n)
      }
    }
  }
}

/// Counts requested delay time without sleeping.
#[derive(Default)]
pub(crate) struct MockDelay {
  pub(crate) total_ns: u64,
}

impl DelayNs for MockDelay {
  async fn delay_ns(&mut self, ns: u32) {
    self.total_ns += u64::from(ns);
  }
}

pub(crate) type Session = Trill<MockBus, MockDelay>;

pub(crate) fn session(bus: MockBus, config: Config) -> Session {
  Trill::new(bus, MockDelay::default(), config)
}

/// Identify response for `code` with firmware `firmware`.
pub(crate) fn identify_reply(code: u8, firmware: u8) -> [u8; 3] {
  [0x00, code, firmware]
}
