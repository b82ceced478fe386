use embedded_hal_async::delay::DelayNs;
use log::warn;

use crate::device::{MAX_TOUCHES_1D, MAX_TOUCHES_2D};
use crate::{Bus, Device, Error, Mode, Trill, CENTROID_LENGTH_MAX};

/// Location value marking an empty touch slot.
pub const NO_TOUCH: u16 = 0xFFFF;

/// Button channels carry 12-bit readings.
const BUTTON_MASK: u16 = 0x0FFF;

/// Run of consecutive 16-bit samples inside a centroid frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
  offset: usize,
  len: usize,
}

impl Span {
  const fn new(offset: usize, len: usize) -> Self {
    Self { offset, len }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AxisLayout {
  location: Span,
  size: Span,
}

/// Where each field of a centroid frame lives, per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
  /// Frame length in bytes.
  length: usize,
  primary: AxisLayout,
  secondary: Option<AxisLayout>,
  buttons: Option<Span>,
}

impl Layout {
  const fn of(device: Device) -> Self {
    match device {
      Device::Square | Device::Hex => {
        let n = MAX_TOUCHES_2D;
        Self {
          length: 8 * n,
          primary: AxisLayout { location: Span::new(0, n), size: Span::new(n, n) },
          secondary: Some(AxisLayout { location: Span::new(2 * n, n), size: Span::new(3 * n, n) }),
          buttons: None,
        }
      }
      Device::Ring => {
        let n = MAX_TOUCHES_1D;
        Self {
          length: 4 * n + 4,
          primary: AxisLayout { location: Span::new(0, n), size: Span::new(n, n) },
          secondary: None,
          buttons: Some(Span::new(2 * n, 2)),
        }
      }
      _ => {
        let n = MAX_TOUCHES_1D;
        Self {
          length: 4 * n,
          primary: AxisLayout { location: Span::new(0, n), size: Span::new(n, n) },
          secondary: None,
          buttons: None,
        }
      }
    }
  }
}

/// Centroid frame length in bytes for `device`.
pub(crate) const fn centroid_length(device: Device) -> usize {
  Layout::of(device).length
}

/// A single decoded touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Touch {
  /// Position along the axis.
  pub location: u16,
  /// Contact size; larger means more pressure or a wider finger.
  pub size: u16,
}

/// Touches decoded from the most recent centroid frame.
///
/// Holds both axes of a two-axis pad; one-axis devices simply report an
/// empty [`Touches::secondary`]. The bytes of the last read stay available
/// through [`Touches::raw_bytes`] even when the read came up short.
#[derive(Debug, Clone)]
pub struct Touches {
  buffer: [u8; CENTROID_LENGTH_MAX],
  received: usize,
  layout: Layout,
  counts: [usize; 2],
  valid: bool,
}

impl Touches {
  pub(crate) const fn new(device: Device) -> Self {
    Self { buffer: [0; CENTROID_LENGTH_MAX], received: 0, layout: Layout::of(device), counts: [0; 2], valid: false }
  }

  /// Load a frame read from the data region. Returns `false` if `bytes`
  /// is shorter than a full frame for `device`; counts are then zero.
  pub(crate) fn decode(&mut self, bytes: &[u8], device: Device, mode: Mode) -> bool {
    self.layout = Layout::of(device);
    let received = bytes.len().min(self.layout.length);
    self.buffer[..received].copy_from_slice(&bytes[..received]);
    self.received = received;
    self.counts = [0; 2];
    self.valid = false;

    if received < self.layout.length {
      return false;
    }
    if mode != Mode::Centroid {
      return true;
    }

    self.counts[0] = self.scan(self.layout.primary.location);
    if let Some(secondary) = self.layout.secondary {
      self.counts[1] = self.scan(secondary.location);
    }
    self.valid = true;
    true
  }

  /// Forget decoded touches; the raw bytes are kept.
  pub(crate) fn invalidate(&mut self) {
    self.counts = [0; 2];
    self.valid = false;
  }

  // Index of the first empty slot, or the span length.
  fn scan(&self, span: Span) -> usize {
    (0..span.len).find(|&i| self.sample(span.offset + i) == NO_TOUCH).unwrap_or(span.len)
  }

  fn sample(&self, index: usize) -> u16 {
    u16::from_be_bytes([self.buffer[2 * index], self.buffer[2 * index + 1]])
  }

  /// `true` once a complete centroid frame has been decoded.
  pub fn is_valid(&self) -> bool {
    self.valid
  }

  /// The only axis of a slider, or the vertical axis of a two-axis pad.
  pub fn primary(&self) -> Axis<'_> {
    Axis { touches: self, layout: Some(self.layout.primary), count: self.counts[0] }
  }

  /// Horizontal axis of a two-axis pad. Always empty on other devices.
  pub fn secondary(&self) -> Axis<'_> {
    Axis { touches: self, layout: self.layout.secondary, count: self.counts[1] }
  }

  pub fn has_secondary_axis(&self) -> bool {
    self.layout.secondary.is_some()
  }

  /// Number of touches on the primary axis.
  pub fn count(&self) -> usize {
    self.counts[0]
  }

  /// Reading of button `index` (0 or 1). Only the Ring has buttons.
  pub fn button(&self, index: usize) -> Option<u16> {
    let buttons = self.layout.buttons?;
    if !self.valid || index >= buttons.len {
      return None;
    }
    Some(self.sample(buttons.offset + index) & BUTTON_MASK)
  }

  /// Bytes received by the last read, complete or not.
  pub fn raw_bytes(&self) -> &[u8] {
    &self.buffer[..self.received]
  }
}

/// Touches along one axis.
#[derive(Debug, Clone, Copy)]
pub struct Axis<'a> {
  touches: &'a Touches,
  layout: Option<AxisLayout>,
  count: usize,
}

impl<'a> Axis<'a> {
  /// Active touches, in slot order.
  pub fn count(&self) -> usize {
    self.count
  }

  pub fn is_empty(&self) -> bool {
    self.count == 0
  }

  /// Location of touch `index`, `None` past the active count.
  pub fn location(&self, index: usize) -> Option<u16> {
    self.field(index, |l| l.location)
  }

  /// Size of touch `index`, `None` past the active count.
  pub fn size(&self, index: usize) -> Option<u16> {
    self.field(index, |l| l.size)
  }

  pub fn get(&self, index: usize) -> Option<Touch> {
    Some(Touch { location: self.location(index)?, size: self.size(index)? })
  }

  pub fn iter(&self) -> impl Iterator<Item = Touch> + 'a {
    let axis = *self;
    (0..axis.count).filter_map(move |i| axis.get(i))
  }

  fn field(&self, index: usize, span: impl Fn(&AxisLayout) -> Span) -> Option<u16> {
    let layout = self.layout?;
    if index >= self.count {
      return None;
    }
    let span = span(&layout);
    if index >= span.len {
      return None;
    }
    Some(self.touches.sample(span.offset + index))
  }
}

impl<B, E, D> Trill<B, D>
where
  B: Bus<Error = E>,
  E: core::fmt::Debug,
  D: DelayNs,
{
  /// Poll the sensor for a centroid frame and decode it.
  ///
  /// Outside centroid mode the frame is still read but no touches are
  /// reported. A short read zeroes the touch counts and returns
  /// [`Error::ReadShort`]; identification is left alone.
  pub async fn read(&mut self) -> Result<&Touches, Error<E>> {
    // The receive buffer is about to be replaced.
    self.raw.clear();
    if let Err(e) = self.prepare_for_data_read().await {
      self.touches.invalidate();
      return Err(e);
    }

    let expected = centroid_length(self.device);
    let received = self.request_read(expected).await?;
    let complete = self.touches.decode(self.rx.remaining(), self.device, self.mode);
    self.rx.clear();

    if !complete {
      warn!("trill: centroid read got {} of {} bytes", received, expected);
      return Err(Error::ReadShort { expected, received });
    }
    Ok(&self.touches)
  }
}
