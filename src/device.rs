//! Sensor variants, scan modes and the per-variant protocol constants.

/// Physical sensor variant as reported by the identify handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Device {
  /// Nothing identified, or the last handshake failed.
  None,
  /// A device answered with a code this driver does not recognise. Also used
  /// by callers of [`crate::Trill::begin`] to accept whatever is attached.
  Unknown,
  /// Linear slider.
  Bar,
  /// Two-axis square pad.
  Square,
  /// Breakout with 30 freely wired channels.
  Craft,
  /// Circular slider with two button channels.
  Ring,
  /// Two-axis hexagonal pad.
  Hex,
  /// Flexible linear slider.
  Flex,
}

struct Defaults {
  address: Option<u8>,
  mode: Mode,
}

// Indexed by `Device` discriminant, declaration order.
static DEFAULTS: [Defaults; 8] = [
  Defaults { address: None, mode: Mode::Auto },                // None
  Defaults { address: None, mode: Mode::Auto },                // Unknown
  Defaults { address: Some(0x20), mode: Mode::Centroid },      // Bar
  Defaults { address: Some(0x28), mode: Mode::Centroid },      // Square
  Defaults { address: Some(0x30), mode: Mode::Differential },  // Craft
  Defaults { address: Some(0x38), mode: Mode::Centroid },      // Ring
  Defaults { address: Some(0x40), mode: Mode::Centroid },      // Hex
  Defaults { address: Some(0x48), mode: Mode::Centroid },      // Flex
];

/// Touch slots per axis on one-axis devices.
pub(crate) const MAX_TOUCHES_1D: usize = 5;
/// Touch slots per axis on two-axis devices.
pub(crate) const MAX_TOUCHES_2D: usize = 4;

const NUM_CHANNELS_BAR: usize = 26;
/// Two firmware generations disagree on the ring (28 vs 30). The shipped
/// ring hardware streams 28 channels.
const NUM_CHANNELS_RING: usize = 28;
const NUM_CHANNELS_MAX: usize = 30;

impl Device {
  /// Decode the variant byte of an identify response.
  pub const fn from_code(code: u8) -> Self {
    match code {
      1 => Self::Bar,
      2 => Self::Square,
      3 => Self::Craft,
      4 => Self::Ring,
      5 => Self::Hex,
      6 => Self::Flex,
      _ => Self::Unknown,
    }
  }

  /// Wire code of this variant, `None` for [`Device::None`].
  pub const fn code(self) -> Option<u8> {
    match self {
      Self::None => None,
      Self::Unknown => Some(0),
      Self::Bar => Some(1),
      Self::Square => Some(2),
      Self::Craft => Some(3),
      Self::Ring => Some(4),
      Self::Hex => Some(5),
      Self::Flex => Some(6),
    }
  }

  fn defaults(self) -> &'static Defaults {
    &DEFAULTS[self as usize]
  }

  /// Factory I2C address, if the variant has one.
  pub fn default_address(self) -> Option<u8> {
    self.defaults().address
  }

  /// Scan mode the variant is normally operated in. [`Mode::Auto`] means the
  /// variant alone does not imply one.
  pub fn default_mode(self) -> Mode {
    self.defaults().mode
  }

  /// Square and hex pads report a second, horizontal axis.
  pub const fn has_two_axes(self) -> bool {
    matches!(self, Self::Square | Self::Hex)
  }

  /// Touch slots available on each axis.
  pub const fn max_touches(self) -> usize {
    if self.has_two_axes() {
      MAX_TOUCHES_2D
    } else {
      MAX_TOUCHES_1D
    }
  }

  /// Number of capacitive channels.
  pub const fn num_channels(self) -> usize {
    match self {
      Self::Bar => NUM_CHANNELS_BAR,
      Self::Ring => NUM_CHANNELS_RING,
      _ => NUM_CHANNELS_MAX,
    }
  }

  /// Bytes in a full raw / baseline / differential frame.
  pub const fn raw_length(self) -> usize {
    2 * self.num_channels()
  }
}

/// What the data region returns on the next read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
  /// Resolve to the variant's default mode. Never sent to the device.
  Auto,
  /// Processed touch locations and sizes.
  Centroid,
  /// Raw channel counts.
  Raw,
  /// Per-channel baseline.
  Baseline,
  /// Raw minus baseline.
  Differential,
}

impl Mode {
  /// Byte sent with the mode command, `None` for [`Mode::Auto`].
  pub const fn code(self) -> Option<u8> {
    match self {
      Self::Auto => None,
      Self::Centroid => Some(0),
      Self::Raw => Some(1),
      Self::Baseline => Some(2),
      Self::Differential => Some(3),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn codes_round_trip_through_identify_byte() {
    for device in [Device::Bar, Device::Square, Device::Craft, Device::Ring, Device::Hex, Device::Flex] {
      let code = device.code().unwrap();
      assert_eq!(Device::from_code(code), device);
    }
    assert_eq!(Device::from_code(0), Device::Unknown);
    assert_eq!(Device::from_code(42), Device::Unknown);
    assert_eq!(Device::None.code(), None);
  }

  #[test]
  fn default_tables() {
    assert_eq!(Device::Bar.default_address(), Some(0x20));
    assert_eq!(Device::Square.default_address(), Some(0x28));
    assert_eq!(Device::Craft.default_address(), Some(0x30));
    assert_eq!(Device::Ring.default_address(), Some(0x38));
    assert_eq!(Device::Hex.default_address(), Some(0x40));
    assert_eq!(Device::Flex.default_address(), Some(0x48));
    assert_eq!(Device::Unknown.default_address(), None);
    assert_eq!(Device::None.default_address(), None);

    assert_eq!(Device::Craft.default_mode(), Mode::Differential);
    assert_eq!(Device::Ring.default_mode(), Mode::Centroid);
    assert_eq!(Device::Unknown.default_mode(), Mode::Auto);
  }

  #[test]
  fn raw_lengths_follow_channel_counts() {
    assert_eq!(Device::Bar.raw_length(), 52);
    assert_eq!(Device::Ring.raw_length(), 56);
    assert_eq!(Device::Square.raw_length(), 60);
    assert_eq!(Device::Hex.raw_length(), 60);
    assert_eq!(Device::Craft.raw_length(), 60);
    assert_eq!(Device::Unknown.raw_length(), 60);
  }

  #[test]
  fn two_axis_devices_have_four_slots() {
    assert_eq!(Device::Square.max_touches(), 4);
    assert_eq!(Device::Hex.max_touches(), 4);
    assert_eq!(Device::Bar.max_touches(), 5);
    assert_eq!(Device::Ring.max_touches(), 5);
  }

  #[test]
  fn auto_mode_has_no_wire_code() {
    assert_eq!(Mode::Auto.code(), None);
    assert_eq!(Mode::Centroid.code(), Some(0));
    assert_eq!(Mode::Differential.code(), Some(3));
  }
}
