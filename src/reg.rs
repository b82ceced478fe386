/******************************************************************************
 * Trill sensors expose a tiny register file over I2C:                        *
 * - offset 0: command region, written to issue an opcode                     *
 * - offset 4: data region, read to fetch centroids or channel readings      *
 * ========================================================================== *
 *                        Trill - Opcodes & Memory Map                        *
*******************************************************************************/

/// Offset of the command region. The read pointer settles here after every
/// command write.
pub(crate) const OFFSET_COMMAND: u8 = 0;
/// Offset of the data region.
pub(crate) const OFFSET_DATA: u8 = 4;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
  Mode = 1,
  ScanSettings = 2,
  Prescaler = 3,
  NoiseThreshold = 4,
  Idac = 5,
  BaselineUpdate = 6,
  MinimumSize = 7,
  AutoScanInterval = 16,
  Identify = 255,
}

impl From<Command> for u8 {
  #[inline]
  fn from(c: Command) -> Self {
    c as u8
  }
}

/// Bytes in an identify response: reserved, device code, firmware version.
pub(crate) const IDENTIFY_LENGTH: usize = 3;

/// Largest raw frame the firmware streams, in bytes.
pub(crate) const RAW_LENGTH_MAX: usize = 60;

/// Largest centroid frame (two-axis devices), in bytes.
pub(crate) const CENTROID_LENGTH_MAX: usize = 32;

/// Receive buffer capacity; large enough for any single response.
pub(crate) const RX_CAPACITY: usize = 64;

/// Settle time after the identify opcode before the response is ready.
pub(crate) const IDENTIFY_DELAY_MS: u32 = 25;
/// Settle time between configuration commands.
pub(crate) const INTER_COMMAND_DELAY_MS: u32 = 15;
/// Reset pulse width.
pub(crate) const RESET_PULSE_US: u32 = 10;
