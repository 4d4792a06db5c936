//! Memory bus interface.

use crate::error::BusError;

/// A bus that supports byte read/write operations by 16-bit address.
///
/// The CPU performs every fetch and data access through this trait; it
/// holds no long-lived reference to the backing store, so one store may be
/// reused across sequential CPU sessions. The bundled [`Memory`] maps the
/// entire address space and never fails; implementations with partial
/// address decoding report unmapped accesses as
/// [`BusError::AddressOutOfRange`].
///
/// [`Memory`]: crate::Memory
pub trait Bus {
    /// Read a byte from the given address.
    fn read(&mut self, address: u16) -> Result<u8, BusError>;

    /// Write a byte to the given address.
    fn write(&mut self, address: u16, value: u8) -> Result<(), BusError>;
}
