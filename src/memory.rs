//! Flat 64KB memory.

use crate::bus::Bus;
use crate::error::BusError;

/// Number of addressable bytes.
pub const MEMORY_SIZE: usize = 0x10000;

/// A flat 65536-byte memory image.
///
/// Pure storage: every address in `$0000-$FFFF` is always defined
/// (implicitly zero until written) and the image never resizes. The driver
/// owns it and populates the program and reset vector before handing it to
/// the CPU; no addressing-mode or instruction knowledge lives here.
#[derive(Clone)]
pub struct Memory {
    ram: [u8; MEMORY_SIZE],
}

impl Memory {
    /// Create a zero-filled memory image.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ram: [0; MEMORY_SIZE],
        }
    }

    /// Read the byte at `address`. Total: never fails.
    #[must_use]
    pub fn read(&self, address: u16) -> u8 {
        self.ram[usize::from(address)]
    }

    /// Store `value` at `address`. Never fails.
    pub fn write(&mut self, address: u16, value: u8) {
        self.ram[usize::from(address)] = value;
    }

    /// Set every address back to zero.
    pub fn clear(&mut self) {
        self.ram.fill(0);
    }

    /// Copy `bytes` into memory starting at `origin`, wrapping at `$FFFF`.
    pub fn load(&mut self, origin: u16, bytes: &[u8]) {
        let mut address = origin;
        for &byte in bytes {
            self.ram[usize::from(address)] = byte;
            address = address.wrapping_add(1);
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory").finish_non_exhaustive()
    }
}

impl Bus for Memory {
    fn read(&mut self, address: u16) -> Result<u8, BusError> {
        Ok(Self::read(self, address))
    }

    fn write(&mut self, address: u16, value: u8) -> Result<(), BusError> {
        Self::write(self, address, value);
        Ok(())
    }
}
