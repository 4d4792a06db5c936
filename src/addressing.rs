//! Addressing-mode resolution and stack primitives.
//!
//! Every cycle an instruction consumes is charged here or in the executor:
//! one cycle per instruction-stream fetch, one per data read or write, and
//! one per internal operation (index addition, page-crossing fix-up). The
//! indexed-absolute and `(zp),Y` resolvers report whether the index
//! addition crossed a page so read-type instructions can charge the penalty
//! only when it applies; write and read-modify-write forms always pay it.

use crate::STACK_PAGE;
use crate::bus::Bus;
use crate::cpu::Mos6502;
use crate::error::BusError;

impl Mos6502 {
    /// Charge `n` cycles for internal operations with no bus access.
    pub(crate) fn internal(&mut self, n: u64) {
        self.cycles += n;
    }

    /// Read a data byte, charging one cycle.
    pub(crate) fn load(&mut self, bus: &mut impl Bus, address: u16) -> Result<u8, BusError> {
        self.cycles += 1;
        bus.read(address)
    }

    /// Write a data byte, charging one cycle.
    pub(crate) fn store(
        &mut self,
        bus: &mut impl Bus,
        address: u16,
        value: u8,
    ) -> Result<(), BusError> {
        self.cycles += 1;
        bus.write(address, value)
    }

    /// Fetch the byte at `pc`, increment `pc`, and charge one cycle.
    ///
    /// This is the only place `pc` advances for instruction-stream reads;
    /// operand bytes are fetched through the same primitive.
    pub fn fetch(&mut self, bus: &mut impl Bus) -> Result<u8, BusError> {
        let value = self.load(bus, self.pc)?;
        self.pc = self.pc.wrapping_add(1);
        Ok(value)
    }

    /// Fetch a 16-bit word (little-endian) at `pc`.
    pub(crate) fn fetch_word(&mut self, bus: &mut impl Bus) -> Result<u16, BusError> {
        let low = self.fetch(bus)?;
        let high = self.fetch(bus)?;
        Ok(u16::from_le_bytes([low, high]))
    }

    /// Read a 16-bit word from memory (little-endian).
    pub(crate) fn read_word(&mut self, bus: &mut impl Bus, addr: u16) -> Result<u16, BusError> {
        let low = self.load(bus, addr)?;
        let high = self.load(bus, addr.wrapping_add(1))?;
        Ok(u16::from_le_bytes([low, high]))
    }

    /// Read a 16-bit word with the NMOS page-boundary bug (indirect JMP):
    /// if `addr` is `$xxFF`, the high byte comes from `$xx00`.
    pub(crate) fn read_word_page_bug(
        &mut self,
        bus: &mut impl Bus,
        addr: u16,
    ) -> Result<u16, BusError> {
        let low = self.load(bus, addr)?;
        let high_addr = (addr & 0xFF00) | (addr.wrapping_add(1) & 0x00FF);
        let high = self.load(bus, high_addr)?;
        Ok(u16::from_le_bytes([low, high]))
    }

    // =========================================================================
    // Stack primitives - page 1, growing downward, wrapping within the page
    // =========================================================================

    /// Push a byte onto the stack.
    pub(crate) fn push(&mut self, bus: &mut impl Bus, value: u8) -> Result<(), BusError> {
        let addr = STACK_PAGE | (self.sp & 0x00FF);
        self.store(bus, addr, value)?;
        self.sp = STACK_PAGE | (self.sp.wrapping_sub(1) & 0x00FF);
        Ok(())
    }

    /// Pull a byte from the stack.
    pub(crate) fn pull(&mut self, bus: &mut impl Bus) -> Result<u8, BusError> {
        self.sp = STACK_PAGE | (self.sp.wrapping_add(1) & 0x00FF);
        self.load(bus, self.sp)
    }

    /// Push a 16-bit word (high byte first).
    pub(crate) fn push_word(&mut self, bus: &mut impl Bus, value: u16) -> Result<(), BusError> {
        self.push(bus, (value >> 8) as u8)?;
        self.push(bus, value as u8)
    }

    /// Pull a 16-bit word (low byte first).
    pub(crate) fn pull_word(&mut self, bus: &mut impl Bus) -> Result<u16, BusError> {
        let low = self.pull(bus)?;
        let high = self.pull(bus)?;
        Ok(u16::from_le_bytes([low, high]))
    }

    // =========================================================================
    // Addressing mode resolvers
    // =========================================================================

    /// Zero Page: `$nn`
    pub(crate) fn addr_zero_page(&mut self, bus: &mut impl Bus) -> Result<u16, BusError> {
        Ok(u16::from(self.fetch(bus)?))
    }

    /// Zero Page,X: `$nn,X` (wraps within page zero, index add costs a cycle)
    pub(crate) fn addr_zero_page_x(&mut self, bus: &mut impl Bus) -> Result<u16, BusError> {
        let base = self.fetch(bus)?;
        self.internal(1);
        Ok(u16::from(base.wrapping_add(self.x)))
    }

    /// Zero Page,Y: `$nn,Y` (wraps within page zero, index add costs a cycle)
    pub(crate) fn addr_zero_page_y(&mut self, bus: &mut impl Bus) -> Result<u16, BusError> {
        let base = self.fetch(bus)?;
        self.internal(1);
        Ok(u16::from(base.wrapping_add(self.y)))
    }

    /// Absolute: `$nnnn`
    pub(crate) fn addr_absolute(&mut self, bus: &mut impl Bus) -> Result<u16, BusError> {
        self.fetch_word(bus)
    }

    /// Absolute,X: `$nnnn,X`. Returns (address, page crossed); the caller
    /// charges the penalty cycle when it applies.
    pub(crate) fn addr_absolute_x(&mut self, bus: &mut impl Bus) -> Result<(u16, bool), BusError> {
        let base = self.fetch_word(bus)?;
        let addr = base.wrapping_add(u16::from(self.x));
        Ok((addr, (base & 0xFF00) != (addr & 0xFF00)))
    }

    /// Absolute,Y: `$nnnn,Y`. Returns (address, page crossed).
    pub(crate) fn addr_absolute_y(&mut self, bus: &mut impl Bus) -> Result<(u16, bool), BusError> {
        let base = self.fetch_word(bus)?;
        let addr = base.wrapping_add(u16::from(self.y));
        Ok((addr, (base & 0xFF00) != (addr & 0xFF00)))
    }

    /// Indexed Indirect: `($nn,X)` - the pointer lives at zero-page address
    /// operand+X, wrapping within page zero.
    pub(crate) fn addr_indexed_indirect(&mut self, bus: &mut impl Bus) -> Result<u16, BusError> {
        let base = self.fetch(bus)?;
        self.internal(1);
        let ptr = base.wrapping_add(self.x);
        let low = self.load(bus, u16::from(ptr))?;
        let high = self.load(bus, u16::from(ptr.wrapping_add(1)))?;
        Ok(u16::from_le_bytes([low, high]))
    }

    /// Indirect Indexed: `($nn),Y`. Returns (address, page crossed).
    pub(crate) fn addr_indirect_indexed(
        &mut self,
        bus: &mut impl Bus,
    ) -> Result<(u16, bool), BusError> {
        let ptr = self.fetch(bus)?;
        let low = self.load(bus, u16::from(ptr))?;
        let high = self.load(bus, u16::from(ptr.wrapping_add(1)))?;
        let base = u16::from_le_bytes([low, high]);
        let addr = base.wrapping_add(u16::from(self.y));
        Ok((addr, (base & 0xFF00) != (addr & 0xFF00)))
    }

    /// Fetch a branch offset and take the branch if `condition` holds.
    ///
    /// Not taken: no extra cycles. Taken: one cycle, plus one more when the
    /// target lies in a different page than the next instruction.
    pub(crate) fn branch_if(
        &mut self,
        bus: &mut impl Bus,
        condition: bool,
    ) -> Result<(), BusError> {
        let offset = self.fetch(bus)? as i8;
        if condition {
            self.internal(1);
            let target = self.pc.wrapping_add(offset as u16);
            if (self.pc & 0xFF00) != (target & 0xFF00) {
                self.internal(1);
            }
            self.pc = target;
        }
        Ok(())
    }
}
