//! 6502 status register (P) operations.
//!
//! The status register has the following bits:
//! - Bit 0: C (Carry)
//! - Bit 1: Z (Zero)
//! - Bit 2: I (Interrupt disable)
//! - Bit 3: D (Decimal mode)
//! - Bit 4: B (Break - only meaningful in copies pushed by BRK/PHP)
//! - Bit 5: - (unused, forced to 1 in pushed copies)
//! - Bit 6: V (Overflow)
//! - Bit 7: N (Negative)
//!
//! Internally `p` holds only the seven architectural flags; the unused bit
//! is added when the register is pushed and stripped when it is pulled.

use crate::cpu::Mos6502;

// Flag bit positions
pub(crate) const FLAG_C: u8 = 0; // Carry
pub(crate) const FLAG_Z: u8 = 1; // Zero
pub(crate) const FLAG_I: u8 = 2; // Interrupt disable
pub(crate) const FLAG_D: u8 = 3; // Decimal mode
pub(crate) const FLAG_B: u8 = 4; // Break (pseudo-flag)
pub(crate) const FLAG_U: u8 = 5; // Unused (1 in pushed copies)
pub(crate) const FLAG_V: u8 = 6; // Overflow
pub(crate) const FLAG_N: u8 = 7; // Negative

impl Mos6502 {
    pub(crate) fn get_flag(&self, flag: u8) -> bool {
        (self.p & (1 << flag)) != 0
    }

    pub(crate) fn set_flag(&mut self, flag: u8, value: bool) {
        if value {
            self.p |= 1 << flag;
        } else {
            self.p &= !(1 << flag);
        }
    }

    /// Carry flag.
    #[must_use]
    pub fn carry(&self) -> bool {
        self.get_flag(FLAG_C)
    }

    /// Zero flag: true iff the most recently affected value was zero.
    #[must_use]
    pub fn zero(&self) -> bool {
        self.get_flag(FLAG_Z)
    }

    /// Interrupt-disable flag.
    #[must_use]
    pub fn interrupt_disable(&self) -> bool {
        self.get_flag(FLAG_I)
    }

    /// Decimal-mode flag: BCD arithmetic for ADC/SBC.
    #[must_use]
    pub fn decimal(&self) -> bool {
        self.get_flag(FLAG_D)
    }

    /// Break flag.
    #[must_use]
    pub fn break_flag(&self) -> bool {
        self.get_flag(FLAG_B)
    }

    /// Overflow flag.
    #[must_use]
    pub fn overflow(&self) -> bool {
        self.get_flag(FLAG_V)
    }

    /// Negative flag: bit 7 of the most recently affected value.
    #[must_use]
    pub fn negative(&self) -> bool {
        self.get_flag(FLAG_N)
    }

    /// Set Zero and Negative flags based on value.
    pub(crate) fn set_zn(&mut self, value: u8) {
        self.set_flag(FLAG_Z, value == 0);
        self.set_flag(FLAG_N, value & 0x80 != 0);
    }

    /// Status register as pushed to the stack (sets U, and B for BRK/PHP).
    pub(crate) fn status_for_push(&self, brk: bool) -> u8 {
        let mut p = self.p | (1 << FLAG_U);
        if brk {
            p |= 1 << FLAG_B;
        }
        p
    }

    /// Restore the status register from a stack byte (B and U are ignored).
    pub(crate) fn set_status_from_stack(&mut self, value: u8) {
        self.p = value & !(1 << FLAG_B) & !(1 << FLAG_U);
    }
}
