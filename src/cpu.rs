//! The 6502 CPU: architectural state, fetch-decode-execute, cycle counting.

use log::{debug, warn};

use crate::bus::Bus;
use crate::error::{BusError, CpuError};
use crate::flags::{FLAG_C, FLAG_D, FLAG_I, FLAG_N, FLAG_V, FLAG_Z};
use crate::opcodes::{AddrMode, Instruction, Mnemonic, decode};
use crate::{IRQ_VECTOR, NMI_VECTOR, RESET_VECTOR, STACK_PAGE};

/// The MOS 6502 CPU.
///
/// Holds all architectural state; memory is borrowed per call, never owned,
/// so one CPU can be reused across different memory images. Construction
/// does not imply reset: call [`Mos6502::reset`] before the first `step`.
#[derive(Debug, Clone)]
pub struct Mos6502 {
    /// Accumulator
    pub(crate) a: u8,
    /// X index register
    pub(crate) x: u8,
    /// Y index register
    pub(crate) y: u8,
    /// Stack pointer: full page-1 address, low byte is the 8-bit offset
    pub(crate) sp: u16,
    /// Program counter: address of the next byte to fetch
    pub(crate) pc: u16,
    /// Status register (NV-BDIZC)
    pub(crate) p: u8,

    /// NMI request latched until serviced
    nmi_pending: bool,
    /// IRQ request latched until serviced or dropped by the I flag
    irq_pending: bool,

    /// Cumulative cycles consumed since construction
    pub(crate) cycles: u64,
}

impl Mos6502 {
    /// Create a CPU with cleared registers. `reset` must still be called to
    /// load `pc` from the reset vector before execution.
    #[must_use]
    pub fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: STACK_PAGE | 0x00FF,
            pc: 0,
            p: 0,
            nmi_pending: false,
            irq_pending: false,
            cycles: 0,
        }
    }

    // =========================================================================
    // Register accessors
    // =========================================================================

    #[must_use]
    pub fn a(&self) -> u8 {
        self.a
    }

    #[must_use]
    pub fn x(&self) -> u8 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> u8 {
        self.y
    }

    /// Stack pointer as a full page-1 address (`$01xx`).
    #[must_use]
    pub fn sp(&self) -> u16 {
        self.sp
    }

    #[must_use]
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Raw status byte. Only the seven architectural flag bits are held
    /// here; B and the unused bit appear in pushed copies only.
    #[must_use]
    pub fn status(&self) -> u8 {
        self.p
    }

    /// Cycles consumed since construction, across resets.
    #[must_use]
    pub fn total_cycles(&self) -> u64 {
        self.cycles
    }

    pub fn set_a(&mut self, value: u8) {
        self.a = value;
    }

    pub fn set_x(&mut self, value: u8) {
        self.x = value;
    }

    pub fn set_y(&mut self, value: u8) {
        self.y = value;
    }

    /// Set the stack pointer offset; the high byte is pinned to page 1.
    pub fn set_sp(&mut self, value: u16) {
        self.sp = STACK_PAGE | (value & 0x00FF);
    }

    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    pub fn set_status(&mut self, value: u8) {
        self.p = value;
    }

    // =========================================================================
    // Driver-facing operations
    // =========================================================================

    /// Reset the CPU: load `pc` little-endian from the reset vector at
    /// `$FFFC/$FFFD`, set `sp` to `$01FF`, clear `a`, `x`, `y`, every flag,
    /// and any pending interrupt request. Charges the 7-cycle reset
    /// sequence.
    ///
    /// Reset touches CPU-internal state only. It never clears or rewrites
    /// memory - the program and reset vector the driver placed there stay
    /// exactly as written.
    pub fn reset(&mut self, bus: &mut impl Bus) -> Result<(), BusError> {
        self.internal(5);
        self.pc = self.read_word(bus, RESET_VECTOR)?;
        self.sp = STACK_PAGE | 0x00FF;
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.p = 0;
        self.nmi_pending = false;
        self.irq_pending = false;
        debug!("reset: pc=${:04X}", self.pc);
        Ok(())
    }

    /// Execute exactly one instruction and return the cycles it consumed
    /// (opcode fetch + operand fetches + indirections + penalty cycles).
    ///
    /// A pending NMI, or a pending IRQ while the I flag is clear, is
    /// serviced first instead (7 cycles).
    ///
    /// On [`CpuError::UnknownOpcode`] the CPU is rewound to its pre-call
    /// state: `pc`, registers, flags, and the cycle counter are all
    /// unchanged, and the error carries the offending byte and the address
    /// it was fetched from.
    pub fn step(&mut self, bus: &mut impl Bus) -> Result<u32, CpuError> {
        let start = self.cycles;

        if self.nmi_pending {
            self.nmi_pending = false;
            self.service_interrupt(bus, NMI_VECTOR)?;
            return Ok((self.cycles - start) as u32);
        }
        if self.irq_pending && !self.interrupt_disable() {
            self.irq_pending = false;
            self.service_interrupt(bus, IRQ_VECTOR)?;
            return Ok((self.cycles - start) as u32);
        }

        let op_pc = self.pc;
        let opcode = self.fetch(bus)?;
        let Some(instr) = decode(opcode) else {
            self.pc = op_pc;
            self.cycles = start;
            warn!("unknown opcode ${opcode:02X} at ${op_pc:04X}");
            return Err(CpuError::UnknownOpcode { opcode, pc: op_pc });
        };

        self.execute(bus, instr)?;
        Ok((self.cycles - start) as u32)
    }

    /// Execute instructions until at least `budget` cycles have been
    /// consumed, returning the exact count (the final instruction is atomic
    /// and may overshoot). Stops early only on error.
    pub fn run_cycles(&mut self, bus: &mut impl Bus, budget: u32) -> Result<u32, CpuError> {
        let mut consumed = 0;
        while consumed < budget {
            consumed += self.step(bus)?;
        }
        Ok(consumed)
    }

    /// Request a maskable interrupt (logical level only). Serviced at the
    /// next `step` boundary if the I flag is clear.
    pub fn interrupt(&mut self) {
        self.irq_pending = true;
    }

    /// Request a non-maskable interrupt (logical level only).
    pub fn nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Push `pc` and status (B clear), set I, and vector. 7 cycles, same
    /// sequence for IRQ and NMI apart from the vector address.
    fn service_interrupt(&mut self, bus: &mut impl Bus, vector: u16) -> Result<(), BusError> {
        self.internal(2);
        self.push_word(bus, self.pc)?;
        self.push(bus, self.status_for_push(false))?;
        self.set_flag(FLAG_I, true);
        self.pc = self.read_word(bus, vector)?;
        Ok(())
    }

    // =========================================================================
    // Operand resolution - the single seam all handlers go through
    // =========================================================================

    /// Resolve a read operand: the inline byte for immediate mode,
    /// otherwise a read from the mode's effective address. Indexed modes
    /// charge the page-crossing penalty only when a page was crossed.
    fn operand_value(&mut self, bus: &mut impl Bus, mode: AddrMode) -> Result<u8, BusError> {
        if mode == AddrMode::Immediate {
            return self.fetch(bus);
        }
        let addr = self.operand_address(bus, mode, false)?;
        self.load(bus, addr)
    }

    /// Resolve the effective address for a store or read-modify-write.
    /// With `always_penalty`, indexed absolute and `($nn),Y` charge their
    /// extra cycle unconditionally, as the hardware does for writes.
    fn operand_address(
        &mut self,
        bus: &mut impl Bus,
        mode: AddrMode,
        always_penalty: bool,
    ) -> Result<u16, BusError> {
        let addr = match mode {
            AddrMode::ZeroPage => self.addr_zero_page(bus)?,
            AddrMode::ZeroPageX => self.addr_zero_page_x(bus)?,
            AddrMode::ZeroPageY => self.addr_zero_page_y(bus)?,
            AddrMode::Absolute => self.addr_absolute(bus)?,
            AddrMode::AbsoluteX => {
                let (addr, crossed) = self.addr_absolute_x(bus)?;
                if always_penalty || crossed {
                    self.internal(1);
                }
                addr
            }
            AddrMode::AbsoluteY => {
                let (addr, crossed) = self.addr_absolute_y(bus)?;
                if always_penalty || crossed {
                    self.internal(1);
                }
                addr
            }
            AddrMode::IndexedIndirect => self.addr_indexed_indirect(bus)?,
            AddrMode::IndirectIndexed => {
                let (addr, crossed) = self.addr_indirect_indexed(bus)?;
                if always_penalty || crossed {
                    self.internal(1);
                }
                addr
            }
            AddrMode::Implied
            | AddrMode::Accumulator
            | AddrMode::Immediate
            | AddrMode::Indirect
            | AddrMode::Relative => unreachable!("mode has no effective address"),
        };
        Ok(addr)
    }

    /// Read-modify-write skeleton shared by INC/DEC/ASL/LSR/ROL/ROR:
    /// accumulator forms modify A in place, memory forms read, spend the
    /// modify cycle, and write back.
    fn rmw(
        &mut self,
        bus: &mut impl Bus,
        mode: AddrMode,
        op: fn(&mut Self, u8) -> u8,
    ) -> Result<(), BusError> {
        if mode == AddrMode::Accumulator {
            self.internal(1);
            let value = self.a;
            self.a = op(self, value);
        } else {
            let addr = self.operand_address(bus, mode, true)?;
            let value = self.load(bus, addr)?;
            self.internal(1);
            let result = op(self, value);
            self.store(bus, addr, result)?;
        }
        Ok(())
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    fn execute(&mut self, bus: &mut impl Bus, instr: Instruction) -> Result<(), BusError> {
        use Mnemonic as M;

        let mode = instr.mode;
        match instr.mnemonic {
            // Loads
            M::Lda => {
                let value = self.operand_value(bus, mode)?;
                self.a = value;
                self.set_zn(value);
            }
            M::Ldx => {
                let value = self.operand_value(bus, mode)?;
                self.x = value;
                self.set_zn(value);
            }
            M::Ldy => {
                let value = self.operand_value(bus, mode)?;
                self.y = value;
                self.set_zn(value);
            }

            // Stores - never touch flags
            M::Sta => {
                let addr = self.operand_address(bus, mode, true)?;
                self.store(bus, addr, self.a)?;
            }
            M::Stx => {
                let addr = self.operand_address(bus, mode, true)?;
                self.store(bus, addr, self.x)?;
            }
            M::Sty => {
                let addr = self.operand_address(bus, mode, true)?;
                self.store(bus, addr, self.y)?;
            }

            // Register transfers
            M::Tax => {
                self.internal(1);
                self.x = self.a;
                self.set_zn(self.x);
            }
            M::Tay => {
                self.internal(1);
                self.y = self.a;
                self.set_zn(self.y);
            }
            M::Txa => {
                self.internal(1);
                self.a = self.x;
                self.set_zn(self.a);
            }
            M::Tya => {
                self.internal(1);
                self.a = self.y;
                self.set_zn(self.a);
            }
            M::Tsx => {
                self.internal(1);
                self.x = (self.sp & 0x00FF) as u8;
                self.set_zn(self.x);
            }
            M::Txs => {
                // TXS is the one transfer that does not affect flags
                self.internal(1);
                self.sp = STACK_PAGE | u16::from(self.x);
            }

            // Stack operations
            M::Pha => {
                self.internal(1);
                self.push(bus, self.a)?;
            }
            M::Php => {
                self.internal(1);
                let status = self.status_for_push(true);
                self.push(bus, status)?;
            }
            M::Pla => {
                self.internal(2);
                self.a = self.pull(bus)?;
                self.set_zn(self.a);
            }
            M::Plp => {
                self.internal(2);
                let status = self.pull(bus)?;
                self.set_status_from_stack(status);
            }

            // Logic
            M::And => {
                let value = self.operand_value(bus, mode)?;
                self.a &= value;
                self.set_zn(self.a);
            }
            M::Ora => {
                let value = self.operand_value(bus, mode)?;
                self.a |= value;
                self.set_zn(self.a);
            }
            M::Eor => {
                let value = self.operand_value(bus, mode)?;
                self.a ^= value;
                self.set_zn(self.a);
            }
            M::Bit => {
                let value = self.operand_value(bus, mode)?;
                self.bit(value);
            }

            // Arithmetic
            M::Adc => {
                let value = self.operand_value(bus, mode)?;
                self.adc(value);
            }
            M::Sbc => {
                let value = self.operand_value(bus, mode)?;
                self.sbc(value);
            }
            M::Cmp => {
                let value = self.operand_value(bus, mode)?;
                self.compare(self.a, value);
            }
            M::Cpx => {
                let value = self.operand_value(bus, mode)?;
                self.compare(self.x, value);
            }
            M::Cpy => {
                let value = self.operand_value(bus, mode)?;
                self.compare(self.y, value);
            }

            // Increments/decrements
            M::Inc => self.rmw(bus, mode, Self::inc_op)?,
            M::Dec => self.rmw(bus, mode, Self::dec_op)?,
            M::Inx => {
                self.internal(1);
                self.x = self.x.wrapping_add(1);
                self.set_zn(self.x);
            }
            M::Iny => {
                self.internal(1);
                self.y = self.y.wrapping_add(1);
                self.set_zn(self.y);
            }
            M::Dex => {
                self.internal(1);
                self.x = self.x.wrapping_sub(1);
                self.set_zn(self.x);
            }
            M::Dey => {
                self.internal(1);
                self.y = self.y.wrapping_sub(1);
                self.set_zn(self.y);
            }

            // Shifts and rotates
            M::Asl => self.rmw(bus, mode, Self::asl_op)?,
            M::Lsr => self.rmw(bus, mode, Self::lsr_op)?,
            M::Rol => self.rmw(bus, mode, Self::rol_op)?,
            M::Ror => self.rmw(bus, mode, Self::ror_op)?,

            // Jumps and calls
            M::Jmp => {
                let target = self.fetch_word(bus)?;
                self.pc = if mode == AddrMode::Indirect {
                    self.read_word_page_bug(bus, target)?
                } else {
                    target
                };
            }
            M::Jsr => {
                let target = self.fetch_word(bus)?;
                self.internal(1);
                // Push the address of the last byte of the JSR; RTS adds 1
                self.push_word(bus, self.pc.wrapping_sub(1))?;
                self.pc = target;
            }
            M::Rts => {
                self.internal(2);
                let addr = self.pull_word(bus)?;
                self.internal(1);
                self.pc = addr.wrapping_add(1);
            }
            M::Rti => {
                self.internal(2);
                let status = self.pull(bus)?;
                self.set_status_from_stack(status);
                self.pc = self.pull_word(bus)?;
            }

            // Branches
            M::Bpl => self.branch_if(bus, !self.negative())?,
            M::Bmi => self.branch_if(bus, self.negative())?,
            M::Bvc => self.branch_if(bus, !self.overflow())?,
            M::Bvs => self.branch_if(bus, self.overflow())?,
            M::Bcc => self.branch_if(bus, !self.carry())?,
            M::Bcs => self.branch_if(bus, self.carry())?,
            M::Bne => self.branch_if(bus, !self.zero())?,
            M::Beq => self.branch_if(bus, self.zero())?,

            // Flag operations
            M::Clc => {
                self.internal(1);
                self.set_flag(FLAG_C, false);
            }
            M::Sec => {
                self.internal(1);
                self.set_flag(FLAG_C, true);
            }
            M::Cli => {
                self.internal(1);
                self.set_flag(FLAG_I, false);
            }
            M::Sei => {
                self.internal(1);
                self.set_flag(FLAG_I, true);
            }
            M::Clv => {
                self.internal(1);
                self.set_flag(FLAG_V, false);
            }
            M::Cld => {
                self.internal(1);
                self.set_flag(FLAG_D, false);
            }
            M::Sed => {
                self.internal(1);
                self.set_flag(FLAG_D, true);
            }

            // System
            M::Brk => {
                // Padding byte is fetched and discarded; return address is pc+2
                let _ = self.fetch(bus)?;
                self.push_word(bus, self.pc)?;
                let status = self.status_for_push(true);
                self.push(bus, status)?;
                self.set_flag(FLAG_I, true);
                self.pc = self.read_word(bus, IRQ_VECTOR)?;
            }
            M::Nop => self.internal(1),
        }

        Ok(())
    }

    // =========================================================================
    // ALU operations
    // =========================================================================

    /// ADC - add with carry, binary or BCD depending on the D flag.
    fn adc(&mut self, value: u8) {
        if self.decimal() {
            self.adc_decimal(value);
        } else {
            self.adc_binary(value);
        }
    }

    fn adc_binary(&mut self, value: u8) {
        let carry = u16::from(self.carry());
        let sum = u16::from(self.a) + u16::from(value) + carry;
        let result = sum as u8;

        self.set_flag(FLAG_C, sum > 0xFF);
        self.set_flag(FLAG_V, (self.a ^ result) & (value ^ result) & 0x80 != 0);
        self.set_zn(result);
        self.a = result;
    }

    fn adc_decimal(&mut self, value: u8) {
        let a = u16::from(self.a);
        let v = u16::from(value);
        let carry = u16::from(self.carry());

        let mut low = (a & 0x0F) + (v & 0x0F) + carry;
        if low > 9 {
            low += 6;
        }
        let mut high = (a >> 4) + (v >> 4) + u16::from(low > 0x0F);

        // Z, N, V come from the intermediate binary result (NMOS behavior)
        let binary = (a + v + carry) as u8;
        self.set_flag(FLAG_Z, binary == 0);
        self.set_flag(FLAG_N, high & 0x08 != 0);
        self.set_flag(
            FLAG_V,
            (a ^ u16::from(binary)) & (v ^ u16::from(binary)) & 0x80 != 0,
        );

        if high > 9 {
            high += 6;
        }
        self.set_flag(FLAG_C, high > 0x0F);
        self.a = ((high << 4) as u8) | ((low & 0x0F) as u8);
    }

    /// SBC - subtract with borrow (carry clear = borrow).
    fn sbc(&mut self, value: u8) {
        if self.decimal() {
            self.sbc_decimal(value);
        } else {
            // Binary SBC is ADC of the one's complement
            self.adc_binary(!value);
        }
    }

    fn sbc_decimal(&mut self, value: u8) {
        let a = i16::from(self.a);
        let v = i16::from(value);
        let borrow = i16::from(!self.carry());

        // Flags come from the binary result (NMOS behavior)
        let binary = a - v - borrow;
        self.set_flag(FLAG_C, binary >= 0);
        self.set_flag(FLAG_Z, (binary as u8) == 0);
        self.set_flag(FLAG_N, binary & 0x80 != 0);
        self.set_flag(FLAG_V, (a ^ binary) & (a ^ v) & 0x80 != 0);

        let mut low = (a & 0x0F) - (v & 0x0F) - borrow;
        let mut high = (a >> 4) - (v >> 4);
        if low < 0 {
            low -= 6;
            high -= 1;
        }
        if high < 0 {
            high -= 6;
        }
        self.a = ((high << 4) as u8) | ((low as u8) & 0x0F);
    }

    /// CMP/CPX/CPY - compare register against value.
    fn compare(&mut self, register: u8, value: u8) {
        self.set_flag(FLAG_C, register >= value);
        self.set_zn(register.wrapping_sub(value));
    }

    /// BIT - Z from A AND M, N and V copied from bits 7 and 6 of M.
    fn bit(&mut self, value: u8) {
        self.set_flag(FLAG_Z, self.a & value == 0);
        self.set_flag(FLAG_N, value & 0x80 != 0);
        self.set_flag(FLAG_V, value & 0x40 != 0);
    }

    fn asl_op(&mut self, value: u8) -> u8 {
        self.set_flag(FLAG_C, value & 0x80 != 0);
        let result = value << 1;
        self.set_zn(result);
        result
    }

    fn lsr_op(&mut self, value: u8) -> u8 {
        self.set_flag(FLAG_C, value & 0x01 != 0);
        let result = value >> 1;
        self.set_zn(result);
        result
    }

    fn rol_op(&mut self, value: u8) -> u8 {
        let carry_in = u8::from(self.carry());
        self.set_flag(FLAG_C, value & 0x80 != 0);
        let result = (value << 1) | carry_in;
        self.set_zn(result);
        result
    }

    fn ror_op(&mut self, value: u8) -> u8 {
        let carry_in = if self.carry() { 0x80 } else { 0 };
        self.set_flag(FLAG_C, value & 0x01 != 0);
        let result = (value >> 1) | carry_in;
        self.set_zn(result);
        result
    }

    fn inc_op(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.set_zn(result);
        result
    }

    fn dec_op(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.set_zn(result);
        result
    }
}

impl Default for Mos6502 {
    fn default() -> Self {
        Self::new()
    }
}
