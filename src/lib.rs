//! Cycle-counting MOS 6502 CPU emulator core.
//!
//! This crate implements the documented NMOS 6502 instruction set as an
//! embeddable instruction-execution engine. The driver owns a [`Memory`]
//! image (or any other [`Bus`] implementation), writes a program plus a
//! reset vector into it, and then drives the CPU:
//!
//! ```
//! use mos6502_core::{Memory, Mos6502, RESET_VECTOR};
//!
//! let mut mem = Memory::new();
//! mem.load(0x0200, &[0xA9, 0x42]); // LDA #$42
//! mem.write(RESET_VECTOR, 0x00);
//! mem.write(RESET_VECTOR + 1, 0x02);
//!
//! let mut cpu = Mos6502::new();
//! cpu.reset(&mut mem).unwrap();
//! let cycles = cpu.step(&mut mem).unwrap();
//! assert_eq!(cpu.a(), 0x42);
//! assert_eq!(cycles, 2);
//! ```
//!
//! Each instruction executes atomically in a single [`Mos6502::step`] call
//! that returns the cycles consumed: one cycle per instruction-stream or
//! operand fetch, one per memory indirection, plus the documented penalty
//! cycles for page-crossing indexed accesses. [`Mos6502::run_cycles`] runs
//! instructions until a cycle budget is exhausted.
//!
//! Bytes with no documented opcode are reported as
//! [`CpuError::UnknownOpcode`] with the CPU rewound to its pre-fetch state,
//! never silently skipped.
//!
//! Note that unlike real silicon (and unlike some naive emulators), `reset`
//! touches only CPU-internal state: it reads the reset vector but never
//! clears or rewrites the memory image the driver prepared.

mod addressing;
mod bus;
mod cpu;
mod error;
mod flags;
mod memory;
mod opcodes;

pub use bus::Bus;
pub use cpu::Mos6502;
pub use error::{BusError, CpuError};
pub use memory::{MEMORY_SIZE, Memory};
pub use opcodes::{AddrMode, Instruction, Mnemonic, decode};

/// Reset vector: `pc` is loaded little-endian from here by `reset`.
pub const RESET_VECTOR: u16 = 0xFFFC;

/// NMI vector, used when a non-maskable interrupt is serviced.
pub const NMI_VECTOR: u16 = 0xFFFA;

/// IRQ/BRK vector.
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// The stack occupies page 1 ($0100-$01FF), growing downward.
pub const STACK_PAGE: u16 = 0x0100;
