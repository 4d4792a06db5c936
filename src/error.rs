//! Error types for bus access and instruction execution.

use thiserror::Error;

/// A failed bus access.
///
/// The bundled [`Memory`](crate::Memory) maps the full 64KB address space
/// and never raises this; it exists so that alternate `Bus` backing stores
/// with holes in their address decoding have a defined failure mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusError {
    /// The address is not mapped by the backing store.
    #[error("address ${address:04X} is outside the mapped address space")]
    AddressOutOfRange {
        /// The offending address.
        address: u16,
    },
}

/// A failed `step`.
///
/// Execution is deterministic and never retried. A decode failure leaves
/// the CPU at its pre-call state so the caller can halt, patch, or treat
/// the byte as a trap; a bus failure surfaces as soon as the access is
/// attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CpuError {
    /// The fetched byte matches no documented opcode.
    #[error("unknown opcode ${opcode:02X} at ${pc:04X}")]
    UnknownOpcode {
        /// The byte that failed to decode.
        opcode: u8,
        /// Address the byte was fetched from.
        pc: u16,
    },

    /// A bus access failed during fetch or execution.
    #[error(transparent)]
    Bus(#[from] BusError),
}
