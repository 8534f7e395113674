use std::fmt;

use super::error::Error;
use super::{Result, MOS6502};
use crate::mmu::Bus;

/// A fully resolved operand: what an addressing mode produced for one
/// instruction.
///
/// Operations statically know which shapes they accept — the decode table
/// never pairs, say, `STA` with an immediate — so the shape-mismatch errors
/// below are unreachable through `step` and exist to keep the accessors
/// total.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Operand {
    /// No operand (implied addressing).
    Implied,

    /// The operation targets the accumulator instead of memory.
    Accumulator,

    /// A literal value from the instruction stream.
    Immediate(u8),

    /// A signed branch displacement.
    Relative(i8),

    /// An effective address in the 16-bit space.
    Address(u16),
}

impl Operand {
    /// The effective address, for operations that write or jump.
    pub fn address(self) -> Result<u16> {
        match self {
            Operand::Address(address) => Ok(address),
            _ => Err(Error::InvalidOperandAddress(self)),
        }
    }

    /// The branch displacement.
    pub fn offset(self) -> Result<i8> {
        match self {
            Operand::Relative(offset) => Ok(offset),
            _ => Err(Error::InvalidOperandRead(self)),
        }
    }

    /// The operand's value: the literal itself, the accumulator, or the
    /// byte at the effective address.
    pub fn value<B: Bus>(self, cpu: &MOS6502<B>) -> Result<u8> {
        match self {
            Operand::Immediate(value) => Ok(value),
            Operand::Accumulator => Ok(cpu.registers.a),
            Operand::Address(address) => Ok(cpu.bus.read(address)),
            _ => Err(Error::InvalidOperandRead(self)),
        }
    }

    /// Read-modify-write through the operand, for the shifts, rotates and
    /// memory increments/decrements. Returns `(input, output)` so the
    /// caller can derive carry from the original bits; zero and negative
    /// are set from the output here, since every modify-style operation
    /// wants them.
    pub fn modify<B: Bus>(
        self,
        cpu: &mut MOS6502<B>,
        f: impl FnOnce(u8) -> u8,
    ) -> Result<(u8, u8)> {
        let (input, output) = match self {
            Operand::Accumulator => {
                let input = cpu.registers.a;
                let output = f(input);
                cpu.registers.a = output;
                (input, output)
            }
            Operand::Address(address) => {
                let input = cpu.bus.read(address);
                let output = f(input);
                cpu.bus.write(address, output)?;
                (input, output)
            }
            _ => return Err(Error::InvalidOperandWrite(self)),
        };

        cpu.registers.set_zn(output);
        Ok((input, output))
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Implied => Ok(()),
            Operand::Accumulator => write!(f, "A"),
            Operand::Immediate(value) => write!(f, "#${:02X}", value),
            Operand::Relative(offset) => write!(f, "{:+}", offset),
            Operand::Address(address) => write!(f, "${:04X}", address),
        }
    }
}
