use thiserror::Error;

use super::operand::Operand;
use crate::mmu;

#[derive(Error, PartialEq, Eq, Debug)]
pub enum Error {
    /// The fetched byte is not a documented opcode. The byte has already
    /// been consumed from the instruction stream when this is raised.
    #[error("invalid instruction: {0:#04x}")]
    InvalidInstruction(u8),

    #[error("operand {0} has no value to read")]
    InvalidOperandRead(Operand),

    #[error("operand {0} cannot be written or modified")]
    InvalidOperandWrite(Operand),

    #[error("operand {0} has no effective address")]
    InvalidOperandAddress(Operand),

    #[error(transparent)]
    Memory(#[from] mmu::Error),
}
