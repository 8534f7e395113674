//! An instruction-level emulator for the MOS Technology 6502.
//!
//! The crate has two components:
//!
//! - [`mmu::Mmu`] models the flat 16-bit address space as a set of named
//!   regions with per-region write protection. It implements [`mmu::Bus`],
//!   the byte read/write seam that memory-mapped devices can also plug into.
//! - [`mos6502::MOS6502`] interprets 6502 machine code against a [`mmu::Bus`],
//!   one instruction per [`mos6502::MOS6502::step`], keeping an accurate
//!   model of the registers, flags, stack and cycle count.

pub mod mmu;
pub mod mos6502;

pub use mmu::{Bus, Mmu, Region};
pub use mos6502::MOS6502;
