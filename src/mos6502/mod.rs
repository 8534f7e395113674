mod addressing_mode;
mod error;
mod instruction;
mod interrupt;
mod opcode;
mod operand;
mod register;
mod registers;
mod status;

use std::convert::TryFrom;

use log::trace;

use addressing_mode::page_crossed;
use instruction::Instruction;
use register::Register;

use crate::mmu::Bus;

pub use addressing_mode::AddressingMode;
pub use error::Error;
pub use interrupt::{
    Interrupt, ABORT_VECTOR_ADDRESS, COP_VECTOR_ADDRESS, IRQ_VECTOR_ADDRESS, NMI_VECTOR_ADDRESS,
    RESET_VECTOR_ADDRESS,
};
pub use opcode::Opcode;
pub use operand::Operand;
pub use registers::Registers;
pub use status::{Status, StatusFlag};

pub type Result<A> = std::result::Result<A, Error>;

/// Page the hardware stack lives in unless overridden (`$0100..=$01FF`).
pub const DEFAULT_STACK_PAGE: u8 = 0x01;

/// Cycles the 6502 spends sorting out its internals at power-up.
const POWER_UP_CYCLES: u64 = 7;

/// Extra cycles to fetch the 16-bit address from the reset vector.
const RESET_VECTOR_CYCLES: u64 = 2;

/// Cycles consumed servicing a hardware interrupt.
const INTERRUPT_CYCLES: u64 = 7;

/// `MOS6502` emulates the MOS Technology 6502 microprocessor at instruction
/// granularity: each [`MOS6502::step`] fetches, decodes and executes one
/// complete instruction against the owned bus, charging the documented cycle
/// cost (base cycles plus any page-crossing or taken-branch penalties).
///
/// The processor owns its bus for its whole lifetime — there is no shared
/// memory and no concurrency anywhere in the model. Every read, write, flag
/// update and cycle charge is a deterministic, totally ordered effect of the
/// current step.
#[derive(Debug)]
pub struct MOS6502<B> {
    pub registers: Registers,

    /// Total cycles charged since power-up. Monotonically non-decreasing.
    pub cycles: u64,

    /// High byte of the address range the stack lives in.
    stack_page: u8,

    bus: B,
}

impl<B: Bus> MOS6502<B> {
    /// Power up a processor on `bus`.
    ///
    /// When `program_counter` is given execution will start there. Otherwise
    /// the processor reads the little-endian reset vector at `$FFFC/$FFFD`,
    /// which costs 2 cycles on top of the unconditional 7 power-up cycles.
    pub fn new(bus: B, program_counter: Option<u16>) -> MOS6502<B> {
        let mut cpu = MOS6502 {
            registers: Registers::new(0),
            cycles: POWER_UP_CYCLES,
            stack_page: DEFAULT_STACK_PAGE,
            bus,
        };

        match program_counter {
            Some(pc) => cpu.registers.pc = pc,
            None => {
                cpu.registers.pc = cpu.bus.read_u16(RESET_VECTOR_ADDRESS);
                cpu.cycles += RESET_VECTOR_CYCLES;
            }
        }

        cpu
    }

    /// Move the stack out of the conventional `$01` page.
    pub fn with_stack_page(mut self, stack_page: u8) -> MOS6502<B> {
        self.stack_page = stack_page;
        self
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Simulate the `reset` input: registers back to their power-up state
    /// and execution restarted from the reset vector.
    pub fn reset(&mut self) {
        self.registers.reset(0);
        self.registers.pc = self.bus.read_u16(RESET_VECTOR_ADDRESS);
        self.cycles += POWER_UP_CYCLES + RESET_VECTOR_CYCLES;
    }

    /// Fetch, decode and execute one instruction.
    ///
    /// An unknown opcode fails with [`Error::InvalidInstruction`] after the
    /// byte has been consumed; the caller decides whether that is fatal. A
    /// failed write (ROM protection) surfaces as [`Error::Memory`] with any
    /// effects prior to the write still in place, per the hardware's
    /// semantics.
    pub fn step(&mut self) -> Result<()> {
        let pc = self.registers.pc;

        let opcode_byte = self.read_pc_u8();
        let instruction = Instruction::try_from(opcode_byte)?;
        let operand = instruction.mode.resolve(self);

        trace!("{:04X}  {} {}", pc, instruction.opcode, operand);

        self.execute(instruction.opcode, operand)?;
        self.cycles += instruction.cycles as u64;

        Ok(())
    }

    /// Raise an interrupt line.
    ///
    /// `NMI` (and the reserved `ABORT`/`COP` kinds) are always taken; `IRQ`
    /// is ignored while the interrupt-disable flag is set. Taking an
    /// interrupt pushes the program counter and status, sets interrupt
    /// disable and jumps through the kind's vector, for 7 cycles. `RESET`
    /// is routed to [`MOS6502::reset`], which pushes nothing.
    pub fn interrupt(&mut self, interrupt: Interrupt) -> Result<()> {
        if interrupt == Interrupt::RESET {
            self.reset();
            return Ok(());
        }

        if interrupt.maskable() && self.registers.p.get(StatusFlag::InterruptDisable) {
            return Ok(());
        }

        self.service_interrupt(interrupt)?;
        self.cycles += INTERRUPT_CYCLES;
        Ok(())
    }

    fn service_interrupt(&mut self, interrupt: Interrupt) -> Result<()> {
        let return_address = match interrupt {
            // BRK leaves a padding byte after the opcode.
            Interrupt::BRK => self.registers.pc.wrapping_add(1),
            _ => self.registers.pc,
        };

        self.push_u16(return_address)?;

        let status = self
            .registers
            .p
            .with(StatusFlag::Break, interrupt == Interrupt::BRK);
        self.push(status.0)?;

        self.registers.p.set(StatusFlag::InterruptDisable, true);
        self.registers.pc = self.bus.read_u16(interrupt.vector_address());

        Ok(())
    }

    /// Push a byte at the current stack top, then step the stack pointer
    /// down. The 6502 stack descends within its page.
    pub fn push(&mut self, value: u8) -> Result<()> {
        self.bus.write(self.stack_address(), value)?;
        self.registers.sp = self.registers.sp.wrapping_sub(1);
        Ok(())
    }

    /// Step the stack pointer up, then read the byte there.
    pub fn pull(&mut self) -> u8 {
        self.registers.sp = self.registers.sp.wrapping_add(1);
        self.bus.read(self.stack_address())
    }

    fn stack_address(&self) -> u16 {
        u16::from_le_bytes([self.registers.sp, self.stack_page])
    }

    fn push_u16(&mut self, value: u16) -> Result<()> {
        let [lo, hi] = value.to_le_bytes();

        // 16-bit values go on the stack high byte first.
        self.push(hi)?;
        self.push(lo)
    }

    fn pull_u16(&mut self) -> u16 {
        let lo = self.pull();
        let hi = self.pull();
        u16::from_le_bytes([lo, hi])
    }

    /// Read the byte at `pc`, advancing `pc` past it.
    fn read_pc_u8(&mut self) -> u8 {
        let value = self.bus.read(self.registers.pc);
        self.registers.pc = self.registers.pc.wrapping_add(1);
        value
    }

    /// Read a little-endian word at `pc`, advancing `pc` past it.
    fn read_pc_u16(&mut self) -> u16 {
        let lo = self.read_pc_u8();
        let hi = self.read_pc_u8();
        u16::from_le_bytes([lo, hi])
    }

    /// Add an index register to a base address, charging the extra cycle
    /// the indexed modes cost when the sum lands on a different page.
    fn index_absolute(&mut self, base: u16, index: u8) -> u16 {
        let address = base.wrapping_add(index as u16);

        if page_crossed(base, address) {
            self.cycles += 1;
        }

        address
    }

    fn read_register(&self, register: Register) -> u8 {
        match register {
            Register::A => self.registers.a,
            Register::X => self.registers.x,
            Register::Y => self.registers.y,
            Register::SP => self.registers.sp,
            Register::P => self.registers.p.0,
        }
    }

    /// Write a value to a register, with the flag behavior that register
    /// implies: `A`/`X`/`Y` update zero and negative, `SP` updates nothing,
    /// and a byte landing in `P` has the unused bit forced on.
    fn write_register(&mut self, register: Register, value: u8) {
        match register {
            Register::A => {
                self.registers.a = value;
                self.registers.set_zn(value);
            }
            Register::X => {
                self.registers.x = value;
                self.registers.set_zn(value);
            }
            Register::Y => {
                self.registers.y = value;
                self.registers.set_zn(value);
            }
            Register::SP => self.registers.sp = value,
            Register::P => {
                self.registers.p = Status(value).with(StatusFlag::Unused, true);
            }
        }
    }

    fn modify_register(&mut self, register: Register, f: impl FnOnce(u8) -> u8) {
        let value = self.read_register(register);
        self.write_register(register, f(value));
    }

    fn execute(&mut self, opcode: Opcode, operand: Operand) -> Result<()> {
        match opcode {
            // Loads and stores
            Opcode::LDA => self.op_load(Register::A, operand),
            Opcode::LDX => self.op_load(Register::X, operand),
            Opcode::LDY => self.op_load(Register::Y, operand),
            Opcode::STA => self.op_store(Register::A, operand),
            Opcode::STX => self.op_store(Register::X, operand),
            Opcode::STY => self.op_store(Register::Y, operand),

            // Register transfers
            Opcode::TAX => self.op_transfer(Register::A, Register::X),
            Opcode::TAY => self.op_transfer(Register::A, Register::Y),
            Opcode::TXA => self.op_transfer(Register::X, Register::A),
            Opcode::TYA => self.op_transfer(Register::Y, Register::A),
            Opcode::TSX => self.op_transfer(Register::SP, Register::X),
            Opcode::TXS => self.op_transfer(Register::X, Register::SP),

            // Stack operations
            Opcode::PHA => self.op_push(Register::A),
            Opcode::PHP => self.op_push(Register::P),
            Opcode::PLA => self.op_pull(Register::A),
            Opcode::PLP => self.op_pull(Register::P),

            // Logical operations
            Opcode::AND => self.op_logical(operand, |a, value| a & value),
            Opcode::EOR => self.op_logical(operand, |a, value| a ^ value),
            Opcode::ORA => self.op_logical(operand, |a, value| a | value),
            Opcode::BIT => self.op_bit(operand),

            // Arithmetic
            Opcode::ADC => self.op_add(operand),
            Opcode::SBC => self.op_subtract(operand),
            Opcode::CMP => self.op_compare(Register::A, operand),
            Opcode::CPX => self.op_compare(Register::X, operand),
            Opcode::CPY => self.op_compare(Register::Y, operand),

            // Increments and decrements
            Opcode::INC => self.op_modify(operand, |value| value.wrapping_add(1)),
            Opcode::DEC => self.op_modify(operand, |value| value.wrapping_sub(1)),
            Opcode::INX => Ok(self.modify_register(Register::X, |x| x.wrapping_add(1))),
            Opcode::INY => Ok(self.modify_register(Register::Y, |y| y.wrapping_add(1))),
            Opcode::DEX => Ok(self.modify_register(Register::X, |x| x.wrapping_sub(1))),
            Opcode::DEY => Ok(self.modify_register(Register::Y, |y| y.wrapping_sub(1))),

            // Shifts and rotates
            Opcode::ASL => self.op_shift_left(operand),
            Opcode::LSR => self.op_shift_right(operand),
            Opcode::ROL => self.op_rotate_left(operand),
            Opcode::ROR => self.op_rotate_right(operand),

            // Jumps and subroutines
            Opcode::JMP => self.op_jump(operand),
            Opcode::JSR => self.op_jump_subroutine(operand),
            Opcode::RTS => self.op_return(),

            // Branches
            Opcode::BPL => self.op_branch(operand, StatusFlag::Negative, false),
            Opcode::BMI => self.op_branch(operand, StatusFlag::Negative, true),
            Opcode::BVC => self.op_branch(operand, StatusFlag::Overflow, false),
            Opcode::BVS => self.op_branch(operand, StatusFlag::Overflow, true),
            Opcode::BCC => self.op_branch(operand, StatusFlag::Carry, false),
            Opcode::BCS => self.op_branch(operand, StatusFlag::Carry, true),
            Opcode::BNE => self.op_branch(operand, StatusFlag::Zero, false),
            Opcode::BEQ => self.op_branch(operand, StatusFlag::Zero, true),

            // Flag changes
            Opcode::CLC => Ok(self.registers.p.set(StatusFlag::Carry, false)),
            Opcode::CLD => Ok(self.registers.p.set(StatusFlag::Decimal, false)),
            Opcode::CLI => Ok(self.registers.p.set(StatusFlag::InterruptDisable, false)),
            Opcode::CLV => Ok(self.registers.p.set(StatusFlag::Overflow, false)),
            Opcode::SEC => Ok(self.registers.p.set(StatusFlag::Carry, true)),
            Opcode::SED => Ok(self.registers.p.set(StatusFlag::Decimal, true)),
            Opcode::SEI => Ok(self.registers.p.set(StatusFlag::InterruptDisable, true)),

            // System
            Opcode::BRK => self.service_interrupt(Interrupt::BRK),
            Opcode::RTI => self.op_return_from_interrupt(),
            Opcode::NOP => Ok(()),
        }
    }

    fn op_load(&mut self, register: Register, operand: Operand) -> Result<()> {
        let value = operand.value(self)?;
        self.write_register(register, value);
        Ok(())
    }

    fn op_store(&mut self, register: Register, operand: Operand) -> Result<()> {
        let address = operand.address()?;
        let value = self.read_register(register);
        self.bus.write(address, value)?;
        Ok(())
    }

    /// Copy `source` into `target`.
    fn op_transfer(&mut self, source: Register, target: Register) -> Result<()> {
        let value = self.read_register(source);
        self.write_register(target, value);
        Ok(())
    }

    fn op_push(&mut self, source: Register) -> Result<()> {
        let value = self.read_register(source);
        self.push(value)
    }

    fn op_pull(&mut self, target: Register) -> Result<()> {
        let value = self.pull();
        self.write_register(target, value);
        Ok(())
    }

    fn op_logical(&mut self, operand: Operand, f: fn(u8, u8) -> u8) -> Result<()> {
        let value = operand.value(self)?;
        let result = f(self.registers.a, value);
        self.write_register(Register::A, result);
        Ok(())
    }

    fn op_bit(&mut self, operand: Operand) -> Result<()> {
        let value = operand.value(self)?;

        self.registers.p.set(StatusFlag::Zero, self.registers.a & value == 0);
        self.registers.p.set(StatusFlag::Negative, value & 0x80 != 0);
        self.registers.p.set(StatusFlag::Overflow, value & 0x40 != 0);

        Ok(())
    }

    fn op_add(&mut self, operand: Operand) -> Result<()> {
        let value = operand.value(self)?;
        let a = self.registers.a;
        let carry = self.registers.p.get(StatusFlag::Carry) as u16;

        if self.registers.p.get(StatusFlag::Decimal) {
            let result = bcd_decode(a) as u16 + bcd_decode(value) as u16 + carry;
            self.registers.p.set(StatusFlag::Carry, result > 99);

            let encoded = bcd_encode((result % 100) as u8);
            self.registers.a = encoded;
            self.registers.set_zn(encoded);
        } else {
            let result = a as u16 + value as u16 + carry;
            let truncated = result as u8;

            self.registers.p.set(StatusFlag::Carry, result > 0xFF);

            // Signed overflow: the operands share a sign that the result
            // doesn't have.
            self.registers.p.set(
                StatusFlag::Overflow,
                (!(a ^ value) & (a ^ truncated)) & 0x80 != 0,
            );

            self.registers.a = truncated;
            self.registers.set_zn(truncated);
        }

        Ok(())
    }

    fn op_subtract(&mut self, operand: Operand) -> Result<()> {
        let value = operand.value(self)?;
        let a = self.registers.a;
        let borrow = 1 - self.registers.p.get(StatusFlag::Carry) as i16;

        if self.registers.p.get(StatusFlag::Decimal) {
            let result = bcd_decode(a) as i16 - bcd_decode(value) as i16 - borrow;
            self.registers.p.set(StatusFlag::Carry, result >= 0);

            let encoded = bcd_encode(result.rem_euclid(100) as u8);
            self.registers.a = encoded;
            self.registers.set_zn(encoded);
        } else {
            let result = a as i16 - value as i16 - borrow;
            let truncated = result as u8;

            self.registers.p.set(StatusFlag::Carry, result >= 0);
            self.registers.p.set(
                StatusFlag::Overflow,
                ((a ^ value) & (a ^ truncated)) & 0x80 != 0,
            );

            self.registers.a = truncated;
            self.registers.set_zn(truncated);
        }

        Ok(())
    }

    /// Flags as if subtracting the value from the register; nothing else
    /// changes.
    fn op_compare(&mut self, register: Register, operand: Operand) -> Result<()> {
        let register = self.read_register(register);
        let value = operand.value(self)?;
        let result = register.wrapping_sub(value);

        self.registers.p.set(StatusFlag::Zero, result == 0);
        self.registers.p.set(StatusFlag::Carry, value <= register);
        self.registers.p.set(StatusFlag::Negative, result & 0x80 != 0);

        Ok(())
    }

    fn op_modify(&mut self, operand: Operand, f: impl FnOnce(u8) -> u8) -> Result<()> {
        operand.modify(self, f)?;
        Ok(())
    }

    fn op_shift_left(&mut self, operand: Operand) -> Result<()> {
        let (input, _) = operand.modify(self, |value| value << 1)?;
        self.registers.p.set(StatusFlag::Carry, input & 0x80 != 0);
        Ok(())
    }

    fn op_shift_right(&mut self, operand: Operand) -> Result<()> {
        let (input, _) = operand.modify(self, |value| value >> 1)?;
        self.registers.p.set(StatusFlag::Carry, input & 0x01 != 0);
        Ok(())
    }

    fn op_rotate_left(&mut self, operand: Operand) -> Result<()> {
        let carry_in = self.registers.p.get(StatusFlag::Carry) as u8;
        let (input, _) = operand.modify(self, |value| (value << 1) | carry_in)?;
        self.registers.p.set(StatusFlag::Carry, input & 0x80 != 0);
        Ok(())
    }

    fn op_rotate_right(&mut self, operand: Operand) -> Result<()> {
        let carry_in = self.registers.p.get(StatusFlag::Carry) as u8;
        let (input, _) = operand.modify(self, |value| (value >> 1) | (carry_in << 7))?;
        self.registers.p.set(StatusFlag::Carry, input & 0x01 != 0);
        Ok(())
    }

    fn op_jump(&mut self, operand: Operand) -> Result<()> {
        self.registers.pc = operand.address()?;
        Ok(())
    }

    fn op_jump_subroutine(&mut self, operand: Operand) -> Result<()> {
        let target = operand.address()?;

        // The return address on the stack is the last byte of the JSR
        // instruction; RTS compensates.
        self.push_u16(self.registers.pc.wrapping_sub(1))?;

        self.registers.pc = target;
        Ok(())
    }

    fn op_return(&mut self) -> Result<()> {
        self.registers.pc = self.pull_u16().wrapping_add(1);
        Ok(())
    }

    fn op_return_from_interrupt(&mut self) -> Result<()> {
        let status = self.pull();
        self.write_register(Register::P, status);
        self.registers.pc = self.pull_u16();
        Ok(())
    }

    /// All eight branches: taken when `flag` reads as `expected`. A taken
    /// branch costs one extra cycle, two if it lands on a different page
    /// than the instruction that follows the branch.
    fn op_branch(&mut self, operand: Operand, flag: StatusFlag, expected: bool) -> Result<()> {
        let offset = operand.offset()?;

        if self.registers.p.get(flag) == expected {
            let from = self.registers.pc;
            let target = from.wrapping_add(offset as u16);

            self.cycles += 1;
            if page_crossed(from, target) {
                self.cycles += 1;
            }

            self.registers.pc = target;
        }

        Ok(())
    }
}

/// Decode a packed binary-coded-decimal byte to the number it represents.
fn bcd_decode(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0F)
}

/// Encode a number below 100 as packed binary-coded-decimal.
fn bcd_encode(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}
