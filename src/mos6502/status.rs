/// `Status` is the processor status register, `p` on the [`MOS6502`](super::MOS6502).
///
/// Each bit of `p` carries one flag:
///
/// ```text
/// +---+---+---+---+---+---+---+---+
/// | N | V | _ | B | D | I | Z | C |
/// +---+---+---+---+---+---+---+---+
///   7   6   5   4   3   2   1   0
/// ```
///
/// - `C` is the carry flag, the "ninth bit" of arithmetic and shifts.
/// - `Z` is set whenever an operation produces the 8-bit result `0`.
/// - `I` disables the maskable interrupt request line while set.
/// - `D` makes ADC and SBC operate on binary-coded-decimal values.
/// - `B` distinguishes a status byte pushed by BRK from one pushed by a
///   hardware interrupt. It only matters in the pushed copy.
/// - `_` (bit 5) is unused and always reads as 1. Any byte written into `p`
///   has this bit forced on.
/// - `V` is set when addition/subtraction overflows the signed range, and
///   by BIT from bit 6 of the tested value.
/// - `N` mirrors bit 7 of the last result.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Status(pub u8);

impl Status {
    pub fn get(self, flag: StatusFlag) -> bool {
        (self.0 & flag.mask()) != 0
    }

    pub fn set(&mut self, flag: StatusFlag, value: bool) {
        if value {
            self.0 |= flag.mask();
        } else {
            self.0 &= !flag.mask();
        }
    }

    /// A copy of this status with `flag` forced to `value`.
    pub fn with(mut self, flag: StatusFlag, value: bool) -> Status {
        self.set(flag, value);
        self
    }
}

impl Default for Status {
    /// The power-up status: only the always-on unused bit and interrupt
    /// disable are set.
    fn default() -> Status {
        Status(StatusFlag::Unused.mask() | StatusFlag::InterruptDisable.mask())
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum StatusFlag {
    Carry = 0,
    Zero = 1,
    InterruptDisable = 2,
    Decimal = 3,
    Break = 4,
    Unused = 5,
    Overflow = 6,
    Negative = 7,
}

impl StatusFlag {
    pub fn mask(self) -> u8 {
        1 << (self as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_roundtrip() {
        let mut status = Status(0);

        status.set(StatusFlag::Carry, true);
        status.set(StatusFlag::Negative, true);

        assert!(status.get(StatusFlag::Carry));
        assert!(status.get(StatusFlag::Negative));
        assert!(!status.get(StatusFlag::Zero));
        assert_eq!(status.0, 0b1000_0001);

        status.set(StatusFlag::Carry, false);
        assert!(!status.get(StatusFlag::Carry));
    }

    #[test]
    fn with_leaves_the_original_untouched() {
        let status = Status(0);
        let updated = status.with(StatusFlag::Break, true);

        assert_eq!(status.0, 0);
        assert_eq!(updated.0, 0b0001_0000);
    }

    #[test]
    fn power_up_state_sets_unused_and_interrupt_disable() {
        assert_eq!(Status::default().0, 0b0010_0100);
    }
}
