//! End-to-end tests: whole machine-code programs executed against an `Mmu`
//! with the conventional RAM-low / ROM-high memory map, booted through the
//! reset vector.

use emul6502::mmu::{self, Bus, Mmu, Region};
use emul6502::mos6502::{Error, MOS6502};

/// Build a machine with 16K of RAM at `$0000` and a 32K ROM at `$8000`
/// holding `program`, with the reset vector pointing back at `$8000`.
fn machine(program: &[u8]) -> MOS6502<Mmu> {
    let mut image = vec![0; 0x8000];
    image[..program.len()].copy_from_slice(program);
    image[0x7FFC] = 0x00;
    image[0x7FFD] = 0x80;

    let mmu = Mmu::new(vec![
        Region::ram(0x0000, 0x4000, "RAM"),
        Region::rom(0x8000, 0x8000, "ROM").with_data(image),
    ])
    .expect("RAM and ROM do not overlap");

    MOS6502::new(mmu, None)
}

fn run(cpu: &mut MOS6502<Mmu>, steps: usize) {
    for _ in 0..steps {
        cpu.step().expect("program step failed");
    }
}

#[test]
fn boots_through_the_reset_vector_and_runs() {
    let mut cpu = machine(&[
        0xA9, 0x42, // 8000: LDA #$42
        0x8D, 0x00, 0x02, // 8002: STA $0200
        0xEA, // 8005: NOP
    ]);

    assert_eq!(cpu.cycles, 9);
    assert_eq!(cpu.registers.pc, 0x8000);

    run(&mut cpu, 3);

    assert_eq!(cpu.bus().read(0x0200), 0x42);
    assert_eq!(cpu.registers.pc, 0x8006);
    assert_eq!(cpu.cycles, 9 + 2 + 4 + 2);
}

#[test]
fn a_countdown_loop_runs_to_completion() {
    let mut cpu = machine(&[
        0xA2, 0x05, // 8000: LDX #$05
        0xCA, // 8002: DEX
        0xD0, 0xFD, // 8003: BNE $8002
        0xA9, 0x2A, // 8005: LDA #$2A
        0x8D, 0x00, 0x02, // 8007: STA $0200
    ]);

    // LDX, five (DEX, BNE) pairs, LDA, STA.
    run(&mut cpu, 1 + 5 * 2 + 2);

    assert_eq!(cpu.registers.x, 0x00);
    assert_eq!(cpu.bus().read(0x0200), 0x2A);

    // 9 boot + 2 LDX + 5*2 DEX + 4 taken branches at 3 + 1 untaken at 2
    // + 2 LDA + 4 STA.
    assert_eq!(cpu.cycles, 9 + 2 + 10 + 4 * 3 + 2 + 2 + 4);
}

#[test]
fn subroutine_calls_nest_and_return() {
    let mut image = vec![0; 0x1003];
    image[..9].copy_from_slice(&[
        0x20, 0x00, 0x90, // 8000: JSR $9000
        0x20, 0x00, 0x90, // 8003: JSR $9000
        0x20, 0x00, 0x90, // 8006: JSR $9000
    ]);
    // 9000: INC $10 / RTS
    image[0x1000..0x1003].copy_from_slice(&[0xE6, 0x10, 0x60]);

    let mut cpu = machine(&image);

    run(&mut cpu, 9);

    assert_eq!(cpu.bus().read(0x0010), 3);
    assert_eq!(cpu.registers.sp, 0xFF);
    assert_eq!(cpu.registers.pc, 0x8009);
    assert_eq!(cpu.cycles, 9 + 3 * (6 + 5 + 6));
}

#[test]
fn multiplication_by_repeated_addition() {
    let mut cpu = machine(&[
        0xA9, 0x00, // 8000: LDA #$00
        0xA2, 0x03, // 8002: LDX #$03
        0x18, // 8004: CLC
        0x69, 0x04, // 8005: ADC #$04
        0xCA, // 8007: DEX
        0xD0, 0xFA, // 8008: BNE $8004
        0x8D, 0x00, 0x02, // 800A: STA $0200
    ]);

    run(&mut cpu, 2 + 3 * 4 + 1);

    // 3 * 4 = 12
    assert_eq!(cpu.bus().read(0x0200), 0x0C);
    assert_eq!(cpu.cycles, 9 + 2 + 2 + 3 * (2 + 2 + 2) + 2 * 3 + 2 + 4);
}

#[test]
fn decimal_mode_addition_stores_bcd() {
    let mut cpu = machine(&[
        0xF8, // 8000: SED
        0x38, // 8001: SEC
        0xA9, 0x15, // 8002: LDA #$15
        0x69, 0x27, // 8004: ADC #$27
        0x8D, 0x00, 0x02, // 8006: STA $0200
    ]);

    run(&mut cpu, 5);

    assert_eq!(cpu.bus().read(0x0200), 0x43);
    assert_eq!(cpu.cycles, 9 + 2 + 2 + 2 + 2 + 4);
}

#[test]
fn a_write_into_rom_fails_and_leaves_prior_effects() {
    let mut cpu = machine(&[
        0xA9, 0x07, // 8000: LDA #$07
        0x8D, 0x00, 0x80, // 8002: STA $8000
    ]);

    cpu.step().expect("the load is fine");
    let result = cpu.step();

    assert_eq!(result, Err(Error::Memory(mmu::Error::ReadOnly(0x8000))));
    // The load before the failing store is still visible...
    assert_eq!(cpu.registers.a, 0x07);
    // ...and the ROM still holds its original byte.
    assert_eq!(cpu.bus().read(0x8000), 0xA9);
}
