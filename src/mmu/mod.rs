mod bus;
mod error;
mod region;

pub use bus::Bus;
pub use error::Error;
pub use region::Region;

use log::debug;

pub type Result<A> = std::result::Result<A, Error>;

/// Total number of addressable bytes with a 16-bit address bus.
pub const MEMORY_SIZE: usize = 0x10000;

/// `Mmu` models the flat 64 KiB address space of the 6502 as a set of named
/// [`Region`]s over a single pre-zeroed backing store.
///
/// Every address is always readable: addresses outside any declared region
/// read as `0`. Regions exist to carry a label, to seed initial contents
/// (typically a program image in ROM) and to mark ranges read-only — a write
/// to a read-only address fails with [`Error::ReadOnly`] and leaves the
/// store untouched.
#[derive(Debug)]
pub struct Mmu {
    memory: Vec<u8>,
    read_only: Vec<bool>,
    regions: Vec<Region>,
}

impl Mmu {
    /// Build an MMU from an ordered list of regions.
    ///
    /// Fails with [`Error::MemoryRange`] if any two regions overlap; nothing
    /// is returned in that case, not a partially configured MMU.
    pub fn new(regions: Vec<Region>) -> Result<Mmu> {
        let mut mmu = Mmu {
            memory: vec![0; MEMORY_SIZE],
            read_only: vec![false; MEMORY_SIZE],
            regions: Vec::new(),
        };

        for region in regions {
            mmu.add_region(region)?;
        }

        Ok(mmu)
    }

    /// Register one more region. Open interiors may not intersect with any
    /// region registered so far; touching boundaries are fine.
    pub fn add_region(&mut self, mut region: Region) -> Result<()> {
        if let Some(existing) = self.regions.iter().find(|r| r.overlaps(&region)) {
            return Err(Error::MemoryRange(
                region.name.clone(),
                existing.name.clone(),
            ));
        }

        let start = region.start as usize;
        // A `length` reaching past $FFFF cannot mark anything beyond the
        // top of the address space.
        let end = (region.end() as usize).min(MEMORY_SIZE);

        if let Some(data) = region.data.take() {
            let copied = data.len().min(end - start);
            self.memory[start..start + copied].copy_from_slice(&data[..copied]);
        }

        if region.read_only {
            for flag in &mut self.read_only[start..end] {
                *flag = true;
            }
        }

        debug!(
            "registered {} region `{}`: {:#06x}..{:#07x}",
            if region.read_only { "read-only" } else { "writable" },
            region.name,
            region.start,
            region.end(),
        );

        self.regions.push(region);
        Ok(())
    }

    /// The regions registered so far, in registration order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }
}

impl Bus for Mmu {
    fn read(&self, address: u16) -> u8 {
        self.memory[address as usize]
    }

    fn write(&mut self, address: u16, value: u8) -> Result<()> {
        if self.read_only[address as usize] {
            return Err(Error::ReadOnly(address));
        }

        self.memory[address as usize] = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undeclared_addresses_read_as_zero() {
        let mmu = Mmu::new(vec![Region::ram(0x0000, 0x4000, "RAM")]).unwrap();

        assert_eq!(mmu.read(0x0000), 0);
        assert_eq!(mmu.read(0x8000), 0);
        assert_eq!(mmu.read(0xFFFF), 0);
    }

    /// The backing store covers the full 16-bit space, so even the very last
    /// address (home of the IRQ vector's high byte) is usable.
    #[test]
    fn top_of_address_space_is_usable() {
        let mut mmu = Mmu::new(vec![]).unwrap();

        mmu.write(0xFFFF, 0xAB).unwrap();
        assert_eq!(mmu.read(0xFFFF), 0xAB);
    }

    #[test]
    fn initial_data_is_copied_from_the_region_start() {
        let mmu = Mmu::new(vec![
            Region::rom(0x8000, 0x1000, "ROM").with_data(vec![0xDE, 0xAD, 0xBE]),
        ])
        .unwrap();

        assert_eq!(mmu.read(0x8000), 0xDE);
        assert_eq!(mmu.read(0x8001), 0xAD);
        assert_eq!(mmu.read(0x8002), 0xBE);
        // The rest of the region stays zeroed.
        assert_eq!(mmu.read(0x8003), 0x00);
    }

    #[test]
    fn writes_to_a_read_only_region_fail_and_change_nothing() {
        let mut mmu = Mmu::new(vec![
            Region::rom(0x8000, 0x1000, "ROM").with_data(vec![0x42]),
        ])
        .unwrap();

        let result = mmu.write(0x8000, 0xFF);

        assert_eq!(result, Err(Error::ReadOnly(0x8000)));
        assert_eq!(mmu.read(0x8000), 0x42);
    }

    #[test]
    fn writes_to_a_writable_region_stick() {
        let mut mmu = Mmu::new(vec![Region::ram(0x0000, 0x4000, "RAM")]).unwrap();

        mmu.write(0x1234, 0x99).unwrap();
        assert_eq!(mmu.read(0x1234), 0x99);
    }

    #[test]
    fn straddling_regions_are_rejected() {
        let result = Mmu::new(vec![
            Region::ram(0x0000, 0x4000, "RAM"),
            Region::rom(0x3FFF, 0x1000, "ROM"),
        ]);

        assert_eq!(
            result.err(),
            Some(Error::MemoryRange("ROM".into(), "RAM".into()))
        );
    }

    #[test]
    fn identical_regions_are_rejected() {
        let result = Mmu::new(vec![
            Region::ram(0x2000, 0x0100, "A"),
            Region::ram(0x2000, 0x0100, "B"),
        ]);

        assert!(matches!(result, Err(Error::MemoryRange(_, _))));
    }

    #[test]
    fn containing_regions_are_rejected() {
        // Neither endpoint of the big region lies inside the small one, but
        // their interiors still intersect.
        let result = Mmu::new(vec![
            Region::ram(0x1000, 0x0100, "small"),
            Region::ram(0x0000, 0x8000, "big"),
        ]);

        assert!(matches!(result, Err(Error::MemoryRange(_, _))));
    }

    #[test]
    fn touching_regions_are_allowed() {
        let mmu = Mmu::new(vec![
            Region::ram(0x0000, 0x4000, "low"),
            Region::ram(0x4000, 0x4000, "high"),
        ]);

        assert!(mmu.is_ok());
    }

    #[test]
    fn regions_can_be_added_after_construction() {
        let mut mmu = Mmu::new(vec![Region::ram(0x0000, 0x4000, "RAM")]).unwrap();

        mmu.add_region(Region::rom(0x5000, 0x1000, "CharacterRom"))
            .unwrap();

        assert_eq!(mmu.regions().last().unwrap().name, "CharacterRom");
    }

    #[test]
    fn read_u16_is_little_endian() {
        let mut mmu = Mmu::new(vec![Region::ram(0x0000, 0xFFFF, "RAM")]).unwrap();
        mmu.write(0xAAAA, 0x01).unwrap();
        mmu.write(0xAAAB, 0xFF).unwrap();

        assert_eq!(mmu.read_u16(0xAAAA), 0xFF01);
    }

    #[test]
    fn write_u16_read_u16_roundtrip() {
        let mut mmu = Mmu::new(vec![Region::ram(0x0000, 0xFFFF, "RAM")]).unwrap();
        mmu.write_u16(0xBBAA, 0xBEEF).unwrap();

        assert_eq!(mmu.read_u16(0xBBAA), 0xBEEF);
    }
}
