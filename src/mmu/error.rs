use thiserror::Error;

#[derive(Error, PartialEq, Eq, Debug)]
pub enum Error {
    #[error("memory region `{0}` overlaps existing region `{1}`")]
    MemoryRange(String, String),

    #[error("invalid write to read-only address {0:#06x}")]
    ReadOnly(u16),
}
