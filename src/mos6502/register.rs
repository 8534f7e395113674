/// Selects a register for the operations that are generic over their target:
/// loads, stores, transfers, compares and the stack push/pull pairs.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Register {
    A,
    X,
    Y,
    SP,
    P,
}
