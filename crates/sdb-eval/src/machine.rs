//! The collaborator interface to the simulated machine.

use sdb_types::Word;
use thiserror::Error;

/// A register name the register file does not know.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("undefined register `{name}`")]
pub struct UnknownRegister {
    pub name: String,
}

/// A physical memory read outside the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot read {len} bytes at physical address {addr:#010x}")]
pub struct BadAddress {
    pub addr: Word,
    pub len: u8,
}

/// Read access to a register file and physical memory.
///
/// The evaluator only reads; it never writes machine state.
pub trait Machine {
    /// Look up a register by canonical name or alias, without the `$` sigil.
    fn read_register(&self, name: &str) -> Result<Word, UnknownRegister>;

    /// Read `len` bytes at `addr` in host (little-endian) order.
    fn read_physical_memory(&self, addr: Word, len: u8) -> Result<Word, BadAddress>;
}

impl<M: Machine + ?Sized> Machine for &M {
    fn read_register(&self, name: &str) -> Result<Word, UnknownRegister> {
        (**self).read_register(name)
    }

    fn read_physical_memory(&self, addr: Word, len: u8) -> Result<Word, BadAddress> {
        (**self).read_physical_memory(addr, len)
    }
}
