//! The execution collaborator.

use sdb_eval::Machine;
use sdb_types::Word;

/// Whether the simulated CPU can execute further instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuState {
    Running,
    Halted,
}

/// A machine the monitor can single-step.
pub trait Cpu: Machine {
    /// Execute one instruction. A halted CPU stays halted.
    fn exec_once(&mut self) -> CpuState;

    /// Current state without executing anything.
    fn state(&self) -> CpuState;

    /// Current program counter.
    fn pc(&self) -> Word;

    /// Every register as `(name, value)`, in display order.
    fn registers(&self) -> Vec<(&'static str, Word)>;
}
