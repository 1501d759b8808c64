//! A small simulated RV32-style machine.
//!
//! Thirty-two general registers plus `pc`, little-endian byte memory
//! starting at `base`, and a scripted program of [`SimOp`]s: each step
//! executes the op at `(pc - base) / 4` and advances `pc` by one word.
//! Running past the last op halts the machine.

use crate::cpu::{Cpu, CpuState};
use sdb_eval::{BadAddress, Machine, UnknownRegister};
use sdb_types::{Word, WORD_BYTES};
use tracing::warn;

/// Default physical memory base.
pub const MEMORY_BASE: Word = 0x8000_0000;

/// ABI register names, indexed by register number.
pub const REGISTER_NAMES: [&str; 32] = [
    "$0", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// One scripted instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimOp {
    Nop,
    /// `reg = value`
    Li { reg: usize, value: Word },
    /// `reg += value`, wrapping
    Addi { reg: usize, value: Word },
    /// Store register `reg` to `addr`.
    Sw { reg: usize, addr: Word },
}

#[derive(Debug, Clone)]
pub struct SimMachine {
    regs: [Word; 32],
    pc: Word,
    base: Word,
    memory: Vec<u8>,
    program: Vec<SimOp>,
    state: CpuState,
}

impl SimMachine {
    /// A machine with `memory_size` zeroed bytes at `base` and `pc` at `base`.
    pub fn new(base: Word, memory_size: usize, program: Vec<SimOp>) -> Self {
        Self {
            regs: [0; 32],
            pc: base,
            base,
            memory: vec![0; memory_size],
            program,
            state: CpuState::Running,
        }
    }

    /// A counter program: `a0` counts from 1 to 5 and is stored to
    /// `base + 0x100` after each increment.
    pub fn demo(base: Word, memory_size: usize) -> Self {
        let a0 = 10;
        let slot = base.wrapping_add(0x100);
        let mut program = vec![SimOp::Li { reg: 2, value: slot }];
        for _ in 0..5 {
            program.push(SimOp::Addi { reg: a0, value: 1 });
            program.push(SimOp::Sw { reg: a0, addr: slot });
        }
        Self::new(base, memory_size, program)
    }

    /// Index of a register by ABI name, `x<N>` name, or alias.
    ///
    /// `$0` reaches the evaluator as `0` once its sigil is stripped, so the
    /// bare `0` is accepted alongside `$0` and `zero`.
    pub fn register_index(name: &str) -> Option<usize> {
        match name {
            "zero" | "0" => return Some(0),
            "fp" => return Some(8),
            _ => {}
        }
        if let Some(i) = REGISTER_NAMES.iter().position(|&n| n == name) {
            return Some(i);
        }
        name.strip_prefix('x')
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|&i| i < 32)
    }

    pub fn set_register(&mut self, index: usize, value: Word) {
        if index != 0 && index < 32 {
            self.regs[index] = value;
        }
    }

    fn offset(&self, addr: Word, len: u8) -> Result<usize, BadAddress> {
        let bad = BadAddress { addr, len };
        let offset = addr.checked_sub(self.base).ok_or(bad)? as usize;
        if offset + len as usize > self.memory.len() {
            return Err(bad);
        }
        Ok(offset)
    }

    /// Write `len` low bytes of `value` at `addr`, little-endian.
    pub fn write_physical_memory(&mut self, addr: Word, len: u8, value: Word) -> Result<(), BadAddress> {
        let offset = self.offset(addr, len)?;
        let bytes = value.to_le_bytes();
        self.memory[offset..offset + len as usize].copy_from_slice(&bytes[..len as usize]);
        Ok(())
    }

    fn execute(&mut self, op: SimOp) {
        match op {
            SimOp::Nop => {}
            SimOp::Li { reg, value } => self.set_register(reg, value),
            SimOp::Addi { reg, value } => {
                let v = self.regs.get(reg).copied().unwrap_or(0).wrapping_add(value);
                self.set_register(reg, v);
            }
            SimOp::Sw { reg, addr } => {
                let v = self.regs.get(reg).copied().unwrap_or(0);
                if let Err(e) = self.write_physical_memory(addr, WORD_BYTES, v) {
                    warn!(pc = self.pc, "store fault: {e}");
                    self.state = CpuState::Halted;
                }
            }
        }
    }
}

impl Machine for SimMachine {
    fn read_register(&self, name: &str) -> Result<Word, UnknownRegister> {
        if name == "pc" {
            return Ok(self.pc);
        }
        Self::register_index(name)
            .map(|i| self.regs[i])
            .ok_or_else(|| UnknownRegister { name: name.to_string() })
    }

    fn read_physical_memory(&self, addr: Word, len: u8) -> Result<Word, BadAddress> {
        if len == 0 || len > WORD_BYTES {
            return Err(BadAddress { addr, len });
        }
        let offset = self.offset(addr, len)?;
        let mut word = [0u8; 4];
        word[..len as usize].copy_from_slice(&self.memory[offset..offset + len as usize]);
        Ok(Word::from_le_bytes(word))
    }
}

impl Cpu for SimMachine {
    fn exec_once(&mut self) -> CpuState {
        if self.state == CpuState::Halted {
            return CpuState::Halted;
        }
        let index = (self.pc.wrapping_sub(self.base) / WORD_BYTES as Word) as usize;
        match self.program.get(index).copied() {
            Some(op) => {
                self.execute(op);
                self.pc = self.pc.wrapping_add(WORD_BYTES as Word);
            }
            None => self.state = CpuState::Halted,
        }
        self.state
    }

    fn state(&self) -> CpuState {
        self.state
    }

    fn pc(&self) -> Word {
        self.pc
    }

    fn registers(&self) -> Vec<(&'static str, Word)> {
        REGISTER_NAMES
            .iter()
            .copied()
            .zip(self.regs.iter().copied())
            .chain(std::iter::once(("pc", self.pc)))
            .collect()
    }
}
