//! The monitor: command dispatch and watchpoint-aware stepping.

use crate::command::{Command, CommandError, InfoTarget, COMMANDS};
use crate::cpu::{Cpu, CpuState};
use sdb_eval::{evaluate_with, EvalError};
use sdb_lexer::Lexer;
use sdb_types::{Limits, Word, WORD_BYTES};
use sdb_watchpoint::{WatchpointError, WatchpointPool};
use std::fmt::Write as _;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Watchpoint(#[from] WatchpointError),
}

/// Text produced by one command, and whether the monitor should exit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub output: String,
    pub quit: bool,
}

impl Outcome {
    fn text(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            quit: false,
        }
    }
}

/// A watchpoint whose value changed after an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchHit {
    pub id: usize,
    pub expression: String,
    pub old_value: Word,
    pub new_value: Word,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The requested number of instructions ran.
    Completed,
    /// The CPU halted.
    Halted,
    /// At least one watchpoint changed.
    Watchpoint(Vec<WatchHit>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub executed: u64,
    pub stop: StopReason,
}

/// Owns the CPU and the watchpoint pool and runs commands against them.
pub struct Monitor<C: Cpu> {
    cpu: C,
    pool: WatchpointPool,
    limits: Limits,
}

impl<C: Cpu> Monitor<C> {
    pub fn new(cpu: C, limits: Limits) -> Self {
        Self {
            cpu,
            pool: WatchpointPool::new(limits),
            limits,
        }
    }

    pub fn cpu(&self) -> &C {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut C {
        &mut self.cpu
    }

    pub fn watchpoints(&self) -> &WatchpointPool {
        &self.pool
    }

    /// Evaluate an expression against the current machine state.
    pub fn evaluate(&self, text: &str) -> Result<Word, EvalError> {
        evaluate_with(&Lexer::new(self.limits), text, &self.cpu)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Stepping
    // ══════════════════════════════════════════════════════════════════════

    /// Execute up to `count` instructions, or until halt when `None`.
    ///
    /// Watchpoints are polled after every instruction; the first
    /// instruction after which any of them changed ends the run. A polling
    /// failure also ends it, with the pool left as it was before that poll.
    pub fn step(&mut self, count: Option<u64>) -> Result<StepReport, MonitorError> {
        let mut executed = 0;
        loop {
            if count.is_some_and(|n| executed >= n) {
                return Ok(StepReport {
                    executed,
                    stop: StopReason::Completed,
                });
            }
            if self.cpu.exec_once() == CpuState::Halted {
                return Ok(StepReport {
                    executed,
                    stop: StopReason::Halted,
                });
            }
            executed += 1;

            let hits = self.poll_watchpoints()?;
            if !hits.is_empty() {
                for hit in &hits {
                    info!(
                        id = hit.id,
                        expression = %hit.expression,
                        old = hit.old_value,
                        new = hit.new_value,
                        "watchpoint triggered"
                    );
                }
                return Ok(StepReport {
                    executed,
                    stop: StopReason::Watchpoint(hits),
                });
            }
        }
    }

    fn poll_watchpoints(&mut self) -> Result<Vec<WatchHit>, MonitorError> {
        if self.pool.active_len() == 0 {
            return Ok(Vec::new());
        }
        let before = self.pool.list_active();
        let changed = self.pool.poll_all(&self.cpu)?;
        Ok(changed
            .into_iter()
            .filter_map(|id| {
                let old = before.iter().find(|w| w.id == id)?;
                let new = self.pool.get(id)?;
                Some(WatchHit {
                    id,
                    expression: new.expression.clone(),
                    old_value: old.current_value,
                    new_value: new.current_value,
                })
            })
            .collect())
    }

    // ══════════════════════════════════════════════════════════════════════
    // Commands
    // ══════════════════════════════════════════════════════════════════════

    /// Parse and run one input line.
    pub fn execute_line(&mut self, line: &str) -> Result<Outcome, MonitorError> {
        match Command::parse(line)? {
            Some(command) => self.execute(command),
            None => Ok(Outcome::default()),
        }
    }

    /// Run one parsed command.
    pub fn execute(&mut self, command: Command) -> Result<Outcome, MonitorError> {
        debug!(?command, "execute");
        match command {
            Command::Help(topic) => help(topic.as_deref()).map(Outcome::text),
            Command::Quit => Ok(Outcome {
                output: String::new(),
                quit: true,
            }),
            Command::Continue => self.run(None),
            Command::Step(n) => self.run(Some(n)),
            Command::Info(InfoTarget::Registers) => Ok(Outcome::text(self.render_registers())),
            Command::Info(InfoTarget::Watchpoints) => Ok(Outcome::text(self.render_watchpoints())),
            Command::Examine { count, expr } => self.examine(count, &expr).map(Outcome::text),
            Command::Print(expr) => {
                let value = self.evaluate(&expr)?;
                Ok(Outcome::text(format!("{value} ({value:#x})")))
            }
            Command::Watch(expr) => {
                let id = self.pool.watch(&expr, &self.cpu)?;
                let value = self.pool.get(id).map(|w| w.current_value).unwrap_or_default();
                Ok(Outcome::text(format!("watchpoint {id}: {expr} = {value}")))
            }
            Command::Delete(id) => {
                self.pool.release(id)?;
                Ok(Outcome::text(format!("deleted watchpoint {id}")))
            }
        }
    }

    fn run(&mut self, count: Option<u64>) -> Result<Outcome, MonitorError> {
        if self.cpu.state() == CpuState::Halted {
            return Ok(Outcome::text(
                "the program has halted, nothing left to execute",
            ));
        }
        let report = self.step(count)?;
        let mut out = String::new();
        match &report.stop {
            StopReason::Completed => {}
            StopReason::Halted => {
                let _ = write!(out, "program halted at pc = {:#010x}", self.cpu.pc());
            }
            StopReason::Watchpoint(hits) => {
                for hit in hits {
                    let _ = writeln!(
                        out,
                        "watchpoint {}: {} changed {} -> {}",
                        hit.id, hit.expression, hit.old_value, hit.new_value
                    );
                }
                let _ = write!(out, "stopped at pc = {:#010x}", self.cpu.pc());
            }
        }
        Ok(Outcome::text(out))
    }

    fn examine(&self, count: u32, expr: &str) -> Result<String, MonitorError> {
        let mut addr = self.evaluate(expr)?;
        let mut out = String::new();
        for i in 0..count {
            let word = self
                .cpu
                .read_physical_memory(addr, WORD_BYTES)
                .map_err(EvalError::from)?;
            if i > 0 {
                out.push('\n');
            }
            let _ = write!(out, "{addr:#010x}: {word:#010x}\t{word}");
            addr = addr.wrapping_add(WORD_BYTES as Word);
        }
        Ok(out)
    }

    fn render_registers(&self) -> String {
        self.cpu
            .registers()
            .into_iter()
            .map(|(name, value)| format!("{name:<4}\t{value:#010x}\t{value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_watchpoints(&self) -> String {
        if self.pool.active_len() == 0 {
            return "No watchpoints".to_string();
        }
        let mut out = String::from("NO\tEXPR\t\tlast\t\tcurrent\t\tis_changed");
        for wp in self.pool.iter_active() {
            let _ = write!(out, "\n{wp}");
        }
        out
    }
}

fn help(topic: Option<&str>) -> Result<String, MonitorError> {
    match topic {
        None => Ok(COMMANDS
            .iter()
            .map(|(name, desc)| format!("{name} - {desc}"))
            .collect::<Vec<_>>()
            .join("\n")),
        Some(topic) => COMMANDS
            .iter()
            .find(|(name, _)| *name == topic)
            .map(|(name, desc)| format!("{name} - {desc}"))
            .ok_or_else(|| CommandError::Unknown(topic.to_string()).into()),
    }
}
