//! SDB monitor: the debugger surface around the expression core.
//!
//! Parses monitor commands, runs them against a [`Cpu`], and stops
//! execution as soon as a watchpoint changes value.

pub mod command;
pub mod config;
pub mod corpus;
pub mod cpu;
pub mod logging;
pub mod monitor;
pub mod sim;

pub use command::{Command, CommandError, InfoTarget, COMMANDS};
pub use config::{ConfigError, MonitorConfig};
pub use corpus::{check_corpus, CorpusFailure, CorpusReport, Mismatch};
pub use cpu::{Cpu, CpuState};
pub use monitor::{Monitor, MonitorError, Outcome, StepReport, StopReason, WatchHit};
pub use sim::{SimMachine, SimOp};
