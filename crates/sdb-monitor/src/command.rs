//! Monitor command parsing.

use thiserror::Error;

/// Every command with its one-line description, in `help` order.
pub const COMMANDS: &[(&str, &str)] = &[
    ("help", "Display information about all supported commands"),
    ("c", "Continue the execution of the program"),
    ("q", "Exit the monitor"),
    ("si", "si [N], Execute N (default one) steps"),
    ("info", "info SUBCMD, Print current state of (r)egisters or (w)atchpoints"),
    ("x", "x N EXPR, Print N words of memory starting at address EXPR"),
    ("p", "p EXPR, Calculate the value of expression EXPR"),
    ("w", "w EXPR, Stop executing when EXPR changes"),
    ("d", "d N, Delete watchpoint N"),
];

/// Address dumped by `x` when no expression is given.
pub const DEFAULT_DUMP_ADDR: &str = "0x80000000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoTarget {
    Registers,
    Watchpoints,
}

/// A parsed monitor command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help(Option<String>),
    Continue,
    Quit,
    Step(u64),
    Info(InfoTarget),
    Examine { count: u32, expr: String },
    Print(String),
    Watch(String),
    Delete(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("{0}: missing argument, see `help {0}`")]
    MissingArgument(&'static str),

    #[error("{command}: {message}")]
    BadArgument {
        command: &'static str,
        message: String,
    },
}

impl Command {
    /// Parse one input line. Returns `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let line = line.trim();
        let (name, args) = match line.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (line, ""),
        };
        if name.is_empty() {
            return Ok(None);
        }

        let command = match name {
            "help" => Command::Help(first_word(args).map(str::to_string)),
            "c" => Command::Continue,
            "q" => Command::Quit,
            "si" => match first_word(args) {
                None => Command::Step(1),
                Some(n) => Command::Step(positive("si", n)?),
            },
            "info" => match first_word(args) {
                Some("r") => Command::Info(InfoTarget::Registers),
                Some("w") => Command::Info(InfoTarget::Watchpoints),
                Some(other) => {
                    return Err(CommandError::BadArgument {
                        command: "info",
                        message: format!("unknown subcommand '{other}', see `help info`"),
                    })
                }
                None => return Err(CommandError::MissingArgument("info")),
            },
            "x" => {
                let (count, expr) = match args.split_once(char::is_whitespace) {
                    Some((n, expr)) => (n, expr.trim()),
                    None => (args, ""),
                };
                let count = if count.is_empty() {
                    1
                } else {
                    u32::try_from(positive("x", count)?).map_err(|_| CommandError::BadArgument {
                        command: "x",
                        message: format!("count {count} is too large"),
                    })?
                };
                let expr = if expr.is_empty() { DEFAULT_DUMP_ADDR } else { expr };
                Command::Examine {
                    count,
                    expr: expr.to_string(),
                }
            }
            "p" => Command::Print(required("p", args)?),
            "w" => Command::Watch(required("w", args)?),
            "d" => {
                let n = first_word(args).ok_or(CommandError::MissingArgument("d"))?;
                let id = n.parse::<usize>().map_err(|_| CommandError::BadArgument {
                    command: "d",
                    message: format!("expected a watchpoint number, got \"{n}\""),
                })?;
                Command::Delete(id)
            }
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn first_word(args: &str) -> Option<&str> {
    args.split_whitespace().next()
}

fn required(command: &'static str, args: &str) -> Result<String, CommandError> {
    if args.is_empty() {
        Err(CommandError::MissingArgument(command))
    } else {
        Ok(args.to_string())
    }
}

fn positive(command: &'static str, text: &str) -> Result<u64, CommandError> {
    match text.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::BadArgument {
            command,
            message: format!("expected a positive integer, got \"{text}\""),
        }),
    }
}
