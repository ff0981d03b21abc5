//! Legacy single-line text command codec.
//!
//! The older remote-control protocol carries one human-readable command per
//! datagram:
//!
//! ```text
//! LeftClick
//! RightClick
//! Move:<dx>,<dy>          relative move in pixels
//! Abs:<screen>,<x>,<y>    pixel position inside display <screen>
//! Scroll:<delta>          raw wheel delta (120 = one notch)
//! Zoom:<steps>            signed zoom steps
//! Pinch:<direction>,<steps>
//! ```
//!
//! The keyword is matched case-insensitively and surrounding whitespace
//! (including a trailing newline from `nc`) is ignored.  The pinch direction
//! is normalised to `+1` (any value `>= 0`) or `-1`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// One parsed legacy command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyCommand {
    LeftClick,
    RightClick,
    Move { dx: i32, dy: i32 },
    /// A negative `screen` means "the configured default display".
    Abs { screen: i32, x: i32, y: i32 },
    Scroll { delta: i32 },
    Zoom { steps: i32 },
    /// `direction` is always `1` (pinch out / zoom in) or `-1`.
    Pinch { direction: i8, steps: i32 },
}

/// Errors produced while parsing a legacy command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LegacyParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command keyword: {0:?}")]
    UnknownCommand(String),

    #[error("{command} expects {expected} argument(s), got {actual}")]
    WrongArity {
        command: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid integer argument {0:?}")]
    InvalidNumber(String),
}

impl FromStr for LegacyCommand {
    type Err = LegacyParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(LegacyParseError::Empty);
        }

        let (keyword, args) = match line.split_once(':') {
            Some((k, a)) => (k.trim(), Some(a)),
            None => (line, None),
        };

        match keyword.to_ascii_lowercase().as_str() {
            "leftclick" => {
                expect_no_args("LeftClick", args)?;
                Ok(Self::LeftClick)
            }
            "rightclick" => {
                expect_no_args("RightClick", args)?;
                Ok(Self::RightClick)
            }
            "move" => {
                let [dx, dy] = parse_args::<2>("Move", args)?;
                Ok(Self::Move { dx, dy })
            }
            "abs" => {
                let [screen, x, y] = parse_args::<3>("Abs", args)?;
                Ok(Self::Abs { screen, x, y })
            }
            "scroll" => {
                let [delta] = parse_args::<1>("Scroll", args)?;
                Ok(Self::Scroll { delta })
            }
            "zoom" => {
                let [steps] = parse_args::<1>("Zoom", args)?;
                Ok(Self::Zoom { steps })
            }
            "pinch" => {
                let [direction, steps] = parse_args::<2>("Pinch", args)?;
                Ok(Self::Pinch {
                    direction: if direction >= 0 { 1 } else { -1 },
                    steps,
                })
            }
            _ => Err(LegacyParseError::UnknownCommand(keyword.to_string())),
        }
    }
}

impl fmt::Display for LegacyCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::LeftClick => f.write_str("LeftClick"),
            Self::RightClick => f.write_str("RightClick"),
            Self::Move { dx, dy } => write!(f, "Move:{dx},{dy}"),
            Self::Abs { screen, x, y } => write!(f, "Abs:{screen},{x},{y}"),
            Self::Scroll { delta } => write!(f, "Scroll:{delta}"),
            Self::Zoom { steps } => write!(f, "Zoom:{steps}"),
            Self::Pinch { direction, steps } => write!(f, "Pinch:{direction},{steps}"),
        }
    }
}

fn expect_no_args(command: &'static str, args: Option<&str>) -> Result<(), LegacyParseError> {
    match args.map(str::trim) {
        None | Some("") => Ok(()),
        Some(a) => Err(LegacyParseError::WrongArity {
            command,
            expected: 0,
            actual: a.split(',').count(),
        }),
    }
}

fn parse_args<const N: usize>(
    command: &'static str,
    args: Option<&str>,
) -> Result<[i32; N], LegacyParseError> {
    let parts: Vec<&str> = match args {
        Some(a) if !a.trim().is_empty() => a.split(',').map(str::trim).collect(),
        _ => Vec::new(),
    };
    if parts.len() != N {
        return Err(LegacyParseError::WrongArity {
            command,
            expected: N,
            actual: parts.len(),
        });
    }

    let mut out = [0i32; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|_| LegacyParseError::InvalidNumber(part.to_string()))?;
    }
    Ok(out)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
