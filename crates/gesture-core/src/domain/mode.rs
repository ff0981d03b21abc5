//! Control mode: what pointer position updates drive.

use std::fmt;

/// The two controller modes.  Transitions happen only through explicit
/// set/toggle requests (a clap gesture toggles).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ControlMode {
    /// Position updates move the system cursor; pinch presses the button.
    #[default]
    Cursor,
    /// The system cursor is hidden and position updates move an overlay dot.
    LaserPointer,
}

impl ControlMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Cursor => Self::LaserPointer,
            Self::LaserPointer => Self::Cursor,
        }
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cursor => f.write_str("cursor"),
            Self::LaserPointer => f.write_str("laser-pointer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggled_flips_between_modes() {
        assert_eq!(ControlMode::Cursor.toggled(), ControlMode::LaserPointer);
        assert_eq!(ControlMode::LaserPointer.toggled(), ControlMode::Cursor);
    }

    #[test]
    fn test_default_mode_is_cursor() {
        assert_eq!(ControlMode::default(), ControlMode::Cursor);
    }
}
