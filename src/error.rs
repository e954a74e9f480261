use std::error;
use std::fmt;

/// Faults the interpreter reports to its caller. None of these abort the
/// process; the drive loop decides whether to stop, reload, or carry on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// program image longer than the 3584 bytes of RAM above 0x200
    ImageTooLarge { len: usize },
    /// fetch or memory-effect address outside [0x000, 0xfff]
    OutOfBounds { addr: u16, pc: u16 },
    /// instruction word matching no known opcode; pc was not advanced
    UnknownOpcode { word: u16, pc: u16 },
    /// call attempted with all 16 stack levels in use
    StackOverflow { pc: u16 },
    /// return attempted with an empty call stack
    StackUnderflow { pc: u16 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ImageTooLarge { len } => {
                write!(f, "program image is {} bytes; at most 3584 fit above 0x200", len)
            }
            Error::OutOfBounds { addr, pc } => {
                write!(f, "address 0x{:04x} out of range at pc 0x{:04x}", addr, pc)
            }
            Error::UnknownOpcode { word, pc } => {
                write!(f, "unknown opcode 0x{:04x} at pc 0x{:04x}", word, pc)
            }
            Error::StackOverflow { pc } => {
                write!(f, "call stack overflow at pc 0x{:04x}", pc)
            }
            Error::StackUnderflow { pc } => {
                write!(f, "return with empty call stack at pc 0x{:04x}", pc)
            }
        }
    }
}

impl error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_context() {
        let e = Error::UnknownOpcode { word: 0x8fff, pc: 0x0200 };
        assert_eq!(e.to_string(), "unknown opcode 0x8fff at pc 0x0200");
    }

    #[test]
    fn test_is_std_error() {
        fn takes_err(_: &dyn error::Error) {}
        takes_err(&Error::StackUnderflow { pc: 0x0202 });
    }
}
