use std::io;

use thiserror::Error;

/// Errors that can occur while loading a program into memory.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read program: {0}")]
    Io(#[from] io::Error),

    #[error("program is {size} bytes, but at most {max} bytes fit in memory")]
    TooLarge { size: usize, max: usize },
}

/// Errors that stop a cycle from completing.
/// None of them are recoverable, the program should be halted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StepError {
    #[error("address {0:#06x} is outside of memory")]
    Address(u16),

    #[error("call stack overflow, subroutines are nested too deep")]
    StackOverflow,

    #[error("call stack underflow, returned without a matching call")]
    StackUnderflow,
}
