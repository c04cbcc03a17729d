//! Error related data structures to be shared and used.
//!
//! This module contains the [`Error`] enum, used for initialization-time
//! failures, and the [`ErrorKind`] enum, used for the runtime error
//! callback that the host installs at construction time.

use std::fmt::{self, Display, Formatter};

/// Errors that can be returned from cartridge/emulator initialization.
///
/// No emulator state is retained when one of these is returned, the
/// host is expected to discard the half-built instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The ROM data has an invalid size (too short or not a multiple
    /// of the 16 KiB ROM bank size).
    RomSize,
    /// The cartridge header byte at 0x0147 does not map to one of the
    /// supported MBC families (0, 1, 2, 3, 5).
    UnsupportedCartridge,
    /// The header checksum stored at 0x014D does not match the
    /// computed checksum over 0x0134..=0x014C.
    InvalidChecksum,
    CustomError(String),
}

impl Error {
    pub fn description(&self) -> String {
        match self {
            Error::RomSize => String::from("Invalid ROM size"),
            Error::UnsupportedCartridge => String::from("Unsupported cartridge type"),
            Error::InvalidChecksum => String::from("Invalid header checksum"),
            Error::CustomError(message) => String::from(message),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Kinds of runtime error reported through the host's `error` callback.
///
/// Runtime errors never abort the core on their own; the callback
/// decides whether to terminate the host process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unknown,
    InvalidOpcode,
    InvalidRead,
    InvalidWrite,
    HaltForever,
}

impl ErrorKind {
    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::Unknown => "unknown error",
            ErrorKind::InvalidOpcode => "invalid opcode",
            ErrorKind::InvalidRead => "invalid read",
            ErrorKind::InvalidWrite => "invalid write",
            ErrorKind::HaltForever => "halt forever",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};

    #[test]
    fn test_error_display_matches_description() {
        assert_eq!(Error::InvalidChecksum.to_string(), "Invalid header checksum");
        assert_eq!(
            Error::CustomError(String::from("oops")).to_string(),
            "oops"
        );
    }

    #[test]
    fn test_error_kind_display_matches_description() {
        assert_eq!(ErrorKind::HaltForever.to_string(), "halt forever");
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(Error::RomSize, Error::RomSize);
        assert_ne!(Error::RomSize, Error::UnsupportedCartridge);
    }
}
