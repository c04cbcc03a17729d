//! Reference [`crate::serial::SerialDevice`] implementations useful for
//! testing and simple host integrations, beyond the callback-backed
//! [`crate::serial::HandlersDevice`].

pub mod buffer;
