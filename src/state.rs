//! Binary snapshotting support shared by the peripheral modules.
//!
//! Every component that owns mutable state (CPU, MMU, PPU, APU, timer,
//! serial, pad, DMA, cartridge) implements [`StateComponent`] so that a
//! whole [`crate::gb::GameBoy`] instance can be serialized to and
//! restored from a flat byte buffer, independently of how the host
//! chooses to persist it (file, network, in-memory snapshot for tests).

use crate::error::Error;

/// Selects the on-disk layout used by [`StateComponent::state`] and
/// [`StateComponent::set_state`]. Only one format exists today; the
/// parameter exists so a future format can be introduced without
/// breaking the trait's signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateFormat {
    #[default]
    Full,
}

pub trait StateComponent {
    /// Serializes the component's internal state into a flat byte
    /// buffer, in a format suitable to be fed back into `set_state`.
    fn state(&self, format: Option<StateFormat>) -> Result<Vec<u8>, Error>;

    /// Restores the component's internal state from a byte buffer
    /// previously produced by `state`.
    fn set_state(&mut self, data: &[u8], format: Option<StateFormat>) -> Result<(), Error>;
}
