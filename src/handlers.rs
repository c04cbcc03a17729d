//! Host callback surface.
//!
//! The core never owns ROM or cart-RAM storage, never renders pixels to
//! a screen and never mixes audio: all of that is funneled through a
//! small set of callbacks that the host installs once, at construction
//! time, and that are then shared (via [`SharedMut`]) by every
//! component that needs to reach the host.
//!
//! Keeping the callbacks behind a single [`Handlers`] instance, rather
//! than scattering function pointers across `Cartridge`/`Ppu`/`Serial`,
//! matches how the register file and `IF` byte are shared: one owner,
//! borrowed by reference from the peripherals that need it.

use crate::{
    error::ErrorKind,
    ppu::DISPLAY_WIDTH,
    util::SharedMut,
};

/// Host callbacks consumed by the core, installed once at construction.
///
/// `rom_read` and `cart_ram_read` are expected to be pure and total:
/// for any address in range they must return a value, deterministically.
/// `cart_ram_write` is only invoked when the MBC's RAM-enable latch is
/// set. `error` is advisory: the core never aborts on its own, the host
/// decides whether to terminate.
pub struct Handlers {
    pub rom_read: Box<dyn FnMut(u32) -> u8>,
    pub cart_ram_read: Box<dyn FnMut(u32) -> u8>,
    pub cart_ram_write: Box<dyn FnMut(u32, u8)>,
    pub error: Box<dyn FnMut(ErrorKind, u16)>,
    pub line_draw: Option<Box<dyn FnMut(&[u8; DISPLAY_WIDTH], u8)>>,
    pub serial_tx: Option<Box<dyn FnMut(u8)>>,
    pub serial_rx: Option<Box<dyn FnMut() -> Option<u8>>>,
}

impl Handlers {
    pub fn set_rom_read(&mut self, callback: impl FnMut(u32) -> u8 + 'static) {
        self.rom_read = Box::new(callback);
    }

    pub fn set_cart_ram_read(&mut self, callback: impl FnMut(u32) -> u8 + 'static) {
        self.cart_ram_read = Box::new(callback);
    }

    pub fn set_cart_ram_write(&mut self, callback: impl FnMut(u32, u8) + 'static) {
        self.cart_ram_write = Box::new(callback);
    }

    pub fn set_error(&mut self, callback: impl FnMut(ErrorKind, u16) + 'static) {
        self.error = Box::new(callback);
    }

    pub fn set_line_draw(&mut self, callback: impl FnMut(&[u8; DISPLAY_WIDTH], u8) + 'static) {
        self.line_draw = Some(Box::new(callback));
    }

    pub fn set_serial_tx(&mut self, callback: impl FnMut(u8) + 'static) {
        self.serial_tx = Some(Box::new(callback));
    }

    pub fn set_serial_rx(&mut self, callback: impl FnMut() -> Option<u8> + 'static) {
        self.serial_rx = Some(Box::new(callback));
    }

    pub fn rom_read(&mut self, addr: u32) -> u8 {
        (self.rom_read)(addr)
    }

    pub fn cart_ram_read(&mut self, addr: u32) -> u8 {
        (self.cart_ram_read)(addr)
    }

    pub fn cart_ram_write(&mut self, addr: u32, value: u8) {
        (self.cart_ram_write)(addr, value)
    }

    pub fn error(&mut self, kind: ErrorKind, addr: u16) {
        (self.error)(kind, addr)
    }

    pub fn line_draw(&mut self, pixels: &[u8; DISPLAY_WIDTH], line: u8) {
        if let Some(callback) = self.line_draw.as_mut() {
            callback(pixels, line);
        }
    }

    pub fn serial_tx(&mut self, byte: u8) {
        if let Some(callback) = self.serial_tx.as_mut() {
            callback(byte);
        }
    }

    pub fn serial_rx(&mut self) -> Option<u8> {
        self.serial_rx.as_mut().and_then(|callback| callback())
    }
}

impl Default for Handlers {
    fn default() -> Self {
        Self {
            rom_read: Box::new(|_| 0xff),
            cart_ram_read: Box::new(|_| 0xff),
            cart_ram_write: Box::new(|_, _| {}),
            error: Box::new(|_, _| {}),
            line_draw: None,
            serial_tx: None,
            serial_rx: None,
        }
    }
}

pub type HandlersRef = SharedMut<Handlers>;

pub fn new_handlers_ref() -> HandlersRef {
    SharedMut::new(std::cell::RefCell::new(Handlers::default()))
}

#[cfg(test)]
mod tests {
    use super::Handlers;
    use crate::error::ErrorKind;

    #[test]
    fn test_default_rom_read_returns_0xff() {
        let mut handlers = Handlers::default();
        assert_eq!(handlers.rom_read(0x1234), 0xff);
        assert_eq!(handlers.cart_ram_read(0x0), 0xff);
    }

    #[test]
    fn test_default_cart_ram_write_and_error_are_no_ops() {
        let mut handlers = Handlers::default();
        handlers.cart_ram_write(0x0, 0xab);
        handlers.error(ErrorKind::InvalidOpcode, 0x100);
    }

    #[test]
    fn test_set_rom_read_overrides_callback() {
        let mut handlers = Handlers::default();
        handlers.set_rom_read(|addr| (addr & 0xff) as u8);
        assert_eq!(handlers.rom_read(0x1234), 0x34);
    }

    #[test]
    fn test_optional_serial_callbacks_default_to_none() {
        let mut handlers = Handlers::default();
        assert_eq!(handlers.serial_rx(), None);
        handlers.serial_tx(0xab); // must not panic with no callback set
    }
}
