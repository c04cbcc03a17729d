//! Joypad (P1) register and button-state handling.

use std::io::Cursor;

use crate::{
    data::{read_u8, write_u8},
    error::Error,
    mmu::BusComponent,
    state::{StateComponent, StateFormat},
};

pub struct Pad {
    down: bool,
    up: bool,
    left: bool,
    right: bool,
    start: bool,
    select: bool,
    b: bool,
    a: bool,
    selection: PadSelection,

    /// Set whenever a selected button transitions from released to
    /// pressed, cleared by `ack_pad`/`set_int_pad(false)`.
    int_pad: bool,
}

#[derive(Clone, Copy, PartialEq)]
pub enum PadSelection {
    Action,
    Direction,
}

pub enum PadKey {
    Up,
    Down,
    Left,
    Right,
    Start,
    Select,
    A,
    B,
}

impl Pad {
    pub fn new() -> Self {
        Self {
            down: false,
            up: false,
            left: false,
            right: false,
            start: false,
            select: false,
            b: false,
            a: false,
            selection: PadSelection::Action,
            int_pad: false,
        }
    }

    pub fn reset(&mut self) {
        self.down = false;
        self.up = false;
        self.left = false;
        self.right = false;
        self.start = false;
        self.select = false;
        self.b = false;
        self.a = false;
        self.selection = PadSelection::Action;
        self.int_pad = false;
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr & 0x00ff {
            0x0000 => {
                let mut value;
                match self.selection {
                    PadSelection::Action => {
                        value = if self.a { 0x00 } else { 0x01 }
                            | if self.b { 0x00 } else { 0x02 }
                            | if self.select { 0x00 } else { 0x04 }
                            | if self.start { 0x00 } else { 0x08 }
                    }
                    PadSelection::Direction => {
                        value = if self.right { 0x00 } else { 0x01 }
                            | if self.left { 0x00 } else { 0x02 }
                            | if self.up { 0x00 } else { 0x04 }
                            | if self.down { 0x00 } else { 0x08 }
                    }
                }
                value |= if self.selection == PadSelection::Direction {
                    0x10
                } else {
                    0x00
                } | if self.selection == PadSelection::Action {
                    0x20
                } else {
                    0x00
                };
                value
            }
            addr => panic!("Reading from unknown Pad location 0x{:04x}", addr),
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        match addr & 0x00ff {
            0x0000 => {
                self.selection = if value & 0x10 == 0x00 {
                    PadSelection::Direction
                } else {
                    PadSelection::Action
                }
            }
            addr => panic!("Writing to unknown Pad location 0x{:04x}", addr),
        }
    }

    pub fn key_press(&mut self, key: PadKey) {
        match key {
            PadKey::Up => self.up = true,
            PadKey::Down => self.down = true,
            PadKey::Left => self.left = true,
            PadKey::Right => self.right = true,
            PadKey::Start => self.start = true,
            PadKey::Select => self.select = true,
            PadKey::A => self.a = true,
            PadKey::B => self.b = true,
        }
        self.int_pad = true;
    }

    pub fn key_lift(&mut self, key: PadKey) {
        match key {
            PadKey::Up => self.up = false,
            PadKey::Down => self.down = false,
            PadKey::Left => self.left = false,
            PadKey::Right => self.right = false,
            PadKey::Start => self.start = false,
            PadKey::Select => self.select = false,
            PadKey::A => self.a = false,
            PadKey::B => self.b = false,
        }
    }

    /// Sets the complete button state from a single byte, as an
    /// alternative to individual `key_press`/`key_lift` calls.
    ///
    /// Bit layout (1 = pressed): 0=A, 1=B, 2=Select, 3=Start,
    /// 4=Right, 5=Left, 6=Up, 7=Down.
    pub fn set_state(&mut self, value: u8) {
        let was_pressed = self.a
            || self.b
            || self.select
            || self.start
            || self.right
            || self.left
            || self.up
            || self.down;

        self.a = value & 0x01 != 0;
        self.b = value & 0x02 != 0;
        self.select = value & 0x04 != 0;
        self.start = value & 0x08 != 0;
        self.right = value & 0x10 != 0;
        self.left = value & 0x20 != 0;
        self.up = value & 0x40 != 0;
        self.down = value & 0x80 != 0;

        let is_pressed = value != 0x00;
        if is_pressed && !was_pressed {
            self.int_pad = true;
        }
    }

    /// Returns the current button state as a single byte, using the
    /// same bit layout as [`Pad::set_state`].
    pub fn state(&self) -> u8 {
        (self.a as u8)
            | (self.b as u8) << 1
            | (self.select as u8) << 2
            | (self.start as u8) << 3
            | (self.right as u8) << 4
            | (self.left as u8) << 5
            | (self.up as u8) << 6
            | (self.down as u8) << 7
    }

    pub fn int_pad(&self) -> bool {
        self.int_pad
    }

    pub fn set_int_pad(&mut self, value: bool) {
        self.int_pad = value;
    }

    pub fn ack_pad(&mut self) {
        self.int_pad = false;
    }
}

impl Default for Pad {
    fn default() -> Self {
        Self::new()
    }
}

impl BusComponent for Pad {
    fn read(&self, addr: u16) -> u8 {
        self.read(addr)
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.write(addr, value)
    }
}

impl StateComponent for Pad {
    fn state(&self, _format: Option<StateFormat>) -> Result<Vec<u8>, Error> {
        let mut cursor = Cursor::new(vec![]);
        write_u8(&mut cursor, Pad::state(self))?;
        write_u8(
            &mut cursor,
            (self.selection == PadSelection::Action) as u8,
        )?;
        write_u8(&mut cursor, self.int_pad as u8)?;
        Ok(cursor.into_inner())
    }

    fn set_state(&mut self, data: &[u8], _format: Option<StateFormat>) -> Result<(), Error> {
        let mut cursor = Cursor::new(data);
        let buttons = read_u8(&mut cursor)?;
        Pad::set_state(self, buttons);
        self.selection = if read_u8(&mut cursor)? != 0 {
            PadSelection::Action
        } else {
            PadSelection::Direction
        };
        self.int_pad = read_u8(&mut cursor)? != 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Pad, PadKey};

    #[test]
    fn test_default_reads_no_buttons_pressed() {
        let pad = Pad::new();
        // Action row selected by default, no buttons pressed: all
        // four low bits read high (active-low), selection bits 0x20 set.
        assert_eq!(pad.read(0x0000), 0x2f);
    }

    #[test]
    fn test_key_press_sets_bit_low_and_raises_interrupt() {
        let mut pad = Pad::new();
        pad.key_press(PadKey::A);
        assert_eq!(pad.read(0x0000) & 0x01, 0x00);
        assert!(pad.int_pad());
    }

    #[test]
    fn test_key_lift_restores_bit_high() {
        let mut pad = Pad::new();
        pad.key_press(PadKey::A);
        pad.key_lift(PadKey::A);
        assert_eq!(pad.read(0x0000) & 0x01, 0x01);
    }

    #[test]
    fn test_selection_switches_row() {
        let mut pad = Pad::new();
        pad.key_press(PadKey::Up);
        pad.write(0x0000, 0x10); // select direction row
        assert_eq!(pad.read(0x0000) & 0x04, 0x00);
        pad.write(0x0000, 0x20); // select action row
        assert_eq!(pad.read(0x0000) & 0x04, 0x04);
    }

    #[test]
    fn test_ack_pad_clears_interrupt() {
        let mut pad = Pad::new();
        pad.key_press(PadKey::Start);
        pad.ack_pad();
        assert!(!pad.int_pad());
    }

    #[test]
    fn test_state_round_trip() {
        let mut pad = Pad::new();
        pad.set_state(0b1010_0101);
        assert_eq!(pad.state(), 0b1010_0101);
    }
}
