//! Binary (de)serialization helpers used by [`crate::state::StateComponent`]
//! implementations across the peripheral modules.

use std::io::{Cursor, Read};

use crate::error::Error;

#[inline(always)]
pub fn read_u8(data: &mut Cursor<&[u8]>) -> Result<u8, Error> {
    let mut buffer = [0x00; size_of::<u8>()];
    data.read_exact(&mut buffer)
        .map_err(|_| Error::CustomError(String::from("Unexpected end of state data")))?;
    Ok(u8::from_le_bytes(buffer))
}

#[inline(always)]
pub fn read_u16(data: &mut Cursor<&[u8]>) -> Result<u16, Error> {
    let mut buffer = [0x00; size_of::<u16>()];
    data.read_exact(&mut buffer)
        .map_err(|_| Error::CustomError(String::from("Unexpected end of state data")))?;
    Ok(u16::from_le_bytes(buffer))
}

#[inline(always)]
pub fn read_u32(data: &mut Cursor<&[u8]>) -> Result<u32, Error> {
    let mut buffer = [0x00; size_of::<u32>()];
    data.read_exact(&mut buffer)
        .map_err(|_| Error::CustomError(String::from("Unexpected end of state data")))?;
    Ok(u32::from_le_bytes(buffer))
}

#[inline(always)]
pub fn write_u8(data: &mut Cursor<Vec<u8>>, value: u8) -> Result<(), Error> {
    use std::io::Write;
    data.write_all(&value.to_le_bytes())
        .map_err(|_| Error::CustomError(String::from("Failed to write state data")))
}

#[inline(always)]
pub fn write_u16(data: &mut Cursor<Vec<u8>>, value: u16) -> Result<(), Error> {
    use std::io::Write;
    data.write_all(&value.to_le_bytes())
        .map_err(|_| Error::CustomError(String::from("Failed to write state data")))
}

#[inline(always)]
pub fn write_u32(data: &mut Cursor<Vec<u8>>, value: u32) -> Result<(), Error> {
    use std::io::Write;
    data.write_all(&value.to_le_bytes())
        .map_err(|_| Error::CustomError(String::from("Failed to write state data")))
}

/// Reads a variable-length byte buffer previously written by
/// [`write_bytes`], prefixed with its length as a little-endian `u32`.
#[inline(always)]
pub fn read_bytes(data: &mut Cursor<&[u8]>) -> Result<Vec<u8>, Error> {
    let size = read_u32(data)? as usize;
    let mut buffer = vec![0x00; size];
    data.read_exact(&mut buffer)
        .map_err(|_| Error::CustomError(String::from("Unexpected end of state data")))?;
    Ok(buffer)
}

/// Writes a variable-length byte buffer prefixed with its length as a
/// little-endian `u32`, so it can be read back with [`read_bytes`]
/// without either side needing to know the size up front.
#[inline(always)]
pub fn write_bytes(data: &mut Cursor<Vec<u8>>, value: &[u8]) -> Result<(), Error> {
    use std::io::Write;
    write_u32(data, value.len() as u32)?;
    data.write_all(value)
        .map_err(|_| Error::CustomError(String::from("Failed to write state data")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8_round_trip() {
        let mut cursor = Cursor::new(vec![]);
        write_u8(&mut cursor, 0xab).unwrap();
        let mut cursor = Cursor::new(cursor.into_inner());
        assert_eq!(read_u8(&mut cursor).unwrap(), 0xab);
    }

    #[test]
    fn test_u16_round_trip_is_little_endian() {
        let mut cursor = Cursor::new(vec![]);
        write_u16(&mut cursor, 0xbeef).unwrap();
        assert_eq!(cursor.get_ref(), &[0xef, 0xbe]);
        let mut cursor = Cursor::new(cursor.into_inner());
        assert_eq!(read_u16(&mut cursor).unwrap(), 0xbeef);
    }

    #[test]
    fn test_u32_round_trip() {
        let mut cursor = Cursor::new(vec![]);
        write_u32(&mut cursor, 0xdeadbeef).unwrap();
        let mut cursor = Cursor::new(cursor.into_inner());
        assert_eq!(read_u32(&mut cursor).unwrap(), 0xdeadbeef);
    }

    #[test]
    fn test_bytes_round_trip() {
        let mut cursor = Cursor::new(vec![]);
        write_bytes(&mut cursor, &[1, 2, 3, 4, 5]).unwrap();
        let mut cursor = Cursor::new(cursor.into_inner());
        assert_eq!(read_bytes(&mut cursor).unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_read_past_end_is_an_error() {
        let mut cursor = Cursor::new(&[0x01][..]);
        assert!(read_u16(&mut cursor).is_err());
    }
}
