#![ doc = include_str!( concat!( env!( "CARGO_MANIFEST_DIR" ), "/", "README.md" ) ) ]
#![ doc = include_str!( concat!( env!( "CARGO_MANIFEST_DIR" ), "/", "CHANGELOG.md" ) ) ]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod client;
pub mod consts;
pub mod transport;

#[cfg(feature = "alloc")]
pub mod poller;

mod vector;
pub use vector::VectorTrait;

mod error;
pub use error::ErrorKind;


use consts::{KMP_END, KMP_ESCAPE, KMP_RESERVED};

/// KMP CRC-16 (CCITT polynomial 0x1021, no reflection, zero init, no final XOR)
///
/// The message is shifted through the register as is, so a message followed by its own CRC
/// (big-endian) always gives zero.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc: u32 = 0;
    for b in data {
        let mut mask: u8 = 0x80;
        while mask > 0 {
            crc <<= 1;
            if b & mask != 0 {
                crc |= 1;
            }
            mask >>= 1;
            if crc & 0x10000 != 0 {
                crc &= 0xffff;
                crc ^= 0x1021;
            }
        }
    }
    crc as u16
}

#[inline]
fn is_reserved(b: u8) -> bool {
    KMP_RESERVED.contains(&b)
}

/// Escape frame body
///
/// Reserved bytes (see [`consts::KMP_RESERVED`]) are replaced with 0x1B followed by the byte
/// inverted. The output is appended to `result`.
pub fn escape_frame<V: VectorTrait<u8>>(data: &[u8], result: &mut V) -> Result<(), ErrorKind> {
    for b in data {
        if is_reserved(*b) {
            result.extend(&[KMP_ESCAPE, b ^ 0xff])?;
        } else {
            result.push(*b)?;
        }
    }
    Ok(())
}

/// Unescape frame body
///
/// The output is appended to `result`.
///
/// Errors:
///
/// * **FrameBroken** the data ends with an escape byte
/// * **OOB** result buffer is full
pub fn unescape_frame<V: VectorTrait<u8>>(data: &[u8], result: &mut V) -> Result<(), ErrorKind> {
    let mut bytes = data.iter();
    while let Some(b) = bytes.next() {
        if *b == KMP_ESCAPE {
            let Some(next) = bytes.next() else {
                return Err(ErrorKind::FrameBroken);
            };
            result.push(next ^ 0xff)?;
        } else {
            result.push(*b)?;
        }
    }
    Ok(())
}

/// Generate KMP frame
///
/// Puts the start byte, escaped body and the end byte into `result`. The body must already
/// contain the CRC trailer.
pub fn generate_frame<V: VectorTrait<u8>>(
    start: u8,
    body: &[u8],
    result: &mut V,
) -> Result<(), ErrorKind> {
    result.clear();
    result.push(start)?;
    escape_frame(body, result)?;
    result.push(KMP_END)
}

/// Parse raw KMP frame, as collected by [`transport::receive_frame`]
///
/// `raw` must end with the end byte and must not contain dropped noise bytes. The unescaped
/// payload without CRC is written into `payload`.
///
/// Errors:
///
/// * **FrameBroken** frame is too short or ends with a dangling escape byte
/// * **FrameCRCError** CRC check failed
/// * **OOB** payload buffer is full
pub fn parse_frame<V: VectorTrait<u8>>(raw: &[u8], payload: &mut V) -> Result<(), ErrorKind> {
    if raw.len() < 2 {
        return Err(ErrorKind::FrameBroken);
    }
    payload.clear();
    unescape_frame(&raw[..raw.len() - 1], payload)?;
    let len = payload.len();
    if len < 2 {
        return Err(ErrorKind::FrameBroken);
    }
    if crc16(payload.as_slice()) != 0 {
        log::warn!("KMP frame CRC error");
        return Err(ErrorKind::FrameCRCError);
    }
    payload.truncate(len - 2);
    Ok(())
}
