//! ASCII to EBCDIC (code page 500) encoding.
//!
//! Every character maps to exactly one byte, so encoded lengths equal the
//! character count. Characters outside printable ASCII become `?` (`0x6F`).

use log::warn;

pub const SPACE: u8 = 0x40;
pub const SUBSTITUTE: u8 = 0x6F;

// Printable ASCII 0x20..=0x7E.
const CP500: [u8; 95] = [
    0x40, 0x4F, 0x7F, 0x7B, 0x5B, 0x6C, 0x50, 0x7D, // space ! " # $ % & '
    0x4D, 0x5D, 0x5C, 0x4E, 0x6B, 0x60, 0x4B, 0x61, // ( ) * + , - . /
    0xF0, 0xF1, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7, // 0-7
    0xF8, 0xF9, 0x7A, 0x5E, 0x4C, 0x7E, 0x6E, 0x6F, // 8 9 : ; < = > ?
    0x7C, 0xC1, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6, 0xC7, // @ A-G
    0xC8, 0xC9, 0xD1, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6, // H-O
    0xD7, 0xD8, 0xD9, 0xE2, 0xE3, 0xE4, 0xE5, 0xE6, // P-W
    0xE7, 0xE8, 0xE9, 0x4A, 0xE0, 0x5A, 0x5F, 0x6D, // X Y Z [ \ ] ^ _
    0x79, 0x81, 0x82, 0x83, 0x84, 0x85, 0x86, 0x87, // ` a-g
    0x88, 0x89, 0x91, 0x92, 0x93, 0x94, 0x95, 0x96, // h-o
    0x97, 0x98, 0x99, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6, // p-w
    0xA7, 0xA8, 0xA9, 0xC0, 0xBB, 0xD0, 0xA1, // x y z { | } ~
];

pub fn encode_char(c: char) -> u8 {
    match c {
        ' '..='~' => CP500[c as usize - 0x20],
        _ => SUBSTITUTE,
    }
}

pub fn encode(text: &str) -> Vec<u8> {
    text.chars().map(encode_char).collect()
}

/// Number of bytes `encode` produces for `text`.
pub fn encoded_len(text: &str) -> usize {
    text.chars().count()
}

/// Encodes `text` into a fixed-width field, padding with EBCDIC spaces and
/// cutting off anything beyond `N` characters.
pub fn encode_padded<const N: usize>(text: &str) -> [u8; N] {
    let mut field = [SPACE; N];
    for (slot, c) in field.iter_mut().zip(text.chars()) {
        *slot = encode_char(c);
    }
    field
}

/// Encodes an 8-character object name. Short names are space padded; long
/// names keep their last eight characters.
pub fn encode_name(name: &str) -> [u8; 8] {
    let count = name.chars().count();
    if count > 8 {
        let truncated: String = name.chars().skip(count - 8).collect();
        warn!("Name '{}' truncated to 8 chars ('{}')", name, truncated);
        return encode_padded(&truncated);
    }
    encode_padded(name)
}
