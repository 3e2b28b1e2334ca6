//! Binary codec for record and instruction payloads.
//!
//! Layout rules:
//!
//! - strings: 4-byte little-endian length, then the UTF-8 bytes
//! - integers and floats: fixed-width little-endian
//! - booleans: one byte, 0 or 1
//! - options: one tag byte (0 absent, 1 present), then the value if present
//! - keys: 32 raw bytes
//!
//! Decoding is strict. A short buffer fails with `TruncatedInput`, leftover
//! bytes fail with `TrailingBytes` (see [`decode_exact`]).

use crate::error::{Result, TuneLedgerError};
use crate::pubkey::{Pubkey, PUBKEY_BYTES};

/// Width of a schema discriminator.
pub const DISCRIMINATOR_BYTES: usize = 8;

/// Append-only byte sink.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_discriminator(discriminator: [u8; DISCRIMINATOR_BYTES]) -> Self {
        let mut writer = Self::new();
        writer.buf.extend_from_slice(&discriminator);
        writer
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_f32(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    pub fn put_str(&mut self, value: &str) {
        debug_assert!(value.len() <= u32::MAX as usize);
        self.put_u32(value.len() as u32);
        self.buf.extend_from_slice(value.as_bytes());
    }

    pub fn put_bytes(&mut self, value: &[u8]) {
        self.buf.extend_from_slice(value);
    }

    pub fn put<T: Encode + ?Sized>(&mut self, value: &T) {
        value.encode(self);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over an encoded buffer.
#[derive(Debug)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    pub fn take(&mut self, needed: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(TuneLedgerError::TruncatedInput { needed, remaining });
        }
        let slice = &self.bytes[self.pos..self.pos + needed];
        self.pos += needed;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }

    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.take_array::<1>()?[0])
    }

    pub fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    pub fn u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    pub fn i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.take_array()?))
    }

    pub fn f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.take_array()?))
    }

    pub fn bool(&mut self) -> Result<bool> {
        match self.u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(TuneLedgerError::InvalidBoolEncoding(other)),
        }
    }

    pub fn string(&mut self) -> Result<String> {
        let len = self.u32()? as usize;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| TuneLedgerError::InvalidUtf8)
    }

    pub fn pubkey(&mut self) -> Result<Pubkey> {
        Ok(Pubkey::new(self.take_array::<PUBKEY_BYTES>()?))
    }

    pub fn discriminator(&mut self) -> Result<[u8; DISCRIMINATOR_BYTES]> {
        self.take_array()
    }

    pub fn option<T: Decode>(&mut self) -> Result<Option<T>> {
        match self.u8()? {
            0 => Ok(None),
            1 => Ok(Some(T::decode(self)?)),
            other => Err(TuneLedgerError::InvalidOptionTag(other)),
        }
    }

    pub fn get<T: Decode>(&mut self) -> Result<T> {
        T::decode(self)
    }

    /// Fail with `TrailingBytes` unless the buffer is fully consumed.
    pub fn finish(&self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            extra => Err(TuneLedgerError::TrailingBytes(extra)),
        }
    }
}

/// A value with a deterministic binary encoding.
pub trait Encode {
    fn encode(&self, writer: &mut Writer);

    fn encode_to_vec(&self) -> Vec<u8> {
        let mut writer = Writer::new();
        self.encode(&mut writer);
        writer.into_bytes()
    }
}

/// A value that can be read back from its encoding.
pub trait Decode: Sized {
    fn decode(reader: &mut Reader<'_>) -> Result<Self>;
}

/// Decode one value from the front of `bytes`, returning the unconsumed tail.
pub fn decode_prefix<T: Decode>(bytes: &[u8]) -> Result<(T, &[u8])> {
    let mut reader = Reader::new(bytes);
    let value = T::decode(&mut reader)?;
    Ok((value, reader.rest()))
}

/// Decode exactly one value, rejecting leftover bytes.
pub fn decode_exact<T: Decode>(bytes: &[u8]) -> Result<T> {
    let mut reader = Reader::new(bytes);
    let value = T::decode(&mut reader)?;
    reader.finish()?;
    Ok(value)
}

macro_rules! impl_scalar {
    ($ty:ty, $put:ident, $get:ident) => {
        impl Encode for $ty {
            fn encode(&self, writer: &mut Writer) {
                writer.$put(*self);
            }
        }

        impl Decode for $ty {
            fn decode(reader: &mut Reader<'_>) -> Result<Self> {
                reader.$get()
            }
        }
    };
}

/// Implement [`Encode`] and [`Decode`] for a struct whose layout is its
/// listed fields, in order.
macro_rules! impl_layout {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl $crate::codec::Encode for $ty {
            fn encode(&self, writer: &mut $crate::codec::Writer) {
                $( writer.put(&self.$field); )*
            }
        }

        impl $crate::codec::Decode for $ty {
            fn decode(reader: &mut $crate::codec::Reader<'_>) -> $crate::error::Result<Self> {
                Ok(Self {
                    $( $field: reader.get()?, )*
                })
            }
        }
    };
}

pub(crate) use impl_layout;

impl_scalar!(u8, put_u8, u8);
impl_scalar!(u32, put_u32, u32);
impl_scalar!(u64, put_u64, u64);
impl_scalar!(i64, put_i64, i64);
impl_scalar!(f32, put_f32, f32);
impl_scalar!(bool, put_bool, bool);

impl Encode for str {
    fn encode(&self, writer: &mut Writer) {
        writer.put_str(self);
    }
}

impl Encode for String {
    fn encode(&self, writer: &mut Writer) {
        writer.put_str(self);
    }
}

impl Decode for String {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        reader.string()
    }
}

impl Encode for Pubkey {
    fn encode(&self, writer: &mut Writer) {
        writer.put_bytes(self.as_ref());
    }
}

impl Decode for Pubkey {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        reader.pubkey()
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, writer: &mut Writer) {
        match self {
            None => writer.put_u8(0),
            Some(value) => {
                writer.put_u8(1);
                value.encode(writer);
            }
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        reader.option()
    }
}
