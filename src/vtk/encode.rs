//! Endian-safe scalar encoding.
//!
//! Binary payloads of the legacy format are big-endian. The encoder builds
//! the value's image in host memory order and reverses it on little-endian
//! hosts, so big-endian hosts write the image untouched. Single-byte kinds
//! are never swapped.

use std::fmt;
use std::sync::OnceLock;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Byte order of a machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    /// Byte order of the running host, probed once.
    pub fn host() -> Self {
        static HOST: OnceLock<Endianness> = OnceLock::new();
        *HOST.get_or_init(Self::probe)
    }

    // The first memory byte of the integer 1 is non-zero only on little-endian hosts.
    fn probe() -> Self {
        let pattern: u32 = 1;
        if pattern.to_ne_bytes()[0] == 1 {
            Self::Little
        } else {
            Self::Big
        }
    }

    #[inline]
    pub const fn is_little(self) -> bool {
        matches!(self, Self::Little)
    }
}

/// Closed set of numeric kinds the writer emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Float32,
    Float64,
    /// 4-byte integer used for counts, indices and cell tags.
    Int32,
    Int8,
    UInt8,
}

impl ScalarKind {
    /// Size of the binary image in bytes.
    #[inline]
    pub const fn num_bytes(self) -> usize {
        match self {
            Self::Float32 | Self::Int32 => 4,
            Self::Float64 => 8,
            Self::Int8 | Self::UInt8 => 1,
        }
    }
}

/// A value tagged with its on-disk kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar {
    F32(f32),
    F64(f64),
    I32(i32),
    I8(i8),
    U8(u8),
}

impl Scalar {
    #[inline]
    pub const fn kind(self) -> ScalarKind {
        match self {
            Self::F32(_) => ScalarKind::Float32,
            Self::F64(_) => ScalarKind::Float64,
            Self::I32(_) => ScalarKind::Int32,
            Self::I8(_) => ScalarKind::Int8,
            Self::U8(_) => ScalarKind::UInt8,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::F32(v) => v.fmt(f),
            Self::F64(v) => v.fmt(f),
            Self::I32(v) => v.fmt(f),
            Self::I8(v) => v.fmt(f),
            Self::U8(v) => v.fmt(f),
        }
    }
}

/// Separator written after a text value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Separator {
    Space,
    Newline,
}

impl Separator {
    #[inline]
    const fn byte(self) -> u8 {
        match self {
            Self::Space => b' ',
            Self::Newline => b'\n',
        }
    }
}

/// Converts scalars into their on-disk images.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScalarEncoder {
    host: Endianness,
}

impl Default for ScalarEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScalarEncoder {
    /// Encoder for the running host.
    pub fn new() -> Self {
        Self { host: Endianness::host() }
    }

    /// Encoder that treats `host` as the in-memory byte order.
    pub const fn for_host(host: Endianness) -> Self {
        Self { host }
    }

    #[inline]
    pub const fn host(&self) -> Endianness {
        self.host
    }

    /// Append the big-endian binary image of `value`.
    ///
    /// The image is built in host order and reversed on little-endian hosts;
    /// single-byte kinds are copied as is.
    pub fn write_binary(&self, out: &mut Vec<u8>, value: Scalar) {
        let kind = value.kind();
        let mut buf = [0u8; 8];
        let image = &mut buf[..kind.num_bytes()];
        match (self.host, value) {
            (Endianness::Little, Scalar::F32(v)) => LittleEndian::write_f32(image, v),
            (Endianness::Big, Scalar::F32(v)) => BigEndian::write_f32(image, v),
            (Endianness::Little, Scalar::F64(v)) => LittleEndian::write_f64(image, v),
            (Endianness::Big, Scalar::F64(v)) => BigEndian::write_f64(image, v),
            (Endianness::Little, Scalar::I32(v)) => LittleEndian::write_i32(image, v),
            (Endianness::Big, Scalar::I32(v)) => BigEndian::write_i32(image, v),
            (_, Scalar::I8(v)) => image[0] = v as u8,
            (_, Scalar::U8(v)) => image[0] = v,
        }
        if self.host.is_little() && kind.num_bytes() > 1 {
            image.reverse();
        }
        out.extend_from_slice(image);
    }

    /// Append the decimal text of `value` followed by `sep`.
    pub fn write_text(&self, out: &mut Vec<u8>, value: Scalar, sep: Separator) {
        out.extend_from_slice(value.to_string().as_bytes());
        out.push(sep.byte());
    }
}

/// Floating point width of a writer: `f32` writes `float`, `f64` writes `double`.
pub trait Real: Copy + PartialEq + fmt::Debug + fmt::Display + 'static {
    /// Precision keyword used in `POINTS`, `SCALARS` and `VECTORS` headers.
    const PRECISION: &'static str;

    fn from_f64(v: f64) -> Self;

    fn scalar(self) -> Scalar;
}

impl Real for f32 {
    const PRECISION: &'static str = "float";

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn scalar(self) -> Scalar {
        Scalar::F32(self)
    }
}

impl Real for f64 {
    const PRECISION: &'static str = "double";

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn scalar(self) -> Scalar {
        Scalar::F64(self)
    }
}
