use std::fmt;

use super::ByteOrder;

/// Data sample format code from binary header bytes 3225-3226.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    IbmFloat32,
    Int32,
    Int16,
    IeeeFloat32,
    IeeeFloat64,
    Int8,
}

impl SampleFormat {
    pub fn from_code(code: i16) -> Option<SampleFormat> {
        match code {
            1 => Some(SampleFormat::IbmFloat32),
            2 => Some(SampleFormat::Int32),
            3 => Some(SampleFormat::Int16),
            5 => Some(SampleFormat::IeeeFloat32),
            6 => Some(SampleFormat::IeeeFloat64),
            8 => Some(SampleFormat::Int8),
            _ => None,
        }
    }

    pub fn code(self) -> i16 {
        match self {
            SampleFormat::IbmFloat32 => 1,
            SampleFormat::Int32 => 2,
            SampleFormat::Int16 => 3,
            SampleFormat::IeeeFloat32 => 5,
            SampleFormat::IeeeFloat64 => 6,
            SampleFormat::Int8 => 8,
        }
    }

    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::IbmFloat32 | SampleFormat::Int32 | SampleFormat::IeeeFloat32 => 4,
            SampleFormat::Int16 => 2,
            SampleFormat::IeeeFloat64 => 8,
            SampleFormat::Int8 => 1,
        }
    }

    /// Decode one sample. `bytes` must hold exactly `bytes_per_sample()` bytes.
    pub fn decode(self, bytes: &[u8], order: ByteOrder) -> f64 {
        match self {
            SampleFormat::IbmFloat32 => ibm_to_f64(order.u32(bytes)),
            SampleFormat::Int32 => order.u32(bytes) as i32 as f64,
            SampleFormat::Int16 => order.u16(bytes) as i16 as f64,
            SampleFormat::IeeeFloat32 => f32::from_bits(order.u32(bytes)) as f64,
            SampleFormat::IeeeFloat64 => f64::from_bits(order.u64(bytes)),
            SampleFormat::Int8 => bytes[0] as i8 as f64,
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SampleFormat::IbmFloat32 => "4-byte IBM float",
            SampleFormat::Int32 => "4-byte integer",
            SampleFormat::Int16 => "2-byte integer",
            SampleFormat::IeeeFloat32 => "4-byte IEEE float",
            SampleFormat::IeeeFloat64 => "8-byte IEEE float",
            SampleFormat::Int8 => "1-byte integer",
        };
        write!(f, "{} ({})", name, self.code())
    }
}

/// IBM System/360 single precision: sign bit, 7-bit base-16 exponent biased by 64,
/// 24-bit fraction.
pub fn ibm_to_f64(bits: u32) -> f64 {
    let fraction = bits & 0x00ff_ffff;
    if fraction == 0 {
        return 0.0;
    }
    let sign = if bits >> 31 == 1 { -1.0 } else { 1.0 };
    let exponent = ((bits >> 24) & 0x7f) as i32 - 64;
    sign * (fraction as f64 / 16_777_216.0) * 16f64.powi(exponent)
}

/// Inverse of [`ibm_to_f64`], truncating the fraction.
pub fn f64_to_ibm(value: f64) -> u32 {
    if value == 0.0 || !value.is_finite() {
        return 0;
    }
    let sign: u32 = if value < 0.0 { 1 << 31 } else { 0 };
    let mut magnitude = value.abs();
    let mut exponent: i32 = 64;
    while magnitude >= 1.0 {
        magnitude /= 16.0;
        exponent += 1;
    }
    while magnitude < 1.0 / 16.0 {
        magnitude *= 16.0;
        exponent -= 1;
    }
    let fraction = (magnitude * 16_777_216.0) as u32 & 0x00ff_ffff;
    sign | ((exponent.clamp(0, 127) as u32) << 24) | fraction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ibm_known_values() {
        // 0x42640000 is the textbook encoding of 100.0
        assert_eq!(ibm_to_f64(0x4264_0000), 100.0);
        assert_eq!(ibm_to_f64(0xC264_0000), -100.0);
        assert_eq!(ibm_to_f64(0x4110_0000), 1.0);
        assert_eq!(ibm_to_f64(0x4080_0000), 0.5);
        assert_eq!(ibm_to_f64(0x0000_0000), 0.0);
        assert_eq!(ibm_to_f64(0x8000_0000), 0.0);
    }

    #[test]
    fn test_ibm_encode_matches_decode() {
        for value in [1.0, -1.0, 0.5, 100.0, -118.625, 3.0e5, 1.0e-3] {
            let decoded = ibm_to_f64(f64_to_ibm(value));
            assert!((decoded - value).abs() <= value.abs() * 1e-6, "{} -> {}", value, decoded);
        }
        assert_eq!(f64_to_ibm(100.0), 0x4264_0000);
    }

    #[test]
    fn test_decode_integer_formats() {
        assert_eq!(SampleFormat::Int16.decode(&[0xff, 0xfe], ByteOrder::Big), -2.0);
        assert_eq!(SampleFormat::Int16.decode(&[0xfe, 0xff], ByteOrder::Little), -2.0);
        assert_eq!(SampleFormat::Int32.decode(&[0, 0, 1, 0], ByteOrder::Big), 256.0);
        assert_eq!(SampleFormat::Int8.decode(&[0x80], ByteOrder::Big), -128.0);
    }

    #[test]
    fn test_decode_ieee_formats() {
        let bytes = 2.5f32.to_be_bytes();
        assert_eq!(SampleFormat::IeeeFloat32.decode(&bytes, ByteOrder::Big), 2.5);
        let bytes = (-7.25f64).to_le_bytes();
        assert_eq!(SampleFormat::IeeeFloat64.decode(&bytes, ByteOrder::Little), -7.25);
    }

    #[test]
    fn test_format_codes() {
        for code in [1, 2, 3, 5, 6, 8] {
            assert_eq!(SampleFormat::from_code(code).unwrap().code(), code);
        }
        assert!(SampleFormat::from_code(4).is_none());
        assert!(SampleFormat::from_code(0).is_none());
    }
}
