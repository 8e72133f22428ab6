use sha2::{Digest, Sha256};
use std::fmt;

use super::ebcdic;
use super::sample::SampleFormat;
use super::{ByteOrder, SegyError};

const TEXT_LINE_WIDTH: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Ebcdic,
    Ascii,
}

/// The 3200-byte textual header, kept as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextualHeader {
    raw: Vec<u8>,
    encoding: TextEncoding,
}

impl TextualHeader {
    pub fn from_bytes(raw: &[u8]) -> Self {
        let encoding = if ebcdic::looks_like_ebcdic(raw) {
            TextEncoding::Ebcdic
        } else {
            TextEncoding::Ascii
        };
        Self {
            raw: raw.to_vec(),
            encoding,
        }
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// The header as ASCII bytes, decoded from EBCDIC when needed.
    fn ascii(&self) -> Vec<u8> {
        match self.encoding {
            TextEncoding::Ebcdic => ebcdic::to_ascii(&self.raw),
            TextEncoding::Ascii => self.raw.clone(),
        }
    }

    /// One trimmed line per 80-column card; control characters become spaces.
    pub fn lines(&self) -> Vec<String> {
        self.ascii()
            .chunks(TEXT_LINE_WIDTH)
            .map(|card| {
                card.iter()
                    .map(|&b| if b.is_ascii_graphic() { b as char } else { ' ' })
                    .collect::<String>()
                    .trim()
                    .to_string()
            })
            .collect()
    }

    /// SHA-256 of the raw bytes, lowercase hex.
    pub fn fingerprint(&self) -> String {
        format!("{:x}", Sha256::digest(&self.raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementSystem {
    Meters,
    Feet,
    Unknown(i16),
}

impl MeasurementSystem {
    pub fn from_code(code: i16) -> Self {
        match code {
            1 => MeasurementSystem::Meters,
            2 => MeasurementSystem::Feet,
            other => MeasurementSystem::Unknown(other),
        }
    }
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementSystem::Meters => write!(f, "Meters"),
            MeasurementSystem::Feet => write!(f, "Feet"),
            MeasurementSystem::Unknown(code) => write!(f, "Unknown ({})", code),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Time,
    Depth,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Time => write!(f, "Time"),
            Domain::Depth => write!(f, "Depth"),
        }
    }
}

/// Fields of the 400-byte binary header this tool reads. Offsets are relative to
/// the start of the binary header (file byte 3201).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryHeader {
    pub job_id: i32,
    pub line_number: i32,
    pub reel_number: i32,
    pub traces_per_ensemble: i16,
    pub sample_interval_us: i16,
    pub samples_per_trace: u16,
    pub format_code: i16,
    pub ensemble_fold: i16,
    pub trace_sorting: i16,
    pub measurement_system_code: i16,
    pub revision: u16,
    pub fixed_length_traces: i16,
    pub extended_header_count: i16,
}

impl BinaryHeader {
    pub fn parse(bytes: &[u8], order: ByteOrder) -> Self {
        BinaryHeader {
            job_id: order.i32(&bytes[0..4]),
            line_number: order.i32(&bytes[4..8]),
            reel_number: order.i32(&bytes[8..12]),
            traces_per_ensemble: order.i16(&bytes[12..14]),
            sample_interval_us: order.i16(&bytes[16..18]),
            samples_per_trace: order.u16(&bytes[20..22]),
            format_code: order.i16(&bytes[24..26]),
            ensemble_fold: order.i16(&bytes[26..28]),
            trace_sorting: order.i16(&bytes[28..30]),
            measurement_system_code: order.i16(&bytes[54..56]),
            revision: order.u16(&bytes[300..302]),
            fixed_length_traces: order.i16(&bytes[302..304]),
            extended_header_count: order.i16(&bytes[304..306]),
        }
    }

    pub fn sample_format(&self) -> Result<SampleFormat, SegyError> {
        SampleFormat::from_code(self.format_code)
            .ok_or(SegyError::UnsupportedFormat(self.format_code))
    }

    pub fn sample_interval_ms(&self) -> f64 {
        self.sample_interval_us as f64 / 1000.0
    }

    pub fn measurement_system(&self) -> MeasurementSystem {
        MeasurementSystem::from_code(self.measurement_system_code)
    }

    pub fn domain(&self) -> Domain {
        if self.sample_interval_us > 0 {
            Domain::Time
        } else {
            Domain::Depth
        }
    }
}

/// Commonly used fields of a 240-byte trace header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceHeader {
    pub trace_sequence_line: i32,
    pub trace_sequence_file: i32,
    pub field_record: i32,
    pub trace_number: i32,
    pub cdp: i32,
    pub coordinate_scalar: i16,
    pub source_x: i32,
    pub source_y: i32,
    pub samples: u16,
    pub sample_interval_us: i16,
    pub cdp_x: i32,
    pub cdp_y: i32,
    pub inline: i32,
    pub crossline: i32,
}

impl TraceHeader {
    pub fn parse(bytes: &[u8], order: ByteOrder) -> Self {
        TraceHeader {
            trace_sequence_line: order.i32(&bytes[0..4]),
            trace_sequence_file: order.i32(&bytes[4..8]),
            field_record: order.i32(&bytes[8..12]),
            trace_number: order.i32(&bytes[12..16]),
            cdp: order.i32(&bytes[20..24]),
            coordinate_scalar: order.i16(&bytes[70..72]),
            source_x: order.i32(&bytes[72..76]),
            source_y: order.i32(&bytes[76..80]),
            samples: order.u16(&bytes[114..116]),
            sample_interval_us: order.i16(&bytes[116..118]),
            cdp_x: order.i32(&bytes[180..184]),
            cdp_y: order.i32(&bytes[184..188]),
            inline: order.i32(&bytes[188..192]),
            crossline: order.i32(&bytes[192..196]),
        }
    }

    /// Apply the coordinate scalar: positive multiplies, negative divides, zero is 1.
    pub fn scaled(&self, coordinate: i32) -> f64 {
        match self.coordinate_scalar {
            0 => coordinate as f64,
            s if s > 0 => coordinate as f64 * s as f64,
            s => coordinate as f64 / (s as f64).abs(),
        }
    }
}
