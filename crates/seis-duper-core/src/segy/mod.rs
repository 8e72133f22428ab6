//! Minimal SEG-Y reader: textual header, binary header, and a streaming pass over
//! fixed-length traces.

mod ebcdic;
mod header;
mod sample;

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use ebcdic::{from_ascii as ascii_to_ebcdic, to_ascii as ebcdic_to_ascii};
pub use header::{BinaryHeader, Domain, MeasurementSystem, TextEncoding, TextualHeader, TraceHeader};
pub use sample::{f64_to_ibm, ibm_to_f64, SampleFormat};

pub const TEXTUAL_HEADER_LEN: usize = 3200;
pub const BINARY_HEADER_LEN: usize = 400;
pub const TRACE_HEADER_LEN: usize = 240;

const FORMAT_CODE_OFFSET: usize = 24;

#[derive(Error, Debug)]
pub enum SegyError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("file too short: expected at least {expected} bytes, found {actual}")]
    TooShort { expected: u64, actual: u64 },

    #[error("unsupported sample format code {0}")]
    UnsupportedFormat(i16),

    #[error("unsupported extended textual header count {0}")]
    UnsupportedExtendedHeaders(i16),

    #[error("trace {index} out of range, file has {count} traces")]
    TraceOutOfRange { index: u64, count: u64 },

    #[error("samples per trace is zero in both binary and first trace header")]
    NoSamples,

    #[error("trace data of {data_len} bytes is not a multiple of the {trace_len}-byte trace size")]
    InconsistentSize { data_len: u64, trace_len: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Big,
    Little,
}

impl ByteOrder {
    pub fn u16(self, b: &[u8]) -> u16 {
        let bytes = [b[0], b[1]];
        match self {
            ByteOrder::Big => u16::from_be_bytes(bytes),
            ByteOrder::Little => u16::from_le_bytes(bytes),
        }
    }

    pub fn i16(self, b: &[u8]) -> i16 {
        self.u16(b) as i16
    }

    pub fn u32(self, b: &[u8]) -> u32 {
        let bytes = [b[0], b[1], b[2], b[3]];
        match self {
            ByteOrder::Big => u32::from_be_bytes(bytes),
            ByteOrder::Little => u32::from_le_bytes(bytes),
        }
    }

    pub fn i32(self, b: &[u8]) -> i32 {
        self.u32(b) as i32
    }

    pub fn u64(self, b: &[u8]) -> u64 {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&b[..8]);
        match self {
            ByteOrder::Big => u64::from_be_bytes(bytes),
            ByteOrder::Little => u64::from_le_bytes(bytes),
        }
    }

    /// Big-endian unless only the little-endian reading of the format code is valid.
    fn detect(binary_header: &[u8]) -> ByteOrder {
        let code = &binary_header[FORMAT_CODE_OFFSET..FORMAT_CODE_OFFSET + 2];
        let big = SampleFormat::from_code(ByteOrder::Big.i16(code));
        let little = SampleFormat::from_code(ByteOrder::Little.i16(code));
        if big.is_none() && little.is_some() {
            ByteOrder::Little
        } else {
            ByteOrder::Big
        }
    }
}

/// Global amplitude extrema of a file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmplitudeRange {
    pub min: f64,
    pub max: f64,
}

impl AmplitudeRange {
    /// Fold one sample in. NaN samples are ignored.
    pub fn include(range: Option<AmplitudeRange>, value: f64) -> Option<AmplitudeRange> {
        if value.is_nan() {
            return range;
        }
        Some(match range {
            Some(r) => AmplitudeRange {
                min: r.min.min(value),
                max: r.max.max(value),
            },
            None => AmplitudeRange {
                min: value,
                max: value,
            },
        })
    }
}

/// An opened SEG-Y file with its headers parsed and its trace layout validated.
#[derive(Debug)]
pub struct SegyFile {
    path: PathBuf,
    reader: BufReader<File>,
    file_size: u64,
    byte_order: ByteOrder,
    textual_header: TextualHeader,
    binary_header: BinaryHeader,
    sample_format: SampleFormat,
    samples_per_trace: usize,
    data_offset: u64,
    trace_count: u64,
}

impl SegyFile {
    pub fn open(path: &Path) -> Result<SegyFile, SegyError> {
        let file = File::open(path)?;
        let file_size = file.metadata()?.len();
        let mut reader = BufReader::new(file);

        let header_len = (TEXTUAL_HEADER_LEN + BINARY_HEADER_LEN) as u64;
        if file_size < header_len {
            return Err(SegyError::TooShort {
                expected: header_len,
                actual: file_size,
            });
        }

        let mut headers = vec![0u8; TEXTUAL_HEADER_LEN + BINARY_HEADER_LEN];
        reader.read_exact(&mut headers)?;
        let (text_bytes, binary_bytes) = headers.split_at(TEXTUAL_HEADER_LEN);

        let byte_order = ByteOrder::detect(binary_bytes);
        let textual_header = TextualHeader::from_bytes(text_bytes);
        let binary_header = BinaryHeader::parse(binary_bytes, byte_order);
        let sample_format = binary_header.sample_format()?;

        let extended = binary_header.extended_header_count;
        if extended < 0 {
            return Err(SegyError::UnsupportedExtendedHeaders(extended));
        }
        let data_offset = header_len + extended as u64 * TEXTUAL_HEADER_LEN as u64;
        if file_size < data_offset {
            return Err(SegyError::TooShort {
                expected: data_offset,
                actual: file_size,
            });
        }

        let mut samples_per_trace = binary_header.samples_per_trace as usize;
        if samples_per_trace == 0 && file_size >= data_offset + TRACE_HEADER_LEN as u64 {
            reader.seek(SeekFrom::Start(data_offset))?;
            let mut trace_header = vec![0u8; TRACE_HEADER_LEN];
            reader.read_exact(&mut trace_header)?;
            samples_per_trace = TraceHeader::parse(&trace_header, byte_order).samples as usize;
        }

        let data_len = file_size - data_offset;
        if samples_per_trace == 0 && data_len > 0 {
            return Err(SegyError::NoSamples);
        }
        let trace_len = (TRACE_HEADER_LEN + samples_per_trace * sample_format.bytes_per_sample()) as u64;
        if data_len % trace_len != 0 {
            return Err(SegyError::InconsistentSize { data_len, trace_len });
        }

        Ok(SegyFile {
            path: path.to_path_buf(),
            reader,
            file_size,
            byte_order,
            textual_header,
            binary_header,
            sample_format,
            samples_per_trace,
            data_offset,
            trace_count: data_len / trace_len,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn textual_header(&self) -> &TextualHeader {
        &self.textual_header
    }

    pub fn binary_header(&self) -> &BinaryHeader {
        &self.binary_header
    }

    pub fn sample_format(&self) -> SampleFormat {
        self.sample_format
    }

    pub fn samples_per_trace(&self) -> usize {
        self.samples_per_trace
    }

    pub fn trace_count(&self) -> u64 {
        self.trace_count
    }

    fn trace_len(&self) -> u64 {
        (TRACE_HEADER_LEN + self.samples_per_trace * self.sample_format.bytes_per_sample()) as u64
    }

    pub fn read_trace_header(&mut self, index: u64) -> Result<TraceHeader, SegyError> {
        if index >= self.trace_count {
            return Err(SegyError::TraceOutOfRange {
                index,
                count: self.trace_count,
            });
        }
        self.reader
            .seek(SeekFrom::Start(self.data_offset + index * self.trace_len()))?;
        let mut bytes = vec![0u8; TRACE_HEADER_LEN];
        self.reader.read_exact(&mut bytes)?;
        Ok(TraceHeader::parse(&bytes, self.byte_order))
    }

    /// Read the samples of trace `index`, decoded to `f64`.
    pub fn read_trace(&mut self, index: u64) -> Result<Vec<f64>, SegyError> {
        self.read_trace_header(index)?;
        let mut buffer = vec![0u8; self.samples_per_trace * self.sample_format.bytes_per_sample()];
        self.reader.read_exact(&mut buffer)?;
        Ok(self.decode_samples(&buffer).collect())
    }

    fn decode_samples<'a>(&self, buffer: &'a [u8]) -> impl Iterator<Item = f64> + 'a {
        let format = self.sample_format;
        let order = self.byte_order;
        buffer
            .chunks_exact(format.bytes_per_sample())
            .map(move |bytes| format.decode(bytes, order))
    }

    /// Global min/max over every sample, one trace in memory at a time.
    /// Returns `None` for a file without traces or with only NaN samples.
    pub fn amplitude_range(&mut self) -> Result<Option<AmplitudeRange>, SegyError> {
        self.reader.seek(SeekFrom::Start(self.data_offset))?;
        let mut trace_header = vec![0u8; TRACE_HEADER_LEN];
        let mut samples = vec![0u8; self.samples_per_trace * self.sample_format.bytes_per_sample()];
        let mut range = None;

        for _ in 0..self.trace_count {
            self.reader.read_exact(&mut trace_header)?;
            self.reader.read_exact(&mut samples)?;
            range = self
                .decode_samples(&samples)
                .fold(range, AmplitudeRange::include);
        }

        Ok(range)
    }
}
