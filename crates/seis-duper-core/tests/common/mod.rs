#![allow(dead_code)]

use std::fs;
use std::path::Path;

use seis_duper_core::segy::{
    ascii_to_ebcdic, f64_to_ibm, SampleFormat, BINARY_HEADER_LEN, TEXTUAL_HEADER_LEN,
    TRACE_HEADER_LEN,
};

/// Builds small SEG-Y files in memory for tests.
pub struct SegyBuilder {
    pub text: String,
    pub ebcdic: bool,
    pub format: SampleFormat,
    pub sample_interval_us: i16,
    pub measurement_system: i16,
    pub little_endian: bool,
    pub binary_samples: Option<u16>,
    pub traces: Vec<Vec<f64>>,
}

impl SegyBuilder {
    pub fn new(traces: Vec<Vec<f64>>) -> Self {
        Self {
            text: "C 1 CLIENT: TEST SURVEY".to_string(),
            ebcdic: true,
            format: SampleFormat::IeeeFloat32,
            sample_interval_us: 4000,
            measurement_system: 1,
            little_endian: false,
            binary_samples: None,
            traces,
        }
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn format(mut self, format: SampleFormat) -> Self {
        self.format = format;
        self
    }

    pub fn sample_interval_us(mut self, interval: i16) -> Self {
        self.sample_interval_us = interval;
        self
    }

    pub fn little_endian(mut self) -> Self {
        self.little_endian = true;
        self
    }

    pub fn ascii(mut self) -> Self {
        self.ebcdic = false;
        self
    }

    pub fn binary_samples(mut self, samples: u16) -> Self {
        self.binary_samples = Some(samples);
        self
    }

    fn put_i16(&self, buf: &mut [u8], offset: usize, value: i16) {
        let bytes = if self.little_endian {
            value.to_le_bytes()
        } else {
            value.to_be_bytes()
        };
        buf[offset..offset + 2].copy_from_slice(&bytes);
    }

    fn put_i32(&self, buf: &mut [u8], offset: usize, value: i32) {
        let bytes = if self.little_endian {
            value.to_le_bytes()
        } else {
            value.to_be_bytes()
        };
        buf[offset..offset + 4].copy_from_slice(&bytes);
    }

    fn encode_sample(&self, value: f64) -> Vec<u8> {
        let le = self.little_endian;
        macro_rules! ordered {
            ($v:expr) => {
                if le {
                    $v.to_le_bytes().to_vec()
                } else {
                    $v.to_be_bytes().to_vec()
                }
            };
        }
        match self.format {
            SampleFormat::IbmFloat32 => ordered!(f64_to_ibm(value)),
            SampleFormat::Int32 => ordered!(value as i32),
            SampleFormat::Int16 => ordered!(value as i16),
            SampleFormat::IeeeFloat32 => ordered!(value as f32),
            SampleFormat::IeeeFloat64 => ordered!(value),
            SampleFormat::Int8 => vec![value as i8 as u8],
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let samples = self.traces.first().map_or(0, Vec::len);

        let mut text = format!("{:<width$}", self.text, width = TEXTUAL_HEADER_LEN).into_bytes();
        text.truncate(TEXTUAL_HEADER_LEN);
        let mut out = if self.ebcdic {
            ascii_to_ebcdic(&text)
        } else {
            text
        };

        let mut binary = vec![0u8; BINARY_HEADER_LEN];
        self.put_i16(&mut binary, 16, self.sample_interval_us);
        self.put_i16(
            &mut binary,
            20,
            self.binary_samples.unwrap_or(samples as u16) as i16,
        );
        self.put_i16(&mut binary, 24, self.format.code());
        self.put_i16(&mut binary, 54, self.measurement_system);
        out.extend_from_slice(&binary);

        for (i, trace) in self.traces.iter().enumerate() {
            let mut header = vec![0u8; TRACE_HEADER_LEN];
            self.put_i32(&mut header, 0, i as i32 + 1);
            self.put_i32(&mut header, 4, i as i32 + 1);
            self.put_i32(&mut header, 20, 1000 + i as i32);
            self.put_i16(&mut header, 114, trace.len() as i16);
            self.put_i16(&mut header, 116, self.sample_interval_us);
            out.extend_from_slice(&header);
            for &value in trace {
                out.extend(self.encode_sample(value));
            }
        }

        out
    }

    pub fn write(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, self.build()).unwrap();
    }
}

pub fn write_file(path: &Path, contents: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}
