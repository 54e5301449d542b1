//! WAV output.

use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::Path;

/// Spec for 32-bit float mono files at `sample_rate`.
pub fn mono_float_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    }
}

/// Write mono samples as a 32-bit float WAV file.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], sample_rate: u32) -> hound::Result<()> {
    let mut writer = WavWriter::create(path, mono_float_spec(sample_rate))?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()
}
