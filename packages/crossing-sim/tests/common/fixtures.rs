//! Test fixtures for crossing-sim tests

use crossing_sim::{Preset, SimConfig};
use std::io::Write;
use tempfile::NamedTempFile;

/// Quick preset with a fixed seed
pub fn quick_config(seed: u64) -> SimConfig {
    SimConfig::preset(Preset::Quick).seed(seed)
}

/// Capped preset scaled down so it finishes in well under a second
pub fn fast_capped_config(seed: u64) -> SimConfig {
    SimConfig::preset(Preset::Capped).seed(seed).time_scale(0.001)
}

pub fn yaml_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}
