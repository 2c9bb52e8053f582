//! Classifier configuration files.
//!
//! A config file holds one s-expression plist.  Every key is optional and
//! falls back to `ClassifierConfig::default()`:
//!
//! ```text
//! (:dwell-ms 300
//!  :debug-trace nil
//!  :down-thresholds (10 65 65 65 60)
//!  :middle-thresholds (50 80 80 80 70)
//!  :o-contact 40 :f-contact 30 :fingers-together 25)
//! ```

use std::path::Path;

use anyhow::Context;
use lexpr::Value;
use tracing::{info, warn};

use crate::asl::ClassifierConfig;
use crate::error::ConfigError;
use crate::ipc::sexp::{get_bool, get_numbers, get_value, number, plist_keys};

const KNOWN_KEYS: &[&str] = &[
    "dwell-ms",
    "debug-trace",
    "down-thresholds",
    "middle-thresholds",
    "o-contact",
    "b-knuckle-spread-sq",
    "f-contact",
    "orientation-deg",
    "relaxed-factor",
    "q-min-direction-deg",
    "fingers-together",
    "h-tilt-deg",
    "r-cross-deg",
    "k-equidistant",
];

/// Read and validate a config file.
pub fn load_config(path: &Path) -> anyhow::Result<ClassifierConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config =
        parse_config(&text).with_context(|| format!("parsing config {}", path.display()))?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Parse and validate a config plist.
pub fn parse_config(text: &str) -> Result<ClassifierConfig, ConfigError> {
    let value = lexpr::from_str(text)
        .map_err(|e| ConfigError::Invalid(format!("malformed s-expression: {e}")))?;

    for key in plist_keys(&value) {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            warn!("Ignoring unknown config key :{}", key);
        }
    }

    let mut config = ClassifierConfig::default();

    if let Some(ms) = float_key(&value, "dwell-ms")? {
        config.dwell_ms = ms;
    }
    if let Some(enabled) = get_bool(&value, "debug-trace") {
        config.debug_trace = enabled;
    }
    if let Some(down) = get_numbers::<5>(&value, "down-thresholds").map_err(ConfigError::Invalid)? {
        config.thresholds.down = down.map(|d| d as f32);
    }
    if let Some(middle) =
        get_numbers::<5>(&value, "middle-thresholds").map_err(ConfigError::Invalid)?
    {
        config.thresholds.middle = middle.map(|m| m as f32);
    }

    let r = &mut config.resolvers;
    let scalars: [(&str, &mut f32); 10] = [
        ("o-contact", &mut r.o_contact),
        ("b-knuckle-spread-sq", &mut r.b_knuckle_spread_sq),
        ("f-contact", &mut r.f_contact),
        ("orientation-deg", &mut r.orientation_deg),
        ("relaxed-factor", &mut r.relaxed_factor),
        ("q-min-direction-deg", &mut r.q_min_direction_deg),
        ("fingers-together", &mut r.fingers_together),
        ("h-tilt-deg", &mut r.h_tilt_deg),
        ("r-cross-deg", &mut r.r_cross_deg),
        ("k-equidistant", &mut r.k_equidistant),
    ];
    for (key, slot) in scalars {
        if let Some(v) = float_key(&value, key)? {
            *slot = v as f32;
        }
    }

    config.validate()?;
    Ok(config)
}

/// A present but non-numeric value is an error, not a silent default.
fn float_key(value: &Value, key: &str) -> Result<Option<f64>, ConfigError> {
    match get_value(value, key) {
        None => Ok(None),
        Some(raw) => number(raw)
            .map(Some)
            .ok_or_else(|| ConfigError::Invalid(format!(":{} must be a number", key))),
    }
}
