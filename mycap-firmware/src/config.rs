//! Boot configuration compiled in from mycap.toml

use mycap_core::config::{ServiceConfig, TrackerConfig};
use mycap_core::tracker::TrackerKind;

include!(concat!(env!("OUT_DIR"), "/boot_config.rs"));
