//! Build script for mycap-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates mycap.toml and compiles it into the image

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use mycap_core::config::BootConfig;

fn main() {
    setup_linker();
    let config = load_config();
    generate_config(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}

/// Read, parse and validate mycap.toml
fn load_config() -> BootConfig {
    println!("cargo:rerun-if-changed=mycap.toml");

    let config_path = Path::new("mycap.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: mycap.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a mycap.toml configuration file.          ║\n\
            ║  Please create one in the mycap-firmware directory.              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = fs::read_to_string(config_path)
        .unwrap_or_else(|e| fail("Failed to read mycap.toml", &[e.to_string()]));

    let config: BootConfig = toml::from_str(&content)
        .unwrap_or_else(|e| fail("Invalid mycap.toml", &[e.to_string()]));

    let errors = validate(&config);
    if !errors.is_empty() {
        fail("Invalid values in mycap.toml", &errors);
    }

    println!(
        "cargo:warning=mycap.toml validated successfully ({} trackers, {} required)",
        config.trackers.len(),
        config.required_count()
    );
    config
}

fn validate(config: &BootConfig) -> Vec<String> {
    let mut errors = Vec::new();

    if let Err(e) = config.validate() {
        errors.push(format!("[[tracker]] {}", e));
    }

    for tracker in &config.trackers {
        if !(0x08..=0x77).contains(&tracker.address) {
            errors.push(format!(
                "[[tracker]] index {}: address 0x{:02x} is not a valid 7-bit device address",
                tracker.index, tracker.address
            ));
        }
    }

    let service = &config.service;
    if service.status_poll_interval_ms == 0 {
        errors.push("[service] status_poll_interval_ms must be greater than 0".into());
    }
    if service.read_timeout_ms == 0 {
        errors.push("[service] read_timeout_ms must be greater than 0".into());
    }
    if service.baudrate == 0 {
        errors.push("[service] baudrate must be greater than 0".into());
    }

    errors
}

fn fail(title: &str, lines: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<57}║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        format_error_lines(lines)
    );
}

/// Format error message lines with box drawing
fn format_error_lines(lines: &[String]) -> String {
    lines
        .iter()
        .flat_map(|msg| msg.lines())
        .map(|line| {
            let truncated = if line.len() > 62 {
                format!("{}...", &line[..59])
            } else {
                line.to_string()
            };
            format!("║  • {:<62} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write the validated configuration as Rust constants
fn generate_config(config: &BootConfig) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let service = &config.service;

    let mut code = String::new();
    code.push_str("// Generated from mycap.toml by build.rs\n\n");
    code.push_str(&format!(
        "pub const SERVICE: ServiceConfig = ServiceConfig {{\n    \
            status_poll_interval_ms: {},\n    \
            read_timeout_ms: {},\n    \
            baudrate: {},\n}};\n\n",
        service.status_poll_interval_ms, service.read_timeout_ms, service.baudrate
    ));
    code.push_str(&format!(
        "pub const TRACKERS: [TrackerConfig; {}] = [\n",
        config.trackers.len()
    ));
    for t in &config.trackers {
        code.push_str(&format!(
            "    TrackerConfig::new({}, TrackerKind::{:?}, 0x{:02x}, {}),\n",
            t.index, t.kind, t.address, t.required
        ));
    }
    code.push_str("];\n");

    fs::write(out_dir.join("boot_config.rs"), code).unwrap();
}
