// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! xrwire-inspect - Encode and decode xrwire payloads from the command line.
//!
//! Usage:
//!   xrwire-inspect encode --family request --json request.json
//!   echo '{"trigger_emote":{"emote_id":42,"trigger":true}}' | xrwire-inspect encode -f request --json -
//!   xrwire-inspect decode --family request --hex 010100002a0000000000000001
//!   xrwire-inspect decode --family tracking-frame --input capture.bin --protocol 2.6.0
//!   xrwire-inspect families

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use xrwire::dto::{AvatarMapping, InteractionDto, PoseCondition, Request, UserTrackingFrame};
use xrwire::{CodecConfig, ProtocolVersion, SerializerRegistry, WriteParams};

#[derive(Parser, Debug)]
#[command(name = "xrwire-inspect")]
#[command(author = "naskel.com")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Encode JSON DTOs to xrwire bytes and decode payloads back to JSON")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Codec configuration file (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Protocol version to encode for / decode as (default: config or current)
    #[arg(long, global = true)]
    protocol: Option<ProtocolVersion>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a JSON document and print the bytes as hex
    Encode {
        #[arg(short, long)]
        family: Family,

        /// JSON file, or `-` for stdin
        #[arg(long)]
        json: String,

        /// Wrap the payload in a `[u32 len]` frame
        #[arg(long)]
        framed: bool,
    },
    /// Decode a payload and print it as JSON
    Decode {
        #[arg(short, long)]
        family: Family,

        /// Payload as a hex string
        #[arg(long, conflicts_with = "input", required_unless_present = "input")]
        hex: Option<String>,

        /// Payload as a binary file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Payload is wrapped in a `[u32 len]` frame
        #[arg(long)]
        framed: bool,
    },
    /// List the DTO families this build understands
    Families,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Family {
    Request,
    PoseCondition,
    AvatarMapping,
    TrackingFrame,
    Interaction,
}

impl Family {
    const ALL: [Family; 5] = [
        Family::Request,
        Family::PoseCondition,
        Family::AvatarMapping,
        Family::TrackingFrame,
        Family::Interaction,
    ];

    fn cli_name(self) -> &'static str {
        match self {
            Family::Request => "request",
            Family::PoseCondition => "pose-condition",
            Family::AvatarMapping => "avatar-mapping",
            Family::TrackingFrame => "tracking-frame",
            Family::Interaction => "interaction",
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Family::Request => "browser requests, tags 0x0101-0x0107",
            Family::PoseCondition => "recursive pose conditions, tags 0x0201-0x0212",
            Family::AvatarMapping => "user avatar bone bindings (version dependent)",
            Family::TrackingFrame => "per-frame skeleton + optional camera",
            Family::Interaction => "interaction descriptors, tags 0x0401-0x0404",
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => CodecConfig::from_yaml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => CodecConfig::default(),
    };
    if let Some(version) = args.protocol {
        config = config.with_protocol_version(version);
    }
    info!("protocol {}", config.protocol_version);

    let registry = SerializerRegistry::standard_builder()
        .with_config(config)
        .build();
    debug!("{:?}", registry);

    match args.command {
        Command::Encode {
            family,
            json,
            framed,
        } => {
            let text = read_json(&json)?;
            let bytes = encode_family(&registry, family, &text, framed)?;
            println!("{}", hex_encode(&bytes));
            eprintln!(
                "{} {} bytes ({})",
                "encoded".green().bold(),
                bytes.len(),
                family.cli_name()
            );
        }
        Command::Decode {
            family,
            hex,
            input,
            framed,
        } => {
            let bytes = match (hex, input) {
                (Some(hex), _) => hex_decode(&hex).context("invalid hex payload")?,
                (None, Some(path)) => read_binary(&path)?,
                (None, None) => anyhow::bail!("either --hex or --input is required"),
            };
            let json = decode_family(&registry, family, &bytes, framed)?;
            eprintln!(
                "{} {} bytes ({})",
                "decoded".green().bold(),
                bytes.len(),
                family.cli_name()
            );
            println!("{}", json);
        }
        Command::Families => {
            for family in Family::ALL {
                println!(
                    "{:<16} {}",
                    family.cli_name().cyan().bold(),
                    family.describe()
                );
            }
            println!();
            for (name, priority) in registry.modules() {
                println!("{} {:<12} priority {}", "module".dimmed(), name, priority);
            }
        }
    }

    Ok(())
}

fn read_json(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("reading {}", source))
    }
}

fn read_binary(path: &Path) -> anyhow::Result<Vec<u8>> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn encode_family(
    registry: &SerializerRegistry,
    family: Family,
    json: &str,
    framed: bool,
) -> anyhow::Result<Vec<u8>> {
    match family {
        Family::Request => encode_as::<Request>(registry, json, framed),
        Family::PoseCondition => encode_as::<PoseCondition>(registry, json, framed),
        Family::AvatarMapping => encode_as::<AvatarMapping>(registry, json, framed),
        Family::TrackingFrame => encode_as::<UserTrackingFrame>(registry, json, framed),
        Family::Interaction => encode_as::<InteractionDto>(registry, json, framed),
    }
}

fn decode_family(
    registry: &SerializerRegistry,
    family: Family,
    bytes: &[u8],
    framed: bool,
) -> anyhow::Result<String> {
    match family {
        Family::Request => decode_as::<Request>(registry, bytes, framed),
        Family::PoseCondition => decode_as::<PoseCondition>(registry, bytes, framed),
        Family::AvatarMapping => decode_as::<AvatarMapping>(registry, bytes, framed),
        Family::TrackingFrame => decode_as::<UserTrackingFrame>(registry, bytes, framed),
        Family::Interaction => decode_as::<InteractionDto>(registry, bytes, framed),
    }
}

fn encode_as<T>(registry: &SerializerRegistry, json: &str, framed: bool) -> anyhow::Result<Vec<u8>>
where
    T: DeserializeOwned + 'static,
{
    let value: T = serde_json::from_str(json).context("parsing JSON")?;
    let params = WriteParams::for_version(registry.config().protocol_version);
    let bytes = if framed {
        registry.write_framed(&value, &params)?
    } else {
        registry.write(&value, &params)?
    };
    Ok(bytes.to_vec())
}

fn decode_as<T>(registry: &SerializerRegistry, bytes: &[u8], framed: bool) -> anyhow::Result<String>
where
    T: Serialize + 'static,
{
    let value: T = if framed {
        let mut container =
            xrwire::ByteContainer::with_version(bytes, registry.config().protocol_version);
        let value = registry.read_framed(&mut container)?;
        if !container.is_eof() {
            anyhow::bail!("{} bytes after frame", container.remaining());
        }
        value
    } else {
        registry.decode(bytes)?
    };
    Ok(serde_json::to_string_pretty(&value)?)
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Accepts upper/lower case, ignores whitespace and an optional `0x` prefix.
fn hex_decode(s: &str) -> Option<Vec<u8>> {
    let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    let s = s.strip_prefix("0x").unwrap_or(&s);
    if !s.is_ascii() || s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_encode_decode() {
        let bytes = vec![0x01, 0x01, 0x00, 0x00, 0xAB, 0xFF];
        let hex = hex_encode(&bytes);
        assert_eq!(hex, "01010000abff");
        assert_eq!(hex_decode(&hex).expect("valid hex"), bytes);
        assert_eq!(hex_decode("0x01 01\n00 00 AB FF").expect("spaced"), bytes);
        assert!(hex_decode("abc").is_none());
        assert!(hex_decode("zz").is_none());
        assert!(hex_decode("é1").is_none());
    }

    #[test]
    fn test_encode_request_from_json() {
        let registry = SerializerRegistry::standard();
        let json = r#"{"trigger_emote": {"emote_id": 42, "trigger": true}}"#;
        let bytes = encode_family(&registry, Family::Request, json, false).expect("encode");
        assert_eq!(
            hex_encode(&bytes),
            concat!("01010000", "2a00000000000000", "01")
        );
    }

    #[test]
    fn test_decode_framed_roundtrip() {
        let registry = SerializerRegistry::standard();
        let json = r#"{"environment": {"environment_id": 3, "allowed": false}}"#;
        let bytes =
            encode_family(&registry, Family::PoseCondition, json, true).expect("encode");
        let out = decode_family(&registry, Family::PoseCondition, &bytes, true).expect("decode");
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        assert_eq!(value["environment"]["environment_id"], 3);
    }

    #[test]
    fn test_decode_garbage_reports_error() {
        let registry = SerializerRegistry::standard();
        assert!(decode_family(&registry, Family::Interaction, &[0xFF; 3], false).is_err());
    }

    #[test]
    fn test_read_binary_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(read_binary(&dir.path().join("absent.bin")).is_err());
    }
}
