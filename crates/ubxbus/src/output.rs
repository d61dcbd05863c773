use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use ubxbus_frame::Frame;
use ubxbus_message::{class_name, Dispatch, MessageRegistry};

use crate::hex::{to_hex, to_hex_spaced};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize, Debug)]
pub struct MessageOutput {
    pub status: &'static str,
    pub name: Option<&'static str>,
    pub detail: Option<String>,
}

impl From<Dispatch> for MessageOutput {
    fn from(dispatch: Dispatch) -> Self {
        match dispatch {
            Dispatch::Decoded(message) => Self {
                status: "decoded",
                name: Some(message.name()),
                detail: Some(format!("{message:?}")),
            },
            Dispatch::Unknown { .. } => Self {
                status: "unknown",
                name: None,
                detail: None,
            },
            Dispatch::Malformed(message_type) => Self {
                status: "malformed",
                name: Some(message_type.name),
                detail: None,
            },
        }
    }
}

#[derive(Serialize, Debug)]
pub struct FrameOutput {
    pub class: u8,
    pub id: u8,
    pub class_name: &'static str,
    pub payload_size: usize,
    pub checksum: String,
    pub wire: String,
    pub message: MessageOutput,
    #[serde(skip)]
    wire_spaced: String,
}

impl FrameOutput {
    pub fn new(frame: &Frame, registry: &MessageRegistry) -> Self {
        let wire = frame.serialize();
        Self {
            class: frame.class(),
            id: frame.id(),
            class_name: class_name(frame.class()),
            payload_size: frame.len(),
            checksum: format!("0x{:04X}", frame.checksum()),
            wire: to_hex(&wire),
            message: registry.dispatch(frame).into(),
            wire_spaced: to_hex_spaced(&wire),
        }
    }

    fn message_label(&self) -> String {
        match self.message.name {
            Some(name) => format!("{name} ({})", self.message.status),
            None => self.message.status.to_string(),
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_frame(out: &FrameOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CLASS", "ID", "SIZE", "CHECKSUM", "MESSAGE"])
                .add_row(vec![
                    format!("0x{:02X} ({})", out.class, out.class_name),
                    format!("0x{:02X}", out.id),
                    out.payload_size.to_string(),
                    out.checksum.clone(),
                    out.message_label(),
                ]);
            println!("{table}");
            println!("{}", out.wire_spaced);
        }
        OutputFormat::Pretty => {
            println!(
                "class=0x{:02X} ({}) id=0x{:02X} size={} checksum={} message={}",
                out.class,
                out.class_name,
                out.id,
                out.payload_size,
                out.checksum,
                out.message_label()
            );
            if let Some(detail) = &out.message.detail {
                println!("  {detail}");
            }
            println!("  {}", out.wire_spaced);
        }
    }
}
