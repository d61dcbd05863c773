use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::hex::parse_byte;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod poll;
pub mod transact;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a bus transaction against the simulated bus.
    Transact(TransactArgs),
    /// Serialize a UBX frame.
    Encode(EncodeArgs),
    /// Validate and decode a serialized UBX frame.
    Decode(DecodeArgs),
    /// Poll a simulated device for one frame.
    Poll(PollArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Transact(args) => transact::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Poll(args) => poll::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct TransactArgs {
    /// Segment as `w:ADDR:HEX` or `r:ADDR:LEN`, in bus order. Repeatable.
    #[arg(long = "segment", short = 's', value_name = "SEGMENT", required = true)]
    pub segments: Vec<String>,
    /// Bytes the simulated bus returns for reads before falling back to the fill byte.
    #[arg(long, value_name = "HEX")]
    pub read_data: Option<String>,
    /// Byte returned for reads once the read data is exhausted.
    #[arg(long, value_parser = parse_byte, default_value = "0x55")]
    pub fill_byte: u8,
    /// Addresses the simulated bus does not acknowledge. Repeatable.
    #[arg(long, value_parser = parse_byte)]
    pub nack_address: Vec<u8>,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Message class (e.g. 0x06).
    #[arg(long, value_parser = parse_byte)]
    pub class: u8,
    /// Message id (e.g. 0x00).
    #[arg(long, value_parser = parse_byte)]
    pub id: u8,
    /// Payload bytes as hex.
    #[arg(long, value_name = "HEX", default_value = "")]
    pub payload: String,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Serialized frame as hex.
    pub frame: String,
}

#[derive(Args, Debug)]
pub struct PollArgs {
    /// Raw bytes the simulated device has pending. Omit for an idle device.
    #[arg(long, value_name = "HEX")]
    pub device_frame: Option<String>,
    /// Device bus address.
    #[arg(long, env = "UBXBUS_ADDRESS", value_parser = parse_byte, default_value = "0x42")]
    pub address: u8,
    /// Largest pending byte count a poll will read.
    #[arg(long, env = "UBXBUS_FRAME_LIMIT", default_value = "4096")]
    pub frame_limit: usize,
    /// Send a NAV-POSLLH poll request before polling.
    #[arg(long)]
    pub request: bool,
    /// Simulate a device that does not acknowledge its address.
    #[arg(long)]
    pub absent: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
