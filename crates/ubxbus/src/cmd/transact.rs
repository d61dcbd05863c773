use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use ubxbus_frame::{FRAME_OVERHEAD, MAX_PAYLOAD};
use ubxbus_twi::{
    BusEngine, Direction, DummyBus, LoggingDriver, Segment, Transaction, TransactionBuilder,
    TwiDriver,
};

use crate::cmd::TransactArgs;
use crate::exit::{driver_error, twi_error, CliError, CliResult, SUCCESS};
use crate::hex::{parse_byte, parse_hex, to_hex, to_hex_spaced};
use crate::output::{print_json, OutputFormat};

/// Largest read a segment may request: one maximum-size frame.
const MAX_READ_LEN: usize = MAX_PAYLOAD + FRAME_OVERHEAD;

#[derive(Serialize, Debug)]
struct SegmentOutput {
    index: usize,
    direction: &'static str,
    address: u8,
    data: String,
    #[serde(skip)]
    bytes: Vec<u8>,
}

#[derive(Serialize, Debug)]
struct TransactOutput {
    transaction: String,
    bus_trace: String,
    segments: Vec<SegmentOutput>,
}

pub fn run(args: TransactArgs, format: OutputFormat) -> CliResult<i32> {
    let out = execute(&args)?;
    print_transaction(&out, format);
    Ok(SUCCESS)
}

fn execute(args: &TransactArgs) -> CliResult<TransactOutput> {
    let mut transaction = args
        .segments
        .iter()
        .map(|arg| parse_segment(arg))
        .collect::<CliResult<Vec<_>>>()?
        .into_iter()
        .fold(Transaction::builder(), TransactionBuilder::segment)
        .build();

    let mut bus = DummyBus::new("dummy").with_fill_byte(args.fill_byte);
    if let Some(hex) = &args.read_data {
        let data = parse_hex(hex).map_err(|err| CliError::usage(format!("--read-data: {err}")))?;
        bus = bus.with_read_data(data);
    }
    for address in &args.nack_address {
        bus = bus.nack_address(*address);
    }

    let mut driver = LoggingDriver::new(BusEngine::new(bus), "dummy");
    driver
        .open()
        .map_err(|err| driver_error("open failed", err))?;
    let requested = transaction.to_string();
    let submitted = driver.submit(&mut transaction).map(|_| ());
    let closed = driver.close();
    submitted.map_err(|err| twi_error("transaction failed", err))?;
    closed.map_err(|err| driver_error("close failed", err))?;

    let segments = transaction
        .iter()
        .enumerate()
        .map(|(index, segment)| SegmentOutput {
            index,
            direction: match segment.direction() {
                Direction::Write => "write",
                Direction::Read => "read",
            },
            address: segment.address(),
            data: to_hex(segment.data()),
            bytes: segment.data().to_vec(),
        })
        .collect();

    Ok(TransactOutput {
        transaction: requested,
        bus_trace: driver.get_ref().get_ref().trace(),
        segments,
    })
}

/// Parse `w:ADDR:HEX` or `r:ADDR:LEN`.
fn parse_segment(arg: &str) -> CliResult<Segment> {
    let invalid = |reason: String| CliError::usage(format!("segment {arg:?}: {reason}"));

    let mut parts = arg.splitn(3, ':');
    let (Some(kind), Some(address), Some(rest)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid("expected w:ADDR:HEX or r:ADDR:LEN".to_string()));
    };
    let address = parse_byte(address).map_err(invalid)?;

    match kind.trim() {
        "w" | "write" => Ok(Segment::write(address, parse_hex(rest).map_err(invalid)?)),
        "r" | "read" => {
            let len = rest
                .trim()
                .parse::<usize>()
                .map_err(|_| invalid(format!("invalid read length {rest:?}")))?;
            if len > MAX_READ_LEN {
                return Err(invalid(format!(
                    "read length {len} exceeds {MAX_READ_LEN} bytes"
                )));
            }
            Ok(Segment::read(address, len))
        }
        other => Err(invalid(format!("unknown direction {other:?}"))),
    }
}

fn print_transaction(out: &TransactOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "DIR", "ADDR", "DATA"]);
            for segment in &out.segments {
                table.add_row(vec![
                    segment.index.to_string(),
                    segment.direction.to_string(),
                    format!("0x{:02X}", segment.address),
                    to_hex_spaced(&segment.bytes),
                ]);
            }
            println!("{table}");
            println!("{}", out.bus_trace);
        }
        OutputFormat::Pretty => {
            println!("request: {}", out.transaction);
            println!("bus:     {}", out.bus_trace);
            for segment in out.segments.iter().filter(|s| s.direction == "read") {
                println!(
                    "read #{} from 0x{:02X}: {}",
                    segment.index,
                    segment.address,
                    to_hex_spaced(&segment.bytes)
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit::{DEVICE_UNREACHABLE, USAGE};

    fn args(segments: &[&str]) -> TransactArgs {
        TransactArgs {
            segments: segments.iter().map(|s| s.to_string()).collect(),
            read_data: None,
            fill_byte: 0x55,
            nack_address: Vec::new(),
        }
    }

    #[test]
    fn parse_segment_forms() {
        assert_eq!(
            parse_segment("w:0x03:4041").unwrap(),
            Segment::write(0x03, [0x40, 0x41])
        );
        assert_eq!(
            parse_segment("write:4:01:02:03").unwrap(),
            Segment::write(0x04, [0x01, 0x02, 0x03])
        );
        assert_eq!(parse_segment("r:0x04:2").unwrap(), Segment::read(0x04, 2));
    }

    #[test]
    fn parse_segment_rejects_malformed() {
        for arg in ["w:0x03", "x:0x03:00", "r:0x04:many", "w:0x300:00", "w:3:zz"] {
            let err = parse_segment(arg).unwrap_err();
            assert_eq!(err.code, USAGE, "{arg}");
        }
    }

    #[test]
    fn parse_segment_bounds_read_length() {
        let max = format!("r:0x42:{MAX_READ_LEN}");
        assert_eq!(parse_segment(&max).unwrap().len(), MAX_READ_LEN);

        let over = parse_segment(&format!("r:0x42:{}", MAX_READ_LEN + 1)).unwrap_err();
        assert_eq!(over.code, USAGE);
        assert!(over.message.contains("exceeds"));

        for arg in ["r:0x42:1000000000000", "r:0x42:18446744073709551615"] {
            assert_eq!(parse_segment(arg).unwrap_err().code, USAGE, "{arg}");
        }
    }

    #[test]
    fn executes_on_dummy_bus() {
        let out = execute(&args(&["w:0x03:4041", "r:0x04:1"])).unwrap();
        assert_eq!(out.transaction, "[S][AD:03+W][W:40][W:41][Sr][AD:04+R][R:00][P]");
        assert_eq!(
            out.bus_trace,
            "[S][AD:03+W|A][W:40|A][W:41|A][Sr][AD:04+R|A][R:55|NA][P]"
        );
        assert_eq!(out.segments[1].data, "55");
        assert_eq!(out.segments[1].direction, "read");
    }

    #[test]
    fn read_data_is_served_first() {
        let mut args = args(&["r:0x42:3"]);
        args.read_data = Some("0102".to_string());
        args.fill_byte = 0xFF;
        let out = execute(&args).unwrap();
        assert_eq!(out.segments[0].data, "0102FF");
    }

    #[test]
    fn nacked_address_fails_unreachable() {
        let mut args = args(&["w:0x42:00"]);
        args.nack_address = vec![0x42];
        assert_eq!(execute(&args).unwrap_err().code, DEVICE_UNREACHABLE);
    }

    #[test]
    fn out_of_range_address_is_usage() {
        let err = execute(&args(&["w:0x80:00"])).unwrap_err();
        assert_eq!(err.code, USAGE);
    }
}
