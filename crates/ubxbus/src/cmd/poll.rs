use serde::Serialize;
use ubxbus_frame::Frame;
use ubxbus_message::{send_message, MessageRegistry, NavPosllhPoll};
use ubxbus_transport::{TwiTransport, TwiTransportConfig, UbxTransport};
use ubxbus_twi::{BusEngine, DummyBus, LoggingDriver, TwiDriver};

use crate::cmd::PollArgs;
use crate::exit::{message_error, transport_error, CliError, CliResult, SUCCESS};
use crate::hex::parse_hex;
use crate::output::{print_frame, print_json, FrameOutput, OutputFormat};

#[derive(Serialize, Debug)]
struct PollOutput {
    address: u8,
    frame: Option<FrameOutput>,
    bus_trace: String,
}

pub fn run(args: PollArgs, format: OutputFormat) -> CliResult<i32> {
    let out = execute(&args)?;
    match (format, &out.frame) {
        (OutputFormat::Json, _) => print_json(&out),
        (_, Some(frame)) => print_frame(frame, format),
        (_, None) => println!("no frame available from 0x{:02X}", out.address),
    }
    Ok(SUCCESS)
}

/// Device simulation: the dummy bus serves the 2-byte pending count, then
/// the pending bytes themselves.
fn simulated_device(args: &PollArgs) -> CliResult<DummyBus> {
    let pending = match &args.device_frame {
        Some(hex) => {
            parse_hex(hex).map_err(|err| CliError::usage(format!("--device-frame: {err}")))?
        }
        None => Vec::new(),
    };
    let count = u16::try_from(pending.len()).map_err(|_| {
        CliError::usage(format!(
            "--device-frame: {} bytes do not fit the 16-bit count register",
            pending.len()
        ))
    })?;

    let mut bus = DummyBus::new("dummy")
        .with_read_data(count.to_le_bytes())
        .with_read_data(pending);
    if args.absent {
        bus = bus.nack_address(args.address);
    }
    Ok(bus)
}

fn execute(args: &PollArgs) -> CliResult<PollOutput> {
    let config = TwiTransportConfig {
        frame_length_limit: args.frame_limit,
        ..TwiTransportConfig::at(args.address)
    };
    let driver = LoggingDriver::new(BusEngine::new(simulated_device(args)?), "dummy");
    let mut transport = TwiTransport::with_config(driver, config);
    let frame = poll_device(&mut transport, args.request)?;

    let registry = MessageRegistry::with_builtin();
    Ok(PollOutput {
        address: args.address,
        frame: frame.map(|frame| FrameOutput::new(&frame, &registry)),
        bus_trace: transport.get_ref().get_ref().get_ref().trace(),
    })
}

/// Open, optionally request, poll once, then close. The driver is closed
/// even when the exchange fails.
fn poll_device<D: TwiDriver>(
    transport: &mut TwiTransport<D>,
    request: bool,
) -> CliResult<Option<Frame>> {
    transport
        .open()
        .map_err(|err| transport_error("open failed", err))?;

    let polled = exchange(transport, request);
    let closed = transport.close();
    let frame = polled?;
    closed.map_err(|err| transport_error("close failed", err))?;
    Ok(frame)
}

fn exchange<D: TwiDriver>(
    transport: &mut TwiTransport<D>,
    request: bool,
) -> CliResult<Option<Frame>> {
    if request {
        send_message(transport, &NavPosllhPoll)
            .map_err(|err| message_error("poll request failed", err))?;
    }
    transport
        .poll()
        .map_err(|err| transport_error("poll failed", err))
}

#[cfg(test)]
mod tests {
    use ubxbus_message::{Message, NavPosllh};

    use super::*;
    use crate::exit::{DEVICE_UNREACHABLE, USAGE};
    use crate::hex::to_hex;

    fn args(device_frame: Option<String>) -> PollArgs {
        PollArgs {
            device_frame,
            address: 0x42,
            frame_limit: 4096,
            request: false,
            absent: false,
        }
    }

    #[test]
    fn idle_device_yields_no_frame() {
        let out = execute(&args(None)).unwrap();
        assert!(out.frame.is_none());
        assert_eq!(out.bus_trace, "[S][AD:42+W|A][W:FC|A][Sr][AD:42+R|A][R:00|A][R:00|NA][P]");
    }

    #[test]
    fn pending_frame_is_decoded() {
        let message = NavPosllh {
            itow: 42,
            ..NavPosllh::default()
        };
        let wire = message.flatten().unwrap().serialize();
        let mut args = args(Some(to_hex(&wire)));
        args.request = true;

        let out = execute(&args).unwrap();
        let frame = out.frame.unwrap();
        assert_eq!(frame.wire, to_hex(&wire));
        assert_eq!(frame.message.status, "decoded");
        assert!(out.bus_trace.starts_with("[S][AD:42+W|A][W:B5|A]"));
    }

    #[test]
    fn over_limit_count_skips_read() {
        let mut args = args(Some("B5620600".repeat(8)));
        args.frame_limit = 16;
        let out = execute(&args).unwrap();
        assert!(out.frame.is_none());
    }

    #[test]
    fn absent_device_is_unreachable() {
        let mut args = args(None);
        args.absent = true;
        assert_eq!(execute(&args).unwrap_err().code, DEVICE_UNREACHABLE);
    }

    #[test]
    fn driver_closed_when_poll_fails() {
        for request in [false, true] {
            let bus = DummyBus::new("test").nack_address(0x42);
            let mut transport = TwiTransport::new(BusEngine::new(bus), 0x42);

            let err = poll_device(&mut transport, request).unwrap_err();
            assert_eq!(err.code, DEVICE_UNREACHABLE);
            assert!(!transport.get_ref().get_ref().is_open());
        }
    }

    #[test]
    fn driver_closed_after_successful_poll() {
        let bus = DummyBus::new("test").with_read_data([0x00, 0x00]);
        let mut transport = TwiTransport::new(BusEngine::new(bus), 0x42);

        assert!(poll_device(&mut transport, false).unwrap().is_none());
        assert!(!transport.get_ref().get_ref().is_open());
    }

    #[test]
    fn bad_hex_is_usage() {
        assert_eq!(
            execute(&args(Some("B5G".to_string()))).unwrap_err().code,
            USAGE
        );
    }
}
