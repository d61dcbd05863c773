use ubxbus_frame::Frame;
use ubxbus_message::MessageRegistry;

use crate::cmd::DecodeArgs;
use crate::exit::{CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::hex::parse_hex;
use crate::output::{print_frame, FrameOutput, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let wire = parse_hex(&args.frame).map_err(|err| CliError::usage(format!("frame: {err}")))?;
    let size = wire.len();
    let frame = Frame::deserialize(wire).ok_or_else(|| {
        CliError::new(
            DATA_INVALID,
            format!("not a valid UBX frame ({size} bytes)"),
        )
    })?;

    print_frame(
        &FrameOutput::new(&frame, &MessageRegistry::with_builtin()),
        format,
    );
    Ok(SUCCESS)
}
