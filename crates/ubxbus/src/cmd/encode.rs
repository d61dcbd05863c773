use ubxbus_frame::Frame;
use ubxbus_message::MessageRegistry;

use crate::cmd::EncodeArgs;
use crate::exit::{frame_error, CliError, CliResult, SUCCESS};
use crate::hex::parse_hex;
use crate::output::{print_frame, FrameOutput, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = parse_hex(&args.payload)
        .map_err(|err| CliError::usage(format!("--payload: {err}")))?;
    let frame =
        Frame::new(args.class, args.id, payload).map_err(|err| frame_error("encode failed", err))?;

    print_frame(
        &FrameOutput::new(&frame, &MessageRegistry::with_builtin()),
        format,
    );
    Ok(SUCCESS)
}
