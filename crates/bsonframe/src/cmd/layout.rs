use bsonframe_codec::Layout;

use crate::cmd::LayoutArgs;
use crate::exit::{encode_error, CliResult, SUCCESS};
use crate::output::{print_layout, OutputFormat};

pub fn run(args: LayoutArgs, format: OutputFormat) -> CliResult<i32> {
    let layout = Layout::new(args.jpeg_size).map_err(|err| encode_error("invalid size", err))?;
    print_layout(&layout, format);
    Ok(SUCCESS)
}
