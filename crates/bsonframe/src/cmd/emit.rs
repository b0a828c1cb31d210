use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use bsonframe_codec::{EncoderConfig, Frame, FrameEncoder, FrameWriter};
use tracing::{debug, info};

use crate::cmd::EmitArgs;
use crate::exit::{
    encode_error, io_error, CliError, CliResult, DATA_INVALID, INTERNAL, SUCCESS, USAGE,
};

/// Timestamp and pacing settings for one emit run.
#[derive(Debug)]
struct Schedule {
    pts_start: i64,
    pts_step: i64,
    interval: Option<Duration>,
    repeat: bool,
}

pub fn run(args: EmitArgs) -> CliResult<i32> {
    let schedule = Schedule {
        pts_start: args.pts_start,
        pts_step: args.pts_step,
        interval: args.interval.as_deref().map(parse_duration).transpose()?,
        repeat: args.repeat,
    };

    let mut config = EncoderConfig::default();
    if let Some(max) = args.max_document_size {
        config.max_document_size = max;
    }

    let images = load_images(&args.inputs, &FrameEncoder::with_config(config.clone()))?;

    let running = Arc::new(AtomicBool::new(true));
    if schedule.repeat {
        install_ctrlc_handler(running.clone())?;
    }

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|err| {
                io_error(&format!("failed creating {}", path.display()), err)
            })?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let mut writer = FrameWriter::with_config(sink, config);
    debug!(
        inputs = images.len(),
        max_document_size = writer.config().max_document_size,
        "emit starting"
    );

    let written = emit_frames(&images, &schedule, &mut writer, &running)?;
    info!(frames = written, "emit finished");
    Ok(SUCCESS)
}

/// Read every input up front and check it fits in one message.
fn load_images(paths: &[PathBuf], encoder: &FrameEncoder) -> CliResult<Vec<(PathBuf, Frame)>> {
    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        let jpeg = fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
        encoder
            .document_len(jpeg.len())
            .map_err(|err| encode_error(&path.display().to_string(), err))?;
        debug!(path = %path.display(), size = jpeg.len(), "loaded image");
        images.push((path.clone(), Frame::new(jpeg, 0)));
    }
    Ok(images)
}

fn emit_frames<W: Write>(
    images: &[(PathBuf, Frame)],
    schedule: &Schedule,
    writer: &mut FrameWriter<W>,
    running: &AtomicBool,
) -> CliResult<u64> {
    let mut next_pts = Some(schedule.pts_start);
    let mut first = true;

    'feed: loop {
        for (path, image) in images {
            if !running.load(Ordering::SeqCst) {
                break 'feed;
            }
            if let (Some(interval), false) = (schedule.interval, first) {
                thread::sleep(interval);
            }
            first = false;

            let pts = next_pts.ok_or_else(|| {
                CliError::new(DATA_INVALID, "timestamp overflow: pts-step ran past i64 range")
            })?;
            let frame = Frame {
                pts,
                ..image.clone()
            };
            writer
                .write_frame(&frame)
                .map_err(|err| encode_error("write failed", err))?;
            debug!(path = %path.display(), pts, size = frame.jpeg_size(), "frame written");

            next_pts = pts.checked_add(schedule.pts_step);
        }

        if !schedule.repeat {
            break;
        }
    }

    Ok(writer.frames_written())
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
