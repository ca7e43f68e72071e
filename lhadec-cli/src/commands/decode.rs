//! Decode command implementation.

use crate::utils::{compression_ratio, create_progress_bar};
use lhadec_core::{Decompressor, ReadStatus};
use lhadec_lzhuf::{DecoderConfig, LzhDecoder, LzhMethod};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::debug;

const BUFFER_SIZE: usize = 32768;

pub fn cmd_decode(
    input: &Path,
    method: LzhMethod,
    size: u64,
    output: Option<&Path>,
    offset: u64,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::open(input)?;
    if offset > 0 {
        file.seek(SeekFrom::Start(offset))?;
    }
    debug!(input = %input.display(), offset, %method, size, "decoding payload");

    let config = DecoderConfig::new(method, size);
    let mut decoder = LzhDecoder::new(BufReader::new(file), config)?;

    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            let pb = create_progress_bar(size, progress);
            pb.set_message(method.name());
            let written = copy_entry(&mut decoder, &mut writer, |n| pb.inc(n))?;
            writer.flush()?;
            pb.finish_and_clear();

            println!("Decoded: {}", path.display());
            println!("  Method: {} ({})", method.name(), method.description());
            println!("  Original size: {} bytes", written);
            if method.window_size() > 0 {
                let consumed = decoder.bytes_consumed();
                println!("  Compressed size: {} bytes", consumed);
                println!(
                    "  Compression ratio: {:.1}%",
                    compression_ratio(consumed, written)
                );
            }
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            copy_entry(&mut decoder, &mut writer, |_| {})?;
            writer.flush()?;
        }
    }

    Ok(())
}

/// Pump a decoder into a writer, reporting each chunk's size.
fn copy_entry<R: Read, W: Write>(
    decoder: &mut LzhDecoder<R>,
    writer: &mut W,
    mut on_chunk: impl FnMut(u64),
) -> Result<u64, Box<dyn std::error::Error>> {
    let mut buffer = vec![0u8; BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        match decoder.decompress(&mut buffer)? {
            ReadStatus::Produced(n) => {
                writer.write_all(&buffer[..n])?;
                total += n as u64;
                on_chunk(n as u64);
            }
            ReadStatus::EndOfEntry => break,
        }
    }
    Ok(total)
}
