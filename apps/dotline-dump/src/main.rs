use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use dotline_core::{FlatVideoBus, FrameBuffer, Ppu, SCREEN_HEIGHT, SCREEN_WIDTH};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

/// Renders the background of a PPU address-space dump to a PNG.
#[derive(Parser, Debug)]
#[command(name = "dotline-dump")]
#[command(about = "Cycle-stepped NES background renderer", long_about = None)]
struct Args {
    /// Raw 16 KiB image of the PPU address space ($0000-$3FFF).
    vram: PathBuf,

    /// Output PNG path
    #[arg(short, long, default_value = "frame.png")]
    out: PathBuf,

    /// $2000 value (decimal or 0x-prefixed hex)
    #[arg(long, default_value = "0x00", value_parser = parse_byte)]
    control: u8,

    /// $2001 value (decimal or 0x-prefixed hex)
    #[arg(long, default_value = "0x08", value_parser = parse_byte)]
    mask: u8,

    /// First $2005 write (horizontal scroll)
    #[arg(long, default_value_t = 0)]
    scroll_x: u8,

    /// Second $2005 write (vertical scroll)
    #[arg(long, default_value_t = 0)]
    scroll_y: u8,

    /// Live VRAM address written through `$2006` after the scroll writes.
    /// With rendering off, a palette address here picks the displayed color.
    #[arg(long, value_parser = parse_addr)]
    addr: Option<u16>,

    /// Frames to run before capturing. The first frame starts mid-stream, so
    /// at least two are needed for a settled image.
    #[arg(short, long, default_value_t = 2)]
    frames: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

fn parse_byte(value: &str) -> Result<u8, String> {
    let parsed = match strip_hex_prefix(value) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|err| format!("`{value}` is not a byte: {err}"))
}

fn parse_addr(value: &str) -> Result<u16, String> {
    let parsed = match strip_hex_prefix(value) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|err| format!("`{value}` is not an address: {err}"))
}

fn strip_hex_prefix(value: &str) -> Option<&str> {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let image =
        fs::read(&args.vram).with_context(|| format!("reading {}", args.vram.display()))?;
    let mut bus = FlatVideoBus::from_image(&image)
        .with_context(|| format!("loading {}", args.vram.display()))?;
    bus.set_control(args.control);
    bus.set_mask(args.mask);

    let mut ppu = Ppu::new();
    let scroll = ppu.scroll_latch_mut();
    scroll.write_control(args.control);
    // A `$2002` read precedes the `$2005` pair.
    scroll.reset_toggle();
    scroll.write_scroll(args.scroll_x);
    scroll.write_scroll(args.scroll_y);
    let mut v = scroll.t;
    if let Some(addr) = args.addr {
        let [hi, lo] = addr.to_be_bytes();
        scroll.reset_toggle();
        scroll.write_addr(hi);
        if let Some(committed) = scroll.write_addr(lo) {
            v = committed;
        }
    }
    ppu.set_vram_addr(v);

    for _ in 0..args.frames {
        ppu.run_frame(&mut bus)?;
    }
    info!(
        frames = ppu.frame(),
        nmi = ppu.nmi_pending(),
        "rendering finished"
    );

    write_png(&args.out, ppu.frame_buffer())
        .with_context(|| format!("writing {}", args.out.display()))?;
    info!(path = %args.out.display(), "frame written");
    Ok(())
}

fn write_png(path: &Path, frame: &FrameBuffer) -> Result<()> {
    let file = File::create(path)?;
    let mut encoder = png::Encoder::new(
        BufWriter::new(file),
        SCREEN_WIDTH as u32,
        SCREEN_HEIGHT as u32,
    );
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(frame.as_bytes())?;
    writer.finish()?;
    Ok(())
}
