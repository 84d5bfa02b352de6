//! Cycle-stepped background renderer.
//!
//! [`Ppu::clock`] consumes one dot. Each call runs, in this order:
//!
//! 1. snapshot of the control and mask registers from the bus,
//! 2. the vertical blank edges ([`vblank`]),
//! 3. outside vertical blank, the pixel output ([`renderer`]) followed by the
//!    fetch sequencer ([`fetch`]), the shifter reload and shift
//!    ([`background_pipeline`]) and the `v` updates ([`scroll`]),
//! 4. the dot/scanline counters.
//!
//! All state lives in [`Ppu`]; memory is borrowed from the driver per tick.

pub mod background_pipeline;
pub mod buffer;
pub mod fetch;
pub mod palette;
pub mod registers;
pub mod renderer;
pub mod savestate;
pub mod scroll;
mod vblank;

use core::ops::RangeInclusive;

use tracing::debug;

use crate::{
    bus::VideoBus,
    error::Error,
    memory::timing::{
        DOTS_PER_SCANLINE, LAST_VISIBLE_SCANLINE, POST_RENDER_SCANLINE, PRE_RENDER_SCANLINE,
        SCANLINES_PER_FRAME,
    },
};
use background_pipeline::{BgPipeline, Shift16};
use buffer::FrameBuffer;
use fetch::{BgFetcher, FetchLatches, FetchStage, LineKind, POST_RENDER_IDLE};
use registers::{Control, Mask, ScrollLatch, Status, VramAddr};
use savestate::{BgPipelineState, FetchState, PpuState, ScrollState};
use scroll::ScrollCheckpoints;
use vblank::VBlank;

/// Dots on which the pattern shifters advance.
const SHIFT_DOTS: [RangeInclusive<u16>; 2] = [2..=257, 322..=337];
const LAST_DOT: u16 = DOTS_PER_SCANLINE - 1;

/// Background-only PPU core.
#[derive(Debug, Clone)]
pub struct Ppu {
    /// Current dot (0..=340).
    dot: u16,
    /// Current scanline (0..=261); 261 is the pre-render line.
    scanline: u16,
    /// Completed frames.
    frame: u64,
    /// Flips every frame. Tracked only; no odd-frame dot skip is modeled.
    odd_frame: bool,
    /// Live VRAM address (`v`).
    v: VramAddr,
    /// Externally latched `t`/fine X/write toggle.
    scroll: ScrollLatch,
    checkpoints: ScrollCheckpoints,
    fetcher: BgFetcher,
    /// Ticks left before the fetch sequencer is dispatched again.
    idle_counter: u16,
    background: BgPipeline,
    vblank: VBlank,
    /// Register snapshots taken at the top of the current tick.
    control: Control,
    mask: Mask,
    frame_buffer: FrameBuffer,
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl Ppu {
    /// Creates a core parked at dot 0 of scanline 0 with every register cleared.
    pub fn new() -> Self {
        Self {
            dot: 0,
            scanline: 0,
            frame: 0,
            odd_frame: false,
            v: VramAddr::default(),
            scroll: ScrollLatch::default(),
            checkpoints: ScrollCheckpoints::default(),
            fetcher: BgFetcher::new(),
            idle_counter: 0,
            background: BgPipeline::new(),
            vblank: VBlank::default(),
            control: Control::empty(),
            mask: Mask::empty(),
            frame_buffer: FrameBuffer::new(),
        }
    }

    /// External reinitialization: returns every register to its power-on value
    /// and blanks the frame buffer.
    pub fn reset(&mut self) {
        let mut frame_buffer = core::mem::take(&mut self.frame_buffer);
        frame_buffer.clear();
        *self = Self {
            frame_buffer,
            ..Self::new()
        };
    }

    /// Advances the core by exactly one dot.
    ///
    /// A failing bus access aborts the tick and is returned as-is. Nothing
    /// past the failing access is committed: counters, shifters, scroll
    /// checkpoints and the fetch stage stay where they were, so the same dot
    /// can be clocked again.
    pub fn clock<B: VideoBus>(&mut self, bus: &mut B) -> Result<(), B::Error> {
        self.control = Control::from_bits_retain(bus.control());
        self.mask = Mask::from_bits_retain(bus.mask());
        self.v.wrap_to_address_space();

        self.vblank.step(self.scanline, self.dot, self.control, bus)?;

        if !self.vblank.active() {
            self.render_dot(bus)?;
        }

        self.advance_counters();
        Ok(())
    }

    /// Clocks until the scanline counter wraps back to 0.
    pub fn run_frame<B: VideoBus>(&mut self, bus: &mut B) -> Result<(), B::Error> {
        let frame = self.frame;
        while self.frame == frame {
            self.clock(bus)?;
        }
        Ok(())
    }

    fn render_dot<B: VideoBus>(&mut self, bus: &mut B) -> Result<(), B::Error> {
        if renderer::is_visible(self.scanline, self.dot) {
            let addr = renderer::pixel_palette_addr(
                self.mask,
                &self.background,
                self.scroll.fine_x,
                self.v,
            );
            renderer::draw(bus, &mut self.frame_buffer, self.scanline, self.dot, addr)?;
        }

        if !self.mask.rendering_enabled() {
            return Ok(());
        }

        let rendering_line = self.is_rendering_line();

        // Reloads see the latches as they stood before this dot's fetch.
        let reload = (rendering_line && self.dot == self.checkpoints.reload_dot)
            .then(|| *self.fetcher.latches());

        if self.idle_counter != 0 {
            self.idle_counter -= 1;
        } else {
            self.idle_counter += match self.scanline {
                0..=LAST_VISIBLE_SCANLINE => self.fetcher.dispatch(
                    self.dot,
                    LineKind::Visible,
                    self.v,
                    self.control,
                    bus,
                )?,
                POST_RENDER_SCANLINE => POST_RENDER_IDLE,
                _ => self.fetcher.dispatch(
                    self.dot,
                    LineKind::PreRender,
                    self.v,
                    self.control,
                    bus,
                )?,
            };
        }

        if let Some(latches) = reload {
            self.background.reload(
                [latches.pattern_low, latches.pattern_high],
                latches.attribute,
                self.v,
            );
            self.checkpoints.advance_reload();
        }

        if rendering_line {
            if SHIFT_DOTS.iter().any(|range| range.contains(&self.dot)) {
                self.background.shift();
            }
            self.checkpoints
                .step(self.dot, self.scanline, &mut self.v, self.scroll.t);
        }

        Ok(())
    }

    /// Visible lines and the pre-render line.
    fn is_rendering_line(&self) -> bool {
        self.scanline <= LAST_VISIBLE_SCANLINE || self.scanline == PRE_RENDER_SCANLINE
    }

    fn advance_counters(&mut self) {
        if self.dot == LAST_DOT {
            self.scanline = (self.scanline + 1) % SCANLINES_PER_FRAME;
            if self.scanline == 0 {
                self.frame = self.frame.wrapping_add(1);
                self.odd_frame = !self.odd_frame;
                debug!(frame = self.frame, "frame complete");
            }
        }
        self.dot = (self.dot + 1) % DOTS_PER_SCANLINE;
    }

    pub fn dot(&self) -> u16 {
        self.dot
    }

    pub fn scanline(&self) -> u16 {
        self.scanline
    }

    /// Number of frames completed since power-on.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn odd_frame(&self) -> bool {
        self.odd_frame
    }

    pub fn vblank(&self) -> bool {
        self.vblank.active()
    }

    /// Returns and clears the vblank rising-edge latch.
    pub fn take_vblank_edge(&mut self) -> bool {
        core::mem::take(&mut self.vblank.edge)
    }

    /// Whether an interrupt request is waiting for the consumer.
    pub fn nmi_pending(&self) -> bool {
        self.vblank.nmi_pending
    }

    /// Called by the interrupt consumer once the request has been serviced.
    pub fn acknowledge_nmi(&mut self) {
        self.vblank.nmi_pending = false;
    }

    pub fn status(&self) -> Status {
        self.vblank.status
    }

    /// Lets a sprite unit raise sprite 0 hit / overflow. Both are cleared on
    /// the pre-render line.
    pub fn set_sprite_flags(&mut self, zero_hit: bool, overflow: bool) {
        self.vblank.status.set(Status::SPRITE_ZERO_HIT, zero_hit);
        self.vblank.status.set(Status::SPRITE_OVERFLOW, overflow);
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    pub fn idle_counter(&self) -> u16 {
        self.idle_counter
    }

    /// Overrides the fetch stall counter, e.g. to delay fetching by a tick.
    pub fn set_idle_counter(&mut self, value: u16) {
        self.idle_counter = value;
    }

    pub fn vram_addr(&self) -> VramAddr {
        self.v
    }

    /// Commits a new live address, as the second `$2006` write does.
    pub fn set_vram_addr(&mut self, addr: VramAddr) {
        self.v = addr;
    }

    pub fn scroll_latch(&self) -> &ScrollLatch {
        &self.scroll
    }

    pub fn scroll_latch_mut(&mut self) -> &mut ScrollLatch {
        &mut self.scroll
    }

    pub fn fetcher(&self) -> &BgFetcher {
        &self.fetcher
    }

    pub fn save_state(&self) -> PpuState {
        let latches = self.fetcher.latches();
        PpuState {
            dot: self.dot,
            scanline: self.scanline,
            frame: self.frame,
            odd_frame: self.odd_frame,
            status: self.vblank.status.bits(),
            nmi_pending: self.vblank.nmi_pending,
            vblank_edge: self.vblank.edge,
            scroll: ScrollState {
                v: self.v.raw(),
                t: self.scroll.t.raw(),
                fine_x: self.scroll.fine_x,
                w: self.scroll.w,
                increment_dot: self.checkpoints.increment_dot,
                reload_dot: self.checkpoints.reload_dot,
            },
            fetch: FetchState {
                stage: self.fetcher.stage() as u8,
                nametable: latches.nametable,
                attribute: latches.attribute,
                pattern_low: latches.pattern_low,
                pattern_high: latches.pattern_high,
                pattern_addr: latches.pattern_addr,
                idle_counter: self.idle_counter,
            },
            background: BgPipelineState {
                pattern: [self.background.pattern[0].0, self.background.pattern[1].0],
                attribute: self.background.attribute,
            },
        }
    }

    /// Restores a snapshot taken by [`save_state`](Self::save_state).
    ///
    /// The current state is left untouched when the snapshot is rejected.
    pub fn load_state(&mut self, state: &PpuState) -> Result<(), Error> {
        check_range("dot", state.dot, LAST_DOT)?;
        check_range("scanline", state.scanline, SCANLINES_PER_FRAME - 1)?;
        check_range("fine_x", state.scroll.fine_x.into(), 7)?;
        let stage = FetchStage::try_from(state.fetch.stage)?;

        self.dot = state.dot;
        self.scanline = state.scanline;
        self.frame = state.frame;
        self.odd_frame = state.odd_frame;
        self.vblank = VBlank {
            status: Status::from_bits_truncate(state.status),
            nmi_pending: state.nmi_pending,
            edge: state.vblank_edge,
        };
        self.v = VramAddr::from(state.scroll.v);
        self.scroll = ScrollLatch {
            t: VramAddr::from(state.scroll.t),
            fine_x: state.scroll.fine_x,
            w: state.scroll.w,
        };
        self.checkpoints = ScrollCheckpoints {
            increment_dot: state.scroll.increment_dot,
            reload_dot: state.scroll.reload_dot,
        };
        self.fetcher = BgFetcher {
            stage,
            latches: FetchLatches {
                nametable: state.fetch.nametable,
                attribute: state.fetch.attribute,
                pattern_low: state.fetch.pattern_low,
                pattern_high: state.fetch.pattern_high,
                pattern_addr: state.fetch.pattern_addr,
            },
        };
        self.idle_counter = state.fetch.idle_counter;
        self.background = BgPipeline {
            pattern: [
                Shift16(state.background.pattern[0]),
                Shift16(state.background.pattern[1]),
            ],
            attribute: state.background.attribute,
        };
        Ok(())
    }
}

fn check_range(field: &'static str, value: u16, max: u16) -> Result<(), Error> {
    if value > max {
        return Err(Error::InvalidState {
            field,
            value: value.into(),
        });
    }
    Ok(())
}
