//! Background fetch sequencer.
//!
//! Each tile costs four memory fetches (nametable, attribute, pattern low,
//! pattern high). On hardware every fetch spans two dots; here each dispatch
//! performs one fetch and charges one idle tick, so a full tile still takes
//! eight dots.
//!
//! Fetching is split in two: [`BgFetcher::plan`] decides what the current dot
//! does from the sequencer state alone, and [`BgFetcher::apply`] performs the
//! memory access and updates the latches.

use core::ops::RangeInclusive;

use super::registers::{Control, VramAddr};
use crate::{
    bus::VideoBus,
    error::Error,
    memory::vram::{
        ADDRESS_MASK, ATTRIBUTE_BASE, NAMETABLE_BASE, NAMETABLE_OFFSET_MASK, PATTERN_PLANE_STRIDE,
    },
};

/// Dots of a line on which tile fetches run: the visible span and the
/// two-tile prefetch for the next line.
const FETCH_DOTS: [RangeInclusive<u16>; 2] = [1..=256, 321..=336];

/// Dot at which a visible line stops fetching for the sprite window.
pub(crate) const SPRITE_WINDOW_DOT: u16 = 257;
/// Ticks spent idle in place of sprite evaluation/fetches (dots 258-320).
pub(crate) const SPRITE_WINDOW_IDLE: u16 = 63;
/// Ticks spent idle on the post-render line (one line plus one dot).
pub(crate) const POST_RENDER_IDLE: u16 = 340;

/// Position in the four-fetch tile cycle.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FetchStage {
    #[default]
    Nametable = 0,
    Attribute = 1,
    PatternLow = 2,
    PatternHigh = 3,
}

impl FetchStage {
    pub fn next(self) -> Self {
        match self {
            FetchStage::Nametable => FetchStage::Attribute,
            FetchStage::Attribute => FetchStage::PatternLow,
            FetchStage::PatternLow => FetchStage::PatternHigh,
            FetchStage::PatternHigh => FetchStage::Nametable,
        }
    }
}

impl TryFrom<u8> for FetchStage {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => FetchStage::Nametable,
            1 => FetchStage::Attribute,
            2 => FetchStage::PatternLow,
            3 => FetchStage::PatternHigh,
            other => {
                return Err(Error::InvalidState {
                    field: "fetch_stage",
                    value: other.into(),
                });
            }
        })
    }
}

/// Which fetch variant a line uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Visible,
    PreRender,
}

/// How a fetch reaches memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadPath {
    /// Through [`VideoBus::read_vram`].
    Bus,
    /// Straight out of [`VideoBus::vram`].
    Raw,
}

/// What one dispatch of the sequencer does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchAction {
    Nametable { addr: u16 },
    Attribute { addr: u16 },
    PatternLow { addr: u16 },
    /// `store` records `addr` as the new pattern address.
    PatternHigh { addr: u16, path: ReadPath, store: bool },
    /// Nametable read outside the fetch windows; the stage does not advance.
    DummyNametable { addr: u16 },
    /// No access; the sequencer sleeps for the given number of ticks.
    Stall(u16),
}

/// Nametable byte address for the tile `v` points at.
#[inline]
pub fn nametable_addr(v: VramAddr) -> u16 {
    NAMETABLE_BASE | (v.raw() & NAMETABLE_OFFSET_MASK)
}

/// Attribute byte address covering the tile `v` points at.
#[inline]
pub fn attribute_addr(v: VramAddr) -> u16 {
    let v = v.raw();
    ATTRIBUTE_BASE | (v & 0x0C00) | ((v >> 4) & 0x38) | ((v >> 2) & 0x07)
}

/// Low-plane pattern address of tile `tile` at fine Y of `v`.
#[inline]
pub fn pattern_addr(control: Control, tile: u8, v: VramAddr) -> u16 {
    control.background_pattern_table() | (u16::from(tile) << 4) | u16::from(v.fine_y())
}

/// Bytes produced by the most recent fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FetchLatches {
    pub nametable: u8,
    pub attribute: u8,
    pub pattern_low: u8,
    pub pattern_high: u8,
    /// Last pattern address used by the sequencer.
    pub pattern_addr: u16,
}

/// Sequencer state plus its latches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BgFetcher {
    pub(crate) stage: FetchStage,
    pub(crate) latches: FetchLatches,
}

impl BgFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> FetchStage {
        self.stage
    }

    pub fn latches(&self) -> &FetchLatches {
        &self.latches
    }

    /// Decides the action of a dispatch at `dot` without touching memory.
    pub fn plan(&self, dot: u16, line: LineKind, v: VramAddr, control: Control) -> FetchAction {
        if line == LineKind::Visible && dot == SPRITE_WINDOW_DOT {
            return FetchAction::Stall(SPRITE_WINDOW_IDLE);
        }

        if !FETCH_DOTS.iter().any(|range| range.contains(&dot)) {
            return FetchAction::DummyNametable {
                addr: nametable_addr(v),
            };
        }

        match self.stage {
            FetchStage::Nametable => FetchAction::Nametable {
                addr: nametable_addr(v),
            },
            FetchStage::Attribute => FetchAction::Attribute {
                addr: attribute_addr(v),
            },
            FetchStage::PatternLow => FetchAction::PatternLow {
                addr: pattern_addr(control, self.latches.nametable, v),
            },
            FetchStage::PatternHigh => {
                let addr = self.latches.pattern_addr.wrapping_add(PATTERN_PLANE_STRIDE);
                match line {
                    LineKind::Visible => FetchAction::PatternHigh {
                        addr,
                        path: ReadPath::Bus,
                        store: true,
                    },
                    // Reuses the low-plane address as-is instead of
                    // advancing it.
                    LineKind::PreRender => FetchAction::PatternHigh {
                        addr,
                        path: ReadPath::Raw,
                        store: false,
                    },
                }
            }
        }
    }

    /// Performs `action` against `bus` and returns the idle ticks it costs.
    pub fn apply<B: VideoBus>(
        &mut self,
        action: FetchAction,
        bus: &mut B,
    ) -> Result<u16, B::Error> {
        match action {
            FetchAction::Nametable { addr } => {
                self.latches.nametable = bus.read_vram(addr)?;
            }
            FetchAction::Attribute { addr } => {
                self.latches.attribute = raw_read(bus, addr);
            }
            FetchAction::PatternLow { addr } => {
                self.latches.pattern_low = bus.read_vram(addr)?;
                self.latches.pattern_addr = addr;
            }
            FetchAction::PatternHigh { addr, path, store } => {
                self.latches.pattern_high = match path {
                    ReadPath::Bus => bus.read_vram(addr)?,
                    ReadPath::Raw => raw_read(bus, addr),
                };
                if store {
                    self.latches.pattern_addr = addr;
                }
            }
            FetchAction::DummyNametable { addr } => {
                self.latches.nametable = bus.read_vram(addr)?;
                return Ok(1);
            }
            FetchAction::Stall(ticks) => return Ok(ticks),
        }
        self.stage = self.stage.next();
        Ok(1)
    }

    /// Plans and applies the dispatch for `dot`.
    pub fn dispatch<B: VideoBus>(
        &mut self,
        dot: u16,
        line: LineKind,
        v: VramAddr,
        control: Control,
        bus: &mut B,
    ) -> Result<u16, B::Error> {
        let action = self.plan(dot, line, v, control);
        self.apply(action, bus)
    }
}

#[inline]
fn raw_read<B: VideoBus>(bus: &B, addr: u16) -> u8 {
    bus.vram()[(addr & ADDRESS_MASK) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{FlatVideoBus, mock::MockBus};

    #[test]
    fn address_formulas() {
        let v = VramAddr::from(0x3000 | 0x0C00 | (17 << 5) | 9);
        assert_eq!(nametable_addr(v), 0x2000 | 0x0C00 | (17 << 5) | 9);
        // Attribute row 17 / 4 = 4, column 9 / 4 = 2.
        assert_eq!(attribute_addr(v), 0x23C0 | 0x0C00 | (4 << 3) | 2);
        assert_eq!(
            pattern_addr(Control::BACKGROUND_TABLE, 0xAB, v),
            0x1000 | 0x0AB0 | 3
        );
        assert_eq!(pattern_addr(Control::empty(), 0xAB, v), 0x0AB3);
    }

    #[test]
    fn visible_cycle_advances_one_stage_per_dispatch() {
        let mut bus = FlatVideoBus::new();
        bus.write(0x2000, 0x42);
        bus.write_raw(0x23C0, 0xE4);
        bus.write(0x0420, 0x11);
        bus.write(0x0428, 0x22);

        let mut fetcher = BgFetcher::new();
        let v = VramAddr::default();
        let control = Control::empty();
        let mut stages = Vec::new();
        for dot in [1, 3, 5, 7] {
            stages.push(fetcher.stage());
            let idle = fetcher
                .dispatch(dot, LineKind::Visible, v, control, &mut bus)
                .unwrap();
            assert_eq!(idle, 1);
        }
        assert_eq!(
            stages,
            [
                FetchStage::Nametable,
                FetchStage::Attribute,
                FetchStage::PatternLow,
                FetchStage::PatternHigh
            ]
        );
        assert_eq!(fetcher.stage(), FetchStage::Nametable);
        let latches = fetcher.latches();
        assert_eq!(latches.nametable, 0x42);
        assert_eq!(latches.attribute, 0xE4);
        assert_eq!(latches.pattern_low, 0x11);
        assert_eq!(latches.pattern_high, 0x22);
        assert_eq!(latches.pattern_addr, 0x0428);
    }

    #[test]
    fn dot_257_stalls_visible_lines_only() {
        let fetcher = BgFetcher::new();
        let v = VramAddr::default();
        assert_eq!(
            fetcher.plan(257, LineKind::Visible, v, Control::empty()),
            FetchAction::Stall(63)
        );
        assert_eq!(
            fetcher.plan(257, LineKind::PreRender, v, Control::empty()),
            FetchAction::DummyNametable { addr: 0x2000 }
        );
    }

    #[test]
    fn outside_fetch_windows_only_nametable_is_read() {
        let mut fetcher = BgFetcher {
            stage: FetchStage::PatternLow,
            ..BgFetcher::default()
        };
        let v = VramAddr::from(0x0123);
        for dot in [0, 258, 320, 337, 340] {
            assert_eq!(
                fetcher.plan(dot, LineKind::Visible, v, Control::empty()),
                FetchAction::DummyNametable { addr: 0x2123 }
            );
        }
        let mut bus = FlatVideoBus::new();
        fetcher
            .dispatch(338, LineKind::Visible, v, Control::empty(), &mut bus)
            .unwrap();
        assert_eq!(fetcher.stage(), FetchStage::PatternLow);
    }

    #[test]
    fn attribute_and_pre_render_high_bypass_the_bus() {
        let mut bus = MockBus::default();
        bus.inner.write_raw(0x23C0, 0x55);
        bus.inner.write_raw(0x1008, 0x99);
        let mut fetcher = BgFetcher::new();
        let control = Control::BACKGROUND_TABLE;
        let v = VramAddr::default();
        for dot in [321, 323, 325, 327] {
            fetcher
                .dispatch(dot, LineKind::PreRender, v, control, &mut bus)
                .unwrap();
        }
        assert_eq!(bus.reads, [0x2000, 0x1000]);
        assert_eq!(fetcher.latches().attribute, 0x55);
        assert_eq!(fetcher.latches().pattern_high, 0x99);
        assert_eq!(fetcher.latches().pattern_addr, 0x1000);
    }

    #[test]
    fn visible_high_fetch_goes_through_the_bus() {
        let mut bus = MockBus::default();
        let mut fetcher = BgFetcher::new();
        for dot in [1, 3, 5, 7] {
            fetcher
                .dispatch(
                    dot,
                    LineKind::Visible,
                    VramAddr::default(),
                    Control::empty(),
                    &mut bus,
                )
                .unwrap();
        }
        assert_eq!(bus.reads, [0x2000, 0x0000, 0x0008]);
    }

    #[test]
    fn bus_errors_surface_unchanged() {
        let mut bus = MockBus {
            fail_at: Some(0x2000),
            ..MockBus::default()
        };
        let mut fetcher = BgFetcher::new();
        let err = fetcher
            .dispatch(
                1,
                LineKind::Visible,
                VramAddr::default(),
                Control::empty(),
                &mut bus,
            )
            .unwrap_err();
        assert_eq!(err.addr, 0x2000);
        assert_eq!(fetcher.stage(), FetchStage::Nametable);
    }

    #[test]
    fn stage_tags_round_trip() {
        for stage in [
            FetchStage::Nametable,
            FetchStage::Attribute,
            FetchStage::PatternLow,
            FetchStage::PatternHigh,
        ] {
            assert_eq!(FetchStage::try_from(stage as u8).unwrap(), stage);
        }
        assert!(FetchStage::try_from(4).is_err());
    }
}
