//! Live address (`v`) updates driven by the dot counter.
//!
//! Rendering walks `v` across the nametables: coarse X steps every 8 dots,
//! Y steps once per line at dot 256, and the scroll values latched in `t` are
//! copied back in at dot 257 (horizontal) and on the pre-render line
//! (vertical).

use super::registers::VramAddr;
use crate::memory::timing::PRE_RENDER_SCANLINE;

/// Dot at which Y is incremented.
pub(crate) const Y_INCREMENT_DOT: u16 = 256;
/// Dot at which the horizontal fields are reloaded from `t`.
pub(crate) const HORIZONTAL_COPY_DOT: u16 = 257;
/// Inclusive window of the pre-render line that reloads the vertical fields.
pub(crate) const VERTICAL_COPY_DOTS: core::ops::RangeInclusive<u16> = 280..=304;

/// First coarse X increment of a line.
const FIRST_INCREMENT_DOT: u16 = 8;
/// First shifter reload of a line.
const FIRST_RELOAD_DOT: u16 = 9;
/// First coarse X increment of the prefetch for the next line.
const PREFETCH_INCREMENT_DOT: u16 = 328;
/// First shifter reload of the prefetch for the next line.
const PREFETCH_RELOAD_DOT: u16 = 329;
/// Coarse X increments between these dots are suppressed.
const HBLANK_DOTS: core::ops::RangeInclusive<u16> = 257..=327;

/// Nametables are 30 tiles tall; row 29 is the last one holding tiles.
const LAST_TILE_ROW: u8 = 29;
/// Largest value coarse Y can hold.
const COARSE_Y_MAX: u8 = 31;
const COARSE_X_MAX: u8 = 31;
const FINE_Y_MAX: u8 = 7;

/// Increments coarse X, wrapping into the horizontally adjacent nametable.
pub fn increment_coarse_x(v: &mut VramAddr) {
    if v.coarse_x() == COARSE_X_MAX {
        v.set_coarse_x(0);
        v.toggle_horizontal_nametable();
    } else {
        v.set_coarse_x(v.coarse_x() + 1);
    }
}

/// Increments coarse Y once fine Y overflows.
///
/// Row 29 wraps into the vertically adjacent nametable. Row 31 (only
/// reachable through an out-of-range scroll write) wraps to 0 inside the
/// same nametable, after rendering attribute bytes as tiles.
pub fn increment_coarse_y(v: &mut VramAddr) {
    match v.coarse_y() {
        LAST_TILE_ROW => {
            v.set_coarse_y(0);
            v.toggle_vertical_nametable();
        }
        COARSE_Y_MAX => v.set_coarse_y(0),
        cy => v.set_coarse_y(cy + 1),
    }
}

/// Dot 256 Y increment: fine Y first, coarse Y on overflow.
pub fn increment_y(v: &mut VramAddr) {
    if v.fine_y() < FINE_Y_MAX {
        v.set_fine_y(v.fine_y() + 1);
    } else {
        v.set_fine_y(0);
        increment_coarse_y(v);
    }
}

/// Movable checkpoints for the 8-dot cadence of coarse X increments and
/// shifter reloads.
///
/// Both restart at 257 for the next-line prefetch and again at 336/337 for
/// the visible span of the following line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ScrollCheckpoints {
    pub(crate) increment_dot: u16,
    pub(crate) reload_dot: u16,
}

impl Default for ScrollCheckpoints {
    fn default() -> Self {
        Self {
            increment_dot: FIRST_INCREMENT_DOT,
            reload_dot: FIRST_RELOAD_DOT,
        }
    }
}

impl ScrollCheckpoints {
    /// Called once the shifters have been reloaded at `reload_dot`.
    pub(crate) fn advance_reload(&mut self) {
        self.reload_dot += 8;
    }

    /// Applies the `v` updates due at `dot` of a rendering line.
    pub(crate) fn step(&mut self, dot: u16, scanline: u16, v: &mut VramAddr, t: VramAddr) {
        if dot == Y_INCREMENT_DOT {
            increment_y(v);
        }

        if dot == HORIZONTAL_COPY_DOT {
            v.copy_horizontal(t);
            self.increment_dot = PREFETCH_INCREMENT_DOT;
            self.reload_dot = PREFETCH_RELOAD_DOT;
        } else if VERTICAL_COPY_DOTS.contains(&dot) {
            if scanline == PRE_RENDER_SCANLINE {
                v.copy_vertical(t);
            }
        } else if !HBLANK_DOTS.contains(&dot) {
            if dot == self.increment_dot {
                increment_coarse_x(v);
                self.increment_dot += 8;
            }

            match dot {
                336 => self.increment_dot = FIRST_INCREMENT_DOT,
                337 => self.reload_dot = FIRST_RELOAD_DOT,
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn addr(cx: u8, cy: u8, nt: u8, fy: u8) -> VramAddr {
        let mut v = VramAddr::default();
        v.set_coarse_x(cx);
        v.set_coarse_y(cy);
        v.set_nametable(nt);
        v.set_fine_y(fy);
        v
    }

    #[test]
    fn coarse_y_29_switches_vertical_nametable() {
        let mut v = addr(3, 29, 0b00, 7);
        increment_y(&mut v);
        assert_eq!((v.coarse_y(), v.fine_y(), v.nametable()), (0, 0, 0b10));
    }

    #[test]
    fn coarse_y_31_wraps_without_switching() {
        let mut v = addr(3, 31, 0b01, 7);
        increment_y(&mut v);
        assert_eq!((v.coarse_y(), v.fine_y(), v.nametable()), (0, 0, 0b01));
    }

    #[test]
    fn coarse_x_31_switches_horizontal_nametable() {
        let mut v = addr(31, 4, 0b10, 2);
        increment_coarse_x(&mut v);
        assert_eq!((v.coarse_x(), v.nametable()), (0, 0b11));
        assert_eq!((v.coarse_y(), v.fine_y()), (4, 2));
    }

    proptest! {
        #[test]
        fn coarse_y_increment(cy in 0u8..32, nt in 0u8..4, cx in 0u8..32) {
            let mut v = addr(cx, cy, nt, 7);
            increment_y(&mut v);
            let (expected_cy, expected_nt) = match cy {
                29 => (0, nt ^ 0b10),
                31 => (0, nt),
                _ => (cy + 1, nt),
            };
            prop_assert_eq!(v.coarse_y(), expected_cy);
            prop_assert_eq!(v.nametable(), expected_nt);
            prop_assert_eq!(v.fine_y(), 0);
            prop_assert_eq!(v.coarse_x(), cx);
        }

        #[test]
        fn fine_y_below_seven_only_touches_fine_y(fy in 0u8..7, cy in 0u8..32, nt in 0u8..4) {
            let mut v = addr(0, cy, nt, fy);
            increment_y(&mut v);
            prop_assert_eq!(v.fine_y(), fy + 1);
            prop_assert_eq!(v.coarse_y(), cy);
            prop_assert_eq!(v.nametable(), nt);
        }

        #[test]
        fn coarse_x_increment(cx in 0u8..32, nt in 0u8..4, cy in 0u8..32) {
            let mut v = addr(cx, cy, nt, 1);
            increment_coarse_x(&mut v);
            if cx == 31 {
                prop_assert_eq!(v.coarse_x(), 0);
                prop_assert_eq!(v.nametable(), nt ^ 0b01);
            } else {
                prop_assert_eq!(v.coarse_x(), cx + 1);
                prop_assert_eq!(v.nametable(), nt);
            }
        }

        #[test]
        fn horizontal_copy_is_idempotent(v_raw in 0u16..0x8000, t_raw in 0u16..0x8000) {
            let t = VramAddr::from(t_raw);
            let mut once = VramAddr::from(v_raw);
            let mut checkpoints = ScrollCheckpoints::default();
            checkpoints.step(HORIZONTAL_COPY_DOT, 0, &mut once, t);
            let mut twice = once;
            checkpoints.step(HORIZONTAL_COPY_DOT, 0, &mut twice, t);
            prop_assert_eq!(once, twice);
            prop_assert_eq!(once.coarse_x(), t.coarse_x());
            prop_assert_eq!(once.nametable() & 1, t.nametable() & 1);
            prop_assert_eq!(once.coarse_y(), VramAddr::from(v_raw).coarse_y());
        }
    }

    #[test]
    fn visible_line_walks_coarse_x_and_resets_checkpoints() {
        let t = addr(5, 0, 0, 0);
        let mut v = addr(0, 0, 0, 0);
        let mut checkpoints = ScrollCheckpoints::default();
        for dot in 0..=340 {
            checkpoints.step(dot, 10, &mut v, t);
            if dot == 255 {
                // 8, 16, .., 248 => 31 increments.
                assert_eq!(v.coarse_x(), 31);
            }
        }
        // 256 wraps X into nametable 1, 257 restores X from t, then the
        // prefetch at 328 and 336 adds two more.
        assert_eq!(v.coarse_x(), 7);
        assert_eq!(v.nametable(), 0);
        assert_eq!(v.fine_y(), 1);
        assert_eq!(checkpoints, ScrollCheckpoints::default());
    }

    #[test]
    fn vertical_copy_only_on_pre_render_line() {
        let t = addr(0, 12, 0b10, 6);
        let mut v = addr(9, 3, 0b01, 2);
        let mut checkpoints = ScrollCheckpoints::default();
        checkpoints.step(290, 100, &mut v, t);
        assert_eq!((v.coarse_y(), v.fine_y()), (3, 2));

        checkpoints.step(290, PRE_RENDER_SCANLINE, &mut v, t);
        assert_eq!((v.coarse_y(), v.fine_y(), v.nametable()), (12, 6, 0b11));
        assert_eq!(v.coarse_x(), 9);
    }

    #[test]
    fn dot_257_moves_checkpoints_to_prefetch() {
        let mut checkpoints = ScrollCheckpoints::default();
        let mut v = VramAddr::default();
        checkpoints.step(HORIZONTAL_COPY_DOT, 0, &mut v, VramAddr::default());
        assert_eq!(checkpoints.increment_dot, 328);
        assert_eq!(checkpoints.reload_dot, 329);
    }
}
