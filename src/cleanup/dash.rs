//! Line dash patterns (ISO 32000-1, 8.4.3.6).
//!
//! A dash pattern is a dash array of alternating dash and gap lengths plus a
//! phase, the distance into the pattern at which stroking starts.
//! [`DashCursor`] walks the array circularly and yields the successive
//! dash/gap elements for one stroke.

use crate::core::config::MIN_DASH_CYCLE_LENGTH;
use crate::geometry::DashArray;

/// A dash pattern as found in the graphics state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashPattern {
    array: DashArray,
    phase: f64,
}

impl DashPattern {
    pub fn new(array: impl IntoIterator<Item = f64>, phase: f64) -> Self {
        DashPattern {
            array: array.into_iter().collect(),
            phase,
        }
    }

    /// Lengths of alternating dashes and gaps, in user space units.
    pub fn array(&self) -> &[f64] {
        &self.array
    }

    /// Distance into the pattern at which to start the dash.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Whether stroking with this pattern paints the whole path.
    ///
    /// True when the array has even length and every gap (odd position) is
    /// zero, e.g. `[3 0 4 0]`. `[3 0 4 1]` and `[3 2]` are not solid.
    pub fn is_solid(&self) -> bool {
        if self.array.len() % 2 != 0 {
            return false;
        }

        let units_off: f64 = self.array.iter().skip(1).step_by(2).sum();
        units_off == 0.0
    }

    /// Total length of one pass over the array.
    pub fn cycle_length(&self) -> f64 {
        self.array.iter().sum()
    }

    /// Start walking the pattern.
    pub fn cursor(&self) -> DashCursor<'_> {
        DashCursor::new(self)
    }
}

/// One dash or gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashArrayElem {
    pub length: f64,
    pub is_gap: bool,
}

/// Circular iterator over a dash pattern.
///
/// The cursor borrows its pattern and is meant to live for a single stroke.
/// With an empty dash array it yields nothing; with a non-empty one it never
/// ends.
#[derive(Debug, Clone)]
pub struct DashCursor<'a> {
    pattern: &'a DashPattern,
    /// Array slot of `current`, always within `0..len` for a non-empty array
    index: usize,
    /// 1-based ordinal of `current`; even ordinals are gaps
    ordinal: u64,
    current: Option<DashArrayElem>,
}

fn is_gap_ordinal(ordinal: u64) -> bool {
    ordinal % 2 == 0
}

impl<'a> DashCursor<'a> {
    pub fn new(pattern: &'a DashPattern) -> Self {
        let mut cursor = DashCursor {
            pattern,
            index: 0,
            ordinal: 1,
            current: None,
        };
        cursor.skip_to_phase();
        cursor
    }

    /// Restart from the phase, as a freshly constructed cursor would.
    pub fn reset(&mut self) {
        self.index = 0;
        self.ordinal = 1;
        self.current = None;
        self.skip_to_phase();
    }

    pub fn pattern(&self) -> &'a DashPattern {
        self.pattern
    }

    /// Element that the next call to `next` returns.
    pub fn peek(&self) -> Option<DashArrayElem> {
        self.current
    }

    fn skip_to_phase(&mut self) {
        let array = self.pattern.array();
        let len = array.len();
        if len == 0 {
            return;
        }

        // A vanishing cycle never consumes the phase
        let cycle = self.pattern.cycle_length();
        if !(cycle >= MIN_DASH_CYCLE_LENGTH) {
            self.current = Some(DashArrayElem {
                length: array[0],
                is_gap: false,
            });
            return;
        }

        // Odd arrays swap dash and gap on every pass, so parity repeats
        // only after two passes
        let period = if len % 2 == 0 { cycle } else { 2.0 * cycle };
        let mut phase = self.pattern.phase() % period;
        while phase > 0.0 {
            phase -= array[self.index];
            self.index = (self.index + 1) % len;
            self.ordinal += 1;
        }

        if phase < 0.0 {
            // The last consumed element is only partially used up
            self.ordinal -= 1;
            self.index = (self.index + len - 1) % len;
            self.current = Some(DashArrayElem {
                length: -phase,
                is_gap: is_gap_ordinal(self.ordinal),
            });
        } else {
            self.current = Some(DashArrayElem {
                length: array[self.index],
                is_gap: is_gap_ordinal(self.ordinal),
            });
        }
    }
}

impl Iterator for DashCursor<'_> {
    type Item = DashArrayElem;

    fn next(&mut self) -> Option<DashArrayElem> {
        let ret = self.current;
        let array = self.pattern.array();

        if !array.is_empty() {
            self.index = (self.index + 1) % array.len();
            self.ordinal += 1;
            self.current = Some(DashArrayElem {
                length: array[self.index],
                is_gap: is_gap_ordinal(self.ordinal),
            });
        }

        ret
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elem(length: f64, is_gap: bool) -> DashArrayElem {
        DashArrayElem { length, is_gap }
    }

    #[test]
    fn test_is_solid() {
        assert!(DashPattern::new([3.0, 0.0, 4.0, 0.0], 0.0).is_solid());
        assert!(!DashPattern::new([3.0, 0.0, 4.0, 1.0], 0.0).is_solid());
        assert!(!DashPattern::new([3.0, 2.0], 0.0).is_solid());
        assert!(!DashPattern::new([3.0], 0.0).is_solid());
        assert!(DashPattern::new([], 0.0).is_solid());
    }

    #[test]
    fn test_cursor_cycles_without_phase() {
        let pattern = DashPattern::new([3.0, 2.0], 0.0);
        let elems: Vec<_> = pattern.cursor().take(5).collect();
        assert_eq!(
            elems,
            vec![
                elem(3.0, false),
                elem(2.0, true),
                elem(3.0, false),
                elem(2.0, true),
                elem(3.0, false),
            ]
        );
    }

    #[test]
    fn test_cursor_partial_phase() {
        // Phase 4 consumes the dash of 3 and one unit of the gap of 2
        let pattern = DashPattern::new([3.0, 2.0], 4.0);
        let elems: Vec<_> = pattern.cursor().take(3).collect();
        assert_eq!(elems, vec![elem(1.0, true), elem(3.0, false), elem(2.0, true)]);
    }

    #[test]
    fn test_cursor_exact_phase() {
        // Phase 3 lands exactly on the gap boundary
        let pattern = DashPattern::new([3.0, 2.0], 3.0);
        let elems: Vec<_> = pattern.cursor().take(2).collect();
        assert_eq!(elems, vec![elem(2.0, true), elem(3.0, false)]);
    }

    #[test]
    fn test_cursor_phase_wraps_odd_array() {
        // Odd arrays swap dash and gap roles on every pass
        let pattern = DashPattern::new([2.0, 1.0, 3.0], 6.5);
        let mut cursor = pattern.cursor();
        // 6.5 = 2 + 1 + 3 + 0.5 -> half a unit into the second pass' first element
        assert_eq!(cursor.next(), Some(elem(1.5, true)));
        assert_eq!(cursor.next(), Some(elem(1.0, false)));
        assert_eq!(cursor.next(), Some(elem(3.0, true)));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let pattern = DashPattern::new([3.0, 2.0], 4.0);
        let mut cursor = pattern.cursor();
        cursor.next();
        cursor.next();
        cursor.reset();
        assert_eq!(cursor.next(), Some(elem(1.0, true)));
    }

    #[test]
    fn test_zero_cycle_ignores_phase() {
        let pattern = DashPattern::new([0.0], 1.0);
        let mut cursor = pattern.cursor();
        assert_eq!(cursor.next(), Some(elem(0.0, false)));
        assert_eq!(cursor.next(), Some(elem(0.0, true)));

        let pattern = DashPattern::new([0.0, 0.0, 0.0], 2.0);
        assert_eq!(pattern.cursor().peek(), Some(elem(0.0, false)));
    }

    #[test]
    fn test_huge_phase_is_reduced_keeping_parity() {
        // 1e12 + 4 is 4 units into a pass of [3 2], as is 4 itself
        let even = DashPattern::new([3.0, 2.0], 1e12 + 4.0);
        assert_eq!(even.cursor().peek(), Some(elem(1.0, true)));

        // Odd arrays repeat every two passes: 6.5 + 12 * 1e10 lands where
        // 6.5 does
        let odd = DashPattern::new([2.0, 1.0, 3.0], 6.5 + 12.0 * 1e10);
        let mut cursor = odd.cursor();
        assert_eq!(cursor.next(), Some(elem(1.5, true)));
        assert_eq!(cursor.next(), Some(elem(1.0, false)));
    }

    #[test]
    fn test_empty_array_yields_nothing() {
        let pattern = DashPattern::new([], 2.0);
        let mut cursor = pattern.cursor();
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.next(), None);
    }
}
