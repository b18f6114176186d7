//! Point-addressed text buffer.

use crate::kill_ring::KillRing;

/// Where to move point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Start,
    End,
    PrevChar,
    NextChar,
    Absolute(usize),
    LineStart,
    LineEnd,
}

/// A sequence of characters with an insertion point.
///
/// Every element is one `char`, so multi-byte glyphs count as one position.
/// `point` always lies in `0..=len`; every operation clamps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    chars: Vec<char>,
    point: usize,
    /// Set by `yank` to the start of the yanked text.
    mark: Option<usize>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A buffer holding `text`, with point at the end.
    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.replace_all(text);
        buffer
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn point(&self) -> usize {
        self.point
    }

    pub fn mark(&self) -> Option<usize> {
        self.mark
    }

    pub fn set_mark(&mut self, mark: Option<usize>) {
        self.mark = mark.map(|m| m.min(self.len()));
    }

    /// Insert before point and advance past the new text.
    pub fn insert_before(&mut self, text: &str) {
        let at = self.point;
        self.chars.splice(at..at, text.chars());
        self.point = at + text.chars().count();
        self.clamp_mark();
    }

    /// Delete the character before point. Returns false at the start.
    pub fn delete_backward(&mut self) -> bool {
        if self.point == 0 {
            return false;
        }
        self.point -= 1;
        self.chars.remove(self.point);
        self.clamp_mark();
        true
    }

    /// Delete the character at point. Returns false at the end.
    pub fn delete_forward(&mut self) -> bool {
        if self.point >= self.len() {
            return false;
        }
        self.chars.remove(self.point);
        self.clamp_mark();
        true
    }

    pub fn move_to(&mut self, motion: Motion) {
        self.point = match motion {
            Motion::Start => 0,
            Motion::End => self.len(),
            Motion::PrevChar => self.point.saturating_sub(1),
            Motion::NextChar => (self.point + 1).min(self.len()),
            Motion::Absolute(target) => target.min(self.len()),
            Motion::LineStart => self.bol(0),
            Motion::LineEnd => self.eol(0),
        };
    }

    /// Kill from point to the end of the buffer.
    pub fn kill_to_end(&mut self, ring: &KillRing, continuation: bool) -> String {
        let len = self.len() - self.point;
        self.kill_range(self.point, len, ring, continuation)
    }

    /// Insert the kill ring at point, leaving mark before it and point after.
    pub fn yank(&mut self, ring: &KillRing) {
        let killed = ring.contents();
        let at = self.point;
        self.chars.splice(at..at, killed.iter().copied());
        self.point = at + killed.len();
        self.mark = Some(at);
    }

    /// Replace the whole contents, leaving point at the end.
    pub fn replace_all(&mut self, text: &str) {
        self.chars = text.chars().collect();
        self.point = self.len();
        self.mark = None;
    }

    /// Replace `n` characters at `at` with `text`. Both are clamped.
    ///
    /// A point at or after `at` stays after the new text; a point inside the
    /// replaced range ends up at the end of the new text.
    pub fn splice(&mut self, at: usize, n: usize, text: &str) {
        let at = at.min(self.len());
        let removed = n.min(self.len() - at);
        let inserted: Vec<char> = text.chars().collect();
        let added = inserted.len();
        self.chars.splice(at..at + removed, inserted);
        if self.point >= at {
            self.point = self.point.max(at + removed) - removed + added;
        }
        self.clamp_mark();
    }

    /// Remove `len` characters starting at `start` into the kill ring.
    ///
    /// An empty range changes nothing, the ring included.
    pub fn kill_range(
        &mut self,
        start: usize,
        len: usize,
        ring: &KillRing,
        continuation: bool,
    ) -> String {
        let start = start.min(self.len());
        let end = start.saturating_add(len).min(self.len());
        if start == end {
            return String::new();
        }
        let killed: Vec<char> = self.chars.drain(start..end).collect();
        ring.kill(&killed, continuation);
        if self.point > start {
            self.point = start + self.point.saturating_sub(end);
        }
        self.clamp_mark();
        killed.into_iter().collect()
    }

    /// Start of the line containing `pos`.
    pub fn line_start(&self, pos: usize) -> usize {
        let pos = pos.min(self.len());
        self.chars[..pos]
            .iter()
            .rposition(|&c| c == '\n')
            .map_or(0, |nl| nl + 1)
    }

    /// End of the line containing `pos`: its newline, or the buffer end.
    pub fn line_end(&self, pos: usize) -> usize {
        let pos = pos.min(self.len());
        self.chars[pos..]
            .iter()
            .position(|&c| c == '\n')
            .map_or(self.len(), |nl| pos + nl)
    }

    /// Start of the line `n` lines above point (`0` is the current line).
    pub fn bol(&self, n: usize) -> usize {
        let mut bol = self.line_start(self.point);
        for _ in 0..n {
            if bol == 0 {
                break;
            }
            bol = self.line_start(bol - 1);
        }
        bol
    }

    /// End of the line `n` lines below point (`0` is the current line).
    pub fn eol(&self, n: usize) -> usize {
        let mut eol = self.line_end(self.point);
        for _ in 0..n {
            if eol >= self.len() {
                break;
            }
            eol = self.line_end(eol + 1);
        }
        eol
    }

    /// Newlines between `p0` and `p1`, negative when `p0 > p1`.
    pub fn count_lines(&self, p0: usize, p1: usize) -> isize {
        let count = self.newlines_between(p0, p1).len() as isize;
        if p0 > p1 {
            -count
        } else {
            count
        }
    }

    /// Positions of the newlines between `p0` and `p1`, in buffer order.
    pub fn newlines_between(&self, p0: usize, p1: usize) -> Vec<usize> {
        let lo = p0.min(p1).min(self.len());
        let hi = p0.max(p1).min(self.len());
        (lo..hi).filter(|&i| self.chars[i] == '\n').collect()
    }

    /// Distance from the start of the current line to point.
    pub fn column(&self) -> usize {
        self.point - self.bol(0)
    }

    fn clamp_mark(&mut self) {
        if let Some(mark) = self.mark {
            self.mark = Some(mark.min(self.len()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_insert_and_delete() {
        let mut buffer = TextBuffer::new();
        buffer.insert_before("héllo");
        assert_eq!(buffer.point(), 5);
        buffer.move_to(Motion::Absolute(1));
        assert!(buffer.delete_forward());
        assert_eq!(buffer.text(), "hllo");
        assert!(buffer.delete_backward());
        assert_eq!((buffer.text().as_str(), buffer.point()), ("llo", 0));
        assert!(!buffer.delete_backward());

        buffer.move_to(Motion::End);
        assert!(!buffer.delete_forward());
    }

    #[test]
    fn test_motion_clamps() {
        let mut buffer = TextBuffer::from_text("abc");
        buffer.move_to(Motion::NextChar);
        assert_eq!(buffer.point(), 3);
        buffer.move_to(Motion::Absolute(99));
        assert_eq!(buffer.point(), 3);
        buffer.move_to(Motion::Start);
        buffer.move_to(Motion::PrevChar);
        assert_eq!(buffer.point(), 0);
    }

    #[test]
    fn test_kill_then_yank_restores() {
        let ring = KillRing::new();
        let mut buffer = TextBuffer::from_text("hello world");
        buffer.move_to(Motion::Absolute(5));

        assert_eq!(buffer.kill_to_end(&ring, false), " world");
        assert_eq!(buffer.text(), "hello");
        buffer.yank(&ring);
        assert_eq!(buffer.text(), "hello world");
        assert_eq!(buffer.mark(), Some(5));
        assert_eq!(buffer.point(), 11);
    }

    #[test]
    fn test_kill_at_end_keeps_ring() {
        let ring = KillRing::new();
        ring.kill(&['x'], false);
        let mut buffer = TextBuffer::from_text("abc");
        assert_eq!(buffer.kill_to_end(&ring, false), "");
        assert_eq!(ring.text(), "x");
    }

    #[test]
    fn test_kill_range_moves_point() {
        let ring = KillRing::new();
        let mut buffer = TextBuffer::from_text("abcdef");
        buffer.kill_range(1, 2, &ring, false);
        assert_eq!((buffer.text().as_str(), buffer.point()), ("adef", 4));

        buffer.move_to(Motion::Absolute(2));
        buffer.kill_range(1, 10, &ring, true);
        assert_eq!((buffer.text().as_str(), buffer.point()), ("a", 1));
        assert_eq!(ring.text(), "bcdef");
    }

    #[test]
    fn test_splice_adjusts_point() {
        let mut buffer = TextBuffer::from_text("abcdef");
        buffer.move_to(Motion::Absolute(4));
        buffer.splice(1, 2, "XYZ");
        assert_eq!((buffer.text().as_str(), buffer.point()), ("aXYZdef", 5));

        buffer.move_to(Motion::Absolute(1));
        buffer.splice(5, 0, "!");
        assert_eq!((buffer.text().as_str(), buffer.point()), ("aXYZd!ef", 1));

        buffer.splice(1, 0, "<");
        assert_eq!(buffer.point(), 2);

        buffer.splice(100, 100, "$");
        assert_eq!(buffer.text(), "a<XYZd!ef$");
    }

    #[test]
    fn test_lines() {
        // "ab\ncde\n\nf"
        //  01 2345 6 78
        let mut buffer = TextBuffer::from_text("ab\ncde\n\nf");
        buffer.move_to(Motion::Absolute(4));
        assert_eq!(buffer.bol(0), 3);
        assert_eq!(buffer.bol(1), 0);
        assert_eq!(buffer.bol(5), 0);
        assert_eq!(buffer.eol(0), 6);
        assert_eq!(buffer.eol(1), 7);
        assert_eq!(buffer.eol(2), 9);
        assert_eq!(buffer.eol(9), 9);
        assert_eq!(buffer.column(), 1);

        assert_eq!(buffer.count_lines(0, 8), 3);
        assert_eq!(buffer.count_lines(8, 0), -3);
        assert_eq!(buffer.newlines_between(3, 9), vec![6, 7]);

        buffer.move_to(Motion::LineEnd);
        assert_eq!(buffer.point(), 6);
        buffer.move_to(Motion::LineStart);
        assert_eq!(buffer.point(), 3);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Insert(String),
        Backward,
        Forward,
        Move(Motion),
    }

    fn op() -> impl Strategy<Value = Op> {
        let motion = prop_oneof![
            Just(Motion::Start),
            Just(Motion::End),
            Just(Motion::PrevChar),
            Just(Motion::NextChar),
            Just(Motion::LineStart),
            Just(Motion::LineEnd),
            (0usize..64).prop_map(Motion::Absolute),
        ];
        prop_oneof![
            "[a-z\n é]{0,4}".prop_map(Op::Insert),
            Just(Op::Backward),
            Just(Op::Forward),
            motion.prop_map(Op::Move),
        ]
    }

    proptest! {
        #[test]
        fn prop_point_stays_in_range(ops in prop::collection::vec(op(), 0..64)) {
            let mut buffer = TextBuffer::new();
            for op in ops {
                match op {
                    Op::Insert(text) => buffer.insert_before(&text),
                    Op::Backward => { buffer.delete_backward(); }
                    Op::Forward => { buffer.delete_forward(); }
                    Op::Move(motion) => buffer.move_to(motion),
                }
                prop_assert!(buffer.point() <= buffer.len());
            }
        }

        #[test]
        fn prop_kill_yank_round_trip(text in "[a-z\n]{0,24}", at in 0usize..32) {
            let ring = KillRing::new();
            let mut buffer = TextBuffer::from_text(&text);
            buffer.move_to(Motion::Absolute(at));
            let before = buffer.point();

            buffer.kill_to_end(&ring, false);
            buffer.yank(&ring);
            prop_assert_eq!(buffer.text(), text);
            prop_assert_eq!(buffer.mark(), Some(before));
        }
    }
}
