use crate::path::JsonPath;

/// Oldest entries are evicted past this point.
pub const HISTORY_CAP: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Back,
    Forward,
}

/// Linear view-location history with a cursor, like a browser's.
///
/// Recording while the cursor sits mid-stack drops the forward entries
/// first. Recording the location already under the cursor is a no-op, and
/// nothing records while `navigating` is set so that restoring an old
/// location does not spawn a fresh entry.
#[derive(Debug, Default)]
pub struct HistoryStack {
    entries: Vec<JsonPath>,
    current: Option<usize>,
    navigating: bool,
}

impl HistoryStack {
    pub fn record(&mut self, path: JsonPath) {
        if self.navigating {
            return;
        }
        match self.current {
            Some(i) => {
                if self.entries.get(i) == Some(&path) {
                    return;
                }
                self.entries.truncate(i + 1);
            }
            None => self.entries.clear(),
        }
        self.entries.push(path);
        self.current = Some(self.entries.len() - 1);
        if self.entries.len() > HISTORY_CAP {
            self.entries.remove(0);
            self.current = Some(self.entries.len() - 1);
        }
    }

    fn target_index(&self, direction: NavDirection) -> Option<usize> {
        let current = self.current?;
        match direction {
            NavDirection::Back => current.checked_sub(1),
            NavDirection::Forward => {
                let next = current + 1;
                (next < self.entries.len()).then_some(next)
            }
        }
    }

    /// The entry a step would land on, without moving the cursor.
    pub fn peek(&self, direction: NavDirection) -> Option<&JsonPath> {
        self.entries.get(self.target_index(direction)?)
    }

    /// Move the cursor one entry back or forward. At either end there is
    /// nothing to do and nothing is returned.
    pub fn step(&mut self, direction: NavDirection) -> Option<&JsonPath> {
        let target = self.target_index(direction)?;
        self.current = Some(target);
        self.entries.get(target)
    }

    pub fn can_step(&self, direction: NavDirection) -> bool {
        self.target_index(direction).is_some()
    }

    pub fn set_navigating(&mut self, on: bool) {
        self.navigating = on;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.current = None;
        self.navigating = false;
    }

    /// 1-based cursor position and entry count, for the status bar.
    pub fn position(&self) -> Option<(usize, usize)> {
        self.current.map(|i| (i + 1, self.entries.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::{HISTORY_CAP, HistoryStack, NavDirection};
    use crate::path::JsonPath;

    fn p(text: &str) -> JsonPath {
        JsonPath::parse(text)
    }

    #[test]
    fn recording_the_current_location_again_is_a_no_op() {
        let mut h = HistoryStack::default();
        h.record(p("a"));
        h.record(p("a"));
        h.record(p("b"));
        h.record(p("b"));
        assert_eq!(h.position(), Some((2, 2)));
    }

    #[test]
    fn back_and_forward_walk_the_stack() {
        let mut h = HistoryStack::default();
        h.record(p("a"));
        h.record(p("b"));
        h.record(p("c"));

        assert_eq!(h.step(NavDirection::Back), Some(&p("b")));
        assert_eq!(h.step(NavDirection::Back), Some(&p("a")));
        assert_eq!(h.step(NavDirection::Back), None);
        assert!(!h.can_step(NavDirection::Back));

        assert_eq!(h.step(NavDirection::Forward), Some(&p("b")));
        assert_eq!(h.step(NavDirection::Forward), Some(&p("c")));
        assert_eq!(h.step(NavDirection::Forward), None);
    }

    #[test]
    fn peek_does_not_move_the_cursor() {
        let mut h = HistoryStack::default();
        h.record(p("a"));
        h.record(p("b"));
        assert_eq!(h.peek(NavDirection::Back), Some(&p("a")));
        assert_eq!(h.position(), Some((2, 2)));
    }

    #[test]
    fn recording_mid_stack_drops_forward_entries() {
        let mut h = HistoryStack::default();
        h.record(p("a"));
        h.record(p("b"));
        h.record(p("c"));
        h.step(NavDirection::Back);
        h.step(NavDirection::Back);

        h.record(p("d"));
        assert_eq!(h.position(), Some((2, 2)));
        assert!(!h.can_step(NavDirection::Forward));
        assert_eq!(h.step(NavDirection::Back), Some(&p("a")));
    }

    #[test]
    fn recording_the_current_entry_keeps_forward_entries() {
        let mut h = HistoryStack::default();
        h.record(p("a"));
        h.record(p("b"));
        h.step(NavDirection::Back);

        h.record(p("a"));
        assert_eq!(h.peek(NavDirection::Forward), Some(&p("b")));
    }

    #[test]
    fn capacity_evicts_the_oldest_entry() {
        let mut h = HistoryStack::default();
        for i in 0..(HISTORY_CAP + 3) {
            h.record(p(&format!("p{i}")));
        }
        assert_eq!(h.position(), Some((HISTORY_CAP, HISTORY_CAP)));

        // Rewind all the way: the first three entries are gone.
        let mut last = None;
        while let Some(entry) = h.step(NavDirection::Back) {
            last = Some(entry.clone());
        }
        assert_eq!(last, Some(p("p3")));
    }

    #[test]
    fn nothing_records_while_navigating() {
        let mut h = HistoryStack::default();
        h.record(p("a"));
        h.set_navigating(true);
        h.record(p("b"));
        h.set_navigating(false);
        assert_eq!(h.position(), Some((1, 1)));
    }

    #[test]
    fn clear_resets_everything() {
        let mut h = HistoryStack::default();
        h.record(p("a"));
        h.record(p("b"));
        h.clear();
        assert_eq!(h.position(), None);
        assert!(!h.can_step(NavDirection::Back));
        h.record(p("c"));
        assert_eq!(h.position(), Some((1, 1)));
    }
}
