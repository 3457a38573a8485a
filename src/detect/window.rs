use std::collections::VecDeque;

/// One observation held by the window. `note: None` is silence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowEntry {
    pub note: Option<u8>,
    pub timestamp: f64,
}

/// Bounded FIFO of the most recent observations
#[derive(Debug, Clone)]
pub struct DebounceWindow {
    entries: VecDeque<WindowEntry>,
    capacity: usize,
}

impl DebounceWindow {
    /// Empty window holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            // one extra slot so push-then-evict never reallocates
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append an observation, evicting the oldest once full
    pub fn push(&mut self, note: Option<u8>, timestamp: f64) {
        self.entries.push_back(WindowEntry { note, timestamp });
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// True when every held entry carries the same note
    pub fn is_unanimous(&self) -> bool {
        let mut notes = self.entries.iter().map(|entry| entry.note);
        match notes.next() {
            Some(first) => notes.all(|note| note == first),
            None => true,
        }
    }

    /// How many entries carry `note`
    pub fn count(&self, note: Option<u8>) -> usize {
        self.entries.iter().filter(|entry| entry.note == note).count()
    }

    /// Oldest entry
    pub fn head(&self) -> Option<&WindowEntry> {
        self.entries.front()
    }

    /// Newest entry
    pub fn tail(&self) -> Option<&WindowEntry> {
        self.entries.back()
    }

    /// Timestamp of the first entry in the unbroken run of `note` at the back
    /// of the window, if the newest entry is `note`
    pub fn run_start(&self, note: Option<u8>) -> Option<f64> {
        self.entries
            .iter()
            .rev()
            .take_while(|entry| entry.note == note)
            .last()
            .map(|entry| entry.timestamp)
    }

    /// Entries from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &WindowEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes(window: &DebounceWindow) -> Vec<Option<u8>> {
        window.iter().map(|entry| entry.note).collect()
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut window = DebounceWindow::new(5);
        for i in 0..20u8 {
            window.push(Some(i), i as f64);
            assert!(window.len() <= 5);
        }
        assert_eq!(window.len(), 5);
    }

    #[test]
    fn evicts_oldest_first() {
        let mut window = DebounceWindow::new(3);
        window.push(Some(1), 0.0);
        window.push(Some(2), 0.1);
        window.push(Some(3), 0.2);
        window.push(Some(4), 0.3);

        assert_eq!(notes(&window), vec![Some(2), Some(3), Some(4)]);
        assert_eq!(window.head().unwrap().timestamp, 0.1);
        assert_eq!(window.tail().unwrap().timestamp, 0.3);
    }

    #[test]
    fn unanimity() {
        let mut window = DebounceWindow::new(3);
        assert!(window.is_unanimous());

        window.push(None, 0.0);
        assert!(window.is_unanimous());

        window.push(Some(60), 0.1);
        assert!(!window.is_unanimous());

        window.push(Some(60), 0.2);
        window.push(Some(60), 0.3);
        assert!(window.is_unanimous());
    }

    #[test]
    fn counts_notes() {
        let mut window = DebounceWindow::new(5);
        for note in [60, 61, 60, 60, 62] {
            window.push(Some(note), 0.0);
        }
        assert_eq!(window.count(Some(60)), 3);
        assert_eq!(window.count(Some(62)), 1);
        assert_eq!(window.count(None), 0);
    }

    #[test]
    fn run_start_finds_the_trailing_run() {
        let mut window = DebounceWindow::new(5);
        window.push(Some(60), 0.0);
        window.push(Some(61), 0.1);
        window.push(Some(60), 0.2);
        window.push(Some(60), 0.3);

        assert_eq!(window.run_start(Some(60)), Some(0.2));
        assert_eq!(window.run_start(Some(61)), None);

        window.push(Some(61), 0.4);
        assert_eq!(window.run_start(Some(61)), Some(0.4));
    }
}
