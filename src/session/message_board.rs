use crate::metering::clock::clock_time;

/// The visible notice list of the meter: every transition appends one line
/// and nothing is ever edited, only cleared wholesale between shifts.
#[derive(Debug, Default)]
pub struct MessageBoard {
    lines: Vec<String>,
}

impl MessageBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a display line, prefixed with the local clock time.
    pub fn post(&mut self, timestamp: u64, text: &str) {
        self.lines
            .push(format!("{} - {}", clock_time(timestamp), text));
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posts_keep_arrival_order() {
        let mut board = MessageBoard::new();
        board.post(1_700_000_000, "ride started");
        board.post(1_700_000_060, "vehicle set in motion");
        assert_eq!(board.len(), 2);
        assert!(board.lines()[0].ends_with(" - ride started"));
        assert!(board.lines()[1].ends_with(" - vehicle set in motion"));
    }

    #[test]
    fn lines_carry_a_clock_time_prefix() {
        let mut board = MessageBoard::new();
        board.post(1_700_000_000, "meter reset");
        let line = &board.lines()[0];
        // "HH:MM:SS - meter reset"
        assert_eq!(&line[8..11], " - ");
        assert_eq!(line.as_bytes()[2], b':');
    }

    #[test]
    fn clear_empties_the_board() {
        let mut board = MessageBoard::new();
        board.post(1_700_000_000, "ride started");
        assert!(!board.is_empty());
        board.clear();
        assert!(board.is_empty());
    }
}
