/// Rotates through caller-supplied status messages while a job is outstanding.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepNarrator {
    steps: Vec<String>,
    index: usize,
    active: bool,
}

impl StepNarrator {
    pub fn new(steps: Vec<String>) -> Self {
        Self {
            steps,
            index: 0,
            active: false,
        }
    }

    /// Starts from the first message and returns it.
    pub fn activate(&mut self) -> Option<&str> {
        self.index = 0;
        self.active = true;
        self.current()
    }

    /// Moves to the next message, wrapping after the last one.
    pub fn advance(&mut self) -> Option<&str> {
        if self.active && !self.steps.is_empty() {
            self.index = (self.index + 1) % self.steps.len();
        }
        self.current()
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.index = 0;
    }

    pub fn current(&self) -> Option<&str> {
        if self.active {
            self.steps.get(self.index).map(String::as_str)
        } else {
            None
        }
    }

    pub fn index(&self) -> Option<usize> {
        (self.active && !self.steps.is_empty()).then_some(self.index)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::StepNarrator;

    fn narrator() -> StepNarrator {
        StepNarrator::new(vec!["one".into(), "two".into(), "three".into()])
    }

    #[test]
    fn inactive_narrator_is_silent() {
        let mut narrator = narrator();
        assert_eq!(narrator.current(), None);
        assert_eq!(narrator.advance(), None);
        assert_eq!(narrator.index(), None);
    }

    #[test]
    fn advances_one_step_and_wraps() {
        let mut narrator = narrator();
        assert_eq!(narrator.activate(), Some("one"));
        let seen: Vec<_> = (0..4)
            .map(|_| narrator.advance().map(str::to_owned))
            .collect();
        assert_eq!(
            seen,
            vec![
                Some("two".to_string()),
                Some("three".to_string()),
                Some("one".to_string()),
                Some("two".to_string()),
            ]
        );
        assert_eq!(narrator.index(), Some(1));
    }

    #[test]
    fn deactivate_clears_and_reactivation_restarts() {
        let mut narrator = narrator();
        narrator.activate();
        narrator.advance();
        narrator.deactivate();
        assert_eq!(narrator.current(), None);
        assert_eq!(narrator.activate(), Some("one"));
    }

    #[test]
    fn empty_list_is_tolerated() {
        let mut narrator = StepNarrator::new(Vec::new());
        assert_eq!(narrator.activate(), None);
        assert_eq!(narrator.advance(), None);
        assert!(narrator.is_active());
    }
}
