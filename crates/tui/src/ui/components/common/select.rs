//! Single-choice select state for the filter bar.
//!
//! Unlike a strict dropdown, the state can hold a value that is not among
//! its options (for instance a genre taken from a shared location). Such a
//! value is shown verbatim until the user picks an option.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectState {
    options: Vec<SelectOption>,
    value: String,
}

impl SelectState {
    /// Creates a select positioned on its first option.
    pub fn new(options: Vec<SelectOption>) -> Self {
        let value = options.first().map(|option| option.value.clone()).unwrap_or_default();
        Self { options, value }
    }

    /// Replaces the options, keeping the current value.
    pub fn set_options(&mut self, options: Vec<SelectOption>) {
        self.options = options;
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    fn position(&self) -> Option<usize> {
        self.options.iter().position(|option| option.value == self.value)
    }

    /// Label of the selected option, or the raw value when it is unknown.
    pub fn label(&self) -> &str {
        self.position()
            .and_then(|index| self.options.get(index))
            .map_or(self.value.as_str(), |option| option.label.as_str())
    }

    /// Moves to the next option. Returns whether the value changed.
    pub fn select_next(&mut self) -> bool {
        let target = match self.position() {
            Some(index) => (index + 1).min(self.options.len().saturating_sub(1)),
            None => 0,
        };
        self.select_index(target)
    }

    /// Moves to the previous option. Returns whether the value changed.
    pub fn select_prev(&mut self) -> bool {
        let target = self.position().map_or(0, |index| index.saturating_sub(1));
        self.select_index(target)
    }

    fn select_index(&mut self, index: usize) -> bool {
        match self.options.get(index) {
            Some(option) if option.value != self.value => {
                self.value = option.value.clone();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genres() -> SelectState {
        SelectState::new(vec![
            SelectOption::new("", "All genres"),
            SelectOption::new("Ação", "Ação"),
            SelectOption::new("Drama", "Drama"),
        ])
    }

    #[test]
    fn steps_through_options_without_wrapping() {
        let mut select = genres();
        assert_eq!(select.label(), "All genres");
        assert!(!select.select_prev());
        assert!(select.select_next());
        assert!(select.select_next());
        assert_eq!(select.value(), "Drama");
        assert!(!select.select_next());
        assert!(select.select_prev());
        assert_eq!(select.value(), "Ação");
    }

    #[test]
    fn unknown_value_is_shown_raw_and_cycles_from_first_option() {
        let mut select = genres();
        select.set_value("Isekai");
        assert_eq!(select.label(), "Isekai");
        assert!(select.select_next());
        assert_eq!(select.value(), "");
    }
}
