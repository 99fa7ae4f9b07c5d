//! Expand/collapse state for labelled sections.
//!
//! Category sections on the examples page and sidebar groups on reference
//! pages each own one `expanded` flag. A section without a label has no
//! control to click, so it always starts expanded; labelled sections start
//! collapsed. Toggling affects only the section toggled.
//!
//! In the generated HTML a section becomes `<details>`, with `open` set when
//! the section is expanded.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    label: Option<String>,
    expanded: bool,
}

impl Section {
    pub fn new(label: Option<&str>) -> Self {
        let label = label.filter(|l| !l.is_empty()).map(str::to_string);
        let expanded = label.is_none();
        Self { label, expanded }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Flip this section's state and return the new value.
    pub fn toggle(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    /// Sign shown on the secondary expand button.
    pub fn marker(&self) -> &'static str {
        if self.expanded { "−" } else { "+" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlabelled_section_starts_expanded() {
        assert!(Section::new(None).is_expanded());
        assert!(Section::new(Some("")).is_expanded());
    }

    #[test]
    fn labelled_section_starts_collapsed() {
        let section = Section::new(Some("Shape"));
        assert!(!section.is_expanded());
        assert_eq!(section.label(), Some("Shape"));
        assert_eq!(section.marker(), "+");
    }

    #[test]
    fn toggle_flips_state() {
        let mut section = Section::new(Some("Shape"));
        assert!(section.toggle());
        assert_eq!(section.marker(), "−");
        assert!(!section.toggle());
    }

    #[test]
    fn toggling_one_leaves_siblings_alone() {
        let mut sections = vec![
            Section::new(Some("Arrays")),
            Section::new(Some("Shape")),
            Section::new(None),
        ];

        assert!(sections[0].toggle());

        let states: Vec<bool> = sections.iter().map(Section::is_expanded).collect();
        assert_eq!(states, vec![true, false, true]);
    }
}
