//! Scroll, wrap and filter state of a live view.

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::ui::components::common::ScrollMetrics;

/// Line filter: the pattern being typed and the regex currently applied.
#[derive(Debug, Default)]
pub struct FilterState {
    input: String,
    editing: bool,
    /// Pattern as typed, kept so editing resumes from it.
    pattern: String,
    applied: Option<Regex>,
}

impl FilterState {
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn applied(&self) -> Option<&Regex> {
        self.applied.as_ref()
    }

    pub fn start_editing(&mut self) {
        self.editing = true;
        self.input = self.pattern.clone();
    }

    pub fn push(&mut self, ch: char) {
        self.input.push(ch);
    }

    pub fn pop(&mut self) {
        self.input.pop();
    }

    /// Leaves edit mode without touching the applied filter.
    pub fn cancel(&mut self) {
        self.editing = false;
        self.input.clear();
    }

    /// Applies the typed pattern; an empty pattern clears the filter.
    pub fn apply(&mut self) {
        self.editing = false;
        self.pattern = std::mem::take(&mut self.input);
        self.applied = if self.pattern.trim().is_empty() { None } else { compile_filter(&self.pattern) };
    }

    /// Removes the applied filter. Returns false when none was active.
    pub fn clear(&mut self) -> bool {
        self.cancel();
        self.pattern.clear();
        self.applied.take().is_some()
    }

    /// Lines of `content` matching the applied filter.
    pub fn visible_lines<'a>(&self, content: &'a str) -> Vec<&'a str> {
        match &self.applied {
            Some(regex) => content.lines().filter(|line| regex.is_match(line)).collect(),
            None => content.lines().collect(),
        }
    }
}

/// Case-insensitive regex for `pattern`; an invalid regex matches the
/// pattern literally.
pub fn compile_filter(pattern: &str) -> Option<Regex> {
    let build = |source: &str| RegexBuilder::new(source).case_insensitive(true).build();
    match build(pattern) {
        Ok(regex) => Some(regex),
        Err(error) => {
            debug!(pattern, error = %error, "Invalid filter regex; matching literally");
            build(&regex::escape(pattern)).ok()
        }
    }
}

#[derive(Debug, Default)]
pub struct LiveViewState {
    pub metrics: ScrollMetrics,
    pub wrap: bool,
    pub filter: FilterState,
}
