//! Vertical scrolling for text panes.
//!
//! `ScrollMetrics` tracks the content height, the viewport height and the
//! current offset in terminal rows, clamping every movement to the valid
//! range. Content and viewport heights are refreshed on each render, so a
//! pane that shrinks or whose content changes never keeps an out-of-range
//! offset.

use ratatui::{
    Frame,
    layout::{Margin, Rect},
    style::Style,
    widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};

use crate::ui::theme::Theme;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollMetrics {
    offset: u16,
    content_height: u16,
    viewport_height: u16,
}

impl ScrollMetrics {
    pub const fn offset(&self) -> u16 {
        self.offset
    }

    pub const fn viewport_height(&self) -> u16 {
        self.viewport_height
    }

    pub fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    pub fn is_scrollable(&self) -> bool {
        self.viewport_height > 0 && self.content_height > self.viewport_height
    }

    /// Records both dimensions measured during render and clamps the offset.
    pub fn resize(&mut self, content_height: u16, viewport_height: u16) {
        self.content_height = content_height;
        self.viewport_height = viewport_height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Scrolls by `delta` rows (`+` down, `-` up).
    pub fn scroll_lines(&mut self, delta: i32) {
        let next = (i32::from(self.offset) + delta).clamp(0, i32::from(self.max_offset()));
        self.offset = u16::try_from(next).unwrap_or(self.offset);
    }

    /// Scrolls by whole viewports.
    pub fn scroll_pages(&mut self, pages: i32) {
        self.scroll_lines(i32::from(self.viewport_height.max(1)).saturating_mul(pages));
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }
}

/// Number of terminal rows `paragraph` occupies at `width` columns, honoring
/// its wrap setting. Saturates at `u16::MAX`.
///
/// Measure before attaching a block; borders would be counted as content.
pub fn paragraph_height(paragraph: &Paragraph, width: u16) -> u16 {
    u16::try_from(paragraph.line_count(width.max(1))).unwrap_or(u16::MAX)
}

/// Renders a themed scrollbar along the right edge of `area` when the
/// content does not fit. Pass the bordered area so the bar sits on the
/// border; the top and bottom corners are left untouched.
pub fn render_vertical_scrollbar(frame: &mut Frame, area: Rect, theme: &dyn Theme, metrics: &ScrollMetrics) {
    if !metrics.is_scrollable() {
        return;
    }
    let mut state = ScrollbarState::new(usize::from(metrics.max_offset()))
        .position(usize::from(metrics.offset()))
        .viewport_content_length(usize::from(metrics.viewport_height()));
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .thumb_style(Style::default().fg(theme.roles().scrollbar_thumb))
        .track_style(Style::default().fg(theme.roles().scrollbar_track));
    frame.render_stateful_widget(scrollbar, area.inner(Margin::new(0, 1)), &mut state);
}
