//! Page stack.
//!
//! Pages are kept root first; only the top page receives keys and is drawn
//! in full. While the top page handles a key it is detached from the stack
//! so that its handlers can borrow the application mutably and push further
//! pages. `restore` puts it back underneath anything pushed in the meantime.

use crate::ui::components::Component;

#[derive(Default)]
pub struct PageStack {
    pages: Vec<Box<dyn Component>>,
    /// Index the detached page occupied, if a page is currently detached.
    detached_at: Option<usize>,
    /// Set when the stack was cleared while a page was detached.
    detached_dropped: bool,
}

impl std::fmt::Debug for PageStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageStack")
            .field("pages", &self.titles())
            .field("detached_at", &self.detached_at)
            .finish()
    }
}

impl PageStack {
    /// Number of pages, counting a detached page.
    pub fn len(&self) -> usize {
        self.pages.len() + usize::from(self.detached_at.is_some() && !self.detached_dropped)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&mut self, page: Box<dyn Component>) {
        self.pages.push(page);
    }

    pub fn pop(&mut self) -> Option<Box<dyn Component>> {
        self.pages.pop()
    }

    /// Drops every page. A page detached at the time is discarded when it is
    /// restored.
    pub fn clear(&mut self) {
        self.pages.clear();
        if self.detached_at.is_some() {
            self.detached_dropped = true;
        }
    }

    pub fn top_mut(&mut self) -> Option<&mut Box<dyn Component>> {
        self.pages.last_mut()
    }

    pub fn titles(&self) -> Vec<String> {
        self.pages.iter().map(|page| page.title()).collect()
    }

    /// Removes the top page for the duration of a key dispatch.
    pub fn detach_top(&mut self) -> Option<Box<dyn Component>> {
        let page = self.pages.pop()?;
        self.detached_at = Some(self.pages.len());
        self.detached_dropped = false;
        Some(page)
    }

    /// Returns a detached page to the position it was taken from.
    pub fn restore(&mut self, page: Box<dyn Component>) {
        let Some(index) = self.detached_at.take() else {
            self.pages.push(page);
            return;
        };
        if std::mem::take(&mut self.detached_dropped) {
            return;
        }
        let index = index.min(self.pages.len());
        self.pages.insert(index, page);
    }

    /// Mutable access to the top page, downcast to its concrete type.
    #[cfg(test)]
    pub fn top_as<C: Component>(&mut self) -> Option<&mut C> {
        let top: &mut dyn Component = self.pages.last_mut()?.as_mut();
        (top as &mut dyn std::any::Any).downcast_mut::<C>()
    }
}
