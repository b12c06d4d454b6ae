//! Filterable, windowed option list.
//!
//! [`OptionSet`] is the model behind [`Select`](super::Select) and
//! [`Traverse`](super::Traverse):
//!
//! - `labels` never change after construction
//! - the *view* is the ordered list of original indexes whose label
//!   contains the filter text, compared case-insensitively
//! - focus is a position in the view and is always valid while the view is
//!   non-empty; a filter edit that would empty the view is refused
//! - picks are original indexes, so they survive any amount of filtering
//! - the window is the `limit`-sized slice of the view that is drawn,
//!   scrolled just enough to keep focus inside it

use std::collections::BTreeSet;

use crate::editor::EditorBuffer;
use crate::events::{Dispatcher, Event};
use crate::text::sanitize;

/// Rows shown at once unless configured otherwise.
pub const DEFAULT_LIMIT: usize = 6;

#[derive(Debug, Clone)]
pub struct OptionSet {
    labels: Vec<String>,
    keys: Vec<String>,
    filter: EditorBuffer,
    view: Vec<usize>,
    focus: usize,
    picks: BTreeSet<usize>,
    limit: usize,
    offset: usize,
    wrap: bool,
}

impl OptionSet {
    /// Labels are sanitized once here.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels: Vec<String> = labels.into_iter().map(|l| sanitize(l.as_ref()).into_owned()).collect();
        let keys = labels.iter().map(|l| l.to_lowercase()).collect();
        let view = (0..labels.len()).collect();
        Self {
            labels,
            keys,
            filter: EditorBuffer::single_line(),
            view,
            focus: 0,
            picks: BTreeSet::new(),
            limit: DEFAULT_LIMIT,
            offset: 0,
            wrap: false,
        }
    }

    /// Visible rows. Zero is treated as one.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self.scroll();
        self
    }

    /// Let focus cycle past either end.
    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Initial picks. Out-of-range indexes are ignored.
    pub fn with_picks<I: IntoIterator<Item = usize>>(mut self, picks: I) -> Self {
        let len = self.labels.len();
        self.picks.extend(picks.into_iter().filter(|&i| i < len));
        self
    }

    /// Initial focus on an original index. Ignored if out of range.
    pub fn with_focus(mut self, index: usize) -> Self {
        if let Some(position) = self.view.iter().position(|&i| i == index) {
            self.focus = position;
            self.scroll();
        }
        self
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, index: usize) -> &str {
        &self.labels[index]
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn filter_text(&self) -> String {
        self.filter.value()
    }

    /// Filter cursor in screen columns.
    pub fn filter_cursor(&self) -> usize {
        self.filter.cursor_display_column()
    }

    /// Original indexes passing the filter, in original order.
    pub fn view(&self) -> &[usize] {
        &self.view
    }

    /// Focus as a position in the view.
    pub fn focus_position(&self) -> usize {
        self.focus
    }

    /// Original index of the focused option.
    pub fn focused(&self) -> Option<usize> {
        self.view.get(self.focus).copied()
    }

    pub fn picks(&self) -> &BTreeSet<usize> {
        &self.picks
    }

    pub fn is_picked(&self, index: usize) -> bool {
        self.picks.contains(&index)
    }

    /// The slice of the view currently drawn.
    pub fn window(&self) -> &[usize] {
        let end = (self.offset + self.limit).min(self.view.len());
        &self.view[self.offset.min(end)..end]
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    // =========================================================================
    // Filter
    // =========================================================================

    /// Append to the filter. Refused when the view would become empty.
    pub fn insert_filter(&mut self, text: &str, events: &mut Dispatcher<'_>) -> bool {
        let mut trial = self.filter.clone();
        if !trial.insert(text, &mut Dispatcher::silent()) || self.matching(&trial.value()).is_empty() {
            return false;
        }
        self.filter.insert(text, events);
        self.refilter(events);
        true
    }

    /// Remove one character from the filter.
    pub fn delete_filter(&mut self, events: &mut Dispatcher<'_>) -> bool {
        if !self.filter.delete_backward(events) {
            return false;
        }
        self.refilter(events);
        true
    }

    /// Empty the filter, restoring the full view.
    pub fn clear_filter(&mut self, events: &mut Dispatcher<'_>) -> bool {
        if !self.filter.clear(events) {
            return false;
        }
        self.refilter(events);
        true
    }

    fn matching(&self, filter: &str) -> Vec<usize> {
        let needle = filter.to_lowercase();
        (0..self.keys.len()).filter(|&i| self.keys[i].contains(&needle)).collect()
    }

    fn refilter(&mut self, events: &mut Dispatcher<'_>) {
        let previous = self.focused();
        let text = self.filter.value();
        self.view = self.matching(&text);
        self.focus = previous
            .and_then(|index| self.view.iter().position(|&i| i == index))
            .unwrap_or(0);
        self.offset = 0;
        self.scroll();
        events.emit(Event::Filter { text });
        if let Some(index) = self.focused() {
            if Some(index) != previous {
                events.emit(Event::Focus { index });
            }
        }
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Move focus one step. Clamped at the ends unless wrapping.
    pub fn move_focus(&mut self, up: bool, events: &mut Dispatcher<'_>) -> bool {
        let len = self.view.len();
        if len == 0 {
            return false;
        }
        let next = match (up, self.focus) {
            (true, 0) if self.wrap && len > 1 => len - 1,
            (true, 0) => return false,
            (true, f) => f - 1,
            (false, f) if f + 1 < len => f + 1,
            (false, _) if self.wrap && len > 1 => 0,
            (false, _) => return false,
        };
        self.set_focus(next, events)
    }

    /// Focus a view position.
    pub fn focus_on(&mut self, position: usize, events: &mut Dispatcher<'_>) -> bool {
        if position >= self.view.len() || position == self.focus {
            return false;
        }
        self.set_focus(position, events)
    }

    /// Move focus a whole window at a time. Always clamped, never wraps.
    pub fn page_focus(&mut self, up: bool, events: &mut Dispatcher<'_>) -> bool {
        let last = self.view.len().saturating_sub(1);
        let step = self.limit.max(1);
        let next = if up { self.focus.saturating_sub(step) } else { (self.focus + step).min(last) };
        self.focus_on(next, events)
    }

    fn set_focus(&mut self, position: usize, events: &mut Dispatcher<'_>) -> bool {
        self.focus = position;
        self.scroll();
        events.emit(Event::Focus { index: self.view[position] });
        true
    }

    fn scroll(&mut self) {
        if self.focus < self.offset {
            self.offset = self.focus;
        } else if self.focus >= self.offset + self.limit {
            self.offset = self.focus + 1 - self.limit;
        }
        self.offset = self.offset.min(self.view.len().saturating_sub(self.limit));
    }

    // =========================================================================
    // Picks
    // =========================================================================

    /// Pick (or unpick) the focused option. When it already is in that
    /// state, apply to every option in the view instead.
    pub fn pick(&mut self, picked: bool, events: &mut Dispatcher<'_>) -> bool {
        let Some(index) = self.focused() else {
            return false;
        };
        if self.is_picked(index) != picked {
            self.set_pick(index, picked);
            events.emit(Event::Pick { index, picked });
            return true;
        }

        let mut changed = false;
        for &i in &self.view {
            changed |= if picked { self.picks.insert(i) } else { self.picks.remove(&i) };
        }
        if !changed {
            return false;
        }
        events.emit(Event::PickAll { picked, count: self.view.len() });
        true
    }

    /// Flip the focused option.
    pub fn toggle(&mut self, events: &mut Dispatcher<'_>) -> bool {
        let Some(index) = self.focused() else {
            return false;
        };
        let picked = !self.is_picked(index);
        self.set_pick(index, picked);
        events.emit(Event::Pick { index, picked });
        true
    }

    fn set_pick(&mut self, index: usize, picked: bool) {
        if picked {
            self.picks.insert(index);
        } else {
            self.picks.remove(&index);
        }
    }
}
