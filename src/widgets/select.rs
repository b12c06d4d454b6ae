//! Single and multi pick list.
//!
//! Keys:
//! - printable runes filter, Backspace removes one rune, Escape clears
//! - Up/Down move focus, PageUp/PageDown move it by the window size,
//!   Home/End jump to the ends of the view
//! - multi only: Right picks, Left unpicks (again on the same option: the
//!   whole view), Tab or Shift-Tab toggles
//! - Enter submits, Ctrl-C / Ctrl-D cancel

use tracing::debug;

use crate::error::Result;
use crate::events::{Dispatcher, Event, Info};
use crate::input::KeyEvent;
use crate::renderer::{Cursor, Frame};
use crate::theme::Theme;

use super::options::OptionSet;
use super::{stage, Flow, Widget};

type Check<'a> = Box<dyn FnMut(&[usize]) -> bool + 'a>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectState {
    /// No filter text.
    Browsing,
    Filtering,
    /// Enter was pressed and the check is running.
    Confirming,
    Done,
    Cancelled,
}

pub struct Select<'a> {
    prompt: String,
    options: OptionSet,
    multi: bool,
    check: Option<Check<'a>>,
    events: Dispatcher<'a>,
    state: SelectState,
    warning: Option<String>,
}

impl<'a> Select<'a> {
    pub fn new<I, S>(prompt: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            prompt: prompt.into(),
            options: OptionSet::new(options),
            multi: false,
            check: None,
            events: Dispatcher::silent(),
            state: SelectState::Browsing,
            warning: None,
        }
    }

    /// Allow picking several options.
    pub fn multi(mut self, multi: bool) -> Self {
        self.multi = multi;
        self
    }

    /// Rows visible at once.
    pub fn limit(mut self, limit: usize) -> Self {
        self.options = self.options.with_limit(limit);
        self
    }

    /// Initially focused option.
    pub fn index(mut self, index: usize) -> Self {
        self.options = self.options.with_focus(index);
        self
    }

    /// Options picked before the first key.
    pub fn picks<I: IntoIterator<Item = usize>>(mut self, picks: I) -> Self {
        self.options = self.options.with_picks(picks);
        self
    }

    pub fn wrap(mut self, wrap: bool) -> Self {
        self.options = self.options.with_wrap(wrap);
        self
    }

    /// Predicate over the value about to be committed.
    pub fn check<F>(mut self, check: F) -> Self
    where
        F: FnMut(&[usize]) -> bool + 'a,
    {
        self.check = Some(Box::new(check));
        self
    }

    pub fn on_event<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&Event, &mut Info) + 'a,
    {
        self.events.set_callback(callback);
        self
    }

    pub fn state(&self) -> SelectState {
        self.state
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    /// Focused option for single pick, all picks in index order for multi.
    pub fn value(&self) -> Vec<usize> {
        if self.multi {
            self.options.picks().iter().copied().collect()
        } else {
            self.options.focused().into_iter().collect()
        }
    }

    fn settle(&mut self) {
        self.state = if self.options.filter_text().is_empty() {
            SelectState::Browsing
        } else {
            SelectState::Filtering
        };
    }

    fn reject(&mut self) -> Flow<Vec<usize>> {
        self.events.emit(Event::Reject);
        Flow::Reject
    }

    fn apply(&mut self, changed: bool) -> Flow<Vec<usize>> {
        if !changed {
            return self.reject();
        }
        self.settle();
        Flow::Continue
    }

    fn submit(&mut self) -> Flow<Vec<usize>> {
        self.state = SelectState::Confirming;
        let value = self.value();
        let accepted = !value.is_empty() || self.multi;
        let accepted = accepted && self.check.as_mut().is_none_or(|check| check(&value));
        if !accepted {
            debug!(?value, "selection rejected");
            self.warning = Some("invalid selection".to_string());
            self.settle();
            return self.reject();
        }
        self.state = SelectState::Done;
        self.events.emit(Event::Submit);
        Flow::Done(value)
    }

    fn hint(&self) -> &'static str {
        match (self.multi, self.state) {
            (_, SelectState::Filtering) => "(esc to clear)",
            (true, _) => "(→ pick, ← unpick, tab toggle)",
            (false, _) => "",
        }
    }
}

impl Widget for Select<'_> {
    type Output = Vec<usize>;

    fn handle(&mut self, key: KeyEvent) -> Result<Flow<Vec<usize>>> {
        self.warning = None;
        let events = &mut self.events;
        let flow = match key {
            KeyEvent::Char(c) => {
                let changed = self.options.insert_filter(c.encode_utf8(&mut [0; 4]), events);
                self.apply(changed)
            }
            KeyEvent::Backspace => {
                let changed = self.options.delete_filter(events);
                self.apply(changed)
            }
            KeyEvent::Escape => {
                let changed = self.options.clear_filter(events);
                self.apply(changed)
            }
            KeyEvent::Up | KeyEvent::Down => {
                let changed = self.options.move_focus(key == KeyEvent::Up, events);
                self.apply(changed)
            }
            KeyEvent::Home => {
                let changed = self.options.focus_on(0, events);
                self.apply(changed)
            }
            KeyEvent::End => {
                let last = self.options.view().len().saturating_sub(1);
                let changed = self.options.focus_on(last, events);
                self.apply(changed)
            }
            KeyEvent::PageUp | KeyEvent::PageDown => {
                let changed = self.options.page_focus(key == KeyEvent::PageUp, events);
                self.apply(changed)
            }
            KeyEvent::Right | KeyEvent::Left if self.multi => {
                let changed = self.options.pick(key == KeyEvent::Right, events);
                self.apply(changed)
            }
            KeyEvent::Tab | KeyEvent::BackTab if self.multi => {
                let changed = self.options.toggle(events);
                self.apply(changed)
            }
            KeyEvent::Right | KeyEvent::Left | KeyEvent::Tab | KeyEvent::BackTab => self.reject(),
            KeyEvent::Enter => self.submit(),
            KeyEvent::Interrupt | KeyEvent::EndOfInput => {
                self.state = SelectState::Cancelled;
                Flow::Cancel
            }
            _ => Flow::Continue,
        };
        Ok(flow)
    }

    fn frame(&self, theme: &Theme, width: usize) -> Frame {
        let filter = self.options.filter_text();
        let info = self.events.info().get().unwrap_or(&filter);
        let (header, column) = stage::header(theme, &self.prompt, info, self.hint());

        // Cursor sits on the filter text when it is what the info slot shows.
        let column = if self.events.info().get().is_none() && !filter.is_empty() {
            column - crate::text::visible_width(&filter) + self.options.filter_cursor()
        } else {
            column
        };

        let mut lines = vec![header];
        lines.extend(stage::option_rows(&self.options, theme, width, self.multi));
        if let Some(warning) = &self.warning {
            lines.push(stage::warning(theme, warning));
        }
        Frame::new(lines, Cursor::new(0, column))
    }

    fn summary(&self, theme: &Theme, _width: usize) -> Frame {
        let labels: Vec<&str> = self.value().into_iter().map(|i| self.options.label(i)).collect();
        stage::summary(theme, &self.prompt, &labels.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(select: &mut Select<'_>, keys: &[KeyEvent]) -> Vec<Flow<Vec<usize>>> {
        keys.iter().map(|&k| select.handle(k).unwrap()).collect()
    }

    fn typed(select: &mut Select<'_>, text: &str) {
        for key in KeyEvent::typed(text) {
            select.handle(key).unwrap();
        }
    }

    #[test]
    fn single_pick_returns_focus() {
        let mut select = Select::new("color?", ["red", "green", "blue"]);
        let flows = press(&mut select, &[KeyEvent::Down, KeyEvent::Enter]);
        assert_eq!(flows[1], Flow::Done(vec![1]));
        assert_eq!(select.state(), SelectState::Done);
    }

    #[test]
    fn filtering_moves_state() {
        let mut select = Select::new("color?", ["red", "green", "blue"]);
        typed(&mut select, "bl");
        assert_eq!(select.state(), SelectState::Filtering);
        press(&mut select, &[KeyEvent::Escape]);
        assert_eq!(select.state(), SelectState::Browsing);
    }

    #[test]
    fn dead_end_filter_rings() {
        let mut select = Select::new("color?", ["red", "green", "blue"]);
        typed(&mut select, "b");
        let flows = press(&mut select, &[KeyEvent::Char('z')]);
        assert_eq!(flows[0], Flow::Reject);
        assert_eq!(select.options().filter_text(), "b");
    }

    #[test]
    fn picking_keys_only_in_multi() {
        let mut select = Select::new("color?", ["red", "green"]);
        assert_eq!(press(&mut select, &[KeyEvent::Right]), vec![Flow::Reject]);

        let mut select = Select::new("color?", ["red", "green"]).multi(true);
        press(&mut select, &[KeyEvent::Right, KeyEvent::Down, KeyEvent::Tab]);
        assert_eq!(select.value(), vec![0, 1]);
    }

    #[test]
    fn page_keys_move_by_limit() {
        let days = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];
        let mut select = Select::new("day?", days).limit(3);
        press(&mut select, &[KeyEvent::PageDown, KeyEvent::PageDown]);
        assert_eq!(select.options().focused(), Some(6));
        assert_eq!(press(&mut select, &[KeyEvent::PageDown]), vec![Flow::Reject]);
        let flows = press(&mut select, &[KeyEvent::PageUp, KeyEvent::Enter]);
        assert_eq!(flows[1], Flow::Done(vec![3]));
    }

    #[test]
    fn back_tab_toggles_like_tab() {
        let mut select = Select::new("color?", ["red", "green"]);
        assert_eq!(press(&mut select, &[KeyEvent::BackTab]), vec![Flow::Reject]);

        let mut select = Select::new("color?", ["red", "green"]).multi(true);
        press(&mut select, &[KeyEvent::BackTab, KeyEvent::Down, KeyEvent::BackTab, KeyEvent::BackTab]);
        assert_eq!(select.value(), vec![0]);
    }

    #[test]
    fn multi_may_submit_nothing() {
        let mut select = Select::new("colors?", ["red"]).multi(true);
        assert_eq!(press(&mut select, &[KeyEvent::Enter]), vec![Flow::Done(vec![])]);
    }

    #[test]
    fn failed_check_keeps_state() {
        let mut select = Select::new("colors?", ["red", "green"]).multi(true).check(|picks| picks.len() == 2);
        let flows = press(&mut select, &[KeyEvent::Right, KeyEvent::Enter]);
        assert_eq!(flows[1], Flow::Reject);
        assert_eq!(select.state(), SelectState::Browsing);
        assert_eq!(select.value(), vec![0]);
        let theme = Theme::new("plain", "");
        assert!(select.frame(&theme, 80).text().ends_with("invalid selection"));

        let flows = press(&mut select, &[KeyEvent::Down, KeyEvent::Right, KeyEvent::Enter]);
        assert_eq!(flows[2], Flow::Done(vec![0, 1]));
    }

    #[test]
    fn preselected_picks() {
        let mut select = Select::new("days", ["a", "b", "c"]).multi(true).picks([2, 9]);
        assert_eq!(press(&mut select, &[KeyEvent::Enter]), vec![Flow::Done(vec![2])]);
    }

    #[test]
    fn interrupt_cancels() {
        let mut select = Select::new("color?", ["red"]);
        assert_eq!(press(&mut select, &[KeyEvent::Interrupt]), vec![Flow::Cancel]);
        assert_eq!(select.state(), SelectState::Cancelled);
    }

    #[test]
    fn frame_shows_filter_and_window() {
        let theme = Theme::new("plain", "");
        let mut select = Select::new("day?", ["Monday", "Tuesday", "Sunday"]).limit(2);
        typed(&mut select, "day");
        let frame = select.frame(&theme, 80);
        assert_eq!(frame.text(), "day? day (esc to clear)\n> Monday\n  Tuesday");
        assert_eq!(frame.cursor(), Cursor::new(0, 8));
    }

    #[test]
    fn callback_info_replaces_filter_text() {
        let theme = Theme::new("plain", "");
        let mut select = Select::new("color?", ["red", "green"]).on_event(|event, info| {
            if let Event::Focus { index } = event {
                info.set(format!("#{index}"));
            }
        });
        press(&mut select, &[KeyEvent::Down]);
        assert!(select.frame(&theme, 80).text().starts_with("color? #1"));
    }

    #[test]
    fn summary_lists_labels() {
        let theme = Theme::new("plain", "");
        let mut select = Select::new("colors:", ["red", "green", "blue"]).multi(true).picks([0, 2]);
        press(&mut select, &[KeyEvent::Enter]);
        assert_eq!(select.summary(&theme, 80).text(), "colors: red, blue");
    }
}
