//! Walk a [`Namespace`] one level at a time.
//!
//! Every level is a fresh [`OptionSet`] over the entries listed under the
//! current trail. Nothing is cached: going back lists the parent again and
//! starts it with an empty filter.
//!
//! Keys:
//! - printable runes, Backspace, Escape: filter as in [`Select`](super::Select)
//! - Up/Down: move focus, PageUp/PageDown by the window size
//! - Right: enter the focused branch
//! - Left or Shift-Tab: go back to the parent
//! - Tab: enter the branch predicted by the `jump` hook
//! - Enter: commit the focused entry

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::events::{Dispatcher, Event, Info};
use crate::input::KeyEvent;
use crate::renderer::{Cursor, Frame};
use crate::text::visible_width;
use crate::theme::Theme;

use super::namespace::{Entry, Namespace, NamespaceError};
use super::options::{OptionSet, DEFAULT_LIMIT};
use super::{stage, Flow, Widget};

type Allow<'a> = Box<dyn Fn(&[String], &Entry) -> bool + 'a>;
type Jump<'a> = Box<dyn FnMut(&[String], &[String]) -> Option<(usize, String)> + 'a>;
type Check<'a> = Box<dyn FnMut(&[String], &Entry) -> bool + 'a>;

pub struct Traverse<'a, N: Namespace> {
    prompt: String,
    namespace: N,
    trail: Vec<String>,
    entries: Vec<Entry>,
    options: OptionSet,
    limit: usize,
    allow: Option<Allow<'a>>,
    jump: Option<Jump<'a>>,
    check: Option<Check<'a>>,
    prediction: Option<(usize, String)>,
    events: Dispatcher<'a>,
    warning: Option<String>,
}

impl<'a, N: Namespace> Traverse<'a, N> {
    pub fn new(prompt: impl Into<String>, namespace: N) -> Self {
        Self {
            prompt: prompt.into(),
            namespace,
            trail: Vec::new(),
            entries: Vec::new(),
            options: OptionSet::new(Vec::<String>::new()),
            limit: DEFAULT_LIMIT,
            allow: None,
            jump: None,
            check: None,
            prediction: None,
            events: Dispatcher::silent(),
            warning: None,
        }
    }

    /// Start below the root.
    pub fn trail<I, S>(mut self, trail: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trail = trail.into_iter().map(Into::into).collect();
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Only entries passing `allow` are listed.
    pub fn allow<F>(mut self, allow: F) -> Self
    where
        F: Fn(&[String], &Entry) -> bool + 'a,
    {
        self.allow = Some(Box::new(allow));
        self
    }

    /// Given a trail and the names listed under it, predict which entry the
    /// user is after. The prediction is focused on arrival and Tab enters it.
    pub fn jump<F>(mut self, jump: F) -> Self
    where
        F: FnMut(&[String], &[String]) -> Option<(usize, String)> + 'a,
    {
        self.jump = Some(Box::new(jump));
        self
    }

    /// Predicate over the trail and the entry about to be committed.
    pub fn check<F>(mut self, check: F) -> Self
    where
        F: FnMut(&[String], &Entry) -> bool + 'a,
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

    pub fn current_trail(&self) -> &[String] {
        &self.trail
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    pub fn namespace(&self) -> &N {
        &self.namespace
    }

    /// List `trail`. Inaccessible levels come back as `Ok(Err(reason))`;
    /// a failing namespace is fatal.
    fn list(&mut self, trail: &[String]) -> Result<std::result::Result<Vec<Entry>, String>> {
        match self.namespace.list(trail) {
            Ok(entries) => {
                let entries = match &self.allow {
                    Some(allow) => entries.into_iter().filter(|e| allow(trail, e)).collect(),
                    None => entries,
                };
                Ok(Ok(entries))
            }
            Err(NamespaceError::NotAccessible { name, reason }) => {
                debug!(%name, %reason, "level not accessible");
                Ok(Err(format!("{name}: {reason}")))
            }
            Err(NamespaceError::Failed(message)) => {
                let trail = self.namespace.render_trail(trail);
                warn!(%trail, %message, "namespace failed");
                Err(Error::Namespace { trail, message })
            }
        }
    }

    /// Make `entries` the current level.
    fn install(&mut self, entries: Vec<Entry>) {
        let labels: Vec<String> = entries.iter().map(|e| self.namespace.label(e)).collect();
        let mut options = OptionSet::new(labels).with_limit(self.limit);

        self.prediction = None;
        if let Some(jump) = self.jump.as_mut() {
            let names: Vec<String> = entries.iter().map(|e| e.name.clone()).collect();
            if let Some((index, name)) = jump(&self.trail, &names) {
                if index < entries.len() {
                    options = options.with_focus(index);
                    self.prediction = Some((index, name));
                }
            }
        }

        self.entries = entries;
        self.options = options;
    }

    fn reject(&mut self, warning: Option<String>) -> Flow<Vec<String>> {
        self.warning = warning;
        self.events.emit(Event::Reject);
        Flow::Reject
    }

    fn filtered(&mut self, changed: bool) -> Flow<Vec<String>> {
        if changed { Flow::Continue } else { self.reject(None) }
    }

    fn focused_entry(&self) -> Option<&Entry> {
        self.options.focused().map(|i| &self.entries[i])
    }

    fn enter(&mut self) -> Result<Flow<Vec<String>>> {
        let Some(entry) = self.focused_entry().cloned() else {
            return Ok(self.reject(None));
        };
        if !entry.is_branch() {
            return Ok(self.reject(Some(format!("{} cannot be entered", entry.name))));
        }

        let mut trail = self.trail.clone();
        trail.push(entry.name.clone());
        let entries = match self.list(&trail)? {
            Ok(entries) if entries.is_empty() => {
                return Ok(self.reject(Some(format!("{} is empty", entry.name))));
            }
            Ok(entries) => entries,
            Err(reason) => return Ok(self.reject(Some(reason))),
        };

        self.trail = trail;
        self.install(entries);
        let depth = self.trail.len();
        self.events.emit(Event::Enter { name: entry.name, depth });
        Ok(Flow::Continue)
    }

    fn back(&mut self) -> Result<Flow<Vec<String>>> {
        if self.trail.is_empty() {
            return Ok(self.reject(None));
        }
        let parent = self.trail[..self.trail.len() - 1].to_vec();
        let entries = match self.list(&parent)? {
            Ok(entries) => entries,
            Err(reason) => return Ok(self.reject(Some(reason))),
        };

        self.trail = parent;
        self.install(entries);
        let depth = self.trail.len();
        self.events.emit(Event::Back { depth });
        Ok(Flow::Continue)
    }

    fn jump_to_prediction(&mut self) -> Result<Flow<Vec<String>>> {
        let Some((index, _)) = self.prediction.clone() else {
            return Ok(self.reject(None));
        };
        // The prediction is an original index; focus it even if filtered out.
        if let Some(position) = self.options.view().iter().position(|&i| i == index) {
            self.options.focus_on(position, &mut self.events);
        } else if self.options.clear_filter(&mut self.events) {
            self.options.focus_on(index, &mut self.events);
        }
        self.enter()
    }

    fn submit(&mut self) -> Flow<Vec<String>> {
        let Some(entry) = self.focused_entry().cloned() else {
            return self.reject(None);
        };
        if let Some(check) = self.check.as_mut() {
            if !check(&self.trail, &entry) {
                return self.reject(Some("invalid choice".to_string()));
            }
        }
        self.events.emit(Event::Submit);
        let mut path = self.trail.clone();
        path.push(entry.name);
        Flow::Done(path)
    }

    fn info(&self) -> String {
        if let Some(info) = self.events.info().get() {
            return info.to_string();
        }
        let mut info = self.namespace.render_trail(&self.trail);
        let filter = self.options.filter_text();
        if !filter.is_empty() {
            info.push_str(&filter);
        }
        info
    }
}

impl<N: Namespace> Widget for Traverse<'_, N> {
    type Output = Vec<String>;

    fn start(&mut self) -> Result<()> {
        let trail = self.trail.clone();
        match self.list(&trail)? {
            Ok(entries) => {
                self.install(entries);
                Ok(())
            }
            Err(message) => Err(Error::Namespace { trail: self.namespace.render_trail(&trail), message }),
        }
    }

    fn handle(&mut self, key: KeyEvent) -> Result<Flow<Vec<String>>> {
        self.warning = None;
        let events = &mut self.events;
        let flow = match key {
            KeyEvent::Char(c) => {
                let changed = self.options.insert_filter(c.encode_utf8(&mut [0; 4]), events);
                self.filtered(changed)
            }
            KeyEvent::Backspace => {
                let changed = self.options.delete_filter(events);
                self.filtered(changed)
            }
            KeyEvent::Escape => {
                let changed = self.options.clear_filter(events);
                self.filtered(changed)
            }
            KeyEvent::Up | KeyEvent::Down => {
                let changed = self.options.move_focus(key == KeyEvent::Up, events);
                self.filtered(changed)
            }
            KeyEvent::PageUp | KeyEvent::PageDown => {
                let changed = self.options.page_focus(key == KeyEvent::PageUp, events);
                self.filtered(changed)
            }
            KeyEvent::Right => return self.enter(),
            KeyEvent::Left | KeyEvent::BackTab => return self.back(),
            KeyEvent::Tab => return self.jump_to_prediction(),
            KeyEvent::Enter => self.submit(),
            KeyEvent::Interrupt | KeyEvent::EndOfInput => Flow::Cancel,
            _ => Flow::Continue,
        };
        Ok(flow)
    }

    fn frame(&self, theme: &Theme, width: usize) -> Frame {
        let info = self.info();
        let hint = match &self.prediction {
            Some((_, name)) if self.options.filter_text().is_empty() => format!("(tab: {name})"),
            _ => String::new(),
        };
        let (header, column) = stage::header(theme, &self.prompt, &info, &hint);
        let filter = self.options.filter_text();
        let column = if self.events.info().get().is_none() && !filter.is_empty() {
            column - visible_width(&filter) + self.options.filter_cursor()
        } else {
            column
        };

        let mut lines = vec![header];
        lines.extend(stage::option_rows(&self.options, theme, width, false));
        if let Some(warning) = &self.warning {
            lines.push(stage::warning(theme, warning));
        }
        Frame::new(lines, Cursor::new(0, column))
    }

    fn summary(&self, theme: &Theme, _width: usize) -> Frame {
        let mut result = self.namespace.render_trail(&self.trail);
        if let Some(entry) = self.focused_entry() {
            result.push_str(&entry.name);
        }
        stage::summary(theme, &self.prompt, &result)
    }
}
