//! Text field over an [`EditorBuffer`].
//!
//! Single-line fields submit on Enter. Multi-line fields insert a line
//! break on Enter unless the cursor is at the end of the buffer and the
//! last `finish - 1` lines are already empty: then those empty lines are
//! dropped and the value is submitted. With the default `finish` of 2 that
//! means pressing Enter on an empty last line.

use tracing::debug;

use crate::editor::{Direction, EditorBuffer, EditorLimits};
use crate::error::Result;
use crate::events::{Dispatcher, Event, Info};
use crate::input::KeyEvent;
use crate::renderer::{Cursor, Frame, Line};
use crate::text::char_width;
use crate::theme::Theme;

use super::{stage, Flow, Widget};

type Check<'a> = Box<dyn FnMut(&str) -> bool + 'a>;

pub struct Input<'a> {
    prompt: String,
    buffer: EditorBuffer,
    initial: Option<String>,
    default: Option<String>,
    conceal: bool,
    finish: usize,
    check: Option<Check<'a>>,
    events: Dispatcher<'a>,
    warning: Option<String>,
    committed: Option<String>,
}

impl<'a> Input<'a> {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            buffer: EditorBuffer::single_line(),
            initial: None,
            default: None,
            conceal: false,
            finish: 2,
            check: None,
            events: Dispatcher::silent(),
            warning: None,
            committed: None,
        }
    }

    /// Switch between single- and multi-line editing. Resets the buffer settings.
    pub fn multiline(mut self, multiline: bool) -> Self {
        self.buffer = EditorBuffer::new(multiline);
        self
    }

    /// Text inserted before the first key, as if typed.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.initial = Some(value.into());
        self
    }

    /// Committed when the buffer is empty on submit.
    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Display every rune as the theme's conceal rune.
    pub fn conceal(mut self, conceal: bool) -> Self {
        self.conceal = conceal;
        self
    }

    pub fn limits(mut self, limits: EditorLimits) -> Self {
        self.buffer = self.buffer.with_limits(limits);
        self
    }

    /// Spaces inserted by Tab in multi-line mode.
    pub fn indent(mut self, indent: usize) -> Self {
        self.buffer = self.buffer.with_indent(indent);
        self
    }

    pub fn boundaries(mut self, boundaries: &str) -> Self {
        self.buffer = self.buffer.with_boundaries(boundaries);
        self
    }

    /// Number of Enter presses on empty trailing lines that submit a
    /// multi-line value. At least 1.
    pub fn finish(mut self, finish: usize) -> Self {
        self.finish = finish.max(1);
        self
    }

    pub fn check<F>(mut self, check: F) -> Self
    where
        F: FnMut(&str) -> bool + 'a,
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

    pub fn buffer(&self) -> &EditorBuffer {
        &self.buffer
    }

    fn reject(&mut self) -> Flow<String> {
        self.events.emit(Event::Reject);
        Flow::Reject
    }

    fn edit(&mut self, changed: bool) -> Flow<String> {
        if changed { Flow::Continue } else { self.reject() }
    }

    fn enter(&mut self) -> Flow<String> {
        if !self.buffer.is_multiline() {
            return self.submit();
        }
        let trail = self.finish - 1;
        let count = self.buffer.line_count();
        let ready = self.buffer.is_at_end()
            && count > trail
            && (count - trail..count).all(|i| self.buffer.line(i).is_some_and(|l| l.is_empty()));
        if !ready {
            let changed = self.buffer.insert("\n", &mut self.events);
            return self.edit(changed);
        }
        if trail > 0 {
            self.buffer.trim_trailing_lines(trail, &mut self.events);
        }
        self.submit()
    }

    fn submit(&mut self) -> Flow<String> {
        let mut value = self.buffer.value();
        if value.is_empty() {
            if let Some(default) = &self.default {
                value = default.clone();
            }
        }
        if let Some(check) = self.check.as_mut() {
            if !check(&value) {
                debug!("input rejected by check");
                self.warning = Some("invalid value".to_string());
                return self.reject();
            }
        }
        self.events.emit(Event::Submit);
        self.committed = Some(value.clone());
        Flow::Done(value)
    }

    /// Text as displayed.
    fn display(&self, text: &str, theme: &Theme) -> String {
        if self.conceal {
            text.chars().map(|_| theme.symbols.conceal).collect()
        } else {
            text.to_string()
        }
    }

    fn display_column(&self, theme: &Theme) -> usize {
        if self.conceal {
            self.buffer.cursor().1 * char_width(theme.symbols.conceal)
        } else {
            self.buffer.cursor_display_column()
        }
    }

    fn hint(&self) -> String {
        match &self.default {
            Some(default) if self.buffer.is_empty() => format!("({default})"),
            _ => String::new(),
        }
    }
}

impl Widget for Input<'_> {
    type Output = String;

    fn start(&mut self) -> Result<()> {
        if let Some(initial) = self.initial.take() {
            self.buffer.insert(&initial, &mut self.events);
        }
        Ok(())
    }

    fn handle(&mut self, key: KeyEvent) -> Result<Flow<String>> {
        self.warning = None;
        let events = &mut self.events;
        let flow = match key {
            KeyEvent::Char(c) => {
                let changed = self.buffer.insert(c.encode_utf8(&mut [0; 4]), events);
                self.edit(changed)
            }
            KeyEvent::Backspace => {
                let changed = self.buffer.delete_backward(events);
                self.edit(changed)
            }
            KeyEvent::Delete => {
                let changed = self.buffer.delete_forward(events);
                self.edit(changed)
            }
            KeyEvent::Left | KeyEvent::Right | KeyEvent::Up | KeyEvent::Down => {
                let direction = match key {
                    KeyEvent::Left => Direction::Left,
                    KeyEvent::Right => Direction::Right,
                    KeyEvent::Up => Direction::Up,
                    _ => Direction::Down,
                };
                let changed = self.buffer.move_cursor(direction, events);
                self.edit(changed)
            }
            KeyEvent::WordLeft | KeyEvent::WordRight => {
                let changed = self.buffer.jump_word(key == KeyEvent::WordLeft, events);
                self.edit(changed)
            }
            KeyEvent::Home => {
                let changed = self.buffer.home(events);
                self.edit(changed)
            }
            KeyEvent::End => {
                let changed = self.buffer.end(events);
                self.edit(changed)
            }
            KeyEvent::Tab => {
                let changed = self.buffer.indent(events);
                self.edit(changed)
            }
            KeyEvent::Enter => self.enter(),
            KeyEvent::Interrupt | KeyEvent::EndOfInput => Flow::Cancel,
            _ => Flow::Continue,
        };
        Ok(flow)
    }

    fn frame(&self, theme: &Theme, _width: usize) -> Frame {
        let info = self.events.info().get().unwrap_or("");
        let hint = self.hint();
        let column = self.display_column(theme);

        let (mut lines, cursor) = if self.buffer.is_multiline() {
            let (header, _) = stage::header(theme, &self.prompt, info, &hint);
            let mut lines = vec![header];
            lines.extend(self.buffer.lines().iter().map(|l| Line::plain(&self.display(l, theme))));
            (lines, Cursor::new(self.buffer.cursor().0 + 1, column))
        } else {
            let (mut header, start) = stage::header(theme, &self.prompt, info, "");
            header.push(" ", "");
            header.push(&self.display(&self.buffer.value(), theme), "");
            if !hint.is_empty() {
                header.push(" ", "");
                header.push(&hint, &theme.palette.hint);
            }
            (vec![header], Cursor::new(0, start + 1 + column))
        };

        if let Some(warning) = &self.warning {
            lines.push(stage::warning(theme, warning));
        }
        Frame::new(lines, cursor)
    }

    fn summary(&self, theme: &Theme, _width: usize) -> Frame {
        let value = self.committed.as_deref().unwrap_or("");
        stage::summary(theme, &self.prompt, &self.display(value, theme))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> Theme {
        Theme::new("plain", "")
    }

    fn feed(input: &mut Input<'_>, keys: &[KeyEvent]) -> Vec<Flow<String>> {
        keys.iter().map(|&k| input.handle(k).unwrap()).collect()
    }

    fn typed(input: &mut Input<'_>, text: &str) -> Vec<Flow<String>> {
        KeyEvent::typed(text).into_iter().map(|k| input.handle(k).unwrap()).collect()
    }

    #[test]
    fn ping_pong() {
        let mut input = Input::new("ping?");
        let flows = typed(&mut input, "pong\n");
        assert_eq!(flows.last(), Some(&Flow::Done("pong".to_string())));
    }

    #[test]
    fn initial_value_is_inserted_on_start() {
        let mut seen = Vec::new();
        {
            let mut input = Input::new("name:").value("bob").on_event(|e, _| seen.push(e.clone()));
            input.start().unwrap();
            assert_eq!(input.buffer().cursor(), (0, 3));
        }
        assert_eq!(seen, vec![Event::Insert { text: "bob".into(), len: 3 }]);
    }

    #[test]
    fn default_on_empty_submit() {
        let mut input = Input::new("name:").default_value("anon");
        assert_eq!(feed(&mut input, &[KeyEvent::Enter]), vec![Flow::Done("anon".to_string())]);
    }

    #[test]
    fn limit_rejects_whole_key() {
        let mut input = Input::new("pin:").limits(EditorLimits { chars: Some(2), lines: None });
        let flows = typed(&mut input, "abc");
        assert_eq!(flows[2], Flow::Reject);
        assert_eq!(input.buffer().value(), "ab");
    }

    #[test]
    fn failed_check_shows_warning() {
        let mut input = Input::new("age:").check(|v| v.parse::<u8>().is_ok());
        let flows = typed(&mut input, "x\n");
        assert_eq!(flows[1], Flow::Reject);
        assert_eq!(input.frame(&plain(), 80).text(), "age: x\ninvalid value");
        let flows = feed(&mut input, &[KeyEvent::Backspace, KeyEvent::Char('7'), KeyEvent::Enter]);
        assert_eq!(flows[2], Flow::Done("7".to_string()));
    }

    #[test]
    fn single_line_tab_rejected() {
        let mut input = Input::new(">");
        assert_eq!(feed(&mut input, &[KeyEvent::Tab]), vec![Flow::Reject]);
    }

    #[test]
    fn multi_line_finish_trail() {
        let mut input = Input::new("note:").multiline(true);
        let flows = typed(&mut input, "one\ntwo\n");
        assert!(flows.iter().all(|f| *f == Flow::Continue));
        let flows = feed(&mut input, &[KeyEvent::Enter]);
        assert_eq!(flows[0], Flow::Done("one\ntwo".to_string()));
    }

    #[test]
    fn multi_line_enter_mid_buffer_breaks_line() {
        let mut input = Input::new("note:").multiline(true);
        typed(&mut input, "ab\n");
        feed(&mut input, &[KeyEvent::Up, KeyEvent::Enter]);
        assert_eq!(input.buffer().value(), "\nab\n");
    }

    #[test]
    fn multi_line_tab_indents() {
        let mut input = Input::new("code:").multiline(true).indent(2);
        feed(&mut input, &[KeyEvent::Tab, KeyEvent::Char('x')]);
        assert_eq!(input.buffer().value(), "  x");
    }

    #[test]
    fn finish_of_one_submits_at_end() {
        let mut input = Input::new("note:").multiline(true).finish(1);
        let flows = typed(&mut input, "a\n");
        assert_eq!(flows[1], Flow::Done("a".to_string()));
    }

    #[test]
    fn conceal_hides_runes() {
        let mut input = Input::new("password:").conceal(true);
        typed(&mut input, "hunter2");
        let frame = input.frame(&plain(), 80);
        assert_eq!(frame.text(), "password: *******");
        assert_eq!(frame.cursor(), Cursor::new(0, 17));
        feed(&mut input, &[KeyEvent::Enter]);
        assert_eq!(input.summary(&plain(), 80).text(), "password: *******");
    }

    #[test]
    fn frame_sanitizes_typed_text() {
        let mut input = Input::new(">");
        input.start().unwrap();
        for c in "a\x1b[2Jb".chars() {
            input.handle(KeyEvent::Char(c)).unwrap();
        }
        let frame = input.frame(&plain(), 80);
        assert_eq!(frame.text(), "> ab");
        assert_eq!(frame.cursor(), Cursor::new(0, 4));
    }

    #[test]
    fn default_shown_as_hint() {
        let input = Input::new("name:").default_value("anon");
        assert_eq!(input.frame(&plain(), 80).text(), "name:  (anon)");
    }

    #[test]
    fn multi_line_frame_cursor() {
        let mut input = Input::new("note:").multiline(true);
        typed(&mut input, "ab\nc");
        let frame = input.frame(&plain(), 80);
        assert_eq!(frame.text(), "note:\nab\nc");
        assert_eq!(frame.cursor(), Cursor::new(2, 1));
    }

    #[test]
    fn word_jumps() {
        let mut input = Input::new(">");
        typed(&mut input, "hello world");
        feed(&mut input, &[KeyEvent::WordLeft]);
        assert_eq!(input.buffer().cursor(), (0, 6));
        assert_eq!(feed(&mut input, &[KeyEvent::WordRight, KeyEvent::WordRight]), vec![Flow::Continue, Flow::Reject]);
    }
}
