//! Entry point for running widgets.
//!
//! A [`Prompter`] carries the theme and terminal settings. Each run opens a
//! session, drives one widget and closes the session again, whatever the
//! outcome.
//!
//! ```no_run
//! use spark_prompt::{Input, Outcome, Prompter};
//!
//! let prompter = Prompter::new();
//! match prompter.prompt(&mut Input::new("name?"))? {
//!     Outcome::Committed(name) => println!("hello {name}"),
//!     Outcome::Cancelled => {}
//! }
//! # Ok::<(), spark_prompt::Error>(())
//! ```

use std::ops::{Deref, DerefMut};

use tracing::debug;

use crate::config::PromptConfig;
use crate::error::Result;
use crate::session::{open_terminal, Backend, Session};
use crate::theme::Theme;
use crate::widgets::{drive, Outcome, Widget};

#[derive(Debug, Clone, Default)]
pub struct Prompter {
    theme: Theme,
    config: PromptConfig,
}

impl Prompter {
    /// Default theme, automatic backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Theme and backend from a loaded config.
    pub fn from_config(config: PromptConfig) -> Result<Self> {
        let theme = config.theme()?;
        Ok(Self { theme, config })
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn config(&self) -> &PromptConfig {
        &self.config
    }

    /// Use `theme` until the returned guard is dropped.
    pub fn scoped_theme(&mut self, theme: Theme) -> ScopedTheme<'_> {
        let previous = std::mem::replace(&mut self.theme, theme);
        ScopedTheme { prompter: self, previous: Some(previous) }
    }

    /// Run `widget` on the process's terminal.
    pub fn prompt<W: Widget + ?Sized>(&self, widget: &mut W) -> Result<Outcome<W::Output>> {
        let session = open_terminal(self.config.backend, self.config.escape_timeout())?;
        self.finish(session, widget)
    }

    /// Run `widget` on a session opened over `backend`.
    pub fn run_with<B: Backend, W: Widget + ?Sized>(&self, backend: B, widget: &mut W) -> Result<Outcome<W::Output>> {
        let session = Session::open(backend)?;
        self.finish(session, widget)
    }

    /// Run `widget` on a session the caller keeps open.
    pub fn run<B: Backend, W: Widget + ?Sized>(
        &self,
        session: &mut Session<B>,
        widget: &mut W,
    ) -> Result<Outcome<W::Output>> {
        debug!(theme = %self.theme.name, "running widget");
        drive(session, widget, &self.theme)
    }

    fn finish<B: Backend, W: Widget + ?Sized>(
        &self,
        mut session: Session<B>,
        widget: &mut W,
    ) -> Result<Outcome<W::Output>> {
        let outcome = self.run(&mut session, widget);
        let closed = session.close();
        let outcome = outcome?;
        closed?;
        Ok(outcome)
    }
}

/// Restores the previous theme on drop.
pub struct ScopedTheme<'p> {
    prompter: &'p mut Prompter,
    previous: Option<Theme>,
}

impl Deref for ScopedTheme<'_> {
    type Target = Prompter;

    fn deref(&self) -> &Prompter {
        self.prompter
    }
}

impl DerefMut for ScopedTheme<'_> {
    fn deref_mut(&mut self) -> &mut Prompter {
        self.prompter
    }
}

impl Drop for ScopedTheme<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.prompter.theme = previous;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyEvent;
    use crate::session::scripted::ScriptedTerminal;
    use crate::theme::{dracula, mono};
    use crate::widgets::Input;

    #[test]
    fn scoped_theme_reverts() {
        let mut prompter = Prompter::new();
        {
            let scoped = prompter.scoped_theme(mono());
            assert_eq!(scoped.theme().name, "mono");
        }
        assert_eq!(prompter.theme().name, "terminal");
    }

    #[test]
    fn scoped_theme_reverts_on_error() {
        let mut prompter = Prompter::new();
        let term = ScriptedTerminal::new(80);
        term.type_text("abc");
        let result = {
            let scoped = prompter.scoped_theme(dracula());
            scoped.run_with(term.clone(), &mut Input::new("?"))
        };
        assert!(result.is_err());
        assert_eq!(prompter.theme().name, "terminal");
        assert_eq!(term.restore_count(), 1);
    }

    #[test]
    fn nested_scopes_unwind_in_order() {
        let mut prompter = Prompter::new();
        {
            let mut outer = prompter.scoped_theme(mono());
            {
                let inner = outer.scoped_theme(dracula());
                assert_eq!(inner.theme().name, "dracula");
            }
            assert_eq!(outer.theme().name, "mono");
        }
        assert_eq!(prompter.theme().name, "terminal");
    }

    #[test]
    fn run_with_closes_session() {
        let prompter = Prompter::new();
        let term = ScriptedTerminal::new(80);
        term.type_text("hi");
        term.push(KeyEvent::Enter);
        let outcome = prompter.run_with(term.clone(), &mut Input::new("?")).unwrap();
        assert_eq!(outcome, Outcome::Committed("hi".to_string()));
        assert_eq!(term.enter_count(), 1);
        assert_eq!(term.restore_count(), 1);
    }

    #[test]
    fn theme_styles_reach_output() {
        let prompter = Prompter::from_config(PromptConfig { theme: "mono".into(), ..Default::default() }).unwrap();
        let term = ScriptedTerminal::new(80);
        term.push(KeyEvent::Interrupt);
        prompter.run_with(term.clone(), &mut Input::new("name")).unwrap();
        assert!(term.output_string().contains("\x1b[1mname\x1b[0m"));
    }
}
