//! Unix terminal backend on libc termios.
//!
//! Keys are read from stdin with `poll(2)` so an incomplete escape sequence
//! can be resolved after a short timeout. Frames are drawn on stderr, which
//! keeps stdout free for the committed value.
//!
//! SIGWINCH is installed without `SA_RESTART`: a resize interrupts the
//! blocking `poll` with `EINTR` and is reported as [`KeyEvent::Resize`]
//! in order with surrounding key presses.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::os::unix::io::RawFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::input::{InputParser, KeyEvent};

use super::{terminal_device, Backend};

const STDIN: RawFd = 0;
const STDERR: RawFd = 2;
const DEFAULT_WIDTH: u16 = 80;

/// Set by the SIGWINCH handler, cleared when the resize is delivered.
static RESIZED: AtomicBool = AtomicBool::new(false);

extern "C" fn on_winch(_signal: libc::c_int) {
    RESIZED.store(true, Ordering::Relaxed);
}

/// termios-backed terminal.
pub struct TermiosTerminal {
    original: Option<libc::termios>,
    previous_winch: Option<libc::sigaction>,
    parser: InputParser,
    pending: VecDeque<KeyEvent>,
    escape_timeout: Duration,
}

impl TermiosTerminal {
    /// Fails with [`Error::NotATerminal`] unless stdin and stderr are TTYs.
    pub fn new(escape_timeout: Duration) -> Result<Self> {
        let tty = unsafe { libc::isatty(STDIN) == 1 && libc::isatty(STDERR) == 1 };
        if !tty {
            return Err(Error::NotATerminal);
        }
        Ok(Self {
            original: None,
            previous_winch: None,
            parser: InputParser::new(),
            pending: VecDeque::new(),
            escape_timeout,
        })
    }

    fn install_winch(&mut self) -> Result<()> {
        unsafe {
            let mut action: libc::sigaction = std::mem::zeroed();
            action.sa_sigaction = on_winch as extern "C" fn(libc::c_int) as libc::sighandler_t;
            action.sa_flags = 0;
            libc::sigemptyset(&mut action.sa_mask);
            let mut previous: libc::sigaction = std::mem::zeroed();
            if libc::sigaction(libc::SIGWINCH, &action, &mut previous) != 0 {
                return Err(io::Error::last_os_error().into());
            }
            self.previous_winch = Some(previous);
        }
        RESIZED.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn restore_winch(&mut self) -> Result<()> {
        if let Some(previous) = self.previous_winch.take() {
            let rc = unsafe { libc::sigaction(libc::SIGWINCH, &previous, std::ptr::null_mut()) };
            if rc != 0 {
                return Err(io::Error::last_os_error().into());
            }
        }
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        let rc = unsafe { libc::ioctl(STDERR, libc::TIOCGWINSZ, &mut ws) };
        if rc != 0 || ws.ws_col == 0 {
            return (DEFAULT_WIDTH, ws.ws_row);
        }
        (ws.ws_col, ws.ws_row)
    }

    /// Wait for input readiness. `Ok(false)` on timeout or interruption.
    fn wait_readable(&self, timeout: Option<Duration>) -> Result<bool> {
        let mut fds = libc::pollfd { fd: STDIN, events: libc::POLLIN, revents: 0 };
        let millis = match timeout {
            Some(t) => t.as_millis().min(i32::MAX as u128) as libc::c_int,
            None => -1,
        };
        let rc = unsafe { libc::poll(&mut fds, 1, millis) };
        if rc < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(false);
            }
            return Err(err.into());
        }
        Ok(rc > 0)
    }

    fn read_chunk(&mut self) -> Result<()> {
        let mut buf = [0u8; 256];
        let n = unsafe { libc::read(STDIN, buf.as_mut_ptr().cast(), buf.len()) };
        if n < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(());
            }
            return Err(err.into());
        }
        if n == 0 {
            return Err(Error::InputClosed);
        }
        let bytes = &buf[..n as usize];
        trace!(len = bytes.len(), "read input bytes");
        let keys = self.parser.parse(bytes);
        self.pending.extend(keys.into_iter().filter_map(KeyEvent::from_raw));
        Ok(())
    }
}

impl Backend for TermiosTerminal {
    fn device(&self) -> &AtomicBool {
        terminal_device()
    }

    fn enter_raw(&mut self) -> Result<()> {
        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(STDIN, &mut termios) != 0 {
                return Err(io::Error::last_os_error().into());
            }
            self.original = Some(termios);

            termios.c_iflag &= !(libc::IGNBRK | libc::BRKINT | libc::PARMRK | libc::ISTRIP
                | libc::INLCR | libc::IGNCR | libc::ICRNL | libc::IXON);
            termios.c_oflag &= !libc::OPOST;
            termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
            termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
            termios.c_cflag |= libc::CS8;
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;

            if libc::tcsetattr(STDIN, libc::TCSAFLUSH, &termios) != 0 {
                self.original = None;
                return Err(io::Error::last_os_error().into());
            }
        }

        if let Err(err) = self.install_winch() {
            let _ = self.leave_raw();
            return Err(err);
        }
        debug!("termios raw mode entered");
        Ok(())
    }

    fn leave_raw(&mut self) -> Result<()> {
        let winch = self.restore_winch();
        if let Some(original) = self.original.take() {
            if unsafe { libc::tcsetattr(STDIN, libc::TCSAFLUSH, &original) } != 0 {
                return Err(io::Error::last_os_error().into());
            }
            debug!("termios mode restored");
        }
        winch
    }

    fn read_event(&mut self) -> Result<KeyEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(event);
            }
            if RESIZED.swap(false, Ordering::Relaxed) {
                let (width, height) = self.size();
                return Ok(KeyEvent::Resize { width, height });
            }

            let timeout = self.parser.has_pending().then_some(self.escape_timeout);
            if self.wait_readable(timeout)? {
                self.read_chunk()?;
            } else if timeout.is_some() && !RESIZED.load(Ordering::Relaxed) {
                let keys = self.parser.flush_pending();
                self.pending.extend(keys.into_iter().filter_map(KeyEvent::from_raw));
            }
        }
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        let mut err = io::stderr().lock();
        err.write_all(bytes)?;
        err.flush()?;
        Ok(())
    }

    fn width(&self) -> u16 {
        self.size().0
    }
}
