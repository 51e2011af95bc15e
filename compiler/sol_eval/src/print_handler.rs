//! Output sink of a session.
//!
//! Auto-printed results, `print` statements and diagnostics all go through
//! one handler, so embedding code and tests decide where output lands:
//! - `Stdout`: the terminal
//! - `Buffer`: captured in memory
//! - `Silent`: discarded

use std::sync::Arc;

use parking_lot::Mutex;

/// Captures output in memory.
#[derive(Default)]
pub struct BufferPrintHandler {
    buffer: Mutex<String>,
}

impl BufferPrintHandler {
    pub fn new() -> Self {
        BufferPrintHandler::default()
    }

    fn println(&self, msg: &str) {
        let mut buf = self.buffer.lock();
        buf.push_str(msg);
        buf.push('\n');
    }

    fn output(&self) -> String {
        self.buffer.lock().clone()
    }

    fn take(&self) -> String {
        std::mem::take(&mut *self.buffer.lock())
    }
}

/// Where output goes. Enum dispatch keeps the hot printing path static.
pub enum PrintHandler {
    Stdout,
    Buffer(BufferPrintHandler),
    Silent,
}

impl PrintHandler {
    /// Print one line.
    pub fn println(&self, msg: &str) {
        match self {
            PrintHandler::Stdout => println!("{msg}"),
            PrintHandler::Buffer(h) => h.println(msg),
            PrintHandler::Silent => {}
        }
    }

    /// Everything captured so far; empty unless buffering.
    pub fn output(&self) -> String {
        match self {
            PrintHandler::Buffer(h) => h.output(),
            PrintHandler::Stdout | PrintHandler::Silent => String::new(),
        }
    }

    /// Return the captured output and clear the buffer.
    pub fn take_output(&self) -> String {
        match self {
            PrintHandler::Buffer(h) => h.take(),
            PrintHandler::Stdout | PrintHandler::Silent => String::new(),
        }
    }
}

pub type SharedPrintHandler = Arc<PrintHandler>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Stdout)
}

pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Buffer(BufferPrintHandler::new()))
}

pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Silent)
}

#[cfg(test)]
mod tests;
