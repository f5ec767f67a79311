use anyhow::Result;
use std::cell::RefCell;
use std::fmt::Display;
use std::io::{Result as IoResult, Write};
use std::rc::Rc;

/// Memory-backed writer for capturing console emissions.
pub struct MemWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    pub fn new() -> Self {
        Self {
            buf: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Convenience: create writer and return (writer, handle to the collected bytes).
    pub fn with_handle() -> (Self, Captured) {
        let mw = MemWriter::new();
        let handle = Captured(mw.buf.clone());
        (mw, handle)
    }
}

impl Default for MemWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}

/// Read side of a [`MemWriter`], kept by whoever wants to inspect the output.
#[derive(Clone)]
pub struct Captured(Rc<RefCell<Vec<u8>>>);

impl Captured {
    /// Everything written so far, lossily decoded.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    /// Everything written so far, one entry per line.
    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(str::to_owned).collect()
    }

    /// Drop what was collected so far.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// Line-oriented sink that instances emit to.
///
/// Cloning a `Console` yields another handle to the same sink, so a constructor
/// can hand one to every closure it builds.
#[derive(Clone)]
pub struct Console {
    sink: Rc<RefCell<Box<dyn Write>>>,
}

impl Console {
    pub fn new(sink: impl Write + 'static) -> Self {
        Self {
            sink: Rc::new(RefCell::new(Box::new(sink))),
        }
    }

    /// Console writing to the process' standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    /// Console writing into memory, plus the handle to read it back.
    pub fn capture() -> (Self, Captured) {
        let (writer, captured) = MemWriter::with_handle();
        (Self::new(writer), captured)
    }

    /// Write `line` followed by a newline.
    pub fn emit(&self, line: impl Display) -> Result<()> {
        let mut sink = self.sink.borrow_mut();
        writeln!(sink, "{}", line)?;
        sink.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Console")
    }
}
