use std::io::{self, Write};

/// Destination for rendered problem lines.
pub trait OutputSink {
    /// Append one line. It must be visible to the next read of the sink.
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

/// Collects lines in memory.
impl OutputSink for Vec<String> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// Writes newline-terminated lines to any `io::Write`, flushing after each one.
pub struct IoSink<W: Write> {
    writer: W,
}

impl<W: Write> IoSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl IoSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> OutputSink for IoSink<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{line}")?;
        self.writer.flush()
    }
}
