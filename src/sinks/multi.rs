//! Fan-out sink duplicating every record to each child sink

use crate::core::{LoggerError, Result, Sink};

#[derive(Default)]
pub struct MultiSink {
    sinks: Vec<Box<dyn Sink>>,
}

impl MultiSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: Box<dyn Sink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Names of the child sinks, in write order
    pub fn names(&self) -> Vec<&str> {
        self.sinks.iter().map(|sink| sink.name()).collect()
    }

    /// Run `op` on every child; a failing child does not stop the others.
    fn for_each<F>(&mut self, mut op: F) -> Result<()>
    where
        F: FnMut(&mut dyn Sink) -> Result<()>,
    {
        let mut failures = Vec::new();
        for sink in self.sinks.iter_mut() {
            if let Err(e) = op(sink.as_mut()) {
                failures.push(format!("{}: {}", sink.name(), e));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(LoggerError::writer(failures.join("; ")))
        }
    }
}

impl std::fmt::Debug for MultiSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiSink")
            .field("sinks", &self.names())
            .finish()
    }
}

impl Sink for MultiSink {
    fn write(&mut self, buf: &[u8]) -> Result<()> {
        self.for_each(|sink| sink.write(buf))
    }

    fn flush(&mut self) -> Result<()> {
        self.for_each(|sink| sink.flush())
    }

    fn name(&self) -> &str {
        "multi"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::BufferSink;

    struct FailingSink;

    impl Sink for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> Result<()> {
            Err(LoggerError::writer("Simulated failure"))
        }

        fn flush(&mut self) -> Result<()> {
            Err(LoggerError::writer("Simulated flush failure"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn test_write_fans_out() {
        let first = BufferSink::new();
        let second = BufferSink::new();

        let mut multi = MultiSink::new();
        multi.push(Box::new(first.clone()));
        multi.push(Box::new(second.clone()));

        multi.write(b"entry\n").unwrap();

        assert_eq!(first.contents(), "entry\n");
        assert_eq!(second.contents(), "entry\n");
    }

    #[test]
    fn test_failing_child_does_not_block_others() {
        let healthy = BufferSink::new();

        let mut multi = MultiSink::new();
        multi.push(Box::new(FailingSink));
        multi.push(Box::new(healthy.clone()));

        let err = multi.write(b"entry\n").unwrap_err();
        assert!(err.to_string().contains("failing: Writer error: Simulated failure"));
        assert_eq!(healthy.contents(), "entry\n");
        assert!(multi.flush().is_err());
    }

    #[test]
    fn test_empty_multi_sink_is_noop() {
        let mut multi = MultiSink::new();
        assert!(multi.is_empty());
        assert!(multi.write(b"dropped\n").is_ok());
        assert!(multi.flush().is_ok());
    }
}
