use kmlview_core::error::LoadError;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

type ReadResult = Result<String, LoadError>;

struct Pending {
    path: PathBuf,
    rx: Receiver<ReadResult>,
}

/// Reads one file at a time off the UI thread. Starting a new read drops the
/// receiver of the previous one, so only the latest request is ever delivered.
#[derive(Default)]
pub struct FileLoader {
    pending: Option<Pending>,
}

impl FileLoader {
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn start(&mut self, path: &Path, notify: impl Fn() + Send + 'static) {
        let (tx, rx) = mpsc::channel();
        let thread_path = path.to_path_buf();
        thread::spawn(move || {
            let result = kmlview_import_kml::read_kml_text(&thread_path);
            // The receiver is gone when a newer read superseded this one.
            if tx.send(result).is_ok() {
                notify();
            }
        });
        tracing::debug!(path = %path.display(), "started file read");
        self.pending = Some(Pending {
            path: path.to_path_buf(),
            rx,
        });
    }

    /// Returns the finished read once, or `None` while still reading.
    pub fn poll(&mut self) -> Option<(PathBuf, ReadResult)> {
        let pending = self.pending.as_ref()?;
        let result = match pending.rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(LoadError::Read {
                path: pending.path.clone(),
                message: "reader thread exited without a result".to_string(),
            }),
        };
        let pending = self.pending.take()?;
        Some((pending.path, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::{Duration, Instant};

    fn wait(loader: &mut FileLoader) -> (PathBuf, ReadResult) {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(done) = loader.poll() {
                return done;
            }
            assert!(Instant::now() < deadline, "file read did not finish");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn delivers_file_text_once() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<kml/>").unwrap();

        let mut loader = FileLoader::default();
        loader.start(file.path(), || {});
        assert!(loader.is_busy());

        let (path, result) = wait(&mut loader);
        assert_eq!(file.path(), path);
        assert_eq!("<kml/>", result.unwrap());
        assert!(!loader.is_busy());
        assert!(loader.poll().is_none());
    }

    #[test]
    fn newer_read_supersedes_pending_one() {
        let mut first = tempfile::NamedTempFile::new().unwrap();
        first.write_all(b"<first/>").unwrap();
        let mut second = tempfile::NamedTempFile::new().unwrap();
        second.write_all(b"<second/>").unwrap();

        let mut loader = FileLoader::default();
        loader.start(first.path(), || {});
        loader.start(second.path(), || {});

        let (path, result) = wait(&mut loader);
        assert_eq!(second.path(), path);
        assert_eq!("<second/>", result.unwrap());
        assert!(loader.poll().is_none());
    }

    #[test]
    fn read_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = FileLoader::default();
        loader.start(&dir.path().join("missing.kml"), || {});

        let (_, result) = wait(&mut loader);
        assert!(matches!(result, Err(LoadError::Read { .. })));
    }
}
