use std::{
    collections::BTreeMap,
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};

/// A generated document held in memory until flushed.
pub struct Mem {
    pub path: PathBuf,
    pub data: Vec<u8>,
}

pub type MemFlush = Arc<dyn Fn(&Mem) + Sync + Send>;

/// Generated output, written either to disk or to a [`MemFlush`] callback.
pub enum OutputFile {
    Disk(std::fs::File),
    Mem { state: Mem, flush: MemFlush },
}

impl OutputFile {
    /// Creates `path` on disk, or buffers in memory when `mem` is given.
    pub fn create<P: Into<PathBuf>>(
        path: P,
        mem: Option<MemFlush>,
    ) -> std::io::Result<Self> {
        let path = path.into();
        Ok(match mem {
            None => Self::Disk(std::fs::File::create(path)?),
            Some(flush) => {
                Self::Mem {
                    state: Mem { path, data: vec![] },
                    flush,
                }
            },
        })
    }
}

impl Write for OutputFile {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> std::io::Result<usize> {
        match self {
            Self::Disk(f) => f.write(buf),
            Self::Mem { state, .. } => {
                state.data.extend_from_slice(buf);
                Ok(buf.len())
            },
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Self::Disk(f) => f.flush(),
            Self::Mem { state, flush } => {
                flush(state);
                Ok(())
            },
        }
    }
}

/// Collects in-memory output by path; later flushes of a path replace earlier
/// ones.
#[derive(Default, Clone)]
pub struct MemCollector {
    files: Arc<Mutex<BTreeMap<PathBuf, Vec<u8>>>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mem_flush(&self) -> MemFlush {
        let files = self.files.clone();
        Arc::new(move |mem: &Mem| {
            tracing::trace!("flush {} bytes to {}", mem.data.len(), mem.path.display());
            locked(&files).insert(mem.path.clone(), mem.data.clone());
        })
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        locked(&self.files)
            .keys()
            .cloned()
            .collect()
    }

    pub fn read_to_string<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Option<String> {
        locked(&self.files)
            .get(path.as_ref())
            .map(|data| String::from_utf8_lossy(data).into_owned())
    }
}
