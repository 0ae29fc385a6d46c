use crate::conf::Conf;
use crate::err::Result;
use crate::unit::pack::read_unit_from_buffer;
use abiml_ir::Corpus;
use indexmap::IndexMap;
use std::io;
use std::path::PathBuf;

/// A container of named entries, each holding one unit document.
pub trait ArchiveSource {
    /// Entry names in read order.
    fn entries(&self) -> io::Result<Vec<String>>;
    fn read_entry(&self, name: &str) -> io::Result<String>;
}

/// A directory on disk; files matching the configured suffix are entries.
/// Entry names are sorted so corpus order is deterministic.
pub struct DirArchive {
    dir: PathBuf,
    suffix: String,
}

impl DirArchive {
    pub fn open(dir: impl Into<PathBuf>, conf: &Conf) -> Self {
        Self { dir: dir.into(), suffix: conf.entry_suffix.clone() }
    }
}

impl ArchiveSource for DirArchive {
    fn entries(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(&self.suffix) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
    fn read_entry(&self, name: &str) -> io::Result<String> {
        std::fs::read_to_string(self.dir.join(name))
    }
}

/// An in-memory archive; entries keep insertion order.
#[derive(Default)]
pub struct MemArchive {
    entries: IndexMap<String, String>,
}

impl MemArchive {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn add(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.entries.insert(name.into(), content.into());
    }
}

impl ArchiveSource for MemArchive {
    fn entries(&self) -> io::Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
    fn read_entry(&self, name: &str) -> io::Result<String> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_owned()))
    }
}

/// Read every entry of `archive` into a corpus keyed by entry name. A bad
/// entry is logged and skipped (or fails the whole read when `strict`); an
/// I/O failure always aborts. Returns the corpus and the number of entries
/// successfully read.
pub fn read_corpus_from_archive(
    archive: &impl ArchiveSource, path: impl Into<String>, conf: &Conf,
) -> Result<(Corpus, usize)> {
    let mut corpus = Corpus::new(path);
    let mut read = 0;
    for name in archive.entries()? {
        let src = archive.read_entry(&name)?;
        match read_unit_from_buffer(&src, &name) {
            | Ok(mut tu) => {
                tu.path = name;
                corpus.units.push(tu);
                read += 1;
            }
            | Err(err) if conf.strict => return Err(err),
            | Err(err) => {
                log::warn!("skipping archive entry `{}`: {}", name, err);
            }
        }
    }
    Ok((corpus, read))
}
