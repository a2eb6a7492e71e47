use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Checks that a file decodes as UTF-8.
///
/// Reads the whole file; any I/O error counts as a failed check.
pub fn is_utf8_file<P: AsRef<Path>>(path: P) -> bool {
	match std::fs::read(path) {
		Ok(bytes) => std::str::from_utf8(&bytes).is_ok(),
		Err(_) => false,
	}
}

/// Collects all valid corpus files under `dir`, recursively.
///
/// A file qualifies when it has a `.txt` extension and decodes as UTF-8.
/// Files failing the decode check are skipped with a warning, never fatal.
///
/// # Ordering
/// Within each directory, files come first (name order), then
/// subdirectories (name order) are descended into. This keeps the walk
/// order stable across platforms.
pub fn collect_corpus_files<P: AsRef<Path>>(dir: P) -> io::Result<Vec<PathBuf>> {
	let mut files = Vec::new();
	walk_dir(dir.as_ref(), &mut files)?;
	Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
	let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
		.map(|entry| entry.map(|e| e.path()))
		.collect::<io::Result<Vec<_>>>()?;
	entries.sort();

	let mut subdirs = Vec::new();
	for path in entries {
		if path.is_dir() {
			subdirs.push(path);
		} else if path.extension() == Some(std::ffi::OsStr::new("txt")) {
			if is_utf8_file(&path) {
				files.push(path);
			} else {
				log::warn!("skipping non-UTF-8 file {}", path.display());
			}
		}
	}

	for subdir in subdirs {
		walk_dir(&subdir, files)?;
	}
	Ok(())
}

/// An ordered source of raw text lines, selected once at startup.
///
/// Two variants exist: the concatenated line stream of a corpus
/// directory, or standard input. Both yield lines **with** their trailing
/// newline, which the trainer's carry-over depends on.
pub enum LineSource {
	/// Lines of the collected corpus files, concatenated in walk order.
	Files(FileLines),
	/// Lines read from standard input.
	Stdin(io::StdinLock<'static>),
}

impl LineSource {
	/// Builds a line source over all valid corpus files under `dir`.
	pub fn from_dir<P: AsRef<Path>>(dir: P) -> io::Result<Self> {
		let files = collect_corpus_files(dir)?;
		log::info!("corpus: {} file(s)", files.len());
		Ok(Self::Files(FileLines::new(files)))
	}

	/// Builds a line source over standard input.
	pub fn stdin() -> Self {
		Self::Stdin(io::stdin().lock())
	}
}

impl Iterator for LineSource {
	type Item = io::Result<String>;

	fn next(&mut self) -> Option<Self::Item> {
		match self {
			Self::Files(lines) => lines.next(),
			Self::Stdin(lock) => read_one_line(lock),
		}
	}
}

/// Iterator over the lines of a list of files, in order.
///
/// Files are opened lazily, one at a time.
pub struct FileLines {
	files: std::vec::IntoIter<PathBuf>,
	current: Option<BufReader<File>>,
}

impl FileLines {
	fn new(files: Vec<PathBuf>) -> Self {
		Self { files: files.into_iter(), current: None }
	}
}

impl Iterator for FileLines {
	type Item = io::Result<String>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			if let Some(reader) = &mut self.current {
				match read_one_line(reader) {
					Some(line) => return Some(line),
					None => self.current = None,
				}
			} else {
				match self.files.next() {
					Some(path) => match File::open(&path) {
						Ok(file) => self.current = Some(BufReader::new(file)),
						Err(err) => return Some(Err(err)),
					},
					None => return None,
				}
			}
		}
	}
}

/// Reads one line, preserving the trailing newline. `None` at end of input.
fn read_one_line<R: BufRead>(reader: &mut R) -> Option<io::Result<String>> {
	let mut line = String::new();
	match reader.read_line(&mut line) {
		Ok(0) => None,
		Ok(_) => Some(Ok(line)),
		Err(err) => Some(Err(err)),
	}
}
