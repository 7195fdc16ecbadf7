use std::{
    fs,
    io::{self, BufRead, BufReader, Read},
    path::{Path, PathBuf},
    thread::{self, JoinHandle},
};

use crossbeam::channel::{Receiver, Sender};
use log::debug;
use xz2::read::XzDecoder;

use crate::{cache::Page, error::LoadError};

pub type PageBlock = Result<Vec<Page>, LoadError>;

/// A page trace streamed from disk by a reader thread.
///
/// The file holds one decimal page number per line; blank lines are skipped.
/// Paths ending in `.xz` are decompressed on the fly. The channel closes once
/// the whole file has been sent or after the first error.
pub struct Trace {
    pub rec: Receiver<PageBlock>,
    _thread: JoinHandle<()>,
}

impl Trace {
    pub fn read(
        path: PathBuf,
        pages_per_block: usize,
        blocks_per_queue: usize,
    ) -> io::Result<Trace> {
        let stream = fs::File::open(&path)?;
        let reader: Box<dyn Read + Send> = if is_xz(&path) {
            Box::new(XzDecoder::new(stream))
        } else {
            Box::new(stream)
        };
        Ok(Trace::from_reader(reader, pages_per_block, blocks_per_queue))
    }

    pub fn from_reader<R: Read + Send + 'static>(
        reader: R,
        pages_per_block: usize,
        blocks_per_queue: usize,
    ) -> Trace {
        let (sender, receiver) = crossbeam::channel::bounded(blocks_per_queue);
        let pages_per_block = pages_per_block.max(1);
        let t = thread::spawn(move || Trace::run_thread(reader, pages_per_block, sender));

        Trace {
            rec: receiver,
            _thread: t,
        }
    }

    fn run_thread<R: Read>(reader: R, pages_per_block: usize, queue: Sender<PageBlock>) {
        let mut block = Vec::with_capacity(pages_per_block);
        for (idx, line) in BufReader::new(reader).lines().enumerate() {
            let parsed = line
                .map_err(LoadError::from)
                .and_then(|line| parse_line(idx + 1, &line));
            match parsed {
                Ok(None) => {}
                Ok(Some(page)) => {
                    block.push(page);
                    if block.len() == pages_per_block {
                        if queue.send(Ok(std::mem::take(&mut block))).is_err() {
                            return;
                        }
                    }
                }
                Err(err) => {
                    let _ = queue.send(Err(err));
                    return;
                }
            }
        }
        if !block.is_empty() {
            let _ = queue.send(Ok(block));
        }
    }

    /// Drains the whole trace.
    pub fn pages(self) -> Result<Vec<Page>, LoadError> {
        let mut pages = Vec::new();
        for block in self.rec.iter() {
            pages.extend(block?);
        }
        debug!("loaded {} page references", pages.len());
        Ok(pages)
    }
}

fn is_xz(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "xz")
}

fn parse_line(line: usize, text: &str) -> Result<Option<Page>, LoadError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse().map(Some).map_err(|_| LoadError::BadPage {
        line,
        text: trimmed.to_string(),
    })
}
