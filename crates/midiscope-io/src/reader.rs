//! Blocking byte source over any `Read`.

use midiscope_wire::{ByteSource, SourceError};
use std::io::{ErrorKind, Read};

const DEFAULT_CHUNK: usize = 1024;

/// Reads in chunks and hands bytes out one at a time.
///
/// `read` returning 0 is end-of-stream. Interrupted reads are retried.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    buf: Box<[u8]>,
    pos: usize,
    len: usize,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, DEFAULT_CHUNK)
    }

    pub fn with_chunk_size(reader: R, chunk: usize) -> Self {
        Self {
            reader,
            buf: vec![0; chunk.max(1)].into_boxed_slice(),
            pos: 0,
            len: 0,
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn fill(&mut self) -> Result<(), SourceError> {
        loop {
            match self.reader.read(&mut self.buf) {
                Ok(0) => return Err(SourceError::EndOfStream),
                Ok(n) => {
                    self.pos = 0;
                    self.len = n;
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn read_byte(&mut self) -> Result<u8, SourceError> {
        if self.pos == self.len {
            self.fill()?;
        }
        let byte = self.buf[self.pos];
        self.pos += 1;
        Ok(byte)
    }
}
