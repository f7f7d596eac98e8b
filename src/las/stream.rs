//! Byte streams that know their position.
//!
//! Readers and writers need to know where they are in the file to
//! compute offsets. Wrapping the inner stream lets sequential sources
//! like pipes or sockets report it too, a [`Seekable`] stream can
//! additionally jump around.

use std::io::{Read, Seek, SeekFrom, Write};

use crate::LasError;

pub trait LasStream {
    /// Number of bytes from the start of the stream
    fn position(&self) -> u64;

    fn can_seek(&self) -> bool;

    /// Moves to an absolute position, fails with [`LasError::NoSeek`] on
    /// sequential streams.
    fn seek_to(&mut self, position: u64) -> crate::Result<()>;

    /// The total length of the stream, when it can be known
    fn stream_len(&mut self) -> crate::Result<Option<u64>>;
}

/// A stream that can seek
#[derive(Debug)]
pub struct Seekable<S> {
    inner: S,
    position: u64,
}

impl<S: Seek> Seekable<S> {
    pub fn new(mut inner: S) -> std::io::Result<Self> {
        let position = inner.seek(SeekFrom::Current(0))?;
        Ok(Self { inner, position })
    }
}

impl<S> Seekable<S> {
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Seek> LasStream for Seekable<S> {
    fn position(&self) -> u64 {
        self.position
    }

    fn can_seek(&self) -> bool {
        true
    }

    fn seek_to(&mut self, position: u64) -> crate::Result<()> {
        self.position = self.inner.seek(SeekFrom::Start(position))?;
        Ok(())
    }

    fn stream_len(&mut self) -> crate::Result<Option<u64>> {
        let len = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(self.position))?;
        Ok(Some(len))
    }
}

impl<S: Read> Read for Seekable<S> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.position += n as u64;
        Ok(n)
    }
}

impl<S: Write> Write for Seekable<S> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.position += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

/// A stream that can only go forward
#[derive(Debug)]
pub struct Sequential<S> {
    inner: S,
    position: u64,
}

impl<S> Sequential<S> {
    /// The position starts at 0
    pub fn new(inner: S) -> Self {
        Self { inner, position: 0 }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S> LasStream for Sequential<S> {
    fn position(&self) -> u64 {
        self.position
    }

    fn can_seek(&self) -> bool {
        false
    }

    fn seek_to(&mut self, _position: u64) -> crate::Result<()> {
        Err(LasError::NoSeek)
    }

    fn stream_len(&mut self) -> crate::Result<Option<u64>> {
        Ok(None)
    }
}

impl<S: Read> Read for Sequential<S> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.position += n as u64;
        Ok(n)
    }
}

impl<S: Write> Write for Sequential<S> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.position += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

/// Moves forward to `position`, by seeking when possible
/// and by reading and discarding otherwise.
pub fn advance_to<S: LasStream + Read>(stream: &mut S, position: u64) -> crate::Result<()> {
    if stream.can_seek() {
        return stream.seek_to(position);
    }
    let current = stream.position();
    if position < current {
        return Err(LasError::NoSeek);
    }
    let to_skip = position - current;
    let skipped = std::io::copy(&mut stream.by_ref().take(to_skip), &mut std::io::sink())?;
    if skipped < to_skip {
        return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
    }
    Ok(())
}
