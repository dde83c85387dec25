//! TLSH locality-sensitive hashing, used by the service for near-duplicate
//! search. Short or low-variance inputs have no TLSH digest.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use tlsh2::TlshDefaultBuilder;

use crate::error::{EdgeError, Result};

struct BuilderSink<'a>(&'a mut TlshDefaultBuilder);

impl Write for BuilderSink<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// TLSH digest of a file (`T1` followed by hex), or `None` when the content
/// is too short or too uniform to produce one.
///
/// # Errors
///
/// Returns `EdgeError::Io` if the file cannot be opened or read.
pub fn similarity_hash<P: AsRef<Path>>(path: P) -> Result<Option<String>> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|e| EdgeError::io(path, e))?;
    let mut builder = TlshDefaultBuilder::new();
    io::copy(&mut file, &mut BuilderSink(&mut builder)).map_err(|e| EdgeError::io(path, e))?;
    Ok(builder
        .build()
        .map(|tlsh| String::from_utf8_lossy(tlsh.hash().as_ref()).into_owned())
        .filter(|hash| !hash.is_empty()))
}
