use log::warn;
use std::io::{self, Read};

/// Splits a document into lines on `\n`, dropping a trailing `\r` from each.
///
/// A document that ends with a newline yields a final empty line, and the
/// empty document yields a single empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Reads the whole source, replacing invalid UTF-8 sequences with U+FFFD.
pub(crate) fn read_source<R: Read>(reader: &mut R) -> io::Result<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => {
            warn!(
                "input is not valid UTF-8 (first bad byte at offset {}); substituting U+FFFD",
                err.utf8_error().valid_up_to()
            );
            Ok(String::from_utf8_lossy(err.as_bytes()).into_owned())
        }
    }
}
