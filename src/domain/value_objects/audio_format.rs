//! Audio encodings understood by the two device generations.

use std::fmt;

/// Encoding a device generation plays back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    /// Proprietary codec of the first-generation device
    A18,
    Mp3,
}

impl AudioFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::A18 => "a18",
            AudioFormat::Mp3 => "mp3",
        }
    }

    /// `<stem>.<extension>`
    pub fn file_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.extension())
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
