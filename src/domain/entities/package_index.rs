//! Indexed device descriptor (`packages_data.txt`)
//!
//! Second-generation devices read one line-oriented descriptor per image.
//! Every audio file is addressed as `<ordinal> <file name>`, where the ordinal
//! is a 1-based index into a table of directories at the top of the file.
//! Directories are stored normalized as `/dir/` so a reader builds a full
//! path with a single concatenation.
//!
//! ```text
//! 1                     # format version
//! TEST-24-1             # deployment name
//! 2                     # number of paths
//! /content/prompts/en/
//! /content/messages/
//! 1                     # number of packages
//! TEST-24-1-en
//!   1  7.mp3            # package announcement
//!   1                   # path(s) to prompts
//!   1                   # number of playlists
//!     2-0
//!     1  2-0.mp3        # playlist announcement
//!     1  i2-0.mp3       # playlist invitation
//!     1                 # number of messages
//!       2  id1.mp3      # id1
//! ```

use chrono::{DateTime, Utc};
use thiserror::Error;

pub const INDEX_FORMAT_VERSION: u32 = 1;
pub const PACKAGES_DATA_FILE: &str = "packages_data.txt";
/// Most prompt search paths a device will follow
pub const MAX_PROMPT_PATHS: usize = 10;
/// Longest line the device firmware accepts
pub const MAX_LINE_LENGTH: usize = 200;

const COMMENT_COLUMN: usize = 20;
const INDENT: &str = "  ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("line longer than 200 characters: {line}")]
    LineTooLong { line: String },

    #[error("package '{package}' has {count} prompt paths (at most 10)")]
    TooManyPromptPaths { package: String, count: usize },

    #[error("package '{package}' has no prompt path")]
    NoPromptPaths { package: String },

    #[error("package '{package}' refers to path {ordinal}, but only {count} paths exist")]
    OrdinalOutOfRange {
        package: String,
        ordinal: usize,
        count: usize,
    },

    #[error("package '{package}' appears more than once")]
    DuplicatePackage { package: String },

    #[error("unsupported descriptor format version {0}")]
    UnsupportedVersion(u32),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("descriptor ended early: expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("'{data}' contains '#', which would start a comment")]
    CommentMarkerInData { data: String },
}

/// One audio file: directory ordinal plus file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioRef {
    pub path: usize,
    pub file_name: String,
    /// Written as the line comment; messages use it for their title.
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRecord {
    pub name: String,
    pub short_prompt: AudioRef,
    pub long_prompt: AudioRef,
    pub messages: Vec<AudioRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    pub name: String,
    pub announcement: AudioRef,
    /// Search order for system prompts
    pub prompt_paths: Vec<usize>,
    pub playlists: Vec<PlaylistRecord>,
}

impl PackageRecord {
    fn ordinals(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::once(self.announcement.path)
            .chain(self.prompt_paths.iter().copied())
            .chain(self.playlists.iter().flat_map(|pl| {
                [pl.short_prompt.path, pl.long_prompt.path]
                    .into_iter()
                    .chain(pl.messages.iter().map(|m| m.path))
            }))
    }

    fn remap<F>(&self, mut map: F) -> Result<Self, IndexError>
    where
        F: FnMut(usize) -> Result<usize, IndexError>,
    {
        let prompt_paths = self
            .prompt_paths
            .iter()
            .map(|p| map(*p))
            .collect::<Result<Vec<_>, _>>()?;
        let mut audio = |a: &AudioRef| -> Result<AudioRef, IndexError> {
            Ok(AudioRef {
                path: map(a.path)?,
                file_name: a.file_name.clone(),
                title: a.title.clone(),
            })
        };
        let announcement = audio(&self.announcement)?;
        let mut playlists = Vec::with_capacity(self.playlists.len());
        for pl in &self.playlists {
            playlists.push(PlaylistRecord {
                name: pl.name.clone(),
                short_prompt: audio(&pl.short_prompt)?,
                long_prompt: audio(&pl.long_prompt)?,
                messages: pl.messages.iter().map(&mut audio).collect::<Result<_, _>>()?,
            });
        }
        Ok(Self {
            name: self.name.clone(),
            announcement,
            prompt_paths,
            playlists,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageIndex {
    deployment: String,
    paths: Vec<String>,
    packages: Vec<PackageRecord>,
}

impl PackageIndex {
    pub fn new(deployment: impl Into<String>) -> Self {
        Self {
            deployment: deployment.into(),
            paths: Vec::new(),
            packages: Vec::new(),
        }
    }

    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn packages(&self) -> &[PackageRecord] {
        &self.packages
    }

    pub fn path(&self, ordinal: usize) -> Option<&str> {
        ordinal
            .checked_sub(1)
            .and_then(|i| self.paths.get(i))
            .map(String::as_str)
    }

    /// Full device path of an audio reference.
    pub fn resolve(&self, audio: &AudioRef) -> Option<String> {
        self.path(audio.path)
            .map(|dir| format!("{}{}", dir, audio.file_name))
    }

    /// Ordinal of `dir`, adding it to the table on first use.
    pub fn intern_path(&mut self, dir: &str) -> usize {
        let normalized = normalize_dir(dir);
        match self.paths.iter().position(|p| *p == normalized) {
            Some(i) => i + 1,
            None => {
                self.paths.push(normalized);
                self.paths.len()
            }
        }
    }

    /// Reference an image-relative file such as `content/messages/id1.mp3`.
    pub fn audio_ref(&mut self, relative_file: &str, title: Option<&str>) -> AudioRef {
        let relative_file = relative_file.replace('\\', "/");
        let (dir, file_name) = relative_file
            .rsplit_once('/')
            .unwrap_or(("", relative_file.as_str()));
        AudioRef {
            path: self.intern_path(dir),
            file_name: file_name.to_string(),
            title: title.map(str::to_string),
        }
    }

    pub fn add_package(&mut self, package: PackageRecord) -> Result<(), IndexError> {
        if self.packages.iter().any(|p| p.name == package.name) {
            return Err(IndexError::DuplicatePackage {
                package: package.name,
            });
        }
        if package.prompt_paths.is_empty() {
            return Err(IndexError::NoPromptPaths {
                package: package.name,
            });
        }
        if package.prompt_paths.len() > MAX_PROMPT_PATHS {
            return Err(IndexError::TooManyPromptPaths {
                count: package.prompt_paths.len(),
                package: package.name,
            });
        }
        let count = self.paths.len();
        let out_of_range = package.ordinals().find(|o| *o == 0 || *o > count);
        if let Some(ordinal) = out_of_range {
            return Err(IndexError::OrdinalOutOfRange {
                package: package.name,
                ordinal,
                count,
            });
        }
        self.packages.push(package);
        Ok(())
    }

    /// Merge single-package descriptors into one. Identical directory strings
    /// collapse into one table entry and every ordinal is rewritten to match.
    pub fn combine<'a, I>(deployment: &str, parts: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = &'a PackageIndex>,
    {
        let mut combined = Self::new(deployment);
        for part in parts {
            let remap: Vec<usize> = part.paths.iter().map(|p| combined.intern_path(p)).collect();
            for package in &part.packages {
                let rewritten = package.remap(|ordinal| {
                    ordinal
                        .checked_sub(1)
                        .and_then(|i| remap.get(i).copied())
                        .ok_or_else(|| IndexError::OrdinalOutOfRange {
                            package: package.name.clone(),
                            ordinal,
                            count: remap.len(),
                        })
                })?;
                combined.add_package(rewritten)?;
            }
        }
        Ok(combined)
    }

    /// Render the descriptor text, stamped with `created_at`.
    pub fn render(&self, created_at: DateTime<Utc>) -> Result<String, IndexError> {
        let mut out = LineWriter::default();
        out.heading(
            0,
            &format!("Created on {}", created_at.format("%Y/%m/%d @ %H:%M:%S UTC")),
        )?;
        out.line(0, &INDEX_FORMAT_VERSION.to_string(), Some("format version"))?;
        out.line(0, &self.deployment, Some("deployment name"))?;

        out.heading(0, "paths")?;
        out.line(0, &self.paths.len().to_string(), Some("number of paths"))?;
        for path in &self.paths {
            out.line(0, path, None)?;
        }

        out.line(0, &self.packages.len().to_string(), Some("number of packages"))?;
        for package in &self.packages {
            out.heading(0, &format!("package: {}", package.name))?;
            out.line(0, &package.name, None)?;
            out.audio(1, &package.announcement, "package announcement")?;
            let prompt_paths = package
                .prompt_paths
                .iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join(";");
            out.line(1, &prompt_paths, Some("path(s) to prompts"))?;
            out.line(1, &package.playlists.len().to_string(), Some("number of playlists"))?;
            for playlist in &package.playlists {
                out.heading(2, &format!("playlist: {}", playlist.name))?;
                out.line(2, &playlist.name, None)?;
                out.audio(2, &playlist.short_prompt, "playlist announcement")?;
                out.audio(2, &playlist.long_prompt, "playlist invitation")?;
                out.line(2, &playlist.messages.len().to_string(), Some("number of messages"))?;
                for message in &playlist.messages {
                    let title = message.title.as_deref().unwrap_or("");
                    out.audio(3, message, title)?;
                }
            }
        }
        Ok(out.finish())
    }

    /// Parse a rendered descriptor. Comments and blank lines are ignored,
    /// except that a message line's comment becomes its title.
    pub fn parse(text: &str) -> Result<Self, IndexError> {
        let mut cursor = Cursor::new(text);

        let (line, version) = cursor.number("format version")?;
        let version = u32::try_from(version).map_err(|_| IndexError::Parse {
            line,
            message: "format version out of range".to_string(),
        })?;
        if version != INDEX_FORMAT_VERSION {
            return Err(IndexError::UnsupportedVersion(version));
        }
        let deployment = cursor.next("deployment name")?.data.to_string();
        let mut index = Self::new(deployment);

        let (_, path_count) = cursor.number("number of paths")?;
        for _ in 0..path_count {
            let path = cursor.next("path")?.data;
            index.paths.push(normalize_dir(path));
        }

        let (_, package_count) = cursor.number("number of packages")?;
        for _ in 0..package_count {
            let name = cursor.next("package name")?.data.to_string();
            let announcement = cursor.audio("package announcement", false)?;
            let prompts = cursor.next("prompt paths")?;
            let prompt_paths = prompts
                .data
                .split(|c: char| c == ';' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(|s| parse_number(prompts.number, s))
                .collect::<Result<Vec<_>, _>>()?;
            let (_, playlist_count) = cursor.number("number of playlists")?;
            let mut playlists = Vec::new();
            for _ in 0..playlist_count {
                let name = cursor.next("playlist name")?.data.to_string();
                let short_prompt = cursor.audio("playlist announcement", false)?;
                let long_prompt = cursor.audio("playlist invitation", false)?;
                let (_, message_count) = cursor.number("number of messages")?;
                let messages = (0..message_count)
                    .map(|_| cursor.audio("message", true))
                    .collect::<Result<Vec<_>, _>>()?;
                playlists.push(PlaylistRecord {
                    name,
                    short_prompt,
                    long_prompt,
                    messages,
                });
            }
            index.add_package(PackageRecord {
                name,
                announcement,
                prompt_paths,
                playlists,
            })?;
        }
        Ok(index)
    }
}

/// `a/b` → `/a/b/`, backslashes become slashes.
fn normalize_dir(dir: &str) -> String {
    let dir = dir.trim().replace('\\', "/");
    let mut normalized = String::with_capacity(dir.len() + 2);
    if !dir.starts_with('/') {
        normalized.push('/');
    }
    normalized.push_str(&dir);
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

fn parse_number(line: usize, s: &str) -> Result<usize, IndexError> {
    s.parse().map_err(|_| IndexError::Parse {
        line,
        message: format!("expected a number, found '{}'", s),
    })
}

#[derive(Default)]
struct LineWriter {
    out: String,
}

impl LineWriter {
    fn heading(&mut self, level: usize, text: &str) -> Result<(), IndexError> {
        self.write(level, &format!("#------- {} --------", text), None)
    }

    fn audio(&mut self, level: usize, audio: &AudioRef, comment: &str) -> Result<(), IndexError> {
        self.line(
            level,
            &format!("{}  {}", audio.path, audio.file_name),
            Some(comment),
        )
    }

    fn line(&mut self, level: usize, data: &str, comment: Option<&str>) -> Result<(), IndexError> {
        if data.contains('#') {
            return Err(IndexError::CommentMarkerInData {
                data: data.to_string(),
            });
        }
        self.write(level, data, comment)
    }

    /// Indentation is dropped if the line would be too long; a comment that
    /// pushes it over is truncated.
    fn write(&mut self, level: usize, data: &str, comment: Option<&str>) -> Result<(), IndexError> {
        let mut line = format!("{}{}", INDENT.repeat(level), data);
        if line.len() > MAX_LINE_LENGTH {
            line = data.to_string();
            if line.len() > MAX_LINE_LENGTH {
                return Err(IndexError::LineTooLong { line });
            }
        }
        if let Some(comment) = comment.filter(|c| !c.trim().is_empty()) {
            if line.len() < COMMENT_COLUMN {
                line.push_str(&" ".repeat(COMMENT_COLUMN - line.len()));
            }
            line.push_str(" # ");
            line.push_str(comment);
            if line.len() > MAX_LINE_LENGTH {
                let mut end = MAX_LINE_LENGTH;
                while !line.is_char_boundary(end) {
                    end -= 1;
                }
                line.truncate(end);
            }
        }
        self.out.push_str(&line);
        self.out.push('\n');
        Ok(())
    }

    fn finish(self) -> String {
        self.out
    }
}

struct Line<'a> {
    number: usize,
    data: &'a str,
    comment: Option<&'a str>,
}

struct Cursor<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        let lines = text
            .lines()
            .enumerate()
            .filter_map(|(i, raw)| {
                let (data, comment) = match raw.split_once('#') {
                    Some((data, comment)) => (data.trim(), Some(comment.trim())),
                    None => (raw.trim(), None),
                };
                (!data.is_empty()).then_some(Line {
                    number: i + 1,
                    data,
                    comment,
                })
            })
            .collect();
        Self { lines, pos: 0 }
    }

    fn next(&mut self, expected: &'static str) -> Result<&Line<'a>, IndexError> {
        let line = self
            .lines
            .get(self.pos)
            .ok_or(IndexError::UnexpectedEnd { expected })?;
        self.pos += 1;
        Ok(line)
    }

    fn number(&mut self, expected: &'static str) -> Result<(usize, usize), IndexError> {
        let line = self.next(expected)?;
        Ok((line.number, parse_number(line.number, line.data)?))
    }

    fn audio(&mut self, expected: &'static str, keep_title: bool) -> Result<AudioRef, IndexError> {
        let line = self.next(expected)?;
        let mut parts = line.data.split_whitespace();
        let (Some(ordinal), Some(file_name)) = (parts.next(), parts.next()) else {
            return Err(IndexError::Parse {
                line: line.number,
                message: format!("expected '<path> <file>' for {}", expected),
            });
        };
        let title = if keep_title {
            line.comment.filter(|c| !c.is_empty()).map(str::to_string)
        } else {
            None
        };
        Ok(AudioRef {
            path: parse_number(line.number, ordinal)?,
            file_name: file_name.to_string(),
            title,
        })
    }
}
