//! Deployment properties file
//!
//! `deployment_info.properties` is a `key=value` file read by the device
//! loader. Keys keep insertion order; values are escaped so that `=`, `:`,
//! `#`, `!` and line breaks survive a round trip.

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::{TbError, TbResult};
use crate::infrastructure::fs::atomic_write;

pub const DEPLOYMENT_INFO_PROPERTIES: &str = "deployment_info.properties";

pub const PROGRAM_ID: &str = "PROGRAM_ID";
pub const DEPLOYMENT_NAME: &str = "DEPLOYMENT_NAME";
pub const DEPLOYMENT_NUMBER: &str = "DEPLOYMENT_NUMBER";
pub const DEPLOYMENT_REVISION: &str = "DEPLOYMENT_REVISION";
pub const ACCEPTABLE_FIRMWARE_VERSIONS: &str = "ACCEPTABLE_FIRMWARE_VERSIONS";
pub const AUDIO_LANGUAGES: &str = "AUDIO_LANGUAGES";
pub const CREATION_DATE: &str = "DEPLOYMENT_CREATION_DATE";
pub const CREATION_TIME: &str = "DEPLOYMENT_CREATION_TIME";
pub const CREATION_USER: &str = "DEPLOYMENT_CREATION_USER";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentProperties {
    entries: Vec<(String, String)>,
}

impl DeploymentProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces an existing value in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn parse(text: &str) -> Self {
        let mut props = Self::new();
        let mut pending = String::new();
        for raw in text.lines() {
            let line = raw.trim_start();
            if pending.is_empty() && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
                continue;
            }
            // An odd number of trailing backslashes continues the line.
            let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
            if trailing % 2 == 1 {
                pending.push_str(&line[..line.len() - 1]);
                continue;
            }
            pending.push_str(line);
            let (key, value) = split_entry(&pending);
            props.set(unescape(key), unescape(value));
            pending.clear();
        }
        if !pending.is_empty() {
            let (key, value) = split_entry(&pending);
            props.set(unescape(key), unescape(value));
        }
        props
    }

    pub fn render(&self, stamp: DateTime<Utc>) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "#{}", stamp.format("%a %b %d %H:%M:%S UTC %Y"));
        for (key, value) in &self.entries {
            let _ = writeln!(out, "{}={}", escape(key, true), escape(value, false));
        }
        out
    }

    pub fn load(path: &Path) -> TbResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| TbError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    pub fn store(&self, path: &Path, stamp: DateTime<Utc>) -> TbResult<()> {
        atomic_write(path, self.render(stamp).as_bytes())
    }
}

fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            '=' | ':' if !escaped => return (&line[..i], line[i + 1..].trim_start()),
            c if c.is_whitespace() && !escaped => {
                let rest = line[i..].trim_start();
                let rest = rest
                    .strip_prefix(['=', ':'])
                    .map(str::trim_start)
                    .unwrap_or(rest);
                return (&line[..i], rest);
            }
            _ => escaped = false,
        }
    }
    (line, "")
}

fn escape(text: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            c => out.push(c),
        }
    }
    out
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
