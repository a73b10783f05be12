//! Reader for `environment.xml` and `environment.properties`

use crate::error::{Error, Result};
use crate::io::{Reader, ResultDirectories};
use crate::model::Environment;
use std::fs;
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;
use tracing::{debug, warn};

pub const ENVIRONMENT_XML: &str = "environment.xml";
pub const ENVIRONMENT_PROPERTIES: &str = "environment.properties";

pub struct EnvironmentReader {
    directories: ResultDirectories,
}

impl EnvironmentReader {
    pub fn new(directories: ResultDirectories) -> Self {
        EnvironmentReader { directories }
    }

    fn read_xml(path: &Path) -> Result<Environment> {
        let contents = fs::read_to_string(path)?;
        quick_xml::de::from_str(&contents)
            .map_err(|e| Error::InvalidFormat(format!("{}: {}", path.display(), e)))
    }

    fn read_properties(path: &Path) -> Result<Environment> {
        let contents = fs::read_to_string(path)?;
        Ok(parse_properties(&contents))
    }
}

impl Reader<Environment> for EnvironmentReader {
    fn read(&self) -> Result<Vec<Environment>> {
        let mut environments = Vec::new();

        for dir in self.directories.existing() {
            let xml = dir.join(ENVIRONMENT_XML);
            if xml.is_file() {
                match Self::read_xml(&xml) {
                    Ok(env) => environments.push(env),
                    Err(e) => warn!(file = %xml.display(), error = %e, "skipping unreadable environment file"),
                }
            }

            let properties = dir.join(ENVIRONMENT_PROPERTIES);
            if properties.is_file() {
                match Self::read_properties(&properties) {
                    Ok(env) => environments.push(env),
                    Err(e) => warn!(file = %properties.display(), error = %e, "skipping unreadable environment file"),
                }
            }
        }

        debug!(count = environments.len(), "read environments");
        Ok(environments)
    }
}

/// Parse a Java properties file.
///
/// Keys end at the first unescaped `=`, `:` or whitespace. A line ending
/// in an odd number of backslashes continues on the next line. Escapes
/// `\t`, `\n`, `\r`, `\f` and `\uXXXX` are decoded; any other escaped
/// character stands for itself. Lines starting with `#` or `!` are comments.
pub fn parse_properties(contents: &str) -> Environment {
    let mut env = Environment::default();

    for line in logical_lines(contents) {
        let (key, value) = split_property(&line);
        if !key.is_empty() {
            env.add_parameter(key, value);
        }
    }

    env
}

/// Joins continued lines, dropping blank lines and comments.
fn logical_lines(contents: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut continued = false;

    for raw in contents.lines() {
        let line = raw.trim_start();
        if !continued && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
            continue;
        }

        let backslashes = line.chars().rev().take_while(|&c| c == '\\').count();
        continued = backslashes % 2 == 1;
        if continued {
            current.push_str(&line[..line.len() - 1]);
        } else {
            current.push_str(line);
            lines.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn split_property(line: &str) -> (String, String) {
    let mut chars = line.chars().peekable();
    let mut key = String::new();
    let mut separated = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => unescape_into(&mut chars, &mut key),
            '=' | ':' => {
                separated = true;
                break;
            }
            c if c.is_whitespace() => break,
            c => key.push(c),
        }
    }

    while chars.next_if(|c| c.is_whitespace()).is_some() {}
    if !separated && chars.next_if(|&c| c == '=' || c == ':').is_some() {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
    }

    let mut value = String::new();
    while let Some(c) = chars.next() {
        if c == '\\' {
            unescape_into(&mut chars, &mut value);
        } else {
            value.push(c);
        }
    }

    (key, value)
}

/// Decode the character following a backslash.
fn unescape_into(chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    match chars.next() {
        Some('t') => out.push('\t'),
        Some('n') => out.push('\n'),
        Some('r') => out.push('\r'),
        Some('f') => out.push('\u{c}'),
        Some('u') => {
            let hex: String = chars.by_ref().take(4).collect();
            match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                Some(c) => out.push(c),
                None => {
                    warn!(escape = %hex, "invalid unicode escape in properties file");
                    out.push_str(&hex);
                }
            }
        }
        Some(c) => out.push(c),
        None => {}
    }
}
