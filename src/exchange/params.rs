//! Dakota parameters file parsing and validation.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::error::{Result, UqError};

/// Header key declaring the variable count (standard format).
pub const VARIABLES_KEY: &str = "variables";
/// Header key declaring the variable count (APREPRO format).
pub const APREPRO_VARIABLES_KEY: &str = "DAKOTA_VARS";
/// Header key declaring the response function count (standard format).
pub const FUNCTIONS_KEY: &str = "functions";
/// Header key declaring the response function count (APREPRO format).
pub const APREPRO_FUNCTIONS_KEY: &str = "DAKOTA_FNS";
/// Header key declaring the derivative variable count (standard format).
pub const DERIVATIVE_VARIABLES_KEY: &str = "derivative_variables";
/// Header key declaring the derivative variable count (APREPRO format).
pub const APREPRO_DERIVATIVE_VARIABLES_KEY: &str = "DAKOTA_DER_VARS";
/// Prefix of active-set-vector entries, `ASV_<k>:<label>`.
pub const ASV_PREFIX: &str = "ASV_";

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    key: String,
    value: String,
    line: usize,
}

/// Ordered name → value mapping read from a Dakota parameters file.
///
/// Values stay as strings; callers convert with [`ParameterRecord::get_parsed`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterRecord {
    entries: Vec<Entry>,
}

impl ParameterRecord {
    /// Reads and parses a parameters file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error naming the path if the file cannot be read, or a
    /// parse error for the first malformed line.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| UqError::io_at("read", path, e))?;
        let record = Self::parse(&content)?;
        debug!(path = %path.display(), entries = record.len(), "parameters file parsed");
        Ok(record)
    }

    /// Parses parameters file text.
    ///
    /// Each non-blank line is either `<value> <key>` (standard format) or
    /// `{ <key> = <value> }` (APREPRO format). A repeated key replaces the
    /// earlier value in place.
    ///
    /// # Errors
    ///
    /// Returns [`UqError::Parse`] with the 1-based line number if a line is
    /// neither form.
    pub fn parse(content: &str) -> Result<Self> {
        let mut record = Self::default();
        for (idx, raw) in content.lines().enumerate() {
            let line = idx + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            let (key, value) = if trimmed.starts_with('{') && trimmed.ends_with('}') {
                parse_aprepro(trimmed, line)?
            } else {
                parse_standard(trimmed, line)?
            };
            record.insert(key, value, line);
        }
        Ok(record)
    }

    fn insert(&mut self, key: &str, value: &str, line: usize) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) {
            entry.value = value.to_string();
            entry.line = line;
        } else {
            self.entries.push(Entry {
                key: key.to_string(),
                value: value.to_string(),
                line,
            });
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// `(key, value)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|e| (e.key.as_str(), e.value.as_str()))
    }

    /// Raw value for an exact key.
    ///
    /// # Errors
    ///
    /// Returns [`UqError::MissingKey`] if the key is absent.
    pub fn get(&self, key: &str) -> Result<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
            .ok_or_else(|| UqError::MissingKey(key.to_string()))
    }

    /// Value for an exact key converted with `FromStr`.
    ///
    /// # Errors
    ///
    /// Returns [`UqError::MissingKey`] or [`UqError::InvalidValue`].
    pub fn get_parsed<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.get(key)?;
        raw.parse::<T>().map_err(|e| UqError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            message: e.to_string(),
        })
    }

    pub fn get_f64(&self, key: &str) -> Result<f64> {
        self.get_parsed(key)
    }

    /// First key starting with `prefix`, e.g. `ASV_1:` when the response label
    /// is not known in advance.
    pub fn find_key(&self, prefix: &str) -> Option<&str> {
        self.entries
            .iter()
            .map(|e| e.key.as_str())
            .find(|k| k.starts_with(prefix))
    }

    /// Declared uncertain-variable count from the `variables` header.
    ///
    /// # Errors
    ///
    /// Returns [`UqError::MissingKey`] if neither header form is present and
    /// [`UqError::InvalidValue`] if it is not a non-negative integer.
    pub fn declared_variables(&self) -> Result<usize> {
        if self.contains(VARIABLES_KEY) {
            self.get_parsed(VARIABLES_KEY)
        } else if self.contains(APREPRO_VARIABLES_KEY) {
            self.get_parsed(APREPRO_VARIABLES_KEY)
        } else {
            Err(UqError::MissingKey(VARIABLES_KEY.to_string()))
        }
    }

    /// Declared response-function count, if the file carries one.
    pub fn declared_functions(&self) -> Result<Option<usize>> {
        for key in [FUNCTIONS_KEY, APREPRO_FUNCTIONS_KEY] {
            if self.contains(key) {
                return self.get_parsed(key).map(Some);
            }
        }
        Ok(None)
    }

    /// Declared derivative-variable count, if the file carries one.
    pub fn declared_derivative_variables(&self) -> Result<Option<usize>> {
        for key in [DERIVATIVE_VARIABLES_KEY, APREPRO_DERIVATIVE_VARIABLES_KEY] {
            if self.contains(key) {
                return self.get_parsed(key).map(Some);
            }
        }
        Ok(None)
    }

    /// The variable entries: the `declared_variables()` entries directly
    /// following the variables header, as `(name, value)`.
    ///
    /// # Errors
    ///
    /// Fails like [`Self::declared_variables`], or with a parse error if fewer
    /// entries follow the header than it declares.
    pub fn variables(&self) -> Result<Vec<(&str, &str)>> {
        let declared = self.declared_variables()?;
        let header = self
            .entries
            .iter()
            .position(|e| e.key == VARIABLES_KEY || e.key == APREPRO_VARIABLES_KEY)
            .ok_or_else(|| UqError::MissingKey(VARIABLES_KEY.to_string()))?;
        let following = &self.entries[header + 1..];
        if following.len() < declared {
            return Err(UqError::Parse {
                line: self.entries[header].line,
                message: format!(
                    "header declares {declared} variables but only {} entries follow",
                    following.len()
                ),
            });
        }
        Ok(following[..declared]
            .iter()
            .map(|e| (e.key.as_str(), e.value.as_str()))
            .collect())
    }

    /// Active-set vector, one flag per response function in `ASV_<k>` order.
    ///
    /// # Errors
    ///
    /// Returns a parse error if an index is malformed, repeated or the indices
    /// are not exactly `1..=m`, and [`UqError::InvalidValue`] for a flag that is
    /// not a small integer.
    pub fn active_set_vector(&self) -> Result<Vec<u8>> {
        let mut flagged: Vec<(usize, u8, usize)> = Vec::new();
        for e in self.entries.iter().filter(|e| e.key.starts_with(ASV_PREFIX)) {
            let rest = &e.key[ASV_PREFIX.len()..];
            let index_str = rest.split(':').next().unwrap_or_default();
            let index: usize = index_str.parse().map_err(|_| UqError::Parse {
                line: e.line,
                message: format!("malformed active set key \"{}\"", e.key),
            })?;
            let flag: u8 = self.get_parsed(&e.key)?;
            flagged.push((index, flag, e.line));
        }
        flagged.sort_by_key(|(index, _, _)| *index);
        for (pos, (index, _, line)) in flagged.iter().enumerate() {
            if *index != pos + 1 {
                return Err(UqError::Parse {
                    line: *line,
                    message: format!(
                        "active set indices must run 1..={} without gaps, found ASV_{index}",
                        flagged.len()
                    ),
                });
            }
        }
        Ok(flagged.into_iter().map(|(_, flag, _)| flag).collect())
    }
}

fn parse_standard(line_text: &str, line: usize) -> Result<(&str, &str)> {
    let mut tokens = line_text.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(value), Some(key), None) => Ok((key, value)),
        _ => Err(UqError::Parse {
            line,
            message: format!("expected \"<value> <name>\", got \"{line_text}\""),
        }),
    }
}

fn parse_aprepro(line_text: &str, line: usize) -> Result<(&str, &str)> {
    let inner = line_text[1..line_text.len() - 1].trim();
    match inner.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() && !value.trim().is_empty() => {
            Ok((key.trim(), value.trim()))
        }
        _ => Err(UqError::Parse {
            line,
            message: format!("expected \"{{ <name> = <value> }}\", got \"{line_text}\""),
        }),
    }
}

/// Fails unless the record declares exactly `expected` uncertain variables.
///
/// This runs before any response is evaluated; a mismatch means the driver
/// and the analysis disagree on the problem and nothing downstream can be
/// trusted.
///
/// # Errors
///
/// Returns [`UqError::VariableCountMismatch`] on mismatch, or the errors of
/// [`ParameterRecord::variables`].
pub fn check_variable_count(expected: usize, record: &ParameterRecord) -> Result<()> {
    let declared = record.declared_variables()?;
    if declared != expected {
        return Err(UqError::VariableCountMismatch { declared, expected });
    }
    record.variables()?;
    Ok(())
}
