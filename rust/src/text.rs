//! Plain-text network format.
//!
//! ```text
//! <initial_time>
//! <terminal_time>
//! <trigger_event> <completion_event> <duration>
//! ...
//! ```
//!
//! Fields are whitespace separated; blank activity lines are skipped.

use std::fmt::{self, Display, Write};
use std::str::FromStr;
use thiserror::Error;

use crate::config::NetworkConfig;
use crate::models::{EventId, TimeSpan};
use crate::network::{Network, NetworkError};

/// Errors from reading the text format. Line numbers are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Missing {0} header line")]
    MissingHeader(&'static str),
    #[error("Line {line}: invalid time {value:?}")]
    InvalidTime { line: usize, value: String },
    #[error("Line {line}: expected `trigger completion duration`, found {found} fields")]
    WrongFieldCount { line: usize, found: usize },
    #[error("Line {line}: invalid event {value:?}")]
    InvalidEvent { line: usize, value: String },
    #[error("Line {line}: invalid duration {value:?}")]
    InvalidDuration { line: usize, value: String },
    #[error("Line {line}: {source}")]
    Rejected { line: usize, source: NetworkError },
}

fn parse_time<D: FromStr>(line: usize, raw: Option<&str>, name: &'static str) -> Result<D, ParseError> {
    let raw = raw.ok_or(ParseError::MissingHeader(name))?.trim();
    raw.parse().map_err(|_| ParseError::InvalidTime {
        line,
        value: raw.to_string(),
    })
}

fn parse_field<T: FromStr>(
    value: &str,
    err: impl FnOnce(String) -> ParseError,
) -> Result<T, ParseError> {
    value.parse().map_err(|_| err(value.to_string()))
}

impl<E, D> Network<E, D>
where
    E: EventId + FromStr,
    D: TimeSpan + FromStr,
{
    /// Read a network in the text format. The header sets the schedule.
    pub fn from_txt(text: &str) -> Result<Self, ParseError> {
        Self::from_txt_with_config(text, NetworkConfig::default())
    }

    pub fn from_txt_with_config(text: &str, config: NetworkConfig) -> Result<Self, ParseError> {
        let mut lines = text.lines();
        let initial_time: D = parse_time(1, lines.next(), "initial time")?;
        let terminal_time: D = parse_time(2, lines.next(), "terminal time")?;

        let mut network = Network::with_config(config);
        for (offset, raw) in lines.enumerate() {
            let line = offset + 3;
            let fields: Vec<&str> = raw.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            let [trigger, completion, duration] = fields.as_slice() else {
                return Err(ParseError::WrongFieldCount {
                    line,
                    found: fields.len(),
                });
            };

            let trigger: E = parse_field(trigger, |value| ParseError::InvalidEvent { line, value })?;
            let completion: E =
                parse_field(completion, |value| ParseError::InvalidEvent { line, value })?;
            let duration: D =
                parse_field(duration, |value| ParseError::InvalidDuration { line, value })?;

            network
                .add_activity(trigger, completion, duration)
                .map_err(|source| ParseError::Rejected { line, source })?;
        }

        network.schedule(initial_time, terminal_time);
        Ok(network)
    }
}

impl<E, D> Network<E, D>
where
    E: EventId + Display,
    D: TimeSpan + Display,
{
    /// Write the network in the text format read by [`Network::from_txt`].
    pub fn to_txt(&self) -> Result<String, NetworkError> {
        let initial_time = self.initial_time.ok_or(NetworkError::NotScheduled)?;
        let terminal_time = self.terminal_time.ok_or(NetworkError::NotScheduled)?;
        Ok(self.write_txt(initial_time, terminal_time))
    }

    fn write_txt(&self, initial_time: D, terminal_time: D) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = write_lines(&mut out, self, initial_time, terminal_time);
        out
    }
}

fn write_lines<E: EventId + Display, D: TimeSpan + Display>(
    out: &mut String,
    network: &Network<E, D>,
    initial_time: D,
    terminal_time: D,
) -> fmt::Result {
    writeln!(out, "{}", initial_time)?;
    writeln!(out, "{}", terminal_time)?;
    for (activity, duration) in &network.data {
        writeln!(out, "{} {} {}", activity.trigger, activity.completion, duration)?;
    }
    Ok(())
}
