//! Text rendering of a network and a line-oriented command interpreter.
//!
//! Commands only call through to the public network operations:
//!
//! ```text
//! earliest_occurence_of <event>        latest_occurence_of <event>
//! earliest_finish_of <a> <b>           latest_start_of <a> <b>
//! activity_float_of <a> <b>            free_float_of <a> <b>
//! interfering_float_of <a> <b>         independent_float_of <a> <b>
//! critical_path                        paths <a> <b>
//! show                                 help
//! q
//! ```

use std::fmt::{self, Display, Write as _};
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use thiserror::Error;

use crate::models::{path_length, Activity, EventId, Segment, TimeSpan};
use crate::network::{Network, NetworkError};

pub const HELP: &str = "\
Commands:
  earliest_occurence_of <event>
  latest_occurence_of <event>
  earliest_finish_of <trigger> <completion>
  latest_start_of <trigger> <completion>
  activity_float_of <trigger> <completion>
  free_float_of <trigger> <completion>
  interfering_float_of <trigger> <completion>
  independent_float_of <trigger> <completion>
  critical_path
  paths <start> <finish>
  show
  help
  q";

/// Errors from interpreting a command line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0} (type `help` for the list)")]
    Unknown(String),
    #[error("{command} expects {expected} argument(s), got {found}")]
    Arity {
        command: String,
        expected: usize,
        found: usize,
    },
    #[error("Invalid event: {0}")]
    InvalidEvent(String),
    #[error(transparent)]
    Network(#[from] NetworkError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventQuery {
    EarliestOccurence,
    LatestOccurence,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivityQuery {
    EarliestFinish,
    LatestStart,
    ActivityFloat,
    FreeFloat,
    InterferingFloat,
    IndependentFloat,
}

impl ActivityQuery {
    fn label(self) -> &'static str {
        match self {
            Self::EarliestFinish => "Earliest finish",
            Self::LatestStart => "Latest start",
            Self::ActivityFloat => "Activity float",
            Self::FreeFloat => "Free float",
            Self::InterferingFloat => "Interfering float",
            Self::IndependentFloat => "Independent float",
        }
    }
}

/// A parsed command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command<E> {
    Event(EventQuery, E),
    Activity(ActivityQuery, Activity<E>),
    CriticalPath,
    Paths(E, E),
    Show,
    Help,
    Quit,
}

fn parse_event<E: FromStr>(raw: &str) -> Result<E, CommandError> {
    raw.parse()
        .map_err(|_| CommandError::InvalidEvent(raw.to_string()))
}

fn expect_args<'a>(name: &str, args: &[&'a str], expected: usize) -> Result<Vec<&'a str>, CommandError> {
    if args.len() != expected {
        return Err(CommandError::Arity {
            command: name.to_string(),
            expected,
            found: args.len(),
        });
    }
    Ok(args.to_vec())
}

impl<E: EventId + FromStr> Command<E> {
    /// Parse one line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let event_query = match name {
            "earliest_occurence_of" => Some(EventQuery::EarliestOccurence),
            "latest_occurence_of" => Some(EventQuery::LatestOccurence),
            _ => None,
        };
        if let Some(query) = event_query {
            let args = expect_args(name, &args, 1)?;
            return Ok(Some(Command::Event(query, parse_event(args[0])?)));
        }

        let activity_query = match name {
            "earliest_finish_of" => Some(ActivityQuery::EarliestFinish),
            "latest_start_of" => Some(ActivityQuery::LatestStart),
            "activity_float_of" => Some(ActivityQuery::ActivityFloat),
            "free_float_of" => Some(ActivityQuery::FreeFloat),
            "interfering_float_of" => Some(ActivityQuery::InterferingFloat),
            "independent_float_of" => Some(ActivityQuery::IndependentFloat),
            _ => None,
        };
        if let Some(query) = activity_query {
            let args = expect_args(name, &args, 2)?;
            let activity = Activity::new(parse_event(args[0])?, parse_event(args[1])?);
            return Ok(Some(Command::Activity(query, activity)));
        }

        let command = match name {
            "critical_path" => Command::CriticalPath,
            "paths" => {
                let args = expect_args(name, &args, 2)?;
                Command::Paths(parse_event(args[0])?, parse_event(args[1])?)
            }
            "show" => Command::Show,
            "help" => Command::Help,
            "q" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

/// Run a text builder over a fresh `String`.
fn written(build: impl FnOnce(&mut String) -> fmt::Result) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = build(&mut out);
    out
}

fn write_segments<E: Display, D: Display>(out: &mut String, segments: &[Segment<E, D>]) -> fmt::Result {
    for s in segments {
        writeln!(out, "{}  : {}", s.activity, s.duration)?;
    }
    Ok(())
}

fn or_error<T: Display>(result: Result<T, NetworkError>) -> String {
    match result {
        Ok(value) => value.to_string(),
        Err(err) => format!("n/a ({})", err),
    }
}

fn join_events<E: Display>(events: impl IntoIterator<Item = E>) -> String {
    events
        .into_iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Human-readable summary: boundary events, well-formedness, activities and
/// schedule.
pub fn render_network<E, D>(network: &Network<E, D>) -> String
where
    E: EventId + Display,
    D: TimeSpan + Display,
{
    written(|out| write_network(out, network))
}

fn write_network<E, D>(out: &mut String, network: &Network<E, D>) -> fmt::Result
where
    E: EventId + Display,
    D: TimeSpan + Display,
{
    writeln!(out, "* Network\n----------")?;
    writeln!(out, "Initial event(s): {}", join_events(network.initial_events()))?;
    writeln!(out, "Terminal event(s): {}", join_events(network.terminal_events()))?;
    writeln!(out, "Well formed: {}", network.is_well_formed())?;
    writeln!(out, "----------")?;
    write_segments(out, &network.segments().collect::<Vec<_>>())?;

    writeln!(out, "\n* Schedule\n----------")?;
    let boundary = |t: Option<D>| t.map_or_else(|| "unset".to_string(), |t| t.to_string());
    writeln!(out, "Initial time: {}", boundary(network.initial_time()))?;
    writeln!(out, "Terminal time: {}", boundary(network.terminal_time()))?;
    let earliest_finish = network
        .terminal_event()
        .and_then(|e| network.earliest_occurence(&e));
    let latest_start = network
        .initial_event()
        .and_then(|e| network.latest_occurence(&e));
    writeln!(out, "Earliest finish: {}", or_error(earliest_finish))?;
    writeln!(out, "Latest start: {}", or_error(latest_start))
}

/// Outcome of one input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Output(String),
    Quit,
}

/// Interactive session over one network.
pub struct Session<E, D> {
    network: Network<E, D>,
}

impl<E, D> Session<E, D>
where
    E: EventId + Display + FromStr,
    D: TimeSpan + Display,
{
    pub fn new(network: Network<E, D>) -> Self {
        Self { network }
    }

    pub fn network(&self) -> &Network<E, D> {
        &self.network
    }

    pub fn execute(&self, command: &Command<E>) -> Result<Reply, NetworkError> {
        let network = &self.network;
        let text = match command {
            Command::Event(EventQuery::EarliestOccurence, e) => {
                format!("Earliest occurence of event {}: {}", e, network.earliest_occurence(e)?)
            }
            Command::Event(EventQuery::LatestOccurence, e) => {
                format!("Latest occurence of event {}: {}", e, network.latest_occurence(e)?)
            }
            Command::Activity(query, a) => {
                let value = match query {
                    ActivityQuery::EarliestFinish => network.earliest_finish(a)?,
                    ActivityQuery::LatestStart => network.latest_start(a)?,
                    ActivityQuery::ActivityFloat => network.activity_float(a)?,
                    ActivityQuery::FreeFloat => network.free_float(a)?,
                    ActivityQuery::InterferingFloat => network.interfering_float(a)?,
                    ActivityQuery::IndependentFloat => network.independent_float(a)?,
                };
                format!(
                    "{} of activity {} ---> {}: {}",
                    query.label(),
                    a.trigger,
                    a.completion,
                    value
                )
            }
            Command::CriticalPath => {
                let critical = network.find_critical_path()?;
                let out = written(|out| {
                    writeln!(out, "Critical path (length {}):", critical.length)?;
                    write_segments(out, &critical.segments)
                });
                out.trim_end().to_string()
            }
            Command::Paths(start, finish) => {
                let paths = network.paths(start, finish)?;
                written(|out| {
                    write!(out, "{} path(s) from {} to {}", paths.len(), start, finish)?;
                    for path in &paths {
                        let steps: Vec<String> =
                            path.iter().map(|s| s.activity.to_string()).collect();
                        write!(out, "\n{} (length {})", steps.join(", "), path_length(path))?;
                    }
                    Ok(())
                })
            }
            Command::Show => render_network(network).trim_end().to_string(),
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Reply::Quit),
        };
        Ok(Reply::Output(text))
    }

    /// Interpret one input line. Errors are reported in the output text.
    pub fn handle_line(&self, line: &str) -> Reply {
        let result = Command::parse(line).and_then(|command| match command {
            None => Ok(Reply::Output(String::new())),
            Some(command) => self.execute(&command).map_err(CommandError::from),
        });
        result.unwrap_or_else(|err| Reply::Output(format!("Error: {}", err)))
    }

    /// Read commands from `input` until `q` or end of input.
    pub fn run<R: BufRead, W: Write>(&self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            match self.handle_line(&line?) {
                Reply::Quit => break,
                Reply::Output(text) if text.is_empty() => continue,
                Reply::Output(text) => writeln!(output, "{}\n", text)?,
            }
        }
        output.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::tests::sample;

    fn session() -> Session<i32, i32> {
        Session::new(sample())
    }

    fn output(reply: Reply) -> String {
        match reply {
            Reply::Output(text) => text,
            Reply::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::<i32>::parse("earliest_occurence_of 4"),
            Ok(Some(Command::Event(EventQuery::EarliestOccurence, 4)))
        );
        assert_eq!(
            Command::<i32>::parse("  free_float_of 3 6 "),
            Ok(Some(Command::Activity(
                ActivityQuery::FreeFloat,
                Activity::new(3, 6)
            )))
        );
        assert_eq!(Command::<i32>::parse("q"), Ok(Some(Command::Quit)));
        assert_eq!(Command::<i32>::parse("   "), Ok(None));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Command::<i32>::parse("launch 1"),
            Err(CommandError::Unknown("launch".into()))
        );
        assert_eq!(
            Command::<i32>::parse("latest_start_of 1"),
            Err(CommandError::Arity {
                command: "latest_start_of".into(),
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            Command::<i32>::parse("latest_occurence_of x"),
            Err(CommandError::InvalidEvent("x".into()))
        );
    }

    #[test]
    fn test_event_queries() {
        let session = session();
        assert_eq!(
            output(session.handle_line("earliest_occurence_of 9")),
            "Earliest occurence of event 9: 15"
        );
        assert_eq!(
            output(session.handle_line("latest_occurence_of 1")),
            "Latest occurence of event 1: 6"
        );
    }

    #[test]
    fn test_activity_queries() {
        let session = session();
        assert_eq!(
            output(session.handle_line("earliest_finish_of 4 8")),
            "Earliest finish of activity 4 ---> 8: 10"
        );
        assert_eq!(
            output(session.handle_line("activity_float_of 3 6")),
            "Activity float of activity 3 ---> 6: 4"
        );
        assert_eq!(
            output(session.handle_line("independent_float_of 3 6")),
            "Independent float of activity 3 ---> 6: 7"
        );
    }

    #[test]
    fn test_errors_are_reported() {
        let session = session();
        assert_eq!(
            output(session.handle_line("free_float_of 9 1")),
            "Error: Activity not found: 9 ---> 1"
        );
        assert!(output(session.handle_line("bogus")).starts_with("Error: Unknown command"));
    }

    #[test]
    fn test_critical_path_command() {
        let text = output(session().handle_line("critical_path"));
        assert_eq!(
            text,
            "Critical path (length 15):\n1--->4  : 2\n4--->8  : 8\n8--->9  : 5"
        );
    }

    #[test]
    fn test_paths_command() {
        let text = output(session().handle_line("paths 4 6"));
        assert_eq!(text, "1 path(s) from 4 to 6\n4--->5, 5--->6 (length 9)");
    }

    #[test]
    fn test_render_network() {
        let text = render_network(&sample());
        assert!(text.contains("Initial event(s): 1\n"));
        assert!(text.contains("Terminal event(s): 9\n"));
        assert!(text.contains("Well formed: true\n"));
        assert!(text.contains("3--->6  : 1\n"));
        assert!(text.contains("Earliest finish: 15\n"));
        assert!(text.contains("Latest start: 6\n"));
    }

    #[test]
    fn test_render_unscheduled() {
        let mut network: Network<i32, i32> = Network::new();
        network.add_activity(1, 2, 3).unwrap();
        let text = render_network(&network);
        assert!(text.contains("Initial time: unset\n"));
        assert!(text.contains("Earliest finish: n/a (Network has not been scheduled)\n"));
    }

    #[test]
    fn test_run_until_quit() {
        let input = "earliest_occurence_of 6\n\nq\nearliest_occurence_of 9\n";
        let mut out = Vec::new();
        session().run(input.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "Earliest occurence of event 6: 11\n\n");
    }
}
