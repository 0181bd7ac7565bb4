//! Command line parsing
//!
//! A line has the form `<name>[ <arg>...]`. Arguments stay strings; numeric
//! conversion belongs to the handler that consumes them.

/// Maximum number of arguments kept per command. Extra tokens are dropped.
pub const MAX_ARGS: usize = 5;

/// A parsed command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    /// Command name, empty when the line was blank
    pub name: String,
    /// Up to [`MAX_ARGS`] arguments, in input order
    pub arguments: Vec<String>,
}

impl Command {
    /// Create a command from a name and its arguments
    pub fn new<I, S>(name: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            arguments: arguments
                .into_iter()
                .take(MAX_ARGS)
                .map(Into::into)
                .collect(),
        }
    }

    /// Number of arguments present
    pub fn arg_count(&self) -> usize {
        self.arguments.len()
    }

    /// Argument at `index`, if present
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.arguments.get(index).map(String::as_str)
    }

    /// True when the line carried no command name at all
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

/// Parse one input line into a [`Command`].
///
/// Never fails: a blank line yields a command with an empty name, and tokens
/// past [`MAX_ARGS`] are silently discarded.
pub fn parse(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::default();
    }

    match line.split_once(char::is_whitespace) {
        Some((name, rest)) => Command::new(name, rest.split_whitespace()),
        None => Command::new(line, std::iter::empty::<&str>()),
    }
}
