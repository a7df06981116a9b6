//! Parser for SVG path data.
//!
//! The parser is permissive by default, like most browsers: it recovers from errors in
//! the path data and reports them as diagnostics, instead of discarding the rest of the
//! path.  See [`ParseMode`] to fail on the first error instead.

use std::error;
use std::fmt;
use std::str::CharIndices;

use tinyvec::ArrayVec;

use crate::error::CommandError;
use crate::options::ParseMode;
use crate::path_data::*;

#[derive(Debug, PartialEq, Copy, Clone)]
pub enum Token {
    // pub to allow benchmarking
    Number(f64),
    Flag(bool),
    Command(char),
}

use crate::path_parser::Token::{Command as CommandToken, Flag, Number};

#[derive(Debug)]
pub struct Lexer<'a> {
    // pub to allow benchmarking
    input: &'a str,
    ci: CharIndices<'a>,
    current: Option<(usize, char)>,
    flags_required: u8,
}

#[derive(Debug, PartialEq, Copy, Clone)]
pub enum LexError {
    // pub to allow benchmarking
    ParseFloatError,
    NumberOutOfRange,
    UnexpectedChar(char),
    UnexpectedEof,
}

// Commas, Unicode White_Space, and the byte order mark that some editors leave behind.
fn is_separator(c: char) -> bool {
    c == ',' || c == '\u{feff}' || c.is_whitespace()
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Lexer<'a> {
        let mut ci = input.char_indices();
        let current = ci.next();
        Lexer {
            input,
            ci,
            current,
            flags_required: 0,
        }
    }

    // The large-arc and sweep flags of an elliptical arc are single characters, and
    // path data in the wild often omits the separators after them: "a5 5 0 0110 20" is
    // rx=5 ry=5 rotation=0 large-arc=0 sweep=1 x=10 y=20.  We can't tell flags from
    // numbers without context from the parser, so the parser calls this before asking
    // for each token.  While flags are required, a '0' or '1' is returned as a single
    // Flag token; anything else is lexed normally and left for the parser to complain
    // about.
    pub fn require_flags(&mut self, count: u8) {
        self.flags_required = count;
    }

    fn current_pos(&self) -> usize {
        match self.current {
            None => self.input.len(),
            Some((pos, _)) => pos,
        }
    }

    fn advance(&mut self) {
        self.current = self.ci.next();
    }

    fn advance_over_separators(&mut self) {
        while let Some((_, c)) = self.current {
            if !is_separator(c) {
                break;
            }
            self.advance();
        }
    }

    fn advance_over_optional(&mut self, needle: char) -> bool {
        match self.current {
            Some((_, c)) if c == needle => {
                self.advance();
                true
            }
            _ => false,
        }
    }

    fn advance_over_digits(&mut self) -> bool {
        let mut found_some = false;
        while let Some((_, c)) = self.current {
            if !c.is_ascii_digit() {
                break;
            }
            found_some = true;
            self.advance();
        }
        found_some
    }

    fn advance_over_simple_number(&mut self) -> bool {
        let _ = self.advance_over_optional('-') || self.advance_over_optional('+');
        let found_digit = self.advance_over_digits();
        let _ = self.advance_over_optional('.');
        self.advance_over_digits() || found_digit
    }

    fn match_number(&mut self, start_pos: usize) -> Result<Token, LexError> {
        if !self.advance_over_simple_number() {
            return match self.current {
                None => Err(LexError::UnexpectedEof),
                Some((_, c)) => Err(LexError::UnexpectedChar(c)),
            };
        }

        if self.advance_over_optional('e') || self.advance_over_optional('E') {
            let _ = self.advance_over_optional('-') || self.advance_over_optional('+');
            let _ = self.advance_over_digits();
        }

        let end_pos = self.current_pos();

        let n = self.input[start_pos..end_pos]
            .parse::<f64>()
            .map_err(|_| LexError::ParseFloatError)?;

        // "1e999" parses as infinity
        if n.is_finite() {
            Ok(Number(n))
        } else {
            Err(LexError::NumberOutOfRange)
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = (usize, Result<Token, LexError>);

    fn next(&mut self) -> Option<Self::Item> {
        self.advance_over_separators();

        match self.current {
            // alphabetic chars are commands
            Some((pos, c)) if c.is_ascii_alphabetic() => {
                self.advance();
                Some((pos, Ok(CommandToken(c))))
            }

            Some((pos, c)) if self.flags_required > 0 && (c == '0' || c == '1') => {
                self.flags_required -= 1;
                self.advance();
                Some((pos, Ok(Flag(c == '1'))))
            }

            Some((pos, c)) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                Some((pos, self.match_number(pos)))
            }

            Some((pos, c)) => {
                self.advance();
                Some((pos, Err(LexError::UnexpectedChar(c))))
            }

            None => None,
        }
    }
}

// "007" is a valid number, but a sign of broken output from some other tool.
fn has_leading_zero(text: &str) -> bool {
    let mut chars = text.trim_start_matches(|c| c == '+' || c == '-').chars();
    chars.next() == Some('0') && chars.next().map_or(false, |c| c.is_ascii_digit())
}

/// Pushes commands to a [`PathBuilder`] as it reads path data.
///
/// Commands are accumulated one value at a time, so that the parser can recover from
/// a missing or extra value by discarding the offending segment, instead of giving up
/// on the rest of the path.  Some peculiarities of SVG path data:
///
/// - Commas and whitespace are optional where the next number cannot be confused with
///   the previous one.  These are equivalent:
///
///   ```text
///   M 0.1 -2 300 -4
///   M.1-2,3E2-4
///   ```
///
/// - A command letter may be followed by several segments' worth of values; the
///   command repeats implicitly.  Implicit repeats of a MoveTo are LineTo commands.
///
/// - A ClosePath followed by anything other than a MoveTo starts a new subpath at the
///   same point; the parser makes that explicit by inserting a relative "m 0 0".
pub struct PathParser<'b> {
    tokens: Lexer<'b>,

    builder: &'b mut PathBuilder,

    strict: bool,
    diagnostics: Vec<ParseError>,

    // Command letter whose values are being read, and whether it is relative
    current: Option<(CommandKind, bool)>,
    command_pos: usize,

    // Values of the segment being read, and the position of the first one
    values: ArrayVec<[f64; 7]>,
    segment_pos: usize,

    // Segments emitted since the current command letter
    segments: usize,

    // An unknown command letter was read; its values are dropped
    skipping: bool,

    // The last command was a ClosePath, and no letter came after it
    after_close: bool,
    reported_values_after_close: bool,
}

impl<'b> PathParser<'b> {
    pub fn new(builder: &'b mut PathBuilder, path_str: &'b str, mode: ParseMode) -> PathParser<'b> {
        PathParser {
            tokens: Lexer::new(path_str),
            builder,
            strict: mode == ParseMode::Strict,
            diagnostics: Vec::new(),
            current: None,
            command_pos: 0,
            values: ArrayVec::new(),
            segment_pos: 0,
            segments: 0,
            skipping: false,
            after_close: false,
            reported_values_after_close: false,
        }
    }

    // This is the entry point for parsing a given blob of path data.
    pub fn parse(&mut self) -> Result<Vec<ParseError>, ParseError> {
        loop {
            self.tokens.require_flags(self.flags_needed());

            let (pos, token) = match self.tokens.next() {
                Some(t) => t,
                None => break,
            };

            match token {
                Ok(CommandToken(c)) => self.command(pos, c)?,

                Ok(Number(n)) => {
                    if has_leading_zero(&self.tokens.input[pos..]) {
                        self.report(pos, ErrorKind::LeadingZero)?;
                    }
                    self.value(pos, n, false)?;
                }

                Ok(Flag(f)) => self.value(pos, if f { 1.0 } else { 0.0 }, true)?,

                Err(e) => self.report(pos, ErrorKind::LexError(e))?,
            }
        }

        self.finish_command()?;

        Ok(std::mem::take(&mut self.diagnostics))
    }

    fn report(&mut self, position: usize, kind: ErrorKind) -> Result<(), ParseError> {
        let error = ParseError::new(position, kind);

        if self.strict {
            Err(error)
        } else {
            self.diagnostics.push(error);
            Ok(())
        }
    }

    fn flags_needed(&self) -> u8 {
        match self.current {
            Some((CommandKind::Arc, _)) => match self.values.len() {
                3 => 2,
                4 => 1,
                _ => 0,
            },
            _ => 0,
        }
    }

    fn command(&mut self, pos: usize, c: char) -> Result<(), ParseError> {
        self.finish_command()?;

        let (kind, relative) = match CommandKind::from_letter(c) {
            Some(k) => k,
            None => {
                // Skip the values of the unknown command along with it.
                self.current = None;
                self.skipping = true;
                self.after_close = false;
                return self.report(pos, ErrorKind::UnexpectedCommand(c));
            }
        };

        if self.builder.is_empty() && kind != CommandKind::MoveTo {
            self.report(pos, ErrorKind::MissingMoveTo)?;
            self.builder.move_to(0.0, 0.0);
        }

        if self.after_close && kind != CommandKind::MoveTo && kind != CommandKind::ClosePath {
            self.builder
                .push(Command::relative(PathCommand::MoveTo(Default::default())));
        }

        self.current = Some((kind, relative));
        self.skipping = false;
        self.command_pos = pos;
        self.segments = 0;
        self.after_close = kind == CommandKind::ClosePath;
        self.reported_values_after_close = false;

        if kind == CommandKind::ClosePath {
            self.builder.push(Command {
                segment: PathCommand::ClosePath,
                relative,
            });
        }

        Ok(())
    }

    fn value(&mut self, pos: usize, mut n: f64, is_flag: bool) -> Result<(), ParseError> {
        let (kind, _) = match self.current {
            Some(c) => c,

            None if self.builder.is_empty() && !self.skipping => {
                // Numbers before any command; read them as an absolute MoveTo.
                self.report(pos, ErrorKind::MissingMoveTo)?;
                self.current = Some((CommandKind::MoveTo, false));
                self.command_pos = pos;
                (CommandKind::MoveTo, false)
            }

            None => return Ok(()),
        };

        if kind == CommandKind::ClosePath {
            if !self.reported_values_after_close {
                self.reported_values_after_close = true;
                self.report(pos, ErrorKind::ValuesAfterClosePath)?;
            }
            return Ok(());
        }

        if self.values.is_empty() {
            self.segment_pos = pos;
        }

        if kind == CommandKind::Arc && (self.values.len() == 3 || self.values.len() == 4) && !is_flag
        {
            self.report(pos, ErrorKind::InvalidArcFlag)?;
            n = if n != 0.0 { 1.0 } else { 0.0 };
        }

        self.values.push(n);

        if self.values.len() == kind.num_values() {
            self.emit_segment()?;
        }

        Ok(())
    }

    fn emit_segment(&mut self) -> Result<(), ParseError> {
        let (mut kind, relative) = match self.current {
            Some(c) => c,
            None => return Ok(()),
        };

        if kind == CommandKind::MoveTo && self.segments > 0 {
            kind = CommandKind::LineTo;
        }

        let result = Command::from_values(kind, relative, &self.values);
        self.values.clear();
        self.segments += 1;

        match result {
            Ok(command) => {
                self.builder.push(command);
                Ok(())
            }
            Err(e) => self.report(self.segment_pos, ErrorKind::Command(e)),
        }
    }

    // Checks that the command letter being read got complete segments.
    fn finish_command(&mut self) -> Result<(), ParseError> {
        let kind = match self.current {
            Some((kind, _)) if kind != CommandKind::ClosePath => kind,
            _ => return Ok(()),
        };

        let (pos, found) = if !self.values.is_empty() {
            (self.segment_pos, self.values.len())
        } else if self.segments == 0 {
            (self.command_pos, 0)
        } else {
            return Ok(());
        };

        self.values.clear();
        self.segments = 0;

        self.report(
            pos,
            ErrorKind::ArgumentCount {
                command: kind.letter(),
                expected: kind.num_values(),
                found,
            },
        )
    }
}

#[derive(Debug, PartialEq, Copy, Clone)]
pub enum ErrorKind {
    /// The path data does not start with a MoveTo; one to (0, 0) is inserted.
    MissingMoveTo,

    /// A command letter was followed by an incomplete segment, which is discarded.
    ArgumentCount {
        command: char,
        expected: usize,
        found: usize,
    },

    /// Numbers after a ClosePath; they are discarded.
    ValuesAfterClosePath,

    /// A number is written with a redundant leading zero, like "007".
    LeadingZero,

    /// An arc flag is not 0 or 1; non-zero values are read as 1.
    InvalidArcFlag,

    /// Not a path command letter; the letter and its values are skipped.
    UnexpectedCommand(char),

    LexError(LexError),

    Command(CommandError),
}

#[derive(Debug, PartialEq, Copy, Clone)]
pub struct ParseError {
    pub position: usize,
    pub kind: ErrorKind,
}

impl ParseError {
    fn new(pos: usize, k: ErrorKind) -> ParseError {
        ParseError {
            position: pos,
            kind: k,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error at position {}: ", self.position)?;

        match self.kind {
            ErrorKind::MissingMoveTo => write!(f, "path data must start with a moveto"),
            ErrorKind::ArgumentCount {
                command,
                expected,
                found,
            } => write!(
                f,
                "command '{}' expects {} values, found {}",
                command, expected, found
            ),
            ErrorKind::ValuesAfterClosePath => write!(f, "unexpected values after closepath"),
            ErrorKind::LeadingZero => write!(f, "number has a leading zero"),
            ErrorKind::InvalidArcFlag => write!(f, "arc flag must be 0 or 1"),
            ErrorKind::UnexpectedCommand(c) => write!(f, "unexpected command '{}'", c),
            ErrorKind::LexError(LexError::NumberOutOfRange) => {
                write!(f, "number is out of range")
            }
            ErrorKind::LexError(_) => write!(f, "error processing token"),
            ErrorKind::Command(e) => write!(f, "{}", e),
        }
    }
}

impl error::Error for ParseError {}

/// Path data as parsed, with what the parser saw along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPath {
    pub path: PathData,

    /// Some command other than ClosePath is relative.
    pub has_relatives: bool,

    pub has_arcs: bool,

    /// Some command is a Q or T.
    pub has_quadratics: bool,

    /// Some command is an H, V, S or T.
    pub has_shorthands: bool,

    /// Errors that the parser recovered from, in order of position.
    pub diagnostics: Vec<ParseError>,
}

/// Parses SVG path data.
///
/// In [`ParseMode::Permissive`] this only fails if the parser could not recover, which
/// does not happen in practice; errors are returned in [`ParsedPath::diagnostics`].  In
/// [`ParseMode::Strict`] the first error is returned.
///
/// ```
/// use svgpath::{parse_path, ParseMode};
///
/// let parsed = parse_path("M10 20 h5 v5 z", ParseMode::Strict).unwrap();
/// assert_eq!(parsed.path.len(), 4);
/// assert!(parsed.has_relatives);
/// assert!(parsed.has_shorthands);
/// ```
pub fn parse_path(input: &str, mode: ParseMode) -> Result<ParsedPath, ParseError> {
    let mut builder = PathBuilder::default();
    let diagnostics = builder.parse(input, mode)?;

    let path = builder
        .into_path_data()
        .map_err(|_| ParseError::new(0, ErrorKind::MissingMoveTo))?;

    let mut parsed = ParsedPath {
        path,
        has_relatives: false,
        has_arcs: false,
        has_quadratics: false,
        has_shorthands: false,
        diagnostics,
    };

    for command in parsed.path.iter() {
        let kind = command.kind();

        parsed.has_relatives |= command.relative && kind != CommandKind::ClosePath;
        parsed.has_arcs |= kind == CommandKind::Arc;
        parsed.has_quadratics |= matches!(kind, CommandKind::QuadTo | CommandKind::SmoothQuadTo);
        parsed.has_shorthands |= kind.is_shorthand();
    }

    Ok(parsed)
}
