//! Filename interpreter.
//!
//! Walks the lexer output once, left to right, with a cursor and the
//! current numbering axis. Each token kind has a handler that returns the
//! index to continue from. A handler that decides the lexer guessed wrong
//! reclassifies the token (recording a [`Correction`]) and returns the same
//! index so the token is handled again under its new kind.

use super::range;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind};
use crate::model::{Axis, Correction, NumberSet, ParsedFile, SpecialKind};

/// Interpret a filename's tokens.
///
/// `series_title` is only used to recognize bracketed commentary that
/// repeats the title (e.g. `(Berserk Prototype)`).
///
/// # Errors
///
/// [`Error::MalformedInput`] if the sequence is empty or a group bracket is
/// never closed.
pub fn interpret(
    tokens: Vec<Token>,
    series_title: &str,
    sink: &mut dyn DiagnosticSink,
) -> Result<ParsedFile> {
    let name: String = tokens.iter().map(|t| t.text.as_str()).collect();
    if tokens.is_empty() {
        return Err(Error::malformed(name, "no tokens"));
    }

    let mut state = FileState::new(name, series_title, tokens, sink);
    let mut cursor = 0;
    while cursor < state.tokens.len() {
        cursor = state.step(cursor)?;
    }
    Ok(state.finish())
}

/// Bare numbers seen without a volume/chapter keyword.
#[derive(Debug)]
struct WildNumber {
    /// Raw text of the first number, used by the axis heuristic.
    text: String,
    values: Vec<f64>,
}

struct FileState<'a> {
    name: String,
    series_title: &'a str,
    tokens: Vec<Token>,
    corrections: Vec<Correction>,
    sink: &'a mut dyn DiagnosticSink,

    axis: Option<Axis>,
    volumes: NumberSet,
    chapters: NumberSet,
    wild: Vec<WildNumber>,
    tags: Vec<String>,
    title: String,
    extension: String,
    complete: bool,
    special: Option<SpecialKind>,
}

impl<'a> FileState<'a> {
    fn new(
        name: String,
        series_title: &'a str,
        tokens: Vec<Token>,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        Self {
            name,
            series_title,
            tokens,
            corrections: Vec::new(),
            sink,
            axis: None,
            volumes: NumberSet::new(),
            chapters: NumberSet::new(),
            wild: Vec::new(),
            tags: Vec::new(),
            title: String::new(),
            extension: String::new(),
            complete: false,
            special: None,
        }
    }

    /// Handle the token at `i` and return where to continue.
    fn step(&mut self, i: usize) -> Result<usize> {
        match self.tokens[i].kind {
            TokenKind::Volume => Ok(self.on_keyword(i, Axis::Volume)),
            TokenKind::Chapter => Ok(self.on_keyword(i, Axis::Chapter)),
            TokenKind::Comma => Ok(self.on_comma(i)),
            TokenKind::Number => Ok(self.on_number(i)),
            TokenKind::Range => {
                self.reclassify(i, TokenKind::Delimiter);
                Ok(i + 1)
            }
            TokenKind::Pilot
            | TokenKind::Prologue
            | TokenKind::Prelude
            | TokenKind::Prototype
            | TokenKind::Artbook => Ok(self.on_special(i)),
            TokenKind::Bonus => {
                if self.volumes.is_empty() && self.chapters.is_empty() {
                    self.sink.record(Diagnostic::BonusWithoutNumber {
                        input: self.name.clone(),
                    });
                }
                self.special = Some(SpecialKind::Bonus);
                Ok(i + 1)
            }
            TokenKind::CompleteArchive => {
                self.complete = true;
                Ok(i + 1)
            }
            TokenKind::GroupBegin => self.on_group(i),
            TokenKind::Data => {
                self.title.push_str(&self.tokens[i].text);
                if matches!(
                    self.kind_at(i + 1),
                    Some(TokenKind::Delimiter | TokenKind::Range)
                ) {
                    self.title.push(' ');
                }
                Ok(i + 1)
            }
            TokenKind::Extension => {
                self.extension = self.tokens[i].text.trim_start_matches('.').to_string();
                Ok(i + 1)
            }
            TokenKind::Delimiter | TokenKind::GroupEnd => Ok(i + 1),
        }
    }

    fn on_keyword(&mut self, i: usize, axis: Axis) -> usize {
        self.axis = Some(axis);
        let n = self.skip_delims(i + 1, true);
        let Some(value) = self.number_at(n) else {
            self.reclassify(i, TokenKind::Data);
            return i;
        };
        self.axis_set(axis).push(value);
        self.follow_range(n, value, axis)
    }

    fn on_comma(&mut self, i: usize) -> usize {
        let Some(axis) = self.axis else {
            self.reclassify(i, TokenKind::Data);
            return i;
        };
        let n = self.skip_delims(i + 1, true);
        let Some(value) = self.number_at(n) else {
            self.reclassify(i, TokenKind::Data);
            return i;
        };
        self.axis_set(axis).push(value);
        self.follow_range(n, value, axis)
    }

    /// After a keyword or comma number at `n`, absorb a trailing range.
    fn follow_range(&mut self, n: usize, start: f64, axis: Axis) -> usize {
        let k = self.skip_delims(n + 1, false);
        if !self.kind_is(k, TokenKind::Range) {
            return k;
        }

        let e = self.skip_delims(k + 1, true);
        if self.at_end_of_content(e) {
            self.axis_set(axis).open(start);
            return e;
        }
        match self.number_at(e) {
            Some(end) => {
                match self.expand(start, end) {
                    Some(values) => self.axis_set(axis).extend(values),
                    None => self.drop_range_end(k, e),
                }
                e + 1
            }
            None => {
                self.reclassify(k, TokenKind::Delimiter);
                e
            }
        }
    }

    fn on_number(&mut self, i: usize) -> usize {
        let Some(start) = self.number_at(i) else {
            return i + 1;
        };
        let k = self.skip_delims(i + 1, false);

        match self.kind_at(k) {
            Some(TokenKind::Comma) => {
                let n = self.skip_delims(k + 1, true);
                if self.number_at(n).is_some() {
                    self.push_wild(i, vec![start]);
                    n
                } else {
                    self.reclassify(i, TokenKind::Data);
                    self.reclassify(k, TokenKind::Data);
                    i
                }
            }
            Some(TokenKind::Range) => {
                let e = self.skip_delims(k + 1, true);
                match self.number_at(e) {
                    Some(end) => {
                        let mut values = vec![start];
                        match self.expand(start, end) {
                            Some(rest) => values.extend(rest),
                            None => self.drop_range_end(k, e),
                        }
                        self.push_wild(i, values);
                        e + 1
                    }
                    None => {
                        self.reclassify(i, TokenKind::Data);
                        self.reclassify(k, TokenKind::Delimiter);
                        i
                    }
                }
            }
            Some(TokenKind::Data) => {
                self.reclassify(i, TokenKind::Data);
                i
            }
            _ => {
                self.push_wild(i, vec![start]);
                k
            }
        }
    }

    fn on_special(&mut self, i: usize) -> usize {
        if !self.volumes.is_empty() || !self.chapters.is_empty() {
            self.reclassify(i, TokenKind::Data);
            return i;
        }
        self.special = SpecialKind::from_token(self.tokens[i].kind);
        i + 1
    }

    fn on_group(&mut self, i: usize) -> Result<usize> {
        if self
            .kind_at(i + 1)
            .is_some_and(TokenKind::is_structural_keyword)
        {
            return Ok(i + 1);
        }
        if self.is_bracketed_range(i) {
            return Ok(i + 1);
        }

        let mut tag = String::new();
        let mut j = i + 1;
        while j < self.tokens.len() && self.tokens[j].kind != TokenKind::GroupEnd {
            if self.tokens[j].kind == TokenKind::Number {
                self.reclassify(j, TokenKind::Data);
            }
            tag.push_str(&self.tokens[j].text);
            j += 1;
        }
        if j == self.tokens.len() {
            return Err(Error::malformed(&self.name, "unclosed group bracket"));
        }

        let before_close = self.tokens[j - 1].kind;
        let commentary = (before_close.is_special() || before_close == TokenKind::Bonus)
            && starts_with_title(&tag, self.series_title);
        if !commentary {
            self.tags.push(tag);
        }
        Ok(j + 1)
    }

    /// Whether the bracket opened at `i` holds a numeric range and nothing
    /// else, as in `[001-010]`. A lone number such as `(2015)` stays a tag.
    fn is_bracketed_range(&self, i: usize) -> bool {
        let inner = &self.tokens[i + 1..];
        let Some(len) = inner.iter().position(|t| t.kind == TokenKind::GroupEnd) else {
            return false;
        };
        let kinds: Vec<TokenKind> = inner[..len]
            .iter()
            .map(|t| t.kind)
            .filter(|&kind| kind != TokenKind::Delimiter)
            .collect();
        kinds == [TokenKind::Number, TokenKind::Range, TokenKind::Number]
    }

    fn push_wild(&mut self, i: usize, values: Vec<f64>) {
        self.wild.push(WildNumber {
            text: self.tokens[i].text.clone(),
            values,
        });
    }

    /// Skip delimiters from `i`. With `convert_ranges`, range markers are
    /// skipped as well and reclassified as delimiters.
    fn skip_delims(&mut self, mut i: usize, convert_ranges: bool) -> usize {
        while let Some(kind) = self.kind_at(i) {
            match kind {
                TokenKind::Delimiter => {}
                TokenKind::Range if convert_ranges => self.reclassify(i, TokenKind::Delimiter),
                _ => break,
            }
            i += 1;
        }
        i
    }

    fn expand(&mut self, start: f64, end: f64) -> Option<Vec<f64>> {
        if range::is_reversed(start, end) {
            self.sink.record(Diagnostic::ReversedRange {
                input: self.name.clone(),
                start,
                end,
            });
        }
        let values = range::expand(start, end);
        if values.is_none() {
            self.sink.record(Diagnostic::RangeTooLarge {
                input: self.name.clone(),
                start,
                end,
            });
        }
        values
    }

    /// An oversized range keeps its start; the marker and end become text.
    fn drop_range_end(&mut self, range_at: usize, end_at: usize) {
        self.reclassify(range_at, TokenKind::Delimiter);
        self.reclassify(end_at, TokenKind::Data);
    }

    fn reclassify(&mut self, i: usize, to: TokenKind) {
        let token = &mut self.tokens[i];
        let from = token.kind;
        if from == to {
            return;
        }
        token.kind = to;
        if to != TokenKind::Number {
            token.value = None;
        }
        self.corrections.push(Correction {
            index: i,
            original: from,
            corrected: to,
        });
        self.sink.record(Diagnostic::Corrected {
            input: self.name.clone(),
            index: i,
            text: self.tokens[i].text.clone(),
            from,
            to,
        });
    }

    fn kind_at(&self, i: usize) -> Option<TokenKind> {
        self.tokens.get(i).map(|t| t.kind)
    }

    fn kind_is(&self, i: usize, kind: TokenKind) -> bool {
        self.kind_at(i) == Some(kind)
    }

    fn number_at(&self, i: usize) -> Option<f64> {
        self.tokens
            .get(i)
            .filter(|t| t.kind == TokenKind::Number)
            .and_then(|t| t.value)
    }

    /// The extension closes the numbered part of a filename.
    fn at_end_of_content(&self, i: usize) -> bool {
        matches!(self.kind_at(i), None | Some(TokenKind::Extension))
    }

    fn axis_set(&mut self, axis: Axis) -> &mut NumberSet {
        match axis {
            Axis::Volume => &mut self.volumes,
            Axis::Chapter => &mut self.chapters,
        }
    }

    fn resolve_wild(&mut self) {
        if self.wild.is_empty() {
            return;
        }
        let first = self.wild[0].text.clone();
        let values: Vec<f64> = self
            .wild
            .drain(..)
            .flat_map(|w| w.values)
            .collect();

        // Three or more characters reads as a chapter ("001", "120") unless
        // the text is a short decimal like "1.5".
        let decimal_head = matches!(first.find('.'), Some(0 | 1));
        let target = if first.chars().count() >= 3 && !decimal_head {
            Some(Axis::Chapter)
        } else if self.volumes.is_empty() && self.chapters.is_empty() {
            let max = values.iter().copied().fold(f64::MIN, f64::max);
            if max % 100.0 == 0.0 {
                Some(Axis::Chapter)
            } else {
                Some(Axis::Volume)
            }
        } else if self.volumes.is_empty() {
            Some(Axis::Volume)
        } else if self.chapters.is_empty() {
            Some(Axis::Chapter)
        } else {
            None
        };

        match target {
            Some(axis) => self.axis_set(axis).extend(values),
            None => self.sink.record(Diagnostic::UnassignedNumbers {
                input: self.name.clone(),
                values,
            }),
        }
    }

    fn finish(mut self) -> ParsedFile {
        self.resolve_wild();
        self.volumes.finalize();
        self.chapters.finalize();
        ParsedFile {
            name: self.name,
            tokens: self.tokens,
            corrections: self.corrections,
            volumes: self.volumes,
            chapters: self.chapters,
            tags: self.tags,
            title_fragment: self.title.trim().to_string(),
            extension: self.extension,
            is_complete_archive: self.complete,
            special: self.special,
        }
    }
}

/// Case-insensitive, whitespace-trimmed prefix check.
fn starts_with_title(tag: &str, title: &str) -> bool {
    let title = title.trim().to_lowercase();
    if title.is_empty() {
        return false;
    }
    let head: String = tag
        .trim_start()
        .chars()
        .take(title.chars().count())
        .collect();
    head.to_lowercase() == title
}
