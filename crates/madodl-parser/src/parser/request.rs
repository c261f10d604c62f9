//! Request interpreter.

use super::range;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{Error, Result};
use crate::lexer::request::{tokenize_request, RequestToken};
use crate::model::{Axis, NumberSet, ParsedRequest};

/// Interpret a request given as `[series, expr, expr, ...]`.
///
/// No expressions, or any expression equal to `all`, asks for the whole
/// series. Otherwise every expression is lexed and read left to right;
/// a leading bare number is taken as a volume.
///
/// # Errors
///
/// [`Error::Request`] for a missing series name, a character outside the
/// request grammar, a volume/chapter prefix with no number after it, or a
/// malformed range.
///
/// # Examples
///
/// ```
/// use madodl_parser::{interpret_request, NullSink};
///
/// let req = interpret_request(&["Berserk", "v1-3", "c5,7"], &mut NullSink).unwrap();
/// assert_eq!(req.volumes.values(), &[1.0, 2.0, 3.0]);
/// assert_eq!(req.chapters.values(), &[5.0, 7.0]);
/// ```
pub fn interpret_request<S: AsRef<str>>(
    args: &[S],
    sink: &mut dyn DiagnosticSink,
) -> Result<ParsedRequest> {
    let Some((series, exprs)) = args.split_first() else {
        return Err(Error::request("", "missing series name"));
    };
    let series = series.as_ref();

    if exprs.is_empty()
        || exprs
            .iter()
            .any(|e| e.as_ref().trim().eq_ignore_ascii_case("all"))
    {
        return Ok(ParsedRequest::all(series));
    }

    let mut request = ParsedRequest {
        series_name: series.to_string(),
        ..ParsedRequest::default()
    };
    for expr in exprs {
        read_expression(expr.as_ref(), &mut request, sink)?;
    }
    request.volumes.finalize();
    request.chapters.finalize();
    Ok(request)
}

fn read_expression(
    expr: &str,
    request: &mut ParsedRequest,
    sink: &mut dyn DiagnosticSink,
) -> Result<()> {
    let toks = tokenize_request(expr)?;
    let bad = |reason: &str| Error::request(expr, reason);
    let number_after = |i: usize| toks.get(i + 1).and_then(|t| t.number());

    let (mut axis, mut i) = match toks.first() {
        Some(RequestToken::Volume) => (Axis::Volume, 1),
        Some(RequestToken::Chapter) => (Axis::Chapter, 1),
        Some(RequestToken::Number(_)) => {
            sink.record(Diagnostic::DefaultedToVolume {
                expression: expr.to_string(),
            });
            (Axis::Volume, 0)
        }
        Some(_) => return Err(bad("bad vol/ch format")),
        None => return Err(bad("empty expression")),
    };
    if i == 1 && number_after(0).is_none() {
        return Err(bad(&format!("no number specified for {axis}")));
    }

    while i < toks.len() {
        match toks[i] {
            RequestToken::Number(n) => {
                axis_set(request, axis).push(n);
                i += 1;
            }
            RequestToken::Range => {
                let start = i.checked_sub(1).and_then(|p| toks[p].number());
                if i + 1 == toks.len() {
                    let Some(start) = start else {
                        return Err(bad(&format!("bad range for {axis}")));
                    };
                    axis_set(request, axis).open(start);
                    break;
                }
                if toks[i + 1] == RequestToken::Comma {
                    return Err(bad(&format!("range followed by comma for {axis}")));
                }
                let (Some(start), Some(end)) = (start, number_after(i)) else {
                    return Err(bad(&format!("bad range for {axis}")));
                };
                if range::is_reversed(start, end) {
                    sink.record(Diagnostic::ReversedRange {
                        input: expr.to_string(),
                        start,
                        end,
                    });
                }
                let Some(values) = range::expand(start, end) else {
                    return Err(bad(&format!("range too large for {axis}")));
                };
                axis_set(request, axis).extend(values);
                i += 2;
            }
            RequestToken::Comma => {
                if number_after(i).is_none() {
                    sink.record(Diagnostic::ExtraneousComma {
                        expression: expr.to_string(),
                    });
                }
                i += 1;
            }
            RequestToken::Volume | RequestToken::Chapter => {
                axis = if toks[i] == RequestToken::Volume {
                    Axis::Volume
                } else {
                    Axis::Chapter
                };
                if number_after(i).is_none() {
                    return Err(bad(&format!("no number specified for {axis}")));
                }
                i += 1;
            }
        }
    }
    Ok(())
}

fn axis_set(request: &mut ParsedRequest, axis: Axis) -> &mut NumberSet {
    match axis {
        Axis::Volume => &mut request.volumes,
        Axis::Chapter => &mut request.chapters,
    }
}
