use crate::error::{CoordinateError, Result};
use crate::models::{Coordinate, Scope};

/// Maven's informational line prefix
pub const DEFAULT_MARKER: &str = "[INFO]";

/// What a single report line turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Not a dependency declaration (wrong marker, chatter, filtered scope)
    Skipped,
    Dependency(Coordinate),
}

/// Parse one line of `mvn dependency:list` / `dependency:tree` output
///
/// Only lines starting with `marker` and ending in a coordinate whose scope is
/// in `scopes` are candidates. Everything else is skipped silently, which is
/// how the rest of Maven's `[INFO]` noise gets filtered out.
pub fn parse_report_line(line: &str, marker: &str, scopes: &[Scope]) -> Result<LineOutcome> {
    let mut fields = line.split_whitespace();

    match fields.next() {
        Some(first) if first == marker => {}
        _ => return Ok(LineOutcome::Skipped),
    }

    let token = match fields.last() {
        Some(token) => token,
        None => return Ok(LineOutcome::Skipped), // bare marker line
    };

    let suffix = token.rsplit(':').next().unwrap_or(token);
    match Scope::from_suffix(suffix) {
        Some(scope) if scopes.contains(&scope) => {}
        _ => return Ok(LineOutcome::Skipped),
    }

    parse_coordinate(token).map(LineOutcome::Dependency)
}

/// Parse a `group:artifact:packaging[:classifier]:version:scope` token
pub fn parse_coordinate(token: &str) -> Result<Coordinate> {
    let parts: Vec<String> = token.split(':').map(str::to_string).collect();

    if parts.len() < 3 {
        return Err(CoordinateError::TooFewParts {
            token: token.to_string(),
            found: parts.len(),
        });
    }

    if let Some(position) = parts.iter().position(|p| p.is_empty()) {
        return Err(CoordinateError::EmptyComponent {
            token: token.to_string(),
            position,
        });
    }

    // len >= 3 was checked above
    let suffix = &parts[parts.len() - 1];
    let scope = Scope::from_suffix(suffix).ok_or_else(|| CoordinateError::UnknownScope {
        token: token.to_string(),
        scope: suffix.clone(),
    })?;

    Ok(Coordinate::new(token, parts, scope))
}
