//! PGN database input.
//!
//! Only the first game record of a database is read. The record is split into
//! its tag pairs and its raw movetext; movetext is not tokenized or replayed.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::ChessboardError;

/// The first game of a PGN database, tags parsed, movetext left raw
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameRecord {
    /// Tag pairs in file order, e.g. ("White", "Carlsen")
    pub tags: Vec<(String, String)>,
    pub movetext: String,
}

impl GameRecord {
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Open a PGN database and read its first game record.
/// Returns `Ok(None)` for a database with no games.
pub fn read_first_game(path: &Path) -> Result<Option<GameRecord>, ChessboardError> {
    let pgn_error = |reason: String| ChessboardError::Pgn {
        path: path.to_path_buf(),
        reason,
    };
    let file = File::open(path).map_err(|e| pgn_error(e.to_string()))?;
    first_game_from_reader(BufReader::new(file)).map_err(|e| pgn_error(e.to_string()))
}

fn first_game_from_reader<R: BufRead>(reader: R) -> std::io::Result<Option<GameRecord>> {
    let mut record = GameRecord::default();
    let mut in_movetext = false;
    let mut tags_closed = false;

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            // blank line after movetext ends the record
            if in_movetext && !record.movetext.is_empty() {
                break;
            }
            tags_closed = !record.tags.is_empty();
            continue;
        }

        if trimmed.starts_with('[') && !in_movetext {
            // game with no movetext: these tags open the next record
            if tags_closed {
                break;
            }
            if let Some(tag) = parse_tag_pair(trimmed) {
                record.tags.push(tag);
            }
            continue;
        }

        // a tag line after movetext belongs to the next game
        if trimmed.starts_with('[') {
            break;
        }

        in_movetext = true;
        if !record.movetext.is_empty() {
            record.movetext.push(' ');
        }
        record.movetext.push_str(trimmed);
    }

    if record.tags.is_empty() && record.movetext.is_empty() {
        Ok(None)
    } else {
        Ok(Some(record))
    }
}

/// Split `[Name "Value"]` into its parts
fn parse_tag_pair(line: &str) -> Option<(String, String)> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?.trim();
    let (name, rest) = inner.split_once(char::is_whitespace)?;
    let value = rest.trim().strip_prefix('"')?.strip_suffix('"')?;
    Some((name.to_string(), value.replace("\\\"", "\"")))
}
