//! Line-oriented driver: one JSON game state in, one JSON action out.

use crate::engine::PolicyEngine;
use crate::state::GameState;
use std::io::{self, BufRead, Write};
use tracing::warn;

/// Counters for one run of [`run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub decided: usize,
    pub skipped: usize,
}

/// Read newline-delimited game states from `input` and write one action per
/// line to `output`.
///
/// Every JSON object gets exactly one reply. Missing or `null` fields are
/// answered by the fallback strategy. Blank lines are ignored. Lines that are
/// not a game-state document at all (not JSON, or a field of the wrong type)
/// are logged and produce no output line.
pub fn run<R: BufRead, W: Write>(
    engine: &mut PolicyEngine,
    input: R,
    mut output: W,
) -> io::Result<StreamStats> {
    let mut stats = StreamStats::default();
    for (lineno, line) in input.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let state: GameState = match serde_json::from_str(trimmed) {
            Ok(s) => s,
            Err(e) => {
                warn!(line = lineno + 1, error = %e, "skipping unparsable game state");
                stats.skipped += 1;
                continue;
            }
        };
        let action = engine.decide(&state);
        serde_json::to_writer(&mut output, &action)?;
        output.write_all(b"\n")?;
        stats.decided += 1;
    }
    output.flush()?;
    Ok(stats)
}
