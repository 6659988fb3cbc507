//! Exchange market snapshots.
//!
//! Each snapshot file holds one market as line-delimited stream messages,
//! usually bzip2-compressed. The first line carries the `marketDefinition`
//! (event name, runners); later lines carry `rc` runner changes with last
//! traded prices; the final definition carries settled runner statuses.
//!
//! ```text
//! {"op":"mcm","pt":1633600000000,"mc":[{"id":"1.1","marketDefinition":{"eventName":"T1 v EDward Gaming","runners":[{"id":1,"name":"T1","status":"ACTIVE"},...]}}]}
//! {"op":"mcm","pt":1633600005000,"mc":[{"id":"1.1","rc":[{"ltp":1.52,"id":1}]}]}
//! ```

pub mod odds;

use bzip2::read::MultiBzDecoder;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read, Seek};
use std::path::Path;
use tracing::debug;

use crate::types::{MarketEvent, ResolutionFailure, Runner, RunnerStatus};

// ---------------------------------------------------------------------------
// Stream message types (exchange JSON -> Rust)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct StreamMessage {
    #[serde(default)]
    mc: Vec<MarketChange>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarketChange {
    #[serde(default)]
    market_definition: Option<MarketDefinition>,
    /// Runner changes.
    #[serde(default)]
    rc: Vec<RunnerChange>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarketDefinition {
    #[serde(default)]
    event_name: Option<String>,
    #[serde(default)]
    runners: Vec<RunnerDefinition>,
}

#[derive(Debug, Deserialize)]
struct RunnerDefinition {
    id: u64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RunnerChange {
    id: u64,
    /// Last traded price.
    #[serde(default)]
    ltp: Option<f64>,
}

// ---------------------------------------------------------------------------
// File access
// ---------------------------------------------------------------------------

const BZIP2_MAGIC: &[u8; 3] = b"BZh";

/// Open a snapshot as a line reader, decompressing bzip2 when the file
/// starts with the bzip2 magic bytes. Concatenated bzip2 streams are
/// read through to the end.
fn open_snapshot(path: &Path) -> std::io::Result<Box<dyn BufRead>> {
    let mut file = File::open(path)?;
    let mut magic = [0u8; 3];
    let compressed = match file.read_exact(&mut magic) {
        Ok(()) => &magic == BZIP2_MAGIC,
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => false,
        Err(e) => return Err(e),
    };
    file.rewind()?;
    if compressed {
        Ok(Box::new(BufReader::new(MultiBzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

fn io_failure(path: &Path, e: std::io::Error) -> ResolutionFailure {
    ResolutionFailure::Io(format!("{}: {e}", path.display()))
}

/// Event name from the first line only. Used to filter files before a full parse.
pub fn read_event_name(path: &Path) -> Result<String, ResolutionFailure> {
    let mut reader = open_snapshot(path).map_err(|e| io_failure(path, e))?;
    let mut first = Vec::new();
    reader
        .read_until(b'\n', &mut first)
        .map_err(|e| io_failure(path, e))?;
    let (name, _) = first_definition(&first)?;
    Ok(name)
}

/// Parse a whole snapshot file. Lines are kept as raw bytes so a line
/// that is not UTF-8 is skipped like any other unreadable line.
pub fn read_event(path: &Path) -> Result<MarketEvent, ResolutionFailure> {
    let reader = open_snapshot(path).map_err(|e| io_failure(path, e))?;
    let lines = reader
        .split(b'\n')
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| io_failure(path, e))?;
    parse_event(lines)
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Event name and runners of the definition on the first line.
fn first_definition(line: &[u8]) -> Result<(String, Vec<RunnerDefinition>), ResolutionFailure> {
    if is_blank(line) {
        return Err(ResolutionFailure::MissingDefinition);
    }
    let msg: StreamMessage = serde_json::from_slice(line)
        .map_err(|e| ResolutionFailure::MalformedDefinition(e.to_string()))?;
    let def = msg
        .mc
        .into_iter()
        .find_map(|mc| mc.market_definition)
        .ok_or(ResolutionFailure::MissingDefinition)?;
    let name = def
        .event_name
        .ok_or_else(|| ResolutionFailure::MalformedDefinition("missing eventName".into()))?;
    Ok((name, def.runners))
}

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

/// Build a `MarketEvent` from snapshot lines.
///
/// Runner order comes from the first definition. Prices accumulate per
/// runner id in stream order; runner statuses come from the last
/// definition seen.
pub fn parse_event<I, S>(lines: I) -> Result<MarketEvent, ResolutionFailure>
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    let mut lines = lines.into_iter();
    let first = lines.next().ok_or(ResolutionFailure::MissingDefinition)?;
    let (event_name, defs) = first_definition(first.as_ref())?;

    if defs.len() != 2 {
        return Err(ResolutionFailure::RunnerCount(defs.len()));
    }

    let mut runners = Vec::with_capacity(2);
    for def in defs {
        let name = def.name.ok_or_else(|| {
            ResolutionFailure::MalformedDefinition(format!("runner {} has no name", def.id))
        })?;
        runners.push(Runner {
            id: def.id,
            name,
            prices: Vec::new(),
            status: RunnerStatus::from_wire(def.status.as_deref().unwrap_or("ACTIVE")),
        });
    }
    if runners[0].id == runners[1].id {
        return Err(ResolutionFailure::MalformedDefinition(
            "duplicate runner id".into(),
        ));
    }

    let slot: HashMap<u64, usize> = runners.iter().enumerate().map(|(i, r)| (r.id, i)).collect();

    // The first line may already carry prices, so it is replayed here.
    let rest = std::iter::once(first).chain(lines);
    for (line_no, line) in rest.enumerate() {
        let line = line.as_ref();
        if is_blank(line) {
            continue;
        }
        let msg: StreamMessage = match serde_json::from_slice(line) {
            Ok(m) => m,
            Err(e) => {
                debug!(line = line_no + 1, error = %e, "Skipping unreadable stream line");
                continue;
            }
        };
        for mc in msg.mc {
            for change in mc.rc {
                let (Some(&i), Some(ltp)) = (slot.get(&change.id), change.ltp) else {
                    continue;
                };
                if ltp > 0.0 && ltp.is_finite() {
                    runners[i].prices.push(ltp);
                }
            }
            if let Some(def) = mc.market_definition {
                for rd in def.runners {
                    if let (Some(&i), Some(status)) = (slot.get(&rd.id), rd.status) {
                        runners[i].status = RunnerStatus::from_wire(&status);
                    }
                }
            }
        }
    }

    let b = runners.pop();
    let a = runners.pop();
    match (a, b) {
        (Some(a), Some(b)) => Ok(MarketEvent {
            event_name,
            runners: [a, b],
        }),
        _ => Err(ResolutionFailure::RunnerCount(0)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
