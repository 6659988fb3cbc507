//! End-to-end dataset builds.
//!
//! Roster for the 2021 World Championship:
//! - EDward Gaming (LPL) resolves directly.
//! - DWG KIA (LCK) only has a Winter standings page.
//! - MAD Lions (LEC) trades as "Mad Lions" on the exchange.
//! - LOUD is denylisted, Saigon Buffalo plays in the VCS.
//! - Broken Team has no results page.

use bzip2::write::BzEncoder;
use bzip2::Compression;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rift_odds::config::AppConfig;
use rift_odds::engine::builder::{BuildSummary, DatasetBuilder};
use rift_odds::storage;
use rift_odds::types::{Competition, SourceError};

use crate::fake_wiki::{self, FakeWiki, BASE};

const EVENT: &str = "2021 World Championship";

fn wiki() -> FakeWiki {
    FakeWiki::new()
        .page(
            "World_Championship/2021",
            fake_wiki::roster_page(&[
                "EDward Gaming",
                "DWG KIA",
                "LOUD",
                "MAD Lions",
                "Saigon Buffalo",
                "Broken Team",
            ]),
        )
        .page("EDward_Gaming/Results", fake_wiki::results_page(EVENT, "LPL 2021 Summer"))
        .page("DWG_KIA/Results", fake_wiki::results_page(EVENT, "LCK 2021 Summer"))
        .page("MAD_Lions/Results", fake_wiki::results_page(EVENT, "LEC 2021 Summer"))
        .page("Saigon_Buffalo/Results", fake_wiki::results_page(EVENT, "VCS 2021 Spring"))
        .page("LPL/2021/Spring", fake_wiki::standings_page(&[("EDward Gaming", "12-4")]))
        .page("LCK/2021/Winter", fake_wiki::standings_page(&[("DWG KIA", "15-3")]))
        .page("LEC/2021/Spring", fake_wiki::standings_page(&[("MAD Lions", "8-6")]))
        .page("VCS/2021/Spring", fake_wiki::standings_page(&[("Saigon Buffalo", "10-4")]))
}

// ---------------------------------------------------------------------------
// Snapshot corpus
// ---------------------------------------------------------------------------

struct Workspace {
    root: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let root = std::env::temp_dir().join(format!("rift_odds_it_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(root.join("corpus/2021/Oct")).unwrap();
        Self { root }
    }

    fn corpus(&self) -> PathBuf {
        self.root.join("corpus")
    }

    fn archive(&self) -> PathBuf {
        self.root.join("archive")
    }

    fn write(&self, name: &str, lines: &[String]) {
        fs::write(self.corpus().join("2021/Oct").join(name), lines.join("\n")).unwrap();
    }

    fn write_bz2(&self, name: &str, lines: &[String]) {
        let mut enc = BzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(lines.join("\n").as_bytes()).unwrap();
        fs::write(self.corpus().join("2021/Oct").join(name), enc.finish().unwrap()).unwrap();
    }

    fn config(&self) -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.wiki.base_url = BASE.to_string();
        cfg.output.archive_dir = Some(self.archive().to_string_lossy().into_owned());
        cfg
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn definition(event: &str, a: (u64, &str, &str), b: (u64, &str, &str)) -> String {
    format!(
        r#"{{"op":"mcm","pt":1,"mc":[{{"id":"1.1","marketDefinition":{{"eventName":"{event}","runners":[{{"id":{},"name":"{}","status":"{}"}},{{"id":{},"name":"{}","status":"{}"}}]}}}}]}}"#,
        a.0, a.1, a.2, b.0, b.1, b.2
    )
}

fn tick(id: u64, ltp: f64) -> String {
    format!(r#"{{"op":"mcm","pt":2,"mc":[{{"id":"1.1","rc":[{{"ltp":{ltp},"id":{id}}}]}}]}}"#)
}

/// A settled two-runner market: opening definition, ticks, closing definition.
fn settled(event: &str, a: (u64, &str, &[f64]), b: (u64, &str, &[f64]), a_won: bool) -> Vec<String> {
    let (sa, sb) = if a_won { ("WINNER", "LOSER") } else { ("LOSER", "WINNER") };
    let mut lines = vec![definition(event, (a.0, a.1, "ACTIVE"), (b.0, b.1, "ACTIVE"))];
    lines.extend(a.2.iter().map(|&p| tick(a.0, p)));
    lines.extend(b.2.iter().map(|&p| tick(b.0, p)));
    lines.push(definition(event, (a.0, a.1, sa), (b.0, b.1, sb)));
    lines
}

fn seed_corpus(ws: &Workspace) {
    ws.write(
        "1.001",
        &settled(
            "EDward Gaming v DWG KIA",
            (11, "EDward Gaming", &[1.5, 1.6, 1.4]),
            (22, "DWG KIA", &[2.9, 2.7, 3.1]),
            true,
        ),
    );
    ws.write_bz2(
        "1.002.bz2",
        &settled(
            "MAD Lions v DWG KIA",
            (33, "Mad Lions", &[3.0, 3.4]),
            (22, "DWG KIA", &[1.4, 1.3]),
            false,
        ),
    );
    // Relevant through an alias, but never settled.
    ws.write(
        "1.003",
        &[
            definition("Edward Gaming v MAD Lions", (11, "EDward Gaming", "ACTIVE"), (33, "MAD Lions", "ACTIVE")),
            tick(11, 1.8),
            tick(33, 2.0),
        ],
    );
    ws.write(
        "1.004",
        &settled("T1 v DWG KIA", (44, "T1", &[1.9]), (22, "DWG KIA", &[1.9]), true),
    );
    ws.write(
        "1.005",
        &settled("Saigon Buffalo v DWG KIA", (55, "Saigon Buffalo", &[6.0]), (22, "DWG KIA", &[1.1]), false),
    );
    fs::write(ws.corpus().join("notes.txt"), "not a snapshot\n").unwrap();
}

fn archived(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_full_build() {
    let ws = Workspace::new();
    seed_corpus(&ws);
    let wiki = wiki();

    let outcome = DatasetBuilder::new(ws.config())
        .build(&wiki, Competition::Worlds, 2021, &ws.corpus())
        .await
        .unwrap();

    // Registry
    let registry = &outcome.registry;
    assert_eq!(registry.len(), 3);
    assert!(registry.contains("EDward Gaming"));
    assert!(registry.contains("Edward Gaming"));
    assert!(registry.contains("DWG KIA"));
    assert!(registry.contains("MAD Lions"));
    assert!(!registry.contains("Saigon Buffalo"));
    assert!(!registry.contains("LOUD"));
    assert!(!wiki.was_requested("LOUD/Results"));

    assert!(wiki.was_requested("LCK/2021/Spring"));
    assert!(wiki.was_requested("LCK/2021/Winter"));
    assert!(!wiki.was_requested("LPL/2021/Winter"));
    assert_eq!(registry.resolve("DWG KIA").unwrap().record.wins, 15);

    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].team, "Broken Team");
    assert!(matches!(
        outcome.failures[0].error,
        SourceError::Unavailable { status: 404, .. }
    ));

    // Scan
    assert_eq!(
        outcome.summary,
        BuildSummary {
            files_scanned: 6,
            relevant: 3,
            archived: 3,
            skipped: 1,
            rows: 2,
        }
    );
    assert_eq!(archived(&ws.archive()), vec!["1.001", "1.002.bz2", "1.003"]);

    // Rows, in corpus order
    let rows = outcome.dataset.rows();
    assert_eq!(rows.len(), 2);

    let edg = &rows[0];
    assert_eq!(edg.team_a, "EDward Gaming");
    assert_eq!(edg.team_b, "DWG KIA");
    assert!((edg.a_odds - 1.5).abs() < 1e-9);
    assert!((edg.b_odds - 2.9).abs() < 1e-9);
    assert_eq!((edg.a_wins, edg.a_losses), (12, 4));
    assert_eq!((edg.b_wins, edg.b_losses), (15, 3));
    assert_eq!(edg.a_league, [1, 0, 0, 0]);
    assert_eq!(edg.b_league, [0, 1, 0, 0]);
    assert_eq!(edg.result, 1);

    let mad = &rows[1];
    assert_eq!(mad.team_a, "MAD Lions");
    assert!((mad.a_odds - 3.2).abs() < 1e-9);
    assert!((mad.b_odds - 1.35).abs() < 1e-9);
    assert_eq!(mad.a_league, [0, 0, 1, 0]);
    assert_eq!(mad.result, 0);

    assert_eq!(outcome.dataset.labels(), vec![1, 0]);
}

#[tokio::test]
async fn test_abort_on_team_failure() {
    let ws = Workspace::new();
    seed_corpus(&ws);
    let mut cfg = ws.config();
    cfg.registry.abort_on_team_failure = true;

    let err = DatasetBuilder::new(cfg)
        .build(&wiki(), Competition::Worlds, 2021, &ws.corpus())
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("Broken Team"));
    assert!(!ws.archive().exists());
}

#[tokio::test]
async fn test_missing_roster_fails_build() {
    let ws = Workspace::new();
    let result = DatasetBuilder::new(ws.config())
        .build(&FakeWiki::new(), Competition::Msi, 2022, &ws.corpus())
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_cached_registry_skips_wiki() {
    let ws = Workspace::new();
    seed_corpus(&ws);
    let mut cfg = ws.config();
    cfg.output.archive_relevant = false;
    let builder = DatasetBuilder::new(cfg);

    let outcome = builder
        .build(&wiki(), Competition::Worlds, 2021, &ws.corpus())
        .await
        .unwrap();
    assert_eq!(outcome.summary.archived, 0);
    assert!(!ws.archive().exists());

    let cache = ws.root.join("registry.json");
    storage::save_registry(&outcome.registry, &cache).unwrap();
    let cached = storage::load_registry(&cache).unwrap().unwrap();

    let (dataset, summary) = builder.scan_corpus(&cached, &ws.corpus(), None).unwrap();
    assert_eq!(dataset, outcome.dataset);
    assert_eq!(summary, outcome.summary);
}
