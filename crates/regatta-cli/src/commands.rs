//! Command parsing and dispatch.
//!
//! Each command opens nothing itself; it runs one orchestrator operation
//! against the store it is handed and returns the text to print.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use regatta_core::models::{Boat, Heat, LeaderboardEntry};
use regatta_core::{Draw, JsonStore, PositionEditRequest, RegattaStore, SeriesOrchestrator};

use crate::utils::{fit_column, format_place, format_points};

/// Widest sail label shown in tables
const SAIL_COLUMN_WIDTH: usize = 14;

pub const USAGE: &str = "\
Usage: regatta <command> [args]

Commands:
  recompute <event>                               Rebuild the qualifying leaderboard
  recompute-final <event>                         Rebuild the final fleet leaderboards
  edit <event> <race> <boat> <position> [--shift] Change a finishing position
  seed-first <event> <heats> [--draw <seed>]      Split entries into the first round
  seed-next <event>                               Re-seed the ranking into the next round
  start-final <event>                             Split the ranking into final fleets
  leaderboard <event>                             Show stored leaderboards
  heats <event>                                   List heats and their boats
  use-store <path>                                Remember a store document path";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Recompute { event_id: i64 },
    RecomputeFinal { event_id: i64 },
    Edit { event_id: i64, request: PositionEditRequest },
    SeedFirst { event_id: i64, heats: usize, draw: Draw },
    SeedNext { event_id: i64 },
    StartFinal { event_id: i64 },
    Leaderboard { event_id: i64 },
    Heats { event_id: i64 },
    UseStore { path: PathBuf },
}

fn parse_id(value: Option<&String>, name: &str) -> Result<i64> {
    let value = value.with_context(|| format!("Missing {}", name))?;
    value
        .parse()
        .with_context(|| format!("Invalid {}: {}", name, value))
}

impl Command {
    /// Parse arguments following the program name
    pub fn parse(args: &[String]) -> Result<Self> {
        let name = match args.first() {
            Some(name) => name.as_str(),
            None => bail!("No command given"),
        };
        let rest = &args[1..];

        let command = match name {
            "recompute" => Command::Recompute {
                event_id: parse_id(rest.first(), "event id")?,
            },
            "recompute-final" => Command::RecomputeFinal {
                event_id: parse_id(rest.first(), "event id")?,
            },
            "edit" => {
                let event_id = parse_id(rest.first(), "event id")?;
                // Field problems are reported by the edit itself
                let field = |i: usize| rest.get(i).and_then(|v| v.parse().ok());
                Command::Edit {
                    event_id,
                    request: PositionEditRequest {
                        race_id: field(1),
                        boat_id: field(2),
                        new_position: rest.get(3).and_then(|v| v.parse().ok()),
                        shift: rest.iter().any(|a| a == "--shift"),
                    },
                }
            }
            "seed-first" => {
                let event_id = parse_id(rest.first(), "event id")?;
                let heats = parse_id(rest.get(1), "heat count")?;
                let heats = usize::try_from(heats).context("Heat count must not be negative")?;
                let draw = match rest.iter().position(|a| a == "--draw") {
                    Some(i) => {
                        let seed = rest.get(i + 1).context("Missing draw seed")?;
                        Draw::Random {
                            seed: seed
                                .parse()
                                .with_context(|| format!("Invalid draw seed: {}", seed))?,
                        }
                    }
                    None => Draw::EntryOrder,
                };
                Command::SeedFirst {
                    event_id,
                    heats,
                    draw,
                }
            }
            "seed-next" => Command::SeedNext {
                event_id: parse_id(rest.first(), "event id")?,
            },
            "start-final" => Command::StartFinal {
                event_id: parse_id(rest.first(), "event id")?,
            },
            "leaderboard" => Command::Leaderboard {
                event_id: parse_id(rest.first(), "event id")?,
            },
            "heats" => Command::Heats {
                event_id: parse_id(rest.first(), "event id")?,
            },
            "use-store" => Command::UseStore {
                path: PathBuf::from(rest.first().context("Missing store path")?),
            },
            other => bail!("Unknown command: {}", other),
        };
        Ok(command)
    }
}

/// Run a store command and return its report
pub fn run(command: Command, store: &mut JsonStore) -> Result<String> {
    let boats = |store: &JsonStore, event_id: i64| -> Result<HashMap<i64, Boat>> {
        Ok(store
            .boats(event_id)?
            .into_iter()
            .map(|b| (b.id, b))
            .collect())
    };

    let report = match command {
        Command::Recompute { event_id } => {
            let entries = SeriesOrchestrator::new(&mut *store).recompute_leaderboard(event_id)?;
            render_leaderboard(&entries, &boats(store, event_id)?)
        }
        Command::RecomputeFinal { event_id } => {
            let entries =
                SeriesOrchestrator::new(&mut *store).recompute_final_leaderboard(event_id)?;
            render_leaderboard(&entries, &boats(store, event_id)?)
        }
        Command::Edit { event_id, request } => {
            let outcome = SeriesOrchestrator::new(&mut *store).apply_edit(event_id, &request)?;
            let mut report = format!("Updated {} score(s)\n", outcome.written.len());
            report.push_str(&render_leaderboard(&outcome.leaderboard, &boats(store, event_id)?));
            report
        }
        Command::SeedFirst {
            event_id,
            heats,
            draw,
        } => {
            let created =
                SeriesOrchestrator::new(&mut *store).seed_first_round(event_id, heats, draw)?;
            render_heats(store, event_id, &created)?
        }
        Command::SeedNext { event_id } => {
            let created = SeriesOrchestrator::new(&mut *store).seed_next_round(event_id)?;
            render_heats(store, event_id, &created)?
        }
        Command::StartFinal { event_id } => {
            let created = SeriesOrchestrator::new(&mut *store).start_final_series(event_id)?;
            render_heats(store, event_id, &created)?
        }
        Command::Leaderboard { event_id } => {
            let boats = boats(store, event_id)?;
            let mut report = render_leaderboard(&store.leaderboard(event_id)?, &boats);
            let finals = store.final_leaderboard(event_id)?;
            if !finals.is_empty() {
                report.push('\n');
                report.push_str(&render_leaderboard(&finals, &boats));
            }
            let _ = writeln!(report, "\nStore saved: {}", store.saved_display());
            report
        }
        Command::Heats { event_id } => {
            let heats = store.heats(event_id)?;
            render_heats(store, event_id, &heats)?
        }
        Command::UseStore { .. } => bail!("use-store does not run against a store"),
    };
    Ok(report)
}

fn render_leaderboard(entries: &[LeaderboardEntry], boats: &HashMap<i64, Boat>) -> String {
    let mut sorted: Vec<&LeaderboardEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| {
        a.placement_group
            .cmp(&b.placement_group)
            .then_with(|| a.place.cmp(&b.place))
    });

    let mut out = String::new();
    let mut group: Option<&str> = None;
    for entry in sorted {
        let entry_group = entry.placement_group.as_deref();
        if out.is_empty() || entry_group != group {
            if let Some(label) = entry_group {
                let _ = writeln!(out, "== {} ==", label);
            }
            let _ = writeln!(
                out,
                "{:<6} {:<width$} {:>8} {:>6}",
                "Place",
                "Sail",
                "Total",
                "Races",
                width = SAIL_COLUMN_WIDTH
            );
            group = entry_group;
        }
        let sail = boats
            .get(&entry.boat_id)
            .map(|b| b.display_name())
            .unwrap_or_else(|| format!("#{}", entry.boat_id));
        let total = if entry.has_raced {
            format_points(entry.total_points)
        } else {
            "-".to_string()
        };
        let _ = writeln!(
            out,
            "{:<6} {} {:>8} {:>6}",
            format_place(entry.place),
            fit_column(&sail, SAIL_COLUMN_WIDTH),
            total,
            entry.races_sailed
        );
    }
    if out.is_empty() {
        out.push_str("No leaderboard entries\n");
    }
    out
}

fn render_heats(store: &JsonStore, event_id: i64, heats: &[Heat]) -> Result<String> {
    let memberships = store.memberships(event_id)?;
    let races = store.races(event_id)?;
    let boats: HashMap<i64, Boat> = store
        .boats(event_id)?
        .into_iter()
        .map(|b| (b.id, b))
        .collect();

    let mut out = String::new();
    for heat in heats {
        let sails: Vec<String> = memberships
            .iter()
            .filter(|m| m.heat_id == heat.id)
            .map(|m| {
                boats
                    .get(&m.boat_id)
                    .map(|b| b.display_name())
                    .unwrap_or_else(|| format!("#{}", m.boat_id))
            })
            .collect();
        let race_count = races.iter().filter(|r| r.heat_id == heat.id).count();
        let _ = writeln!(
            out,
            "{} ({}, {} races, {} boats): {}",
            heat.heat_name,
            heat.heat_type,
            race_count,
            sails.len(),
            sails.join(", ")
        );
    }
    if out.is_empty() {
        out.push_str("No heats\n");
    }
    Ok(out)
}
