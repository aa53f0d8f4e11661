//! Headless session runner.

use std::io::Write;

use anyhow::{Context, Result};
use eruption_core::{Outcome, TickReport};
use eruption_engine::Engine;
use eruption_world::{query, SimulationState};
use serde::Serialize;

use crate::script::Script;

/// Symbol drawn over tiles occupied by at least one active citizen.
const CITIZEN_SYMBOL: char = '@';

/// How tick reports are written to stdout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ReportFormat {
    /// One human-readable line per eventful tick.
    Text,
    /// One JSON object per tick.
    Json,
}

/// Final state of a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct RunSummary {
    pub(crate) outcome: Outcome,
    pub(crate) ticks: u64,
    pub(crate) citizens: usize,
    pub(crate) saved: usize,
    pub(crate) lost: usize,
    pub(crate) lava_cells: usize,
    pub(crate) barricades_left: u32,
    pub(crate) open_roads_left: u32,
}

impl RunSummary {
    fn capture(state: &SimulationState) -> Self {
        Self {
            outcome: state.outcome(),
            ticks: state.tick(),
            citizens: state.citizens().len(),
            saved: state.saved_count(),
            lost: state.lost_count(),
            lava_cells: state.lava_cells().len(),
            barricades_left: state.barricade_actions_left(),
            open_roads_left: state.open_road_actions_left(),
        }
    }
}

/// Drives an engine until the run resolves or the tick limit is hit.
#[derive(Debug)]
pub(crate) struct Session {
    engine: Engine,
    script: Script,
    max_ticks: u64,
}

impl Session {
    pub(crate) fn new(engine: Engine, script: Script, max_ticks: u64) -> Self {
        Self {
            engine,
            script,
            max_ticks,
        }
    }

    pub(crate) fn run<W: Write>(
        &mut self,
        out: &mut W,
        format: ReportFormat,
        show_map: bool,
    ) -> Result<RunSummary> {
        if show_map && format == ReportFormat::Text {
            write_map(out, self.engine.state())?;
        }

        while !self.engine.state().outcome().is_terminal() && self.engine.state().tick() < self.max_ticks
        {
            let next_tick = self.engine.state().tick() + 1;
            for command in self.script.due(next_tick) {
                if let Err(reason) = self.engine.apply(command) {
                    tracing::warn!(tick = next_tick, ?command, %reason, "scripted command refused");
                }
            }

            let report = self.engine.tick();
            log_report(&report);
            match format {
                ReportFormat::Json => {
                    serde_json::to_writer(&mut *out, &report).context("failed to encode report")?;
                    writeln!(out)?;
                }
                ReportFormat::Text if !report.is_quiet() => writeln!(out, "{}", describe(&report))?,
                ReportFormat::Text => {}
            }
        }

        let summary = RunSummary::capture(self.engine.state());
        if !summary.outcome.is_terminal() {
            tracing::warn!(max_ticks = self.max_ticks, "tick limit reached before the run resolved");
        }

        match format {
            ReportFormat::Json => {
                serde_json::to_writer(&mut *out, &summary).context("failed to encode summary")?;
                writeln!(out)?;
            }
            ReportFormat::Text => {
                if show_map {
                    write_map(out, self.engine.state())?;
                }
                writeln!(
                    out,
                    "{:?} after {} ticks: {} saved, {} lost of {} citizens",
                    summary.outcome, summary.ticks, summary.saved, summary.lost, summary.citizens
                )?;
            }
        }
        Ok(summary)
    }
}

fn log_report(report: &TickReport) {
    for id in &report.saved {
        tracing::info!(tick = report.tick, citizen = %id, "citizen saved");
    }
    for id in &report.lost {
        tracing::info!(tick = report.tick, citizen = %id, "citizen lost");
    }
    if !report.new_lava.is_empty() {
        tracing::info!(tick = report.tick, cells = report.new_lava.len(), "lava advanced");
    }
}

fn describe(report: &TickReport) -> String {
    let mut parts = Vec::new();
    if !report.saved.is_empty() {
        parts.push(format!("saved {}", join(&report.saved)));
    }
    if !report.lost.is_empty() {
        parts.push(format!("lost {}", join(&report.lost)));
    }
    if !report.new_lava.is_empty() {
        parts.push(format!("lava {}", join(&report.new_lava)));
    }
    format!("tick {}: {}", report.tick, parts.join("; "))
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Live grid with active citizens drawn on top.
pub(crate) fn render_map(state: &SimulationState) -> Vec<String> {
    let mut rows: Vec<Vec<char>> = query::tile_rows(state)
        .into_iter()
        .map(|row| row.chars().collect())
        .collect();
    for snapshot in query::citizen_view(state).iter() {
        if !snapshot.alive || snapshot.safe {
            continue;
        }
        let (x, y) = (snapshot.position.x(), snapshot.position.y());
        let Ok(y) = usize::try_from(y) else { continue };
        let Ok(x) = usize::try_from(x) else { continue };
        if let Some(cell) = rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = CITIZEN_SYMBOL;
        }
    }
    rows.into_iter().map(|row| row.into_iter().collect()).collect()
}

fn write_map<W: Write>(out: &mut W, state: &SimulationState) -> Result<()> {
    for row in render_map(state) {
        writeln!(out, "{row}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eruption_core::Position;
    use eruption_world::{GameMap, SimulationConfig};

    fn engine(rows: &[&str]) -> Engine {
        let map = GameMap::from_template(rows).expect("valid template");
        Engine::new(SimulationConfig::new(map, 1, 1, 1).expect("valid config"))
    }

    #[test]
    fn map_overlays_citizens_lava_and_barricades() {
        let mut engine = engine(&["WWWWWW", "WH..SW", "WWVWWW"]);
        assert!(engine.build_barricade(Position::new(2, 1)));

        assert_eq!(
            render_map(engine.state()),
            vec!["WWWWWW", "W@#.SW", "WWVWWW"]
        );
    }

    #[test]
    fn json_session_emits_one_line_per_tick_plus_summary() {
        let mut session = Session::new(engine(&["HV.S"]), Script::default(), 50);
        let mut out = Vec::new();

        let summary = session
            .run(&mut out, ReportFormat::Json, false)
            .expect("session runs");

        let text = String::from_utf8(out).expect("utf-8 output");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len() as u64, summary.ticks + 1);
        let first: TickReport = serde_json::from_str(lines[0]).expect("report line");
        assert_eq!(first.tick, 1);
        assert!(lines[lines.len() - 1].contains("\"outcome\""));
    }

    #[test]
    fn scripted_commands_run_before_their_tick() {
        let script = Script::new(vec!["1:barricade:3,0".parse().expect("valid action")]);
        let mut session = Session::new(engine(&["S.H.V"]), script, 1);
        let mut out = Vec::new();

        let summary = session
            .run(&mut out, ReportFormat::Text, false)
            .expect("session runs");

        assert_eq!(summary.barricades_left, 0);
        assert_eq!(summary.ticks, 1);
        assert_eq!(summary.outcome, Outcome::Running);
    }

    #[test]
    fn text_session_stops_at_the_tick_limit() {
        let mut session = Session::new(engine(&["WWWWW", "WHWVW", "W.W.S"]), Script::default(), 3);
        let mut out = Vec::new();

        let summary = session
            .run(&mut out, ReportFormat::Text, true)
            .expect("session runs");

        assert_eq!(summary.ticks, 3);
        assert_eq!(summary.outcome, Outcome::Running);
        let text = String::from_utf8(out).expect("utf-8 output");
        assert!(text.ends_with("Running after 3 ticks: 0 saved, 0 lost of 1 citizens\n"));
    }
}
