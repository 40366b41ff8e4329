//! CSV log sinks (§6): append-mode emission of per-day state snapshots and
//! interaction records, matching the original logger's header text and
//! field layout exactly.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tracing::warn;

use crate::engine::Engine;
use crate::state::{EMOTION_AXIS_NAMES, NUM_AXES, RELATION_CHANNEL_NAMES};

const STATES_HEADER: &str = "Дата,Имя агента,Эмоции,Предикаты";
const INTERACTIONS_HEADER: &str = "Дата,Источник,Цель,Успех";

/// Appends (or starts) the per-agent state snapshot CSV for one day.
///
/// `date_str` is truncated to its first 10 characters. When `is_first_run`
/// is true the file is truncated and the header row is written before any
/// data row; otherwise rows are appended to the existing file. I/O
/// failures are logged at `warn` and otherwise swallowed: the log sink is
/// best-effort and never affects simulation state.
pub fn save_states_csv(engine: &Engine, path: impl AsRef<Path>, date_str: &str, is_first_run: bool) {
    let path = path.as_ref();
    let date = truncated_date(date_str);

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(!is_first_run)
        .truncate(is_first_run)
        .open(path);

    let mut file = match file {
        Ok(f) => f,
        Err(err) => {
            warn!(?path, %err, "failed to open states CSV");
            return;
        }
    };

    if is_first_run {
        if let Err(err) = writeln!(file, "{STATES_HEADER}") {
            warn!(?path, %err, "failed to write states CSV header");
            return;
        }
    }

    let state = engine.state();
    let n = state.num_agents();
    for i in 0..n {
        let emotions = (0..NUM_AXES)
            .map(|a| format!("{}:{}", EMOTION_AXIS_NAMES[a], state.emotion(i, a)))
            .collect::<Vec<_>>()
            .join("; ");

        let predicates = (0..n)
            .filter(|&j| j != i)
            .map(|j| {
                let (u, a, t, r) = state.relation(i, j);
                format!(
                    "{}={}:{},{}:{},{}:{},{}:{}",
                    engine.agent_name(j),
                    RELATION_CHANNEL_NAMES[0],
                    u,
                    RELATION_CHANNEL_NAMES[1],
                    a,
                    RELATION_CHANNEL_NAMES[2],
                    t,
                    RELATION_CHANNEL_NAMES[3],
                    r
                )
            })
            .collect::<Vec<_>>()
            .join(" | ");

        let line = format!(
            "{date},{},{emotions},\"{predicates}\"",
            engine.agent_name(i)
        );
        if let Err(err) = writeln!(file, "{line}") {
            warn!(?path, %err, "failed to write states CSV row");
            return;
        }
    }
}

/// Appends (or starts) the interaction-log CSV for one day.
///
/// Same truncate/append and header semantics as [`save_states_csv`].
pub fn save_interactions_csv(engine: &Engine, path: impl AsRef<Path>, date_str: &str, is_first_run: bool) {
    let path = path.as_ref();
    let date = truncated_date(date_str);

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(!is_first_run)
        .truncate(is_first_run)
        .open(path);

    let mut file = match file {
        Ok(f) => f,
        Err(err) => {
            warn!(?path, %err, "failed to open interactions CSV");
            return;
        }
    };

    if is_first_run {
        if let Err(err) = writeln!(file, "{INTERACTIONS_HEADER}") {
            warn!(?path, %err, "failed to write interactions CSV header");
            return;
        }
    }

    for record in engine.last_day_interactions() {
        let line = format!(
            "{date},{},{},{}",
            engine.agent_name(record.from),
            engine.agent_name(record.to),
            record.kind
        );
        if let Err(err) = writeln!(file, "{line}") {
            warn!(?path, %err, "failed to write interactions CSV row");
            return;
        }
    }
}

fn truncated_date(date_str: &str) -> &str {
    let end = date_str.char_indices().nth(10).map(|(idx, _)| idx).unwrap_or(date_str.len());
    &date_str[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_path(label: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "social-sim-engine-test-{label}-{}.csv",
            uuid::Uuid::new_v4()
        ))
    }

    #[test]
    fn truncated_date_keeps_first_ten_chars() {
        assert_eq!(truncated_date("2026-07-26T12:00:00Z"), "2026-07-26");
        assert_eq!(truncated_date("short"), "short");
    }

    #[test]
    fn states_csv_writes_header_once_and_appends_thereafter() {
        let path = temp_path("states");
        let mut engine = Engine::new(2);
        engine.set_emotion(0, 0, 1.5);
        engine.set_relation(0, 1, 1.0, 2.0, 3.0, 4.0);

        save_states_csv(&engine, &path, "2026-07-26", true);
        save_states_csv(&engine, &path, "2026-07-27", false);

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], STATES_HEADER);
        assert_eq!(lines.iter().filter(|l| **l == STATES_HEADER).count(), 1);
        assert_eq!(lines.len(), 1 + 2 * 2);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn states_csv_row_contains_predicate_for_every_other_agent() {
        let path = temp_path("predicates");
        let mut engine = Engine::new(3);
        engine.set_agent_name(0, "alice");
        engine.set_agent_name(1, "bob");
        engine.set_agent_name(2, "carol");
        engine.set_relation(0, 1, 1.0, 2.0, 3.0, 4.0);
        engine.set_relation(0, 2, 5.0, 6.0, 7.0, 8.0);

        save_states_csv(&engine, &path, "2026-07-26", true);
        let contents = fs::read_to_string(&path).unwrap();
        let row_for_alice = contents.lines().nth(1).unwrap();

        assert!(row_for_alice.contains("bob=utility:1,affinity:2,trust:3,responsiveness:4"));
        assert!(row_for_alice.contains("carol=utility:5,affinity:6,trust:7,responsiveness:8"));
        assert!(row_for_alice.contains(" | "));

        fs::remove_file(&path).ok();
    }

    #[test]
    fn interactions_csv_writes_one_row_per_record() {
        let path = temp_path("interactions");
        let mut engine = Engine::new(3);
        engine.perform_daily_cycle(1);
        let expected_rows = engine.last_day_interactions().len();

        save_interactions_csv(&engine, &path, "2026-07-26", true);
        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines[0], INTERACTIONS_HEADER);
        assert_eq!(lines.len() - 1, expected_rows);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn interactions_csv_second_run_appends_without_repeating_header() {
        let path = temp_path("interactions-append");
        let mut engine = Engine::new(2);
        engine.perform_daily_cycle(1);
        save_interactions_csv(&engine, &path, "2026-07-26", true);
        let first_count = engine.last_day_interactions().len();

        engine.perform_daily_cycle(1);
        save_interactions_csv(&engine, &path, "2026-07-27", false);
        let second_count = engine.last_day_interactions().len();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.iter().filter(|l| **l == INTERACTIONS_HEADER).count(), 1);
        assert_eq!(lines.len() - 1, first_count + second_count);

        fs::remove_file(&path).ok();
    }
}
