//! Query evaluation against tasks and boards

use super::normalize::normalize;
use super::parse::{DueFilter, EstimationFilter, SearchQuery};
use crate::config::SearchSettings;
use crate::types::{BoardState, Columns, Priority, Task};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use std::fmt::Write;

/// What a query is evaluated against besides the task: the current instant
/// and the search sentinels.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryEnv {
    pub now: DateTime<Utc>,
    pub settings: SearchSettings,
}

impl QueryEnv {
    pub fn new(now: DateTime<Utc>, settings: SearchSettings) -> Self {
        Self { now, settings }
    }
}

/// True when `task` satisfies every part of `query`
pub fn matches(task: &Task, query: &SearchQuery, env: &QueryEnv) -> bool {
    text_matches(task, &query.free_text, env)
        && tag_matches(task, query.tag.as_deref())
        && priority_matches(task, query.priority)
        && due_matches(task, query.due_filter, env)
        && estimation_matches(task, query.estimation)
}

/// Columns holding only the ids whose task exists and matches, order kept
pub fn build_filtered_view(board: &BoardState, query: &SearchQuery, env: &QueryEnv) -> Columns {
    let keep = |ids: &[crate::types::TaskId]| {
        ids.iter()
            .filter(|id| {
                board
                    .task(id.as_str())
                    .is_some_and(|task| matches(task, query, env))
            })
            .cloned()
            .collect()
    };

    Columns {
        todo: keep(&board.columns.todo),
        doing: keep(&board.columns.doing),
        done: keep(&board.columns.done),
    }
}

fn text_matches(task: &Task, free_text: &str, env: &QueryEnv) -> bool {
    let wanted = normalize(free_text);
    if wanted.is_empty() {
        return true;
    }
    let haystack = normalize(&haystack(task, &env.settings));
    wanted.split_whitespace().all(|word| haystack.contains(word))
}

/// Everything free text can hit, joined by spaces
fn haystack(task: &Task, settings: &SearchSettings) -> String {
    let mut parts: Vec<String> = vec![
        task.title.clone(),
        task.description.clone().unwrap_or_default(),
        task.priority.to_string(),
        task.status.to_string(),
        task.tags.join(" "),
        task.estimation_minutes.to_string(),
    ];

    match task.due_at {
        Some(due) => parts.extend(date_forms(due, &settings.date_format)),
        None => parts.push(settings.no_due_marker.clone()),
    }
    parts.extend(date_forms(task.created_at, &settings.date_format));

    parts.push(task.evaluator_notes.clone().unwrap_or_default());
    parts.push(task.rubric_comment.clone().unwrap_or_default());

    if let Some(score) = task.rubric_score {
        parts.push(score.to_string());
        parts.push(format!("score {}", score));
        parts.push(format!("rubric {}", score));
        parts.push(format!("{}/10", score));
    }

    if task.has_no_notes() {
        parts.push(settings.no_notes_marker.clone());
    }

    parts.join(" ")
}

/// ISO, `YYYY-MM-DD` and localized renderings of a timestamp
fn date_forms(at: DateTime<Utc>, localized_format: &str) -> [String; 3] {
    let iso = at.to_rfc3339_opts(SecondsFormat::AutoSi, true);
    let short = at.format("%Y-%m-%d").to_string();
    let mut localized = String::new();
    // A malformed user-supplied format leaves the localized form empty
    if write!(localized, "{}", at.format(localized_format)).is_err() {
        localized.clear();
    }
    [iso, short, localized]
}

fn tag_matches(task: &Task, tag: Option<&str>) -> bool {
    let Some(tag) = tag else {
        return true;
    };
    let wanted = normalize(tag);
    task.tags.iter().any(|t| normalize(t) == wanted)
}

fn priority_matches(task: &Task, priority: Option<Priority>) -> bool {
    priority.is_none_or(|p| task.priority == p)
}

fn due_matches(task: &Task, due: Option<DueFilter>, env: &QueryEnv) -> bool {
    let filter = match due {
        None | Some(DueFilter::Any) => return true,
        Some(filter) => filter,
    };
    let Some(due_at) = task.due_at else {
        return false;
    };

    match filter {
        DueFilter::Overdue => due_at < env.now,
        DueFilter::Week => {
            let horizon = Duration::try_days(env.settings.week_window_days)
                .and_then(|window| env.now.checked_add_signed(window));
            horizon.is_some_and(|end| env.now <= due_at && due_at <= end)
        }
        DueFilter::Any => true,
    }
}

fn estimation_matches(task: &Task, estimation: Option<EstimationFilter>) -> bool {
    estimation.is_none_or(|est| est.operator.compare(task.estimation_minutes, est.value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parse_query;
    use crate::types::{ColumnId, TaskId};
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    #[fixture]
    fn env() -> QueryEnv {
        QueryEnv::new(now(), SearchSettings::default())
    }

    fn client_task() -> Task {
        Task::new(
            TaskId::from_string("t1"),
            "Llamar al cliente",
            Priority::High,
            ColumnId::Todo,
            Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap(),
        )
        .with_description("Revisión del contrato")
        .with_tags(["compliance", "Legal"])
        .with_estimation(45)
        .with_due_at(now() + Duration::days(3))
    }

    #[rstest]
    fn test_full_query_matches(env: QueryEnv) {
        let q = parse_query("\"cliente\" tag:compliance p:high due:week est:<60");
        assert!(matches(&client_task(), &q, &env));

        let slow = client_task().with_estimation(90);
        assert!(!matches(&slow, &q, &env));
    }

    #[rstest]
    #[case::title_word("cliente", true)]
    #[case::accent_insensitive("revision", true)]
    #[case::case_insensitive("CONTRATO", true)]
    #[case::all_words_needed("cliente banana", false)]
    #[case::priority_word("high", true)]
    #[case::status_word("todo", true)]
    #[case::tag_word("legal", true)]
    #[case::estimation("45", true)]
    #[case::due_short("2026-03-13", true)]
    #[case::due_localized("13/3/2026", true)]
    #[case::created_short("2026-03-01", true)]
    #[case::created_iso("2026-03-01t08:30:00z", true)]
    #[case::no_notes_marker("no notes", true)]
    #[case::no_date_marker_absent("no date", false)]
    fn test_free_text_haystack(env: QueryEnv, #[case] text: &str, #[case] expected: bool) {
        let q = parse_query(text);
        assert_eq!(matches(&client_task(), &q, &env), expected, "query {:?}", text);
    }

    #[rstest]
    fn test_rubric_phrases(env: QueryEnv) {
        let mut task = client_task();
        task.rubric_score = Some(8.5);
        task.rubric_comment = Some("Buen análisis".into());
        for text in ["score 8.5", "rubric 8.5", "8.5/10", "analisis"] {
            assert!(matches(&task, &parse_query(text), &env), "{}", text);
        }
        assert!(!matches(&task, &parse_query("notes"), &env));
    }

    #[rstest]
    fn test_no_date_marker(env: QueryEnv) {
        let mut task = client_task();
        task.due_at = None;
        assert!(matches(&task, &parse_query("no date"), &env));
        assert!(!matches(&task, &parse_query("due:overdue"), &env));
        assert!(!matches(&task, &parse_query("due:week"), &env));
        assert!(matches(&task, &parse_query("due:any"), &env));
    }

    #[test]
    fn test_custom_markers() {
        let settings = SearchSettings {
            no_due_marker: "sin fecha".into(),
            ..SearchSettings::default()
        };
        let env = QueryEnv::new(now(), settings);
        let mut task = client_task();
        task.due_at = None;
        assert!(matches(&task, &parse_query("sin fecha"), &env));
    }

    #[rstest]
    #[case::past(-1, "due:overdue", true)]
    #[case::future_not_overdue(1, "due:overdue", false)]
    #[case::within_week(6, "due:week", true)]
    #[case::past_not_week(-1, "due:week", false)]
    #[case::beyond_week(8, "due:week", false)]
    fn test_due_filters(env: QueryEnv, #[case] days: i64, #[case] text: &str, #[case] expected: bool) {
        let mut task = client_task();
        task.due_at = Some(now() + Duration::days(days));
        assert_eq!(matches(&task, &parse_query(text), &env), expected);
    }

    #[rstest]
    fn test_week_window_edges(env: QueryEnv) {
        let mut task = client_task();
        task.due_at = Some(now());
        assert!(matches(&task, &parse_query("due:week"), &env));
        task.due_at = Some(now() + Duration::days(7));
        assert!(matches(&task, &parse_query("due:week"), &env));
        task.due_at = Some(now() + Duration::days(7) + Duration::seconds(1));
        assert!(!matches(&task, &parse_query("due:week"), &env));
    }

    #[rstest]
    fn test_tag_is_exact_not_substring(env: QueryEnv) {
        assert!(matches(&client_task(), &parse_query("tag:legal"), &env));
        assert!(!matches(&client_task(), &parse_query("tag:comp"), &env));
    }

    #[rstest]
    fn test_filtered_view_keeps_order_and_skips_missing(env: QueryEnv) {
        let a = Task::new("a".into(), "Alpha task", Priority::High, ColumnId::Todo, now());
        let b = Task::new("b".into(), "Beta task", Priority::Low, ColumnId::Todo, now());
        let c = Task::new("c".into(), "Gamma task", Priority::High, ColumnId::Todo, now());
        let mut board = BoardState::from_tasks([a, b, c]);
        board.columns.doing.push(TaskId::from("ghost"));

        let view = build_filtered_view(&board, &parse_query("p:high"), &env);
        assert_eq!(view.todo, vec![TaskId::from("a"), TaskId::from("c")]);
        assert!(view.doing.is_empty());
        // board untouched
        assert_eq!(board.columns.todo.len(), 3);

        let all = build_filtered_view(&board, &parse_query(""), &env);
        assert_eq!(all.todo.len(), 3);
        assert!(all.doing.is_empty());
    }

    #[test]
    fn test_malformed_date_format_does_not_panic() {
        let settings = SearchSettings {
            date_format: "%Q%".into(),
            ..SearchSettings::default()
        };
        let env = QueryEnv::new(now(), settings);
        assert!(matches(&client_task(), &parse_query("cliente"), &env));
    }
}
