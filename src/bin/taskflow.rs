//! taskflow CLI: drive a workflow session from a script or a demo.

use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use taskflow::config::Config;
use taskflow::board::ItemSummary;
use taskflow::engine::Engine;
use taskflow::error::Error;
use taskflow::model::{GuardPolicy, NewTask, Priority, WorkId};
use taskflow::observer::{ActivityLog, TracingObserver};
use taskflow::telemetry::{TelemetryConfig, init_telemetry};

#[derive(Parser)]
#[command(name = "taskflow", about = "Task workflow engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a scripted demo session and print the resulting board
    Demo,
    /// Run session steps, one per line, from a file or stdin
    Run {
        /// Script file (stdin when omitted)
        file: Option<PathBuf>,
    },
}

/// One line of a session script.
#[derive(Parser)]
#[command(no_binary_name = true)]
struct StepLine {
    #[command(subcommand)]
    step: Step,
}

#[derive(Subcommand)]
enum Step {
    /// Create an epic
    Epic {
        title: String,
        /// Nest under this epic
        #[arg(long)]
        parent: Option<WorkId>,
    },
    /// Create a task
    Task {
        title: String,
        #[arg(long, default_value = "medium")]
        priority: Priority,
        #[arg(long, default_value = "")]
        description: String,
        /// Place under this epic
        #[arg(long)]
        epic: Option<WorkId>,
        /// Skip automatic assignment
        #[arg(long)]
        assignee: Option<String>,
        /// Override the configured review guard
        #[arg(long)]
        guard: Option<GuardPolicy>,
    },
    /// Advance a task one step
    Forward { id: WorkId },
    /// Reassign a task (omit the worker to unassign)
    Assign { id: WorkId, worker: Option<String> },
    /// Replace a task's description
    Describe { id: WorkId, text: String },
    /// Undo the last command
    Undo,
    /// Undo the last transition of one task
    UndoTask { id: WorkId },
    /// Print the board
    Board {
        #[arg(long)]
        json: bool,
    },
    /// Print the progress of a task or epic
    Progress { id: WorkId },
    /// Print the activity log, newest first
    Log,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;

    let _guard = init_telemetry(TelemetryConfig {
        endpoint: config.otel_endpoint.clone(),
        service_name: "taskflow".to_string(),
        log_level: config.log_level.clone(),
    })?;

    match cli.command {
        Command::Demo => cmd_demo(&config),
        Command::Run { file } => cmd_run(&config, file),
    }
}

struct Session {
    engine: Engine,
    log: Arc<ActivityLog>,
}

impl Session {
    fn new(config: &Config) -> Self {
        let log = Arc::new(ActivityLog::new());
        let mut engine = Engine::from_config(config);
        engine.subscribe(log.clone());
        engine.subscribe(Arc::new(TracingObserver));
        Self { engine, log }
    }

    fn apply(&mut self, step: Step) -> anyhow::Result<()> {
        match step {
            Step::Epic { title, parent } => {
                let id = self.engine.create_epic(title, parent)?;
                println!("epic {id}");
            }
            Step::Task {
                title,
                priority,
                description,
                epic,
                assignee,
                guard,
            } => {
                let mut new = NewTask::new(title)
                    .priority(priority)
                    .description(description);
                if let Some(epic) = epic {
                    new = new.epic(epic);
                }
                if let Some(worker) = assignee {
                    new = new.assignee(worker);
                }
                if let Some(guard) = guard {
                    new = new.guard(guard);
                }
                let id = self.engine.create_task(new)?;
                let task = self.engine.task(id)?;
                println!(
                    "task {id} ({}) assigned to {}",
                    task.priority(),
                    task.assignee().unwrap_or("nobody")
                );
            }
            Step::Forward { id } => {
                if forward(&mut self.engine, id)? {
                    println!("{id} -> {}", self.engine.item(id)?.state());
                }
            }
            Step::Assign { id, worker } => self.engine.assign(id, worker)?,
            Step::Describe { id, text } => self.engine.describe(id, text)?,
            Step::Undo => {
                if !self.engine.undo_last()? {
                    println!("nothing to undo");
                }
            }
            Step::UndoTask { id } => {
                if !self.engine.undo_task(id)? {
                    println!("{id} has no history");
                }
            }
            Step::Board { json } => self.print_board(json)?,
            Step::Progress { id } => {
                println!("{id}: {:.0}%", self.engine.progress(id)?);
            }
            Step::Log => {
                for line in self.log.lines() {
                    println!("{line}");
                }
            }
        }
        Ok(())
    }

    fn print_board(&self, json: bool) -> anyhow::Result<()> {
        let board = self.engine.board();
        if json {
            println!("{}", serde_json::to_string_pretty(&board.summaries())?);
            return Ok(());
        }

        for (state, tasks) in board.task_columns() {
            println!("== {state} ({})", tasks.len());
            for task in tasks {
                println!(
                    "  {:<5} {:<24} {:<7} {}",
                    task.id().to_string(),
                    task.title(),
                    task.priority().to_string(),
                    task.assignee().unwrap_or("Unassigned")
                );
            }
        }
        let epics: Vec<_> = board
            .summaries()
            .into_iter()
            .filter(|row| row.kind == "epic")
            .collect();
        if !epics.is_empty() {
            println!("== EPICS ({})", epics.len());
            for epic in &epics {
                print_epic(epic, 1);
            }
        }
        let counts = board.counts();
        println!(
            "tasks: {} total, {} todo, {} in progress, {} review, {} done",
            counts.total(),
            counts.todo,
            counts.in_progress,
            counts.review,
            counts.done
        );
        Ok(())
    }
}

fn cmd_run(config: &Config, file: Option<PathBuf>) -> anyhow::Result<()> {
    let reader: Box<dyn BufRead> = match file {
        Some(path) => Box::new(BufReader::new(std::fs::File::open(path)?)),
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let mut session = Session::new(config);
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(step) =
            parse_line(&line).map_err(|e| anyhow::anyhow!("line {}: {e}", index + 1))?
        else {
            continue;
        };
        session
            .apply(step)
            .map_err(|e| anyhow::anyhow!("line {}: {e}", index + 1))?;
    }
    Ok(())
}

fn cmd_demo(config: &Config) -> anyhow::Result<()> {
    let mut session = Session::new(config);
    let engine = &mut session.engine;

    let launch = engine.create_epic("Launch", None)?;
    let mut tasks = Vec::new();
    for priority in Priority::ALL {
        let id = engine.create_task(
            NewTask::new(format!("{priority} task"))
                .priority(priority)
                .description(format!("Complex task with {priority} priority"))
                .epic(launch),
        )?;
        tasks.push(id);
    }
    let hotfix = engine.create_task(
        NewTask::new("Hotfix")
            .priority(Priority::Urgent)
            .description("Fix it now"),
    )?;

    // LOW goes all the way; the terse hotfix stalls at the review guard.
    for _ in 0..3 {
        forward(engine, tasks[0])?;
    }
    forward(engine, tasks[3])?;
    forward(engine, tasks[3])?;
    forward(engine, hotfix)?;
    forward(engine, hotfix)?;
    engine.describe(hotfix, "Roll back the bad deploy and add a regression test")?;
    forward(engine, hotfix)?;
    engine.undo_last()?;
    engine.undo_last()?;

    session.print_board(false)?;
    println!("launch progress: {:.0}%", session.engine.progress(launch)?);
    println!();
    for line in session.log.lines() {
        println!("{line}");
    }
    Ok(())
}

/// Advance `id`, returning `false` when the state machine refused the
/// move. Refusals are already reported to the task's observers; any other
/// error propagates.
fn forward(engine: &mut Engine, id: WorkId) -> taskflow::error::Result<bool> {
    match engine.move_forward(id) {
        Ok(()) => Ok(true),
        Err(Error::IllegalTransition { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}

fn print_epic(row: &ItemSummary, depth: usize) {
    let indent = "  ".repeat(depth);
    match row.kind {
        "epic" => {
            println!(
                "{indent}{:<5} {:<24} {:.0}%",
                row.id.to_string(),
                row.title,
                row.progress
            );
            for child in &row.subtasks {
                print_epic(child, depth + 1);
            }
        }
        _ => println!("{indent}{:<5} {:<24} {}", row.id.to_string(), row.title, row.state),
    }
}

/// Parse one script line. Blank lines and `#` comments yield `None`.
fn parse_line(line: &str) -> anyhow::Result<Option<Step>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let words = split_words(trimmed).map_err(|e| anyhow::anyhow!(e))?;
    let parsed = StepLine::try_parse_from(words)?;
    Ok(Some(parsed.step))
}

/// Split a script line into words, honoring single and double quotes.
fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("unterminated {q} quote"));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_words_honors_quotes() {
        assert_eq!(
            split_words(r#"task "Write docs" --description 'for the API'"#).unwrap(),
            vec!["task", "Write docs", "--description", "for the API"]
        );
        assert_eq!(
            split_words(r#"describe 3 "it's fine""#).unwrap(),
            vec!["describe", "3", "it's fine"]
        );
    }

    #[test]
    fn split_words_keeps_empty_quoted_argument() {
        assert_eq!(
            split_words(r#"describe 3 """#).unwrap(),
            vec!["describe", "3", ""]
        );
    }

    #[test]
    fn split_words_rejects_unterminated_quote() {
        let err = split_words(r#"task "never closed"#).unwrap_err();
        assert!(err.contains("unterminated"), "got {err}");
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert!(parse_line("").unwrap().is_none());
        assert!(parse_line("   ").unwrap().is_none());
        assert!(parse_line("# forward 1").unwrap().is_none());
    }

    #[test]
    fn task_line_parses_priority_and_epic() {
        let step = parse_line("task x --priority urgent --epic #1").unwrap();
        let Some(Step::Task {
            title,
            priority,
            epic,
            assignee,
            guard,
            ..
        }) = step
        else {
            panic!("expected a task step");
        };
        assert_eq!(title, "x");
        assert_eq!(priority, Priority::Urgent);
        assert_eq!(epic, Some(WorkId(1)));
        assert_eq!(assignee, None);
        assert_eq!(guard, None);
    }

    #[test]
    fn other_steps_parse() {
        assert!(matches!(
            parse_line("forward #4").unwrap(),
            Some(Step::Forward { id: WorkId(4) })
        ));
        assert!(matches!(
            parse_line("undo-task 2").unwrap(),
            Some(Step::UndoTask { id: WorkId(2) })
        ));
        assert!(matches!(
            parse_line("board --json").unwrap(),
            Some(Step::Board { json: true })
        ));
        assert!(matches!(
            parse_line("assign 3").unwrap(),
            Some(Step::Assign { id: WorkId(3), worker: None })
        ));
    }

    #[test]
    fn malformed_lines_are_errors() {
        assert!(parse_line("fly 1").is_err());
        assert!(parse_line("forward").is_err());
        assert!(parse_line("task x --priority whenever").is_err());
        assert!(parse_line("describe \"open").is_err());
    }

    #[test]
    fn forward_swallows_only_refusals() {
        let mut engine = Engine::default();
        let id = engine.create_task(NewTask::new("t")).unwrap();
        for _ in 0..3 {
            assert!(forward(&mut engine, id).unwrap());
        }
        assert!(!forward(&mut engine, id).unwrap());
        assert!(matches!(
            forward(&mut engine, WorkId(99)),
            Err(Error::NotFound(WorkId(99)))
        ));
    }
}
