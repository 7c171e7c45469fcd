use clap::{Parser, Subcommand};
use setfit_core::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "setfit")]
#[command(about = "Get Set Fit workout tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage workout plans
    Plan {
        #[command(subcommand)]
        action: PlanAction,
    },

    /// Run a guided workout session for a plan
    Start {
        /// Plan id or name
        plan: String,

        /// Rest duration in seconds (overrides the stored setting)
        #[arg(long)]
        rest: Option<u32>,

        /// Skip every rest countdown
        #[arg(long)]
        skip_rest: bool,

        /// Complete the whole session non-interactively (for testing)
        #[arg(long)]
        auto_complete: bool,
    },

    /// Show completed workout history
    History {
        /// Delete all workout history
        #[arg(long)]
        clear: bool,
    },

    /// Show aggregate workout statistics
    Stats,

    /// Suggest exercises for a muscle group
    Suggest {
        /// e.g. chest, back, legs, arms, shoulders, core
        muscle_group: String,
    },

    /// Export all data to a backup file
    Export { file: PathBuf },

    /// Import data from a backup file
    Import { file: PathBuf },

    /// Show or update settings
    Settings {
        /// Default rest duration in seconds
        #[arg(long)]
        rest_time: Option<u32>,

        /// Measurement units (metric, imperial)
        #[arg(long)]
        units: Option<String>,

        /// Display theme (light, dark)
        #[arg(long)]
        theme: Option<String>,

        /// Start the rest timer automatically (on, off)
        #[arg(long, value_name = "on|off")]
        auto_start_timer: Option<String>,
    },
}

#[derive(Subcommand)]
enum PlanAction {
    /// Create a new workout plan
    Add {
        name: String,

        /// Exercise as NAME:SETSxREPS, e.g. "Bench Press:3x8-12" (repeatable)
        #[arg(long = "exercise", value_name = "NAME:SETSxREPS", required = true)]
        exercises: Vec<String>,

        #[arg(long)]
        description: Option<String>,

        /// beginner, intermediate, or advanced
        #[arg(long)]
        difficulty: Option<String>,
    },

    /// List stored plans
    List,

    /// Remove a plan by id or name
    Remove { plan: String },
}

fn main() -> Result<()> {
    setfit_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let mut store = WorkoutStore::open(&data_dir);

    match cli.command {
        Commands::Plan { action } => match action {
            PlanAction::Add {
                name,
                exercises,
                description,
                difficulty,
            } => cmd_plan_add(&mut store, name, exercises, description, difficulty),
            PlanAction::List => cmd_plan_list(&store),
            PlanAction::Remove { plan } => cmd_plan_remove(&mut store, &plan),
        },
        Commands::Start {
            plan,
            rest,
            skip_rest,
            auto_complete,
        } => cmd_start(&mut store, &plan, rest, skip_rest, auto_complete),
        Commands::History { clear } => cmd_history(&mut store, clear),
        Commands::Stats => cmd_stats(&store),
        Commands::Suggest { muscle_group } => cmd_suggest(&config, &muscle_group),
        Commands::Export { file } => cmd_export(&store, &file),
        Commands::Import { file } => cmd_import(&mut store, &file),
        Commands::Settings {
            rest_time,
            units,
            theme,
            auto_start_timer,
        } => cmd_settings(&mut store, rest_time, units, theme, auto_start_timer),
    }
}

// ============================================================================
// Plan commands
// ============================================================================

/// Parse an exercise argument of the form "NAME:SETSxREPS"
fn parse_exercise(spec: &str, index: usize) -> Result<Exercise> {
    let (name, target) = spec
        .rsplit_once(':')
        .ok_or_else(|| Error::Other(format!("invalid exercise '{spec}': expected NAME:SETSxREPS")))?;

    let (sets, reps) = target
        .split_once(['x', 'X'])
        .ok_or_else(|| Error::Other(format!("invalid exercise '{spec}': expected NAME:SETSxREPS")))?;

    let sets: u32 = sets
        .trim()
        .parse()
        .map_err(|_| Error::Other(format!("invalid set count in '{spec}'")))?;

    if name.trim().is_empty() || reps.trim().is_empty() {
        return Err(Error::Other(format!(
            "invalid exercise '{spec}': name and reps must be non-empty"
        )));
    }

    Ok(Exercise::new(
        format!("ex{}", index + 1),
        name.trim(),
        sets,
        reps.trim(),
    ))
}

fn cmd_plan_add(
    store: &mut WorkoutStore<FileStore>,
    name: String,
    exercise_specs: Vec<String>,
    description: Option<String>,
    difficulty: Option<String>,
) -> Result<()> {
    let exercises = exercise_specs
        .iter()
        .enumerate()
        .map(|(i, spec)| parse_exercise(spec, i))
        .collect::<Result<Vec<_>>>()?;

    let mut plan = WorkoutPlan::new(name, exercises);
    plan.description = description;
    if let Some(d) = difficulty {
        plan.difficulty = match d.to_lowercase().as_str() {
            "beginner" => Difficulty::Beginner,
            "intermediate" => Difficulty::Intermediate,
            "advanced" => Difficulty::Advanced,
            other => return Err(Error::Other(format!("unknown difficulty: {other}"))),
        };
    }

    let name = plan.name.clone();
    let id = plan.id.clone();
    let count = plan.exercises.len();
    store.upsert_plan(plan)?;

    println!("✓ Created plan '{name}' ({count} exercises)");
    println!("  id: {id}");
    Ok(())
}

fn cmd_plan_list(store: &WorkoutStore<FileStore>) -> Result<()> {
    let plans = store.plans()?;
    if plans.is_empty() {
        println!("No plans yet. Create one with 'setfit plan add'.");
        return Ok(());
    }

    for plan in plans {
        println!("{}  {} ({:?})", plan.id, plan.name, plan.difficulty);
        for ex in &plan.exercises {
            println!("    {} — {} x {}", ex.name, ex.sets, ex.reps);
        }
    }
    Ok(())
}

fn cmd_plan_remove(store: &mut WorkoutStore<FileStore>, plan_ref: &str) -> Result<()> {
    let Some(plan) = store.find_plan(plan_ref)? else {
        return Err(Error::Other(format!("no plan matching '{plan_ref}'")));
    };

    store.delete_plan(&plan.id)?;
    println!("✓ Removed plan '{}'", plan.name);
    Ok(())
}

// ============================================================================
// Guided session
// ============================================================================

fn cmd_start(
    store: &mut WorkoutStore<FileStore>,
    plan_ref: &str,
    rest: Option<u32>,
    skip_rest: bool,
    auto_complete: bool,
) -> Result<()> {
    let Some(plan) = store.find_plan(plan_ref)? else {
        return Err(Error::Other(format!("no plan matching '{plan_ref}'")));
    };

    let settings = store.settings()?;
    let rest_duration = rest.unwrap_or(settings.default_rest_time);

    println!("\n━━━ {} ━━━", plan.name);
    println!("{} exercises, {}s rest between exercises\n", plan.exercises.len(), rest_duration);

    let mut runner = SessionRunner::start(plan, rest_duration)?;

    loop {
        match runner.phase().clone() {
            Phase::Active { .. } => {
                if !drive_active(&mut runner, auto_complete)? {
                    runner.cancel();
                }
            }
            Phase::Resting { .. } => {
                drive_rest(&mut runner, skip_rest || auto_complete);
            }
            Phase::Finished | Phase::Cancelled { .. } => break,
        }
    }

    if runner.is_cancelled() {
        println!("\nWorkout ended. Nothing logged.");
        return Ok(());
    }

    if let Some(log) = runner.take_log() {
        println!("\n✓ Workout complete! Duration: {}", format_duration(log.duration));
        // A failed write must not block normal teardown; the session is
        // over either way and the user can re-run or discard.
        if let Err(e) = store.append_log(&log) {
            eprintln!("Warning: could not save workout log: {e}");
        }
    }

    Ok(())
}

/// Present the active exercise and take one set action
///
/// Returns false when the user cancels the session.
fn drive_active(runner: &mut SessionRunner, auto_complete: bool) -> Result<bool> {
    let Some(ex) = runner.current_exercise() else {
        return Ok(true);
    };
    let exercise_id = ex.id.clone();
    let exercise_name = ex.name.clone();
    let reps = ex.reps.clone();

    let done: Vec<bool> = runner
        .set_completion(&exercise_id)
        .map(|sets| sets.to_vec())
        .unwrap_or_default();
    let next_set = done.iter().position(|d| !d);

    if auto_complete {
        if let Some(set_index) = next_set {
            runner.toggle_set(&exercise_id, set_index)?;
        }
        return Ok(true);
    }

    let index = runner.current_exercise_index();
    let total = runner.plan().exercises.len();
    println!("[{}/{}] {}  ({} sets x {} reps)", index + 1, total, exercise_name, done.len(), reps);
    for (i, completed) in done.iter().enumerate() {
        let mark = if *completed { "✓" } else { " " };
        println!("  [{mark}] Set {}", i + 1);
    }

    println!("Press Enter to mark the next set done");
    println!("  'u' + Enter to unmark the last completed set");
    println!("  'q' + Enter to end the workout");
    print!("> ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    match input.trim().to_lowercase().as_str() {
        "q" => Ok(false),
        "u" => {
            if let Some(last_done) = done.iter().rposition(|d| *d) {
                runner.toggle_set(&exercise_id, last_done)?;
            }
            Ok(true)
        }
        _ => {
            if let Some(set_index) = next_set {
                runner.toggle_set(&exercise_id, set_index)?;
            }
            Ok(true)
        }
    }
}

/// Run the rest countdown, driving the one-second tick
fn drive_rest(runner: &mut SessionRunner, skip: bool) {
    if skip {
        runner.skip_rest();
        return;
    }

    match runner.next_exercise() {
        Some(next) => println!("\nREST — next up: {}", next.name),
        None => println!("\nREST — last exercise done!"),
    }

    while let Some(remaining) = runner.remaining_rest() {
        print!("\r  {remaining:>3}s remaining ");
        let _ = io::stdout().flush();
        std::thread::sleep(std::time::Duration::from_secs(1));
        runner.tick();
    }
    println!();
}

// ============================================================================
// History / stats
// ============================================================================

fn cmd_history(store: &mut WorkoutStore<FileStore>, clear: bool) -> Result<()> {
    if clear {
        store.clear_logs()?;
        println!("✓ Workout history cleared");
        return Ok(());
    }

    let mut logs = store.logs()?;
    if logs.is_empty() {
        println!("No workouts completed yet.");
        return Ok(());
    }

    logs.sort_by(|a, b| b.date.cmp(&a.date));
    for log in logs {
        println!(
            "{}  {}  {}",
            log.date.format("%Y-%m-%d %H:%M"),
            format_duration(log.duration),
            log.plan_name,
        );
    }
    Ok(())
}

fn cmd_stats(store: &WorkoutStore<FileStore>) -> Result<()> {
    let stats = compute_stats(&store.logs()?);

    println!("Total workouts:   {}", stats.total_workouts);
    println!("Total time:       {}", format_duration(stats.total_duration_secs));
    println!("Average workout:  {}", format_duration(stats.average_duration_secs));
    if let Some(plan) = &stats.favorite_plan {
        println!("Favorite plan:    {plan}");
    }
    println!("Longest streak:   {} days", stats.longest_streak);
    println!("Current streak:   {} days", stats.current_streak);
    if let Some(last) = stats.last_workout {
        println!("Last workout:     {}", last.format("%Y-%m-%d %H:%M"));
    }
    Ok(())
}

fn format_duration(seconds: u64) -> String {
    format!("{}m {}s", seconds / 60, seconds % 60)
}

// ============================================================================
// Suggestions
// ============================================================================

fn cmd_suggest(config: &Config, muscle_group: &str) -> Result<()> {
    let client = RemoteSuggestionClient::from_config(&config.suggestions);
    if client.is_none() {
        println!("(no API key configured — using built-in suggestions)\n");
    }

    for suggestion in suggest_exercises(client.as_ref(), muscle_group) {
        println!("  {} — {}", suggestion.name, suggestion.description);
    }
    Ok(())
}

// ============================================================================
// Backup
// ============================================================================

fn cmd_export(store: &WorkoutStore<FileStore>, file: &Path) -> Result<()> {
    let json = export_data(store)?;
    std::fs::write(file, json)?;
    println!("✓ Exported backup to {}", file.display());
    Ok(())
}

fn cmd_import(store: &mut WorkoutStore<FileStore>, file: &Path) -> Result<()> {
    let json = std::fs::read_to_string(file)?;
    let summary = import_data(store, &json)?;

    if let Some(count) = summary.plans {
        println!("✓ Imported {count} plans");
    }
    if let Some(count) = summary.logs {
        println!("✓ Imported {count} logs");
    }
    if summary.settings {
        println!("✓ Imported settings");
    }
    if summary == ImportSummary::default() {
        println!("Backup contained no data sections.");
    }
    Ok(())
}

// ============================================================================
// Settings
// ============================================================================

fn cmd_settings(
    store: &mut WorkoutStore<FileStore>,
    rest_time: Option<u32>,
    units: Option<String>,
    theme: Option<String>,
    auto_start_timer: Option<String>,
) -> Result<()> {
    let mut settings = store.settings()?;
    let mut changed = false;

    if let Some(rest) = rest_time {
        settings.default_rest_time = rest;
        changed = true;
    }
    if let Some(units) = units {
        settings.units = match units.to_lowercase().as_str() {
            "metric" => Units::Metric,
            "imperial" => Units::Imperial,
            other => return Err(Error::Other(format!("unknown units: {other}"))),
        };
        changed = true;
    }
    if let Some(theme) = theme {
        settings.theme = match theme.to_lowercase().as_str() {
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            other => return Err(Error::Other(format!("unknown theme: {other}"))),
        };
        changed = true;
    }
    if let Some(auto) = auto_start_timer {
        settings.auto_start_timer = match auto.to_lowercase().as_str() {
            "on" => true,
            "off" => false,
            other => return Err(Error::Other(format!("expected on or off, got: {other}"))),
        };
        changed = true;
    }

    if changed {
        store.save_settings(&settings)?;
        println!("✓ Settings updated");
    }

    println!("theme:             {:?}", settings.theme);
    println!("units:             {:?}", settings.units);
    println!("default rest time: {}s", settings.default_rest_time);
    println!("notifications:     {}", settings.notifications);
    println!("auto-start timer:  {}", settings.auto_start_timer);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exercise() {
        let ex = parse_exercise("Bench Press:3x8-12", 0).unwrap();
        assert_eq!(ex.name, "Bench Press");
        assert_eq!(ex.sets, 3);
        assert_eq!(ex.reps, "8-12");
        assert_eq!(ex.id, "ex1");
    }

    #[test]
    fn test_parse_exercise_rejects_bad_specs() {
        assert!(parse_exercise("no separator", 0).is_err());
        assert!(parse_exercise("Squat:heavy", 0).is_err());
        assert!(parse_exercise("Squat:threex5", 0).is_err());
        assert!(parse_exercise(":3x5", 0).is_err());
    }

    #[test]
    fn test_parse_exercise_zero_sets_allowed() {
        // Zero-set exercises are valid and rest immediately in a session
        let ex = parse_exercise("Stretching:0x30s", 3).unwrap();
        assert_eq!(ex.sets, 0);
        assert_eq!(ex.id, "ex4");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0m 0s");
        assert_eq!(format_duration(61), "1m 1s");
        assert_eq!(format_duration(3725), "62m 5s");
    }
}
