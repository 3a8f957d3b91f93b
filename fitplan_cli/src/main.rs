use clap::{Args, Parser, Subcommand};
use fitplan_core::config::SessionConfig;
use fitplan_core::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "fitplan")]
#[command(about = "Weekly workout planner and session timer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog exercises
    Catalog {
        /// Only this category (chest, back, legs, shoulders, arms, core, cardio)
        #[arg(long)]
        category: Option<Category>,
    },

    /// Generate and print a weekly plan
    Plan {
        #[command(flatten)]
        plan: PlanArgs,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a plan and run one of its days
    Run {
        /// Day to run (e.g. Monday)
        #[arg(long)]
        day: String,

        #[command(flatten)]
        plan: PlanArgs,

        /// Complete each exercise automatically (for testing)
        #[arg(long)]
        auto_complete: bool,

        /// Rest between exercises, overrides config
        #[arg(long)]
        rest_seconds: Option<u32>,

        /// Heartbeat period in milliseconds, overrides config
        #[arg(long)]
        tick_ms: Option<u64>,
    },
}

/// Generation parameter overrides; unset fields come from config
#[derive(Args, Debug)]
struct PlanArgs {
    /// Training days per week (1-7)
    #[arg(long)]
    days: Option<u32>,

    /// Minutes per session (15-120)
    #[arg(long)]
    minutes: Option<u32>,

    /// Focus areas, comma separated (full_body overrides the rest)
    #[arg(long, value_delimiter = ',')]
    focus: Vec<FocusArea>,

    /// Fitness level (beginner, intermediate, advanced)
    #[arg(long)]
    level: Option<FitnessLevel>,

    /// Goal (lose_weight, build_muscle, endurance, general_fitness)
    #[arg(long)]
    goal: Option<Goal>,

    /// Seed for a reproducible plan
    #[arg(long)]
    seed: Option<u64>,
}

impl PlanArgs {
    fn build_plan(&self, config: &Config) -> WeeklyPlan {
        let mut params = config.plan.parameters();
        if let Some(days) = self.days {
            params.days_per_week = days;
        }
        if let Some(minutes) = self.minutes {
            params.session_duration_minutes = minutes;
        }
        if !self.focus.is_empty() {
            params.focus_areas = self.focus.clone();
        }
        if let Some(level) = self.level {
            params.fitness_level = level;
        }
        if let Some(goal) = self.goal {
            params.goal = goal;
        }

        let seed = self.seed.or(config.plan.seed);
        tracing::debug!(
            "Plan parameters: {} days x {} min, focus {:?}, seed {:?}",
            params.days_per_week,
            params.session_duration_minutes,
            params.focus_areas,
            seed
        );

        let catalog = get_default_catalog();
        match seed {
            Some(seed) => generate_plan_seeded(catalog, &params, seed),
            None => generate_plan_random(catalog, &params),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        fitplan_core::logging::init_with_level("debug");
    } else {
        fitplan_core::logging::init_with_level("warn");
    }

    let config = match &cli.config {
        Some(path) => {
            tracing::debug!("Using config file {:?}", path);
            Config::load_from(path)?
        }
        None => Config::load()?,
    };

    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    match cli.command {
        Commands::Catalog { category } => cmd_catalog(catalog, category),
        Commands::Plan { plan, json } => cmd_plan(&plan, json, &config),
        Commands::Run {
            day,
            plan,
            auto_complete,
            rest_seconds,
            tick_ms,
        } => {
            let mut session_config = config.session.clone();
            if let Some(rest) = rest_seconds {
                session_config.rest_seconds = rest;
            }
            if let Some(ms) = tick_ms {
                session_config.tick_interval_ms = ms;
            }
            cmd_run(&day, plan.build_plan(&config), &session_config, auto_complete)
        }
    }
}

fn cmd_catalog(catalog: &Catalog, only: Option<Category>) -> Result<()> {
    let categories: Vec<Category> = match only {
        Some(category) => vec![category],
        None => catalog.categories().collect(),
    };

    for category in categories {
        println!("{}", category.as_str().to_uppercase());
        for ex in catalog.by_category(category) {
            println!(
                "  {:<22} {:<14} {:>3} kcal  {:?}",
                ex.name,
                ex.volume.to_string(),
                ex.energy_cost,
                ex.difficulty
            );
        }
        println!();
    }
    Ok(())
}

fn cmd_plan(args: &PlanArgs, json: bool, config: &Config) -> Result<()> {
    let plan = args.build_plan(config);

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        display_plan(&plan);
    }
    Ok(())
}

fn cmd_run(
    day_label: &str,
    plan: WeeklyPlan,
    session_config: &SessionConfig,
    auto_complete: bool,
) -> Result<()> {
    let day = plan
        .day_by_label(day_label)
        .cloned()
        .ok_or_else(|| Error::Other(format!("No {} in this plan", day_label)))?;

    display_day(&day);

    let controller = SessionController::new(plan).with_rest_seconds(session_config.rest_seconds);
    let runtime = SessionRuntime::spawn(controller)?;
    let handle = runtime.handle();
    let heartbeats = runtime.start_heartbeats(session_config.tick_interval())?;
    let poll = session_config.tick_interval() / 2;

    handle.start_by_label(day_label)?;

    let outcome = if auto_complete {
        run_auto(&handle, &day, poll)
    } else {
        run_interactive(&handle, &day, poll)
    };

    heartbeats.stop();

    let finished = match outcome {
        Ok(true) => {
            handle.finish()?;
            true
        }
        Ok(false) => {
            handle.abandon()?;
            false
        }
        Err(e) => {
            let _ = runtime.shutdown();
            return Err(e);
        }
    };

    let snap = handle.snapshot()?;
    let controller = runtime.shutdown()?;

    if finished {
        println!("\n✓ Workout complete!");
    } else {
        println!("\nWorkout abandoned.");
    }
    println!(
        "  Week: {}% ({} of {} days)",
        snap.progress_percent,
        snap.completed_day_labels.len(),
        controller.plan().parameters.days_per_week
    );
    println!("  Energy so far: {} kcal", snap.cumulative_energy);

    Ok(())
}

/// Wait out the rest countdown, printing it when it changes
fn wait_rest(handle: &SessionHandle, poll: Duration, echo: bool) -> Result<SessionSnapshot> {
    let mut last_shown = None;
    loop {
        let snap = handle.snapshot()?;
        let Some(session) = snap.session.as_ref().filter(|s| s.rest_active()) else {
            return Ok(snap);
        };

        let remaining = session.rest_remaining_seconds();
        if echo && last_shown != Some(remaining) && remaining % 10 == 0 {
            println!("  Rest: {}s", remaining);
            last_shown = Some(remaining);
        }
        thread::sleep(poll);
    }
}

fn run_auto(handle: &SessionHandle, day: &DayWorkout, poll: Duration) -> Result<bool> {
    for (i, instance) in day.exercises.iter().enumerate() {
        handle.complete_exercise(i)?;
        println!("  ✓ {}", instance.exercise.name);
        wait_rest(handle, poll, false)?;
    }

    Ok(handle.snapshot()?.phase == SessionPhase::Completed)
}

fn run_interactive(handle: &SessionHandle, day: &DayWorkout, poll: Duration) -> Result<bool> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let snap = wait_rest(handle, poll, true)?;
        let session = match (snap.phase, snap.session) {
            (SessionPhase::Completed, _) => return Ok(true),
            (SessionPhase::Running, Some(session)) => session,
            _ => return Ok(false),
        };

        let index = session.current_exercise_index();
        if let Some(instance) = day.exercises.get(index) {
            println!(
                "\n[{}/{}] {} - {}   ({}s elapsed{})",
                index + 1,
                session.exercise_count(),
                instance.exercise.name,
                instance.exercise.volume,
                session.elapsed_seconds(),
                if session.running_active() { "" } else { ", paused" }
            );
        }

        println!("Enter = done, 'p' = pause/resume, 'r' = reset clock, 'q' = quit");
        print!("> ");
        io::stdout().flush()?;

        let input = match lines.next() {
            Some(line) => line?,
            None => return Ok(false),
        };

        match input.trim().to_lowercase().as_str() {
            "p" if session.running_active() => handle.pause()?,
            "p" => handle.resume()?,
            "r" => handle.reset()?,
            "q" => return Ok(false),
            _ => handle.complete_exercise(index)?,
        }
    }
}

fn display_plan(plan: &WeeklyPlan) {
    let p = &plan.parameters;
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  WEEKLY PLAN");
    println!("╰─────────────────────────────────────────╯");
    println!(
        "  {} days x {} min, focus: {}",
        p.days_per_week,
        p.session_duration_minutes,
        p.focus_areas
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("  Level: {:?}, goal: {:?}", p.fitness_level, p.goal);

    for day in &plan.days {
        display_day(day);
    }

    println!();
    println!(
        "  Total: {} exercises, ~{} kcal",
        plan.exercise_count(),
        plan.total_energy_budget()
    );
    println!();
}

fn display_day(day: &DayWorkout) {
    println!();
    println!(
        "  {} ({} min, ~{} kcal)",
        day.label(),
        day.duration_budget_minutes,
        day.total_energy_budget
    );
    if day.exercises.is_empty() {
        println!("    (rest day - no exercises for this focus)");
    }
    for instance in &day.exercises {
        println!(
            "    → {:<22} {:<14} {:>3} kcal",
            instance.exercise.name,
            instance.exercise.volume.to_string(),
            instance.exercise.energy_cost
        );
    }
}
