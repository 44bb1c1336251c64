use std::{io, path::PathBuf, sync::Arc};

use anyhow::Context;
use chrono::{Local, Utc};
use sudogene_training::{
    board_solver::BoardSolver, config::ExperimentConfig, evolution::Evolution,
    individual::Individual, population::Population,
};

use crate::{
    progress::Progress,
    puzzle_file::PuzzleFile,
    report::{CsvReport, ReportHeader},
    schema::evolution_result::EvolutionResult,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvolveArg {
    /// Puzzle file to read
    #[arg(long)]
    puzzles: PathBuf,
    /// Side length of the puzzles in the file
    #[arg(long, default_value_t = 9)]
    size: usize,
    /// Index of the puzzle to solve; random when omitted
    #[arg(long)]
    index: Option<usize>,
    /// Experiment config JSON file; the flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,
    #[clap(flatten)]
    overrides: ConfigOverrides,
    /// Directory CSV reports are written to
    #[arg(long, default_value = "reports")]
    report_dir: PathBuf,
    /// Skip writing the CSV report
    #[arg(long)]
    no_report: bool,
    /// Output file path for the JSON result
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Default, Debug, Clone, clap::Args)]
struct ConfigOverrides {
    #[arg(long)]
    tree_height: Option<usize>,
    #[arg(long)]
    population_size: Option<usize>,
    #[arg(long)]
    max_generations: Option<usize>,
    #[arg(long)]
    mutation_prob: Option<f64>,
    #[arg(long)]
    crossover_prob: Option<f64>,
    #[arg(long)]
    good_population_percent: Option<f64>,
    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

impl ConfigOverrides {
    fn apply(&self, config: &mut ExperimentConfig) {
        let Self {
            tree_height,
            population_size,
            max_generations,
            mutation_prob,
            crossover_prob,
            good_population_percent,
            seed,
        } = *self;
        config.tree_height = tree_height.unwrap_or(config.tree_height);
        config.population_size = population_size.unwrap_or(config.population_size);
        config.max_generations = max_generations.unwrap_or(config.max_generations);
        config.mutation_prob = mutation_prob.unwrap_or(config.mutation_prob);
        config.crossover_prob = crossover_prob.unwrap_or(config.crossover_prob);
        config.good_population_percent =
            good_population_percent.unwrap_or(config.good_population_percent);
        config.seed = seed.or(config.seed);
    }
}

fn load_config(arg: &EvolveArg) -> anyhow::Result<ExperimentConfig> {
    let mut config = match &arg.config {
        Some(path) => util::read_json_file("experiment config", path)?,
        None => ExperimentConfig::default(),
    };
    arg.overrides.apply(&mut config);
    config.validate().context("Invalid experiment config")?;
    Ok(config)
}

pub(crate) fn run(arg: &EvolveArg) -> anyhow::Result<()> {
    let config = load_config(arg)?;
    let function_set = Arc::new(
        config
            .function_set()
            .context("Invalid operation set in experiment config")?,
    );
    let selection = config.selection()?;
    let mut rng = config.rng();

    let puzzles = PuzzleFile::open(&arg.puzzles, arg.size)?;
    let (index, board) = match arg.index {
        Some(index) => (index, puzzles.load_board(index)?),
        None => puzzles.load_random_board(&mut rng)?,
    };
    let original_empty_cells = board.count_empty_cells();
    eprintln!("Puzzle #{index} from {}", puzzles.path().display());
    eprintln!("  Empty cells: {original_empty_cells}");
    eprintln!();
    eprintln!("{board}");

    let report = if arg.no_report {
        None
    } else {
        let header = ReportHeader {
            started_at: Local::now().naive_local(),
            original_empty_cells,
            config: &config,
            function_set: &function_set,
        };
        let (report, path) = CsvReport::create(&arg.report_dir, &header)?;
        eprintln!("Writing report to {}", path.display());
        Some(report)
    };

    let prototype = BoardSolver::random(
        config.tree_height,
        Arc::clone(&function_set),
        Arc::new(board),
        &mut rng,
    )?;
    let population = Population::random(config.population_size, &prototype, &mut rng);
    let evolution = Evolution::new(population, selection, config.max_generations);
    let progress = Progress::new(io::stderr(), evolution.max_generations());
    let outcome = evolution
        .run(&mut rng, &mut (progress, report))
        .context("Failed to write evolution progress")?;

    eprintln!();
    if outcome.solved {
        eprintln!("Solved at generation #{}", outcome.generation);
    } else {
        eprintln!(
            "Not solved after {} generations (best fitness {})",
            outcome.generation,
            outcome.best.fitness()
        );
    }
    eprintln!();
    eprint!("{}", outcome.best.summary());

    let result = EvolutionResult::new(index, &outcome, Utc::now());
    Output::save_json(&result, arg.output.as_deref())?;
    if let Some(path) = &arg.output {
        eprintln!();
        eprintln!("Result saved to {}", path.display());
    }
    Ok(())
}
