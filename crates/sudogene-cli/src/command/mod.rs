use clap::{Parser, Subcommand};

use self::{default_config::DefaultConfigArg, evolve::EvolveArg, show::ShowArg};

mod default_config;
mod evolve;
mod show;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve a heuristic that fills a puzzle
    Evolve(#[clap(flatten)] EvolveArg),
    /// Print a puzzle from a puzzle file
    Show(#[clap(flatten)] ShowArg),
    /// Print the default experiment config as JSON
    DefaultConfig(#[clap(flatten)] DefaultConfigArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Evolve(arg) => evolve::run(&arg)?,
        Mode::Show(arg) => show::run(&arg)?,
        Mode::DefaultConfig(arg) => default_config::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_evolve() {
        let args = CommandArgs::try_parse_from([
            "sudogene",
            "evolve",
            "--puzzles",
            "boards.txt",
            "--index",
            "2",
            "--seed",
            "7",
            "--no-report",
        ])
        .unwrap();
        assert!(matches!(args.mode, Mode::Evolve(_)));
    }

    #[test]
    fn test_missing_subcommand_fails() {
        assert!(CommandArgs::try_parse_from(["sudogene"]).is_err());
    }
}
