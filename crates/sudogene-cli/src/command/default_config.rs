use std::path::PathBuf;

use sudogene_training::config::ExperimentConfig;

use crate::util::Output;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DefaultConfigArg {
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DefaultConfigArg) -> anyhow::Result<()> {
    Output::save_json(&ExperimentConfig::default(), arg.output.as_deref())
}
