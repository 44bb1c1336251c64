use std::{
    fs::File,
    io::{self, BufReader, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;

/// Destination of machine-readable output: stdout or a file.
#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<&Path>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = match output_path {
            Some(path) => Output::create(path)?,
            None => Output::stdout(),
        };
        output.write_json(value)
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn create(path: &Path) -> anyhow::Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path: path.to_owned(),
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_owned(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self)
            .and_then(|()| self.flush())
            .with_context(|| format!("Failed to write {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    let value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use sudogene_training::config::ExperimentConfig;

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("sudogene-{}-{name}", process::id()))
    }

    #[test]
    fn test_json_file_round_trip() {
        let path = temp_path("config.json");
        let config = ExperimentConfig {
            tree_height: 4,
            seed: Some(5),
            ..ExperimentConfig::default()
        };
        Output::save_json(&config, Some(&path)).unwrap();
        let loaded: ExperimentConfig = read_json_file("experiment config", &path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_read_errors_name_the_file() {
        let path = temp_path("missing.json");
        let err = read_json_file::<ExperimentConfig, _>("experiment config", &path).unwrap_err();
        assert!(
            err.to_string()
                .starts_with("Failed to open experiment config file:")
        );

        let path = temp_path("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = read_json_file::<ExperimentConfig, _>("experiment config", &path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(
            err.to_string()
                .starts_with("Failed to parse experiment config JSON file:")
        );
    }
}
