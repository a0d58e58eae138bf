use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use byte_unit::{Byte, Unit};
use serde::Deserialize;

const CONFIG_FILE_NAME: &str = ".jprompt";

#[derive(Debug)]
#[cfg_attr(test, derive(PartialEq))]
pub struct Config {
    pub default_output: String,
    pub max_input_size: Byte,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_output: String::from("output.json"),
            max_input_size: Byte::from_u64_with_unit(16, Unit::MiB)
                .expect("failed to build default max_input_size"),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let mut files = vec![PathBuf::from("/etc/jprompt")];
        if let Some(home) = std::env::var_os("HOME") {
            files.push(PathBuf::from(home).join(CONFIG_FILE_NAME));
        }
        files.push(PathBuf::from(CONFIG_FILE_NAME));

        Self::default().patch_from_files(&files)
    }

    fn patch_from_files<P: AsRef<Path>>(self, files: &[P]) -> Self {
        files
            .iter()
            .filter_map(|path| {
                let mut file = File::open(path).ok()?;
                let mut content = String::new();
                file.read_to_string(&mut content).ok()?;
                match toml::from_str(&content) {
                    Ok(patch) => {
                        tracing::debug!(path = %path.as_ref().display(), "applying config file");
                        Some(patch)
                    }
                    Err(error) => {
                        tracing::debug!(path = %path.as_ref().display(), %error, "skipping config file");
                        None
                    }
                }
            })
            .fold(self, Self::patch)
    }

    fn patch(mut self, patch: ConfigPatch) -> Self {
        if let Some(default_output) = patch.default_output {
            self.default_output = default_output;
        }

        if let Some(max_input_size) = patch.max_input_size {
            self.max_input_size = max_input_size;
        }

        self
    }
}

#[cfg(test)]
impl Config {
    pub fn with_default_output(mut self, default_output: &str) -> Self {
        self.default_output = default_output.to_string();
        self
    }

    pub fn with_max_input_size(mut self, max_input_size: Byte) -> Self {
        self.max_input_size = max_input_size;
        self
    }
}

#[derive(Debug, Default, Deserialize)]
#[cfg_attr(test, derive(serde::Serialize))]
struct ConfigPatch {
    pub default_output: Option<String>,
    pub max_input_size: Option<Byte>,
}
