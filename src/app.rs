mod config;
mod prompt;
mod walker;

use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};

pub use config::Config;
pub use prompt::{Prompter, TerminalSession};
use walker::Walker;

use crate::{
    container::{document::Document, schema::Schema},
    error::{AppError, LoadError, SchemaError},
};

const RULE: &str = "============================================================";

pub struct CliApp {
    schema: Schema,
    output_file_name: PathBuf,
    intro: String,
    prior: Option<Document>,
}

impl CliApp {
    /// Loads everything the session needs, so that every fatal input error
    /// surfaces before the first question.
    pub fn new(
        schema_path: PathBuf,
        output_override: Option<PathBuf>,
        config: &Config,
    ) -> Result<Self, AppError> {
        let schema = load_schema(&schema_path, config)?;

        let output_file_name = output_override
            .or_else(|| schema.metadata.output.clone().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(&config.default_output));
        let intro = schema.metadata.intro.clone().unwrap_or_else(|| {
            format!(
                "This script will help you generate a JSON file that follow the schema describe in {} file.",
                schema_path.display()
            )
        });

        let prior = load_prior_output(&output_file_name, config)?;
        tracing::debug!(
            schema = %schema_path.display(),
            output = %output_file_name.display(),
            has_prior = prior.is_some(),
            "session ready"
        );

        Ok(Self {
            schema,
            output_file_name,
            intro,
            prior,
        })
    }

    pub fn run(&self, mut prompter: impl Prompter) -> Result<Value, AppError> {
        let output_file_name = self.output_file_name.display();

        prompter
            .say(&format!("\n{RULE}\n{}\n{RULE}", self.intro))
            .map_err(AppError::Prompt)?;
        if self.prior.is_some() {
            prompter
                .say(&format!(
                    "An existing {output_file_name} was found. Existing value will be proposed as default\n"
                ))
                .map_err(AppError::Prompt)?;
        }
        prompter
            .say("\n----- Let's start -----\n")
            .map_err(AppError::Prompt)?;

        let result = Walker::new(self.prior.as_ref().map(Document::root), &mut prompter)
            .walk(&self.schema.properties, "", Map::new())
            .map_err(AppError::Prompt)?;
        let result = Value::Object(result);

        let content = Document::to_string_pretty(&result)?;
        std::fs::write(&self.output_file_name, content).map_err(|source| {
            AppError::OutputWrite {
                path: self.output_file_name.clone(),
                source,
            }
        })?;
        tracing::debug!(output = %output_file_name, "output written");

        prompter
            .say(&format!(
                "\n\n----- Well done! -----\nYour file {output_file_name} has been generated/updated"
            ))
            .map_err(AppError::Prompt)?;

        Ok(result)
    }
}

#[cfg(test)]
impl CliApp {
    pub fn output_file_name(&self) -> &Path {
        &self.output_file_name
    }
}

fn load_schema(path: &Path, config: &Config) -> Result<Schema, AppError> {
    let document = File::open(path)
        .map_err(LoadError::from)
        .and_then(|file| Document::load(file, config.max_input_size))
        .map_err(|source| match source {
            LoadError::SerdeJson(error) => AppError::SchemaParse {
                path: path.to_path_buf(),
                source: SchemaError::SerdeJson(error),
            },
            source => AppError::SchemaRead {
                path: path.to_path_buf(),
                source,
            },
        })?;

    Schema::from_value(document.into_value()).map_err(|source| AppError::SchemaParse {
        path: path.to_path_buf(),
        source,
    })
}

fn load_prior_output(path: &Path, config: &Config) -> Result<Option<Document>, AppError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(error) => {
            return Err(AppError::OutputRead {
                path: path.to_path_buf(),
                source: error.into(),
            });
        }
    };

    Document::load(file, config.max_input_size)
        .map(Some)
        .map_err(|source| AppError::OutputRead {
            path: path.to_path_buf(),
            source,
        })
}
