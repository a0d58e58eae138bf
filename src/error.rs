use std::path::PathBuf;

use byte_unit::{Byte, UnitType};

#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("Serialization error: {0}")]
    SerdeJson(#[from] sonic_rs::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Deserialization error: {0}")]
    SerdeJson(#[from] sonic_rs::Error),
    #[error("File is larger than {}", limit.get_appropriate_unit(UnitType::Binary))]
    TooLarge { limit: Byte },
    #[error(transparent)]
    IO(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
#[cfg_attr(test, derive(PartialEq))]
pub enum IndexingError {
    #[error("Not indexable")]
    NotIndexable,
    #[error("Missing key: {0}")]
    MissingKey(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Deserialization error: {0}")]
    SerdeJson(#[from] sonic_rs::Error),
    #[error("Schema root must be a JSON object")]
    NotAnObject,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("First argument must be a JSON Schema file. Exiting...")]
    MissingArgument,
    #[error("ERROR while reading the schema file {}:\n{source}", path.display())]
    SchemaRead { path: PathBuf, source: LoadError },
    #[error("ERROR while parsing the schema file {}:\n{source}", path.display())]
    SchemaParse { path: PathBuf, source: SchemaError },
    #[error("Error while reading the output file ({}):\n{source}", path.display())]
    OutputRead { path: PathBuf, source: LoadError },
    #[error("Error while writing the output file ({}):\n{source}", path.display())]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Error while serializing the output: {0}")]
    Dump(#[from] DumpError),
    #[error("Prompt session closed: {0}")]
    Prompt(#[source] std::io::Error),
}
