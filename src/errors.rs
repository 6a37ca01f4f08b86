use thiserror;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error reading or writing \"{file}\": {source}")]
    FileIo {
        file: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Error opening workbook \"{file}\": {source}")]
    Workbook {
        file: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Error writing workbook \"{file}\": {source}")]
    WriteWorkbook {
        file: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Worksheet \"{0}\" does not exist in the workbook")]
    WorksheetNotFound(String),

    #[error("Error parsing config \"{file}\": {source}")]
    ParseConfig {
        file: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Error compiling regex \"{pattern}\": {source}")]
    InvalidRegex {
        pattern: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Error parsing fasta record in \"{file}\": {source}")]
    ParseFasta {
        file: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Cell ({row}, {col}) is outside the worksheet; rows and columns start at 1")]
    CellOutOfRange { row: u32, col: u32 },
}

impl Error {
    pub(crate) fn file_io(file: impl AsRef<str>, source: std::io::Error) -> Self {
        Error::FileIo {
            file: file.as_ref().to_owned(),
            source: Box::new(source),
        }
    }
}
