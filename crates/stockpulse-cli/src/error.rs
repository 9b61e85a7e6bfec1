use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] stockpulse_core::ConfigError),

    #[error("strict mode failed: warnings={warning_count}, errors={error_count}")]
    StrictModeViolation {
        warning_count: usize,
        error_count: usize,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Warehouse(#[from] stockpulse_warehouse::WarehouseError),

    #[error("query log task failed: {0}")]
    QueryLogTask(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::StrictModeViolation { .. } => 5,
            Self::Serialization(_) => 4,
            Self::Warehouse(_) | Self::QueryLogTask(_) => 7,
            Self::Io(_) => 10,
        }
    }
}

/// Exit code for a command whose envelope carries the error `code`.
pub fn exit_code_for_error(code: &str) -> u8 {
    match code {
        "fetch.invalid_input" => 2,
        "fetch.unconfigured" => 8,
        "fetch.transport_failure" => 6,
        _ => 3,
    }
}
