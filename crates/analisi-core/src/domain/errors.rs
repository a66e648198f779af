use thiserror::Error;

pub type AnalisiResult<T> = Result<T, AnalisiError>;
pub type PrepareResult<T> = AnalisiResult<T>;
pub type ParseResult<T> = AnalisiResult<T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    RequestValidation,
    Staging,
    Retrieval,
    Parse,
}

impl ErrorClass {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RequestValidation => "RequestValidation",
            Self::Staging => "Staging",
            Self::Retrieval => "Retrieval",
            Self::Parse => "Parse",
        }
    }

    /// Process exit code used by command-line front ends.
    pub const fn process_exit_code(self) -> i32 {
        match self {
            Self::RequestValidation => 2,
            Self::Staging => 3,
            Self::Retrieval | Self::Parse => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitConditionDescriptor {
    pub status: u32,
    pub name: &'static str,
    pub class: ErrorClass,
    pub message: &'static str,
}

/// Named exit conditions reported to the host, each with a fixed status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitCondition {
    NoData,
    TooManyCalculations,
    InvalidTrajectory,
    WritingInputFile,
    NoRetrievedFolder,
    ReadingOutputFile,
    InvalidOutput,
}

impl ExitCondition {
    pub const ALL: [Self; 7] = [
        Self::NoData,
        Self::TooManyCalculations,
        Self::InvalidTrajectory,
        Self::WritingInputFile,
        Self::NoRetrievedFolder,
        Self::ReadingOutputFile,
        Self::InvalidOutput,
    ];

    pub const fn descriptor(self) -> ExitConditionDescriptor {
        match self {
            Self::NoData => ExitConditionDescriptor {
                status: 400,
                name: "ERROR_NO_DATA",
                class: ErrorClass::RequestValidation,
                message: "You must provide a trajectory data",
            },
            Self::TooManyCalculations => ExitConditionDescriptor {
                status: 401,
                name: "ERROR_TOO_CALCULATIONS_SPECIFIED",
                class: ErrorClass::RequestValidation,
                message: "You must specify only one input between msd, gofrt and sh",
            },
            Self::InvalidTrajectory => ExitConditionDescriptor {
                status: 402,
                name: "ERROR_INVALID_TRAJECTORY",
                class: ErrorClass::RequestValidation,
                message: "The trajectory arrays have inconsistent shapes",
            },
            Self::WritingInputFile => ExitConditionDescriptor {
                status: 403,
                name: "ERROR_WRITING_INPUT_FILE",
                class: ErrorClass::Staging,
                message: "The binary trajectory file could not be written",
            },
            Self::NoRetrievedFolder => ExitConditionDescriptor {
                status: 300,
                name: "ERROR_NO_RETRIEVED_FOLDER",
                class: ErrorClass::Retrieval,
                message: "The retrieved folder data node could not be accessed.",
            },
            Self::ReadingOutputFile => ExitConditionDescriptor {
                status: 310,
                name: "ERROR_READING_OUTPUT_FILE",
                class: ErrorClass::Parse,
                message: "The output file could not be read from the retrieved folder.",
            },
            Self::InvalidOutput => ExitConditionDescriptor {
                status: 320,
                name: "ERROR_INVALID_OUTPUT",
                class: ErrorClass::Parse,
                message: "The output file contains invalid output.",
            },
        }
    }

    pub const fn status(self) -> u32 {
        self.descriptor().status
    }

    pub const fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub const fn class(self) -> ErrorClass {
        self.descriptor().class
    }

    pub const fn default_message(self) -> &'static str {
        self.descriptor().message
    }

    pub fn from_status(status: u32) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|condition| condition.status() == status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} [{}] {}", .condition.name(), .placeholder, .message)]
pub struct AnalisiError {
    condition: ExitCondition,
    placeholder: &'static str,
    message: String,
}

impl AnalisiError {
    pub fn new(
        condition: ExitCondition,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            condition,
            placeholder,
            message: message.into(),
        }
    }

    pub fn no_data(placeholder: &'static str) -> Self {
        Self::new(
            ExitCondition::NoData,
            placeholder,
            ExitCondition::NoData.default_message(),
        )
    }

    pub fn too_many_calculations(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ExitCondition::TooManyCalculations, placeholder, message)
    }

    pub fn invalid_trajectory(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ExitCondition::InvalidTrajectory, placeholder, message)
    }

    pub fn writing_input_file(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ExitCondition::WritingInputFile, placeholder, message)
    }

    pub fn no_retrieved_folder(placeholder: &'static str) -> Self {
        Self::new(
            ExitCondition::NoRetrievedFolder,
            placeholder,
            ExitCondition::NoRetrievedFolder.default_message(),
        )
    }

    pub fn reading_output_file(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ExitCondition::ReadingOutputFile, placeholder, message)
    }

    pub fn invalid_output(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ExitCondition::InvalidOutput, placeholder, message)
    }

    pub const fn condition(&self) -> ExitCondition {
        self.condition
    }

    pub const fn class(&self) -> ErrorClass {
        self.condition.class()
    }

    pub const fn status(&self) -> u32 {
        self.condition.status()
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn process_exit_code(&self) -> i32 {
        self.condition.class().process_exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder, self.message)
    }

    pub fn exit_condition_line(&self) -> String {
        format!(
            "EXIT CONDITION: {} {}",
            self.condition.status(),
            self.condition.name()
        )
    }
}
