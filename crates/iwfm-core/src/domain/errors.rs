use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type IwfmResult<T> = Result<T, IwfmError>;
pub type ParserResult<T> = IwfmResult<T>;
pub type RewriteResult<T> = IwfmResult<T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IwfmErrorCategory {
    Success,
    InvalidArgument,
    MissingFile,
    IoSystem,
    MalformedRecord,
    GeometryDegenerate,
    Internal,
}

impl IwfmErrorCategory {
    pub const fn exit_placeholder(self) -> ExitPlaceholder {
        match self {
            Self::Success => ExitPlaceholder {
                exit_code: 0,
                label: "Success",
                class: "SUCCESS",
            },
            Self::InvalidArgument => ExitPlaceholder {
                exit_code: 2,
                label: "InvalidArgumentError",
                class: "INPUT_FATAL",
            },
            Self::MissingFile => ExitPlaceholder {
                exit_code: 3,
                label: "MissingFileError",
                class: "IO_FATAL",
            },
            Self::IoSystem => ExitPlaceholder {
                exit_code: 4,
                label: "IoSystemError",
                class: "IO_FATAL",
            },
            Self::MalformedRecord => ExitPlaceholder {
                exit_code: 5,
                label: "MalformedRecordError",
                class: "INPUT_FATAL",
            },
            Self::GeometryDegenerate => ExitPlaceholder {
                exit_code: 6,
                label: "GeometryDegenerateError",
                class: "RUN_FATAL",
            },
            Self::Internal => ExitPlaceholder {
                exit_code: 7,
                label: "InternalError",
                class: "SYS_FATAL",
            },
        }
    }

    pub const fn exit_code(self) -> i32 {
        self.exit_placeholder().exit_code
    }

    pub const fn label(self) -> &'static str {
        self.exit_placeholder().label
    }

    pub const fn class(self) -> &'static str {
        self.exit_placeholder().class
    }

    pub const fn is_fatal(self) -> bool {
        !matches!(self, Self::Success)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitPlaceholder {
    pub exit_code: i32,
    pub label: &'static str,
    pub class: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IwfmError {
    category: IwfmErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl IwfmError {
    pub fn new(
        category: IwfmErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn invalid_argument(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(IwfmErrorCategory::InvalidArgument, placeholder, message)
    }

    /// A required source file is absent. The message names the path and the
    /// working directory it was resolved against.
    pub fn missing_file(path: &Path, role: &str) -> Self {
        let working_dir = std::env::current_dir()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|_| "<unknown>".to_string());
        Self::new(
            IwfmErrorCategory::MissingFile,
            "IO.MISSING_FILE",
            format!(
                "{} '{}' not found (working directory '{}')",
                role,
                path.display(),
                working_dir
            ),
        )
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(IwfmErrorCategory::IoSystem, placeholder, message)
    }

    pub fn malformed_record(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(IwfmErrorCategory::MalformedRecord, placeholder, message)
    }

    /// Malformed data line, reported with its 1-based line number.
    pub fn malformed_line(label: &str, index: usize, line: &str, reason: &str) -> Self {
        Self::malformed_record(
            "INPUT.MALFORMED_RECORD",
            format!(
                "{} line {}: {} (found '{}')",
                label,
                index + 1,
                reason,
                line.trim()
            ),
        )
    }

    pub fn geometry_degenerate(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(IwfmErrorCategory::GeometryDegenerate, placeholder, message)
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(IwfmErrorCategory::Internal, placeholder, message)
    }

    pub const fn category(&self) -> IwfmErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        let severity = if self.category.is_fatal() {
            "ERROR"
        } else {
            "INFO"
        };
        format!("{}: [{}] {}", severity, self.placeholder, self.message)
    }

    pub fn fatal_exit_line(&self) -> Option<String> {
        self.category
            .is_fatal()
            .then(|| format!("FATAL EXIT CODE: {}", self.exit_code()))
    }
}

impl Display for IwfmError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.label(),
            self.placeholder,
            self.message
        )
    }
}

impl Error for IwfmError {}
