#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidArguments = 2,
    InvalidTemplate = 3,
    InvalidProperty = 4,
    DirectoryNotFound = 5,
    LogError = 6,
    RenameError = 7,
    NoRenameLog = 8,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}
