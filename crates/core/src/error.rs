use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Module not found at source address {0}")]
    ModuleNotFound(u8),
}

pub type Result<T> = std::result::Result<T, CoreError>;
