use std::path::PathBuf;

use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("입력값을 확인해주세요: {0}")]
    Validation(String),

    #[error("삭제 코드가 일치하지 않습니다")]
    CodeMismatch,

    #[error("신청을 찾을 수 없습니다: {0}")]
    NotFound(Uuid),

    #[error("파일이 이미 존재합니다: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, BoardError>;
