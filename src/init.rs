use std::path::{Path, PathBuf};

use crate::error::{BoardError, Result};
use crate::store::Store;

pub fn csv_path(filename: &Path) -> PathBuf {
    if filename.extension().is_some_and(|ext| ext == "csv") {
        filename.to_path_buf()
    } else {
        let mut path = filename.to_path_buf().into_os_string();
        path.push(".csv");
        path.into()
    }
}

/// Store for a `--file` value as every command resolves it.
pub fn board_store(filename: &Path) -> Store {
    Store::new(csv_path(filename))
}

/// Creates an empty board file; refuses to overwrite an existing one.
pub fn init_board(filename: &Path) -> Result<Store> {
    let store = board_store(filename);
    if store.path().exists() {
        return Err(BoardError::AlreadyExists(store.path().to_path_buf()));
    }
    store.save(&[])?;
    println!("게시판 파일을 생성했습니다: {}", store.path().display());
    Ok(store)
}
