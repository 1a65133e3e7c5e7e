use thiserror::Error;

/// エラー型の定義
#[derive(Error, Debug)]
pub enum Error {
    #[error("無効な引数です: {0}")]
    InvalidArgument(String),

    #[error("未対応の操作です: {0}")]
    NotSupported(String),

    #[error("ウィンドウ境界が不正です: {0}")]
    InvalidBoundary(String),

    #[error("インデックスが範囲外です: インデックス {index}, サイズ {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    #[error("長さが一致しません: 期待値 {expected}, 実際 {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("列が見つかりません: {0}")]
    ColumnNotFound(String),

    #[error("列名が重複しています: {0}")]
    DuplicateColumnName(String),

    #[error("行数が一致しません: 期待値 {expected}, 実際 {found}")]
    InconsistentRowCount { expected: usize, found: usize },

    #[error("データ一貫性エラー: {0}")]
    Consistency(String),
}

/// Resultの型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
