//! 列指向ストレージの最小実装
//!
//! NULLビットマスク付きの型付き列を提供する。ローリング集計エンジンが
//! 必要とする操作（構築、要素アクセス、NULLカウント、行収集）のみを持つ。

mod common;
mod float64_column;
mod int64_column;
mod string_column;

pub use common::{Column, ColumnType};
pub use common::utils;
pub use float64_column::Float64Column;
pub use int64_column::Int64Column;
pub use string_column::StringColumn;
