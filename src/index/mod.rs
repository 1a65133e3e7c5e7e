//! 行インデックスを表現するモジュール

mod multi_index;

pub use multi_index::MultiIndex;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// インデックスのラベル値
#[derive(Debug, Clone, PartialEq)]
pub enum IndexLabel {
    /// 整数ラベル
    Int64(i64),
    /// 文字列ラベル
    String(String),
    /// 日時ラベル
    Datetime(DateTime<Utc>),
    /// 欠損ラベル
    Null,
}

impl std::fmt::Display for IndexLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexLabel::Int64(v) => write!(f, "{}", v),
            IndexLabel::String(s) => write!(f, "{}", s),
            IndexLabel::Datetime(dt) => write!(f, "{}", dt.to_rfc3339()),
            IndexLabel::Null => write!(f, "NULL"),
        }
    }
}

/// 行の軸を表す構造体
///
/// 暗黙の位置番号、整数軸、または日時軸のいずれか。時間ベースの
/// ウィンドウは日時軸を必要とする。日時軸は昇順であることを前提と
/// する（ここでは検証しない）。
#[derive(Debug, Clone)]
pub enum RowIndex {
    /// 位置番号によるインデックス (0..len)
    Range { len: usize },
    /// 整数値のインデックス
    Int64(Vec<i64>),
    /// 日時のインデックス
    Datetime(Vec<DateTime<Utc>>),
}

impl RowIndex {
    /// 長さを取得
    pub fn len(&self) -> usize {
        match self {
            RowIndex::Range { len } => *len,
            RowIndex::Int64(values) => values.len(),
            RowIndex::Datetime(values) => values.len(),
        }
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 日時インデックスかどうか
    pub fn is_datetime(&self) -> bool {
        matches!(self, RowIndex::Datetime(_))
    }

    /// 日時軸をナノ秒の整数目盛りに変換する
    ///
    /// オフセットウィンドウのサイズ導出に使用する。日時インデックス
    /// でない場合はNoneを返す。
    pub fn ticks_nanos(&self) -> Option<Vec<i64>> {
        match self {
            RowIndex::Datetime(values) => Some(
                values
                    .iter()
                    .map(|dt| dt.timestamp_nanos_opt().unwrap_or(i64::MAX))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// 指定位置のラベルを取得する
    pub fn label(&self, index: usize) -> Result<IndexLabel> {
        if index >= self.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                size: self.len(),
            });
        }

        Ok(match self {
            RowIndex::Range { .. } => IndexLabel::Int64(index as i64),
            RowIndex::Int64(values) => IndexLabel::Int64(values[index]),
            RowIndex::Datetime(values) => IndexLabel::Datetime(values[index]),
        })
    }

    /// 行インデックスのリストに従ってラベルを収集した新しいインデックスを作成する
    pub fn take(&self, indices: &[usize]) -> Result<Self> {
        let len = self.len();
        for &idx in indices {
            if idx >= len {
                return Err(Error::IndexOutOfBounds { index: idx, size: len });
            }
        }

        Ok(match self {
            // 並べ替え後は位置番号の意味が失われるため、元の番号を整数軸として残す
            RowIndex::Range { .. } => {
                RowIndex::Int64(indices.iter().map(|&i| i as i64).collect())
            }
            RowIndex::Int64(values) => {
                RowIndex::Int64(indices.iter().map(|&i| values[i]).collect())
            }
            RowIndex::Datetime(values) => {
                RowIndex::Datetime(indices.iter().map(|&i| values[i]).collect())
            }
        })
    }
}
