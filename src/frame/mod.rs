//! 列指向テーブルを表すモジュール

use std::collections::HashMap;

use crate::column::Column;
use crate::error::{Error, Result};
use crate::index::{IndexLabel, MultiIndex, RowIndex};

/// テーブルの行インデックス
///
/// 通常の行軸、またはグループ化結果に付与される複合インデックス。
#[derive(Debug, Clone)]
pub enum FrameIndex {
    /// 単一の行軸
    Row(RowIndex),
    /// 複合インデックス
    Multi(MultiIndex),
}

impl FrameIndex {
    /// 行数を取得
    pub fn len(&self) -> usize {
        match self {
            FrameIndex::Row(index) => index.len(),
            FrameIndex::Multi(index) => index.len(),
        }
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 行インデックスのリストに従ってラベルを収集する
    pub fn take(&self, indices: &[usize]) -> Result<Self> {
        Ok(match self {
            FrameIndex::Row(index) => FrameIndex::Row(index.take(indices)?),
            FrameIndex::Multi(index) => FrameIndex::Multi(index.take(indices)?),
        })
    }

    /// 各レベルの名前を取得（単一軸は1レベル扱い）
    pub fn level_names(&self) -> Vec<Option<String>> {
        match self {
            FrameIndex::Row(_) => vec![None],
            FrameIndex::Multi(index) => index.names().to_vec(),
        }
    }

    /// 指定行のラベルタプルを取得する
    pub fn labels_at(&self, index: usize) -> Result<Vec<IndexLabel>> {
        match self {
            FrameIndex::Row(row) => Ok(vec![row.label(index)?]),
            FrameIndex::Multi(multi) => Ok(multi.get(index)?.to_vec()),
        }
    }
}

/// 列指向のテーブルを表す構造体
///
/// すべての列は同じ長さで、1つの行インデックスを共有する。
#[derive(Debug, Clone)]
pub struct Frame {
    /// 列データ
    pub(crate) columns: Vec<Column>,
    /// 列名→位置のマッピング
    pub(crate) column_indices: HashMap<String, usize>,
    /// 列の順序
    pub(crate) column_names: Vec<String>,
    /// 行数
    pub(crate) row_count: usize,
    /// 行インデックス
    pub(crate) index: FrameIndex,
}

impl Frame {
    /// 空のFrameを作成する
    pub fn new() -> Self {
        Frame {
            columns: Vec::new(),
            column_indices: HashMap::new(),
            column_names: Vec::new(),
            row_count: 0,
            index: FrameIndex::Row(RowIndex::Range { len: 0 }),
        }
    }

    /// 行軸を指定してFrameを作成する
    pub fn with_index(index: RowIndex) -> Self {
        let row_count = index.len();
        Frame {
            columns: Vec::new(),
            column_indices: HashMap::new(),
            column_names: Vec::new(),
            row_count,
            index: FrameIndex::Row(index),
        }
    }

    /// 列を追加する
    pub fn add_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();

        if self.column_indices.contains_key(&name) {
            return Err(Error::DuplicateColumnName(name));
        }

        if self.columns.is_empty() && self.row_count == 0 {
            // 最初の列が行数を決める（軸未指定の場合）
            self.row_count = column.len();
            self.index = FrameIndex::Row(RowIndex::Range {
                len: self.row_count,
            });
        } else if column.len() != self.row_count {
            return Err(Error::InconsistentRowCount {
                expected: self.row_count,
                found: column.len(),
            });
        }

        self.column_indices.insert(name.clone(), self.columns.len());
        self.column_names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// 列名で列を取得する
    pub fn column(&self, name: &str) -> Result<&Column> {
        let idx = self
            .column_indices
            .get(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))?;
        Ok(&self.columns[*idx])
    }

    /// 列が存在するかどうか
    pub fn contains_column(&self, name: &str) -> bool {
        self.column_indices.contains_key(name)
    }

    /// 列名のリストを取得
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// 行数を取得
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// 行インデックスを取得
    pub fn index(&self) -> &FrameIndex {
        &self.index
    }

    /// 行インデックスを差し替える
    pub fn set_index(&mut self, index: FrameIndex) -> Result<()> {
        if index.len() != self.row_count {
            return Err(Error::InconsistentRowCount {
                expected: self.row_count,
                found: index.len(),
            });
        }
        self.index = index;
        Ok(())
    }

    /// 行インデックスのリストに従って行を収集した新しいFrameを作成する
    pub fn take(&self, indices: &[usize]) -> Result<Self> {
        let mut columns = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            columns.push(column.take(indices)?);
        }

        Ok(Frame {
            columns,
            column_indices: self.column_indices.clone(),
            column_names: self.column_names.clone(),
            row_count: indices.len(),
            index: self.index.take(indices)?,
        })
    }

    /// 指定した列を除いた新しいFrameを作成する
    pub fn drop_columns(&self, names: &[&str]) -> Result<Self> {
        for name in names {
            if !self.contains_column(name) {
                return Err(Error::ColumnNotFound(name.to_string()));
            }
        }

        let mut result = Frame {
            columns: Vec::new(),
            column_indices: HashMap::new(),
            column_names: Vec::new(),
            row_count: self.row_count,
            index: self.index.clone(),
        };

        for (i, name) in self.column_names.iter().enumerate() {
            if names.contains(&name.as_str()) {
                continue;
            }
            result
                .column_indices
                .insert(name.clone(), result.columns.len());
            result.column_names.push(name.clone());
            result.columns.push(self.columns[i].clone());
        }

        Ok(result)
    }

    /// 列名と列の組を順序どおりに列挙する
    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.column_names
            .iter()
            .map(|n| n.as_str())
            .zip(self.columns.iter())
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}
