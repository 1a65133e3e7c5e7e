//! 単一列のデータ系列を表すモジュール

use crate::column::{Column, Float64Column};
use crate::error::{Error, Result};
use crate::index::RowIndex;

/// 名前付きの単一列と行軸の組を表す構造体
///
/// ローリング集計の最小の適用対象。
#[derive(Debug, Clone)]
pub struct Series {
    /// 系列の名前
    name: Option<String>,

    /// 値の列
    column: Column,

    /// 行の軸
    index: RowIndex,
}

impl Series {
    /// 浮動小数点値から新しいSeriesを作成する（位置番号インデックス）
    pub fn new(values: Vec<f64>, name: Option<String>) -> Self {
        let len = values.len();
        let mut column = Float64Column::new(values);
        if let Some(ref n) = name {
            column.set_name(n.clone());
        }

        Series {
            name,
            column: Column::Float64(column),
            index: RowIndex::Range { len },
        }
    }

    /// NULL値を含むSeriesを作成する
    pub fn with_nulls(values: Vec<f64>, nulls: Vec<bool>, name: Option<String>) -> Result<Self> {
        if values.len() != nulls.len() {
            return Err(Error::LengthMismatch {
                expected: values.len(),
                actual: nulls.len(),
            });
        }

        let len = values.len();
        let mut column = Float64Column::with_nulls(values, nulls);
        if let Some(ref n) = name {
            column.set_name(n.clone());
        }

        Ok(Series {
            name,
            column: Column::Float64(column),
            index: RowIndex::Range { len },
        })
    }

    /// 列と軸から新しいSeriesを作成する
    pub fn from_column(column: Column, index: RowIndex, name: Option<String>) -> Result<Self> {
        if column.len() != index.len() {
            return Err(Error::Consistency(format!(
                "値の長さ ({}) と軸の長さ ({}) が一致しません",
                column.len(),
                index.len()
            )));
        }

        Ok(Series {
            name,
            column,
            index,
        })
    }

    /// 行の軸を差し替える
    pub fn with_index(mut self, index: RowIndex) -> Result<Self> {
        if self.column.len() != index.len() {
            return Err(Error::Consistency(format!(
                "値の長さ ({}) と軸の長さ ({}) が一致しません",
                self.column.len(),
                index.len()
            )));
        }

        self.index = index;
        Ok(self)
    }

    /// 長さを取得
    pub fn len(&self) -> usize {
        self.column.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.column.is_empty()
    }

    /// 名前を取得
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// 値の列を取得
    pub fn column(&self) -> &Column {
        &self.column
    }

    /// 行の軸を取得
    pub fn index(&self) -> &RowIndex {
        &self.index
    }

    /// 指定位置の値をf64として取得する（整数列は拡大変換）
    pub fn get_f64(&self, index: usize) -> Result<Option<f64>> {
        match &self.column {
            Column::Float64(col) => col.get(index),
            Column::Int64(col) => Ok(col.get(index)?.map(|v| v as f64)),
            Column::String(_) => Err(Error::NotSupported(
                "文字列列の数値アクセス".to_string(),
            )),
        }
    }
}
