use std::sync::Arc;

use num_traits::cast;

use crate::column::common::{gathered_mask, utils};
use crate::column::Float64Column;
use crate::error::{Error, Result};

/// Int64型の列を表す構造体
#[derive(Debug, Clone)]
pub struct Int64Column {
    pub(crate) data: Arc<[i64]>,
    pub(crate) null_mask: Option<Arc<[u8]>>,
    pub(crate) name: Option<String>,
}

impl Int64Column {
    /// 新しいInt64Columnを作成する
    pub fn new(data: Vec<i64>) -> Self {
        Self {
            data: data.into(),
            null_mask: None,
            name: None,
        }
    }

    /// 名前付きのInt64Columnを作成する
    pub fn with_name(data: Vec<i64>, name: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            null_mask: None,
            name: Some(name.into()),
        }
    }

    /// NULL値を含むInt64Columnを作成する
    pub fn with_nulls(data: Vec<i64>, nulls: Vec<bool>) -> Self {
        let null_mask = gathered_mask(&nulls);

        Self {
            data: data.into(),
            null_mask,
            name: None,
        }
    }

    /// 名前を設定する
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// 名前を取得する
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// 列の長さを返す
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// 列が空かどうかを返す
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 生データへの参照を返す（NULL位置の値は未定義）
    pub fn values(&self) -> &[i64] {
        &self.data
    }

    /// 指定位置が有効値（非NULL）かどうかを返す
    pub(crate) fn is_valid(&self, index: usize) -> bool {
        match &self.null_mask {
            None => true,
            Some(mask) => !utils::is_null(mask, index),
        }
    }

    /// インデックスでデータを取得する
    pub fn get(&self, index: usize) -> Result<Option<i64>> {
        if index >= self.data.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                size: self.data.len(),
            });
        }

        if !self.is_valid(index) {
            return Ok(None);
        }

        Ok(Some(self.data[index]))
    }

    /// NULL値を含むかどうかを返す
    pub fn has_nulls(&self) -> bool {
        self.null_mask.is_some()
    }

    /// NULL値の数を返す
    pub fn null_count(&self) -> usize {
        match &self.null_mask {
            None => 0,
            Some(mask) => utils::count_nulls(mask, self.data.len()),
        }
    }

    /// Float64列へ拡大変換する（集計カーネルはf64上で動作する）
    pub fn to_f64(&self) -> Float64Column {
        let data: Vec<f64> = self
            .data
            .iter()
            .map(|&v| cast::<i64, f64>(v).unwrap_or(f64::NAN))
            .collect();

        Float64Column {
            data: data.into(),
            null_mask: self.null_mask.clone(),
            name: self.name.clone(),
        }
    }

    /// 行インデックスのリストに従って行を収集した新しい列を作成する
    pub fn take(&self, indices: &[usize]) -> Result<Self> {
        let mut data = Vec::with_capacity(indices.len());
        let mut nulls = Vec::with_capacity(indices.len());

        for &idx in indices {
            if idx >= self.data.len() {
                return Err(Error::IndexOutOfBounds {
                    index: idx,
                    size: self.data.len(),
                });
            }
            data.push(self.data[idx]);
            nulls.push(!self.is_valid(idx));
        }

        Ok(Self {
            data: data.into(),
            null_mask: gathered_mask(&nulls),
            name: self.name.clone(),
        })
    }
}
