use std::sync::Arc;

use crate::column::common::{gathered_mask, utils};
use crate::error::{Error, Result};

/// Float64型の列を表す構造体
#[derive(Debug, Clone)]
pub struct Float64Column {
    pub(crate) data: Arc<[f64]>,
    pub(crate) null_mask: Option<Arc<[u8]>>,
    pub(crate) name: Option<String>,
}

impl Float64Column {
    /// 新しいFloat64Columnを作成する
    pub fn new(data: Vec<f64>) -> Self {
        Self {
            data: data.into(),
            null_mask: None,
            name: None,
        }
    }

    /// 名前付きのFloat64Columnを作成する
    pub fn with_name(data: Vec<f64>, name: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            null_mask: None,
            name: Some(name.into()),
        }
    }

    /// NULL値を含むFloat64Columnを作成する
    pub fn with_nulls(data: Vec<f64>, nulls: Vec<bool>) -> Self {
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
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// 指定位置が有効値（非NULL）かどうかを返す
    ///
    /// 範囲チェックは行わない。集計カーネルの内側ループ用。
    pub(crate) fn is_valid(&self, index: usize) -> bool {
        match &self.null_mask {
            None => true,
            Some(mask) => !utils::is_null(mask, index),
        }
    }

    /// インデックスでデータを取得する
    pub fn get(&self, index: usize) -> Result<Option<f64>> {
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
