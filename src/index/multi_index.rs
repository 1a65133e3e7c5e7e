use crate::error::{Error, Result};
use crate::index::IndexLabel;

/// MultiIndex構造体
///
/// 複数レベルの階層化されたインデックスを表現する。グループ化された
/// ローリング集計の結果に (グループキー, 元の軸値) の複合ラベルを
/// 付与するために使用する。同じタプルが複数回現れてもよい。
#[derive(Debug, Clone)]
pub struct MultiIndex {
    /// 各レベルの名前
    names: Vec<Option<String>>,

    /// 行ごとのラベルタプル
    labels: Vec<Vec<IndexLabel>>,
}

impl MultiIndex {
    /// 行ごとのラベルタプルからMultiIndexを作成する
    ///
    /// すべてのタプルはレベル数と同じ長さでなければならない。
    pub fn from_tuples(labels: Vec<Vec<IndexLabel>>, names: Vec<Option<String>>) -> Result<Self> {
        if names.is_empty() {
            return Err(Error::Consistency(
                "少なくとも1つのレベルが必要です".to_string(),
            ));
        }

        for (i, tuple) in labels.iter().enumerate() {
            if tuple.len() != names.len() {
                return Err(Error::Consistency(format!(
                    "タプル{}の長さ ({}) がレベル数 ({}) と一致しません",
                    i,
                    tuple.len(),
                    names.len()
                )));
            }
        }

        Ok(MultiIndex { names, labels })
    }

    /// 行数を取得
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// レベル数を取得
    pub fn n_levels(&self) -> usize {
        self.names.len()
    }

    /// 各レベルの名前を取得
    pub fn names(&self) -> &[Option<String>] {
        &self.names
    }

    /// 指定行のラベルタプルを取得する
    pub fn get(&self, index: usize) -> Result<&[IndexLabel]> {
        if index >= self.labels.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                size: self.labels.len(),
            });
        }

        Ok(&self.labels[index])
    }

    /// 行インデックスのリストに従ってラベルを収集した新しいMultiIndexを作成する
    pub fn take(&self, indices: &[usize]) -> Result<Self> {
        let mut labels = Vec::with_capacity(indices.len());
        for &idx in indices {
            if idx >= self.labels.len() {
                return Err(Error::IndexOutOfBounds {
                    index: idx,
                    size: self.labels.len(),
                });
            }
            labels.push(self.labels[idx].clone());
        }

        Ok(MultiIndex {
            names: self.names.clone(),
            labels,
        })
    }
}
