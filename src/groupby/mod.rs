//! グループ化サービス
//!
//! グループキー列に対する安定ソートの置換、グループごとの行数、
//! および行ごとのグループ開始オフセットを提供する。グループ化された
//! ローリング集計はこの情報の上に構築される。

use std::cmp::Ordering;

use crate::column::Column;
use crate::error::{Error, Result};
use crate::frame::Frame;

/// グループキーの1要素
///
/// キー列は行ごとに同じ型を持つ。NULLは最後に並ぶ。
#[derive(Debug, Clone, PartialEq, Eq)]
enum GroupKeyValue {
    Int64(i64),
    String(String),
    Null,
}

impl GroupKeyValue {
    fn rank(&self) -> u8 {
        match self {
            GroupKeyValue::Int64(_) => 0,
            GroupKeyValue::String(_) => 1,
            GroupKeyValue::Null => 2,
        }
    }
}

impl Ord for GroupKeyValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupKeyValue::Int64(a), GroupKeyValue::Int64(b)) => a.cmp(b),
            (GroupKeyValue::String(a), GroupKeyValue::String(b)) => a.cmp(b),
            // 型が異なる場合は型の序列で比較（実際には列内で型は揃っている）
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for GroupKeyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// グループ化結果を表す構造体
///
/// 行はキーの昇順（安定ソート）に並べ替えられ、各グループは連続した
/// 範囲を占める。`group_starts[i]` は行iの属するグループの開始位置。
#[derive(Debug, Clone)]
pub struct Grouping {
    /// ソート順に収集したグループキー列（名前, 列）
    pub(crate) keys: Vec<(String, Column)>,

    /// キー列を除き、ソート順に並べ替えたデータ
    pub(crate) frame: Frame,

    /// ソート順でのグループごとの行数
    pub(crate) group_sizes: Vec<usize>,

    /// 行ごとのグループ開始オフセット
    pub(crate) group_starts: Vec<usize>,
}

impl Grouping {
    /// グループ数を取得
    pub fn num_groups(&self) -> usize {
        self.group_sizes.len()
    }

    /// グループごとの行数を取得
    pub fn group_sizes(&self) -> &[usize] {
        &self.group_sizes
    }

    /// 行ごとのグループ開始オフセットを取得
    pub fn group_starts(&self) -> &[usize] {
        &self.group_starts
    }

    /// キー列を除きソート済みのデータを取得
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// ソート順のグループキー列を取得
    pub fn keys(&self) -> &[(String, Column)] {
        &self.keys
    }
}

/// 1列からグループキー値を抽出する
fn key_value(column: &Column, row: usize) -> Result<GroupKeyValue> {
    match column {
        Column::Int64(col) => Ok(match col.get(row)? {
            Some(v) => GroupKeyValue::Int64(v),
            None => GroupKeyValue::Null,
        }),
        Column::String(col) => Ok(match col.get(row)? {
            Some(v) => GroupKeyValue::String(v.to_string()),
            None => GroupKeyValue::Null,
        }),
        Column::Float64(_) => Err(Error::NotSupported(
            "浮動小数点列でのグループ化".to_string(),
        )),
    }
}

impl Frame {
    /// 指定した列でグループ化する
    ///
    /// # Arguments
    /// * `keys` - グループ化するための列名
    ///
    /// # Returns
    /// * `Result<Grouping>` - グループ化結果
    pub fn group_by<I, S>(&self, keys: I) -> Result<Grouping>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let key_names: Vec<String> = keys.into_iter().map(|s| s.as_ref().to_string()).collect();

        if key_names.is_empty() {
            return Err(Error::InvalidArgument(
                "グループ化には少なくとも1つのキー列が必要です".to_string(),
            ));
        }

        // 各列の存在確認
        for name in &key_names {
            if !self.contains_column(name) {
                return Err(Error::ColumnNotFound(name.clone()));
            }
        }

        let n = self.row_count();

        // 行ごとのキータプルを作成
        let mut row_keys: Vec<Vec<GroupKeyValue>> = Vec::with_capacity(n);
        for row in 0..n {
            let mut key = Vec::with_capacity(key_names.len());
            for name in &key_names {
                key.push(key_value(self.column(name)?, row)?);
            }
            row_keys.push(key);
        }

        // キーの昇順への安定ソート置換
        let mut perm: Vec<usize> = (0..n).collect();
        perm.sort_by(|&a, &b| row_keys[a].cmp(&row_keys[b]));

        // グループ境界の検出
        let mut group_sizes = Vec::new();
        let mut group_starts = vec![0usize; n];
        let mut start = 0usize;
        for i in 0..n {
            if i > 0 && row_keys[perm[i]] != row_keys[perm[i - 1]] {
                group_sizes.push(i - start);
                start = i;
            }
            group_starts[i] = start;
        }
        if n > 0 {
            group_sizes.push(n - start);
        }

        log::debug!(
            "grouped {} rows into {} groups by {:?}",
            n,
            group_sizes.len(),
            key_names
        );

        // キー列をソート順に収集
        let mut sorted_key_columns = Vec::with_capacity(key_names.len());
        for name in &key_names {
            sorted_key_columns.push((name.clone(), self.column(name)?.take(&perm)?));
        }

        // データはキー列を除きソート順に並べ替える
        let key_name_refs: Vec<&str> = key_names.iter().map(|s| s.as_str()).collect();
        let frame = self.drop_columns(&key_name_refs)?.take(&perm)?;

        Ok(Grouping {
            keys: sorted_key_columns,
            frame,
            group_sizes,
            group_starts,
        })
    }
}
