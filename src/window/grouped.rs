//! グループ化されたローリングウィンドウ集計
//!
//! グループ化サービスの上にローリング集計を合成する。ウィンドウの
//! サイズ導出は常にグループ対応の変換を通るため、ウィンドウが
//! グループ境界を越えることはない。結果には (グループキー, 元の軸値)
//! の複合インデックスが付与される。

use crate::column::Column;
use crate::compute::{AggOp, AggParams};
use crate::error::Result;
use crate::frame::{Frame, FrameIndex};
use crate::groupby::Grouping;
use crate::index::MultiIndex;
use crate::window::aggregate::{apply_agg_column, AggKind};
use crate::window::bounds::resolve_bounds;
use crate::window::spec::{normalize, Normalized, Window, WindowSpec};
use crate::window::RollingOptions;

/// グループ化されたローリング集計の設定オブジェクト
///
/// グループキーで安定ソートした行順のデータと、行ごとのグループ開始
/// オフセットを保持する。構築時にウィンドウ指定はグループ境界を
/// 越えないサイズ列へ解決済みで、以後は不変。
pub struct RollingGroupBy {
    /// ソート順のグループキー列（名前, 列）
    keys: Vec<(String, Column)>,

    /// キー列を除きソート順に並べ替えたデータ
    frame: Frame,

    /// 正規化済みのウィンドウ指定
    spec: WindowSpec,

    min_periods: Option<usize>,
    center: bool,

    /// 時間オフセットウィンドウかどうか（countの既定値の扱いが変わる）
    time_window: bool,
}

impl RollingGroupBy {
    pub(crate) fn over(
        grouping: &Grouping,
        window: &Window,
        options: &RollingOptions,
    ) -> Result<Self> {
        crate::window::check_options(options)?;

        let frame = grouping.frame().clone();
        let group_starts = grouping.group_starts();

        let ticks = match frame.index() {
            FrameIndex::Row(index) => index.ticks_nanos(),
            FrameIndex::Multi(_) => None,
        };

        let Normalized {
            spec,
            min_periods,
            time_window,
        } = normalize(
            window,
            options.min_periods,
            ticks.as_deref(),
            Some(group_starts),
            frame.row_count(),
        )?;

        log::debug!(
            "grouped rolling over {} rows in {} groups",
            frame.row_count(),
            grouping.num_groups()
        );

        Ok(RollingGroupBy {
            keys: grouping.keys().to_vec(),
            frame,
            spec,
            min_periods,
            center: options.center,
            time_window,
        })
    }

    /// (グループキー列, 元の軸値) の複合インデックスを組み立てる
    fn grouped_index(&self) -> Result<MultiIndex> {
        let num_rows = self.frame.row_count();

        let mut names: Vec<Option<String>> = self
            .keys
            .iter()
            .map(|(name, _)| Some(name.clone()))
            .collect();
        names.extend(self.frame.index().level_names());

        let mut labels = Vec::with_capacity(num_rows);
        for row in 0..num_rows {
            let mut tuple = Vec::with_capacity(names.len());
            for (_, column) in &self.keys {
                tuple.push(key_label(column, row)?);
            }
            tuple.extend(self.frame.index().labels_at(row)?);
            labels.push(tuple);
        }

        MultiIndex::from_tuples(labels, names)
    }

    fn apply_agg(&self, agg: AggKind<'_>, min_periods: usize) -> Result<Frame> {
        let num_rows = self.frame.row_count();
        let bounds = resolve_bounds(&self.spec, num_rows, self.min_periods, self.center)?;

        let mut result = Frame::new();
        for (name, column) in self.frame.iter_columns() {
            let out = apply_agg_column(column, &bounds, min_periods, self.center, &agg)?;
            result.add_column(name.to_string(), out)?;
        }

        result.set_index(FrameIndex::Multi(self.grouped_index()?))?;
        Ok(result)
    }

    fn min_periods_or(&self, fallback: usize) -> usize {
        self.min_periods.unwrap_or(fallback)
    }

    /// 合計を計算
    pub fn sum(&self) -> Result<Frame> {
        self.apply_agg(
            AggKind::Op(AggOp::Sum, AggParams::default()),
            self.min_periods_or(1),
        )
    }

    /// 最小値を計算
    pub fn min(&self) -> Result<Frame> {
        self.apply_agg(
            AggKind::Op(AggOp::Min, AggParams::default()),
            self.min_periods_or(1),
        )
    }

    /// 最大値を計算
    pub fn max(&self) -> Result<Frame> {
        self.apply_agg(
            AggKind::Op(AggOp::Max, AggParams::default()),
            self.min_periods_or(1),
        )
    }

    /// 平均を計算
    pub fn mean(&self) -> Result<Frame> {
        self.apply_agg(
            AggKind::Op(AggOp::Mean, AggParams::default()),
            self.min_periods_or(1),
        )
    }

    /// 非NULL値の件数を計算
    ///
    /// 時間オフセットウィンドウ以外では`min_periods`は0として扱われる:
    /// 近傍を持たない行も件数0を報告し、NULLにはならない。
    pub fn count(&self) -> Result<Frame> {
        let min_periods = if self.time_window {
            self.min_periods_or(1)
        } else {
            0
        };
        self.apply_agg(AggKind::Op(AggOp::Count, AggParams::default()), min_periods)
    }

    /// 分散を計算（ddof調整済み標本分散）
    pub fn var(&self, ddof: usize) -> Result<Frame> {
        self.apply_agg(
            AggKind::Op(AggOp::Var, AggParams { ddof }),
            self.min_periods_or(1),
        )
    }

    /// 標準偏差を計算
    pub fn std(&self, ddof: usize) -> Result<Frame> {
        self.apply_agg(
            AggKind::Op(AggOp::Std, AggParams { ddof }),
            self.min_periods_or(1),
        )
    }

    /// ユーザー定義関数をウィンドウごとに適用する
    pub fn apply<F>(&self, func: F) -> Result<Frame>
    where
        F: Fn(&[f64]) -> f64 + Sync,
    {
        self.apply_agg(AggKind::Udf(&func), self.min_periods_or(1))
    }
}

/// キー列の1行をインデックスラベルに変換する
fn key_label(column: &Column, row: usize) -> Result<crate::index::IndexLabel> {
    use crate::index::IndexLabel;

    Ok(match column {
        Column::Int64(col) => match col.get(row)? {
            Some(v) => IndexLabel::Int64(v),
            None => IndexLabel::Null,
        },
        Column::String(col) => match col.get(row)? {
            Some(v) => IndexLabel::String(v.to_string()),
            None => IndexLabel::Null,
        },
        Column::Float64(col) => match col.get(row)? {
            Some(v) => IndexLabel::String(v.to_string()),
            None => IndexLabel::Null,
        },
    })
}

impl Grouping {
    /// グループ化されたローリングウィンドウ集計を作成する
    pub fn rolling(&self, window: Window) -> Result<RollingGroupBy> {
        RollingGroupBy::over(self, &window, &RollingOptions::default())
    }

    /// オプション付きでグループ化されたローリングウィンドウ集計を作成する
    pub fn rolling_with(&self, window: Window, options: RollingOptions) -> Result<RollingGroupBy> {
        RollingGroupBy::over(self, &window, &options)
    }
}
