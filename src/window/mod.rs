//! ローリングウィンドウ集計エンジン
//!
//! ウィンドウ引数（固定幅・時間オフセット・行ごとのサイズ列・外部
//! ジェネレーター）を正規化し、行ごとの境界に解決して、対象列へ
//! NULL対応の縮約を適用する。グループ化された適用は
//! [`RollingGroupBy`] を参照。

mod aggregate;
mod bounds;
mod grouped;
mod sizes;
mod spec;

pub use bounds::{Closed, WindowBounds};
pub use grouped::RollingGroupBy;
pub use sizes::{grouped_window_sizes_from_offset, window_sizes_from_offset};
pub use spec::Window;

use std::fmt;

use crate::column::Column;
use crate::compute::{AggOp, AggParams};
use crate::error::{Error, Result};
use crate::frame::{Frame, FrameIndex};
use crate::series::Series;

use aggregate::{apply_agg_column, AggKind};
use bounds::resolve_bounds;
use spec::{normalize, Normalized, WindowSpec};

/// ローリング集計の追加オプション
#[derive(Debug, Clone)]
pub struct RollingOptions {
    /// 非NULL結果に必要なウィンドウ内の非NULL値の最小数
    pub min_periods: Option<usize>,
    /// 結果をウィンドウの右端ではなく中央に置くかどうか
    pub center: bool,
    /// 集計する軸（0のみ対応）
    pub axis: usize,
    /// ウィンドウの形状（既定の"boxcar"のみ対応）
    pub win_type: Option<String>,
}

impl Default for RollingOptions {
    fn default() -> Self {
        RollingOptions {
            min_periods: None,
            center: false,
            axis: 0,
            win_type: None,
        }
    }
}

/// ローリング集計の適用対象
///
/// SeriesとFrameが実装する。集計は対象の列ごとに独立に行われ、
/// 同じ形の出力が組み立てられる。
pub trait RollingTarget {
    /// 集計結果の型
    type Output;

    /// 行数
    fn num_rows(&self) -> usize;

    /// 日時軸のナノ秒目盛り（日時インデックスでない場合はNone）
    fn datetime_ticks(&self) -> Option<Vec<i64>>;

    /// 集計対象の列を順序どおりに列挙する
    fn agg_columns(&self) -> Vec<&Column>;

    /// 集計結果の列から出力を組み立てる
    fn assemble(&self, columns: Vec<Column>) -> Result<Self::Output>;
}

impl RollingTarget for Series {
    type Output = Series;

    fn num_rows(&self) -> usize {
        self.len()
    }

    fn datetime_ticks(&self) -> Option<Vec<i64>> {
        self.index().ticks_nanos()
    }

    fn agg_columns(&self) -> Vec<&Column> {
        vec![self.column()]
    }

    fn assemble(&self, mut columns: Vec<Column>) -> Result<Series> {
        let column = columns.pop().ok_or_else(|| {
            Error::Consistency("集計結果の列がありません".to_string())
        })?;
        Series::from_column(
            column,
            self.index().clone(),
            self.name().map(|s| s.to_string()),
        )
    }
}

impl RollingTarget for Frame {
    type Output = Frame;

    fn num_rows(&self) -> usize {
        self.row_count()
    }

    fn datetime_ticks(&self) -> Option<Vec<i64>> {
        match self.index() {
            FrameIndex::Row(index) => index.ticks_nanos(),
            FrameIndex::Multi(_) => None,
        }
    }

    fn agg_columns(&self) -> Vec<&Column> {
        self.iter_columns().map(|(_, col)| col).collect()
    }

    fn assemble(&self, columns: Vec<Column>) -> Result<Frame> {
        let mut result = Frame::new();
        for (name, column) in self.column_names().iter().zip(columns) {
            result.add_column(name.clone(), column)?;
        }
        result.set_index(self.index().clone())?;
        Ok(result)
    }
}

/// ローリングウィンドウ集計の設定オブジェクト
///
/// 構築時にウィンドウ引数と`min_periods`が正規化・検証され、以後は
/// 不変。同じ設定で複数の集計を呼び出しても正規化は再計算されない。
pub struct Rolling<'a, S: RollingTarget> {
    source: &'a S,
    spec: WindowSpec,
    min_periods: Option<usize>,
    center: bool,
}

impl<'a, S: RollingTarget> fmt::Debug for Rolling<'a, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rolling [window={:?}, min_periods={:?}, center={}]",
            self.spec, self.min_periods, self.center
        )
    }
}

/// オプションの対応範囲を検証する
pub(crate) fn check_options(options: &RollingOptions) -> Result<()> {
    if options.axis != 0 {
        return Err(Error::NotSupported(format!(
            "軸 {} に沿ったローリング集計（対応は軸0のみ）",
            options.axis
        )));
    }

    if let Some(win_type) = &options.win_type {
        if win_type != "boxcar" {
            return Err(Error::NotSupported(format!(
                "ウィンドウ形状 '{}'（対応は既定の'boxcar'のみ）",
                win_type
            )));
        }
    }

    Ok(())
}

impl<'a, S: RollingTarget> Rolling<'a, S> {
    pub(crate) fn over(source: &'a S, window: &Window, options: &RollingOptions) -> Result<Self> {
        check_options(options)?;

        let ticks = source.datetime_ticks();
        let Normalized {
            spec, min_periods, ..
        } = normalize(
            window,
            options.min_periods,
            ticks.as_deref(),
            None,
            source.num_rows(),
        )?;

        Ok(Rolling {
            source,
            spec,
            min_periods,
            center: options.center,
        })
    }

    fn apply_agg(&self, agg: AggKind<'_>) -> Result<S::Output> {
        let num_rows = self.source.num_rows();
        let bounds = resolve_bounds(&self.spec, num_rows, self.min_periods, self.center)?;
        let min_periods = self.min_periods.unwrap_or(1);

        let mut columns = Vec::new();
        for column in self.source.agg_columns() {
            columns.push(apply_agg_column(
                column,
                &bounds,
                min_periods,
                self.center,
                &agg,
            )?);
        }

        self.source.assemble(columns)
    }

    /// 合計を計算
    pub fn sum(&self) -> Result<S::Output> {
        self.apply_agg(AggKind::Op(AggOp::Sum, AggParams::default()))
    }

    /// 最小値を計算
    pub fn min(&self) -> Result<S::Output> {
        self.apply_agg(AggKind::Op(AggOp::Min, AggParams::default()))
    }

    /// 最大値を計算
    pub fn max(&self) -> Result<S::Output> {
        self.apply_agg(AggKind::Op(AggOp::Max, AggParams::default()))
    }

    /// 平均を計算
    pub fn mean(&self) -> Result<S::Output> {
        self.apply_agg(AggKind::Op(AggOp::Mean, AggParams::default()))
    }

    /// 非NULL値の件数を計算
    pub fn count(&self) -> Result<S::Output> {
        self.apply_agg(AggKind::Op(AggOp::Count, AggParams::default()))
    }

    /// 分散を計算（ddof調整済み標本分散）
    pub fn var(&self, ddof: usize) -> Result<S::Output> {
        self.apply_agg(AggKind::Op(AggOp::Var, AggParams { ddof }))
    }

    /// 標準偏差を計算
    pub fn std(&self, ddof: usize) -> Result<S::Output> {
        self.apply_agg(AggKind::Op(AggOp::Std, AggParams { ddof }))
    }

    /// ユーザー定義関数をウィンドウごとに適用する
    ///
    /// 関数はウィンドウ内の値のスライスを受け取りスカラーを返す。
    /// NULL値を含む列には適用できない。
    pub fn apply<F>(&self, func: F) -> Result<S::Output>
    where
        F: Fn(&[f64]) -> f64 + Sync,
    {
        self.apply_agg(AggKind::Udf(&func))
    }
}

impl Series {
    /// ローリングウィンドウ集計を作成する
    pub fn rolling(&self, window: Window) -> Result<Rolling<'_, Series>> {
        Rolling::over(self, &window, &RollingOptions::default())
    }

    /// オプション付きでローリングウィンドウ集計を作成する
    pub fn rolling_with(
        &self,
        window: Window,
        options: RollingOptions,
    ) -> Result<Rolling<'_, Series>> {
        Rolling::over(self, &window, &options)
    }
}

impl Frame {
    /// ローリングウィンドウ集計を作成する
    pub fn rolling(&self, window: Window) -> Result<Rolling<'_, Frame>> {
        Rolling::over(self, &window, &RollingOptions::default())
    }

    /// オプション付きでローリングウィンドウ集計を作成する
    pub fn rolling_with(
        &self,
        window: Window,
        options: RollingOptions,
    ) -> Result<Rolling<'_, Frame>> {
        Rolling::over(self, &window, &options)
    }
}
