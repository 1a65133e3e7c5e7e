//! 集計のディスパッチ
//!
//! 解決済みの境界としきい値を1列に適用し、結果列を作る。
//! 組み込み縮約は共有カーネル（`crate::compute`）を1列につき1回
//! 呼び出す。ユーザー定義関数はNULLを含まない列に限って適用できる。

use crate::column::Column;
use crate::compute::{rolling_apply, rolling_reduce, AggOp, AggParams, Bounds};
use crate::error::{Error, Result};

/// 適用する集計の種別
pub(crate) enum AggKind<'f> {
    /// 組み込みの縮約操作
    Op(AggOp, AggParams),
    /// ウィンドウごとのユーザー定義関数
    Udf(&'f (dyn Fn(&[f64]) -> f64 + Sync)),
}

/// 1列にローリング集計を適用する
///
/// 整数列はf64へ拡大してから縮約する。文字列列は集計できない。
/// 結果列は入力列の名前を引き継ぐ。
pub(crate) fn apply_agg_column(
    column: &Column,
    bounds: &Bounds,
    min_periods: usize,
    center: bool,
    agg: &AggKind<'_>,
) -> Result<Column> {
    let values = match column {
        Column::Float64(col) => col.clone(),
        Column::Int64(col) => col.to_f64(),
        Column::String(col) => {
            return Err(Error::NotSupported(format!(
                "文字列列 ({}) のローリング集計",
                col.name().unwrap_or("無名")
            )));
        }
    };

    let mut result = match agg {
        AggKind::Op(op, params) => {
            rolling_reduce(&values, bounds, min_periods, center, *op, *params)?
        }
        AggKind::Udf(func) => {
            if values.has_nulls() {
                return Err(Error::NotSupported(
                    "NULL値を含む列へのユーザー定義関数の適用".to_string(),
                ));
            }
            rolling_apply(&values, bounds, min_periods, center, func)?
        }
    };

    if let Some(name) = column.name() {
        result.set_name(name.to_string());
    }

    Ok(result)
}
