//! ローリング縮約の計算カーネル
//!
//! 解決済みのウィンドウ境界と`min_periods`しきい値を受け取り、
//! 行ごとのウィンドウ縮約をNULL対応で実行する。各出力行は自分の
//! ウィンドウ範囲にのみ依存するため、行方向に並列化される。

use std::fmt;

use rayon::prelude::*;

use crate::column::{Column, Float64Column, Int64Column};
use crate::error::{Error, Result};

/// 直列処理と並列処理を切り替える行数のしきい値
const PARALLEL_ROW_THRESHOLD: usize = 10_000;

/// 組み込みの縮約操作を表す列挙型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggOp {
    /// 合計
    Sum,
    /// 最小値
    Min,
    /// 最大値
    Max,
    /// 平均
    Mean,
    /// 非NULL値の件数
    Count,
    /// 分散（ddof調整済み標本分散）
    Var,
    /// 標準偏差
    Std,
}

impl fmt::Display for AggOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggOp::Sum => write!(f, "sum"),
            AggOp::Min => write!(f, "min"),
            AggOp::Max => write!(f, "max"),
            AggOp::Mean => write!(f, "mean"),
            AggOp::Count => write!(f, "count"),
            AggOp::Var => write!(f, "var"),
            AggOp::Std => write!(f, "std"),
        }
    }
}

/// 縮約操作の追加パラメータ
#[derive(Debug, Clone, Copy)]
pub struct AggParams {
    /// 分散・標準偏差の自由度調整
    pub ddof: usize,
}

impl Default for AggParams {
    fn default() -> Self {
        AggParams { ddof: 1 }
    }
}

/// カーネルに渡すウィンドウ境界
///
/// `Scalar` は固定幅（中央寄せの分割はカーネル側で導出する）。
/// `PerRow` は行ごとの境界で、`preceding[i]` は現在行を含む先行行数、
/// `following[i]` は後続行数。ウィンドウは
/// `[i - preceding[i] + 1, i + following[i] + 1)` を `[0, N)` に
/// クリップした範囲になる。
#[derive(Debug, Clone)]
pub enum Bounds {
    /// 固定幅ウィンドウ
    Scalar(usize),
    /// 行ごとの境界列
    PerRow {
        preceding: Vec<i64>,
        following: Vec<i64>,
    },
}

/// 行iのウィンドウ範囲（クリップ済み半開区間）を導出する
///
/// 中央寄せの固定幅では偶数幅の余り1行を後続側に割り当てる。
fn window_span(bounds: &Bounds, i: usize, n: usize, center: bool) -> (usize, usize) {
    let (preceding, following) = match bounds {
        Bounds::Scalar(size) => {
            if center {
                ((size - size / 2) as i64, (size / 2) as i64)
            } else {
                (*size as i64, 0)
            }
        }
        Bounds::PerRow {
            preceding,
            following,
        } => (preceding[i], following[i]),
    };

    let start = (i as i64 + 1 - preceding).clamp(0, n as i64) as usize;
    let end = (i as i64 + 1 + following).clamp(0, n as i64) as usize;

    if end < start {
        (start, start)
    } else {
        (start, end)
    }
}

/// 1ウィンドウの縮約を実行する
///
/// 戻り値は (有効値の数, 縮約値)。縮約値がNoneのときは値が定義
/// できない（空ウィンドウのmin/max、自由度不足のvarなど）。
fn reduce_span(
    col: &Float64Column,
    start: usize,
    end: usize,
    op: AggOp,
    params: AggParams,
) -> (usize, Option<f64>) {
    let values = col.values();

    match op {
        AggOp::Sum => {
            let mut count = 0usize;
            let mut sum = 0.0;
            for j in start..end {
                if col.is_valid(j) {
                    count += 1;
                    sum += values[j];
                }
            }
            (count, Some(sum))
        }
        AggOp::Min => {
            let mut count = 0usize;
            let mut min = None;
            for j in start..end {
                if col.is_valid(j) {
                    count += 1;
                    let v = values[j];
                    min = Some(min.map_or(v, |m: f64| m.min(v)));
                }
            }
            (count, min)
        }
        AggOp::Max => {
            let mut count = 0usize;
            let mut max = None;
            for j in start..end {
                if col.is_valid(j) {
                    count += 1;
                    let v = values[j];
                    max = Some(max.map_or(v, |m: f64| m.max(v)));
                }
            }
            (count, max)
        }
        AggOp::Mean => {
            let mut count = 0usize;
            let mut sum = 0.0;
            for j in start..end {
                if col.is_valid(j) {
                    count += 1;
                    sum += values[j];
                }
            }
            if count == 0 {
                (0, None)
            } else {
                (count, Some(sum / count as f64))
            }
        }
        AggOp::Count => {
            let mut count = 0usize;
            for j in start..end {
                if col.is_valid(j) {
                    count += 1;
                }
            }
            (count, Some(count as f64))
        }
        AggOp::Var | AggOp::Std => {
            let mut count = 0usize;
            let mut sum = 0.0;
            for j in start..end {
                if col.is_valid(j) {
                    count += 1;
                    sum += values[j];
                }
            }
            if count <= params.ddof {
                return (count, None);
            }

            // 平均を先に求める2パス方式（数値誤差を抑える）
            let mean = sum / count as f64;
            let mut ssd = 0.0;
            for j in start..end {
                if col.is_valid(j) {
                    let d = values[j] - mean;
                    ssd += d * d;
                }
            }
            let var = ssd / (count - params.ddof) as f64;

            match op {
                AggOp::Var => (count, Some(var)),
                _ => (count, Some(var.sqrt())),
            }
        }
    }
}

/// 境界列の長さを検証する
fn check_bounds_len(bounds: &Bounds, n: usize) -> Result<()> {
    if let Bounds::PerRow {
        preceding,
        following,
    } = bounds
    {
        if preceding.len() != n {
            return Err(Error::LengthMismatch {
                expected: n,
                actual: preceding.len(),
            });
        }
        if following.len() != n {
            return Err(Error::LengthMismatch {
                expected: n,
                actual: following.len(),
            });
        }
    }
    Ok(())
}

/// 組み込み縮約をローリング適用する
///
/// NULL値は縮約からも有効値カウントからも除外される。有効値の数が
/// `min_periods` に満たない行の結果はNULLになる。`count` の結果は
/// Int64列、それ以外はFloat64列。
pub fn rolling_reduce(
    col: &Float64Column,
    bounds: &Bounds,
    min_periods: usize,
    center: bool,
    op: AggOp,
    params: AggParams,
) -> Result<Column> {
    let n = col.len();
    check_bounds_len(bounds, n)?;

    if op == AggOp::Count {
        let eval = |i: usize| -> (i64, bool) {
            let (start, end) = window_span(bounds, i, n, center);
            let (count, _) = reduce_span(col, start, end, AggOp::Count, params);
            (count as i64, count < min_periods)
        };

        let rows: Vec<(i64, bool)> = if n >= PARALLEL_ROW_THRESHOLD {
            (0..n).into_par_iter().map(eval).collect()
        } else {
            (0..n).map(eval).collect()
        };

        let (data, nulls): (Vec<i64>, Vec<bool>) = rows.into_iter().unzip();
        return Ok(Column::Int64(Int64Column::with_nulls(data, nulls)));
    }

    let eval = |i: usize| -> (f64, bool) {
        let (start, end) = window_span(bounds, i, n, center);
        let (count, value) = reduce_span(col, start, end, op, params);
        match value {
            Some(v) if count >= min_periods => (v, false),
            _ => (f64::NAN, true),
        }
    };

    let rows: Vec<(f64, bool)> = if n >= PARALLEL_ROW_THRESHOLD {
        (0..n).into_par_iter().map(eval).collect()
    } else {
        (0..n).map(eval).collect()
    };

    let (data, nulls): (Vec<f64>, Vec<bool>) = rows.into_iter().unzip();
    Ok(Column::Float64(Float64Column::with_nulls(data, nulls)))
}

/// ユーザー定義関数をローリング適用する
///
/// 入力列はNULLを含まないことが前提（呼び出し側で検証済み）。関数は
/// 各行のウィンドウ内の値のスライスを受け取り、スカラーを返す。
/// ウィンドウ内の値の数が `min_periods` に満たない行はNULLになる。
pub fn rolling_apply<F>(
    col: &Float64Column,
    bounds: &Bounds,
    min_periods: usize,
    center: bool,
    func: F,
) -> Result<Column>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    let n = col.len();
    check_bounds_len(bounds, n)?;

    let values = col.values();
    let eval = |i: usize| -> (f64, bool) {
        let (start, end) = window_span(bounds, i, n, center);
        if end - start < min_periods {
            (f64::NAN, true)
        } else {
            (func(&values[start..end]), false)
        }
    };

    let rows: Vec<(f64, bool)> = if n >= PARALLEL_ROW_THRESHOLD {
        (0..n).into_par_iter().map(eval).collect()
    } else {
        (0..n).map(eval).collect()
    };

    let (data, nulls): (Vec<f64>, Vec<bool>) = rows.into_iter().unzip();
    Ok(Column::Float64(Float64Column::with_nulls(data, nulls)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f64_result(col: Column) -> Vec<Option<f64>> {
        match col {
            Column::Float64(c) => (0..c.len()).map(|i| c.get(i).unwrap()).collect(),
            _ => panic!("Float64列が期待されます"),
        }
    }

    #[test]
    fn test_scalar_window_sum() {
        let col = Float64Column::new(vec![1.0, 2.0, 3.0, 4.0]);
        let out = rolling_reduce(
            &col,
            &Bounds::Scalar(2),
            1,
            false,
            AggOp::Sum,
            AggParams::default(),
        )
        .unwrap();
        assert_eq!(
            f64_result(out),
            vec![Some(1.0), Some(3.0), Some(5.0), Some(7.0)]
        );
    }

    #[test]
    fn test_min_periods_masks_output() {
        let col = Float64Column::new(vec![1.0, 2.0, 3.0]);
        let out = rolling_reduce(
            &col,
            &Bounds::Scalar(2),
            2,
            false,
            AggOp::Sum,
            AggParams::default(),
        )
        .unwrap();
        assert_eq!(f64_result(out), vec![None, Some(3.0), Some(5.0)]);
    }

    #[test]
    fn test_centered_even_window_leans_forward() {
        // 幅4の中央寄せ: 行iのウィンドウは [i-1, i+3)、余りは後続側
        let col = Float64Column::new(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        let out = rolling_reduce(
            &col,
            &Bounds::Scalar(4),
            1,
            true,
            AggOp::Sum,
            AggParams::default(),
        )
        .unwrap();
        assert_eq!(
            f64_result(out),
            vec![
                Some(0.0 + 1.0 + 2.0),
                Some(0.0 + 1.0 + 2.0 + 3.0),
                Some(1.0 + 2.0 + 3.0 + 4.0),
                Some(2.0 + 3.0 + 4.0 + 5.0),
                Some(3.0 + 4.0 + 5.0),
                Some(4.0 + 5.0)
            ]
        );
    }

    #[test]
    fn test_per_row_empty_window() {
        // サイズ0のウィンドウは空: 結果はNULL（min_periods=0でもsumは0）
        let col = Float64Column::new(vec![1.0, 2.0]);
        let bounds = Bounds::PerRow {
            preceding: vec![0, 1],
            following: vec![0, 0],
        };
        let out = rolling_reduce(&col, &bounds, 0, false, AggOp::Sum, AggParams::default())
            .unwrap();
        assert_eq!(f64_result(out), vec![Some(0.0), Some(2.0)]);

        let bounds = Bounds::PerRow {
            preceding: vec![0, 1],
            following: vec![0, 0],
        };
        let out = rolling_reduce(&col, &bounds, 0, false, AggOp::Max, AggParams::default())
            .unwrap();
        assert_eq!(f64_result(out), vec![None, Some(2.0)]);
    }

    #[test]
    fn test_var_needs_freedom() {
        let col = Float64Column::new(vec![1.0, 2.0, 3.0]);
        let out = rolling_reduce(
            &col,
            &Bounds::Scalar(2),
            1,
            false,
            AggOp::Var,
            AggParams::default(),
        )
        .unwrap();
        let result = f64_result(out);
        // 先頭行は有効値1つ: ddof=1では自由度不足
        assert_eq!(result[0], None);
        assert!((result[1].unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_count_returns_int64() {
        let col = Float64Column::with_nulls(vec![1.0, 0.0, 3.0], vec![false, true, false]);
        let out = rolling_reduce(
            &col,
            &Bounds::Scalar(2),
            0,
            false,
            AggOp::Count,
            AggParams::default(),
        )
        .unwrap();
        match out {
            Column::Int64(c) => {
                assert_eq!(c.get(0).unwrap(), Some(1));
                assert_eq!(c.get(1).unwrap(), Some(1));
                assert_eq!(c.get(2).unwrap(), Some(1));
            }
            _ => panic!("Int64列が期待されます"),
        }
    }
}
