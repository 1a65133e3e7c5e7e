//! ウィンドウ境界の解決
//!
//! 正規化済みのウィンドウ指定を、縮約カーネルに渡す境界表現へ変換する。

use crate::compute::Bounds;
use crate::error::{Error, Result};
use crate::window::spec::WindowSpec;

/// ウィンドウ境界の端点の扱い
///
/// 外部ジェネレーターへの引き渡し用に予約されている。このエンジン
/// 自身は常に`None`を渡す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closed {
    Left,
    Right,
    Both,
    Neither,
}

/// 外部のウィンドウ境界ジェネレーターの契約
///
/// 戻り値は行ごとの開始・終了インデックス（半開区間 `[start, end)`）で、
/// どちらも長さ`num_values`、かつ `0 <= start[i] <= end[i] <= num_values`
/// を満たさなければならない。違反は`InvalidBoundary`として呼び出し側で
/// 検出される（ジェネレーターは信頼されない外部コード）。
pub trait WindowBounds: Send + Sync {
    /// ウィンドウ境界を生成する
    fn window_bounds(
        &self,
        num_values: usize,
        min_periods: Option<usize>,
        center: bool,
        closed: Option<Closed>,
    ) -> (Vec<usize>, Vec<usize>);
}

/// ウィンドウ指定を行ごとの境界に解決する
///
/// * `Fixed` はそのまま固定幅として通す（中央寄せの分割はカーネルが導出する）。
/// * `Sizes` は右端揃え: `preceding[i] = sizes[i]`（現在行を含む）、後続は0。
/// * `Bounds` はジェネレーターを呼び出し、事後条件を検証したうえで
///   `preceding[i] = i - start[i] + 1`, `following[i] = end[i] - i - 1` に変換する。
pub(crate) fn resolve_bounds(
    spec: &WindowSpec,
    num_values: usize,
    min_periods: Option<usize>,
    center: bool,
) -> Result<Bounds> {
    match spec {
        WindowSpec::Fixed(size) => Ok(Bounds::Scalar(*size)),

        WindowSpec::Sizes(sizes) => {
            if sizes.len() != num_values {
                return Err(Error::LengthMismatch {
                    expected: num_values,
                    actual: sizes.len(),
                });
            }

            Ok(Bounds::PerRow {
                preceding: sizes.iter().map(|&s| s as i64).collect(),
                following: vec![0; num_values],
            })
        }

        WindowSpec::Bounds(generator) => {
            let (starts, ends) = generator.window_bounds(num_values, min_periods, center, None);

            if starts.len() != num_values || ends.len() != num_values {
                return Err(Error::InvalidBoundary(format!(
                    "ジェネレーターの出力長 ({}, {}) が行数 ({}) と一致しません",
                    starts.len(),
                    ends.len(),
                    num_values
                )));
            }

            let mut preceding = Vec::with_capacity(num_values);
            let mut following = Vec::with_capacity(num_values);

            for i in 0..num_values {
                let (start, end) = (starts[i], ends[i]);

                if start > end || end > num_values {
                    return Err(Error::InvalidBoundary(format!(
                        "行{}の境界 [{}, {}) は 0 <= start <= end <= {} を満たしません",
                        i, start, end, num_values
                    )));
                }

                let p = i as i64 - start as i64 + 1;
                let f = end as i64 - i as i64 - 1;

                if p < 0 || f < 0 {
                    return Err(Error::InvalidBoundary(format!(
                        "行{}の境界 [{}, {}) は現在行を含みません",
                        i, start, end
                    )));
                }

                preceding.push(p);
                following.push(f);
            }

            Ok(Bounds::PerRow {
                preceding,
                following,
            })
        }
    }
}
