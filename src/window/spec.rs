//! ウィンドウ指定の正規化

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::temporal::WindowOffset;
use crate::window::bounds::WindowBounds;
use crate::window::sizes::{grouped_window_sizes_from_offset, window_sizes_from_offset};

/// 利用者が指定するウィンドウ引数
#[derive(Clone)]
pub enum Window {
    /// 固定の行数ウィンドウ（正の整数）
    Fixed(usize),
    /// 時間オフセットによる可変幅ウィンドウ（日時軸が必要）
    Offset(String),
    /// 行ごとのウィンドウサイズの列（事前計算済み）
    Sizes(Vec<usize>),
    /// 外部のウィンドウ境界ジェネレーター
    Bounds(Arc<dyn WindowBounds>),
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Window::Fixed(size) => write!(f, "Fixed({})", size),
            Window::Offset(text) => write!(f, "Offset({:?})", text),
            Window::Sizes(sizes) => write!(f, "Sizes(len={})", sizes.len()),
            Window::Bounds(_) => write!(f, "Bounds(..)"),
        }
    }
}

/// 正規化後のウィンドウ指定
///
/// オフセットは正規化時点で行ごとのサイズ列に解決されるため、
/// 下流のコンポーネントがオフセットを直接見ることはない。
#[derive(Clone)]
pub(crate) enum WindowSpec {
    Fixed(usize),
    Sizes(Vec<usize>),
    Bounds(Arc<dyn WindowBounds>),
}

impl fmt::Debug for WindowSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowSpec::Fixed(size) => write!(f, "Fixed({})", size),
            WindowSpec::Sizes(sizes) => write!(f, "Sizes(len={})", sizes.len()),
            WindowSpec::Bounds(_) => write!(f, "Bounds(..)"),
        }
    }
}

/// 正規化の結果
#[derive(Debug, Clone)]
pub(crate) struct Normalized {
    pub spec: WindowSpec,
    pub min_periods: Option<usize>,
    pub time_window: bool,
}

/// ウィンドウ引数と`min_periods`を正規化する
///
/// * `ticks` - 日時軸のナノ秒目盛り（日時インデックスでない場合はNone）
/// * `group_starts` - グループ化時の行ごとのグループ開始オフセット。
///   指定された場合、固定幅・オフセットのどちらもグループ境界を
///   越えないサイズ列に解決される。
///
/// `Fixed`は正の整数であることを検証し、`min_periods`未指定時は
/// ウィンドウサイズを既定値とする。オフセットは日時軸が必要で、
/// `min_periods`の既定値は1。`Sizes`と`Bounds`はそのまま通す。
pub(crate) fn normalize(
    window: &Window,
    min_periods: Option<usize>,
    ticks: Option<&[i64]>,
    group_starts: Option<&[usize]>,
    num_rows: usize,
) -> Result<Normalized> {
    match window {
        Window::Fixed(size) => {
            if *size == 0 {
                return Err(Error::InvalidArgument(
                    "ウィンドウサイズは0や負にできません".to_string(),
                ));
            }

            let min_periods = min_periods.or(Some(*size));

            let spec = match group_starts {
                None => WindowSpec::Fixed(*size),
                Some(starts) => {
                    // グループ化時は行番号を目盛りとしてサイズ列に解決する
                    let row_ticks: Vec<i64> = (0..num_rows as i64).collect();
                    let sizes =
                        grouped_window_sizes_from_offset(&row_ticks, starts, *size as i64)?;
                    WindowSpec::Sizes(sizes)
                }
            };

            log::debug!("normalized fixed window: size={}, min_periods={:?}", size, min_periods);

            Ok(Normalized {
                spec,
                min_periods,
                time_window: false,
            })
        }

        Window::Sizes(sizes) => {
            if sizes.len() != num_rows {
                return Err(Error::InvalidArgument(format!(
                    "ウィンドウサイズ列の長さ ({}) が行数 ({}) と一致しません",
                    sizes.len(),
                    num_rows
                )));
            }

            Ok(Normalized {
                spec: WindowSpec::Sizes(sizes.clone()),
                min_periods,
                time_window: false,
            })
        }

        Window::Bounds(generator) => Ok(Normalized {
            spec: WindowSpec::Bounds(Arc::clone(generator)),
            min_periods,
            time_window: false,
        }),

        Window::Offset(text) => {
            let ticks = ticks.ok_or_else(|| {
                Error::InvalidArgument(
                    "日時インデックス以外ではウィンドウは整数でなければなりません".to_string(),
                )
            })?;

            let offset = WindowOffset::parse(text)?;
            let min_periods = min_periods.or(Some(1));

            let sizes = match group_starts {
                None => window_sizes_from_offset(ticks, offset.num_nanoseconds()),
                Some(starts) => {
                    grouped_window_sizes_from_offset(ticks, starts, offset.num_nanoseconds())?
                }
            };

            log::debug!(
                "normalized offset window: offset={}, min_periods={:?}",
                offset,
                min_periods
            );

            Ok(Normalized {
                spec: WindowSpec::Sizes(sizes),
                min_periods,
                time_window: true,
            })
        }
    }
}
