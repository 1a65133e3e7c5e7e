//! 時間オフセットの解析を行うモジュール

use std::fmt;

use chrono::Duration;

use crate::error::{Error, Result};

/// ウィンドウ幅として使用する時間オフセットを表す構造体
///
/// `"2s"` や `"500ms"`、`"3min"` のような文字列から解析する。
/// 軸のナノ秒目盛りとの減算比較に使用するため、ナノ秒の整数値を保持する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowOffset {
    nanos: i64,
}

impl WindowOffset {
    /// 文字列からオフセットを解析する
    ///
    /// `"150ns"`, `"2us"`, `"500ms"`, `"2s"`, `"3min"`, `"2h"`, `"1d"`,
    /// `"1w"` のような形式を受け付ける。
    pub fn parse(s: &str) -> Result<Self> {
        // 数値部分と単位部分に分割
        let mut num_chars = String::new();
        let mut unit_chars = String::new();
        let mut found_digit = false;

        for c in s.trim().chars() {
            if c.is_ascii_digit() {
                if !unit_chars.is_empty() {
                    // "1s2" のように単位の後に数字が来るのは不正
                    return Err(Self::parse_error(s));
                }
                found_digit = true;
                num_chars.push(c);
            } else if found_digit {
                unit_chars.push(c);
            } else {
                // 数字が先に来ないといけない
                return Err(Self::parse_error(s));
            }
        }

        if num_chars.is_empty() || unit_chars.is_empty() {
            return Err(Self::parse_error(s));
        }

        let num: i64 = num_chars.parse().map_err(|_| Self::parse_error(s))?;

        // 単位を解析して適切なDurationを作成
        let duration = match unit_chars.to_lowercase().as_str() {
            "ns" => Duration::nanoseconds(num),
            "us" => Duration::microseconds(num),
            "ms" => Duration::milliseconds(num),
            "s" | "sec" | "second" | "seconds" => Duration::seconds(num),
            "t" | "min" | "minute" | "minutes" => Duration::minutes(num),
            "h" | "hour" | "hours" => Duration::hours(num),
            "d" | "day" | "days" => Duration::days(num),
            "w" | "week" | "weeks" => Duration::weeks(num),
            _ => return Err(Self::parse_error(s)),
        };

        Self::from_duration(duration)
    }

    /// chronoのDurationからオフセットを作成する
    ///
    /// 負の値、およびナノ秒で表現できない大きさは受け付けない。
    pub fn from_duration(duration: Duration) -> Result<Self> {
        let nanos = duration.num_nanoseconds().ok_or_else(|| {
            Error::InvalidArgument(format!(
                "ウィンドウオフセット ({}) が大きすぎます",
                duration
            ))
        })?;

        if nanos < 0 {
            return Err(Error::InvalidArgument(format!(
                "ウィンドウオフセットは負にできません: {}",
                duration
            )));
        }

        Ok(Self { nanos })
    }

    /// ナノ秒の値を取得する
    pub fn num_nanoseconds(&self) -> i64 {
        self.nanos
    }

    fn parse_error(s: &str) -> Error {
        Error::InvalidArgument(format!(
            "ウィンドウ幅 ({}) を時間オフセットとして解析できません",
            s
        ))
    }
}

impl fmt::Display for WindowOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ns", self.nanos)
    }
}
