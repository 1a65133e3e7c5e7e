//! オフセットからウィンドウサイズ列への変換
//!
//! 昇順の軸目盛りに対する2ポインタ走査。左境界は右境界の前進に
//! 伴って単調に前進するため、全体でO(N)の境界移動で済む。

use crate::error::{Error, Result};

/// 行jをiのウィンドウから外すべきかどうか
///
/// ウィンドウには `axis[i] - axis[j] < offset` の行に加えて、軸値が
/// 現在行と完全に一致する行を常に含める。これによりオフセット0は
/// 「同じ軸値を共有する行だけ」のウィンドウになる。
#[inline]
fn out_of_window(distance: i64, offset: i64) -> bool {
    distance >= offset && distance != 0
}

/// 各行について、オフセット内に収まる先行行数（自分を含む）を求める
///
/// 軸は非減少であることを前提とする。単一の前進パスで計算され、
/// 返り値の`sizes[i]`は行iで終わるウィンドウの長さ。
pub fn window_sizes_from_offset(ticks: &[i64], offset: i64) -> Vec<usize> {
    let mut sizes = Vec::with_capacity(ticks.len());
    let mut left = 0usize;

    for i in 0..ticks.len() {
        while out_of_window(ticks[i] - ticks[left], offset) {
            left += 1;
        }
        sizes.push(i - left + 1);
    }

    sizes
}

/// グループ境界を越えないウィンドウサイズ列を求める
///
/// `group_starts[i]` は行iの属するグループの開始位置。左ポインタは
/// グループ開始位置より前に戻らない（グループごとにリセットされる）。
/// グループが連続していれば左ポインタは全体で単調なので、結合された
/// 軸に対して1パスで済む。
pub fn grouped_window_sizes_from_offset(
    ticks: &[i64],
    group_starts: &[usize],
    offset: i64,
) -> Result<Vec<usize>> {
    if group_starts.len() != ticks.len() {
        return Err(Error::LengthMismatch {
            expected: ticks.len(),
            actual: group_starts.len(),
        });
    }

    let mut sizes = Vec::with_capacity(ticks.len());
    let mut left = 0usize;

    for i in 0..ticks.len() {
        if left < group_starts[i] {
            left = group_starts[i];
        }
        while out_of_window(ticks[i] - ticks[left], offset) {
            left += 1;
        }
        sizes.push(i - left + 1);
    }

    Ok(sizes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: i64 = 1_000_000_000;

    #[test]
    fn test_sizes_from_offset() {
        // 軸: 0,1,2,4,7,8秒 / オフセット2秒
        let ticks: Vec<i64> = [0, 1, 2, 4, 7, 8].iter().map(|&t| t * SEC).collect();
        let sizes = window_sizes_from_offset(&ticks, 2 * SEC);
        assert_eq!(sizes, vec![1, 2, 2, 1, 1, 2]);
    }

    #[test]
    fn test_zero_offset_is_single_row() {
        let ticks: Vec<i64> = [0, 1, 2, 4].iter().map(|&t| t * SEC).collect();
        assert_eq!(window_sizes_from_offset(&ticks, 0), vec![1, 1, 1, 1]);
    }

    #[test]
    fn test_zero_offset_includes_duplicate_ticks() {
        let ticks: Vec<i64> = vec![0, SEC, SEC, SEC, 2 * SEC];
        assert_eq!(window_sizes_from_offset(&ticks, 0), vec![1, 1, 2, 3, 1]);
    }

    #[test]
    fn test_sizes_monotonic_in_offset() {
        let ticks: Vec<i64> = [0, 3, 5, 6, 11, 14].iter().map(|&t| t * SEC).collect();
        let mut previous = vec![0usize; ticks.len()];
        for offset_sec in 0..16 {
            let sizes = window_sizes_from_offset(&ticks, offset_sec * SEC);
            for i in 0..ticks.len() {
                assert!(sizes[i] >= previous[i]);
            }
            previous = sizes;
        }
    }

    #[test]
    fn test_grouped_sizes_clamp_at_group_start() {
        // 2つのグループ: [0,1,2] と [3,4,5]。軸値は連続している。
        let ticks: Vec<i64> = [0, 1, 2, 3, 4, 5].iter().map(|&t| t * SEC).collect();
        let group_starts = vec![0, 0, 0, 3, 3, 3];
        let sizes = grouped_window_sizes_from_offset(&ticks, &group_starts, 10 * SEC).unwrap();
        // グループBの先頭行はグループAの行を含まない
        assert_eq!(sizes, vec![1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn test_grouped_sizes_length_mismatch() {
        assert!(grouped_window_sizes_from_offset(&[0, 1], &[0], SEC).is_err());
    }
}
