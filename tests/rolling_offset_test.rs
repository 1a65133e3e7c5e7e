use chrono::{Duration, TimeZone, Utc};

use rollrs::{Column, RowIndex, Series, Window};

// 基準時刻から秒オフセットで日時軸を作るヘルパー関数
fn datetime_index(offsets_sec: &[i64]) -> RowIndex {
    let base = Utc.with_ymd_and_hms(2019, 1, 1, 9, 0, 0).unwrap();
    RowIndex::Datetime(
        offsets_sec
            .iter()
            .map(|&s| base + Duration::seconds(s))
            .collect(),
    )
}

fn collect_f64(series: &Series) -> Vec<Option<f64>> {
    (0..series.len())
        .map(|i| series.get_f64(i).unwrap())
        .collect()
}

#[test]
fn test_offset_window_max() {
    // 軸: 0,1,2,4,7,8秒 / 値: [1, 9, 5, 4, NULL, 1] / ウィンドウ "2s"
    let series = Series::with_nulls(
        vec![1.0, 9.0, 5.0, 4.0, 0.0, 1.0],
        vec![false, false, false, false, true, false],
        None,
    )
    .unwrap()
    .with_index(datetime_index(&[0, 1, 2, 4, 7, 8]))
    .unwrap();

    // min_periodsの既定値は1。軸7秒の行は2秒以内に他の行がなく、
    // 自身の値がNULLなので結果もNULL。軸8秒の行の近傍はNULLの行
    // だけなので、ウィンドウは実質自分自身のみ。
    let result = series
        .rolling(Window::Offset("2s".to_string()))
        .unwrap()
        .max()
        .unwrap();
    assert_eq!(
        collect_f64(&result),
        vec![Some(1.0), Some(9.0), Some(9.0), Some(4.0), None, Some(1.0)]
    );
}

#[test]
fn test_offset_window_apply() {
    // 平方根の合計をオフセットウィンドウに適用する
    let series = Series::new(vec![16.0, 25.0, 36.0, 49.0, 64.0, 81.0], None)
        .with_index(datetime_index(&[0, 1, 2, 4, 7, 8]))
        .unwrap();

    let result = series
        .rolling(Window::Offset("2s".to_string()))
        .unwrap()
        .apply(|window| window.iter().map(|v| v.sqrt()).sum())
        .unwrap();
    assert_eq!(
        collect_f64(&result),
        vec![
            Some(4.0),
            Some(9.0),
            Some(11.0),
            Some(7.0),
            Some(8.0),
            Some(17.0)
        ]
    );
}

#[test]
fn test_offset_window_sum_defaults() {
    let series = Series::new(vec![1.0, 2.0, 4.0, 8.0], None)
        .with_index(datetime_index(&[0, 1, 3, 10]))
        .unwrap();

    // "3s": 行0={0}, 行1={0,1}, 行2={1,2}, 行3={3}
    let result = series
        .rolling(Window::Offset("3s".to_string()))
        .unwrap()
        .sum()
        .unwrap();
    assert_eq!(
        collect_f64(&result),
        vec![Some(1.0), Some(3.0), Some(6.0), Some(8.0)]
    );
}

#[test]
fn test_zero_offset_window() {
    // オフセット0: 各行のウィンドウは同じ軸値を持つ行のみ
    let series = Series::new(vec![1.0, 2.0, 4.0, 8.0], None)
        .with_index(datetime_index(&[0, 1, 1, 2]))
        .unwrap();

    let result = series
        .rolling(Window::Offset("0s".to_string()))
        .unwrap()
        .sum()
        .unwrap();
    assert_eq!(
        collect_f64(&result),
        vec![Some(1.0), Some(2.0), Some(6.0), Some(8.0)]
    );

    let count = series
        .rolling(Window::Offset("0s".to_string()))
        .unwrap()
        .count()
        .unwrap();
    let counts: Vec<Option<i64>> = match count.column() {
        Column::Int64(col) => (0..col.len()).map(|i| col.get(i).unwrap()).collect(),
        _ => panic!("Int64列が期待されます"),
    };
    assert_eq!(counts, vec![Some(1), Some(1), Some(2), Some(1)]);
}

#[test]
fn test_offset_window_rejects_garbage() {
    let series = Series::new(vec![1.0, 2.0], None)
        .with_index(datetime_index(&[0, 1]))
        .unwrap();

    assert!(series
        .rolling(Window::Offset("2 parsecs".to_string()))
        .is_err());
}
