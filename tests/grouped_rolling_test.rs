use chrono::{Duration, TimeZone, Utc};

use rollrs::{
    Column, Float64Column, Frame, FrameIndex, IndexLabel, RollingOptions, RowIndex, StringColumn,
    Window,
};

fn string_column(values: &[&str]) -> Column {
    Column::String(StringColumn::new(
        values.iter().map(|s| s.to_string()).collect(),
    ))
}

fn collect_f64(frame: &Frame, name: &str) -> Vec<Option<f64>> {
    match frame.column(name).unwrap() {
        Column::Float64(col) => (0..col.len()).map(|i| col.get(i).unwrap()).collect(),
        _ => panic!("Float64列が期待されます"),
    }
}

fn collect_i64(frame: &Frame, name: &str) -> Vec<Option<i64>> {
    match frame.column(name).unwrap() {
        Column::Int64(col) => (0..col.len()).map(|i| col.get(i).unwrap()).collect(),
        _ => panic!("Int64列が期待されます"),
    }
}

#[test]
fn test_grouped_rolling_does_not_cross_groups() {
    // グループ [A,A,B,B,B] / 値 [1,2,10,20,30] / 固定幅2（右端揃え）
    let mut frame = Frame::new();
    frame
        .add_column("key", string_column(&["a", "a", "b", "b", "b"]))
        .unwrap();
    frame
        .add_column(
            "value",
            Column::Float64(Float64Column::new(vec![1.0, 2.0, 10.0, 20.0, 30.0])),
        )
        .unwrap();

    let options = RollingOptions {
        min_periods: Some(1),
        ..Default::default()
    };
    let result = frame
        .group_by(["key"])
        .unwrap()
        .rolling_with(Window::Fixed(2), options)
        .unwrap()
        .sum()
        .unwrap();

    // グループAの最終行は [1,2] の合計3。グループBの先頭行は行番号が
    // 隣接していてもグループAの値を含まない。
    assert_eq!(
        collect_f64(&result, "value"),
        vec![Some(1.0), Some(3.0), Some(10.0), Some(30.0), Some(50.0)]
    );
}

#[test]
fn test_grouped_rolling_default_min_periods() {
    // min_periods未指定時の既定値はウィンドウサイズ
    let mut frame = Frame::new();
    frame
        .add_column("key", string_column(&["a", "a", "b"]))
        .unwrap();
    frame
        .add_column(
            "value",
            Column::Float64(Float64Column::new(vec![1.0, 2.0, 10.0])),
        )
        .unwrap();

    let result = frame
        .group_by(["key"])
        .unwrap()
        .rolling(Window::Fixed(2))
        .unwrap()
        .sum()
        .unwrap();

    // 各グループの先頭行はウィンドウが満たないためNULL
    assert_eq!(
        collect_f64(&result, "value"),
        vec![None, Some(3.0), None]
    );
}

#[test]
fn test_grouped_count_reports_zero_not_null() {
    // 時間オフセットでないウィンドウのcountはmin_periods=0として扱われ、
    // 有効な近傍を持たない行も0を報告する
    let mut frame = Frame::new();
    frame
        .add_column("key", string_column(&["a", "a", "b"]))
        .unwrap();
    frame
        .add_column(
            "value",
            Column::Float64(Float64Column::with_nulls(
                vec![1.0, 0.0, 0.0],
                vec![false, true, true],
            )),
        )
        .unwrap();

    let result = frame
        .group_by(["key"])
        .unwrap()
        .rolling(Window::Fixed(2))
        .unwrap()
        .count()
        .unwrap();

    // グループBの唯一の行は有効値0個だがNULLではなく0
    assert_eq!(
        collect_i64(&result, "value"),
        vec![Some(1), Some(1), Some(0)]
    );
}

#[test]
fn test_grouped_offset_window_resets_per_group() {
    // 軸値が連続していてもグループ境界でウィンドウはリセットされる
    let base = Utc.with_ymd_and_hms(2019, 1, 1, 9, 0, 0).unwrap();
    let index = RowIndex::Datetime((0..4).map(|s| base + Duration::seconds(s)).collect());

    let mut frame = Frame::with_index(index);
    frame
        .add_column("key", string_column(&["a", "a", "b", "b"]))
        .unwrap();
    frame
        .add_column(
            "value",
            Column::Float64(Float64Column::new(vec![1.0, 2.0, 4.0, 8.0])),
        )
        .unwrap();

    let result = frame
        .group_by(["key"])
        .unwrap()
        .rolling(Window::Offset("10s".to_string()))
        .unwrap()
        .sum()
        .unwrap();

    // グループBの先頭行（軸2秒）は、グループAの軸値がオフセット内でも
    // 自分のグループの行しか含まない
    assert_eq!(
        collect_f64(&result, "value"),
        vec![Some(1.0), Some(3.0), Some(4.0), Some(12.0)]
    );
}

#[test]
fn test_grouped_result_has_composite_index() {
    // キーの安定ソート後、(グループキー, 元の軸値) の複合インデックスが付く
    let mut frame = Frame::new();
    frame
        .add_column("key", string_column(&["b", "a", "b"]))
        .unwrap();
    frame
        .add_column(
            "value",
            Column::Float64(Float64Column::new(vec![1.0, 2.0, 3.0])),
        )
        .unwrap();

    let options = RollingOptions {
        min_periods: Some(1),
        ..Default::default()
    };
    let result = frame
        .group_by(["key"])
        .unwrap()
        .rolling_with(Window::Fixed(2), options)
        .unwrap()
        .sum()
        .unwrap();

    let index = match result.index() {
        FrameIndex::Multi(index) => index,
        _ => panic!("複合インデックスが期待されます"),
    };

    assert_eq!(index.n_levels(), 2);
    assert_eq!(index.names()[0], Some("key".to_string()));

    // ソート順: a(元行1), b(元行0), b(元行2)
    assert_eq!(
        index.get(0).unwrap(),
        &[IndexLabel::String("a".to_string()), IndexLabel::Int64(1)]
    );
    assert_eq!(
        index.get(1).unwrap(),
        &[IndexLabel::String("b".to_string()), IndexLabel::Int64(0)]
    );
    assert_eq!(
        index.get(2).unwrap(),
        &[IndexLabel::String("b".to_string()), IndexLabel::Int64(2)]
    );

    // 集計値もソート順: a=[2], b=[1], b=[1,3]
    assert_eq!(
        collect_f64(&result, "value"),
        vec![Some(2.0), Some(1.0), Some(4.0)]
    );
}

#[test]
fn test_grouped_offset_count_keeps_min_periods() {
    // 時間オフセットウィンドウのcountはmin_periodsの上書きをしない
    let base = Utc.with_ymd_and_hms(2019, 1, 1, 9, 0, 0).unwrap();
    let index = RowIndex::Datetime((0..3).map(|s| base + Duration::seconds(s)).collect());

    let mut frame = Frame::with_index(index);
    frame
        .add_column("key", string_column(&["a", "a", "a"]))
        .unwrap();
    frame
        .add_column(
            "value",
            Column::Float64(Float64Column::with_nulls(
                vec![1.0, 0.0, 3.0],
                vec![false, true, false],
            )),
        )
        .unwrap();

    let options = RollingOptions {
        min_periods: Some(2),
        ..Default::default()
    };
    let result = frame
        .group_by(["key"])
        .unwrap()
        .rolling_with(Window::Offset("5s".to_string()), options)
        .unwrap()
        .count()
        .unwrap();

    // 有効値2個に満たない行はNULLのまま
    assert_eq!(
        collect_i64(&result, "value"),
        vec![None, None, Some(2)]
    );
}
