//! End-to-end tests over the public `NormalizeNumexp` pipeline.

use numexp_core::{
    BoundValue, Expression, ExpressionKind, Language, NormalizeNumexp, Time, INF,
};

fn normalizer() -> NormalizeNumexp {
    NormalizeNumexp::new(Language::Japanese).unwrap()
}

fn number(expr: &Expression) -> f64 {
    match expr.value_lower_bound {
        Some(BoundValue::Number(v)) => v,
        other => panic!("expected numeric lower bound, got {other:?}"),
    }
}

fn number_upper(expr: &Expression) -> f64 {
    match expr.value_upper_bound {
        Some(BoundValue::Number(v)) => v,
        other => panic!("expected numeric upper bound, got {other:?}"),
    }
}

fn time_lower(expr: &Expression) -> Time {
    match expr.value_lower_bound {
        Some(BoundValue::Time(t)) => t,
        other => panic!("expected time lower bound, got {other:?}"),
    }
}

fn time_upper(expr: &Expression) -> Time {
    match expr.value_upper_bound {
        Some(BoundValue::Time(t)) => t,
        other => panic!("expected time upper bound, got {other:?}"),
    }
}

#[test]
fn test_mixed_sentence() {
    let res = normalizer().normalize("1911年から2011年の間、その100年間において、9.3万人もの死傷者がでた。");
    assert_eq!(res.len(), 3);

    assert_eq!(res[0].kind, ExpressionKind::Abstime);
    assert_eq!(res[0].original_expr, "1911年から2011年");
    assert_eq!((res[0].position_start, res[0].position_end), (0, 12));
    assert_eq!(res[0].counter, "none");
    assert_eq!(time_lower(&res[0]).year, 1911.0);
    assert_eq!(time_lower(&res[0]).month, INF);
    assert_eq!(time_upper(&res[0]).year, 2011.0);

    assert_eq!(res[1].kind, ExpressionKind::Duration);
    assert_eq!(res[1].original_expr, "100年間");
    assert_eq!((res[1].position_start, res[1].position_end), (17, 22));
    assert_eq!(time_lower(&res[1]).year, 100.0);

    assert_eq!(res[2].kind, ExpressionKind::Numerical);
    assert_eq!(res[2].original_expr, "9.3万人");
    assert_eq!((res[2].position_start, res[2].position_end), (27, 32));
    assert_eq!(res[2].counter, "人");
    assert_eq!(number(&res[2]), 93000.0);
    assert_eq!(number_upper(&res[2]), 93000.0);
}

#[test]
fn test_reltime_offset() {
    let res = normalizer().normalize("15年前、戦争があった");
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].kind, ExpressionKind::Reltime);
    assert_eq!(res[0].original_expr, "15年前");
    assert_eq!((res[0].position_start, res[0].position_end), (0, 4));
    assert_eq!(res[0].counter, "none");

    let rel_lower = res[0].value_lower_bound_rel.unwrap();
    let rel_upper = res[0].value_upper_bound_rel.unwrap();
    assert_eq!(rel_lower.year, -15.0);
    assert_eq!(rel_upper.year, -15.0);
    assert_eq!(rel_lower.month, INF);
    let abs_lower = res[0].value_lower_bound_abs.unwrap();
    assert_eq!(abs_lower.year, INF);
}

#[test]
fn test_reltime_anchored_by_deixis_word() {
    let res = normalizer().normalize("昨年3月、僕たち２人は結婚した");
    assert_eq!(res.len(), 2);

    assert_eq!(res[0].kind, ExpressionKind::Reltime);
    assert_eq!(res[0].original_expr, "昨年3月");
    assert_eq!((res[0].position_start, res[0].position_end), (0, 4));
    assert_eq!(res[0].value_lower_bound_rel.unwrap().year, -1.0);
    assert_eq!(res[0].value_lower_bound_abs.unwrap().month, 3.0);
    assert_eq!(res[0].value_upper_bound_abs.unwrap().month, 3.0);

    assert_eq!(res[1].kind, ExpressionKind::Numerical);
    assert_eq!(res[1].original_expr, "２人");
    assert_eq!((res[1].position_start, res[1].position_end), (8, 10));
    assert_eq!(res[1].counter, "人");
    assert_eq!(number(&res[1]), 2.0);
}

#[test]
fn test_decimal_point_counter() {
    let res = normalizer().normalize("131.1ポイントというスコアを叩き出した");
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].kind, ExpressionKind::Numerical);
    assert_eq!(res[0].original_expr, "131.1ポイント");
    assert_eq!((res[0].position_start, res[0].position_end), (0, 9));
    assert_eq!(res[0].counter, "ポイント");
    assert_eq!(number(&res[0]), 131.1);
}

#[test]
fn test_afternoon_clock_time() {
    let res = normalizer().normalize("午後3時45分に待ち合わせ");
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].kind, ExpressionKind::Abstime);
    assert_eq!(res[0].original_expr, "午後3時45分");
    assert_eq!((res[0].position_start, res[0].position_end), (0, 7));
    let lower = time_lower(&res[0]);
    assert_eq!(lower.hour, 15.0);
    assert_eq!(lower.minute, 45.0);
    assert_eq!(lower.year, INF);
    assert_eq!(time_upper(&res[0]).hour, 15.0);
}

#[test]
fn test_day_of_week_annotation() {
    let res = normalizer().normalize("5月3日(水)");
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].original_expr, "5月3日(水)");
    assert_eq!((res[0].position_start, res[0].position_end), (0, 7));
    assert_eq!(time_lower(&res[0]).month, 5.0);
    assert_eq!(time_lower(&res[0]).day, 3.0);
    assert_eq!(res[0].options, vec!["Wed".to_string()]);

    let res = normalizer().normalize("2001/3/3 Sat");
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].original_expr, "2001/3/3 Sat");
    assert_eq!((res[0].position_start, res[0].position_end), (0, 12));
    let lower = time_lower(&res[0]);
    assert_eq!((lower.year, lower.month, lower.day), (2001.0, 3.0, 3.0));
    assert_eq!(res[0].options, vec!["Sat".to_string()]);
}

#[test]
fn test_deixis_word_without_a_number() {
    let res = normalizer().normalize("【今日から開催】");
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].kind, ExpressionKind::Reltime);
    assert_eq!(res[0].original_expr, "今日");
    assert_eq!((res[0].position_start, res[0].position_end), (1, 3));
    assert_eq!(res[0].value_lower_bound_rel.unwrap().day, 0.0);
    assert_eq!(res[0].value_upper_bound_rel.unwrap().day, 0.0);
}

#[test]
fn test_weekday_with_made_suffix() {
    let res = normalizer().normalize("4/26(Tue)まで");
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].kind, ExpressionKind::Abstime);
    assert_eq!(res[0].original_expr, "4/26(Tue)まで");
    let lower = time_lower(&res[0]);
    assert_eq!((lower.month, lower.day), (4.0, 26.0));
    assert_eq!(res[0].options, vec!["Tue".to_string()]);
}

#[test]
fn test_kara_markers_outside_the_expression() {
    let res = normalizer().normalize("中国から30匹の鳥がきた");
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].original_expr, "30匹");
    assert_eq!((res[0].position_start, res[0].position_end), (4, 7));
    assert_eq!(res[0].counter, "匹");
    assert_eq!(number(&res[0]), 30.0);

    let res = normalizer().normalize("30匹からのプレゼント");
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].original_expr, "30匹");
    assert_eq!((res[0].position_start, res[0].position_end), (0, 3));
    assert_eq!(number(&res[0]), 30.0);
}

#[test]
fn test_duration_and_reltime_side_by_side() {
    let res = normalizer().normalize("一万年と二千年前からああああ");
    assert_eq!(res.len(), 2);

    assert_eq!(res[0].kind, ExpressionKind::Duration);
    assert_eq!(res[0].original_expr, "一万年");
    assert_eq!((res[0].position_start, res[0].position_end), (0, 3));
    assert_eq!(time_lower(&res[0]).year, 10000.0);

    assert_eq!(res[1].kind, ExpressionKind::Reltime);
    assert_eq!(res[1].original_expr, "二千年前");
    assert_eq!((res[1].position_start, res[1].position_end), (4, 8));
    assert_eq!(res[1].value_lower_bound_rel.unwrap().year, -2000.0);
}

#[test]
fn test_mixed_notation_reltime() {
    let res = normalizer().normalize("話をしよう。あれは今から36万年前………いや、1万4000年前だったか。");
    assert_eq!(res.len(), 2);
    assert_eq!(res[0].original_expr, "36万年前");
    assert_eq!((res[0].position_start, res[0].position_end), (12, 17));
    assert_eq!(res[0].value_lower_bound_rel.unwrap().year, -360000.0);
    assert_eq!(res[1].original_expr, "1万4000年前");
    assert_eq!((res[1].position_start, res[1].position_end), (23, 31));
    assert_eq!(res[1].value_lower_bound_rel.unwrap().year, -14000.0);
}

#[test]
fn test_blocked_place_names() {
    let res = normalizer().normalize("一体それがどうしたというのだね。九州。四国。");
    assert!(res.is_empty());
}

#[test]
fn test_version_prefix_suppression() {
    let res = normalizer().normalize("ver2.3.4。ver２．３。");
    assert!(res.is_empty());
}

#[test]
fn test_phone_numbers_and_separators() {
    let res = normalizer().normalize("080-6006-4451。ver2.0。");
    assert!(res.is_empty());

    let res = normalizer().normalize("1.2.2 2-2-2");
    assert!(res.is_empty());
}

#[test]
fn test_out_of_range_dates_fall_back_to_durations() {
    let res = normalizer().normalize("198999年30月41日。");
    assert_eq!(res.len(), 3);
    for expr in &res {
        assert_eq!(expr.kind, ExpressionKind::Duration);
    }
    assert_eq!(res[0].original_expr, "198999年");
    assert_eq!(time_lower(&res[0]).year, 198999.0);
    assert_eq!(res[1].original_expr, "30月");
    assert_eq!(time_lower(&res[1]).month, 30.0);
    assert_eq!(res[2].original_expr, "41日");
    assert_eq!(time_lower(&res[2]).day, 41.0);
}

#[test]
fn test_two_digit_year_pivot() {
    let res = normalizer().normalize("09年5月。99年5月");
    assert_eq!(res.len(), 2);
    assert_eq!(res[0].original_expr, "09年5月");
    assert_eq!(time_lower(&res[0]).year, 2009.0);
    assert_eq!(time_lower(&res[0]).month, 5.0);
    assert_eq!(res[1].original_expr, "99年5月");
    assert_eq!(time_lower(&res[1]).year, 1999.0);

    // explicit era marker suppresses the pivot
    let res = normalizer().normalize("西暦99年5月");
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].original_expr, "西暦99年5月");
    assert_eq!((res[0].position_start, res[0].position_end), (0, 7));
    assert_eq!(time_lower(&res[0]).year, 99.0);
}

#[test]
fn test_url_suppression() {
    let res = normalizer().normalize("http://3gl3molggg.com");
    assert!(res.is_empty());
}

#[test]
fn test_su_fuzzy_quantities() {
    let res = normalizer().normalize("数十人が十数人と喧嘩して、百数十円落とした");
    assert_eq!(res.len(), 3);

    assert_eq!(res[0].original_expr, "数十人");
    assert_eq!((number(&res[0]), number_upper(&res[0])), (10.0, 90.0));
    assert_eq!(res[1].original_expr, "十数人");
    assert_eq!((number(&res[1]), number_upper(&res[1])), (11.0, 19.0));
    assert_eq!(res[2].original_expr, "百数十円");
    assert_eq!((res[2].position_start, res[2].position_end), (13, 17));
    assert_eq!(res[2].counter, "円");
    assert_eq!((number(&res[2]), number_upper(&res[2])), (110.0, 190.0));
}

#[test]
fn test_date_range() {
    let res = normalizer().normalize("2012/4/3~6に行われる");
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].original_expr, "2012/4/3~6");
    assert_eq!((res[0].position_start, res[0].position_end), (0, 10));
    let lower = time_lower(&res[0]);
    let upper = time_upper(&res[0]);
    assert_eq!((lower.year, lower.month, lower.day), (2012.0, 4.0, 3.0));
    assert_eq!((upper.year, upper.month, upper.day), (2012.0, 4.0, 6.0));

    let res = normalizer().normalize("2012/4/3~2012/4/6に行われる");
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].original_expr, "2012/4/3~2012/4/6");
    assert_eq!(time_lower(&res[0]).day, 3.0);
    assert_eq!(time_upper(&res[0]).day, 6.0);
}

#[test]
fn test_wari_ratio() {
    let res = normalizer().normalize("彼の打率は3割4分5厘だ");
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].kind, ExpressionKind::Numerical);
    assert_eq!(res[0].original_expr, "3割4分5厘");
    assert_eq!((res[0].position_start, res[0].position_end), (5, 11));
    assert_eq!(res[0].counter, "%");
    assert_eq!(number(&res[0]), 34.5);
}

#[test]
fn test_speed_range_merge() {
    let res = normalizer().normalize("時速50km～60km");
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].original_expr, "時速50km～60km");
    assert_eq!((res[0].position_start, res[0].position_end), (0, 11));
    assert_eq!(res[0].counter, "m/h");
    assert_eq!((number(&res[0]), number_upper(&res[0])), (50000.0, 60000.0));
}

#[test]
fn test_suffix_modifiers_on_quantities() {
    let norm = normalizer();

    let res = norm.normalize("お茶を10本強飲んだ");
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].counter, "本");
    assert_eq!((number(&res[0]), number_upper(&res[0])), (10.0, 16.0));

    let res = norm.normalize("お茶を10本弱飲んだ");
    assert_eq!((number(&res[0]), number_upper(&res[0])), (5.0, 10.0));

    let res = norm.normalize("それは10本目のお茶");
    assert_eq!(res[0].counter, "本");
    assert_eq!(res[0].options, vec!["ordinary".to_string()]);

    let res = norm.normalize("お茶を1本半飲んだ");
    assert_eq!((number(&res[0]), number_upper(&res[0])), (1.5, 1.5));
}

#[test]
fn test_serialized_shape() {
    let res = normalizer().normalize("15年前、戦争があった");
    let json = serde_json::to_value(&res[0]).unwrap();

    assert_eq!(json["type"], "reltime");
    assert_eq!(json["counter"], "none");
    assert!(json["value_lower_bound"].is_null());
    assert_eq!(json["value_lower_bound_rel"]["year"], -15.0);
    // unset fields carry infinity sentinels, which JSON renders as null
    assert!(json["value_lower_bound_rel"]["month"].is_null());
}
