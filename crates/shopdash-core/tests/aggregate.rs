mod common;

use shopdash_core::aggregate::{
    calendar_totals, distribution_by, rank_by, time_series, AggregateRequest, CalendarBucket,
    Metric,
};
use shopdash_core::{filter_dataset, DimensionSelection, Field, FilteredView, Selection};

use common::{assert_close, fixture_dataset, inline_dataset};

#[test]
fn daily_sales_ascend_by_date_and_skip_unparsed_rows() {
    let dataset = fixture_dataset("supermarket_sales.csv");
    let view = FilteredView::full(&dataset);

    let series = time_series(&view).into_option().expect("daily sales available");

    assert_eq!(
        series.keys(),
        vec![
            "2019-01-05",
            "2019-01-27",
            "2019-02-08",
            "2019-02-25",
            "2019-03-03",
            "2019-03-08",
            "2019-03-25",
        ]
    );
    assert_eq!(series.values(), vec![105.0, 63.0, 210.0, 31.5, 210.0, 21.0, 105.0]);
}

#[test]
fn months_come_out_in_calendar_order() {
    // rows arrive July, July, January, March, July
    let dataset = fixture_dataset("orders_semicolon.csv");
    let view = FilteredView::full(&dataset);

    let months = calendar_totals(&view, CalendarBucket::Month)
        .into_option()
        .unwrap();

    assert_eq!(months.keys(), vec!["January", "March", "July"]);
    assert_eq!(months.values(), vec![30.0, 40.0, 40.0]);
}

#[test]
fn weekdays_and_hours_use_their_natural_order() {
    let dataset = fixture_dataset("orders_semicolon.csv");
    let view = FilteredView::full(&dataset);

    let weekdays = calendar_totals(&view, CalendarBucket::Weekday)
        .into_option()
        .unwrap();
    assert_eq!(weekdays.keys(), vec!["Tuesday", "Wednesday", "Thursday", "Sunday"]);
    assert_eq!(weekdays.values(), vec![30.0, 40.0, 20.0, 20.0]);

    let hours = calendar_totals(&view, CalendarBucket::Hour)
        .into_option()
        .unwrap();
    assert_eq!(hours.keys(), vec!["08:00", "09:00", "11:00", "17:00"]);
    assert_eq!(hours.values(), vec![20.0, 20.0, 40.0, 30.0]);
}

#[test]
fn product_ranking_sums_totals_descending() {
    let dataset = fixture_dataset("orders_semicolon.csv");
    let view = FilteredView::full(&dataset);

    let ranking = rank_by(&view, Field::Product, Metric::Sum(Field::Total), Some(10))
        .into_option()
        .unwrap();

    assert_eq!(ranking.keys(), vec!["Widget", "Gizmo", "Gadget"]);
    assert_eq!(ranking.values(), vec![60.0, 40.0, 10.0]);
    assert_eq!(ranking.get("Gizmo"), Some(40.0));
}

#[test]
fn ranking_ties_keep_first_encountered_group() {
    let dataset = inline_dataset(
        &["Product", "Total"],
        &[&["B", "1"], &["A", "2"], &["B", "2"], &["A", "1"], &["C", "9"]],
    );
    let view = FilteredView::full(&dataset);

    let ranking = rank_by(&view, Field::Product, Metric::Sum(Field::Total), None)
        .into_option()
        .unwrap();
    assert_eq!(ranking.keys(), vec!["C", "B", "A"]);

    let top_two = rank_by(&view, Field::Product, Metric::Sum(Field::Total), Some(2))
        .into_option()
        .unwrap();
    assert_eq!(top_two.keys(), vec!["C", "B"]);
}

#[test]
fn count_metric_counts_rows_per_group() {
    let dataset = fixture_dataset("supermarket_sales.csv");
    let view = FilteredView::full(&dataset);

    let genders = AggregateRequest::Ranking {
        group: Field::Gender,
        metric: Metric::Count,
        top_n: None,
    }
    .compute(&view)
    .into_option()
    .unwrap();

    assert_eq!(genders.keys(), vec!["Female", "Male"]);
    assert_eq!(genders.values(), vec![4.0, 4.0]);
}

#[test]
fn missing_fields_make_the_aggregate_unavailable() {
    let dataset = inline_dataset(&["Branch", "Total"], &[&["A", "1"]]);
    let view = FilteredView::full(&dataset);

    assert!(!time_series(&view).is_available());
    assert!(!calendar_totals(&view, CalendarBucket::Month).is_available());
    assert!(!calendar_totals(&view, CalendarBucket::Hour).is_available());
    assert!(!rank_by(&view, Field::Product, Metric::Count, None).is_available());
    assert!(!rank_by(&view, Field::Branch, Metric::Sum(Field::GrossIncome), None).is_available());
    assert!(!rank_by(&view, Field::Branch, Metric::Sum(Field::Branch), None).is_available());
    assert!(rank_by(&view, Field::Branch, Metric::Count, None).is_available());
}

#[test]
fn zero_rows_give_empty_views() {
    let dataset = fixture_dataset("orders_semicolon.csv");
    let selection = Selection::all().with_branches(DimensionSelection::none());
    let view = filter_dataset(&dataset, &selection);

    assert!(time_series(&view).into_option().unwrap().is_empty());
    assert!(calendar_totals(&view, CalendarBucket::Month)
        .into_option()
        .unwrap()
        .is_empty());
    assert!(rank_by(&view, Field::Product, Metric::Sum(Field::Total), Some(10))
        .into_option()
        .unwrap()
        .is_empty());
    assert!(distribution_by(&view, Field::Branch, Field::Total)
        .into_option()
        .unwrap()
        .is_empty());
}

#[test]
fn rating_distribution_per_payment_method() {
    let dataset = fixture_dataset("supermarket_sales.csv");
    let view = FilteredView::full(&dataset);

    let distributions = distribution_by(&view, Field::Payment, Field::Rating)
        .into_option()
        .unwrap();

    let groups: Vec<&str> = distributions.iter().map(|d| d.group.as_str()).collect();
    assert_eq!(groups, vec!["Ewallet", "Cash", "Credit card"]);

    let ewallet = &distributions[0];
    assert_eq!(ewallet.count, 4);
    assert_close(Some(ewallet.min), 2.5);
    assert_close(Some(ewallet.q1), 2.875);
    assert_close(Some(ewallet.median), 3.75);
    assert_close(Some(ewallet.q3), 4.625);
    assert_close(Some(ewallet.max), 5.0);
    assert_close(Some(ewallet.mean), 3.75);

    let cash = &distributions[1];
    assert_eq!(cash.count, 2);
    assert_close(Some(cash.median), 3.75);
}
