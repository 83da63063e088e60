//! Data used in tests.

use chrono::NaiveDate;
use metfor::{Celsius, Meters};
use optional::none;

use crate::observation::{doctest::make_test_downcast, Observation};

pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Two full downcasts and one visit with a single usable depth at P7CBI in 2017.
pub fn p7cbi_2017() -> Vec<Observation> {
    let mut obs = make_test_downcast("P7CBI", ymd(2017, 5, 2), 3);
    obs.extend(make_test_downcast("P7CBI", ymd(2017, 6, 14), 3));
    obs.extend(single_reading_site("P7CBI", ymd(2017, 8, 9)));
    obs
}

/// A visit where only one row has a depth, the others are blank rows from the sonde log.
pub fn single_reading_site(site: &str, date: NaiveDate) -> Vec<Observation> {
    vec![
        Observation::new(site, date)
            .with_depth(Meters(0.5))
            .with_temperature(Celsius(15.0)),
        Observation::new(site, date)
            .with_depth(none::<Meters>())
            .with_temperature(Celsius(14.0)),
        Observation::new(site, date).with_salinity(31.0),
    ]
}

/// Site A has 6 good events from 2015 through 2017 plus one bad one, site B has 2 good events in
/// 2018, and site C never has more than one depth per visit.
pub fn multi_site_multi_year() -> Vec<Observation> {
    let mut obs = vec![];

    for &year in &[2015, 2016, 2017] {
        obs.extend(make_test_downcast("A", ymd(year, 4, 10), 4));
        obs.extend(make_test_downcast("A", ymd(year, 9, 22), 6));
    }
    obs.extend(single_reading_site("A", ymd(2017, 11, 2)));

    obs.extend(make_test_downcast("B", ymd(2018, 7, 1), 5));
    obs.extend(make_test_downcast("B", ymd(2018, 7, 30), 2));

    obs.extend(single_reading_site("C", ymd(2016, 2, 3)));
    obs.extend(single_reading_site("C", ymd(2019, 2, 3)));

    obs
}
