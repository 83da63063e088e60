use chrono::{Datelike, Duration, NaiveDate};
use metfor::{Celsius, Meters};
use sonde_profiles::Observation;

/// Ten sites sampled every other week for ten years, with every fifth visit only getting a
/// surface reading.
pub fn synthetic_survey() -> Vec<Observation> {
    let mut obs = vec![];

    for site in 0..10 {
        let site_id = format!("S{:02}", site);
        let mut date = NaiveDate::from_ymd_opt(2010, 1, 4).unwrap();

        for visit in 0..260 {
            let levels = if visit % 5 == 0 { 1 } else { 20 };
            let season = (date.ordinal() as f64 / 365.0 * std::f64::consts::PI * 2.0).cos();

            for level in 0..levels {
                let z = level as f64 * 0.5;
                let oxygen = if level % 7 == 3 {
                    None
                } else {
                    Some(8.0 - 0.1 * z)
                };

                obs.push(
                    Observation::new(site_id.as_str(), date)
                        .with_depth(Meters(z))
                        .with_temperature(Celsius(14.0 - 4.0 * season - 0.3 * z))
                        .with_salinity(30.0 + 0.05 * z)
                        .with_dissolved_oxygen(oxygen),
                );
            }

            date += Duration::days(14);
        }
    }

    obs
}

/// All the observations for one site and year.
pub fn site_year(obs: &[Observation], site: &str, year: i32) -> Vec<Observation> {
    obs.iter()
        .filter(|o| o.site_id() == site && o.year() == year)
        .cloned()
        .collect()
}
