#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use chrono::NaiveDate;
use metfor::{Celsius, Meters};
use optional::none;
use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
};
use sonde_profiles::Observation;

pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// A downcast with a reading every `step` meters. Percent saturation is only logged on every
/// other level.
pub fn downcast(site: &str, date: NaiveDate, num_levels: usize, step: f64) -> Vec<Observation> {
    (0..num_levels)
        .map(|i| {
            let z = i as f64 * step;
            Observation::new(site, date)
                .with_depth(Meters(z))
                .with_temperature(Celsius(16.0 - z))
                .with_percent_saturation(if i % 2 == 0 { Some(95.0 - z) } else { None })
        })
        .collect()
}

/// A visit where the sonde only logged one row with a depth.
pub fn failed_downcast(site: &str, date: NaiveDate) -> Vec<Observation> {
    vec![
        Observation::new(site, date)
            .with_depth(Meters(0.2))
            .with_temperature(Celsius(17.0)),
        Observation::new(site, date)
            .with_depth(none::<Meters>())
            .with_temperature(Celsius(16.5)),
    ]
}

/// Several years of data at three sites with very different sampling effort.
pub fn survey() -> Vec<Observation> {
    let mut obs = vec![];

    // Monthly visits spring through fall at P7CBI, 2015 through 2019.
    for year in 2015..=2019 {
        for month in 4..=10 {
            obs.extend(downcast("P7CBI", ymd(year, month, 12), 8, 1.0));
        }
        obs.extend(failed_downcast("P7CBI", ymd(year, 11, 30)));
    }

    // A handful of visits at P6BRS.
    obs.extend(downcast("P6BRS", ymd(2017, 6, 2), 5, 2.0));
    obs.extend(downcast("P6BRS", ymd(2018, 6, 9), 5, 2.0));
    obs.extend(failed_downcast("P6BRS", ymd(2019, 6, 1)));

    // One-off visit.
    obs.extend(failed_downcast("P2XYZ", ymd(2016, 8, 8)));

    obs
}

#[derive(Debug, Default)]
pub struct Recording {
    pub circles: Vec<(BackendCoord, (u8, u8, u8))>,
    pub texts: Vec<String>,
}

/// A backend that draws nothing and remembers the circles and text it was asked to draw.
pub struct RecordingBackend {
    size: (u32, u32),
    log: Rc<RefCell<Recording>>,
}

impl RecordingBackend {
    pub fn new(size: (u32, u32)) -> (Self, Rc<RefCell<Recording>>) {
        let log = Rc::new(RefCell::new(Recording::default()));
        (
            RecordingBackend {
                size,
                log: Rc::clone(&log),
            },
            log,
        )
    }
}

impl DrawingBackend for RecordingBackend {
    type ErrorType = std::io::Error;

    fn get_size(&self) -> (u32, u32) {
        self.size
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        Ok(())
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        Ok(())
    }

    fn draw_pixel(
        &mut self,
        _point: BackendCoord,
        _color: BackendColor,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        Ok(())
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        _upper_left: BackendCoord,
        _bottom_right: BackendCoord,
        _style: &S,
        _fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        Ok(())
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        _radius: u32,
        style: &S,
        _fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.log
            .borrow_mut()
            .circles
            .push((center, style.color().rgb));
        Ok(())
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        _style: &TStyle,
        _pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.log.borrow_mut().texts.push(text.to_owned());
        Ok(())
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        _style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Self::ErrorType>> {
        Ok((text.chars().count() as u32 * 7, 12))
    }
}
