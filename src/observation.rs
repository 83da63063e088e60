//! Data type and methods to store a single reading from a sonde downcast.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use metfor::{Celsius, Meters};
use optional::Optioned;

use crate::keys::{KeyField, KeyValue, Variable};

/// One depth-resolved reading from a sonde downcast.
///
/// Every measured value may be missing. A missing depth marks the row as unusable for coverage,
/// a missing variable value is still a valid sample at its depth. The year and month are always
/// derived from the sample date, so they can never disagree with it.
#[derive(Clone, Debug)]
pub struct Observation {
    // Identification
    site_id: String,
    sample_date: NaiveDate,
    sample_time: Option<NaiveTime>,

    // Vertical coordinate, positive down.
    depth: Optioned<Meters>,

    // Measured variables
    temperature: Optioned<Celsius>,
    salinity: Optioned<f64>,
    ph: Optioned<f64>,
    percent_saturation: Optioned<f64>,
    dissolved_oxygen: Optioned<f64>,
    turbidity: Optioned<f64>,
    chlorophyll: Optioned<f64>,
}

// Missing values are stored as NaN, so compare them as options.
impl PartialEq for Observation {
    fn eq(&self, other: &Self) -> bool {
        self.site_id == other.site_id
            && self.sample_date == other.sample_date
            && self.sample_time == other.sample_time
            && self.depth.into_option() == other.depth.into_option()
            && self.temperature.into_option() == other.temperature.into_option()
            && self.salinity.into_option() == other.salinity.into_option()
            && self.ph.into_option() == other.ph.into_option()
            && self.percent_saturation.into_option() == other.percent_saturation.into_option()
            && self.dissolved_oxygen.into_option() == other.dissolved_oxygen.into_option()
            && self.turbidity.into_option() == other.turbidity.into_option()
            && self.chlorophyll.into_option() == other.chlorophyll.into_option()
    }
}

macro_rules! make_value_setter {
    ($(#[$attr:meta])* => $name:tt, $var:ident) => {
        $(#[$attr])*
        #[inline]
        pub fn $name<T>(mut self, value: T) -> Self
        where
            Optioned<f64>: From<T>,
        {
            self.$var = Optioned::from(value);
            self
        }
    };
}

impl Observation {
    /// Create a new observation with no depth and no measured values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use sonde_profiles::Observation;
    ///
    /// let date = NaiveDate::from_ymd_opt(2017, 6, 3).unwrap();
    /// let obs = Observation::new("P7CBI", date);
    ///
    /// assert_eq!(obs.site_id(), "P7CBI");
    /// assert_eq!(obs.year(), 2017);
    /// assert!(obs.depth().is_none());
    /// ```
    pub fn new<S: Into<String>>(site_id: S, sample_date: NaiveDate) -> Self {
        Observation {
            site_id: site_id.into(),
            sample_date,
            sample_time: None,
            depth: Optioned::none(),
            temperature: Optioned::none(),
            salinity: Optioned::none(),
            ph: Optioned::none(),
            percent_saturation: Optioned::none(),
            dissolved_oxygen: Optioned::none(),
            turbidity: Optioned::none(),
            chlorophyll: Optioned::none(),
        }
    }

    /// Builder method for the time of day the reading was taken.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::{NaiveDate, NaiveTime};
    /// use sonde_profiles::Observation;
    ///
    /// let date = NaiveDate::from_ymd_opt(2017, 6, 3).unwrap();
    /// let time = NaiveTime::from_hms_opt(10, 42, 0).unwrap();
    ///
    /// let obs = Observation::new("P7CBI", date).with_sample_time(time);
    /// assert_eq!(obs.hour(), Some(10));
    ///
    /// let obs = obs.with_sample_time(None);
    /// assert!(obs.hour().is_none());
    /// ```
    #[inline]
    pub fn with_sample_time<T>(mut self, time: T) -> Self
    where
        Option<NaiveTime>: From<T>,
    {
        self.sample_time = Option::from(time);
        self
    }

    /// Builder method for the depth of the reading.
    ///
    /// # Examples
    ///```rust
    /// use chrono::NaiveDate;
    /// use metfor::{Feet, Meters};
    /// use optional::{none, some};
    /// use sonde_profiles::Observation;
    ///
    /// let date = NaiveDate::from_ymd_opt(2017, 6, 3).unwrap();
    ///
    /// let _obs = Observation::new("P7CBI", date).with_depth(Meters(1.5));
    /// let _obs = Observation::new("P7CBI", date).with_depth(some(Meters(1.5)));
    /// let _obs = Observation::new("P7CBI", date).with_depth(Feet(5.0));
    /// let obs = Observation::new("P7CBI", date).with_depth(none::<Meters>());
    /// assert!(obs.depth().is_none());
    ///```
    #[inline]
    pub fn with_depth<T, U>(mut self, value: T) -> Self
    where
        Optioned<U>: From<T>,
        U: optional::Noned + metfor::Length,
        Meters: From<U>,
    {
        let depth: Optioned<U> = Optioned::from(value);
        self.depth = depth.map_t(Meters::from);
        self
    }

    /// Builder method for the water temperature.
    ///
    /// # Examples
    ///```rust
    /// use chrono::NaiveDate;
    /// use metfor::{Celsius, Fahrenheit};
    /// use optional::none;
    /// use sonde_profiles::{Observation, Variable};
    ///
    /// let date = NaiveDate::from_ymd_opt(2017, 6, 3).unwrap();
    ///
    /// let obs = Observation::new("P7CBI", date).with_temperature(Celsius(12.5));
    /// assert_eq!(obs.value(Variable::Temperature).unwrap(), 12.5);
    ///
    /// let _obs = Observation::new("P7CBI", date).with_temperature(Fahrenheit(54.5));
    /// let _obs = Observation::new("P7CBI", date).with_temperature(none::<Celsius>());
    ///```
    #[inline]
    pub fn with_temperature<T, U>(mut self, value: T) -> Self
    where
        Optioned<U>: From<T>,
        U: optional::Noned + metfor::Temperature,
        Celsius: From<U>,
    {
        let temperature: Optioned<U> = Optioned::from(value);
        self.temperature = temperature.map_t(Celsius::from);
        self
    }

    make_value_setter!(
        /// Builder method for the salinity in PSU.
        ///
        /// # Examples
        ///```rust
        /// use chrono::NaiveDate;
        /// use optional::{none, some};
        /// use sonde_profiles::Observation;
        ///
        /// let date = NaiveDate::from_ymd_opt(2017, 6, 3).unwrap();
        ///
        /// let _obs = Observation::new("P7CBI", date).with_salinity(31.2);
        /// let _obs = Observation::new("P7CBI", date).with_salinity(some(31.2));
        /// let _obs = Observation::new("P7CBI", date).with_salinity(none::<f64>());
        ///```
        => with_salinity, salinity
    );

    make_value_setter!(
        /// Builder method for the pH.
        ///
        /// See `with_salinity` for an example of usage.
        => with_ph, ph
    );

    make_value_setter!(
        /// Builder method for the dissolved oxygen percent saturation.
        ///
        /// See `with_salinity` for an example of usage.
        => with_percent_saturation, percent_saturation
    );

    make_value_setter!(
        /// Builder method for the dissolved oxygen concentration in mg/L.
        ///
        /// See `with_salinity` for an example of usage.
        => with_dissolved_oxygen, dissolved_oxygen
    );

    make_value_setter!(
        /// Builder method for the turbidity in FNU. Readings censored below the detection limit
        /// should already have been resolved to a missing value by the loader.
        ///
        /// See `with_salinity` for an example of usage.
        => with_turbidity, turbidity
    );

    make_value_setter!(
        /// Builder method for the chlorophyll concentration in ug/L.
        ///
        /// See `with_salinity` for an example of usage.
        => with_chlorophyll, chlorophyll
    );

    /// Builder method to set any variable by key.
    ///
    /// # Examples
    ///```rust
    /// use chrono::NaiveDate;
    /// use sonde_profiles::{Observation, Variable};
    ///
    /// let date = NaiveDate::from_ymd_opt(2017, 6, 3).unwrap();
    /// let obs = Observation::new("P7CBI", date)
    ///     .with_value(Variable::Turbidity, 2.1)
    ///     .with_value(Variable::Temperature, 11.0);
    ///
    /// assert_eq!(obs.value(Variable::Turbidity).unwrap(), 2.1);
    /// assert_eq!(obs.value(Variable::Temperature).unwrap(), 11.0);
    ///```
    pub fn with_value<T>(self, var: Variable, value: T) -> Self
    where
        Optioned<f64>: From<T>,
    {
        use crate::keys::Variable::*;

        let opt: Optioned<f64> = Optioned::from(value);

        match var {
            Temperature => Observation {
                temperature: opt.map_t(Celsius),
                ..self
            },
            Salinity => Observation {
                salinity: opt,
                ..self
            },
            PH => Observation { ph: opt, ..self },
            PercentSaturation => Observation {
                percent_saturation: opt,
                ..self
            },
            DissolvedOxygen => Observation {
                dissolved_oxygen: opt,
                ..self
            },
            Turbidity => Observation {
                turbidity: opt,
                ..self
            },
            Chlorophyll => Observation {
                chlorophyll: opt,
                ..self
            },
        }
    }

    /// The monitoring site identifier.
    #[inline]
    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    /// The calendar date of the sampling event.
    #[inline]
    pub fn sample_date(&self) -> NaiveDate {
        self.sample_date
    }

    /// The time of day the reading was taken, if recorded.
    #[inline]
    pub fn sample_time(&self) -> Option<NaiveTime> {
        self.sample_time
    }

    /// The year of the sample date.
    #[inline]
    pub fn year(&self) -> i32 {
        self.sample_date.year()
    }

    /// The month of the sample date, 1 - 12.
    #[inline]
    pub fn month(&self) -> u32 {
        self.sample_date.month()
    }

    /// The hour of the sample time, if a time was recorded.
    #[inline]
    pub fn hour(&self) -> Option<u32> {
        self.sample_time.map(|t| t.hour())
    }

    /// Depth of the reading in meters, positive down.
    #[inline]
    pub fn depth(&self) -> Optioned<Meters> {
        self.depth
    }

    /// Water temperature.
    #[inline]
    pub fn temperature(&self) -> Optioned<Celsius> {
        self.temperature
    }

    /// Get the value of a measured variable as a plain number in the variable's units.
    pub fn value(&self, var: Variable) -> Optioned<f64> {
        use crate::keys::Variable::*;
        use metfor::Quantity;

        match var {
            Temperature => self.temperature.map_t(|t| t.unpack()),
            Salinity => self.salinity,
            PH => self.ph,
            PercentSaturation => self.percent_saturation,
            DissolvedOxygen => self.dissolved_oxygen,
            Turbidity => self.turbidity,
            Chlorophyll => self.chlorophyll,
        }
    }

    /// The value of a grouping field for this observation.
    pub fn key_value(&self, field: KeyField) -> KeyValue {
        match field {
            KeyField::Site => KeyValue::Site(self.site_id.clone()),
            KeyField::Year => KeyValue::Year(self.year()),
            KeyField::Month => KeyValue::Month(self.month()),
            KeyField::Date => KeyValue::Date(self.sample_date),
        }
    }
}

// FIXME: only configure for test and doc tests
#[doc(hidden)]
pub mod doctest {
    use super::*;

    /// A single downcast at `site` on `date` with readings every meter from the surface down to
    /// `num_levels - 1` meters.
    pub fn make_test_downcast(site: &str, date: NaiveDate, num_levels: usize) -> Vec<Observation> {
        (0..num_levels)
            .map(|i| {
                let z = i as f64;
                Observation::new(site, date)
                    .with_depth(Meters(z))
                    .with_temperature(Celsius(18.0 - 0.5 * z))
                    .with_salinity(30.0 + 0.1 * z)
                    .with_dissolved_oxygen(9.0 - 0.2 * z)
            })
            .collect()
    }
}
