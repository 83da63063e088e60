//! Enums used as keys for selecting variables and grouping observations.
use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::{AnalysisError, Result};

/// The measured variables recorded by the sonde on a downcast.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Variable {
    /// Water temperature (C)
    Temperature,
    /// Salinity (PSU)
    Salinity,
    /// pH
    #[strum(serialize = "ph")]
    PH,
    /// Dissolved oxygen percent saturation (%)
    PercentSaturation,
    /// Dissolved oxygen concentration (mg/L)
    DissolvedOxygen,
    /// Turbidity (FNU)
    Turbidity,
    /// Chlorophyll (ug/L)
    Chlorophyll,
}

impl Variable {
    /// Parse a variable from its snake_case name, e.g. `"dissolved_oxygen"`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sonde_profiles::{AnalysisError, Variable};
    ///
    /// assert_eq!(Variable::from_name("ph").unwrap(), Variable::PH);
    /// assert_eq!(
    ///     Variable::from_name("pressure").unwrap_err(),
    ///     AnalysisError::InvalidVariable("pressure".to_owned())
    /// );
    /// ```
    pub fn from_name(name: &str) -> Result<Self> {
        Variable::from_str(name.trim()).map_err(|_| AnalysisError::InvalidVariable(name.to_owned()))
    }

    /// A human readable label including units, suitable for a legend.
    pub fn label(self) -> &'static str {
        use self::Variable::*;

        match self {
            Temperature => "Temperature (°C)",
            Salinity => "Salinity (PSU)",
            PH => "pH",
            PercentSaturation => "DO saturation (%)",
            DissolvedOxygen => "Dissolved oxygen (mg/L)",
            Turbidity => "Turbidity (FNU)",
            Chlorophyll => "Chlorophyll (µg/L)",
        }
    }
}

/// Fields observations can be grouped by when computing coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum KeyField {
    /// Monitoring site identifier.
    Site,
    /// Calendar year of the sample date.
    Year,
    /// Calendar month of the sample date.
    Month,
    /// The sample date itself. One site and date is one sampling event.
    Date,
}

impl KeyField {
    /// Parse a key field from its name.
    pub fn from_name(name: &str) -> Result<Self> {
        KeyField::from_str(name.trim()).map_err(|_| AnalysisError::InvalidKeyField(name.to_owned()))
    }
}

/// The value of a single `KeyField` for one observation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyValue {
    /// Monitoring site identifier.
    Site(String),
    /// Calendar year.
    Year(i32),
    /// Calendar month, 1 - 12.
    Month(u32),
    /// Sample date.
    Date(NaiveDate),
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Site(site) => write!(f, "{}", site),
            KeyValue::Year(year) => write!(f, "{}", year),
            KeyValue::Month(month) => write!(f, "{:02}", month),
            KeyValue::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for KeyValue {
    fn from(site: &str) -> Self {
        KeyValue::Site(site.to_owned())
    }
}

impl From<i32> for KeyValue {
    fn from(year: i32) -> Self {
        KeyValue::Year(year)
    }
}

impl From<NaiveDate> for KeyValue {
    fn from(date: NaiveDate) -> Self {
        KeyValue::Date(date)
    }
}

/// An ordered tuple of key values identifying one group of observations.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey(Vec<KeyValue>);

impl GroupKey {
    /// Create a key from its values, coarsest first.
    pub fn new(values: Vec<KeyValue>) -> Self {
        GroupKey(values)
    }

    /// The values in this key, coarsest first.
    #[inline]
    pub fn values(&self) -> &[KeyValue] {
        &self.0
    }

    /// The number of fields in this key.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the key of the single group formed when grouping by no fields at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The key with its finest (last) value removed.
    pub fn parent(&self) -> GroupKey {
        let n = self.0.len().saturating_sub(1);
        GroupKey(self.0[..n].to_vec())
    }
}

impl From<Vec<KeyValue>> for GroupKey {
    fn from(values: Vec<KeyValue>) -> Self {
        GroupKey(values)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "(all)");
        }

        for (i, val) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}", val)?;
        }
        Ok(())
    }
}
