//! Coverage statistics: which sites, years, and dates hold enough downcasts to be worth plotting.
//!
//! A sampling event is every observation sharing a site and a sample date. An event *succeeded*
//! when more than one of its observations has a depth; a lone depth reading is noise, not a
//! profile. Coverage counts succeeded events, grouping by whatever coarser key the caller asks
//! for.
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use chrono::NaiveDate;
use itertools::Itertools;
use log::{debug, trace};

use crate::{
    keys::{GroupKey, KeyField, KeyValue},
    observation::Observation,
};

/// Decide if a group of observations forms a real profile.
///
/// Returns `true` if strictly more than one observation has a depth. Empty groups did not succeed.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use metfor::Meters;
/// use sonde_profiles::{coverage::event_succeeded, Observation};
///
/// let date = NaiveDate::from_ymd_opt(2017, 6, 3).unwrap();
/// let one = vec![Observation::new("P7CBI", date).with_depth(Meters(0.5))];
/// let two = vec![
///     Observation::new("P7CBI", date).with_depth(Meters(0.5)),
///     Observation::new("P7CBI", date).with_depth(Meters(1.5)),
/// ];
///
/// assert!(!event_succeeded(&[]));
/// assert!(!event_succeeded(&one));
/// assert!(event_succeeded(&two));
/// ```
pub fn event_succeeded<'a, I>(observations: I) -> bool
where
    I: IntoIterator<Item = &'a Observation>,
{
    observations
        .into_iter()
        .filter(|obs| obs.depth().is_some())
        .nth(1)
        .is_some()
}

/// Count succeeded groups.
///
/// Observations are grouped by the full tuple of `keys`, the finest grain, and `event_succeeded`
/// is applied to each of those groups. The results are then counted per coarser key, which is
/// `keys` without its last field. Grouping by `[Site, Year, Date]` counts successful sampling
/// dates per site and year.
///
/// Every coarse key present in the input is in the table, even if none of its finer groups
/// succeeded. With an empty `keys` all observations form a single group.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use sonde_profiles::{
///     coverage::compute_coverage, observation::doctest::make_test_downcast, KeyField,
/// };
///
/// let date = NaiveDate::from_ymd_opt(2017, 6, 3).unwrap();
/// let mut obs = make_test_downcast("P7CBI", date, 5);
/// obs.extend(make_test_downcast("P6BRS", date, 1));
///
/// let table = compute_coverage(&obs, &[KeyField::Site, KeyField::Date]);
///
/// assert_eq!(table.count_for(vec!["P7CBI".into()]), Some(1));
/// assert_eq!(table.count_for(vec!["P6BRS".into()]), Some(0));
/// ```
pub fn compute_coverage(observations: &[Observation], keys: &[KeyField]) -> CoverageTable {
    let coarse_fields = keys[..keys.len().saturating_sub(1)].to_vec();

    let mut counts: BTreeMap<GroupKey, usize> = BTreeMap::new();

    observations
        .iter()
        .map(|obs| (group_key(obs, keys), obs))
        .into_group_map()
        .into_iter()
        .for_each(|(key, group)| {
            let succeeded = event_succeeded(group.iter().copied());
            trace!("{} with {} rows succeeded: {}", key, group.len(), succeeded);

            let count = counts.entry(key.parent()).or_insert(0);
            if succeeded {
                *count += 1;
            }
        });

    debug!(
        "Coverage by {:?}: {} groups from {} observations.",
        coarse_fields,
        counts.len(),
        observations.len()
    );

    CoverageTable {
        fields: coarse_fields,
        counts,
    }
}

/// Find sites sampled often enough, over all years combined, to support a seasonal plot.
///
/// Returns every site with strictly more than `threshold` successful sampling dates. An empty
/// set means no site qualifies and no further graphical analysis is possible.
pub fn select_preferred_sites(observations: &[Observation], threshold: usize) -> BTreeSet<String> {
    let sites: BTreeSet<String> = compute_coverage(observations, &[KeyField::Site, KeyField::Date])
        .above(threshold)
        .filter_map(|(key, _)| match key.values().first() {
            Some(KeyValue::Site(site)) => Some(site.clone()),
            _ => None,
        })
        .collect();

    if sites.is_empty() {
        debug!("No site has more than {} sampling events.", threshold);
    }

    sites
}

/// Keep observations from one of `sites` sampled in a year strictly after `min_year`.
///
/// The relative order of the input is preserved.
pub fn restrict_to_sites_and_years(
    observations: &[Observation],
    sites: &BTreeSet<String>,
    min_year: i32,
) -> Vec<Observation> {
    observations
        .iter()
        .filter(|obs| obs.year() > min_year && sites.contains(obs.site_id()))
        .cloned()
        .collect()
}

/// The dates of each site's successful sampling events.
///
/// Sites without a single successful event map to an empty set.
pub fn sampling_dates(observations: &[Observation]) -> BTreeMap<String, BTreeSet<NaiveDate>> {
    let mut dates: BTreeMap<String, BTreeSet<NaiveDate>> = BTreeMap::new();

    observations
        .iter()
        .map(|obs| ((obs.site_id(), obs.sample_date()), obs))
        .into_group_map()
        .into_iter()
        .for_each(|((site, date), group)| {
            let site_dates = dates.entry(site.to_owned()).or_default();
            if event_succeeded(group) {
                site_dates.insert(date);
            }
        });

    dates
}

fn group_key(obs: &Observation, keys: &[KeyField]) -> GroupKey {
    GroupKey::new(keys.iter().map(|&field| obs.key_value(field)).collect())
}

/// Counts of succeeded finer grained groups, keyed by the coarser group they belong to.
///
/// The table is ordered by key, so iterating it is reproducible for identical input regardless of
/// the order the observations came in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CoverageTable {
    fields: Vec<KeyField>,
    counts: BTreeMap<GroupKey, usize>,
}

impl CoverageTable {
    /// The fields making up the keys of this table, coarsest first.
    #[inline]
    pub fn fields(&self) -> &[KeyField] {
        &self.fields
    }

    /// Look up the count for a key. `None` means the group was not in the input at all.
    #[inline]
    pub fn get(&self, key: &GroupKey) -> Option<usize> {
        self.counts.get(key).copied()
    }

    /// Convenience for `get` that builds the key from its values.
    #[inline]
    pub fn count_for(&self, values: Vec<KeyValue>) -> Option<usize> {
        self.get(&GroupKey::new(values))
    }

    /// Iterate over keys and counts in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, usize)> {
        self.counts.iter().map(|(key, &count)| (key, count))
    }

    /// Number of groups in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if there were no observations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of the counts over all groups.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Groups with a count strictly greater than `threshold`.
    pub fn above(&self, threshold: usize) -> impl Iterator<Item = (&GroupKey, usize)> {
        self.iter().filter(move |&(_, count)| count > threshold)
    }

    /// Groups with a count less than or equal to `threshold`, including those that never
    /// succeeded.
    pub fn undersampled(&self, threshold: usize) -> impl Iterator<Item = (&GroupKey, usize)> {
        self.iter().filter(move |&(_, count)| count <= threshold)
    }
}

impl fmt::Display for CoverageTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const WIDTH: usize = 12;

        for field in &self.fields {
            write!(f, "{:<width$}", field.to_string(), width = WIDTH)?;
        }
        writeln!(f, "{:>6}", "count")?;

        for (key, count) in self.iter() {
            for val in key.values() {
                write!(f, "{:<width$}", val.to_string(), width = WIDTH)?;
            }
            writeln!(f, "{:>6}", count)?;
        }

        Ok(())
    }
}
