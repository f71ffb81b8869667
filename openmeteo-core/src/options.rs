//! Ordered, duplicate-free selections of vocabulary members.

use std::ops::Index;

use crate::{
    error::ParameterError,
    params::{
        AirQualityHourlyParameter, CurrentParameter, DailyParameter, HourlyParameter,
        Minutely15Parameter, Parameter, WeatherModel,
    },
};

pub type CurrentOptions = OptionSet<CurrentParameter>;
pub type HourlyOptions = OptionSet<HourlyParameter>;
pub type DailyOptions = OptionSet<DailyParameter>;
pub type Minutely15Options = OptionSet<Minutely15Parameter>;
pub type WeatherModelOptions = OptionSet<WeatherModel>;
pub type AirQualityHourlyOptions = OptionSet<AirQualityHourlyParameter>;

/// Parameters selected for one field of a request.
///
/// Iteration follows insertion order. A value is never stored twice: adding
/// one that is already present is a no-op, and [`OptionSet::set`] refuses to
/// create a second copy. The vocabularies are small, so membership is a
/// linear scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSet<P> {
    params: Vec<P>,
}

impl<P> Default for OptionSet<P> {
    fn default() -> Self {
        Self { params: Vec::new() }
    }
}

impl<P: Parameter> OptionSet<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh set holding every member of the vocabulary, in declaration order.
    pub fn all() -> Self {
        P::all().iter().copied().collect()
    }

    /// Append `param` unless it is already selected.
    pub fn add(&mut self, param: P) {
        if self.contains(param) {
            return;
        }
        self.params.push(param);
    }

    /// Add a parameter by its wire name.
    pub fn add_name(&mut self, name: &str) -> Result<(), ParameterError> {
        let param = name.parse::<P>()?;
        self.add(param);
        Ok(())
    }

    /// Remove `param`, returning whether it was present.
    pub fn remove(&mut self, param: P) -> bool {
        match self.position(param) {
            Some(index) => {
                self.params.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn remove_name(&mut self, name: &str) -> Result<bool, ParameterError> {
        let param = name.parse::<P>()?;
        Ok(self.remove(param))
    }

    pub fn contains(&self, param: P) -> bool {
        self.params.contains(&param)
    }

    /// Membership by wire name; names outside the vocabulary are never contained.
    pub fn contains_name(&self, name: &str) -> bool {
        name.parse::<P>().is_ok_and(|param| self.contains(param))
    }

    pub fn clear(&mut self) {
        self.params.clear();
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<P> {
        self.params.get(index).copied()
    }

    /// Replace the parameter at `index`, returning the old one.
    ///
    /// Fails if `index` is out of range or if `param` already sits at another
    /// position.
    pub fn set(&mut self, index: usize, param: P) -> Result<P, ParameterError> {
        let len = self.params.len();
        if index >= len {
            return Err(ParameterError::IndexOutOfRange { index, len });
        }
        match self.position(param) {
            Some(position) if position != index => Err(ParameterError::Duplicate {
                name: param.as_str(),
                position,
            }),
            _ => Ok(std::mem::replace(&mut self.params[index], param)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = P> + '_ {
        self.params.iter().copied()
    }

    /// Comma-joined wire names, in iteration order.
    pub fn to_query_value(&self) -> String {
        let names: Vec<&str> = self.iter().map(|p| p.as_str()).collect();
        names.join(",")
    }

    fn position(&self, param: P) -> Option<usize> {
        self.params.iter().position(|p| *p == param)
    }
}

impl<P: Parameter> Index<usize> for OptionSet<P> {
    type Output = P;

    fn index(&self, index: usize) -> &P {
        &self.params[index]
    }
}

impl<P: Parameter> Extend<P> for OptionSet<P> {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        for param in iter {
            self.add(param);
        }
    }
}

impl<P: Parameter> FromIterator<P> for OptionSet<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<P: Parameter, const N: usize> From<[P; N]> for OptionSet<P> {
    fn from(params: [P; N]) -> Self {
        params.into_iter().collect()
    }
}

impl<'a, P: Parameter> IntoIterator for &'a OptionSet<P> {
    type Item = P;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter().copied()
    }
}
