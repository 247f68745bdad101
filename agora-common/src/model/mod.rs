pub mod post;
pub mod reply;
pub mod vote;

use serde::{Deserialize, Serialize};
use std::{fmt::Display, marker::PhantomData};
use thiserror::Error;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Error)]
pub enum ModelValidationError {
    #[error("Counter {name} held a negative value: {value}")]
    NegativeCounter { name: &'static str, value: i64 },
    #[error("Id held a non-positive value: {0}")]
    NonPositiveId(i64),
}

/// Row id assigned by the database. The marker keeps post and reply ids apart.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Id<Marker>(u64, #[serde(skip)] PhantomData<Marker>);

impl<Marker> Id<Marker> {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id, PhantomData)
    }

    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl<Marker> Display for Id<Marker> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<Marker> From<u64> for Id<Marker> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl<Marker> From<Id<Marker>> for u64 {
    fn from(value: Id<Marker>) -> Self {
        value.get()
    }
}

impl<Marker> TryFrom<i64> for Id<Marker> {
    type Error = ModelValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match u64::try_from(value) {
            Ok(id) if id > 0 => Ok(Self::new(id)),
            _ => Err(ModelValidationError::NonPositiveId(value)),
        }
    }
}

/// Converts a stored counter column, rejecting negative values.
pub fn counter(name: &'static str, value: i64) -> Result<u64, ModelValidationError> {
    u64::try_from(value).map_err(|_| ModelValidationError::NegativeCounter { name, value })
}
