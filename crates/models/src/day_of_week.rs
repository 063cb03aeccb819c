use chrono::Weekday;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as DeError};
use std::fmt::{Display, Formatter, Result as FmtResult};

#[cfg(feature = "database")]
use sea_orm::entity::prelude::*;

/// Day a lesson takes place on, stored and serialized as its index
/// (Monday = 0 through Sunday = 6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "database", derive(EnumIter, DeriveActiveEnum))]
#[cfg_attr(
    feature = "database",
    sea_orm(rs_type = "i16", db_type = "SmallInteger")
)]
pub enum DayOfWeek {
    #[cfg_attr(feature = "database", sea_orm(num_value = 0))]
    Monday,
    #[cfg_attr(feature = "database", sea_orm(num_value = 1))]
    Tuesday,
    #[cfg_attr(feature = "database", sea_orm(num_value = 2))]
    Wednesday,
    #[cfg_attr(feature = "database", sea_orm(num_value = 3))]
    Thursday,
    #[cfg_attr(feature = "database", sea_orm(num_value = 4))]
    Friday,
    #[cfg_attr(feature = "database", sea_orm(num_value = 5))]
    Saturday,
    #[cfg_attr(feature = "database", sea_orm(num_value = 6))]
    Sunday,
}

impl DayOfWeek {
    /// All days in week order
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        // num_days_from_monday is always 0..=6
        Self::ALL[weekday.num_days_from_monday() as usize]
    }
}

impl TryFrom<u8> for DayOfWeek {
    type Error = u8;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or(index)
    }
}

impl Display for DayOfWeek {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

impl Serialize for DayOfWeek {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.index())
    }
}

impl<'de> Deserialize<'de> for DayOfWeek {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let index = u8::deserialize(deserializer)?;
        Self::try_from(index)
            .map_err(|index| D::Error::custom(format!("day of week out of range: {index}")))
    }
}
