//! Strongly-typed value objects used by the list-query core and the ledger.
//!
//! These wrappers enforce basic invariants (positive identifiers, 1-based
//! pages, supported page sizes) so that once a value reaches the domain layer
//! it can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page sizes a list view may switch between.
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [10, 20, 50, 100];

/// Page size used when the caller does not supply one.
pub const DEFAULT_ITEMS_PER_PAGE: u32 = 20;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided page number is zero or negative.
    #[error("page must be greater than zero")]
    NonPositivePage,
    /// Provided page size is not one of [`PAGE_SIZE_OPTIONS`].
    #[error("unsupported page size: {0}")]
    UnsupportedPageSize(u32),
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
        )]
        #[serde(try_from = "i32", into = "i32")]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl FromStr for $name {
            type Err = TypeConstraintError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| TypeConstraintError::InvalidValue(s.to_string()))?;
                Self::new(value)
            }
        }
    };
}

id_newtype!(PayoutId, "Unique identifier for a payout.");
id_newtype!(SellerId, "Unique identifier for a seller account.");

/// 1-based page number.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u32", into = "u32")]
pub struct Page(u32);

impl Page {
    pub const FIRST: Page = Page(1);

    /// Creates a page number, rejecting zero.
    pub fn new(value: u32) -> Result<Self, TypeConstraintError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NonPositivePage)
        }
    }

    /// Clamps any integer onto the first page when it is not positive.
    pub fn clamped(value: i64) -> Self {
        let value = value.clamp(1, i64::from(u32::MAX));
        Self(u32::try_from(value).unwrap_or(u32::MAX))
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Number of records preceding this page.
    pub fn offset(self, page_size: PageSize) -> usize {
        (self.0 as usize - 1) * page_size.get() as usize
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::FIRST
    }
}

impl Display for Page {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Page {
    type Error = TypeConstraintError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Page> for u32 {
    fn from(value: Page) -> Self {
        value.0
    }
}

/// Number of records per page, restricted to [`PAGE_SIZE_OPTIONS`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageSize(u32);

impl PageSize {
    /// Validates the page size against the supported options.
    pub fn new(value: u32) -> Result<Self, TypeConstraintError> {
        if PAGE_SIZE_OPTIONS.contains(&value) {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::UnsupportedPageSize(value))
        }
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(DEFAULT_ITEMS_PER_PAGE)
    }
}

impl Display for PageSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for PageSize {
    type Error = TypeConstraintError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageSize> for u32 {
    fn from(value: PageSize) -> Self {
        value.0
    }
}

/// Direction of the single active sort key.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Returns the opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_clamps_non_positive_values() {
        assert_eq!(Page::clamped(0).get(), 1);
        assert_eq!(Page::clamped(-7).get(), 1);
        assert_eq!(Page::clamped(4).get(), 4);
        assert_eq!(Page::new(0), Err(TypeConstraintError::NonPositivePage));
    }

    #[test]
    fn page_size_accepts_only_known_options() {
        assert_eq!(PageSize::new(50).map(PageSize::get), Ok(50));
        assert_eq!(
            PageSize::new(33),
            Err(TypeConstraintError::UnsupportedPageSize(33))
        );
        assert_eq!(PageSize::default().get(), DEFAULT_ITEMS_PER_PAGE);
    }

    #[test]
    fn page_offset_uses_page_size() {
        let size = PageSize::new(10).expect("valid page size");
        assert_eq!(Page::FIRST.offset(size), 0);
        assert_eq!(Page::clamped(3).offset(size), 20);
    }

    #[test]
    fn ids_reject_non_positive_values() {
        assert!(SellerId::new(0).is_err());
        assert_eq!("12".parse::<PayoutId>().map(PayoutId::get), Ok(12));
        assert!("abc".parse::<PayoutId>().is_err());
    }

    #[test]
    fn sort_direction_parses_and_toggles() {
        assert_eq!("DESC".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert_eq!(SortDirection::Asc.toggled(), SortDirection::Desc);
        assert!("sideways".parse::<SortDirection>().is_err());
    }
}
