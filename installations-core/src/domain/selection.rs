use serde::{Serialize, Serializer};

/// Selector value meaning "no filter on this dimension".
pub const ALL: &str = "All";

/// One dropdown's current value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selector {
    #[default]
    All,
    Value(String),
}

impl Selector {
    /// Blank or absent input and the literal `All` both mean no filter.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::All,
            Some(v) if v == ALL => Self::All,
            Some(v) => Self::Value(v.to_string()),
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Value(v) => Some(v),
        }
    }

    pub fn as_str(&self) -> &str {
        self.value().unwrap_or(ALL)
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// `All` matches anything, including a missing candidate.
    pub fn matches(&self, candidate: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Value(v) => candidate == Some(v.as_str()),
        }
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The dashboard's only state: the three dropdown values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Selection {
    pub year: Selector,
    pub province: Selector,
    pub district: Selector,
}

impl Selection {
    pub fn new(year: Selector, province: Selector, district: Selector) -> Self {
        Self {
            year,
            province,
            district,
        }
    }

    pub fn set_year(&mut self, year: Selector) {
        self.year = year;
    }

    pub fn set_province(&mut self, province: Selector) {
        self.province = province;
    }

    pub fn set_district(&mut self, district: Selector) {
        self.district = district;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_unfiltered(&self) -> bool {
        self.year.is_all() && self.province.is_all() && self.district.is_all()
    }
}
