//! API versions used to gate entries (`since`).

use std::fmt;
use std::str::FromStr;

use crate::error::SpecError;

/// A dotted `major.minor.patch` version. Missing components are zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "interchange", derive(serde::Deserialize))]
#[cfg_attr(feature = "interchange", serde(try_from = "String"))]
pub struct ApiVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ApiVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for ApiVersion {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SpecError::InvalidVersion(s.to_string());
        let mut parts = [0u32; 3];
        let mut count = 0;
        for part in s.trim().split('.') {
            if count == parts.len() {
                return Err(invalid());
            }
            parts[count] = part.parse().map_err(|_| invalid())?;
            count += 1;
        }
        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}

impl TryFrom<String> for ApiVersion {
    type Error = SpecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("6", ApiVersion::new(6, 0, 0))]
    #[case("6.4", ApiVersion::new(6, 4, 0))]
    #[case(" 1.2.3 ", ApiVersion::new(1, 2, 3))]
    fn test_parse_version(#[case] text: &str, #[case] expected: ApiVersion) {
        assert_eq!(text.parse::<ApiVersion>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("1.x")]
    #[case("1.2.3.4")]
    fn test_reject_bad_version(#[case] text: &str) {
        assert!(text.parse::<ApiVersion>().is_err());
    }

    #[test]
    fn test_versions_order() {
        assert!(ApiVersion::new(6, 2, 0) < ApiVersion::new(6, 10, 0));
    }
}
