use regex::Regex;
use time::{Date, PrimitiveDateTime, macros::format_description};

use crate::{Error, Result};

const DATE_PATTERN: &str = r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$";
const DATETIME_PATTERN: &str =
	r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(\.[0-9]{3})?Z$";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shape {
	Date,
	DateTime,
}
impl Shape {
	fn detect(value: &str) -> Option<Self> {
		if matches(DATE_PATTERN, value) {
			Some(Self::Date)
		} else if matches(DATETIME_PATTERN, value) {
			Some(Self::DateTime)
		} else {
			None
		}
	}

	fn parses(self, value: &str) -> bool {
		match self {
			Self::Date => Date::parse(value, format_description!("[year]-[month]-[day]")).is_ok(),
			Self::DateTime => PrimitiveDateTime::parse(
				value,
				format_description!(
					"[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond digits:3]]]Z"
				),
			)
			.is_ok(),
		}
	}
}

/// Accepts `YYYY-MM-DD` or `YYYY-MM-DDThh:mm:ss[.sss]Z` naming a real point in time.
///
/// Relative expressions such as `TODAY-7` are rejected, not expanded.
pub fn validate_iso_date<'a>(value: &'a str, property: &str) -> Result<&'a str> {
	let Some(shape) = Shape::detect(value) else {
		return Err(Error::InvalidDateFormat {
			property: property.to_string(),
			value: value.to_string(),
		});
	};

	if !shape.parses(value) {
		return Err(Error::InvalidDate { property: property.to_string(), value: value.to_string() });
	}

	Ok(value)
}

fn matches(pattern: &str, value: &str) -> bool {
	Regex::new(pattern).map(|re| re.is_match(value)).unwrap_or(false)
}
