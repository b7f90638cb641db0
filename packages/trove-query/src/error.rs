pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Validation failures that abort a compilation. Every other malformed criteria is dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error(
		"Invalid date format for {property}: '{value}'. Expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS[.sss]Z."
	)]
	InvalidDateFormat { property: String, value: String },
	#[error("Invalid date for {property}: '{value}' is not a real calendar date or time.")]
	InvalidDate { property: String, value: String },
}
