//! Column type descriptors.
//!
//! SQLite does not enforce declared types, instead every declared type name maps
//! onto one of five storage affinities.

/// Size arguments following the type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSize {
	/// `NAME(n)`
	Length(u32),
	/// `NAME(p, s)`
	Precision(u32, u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Affinity {
	Integer,
	Text,
	Blob,
	Real,
	Numeric,
}

/// Declared type of a column, rendered verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnType {
	pub name: String,
	pub size: Option<TypeSize>,
}
impl ColumnType {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			size: None,
		}
	}
	pub fn integer() -> Self {
		Self::new("INTEGER")
	}
	pub fn text() -> Self {
		Self::new("TEXT")
	}
	pub fn real() -> Self {
		Self::new("REAL")
	}
	pub fn blob() -> Self {
		Self::new("BLOB")
	}
	pub fn numeric() -> Self {
		Self::new("NUMERIC")
	}

	pub fn with_length(mut self, length: u32) -> Self {
		self.size = Some(TypeSize::Length(length));
		self
	}
	pub fn with_precision(mut self, precision: u32, scale: u32) -> Self {
		self.size = Some(TypeSize::Precision(precision, scale));
		self
	}

	/// Rules are checked in order, so `CHARINT` has integer affinity.
	pub fn affinity(&self) -> Affinity {
		let name = self.name.to_ascii_uppercase();
		if name.contains("INT") {
			Affinity::Integer
		} else if ["CHAR", "CLOB", "TEXT"].iter().any(|t| name.contains(t)) {
			Affinity::Text
		} else if name.contains("BLOB") || name.trim().is_empty() {
			Affinity::Blob
		} else if ["REAL", "FLOA", "DOUB"].iter().any(|t| name.contains(t)) {
			Affinity::Real
		} else {
			Affinity::Numeric
		}
	}

	/// `INTEGER PRIMARY KEY` columns alias the rowid, which only happens for this exact spelling.
	pub fn is_exact_integer(&self) -> bool {
		self.size.is_none() && self.name.trim().eq_ignore_ascii_case("INTEGER")
	}
}
