use derivative::Derivative;

use crate::{
	column_type::{Affinity, ColumnType},
	constraint::ColumnConstraint,
	Describable, Lang,
};

/// `column-name [column-type] [constraint ...]`
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
	pub name: String,
	/// Untyped column if `None`.
	pub ty: Option<ColumnType>,
	pub constraints: Vec<ColumnConstraint>,
}
impl ColumnDef {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			ty: None,
			constraints: vec![],
		}
	}
	pub fn affinity(&self) -> Affinity {
		self.ty.as_ref().map_or(Affinity::Blob, ColumnType::affinity)
	}
	pub fn is_primary_key(&self) -> bool {
		self.constraints.iter().any(ColumnConstraint::is_primary_key)
	}
	/// The first DEFAULT constraint's value, if any.
	pub fn as_default(&self) -> Option<&crate::sql::Sql> {
		self.constraints.iter().find_map(ColumnConstraint::as_default)
	}
}

/// Fluent builder owning a single [`ColumnDef`].
///
/// The name is fixed at construction, the type is last-write-wins, and constraints are only ever
/// appended in call order. Nothing is validated here.
///
/// ```
/// use sqlweave_syntax::{ColumnConstraint, ColumnDefBuilder, ColumnType};
///
/// let column = ColumnDefBuilder::new("id")
/// 	.with_type(ColumnType::integer())
/// 	.by_adding_constraint(ColumnConstraint::primary_key())
/// 	.by_adding_constraints([ColumnConstraint::not_null()]);
/// assert_eq!(column.node().constraints.len(), 2);
/// ```
#[derive(Derivative, Clone, PartialEq)]
#[derivative(Debug = "transparent")]
pub struct ColumnDefBuilder(ColumnDef);
impl ColumnDefBuilder {
	pub fn new(name: impl Into<String>) -> Self {
		Self(ColumnDef::new(name))
	}

	pub fn with_type(mut self, ty: ColumnType) -> Self {
		self.0.ty = Some(ty);
		self
	}
	pub fn by_adding_constraint(mut self, constraint: ColumnConstraint) -> Self {
		self.0.constraints.push(constraint);
		self
	}
	pub fn by_adding_constraints(
		mut self,
		constraints: impl IntoIterator<Item = ColumnConstraint>,
	) -> Self {
		self.0.constraints.extend(constraints);
		self
	}

	pub fn node(&self) -> &ColumnDef {
		&self.0
	}
	pub fn into_node(self) -> ColumnDef {
		self.0
	}
}
impl From<ColumnDefBuilder> for ColumnDef {
	fn from(value: ColumnDefBuilder) -> Self {
		value.0
	}
}

impl Describable for ColumnDef {
	fn lang(&self) -> Lang<'_> {
		Lang::ColumnDef(self)
	}
}
impl Describable for ColumnDefBuilder {
	fn lang(&self) -> Lang<'_> {
		Lang::ColumnDef(&self.0)
	}
}
