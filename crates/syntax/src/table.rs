use derivative::Derivative;

use crate::{
	column::ColumnDef,
	constraint::{ConflictClause, ForeignKeyClause},
	newty_enum,
	sql::Sql,
	Describable, Lang,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryKey {
	pub columns: Vec<String>,
	pub conflict: Option<ConflictClause>,
}
#[derive(Debug, Clone, PartialEq)]
pub struct Unique {
	pub columns: Vec<String>,
	pub conflict: Option<ConflictClause>,
}
#[derive(Debug, Clone, PartialEq)]
pub struct Check {
	pub check: Sql,
}
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
	pub columns: Vec<String>,
	pub clause: ForeignKeyClause,
}

newty_enum! {
	#[derive(Clone, PartialEq)]
	pub enum TableConstraintKind {
		PrimaryKey = primary_key,
		Unique = unique,
		Check = check,
		ForeignKey = foreign_key,
	}
}

/// Constraint declared after the column list.
#[derive(Debug, Clone, PartialEq)]
pub struct TableConstraint {
	pub name: Option<String>,
	pub kind: TableConstraintKind,
}
impl TableConstraint {
	fn unnamed(kind: TableConstraintKind) -> Self {
		Self { name: None, kind }
	}
	pub fn primary_key<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
		Self::unnamed(TableConstraintKind::PrimaryKey(PrimaryKey {
			columns: columns.into_iter().map(Into::into).collect(),
			conflict: None,
		}))
	}
	pub fn unique<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
		Self::unnamed(TableConstraintKind::Unique(Unique {
			columns: columns.into_iter().map(Into::into).collect(),
			conflict: None,
		}))
	}
	pub fn check(check: Sql) -> Self {
		Self::unnamed(TableConstraintKind::Check(Check { check }))
	}
	pub fn foreign_key<S: Into<String>>(
		columns: impl IntoIterator<Item = S>,
		clause: ForeignKeyClause,
	) -> Self {
		Self::unnamed(TableConstraintKind::ForeignKey(ForeignKey {
			columns: columns.into_iter().map(Into::into).collect(),
			clause,
		}))
	}

	pub fn named(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}
	pub fn on_conflict(mut self, clause: ConflictClause) -> Self {
		match &mut self.kind {
			TableConstraintKind::PrimaryKey(PrimaryKey { conflict, .. })
			| TableConstraintKind::Unique(Unique { conflict, .. }) => *conflict = Some(clause),
			TableConstraintKind::Check(_) | TableConstraintKind::ForeignKey(_) => {}
		}
		self
	}

	/// Columns of this table the constraint refers to.
	pub fn affected_columns(&self) -> Vec<&str> {
		match &self.kind {
			TableConstraintKind::PrimaryKey(PrimaryKey { columns, .. })
			| TableConstraintKind::Unique(Unique { columns, .. })
			| TableConstraintKind::ForeignKey(ForeignKey { columns, .. }) => {
				columns.iter().map(String::as_str).collect()
			}
			TableConstraintKind::Check(Check { check }) => check.affected_columns(),
		}
	}
}

/// `CREATE [TEMP] TABLE [IF NOT EXISTS] name (columns, constraints) [WITHOUT ROWID]`
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
	pub name: String,
	pub temporary: bool,
	pub if_not_exists: bool,
	pub columns: Vec<ColumnDef>,
	pub constraints: Vec<TableConstraint>,
	pub without_rowid: bool,
}
impl CreateTable {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			temporary: false,
			if_not_exists: false,
			columns: vec![],
			constraints: vec![],
			without_rowid: false,
		}
	}
	pub fn column(&self, name: &str) -> Option<&ColumnDef> {
		self.columns.iter().find(|c| c.name == name)
	}
}

/// Fluent builder owning a single [`CreateTable`], with the same contract as
/// [`ColumnDefBuilder`](crate::ColumnDefBuilder): append-only, in call order, no validation.
#[derive(Derivative, Clone, PartialEq)]
#[derivative(Debug = "transparent")]
pub struct CreateTableBuilder(CreateTable);
impl CreateTableBuilder {
	pub fn new(name: impl Into<String>) -> Self {
		Self(CreateTable::new(name))
	}

	pub fn temporary(mut self) -> Self {
		self.0.temporary = true;
		self
	}
	pub fn if_not_exists(mut self) -> Self {
		self.0.if_not_exists = true;
		self
	}
	pub fn without_rowid(mut self) -> Self {
		self.0.without_rowid = true;
		self
	}
	pub fn by_adding_column(mut self, column: impl Into<ColumnDef>) -> Self {
		self.0.columns.push(column.into());
		self
	}
	pub fn by_adding_columns<C: Into<ColumnDef>>(
		mut self,
		columns: impl IntoIterator<Item = C>,
	) -> Self {
		self.0.columns.extend(columns.into_iter().map(Into::into));
		self
	}
	pub fn by_adding_constraint(mut self, constraint: TableConstraint) -> Self {
		self.0.constraints.push(constraint);
		self
	}
	pub fn by_adding_constraints(
		mut self,
		constraints: impl IntoIterator<Item = TableConstraint>,
	) -> Self {
		self.0.constraints.extend(constraints);
		self
	}

	pub fn node(&self) -> &CreateTable {
		&self.0
	}
	pub fn into_node(self) -> CreateTable {
		self.0
	}
}
impl From<CreateTableBuilder> for CreateTable {
	fn from(value: CreateTableBuilder) -> Self {
		value.0
	}
}

impl Describable for CreateTable {
	fn lang(&self) -> Lang<'_> {
		Lang::CreateTable(self)
	}
}
impl Describable for CreateTableBuilder {
	fn lang(&self) -> Lang<'_> {
		Lang::CreateTable(&self.0)
	}
}
impl Describable for TableConstraint {
	fn lang(&self) -> Lang<'_> {
		Lang::TableConstraint(self)
	}
}

#[cfg(test)]
mod tests {
	use super::{CreateTableBuilder, TableConstraint};
	use crate::{
		column::ColumnDefBuilder, column_type::ColumnType, constraint::ConflictClause, sql::Sql,
		sql::SqlOp,
	};

	#[test]
	fn columns_accept_builders_and_nodes() {
		let table = CreateTableBuilder::new("users")
			.by_adding_column(ColumnDefBuilder::new("id").with_type(ColumnType::integer()))
			.by_adding_columns([ColumnDefBuilder::new("name"), ColumnDefBuilder::new("email")])
			.by_adding_column(ColumnDefBuilder::new("age").into_node());
		let names = table
			.node()
			.columns
			.iter()
			.map(|c| c.name.as_str())
			.collect::<Vec<_>>();
		assert_eq!(names, ["id", "name", "email", "age"]);
		assert_eq!(
			table.node().column("id").and_then(|c| c.ty.clone()),
			Some(ColumnType::integer())
		);
	}

	#[test]
	fn flags_default_off() {
		let table = CreateTableBuilder::new("t").into_node();
		assert!(!table.temporary);
		assert!(!table.if_not_exists);
		assert!(!table.without_rowid);

		let table = CreateTableBuilder::new("t")
			.temporary()
			.if_not_exists()
			.without_rowid()
			.into_node();
		assert!(table.temporary && table.if_not_exists && table.without_rowid);
	}

	#[test]
	fn constraint_accessors() {
		let pk = TableConstraint::primary_key(["a", "b"]).on_conflict(ConflictClause::Abort);
		let pk = pk.kind.as_primary_key().expect("primary key");
		assert_eq!(pk.columns, ["a", "b"]);
		assert_eq!(pk.conflict, Some(ConflictClause::Abort));

		let check = TableConstraint::check(Sql::ident("a").binop(SqlOp::Lt, Sql::ident("b")))
			.on_conflict(ConflictClause::Abort);
		assert!(check.kind.is_check());
		assert_eq!(check.affected_columns(), ["a", "b"]);
	}

	#[test]
	fn table_constraints_keep_call_order() {
		let table = CreateTableBuilder::new("t")
			.by_adding_constraint(TableConstraint::unique(["a"]))
			.by_adding_constraints([
				TableConstraint::primary_key(["b"]),
				TableConstraint::unique(["c"]).named("c_unique"),
			])
			.into_node();
		assert!(table.constraints[0].kind.is_unique());
		assert!(table.constraints[1].kind.is_primary_key());
		assert_eq!(table.constraints[2].name.as_deref(), Some("c_unique"));
	}
}
