//! Opt-in checks for combinations SQLite would reject when executing the generated SQL.
//!
//! Builders accept everything and rendering never fails; callers who want early diagnostics run
//! [`validate`] on a fragment before describing it.

use itertools::Itertools;
use syntax::{
	constraint::ColumnConstraintKind,
	node::{ColumnDef, CreateTable},
	sql::Sql,
	ColumnConstraint, ColumnType, Describable, ForeignKeyClause, Lang, TableConstraint,
	TableConstraintKind,
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
	#[error("{what} name is empty")]
	EmptyIdentifier { what: &'static str },
	#[error("column {column:?} declares PRIMARY KEY more than once")]
	DuplicatePrimaryKey { column: String },
	#[error("column {column:?} declares DEFAULT more than once")]
	DuplicateDefault { column: String },
	#[error("AUTOINCREMENT is only allowed on an INTEGER PRIMARY KEY, column {column:?}")]
	AutoincrementRequiresIntegerPrimaryKey { column: String },
	#[error("table {table:?} has no columns")]
	NoColumns { table: String },
	#[error("table {table:?} declares column {column:?} more than once")]
	DuplicateColumn { table: String, column: String },
	#[error("table {table:?} has more than one primary key")]
	MultiplePrimaryKeys { table: String },
	#[error("table {table:?} has no column named {column:?}")]
	UnknownColumn { table: String, column: String },
	#[error("WITHOUT ROWID table {table:?} must have a primary key")]
	WithoutRowidRequiresPrimaryKey { table: String },
}

/// Collect every problem found in the fragment, in declaration order.
pub fn validate(fragment: &dyn Describable) -> Result<(), Vec<ValidationError>> {
	let mut validator = Validator::default();
	match fragment.lang() {
		Lang::ColumnDef(c) => validator.column(c),
		Lang::ColumnType(t) => validator.column_type(t),
		Lang::ColumnConstraint(c) => validator.column_constraint(c),
		Lang::TableConstraint(c) => validator.table_constraint(c),
		Lang::Sql(s) => validator.sql(s),
		Lang::CreateTable(t) => validator.table(t),
	}
	debug!(errors = validator.errors.len(), "validation finished");
	if validator.errors.is_empty() {
		Ok(())
	} else {
		Err(validator.errors)
	}
}

#[derive(Default)]
struct Validator {
	errors: Vec<ValidationError>,
}
impl Validator {
	fn name(&mut self, what: &'static str, name: &str) {
		if name.is_empty() {
			self.errors.push(ValidationError::EmptyIdentifier { what });
		}
	}
	fn column_type(&mut self, ty: &ColumnType) {
		if ty.name.trim().is_empty() {
			self.errors
				.push(ValidationError::EmptyIdentifier { what: "type" });
		}
	}
	fn sql(&mut self, sql: &Sql) {
		for column in sql.affected_columns() {
			self.name("column", column);
		}
	}
	fn foreign_key(&mut self, clause: &ForeignKeyClause) {
		self.name("referenced table", &clause.table);
		for column in &clause.columns {
			self.name("referenced column", column);
		}
	}
	fn column_constraint(&mut self, constraint: &ColumnConstraint) {
		if let Some(name) = &constraint.name {
			self.name("constraint", name);
		}
		match &constraint.kind {
			ColumnConstraintKind::Check(check) | ColumnConstraintKind::Default(check) => {
				self.sql(check)
			}
			ColumnConstraintKind::Collate(collation) => self.name("collation", collation),
			ColumnConstraintKind::References(clause) => self.foreign_key(clause),
			ColumnConstraintKind::PrimaryKey { .. }
			| ColumnConstraintKind::NotNull { .. }
			| ColumnConstraintKind::Unique { .. } => {}
		}
	}
	fn column(&mut self, column: &ColumnDef) {
		self.name("column", &column.name);
		if let Some(ty) = &column.ty {
			self.column_type(ty);
		}
		for constraint in &column.constraints {
			self.column_constraint(constraint);
		}
		let count = |f: fn(&ColumnConstraint) -> bool| {
			column.constraints.iter().filter(|c| f(c)).count()
		};
		if count(ColumnConstraint::is_primary_key) > 1 {
			self.errors.push(ValidationError::DuplicatePrimaryKey {
				column: column.name.clone(),
			});
		}
		if count(|c| c.as_default().is_some()) > 1 {
			self.errors.push(ValidationError::DuplicateDefault {
				column: column.name.clone(),
			});
		}
		if column.constraints.iter().any(ColumnConstraint::is_autoincrement)
			&& !column.ty.as_ref().is_some_and(ColumnType::is_exact_integer)
		{
			self.errors
				.push(ValidationError::AutoincrementRequiresIntegerPrimaryKey {
					column: column.name.clone(),
				});
		}
	}
	fn table_constraint(&mut self, constraint: &TableConstraint) {
		if let Some(name) = &constraint.name {
			self.name("constraint", name);
		}
		match &constraint.kind {
			TableConstraintKind::Check(check) => self.sql(&check.check),
			TableConstraintKind::ForeignKey(fk) => self.foreign_key(&fk.clause),
			TableConstraintKind::PrimaryKey(_) | TableConstraintKind::Unique(_) => {}
		}
	}
	fn table(&mut self, table: &CreateTable) {
		self.name("table", &table.name);
		if table.columns.is_empty() {
			self.errors.push(ValidationError::NoColumns {
				table: table.name.clone(),
			});
		}
		for column in &table.columns {
			self.column(column);
		}
		// Identifiers are case-insensitive in SQLite.
		for column in table
			.columns
			.iter()
			.map(|c| c.name.to_ascii_lowercase())
			.duplicates()
		{
			self.errors.push(ValidationError::DuplicateColumn {
				table: table.name.clone(),
				column,
			});
		}
		for constraint in &table.constraints {
			self.table_constraint(constraint);
		}

		let declared = |name: &str| {
			table
				.columns
				.iter()
				.any(|c| c.name.eq_ignore_ascii_case(name))
		};
		let referenced = table
			.columns
			.iter()
			.flat_map(|c| c.constraints.iter().filter_map(ColumnConstraint::as_check))
			.flat_map(Sql::affected_columns)
			.chain(
				table
					.constraints
					.iter()
					.flat_map(TableConstraint::affected_columns),
			)
			.unique();
		for column in referenced {
			if !column.is_empty() && !declared(column) {
				self.errors.push(ValidationError::UnknownColumn {
					table: table.name.clone(),
					column: column.to_owned(),
				});
			}
		}

		let primary_keys = table.columns.iter().filter(|c| c.is_primary_key()).count()
			+ table
				.constraints
				.iter()
				.filter(|c| c.kind.is_primary_key())
				.count();
		if primary_keys > 1 {
			self.errors.push(ValidationError::MultiplePrimaryKeys {
				table: table.name.clone(),
			});
		}
		if table.without_rowid && primary_keys == 0 {
			self.errors
				.push(ValidationError::WithoutRowidRequiresPrimaryKey {
					table: table.name.clone(),
				});
		}
	}
}
