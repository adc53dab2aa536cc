use crate::sql::Sql;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
	Asc,
	Desc,
}
impl Order {
	pub fn format(&self) -> &'static str {
		match self {
			Order::Asc => "ASC",
			Order::Desc => "DESC",
		}
	}
}

/// `ON CONFLICT` resolution algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictClause {
	Rollback,
	Abort,
	Fail,
	Ignore,
	Replace,
}
impl ConflictClause {
	pub fn format(&self) -> &'static str {
		match self {
			ConflictClause::Rollback => "ROLLBACK",
			ConflictClause::Abort => "ABORT",
			ConflictClause::Fail => "FAIL",
			ConflictClause::Ignore => "IGNORE",
			ConflictClause::Replace => "REPLACE",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKeyAction {
	SetNull,
	SetDefault,
	Cascade,
	Restrict,
	NoAction,
}
impl ForeignKeyAction {
	pub fn format(&self) -> &'static str {
		match self {
			ForeignKeyAction::SetNull => "SET NULL",
			ForeignKeyAction::SetDefault => "SET DEFAULT",
			ForeignKeyAction::Cascade => "CASCADE",
			ForeignKeyAction::Restrict => "RESTRICT",
			ForeignKeyAction::NoAction => "NO ACTION",
		}
	}
}

/// `REFERENCES table (columns) [ON DELETE ..] [ON UPDATE ..]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyClause {
	pub table: String,
	/// Empty list references the primary key of `table`.
	pub columns: Vec<String>,
	pub on_delete: Option<ForeignKeyAction>,
	pub on_update: Option<ForeignKeyAction>,
}
impl ForeignKeyClause {
	pub fn new(table: impl Into<String>) -> Self {
		Self {
			table: table.into(),
			columns: vec![],
			on_delete: None,
			on_update: None,
		}
	}
	pub fn columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
		self.columns.extend(columns.into_iter().map(Into::into));
		self
	}
	pub fn on_delete(mut self, action: ForeignKeyAction) -> Self {
		self.on_delete = Some(action);
		self
	}
	pub fn on_update(mut self, action: ForeignKeyAction) -> Self {
		self.on_update = Some(action);
		self
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnConstraintKind {
	PrimaryKey {
		order: Option<Order>,
		conflict: Option<ConflictClause>,
		autoincrement: bool,
	},
	NotNull {
		conflict: Option<ConflictClause>,
	},
	Unique {
		conflict: Option<ConflictClause>,
	},
	Check(Sql),
	Default(Sql),
	Collate(String),
	References(ForeignKeyClause),
}

/// A single constraint attached to a column definition.
///
/// Modifiers which make no sense for the constraint kind (e.g. `autoincrement` on `UNIQUE`)
/// leave it untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnConstraint {
	pub name: Option<String>,
	pub kind: ColumnConstraintKind,
}
impl ColumnConstraint {
	fn unnamed(kind: ColumnConstraintKind) -> Self {
		Self { name: None, kind }
	}
	pub fn primary_key() -> Self {
		Self::unnamed(ColumnConstraintKind::PrimaryKey {
			order: None,
			conflict: None,
			autoincrement: false,
		})
	}
	pub fn not_null() -> Self {
		Self::unnamed(ColumnConstraintKind::NotNull { conflict: None })
	}
	pub fn unique() -> Self {
		Self::unnamed(ColumnConstraintKind::Unique { conflict: None })
	}
	pub fn check(check: Sql) -> Self {
		Self::unnamed(ColumnConstraintKind::Check(check))
	}
	pub fn default_value(value: impl Into<Sql>) -> Self {
		Self::unnamed(ColumnConstraintKind::Default(value.into()))
	}
	pub fn collate(collation: impl Into<String>) -> Self {
		Self::unnamed(ColumnConstraintKind::Collate(collation.into()))
	}
	pub fn references(clause: ForeignKeyClause) -> Self {
		Self::unnamed(ColumnConstraintKind::References(clause))
	}

	/// `CONSTRAINT name ...`
	pub fn named(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}
	pub fn on_conflict(mut self, clause: ConflictClause) -> Self {
		match &mut self.kind {
			ColumnConstraintKind::PrimaryKey { conflict, .. }
			| ColumnConstraintKind::NotNull { conflict }
			| ColumnConstraintKind::Unique { conflict } => *conflict = Some(clause),
			_ => {}
		}
		self
	}
	pub fn ordered(mut self, by: Order) -> Self {
		if let ColumnConstraintKind::PrimaryKey { order, .. } = &mut self.kind {
			*order = Some(by);
		}
		self
	}
	pub fn autoincrement(mut self) -> Self {
		if let ColumnConstraintKind::PrimaryKey { autoincrement, .. } = &mut self.kind {
			*autoincrement = true;
		}
		self
	}

	pub fn is_primary_key(&self) -> bool {
		matches!(self.kind, ColumnConstraintKind::PrimaryKey { .. })
	}
	pub fn is_autoincrement(&self) -> bool {
		matches!(
			self.kind,
			ColumnConstraintKind::PrimaryKey {
				autoincrement: true,
				..
			}
		)
	}
	pub fn as_default(&self) -> Option<&Sql> {
		match &self.kind {
			ColumnConstraintKind::Default(s) => Some(s),
			_ => None,
		}
	}
	pub fn as_check(&self) -> Option<&Sql> {
		match &self.kind {
			ColumnConstraintKind::Check(s) => Some(s),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{ColumnConstraint, ColumnConstraintKind, ConflictClause, Order};

	#[test]
	fn modifiers_apply_to_primary_key() {
		let pk = ColumnConstraint::primary_key()
			.named("pk")
			.ordered(Order::Desc)
			.on_conflict(ConflictClause::Replace)
			.autoincrement();
		assert_eq!(pk.name.as_deref(), Some("pk"));
		assert_eq!(
			pk.kind,
			ColumnConstraintKind::PrimaryKey {
				order: Some(Order::Desc),
				conflict: Some(ConflictClause::Replace),
				autoincrement: true,
			}
		);
		assert!(pk.is_autoincrement());
	}

	#[test]
	fn inapplicable_modifiers_are_ignored() {
		let unique = ColumnConstraint::unique()
			.autoincrement()
			.ordered(Order::Asc);
		assert_eq!(unique, ColumnConstraint::unique());

		let collate = ColumnConstraint::collate("NOCASE").on_conflict(ConflictClause::Fail);
		assert_eq!(collate, ColumnConstraint::collate("NOCASE"));
	}

	#[test]
	fn default_accessor() {
		let default = ColumnConstraint::default_value(0);
		assert!(default.as_default().is_some());
		assert!(ColumnConstraint::not_null().as_default().is_none());
	}
}
