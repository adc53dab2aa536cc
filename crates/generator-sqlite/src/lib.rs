use std::{
	fmt::{self, Display},
	ops::{Deref, DerefMut},
};

use itertools::Itertools;
use syntax::{
	column_type::TypeSize,
	constraint::{ColumnConstraintKind, ForeignKeyClause},
	node::{ColumnDef, CreateTable},
	sql::{CurrentTime, Sql, SqlOp},
	table::{Check, ForeignKey, PrimaryKey, TableConstraintKind, Unique},
	w, ColumnConstraint, ColumnType, ConflictClause, Describable, Lang, TableConstraint,
};
use tracing::trace;

pub use crate::escape::{escape_identifier, escape_literal, quote_identifier, should_escape};
pub use crate::validate::{validate, ValidationError};

mod escape;
pub mod validate;

/// When identifiers get double quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quoting {
	/// Only keywords and names SQLite can't read bare.
	#[default]
	WhenNeeded,
	Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
	/// Everything on a single line.
	#[default]
	Compact,
	/// Statement bodies get one tab-indented line per item.
	Pretty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeneratorOptions {
	pub quoting: Quoting,
	pub layout: Layout,
}

#[derive(Clone, Copy, Debug)]
pub struct Sqlite<T>(pub T);
impl<T> Deref for Sqlite<T> {
	type Target = T;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl<T> DerefMut for Sqlite<T> {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.0
	}
}

impl Sqlite<&ColumnType> {
	pub fn print(&self, sql: &mut String) {
		w!(sql, "{}", self.name);
		match self.size {
			Some(TypeSize::Length(length)) => w!(sql, "({length})"),
			Some(TypeSize::Precision(precision, scale)) => w!(sql, "({precision}, {scale})"),
			None => {}
		}
	}
}

fn print_conflict(sql: &mut String, conflict: Option<ConflictClause>) {
	if let Some(conflict) = conflict {
		w!(sql, " ON CONFLICT {}", conflict.format());
	}
}
fn print_column_list(sql: &mut String, columns: &[String], opts: &GeneratorOptions) {
	w!(
		sql,
		"({})",
		columns.iter().map(|c| Id(c, opts.quoting)).join(", ")
	);
}

impl Sqlite<&ForeignKeyClause> {
	pub fn print(&self, sql: &mut String, opts: &GeneratorOptions) {
		w!(sql, "REFERENCES {}", Id(&self.table, opts.quoting));
		if !self.columns.is_empty() {
			w!(sql, " ");
			print_column_list(sql, &self.columns, opts);
		}
		if let Some(action) = self.on_delete {
			w!(sql, " ON DELETE {}", action.format());
		}
		if let Some(action) = self.on_update {
			w!(sql, " ON UPDATE {}", action.format());
		}
	}
}

impl Sqlite<&ColumnConstraint> {
	pub fn print(&self, sql: &mut String, opts: &GeneratorOptions) {
		if let Some(name) = &self.name {
			w!(sql, "CONSTRAINT {} ", Id(name, opts.quoting));
		}
		match &self.kind {
			ColumnConstraintKind::PrimaryKey {
				order,
				conflict,
				autoincrement,
			} => {
				w!(sql, "PRIMARY KEY");
				if let Some(order) = order {
					w!(sql, " {}", order.format());
				}
				print_conflict(sql, *conflict);
				if *autoincrement {
					w!(sql, " AUTOINCREMENT");
				}
			}
			ColumnConstraintKind::NotNull { conflict } => {
				w!(sql, "NOT NULL");
				print_conflict(sql, *conflict);
			}
			ColumnConstraintKind::Unique { conflict } => {
				w!(sql, "UNIQUE");
				print_conflict(sql, *conflict);
			}
			ColumnConstraintKind::Check(check) => {
				w!(sql, "CHECK ({})", format_sql(check, opts));
			}
			ColumnConstraintKind::Default(default) => {
				let value = format_sql(default, opts);
				if default.is_literal() {
					w!(sql, "DEFAULT {value}");
				} else {
					w!(sql, "DEFAULT ({value})");
				}
			}
			ColumnConstraintKind::Collate(collation) => {
				w!(sql, "COLLATE {}", Id(collation, opts.quoting));
			}
			ColumnConstraintKind::References(clause) => Sqlite(clause).print(sql, opts),
		}
	}
}

impl Sqlite<&ColumnDef> {
	/// `name [type] [constraint ...]`, single space separated.
	pub fn print(&self, sql: &mut String, opts: &GeneratorOptions) {
		w!(sql, "{}", Id(&self.name, opts.quoting));
		if let Some(ty) = &self.ty {
			w!(sql, " ");
			Sqlite(ty).print(sql);
		}
		for constraint in &self.constraints {
			w!(sql, " ");
			Sqlite(constraint).print(sql, opts);
		}
	}
}

impl Sqlite<&TableConstraint> {
	pub fn print(&self, sql: &mut String, opts: &GeneratorOptions) {
		if let Some(name) = &self.name {
			w!(sql, "CONSTRAINT {} ", Id(name, opts.quoting));
		}
		match &self.kind {
			TableConstraintKind::PrimaryKey(PrimaryKey { columns, conflict }) => {
				w!(sql, "PRIMARY KEY ");
				print_column_list(sql, columns, opts);
				print_conflict(sql, *conflict);
			}
			TableConstraintKind::Unique(Unique { columns, conflict }) => {
				w!(sql, "UNIQUE ");
				print_column_list(sql, columns, opts);
				print_conflict(sql, *conflict);
			}
			TableConstraintKind::Check(Check { check }) => {
				w!(sql, "CHECK ({})", format_sql(check, opts));
			}
			TableConstraintKind::ForeignKey(ForeignKey { columns, clause }) => {
				w!(sql, "FOREIGN KEY ");
				print_column_list(sql, columns, opts);
				w!(sql, " ");
				Sqlite(clause).print(sql, opts);
			}
		}
	}
}

impl Sqlite<&CreateTable> {
	pub fn print(&self, sql: &mut String, opts: &GeneratorOptions) {
		w!(sql, "CREATE ");
		if self.temporary {
			w!(sql, "TEMP ");
		}
		w!(sql, "TABLE ");
		if self.if_not_exists {
			w!(sql, "IF NOT EXISTS ");
		}
		w!(sql, "{} (", Id(&self.name, opts.quoting));
		let mut had = false;
		let mut item = |sql: &mut String| {
			if had {
				w!(sql, ",");
				if opts.layout == Layout::Compact {
					w!(sql, " ");
				}
			} else {
				had = true;
			}
			if opts.layout == Layout::Pretty {
				w!(sql, "\n\t");
			}
		};
		for column in &self.columns {
			item(sql);
			Sqlite(column).print(sql, opts);
		}
		for constraint in &self.constraints {
			item(sql);
			Sqlite(constraint).print(sql, opts);
		}
		if opts.layout == Layout::Pretty {
			w!(sql, "\n");
		}
		w!(sql, ")");
		if self.without_rowid {
			w!(sql, " WITHOUT ROWID");
		}
	}
}

impl Sqlite<&Sql> {
	pub fn print(&self, sql: &mut String, opts: &GeneratorOptions) {
		sql.push_str(&format_sql(self.0, opts));
	}
}

impl Sqlite<Lang<'_>> {
	pub fn print(&self, sql: &mut String, opts: &GeneratorOptions) {
		match self.0 {
			Lang::ColumnDef(c) => Sqlite(c).print(sql, opts),
			Lang::ColumnType(t) => Sqlite(t).print(sql),
			Lang::ColumnConstraint(c) => Sqlite(c).print(sql, opts),
			Lang::TableConstraint(c) => Sqlite(c).print(sql, opts),
			Lang::Sql(s) => Sqlite(s).print(sql, opts),
			Lang::CreateTable(t) => Sqlite(t).print(sql, opts),
		}
	}
}
impl Display for Sqlite<Lang<'_>> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut out = String::new();
		self.print(&mut out, &GeneratorOptions::default());
		write!(f, "{out}")
	}
}

/// Renders any [`Describable`] fragment with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct Generator {
	options: GeneratorOptions,
}
impl Generator {
	pub fn new(options: GeneratorOptions) -> Self {
		Self { options }
	}
	pub fn options(&self) -> &GeneratorOptions {
		&self.options
	}
	pub fn print(&self, fragment: &dyn Describable, sql: &mut String) {
		let lang = fragment.lang();
		trace!(?lang, "describing");
		Sqlite(lang).print(sql, &self.options);
	}
	pub fn describe(&self, fragment: &dyn Describable) -> String {
		let mut out = String::new();
		self.print(fragment, &mut out);
		out
	}
	/// Fragments joined with `, `.
	pub fn describe_all(&self, fragments: &[&dyn Describable]) -> String {
		let mut out = String::new();
		for (i, fragment) in fragments.iter().enumerate() {
			if i != 0 {
				w!(out, ", ");
			}
			self.print(*fragment, &mut out);
		}
		out
	}
}

/// Describe with default options.
pub fn describe(fragment: &dyn Describable) -> String {
	Generator::default().describe(fragment)
}

fn sql_needs_parens(sql: &Sql, parent_binop: Option<SqlOp>) -> bool {
	match sql {
		Sql::Cast(_, _)
		| Sql::Call(_, _)
		| Sql::String(_)
		| Sql::Number(_)
		| Sql::Real(_)
		| Sql::Blob(_)
		| Sql::Ident(_)
		| Sql::Parened(_)
		| Sql::Boolean(_)
		| Sql::Current(_)
		| Sql::Null => false,

		// Only precedence cases which never surprise a reader are left unparenthesized.
		Sql::BinOp(_, a @ (SqlOp::And | SqlOp::Or), _) if Some(*a) == parent_binop => false,
		Sql::BinOp(_, SqlOp::And, _) if matches!(parent_binop, Some(SqlOp::Or)) => false,
		Sql::BinOp(
			_,
			SqlOp::Lt
			| SqlOp::Gt
			| SqlOp::Le
			| SqlOp::Ge
			| SqlOp::Eq
			| SqlOp::Ne
			| SqlOp::Is
			| SqlOp::IsNot,
			_,
		) if matches!(parent_binop, Some(SqlOp::And | SqlOp::Or)) => false,

		Sql::UnOp(_, _) | Sql::BinOp(_, _, _) => true,
	}
}
fn format_sql(sql: &Sql, opts: &GeneratorOptions) -> String {
	let mut out = String::new();
	match sql {
		Sql::Cast(expr, ty) => {
			let expr = format_sql(expr, opts);
			let mut ty_sql = String::new();
			Sqlite(ty).print(&mut ty_sql);
			w!(out, "CAST({expr} AS {ty_sql})");
		}
		Sql::Call(function, args) => {
			w!(out, "{}(", Id(function, opts.quoting));
			for (i, arg) in args.iter().enumerate() {
				if i != 0 {
					w!(out, ", ");
				}
				let arg = format_sql(arg, opts);
				w!(out, "{arg}");
			}
			w!(out, ")");
		}
		Sql::String(s) => {
			w!(out, "{}", escape_literal(s));
		}
		Sql::Number(n) => {
			w!(out, "{n}");
		}
		// SQLite stores NaN as NULL and reads out-of-range reals as infinity.
		Sql::Real(n) if n.is_nan() => w!(out, "NULL"),
		Sql::Real(n) if n.is_infinite() => {
			w!(out, "{}9e999", if n.is_sign_negative() { "-" } else { "" });
		}
		Sql::Real(n) => {
			w!(out, "{n:?}");
		}
		Sql::Blob(bytes) => {
			w!(out, "X'");
			for byte in bytes {
				w!(out, "{byte:02X}");
			}
			w!(out, "'");
		}
		Sql::Ident(column) => {
			w!(out, "{}", Id(column, opts.quoting));
		}
		Sql::UnOp(op, expr) => {
			let op = op.format();
			let expr = format_sql(expr, opts);
			w!(out, "{op}({expr})");
		}
		Sql::BinOp(a, op, b) => {
			let sop = op.format();
			let va = format_sql(a, opts);
			let vb = format_sql(b, opts);
			if sql_needs_parens(a, Some(*op)) {
				w!(out, "({va})");
			} else {
				w!(out, "{va}");
			}
			w!(out, " {sop} ");
			if sql_needs_parens(b, Some(*op)) {
				w!(out, "({vb})");
			} else {
				w!(out, "{vb}");
			}
		}
		Sql::Parened(a) => {
			let va = format_sql(a, opts);
			if sql_needs_parens(a, None) {
				w!(out, "({va})");
			} else {
				w!(out, "{va}");
			}
		}
		Sql::Boolean(b) => {
			if *b {
				w!(out, "TRUE");
			} else {
				w!(out, "FALSE");
			}
		}
		Sql::Current(current) => match current {
			CurrentTime::Time => w!(out, "CURRENT_TIME"),
			CurrentTime::Date => w!(out, "CURRENT_DATE"),
			CurrentTime::Timestamp => w!(out, "CURRENT_TIMESTAMP"),
		},
		Sql::Null => w!(out, "NULL"),
	}
	out
}

#[derive(PartialEq, Clone, Copy)]
struct Id<'s>(&'s str, Quoting);
impl Display for Id<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let id = match self.1 {
			Quoting::WhenNeeded => escape_identifier(self.0),
			Quoting::Always => quote_identifier(self.0),
		};
		write!(f, "{id}")
	}
}

#[cfg(test)]
mod tests {
	use syntax::{
		node::ColumnDef,
		sql::{CurrentTime, Sql, SqlOp, SqlUnOp},
		ColumnConstraint, ColumnDefBuilder, ColumnType, ConflictClause, CreateTableBuilder,
		Describable, ForeignKeyAction, ForeignKeyClause, Order, TableConstraint,
	};
	use tracing_test::traced_test;

	use crate::{describe, Generator, GeneratorOptions, Layout, Quoting, Sqlite};

	fn pretty() -> Generator {
		Generator::new(GeneratorOptions {
			layout: Layout::Pretty,
			..Default::default()
		})
	}

	#[traced_test]
	#[test]
	fn typed_column_with_constraint() {
		let age = ColumnDefBuilder::new("age")
			.with_type(ColumnType::integer())
			.by_adding_constraint(ColumnConstraint::not_null());
		assert_eq!(describe(&age), "age INTEGER NOT NULL");
		assert!(logs_contain("describing"));
	}

	#[test]
	fn bare_column() {
		assert_eq!(describe(&ColumnDefBuilder::new("note")), "note");
		assert_eq!(describe(&ColumnDef::new("note")), "note");
	}

	#[test]
	fn constraints_render_in_insertion_order() {
		let id = ColumnDefBuilder::new("id")
			.by_adding_constraint(ColumnConstraint::primary_key())
			.by_adding_constraints([
				ColumnConstraint::not_null(),
				ColumnConstraint::default_value(0),
			]);
		assert_eq!(describe(&id), "id PRIMARY KEY NOT NULL DEFAULT 0");
	}

	#[test]
	fn last_type_is_rendered() {
		let x = ColumnDefBuilder::new("x")
			.with_type(ColumnType::integer())
			.with_type(ColumnType::text());
		assert_eq!(describe(&x), "x TEXT");
	}

	#[test]
	fn sized_types() {
		assert_eq!(
			describe(&ColumnType::new("VARCHAR").with_length(255)),
			"VARCHAR(255)"
		);
		assert_eq!(
			describe(&ColumnType::new("DECIMAL").with_precision(10, 2)),
			"DECIMAL(10, 2)"
		);
	}

	#[test]
	fn primary_key_modifiers() {
		let pk = ColumnConstraint::primary_key()
			.named("pk_id")
			.ordered(Order::Desc)
			.on_conflict(ConflictClause::Rollback)
			.autoincrement();
		assert_eq!(
			describe(&pk),
			"CONSTRAINT pk_id PRIMARY KEY DESC ON CONFLICT ROLLBACK AUTOINCREMENT"
		);
	}

	#[test]
	fn conflict_clauses() {
		assert_eq!(
			describe(&ColumnConstraint::not_null().on_conflict(ConflictClause::Ignore)),
			"NOT NULL ON CONFLICT IGNORE"
		);
		assert_eq!(
			describe(&ColumnConstraint::unique().on_conflict(ConflictClause::Replace)),
			"UNIQUE ON CONFLICT REPLACE"
		);
	}

	#[test]
	fn defaults() {
		let cases = [
			(Sql::from(0), "DEFAULT 0"),
			(Sql::from(-1), "DEFAULT -1"),
			(Sql::from(1.5), "DEFAULT 1.5"),
			(Sql::from(2.0), "DEFAULT 2.0"),
			(Sql::from("it's"), "DEFAULT 'it''s'"),
			(Sql::Null, "DEFAULT NULL"),
			(Sql::from(true), "DEFAULT TRUE"),
			(Sql::Blob(vec![0x00, 0xab, 0x10]), "DEFAULT X'00AB10'"),
			(Sql::Current(CurrentTime::Timestamp), "DEFAULT CURRENT_TIMESTAMP"),
			(
				Sql::from(1).binop(SqlOp::Plus, 2.into()),
				"DEFAULT (1 + 2)",
			),
			(
				Sql::call("strftime", [Sql::from("%s"), Sql::from("now")]),
				"DEFAULT (strftime('%s', 'now'))",
			),
			(Sql::unop(SqlUnOp::Minus, 1.into()), "DEFAULT (-(1))"),
			(Sql::Real(f64::NAN), "DEFAULT NULL"),
			(Sql::Real(f64::INFINITY), "DEFAULT 9e999"),
			(Sql::Real(f64::NEG_INFINITY), "DEFAULT -9e999"),
		];
		for (value, expected) in cases {
			assert_eq!(describe(&ColumnConstraint::default_value(value)), expected);
		}
	}

	#[test]
	fn check_parenthesization() {
		let check = Sql::all([
			Sql::ident("age").binop(SqlOp::Ge, 0.into()),
			Sql::ident("age").binop(SqlOp::Lt, 150.into()),
		])
		.binop(SqlOp::Or, Sql::ident("age").binop(SqlOp::Is, Sql::Null));
		assert_eq!(
			describe(&ColumnConstraint::check(check)),
			"CHECK (age >= 0 AND age < 150 OR age IS NULL)"
		);

		let arithmetic = Sql::ident("a")
			.binop(SqlOp::Plus, Sql::ident("b"))
			.binop(SqlOp::Mul, 2.into());
		assert_eq!(describe(&arithmetic), "(a + b) * 2");

		let negated = Sql::unop(SqlUnOp::Not, Sql::ident("flag").binop(SqlOp::Eq, 1.into()));
		assert_eq!(describe(&negated), "NOT (flag = 1)");

		let cast = Sql::ident("price").cast(ColumnType::integer()).parened();
		assert_eq!(describe(&cast), "CAST(price AS INTEGER)");
	}

	#[test]
	fn collate_and_references() {
		let column = ColumnDefBuilder::new("owner")
			.with_type(ColumnType::text())
			.by_adding_constraint(ColumnConstraint::collate("NOCASE"))
			.by_adding_constraint(ColumnConstraint::references(
				ForeignKeyClause::new("users")
					.columns(["name"])
					.on_delete(ForeignKeyAction::Cascade)
					.on_update(ForeignKeyAction::SetNull),
			));
		assert_eq!(
			describe(&column),
			"owner TEXT COLLATE NOCASE REFERENCES users (name) ON DELETE CASCADE ON UPDATE SET NULL"
		);
		let bare = ColumnConstraint::references(ForeignKeyClause::new("users"));
		assert_eq!(describe(&bare), "REFERENCES users");
	}

	#[test]
	fn identifiers_are_escaped() {
		let column = ColumnDefBuilder::new("order").with_type(ColumnType::integer());
		assert_eq!(describe(&column), r#""order" INTEGER"#);
		assert_eq!(describe(&ColumnDefBuilder::new("")), r#""""#);
		assert_eq!(describe(&Sql::ident("first name")), r#""first name""#);
	}

	#[test]
	fn function_names_are_escaped() {
		assert_eq!(
			describe(&Sql::call("a b); DROP TABLE x; --", [])),
			r#""a b); DROP TABLE x; --"()"#
		);
		assert_eq!(describe(&Sql::call("lower", [Sql::ident("name")])), "lower(name)");
	}

	#[test]
	fn always_quoting() {
		let generator = Generator::new(GeneratorOptions {
			quoting: Quoting::Always,
			..Default::default()
		});
		let column = ColumnDefBuilder::new("age")
			.with_type(ColumnType::integer())
			.by_adding_constraint(ColumnConstraint::check(
				Sql::ident("age").binop(SqlOp::Ge, 0.into()),
			));
		assert_eq!(
			generator.describe(&column),
			r#""age" INTEGER CHECK ("age" >= 0)"#
		);
	}

	fn users() -> CreateTableBuilder {
		CreateTableBuilder::new("users")
			.by_adding_column(
				ColumnDefBuilder::new("id")
					.with_type(ColumnType::integer())
					.by_adding_constraint(ColumnConstraint::primary_key().autoincrement()),
			)
			.by_adding_column(
				ColumnDefBuilder::new("email")
					.with_type(ColumnType::text())
					.by_adding_constraints([ColumnConstraint::not_null(), ColumnConstraint::unique()]),
			)
			.by_adding_column(ColumnDefBuilder::new("note"))
	}

	#[test]
	fn create_table_compact() {
		assert_eq!(
			describe(&users()),
			"CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, email TEXT NOT NULL UNIQUE, note)"
		);
	}

	#[test]
	fn create_table_pretty() {
		let table = users()
			.temporary()
			.if_not_exists()
			.by_adding_constraint(
				TableConstraint::check(Sql::call("length", [Sql::ident("email")]).binop(SqlOp::Gt, 3.into()))
					.named("email_len"),
			);
		assert_eq!(
			pretty().describe(&table),
			"CREATE TEMP TABLE IF NOT EXISTS users (\n\
			\tid INTEGER PRIMARY KEY AUTOINCREMENT,\n\
			\temail TEXT NOT NULL UNIQUE,\n\
			\tnote,\n\
			\tCONSTRAINT email_len CHECK (length(email) > 3)\n\
			)"
		);
	}

	#[test]
	fn table_constraints() {
		let table = CreateTableBuilder::new("membership")
			.by_adding_columns([
				ColumnDefBuilder::new("user_id").with_type(ColumnType::integer()),
				ColumnDefBuilder::new("group_id").with_type(ColumnType::integer()),
			])
			.by_adding_constraints([
				TableConstraint::primary_key(["user_id", "group_id"])
					.on_conflict(ConflictClause::Ignore),
				TableConstraint::unique(["group_id"]),
				TableConstraint::foreign_key(
					["group_id"],
					ForeignKeyClause::new("groups").columns(["id"]),
				),
			])
			.without_rowid();
		assert_eq!(
			describe(&table),
			"CREATE TABLE membership (user_id INTEGER, group_id INTEGER, \
			PRIMARY KEY (user_id, group_id) ON CONFLICT IGNORE, UNIQUE (group_id), \
			FOREIGN KEY (group_id) REFERENCES \"groups\" (id)) WITHOUT ROWID"
		);
	}

	#[test]
	fn empty_table_renders_structurally() {
		assert_eq!(describe(&CreateTableBuilder::new("t")), "CREATE TABLE t ()");
		assert_eq!(pretty().describe(&CreateTableBuilder::new("t")), "CREATE TABLE t (\n)");
	}

	#[test]
	fn heterogeneous_fragments() {
		let id = ColumnDefBuilder::new("id").with_type(ColumnType::integer());
		let pk = TableConstraint::primary_key(["id"]);
		let fragments: [&dyn Describable; 2] = [&id, &pk];
		assert_eq!(
			Generator::default().describe_all(&fragments),
			"id INTEGER, PRIMARY KEY (id)"
		);
	}

	#[test]
	fn display_uses_default_options() {
		let age = ColumnDefBuilder::new("age").with_type(ColumnType::integer());
		assert_eq!(Sqlite(age.lang()).to_string(), "age INTEGER");
	}
}
