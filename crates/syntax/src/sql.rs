use crate::column_type::ColumnType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlUnOp {
	Plus,
	Minus,
	Not,
	BitNot,
}
impl SqlUnOp {
	pub fn format(&self) -> &'static str {
		match self {
			SqlUnOp::Plus => "+",
			SqlUnOp::Minus => "-",
			SqlUnOp::Not => "NOT ",
			SqlUnOp::BitNot => "~",
		}
	}
}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlOp {
	Lt,
	Gt,
	Le,
	Ge,
	Eq,
	Ne,
	Is,
	IsNot,

	And,
	Or,

	Plus,
	Minus,
	Div,
	Mul,
	Mod,
	Concat,

	Like,
	Glob,
}
impl SqlOp {
	pub fn format(&self) -> &'static str {
		match self {
			SqlOp::Lt => "<",
			SqlOp::Gt => ">",
			SqlOp::Le => "<=",
			SqlOp::Ge => ">=",
			SqlOp::Eq => "=",
			SqlOp::Ne => "<>",
			SqlOp::Is => "IS",
			SqlOp::IsNot => "IS NOT",
			SqlOp::And => "AND",
			SqlOp::Or => "OR",
			SqlOp::Plus => "+",
			SqlOp::Minus => "-",
			SqlOp::Div => "/",
			SqlOp::Mul => "*",
			SqlOp::Mod => "%",
			SqlOp::Concat => "||",
			SqlOp::Like => "LIKE",
			SqlOp::Glob => "GLOB",
		}
	}
}

/// Keyword-valued time literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentTime {
	Time,
	Date,
	Timestamp,
}

/// Expression tree used by `CHECK` and `DEFAULT` clauses.
#[derive(Debug, Clone, PartialEq)]
pub enum Sql {
	Cast(Box<Sql>, ColumnType),
	Call(String, Vec<Sql>),
	String(String),
	Number(i128),
	Real(f64),
	Blob(Vec<u8>),
	Ident(String),
	UnOp(SqlUnOp, Box<Sql>),
	BinOp(Box<Sql>, SqlOp, Box<Sql>),
	Parened(Box<Sql>),
	Boolean(bool),
	Current(CurrentTime),
	Null,
}
impl Sql {
	pub fn string(value: impl Into<String>) -> Self {
		Self::String(value.into())
	}
	pub fn ident(column: impl Into<String>) -> Self {
		Self::Ident(column.into())
	}
	pub fn call(function: impl Into<String>, args: impl IntoIterator<Item = Sql>) -> Self {
		Self::Call(function.into(), args.into_iter().collect())
	}
	pub fn cast(self, ty: ColumnType) -> Self {
		Self::Cast(Box::new(self), ty)
	}
	pub fn binop(self, op: SqlOp, other: Sql) -> Self {
		Self::BinOp(Box::new(self), op, Box::new(other))
	}
	pub fn unop(op: SqlUnOp, value: Sql) -> Self {
		Self::UnOp(op, Box::new(value))
	}
	pub fn parened(self) -> Self {
		Self::Parened(Box::new(self))
	}

	/// Literals may appear after `DEFAULT` without parentheses.
	pub fn is_literal(&self) -> bool {
		match self {
			Sql::String(_)
			| Sql::Number(_)
			| Sql::Real(_)
			| Sql::Blob(_)
			| Sql::Boolean(_)
			| Sql::Current(_)
			| Sql::Null => true,
			Sql::Cast(_, _)
			| Sql::Call(_, _)
			| Sql::Ident(_)
			| Sql::UnOp(_, _)
			| Sql::BinOp(_, _, _)
			| Sql::Parened(_) => false,
		}
	}

	/// Distinct column names referenced by the expression, in order of first appearance.
	pub fn affected_columns(&self) -> Vec<&str> {
		struct ColumnCollector<'s> {
			columns: Vec<&'s str>,
		}
		impl<'s> SqlVisitor<'s> for ColumnCollector<'s> {
			fn handle_column(&mut self, column: &'s str) {
				if self.columns.contains(&column) {
					return;
				}
				self.columns.push(column)
			}
		}
		let mut collector = ColumnCollector { columns: vec![] };
		self.visit(&mut collector);
		collector.columns
	}
	fn visit<'s>(&'s self, v: &mut impl SqlVisitor<'s>) {
		v.handle(self);
		match self {
			Sql::Cast(s, t) => {
				s.visit(v);
				v.handle_type(t);
			}
			Sql::Call(_p, args) => {
				for arg in args {
					arg.visit(v);
				}
			}
			Sql::String(_) | Sql::Number(_) | Sql::Real(_) | Sql::Blob(_) => {}
			Sql::Ident(i) => v.handle_column(i),
			Sql::UnOp(_o, s) => s.visit(v),
			Sql::BinOp(a, _o, b) => {
				a.visit(v);
				b.visit(v);
			}
			Sql::Parened(s) => s.visit(v),
			Sql::Boolean(_) | Sql::Current(_) | Sql::Null => {}
		}
	}
	pub fn all(s: impl IntoIterator<Item = Self>) -> Self {
		let mut s = s.into_iter();
		let mut v = s.next().unwrap_or(Self::Boolean(true));
		for i in s {
			v = Sql::BinOp(Box::new(v), SqlOp::And, Box::new(i))
		}
		v
	}
}
impl From<i128> for Sql {
	fn from(value: i128) -> Self {
		Self::Number(value)
	}
}
impl From<i64> for Sql {
	fn from(value: i64) -> Self {
		Self::Number(value.into())
	}
}
impl From<i32> for Sql {
	fn from(value: i32) -> Self {
		Self::Number(value.into())
	}
}
impl From<f64> for Sql {
	fn from(value: f64) -> Self {
		Self::Real(value)
	}
}
impl From<bool> for Sql {
	fn from(value: bool) -> Self {
		Self::Boolean(value)
	}
}
impl From<&str> for Sql {
	fn from(value: &str) -> Self {
		Self::String(value.to_owned())
	}
}
impl From<String> for Sql {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

#[allow(unused_variables)]
pub trait SqlVisitor<'s> {
	fn handle(&mut self, sql: &'s Sql) {}
	fn handle_type(&mut self, ty: &'s ColumnType) {}
	fn handle_column(&mut self, column: &'s str) {}
}
