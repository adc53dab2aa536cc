use anyhow::{bail, Result};
use clap::{Args, Parser};
use itertools::Itertools;
use generator_sqlite::{validate, Generator, GeneratorOptions, Layout, Quoting};
use syntax::{
	ColumnConstraint, ColumnDefBuilder, ColumnType, CreateTableBuilder, Describable,
	ForeignKeyClause,
};
use tracing::{debug, warn};

#[derive(Args)]
struct OutputOpts {
	/// Put every table item on its own line.
	#[clap(long)]
	pretty: bool,
	/// Quote every identifier, not only the ones SQLite can't read bare.
	#[clap(long)]
	quote_all: bool,
	/// Fail on definitions SQLite would reject.
	#[clap(long)]
	validate: bool,
}
impl OutputOpts {
	fn generator(&self) -> Generator {
		Generator::new(GeneratorOptions {
			quoting: if self.quote_all {
				Quoting::Always
			} else {
				Quoting::WhenNeeded
			},
			layout: if self.pretty {
				Layout::Pretty
			} else {
				Layout::Compact
			},
		})
	}
}

#[derive(Parser)]
#[clap(author, version)]
enum Opts {
	/// Print a single column definition.
	Column {
		name: String,
		/// Declared type, written verbatim.
		#[clap(long = "type", short = 't')]
		ty: Option<String>,
		#[clap(long)]
		primary_key: bool,
		/// Only meaningful together with --primary-key.
		#[clap(long, requires = "primary_key")]
		autoincrement: bool,
		#[clap(long)]
		not_null: bool,
		#[clap(long)]
		unique: bool,
		#[clap(long, conflicts_with = "default_text", allow_negative_numbers = true)]
		default_int: Option<i64>,
		#[clap(long)]
		default_text: Option<String>,
		#[clap(long)]
		collate: Option<String>,
		/// Referenced table, its primary key is used.
		#[clap(long)]
		references: Option<String>,
		#[clap(flatten)]
		output: OutputOpts,
	},
	/// Print a CREATE TABLE statement.
	Table {
		name: String,
		/// Column as `name` or `name:TYPE`, in declaration order.
		#[clap(long = "column", short = 'c', required = true)]
		columns: Vec<String>,
		/// Mark the column as PRIMARY KEY. Repeat for a composite key.
		#[clap(long)]
		primary_key: Vec<String>,
		#[clap(long)]
		not_null: Vec<String>,
		#[clap(long)]
		unique: Vec<String>,
		#[clap(long)]
		if_not_exists: bool,
		#[clap(long)]
		without_rowid: bool,
		#[clap(flatten)]
		output: OutputOpts,
	},
}

/// Split `name[:TYPE]`, the type part is taken verbatim.
fn parse_column_arg(arg: &str) -> Result<ColumnDefBuilder> {
	let (name, ty) = match arg.split_once(':') {
		Some((name, ty)) => (name.trim(), Some(ty.trim())),
		None => (arg.trim(), None),
	};
	if name.is_empty() {
		bail!("column name is missing in {arg:?}");
	}
	let column = ColumnDefBuilder::new(name);
	Ok(match ty {
		Some("") => bail!("column type is missing in {arg:?}"),
		Some(ty) => column.with_type(ColumnType::new(ty)),
		None => column,
	})
}

fn build_table(
	name: String,
	columns: &[String],
	primary_key: &[String],
	not_null: &[String],
	unique: &[String],
) -> Result<CreateTableBuilder> {
	let mut parsed = Vec::with_capacity(columns.len());
	for arg in columns {
		parsed.push(parse_column_arg(arg)?);
	}
	let mentioned = primary_key.iter().chain(not_null).chain(unique);
	for column in mentioned {
		if !parsed.iter().any(|c| &c.node().name == column) {
			bail!("column {column:?} is not declared with --column");
		}
	}
	let primary_key = primary_key.iter().unique().cloned().collect::<Vec<_>>();
	let composite_key = primary_key.len() > 1;
	let columns = parsed.into_iter().map(|column| {
		let name = column.node().name.clone();
		let has = |list: &[String]| list.contains(&name);
		let mut constraints = vec![];
		if has(&primary_key) && !composite_key {
			constraints.push(ColumnConstraint::primary_key());
		}
		if has(not_null) {
			constraints.push(ColumnConstraint::not_null());
		}
		if has(unique) {
			constraints.push(ColumnConstraint::unique());
		}
		column.by_adding_constraints(constraints)
	});
	let mut table = CreateTableBuilder::new(name).by_adding_columns(columns);
	if composite_key {
		debug!("using table-level primary key");
		table = table.by_adding_constraint(syntax::TableConstraint::primary_key(&primary_key));
	}
	Ok(table)
}

fn emit(fragment: &dyn Describable, output: &OutputOpts, terminator: &str) -> Result<()> {
	if output.validate {
		if let Err(errors) = validate(fragment) {
			for error in &errors {
				warn!("{error}");
			}
			bail!(
				"validation failed: {}",
				errors
					.iter()
					.map(ToString::to_string)
					.collect::<Vec<_>>()
					.join("; ")
			);
		}
	}
	println!("{}{terminator}", output.generator().describe(fragment));
	Ok(())
}

fn main() -> Result<()> {
	tracing_subscriber::fmt::init();
	let opts = Opts::parse();
	match opts {
		Opts::Column {
			name,
			ty,
			primary_key,
			autoincrement,
			not_null,
			unique,
			default_int,
			default_text,
			collate,
			references,
			output,
		} => {
			let mut column = ColumnDefBuilder::new(name);
			if let Some(ty) = ty {
				column = column.with_type(ColumnType::new(ty));
			}
			if primary_key {
				let mut pk = ColumnConstraint::primary_key();
				if autoincrement {
					pk = pk.autoincrement();
				}
				column = column.by_adding_constraint(pk);
			}
			if not_null {
				column = column.by_adding_constraint(ColumnConstraint::not_null());
			}
			if unique {
				column = column.by_adding_constraint(ColumnConstraint::unique());
			}
			if let Some(default) = default_int {
				column = column.by_adding_constraint(ColumnConstraint::default_value(default));
			}
			if let Some(default) = default_text {
				column = column.by_adding_constraint(ColumnConstraint::default_value(default));
			}
			if let Some(collate) = collate {
				column = column.by_adding_constraint(ColumnConstraint::collate(collate));
			}
			if let Some(table) = references {
				column = column
					.by_adding_constraint(ColumnConstraint::references(ForeignKeyClause::new(table)));
			}
			emit(&column, &output, "")
		}
		Opts::Table {
			name,
			columns,
			primary_key,
			not_null,
			unique,
			if_not_exists,
			without_rowid,
			output,
		} => {
			let mut table = build_table(name, &columns, &primary_key, &not_null, &unique)?;
			if if_not_exists {
				table = table.if_not_exists();
			}
			if without_rowid {
				table = table.without_rowid();
			}
			emit(&table, &output, ";")
		}
	}
}
