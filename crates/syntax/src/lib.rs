//! Grammar nodes for column definitions and `CREATE TABLE` statements, with fluent builders to
//! assemble them.
//!
//! Nodes are plain data. Turning them into SQL text is the job of a generator, which receives
//! them through the [`Describable`] capability.

use derivative::Derivative;

pub mod column;
pub mod column_type;
pub mod constraint;
pub mod sql;
pub mod table;

pub use column::ColumnDefBuilder;
pub use column_type::{Affinity, ColumnType, TypeSize};
pub use constraint::{
	ColumnConstraint, ColumnConstraintKind, ConflictClause, ForeignKeyAction, ForeignKeyClause,
	Order,
};
pub use table::{CreateTableBuilder, TableConstraint, TableConstraintKind};

/// Grammar nodes, as opposed to their builders.
pub mod node {
	pub use crate::{column::ColumnDef, table::CreateTable};
}

#[macro_export]
macro_rules! w {
    ($out:expr, $($tt:tt)*) => {{
        use std::fmt::Write;
        write!($out, $($tt)*).expect("write to String never fails");
    }};
}
#[macro_export]
macro_rules! newty_enum {
    (
        $(#[$($attr:tt)+])*
        $vis:vis enum $name:ident {$($Variant:ident = $accessor:ident),* $(,)+}
    ) => {
        $(#[$($attr)+])*
        $vis enum $name {
            $(
                $Variant($Variant),
            )*
        }
        // Transparent Debug, equivalent to derivative's `Debug = "transparent"`
        // (derivative's generated bindings trip macro_rules hygiene on newer rustc).
        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(Self::$Variant(value) => ::std::fmt::Debug::fmt(value, f),)*
                }
            }
        }
        paste::paste!{impl $name {$(
            $vis fn [<is_ $accessor>](&self) -> bool {
                matches!(self, Self::$Variant(_))
            }
            $vis fn [<as_ $accessor>](&self) -> Option<&$Variant> {
                match self {
                    Self::$Variant(value) => Some(value),
                    _ => None,
                }
            }
        )*}}
    };
}

/// Borrowed view of any grammar node a generator knows how to print.
#[derive(Derivative, Clone, Copy)]
#[derivative(Debug)]
pub enum Lang<'a> {
	#[derivative(Debug = "transparent")]
	ColumnDef(&'a node::ColumnDef),
	#[derivative(Debug = "transparent")]
	ColumnType(&'a ColumnType),
	#[derivative(Debug = "transparent")]
	ColumnConstraint(&'a ColumnConstraint),
	#[derivative(Debug = "transparent")]
	TableConstraint(&'a TableConstraint),
	#[derivative(Debug = "transparent")]
	Sql(&'a sql::Sql),
	#[derivative(Debug = "transparent")]
	CreateTable(&'a node::CreateTable),
}

/// Capability shared by every node and builder: expose the underlying node to a generator.
///
/// Object safe, so statements and callers can keep heterogeneous `&dyn Describable` lists.
pub trait Describable {
	fn lang(&self) -> Lang<'_>;
}
impl<T: Describable + ?Sized> Describable for &T {
	fn lang(&self) -> Lang<'_> {
		(**self).lang()
	}
}
impl<T: Describable + ?Sized> Describable for Box<T> {
	fn lang(&self) -> Lang<'_> {
		(**self).lang()
	}
}

impl Describable for ColumnType {
	fn lang(&self) -> Lang<'_> {
		Lang::ColumnType(self)
	}
}
impl Describable for ColumnConstraint {
	fn lang(&self) -> Lang<'_> {
		Lang::ColumnConstraint(self)
	}
}
impl Describable for sql::Sql {
	fn lang(&self) -> Lang<'_> {
		Lang::Sql(self)
	}
}
