//! Escaping of literals and identifiers for SQLite.
//!
//! Identifiers are only quoted when SQLite would otherwise misread them, so generated SQL stays
//! close to what a person would write by hand.

/// Keywords listed by SQLite as reserved in at least some contexts.
///
/// Sorted for binary search.
const KWS: [&str; 147] = [
	"ABORT",
	"ACTION",
	"ADD",
	"AFTER",
	"ALL",
	"ALTER",
	"ALWAYS",
	"ANALYZE",
	"AND",
	"AS",
	"ASC",
	"ATTACH",
	"AUTOINCREMENT",
	"BEFORE",
	"BEGIN",
	"BETWEEN",
	"BY",
	"CASCADE",
	"CASE",
	"CAST",
	"CHECK",
	"COLLATE",
	"COLUMN",
	"COMMIT",
	"CONFLICT",
	"CONSTRAINT",
	"CREATE",
	"CROSS",
	"CURRENT",
	"CURRENT_DATE",
	"CURRENT_TIME",
	"CURRENT_TIMESTAMP",
	"DATABASE",
	"DEFAULT",
	"DEFERRABLE",
	"DEFERRED",
	"DELETE",
	"DESC",
	"DETACH",
	"DISTINCT",
	"DO",
	"DROP",
	"EACH",
	"ELSE",
	"END",
	"ESCAPE",
	"EXCEPT",
	"EXCLUDE",
	"EXCLUSIVE",
	"EXISTS",
	"EXPLAIN",
	"FAIL",
	"FILTER",
	"FIRST",
	"FOLLOWING",
	"FOR",
	"FOREIGN",
	"FROM",
	"FULL",
	"GENERATED",
	"GLOB",
	"GROUP",
	"GROUPS",
	"HAVING",
	"IF",
	"IGNORE",
	"IMMEDIATE",
	"IN",
	"INDEX",
	"INDEXED",
	"INITIALLY",
	"INNER",
	"INSERT",
	"INSTEAD",
	"INTERSECT",
	"INTO",
	"IS",
	"ISNULL",
	"JOIN",
	"KEY",
	"LAST",
	"LEFT",
	"LIKE",
	"LIMIT",
	"MATCH",
	"MATERIALIZED",
	"NATURAL",
	"NO",
	"NOT",
	"NOTHING",
	"NOTNULL",
	"NULL",
	"NULLS",
	"OF",
	"OFFSET",
	"ON",
	"OR",
	"ORDER",
	"OTHERS",
	"OUTER",
	"OVER",
	"PARTITION",
	"PLAN",
	"PRAGMA",
	"PRECEDING",
	"PRIMARY",
	"QUERY",
	"RAISE",
	"RANGE",
	"RECURSIVE",
	"REFERENCES",
	"REGEXP",
	"REINDEX",
	"RELEASE",
	"RENAME",
	"REPLACE",
	"RESTRICT",
	"RETURNING",
	"RIGHT",
	"ROLLBACK",
	"ROW",
	"ROWS",
	"SAVEPOINT",
	"SELECT",
	"SET",
	"TABLE",
	"TEMP",
	"TEMPORARY",
	"THEN",
	"TIES",
	"TO",
	"TRANSACTION",
	"TRIGGER",
	"UNBOUNDED",
	"UNION",
	"UNIQUE",
	"UPDATE",
	"USING",
	"VACUUM",
	"VALUES",
	"VIEW",
	"VIRTUAL",
	"WHEN",
	"WHERE",
	"WINDOW",
	"WITH",
	"WITHOUT",
];

/// Whether the identifier has to be quoted to be read back as the same identifier.
pub fn should_escape(input: &str) -> bool {
	if input.is_empty() {
		return true;
	}
	for (i, l) in input.chars().enumerate() {
		if !l.is_ascii() {
			// SQLite accepts most non-ascii characters in identifiers, but keep them quoted.
			return true;
		}
		match l {
			// Identifiers are case-insensitive, no folding concerns here.
			'a'..='z' | 'A'..='Z' | '_' => {}
			// Not allowed as first letter
			'0'..='9' | '$' if i != 0 => {}
			_ => {
				return true;
			}
		}
	}
	if KWS.binary_search(&input.to_ascii_uppercase().as_str()).is_ok() {
		return true;
	}
	false
}

/// Escape an identifier, surrounding it with double quotes only if required.
pub fn escape_identifier(input: &str) -> String {
	if !should_escape(input) {
		return input.to_owned();
	}
	quote_identifier(input)
}

/// Unconditionally quote an identifier.
pub fn quote_identifier(input: &str) -> String {
	escape_internal(input, '"')
}

/// Escape a string literal and surround result with single quotes.
///
/// Backslashes have no special meaning in SQLite string literals.
pub fn escape_literal(input: &str) -> String {
	escape_internal(input, '\'')
}

fn escape_internal(input: &str, quote_char: char) -> String {
	let num_quotes = input.chars().filter(|ch| *ch == quote_char).count();

	let mut output = String::with_capacity(input.len() + num_quotes + 2);
	output.push(quote_char);
	if num_quotes == 0 {
		output.push_str(input);
	} else {
		for ch in input.chars() {
			if ch == quote_char {
				output.push(ch);
			}
			output.push(ch);
		}
	}
	output.push(quote_char);

	output
}
