//! SQL text for each supported store.

use retail_model::ColumnKind;

use crate::config::StoreDriver;

/// Upper bound on bind parameters in a single INSERT.
///
/// SQLite caps a statement at 999 parameters in older builds; the other
/// stores allow far more.
pub const MAX_BIND_PARAMS: usize = 900;

/// Quote an identifier, doubling any embedded quote character.
pub fn quote_identifier(driver: StoreDriver, name: &str) -> String {
    let quote = match driver {
        StoreDriver::Mysql => '`',
        StoreDriver::Postgres | StoreDriver::Sqlite => '"',
    };
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push(quote);
    for ch in name.chars() {
        if ch == quote {
            quoted.push(quote);
        }
        quoted.push(ch);
    }
    quoted.push(quote);
    quoted
}

pub const fn column_type(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Numeric => "DOUBLE PRECISION",
        ColumnKind::Text => "TEXT",
    }
}

pub fn drop_table(driver: StoreDriver, table: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", quote_identifier(driver, table))
}

pub fn create_table(driver: StoreDriver, table: &str, columns: &[(&str, ColumnKind)]) -> String {
    let definitions: Vec<String> = columns
        .iter()
        .map(|(name, kind)| format!("{} {}", quote_identifier(driver, name), column_type(*kind)))
        .collect();
    format!(
        "CREATE TABLE {} ({})",
        quote_identifier(driver, table),
        definitions.join(", ")
    )
}

/// Multi-row INSERT with `rows` groups of placeholders.
pub fn insert_rows(driver: StoreDriver, table: &str, columns: &[&str], rows: usize) -> String {
    let names: Vec<String> = columns
        .iter()
        .map(|name| quote_identifier(driver, name))
        .collect();
    let mut sql = format!(
        "INSERT INTO {} ({}) VALUES ",
        quote_identifier(driver, table),
        names.join(", ")
    );
    let mut index = 0usize;
    for row in 0..rows {
        if row > 0 {
            sql.push_str(", ");
        }
        sql.push('(');
        for col in 0..columns.len() {
            if col > 0 {
                sql.push_str(", ");
            }
            index += 1;
            match driver {
                StoreDriver::Postgres => {
                    sql.push('$');
                    sql.push_str(&index.to_string());
                }
                StoreDriver::Mysql | StoreDriver::Sqlite => sql.push('?'),
            }
        }
        sql.push(')');
    }
    sql
}

/// Rows per INSERT for a table of `width` columns.
pub fn rows_per_batch(width: usize) -> usize {
    (MAX_BIND_PARAMS / width.max(1)).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoting_per_driver() {
        assert_eq!(quote_identifier(StoreDriver::Mysql, "order_id"), "`order_id`");
        assert_eq!(quote_identifier(StoreDriver::Postgres, "order_id"), "\"order_id\"");
        assert_eq!(quote_identifier(StoreDriver::Sqlite, "a\"b"), "\"a\"\"b\"");
        assert_eq!(quote_identifier(StoreDriver::Mysql, "a`b"), "`a``b`");
    }

    #[test]
    fn test_create_table_maps_kinds() {
        let sql = create_table(
            StoreDriver::Sqlite,
            "sales_report",
            &[("sku_code", ColumnKind::Text), ("stock", ColumnKind::Numeric)],
        );
        assert_eq!(
            sql,
            "CREATE TABLE \"sales_report\" (\"sku_code\" TEXT, \"stock\" DOUBLE PRECISION)"
        );
    }

    #[test]
    fn test_insert_placeholders() {
        let mysql = insert_rows(StoreDriver::Mysql, "t", &["a", "b"], 2);
        assert_eq!(mysql, "INSERT INTO `t` (`a`, `b`) VALUES (?, ?), (?, ?)");

        let postgres = insert_rows(StoreDriver::Postgres, "t", &["a", "b"], 2);
        assert_eq!(
            postgres,
            "INSERT INTO \"t\" (\"a\", \"b\") VALUES ($1, $2), ($3, $4)"
        );
    }

    #[test]
    fn test_batch_size_respects_parameter_budget() {
        assert_eq!(rows_per_batch(1), 900);
        assert_eq!(rows_per_batch(24), 37);
        assert_eq!(rows_per_batch(2000), 1);
        assert_eq!(rows_per_batch(0), 900);
    }
}
