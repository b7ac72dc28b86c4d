use schema_doctor::detector::{AnalysisContext, Detector, Setting};
use schema_doctor::problem::{Problem, Problems};
use schema_doctor::schema::Index;
use schema_doctor::DoctorResult;

/// Detects indexes that duplicate the primary key or can be replaced by
/// another index on the same table.
pub struct ExtraneousIndexes;

const PRIMARY_KEY: &str = "primary_key";
const MULTI_COLUMN: &str = "multi_column";

/// Can every lookup served by `index` be served by `other` instead?
fn replaceable_with(index: &Index, other: &Index) -> bool {
    if index.predicate != other.predicate {
        return false;
    }
    match (index.unique, other.unique) {
        // A unique index stays enforceable by a unique index on a subset of its columns.
        (true, true) => other.columns.iter().all(|c| index.columns.contains(c)),
        (true, false) => false,
        _ => {
            index.columns.len() <= other.columns.len()
                && index.columns.iter().zip(&other.columns).all(|(a, b)| a == b)
        }
    }
}

fn coincides_with_primary_key(index: &Index, primary_key: &[String]) -> bool {
    primary_key.len() == 1 && index.columns == primary_key && !index.is_partial()
}

impl Detector for ExtraneousIndexes {
    fn name(&self) -> &str {
        "extraneous_indexes"
    }

    fn description(&self) -> &str {
        "Detects indexes replaceable by the primary key or by other indexes"
    }

    fn settings(&self) -> Vec<Setting> {
        vec![Setting::ignore_tables(), Setting::ignore_indexes()]
    }

    fn detect(&self, ctx: &AnalysisContext<'_>, problems: &mut Problems) -> DoctorResult<()> {
        let ignored_indexes = ctx.ignore("ignore_indexes")?;

        for table in ctx.tables()? {
            let primary_key = ctx.schema.primary_key_columns(table);
            let indexes: Vec<&Index> = ctx
                .schema
                .indexes(table)
                .iter()
                .filter(|index| !index.expression)
                .collect();

            // Indexes that stay: nothing else can replace them, and of two
            // interchangeable indexes the one with the smaller name wins.
            let maximal: Vec<&Index> = indexes
                .iter()
                .copied()
                .filter(|index| !coincides_with_primary_key(index, primary_key))
                .filter(|index| {
                    !indexes.iter().any(|other| {
                        other.name != index.name
                            && replaceable_with(index, other)
                            && (!replaceable_with(other, index) || other.name < index.name)
                    })
                })
                .collect();

            for index in &indexes {
                if ignored_indexes.matches(&index.name) {
                    continue;
                }

                if coincides_with_primary_key(index, primary_key) {
                    problems.emit(
                        Problem::new()
                            .with("table", table)
                            .with("extraneous_index", &index.name)
                            .with("reason", PRIMARY_KEY),
                    );
                    continue;
                }

                if maximal.iter().any(|m| m.name == index.name) {
                    continue;
                }
                let mut replacements: Vec<String> = maximal
                    .iter()
                    .filter(|other| replaceable_with(index, other))
                    .map(|other| other.name.clone())
                    .collect();
                if replacements.is_empty() {
                    continue;
                }
                replacements.sort();
                problems.emit(
                    Problem::new()
                        .with("table", table)
                        .with("extraneous_index", &index.name)
                        .with("reason", MULTI_COLUMN)
                        .with("replacement_indexes", replacements),
                );
            }
        }
        Ok(())
    }

    fn message(&self, problem: &Problem) -> String {
        let index = problem.text("extraneous_index");
        if problem.text("reason") == PRIMARY_KEY {
            format!("remove {index} - coincides with the primary key on the table")
        } else {
            format!(
                "remove {index} - can be replaced by {}",
                problem.list("replacement_indexes").join(" or ")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use schema_doctor::detector::{Overrides, SettingValue};
    use schema_doctor::schema::{Column, SchemaSnapshot, Table};

    fn users(indexes: Vec<Index>) -> SchemaSnapshot {
        let mut table = Table::new("users")
            .with_id()
            .column(Column::new("email", "character varying"))
            .column(Column::new("last_name", "character varying"))
            .column(Column::new("first_name", "character varying"));
        for index in indexes {
            table = table.index(index);
        }
        SchemaSnapshot::new("postgresql").table(table)
    }

    #[test]
    fn test_detects_prefix_index() {
        let schema = users(vec![
            Index::new("index_users_on_last_name", ["last_name"]),
            Index::new("index_users_on_last_name_and_first_name", ["last_name", "first_name"]),
        ]);
        assert_problems(
            &ExtraneousIndexes,
            &schema,
            &["remove index_users_on_last_name - can be replaced by index_users_on_last_name_and_first_name"],
        );
    }

    #[test]
    fn test_lists_every_replacement_sorted() {
        let schema = users(vec![
            Index::new("index_users_on_last_name", ["last_name"]),
            Index::new("index_z", ["last_name", "first_name"]),
            Index::new("index_a", ["last_name", "email"]),
        ]);
        assert_problems(
            &ExtraneousIndexes,
            &schema,
            &["remove index_users_on_last_name - can be replaced by index_a or index_z"],
        );
    }

    #[test]
    fn test_detects_index_on_primary_key() {
        let schema = users(vec![Index::new("index_users_on_id", ["id"])]);
        assert_problems(
            &ExtraneousIndexes,
            &schema,
            &["remove index_users_on_id - coincides with the primary key on the table"],
        );
    }

    #[test]
    fn test_unique_index_is_not_replaced_by_non_unique() {
        let schema = users(vec![
            Index::new("index_users_on_email", ["email"]).unique(),
            Index::new("index_users_on_email_and_last_name", ["email", "last_name"]),
        ]);
        refute_problems(&ExtraneousIndexes, &schema);
    }

    #[test]
    fn test_unique_index_replaced_by_narrower_unique() {
        let schema = users(vec![
            Index::new("index_users_on_email", ["email"]).unique(),
            Index::new("index_users_on_email_and_last_name", ["email", "last_name"]).unique(),
        ]);
        assert_problems(
            &ExtraneousIndexes,
            &schema,
            &["remove index_users_on_email_and_last_name - can be replaced by index_users_on_email"],
        );
    }

    #[test]
    fn test_partial_indexes_differ() {
        let schema = users(vec![
            Index::new("index_users_on_last_name", ["last_name"]).partial("email IS NOT NULL"),
            Index::new("index_users_on_last_name_and_first_name", ["last_name", "first_name"]),
            Index::new("index_active_users_on_id", ["id"]).partial("deleted_at IS NULL"),
        ]);
        refute_problems(&ExtraneousIndexes, &schema);
    }

    #[test]
    fn test_duplicate_indexes_keep_one() {
        let schema = users(vec![
            Index::new("index_b", ["email"]),
            Index::new("index_a", ["email"]),
        ]);
        assert_problems(
            &ExtraneousIndexes,
            &schema,
            &["remove index_b - can be replaced by index_a"],
        );
    }

    #[test]
    fn test_duplicate_unique_indexes_keep_one() {
        let schema = users(vec![
            Index::new("index_users_on_email", ["email"]).unique(),
            Index::new("index_users_on_email_unique", ["email"]).unique(),
        ]);
        assert_problems(
            &ExtraneousIndexes,
            &schema,
            &["remove index_users_on_email_unique - can be replaced by index_users_on_email"],
        );
    }

    #[test]
    fn test_replacements_come_from_surviving_indexes() {
        let schema = users(vec![
            Index::new("index_users_on_last_name", ["last_name"]),
            Index::new("index_users_on_last_name_and_first_name", ["last_name", "first_name"]),
            Index::new("index_users_on_names", ["last_name", "first_name", "email"]),
        ]);
        assert_problems(
            &ExtraneousIndexes,
            &schema,
            &[
                "remove index_users_on_last_name - can be replaced by index_users_on_names",
                "remove index_users_on_last_name_and_first_name - can be replaced by index_users_on_names",
            ],
        );
    }

    #[test]
    fn test_expression_indexes_are_skipped() {
        let schema = users(vec![
            Index::new("index_users_on_lower_email", ["lower((email)::text)"]).expression(),
            Index::new("index_users_on_email", ["email"]),
            Index::new("index_users_on_email_prefix", Vec::<String>::new()).expression(),
        ]);
        refute_problems(&ExtraneousIndexes, &schema);

        let schema = users(vec![
            Index::new("index_users_on_email", ["email"]),
            Index::new("index_users_on_email_and_lower_name", ["email", "lower((last_name)::text)"])
                .expression(),
        ]);
        refute_problems(&ExtraneousIndexes, &schema);
    }

    #[test]
    fn test_config_ignore_indexes() {
        let schema = users(vec![
            Index::new("index_users_on_last_name", ["last_name"]),
            Index::new("index_users_on_last_name_and_first_name", ["last_name", "first_name"]),
        ]);
        let overrides = Overrides::new().set(
            "ignore_indexes",
            SettingValue::list(["index_users_on_last_name"]),
        );
        refute_problems_with(&ExtraneousIndexes, &schema, &[], &overrides);
    }
}
