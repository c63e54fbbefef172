use std::collections::HashMap;

use crate::errors::JoblyError;

#[derive(Debug, PartialEq)]
pub struct PartialUpdate<V> {
    pub set_cols: String,
    pub values: Vec<V>,
}

impl<V> PartialUpdate<V> {
    pub fn next_placeholder(&self) -> String {
        format!("${}", self.values.len() + 1)
    }
}

/// `[("first_name", "Aliya"), ("age", 32)]` => `"first_name"=$1, "age"=$2`
pub fn sql_for_partial_update<V>(
    fields: Vec<(&str, V)>,
    column_aliases: &HashMap<&str, &str>,
) -> Result<PartialUpdate<V>, JoblyError> {
    if fields.is_empty() {
        return Err(JoblyError::invalid_input("No data"));
    }

    let mut cols = Vec::with_capacity(fields.len());
    let mut values = Vec::with_capacity(fields.len());

    for (idx, (field, value)) in fields.into_iter().enumerate() {
        let column = column_aliases.get(field).copied().unwrap_or(field);
        cols.push(format!("\"{}\"=${}", column, idx + 1));
        values.push(value);
    }

    Ok(PartialUpdate {
        set_cols: cols.join(", "),
        values,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_set_cols_and_values() {
        let mut aliases = HashMap::new();
        aliases.insert("last_name", "Dawson");

        let update = sql_for_partial_update(
            vec![("first_name", "Andrew"), ("password", "Test")],
            &aliases,
        )
        .unwrap();

        assert_eq!(update.set_cols, r#""first_name"=$1, "password"=$2"#);
        assert_eq!(update.values, vec!["Andrew", "Test"]);
        assert_eq!(update.next_placeholder(), "$3");
    }

    #[test]
    fn test_column_aliases() {
        let mut aliases = HashMap::new();
        aliases.insert("numEmployees", "num_employees");
        aliases.insert("logoUrl", "logo_url");

        let update = sql_for_partial_update(
            vec![("name", 1), ("numEmployees", 2), ("logoUrl", 3)],
            &aliases,
        )
        .unwrap();

        assert_eq!(
            update.set_cols,
            r#""name"=$1, "num_employees"=$2, "logo_url"=$3"#
        );
        assert_eq!(update.values, vec![1, 2, 3]);
    }

    #[test]
    fn test_placeholders_follow_field_order() {
        let fields: Vec<(&str, usize)> = ["e", "d", "c", "b", "a"]
            .iter()
            .copied()
            .zip(0..)
            .collect();

        let update = sql_for_partial_update(fields, &HashMap::new()).unwrap();
        let assignments: Vec<&str> = update.set_cols.split(", ").collect();

        assert_eq!(assignments.len(), 5);
        for (idx, assignment) in assignments.iter().enumerate() {
            assert!(assignment.ends_with(&format!("=${}", idx + 1)));
        }
        assert_eq!(assignments[0], r#""e"=$1"#);
        assert_eq!(update.values, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_no_data() {
        let result = sql_for_partial_update::<String>(vec![], &HashMap::new());

        match result {
            Err(JoblyError::InvalidInput { message }) => assert_eq!(message, "No data"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }
}
