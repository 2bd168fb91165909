use serde_json::{Map, Value};

/// A store-ready partial update: the `SET` expression plus its
/// name-placeholder and value-placeholder maps.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
    pub expression: String,
    pub names: Map<String, Value>,
    pub values: Map<String, Value>,
}

/// Build a partial-update instruction from a field→value mapping. The `id`
/// key is skipped; assignment order follows the input map's iteration order,
/// so callers needing a deterministic expression must supply an
/// order-preserving map.
pub fn build_update_expression(fields: &Map<String, Value>) -> UpdateExpression {
    let mut assignments = Vec::with_capacity(fields.len());
    let mut names = Map::new();
    let mut values = Map::new();

    for (key, value) in fields {
        if key == "id" {
            continue;
        }
        assignments.push(format!("#{key} = :{key}"));
        names.insert(format!("#{key}"), Value::String(key.clone()));
        values.insert(format!(":{key}"), value.clone());
    }

    UpdateExpression {
        expression: format!("SET {}", assignments.join(", "))
            .trim_end()
            .to_string(),
        names,
        values,
    }
}
