use std::io;

use serde_json::{Map, Value};

use crate::container::{
    document::resolve,
    schema::{Properties, SchemaNode},
};

use super::prompt::{Prompter, Question};

/// Turns a property tree into a sequence of questions, depth first and in
/// declaration order, and assembles the answers into a matching object.
pub struct Walker<'a, P> {
    prior: Option<&'a Value>,
    prompter: P,
}

impl<'a, P: Prompter> Walker<'a, P> {
    pub fn new(prior: Option<&'a Value>, prompter: P) -> Self {
        Self { prior, prompter }
    }

    pub fn walk(
        &mut self,
        properties: &Properties,
        parent_path: &str,
        mut accumulator: Map<String, Value>,
    ) -> io::Result<Map<String, Value>> {
        for (key, node) in properties {
            let full_path = if parent_path.is_empty() {
                key.clone()
            } else {
                format!("{parent_path}.{key}")
            };

            let value = if node.is_composite() {
                let seed = match resolve(self.prior, &full_path) {
                    Some(Value::Object(existing)) => existing.clone(),
                    _ => Map::new(),
                };
                tracing::trace!(path = %full_path, seeded = !seed.is_empty(), "entering object");
                Value::Object(self.walk(&node.properties, &full_path, seed)?)
            } else {
                self.ask(&full_path, node)?
            };

            accumulator.insert(key.clone(), value);
        }

        Ok(accumulator)
    }

    fn ask(&mut self, path: &str, node: &SchemaNode) -> io::Result<Value> {
        let default = resolve(self.prior, path)
            .cloned()
            .unwrap_or_else(|| Value::String(String::new()));
        let question = Question {
            path,
            node,
            default: &default,
        };

        let answer = self.prompter.ask(&question.to_string())?;
        tracing::debug!(path, kept_default = answer.is_empty(), "answered");
        if answer.is_empty() {
            Ok(default)
        } else {
            Ok(Value::String(answer))
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::{
        app::prompt::test_prompter::ScriptedPrompter, container::schema::Schema,
    };

    fn schema(value: Value) -> Schema {
        Schema::from_value(value).unwrap()
    }

    fn sample_schema() -> Schema {
        schema(json!({
            "properties": {
                "name": {"type": "string", "description": "Your name"},
                "address": {
                    "type": "object",
                    "properties": {"city": {"type": "string", "description": "City"}}
                }
            }
        }))
    }

    fn run(schema: &Schema, prior: Option<&Value>, prompter: &mut ScriptedPrompter) -> Value {
        let mut walker = Walker::new(prior, prompter);
        Value::Object(walker.walk(&schema.properties, "", Map::new()).unwrap())
    }

    fn asked_paths(prompter: &ScriptedPrompter) -> Vec<String> {
        prompter
            .questions
            .iter()
            .map(|question| {
                let start = question.find('"').unwrap() + 1;
                let end = start + question[start..].find('"').unwrap();
                question[start..end].to_string()
            })
            .collect()
    }

    #[test]
    fn fresh_answers_test() {
        let schema = sample_schema();
        let mut prompter = ScriptedPrompter::new(["Alice", "Paris"]);
        let result = run(&schema, None, &mut prompter);

        assert_eq!(result, json!({"name": "Alice", "address": {"city": "Paris"}}));
        assert_eq!(
            prompter.questions,
            [
                "\nAttribute \"name\": Your name\nType: string (): ",
                "\nAttribute \"address.city\": City\nType: string (): ",
            ]
        );
    }

    #[test]
    fn empty_answers_keep_prior_test() {
        let schema = sample_schema();
        let prior = json!({"name": "Bob", "address": {"city": "Lyon"}});
        let mut prompter = ScriptedPrompter::new(["", ""]);
        let result = run(&schema, Some(&prior), &mut prompter);

        assert_eq!(result, prior);
        assert_eq!(
            prompter.questions[1],
            "\nAttribute \"address.city\": City\nType: string (Lyon): "
        );
    }

    #[test]
    fn answers_override_prior_test() {
        let schema = sample_schema();
        let prior = json!({"name": "Bob", "address": {"city": "Lyon"}});
        let mut prompter = ScriptedPrompter::new(["", "  Nice "]);
        let result = run(&schema, Some(&prior), &mut prompter);

        assert_eq!(result, json!({"name": "Bob", "address": {"city": "  Nice "}}));
    }

    #[test]
    fn empty_answer_without_prior_is_empty_string_test() {
        let schema = sample_schema();
        let mut prompter = ScriptedPrompter::new(["", ""]);
        let result = run(&schema, None, &mut prompter);

        assert_eq!(result, json!({"name": "", "address": {"city": ""}}));
    }

    #[test]
    fn prior_values_keep_their_type_test() {
        let schema = schema(json!({
            "properties": {
                "port": {"type": "integer"},
                "debug": {"type": "boolean"},
                "extra": {"type": "string"},
                "nothing": {"type": "null"}
            }
        }));
        let prior = json!({"port": 8080, "debug": false, "extra": {"deep": [1, 2]}, "nothing": null});
        let mut prompter = ScriptedPrompter::new(["", "", "", ""]);
        let result = run(&schema, Some(&prior), &mut prompter);

        assert_eq!(result, prior);
    }

    #[test]
    fn answers_are_not_coerced_test() {
        let schema = schema(json!({"properties": {"port": {"type": "integer"}}}));
        let prior = json!({"port": 8080});
        let mut prompter = ScriptedPrompter::new(["9090"]);
        let result = run(&schema, Some(&prior), &mut prompter);

        assert_eq!(result, json!({"port": "9090"}));
    }

    #[test]
    fn declaration_order_is_depth_first_test() {
        let schema = schema(json!({
            "properties": {
                "z": {"type": "string"},
                "server": {
                    "type": "object",
                    "properties": {
                        "port": {"type": "integer"},
                        "tls": {
                            "type": "object",
                            "properties": {"key": {}, "cert": {}}
                        },
                        "host": {"type": "string"}
                    }
                },
                "a": {"type": "string"}
            }
        }));
        let mut prompter = ScriptedPrompter::new(["1", "2", "3", "4", "5", "6"]);
        let result = run(&schema, None, &mut prompter);

        assert_eq!(
            asked_paths(&prompter),
            [
                "z",
                "server.port",
                "server.tls.key",
                "server.tls.cert",
                "server.host",
                "a"
            ]
        );
        assert_eq!(prompter.remaining(), 0);
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"z":"1","server":{"port":"2","tls":{"key":"3","cert":"4"},"host":"5"},"a":"6"}"#
        );
    }

    #[test]
    fn objects_without_children_are_leaves_test() {
        let schema = schema(json!({
            "properties": {
                "empty": {"type": "object", "properties": {}},
                "bare": {"type": "object", "description": "Anything"},
                "broken": 3
            }
        }));
        let mut prompter = ScriptedPrompter::new(["x", "y", "z"]);
        let result = run(&schema, None, &mut prompter);

        assert_eq!(result, json!({"empty": "x", "bare": "y", "broken": "z"}));
        assert_eq!(
            prompter.questions[2],
            "\nAttribute \"broken\": \nType:  (): "
        );
    }

    #[test]
    fn seeded_objects_keep_unknown_keys_test() {
        let schema = sample_schema();
        let prior = json!({
            "legacy": true,
            "name": "Bob",
            "address": {"street": "Main", "city": "Lyon"}
        });
        let mut prompter = ScriptedPrompter::new(["", "Paris"]);
        let result = run(&schema, Some(&prior), &mut prompter);

        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"name":"Bob","address":{"street":"Main","city":"Paris"}}"#
        );
    }

    #[test]
    fn non_object_prior_is_not_a_seed_test() {
        let schema = sample_schema();
        let prior = json!({"name": "Bob", "address": "somewhere"});
        let mut prompter = ScriptedPrompter::new(["", ""]);
        let result = run(&schema, Some(&prior), &mut prompter);

        assert_eq!(result, json!({"name": "Bob", "address": {"city": ""}}));
    }

    #[test]
    fn mirrors_schema_shape_test() {
        let schema = schema(json!({
            "properties": {
                "a": {"type": "object", "properties": {
                    "b": {"type": "object", "properties": {"c": {}}},
                    "d": {}
                }},
                "e": {}
            }
        }));
        let mut prompter = ScriptedPrompter::new(["1", "2", "3"]);
        let result = run(&schema, None, &mut prompter);

        assert_eq!(result, json!({"a": {"b": {"c": "1"}, "d": "2"}, "e": "3"}));
    }

    #[test]
    fn second_run_with_empty_answers_is_idempotent_test() {
        let schema = schema(json!({
            "properties": {
                "name": {"type": "string"},
                "server": {"type": "object", "properties": {
                    "host": {"type": "string"},
                    "port": {"type": "integer"}
                }}
            }
        }));
        let mut first = ScriptedPrompter::new(["svc", "localhost", "80"]);
        let first_result = run(&schema, None, &mut first);

        let mut second = ScriptedPrompter::new(["", "", ""]);
        let second_result = run(&schema, Some(&first_result), &mut second);

        assert_eq!(
            serde_json::to_string(&second_result).unwrap(),
            serde_json::to_string(&first_result).unwrap()
        );
    }

    #[test]
    fn prompt_failure_stops_walk_test() {
        let schema = sample_schema();
        let mut prompter = ScriptedPrompter::new(["Alice"]);
        let mut walker = Walker::new(None, &mut prompter);
        let err = walker
            .walk(&schema.properties, "", Map::new())
            .unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(prompter.questions.len(), 2);
    }
}
