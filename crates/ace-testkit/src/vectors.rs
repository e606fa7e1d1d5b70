//! Quoting vectors: raw `NAME=VALUE` tokens and the value each must yield.
//!
//! Every vector is stored with `ace set` and read back through `ace env`,
//! so the expected value is exactly what a child process sees.

/// A known value token and its unquoted result.
#[derive(Debug, Clone)]
pub struct QuotingVector {
    pub name: &'static str,
    /// The value as typed after `=`.
    pub raw: &'static str,
    pub expected: &'static str,
}

impl QuotingVector {
    /// The `NAME=VALUE` argument for `ace set`.
    pub fn pair(&self) -> String {
        format!("{}={}", self.name, self.raw)
    }
}

/// Every quoting vector.
pub fn all_vectors() -> Vec<QuotingVector> {
    vec![
        QuotingVector {
            name: "SIMPLE_QUOTE",
            raw: "'single quoted value'",
            expected: "single quoted value",
        },
        QuotingVector {
            name: "DOUBLE_QUOTE",
            raw: r#""double quoted value""#,
            expected: "double quoted value",
        },
        QuotingVector {
            name: "ESCAPED_QUOTE",
            raw: r#""value with \"escaped\" quotes""#,
            expected: r#"value with "escaped" quotes"#,
        },
        QuotingVector {
            name: "MIXED_QUOTES",
            raw: r#""'single' and "double" quotes""#,
            expected: r#"'single' and "double" quotes"#,
        },
        QuotingVector {
            name: "MULTILINE",
            raw: "\"line1\nline2\nline3\"",
            expected: "line1\nline2\nline3",
        },
        QuotingVector {
            name: "SPECIAL_CHARS",
            raw: r#""!@#$%^&*()_+-={}[]|\:;<>,.?/~`""#,
            expected: r"!@#$%^&*()_+-={}[]|\:;<>,.?/~`",
        },
        QuotingVector {
            name: "ESCAPED_NEWLINE",
            raw: r#""line1\nline2\nline3""#,
            expected: "line1\nline2\nline3",
        },
        QuotingVector {
            name: "SPACE_IN_VALUE",
            raw: "value with spaces",
            expected: "value with spaces",
        },
        QuotingVector {
            name: "EQUALS_IN_VALUE",
            raw: r#""key=value""#,
            expected: "key=value",
        },
        QuotingVector {
            name: "DOLLAR_ESCAPE",
            raw: r#""cost \$5""#,
            expected: "cost $5",
        },
        QuotingVector {
            name: "PLAIN_JSON",
            raw: r#"{"name":"John","age":30,"city":"New York"}"#,
            expected: r#"{"name":"John","age":30,"city":"New York"}"#,
        },
        QuotingVector {
            name: "QUOTED_JSON",
            raw: r#"'{"name":"John","age":30,"city":"New York"}'"#,
            expected: r#"{"name":"John","age":30,"city":"New York"}"#,
        },
        QuotingVector {
            name: "DOUBLE_QUOTED_JSON",
            raw: r#""{\"name\":\"John\",\"age\":30,\"city\":\"New York\"}""#,
            expected: r#"{"name":"John","age":30,"city":"New York"}"#,
        },
        QuotingVector {
            name: "NESTED_JSON",
            raw: r#"{"user":{"name":"John","details":{"age":30,"active":true}}}"#,
            expected: r#"{"user":{"name":"John","details":{"age":30,"active":true}}}"#,
        },
        QuotingVector {
            name: "JSON_ARRAY",
            raw: r#"["apple","banana","cherry"]"#,
            expected: r#"["apple","banana","cherry"]"#,
        },
        QuotingVector {
            name: "JSON_WHITESPACE",
            raw: r#"{"desc":"Line 1\\nLine 2\\tTabbed"}"#,
            expected: r#"{"desc":"Line 1\\nLine 2\\tTabbed"}"#,
        },
    ]
}
