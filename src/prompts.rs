//! Prompt templates

use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("Unknown prompt: {0}")]
    UnknownPrompt(String),

    #[error("Missing required argument '{0}'")]
    MissingArgument(String),
}

#[derive(Debug, Clone, Copy)]
pub struct PromptParam {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: &'static [PromptParam],
}

const CSV_PATH_ARG: PromptParam = PromptParam {
    name: "csv_path",
    description: "Path to the CSV file or CSV string content",
    required: true,
};

pub const PROMPTS: &[PromptTemplate] = &[
    PromptTemplate {
        name: "clean_csv",
        description: "Step-by-step cleaning plan for a CSV file",
        arguments: &[
            CSV_PATH_ARG,
            PromptParam {
                name: "goal",
                description: "What the cleaned data will be used for",
                required: false,
            },
        ],
    },
    PromptTemplate {
        name: "data_quality_report",
        description: "Inspect a CSV file and summarize its data quality",
        arguments: &[CSV_PATH_ARG],
    },
];

/// A prompt ready to send as a single user message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub description: String,
    pub text: String,
}

fn argument(arguments: Option<&Map<String, Value>>, name: &str) -> Option<String> {
    match arguments?.get(name)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::String(_) | Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn required(arguments: Option<&Map<String, Value>>, name: &str) -> Result<String, PromptError> {
    argument(arguments, name).ok_or_else(|| PromptError::MissingArgument(name.to_string()))
}

pub fn render_prompt(
    name: &str,
    arguments: Option<&Map<String, Value>>,
) -> Result<RenderedPrompt, PromptError> {
    let template = PROMPTS
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| PromptError::UnknownPrompt(name.to_string()))?;

    let text = match template.name {
        "clean_csv" => {
            let csv_path = required(arguments, "csv_path")?;
            let goal = argument(arguments, "goal")
                .map(|g| format!("\nThe cleaned data will be used for: {g}\n"))
                .unwrap_or_default();
            format!(
                "Clean the CSV data at `{csv_path}`.\n{goal}\n\
                 1. Call `inspect_csv` and review column types, missing values and duplicates.\n\
                 2. Decide per column whether to drop nulls (`remove_null_rows`) or fill them \
                 (`fill_missing_values`); prefer `median` for skewed numbers and `mode` for categories.\n\
                 3. Remove duplicate rows with `remove_duplicates`.\n\
                 4. Normalize text columns with `standardize_columns` (`trim` first, then casing).\n\
                 5. Apply any row filters the goal requires with `filter_rows`.\n\n\
                 Write every step to a new file with `output_path` instead of overwriting the \
                 original, and finish with a short summary of what changed."
            )
        }
        _ => {
            let csv_path = required(arguments, "csv_path")?;
            format!(
                "Call `inspect_csv` on `{csv_path}` and write a data quality report covering \
                 row and column counts, column types that look wrong, columns with missing \
                 values (with percentages), duplicate rows, and suggested cleaning steps. \
                 Do not modify the file."
            )
        }
    };

    Ok(RenderedPrompt {
        description: template.description.to_string(),
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_clean_csv_includes_goal() {
        let arguments = args(json!({"csv_path": "sales.csv", "goal": "a revenue dashboard"}));
        let prompt = render_prompt("clean_csv", Some(&arguments)).unwrap();
        assert!(prompt.text.contains("`sales.csv`"));
        assert!(prompt.text.contains("a revenue dashboard"));
        assert!(prompt.text.contains("remove_duplicates"));
    }

    #[test]
    fn test_missing_required_argument() {
        let arguments = args(json!({"goal": "x"}));
        assert_eq!(
            render_prompt("clean_csv", Some(&arguments)),
            Err(PromptError::MissingArgument("csv_path".to_string()))
        );
        assert_eq!(
            render_prompt("data_quality_report", None),
            Err(PromptError::MissingArgument("csv_path".to_string()))
        );
    }

    #[test]
    fn test_unknown_prompt() {
        assert_eq!(
            render_prompt("haiku", None),
            Err(PromptError::UnknownPrompt("haiku".to_string()))
        );
    }

    #[test]
    fn test_quality_report() {
        let arguments = args(json!({"csv_path": "people.csv"}));
        let prompt = render_prompt("data_quality_report", Some(&arguments)).unwrap();
        assert_eq!(prompt.description, "Inspect a CSV file and summarize its data quality");
        assert!(prompt.text.contains("Do not modify the file"));
    }
}
