//! Prompt - Instruction template wrapped around every question
//!
//! Pure domain entity without infrastructure dependencies.

use serde::{Deserialize, Serialize};

use super::question::Question;
use crate::domain::errors::DomainError;

/// Marker replaced by the user's question when a template is rendered
pub const QUESTION_PLACEHOLDER: &str = "{question}";

const SQL_EXCEL_TEMPLATE: &str = r#"You are an extremely knowledgeable and precise AI assistant specializing in SQL queries and Excel formulas.
Your goal is to provide accurate, concise, and ready-to-use answers.

*Instructions:*
1. If the request is for an *SQL query*: Provide only the SQL code block, formatted like:
   ```sql
   -- Your SQL here
   ```
   Do NOT include any conversational text before or after the code. If an explanation is explicitly requested, provide it clearly.
2. If the request is for an *Excel formula*: Provide only the Excel formula, formatted like:
   ```excel
   =YOUR_FORMULA_HERE
   ```
   Do NOT include any conversational text before or after the formula. If an explanation is explicitly requested, provide it clearly.
3. If the request is for a *cheat sheet or explanation*: Provide a detailed, well-structured, and comprehensive explanation or cheat sheet. Use bullet points or code blocks where appropriate for clarity.
4. Always prioritize giving the most common, standard, and efficient solution.
5. If you cannot fulfill the request, politely state that you cannot.
6. If the request is ambiguous (e.g., could be SQL or Excel), ask the user for clarification before providing an answer.

Example 1:
User: SQL to get distinct product names.
AI:
```sql
SELECT DISTINCT product_name FROM products;
```

Example 2:
User: Excel formula to concatenate a label with the sum of a range.
AI:
```excel
=CONCATENATE("Total: ", SUM(A1:A10))
```

User's request: {question}
"#;

/// PromptTemplate - Instructions with a single `{question}` slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Create a template from custom text.
    ///
    /// The text must contain [`QUESTION_PLACEHOLDER`] exactly once.
    pub fn new(template: impl Into<String>) -> Result<Self, DomainError> {
        let template = template.into();
        match template.matches(QUESTION_PLACEHOLDER).count() {
            1 => Ok(Self { template }),
            0 => Err(DomainError::Validation(format!(
                "prompt template must contain the {} placeholder",
                QUESTION_PLACEHOLDER
            ))),
            n => Err(DomainError::Validation(format!(
                "prompt template contains {} placeholder {} times, expected once",
                QUESTION_PLACEHOLDER, n
            ))),
        }
    }

    /// The built-in SQL & Excel assistant instructions
    pub fn sql_excel() -> Self {
        Self {
            template: SQL_EXCEL_TEMPLATE.to_string(),
        }
    }

    /// Wrap the question in the instructions
    pub fn render(&self, question: &Question) -> String {
        // Single pass so a question containing the placeholder is not expanded again
        self.template
            .replacen(QUESTION_PLACEHOLDER, question.as_str(), 1)
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::sql_excel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_contains_question_verbatim() {
        let question = Question::parse("SQL query to find active users\n  -- last 30 days").unwrap();
        let prompt = PromptTemplate::sql_excel().render(&question);

        assert!(prompt.contains("User's request: SQL query to find active users\n  -- last 30 days"));
        assert!(prompt.starts_with("You are an extremely knowledgeable"));
        assert!(!prompt.contains(QUESTION_PLACEHOLDER));
    }

    #[test]
    fn test_question_with_placeholder_is_not_expanded_twice() {
        let question = Question::parse("what does {question} mean in a template?").unwrap();
        let prompt = PromptTemplate::new("Q: {question}").unwrap().render(&question);
        assert_eq!(prompt, "Q: what does {question} mean in a template?");
    }

    #[test]
    fn test_builtin_template_has_one_placeholder() {
        assert!(PromptTemplate::new(PromptTemplate::sql_excel().as_str()).is_ok());
    }

    #[test]
    fn test_custom_template_validation() {
        assert!(matches!(
            PromptTemplate::new("no slot here"),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            PromptTemplate::new("{question} and {question}"),
            Err(DomainError::Validation(_))
        ));
    }
}
