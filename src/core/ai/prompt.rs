use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

use crate::infrastructure::error::ReviewError;

static VARIABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("variable pattern is valid"));

const KEY_POINTS_TEMPLATE: &str = r#"
Role: Expert Product Analyst.
Product: "{{product_name}}"
User Review: "{{review_text}}"

Instruction:
Generate 3-5 concise key points based on the review.

CRITICAL RULES FOR SHORT REVIEWS:
If the review is VERY SHORT or VAGUE (e.g., "Biasa saja", "Just okay", "Bad", "Good"):
1. Do NOT just repeat the review.
2. You MUST use your general knowledge about {{product_name}} to infer WHY the user might feel that way.
   - Example Input: Product "iPhone 15", Review "Biasa saja".
   - Your Inference: "Lack of major design changes", "Screen still 60Hz", "Price to performance ratio".
3. If the review is DETAILED, stay strictly grounded in the text provided.

LANGUAGE RULES:
- If the review is Indonesian -> write the points in INDONESIAN.
- If the review is English -> write the points in ENGLISH.

Format: Return ONLY a raw JSON array of strings, without markdown code fences or any other text.
Example Output: ["Poin 1", "Poin 2", "Poin 3"]"#;

/// 提示词模板
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub name: String,
    pub template: String,
    pub variables: Vec<String>,
}

impl PromptTemplate {
    /// 创建新的模板
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        let template_str = template.into();
        let variables = Self::extract_variables(&template_str);

        Self {
            name: name.into(),
            template: template_str,
            variables,
        }
    }

    fn extract_variables(template: &str) -> Vec<String> {
        let mut variables: Vec<String> = Vec::new();
        for cap in VARIABLE_PATTERN.captures_iter(template) {
            if !variables.iter().any(|v| v == &cap[1]) {
                variables.push(cap[1].to_string());
            }
        }
        variables
    }

    /// 渲染模板
    ///
    /// 单次替换：变量值中出现的 `{{...}}` 不会被再次展开。
    pub fn render(&self, values: &HashMap<&str, &str>) -> Result<String, ReviewError> {
        if let Some(missing) = self.variables.iter().find(|v| !values.contains_key(v.as_str())) {
            return Err(ReviewError::internal(format!(
                "Missing variable '{}' for prompt template '{}'",
                missing, self.name
            )));
        }

        let rendered = VARIABLE_PATTERN.replace_all(&self.template, |caps: &Captures| {
            values.get(&caps[1]).copied().unwrap_or_default().to_string()
        });

        Ok(rendered.into_owned())
    }
}

/// 提示词构建器
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    key_points: PromptTemplate,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            key_points: PromptTemplate::new("key_points", KEY_POINTS_TEMPLATE),
        }
    }

    /// 构建要点提取提示词
    pub fn build_key_points_prompt(
        &self,
        product_name: &str,
        review_text: &str,
    ) -> Result<String, ReviewError> {
        let mut values = HashMap::new();
        values.insert("product_name", product_name);
        values.insert("review_text", review_text);

        self.key_points.render(&values)
    }
}
