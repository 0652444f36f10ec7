//! Prompt templates for Sporre.
//!
//! Prompts can be customized by placing TOML files in the custom prompts
//! directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Prompts {
    pub qa: QaPrompts,
    pub meeting: MeetingPrompts,
    pub financial: FinancialPrompts,
    pub image: ImagePrompts,
    pub nutrition: NutritionPrompts,
    pub summary: SummaryPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompt for webpage question answering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QaPrompts {
    pub template: String,
}

impl Default for QaPrompts {
    fn default() -> Self {
        Self {
            template: r#"You are a helpful AI assistant answering questions about a webpage.

Webpage Information:
- Title: {{title}}
- URL: {{url}}

Relevant Content from the webpage:
{{context}}

User Question: {{question}}

Please provide a clear, accurate answer based on the content above. If the content doesn't contain enough information to answer the question, say so honestly. Do not make up information.

Answer:"#
                .to_string(),
        }
    }
}

/// Prompt for generating meeting minutes from transcripts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetingPrompts {
    pub template: String,
}

impl Default for MeetingPrompts {
    fn default() -> Self {
        Self {
            template: r#"Generate meeting minutes and a list of tasks based on the provided context.

Context:
{{transcript}}

Please provide:

## Meeting Minutes
- Key points discussed
- Decisions made
- Important topics covered

## Task List
- Actionable items with assignees (if mentioned) and deadlines (if mentioned)
- Follow-up actions needed"#
                .to_string(),
        }
    }
}

/// Prompt for formatting financial terminology in transcripts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialPrompts {
    pub template: String,
}

impl Default for FinancialPrompts {
    fn default() -> Self {
        Self {
            template: r#"You are an intelligent assistant specializing in financial products.
Your task is to process transcripts of earnings calls, ensuring that all
references to financial products and common financial terms are in the correct format.

For each financial product or common term that is typically abbreviated as an acronym,
the full term should be spelled out followed by the acronym in parentheses.

Examples:
- '401k' -> '401(k) retirement savings plan'
- 'HSA' -> 'Health Savings Account (HSA)'
- 'ROA' -> 'Return on Assets (ROA)'
- 'VaR' -> 'Value at Risk (VaR)'
- 'PB' -> 'Price to Book (PB) ratio'
- 'five two nine' -> '529 (Education Savings Plan)'
- 'four zero one k' -> '401(k) (Retirement Savings Plan)'

Note: Some acronyms have different meanings based on context (e.g., 'LTV' can be
'Loan to Value' or 'Lifetime Value'). Discern from context which term is appropriate.

Regular numbers like 'twenty three percent' should be left as is.

After processing, provide:
1. The adjusted transcript
2. A list of the changes you made

Transcript:
{{transcript}}"#
                .to_string(),
        }
    }
}

/// Prompts for image analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagePrompts {
    /// Default prompt when the caller provides none.
    pub analysis_default: String,
    /// Prompt for extracting text from images.
    pub text_extraction: String,
}

impl Default for ImagePrompts {
    fn default() -> Self {
        Self {
            analysis_default: "Describe what you see in this image in detail. Extract any text present.".to_string(),
            text_extraction: "Please extract all text from this image. Preserve the structure and formatting as much as possible. If there are any diagrams or visual elements, describe them briefly.".to_string(),
        }
    }
}

/// Prompt for nutrition analysis of food images.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionPrompts {
    /// Structured nutritionist instructions, prepended to the caller prompt.
    pub system: String,
    /// Default request when the caller provides none.
    pub default_request: String,
}

impl Default for NutritionPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are an expert nutritionist. Your task is to analyze the food items displayed in the image and provide a detailed nutritional assessment using the following format:
1. **Identification**: List each identified food item clearly, one per line.
2. **Portion Size & Calorie Estimation**: For each identified food item, specify the portion size and provide an estimated number of calories. Use bullet points with the following structure:
- **[Food Item]**: [Portion Size], [Number of Calories] calories
Example:
*   **Salmon**: 6 ounces, 210 calories
*   **Asparagus**: 3 spears, 25 calories
3. **Total Calories**: Provide the total number of calories for all food items.
Example:
Total Calories: [Number of Calories]
4. **Nutrient Breakdown**: Include a breakdown of key nutrients such as **Protein**, **Carbohydrates**, **Fats**, **Vitamins**, and **Minerals**. Use bullet points, and for each nutrient provide details about the contribution of each food item.
Example:
*   **Protein**: Salmon (35g), Asparagus (3g), Tomatoes (1g) = [Total Protein]
5. **Health Evaluation**: Evaluate the healthiness of the meal in one paragraph.
6. **Disclaimer**: Include the following exact text as a disclaimer:
The nutritional information and calorie estimates provided are approximate and are based on general food data.
Actual values may vary depending on factors such as portion size, specific ingredients, preparation methods, and individual variations.
For precise dietary advice or medical guidance, consult a qualified nutritionist or healthcare provider.
Format your response exactly like the template above to ensure consistency."#
                .to_string(),
            default_request: "Analyze the food items in this image and provide nutritional information including calories, macronutrients, and dietary value.".to_string(),
        }
    }
}

/// Prompt for text summarization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryPrompts {
    pub template: String,
}

impl Default for SummaryPrompts {
    fn default() -> Self {
        Self {
            template: r#"Please provide a concise summary of the following text.{{length_instruction}}

Text:
{{text}}

Summary:"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory
    /// and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        // Store custom variables
        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let qa_path = custom_path.join("qa.toml");
            if qa_path.exists() {
                let content = std::fs::read_to_string(&qa_path)?;
                prompts.qa = toml::from_str(&content)?;
            }

            let meeting_path = custom_path.join("meeting.toml");
            if meeting_path.exists() {
                let content = std::fs::read_to_string(&meeting_path)?;
                prompts.meeting = toml::from_str(&content)?;
            }

            let financial_path = custom_path.join("financial.toml");
            if financial_path.exists() {
                let content = std::fs::read_to_string(&financial_path)?;
                prompts.financial = toml::from_str(&content)?;
            }

            let image_path = custom_path.join("image.toml");
            if image_path.exists() {
                let content = std::fs::read_to_string(&image_path)?;
                prompts.image = toml::from_str(&content)?;
            }

            let nutrition_path = custom_path.join("nutrition.toml");
            if nutrition_path.exists() {
                let content = std::fs::read_to_string(&nutrition_path)?;
                prompts.nutrition = toml::from_str(&content)?;
            }

            let summary_path = custom_path.join("summary.toml");
            if summary_path.exists() {
                let content = std::fs::read_to_string(&summary_path)?;
                prompts.summary = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config
    /// variables. Provided variables take precedence.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.qa.template.contains("{{question}}"));
        assert!(prompts.meeting.template.contains("{{transcript}}"));
        assert!(!prompts.nutrition.system.is_empty());
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = std::collections::HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_custom_variables_do_not_override_provided() {
        let mut prompts = Prompts::default();
        prompts
            .variables
            .insert("name".to_string(), "config".to_string());

        let mut vars = std::collections::HashMap::new();
        vars.insert("name".to_string(), "call-site".to_string());

        let result = prompts.render_with_custom("{{name}}", &vars);
        assert_eq!(result, "call-site");
    }
}
