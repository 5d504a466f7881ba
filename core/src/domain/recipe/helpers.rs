const JSON_FENCE_OPEN: &str = "```json";
const FENCE: &str = "```";

/// Pull the JSON payload out of a model answer.
///
/// The first line that is exactly ```` ```json ```` opens the block; everything
/// after it up to the next ```` ``` ```` is the payload. Without an opening
/// fence the whole answer is the payload. The result is trimmed either way.
pub fn extract_fenced_json(text: &str) -> String {
    let mut lines = text.lines();

    while let Some(line) = lines.next() {
        if line == JSON_FENCE_OPEN {
            let remaining = lines.collect::<Vec<_>>().join("\n");
            let content = remaining.split(FENCE).next().unwrap_or_default();
            return content.trim().to_string();
        }
    }

    text.trim().to_string()
}

/// Recipe text shown when the grounded search answers with nothing.
pub fn fallback_recipe_suggestion(ingredients: &[String]) -> String {
    if ingredients.is_empty() {
        return "No ingredients detected. Please try again with a clearer image.".to_string();
    }

    let query = urlencoding::encode(&format!("recipe with {}", ingredients.join(" "))).into_owned();
    let listed = ingredients
        .iter()
        .map(|ingredient| format!("- {}", ingredient))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "# Quick Recipe Suggestion\n\n\
         I noticed you have the following ingredients:\n{listed}\n\n\
         I couldn't find a recipe at the moment. Try:\n\n\
         1. [Search the web for recipes](https://www.google.com/search?q={query})\n\
         2. Popular recipe websites: Allrecipes, BBC Good Food, Epicurious, Food Network\n\
         3. Ingredient-based search tools: SuperCook, MyFridgeFood\n"
    )
}
